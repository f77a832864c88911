use crate::domain::error::TodoError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{NewTodo, Todo, TodoId, TodoPatch};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, TodoError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Todo>>;
    /// `page_index` counts from 1.
    async fn list_page(&self, page_index: u32, page_size: u32) -> Result<Page<Todo>>;
    async fn get_by_id(&self, id: TodoId) -> Result<Todo>;
    async fn create(&self, input: NewTodo) -> Result<Todo>;
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo>;
    async fn delete(&self, id: TodoId) -> Result<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list_all(&self) -> Result<Vec<Todo>> { Ok(self.repo.find_all().await?) }

    async fn list_page(&self, page_index: u32, page_size: u32) -> Result<Page<Todo>> {
        let request = PageRequest::of(page_index, page_size)?;
        let (content, total) = self.repo.find_page(request.offset(), request.limit()).await?;
        tracing::debug!(page_index, page_size, returned = content.len(), total, "listed page");
        Ok(Page::new(content, request, total))
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo> {
        match self.repo.find_by_id(id).await? {
            Some(todo) => Ok(todo),
            None => {
                tracing::debug!(%id, "todo not found");
                Err(TodoError::NotFound(id))
            }
        }
    }

    async fn create(&self, input: NewTodo) -> Result<Todo> {
        let todo = self.repo.insert(input).await?;
        tracing::debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    // Lookup and save are separate store calls; concurrent updates to one id are last-write-wins.
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo> {
        let existing = self.get_by_id(id).await?;
        let saved = self.repo.save(existing.apply(patch)).await?;
        tracing::debug!(%id, "updated todo");
        Ok(saved)
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        self.repo.delete_by_id(id).await?;
        tracing::debug!(%id, "deleted todo");
        Ok(())
    }
}
