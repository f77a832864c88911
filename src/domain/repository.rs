use async_trait::async_trait;
use super::todo::{NewTodo, Todo, TodoId};

/// Persistence for todos. Listings are ordered by ascending id.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<Todo>>;
    async fn find_by_id(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Returns at most `limit` todos starting at `offset`, plus the total count.
    async fn find_page(&self, offset: u64, limit: u32) -> anyhow::Result<(Vec<Todo>, u64)>;
    /// Stores a new todo under an id that has never been handed out before.
    async fn insert(&self, input: NewTodo) -> anyhow::Result<Todo>;
    /// Inserts or replaces the todo keyed by `todo.id`.
    async fn save(&self, todo: Todo) -> anyhow::Result<Todo>;
    /// Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: TodoId) -> anyhow::Result<()>;
    async fn delete_all(&self) -> anyhow::Result<()>;
}
