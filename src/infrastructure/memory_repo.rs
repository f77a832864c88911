//! Process-local todo store.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    todos: BTreeMap<TodoId, Todo>,
    last_id: i64,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|err| anyhow!("todo store lock poisoned: {err}"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|err| anyhow!("todo store lock poisoned: {err}"))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn init(&self) -> Result<()> { Ok(()) }

    async fn find_all(&self) -> Result<Vec<Todo>> { Ok(self.read()?.todos.values().cloned().collect()) }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> { Ok(self.read()?.todos.get(&id).cloned()) }

    async fn find_page(&self, offset: u64, limit: u32) -> Result<(Vec<Todo>, u64)> {
        let state = self.read()?;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let items = state.todos.values().skip(skip).take(limit as usize).cloned().collect();
        Ok((items, state.todos.len() as u64))
    }

    async fn insert(&self, input: NewTodo) -> Result<Todo> {
        let mut state = self.write()?;
        state.last_id += 1;
        let todo = Todo { id: TodoId(state.last_id), text: input.text, done: input.done };
        state.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn save(&self, todo: Todo) -> Result<Todo> {
        let mut state = self.write()?;
        // Keep the counter ahead of explicitly saved ids.
        state.last_id = state.last_id.max(todo.id.0);
        state.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<()> {
        self.write()?.todos.remove(&id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.write()?.todos.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_not_reused_after_delete_all() {
        let repo = InMemoryTodoRepository::new();
        let first = repo.insert(NewTodo { text: "a".into(), done: false }).await.unwrap();
        repo.delete_all().await.unwrap();
        let second = repo.insert(NewTodo { text: "b".into(), done: false }).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(repo.find_all().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn save_with_unknown_id_inserts_and_advances_counter() {
        let repo = InMemoryTodoRepository::new();
        repo.save(Todo { id: TodoId(10), text: "x".into(), done: true }).await.unwrap();
        let next = repo.insert(NewTodo { text: "y".into(), done: false }).await.unwrap();
        assert_eq!(next.id, TodoId(11));
    }

    #[tokio::test]
    async fn find_page_reports_total() {
        let repo = InMemoryTodoRepository::new();
        for text in ["a", "b", "c"] {
            repo.insert(NewTodo { text: text.into(), done: false }).await.unwrap();
        }
        let (items, total) = repo.find_page(2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "c");
    }
}
