use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = if is_memory_url(database_url) {
            // Each in-memory connection is its own database; pin exactly one for the pool's lifetime.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(database_url).await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                done INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, text, done FROM todos ORDER BY id")
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, text, done FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn find_page(&self, offset: u64, limit: u32) -> Result<(Vec<Todo>, u64)> {
        let rows = sqlx::query("SELECT id, text, done FROM todos ORDER BY id LIMIT ?1 OFFSET ?2")
            .bind(i64::from(limit))
            // Offsets past i64::MAX still mean "beyond the last row".
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&*self.pool)
            .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos")
            .fetch_one(&*self.pool)
            .await?;
        let items = rows.into_iter().map(row_to_todo).collect::<Result<Vec<_>>>()?;
        Ok((items, u64::try_from(total)?))
    }

    async fn insert(&self, input: NewTodo) -> Result<Todo> {
        let result = sqlx::query("INSERT INTO todos (text, done) VALUES (?1, ?2)")
            .bind(&input.text)
            .bind(input.done)
            .execute(&*self.pool)
            .await?;
        Ok(Todo { id: TodoId(result.last_insert_rowid()), text: input.text, done: input.done })
    }

    async fn save(&self, todo: Todo) -> Result<Todo> {
        sqlx::query(
            "INSERT INTO todos (id, text, done) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET text = excluded.text, done = excluded.done",
        )
        .bind(todo.id.0)
        .bind(&todo.text)
        .bind(todo.done)
        .execute(&*self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<()> {
        sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM todos").execute(&*self.pool).await?;
        Ok(())
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        text: row.try_get("text")?,
        done: row.try_get("done")?,
    })
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

/// Makes sure a file-backed database can be opened, creating the file and its parent directories.
pub fn prepare_sqlite_file(database_url: &str) -> Result<()> {
    if is_memory_url(database_url) { return Ok(()); }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        // On Windows, absolute paths may look like /C:/path; strip the leading slash
        let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
            &path[1..]
        } else {
            path
        };
        use std::fs::{self, OpenOptions};
        let p = Path::new(path);
        if let Some(parent) = p.parent() { if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; } }
        if !p.exists() {
            OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteTodoRepository {
        let repo = SqliteTodoRepository::connect("sqlite::memory:").await.unwrap();
        repo.init().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repo = repo().await;
        let created = repo.insert(NewTodo { text: "text1".into(), done: true }).await.unwrap();
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(repo.find_all().await.unwrap(), vec![created]);
        assert_eq!(repo.find_by_id(TodoId(999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_upserts_by_id() {
        let repo = repo().await;
        let created = repo.insert(NewTodo { text: "before".into(), done: false }).await.unwrap();
        let changed = Todo { id: created.id, text: "after".into(), done: true };
        repo.save(changed.clone()).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap(), vec![changed]);

        let fresh = Todo { id: TodoId(50), text: "fresh".into(), done: false };
        repo.save(fresh.clone()).await.unwrap();
        assert_eq!(repo.find_by_id(TodoId(50)).await.unwrap(), Some(fresh));
    }

    #[tokio::test]
    async fn find_page_uses_offset_and_counts_everything() {
        let repo = repo().await;
        for text in ["text1", "text2", "text3"] {
            repo.insert(NewTodo { text: text.into(), done: false }).await.unwrap();
        }
        let (items, total) = repo.find_page(2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(), vec!["text3"]);

        let (items, total) = repo.find_page(6, 2).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn huge_offset_yields_empty_page() {
        let repo = repo().await;
        repo.insert(NewTodo { text: "only".into(), done: false }).await.unwrap();
        let offset = u64::from(u32::MAX - 1) * u64::from(u32::MAX);
        let (items, total) = repo.find_page(offset, u32::MAX).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn last_possible_page_through_service_is_empty() {
        use crate::application::todo_service::{TodoService, TodoServiceImpl};

        let repo = repo().await;
        repo.insert(NewTodo { text: "only".into(), done: false }).await.unwrap();
        let service = TodoServiceImpl::new(repo);
        let page = service.list_page(u32::MAX, u32::MAX).await.unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 1);

        let first = service.list_page(1, u32::MAX).await.unwrap();
        assert_eq!(first.content.len(), 1);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = repo().await;
        let first = repo.insert(NewTodo { text: "a".into(), done: false }).await.unwrap();
        repo.delete_by_id(first.id).await.unwrap();
        repo.delete_by_id(first.id).await.unwrap();
        let second = repo.insert(NewTodo { text: "b".into(), done: false }).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn delete_all_empties_the_table() {
        let repo = repo().await;
        repo.insert(NewTodo { text: "a".into(), done: false }).await.unwrap();
        repo.delete_all().await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
