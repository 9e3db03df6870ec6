//! Task model and repository.
//!
//! The repository borrows a session's connection, so every call runs inside
//! the caller's transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

use crate::error::{DbError, ValidationError};
use crate::model::Model;

/// Maximum length for task titles
const MAX_TITLE_LEN: usize = 255;

/// Task record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Model for Task {
    const TABLE: &'static str = "tasks";

    fn create_sql() -> &'static str {
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id SERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL CHECK (length(btrim(title)) > 0),
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#
    }

    fn index_sql() -> &'static [&'static str] {
        &["CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed)"]
    }
}

/// Validated task title: trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// # Example
    /// ```
    /// use todoctl_core::TaskTitle;
    ///
    /// assert_eq!(TaskTitle::new("  buy milk ").unwrap().as_str(), "buy milk");
    /// assert!(TaskTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Task repository
pub struct TaskRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TaskRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// All tasks, oldest first.
    pub async fn list(&mut self) -> Result<Vec<Task>, DbError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, title, completed, created_at FROM tasks ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(tasks)
    }

    pub async fn get(&mut self, id: i32) -> Result<Task, DbError> {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, completed, created_at FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| not_found(id))
    }

    pub async fn create(&mut self, title: &TaskTitle, completed: bool) -> Result<Task, DbError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, completed)
            VALUES ($1, $2)
            RETURNING id, title, completed, created_at
            "#,
        )
        .bind(title.as_str())
        .bind(completed)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(task)
    }

    /// Replace title and completion state.
    pub async fn update(
        &mut self,
        id: i32,
        title: &TaskTitle,
        completed: bool,
    ) -> Result<Task, DbError> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET title = $2, completed = $3
            WHERE id = $1
            RETURNING id, title, completed, created_at
            "#,
        )
        .bind(id)
        .bind(title.as_str())
        .bind(completed)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&mut self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: i32) -> DbError {
    DbError::NotFound {
        resource: "task",
        id: id.to_string(),
    }
}
