//! SQLite-backed entity store for todo records.
//!
//! # Design
//! A single `rusqlite` connection; the handlers share it behind an async
//! mutex. The schema is created on open with an idempotent batch.
//! Timestamps are stored as fixed-width RFC 3339 text (so `created_at`
//! ordering works as plain text comparison) and due dates as `yyyy-mm-dd`
//! text; tags are a comma-delimited column that is NULL when the list is
//! empty.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use thiserror::Error;
use todo_core::{CreateTodo, Priority, Todo, TodoFilter, UpdateTodo};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no todo with id {0}")]
    NotFound(i64),
    #[error("priority out of range: {0}")]
    InvalidPriority(i32),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
}

const SELECT_COLUMNS: &str = "SELECT id, title, description, is_completed, created_at, \
     completed_at, due_date, priority, tags FROM todos";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS todos (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              title TEXT NOT NULL,
              description TEXT,
              is_completed INTEGER NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL,
              completed_at TEXT,
              due_date TEXT,
              priority INTEGER NOT NULL DEFAULT 1,
              tags TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_todos_is_completed ON todos(is_completed);
            CREATE INDEX IF NOT EXISTS idx_todos_priority ON todos(priority);
            CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at);
            "#,
        )?;
        Ok(())
    }

    /// Inserts a new record and returns it with its assigned id.
    ///
    /// Title and description are trimmed; an empty tag list is stored as
    /// NULL. `timezone_offset` on the input is validation-only and ignored.
    pub fn create(&mut self, input: &CreateTodo) -> Result<Todo, StoreError> {
        let priority = Priority::from_i32(input.priority)
            .ok_or(StoreError::InvalidPriority(input.priority))?;
        let title = input.title.trim();
        let description = input.description.as_deref().map(str::trim);
        let created_at = format_timestamp(Utc::now());
        self.conn.execute(
            "INSERT INTO todos (title, description, is_completed, created_at, completed_at, due_date, priority, tags) \
             VALUES (?1, ?2, 0, ?3, NULL, ?4, ?5, ?6)",
            params![
                title,
                description,
                created_at,
                input.due_date.map(|d| d.to_string()),
                priority as i64,
                join_tags(input.tags.as_deref()),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)
    }

    pub fn get(&self, id: i64) -> Result<Todo, StoreError> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_todo,
            )
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    /// Applies only the provided fields. Setting `is_completed` stamps or
    /// clears `completed_at`, even when the value does not change.
    pub fn update(&mut self, id: i64, input: &UpdateTodo) -> Result<Todo, StoreError> {
        let tx = self.conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM todos WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(id));
        }

        if let Some(title) = &input.title {
            tx.execute(
                "UPDATE todos SET title = ?2 WHERE id = ?1",
                params![id, title.trim()],
            )?;
        }
        if let Some(description) = &input.description {
            tx.execute(
                "UPDATE todos SET description = ?2 WHERE id = ?1",
                params![id, description.trim()],
            )?;
        }
        if let Some(is_completed) = input.is_completed {
            tx.execute(
                "UPDATE todos SET is_completed = ?2, completed_at = ?3 WHERE id = ?1",
                params![
                    id,
                    is_completed,
                    is_completed.then(|| format_timestamp(Utc::now())),
                ],
            )?;
        }
        if let Some(due_date) = input.due_date {
            tx.execute(
                "UPDATE todos SET due_date = ?2 WHERE id = ?1",
                params![id, due_date.to_string()],
            )?;
        }
        if let Some(raw) = input.priority {
            let priority = Priority::from_i32(raw).ok_or(StoreError::InvalidPriority(raw))?;
            tx.execute(
                "UPDATE todos SET priority = ?2 WHERE id = ?1",
                params![id, priority as i64],
            )?;
        }
        if let Some(tags) = &input.tags {
            tx.execute(
                "UPDATE todos SET tags = ?2 WHERE id = ?1",
                params![id, join_tags(Some(tags))],
            )?;
        }

        tx.commit()?;
        self.get(id)
    }

    /// Permanent row delete; there is no soft-delete or versioning.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Flips `is_completed`, stamping or clearing `completed_at` to match.
    pub fn toggle(&mut self, id: i64) -> Result<Todo, StoreError> {
        let current: Option<bool> = self
            .conn
            .query_row(
                "SELECT is_completed FROM todos WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(is_completed) = current else {
            return Err(StoreError::NotFound(id));
        };
        let next = !is_completed;
        self.conn.execute(
            "UPDATE todos SET is_completed = ?2, completed_at = ?3 WHERE id = ?1",
            params![id, next, next.then(|| format_timestamp(Utc::now()))],
        )?;
        self.get(id)
    }

    /// Filtered, ordered listing: incomplete first, then priority
    /// descending, then due date ascending with missing due dates last,
    /// then newest first.
    pub fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let mut sql = String::from(SELECT_COLUMNS);
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<i64> = Vec::new();
        if let Some(is_completed) = filter.is_completed {
            args.push(i64::from(is_completed));
            clauses.push(format!("is_completed = ?{}", args.len()));
        }
        if let Some(priority) = filter.priority {
            args.push(i64::from(priority));
            clauses.push(format!("priority = ?{}", args.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(
            " ORDER BY is_completed ASC, priority DESC, due_date IS NULL ASC, due_date ASC, created_at DESC",
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args), row_to_todo)?;
        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn join_tags(tags: Option<&[String]>) -> Option<String> {
    match tags {
        Some(tags) if !tags.is_empty() => Some(tags.join(",")),
        _ => None,
    }
}

fn split_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => raw
            .split(',')
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let created_at: String = row.get(4)?;
    let completed_at: Option<String> = row.get(5)?;
    let due_date: Option<String> = row.get(6)?;
    let priority_raw: i64 = row.get(7)?;
    let tags: Option<String> = row.get(8)?;

    let priority = Priority::from_i32(priority_raw as i32).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            Type::Integer,
            format!("priority out of range: {priority_raw}").into(),
        )
    })?;

    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        is_completed: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
        completed_at: completed_at
            .as_deref()
            .map(|value| parse_timestamp(5, value))
            .transpose()?,
        due_date: due_date
            .as_deref()
            .map(|value| parse_date(6, value))
            .transpose()?,
        priority,
        priority_label: priority.label().to_string(),
        tags: split_tags(tags.as_deref()),
    })
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
