/// Task model and database operations
///
/// A task is owned by the account that created it. Only the author may edit,
/// delete, re-prioritize or (un)assign it; anybody may mark it resolved.
///
/// # Status flow
///
/// ```text
/// OPEN → IN_PROGRESS (on assignment) → RESOLVED → CLOSE
/// ```
///
/// The author can also jump straight to any status.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('OPEN', 'IN_PROGRESS', 'RESOLVED', 'CLOSE');
/// CREATE TYPE task_priority AS ENUM ('HIGH', 'MEDIUM', 'LOW');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'OPEN',
///     priority task_priority NOT NULL DEFAULT 'LOW',
///     author_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     assignee_id BIGINT REFERENCES accounts(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::page::{Page, PageRequest};

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, author_id, assignee_id, created_at, updated_at";

/// A string that does not name a variant of one of the task enums
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Wrong {kind}")]
pub struct ParseEnumError {
    /// `"status"` or `"priority"`
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Resolved,
    Close,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Resolved => "RESOLVED",
            TaskStatus::Close => "CLOSE",
        }
    }

    /// Statuses any account may set, not only the author
    pub fn is_open_to_everyone(&self) -> bool {
        matches!(self, TaskStatus::Resolved)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a status name, ignoring case and surrounding whitespace
impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(TaskStatus::Open),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "RESOLVED" => Ok(TaskStatus::Resolved),
            "CLOSE" => Ok(TaskStatus::Close),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "HIGH",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::Low => "LOW",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(TaskPriority::High),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "LOW" => Ok(TaskPriority::Low),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// Persisted task
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    pub title: String,

    pub description: String,

    #[serde(rename = "taskStatus")]
    pub status: TaskStatus,

    #[serde(rename = "taskPriority")]
    pub priority: TaskPriority,

    /// Account that created the task; never changes
    pub author_id: i64,

    /// Account currently working on the task
    pub assignee_id: Option<i64>,

    #[serde(skip)]
    pub created_at: DateTime<Utc>,

    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_authored_by(&self, account_id: i64) -> bool {
        self.author_id == account_id
    }

    /// Hands the task to `account_id` and moves it to `IN_PROGRESS`
    pub fn assign(&mut self, account_id: i64) {
        self.assignee_id = Some(account_id);
        self.status = TaskStatus::InProgress;
        self.touch();
    }

    /// Clears the assignee; status is left as is
    pub fn unassign(&mut self) {
        self.assignee_id = None;
        self.touch();
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
        self.touch();
    }

    /// Replaces title and description
    pub fn rename(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.title = title.into();
        self.description = description.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl NewTask {
    /// A fresh task: `OPEN`, `LOW` priority and unassigned
    pub fn new(title: impl Into<String>, description: impl Into<String>, author_id: i64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            author_id,
            status: TaskStatus::Open,
            priority: TaskPriority::Low,
        }
    }
}

/// Which tasks a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskQuery {
    All,
    Status(TaskStatus),
    Priority(TaskPriority),
    Author(i64),
    Assignee(i64),
}

impl TaskQuery {
    /// In-process equivalent of the SQL filter
    pub fn matches(&self, task: &Task) -> bool {
        match *self {
            TaskQuery::All => true,
            TaskQuery::Status(status) => task.status == status,
            TaskQuery::Priority(priority) => task.priority == priority,
            TaskQuery::Author(id) => task.author_id == id,
            TaskQuery::Assignee(id) => task.assignee_id == Some(id),
        }
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match *self {
            TaskQuery::All => {}
            TaskQuery::Status(status) => {
                builder.push(" WHERE status = ").push_bind(status);
            }
            TaskQuery::Priority(priority) => {
                builder.push(" WHERE priority = ").push_bind(priority);
            }
            TaskQuery::Author(id) => {
                builder.push(" WHERE author_id = ").push_bind(id);
            }
            TaskQuery::Assignee(id) => {
                builder.push(" WHERE assignee_id = ").push_bind(id);
            }
        }
    }
}

impl Task {
    /// Inserts a new task
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, priority, author_id, assignee_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.author_id)
        .fetch_one(pool)
        .await?;

        tracing::debug!(task_id = task.id, "Inserted task");

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, author_id, assignee_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Writes every mutable column of `task` back to its row
    ///
    /// Returns `None` if the row no longer exists.
    pub async fn save(pool: &PgPool, task: &Task) -> Result<Option<Self>, sqlx::Error> {
        let saved = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                priority = $5,
                assignee_id = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, priority, author_id, assignee_id,
                      created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.assignee_id)
        .fetch_optional(pool)
        .await?;

        Ok(saved)
    }

    /// Deletes a task and, through the foreign key, its comments
    ///
    /// Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns one page of the tasks selected by `query`, ordered by ID
    pub async fn page(
        pool: &PgPool,
        query: TaskQuery,
        request: PageRequest,
    ) -> Result<Page<Self>, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks");
        query.push_where(&mut count);
        let (total,): (i64,) = count.build_query_as::<(i64,)>().fetch_one(pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks", TASK_COLUMNS));
        query.push_where(&mut select);
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());

        let tasks = select.build_query_as::<Task>().fetch_all(pool).await?;

        Ok(Page::new(tasks, request, total))
    }
}
