/// Persistence port
///
/// Services never touch SQL directly. They talk to a [`Store`], which is
/// implemented by [`postgres::PgStore`] in production and by
/// [`memory::MemoryStore`] in tests and database-less runs.
///
/// Method names are unique across the three traits so calls on a
/// `dyn Store` never need disambiguation.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::account::{Account, NewAccount};
use crate::models::comment::{Comment, CommentQuery, NewComment};
use crate::models::page::{Page, PageRequest};
use crate::models::task::{NewTask, Task, TaskQuery};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert collided with a unique constraint
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A row referenced a parent that does not exist
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();

            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
        }

        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with [`StoreError::UniqueViolation`] if the email is taken
    async fn insert_account(&self, data: NewAccount) -> StoreResult<Account>;

    async fn account_by_id(&self, id: i64) -> StoreResult<Option<Account>>;

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    async fn account_exists(&self, email: &str) -> StoreResult<bool>;

    /// Every account, ordered by ID
    async fn all_accounts(&self) -> StoreResult<Vec<Account>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, data: NewTask) -> StoreResult<Task>;

    async fn task_by_id(&self, id: i64) -> StoreResult<Option<Task>>;

    /// Persists the mutable fields of `task`; `None` if it was deleted meanwhile
    async fn save_task(&self, task: &Task) -> StoreResult<Option<Task>>;

    /// Removes the task and its comments; `false` if there was nothing to remove
    async fn delete_task(&self, id: i64) -> StoreResult<bool>;

    async fn task_page(&self, query: TaskQuery, request: PageRequest) -> StoreResult<Page<Task>>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Fails with [`StoreError::ForeignKeyViolation`] if the task is gone
    async fn insert_comment(&self, data: NewComment) -> StoreResult<Comment>;

    async fn comment_by_id(&self, id: i64) -> StoreResult<Option<Comment>>;

    async fn delete_comment(&self, id: i64) -> StoreResult<bool>;

    async fn comment_page(
        &self,
        query: CommentQuery,
        request: PageRequest,
    ) -> StoreResult<Page<Comment>>;
}

/// Everything the services need from persistence
#[async_trait]
pub trait Store: AccountStore + TaskStore + CommentStore {
    /// Checks that the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for health reports
    fn backend(&self) -> &'static str;
}
