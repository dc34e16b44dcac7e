/// Database models for TaskApp
///
/// This module contains the persisted entities, their enums, and the SQL
/// used by the PostgreSQL store.
///
/// # Models
///
/// - `account`: User accounts and the public `AccountInfo` projection
/// - `task`: Tasks with status/priority enums and author/assignee references
/// - `comment`: Comments attached to tasks
/// - `page`: Pagination request and result types
///
/// # Example
///
/// ```no_run
/// use taskapp_shared::models::account::{Account, NewAccount};
/// use taskapp_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let account = Account::create(&pool, NewAccount::user(
///     "Alice",
///     "alice@example.com",
///     "$argon2id$...",
/// )).await?;
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod comment;
pub mod page;
pub mod task;
