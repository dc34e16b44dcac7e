/// Business rules
///
/// Every operation that acts on behalf of a user takes the authenticated
/// [`Caller`] explicitly. Ownership checks compare the caller's account with
/// the author stored on the task or comment.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::Duration;
/// use taskapp_shared::auth::jwt::TokenIssuer;
/// use taskapp_shared::auth::middleware::Caller;
/// use taskapp_shared::services::Services;
/// use taskapp_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let issuer = TokenIssuer::new("a-secret-key-that-is-at-least-32-bytes", Duration::hours(1));
/// let services = Services::new(Arc::new(MemoryStore::new()), issuer);
///
/// services.auth.signup("Alice", "alice@example.com", "secret1").await?;
/// let task = services.tasks.create("T", "D", &Caller::new("alice@example.com")).await?;
/// assert_eq!(task.title, "T");
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod auth;
pub mod comment;
pub mod task;

use std::sync::Arc;

pub use account::AccountService;
pub use auth::AuthService;
pub use comment::CommentService;
pub use task::{TaskFilter, TaskService};

use crate::auth::jwt::TokenIssuer;
use crate::auth::middleware::Caller;
use crate::error::ServiceResult;
use crate::models::account::Account;
use crate::store::Store;

/// All services, sharing one store
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub accounts: AccountService,
    pub tasks: TaskService,
    pub comments: CommentService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, issuer: TokenIssuer) -> Self {
        Self {
            auth: AuthService::new(store.clone(), issuer),
            accounts: AccountService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            comments: CommentService::new(store),
        }
    }
}

/// Account behind the caller's token, if it still exists
async fn caller_account(store: &dyn Store, caller: &Caller) -> ServiceResult<Option<Account>> {
    Ok(store.account_by_email(&caller.email).await?)
}
