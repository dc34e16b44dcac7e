/// Read-only account queries
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::account::AccountInfo;
use crate::store::Store;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Every account, ordered by ID
    pub async fn all(&self) -> ServiceResult<Vec<AccountInfo>> {
        let accounts = self.store.all_accounts().await?;
        Ok(accounts.into_iter().map(AccountInfo::from).collect())
    }

    /// Looks an account up by email
    ///
    /// A missing account is a client error, not a 404.
    pub async fn by_email(&self, email: &str) -> ServiceResult<AccountInfo> {
        self.store
            .account_by_email(email)
            .await?
            .map(AccountInfo::from)
            .ok_or_else(|| ServiceError::bad_request("Resource not found"))
    }
}
