/// Signup and signin
use std::sync::Arc;

use tracing::info;

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::account::NewAccount;
use crate::store::Store;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    /// Registers a `USER` account and returns a token for it
    ///
    /// # Errors
    ///
    /// [`ServiceError::Conflict`] if the email is already registered.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ServiceResult<String> {
        if self.store.account_exists(email).await? {
            return Err(ServiceError::Conflict("Username is already taken".to_string()));
        }

        let password_hash = hash_password(password)?;
        let account = self
            .store
            .insert_account(NewAccount::user(name, email, password_hash))
            .await
            .map_err(|e| match ServiceError::from(e) {
                // lost a race with a concurrent signup for the same email
                ServiceError::Conflict(_) => {
                    ServiceError::Conflict("Username is already taken".to_string())
                }
                other => other,
            })?;

        info!(account_id = account.id, "Account registered");

        Ok(self.issuer.issue(&account.email)?)
    }

    /// Checks credentials and returns a fresh token
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn signin(&self, email: &str, password: &str) -> ServiceResult<String> {
        let account = self
            .store
            .account_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &account.password_hash)? {
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        info!(account_id = account.id, "Account signed in");

        Ok(self.issuer.issue(&account.email)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::validate_token;
    use crate::error::ServiceError;
    use crate::models::account::Role;
    use crate::services::testing::{services, SECRET};
    use crate::store::AccountStore;

    #[tokio::test]
    async fn test_signup_issues_token_for_email() {
        let (services, store) = services();

        let token = services
            .auth
            .signup("Alice", "alice@example.com", "secret1")
            .await
            .unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "alice@example.com");

        let account = store.account_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(account.role, Role::User);
        assert_ne!(account.password_hash, "secret1");
        assert!(account.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let (services, store) = services();
        services.auth.signup("Alice", "alice@example.com", "secret1").await.unwrap();

        let err = services
            .auth
            .signup("Alice 2", "alice@example.com", "secret2")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.all_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signin() {
        let (services, _) = services();
        services.auth.signup("Alice", "alice@example.com", "secret1").await.unwrap();

        let token = services.auth.signin("alice@example.com", "secret1").await.unwrap();
        assert_eq!(validate_token(&token, SECRET).unwrap().sub, "alice@example.com");
    }

    #[tokio::test]
    async fn test_signin_rejects_bad_credentials() {
        let (services, _) = services();
        services.auth.signup("Alice", "alice@example.com", "secret1").await.unwrap();

        for (email, password) in [
            ("alice@example.com", "wrong-password"),
            ("nobody@example.com", "secret1"),
        ] {
            match services.auth.signin(email, password).await {
                Err(ServiceError::Unauthenticated(msg)) => {
                    assert_eq!(msg, "Invalid email or password.")
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }
}
