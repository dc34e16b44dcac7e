/// Account model and database operations
///
/// Accounts are created at signup and never modified through the API. The
/// email is the login identifier and the identity carried by bearer tokens.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('USER', 'ADMIN');
///
/// CREATE TABLE accounts (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role account_role NOT NULL DEFAULT 'USER',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Account role
///
/// Only `User` is ever assigned; `Admin` exists in the schema for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// Persisted account
///
/// Deliberately not `Serialize`: the password hash and role must never reach
/// a response body. Use [`AccountInfo`] for anything external.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address, unique across accounts
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// External read view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub role: Role,
}

impl NewAccount {
    /// Builds a regular `USER` account
    pub fn user(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::User,
        }
    }
}

impl Account {
    /// Creates a new account
    ///
    /// # Errors
    ///
    /// Fails with a database error carrying the `accounts_email_key`
    /// constraint when the email is already registered.
    pub async fn create(pool: &PgPool, data: NewAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Checks whether an account with this email exists
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists every account, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account {
            id: 13,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_account_is_user() {
        let account = NewAccount::user("Alice", "alice@example.com", "hash");
        assert_eq!(account.role, Role::User);
        assert_eq!(account.email, "alice@example.com");
    }

    #[test]
    fn test_account_info_projection() {
        let info = AccountInfo::from(&sample());

        assert_eq!(info.id, 13);
        assert_eq!(info.name, "Alice");
        assert_eq!(info.email, "alice@example.com");
    }

    #[test]
    fn test_account_info_json_has_no_secrets() {
        let json = serde_json::to_value(AccountInfo::from(sample())).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("role"));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }
}
