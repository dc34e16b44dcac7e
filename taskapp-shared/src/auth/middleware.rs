/// Caller extraction for Axum
///
/// Reads the `Authorization: Bearer <token>` header, validates the JWT and
/// produces the [`Caller`] that every service operation receives explicitly.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use taskapp_shared::auth::middleware::Caller;
///
/// async fn handler(Extension(caller): Extension<Caller>) -> String {
///     format!("Hello, {}!", caller.email)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{Claims, JwtError, TokenIssuer};

/// The account identified by the bearer token of the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Account email taken from the token subject
    pub email: String,
}

impl Caller {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self { email: claims.sub }
    }

    /// Whether this caller is the account with the given email
    pub fn is(&self, email: &str) -> bool {
        self.email == email
    }
}

/// Error type for caller extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

/// Extracts the raw bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    Ok(token)
}

/// Validates the bearer token in `headers` and returns the caller it names
pub fn authenticate(headers: &HeaderMap, issuer: &TokenIssuer) -> Result<Caller, AuthError> {
    let token = bearer_token(headers)?;
    let claims = issuer.verify(token)?;

    Ok(Caller::from_claims(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret-key-at-least-32-bytes-long", Duration::hours(1))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let issuer = issuer();
        let token = issuer.issue("alice@example.com").unwrap();

        let caller = authenticate(&headers_with(&format!("Bearer {}", token)), &issuer).unwrap();
        assert_eq!(caller, Caller::new("alice@example.com"));
        assert!(caller.is("alice@example.com"));
        assert!(!caller.is("bob@example.com"));
    }

    #[test]
    fn test_missing_header() {
        let result = authenticate(&HeaderMap::new(), &issuer());
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_non_bearer_scheme() {
        let result = authenticate(&headers_with("Basic dXNlcjpwYXNz"), &issuer());
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));

        let result = authenticate(&headers_with("Bearer "), &issuer());
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_token_from_other_secret() {
        let other = TokenIssuer::new("another-secret-key-also-32-bytes-long", Duration::hours(1));
        let token = other.issue("alice@example.com").unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {}", token)), &issuer());
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_message() {
        let issuer = TokenIssuer::new("test-secret-key-at-least-32-bytes-long", Duration::seconds(-60));
        let token = issuer.issue("alice@example.com").unwrap();

        match authenticate(&headers_with(&format!("Bearer {}", token)), &issuer) {
            Err(AuthError::InvalidToken(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
