/// JWT token generation and validation module
///
/// Tokens are signed using HS256 (HMAC-SHA256). The subject claim carries the
/// account email, which every service uses as the caller identity.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configurable (default 24 hours)
/// - **Validation**: Signature, expiration, not-before and issuer checks
///
/// # Example
///
/// ```
/// use taskapp_shared::auth::jwt::TokenIssuer;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let issuer = TokenIssuer::new("your-secret-key", Duration::hours(24));
///
/// let token = issuer.issue("user@example.com")?;
/// let claims = issuer.verify(&token)?;
/// assert_eq!(claims.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped on (and required from) every token
pub const ISSUER: &str = "taskapp";

/// Default token lifetime
pub fn default_expiration() -> Duration {
    Duration::hours(24)
}

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims structure
///
/// - `sub`: Subject (account email)
/// - `iss`: Issuer (always "taskapp")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account email
    pub sub: String,

    /// Issuer - always "taskapp"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for `email` with the default expiration
    pub fn new(email: impl Into<String>) -> Self {
        Self::with_expiration(email, default_expiration())
    }

    /// Creates claims with a custom expiration
    ///
    /// A negative duration produces an already-expired token, which is handy in tests.
    pub fn with_expiration(email: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: email.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before time and issuer.
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past `exp`
/// - `JwtError::InvalidIssuer` if `iss` is not "taskapp"
/// - `JwtError::ValidationError` for any other failure (bad signature, garbage input)
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues and verifies tokens with a fixed secret and lifetime
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expires_in: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            secret: secret.into(),
            expires_in,
        }
    }

    /// Issues a signed token bound to `email`
    pub fn issue(&self, email: &str) -> Result<String, JwtError> {
        let claims = Claims::with_expiration(email, self.expires_in);
        create_token(&claims, &self.secret)
    }

    /// Verifies a token previously issued with the same secret
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        validate_token(token, &self.secret)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
