/// Authentication endpoints
///
/// - `POST /api/v1/auth/signup` - Register and receive a token
/// - `POST /api/v1/auth/signin` - Exchange credentials for a token

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{app::AppState, error::ApiResult};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 20, message = "Password must be 6 to 20 characters"))]
    pub password: String,
}

/// Signin request
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token for subsequent requests
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Registers a new account
///
/// ```text
/// POST /api/v1/auth/signup
///
/// { "name": "Alice", "email": "alice@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let token = state
        .services
        .auth
        .signup(req.name.trim(), &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Signs in with email and password
///
/// # Errors
///
/// - `403 Forbidden`: Unknown email or wrong password
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload?;

    let token = state.services.auth.signin(&req.email, &req.password).await?;

    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_signup_validation() {
        assert!(request("Alice", "alice@example.com", "secret1").validate().is_ok());

        assert!(request("", "alice@example.com", "secret1").validate().is_err());
        assert!(request("Alice", "not-an-email", "secret1").validate().is_err());
        assert!(request("Alice", "alice@example.com", "short").validate().is_err());
        assert!(request("Alice", "alice@example.com", &"x".repeat(21)).validate().is_err());
    }
}
