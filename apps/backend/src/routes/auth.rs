//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Auth middleware - extracts user token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(&request)?;

    let user = state
        .db
        .get_user_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid user token".to_string()))?;

    state.db.update_last_seen(user.id).await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        token,
    });

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request<Body>) -> Result<String> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(header: Option<&str>) -> Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/api/decks");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extracted() {
        let token = bearer_token(&request_with(Some("Bearer abc-123"))).unwrap();
        assert_eq!(token, "abc-123");
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = bearer_token(&request_with(None)).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        assert!(bearer_token(&request_with(Some("Basic dXNlcjpwYXNz"))).is_err());
        assert!(bearer_token(&request_with(Some("Bearer "))).is_err());
    }
}
