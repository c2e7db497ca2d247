use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Extracts and validates a bearer JWT, yielding the user ID.
pub struct AuthUser(pub i64);

impl AuthUser {
    /// Only the account owner may act on `id`.
    pub fn ensure_owner(&self, id: i64) -> Result<(), AppError> {
        if self.0 != id {
            warn!(user_id = self.0, target_id = id, "acting on another account");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            AppError::Unauthorized
        })?;
        let user_id = claims.user_id().map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::test_keys;
    use axum::http::Request;

    async fn extract(keys: &JwtKeys, header: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header("authorization", h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, keys).await
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let keys = test_keys("s", "i", "a");
        let token = keys.sign(5).unwrap();
        let user = extract(&keys, Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.0, 5);
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_header() {
        let keys = test_keys("s", "i", "a");
        assert!(matches!(extract(&keys, None).await, Err(AppError::Unauthorized)));
        assert!(matches!(
            extract(&keys, Some("Basic abc")).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            extract(&keys, Some("Bearer nope")).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn ensure_owner_forbids_other_ids() {
        assert!(AuthUser(1).ensure_owner(1).is_ok());
        assert!(matches!(AuthUser(1).ensure_owner(2), Err(AppError::Forbidden)));
    }
}
