use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::AccessToken, jwt::JwtKeys, password::PasswordHasher},
    error::{AppError, AppResult},
    users::services::UsersService,
};

/// Credential check and token issuance. Keeps no session state.
#[derive(Clone)]
pub struct AuthService {
    users: UsersService,
    hasher: PasswordHasher,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: UsersService, hasher: PasswordHasher, keys: JwtKeys) -> Self {
        Self { users, hasher, keys }
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<AccessToken> {
        let Some(creds) = self.users.find_one_by_email(email).await? else {
            warn!("login unknown email");
            return Err(AppError::BadRequest(format!("Email {email} not registered")));
        };

        if !self.hasher.verify(password, &creds.password_hash).await? {
            warn!(user_id = creds.id, email = %creds.email, "login invalid password");
            return Err(AppError::Unauthorized);
        }

        let access_token = self.keys.sign(creds.id)?;
        info!(user_id = creds.id, "user logged in");
        Ok(AccessToken { access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{jwt::test_keys, password::test_hasher},
        users::services::tests::{new_user, service},
    };

    fn keys() -> JwtKeys {
        test_keys("secret", "iss", "aud")
    }

    async fn auth_with_user() -> (AuthService, i64) {
        let (users, _) = service();
        let user = users.create(new_user("email@test.com")).await.unwrap();
        let auth = AuthService::new(users, test_hasher(), keys());
        (auth, user.id)
    }

    #[tokio::test]
    async fn correct_credentials_return_token_for_user() {
        let (auth, id) = auth_with_user().await;
        let token = auth.sign_in("email@test.com", "password1").await.unwrap();
        let claims = keys().verify(&token.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), id);
    }

    #[tokio::test]
    async fn unknown_email_is_bad_request_naming_it() {
        let (auth, _) = auth_with_user().await;
        let err = auth.sign_in("nobody@test.com", "password1").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Email nobody@test.com not registered");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (auth, _) = auth_with_user().await;
        let err = auth.sign_in("email@test.com", "wrong-password").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn repeated_sign_ins_verify_to_same_subject() {
        let (auth, id) = auth_with_user().await;
        let a = auth.sign_in("email@test.com", "password1").await.unwrap();
        let b = auth.sign_in("email@test.com", "password1").await.unwrap();
        assert_ne!(a.access_token, b.access_token);
        assert_eq!(keys().verify(&a.access_token).unwrap().user_id().unwrap(), id);
        assert_eq!(keys().verify(&b.access_token).unwrap().user_id().unwrap(), id);
    }
}
