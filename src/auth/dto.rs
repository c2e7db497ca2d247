use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    users::dto::normalize_email,
};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> AppResult<Self> {
        let email = normalize_email(&self.email);
        if email.is_empty() {
            return Err(AppError::BadRequest("email should not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("password should not be empty".into()));
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access_token: String,
}
