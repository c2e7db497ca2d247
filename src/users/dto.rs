use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validated input of `UsersService::create`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Validated input of `UsersService::update`. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /users`, also the shape of a seed file entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Request body for `PATCH /users/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Query string for `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must contain at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn non_empty(value: String, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} should not be empty")));
    }
    Ok(trimmed.to_string())
}

impl CreateUserRequest {
    pub fn validate(self) -> AppResult<NewUser> {
        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest("email must be an email".into()));
        }
        let first_name = non_empty(self.first_name, "firstName")?;
        let last_name = non_empty(self.last_name, "lastName")?;
        check_password(&self.password)?;
        Ok(NewUser {
            email,
            first_name,
            last_name,
            password: self.password,
        })
    }
}

impl UpdateUserRequest {
    pub fn validate(self) -> AppResult<UserUpdate> {
        let first_name = self
            .first_name
            .map(|v| non_empty(v, "firstName"))
            .transpose()?;
        let last_name = self
            .last_name
            .map(|v| non_empty(v, "lastName"))
            .transpose()?;
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        Ok(UserUpdate {
            first_name,
            last_name,
            password: self.password,
        })
    }
}

impl Pagination {
    /// Returns `(page, page_size)` with defaults applied.
    pub fn validate(&self) -> AppResult<(u32, u32)> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 1 {
            return Err(AppError::BadRequest("page must not be less than 1".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::BadRequest(format!(
                "pageSize must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok((page, page_size))
    }
}
