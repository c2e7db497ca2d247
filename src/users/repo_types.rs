use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record as returned by every read path. Carries no password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Login view of a user, the only one that exposes the stored hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub email: String,
    pub password_hash: String, // argon2 PHC string
}

/// Row to insert. Storage assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Columns to overwrite on update. `None` leaves the column as stored.
#[derive(Debug, Clone, Default)]
pub struct UserChangeset {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
}

/// One page of users plus the size of the whole table.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub data: Vec<User>,
    pub total: i64,
}
