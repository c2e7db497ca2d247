//! In-memory `UserRepository` used by unit and router tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::users::repo::UserRepository;
use crate::users::repo_types::{NewUserRecord, User, UserChangeset, UserCredentials};

#[derive(Debug, Clone)]
struct Row {
    user: User,
    password_hash: String,
}

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: Mutex<Vec<Row>>,
    next_id: Mutex<i64>,
    failing_email: Mutex<Option<String>>,
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert for `email` fail with a storage error.
    pub fn fail_inserts_for(&self, email: &str) {
        *self.failing_email.lock().unwrap() = Some(email.to_string());
    }

    /// Stored hash for `id`, for assertions.
    pub fn password_hash_of(&self, id: i64) -> Option<String> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.user.id == id)
            .map(|r| r.password_hash.clone())
    }

    pub fn writes(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.user.id == id).map(|r| r.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.user.email == email)
            .map(|r| r.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<UserCredentials>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.user.email == email)
            .map(|r| UserCredentials {
                id: r.user.id,
                email: r.user.email.clone(),
                password_hash: r.password_hash.clone(),
            }))
    }

    async fn find_and_count(&self, limit: i64, offset: i64) -> anyhow::Result<(Vec<User>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut users: Vec<User> = rows.iter().map(|r| r.user.clone()).collect();
        users.sort_by_key(|u| u.id);
        let total = users.len() as i64;
        let page = users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.failing_email.lock().unwrap().as_deref() == Some(record.email.as_str()) {
            anyhow::bail!("insert user: connection reset");
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let now = OffsetDateTime::now_utc();
        let user = User {
            id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(Row {
            user: user.clone(),
            password_hash: record.password_hash,
        });
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChangeset) -> anyhow::Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.user.id == id) {
            if let Some(first_name) = changes.first_name {
                row.user.first_name = first_name;
            }
            if let Some(last_name) = changes.last_name {
                row.user.last_name = last_name;
            }
            if let Some(hash) = changes.password_hash {
                row.password_hash = hash;
            }
            row.user.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().retain(|r| r.user.id != id);
        Ok(())
    }
}
