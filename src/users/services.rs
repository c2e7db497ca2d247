use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    auth::password::PasswordHasher,
    error::{AppError, AppResult},
    users::{
        dto::{NewUser, UserUpdate, DEFAULT_PAGE, DEFAULT_PAGE_SIZE},
        repo::UserRepository,
        repo_types::{NewUserRecord, User, UserChangeset, UserCredentials, UserPage},
    },
};

/// User lifecycle over the storage and hashing collaborators.
#[derive(Clone)]
pub struct UsersService {
    repo: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UsersService {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    /// Lookup-then-insert; two concurrent creates with one email can both pass the check.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        if self.repo.find_by_email(&new_user.email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::Conflict(new_user.email));
        }

        let password_hash = self.hasher.hash(&new_user.password).await?;
        let user = self
            .repo
            .insert(NewUserRecord {
                email: new_user.email,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self, page: Option<u32>, page_size: Option<u32>) -> AppResult<UserPage> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let limit = i64::from(page_size);
        let offset = i64::from(page - 1) * limit;

        let (data, total) = self.repo.find_and_count(limit, offset).await?;
        Ok(UserPage { data, total })
    }

    pub async fn find_one(&self, id: i64) -> AppResult<User> {
        self.existing(id).await
    }

    /// Only read path exposing the password hash.
    pub async fn find_one_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        Ok(self.repo.find_credentials_by_email(email).await?)
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: UserUpdate) -> AppResult<User> {
        self.existing(id).await?;

        let password_hash = match update.password {
            Some(plain) => Some(self.hasher.hash(&plain).await?),
            None => None,
        };
        let changes = UserChangeset {
            first_name: update.first_name,
            last_name: update.last_name,
            password_hash,
        };
        self.repo.update(id, changes).await?;

        info!(user_id = id, "user updated");
        self.existing(id).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> AppResult<()> {
        self.existing(id).await?;
        self.repo.delete(id).await?;
        info!(user_id = id, "user removed");
        Ok(())
    }

    async fn existing(&self, id: i64) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }
}
