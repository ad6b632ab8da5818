//! User service - validation, password hashing and persistence orchestration.
//!
//! A mutating request moves through validate -> encrypt -> persist. A failure
//! before the persist step never reaches storage.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::config::VALIDATION_ORDER;
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;
use crate::types::PageRequest;

/// Check declared field constraints.
///
/// Reports the first failing field in `VALIDATION_ORDER`, formatted as
/// `field: message` (or the constraint code when no message is set).
pub fn validate(user: &NewUser) -> AppResult<()> {
    let errors = match user.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let field_errors = errors.field_errors();
    for field in VALIDATION_ORDER {
        if let Some(first) = field_errors.get(*field).and_then(|errs| errs.first()) {
            let detail = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            return Err(AppError::validation(format!("{}: {}", field, detail)));
        }
    }

    Err(AppError::validation(errors.to_string()))
}

/// Hash a plaintext password with a fresh random salt.
pub fn encrypt(plain_text: &str) -> AppResult<Password> {
    Password::hash(plain_text)
}

/// User service trait for dependency injection.
///
/// Reads exclude soft-deleted users and report absence as `Ok(None)`.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    /// Replace username and password of an active user
    async fn update_user(&self, id: i64, user: NewUser) -> AppResult<User>;

    /// Soft delete user (sets deleted_at timestamp)
    async fn delete_user(&self, id: i64) -> AppResult<()>;

    async fn get_user(&self, id: i64) -> AppResult<Option<User>>;

    async fn get_user_by_name(&self, username: &str) -> AppResult<Option<User>>;

    /// One page of users plus the total count matching `filter`.
    ///
    /// `page` is 1-indexed; values below 1 are treated as 1.
    async fn list_users(&self, filter: Option<String>, page: i64) -> AppResult<(Vec<User>, u64)>;
}

/// Concrete implementation of UserService over a repository.
pub struct UserManager<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> UserManager<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserRepository> UserService for UserManager<R> {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        validate(&user)?;
        let password = encrypt(&user.password)?;

        let created = self
            .repo
            .create(user.username, password.into_string())
            .await?;
        tracing::info!(user_id = created.id, username = %created.username, "User created");

        Ok(created)
    }

    async fn update_user(&self, id: i64, user: NewUser) -> AppResult<User> {
        validate(&user)?;
        let password = encrypt(&user.password)?;

        let updated = self
            .repo
            .update(id, user.username, password.into_string())
            .await?;
        tracing::info!(user_id = id, "User updated");

        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn get_user_by_name(&self, username: &str) -> AppResult<Option<User>> {
        self.repo.find_by_username(username).await
    }

    async fn list_users(&self, filter: Option<String>, page: i64) -> AppResult<(Vec<User>, u64)> {
        let page = PageRequest::new(page);
        self.repo.list(filter, page.offset(), page.limit()).await
    }
}
