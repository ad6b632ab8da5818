//! User repository with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::db::Database;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Query methods exclude soft-deleted records unless named `*_with_deleted`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Duplicate usernames surface as a database error.
    async fn create(&self, username: String, password_hash: String) -> AppResult<User>;

    /// Replace username and password of an active user
    async fn update(&self, id: i64, username: String, password_hash: String) -> AppResult<User>;

    /// Soft delete user by ID (sets deleted_at timestamp)
    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by ID including soft-deleted
    async fn find_by_id_with_deleted(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// One page of active users, newest first, plus the total matching count.
    ///
    /// `filter` keeps users whose name contains it. An empty filter matches all.
    async fn list(
        &self,
        filter: Option<String>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<User>, u64)>;
}

/// SeaORM-backed `UserRepository`
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn active() -> Select<UserEntity> {
    UserEntity::find().filter(user::Column::DeletedAt.is_null())
}

async fn find_active<C: ConnectionTrait>(conn: &C, id: i64) -> AppResult<user::Model> {
    active()
        .filter(user::Column::Id.eq(id))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, username: String, password_hash: String) -> AppResult<User> {
        self.db
            .transaction(|txn| {
                Box::pin(async move {
                    let now = chrono::Utc::now();
                    let model = ActiveModel {
                        username: Set(username),
                        password: Set(password_hash),
                        created_at: Set(now),
                        updated_at: Set(now),
                        deleted_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(User::from(model))
                })
            })
            .await
    }

    async fn update(&self, id: i64, username: String, password_hash: String) -> AppResult<User> {
        self.db
            .transaction(|txn| {
                Box::pin(async move {
                    let mut active: ActiveModel = find_active(txn, id).await?.into();
                    active.username = Set(username);
                    active.password = Set(password_hash);
                    active.updated_at = Set(chrono::Utc::now());

                    let model = active.update(txn).await?;
                    Ok(User::from(model))
                })
            })
            .await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.db
            .transaction(|txn| {
                Box::pin(async move {
                    let mut active: ActiveModel = find_active(txn, id).await?.into();
                    let now = chrono::Utc::now();
                    active.deleted_at = Set(Some(now));
                    active.updated_at = Set(now);

                    active.update(txn).await?;
                    Ok(())
                })
            })
            .await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = active()
            .filter(user::Column::Id.eq(id))
            .one(self.db.connection()?)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_id_with_deleted(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.connection()?)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = active()
            .filter(user::Column::Username.eq(username))
            .one(self.db.connection()?)
            .await?;

        Ok(result.map(User::from))
    }

    async fn list(
        &self,
        filter: Option<String>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<User>, u64)> {
        let conn = self.db.connection()?;

        let mut query = active();
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            query = query.filter(user::Column::Username.contains(filter));
        }

        let total = query.clone().count(conn).await?;
        let models = query
            .order_by_desc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(conn)
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }
}
