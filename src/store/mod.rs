//! Persistence for users and tasks.
//!
//! Handlers talk to a [`Store`] trait object; [`PgStore`] backs production deployments and
//! [`MemoryStore`] serves local runs without a database and the integration tests.
//! Ownership of tasks is not a store concern: callers compare `Task::user_id` themselves.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskQuery, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, AppError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new account.
    ///
    /// Fails with `AppError::BadRequest` when the username or email is already taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Looks up by normalized (lowercased) email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Tasks owned by `owner` that match `query`, newest first.
    async fn list_tasks(&self, owner: Uuid, query: &TaskQuery) -> StoreResult<Vec<Task>>;

    async fn insert_task(&self, task: &Task) -> StoreResult<()>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Persists every mutable field of `task`. `AppError::NotFound` if it no longer exists.
    async fn update_task(&self, task: &Task) -> StoreResult<()>;

    /// Returns whether a row was removed.
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;
}
