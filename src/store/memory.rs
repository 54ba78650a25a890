//! Process-local store, used when no database is configured and by the test suite.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::error::AppError;
use crate::models::{Task, TaskQuery, User};

/// Thread-safe in-memory store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    tasks: HashMap<Uuid, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| AppError::DatabaseError(format!("memory store poisoned: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| AppError::DatabaseError(format!("memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.write()?;
        let taken = state
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if taken || state.users.contains_key(&user.id) {
            return Err(AppError::BadRequest("User already exists".into()));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_tasks(&self, owner: Uuid, query: &TaskQuery) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.is_owned_by(owner) && query.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.users.contains_key(&task.user_id) {
            return Err(AppError::BadRequest("Task owner does not exist".into()));
        }
        state.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.write()?;
        match state.tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Task not found".into())),
        }
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.write()?.tasks.remove(&id).is_some())
    }
}
