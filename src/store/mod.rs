//! Document store contracts consumed by the services.
//!
//! Each collection gets its own trait so services only see the queries they
//! need. `save` is insert-or-replace keyed by `_id`.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Task, TaskType, Team, User};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>>;
    async fn exists_by_id(&self, id: ObjectId) -> StoreResult<bool>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn save(&self, user: &User) -> StoreResult<()>;
    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Team>>;
    async fn exists_by_id(&self, id: ObjectId) -> StoreResult<bool>;
    async fn find_by_owner_id(&self, owner_id: ObjectId) -> StoreResult<Vec<Team>>;
    async fn exists_by_owner_id(&self, owner_id: ObjectId) -> StoreResult<bool>;
    async fn find_by_member_id(&self, user_id: ObjectId) -> StoreResult<Vec<Team>>;
    async fn save(&self, team: &Team) -> StoreResult<()>;
    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Task>>;
    async fn exists_by_id_and_type(&self, id: ObjectId, task_type: TaskType) -> StoreResult<bool>;
    async fn find_by_assigned_user_and_type(
        &self,
        user_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<Vec<Task>>;
    async fn find_by_team_id_and_type(
        &self,
        team_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<Vec<Task>>;
    async fn save(&self, task: &Task) -> StoreResult<()>;
    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<()>;
    async fn delete_by_id_and_team_id_and_type(
        &self,
        id: ObjectId,
        team_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<()>;
    async fn delete_by_team_id(&self, team_id: ObjectId) -> StoreResult<()>;
    async fn delete_by_assigned_user_and_type(
        &self,
        user_id: ObjectId,
        task_type: TaskType,
    ) -> StoreResult<()>;
}

/// The three collections handed to the services.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub teams: Arc<dyn TeamStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl Stores {
    /// Uses one backend for all three collections.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + TeamStore + TaskStore + 'static,
    {
        Self {
            users: store.clone(),
            teams: store.clone(),
            tasks: store,
        }
    }
}
