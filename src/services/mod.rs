//! Cross-entity services for users, teams and tasks.
//!
//! The three services call each other: user deletion cascades into teams and
//! tasks, team deletion cascades into tasks, and task assignment checks team
//! membership. They are built in dependency order and the back references are
//! bound afterwards through [`Deferred`] slots.

pub mod task_service;
pub mod team_service;
pub mod user_service;

use std::sync::{Arc, OnceLock, Weak};

use log::warn;

use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::password::PasswordHasher;
use crate::store::Stores;

pub use task_service::TaskService;
pub use team_service::TeamService;
pub use user_service::UserService;

/// A reference to a sibling service that is bound after construction.
///
/// Holds a weak pointer so the wiring does not form an `Arc` cycle; the
/// strong references live in [`Services`].
pub struct Deferred<T> {
    name: &'static str,
    slot: OnceLock<Weak<T>>,
}

impl<T> Deferred<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: OnceLock::new(),
        }
    }

    pub fn bind(&self, target: &Arc<T>) {
        if self.slot.set(Arc::downgrade(target)).is_err() {
            warn!("{} is already bound, ignoring rebind", self.name);
        }
    }

    pub fn get(&self) -> ServiceResult<Arc<T>> {
        self.slot
            .get()
            .and_then(Weak::upgrade)
            .ok_or(ServiceError::Unwired(self.name))
    }
}

/// The wired service graph.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<UserService>,
    pub teams: Arc<TeamService>,
    pub tasks: Arc<TaskService>,
}

impl Services {
    pub fn wire(stores: Stores, clock: Arc<dyn Clock>, hasher: PasswordHasher) -> Self {
        let users = Arc::new(UserService::new(stores.users, clock.clone(), hasher));
        let tasks = Arc::new(TaskService::new(stores.tasks, users.clone(), clock.clone()));
        let teams = Arc::new(TeamService::new(
            stores.teams,
            users.clone(),
            tasks.clone(),
            clock,
        ));

        users.bind(&teams, &tasks);
        tasks.bind(&teams);

        Services { users, teams, tasks }
    }
}
