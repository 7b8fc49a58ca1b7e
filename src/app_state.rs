use std::sync::Arc;

use crate::services::{Services, TaskService, TeamService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub teams: Arc<TeamService>,
    pub tasks: Arc<TaskService>,
}

impl From<Services> for AppState {
    fn from(services: Services) -> Self {
        AppState {
            users: services.users,
            teams: services.teams,
            tasks: services.tasks,
        }
    }
}
