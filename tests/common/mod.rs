#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mongodb::bson::oid::ObjectId;
use task_manager::clock::ManualClock;
use task_manager::models::{NewUser, TaskFields, TaskPriority, Team, TeamFields, User};
use task_manager::password::PasswordHasher;
use task_manager::services::Services;
use task_manager::store::{MemoryStore, Stores};

pub struct TestApp {
    pub services: Services,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 15, 9, 0, 0).unwrap()
}

pub fn test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(MemoryStore::new());
    let services = Services::wire(
        Stores::shared(store.clone()),
        clock.clone(),
        PasswordHasher::new(4),
    );
    TestApp {
        services,
        clock,
        store,
    }
}

pub fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@x.com", username),
        password: password.to_string(),
        phone: None,
        firstname: None,
        lastname: None,
    }
}

pub fn task_fields(title: &str) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        description: format!("{} description", title),
        priority: TaskPriority::Medium,
        status: None,
        start: start_time(),
        end: start_time() + Duration::days(1),
    }
}

impl TestApp {
    pub async fn register(&self, username: &str) -> User {
        self.services
            .users
            .register(new_user(username, "secret"))
            .await
            .unwrap()
    }

    pub async fn create_team(&self, name: &str, owner: ObjectId) -> Team {
        self.services
            .teams
            .create(TeamFields {
                name: name.to_string(),
                owner_id: owner,
            })
            .await
            .unwrap()
            .team
    }
}
