use std::sync::Arc;

use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use super::{Deferred, TaskService, TeamService};
use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewUser, User, UserFields};
use crate::password::PasswordHasher;
use crate::store::{StoreError, UserStore};

/// Owns the user lifecycle: registration, profile and password changes, and
/// deletion with cleanup of everything that references the user.
pub struct UserService {
    users: Arc<dyn UserStore>,
    teams: Deferred<TeamService>,
    tasks: Deferred<TaskService>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, clock: Arc<dyn Clock>, hasher: PasswordHasher) -> Self {
        Self {
            users,
            teams: Deferred::new("TeamService"),
            tasks: Deferred::new("TaskService"),
            clock,
            hasher,
        }
    }

    pub fn bind(&self, teams: &Arc<TeamService>, tasks: &Arc<TaskService>) {
        self.teams.bind(teams);
        self.tasks.bind(tasks);
    }

    pub async fn exists_by_id(&self, id: ObjectId) -> ServiceResult<bool> {
        Ok(self.users.exists_by_id(id).await?)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn get_by_id(&self, id: ObjectId) -> ServiceResult<User> {
        self.users.find_by_id(id).await?.ok_or_else(|| {
            warn!("User {} not found", id);
            ServiceError::user_not_found(id)
        })
    }

    /// Registers a new user with a hashed password.
    pub async fn register(&self, new_user: NewUser) -> ServiceResult<User> {
        let username = new_user.username;
        if self.users.find_by_username(&username).await?.is_some() {
            warn!("Registration failed: username '{}' already exists", username);
            return Err(username_taken(&username));
        }

        let now = self.clock.now();
        let user = User {
            id: ObjectId::new(),
            password: self.hasher.hash(&new_user.password)?,
            username,
            email: new_user.email,
            phone: new_user.phone,
            firstname: new_user.firstname,
            lastname: new_user.lastname,
            created_at: now,
            modified_at: now,
        };

        self.save_checked(&user).await?;
        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Replaces every profile field of the user. Password and creation time
    /// are kept.
    pub async fn update(&self, id: ObjectId, fields: UserFields) -> ServiceResult<User> {
        let existing = self.get_by_id(id).await?;

        if fields.username != existing.username {
            if let Some(other) = self.users.find_by_username(&fields.username).await? {
                if other.id != id {
                    warn!("Update of user {} rejected: username '{}' taken", id, fields.username);
                    return Err(username_taken(&fields.username));
                }
            }
        }

        let updated = User {
            id,
            username: fields.username,
            password: existing.password,
            email: fields.email,
            phone: fields.phone,
            firstname: fields.firstname,
            lastname: fields.lastname,
            created_at: existing.created_at,
            modified_at: self.clock.now(),
        };

        self.save_checked(&updated).await?;
        info!("Updated user {}", id);
        Ok(updated)
    }

    pub async fn update_password(
        &self,
        id: ObjectId,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let mut user = self.get_by_id(id).await?;

        if !self.hasher.verify(old_password, &user.password)? {
            warn!("Password update for user {} rejected: mismatch", id);
            return Err(ServiceError::PasswordMismatch);
        }

        user.password = self.hasher.hash(new_password)?;
        user.modified_at = self.clock.now();
        self.users.save(&user).await?;
        info!("Updated password for user {}", id);
        Ok(())
    }

    /// Deletes a user who owns no team, after deleting their personal tasks
    /// and removing them from team tasks and team memberships.
    pub async fn delete(&self, id: ObjectId) -> ServiceResult<()> {
        self.assert_exists(id).await?;

        let teams = self.teams.get()?;
        if teams.owns_any_team(id).await? {
            warn!("Deletion of user {} blocked: owns a team", id);
            return Err(ServiceError::DeletionNotAllowed(format!(
                "User with ID: {} cannot be deleted due to ownership of other resources",
                id
            )));
        }

        let tasks = self.tasks.get()?;
        tasks.delete_user_tasks_by_user_id(id).await?;
        tasks.unassign_user_by_id(id).await?;
        teams.remove_user_from_all_teams(id).await?;
        self.users.delete_by_id(id).await?;
        info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn assert_exists(&self, id: ObjectId) -> ServiceResult<()> {
        if !self.users.exists_by_id(id).await? {
            warn!("User {} does not exist", id);
            return Err(ServiceError::user_not_found(id));
        }
        Ok(())
    }

    async fn save_checked(&self, user: &User) -> ServiceResult<()> {
        match self.users.save(user).await {
            Err(StoreError::DuplicateKey(_)) => Err(username_taken(&user.username)),
            other => Ok(other?),
        }
    }
}

fn username_taken(username: &str) -> ServiceError {
    ServiceError::AlreadyExists(format!("User with username={} already exists", username))
}
