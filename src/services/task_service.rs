use std::sync::Arc;

use log::{info, warn};
use mongodb::bson::oid::ObjectId;

use super::{Deferred, TeamService, UserService};
use crate::clock::Clock;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Task, TaskFields, TaskStatus, TaskType};
use crate::store::TaskStore;

/// Owns personal and team tasks and their assignment lists.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    users: Arc<UserService>,
    teams: Deferred<TeamService>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, users: Arc<UserService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            users,
            teams: Deferred::new("TeamService"),
            clock,
        }
    }

    pub fn bind(&self, teams: &Arc<TeamService>) {
        self.teams.bind(teams);
    }

    pub async fn get_tasks_by_user_id(&self, user_id: ObjectId) -> ServiceResult<Vec<Task>> {
        self.users.assert_exists(user_id).await?;
        let tasks = self
            .tasks
            .find_by_assigned_user_and_type(user_id, TaskType::Personal)
            .await?;
        info!("Found {} personal tasks for user {}", tasks.len(), user_id);
        Ok(tasks)
    }

    pub async fn get_tasks_by_team_id(&self, team_id: ObjectId) -> ServiceResult<Vec<Task>> {
        self.teams.get()?.assert_exists(team_id).await?;
        let tasks = self.tasks.find_by_team_id_and_type(team_id, TaskType::Team).await?;
        info!("Found {} team tasks for team {}", tasks.len(), team_id);
        Ok(tasks)
    }

    pub async fn create_user_task(&self, user_id: ObjectId, fields: TaskFields) -> ServiceResult<Task> {
        self.users.assert_exists(user_id).await?;
        check_range(&fields)?;

        let task = self.new_task(fields, TaskType::Personal, vec![user_id], None);
        self.tasks.save(&task).await?;
        info!("Created personal task {} for user {}", task.id, user_id);
        Ok(task)
    }

    pub async fn create_team_task(&self, team_id: ObjectId, fields: TaskFields) -> ServiceResult<Task> {
        self.teams.get()?.assert_exists(team_id).await?;
        check_range(&fields)?;

        let task = self.new_task(fields, TaskType::Team, Vec::new(), Some(team_id));
        self.tasks.save(&task).await?;
        info!("Created team task {} for team {}", task.id, team_id);
        Ok(task)
    }

    /// Replaces the task content. Type, team and assignees are kept.
    pub async fn update(&self, id: ObjectId, fields: TaskFields) -> ServiceResult<Task> {
        let existing = self.get_task(id).await?;
        check_range(&fields)?;

        let updated = Task {
            id,
            title: fields.title,
            description: fields.description,
            task_type: existing.task_type,
            priority: fields.priority,
            status: fields.status.unwrap_or_default(),
            assigned_users_id: existing.assigned_users_id,
            team_id: existing.team_id,
            start: fields.start,
            end: fields.end,
            created_at: existing.created_at,
            modified_at: self.clock.now(),
        };
        self.tasks.save(&updated).await?;
        info!("Updated task {}", id);
        Ok(updated)
    }

    /// Assigns a team member to a TEAM task. Assigning twice changes nothing.
    pub async fn assign_user_by_id(&self, task_id: ObjectId, user_id: ObjectId) -> ServiceResult<()> {
        self.users.assert_exists(user_id).await?;
        let mut task = self.get_task(task_id).await?;

        let team_id = match (task.task_type, task.team_id) {
            (TaskType::Team, Some(team_id)) => team_id,
            _ => {
                warn!("Task {} is not a team task, cannot assign user {}", task_id, user_id);
                return Err(ServiceError::task_not_found(task_id));
            }
        };
        self.teams.get()?.assert_is_member(team_id, user_id).await?;

        if task.assigned_users_id.contains(&user_id) {
            warn!("User {} already assigned to task {}", user_id, task_id);
            return Ok(());
        }

        task.assigned_users_id.push(user_id);
        task.modified_at = self.clock.now();
        self.tasks.save(&task).await?;
        info!("Assigned user {} to task {}", user_id, task_id);
        Ok(())
    }

    pub async fn unassign_user_by_id(&self, user_id: ObjectId) -> ServiceResult<()> {
        let assigned = self
            .tasks
            .find_by_assigned_user_and_type(user_id, TaskType::Team)
            .await?;

        for mut task in assigned {
            task.assigned_users_id.retain(|assignee| *assignee != user_id);
            task.modified_at = self.clock.now();
            self.tasks.save(&task).await?;
            info!("Unassigned user {} from task {}", user_id, task.id);
        }
        Ok(())
    }

    pub async fn delete_personal_task(&self, id: ObjectId) -> ServiceResult<()> {
        self.assert_personal_task_exists_by_id(id).await?;
        self.tasks.delete_by_id(id).await?;
        info!("Deleted personal task {}", id);
        Ok(())
    }

    pub async fn delete_team_task(&self, team_id: ObjectId, task_id: ObjectId) -> ServiceResult<()> {
        self.assert_team_task_exists_by_id(task_id).await?;
        let teams = self.teams.get()?;
        teams.assert_exists(team_id).await?;
        teams.touch_modified_at(team_id).await?;
        self.tasks
            .delete_by_id_and_team_id_and_type(task_id, team_id, TaskType::Team)
            .await?;
        info!("Deleted team task {} of team {}", task_id, team_id);
        Ok(())
    }

    pub async fn delete_team_tasks_by_team_id(&self, team_id: ObjectId) -> ServiceResult<()> {
        self.tasks.delete_by_team_id(team_id).await?;
        info!("Deleted all tasks of team {}", team_id);
        Ok(())
    }

    pub async fn delete_user_tasks_by_user_id(&self, user_id: ObjectId) -> ServiceResult<()> {
        self.tasks
            .delete_by_assigned_user_and_type(user_id, TaskType::Personal)
            .await?;
        info!("Deleted personal tasks of user {}", user_id);
        Ok(())
    }

    pub async fn assert_personal_task_exists_by_id(&self, id: ObjectId) -> ServiceResult<()> {
        self.assert_task_of_type(id, TaskType::Personal).await
    }

    pub async fn assert_team_task_exists_by_id(&self, id: ObjectId) -> ServiceResult<()> {
        self.assert_task_of_type(id, TaskType::Team).await
    }

    async fn assert_task_of_type(&self, id: ObjectId, task_type: TaskType) -> ServiceResult<()> {
        if !self.tasks.exists_by_id_and_type(id, task_type).await? {
            warn!("{} task {} does not exist", task_type.as_str(), id);
            return Err(ServiceError::task_not_found(id));
        }
        Ok(())
    }

    async fn get_task(&self, id: ObjectId) -> ServiceResult<Task> {
        self.tasks.find_by_id(id).await?.ok_or_else(|| {
            warn!("Task {} not found", id);
            ServiceError::task_not_found(id)
        })
    }

    fn new_task(
        &self,
        fields: TaskFields,
        task_type: TaskType,
        assigned_users_id: Vec<ObjectId>,
        team_id: Option<ObjectId>,
    ) -> Task {
        let now = self.clock.now();
        Task {
            id: ObjectId::new(),
            title: fields.title,
            description: fields.description,
            task_type,
            priority: fields.priority,
            status: TaskStatus::New,
            assigned_users_id,
            team_id,
            start: fields.start,
            end: fields.end,
            created_at: now,
            modified_at: now,
        }
    }
}

fn check_range(fields: &TaskFields) -> ServiceResult<()> {
    if !fields.has_valid_range() {
        return Err(ServiceError::InvalidInput(
            "End date must be after or equal to start date".to_string(),
        ));
    }
    Ok(())
}
