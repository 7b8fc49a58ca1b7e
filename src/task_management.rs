use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::api_error::{parse_id, ApiError};
use crate::app_state::AppState;
use crate::models::{Task, TaskFields, TaskPriority, TaskStatus, TaskType};
use crate::validation;

// ─── RESPONSES ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigned_users_id: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        TaskResponse {
            id: task.id.to_hex(),
            title: task.title,
            description: task.description,
            task_type: task.task_type,
            priority: task.priority,
            status: task.status,
            assigned_users_id: task.assigned_users_id.iter().map(|id| id.to_hex()).collect(),
            team_id: task.team_id.map(|id| id.to_hex()),
            start: task.start,
            end: task.end,
            created_at: task.created_at,
            modified_at: task.modified_at,
        }
    }
}

fn task_list(tasks: Vec<Task>) -> Vec<TaskResponse> {
    tasks.into_iter().map(TaskResponse::from).collect()
}

// ─── REQUEST PAYLOADS ──────────────────────────────────────────────────────────

/// Task content for create and update. Type, team and assignees are not
/// accepted here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: Option<TaskStatus>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TaskRequest {
    fn into_fields(self, now: DateTime<Utc>) -> Result<TaskFields, ApiError> {
        validation::required(&self.title, "Title is required")?;
        validation::max_chars(&self.title, 100, "Title must be at most 100 characters")?;
        validation::required(&self.description, "Description is required")?;
        validation::max_chars(
            &self.description,
            500,
            "Description must be at most 500 characters",
        )?;
        if self.end < now {
            return Err(ApiError::BadRequest(
                "End date must be in the present or future".to_string(),
            ));
        }

        Ok(TaskFields {
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            start: self.start,
            end: self.end,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRequest {
    pub user_id: String,
}

// ─── ENDPOINTS ─────────────────────────────────────────────────────────────────

// GET /api/v1/tasks/user/{id}
pub async fn get_user_tasks(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_id(&path)?;
    let tasks = data.tasks.get_tasks_by_user_id(user_id).await?;
    Ok(HttpResponse::Ok().json(task_list(tasks)))
}

// POST /api/v1/tasks/user/{id}
pub async fn create_user_task(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<TaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_id(&path)?;
    let fields = payload.into_inner().into_fields(Utc::now())?;
    let task = data.tasks.create_user_task(user_id, fields).await?;
    info!("Created personal task {} for user {}", task.id, user_id);
    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

// GET /api/v1/tasks/team/{id}
pub async fn get_team_tasks(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let team_id = parse_id(&path)?;
    let tasks = data.tasks.get_tasks_by_team_id(team_id).await?;
    Ok(HttpResponse::Ok().json(task_list(tasks)))
}

// POST /api/v1/tasks/team/{id}
pub async fn create_team_task(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<TaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let team_id = parse_id(&path)?;
    let fields = payload.into_inner().into_fields(Utc::now())?;
    let task = data.tasks.create_team_task(team_id, fields).await?;
    info!("Created team task {} for team {}", task.id, team_id);
    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

// PUT /api/v1/tasks/{id}
pub async fn update_task(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<TaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let fields = payload.into_inner().into_fields(Utc::now())?;
    let task = data.tasks.update(id, fields).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

// PATCH /api/v1/tasks/{id}/assign
pub async fn assign_user(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<AssignUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let task_id = parse_id(&path)?;
    let user_id = parse_id(&payload.user_id)?;
    data.tasks.assign_user_by_id(task_id, user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// DELETE /api/v1/tasks/{id}
pub async fn delete_personal_task(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    data.tasks.delete_personal_task(id).await?;
    Ok(HttpResponse::Ok().finish())
}

// DELETE /api/v1/tasks/{task_id}/team/{team_id}
pub async fn delete_team_task(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (task_id, team_id) = path.into_inner();
    let task_id = parse_id(&task_id)?;
    let team_id = parse_id(&team_id)?;
    data.tasks.delete_team_task(team_id, task_id).await?;
    Ok(HttpResponse::Ok().finish())
}
