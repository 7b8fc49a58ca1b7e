use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::api_error::{parse_id, ApiError};
use crate::app_state::AppState;
use crate::models::{TeamDetails, TeamFields};
use crate::task_management::{AssignUserRequest, TaskResponse};
use crate::user_management::UserResponse;
use crate::validation;

// ─── RESPONSES ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub members: Vec<UserResponse>,
    pub tasks: Vec<TaskResponse>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<TeamDetails> for TeamResponse {
    fn from(details: TeamDetails) -> Self {
        let TeamDetails { team, members, tasks } = details;
        TeamResponse {
            id: team.id.to_hex(),
            name: team.name,
            owner_id: team.owner_id.to_hex(),
            members: members.into_iter().map(UserResponse::from).collect(),
            tasks: tasks.into_iter().map(TaskResponse::from).collect(),
            created_at: team.created_at,
            modified_at: team.modified_at,
        }
    }
}

// ─── REQUEST PAYLOADS ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    pub name: String,
    pub owner_id: String,
}

impl TeamRequest {
    fn into_fields(self) -> Result<TeamFields, ApiError> {
        validation::required(&self.name, "Team name is required")?;
        validation::max_chars(&self.name, 100, "Team name must be at most 100 characters")?;
        Ok(TeamFields {
            owner_id: parse_id(&self.owner_id)?,
            name: self.name,
        })
    }
}

// ─── ENDPOINTS ─────────────────────────────────────────────────────────────────

// GET /api/v1/teams/user/{id}
pub async fn get_user_teams(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let owner_id = parse_id(&path)?;
    let teams: Vec<TeamResponse> = data
        .teams
        .get_teams_by_user_id(owner_id)
        .await?
        .into_iter()
        .map(TeamResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(teams))
}

// POST /api/v1/teams
pub async fn create_team(
    data: web::Data<AppState>,
    payload: web::Json<TeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let fields = payload.into_inner().into_fields()?;
    let details = data.teams.create(fields).await?;
    info!("Created team {}", details.team.id);
    Ok(HttpResponse::Created().json(TeamResponse::from(details)))
}

// PUT /api/v1/teams/{id}
pub async fn update_team(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<TeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let fields = payload.into_inner().into_fields()?;
    let details = data.teams.update(id, fields).await?;
    Ok(HttpResponse::Ok().json(TeamResponse::from(details)))
}

// PATCH /api/v1/teams/{id}/add-member
pub async fn add_member(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<AssignUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let team_id = parse_id(&path)?;
    let user_id = parse_id(&payload.user_id)?;
    data.teams.add_member(team_id, user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// DELETE /api/v1/teams/{id}
pub async fn delete_team(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    data.teams.delete(id).await?;
    info!("Deleted team {}", id);
    Ok(HttpResponse::Ok().finish())
}
