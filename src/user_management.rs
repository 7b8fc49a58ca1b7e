use actix_web::{web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::api_error::{parse_id, ApiError};
use crate::app_state::AppState;
use crate::models::{User, UserFields};
use crate::validation;

// ─── RESPONSES ─────────────────────────────────────────────────────────────────

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.to_hex(),
            username: user.username,
            email: user.email,
            phone: user.phone,
            firstname: user.firstname,
            lastname: user.lastname,
        }
    }
}

// ─── REQUEST PAYLOADS ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl UserRequest {
    fn into_fields(self) -> Result<UserFields, ApiError> {
        validation::username(&self.username)?;
        validation::email(&self.email)?;
        validation::phone(self.phone.as_deref())?;
        validation::letters(self.firstname.as_deref(), "Firstname must contain only letters")?;
        validation::letters(self.lastname.as_deref(), "Lastname must contain only letters")?;

        Ok(UserFields {
            username: self.username,
            email: self.email,
            phone: self.phone,
            firstname: self.firstname,
            lastname: self.lastname,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// ─── ENDPOINTS ─────────────────────────────────────────────────────────────────

// GET /api/v1/users/{id}
pub async fn get_user_by_id(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let user = data.users.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

// PUT /api/v1/users/{id}
pub async fn update_user(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let fields = payload.into_inner().into_fields()?;
    let user = data.users.update(id, fields).await?;
    info!("Updated user {}", id);
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

// PUT /api/v1/users/{id}/password
pub async fn update_user_password(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    validation::required(&payload.new_password, "New password is required")?;
    data.users
        .update_password(id, &payload.old_password, &payload.new_password)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

// DELETE /api/v1/users/{id}
pub async fn delete_user(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    data.users.delete(id).await?;
    info!("Deleted user {}", id);
    Ok(HttpResponse::Ok().finish())
}
