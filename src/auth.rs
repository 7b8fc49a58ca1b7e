use actix_web::{web, HttpResponse};
use log::{debug, info};
use serde::Deserialize;

use crate::api_error::ApiError;
use crate::app_state::AppState;
use crate::models::NewUser;
use crate::user_management::UserResponse;
use crate::validation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl RegisterRequest {
    fn into_new_user(self) -> Result<NewUser, ApiError> {
        validation::username(&self.username)?;
        validation::email(&self.email)?;
        validation::required(&self.password, "Password is required")?;
        validation::phone(self.phone.as_deref())?;
        validation::letters(self.firstname.as_deref(), "Firstname must contain only letters")?;
        validation::letters(self.lastname.as_deref(), "Lastname must contain only letters")?;

        Ok(NewUser {
            username: self.username,
            email: self.email,
            password: self.password,
            phone: self.phone,
            firstname: self.firstname,
            lastname: self.lastname,
        })
    }
}

// POST /api/v1/auth/register
pub async fn register(
    data: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    debug!("register called for username '{}'", payload.username);
    let new_user = payload.into_inner().into_new_user()?;
    let user = data.users.register(new_user).await?;
    info!("Registered user {}", user.id);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}
