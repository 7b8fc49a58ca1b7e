use actix_web::{web, HttpResponse};
use log::warn;

use crate::api_error::ApiError;
use crate::auth::register;
use crate::task_management::{
    assign_user, create_team_task, create_user_task, delete_personal_task, delete_team_task,
    get_team_tasks, get_user_tasks, update_task,
};
use crate::team_management::{add_member, create_team, delete_team, get_user_teams, update_team};
use crate::user_management::{delete_user, get_user_by_id, update_user, update_user_password};

/// Registers the `/api/v1` routes and the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        warn!("Rejected request body: {}", err);
        ApiError::BadRequest(
            "Unable to parse request body. Please check the JSON syntax and data types"
                .to_string(),
        )
        .into()
    }))
    .service(
        web::scope("/api/v1")
            // AUTH
            .service(web::scope("/auth").route("/register", web::post().to(register)))
            // USERS
            .service(
                web::scope("/users")
                    .route("/{id}", web::get().to(get_user_by_id))
                    .route("/{id}", web::put().to(update_user))
                    .route("/{id}", web::delete().to(delete_user))
                    .route("/{id}/password", web::put().to(update_user_password)),
            )
            // TEAMS
            .service(
                web::scope("/teams")
                    .route("", web::post().to(create_team))
                    .route("/user/{id}", web::get().to(get_user_teams))
                    .route("/{id}", web::put().to(update_team))
                    .route("/{id}", web::delete().to(delete_team))
                    .route("/{id}/add-member", web::patch().to(add_member)),
            )
            // TASKS
            .service(
                web::scope("/tasks")
                    .route("/user/{id}", web::get().to(get_user_tasks))
                    .route("/user/{id}", web::post().to(create_user_task))
                    .route("/team/{id}", web::get().to(get_team_tasks))
                    .route("/team/{id}", web::post().to(create_team_task))
                    .route("/{id}", web::put().to(update_task))
                    .route("/{id}", web::delete().to(delete_personal_task))
                    .route("/{id}/assign", web::patch().to(assign_user))
                    .route("/{task_id}/team/{team_id}", web::delete().to(delete_team_task)),
            ),
    );
}

/// Fallback for unmatched paths.
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::PathNotFound)
}
