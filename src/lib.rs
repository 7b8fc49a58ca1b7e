//! Task management backend: users, teams and tasks over a document store.

pub mod api_error;
pub mod app_state;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod services;
pub mod store;
pub mod task_management;
pub mod team_management;
pub mod user_management;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
