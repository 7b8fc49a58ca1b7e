// src/main.rs

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use task_manager::app_state::AppState;
use task_manager::clock::SystemClock;
use task_manager::config::{Config, StoreBackend};
use task_manager::password::PasswordHasher;
use task_manager::routes;
use task_manager::services::Services;
use task_manager::store::{MemoryStore, MongoStore, Stores};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(io::Error::other)?;

    let stores = match &config.store {
        StoreBackend::Mongo { uri, database_name } => {
            let mongo = MongoStore::init(uri, database_name)
                .await
                .map_err(io::Error::other)?;
            Stores::shared(Arc::new(mongo))
        }
        StoreBackend::Memory => {
            info!("Using in-memory document store; data is lost on shutdown");
            Stores::shared(Arc::new(MemoryStore::new()))
        }
    };

    let services = Services::wire(
        stores,
        Arc::new(SystemClock),
        PasswordHasher::new(config.bcrypt_cost),
    );
    let state = web::Data::new(AppState::from(services));

    let frontend_origin = config.frontend_origin.clone();
    info!("Server running at http://{}", config.bind_address);
    info!("Allowed CORS Origin: {}", frontend_origin);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
