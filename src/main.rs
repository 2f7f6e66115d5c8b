use actix_cors::Cors;
use actix_web::{self, middleware::Logger, web, App, HttpServer};
use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use crate::{
    configs::connect_database,
    modules::decision::{
        feed::FeedConfig, repository_pg::DecisionRepositoryPg, service::DecisionService,
    },
};

mod api;
mod configs;
mod constants;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if tracing::subscriber::set_global_default(tracing_subscriber::fmt().finish()).is_err() {
        eprintln!("tracing subscriber already installed");
    }

    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let decision_repo = DecisionRepositoryPg::new(db_pool);
    let decision_service = DecisionService::with_dependencies(
        Arc::new(decision_repo),
        FeedConfig {
            page_size: ENV.page_size,
            request_timeout: Duration::from_millis(ENV.request_timeout_ms),
        },
    );

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allowed_methods(vec!["GET", "PUT"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(decision_service.clone()))
            .service(health_check)
            .service(web::scope("/api").configure(modules::decision::route::configure))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers)
    .run()
    .await
}
