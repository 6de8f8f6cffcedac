use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pms_backend::config::AppConfig;
use pms_backend::database::Database;
use pms_backend::middleware::RequestTimeout;
use pms_backend::utils::jwt::JwtService;
use pms_backend::{configure_app, AppError, AppState};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Starting PMS backend on {}:{}", config.host, config.port);

    // Initialize database
    let database = Database::new(config.database()).await?;

    if config.run_migrations {
        database.migrate().await?;
        info!("Database migrations applied");
    }

    let jwt_service = JwtService::new(&config.jwt_secret)?;
    let state = AppState::new(database.clone(), jwt_service);
    let request_timeout = config.request_timeout();

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(RequestTimeout::new(request_timeout))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(configure_app(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    database.close().await;
    info!("PMS backend stopped");
    Ok(())
}
