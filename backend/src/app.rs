use actix_web::web;

use crate::database::Database;
use crate::handlers;
use crate::services::Services;
use crate::utils::jwt::JwtService;

/// Everything a worker needs to serve requests. Cloned into each worker.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub jwt: JwtService,
    pub services: Services,
}

impl AppState {
    pub fn new(database: Database, jwt: JwtService) -> Self {
        let services = Services::new(database.pool().clone());
        Self {
            database,
            jwt,
            services,
        }
    }
}

/// Register shared state and routes on an `App`.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state.database))
            .app_data(web::Data::new(state.jwt))
            .app_data(web::Data::new(state.services.availability))
            .app_data(web::Data::new(state.services.reservations))
            .app_data(web::Data::new(state.services.pricing))
            .app_data(web::Data::new(state.services.rate_plans))
            .configure(handlers::configure_routes);
    }
}
