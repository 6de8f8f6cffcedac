pub mod availability;
pub mod health;
pub mod pricing;
pub mod rate_plans;
pub mod reservations;

use actix_web::{error, web, HttpRequest};

use crate::error::AppError;

/// Register every `/api/v1` route.
///
/// `GET /reservations/{code}` and `DELETE /reservations/{id}` share one
/// resource; registering them separately would let the first shadow the
/// second with a 405.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(health::health_check)
            .route("/availability", web::get().to(availability::search_availability))
            .service(
                web::scope("/reservations")
                    .route("", web::post().to(reservations::create_reservation))
                    .route(
                        "/{id}/cancel-preview",
                        web::get().to(reservations::preview_cancellation),
                    )
                    .route("/{id}/cancel", web::post().to(reservations::cancel_reservation))
                    .service(
                        web::resource("/{key}")
                            .route(web::get().to(reservations::get_reservation))
                            .route(web::delete().to(reservations::delete_reservation)),
                    ),
            )
            .service(
                web::scope("/pricing")
                    .route("/quote", web::get().to(pricing::get_quote))
                    .route("/bulk", web::post().to(pricing::bulk_update_prices))
                    .route("/rules/{unit_type_id}", web::get().to(pricing::list_price_rules)),
            )
            .route("/rate-plans/{id}", web::delete().to(rate_plans::delete_rate_plan)),
    );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        AppError::Validation(format!("invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        AppError::Validation(format!("invalid query string: {}", err)).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        AppError::NotFound(format!("invalid path: {}", err)).into()
    })
}
