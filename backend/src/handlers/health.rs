use actix_web::{get, web, HttpResponse, Result};
use serde_json::json;

use crate::database::Database;

#[get("/health")]
pub async fn health_check(database: web::Data<Database>) -> Result<HttpResponse> {
    let health = database.health_check().await;

    let body = json!({
        "status": if health.is_healthy { "healthy" } else { "degraded" },
        "service": "pms-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "database": {
            "healthy": health.is_healthy,
            "response_time_ms": health.response_time.as_millis() as u64,
            "pool_size": health.pool_size,
            "idle_connections": health.idle_connections,
        }
    });

    if health.is_healthy {
        Ok(HttpResponse::Ok().json(body))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(body))
    }
}
