use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::RatePlanService;

/// Delete a rate plan unless live reservations still use it
pub async fn delete_rate_plan(
    user: AuthenticatedUser,
    rate_plan_id: web::Path<Uuid>,
    rate_plan_service: web::Data<RatePlanService>,
) -> Result<HttpResponse, AppError> {
    user.require_inventory_manager()?;

    rate_plan_service
        .delete_rate_plan(*rate_plan_id, user.organization_scope())
        .await?;

    info!("User {} deleted rate plan {}", user.user_id, rate_plan_id);
    Ok(HttpResponse::NoContent().finish())
}
