use actix_web::{web, HttpResponse};
use pms_shared::{BulkPriceRequest, DateRange};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::PricingService;

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub unit_type_id: Uuid,
    pub start: String,
    pub end: String,
}

/// Nightly prices for a stay
pub async fn get_quote(
    params: web::Query<QuoteParams>,
    pricing_service: web::Data<PricingService>,
) -> Result<HttpResponse, AppError> {
    let stay = DateRange::parse(&params.start, &params.end)?;
    let quote = pricing_service.quote(params.unit_type_id, &stay).await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// Set a price over a date range, splitting the rules it overlaps
pub async fn bulk_update_prices(
    user: AuthenticatedUser,
    request: web::Json<BulkPriceRequest>,
    pricing_service: web::Data<PricingService>,
) -> Result<HttpResponse, AppError> {
    user.require_inventory_manager()?;

    debug!(
        "User {} setting price {} on unit type {} from {} to {}",
        user.user_id, request.price, request.unit_type_id, request.start, request.end
    );

    let result = pricing_service
        .apply_bulk_price(user.organization_scope(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

pub async fn list_price_rules(
    user: AuthenticatedUser,
    unit_type_id: web::Path<Uuid>,
    pricing_service: web::Data<PricingService>,
) -> Result<HttpResponse, AppError> {
    let rules = pricing_service
        .list_rules(*unit_type_id, user.organization_scope())
        .await?;
    Ok(HttpResponse::Ok().json(rules))
}
