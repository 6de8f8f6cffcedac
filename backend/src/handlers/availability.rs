use actix_web::{web, HttpResponse};
use pms_shared::{DateRange, DEFAULT_ROOMS};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Pagination;
use crate::services::{AvailabilityQuery, AvailabilityService};

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    #[serde(alias = "property_id")]
    pub hotel_id: Option<Uuid>,
    pub start: String,
    pub end: String,
    #[serde(default = "default_adults")]
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    pub rooms: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn default_adults() -> i32 {
    1
}

impl AvailabilityParams {
    pub fn into_query(self) -> Result<AvailabilityQuery, AppError> {
        let stay = DateRange::parse(&self.start, &self.end)?;

        Ok(AvailabilityQuery {
            property_id: self.hotel_id,
            stay,
            adults: self.adults,
            children: self.children,
            rooms: self.rooms.unwrap_or(DEFAULT_ROOMS),
            pagination: Pagination::new(self.page, self.limit),
        })
    }
}

/// Search bookable unit types for a stay
pub async fn search_availability(
    params: web::Query<AvailabilityParams>,
    availability_service: web::Data<AvailabilityService>,
) -> Result<HttpResponse, AppError> {
    let query = params.into_inner().into_query()?;
    debug!("Searching availability for {} ({:?})", query.stay, query.property_id);

    let results = availability_service.search(&query).await?;

    Ok(HttpResponse::Ok().json(results))
}
