pub mod availability_service;
pub mod pricing_service;
pub mod rate_plan_service;
pub mod reservation_service;

pub use availability_service::{AvailabilityQuery, AvailabilityService};
pub use pricing_service::PricingService;
pub use rate_plan_service::RatePlanService;
pub use reservation_service::ReservationService;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Booking-core services sharing one connection pool
#[derive(Clone)]
pub struct Services {
    pub availability: AvailabilityService,
    pub reservations: ReservationService,
    pub pricing: PricingService,
    pub rate_plans: RatePlanService,
}

impl Services {
    pub fn new(db_pool: PgPool) -> Self {
        Self {
            availability: AvailabilityService::new(db_pool.clone()),
            reservations: ReservationService::new(db_pool.clone()),
            pricing: PricingService::new(db_pool.clone()),
            rate_plans: RatePlanService::new(db_pool),
        }
    }
}

/// Reject access to another organization's records. `None` is the platform
/// admin scope and sees everything.
pub fn ensure_organization_scope(scope: Option<Uuid>, organization_id: Uuid) -> Result<(), AppError> {
    match scope {
        Some(scope) if scope != organization_id => Err(AppError::Authorization(
            "Resource belongs to another organization".to_string(),
        )),
        _ => Ok(()),
    }
}
