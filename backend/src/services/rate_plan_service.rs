use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{RatePlan, Reservation};
use crate::services::ensure_organization_scope;

#[derive(Clone)]
pub struct RatePlanService {
    db_pool: PgPool,
}

impl RatePlanService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Soft-delete a rate plan no live reservation depends on.
    ///
    /// The exclusive row lock conflicts with the share lock a booking takes on
    /// its plan, so a booking in flight either commits first and blocks the
    /// delete, or waits and then fails to find the plan.
    pub async fn delete_rate_plan(&self, id: Uuid, scope: Option<Uuid>) -> Result<(), AppError> {
        let mut tx = self.db_pool.begin().await?;

        let plan = RatePlan::lock_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::RatePlanNotFound(id))?;
        ensure_organization_scope(scope, plan.organization_id)?;

        let in_use = Reservation::count_active_for_rate_plan(&mut *tx, plan.id).await?;
        if in_use > 0 {
            info!("Rate plan {} kept: {} active reservations reference it", plan.id, in_use);
            return Err(AppError::RatePlanInUse(plan.id));
        }

        RatePlan::soft_delete(&mut *tx, plan.id).await?;
        tx.commit().await?;

        info!("Rate plan {} ({}) deleted", plan.id, plan.name);
        Ok(())
    }
}
