use chrono::{DateTime, Utc};
use pms_shared::{CancellationPolicy, MealPlan, PaymentPolicy, RatePlanSummary};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UnitType;

/// Commercial package over a property's unit types: meal plan, cancellation
/// terms and payment terms. `unit_type_id = None` means the plan covers every
/// unit type of the property.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RatePlan {
    pub id: Uuid,
    pub property_id: Uuid,
    pub organization_id: Uuid,
    pub unit_type_id: Option<Uuid>,
    pub name: String,
    pub active: bool,
    pub meal_plan: Json<MealPlan>,
    pub cancellation_policy: Json<CancellationPolicy>,
    pub payment_policy: Json<PaymentPolicy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

const SELECT_RATE_PLAN: &str = r#"
    SELECT
        rp.id, rp.property_id, p.organization_id, rp.unit_type_id, rp.name,
        rp.active, rp.meal_plan, rp.cancellation_policy, rp.payment_policy,
        rp.created_at, rp.updated_at, rp.deleted_at
    FROM rate_plans rp
    JOIN properties p ON p.id = rp.property_id
"#;

impl RatePlan {
    /// Read the plan under a share lock so a concurrent guarded delete waits
    /// for the booking transaction to finish.
    pub async fn find_for_booking(conn: &mut PgConnection, id: Uuid) -> Result<Option<Self>, AppError> {
        let plan = sqlx::query_as::<_, RatePlan>(&format!(
            "{SELECT_RATE_PLAN} WHERE rp.id = $1 AND rp.deleted_at IS NULL FOR SHARE OF rp"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(plan)
    }

    /// Lock the plan exclusively ahead of a guarded delete
    pub async fn lock_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<Self>, AppError> {
        let plan = sqlx::query_as::<_, RatePlan>(&format!(
            "{SELECT_RATE_PLAN} WHERE rp.id = $1 AND rp.deleted_at IS NULL FOR UPDATE OF rp"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(plan)
    }

    /// Active plans of the given properties
    pub async fn find_active_for_properties<'e, E>(
        executor: E,
        property_ids: &[Uuid],
    ) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let plans = sqlx::query_as::<_, RatePlan>(&format!(
            r#"{SELECT_RATE_PLAN}
            WHERE rp.property_id = ANY($1)
            AND rp.active
            AND rp.deleted_at IS NULL
            ORDER BY rp.name, rp.id"#
        ))
        .bind(property_ids)
        .fetch_all(executor)
        .await?;

        Ok(plans)
    }

    pub async fn soft_delete(conn: &mut PgConnection, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE rate_plans
            SET deleted_at = NOW(), active = FALSE, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Whether a booking of `unit_type` may be made under this plan.
    pub fn applies_to(&self, unit_type: &UnitType) -> bool {
        self.active
            && self.deleted_at.is_none()
            && self.property_id == unit_type.property_id
            && self.unit_type_id.map_or(true, |id| id == unit_type.id)
    }

    pub fn summary(&self) -> RatePlanSummary {
        RatePlanSummary {
            id: self.id,
            name: self.name.clone(),
            meal_plan: self.meal_plan.0.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::rate_plan_for;
    use crate::models::unit_type::fixtures::unit_type;
    use uuid::Uuid;

    #[test]
    fn test_property_wide_plan_applies_to_every_unit_type() {
        let standard = unit_type("STD", 5);
        let mut suite = unit_type("STE", 2);
        suite.property_id = standard.property_id;

        let plan = rate_plan_for(&standard, "Flexible");
        assert!(plan.applies_to(&standard));
        assert!(plan.applies_to(&suite));
    }

    #[test]
    fn test_scoped_inactive_and_foreign_plans_do_not_apply() {
        let standard = unit_type("STD", 5);
        let mut suite = unit_type("STE", 2);
        suite.property_id = standard.property_id;

        let mut scoped = rate_plan_for(&standard, "Suite only");
        scoped.unit_type_id = Some(suite.id);
        assert!(!scoped.applies_to(&standard));
        assert!(scoped.applies_to(&suite));

        let mut inactive = rate_plan_for(&standard, "Old");
        inactive.active = false;
        assert!(!inactive.applies_to(&standard));

        let mut foreign = rate_plan_for(&standard, "Elsewhere");
        foreign.property_id = Uuid::new_v4();
        assert!(!foreign.applies_to(&standard));
    }
}
