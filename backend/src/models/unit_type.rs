use chrono::{DateTime, Utc};
use pms_shared::UnitTypeSummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use crate::error::AppError;

/// A bookable category of units within a property, joined with the owning
/// property's code and organization.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UnitType {
    pub id: Uuid,
    pub property_id: Uuid,
    pub property_code: String,
    pub organization_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub total_quantity: i32,
    pub base_price: Decimal,
    pub max_occupancy: i32,
    pub max_adults: i32,
    pub max_children: i32,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_UNIT_TYPE: &str = r#"
    SELECT
        ut.id, ut.property_id, p.code AS property_code, p.organization_id,
        ut.code, ut.name, ut.description, ut.total_quantity, ut.base_price,
        ut.max_occupancy, ut.max_adults, ut.max_children, ut.amenities,
        ut.created_at, ut.updated_at
    FROM unit_types ut
    JOIN properties p ON p.id = ut.property_id
    WHERE ut.deleted_at IS NULL AND p.deleted_at IS NULL
"#;

impl UnitType {
    /// Find an active unit type by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let unit_type = sqlx::query_as::<_, UnitType>(&format!("{SELECT_UNIT_TYPE} AND ut.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(unit_type)
    }

    /// Load the unit type with a row lock held until the surrounding
    /// transaction ends. This lock is the per-unit-type admission gate.
    pub async fn lock_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<Self>, AppError> {
        let unit_type = sqlx::query_as::<_, UnitType>(&format!(
            "{SELECT_UNIT_TYPE} AND ut.id = $1 FOR UPDATE OF ut"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(unit_type)
    }

    /// Unit types able to host the party, optionally restricted to one property
    pub async fn find_candidates<'e, E>(
        executor: E,
        property_id: Option<Uuid>,
        adults: i32,
        children: i32,
    ) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let unit_types = sqlx::query_as::<_, UnitType>(&format!(
            r#"{SELECT_UNIT_TYPE}
            AND ($1::uuid IS NULL OR ut.property_id = $1)
            AND ut.max_adults >= $2
            AND ut.max_children >= $3
            AND ut.max_occupancy >= $2 + $3
            ORDER BY p.code, ut.code"#
        ))
        .bind(property_id)
        .bind(adults)
        .bind(children)
        .fetch_all(executor)
        .await?;

        Ok(unit_types)
    }

    /// Capacity check: every per-kind limit and the combined occupancy.
    pub fn fits(&self, adults: i32, children: i32) -> bool {
        adults >= 1
            && children >= 0
            && self.max_adults >= adults
            && self.max_children >= children
            && self.max_occupancy >= adults + children
    }

    pub fn summary(&self) -> UnitTypeSummary {
        UnitTypeSummary {
            id: self.id,
            property_id: self.property_id,
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            base_price: self.base_price,
            max_occupancy: self.max_occupancy,
            max_adults: self.max_adults,
            max_children: self.max_children,
            amenities: self.amenities.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::unit_type;

    #[test]
    fn test_fits_checks_each_limit() {
        let standard = unit_type("STD", 10);

        assert!(standard.fits(2, 0));
        assert!(standard.fits(1, 1));
        assert!(!standard.fits(3, 0), "too many adults");
        assert!(!standard.fits(1, 2), "too many children");
        assert!(!standard.fits(2, 1), "occupancy exceeded");
        assert!(!standard.fits(0, 1), "at least one adult");
    }
}
