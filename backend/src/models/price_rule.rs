use chrono::{DateTime, NaiveDate, Utc};
use pms_shared::{DateRange, PriceRuleResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use crate::error::AppError;
use crate::pricing::RateSpan;

/// A priced, half-open validity range for one unit type. Only rules with
/// `deleted_at IS NULL` take part in pricing.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PriceRule {
    pub id: Uuid,
    pub unit_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_PRICE_RULE: &str = r#"
    SELECT
        id, unit_type_id,
        lower(validity_range) AS start_date,
        upper(validity_range) AS end_date,
        price, priority, created_at, updated_at
    FROM price_rules
    WHERE deleted_at IS NULL
"#;

impl PriceRule {
    /// Active rules of one unit type overlapping `range`
    pub async fn find_active_overlapping<'e, E>(
        executor: E,
        unit_type_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let rules = sqlx::query_as::<_, PriceRule>(&format!(
            r#"{SELECT_PRICE_RULE}
            AND unit_type_id = $1
            AND validity_range && daterange($2, $3, '[)')
            ORDER BY lower(validity_range), id"#
        ))
        .bind(unit_type_id)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(executor)
        .await?;

        Ok(rules)
    }

    /// Active rules overlapping `range` for several unit types in one round trip
    pub async fn find_active_overlapping_many<'e, E>(
        executor: E,
        unit_type_ids: &[Uuid],
        range: &DateRange,
    ) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let rules = sqlx::query_as::<_, PriceRule>(&format!(
            r#"{SELECT_PRICE_RULE}
            AND unit_type_id = ANY($1)
            AND validity_range && daterange($2, $3, '[)')
            ORDER BY unit_type_id, lower(validity_range), id"#
        ))
        .bind(unit_type_ids)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(executor)
        .await?;

        Ok(rules)
    }

    /// Every active rule of a unit type, ordered by start date
    pub async fn find_active_by_unit_type<'e, E>(
        executor: E,
        unit_type_id: Uuid,
    ) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let rules = sqlx::query_as::<_, PriceRule>(&format!(
            r#"{SELECT_PRICE_RULE}
            AND unit_type_id = $1
            ORDER BY lower(validity_range), id"#
        ))
        .bind(unit_type_id)
        .fetch_all(executor)
        .await?;

        Ok(rules)
    }

    /// Soft-delete the given rules. Returns the number of rows retired.
    pub async fn soft_delete_many(conn: &mut PgConnection, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE price_rules
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = ANY($1) AND deleted_at IS NULL
            "#,
        )
        .bind(ids)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a new active rule
    pub async fn insert(
        conn: &mut PgConnection,
        unit_type_id: Uuid,
        range: &DateRange,
        price: Decimal,
        priority: i32,
    ) -> Result<Self, AppError> {
        let rule = sqlx::query_as::<_, PriceRule>(
            r#"
            INSERT INTO price_rules (unit_type_id, validity_range, price, priority)
            VALUES ($1, daterange($2, $3, '[)'), $4, $5)
            RETURNING
                id, unit_type_id,
                lower(validity_range) AS start_date,
                upper(validity_range) AS end_date,
                price, priority, created_at, updated_at
            "#,
        )
        .bind(unit_type_id)
        .bind(range.start())
        .bind(range.end())
        .bind(price)
        .bind(priority)
        .fetch_one(conn)
        .await?;

        Ok(rule)
    }

    pub fn range(&self) -> Result<DateRange, AppError> {
        Ok(DateRange::new(self.start_date, self.end_date)?)
    }

    pub fn to_span(&self) -> Result<RateSpan, AppError> {
        Ok(RateSpan {
            id: Some(self.id),
            range: self.range()?,
            price: self.price,
            priority: self.priority,
        })
    }

    pub fn to_response(&self) -> PriceRuleResponse {
        PriceRuleResponse {
            id: self.id,
            unit_type_id: self.unit_type_id,
            start: self.start_date,
            end: self.end_date,
            price: self.price,
            priority: self.priority,
        }
    }
}
