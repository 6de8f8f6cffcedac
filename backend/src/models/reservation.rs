use chrono::{DateTime, NaiveDate, Utc};
use pms_shared::{CancellationPolicy, DateRange, NightlyRate, ReservationResponse, ReservationStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Guest;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub reservation_code: String,
    pub unit_type_id: Uuid,
    pub rate_plan_id: Option<Uuid>,
    pub guest_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub total_price: Decimal,
    pub nightly_rates: Json<Vec<NightlyRate>>,
    pub cancellation_policy: Json<CancellationPolicy>,
    pub status: ReservationStatus,
    pub penalty_amount: Option<Decimal>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a reservation insert
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub reservation_code: String,
    pub unit_type_id: Uuid,
    pub rate_plan_id: Option<Uuid>,
    pub guest_id: Uuid,
    pub stay: DateRange,
    pub adults: i32,
    pub children: i32,
    pub total_price: Decimal,
    pub nightly_rates: Vec<NightlyRate>,
    pub cancellation_policy: CancellationPolicy,
}

const RESERVATION_COLUMNS: &str = r#"
    id, reservation_code, unit_type_id, rate_plan_id, guest_id,
    lower(stay_range) AS start_date, upper(stay_range) AS end_date,
    adults, children, total_price, nightly_rates, cancellation_policy, status,
    penalty_amount, cancelled_at, created_at, updated_at
"#;

impl Reservation {
    /// Number of live reservations of a unit type whose stay overlaps `range`.
    /// Cancelled and soft-deleted reservations do not hold inventory.
    pub async fn count_overlapping<'e, E>(
        executor: E,
        unit_type_id: Uuid,
        range: &DateRange,
    ) -> Result<i64, AppError>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reservations
            WHERE unit_type_id = $1
            AND deleted_at IS NULL
            AND status <> 'cancelled'
            AND stay_range && daterange($2, $3, '[)')
            "#,
        )
        .bind(unit_type_id)
        .bind(range.start())
        .bind(range.end())
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Overlap counts for several unit types. Unit types without overlapping
    /// reservations are absent from the result.
    pub async fn count_overlapping_many<'e, E>(
        executor: E,
        unit_type_ids: &[Uuid],
        range: &DateRange,
    ) -> Result<Vec<(Uuid, i64)>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let counts: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT unit_type_id, COUNT(*)
            FROM reservations
            WHERE unit_type_id = ANY($1)
            AND deleted_at IS NULL
            AND status <> 'cancelled'
            AND stay_range && daterange($2, $3, '[)')
            GROUP BY unit_type_id
            "#,
        )
        .bind(unit_type_ids)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(executor)
        .await?;

        Ok(counts)
    }

    /// Insert a confirmed reservation. Returns `None` when the reservation
    /// code is already taken so the caller can retry with a fresh code
    /// without aborting its transaction.
    pub async fn insert(conn: &mut PgConnection, new: &NewReservation) -> Result<Option<Self>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (
                reservation_code, unit_type_id, rate_plan_id, guest_id, stay_range,
                adults, children, total_price, nightly_rates, cancellation_policy, status
            )
            VALUES ($1, $2, $3, $4, daterange($5, $6, '[)'), $7, $8, $9, $10, $11, 'confirmed')
            ON CONFLICT (reservation_code) DO NOTHING
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(&new.reservation_code)
        .bind(new.unit_type_id)
        .bind(new.rate_plan_id)
        .bind(new.guest_id)
        .bind(new.stay.start())
        .bind(new.stay.end())
        .bind(new.adults)
        .bind(new.children)
        .bind(new.total_price)
        .bind(Json(&new.nightly_rates))
        .bind(Json(&new.cancellation_policy))
        .fetch_optional(conn)
        .await?;

        Ok(reservation)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(reservation)
    }

    pub async fn find_by_code<'e, E>(executor: E, code: &str) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"SELECT {RESERVATION_COLUMNS} FROM reservations
            WHERE reservation_code = $1 AND deleted_at IS NULL"#
        ))
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(reservation)
    }

    /// Load the reservation with a row lock held until the transaction ends.
    /// Serializes concurrent cancellations of the same reservation.
    pub async fn lock_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<Self>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"SELECT {RESERVATION_COLUMNS} FROM reservations
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE"#
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(reservation)
    }

    pub async fn mark_cancelled(
        conn: &mut PgConnection,
        id: Uuid,
        penalty_amount: Decimal,
    ) -> Result<Self, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET status = 'cancelled',
                penalty_amount = $2,
                cancelled_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(penalty_amount)
        .fetch_one(conn)
        .await?;

        Ok(reservation)
    }

    /// Soft-delete. Returns false when no live reservation had this id.
    pub async fn soft_delete<'e, E>(executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Live, non-cancelled reservations booked under a rate plan
    pub async fn count_active_for_rate_plan<'e, E>(executor: E, rate_plan_id: Uuid) -> Result<i64, AppError>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reservations
            WHERE rate_plan_id = $1
            AND deleted_at IS NULL
            AND status <> 'cancelled'
            "#,
        )
        .bind(rate_plan_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Price of the first night from the booking-time snapshot. Falls back to
    /// an even split of the total for rows without a snapshot.
    pub fn first_night_price(&self) -> Decimal {
        if let Some(first) = self.nightly_rates.0.first() {
            return first.price;
        }
        let nights = (self.end_date - self.start_date).num_days().max(1);
        pms_shared::round_money(self.total_price / Decimal::from(nights))
    }

    pub fn to_response(&self, guest: &Guest) -> ReservationResponse {
        ReservationResponse {
            id: self.id,
            reservation_code: self.reservation_code.clone(),
            unit_type_id: self.unit_type_id,
            rate_plan_id: self.rate_plan_id,
            guest: guest.to_response(),
            start: self.start_date,
            end: self.end_date,
            nights: (self.end_date - self.start_date).num_days(),
            adults: self.adults,
            children: self.children,
            total_price: self.total_price,
            nightly_rates: self.nightly_rates.0.clone(),
            status: self.status,
            penalty_amount: self.penalty_amount,
            cancelled_at: self.cancelled_at,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rust_decimal_macros::dec;

    pub fn reservation(start: NaiveDate, end: NaiveDate, nightly: &[Decimal]) -> Reservation {
        let nightly_rates: Vec<NightlyRate> = nightly
            .iter()
            .enumerate()
            .map(|(i, price)| NightlyRate {
                date: start + chrono::Duration::days(i as i64),
                price: *price,
            })
            .collect();
        let total_price = nightly.iter().copied().sum::<Decimal>();

        Reservation {
            id: Uuid::new_v4(),
            reservation_code: "PRP-STD-A1B2".to_string(),
            unit_type_id: Uuid::new_v4(),
            rate_plan_id: None,
            guest_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            adults: 2,
            children: 0,
            total_price: if nightly.is_empty() { dec!(300) } else { total_price },
            nightly_rates: Json(nightly_rates),
            cancellation_policy: Json(CancellationPolicy::default()),
            status: ReservationStatus::Confirmed,
            penalty_amount: None,
            cancelled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::reservation;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_first_night_price_uses_snapshot() {
        let booked = reservation(day(2), day(5), &[dec!(120), dec!(100), dec!(100)]);
        assert_eq!(booked.first_night_price(), dec!(120));
        assert_eq!(booked.total_price, dec!(320));
    }

    #[test]
    fn test_first_night_price_without_snapshot_splits_total() {
        let legacy = reservation(day(2), day(5), &[]);
        assert_eq!(legacy.first_night_price(), dec!(100));
    }
}
