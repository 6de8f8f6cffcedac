use chrono::{DateTime, Utc};
use pms_shared::{
    CancelPreviewResponse, CancelReservationResponse, CreateReservationRequest, DateRange,
    ReservationCreatedResponse, ReservationResponse, ReservationStatus, RESERVATION_CODE_MAX_ATTEMPTS,
    SUCCESS_RESERVATION_CANCELLED, SUCCESS_RESERVATION_CREATED,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Guest, NewReservation, PriceRule, RatePlan, Reservation, UnitType};
use crate::pricing::{hours_until_check_in, price_stay, refund_amount, resolve_nightly_rates, RateSpan};
use crate::utils::{generate_reservation_code, guest_details, is_valid_reservation_code, validate_request};

/// Reservation admission and lifecycle
#[derive(Clone)]
pub struct ReservationService {
    db_pool: PgPool,
}

/// Penalty and refund for cancelling at a given moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancellationQuote {
    pub hours_until_check_in: i64,
    pub penalty_amount: Decimal,
    pub refund_amount: Decimal,
}

impl ReservationService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Admit a reservation against the unit type's inventory.
    ///
    /// Everything runs in one transaction that first takes the unit type's
    /// row lock; concurrent admissions for the same unit type queue behind it
    /// and recount after the previous one commits. Dropping the returned
    /// future before it completes rolls the transaction back.
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ReservationCreatedResponse, AppError> {
        validate_request(&request)?;
        let stay = DateRange::parse(&request.start, &request.end)?;
        let guest = guest_details(&request)?;

        let mut tx = self.db_pool.begin().await?;

        let unit_type = UnitType::lock_for_update(&mut *tx, request.unit_type_id)
            .await?
            .ok_or(AppError::UnitTypeNotFound(request.unit_type_id))?;

        let rules = load_spans(&mut *tx, unit_type.id, &stay).await?;
        let quote = resolve_nightly_rates(&rules, &stay)?;

        let reserved = Reservation::count_overlapping(&mut *tx, unit_type.id, &stay).await?;
        if reserved >= i64::from(unit_type.total_quantity) {
            info!(
                "Rejected booking for unit type {} over {}: {} of {} units taken",
                unit_type.id, stay, reserved, unit_type.total_quantity
            );
            return Err(AppError::NoAvailability(format!(
                "unit type {} is sold out for {}",
                unit_type.code, stay
            )));
        }

        validate_occupancy(&unit_type, request.adults, request.children)?;

        let rate_plan = match request.rate_plan_id {
            Some(rate_plan_id) => Some(
                RatePlan::find_for_booking(&mut *tx, rate_plan_id)
                    .await?
                    .filter(|plan| plan.applies_to(&unit_type))
                    .ok_or(AppError::RatePlanNotFound(rate_plan_id))?,
            ),
            None => None,
        };

        let guest = Guest::upsert(
            &mut *tx,
            &guest.email,
            &guest.first_name,
            &guest.last_name,
            guest.phone.as_deref(),
        )
        .await?;

        let breakdown = price_stay(
            &quote,
            rate_plan.as_ref().map(|plan| &plan.meal_plan.0),
            request.adults + request.children,
        );

        let new_reservation = NewReservation {
            reservation_code: String::new(),
            unit_type_id: unit_type.id,
            rate_plan_id: rate_plan.as_ref().map(|plan| plan.id),
            guest_id: guest.id,
            stay,
            adults: request.adults,
            children: request.children,
            total_price: breakdown.total_price,
            nightly_rates: quote.nightly_rates,
            cancellation_policy: rate_plan
                .as_ref()
                .map(|plan| plan.cancellation_policy.0.clone())
                .unwrap_or_default(),
        };
        let mut rng = StdRng::from_entropy();
        let reservation = insert_with_unique_code(&mut *tx, &unit_type, new_reservation, &mut rng).await?;

        tx.commit().await?;

        info!(
            "Reservation {} ({}) confirmed for unit type {} over {}, total {}",
            reservation.reservation_code, reservation.id, unit_type.id, stay, reservation.total_price
        );

        Ok(ReservationCreatedResponse {
            reservation_id: reservation.id,
            reservation_code: reservation.reservation_code,
            status: reservation.status,
            total_price: reservation.total_price,
            message: SUCCESS_RESERVATION_CREATED.to_string(),
        })
    }

    pub async fn get_by_code(&self, code: &str) -> Result<ReservationResponse, AppError> {
        let code = code.trim().to_ascii_uppercase();
        if !is_valid_reservation_code(&code) {
            return Err(AppError::ReservationNotFound(code));
        }

        let reservation = Reservation::find_by_code(&self.db_pool, &code)
            .await?
            .ok_or_else(|| AppError::ReservationNotFound(code.clone()))?;
        let guest = Guest::find_by_id(&self.db_pool, reservation.guest_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("guest of reservation {} is missing", reservation.id)))?;

        Ok(reservation.to_response(&guest))
    }

    /// Penalty the guest would pay when cancelling at `now`. Read-only; for a
    /// reservation that is already cancelled the stored penalty is returned.
    pub async fn preview_cancellation(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CancelPreviewResponse, AppError> {
        let reservation = Reservation::find_by_id(&self.db_pool, id)
            .await?
            .ok_or_else(|| AppError::ReservationNotFound(id.to_string()))?;

        let quote = match reservation.status {
            ReservationStatus::Cancelled => stored_cancellation(&reservation, now),
            ReservationStatus::Confirmed => quote_cancellation(&reservation, now),
        };

        Ok(CancelPreviewResponse {
            reservation_id: reservation.id,
            status: reservation.status,
            hours_until_check_in: quote.hours_until_check_in,
            penalty_amount: quote.penalty_amount,
            refund_amount: quote.refund_amount,
        })
    }

    /// Cancel a confirmed reservation, recording the penalty due at `now`.
    pub async fn cancel_reservation(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CancelReservationResponse, AppError> {
        let mut tx = self.db_pool.begin().await?;

        let reservation = Reservation::lock_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ReservationNotFound(id.to_string()))?;

        if !reservation.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(AppError::AlreadyCancelled(id));
        }

        let quote = quote_cancellation(&reservation, now);

        let cancelled = Reservation::mark_cancelled(&mut *tx, id, quote.penalty_amount).await?;
        tx.commit().await?;

        info!(
            "Reservation {} cancelled {}h before check-in, penalty {}",
            cancelled.reservation_code, quote.hours_until_check_in, quote.penalty_amount
        );

        Ok(CancelReservationResponse {
            reservation_id: cancelled.id,
            status: cancelled.status,
            penalty_amount: quote.penalty_amount,
            refund_amount: quote.refund_amount,
            message: SUCCESS_RESERVATION_CANCELLED.to_string(),
        })
    }

    /// Administrative soft-delete. The row disappears from every read and
    /// stops holding inventory.
    pub async fn delete_reservation(&self, id: Uuid) -> Result<(), AppError> {
        if !Reservation::soft_delete(&self.db_pool, id).await? {
            return Err(AppError::ReservationNotFound(id.to_string()));
        }

        warn!("Reservation {} soft-deleted", id);
        Ok(())
    }
}

async fn load_spans(conn: &mut PgConnection, unit_type_id: Uuid, stay: &DateRange) -> Result<Vec<RateSpan>, AppError> {
    PriceRule::find_active_overlapping(conn, unit_type_id, stay)
        .await?
        .iter()
        .map(PriceRule::to_span)
        .collect()
}

/// Insert under a fresh code, drawing again when the code is taken. Gives up
/// with `CONFLICT` after `RESERVATION_CODE_MAX_ATTEMPTS` draws.
pub async fn insert_with_unique_code<R: Rng + ?Sized>(
    conn: &mut PgConnection,
    unit_type: &UnitType,
    mut new_reservation: NewReservation,
    rng: &mut R,
) -> Result<Reservation, AppError> {
    for attempt in 1..=RESERVATION_CODE_MAX_ATTEMPTS {
        new_reservation.reservation_code =
            generate_reservation_code(rng, &unit_type.property_code, &unit_type.code);

        if let Some(reservation) = Reservation::insert(&mut *conn, &new_reservation).await? {
            return Ok(reservation);
        }

        warn!(
            "Reservation code {} already taken (attempt {}/{})",
            new_reservation.reservation_code, attempt, RESERVATION_CODE_MAX_ATTEMPTS
        );
    }

    Err(AppError::Conflict(
        "could not allocate a unique reservation code".to_string(),
    ))
}

pub fn validate_occupancy(unit_type: &UnitType, adults: i32, children: i32) -> Result<(), AppError> {
    if unit_type.fits(adults, children) {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "unit type {} hosts at most {} adults, {} children and {} guests in total",
        unit_type.code, unit_type.max_adults, unit_type.max_children, unit_type.max_occupancy
    )))
}

/// Penalty under the terms snapshotted at booking. Reservations without a
/// plan carry the fully refundable default.
pub fn quote_cancellation(reservation: &Reservation, now: DateTime<Utc>) -> CancellationQuote {
    let hours = hours_until_check_in(reservation.start_date, now);
    let penalty_amount = reservation.cancellation_policy.0.calculate_penalty(reservation.total_price, reservation.first_night_price(), hours);

    CancellationQuote {
        hours_until_check_in: hours,
        penalty_amount,
        refund_amount: refund_amount(reservation.total_price, penalty_amount),
    }
}

fn stored_cancellation(reservation: &Reservation, now: DateTime<Utc>) -> CancellationQuote {
    let penalty_amount = reservation.penalty_amount.unwrap_or(Decimal::ZERO);

    CancellationQuote {
        hours_until_check_in: hours_until_check_in(reservation.start_date, now),
        penalty_amount,
        refund_amount: refund_amount(reservation.total_price, penalty_amount),
    }
}
