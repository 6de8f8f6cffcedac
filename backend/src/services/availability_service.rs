use pms_shared::{
    AvailabilitySearch, CancellationPolicy, DateRange, PaginatedResponse, PaymentPolicy, RateOption,
    DEFAULT_ROOMS, MAX_ADULTS, MAX_CHILDREN, MAX_ROOMS,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Pagination, PriceRule, RatePlan, Reservation, UnitType};
use crate::pricing::{price_stay, resolve_nightly_rates, NightlyQuote, RateSpan};

/// Parsed availability search
#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub property_id: Option<Uuid>,
    pub stay: DateRange,
    pub adults: i32,
    pub children: i32,
    pub rooms: i32,
    pub pagination: Pagination,
}

impl AvailabilityQuery {
    pub fn new(property_id: Option<Uuid>, stay: DateRange, adults: i32, children: i32) -> Self {
        Self {
            property_id,
            stay,
            adults,
            children,
            rooms: DEFAULT_ROOMS,
            pagination: Pagination::default(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_ADULTS).contains(&self.adults) {
            return Err(AppError::Validation(format!("adults must be between 1 and {}", MAX_ADULTS)));
        }
        if !(0..=MAX_CHILDREN).contains(&self.children) {
            return Err(AppError::Validation(format!("children must be between 0 and {}", MAX_CHILDREN)));
        }
        if !(1..=MAX_ROOMS).contains(&self.rooms) {
            return Err(AppError::Validation(format!("rooms must be between 1 and {}", MAX_ROOMS)));
        }
        Ok(())
    }

    fn pax(&self) -> i32 {
        self.adults + self.children
    }
}

/// Read-only availability search. Counts are unlocked and may be stale by the
/// time a booking is attempted; admission rechecks under lock.
#[derive(Clone)]
pub struct AvailabilityService {
    db_pool: PgPool,
}

impl AvailabilityService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn search(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<PaginatedResponse<AvailabilitySearch>, AppError> {
        query.validate()?;

        let candidates =
            UnitType::find_candidates(&self.db_pool, query.property_id, query.adults, query.children).await?;
        if candidates.is_empty() {
            return Ok(paginate(Vec::new(), query.pagination));
        }

        let unit_type_ids: Vec<Uuid> = candidates.iter().map(|ut| ut.id).collect();

        let reserved: HashMap<Uuid, i64> =
            Reservation::count_overlapping_many(&self.db_pool, &unit_type_ids, &query.stay)
                .await?
                .into_iter()
                .collect();

        let mut rules: HashMap<Uuid, Vec<RateSpan>> = HashMap::new();
        for rule in PriceRule::find_active_overlapping_many(&self.db_pool, &unit_type_ids, &query.stay).await? {
            rules.entry(rule.unit_type_id).or_default().push(rule.to_span()?);
        }

        let mut property_ids: Vec<Uuid> = candidates.iter().map(|ut| ut.property_id).collect();
        property_ids.sort();
        property_ids.dedup();
        let plans = RatePlan::find_active_for_properties(&self.db_pool, &property_ids).await?;

        let offers: Vec<AvailabilitySearch> = candidates
            .iter()
            .filter_map(|unit_type| {
                build_offer(
                    unit_type,
                    reserved.get(&unit_type.id).copied().unwrap_or(0),
                    rules.get(&unit_type.id).map(Vec::as_slice).unwrap_or(&[]),
                    &plans,
                    query,
                )
            })
            .collect();

        debug!(
            "Availability {} for {} adults, {} children: {} of {} unit types bookable",
            query.stay,
            query.adults,
            query.children,
            offers.len(),
            candidates.len()
        );

        Ok(paginate(offers, query.pagination))
    }
}

/// Offer for one unit type, or `None` when it cannot host the party, has too
/// few free units, or has an unpriced night in the range.
pub fn build_offer(
    unit_type: &UnitType,
    reserved: i64,
    rules: &[RateSpan],
    plans: &[RatePlan],
    query: &AvailabilityQuery,
) -> Option<AvailabilitySearch> {
    if !unit_type.fits(query.adults, query.children) {
        return None;
    }

    let available_qty = i64::from(unit_type.total_quantity) - reserved;
    if available_qty <= 0 || available_qty < i64::from(query.rooms) {
        return None;
    }

    let quote = match resolve_nightly_rates(rules, &query.stay) {
        Ok(quote) => quote,
        Err(missing) => {
            debug!("Unit type {} not bookable: {}", unit_type.code, missing);
            return None;
        }
    };

    Some(AvailabilitySearch {
        unit_type: unit_type.summary(),
        available_qty,
        nights: quote.nights(),
        rate_options: rate_options(unit_type, &quote, plans, query.pax()),
    })
}

/// One option per active plan applying to the unit type; a plain room-only
/// option when none does.
pub fn rate_options(unit_type: &UnitType, quote: &NightlyQuote, plans: &[RatePlan], pax: i32) -> Vec<RateOption> {
    let options: Vec<RateOption> = plans
        .iter()
        .filter(|plan| plan.applies_to(unit_type))
        .map(|plan| rate_option(Some(plan), quote, pax))
        .collect();

    if options.is_empty() {
        vec![rate_option(None, quote, pax)]
    } else {
        options
    }
}

fn rate_option(plan: Option<&RatePlan>, quote: &NightlyQuote, pax: i32) -> RateOption {
    let breakdown = price_stay(quote, plan.map(|p| &p.meal_plan.0), pax);
    let cancellation_policy = plan
        .map(|p| p.cancellation_policy.0.clone())
        .unwrap_or_else(CancellationPolicy::default);
    let payment_policy = plan
        .map(|p| p.payment_policy.0.clone())
        .unwrap_or_else(PaymentPolicy::default);

    RateOption {
        rate_plan: plan.map(RatePlan::summary),
        nightly_rates: quote.nightly_rates.clone(),
        base_total: breakdown.base_total,
        meal_surcharge: breakdown.meal_surcharge,
        total_price: breakdown.total_price,
        prepayment_amount: payment_policy.prepayment(breakdown.total_price),
        cancellation_policy,
        payment_policy,
    }
}

pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> PaginatedResponse<T> {
    let total = items.len() as i64;
    let offset = pagination.offset();
    let data: Vec<T> = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(pagination.limit).unwrap_or(0))
        .collect();
    let has_more = offset.saturating_add(data.len() as i64) < total;

    PaginatedResponse {
        data,
        total,
        page: pagination.page,
        limit: pagination.limit,
        has_more,
    }
}
