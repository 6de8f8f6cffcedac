use pms_shared::{BulkPriceRequest, BulkPriceResponse, DateRange, PriceQuoteResponse, PriceRuleResponse};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{PriceRule, UnitType};
use crate::pricing::{overlay_rule, resolve_nightly_rates, RateSpan};
use crate::services::ensure_organization_scope;
use crate::utils::validate_request;

/// Price quotes and price-rule maintenance
#[derive(Clone)]
pub struct PricingService {
    db_pool: PgPool,
}

impl PricingService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Nightly base prices for a stay, without rate-plan extras
    pub async fn quote(&self, unit_type_id: Uuid, stay: &DateRange) -> Result<PriceQuoteResponse, AppError> {
        let unit_type = UnitType::find_by_id(&self.db_pool, unit_type_id)
            .await?
            .ok_or(AppError::UnitTypeNotFound(unit_type_id))?;

        let rules = PriceRule::find_active_overlapping(&self.db_pool, unit_type.id, stay)
            .await?
            .iter()
            .map(PriceRule::to_span)
            .collect::<Result<Vec<_>, _>>()?;
        let quote = resolve_nightly_rates(&rules, stay)?;

        Ok(PriceQuoteResponse {
            unit_type_id: unit_type.id,
            start: stay.start(),
            end: stay.end(),
            nights: quote.nights(),
            nightly_rates: quote.nightly_rates,
            total: quote.total,
        })
    }

    pub async fn list_rules(
        &self,
        unit_type_id: Uuid,
        scope: Option<Uuid>,
    ) -> Result<Vec<PriceRuleResponse>, AppError> {
        let unit_type = UnitType::find_by_id(&self.db_pool, unit_type_id)
            .await?
            .ok_or(AppError::UnitTypeNotFound(unit_type_id))?;
        ensure_organization_scope(scope, unit_type.organization_id)?;

        let rules = PriceRule::find_active_by_unit_type(&self.db_pool, unit_type.id).await?;
        Ok(rules.iter().map(PriceRule::to_response).collect())
    }

    /// Lay a new price over a date range of one unit type.
    ///
    /// Rules the new range cuts into are retired and their uncovered parts
    /// re-inserted, so active rules stay disjoint. The unit type row is
    /// locked for the duration, serializing writers per unit type.
    pub async fn apply_bulk_price(
        &self,
        scope: Option<Uuid>,
        request: BulkPriceRequest,
    ) -> Result<BulkPriceResponse, AppError> {
        validate_request(&request)?;
        let range = DateRange::parse(&request.start, &request.end)?;
        if request.price <= Decimal::ZERO {
            return Err(AppError::Validation("price must be greater than zero".to_string()));
        }

        let mut tx = self.db_pool.begin().await?;

        let unit_type = UnitType::lock_for_update(&mut *tx, request.unit_type_id)
            .await?
            .ok_or(AppError::UnitTypeNotFound(request.unit_type_id))?;
        ensure_organization_scope(scope, unit_type.organization_id)?;

        let existing = PriceRule::find_active_by_unit_type(&mut *tx, unit_type.id)
            .await?
            .iter()
            .map(PriceRule::to_span)
            .collect::<Result<Vec<_>, _>>()?;

        let overlay = overlay_rule(&existing, RateSpan::new(range, request.price, request.priority));

        PriceRule::soft_delete_many(&mut *tx, &overlay.retired).await?;

        let mut rules_written = 0;
        for rule in overlay.inserted() {
            PriceRule::insert(&mut *tx, unit_type.id, &rule.range, rule.price, rule.priority).await?;
            rules_written += 1;
        }

        tx.commit().await?;

        info!(
            "Price {} set on unit type {} for {}: {} rules written, {} retired",
            request.price,
            unit_type.id,
            range,
            rules_written,
            overlay.retired.len()
        );

        Ok(BulkPriceResponse {
            unit_type_id: unit_type.id,
            rules_written,
            rules_retired: overlay.retired.len(),
            active_rules: overlay.rules.len(),
        })
    }
}
