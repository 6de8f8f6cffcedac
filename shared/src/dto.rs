use crate::policies::{CancellationPolicy, MealPlan, PaymentPolicy};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Pricing DTOs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceQuoteResponse {
    pub unit_type_id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub nights: i64,
    pub nightly_rates: Vec<NightlyRate>,
    pub total: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkPriceRequest {
    pub unit_type_id: Uuid,

    pub start: String,

    pub end: String,

    pub price: Decimal,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkPriceResponse {
    pub unit_type_id: Uuid,
    pub rules_written: usize,
    pub rules_retired: usize,
    pub active_rules: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceRuleResponse {
    pub id: Uuid,
    pub unit_type_id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub price: Decimal,
    pub priority: i32,
}

// Availability DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTypeSummary {
    pub id: Uuid,
    pub property_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub max_occupancy: i32,
    pub max_adults: i32,
    pub max_children: i32,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePlanSummary {
    pub id: Uuid,
    pub name: String,
    pub meal_plan: MealPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOption {
    pub rate_plan: Option<RatePlanSummary>,
    pub nightly_rates: Vec<NightlyRate>,
    pub base_total: Decimal,
    pub meal_surcharge: Decimal,
    pub total_price: Decimal,
    pub prepayment_amount: Decimal,
    pub cancellation_policy: CancellationPolicy,
    pub payment_policy: PaymentPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySearch {
    pub unit_type: UnitTypeSummary,
    pub available_qty: i64,
    pub nights: i64,
    pub rate_options: Vec<RateOption>,
}

// Reservation DTOs
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub unit_type_id: Uuid,

    pub rate_plan_id: Option<Uuid>,

    #[validate(email)]
    pub guest_email: String,

    #[validate(length(min = 1, max = 100))]
    pub guest_first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub guest_last_name: String,

    #[validate(length(min = 3, max = 32))]
    pub guest_phone: Option<String>,

    pub start: String,

    pub end: String,

    #[validate(range(min = 1, max = 50))]
    pub adults: i32,

    #[validate(range(min = 0, max = 50))]
    #[serde(default)]
    pub children: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationCreatedResponse {
    pub reservation_id: Uuid,
    pub reservation_code: String,
    pub status: ReservationStatus,
    pub total_price: Decimal,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuestResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub reservation_code: String,
    pub unit_type_id: Uuid,
    pub rate_plan_id: Option<Uuid>,
    pub guest: GuestResponse,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub nights: i64,
    pub adults: i32,
    pub children: i32,
    pub total_price: Decimal,
    pub nightly_rates: Vec<NightlyRate>,
    pub status: ReservationStatus,
    pub penalty_amount: Option<Decimal>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelPreviewResponse {
    pub reservation_id: Uuid,
    pub status: ReservationStatus,
    pub hours_until_check_in: i64,
    pub penalty_amount: Decimal,
    pub refund_amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelReservationResponse {
    pub reservation_id: Uuid,
    pub status: ReservationStatus,
    pub penalty_amount: Decimal,
    pub refund_amount: Decimal,
    pub message: String,
}

// Pagination
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}
