use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::NaiveDate;
use pms_shared::DateRangeError;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidDateFormat(String),

    #[error("{0}")]
    InvalidDateRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No availability: {0}")]
    NoAvailability(String),

    #[error("Unit type {0} not found")]
    UnitTypeNotFound(Uuid),

    #[error("Reservation {0} not found")]
    ReservationNotFound(String),

    #[error("Rate plan {0} not found")]
    RatePlanNotFound(Uuid),

    #[error("Reservation {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Rate plan {0} is referenced by active reservations")]
    RatePlanInUse(Uuid),

    #[error("Concurrent update, retry the request: {0}")]
    SerializationFailure(String),

    #[error("Request did not complete within {0}s")]
    RequestTimeout(u64),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// A night in the requested range has no active price rule.
    pub fn missing_price(date: NaiveDate) -> Self {
        AppError::NoAvailability(format!("no price defined for {}", date))
    }

    /// Stable machine-readable code sent in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            AppError::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NoAvailability(_) => "NO_AVAILABILITY",
            AppError::UnitTypeNotFound(_) => "UNIT_TYPE_NOT_FOUND",
            AppError::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            AppError::RatePlanNotFound(_) => "RATE_PLAN_NOT_FOUND",
            AppError::AlreadyCancelled(_) => "ALREADY_CANCELLED",
            AppError::RatePlanInUse(_) => "RATE_PLAN_IN_USE",
            AppError::SerializationFailure(_) => "SERIALIZATION_FAILURE",
            AppError::RequestTimeout(_) => "REQUEST_TIMEOUT",
            AppError::Authentication(_) => "UNAUTHENTICATED",
            AppError::Authorization(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => {
                    return AppError::SerializationFailure(db_err.message().to_string());
                }
                // exclusion_violation (overlapping active price rules)
                Some("23P01") => {
                    return AppError::Conflict(db_err.message().to_string());
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

impl From<DateRangeError> for AppError {
    fn from(err: DateRangeError) -> Self {
        match err {
            DateRangeError::InvalidFormat(_) => AppError::InvalidDateFormat(err.to_string()),
            DateRangeError::NotIncreasing { .. } => AppError::InvalidDateRange(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Authentication(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidDateFormat(_)
            | AppError::InvalidDateRange(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::UnitTypeNotFound(_)
            | AppError::ReservationNotFound(_)
            | AppError::RatePlanNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoAvailability(_)
            | AppError::AlreadyCancelled(_)
            | AppError::RatePlanInUse(_)
            | AppError::SerializationFailure(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RequestTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self);
            "An internal server error occurred".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message,
        })
    }
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_errors_map_to_bad_request() {
        let format: AppError = DateRangeError::InvalidFormat("06/02/2025".to_string()).into();
        assert_eq!(format.code(), "INVALID_DATE_FORMAT");
        assert_eq!(format.status_code(), StatusCode::BAD_REQUEST);

        let start = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let range: AppError = DateRangeError::NotIncreasing { start, end }.into();
        assert_eq!(range.code(), "INVALID_DATE_RANGE");
        assert_eq!(range.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_kinds_map_to_409() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        for err in [
            AppError::missing_price(day),
            AppError::AlreadyCancelled(Uuid::nil()),
            AppError::RatePlanInUse(Uuid::nil()),
            AppError::SerializationFailure("could not serialize".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::CONFLICT, "{}", err.code());
        }
        assert_eq!(AppError::missing_price(day).code(), "NO_AVAILABILITY");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::Internal("connection refused at 10.0.0.3".to_string());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL");
    }

    #[test]
    fn test_not_found_kinds() {
        assert_eq!(
            AppError::UnitTypeNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ReservationNotFound("PRP-STD-AB12".to_string()).code(),
            "RESERVATION_NOT_FOUND"
        );
    }
}
