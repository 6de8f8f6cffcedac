use regex::Regex;
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

use crate::error::AppError;
use pms_shared::CreateReservationRequest;

const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 ()\-]{2,31}$";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

/// Run derive-based validation and convert failures into `VALIDATION_ERROR`
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(AppError::from)
}

/// Emails are compared case-insensitively and without surrounding blanks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate phone number format
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if !phone_regex().is_match(phone) {
        return Err(ValidationError::new("invalid_phone_format"));
    }

    Ok(())
}

/// Guest details ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Normalize the guest part of a booking request. Names are trimmed and must
/// stay non-empty; a blank phone counts as absent.
pub fn guest_details(request: &CreateReservationRequest) -> Result<GuestDetails, AppError> {
    let first_name = request.guest_first_name.trim();
    let last_name = request.guest_last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation("guest name must not be blank".to_string()));
    }

    let phone = request
        .guest_phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty());
    if let Some(phone) = phone {
        validate_phone_number(phone)
            .map_err(|_| AppError::Validation(format!("invalid phone number '{}'", phone)))?;
    }

    Ok(GuestDetails {
        email: normalize_email(&request.guest_email),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: phone.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    fn request() -> CreateReservationRequest {
        CreateReservationRequest {
            unit_type_id: Uuid::new_v4(),
            rate_plan_id: None,
            guest_email: "  Ana.Lopez@Example.COM ".to_string(),
            guest_first_name: " Ana ".to_string(),
            guest_last_name: "Lopez".to_string(),
            guest_phone: Some(" +34 600 123 456 ".to_string()),
            start: "2025-06-02".to_string(),
            end: "2025-06-05".to_string(),
            adults: 2,
            children: 0,
        }
    }

    #[test]
    fn test_guest_details_are_normalized() {
        let details = guest_details(&request()).unwrap();

        assert_eq!(details.email, "ana.lopez@example.com");
        assert_eq!(details.first_name, "Ana");
        assert_eq!(details.phone.as_deref(), Some("+34 600 123 456"));
    }

    #[test]
    fn test_blank_phone_is_absent_and_bad_phone_rejected() {
        let mut blank = request();
        blank.guest_phone = Some("   ".to_string());
        assert_eq!(guest_details(&blank).unwrap().phone, None);

        let mut bad = request();
        bad.guest_phone = Some("call me".to_string());
        assert_eq!(guest_details(&bad).unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut blank = request();
        blank.guest_last_name = "   ".to_string();
        assert_err!(guest_details(&blank));
    }

    #[test]
    fn test_phone_number_shapes() {
        assert_ok!(validate_phone_number("+34 600 123 456"));
        assert_ok!(validate_phone_number("555 (010) 0199"));
        assert_err!(validate_phone_number("12"));
        assert_err!(validate_phone_number("phone"));
    }

    #[test]
    fn test_validate_request_maps_errors() {
        let mut invalid = request();
        invalid.adults = 0;
        let err = validate_request(&invalid).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
