use actix_web::{web, HttpResponse};
use chrono::Utc;
use pms_shared::CreateReservationRequest;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::services::ReservationService;

/// Book a unit type for a guest
pub async fn create_reservation(
    request: web::Json<CreateReservationRequest>,
    reservation_service: web::Data<ReservationService>,
) -> Result<HttpResponse, AppError> {
    debug!(
        "Booking unit type {} from {} to {}",
        request.unit_type_id, request.start, request.end
    );

    let created = reservation_service.create_reservation(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Look a reservation up by its code
pub async fn get_reservation(
    code: web::Path<String>,
    reservation_service: web::Data<ReservationService>,
) -> Result<HttpResponse, AppError> {
    let reservation = reservation_service.get_by_code(&code).await?;
    Ok(HttpResponse::Ok().json(reservation))
}

pub async fn preview_cancellation(
    reservation_id: web::Path<Uuid>,
    reservation_service: web::Data<ReservationService>,
) -> Result<HttpResponse, AppError> {
    let preview = reservation_service
        .preview_cancellation(*reservation_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(preview))
}

pub async fn cancel_reservation(
    reservation_id: web::Path<Uuid>,
    reservation_service: web::Data<ReservationService>,
) -> Result<HttpResponse, AppError> {
    let cancelled = reservation_service
        .cancel_reservation(*reservation_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(cancelled))
}

/// Soft-delete a reservation (admins only). Shares its path with the lookup
/// by code, so the id arrives as a string.
pub async fn delete_reservation(
    user: AuthenticatedUser,
    reservation_id: web::Path<String>,
    reservation_service: web::Data<ReservationService>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let id = Uuid::parse_str(&reservation_id)
        .map_err(|_| AppError::ReservationNotFound(reservation_id.to_string()))?;

    reservation_service.delete_reservation(id).await?;
    debug!("User {} deleted reservation {}", user.user_id, id);

    Ok(HttpResponse::NoContent().finish())
}
