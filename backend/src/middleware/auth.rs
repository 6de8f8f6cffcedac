use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::jwt::{Claims, JwtService};
use pms_shared::UserRole;

/// Authenticated staff principal extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
}

impl AuthenticatedUser {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("Invalid user ID in token".to_string()))?;

        if claims.role != UserRole::Admin && claims.organization_id.is_none() {
            return Err(AppError::Authentication(
                "Token is missing the organization claim".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            role: claims.role,
            organization_id: claims.organization_id,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Organization the principal is confined to; `None` for platform admins.
    pub fn organization_scope(&self) -> Option<Uuid> {
        if self.is_admin() {
            None
        } else {
            self.organization_id
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator role required".to_string()))
        }
    }

    /// Admins manage every organization; owners and managers manage their own.
    pub fn require_inventory_manager(&self) -> Result<(), AppError> {
        if self.role.can_manage_inventory() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient permissions for this operation".to_string(),
            ))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::Internal("JWT service is not configured".to_string()))?;

    let token = bearer_token(req)
        .ok_or_else(|| AppError::Authentication("Authorization token is required".to_string()))?;

    let claims = jwt_service.validate_token(token)?;
    AuthenticatedUser::from_claims(&claims)
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-for-testing-only-must-be-at-least-32-chars";

    fn request_with(token: Option<&str>) -> HttpRequest {
        let jwt = JwtService::new(SECRET).unwrap();
        let mut builder = TestRequest::default().app_data(web::Data::new(jwt));
        if let Some(token) = token {
            builder = builder.insert_header(("Authorization", format!("Bearer {}", token)));
        }
        builder.to_http_request()
    }

    #[test]
    fn test_missing_token_is_unauthenticated() {
        let err = authenticate(&request_with(None)).unwrap_err();
        assert_eq!(err.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_valid_token_yields_scoped_principal() {
        let jwt = JwtService::new(SECRET).unwrap();
        let organization_id = Uuid::new_v4();
        let token = jwt
            .issue_token(Uuid::new_v4(), UserRole::Owner, Some(organization_id), Duration::hours(1))
            .unwrap();

        let user = authenticate(&request_with(Some(&token))).unwrap();

        assert_eq!(user.organization_scope(), Some(organization_id));
        assert!(user.require_inventory_manager().is_ok());
        assert!(user.require_admin().is_err());
    }

    #[test]
    fn test_admin_is_unscoped() {
        let jwt = JwtService::new(SECRET).unwrap();
        let token = jwt
            .issue_token(Uuid::new_v4(), UserRole::Admin, None, Duration::hours(1))
            .unwrap();

        let admin = authenticate(&request_with(Some(&token))).unwrap();

        assert!(admin.is_admin());
        assert_eq!(admin.organization_scope(), None);
    }

    #[test]
    fn test_staff_cannot_manage_inventory() {
        let staff = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Staff,
            organization_id: Some(Uuid::new_v4()),
        };
        assert_eq!(staff.require_inventory_manager().unwrap_err().code(), "FORBIDDEN");
    }

    #[test]
    fn test_non_admin_without_organization_is_rejected() {
        let jwt = JwtService::new(SECRET).unwrap();
        let token = jwt
            .issue_token(Uuid::new_v4(), UserRole::Manager, None, Duration::hours(1))
            .unwrap();

        assert!(authenticate(&request_with(Some(&token))).is_err());
    }
}
