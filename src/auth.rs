use std::future::{ready, Ready};

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use actix_web::{dev::Payload, FromRequest, HttpRequest, HttpResponse, ResponseError};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Customer,
    Seller,
}

impl CallerRole {
    pub fn parse(role: &str) -> Result<CallerRole, String> {
        match role {
            "customer" => Ok(CallerRole::Customer),
            "seller" => Ok(CallerRole::Seller),
            _ => Err(format!("{} is not a valid caller role", role)),
        }
    }
}

/// Identity attached to a request by the upstream authentication gateway.
///
/// The gateway terminates authentication and forwards the verified identity
/// as headers; this service only reads them back.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: CallerRole,
}

impl Caller {
    pub fn require_seller(&self) -> Result<(), AuthError> {
        match self.role {
            CallerRole::Seller => Ok(()),
            CallerRole::Customer => Err(AuthError::Forbidden),
        }
    }
}

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Missing or invalid caller identity.")]
    InvalidIdentity,
    #[error("Caller role is not allowed to access this resource.")]
    Forbidden,
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidIdentity => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "message": self.to_string() }))
    }
}

impl FromRequest for Caller {
    type Error = AuthError;
    type Future = Ready<Result<Caller, AuthError>>;

    fn from_request(request: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_caller(request.headers()))
    }
}

fn extract_caller(headers: &HeaderMap) -> Result<Caller, AuthError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(AuthError::InvalidIdentity)?;

    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::InvalidIdentity)
        .and_then(|value| CallerRole::parse(value).map_err(|_| AuthError::InvalidIdentity))?;

    Ok(Caller { user_id, role })
}
