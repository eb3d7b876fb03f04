use crate::api::handlers::AppState;
use crate::api::models::ApiError;
use crate::auth::AuthUser;
use crate::core::errors::MedipassError;
use crate::core::models::user::Role;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

/// Verifies the bearer token and attaches the caller's [`AuthUser`].
pub async fn require_auth(State(service): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MedipassError::Unauthenticated("No token, authorization denied".to_string()))?;

    let claims = service.validate_token(token)?;
    req.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(req).await)
}

pub fn authorize(user: Option<&AuthUser>, roles: &[Role]) -> Result<(), MedipassError> {
    let user = user.ok_or_else(|| MedipassError::Unauthenticated("Authentication required".to_string()))?;
    if !roles.contains(&user.role) {
        tracing::debug!(user_id = %user.id, role = %user.role, "Role not permitted");
        return Err(MedipassError::Forbidden);
    }
    Ok(())
}

pub async fn require_patient(req: Request, next: Next) -> Result<Response, ApiError> {
    authorize(req.extensions().get::<AuthUser>(), &[Role::Patient])?;
    Ok(next.run(req).await)
}

pub async fn require_doctor(req: Request, next: Next) -> Result<Response, ApiError> {
    authorize(req.extensions().get::<AuthUser>(), &[Role::Doctor])?;
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError(MedipassError::Unauthenticated("Authentication required".to_string())))
    }
}
