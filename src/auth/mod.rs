pub mod jwt;
pub mod password;

use crate::core::models::user::Role;
use jwt::Claims;

/// Identity of the caller, decoded from a verified bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            id: claims.id,
            role: claims.role,
        }
    }
}
