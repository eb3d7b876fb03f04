use super::{MedipassService, validate_email, validate_string_input};
use crate::auth::AuthUser;
use crate::auth::password::{hash_password, verify_password};
use crate::core::constants::{MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH, USER_REGISTERED};
use crate::core::errors::MedipassError;
use crate::core::models::{
    Profile,
    doctor::Doctor,
    patient::Patient,
    user::{Registration, Role, User, UserSummary},
};
use chrono::Utc;
use uuid::Uuid;

impl MedipassService {
    /// Creates the account and its role-specific profile in one storage call.
    pub async fn register(&self, registration: Registration) -> Result<UserSummary, MedipassError> {
        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(MedipassError::MissingField("name".to_string()));
        }
        validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        let email = validate_email(&registration.email)?;
        if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(MedipassError::invalid(
                "password",
                "Invalid password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        let role = registration
            .role
            .ok_or_else(|| MedipassError::MissingField("role".to_string()))?;

        let user_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let profile = match role {
            Role::Patient => Profile::Patient(Patient::new(
                Uuid::new_v4().to_string(),
                user_id.clone(),
                generate_medipass_id(),
                now,
            )),
            Role::Doctor => {
                let specialty = required_trimmed("specialty", registration.specialty)?;
                let license_number = required_trimmed("licenseNumber", registration.license_number)?;
                validate_string_input("specialty", &specialty, MAX_NAME_LENGTH)?;
                validate_string_input("licenseNumber", &license_number, MAX_NAME_LENGTH)?;
                let hospital_affiliation = registration
                    .hospital_affiliation
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty());
                Profile::Doctor(Doctor::new(
                    Uuid::new_v4().to_string(),
                    user_id.clone(),
                    specialty,
                    license_number,
                    hospital_affiliation,
                    now,
                ))
            }
        };

        let password_hash = hash_password(&registration.password, self.bcrypt_cost).await?;
        let user = User {
            id: user_id,
            name,
            email,
            password_hash,
            role,
            created_at: now,
        };
        let summary = UserSummary::from(&user);

        self.storage.register_account(user, profile).await?;
        tracing::info!(user_id = %summary.id, role = %summary.role, "User registered");

        let actor = AuthUser {
            id: summary.id.clone(),
            role,
        };
        self.log_and_audit(USER_REGISTERED, &actor, None, Some(summary.id.as_str())).await?;
        Ok(summary)
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, UserSummary), MedipassError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(MedipassError::InvalidCredentials);
        }

        let Some(user) = self.storage.get_user_by_email(&email).await? else {
            tracing::info!("Login rejected: unknown email");
            return Err(MedipassError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(MedipassError::InvalidCredentials);
        }

        let token = self.jwt_service.generate_token(&user.id, user.role)?;
        Ok((token, UserSummary::from(&user)))
    }

    pub async fn current_user(&self, user: &AuthUser) -> Result<UserSummary, MedipassError> {
        self.storage
            .get_user(&user.id)
            .await?
            .map(|u| UserSummary::from(&u))
            .ok_or_else(|| MedipassError::UserNotFound(user.id.clone()))
    }
}

fn required_trimmed(field: &str, value: Option<String>) -> Result<String, MedipassError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| MedipassError::MissingField(field.to_string()))
}

/// `MP` followed by eight upper-case hex digits.
fn generate_medipass_id() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("MP{}", simple[..8].to_uppercase())
}
