use crate::core::errors::MedipassError;

/// bcrypt is CPU-bound, so both helpers run on the blocking pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, MedipassError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| MedipassError::InternalServerError(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| MedipassError::InternalServerError(format!("Password hashing error: {}", e)))
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, MedipassError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| MedipassError::InternalServerError(format!("Password verification task failed: {}", e)))?
        .map_err(|e| MedipassError::InternalServerError(format!("Password verification error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_salted_and_verifiable() {
        let first = hash_password("secret1", 4).await.unwrap();
        let second = hash_password("secret1", 4).await.unwrap();

        assert_ne!(first, "secret1");
        assert_ne!(first, second);
        assert!(verify_password("secret1", &first).await.unwrap());
        assert!(!verify_password("secret2", &first).await.unwrap());
    }
}
