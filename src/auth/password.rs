use crate::error::AppError;
use actix_web::web;
use bcrypt::{hash, verify};

/// Runs bcrypt on actix's blocking thread pool so request workers are not stalled.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash at the same cost, checked when no account matches a login.
    decoy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        Ok(Self {
            cost,
            decoy_hash: hash_password("decoy-password", cost)?,
        })
    }

    pub async fn hash(&self, password: String) -> Result<String, AppError> {
        let cost = self.cost;
        web::block(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))?
    }

    pub async fn verify(&self, password: String, hashed_password: String) -> Result<bool, AppError> {
        web::block(move || verify_password(&password, &hashed_password))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Verification task failed: {}", e)))?
    }

    /// Spends the same bcrypt work as `verify` when there is no account to check against,
    /// so unknown emails and wrong passwords take comparable time.
    pub async fn verify_decoy(&self, password: String) -> Result<(), AppError> {
        self.verify(password, self.decoy_hash.clone()).await.map(|_| ())
    }
}

/// Hashes `password` with bcrypt at the given work factor.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost bcrypt accepts; keeps the suite fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, TEST_COST).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same", TEST_COST).unwrap();
        let second = hash_password("same", TEST_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[actix_rt::test]
    async fn test_hasher_round_trip_on_blocking_pool() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let hashed = hasher.hash("s3cret!".to_string()).await.unwrap();
        assert!(hasher.verify("s3cret!".to_string(), hashed.clone()).await.unwrap());
        assert!(!hasher.verify("nope".to_string(), hashed).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_decoy_verification_uses_configured_cost() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        assert!(hasher.decoy_hash.starts_with("$2b$04$"));
        assert!(hasher.verify_decoy("anything".to_string()).await.is_ok());
    }

    #[test]
    fn test_hasher_rejects_invalid_cost() {
        assert!(PasswordHasher::new(99).is_err());
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        assert!(matches!(
            hash_password("pw", 99),
            Err(AppError::InternalServerError(_))
        ));
    }
}
