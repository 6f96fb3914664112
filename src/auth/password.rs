use crate::error::AppError;
use bcrypt::{hash, verify};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, 12) // bcrypt default cost is 12
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Constant-time verification against a stored hash. An incorrect password is
/// `Ok(false)`, never an error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "correct horse battery";
        let hashed = hash_password(password).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Salted hashing: two hashes of the same input must differ.
        let a = hash_password("repeatable").unwrap();
        let b = hash_password("repeatable").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("anything", "invalidhashformat") {
            Err(AppError::Internal(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {
                // bcrypt may also report a malformed hash as a plain mismatch.
            }
            Ok(true) => panic!("verification must not succeed against a malformed hash"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
