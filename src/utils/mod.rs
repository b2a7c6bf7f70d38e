use bcrypt::{hash, verify};

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the tests fast; production cost comes from config.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_is_never_the_plaintext() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(hashed, "secret1");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn verify_accepts_the_original_password() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert!(verify_password("secret1", &hashed).unwrap());
    }

    #[test]
    fn verify_rejects_a_wrong_password() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert!(!verify_password("secret2", &hashed).unwrap());
        assert!(!verify_password("", &hashed).unwrap());
    }

    #[test]
    fn equal_passwords_hash_to_different_strings() {
        // Salted hashing: the same input must not produce the same output.
        let a = hash_password("secret1", TEST_COST).unwrap();
        let b = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(a, b);
    }
}
