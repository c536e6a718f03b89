//! Port for one-way password hashing.
//!
//! Entities never hash; the create and update use cases pass plaintext
//! through this port and store only the digest.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hasher adapters.
    pub enum PasswordHasherError {
        /// Hashing or verification could not complete.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a digest for `password`.
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check `password` against a previously produced digest.
    async fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHasherError>;
}

/// Deterministic, non-cryptographic hasher for tests and local runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl FixturePasswordHasher {
    const PREFIX: &'static str = "fixture$";
}

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("{}{password}", Self::PREFIX))
    }

    async fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHasherError> {
        Ok(digest
            .strip_prefix(Self::PREFIX)
            .is_some_and(|stored| stored == password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_hash_round_trips() {
        let hasher = FixturePasswordHasher;
        let digest = hasher.hash("secret").await.expect("hash");
        assert_ne!(digest, "secret");
        assert!(hasher.verify("secret", &digest).await.expect("verify"));
        assert!(!hasher.verify("other", &digest).await.expect("verify"));
        assert!(!hasher.verify("secret", "secret").await.expect("verify"));
    }
}
