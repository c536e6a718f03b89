//! bcrypt-backed `PasswordHasher`.
//!
//! bcrypt is CPU-bound; both operations run on Tokio's
//! blocking pool with the caller's trace identifier carried across.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::TraceId;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Password hasher using bcrypt with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, PasswordHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, bcrypt::BcryptError> + Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || TraceId::sync_scope(trace_id, work))
        .await
        .map_err(|err| PasswordHasherError::hash(format!("hashing task aborted: {err}")))?
        .map_err(|err| {
            debug!(error = %err, "bcrypt operation failed");
            PasswordHasherError::hash(err.to_string())
        })
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        let password = password.to_owned();
        let cost = self.cost;
        run_blocking(move || bcrypt::hash(password, cost)).await
    }

    async fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHasherError> {
        let password = password.to_owned();
        let digest = digest.to_owned();
        run_blocking(move || bcrypt::verify(password, &digest)).await
    }
}
