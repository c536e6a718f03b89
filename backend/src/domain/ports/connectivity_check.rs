//! Port for checking that a backing service answers.
//!
//! The detailed health report runs one check per dependency and records how
//! long each took.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failure reported by a connectivity check.
    pub enum ConnectivityCheckError {
        /// The dependency did not answer.
        Unavailable { message: String } => "{message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    /// Issue a trivial round trip to the dependency.
    async fn check(&self) -> Result<(), ConnectivityCheckError>;
}

/// Check that always succeeds, used when the dependency is in-process.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConnectivityCheck;

#[async_trait]
impl ConnectivityCheck for FixtureConnectivityCheck {
    async fn check(&self) -> Result<(), ConnectivityCheckError> {
        Ok(())
    }
}
