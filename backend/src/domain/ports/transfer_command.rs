//! Driving port for moving funds between client accounts.

use async_trait::async_trait;

use crate::domain::Error;

/// Move `amount` reais from one client to another.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub sender_id: String,
    pub destination_id: String,
    pub amount: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferCommand: Send + Sync {
    /// Debit the sender and credit the destination atomically.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for a self-transfer, an invalid
    /// amount or an insufficient balance, and a not-found error when either
    /// party is missing.
    async fn transfer(&self, request: TransferRequest) -> Result<(), Error>;
}

/// Fixture transfer command that accepts every distinct pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTransferCommand;

#[async_trait]
impl TransferCommand for FixtureTransferCommand {
    async fn transfer(&self, request: TransferRequest) -> Result<(), Error> {
        if request.sender_id == request.destination_id {
            return Err(Error::invalid_request("Cannot transfer to the same account."));
        }
        Ok(())
    }
}
