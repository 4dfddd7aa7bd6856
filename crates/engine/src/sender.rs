// This file is part of Massbridge.
//
// Massbridge is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Massbridge is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Massbridge.
// If not, see https://www.gnu.org/licenses/.

use std::sync::Arc;

use alloy_primitives::{Bytes, TxHash};
use async_trait::async_trait;
use massbridge_provider::{EvmProvider, ProviderError};
#[cfg(test)]
use mockall::automock;

/// Errors from submitting a signed transaction, classified off the node's
/// error response.
#[derive(Debug, thiserror::Error)]
pub enum TxSenderError {
    /// The nonce was consumed by another transaction before this one landed.
    #[error("nonce too low")]
    NonceTooLow,
    /// Fees were below what the node will accept.
    #[error("transaction underpriced")]
    Underpriced,
    /// A transaction with this nonce is pending and the fee bump was too
    /// small to replace it.
    #[error("replacement transaction underpriced")]
    ReplacementUnderpriced,
    /// The node already has this exact transaction.
    #[error("transaction already known")]
    AlreadyKnown,
    /// The node re-checked the account and found it short.
    #[error("insufficient funds for transaction")]
    InsufficientFunds,
    /// The node could not be reached at all.
    #[error("connection error: {0}")]
    Connection(String),
    /// Any other node rejection.
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// All other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TxSenderError {
    /// Whether a fresh prepare/submit cycle with updated fees and nonce can
    /// plausibly clear the error. Structural rejections (insufficient funds,
    /// malformed payloads) cannot be retried into success.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NonceTooLow
                | Self::Underpriced
                | Self::ReplacementUnderpriced
                | Self::AlreadyKnown
                | Self::Connection(_)
        )
    }
}

impl From<ProviderError> for TxSenderError {
    fn from(value: ProviderError) -> Self {
        if value.is_transport() {
            return Self::Connection(value.to_string());
        }
        match value.rpc_error_message() {
            Some(message) => classify_rejection(&message),
            None => Self::Other(value.into()),
        }
    }
}

// Node error messages are not standardized; these substrings cover geth,
// erigon and nethermind phrasings for the cases the retry policy cares
// about.
fn classify_rejection(message: &str) -> TxSenderError {
    let lowered = message.to_lowercase();
    if lowered.contains("nonce too low") {
        TxSenderError::NonceTooLow
    } else if lowered.contains("replacement transaction underpriced") {
        TxSenderError::ReplacementUnderpriced
    } else if lowered.contains("underpriced") {
        TxSenderError::Underpriced
    } else if lowered.contains("already known") || lowered.contains("known transaction") {
        TxSenderError::AlreadyKnown
    } else if lowered.contains("insufficient funds") {
        TxSenderError::InsufficientFunds
    } else {
        TxSenderError::Rejected(message.to_string())
    }
}

/// Submits raw signed transactions to the source chain.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Send a signed raw transaction, returning its hash.
    async fn send_transaction(&self, raw: Bytes) -> Result<TxHash, TxSenderError>;
}

/// Sender that submits through `eth_sendRawTransaction` on the provider.
pub struct RawTransactionSender<P> {
    provider: Arc<P>,
}

impl<P> RawTransactionSender<P> {
    /// Create a new `RawTransactionSender`
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: EvmProvider> TransactionSender for RawTransactionSender<P> {
    async fn send_transaction(&self, raw: Bytes) -> Result<TxHash, TxSenderError> {
        Ok(self.provider.send_raw_transaction(raw).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_fee_rejections() {
        assert!(matches!(
            classify_rejection("transaction underpriced"),
            TxSenderError::Underpriced
        ));
        assert!(matches!(
            classify_rejection("replacement transaction underpriced"),
            TxSenderError::ReplacementUnderpriced
        ));
        assert!(classify_rejection("transaction underpriced").is_retryable());
    }

    #[test]
    fn test_classify_nonce_and_known() {
        assert!(matches!(
            classify_rejection("nonce too low: next nonce 3, tx nonce 1"),
            TxSenderError::NonceTooLow
        ));
        assert!(matches!(
            classify_rejection("already known"),
            TxSenderError::AlreadyKnown
        ));
        assert!(matches!(
            classify_rejection("known transaction: 0xabc"),
            TxSenderError::AlreadyKnown
        ));
    }

    #[test]
    fn test_classify_structural_rejections_are_fatal() {
        let err = classify_rejection("insufficient funds for gas * price + value");
        assert!(matches!(err, TxSenderError::InsufficientFunds));
        assert!(!err.is_retryable());

        let err = classify_rejection("invalid sender");
        assert!(matches!(err, TxSenderError::Rejected(_)));
        assert!(!err.is_retryable());
    }
}
