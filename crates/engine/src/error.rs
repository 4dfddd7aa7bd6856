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

use std::time::Duration;

use alloy_primitives::{B256, U256};
use massbridge_provider::{FeeEstimatorError, ProviderError};

use crate::sender::TxSenderError;

/// Errors that can fail a single bridge attempt.
///
/// Retryable errors send the wallet back through a fresh
/// [`prepare`](crate::TransactionPipeline::prepare); fatal ones stop the
/// wallet immediately. Neither escapes the engine: the batch runner records
/// the terminal outcome and moves on.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Bridge amount was zero.
    #[error("bridge amount must be greater than zero")]
    InvalidAmount,
    /// The wallet cannot cover value plus worst-case gas.
    #[error("insufficient balance: have {balance} wei, need at least {required} wei")]
    InsufficientBalance {
        /// Current source-chain balance.
        balance: U256,
        /// Minimum balance the attempt would have needed.
        required: U256,
    },
    /// Fee data could not be quoted.
    #[error(transparent)]
    FeeUnavailable(#[from] FeeEstimatorError),
    /// The node rejected the submission.
    #[error(transparent)]
    Sender(#[from] TxSenderError),
    /// No receipt within the confirmation window.
    #[error("no receipt observed within {0:?}")]
    ConfirmationTimeout(Duration),
    /// The transaction mined but reverted.
    #[error("transaction {tx_hash} reverted")]
    Reverted {
        /// Hash of the reverted transaction.
        tx_hash: B256,
    },
    /// Signing failed.
    #[error("signing failed: {0}")]
    Signer(#[from] alloy_signer::Error),
    /// A chain read failed outside of submission.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl BridgeError {
    /// Whether a fresh prepare/submit cycle can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidAmount
            | Self::InsufficientBalance { .. }
            | Self::Reverted { .. }
            | Self::Signer(_) => false,
            Self::FeeUnavailable(_) | Self::ConfirmationTimeout(_) | Self::Provider(_) => true,
            Self::Sender(err) => err.is_retryable(),
        }
    }

    /// Whether the failure happened at the RPC boundary rather than being a
    /// verdict about the wallet or transaction. Wallets that fail every
    /// attempt this way feed the run-level connectivity signal.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::FeeUnavailable(_) | Self::Provider(_) | Self::Sender(TxSenderError::Connection(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_fatal() {
        assert!(!BridgeError::InvalidAmount.is_retryable());
        assert!(!BridgeError::InsufficientBalance {
            balance: U256::ZERO,
            required: U256::from(1),
        }
        .is_retryable());
        assert!(!BridgeError::Reverted { tx_hash: B256::ZERO }.is_retryable());
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(BridgeError::ConfirmationTimeout(Duration::from_secs(300)).is_retryable());
        assert!(BridgeError::Sender(TxSenderError::Underpriced).is_retryable());
        assert!(!BridgeError::Sender(TxSenderError::InsufficientFunds).is_retryable());
    }

    #[test]
    fn test_connectivity_classification() {
        assert!(
            BridgeError::Sender(TxSenderError::Connection("connection refused".into()))
                .is_connectivity()
        );
        assert!(!BridgeError::Sender(TxSenderError::Underpriced).is_connectivity());
        assert!(!BridgeError::ConfirmationTimeout(Duration::from_secs(1)).is_connectivity());
    }
}
