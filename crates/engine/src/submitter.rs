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

//! Submission, confirmation and the per-wallet retry loop.

use std::{sync::Arc, time::Duration};

use alloy_primitives::B256;
use alloy_rpc_types_eth::TransactionReceipt;
use massbridge_provider::EvmProvider;
use massbridge_types::{chain, WalletOutcome, WalletResult};
use metrics::Counter;
use metrics_derive::Metrics;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::{
    BridgeError, BridgeRequest, SignedBridgeTx, TransactionPipeline, TransactionSender,
    TxSenderError,
};

/// Settings for the retry submitter.
#[derive(Clone, Copy, Debug)]
pub struct SubmitterSettings {
    /// Attempt budget per wallet; each attempt is a fresh prepare + submit.
    pub max_attempts: u32,
    /// How long to poll for a receipt before declaring the attempt timed out.
    pub confirmation_timeout: Duration,
    /// Pause between receipt polls.
    pub poll_interval: Duration,
    /// Pause before a retry attempt, letting the next block's fee data land.
    pub retry_delay: Duration,
    /// Percent increase over the previous attempt's fees when retrying
    /// while that attempt's transaction may still be pending. Nodes reject
    /// same-nonce replacements that don't outbid the original.
    pub replacement_fee_percent_increase: u32,
}

impl Default for SubmitterSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            confirmation_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(3),
            retry_delay: Duration::from_secs(2),
            replacement_fee_percent_increase: 10,
        }
    }
}

/// Outcome of a single submit attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Receipt observed with success status.
    Success {
        /// Hash of the confirmed transaction.
        tx_hash: B256,
        /// The confirming receipt.
        receipt: TransactionReceipt,
    },
    /// The attempt failed but a fresh prepare + submit may succeed.
    Retryable(BridgeError),
    /// The attempt failed in a way more attempts cannot fix.
    Fatal(BridgeError),
}

/// Drives a wallet's bridge to a terminal outcome.
///
/// State machine per attempt: prepare (build + sign) → submit → poll for the
/// receipt → classify. A retry never resubmits the previous bytes: fees and
/// possibly the nonce have moved, so each attempt re-enters
/// [`TransactionPipeline::prepare`].
pub struct RetrySubmitter<P, S> {
    pipeline: TransactionPipeline<P>,
    provider: Arc<P>,
    sender: S,
    settings: SubmitterSettings,
    metrics: SubmitterMetrics,
}

impl<P: EvmProvider, S: TransactionSender> RetrySubmitter<P, S> {
    /// Create a new submitter. `provider` is the source chain handle used
    /// for receipt polling.
    pub fn new(
        pipeline: TransactionPipeline<P>,
        provider: Arc<P>,
        sender: S,
        settings: SubmitterSettings,
    ) -> Self {
        Self {
            pipeline,
            provider,
            sender,
            settings,
            metrics: SubmitterMetrics::default(),
        }
    }

    /// Run one wallet through its attempt budget.
    pub async fn bridge_wallet(&self, request: &BridgeRequest) -> WalletResult {
        let wallet = request.wallet();
        let mut last_error: Option<BridgeError> = None;
        let mut all_connectivity = true;
        let mut min_fees = None;

        for attempt in 1..=self.settings.max_attempts {
            if attempt > 1 {
                sleep(self.settings.retry_delay).await;
            }

            let outcome = match self.pipeline.prepare(request, min_fees).await {
                Ok(tx) => {
                    let outcome = self.submit(&tx).await;
                    if matches!(outcome, AttemptOutcome::Retryable(_)) {
                        // The transaction may sit in the pool; the next
                        // attempt has to outbid it to replace the nonce.
                        min_fees = Some(
                            tx.fees
                                .increase_by_percent(self.settings.replacement_fee_percent_increase),
                        );
                    }
                    outcome
                }
                Err(err) if err.is_retryable() => AttemptOutcome::Retryable(err),
                Err(err) => AttemptOutcome::Fatal(err),
            };

            match outcome {
                AttemptOutcome::Success { tx_hash, receipt } => {
                    info!(
                        %wallet,
                        %tx_hash,
                        url = %chain::source_explorer_tx_url(tx_hash),
                        "bridge confirmed"
                    );
                    return WalletResult {
                        wallet,
                        attempts: attempt,
                        outcome: WalletOutcome::Success {
                            tx_hash,
                            block_number: receipt.block_number,
                            gas_used: receipt.gas_used,
                        },
                    };
                }
                AttemptOutcome::Retryable(err) => {
                    self.metrics.retryable_failures.increment(1);
                    warn!(
                        %wallet,
                        attempt,
                        max_attempts = self.settings.max_attempts,
                        error = %err,
                        "attempt failed; will retry with fresh nonce and fees"
                    );
                    all_connectivity &= err.is_connectivity();
                    last_error = Some(err);
                }
                AttemptOutcome::Fatal(err) => {
                    warn!(%wallet, attempt, error = %err, "wallet failed fatally");
                    return WalletResult {
                        wallet,
                        attempts: attempt,
                        outcome: WalletOutcome::Failed {
                            reason: err.to_string(),
                            connectivity: false,
                        },
                    };
                }
            }
        }

        let reason = last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "attempt budget exhausted".to_string());
        WalletResult {
            wallet,
            attempts: self.settings.max_attempts,
            outcome: WalletOutcome::Failed {
                reason,
                connectivity: all_connectivity,
            },
        }
    }

    /// Submit a prepared transaction and poll for its receipt.
    pub async fn submit(&self, tx: &SignedBridgeTx) -> AttemptOutcome {
        self.metrics.attempts.increment(1);
        match self.sender.send_transaction(tx.raw.clone()).await {
            Ok(tx_hash) => {
                debug!(%tx_hash, nonce = tx.nonce, "transaction submitted");
                self.wait_for_receipt(tx_hash).await
            }
            Err(TxSenderError::AlreadyKnown) => {
                // The pool already has these exact bytes; poll for the hash
                // computed at signing time.
                debug!(tx_hash = %tx.tx_hash, "transaction already known to the pool");
                self.wait_for_receipt(tx.tx_hash).await
            }
            Err(err) => {
                let error = BridgeError::Sender(err);
                if error.is_retryable() {
                    AttemptOutcome::Retryable(error)
                } else {
                    AttemptOutcome::Fatal(error)
                }
            }
        }
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> AttemptOutcome {
        let deadline = Instant::now() + self.settings.confirmation_timeout;
        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    return if receipt.status() {
                        AttemptOutcome::Success { tx_hash, receipt }
                    } else {
                        AttemptOutcome::Fatal(BridgeError::Reverted { tx_hash })
                    };
                }
                Ok(None) => {}
                // A failed poll is not a verdict on the transaction; keep
                // polling until the deadline.
                Err(err) => warn!(%tx_hash, error = %err, "receipt poll failed"),
            }
            if Instant::now() >= deadline {
                return AttemptOutcome::Retryable(BridgeError::ConfirmationTimeout(
                    self.settings.confirmation_timeout,
                ));
            }
            sleep(self.settings.poll_interval).await;
        }
    }
}

#[derive(Metrics)]
#[metrics(scope = "bridge_submitter")]
struct SubmitterMetrics {
    #[metric(describe = "the number of transaction attempts submitted.")]
    attempts: Counter,
    #[metric(describe = "the number of attempts that failed retryably.")]
    retryable_failures: Counter,
}
