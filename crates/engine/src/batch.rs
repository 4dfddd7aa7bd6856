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

use massbridge_provider::EvmProvider;
use massbridge_types::{RunStatistics, WalletResult};
use metrics::Counter;
use metrics_derive::Metrics;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{BridgeRequest, RetrySubmitter, TransactionSender};

/// Processes a batch of bridge requests strictly sequentially.
///
/// One wallet is driven to a terminal outcome before the next begins, with
/// a configurable pause between wallets. No wallet failure aborts the
/// batch; every wallet contributes a result to the final statistics.
pub struct BatchRunner<P, S> {
    submitter: RetrySubmitter<P, S>,
    inter_wallet_delay: Duration,
    metrics: BatchMetrics,
}

impl<P: EvmProvider, S: TransactionSender> BatchRunner<P, S> {
    /// Create a new batch runner.
    pub fn new(submitter: RetrySubmitter<P, S>, inter_wallet_delay: Duration) -> Self {
        Self {
            submitter,
            inter_wallet_delay,
            metrics: BatchMetrics::default(),
        }
    }

    /// Bridge every wallet in order and fold the outcomes into statistics.
    ///
    /// Cancellation is honored between wallets: a wallet whose attempt has
    /// already been submitted is still driven to its outcome and recorded,
    /// since a broadcast transaction cannot be un-sent.
    pub async fn run(
        &self,
        requests: &[BridgeRequest],
        cancel: CancellationToken,
    ) -> RunStatistics {
        let mut results: Vec<WalletResult> = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    processed = results.len(),
                    remaining = requests.len() - results.len(),
                    "batch interrupted; skipping remaining wallets"
                );
                break;
            }
            if index > 0 && !self.inter_wallet_delay.is_zero() {
                debug!(delay = ?self.inter_wallet_delay, "pausing between wallets");
                tokio::select! {
                    _ = cancel.cancelled() => continue,
                    _ = tokio::time::sleep(self.inter_wallet_delay) => {}
                }
            }

            info!(
                wallet = %request.wallet(),
                index = index + 1,
                total = requests.len(),
                "bridging wallet"
            );
            let result = self.submitter.bridge_wallet(request).await;
            if result.outcome.is_success() {
                self.metrics.wallets_succeeded.increment(1);
            } else {
                self.metrics.wallets_failed.increment(1);
            }
            results.push(result);
        }

        let stats = RunStatistics::from_results(&results);
        info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            success_rate = stats.success_rate(),
            "batch complete"
        );
        if stats.connectivity_streak > 1 {
            warn!(
                streak = stats.connectivity_streak,
                "consecutive wallets failed every attempt at the RPC boundary; check node connectivity"
            );
        }
        stats
    }
}

#[derive(Metrics)]
#[metrics(scope = "bridge_batch")]
struct BatchMetrics {
    #[metric(describe = "the number of wallets whose bridge confirmed.")]
    wallets_succeeded: Counter,
    #[metric(describe = "the number of wallets that failed all attempts.")]
    wallets_failed: Counter,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_consensus::{Receipt, ReceiptEnvelope, ReceiptWithBloom};
    use alloy_primitives::{Address, Bloom, B256, U256};
    use alloy_rpc_types_eth::{FeeHistory, TransactionReceipt};
    use massbridge_provider::{FeeEstimator, FeeEstimatorConfig, MockEvmProvider};
    use massbridge_types::BridgeMode;
    use mockall::Sequence;

    use super::*;
    use crate::{
        sender::MockTransactionSender, SubmitterSettings, TransactionPipeline, TxSenderError,
    };

    const GWEI: u128 = 1_000_000_000;

    fn requests(keys: &[&str]) -> Vec<BridgeRequest> {
        keys.iter()
            .map(|key| BridgeRequest {
                signer: key.parse().unwrap(),
                amount: U256::from(1_000_000u64),
                mode: BridgeMode::BaseStandardBridge,
            })
            .collect()
    }

    fn success_receipt() -> TransactionReceipt {
        TransactionReceipt {
            inner: ReceiptEnvelope::Eip1559(ReceiptWithBloom {
                receipt: Receipt {
                    status: true.into(),
                    cumulative_gas_used: 90_000,
                    logs: vec![],
                },
                logs_bloom: Bloom::default(),
            }),
            transaction_hash: B256::ZERO,
            transaction_index: None,
            block_hash: None,
            block_number: Some(42),
            gas_used: 90_000,
            effective_gas_price: 0,
            blob_gas_used: None,
            blob_gas_price: None,
            from: Address::ZERO,
            to: None,
            contract_address: None,
        }
    }

    fn mock_prepare_calls(provider: &mut MockEvmProvider) {
        provider.expect_fee_history().returning(|_, _, _| {
            Ok(FeeHistory {
                base_fee_per_gas: vec![100 * GWEI],
                reward: Some(vec![vec![2 * GWEI]]),
                ..Default::default()
            })
        });
        provider
            .expect_get_balance()
            .returning(|_| Ok(U256::from(10u128.pow(18))));
        provider
            .expect_get_transaction_count()
            .returning(|_| Ok(0));
    }

    fn runner(
        provider: MockEvmProvider,
        sender: MockTransactionSender,
    ) -> BatchRunner<MockEvmProvider, MockTransactionSender> {
        let provider = Arc::new(provider);
        let estimator = FeeEstimator::new(provider.clone(), None, FeeEstimatorConfig::default());
        let pipeline = TransactionPipeline::new(provider.clone(), estimator);
        let settings = SubmitterSettings {
            retry_delay: Duration::from_millis(1),
            ..Default::default()
        };
        let submitter = RetrySubmitter::new(pipeline, provider, sender, settings);
        BatchRunner::new(submitter, Duration::ZERO)
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_wallet_does_not_stop_the_batch() {
        let mut provider = MockEvmProvider::new();
        mock_prepare_calls(&mut provider);
        provider
            .expect_get_transaction_receipt()
            .returning(|_| Ok(Some(success_receipt())));

        // First wallet burns all three attempts on underpriced rejections;
        // the second confirms on its first try.
        let mut sender = MockTransactionSender::new();
        let mut seq = Sequence::new();
        sender
            .expect_send_transaction()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|_| Err(TxSenderError::Underpriced));
        sender
            .expect_send_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(B256::repeat_byte(1)));

        let runner = runner(provider, sender);
        let stats = runner
            .run(
                &requests(&[
                    "1111111111111111111111111111111111111111111111111111111111111111",
                    "2222222222222222222222222222222222222222222222222222222222222222",
                ]),
                CancellationToken::new(),
            )
            .await;

        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.success_rate(), 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_batch_processes_nothing() {
        let provider = MockEvmProvider::new();
        let sender = MockTransactionSender::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let runner = runner(provider, sender);
        let stats = runner
            .run(
                &requests(&[
                    "1111111111111111111111111111111111111111111111111111111111111111",
                ]),
                cancel,
            )
            .await;

        assert_eq!(stats.total(), 0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_yields_defined_statistics() {
        let provider = MockEvmProvider::new();
        let sender = MockTransactionSender::new();

        let runner = runner(provider, sender);
        let stats = runner.run(&[], CancellationToken::new()).await;

        assert_eq!(stats.total(), 0);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
