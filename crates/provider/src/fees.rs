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

use alloy_primitives::U256;
use alloy_rpc_types_eth::BlockNumberOrTag;
use massbridge_types::{math, BridgeMode, FeeQuote, GasFees};
use tracing::debug;

use crate::{EvmProvider, ProviderError};

/// Errors produced while quoting fees.
#[derive(Debug, thiserror::Error)]
pub enum FeeEstimatorError {
    /// The chain's fee data could not be retrieved or is internally
    /// inconsistent. Transient: a later attempt may see usable data.
    #[error("fee data unavailable: {0}")]
    Unavailable(String),
    /// Error from the underlying provider
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Configuration for the fee estimator.
#[derive(Clone, Copy, Debug)]
pub struct FeeEstimatorConfig {
    /// Number of blocks of fee history to read.
    pub blocks_history: u64,
    /// Reward percentile requested from the fee history.
    pub reward_percentile: f64,
    /// Percent overhead applied to the observed base fee. 20 gives the
    /// default 1.2x margin; 0 quotes the unmargined estimate.
    pub base_fee_overhead_percent: u32,
    /// Percent overhead applied to the observed priority fee.
    pub priority_fee_overhead_percent: u32,
    /// Floor for the priority fee, applied after the overhead.
    pub min_priority_fee: u128,
    /// Gas units assumed for destination-side ticket submission when a mode
    /// prepays a submission cost.
    pub l2_submission_gas_limit: u64,
}

impl Default for FeeEstimatorConfig {
    fn default() -> Self {
        Self {
            blocks_history: 10,
            reward_percentile: 20.0,
            base_fee_overhead_percent: 20,
            priority_fee_overhead_percent: 20,
            min_priority_fee: 1_000_000_000,
            l2_submission_gas_limit: 500_000,
        }
    }
}

/// Produces the per-attempt [`FeeQuote`] for a bridge transaction.
///
/// Base and priority fees come from one `eth_feeHistory` read on the source
/// chain: the last entry of the base fee series is the next block's base
/// fee, and the priority fee is the median of the per-block rewards at the
/// configured percentile. Both components get the configured percent
/// overhead to absorb drift between quoting and inclusion.
///
/// For modes that prepay a destination-side submission cost, the current
/// destination gas price times a fixed gas estimate is quoted as well; the
/// engine adds it to the transaction value.
pub struct FeeEstimator<P> {
    source: Arc<P>,
    destination: Option<Arc<P>>,
    config: FeeEstimatorConfig,
}

impl<P: EvmProvider> FeeEstimator<P> {
    /// Create a new fee estimator. `destination` is only consulted for
    /// modes with a submission cost and may be `None` otherwise.
    pub fn new(source: Arc<P>, destination: Option<Arc<P>>, config: FeeEstimatorConfig) -> Self {
        Self {
            source,
            destination,
            config,
        }
    }

    /// Quote fees for one transaction attempt.
    pub async fn quote(&self, mode: BridgeMode) -> Result<FeeQuote, FeeEstimatorError> {
        let history = self
            .source
            .fee_history(
                self.config.blocks_history,
                BlockNumberOrTag::Latest,
                &[self.config.reward_percentile],
            )
            .await?;

        let Some(&base_fee) = history.base_fee_per_gas.last() else {
            return Err(FeeEstimatorError::Unavailable(
                "fee history returned no base fees".to_string(),
            ));
        };
        let rewards = history
            .reward
            .as_deref()
            .filter(|rewards| !rewards.is_empty())
            .ok_or_else(|| {
                FeeEstimatorError::Unavailable("fee history returned no rewards".to_string())
            })?;

        let observed_priority_fee = median_priority_fee(rewards);
        let max_priority_fee_per_gas = math::increase_by_percent(
            observed_priority_fee,
            self.config.priority_fee_overhead_percent,
        )
        .max(self.config.min_priority_fee);
        let margined_base_fee =
            math::increase_by_percent(base_fee, self.config.base_fee_overhead_percent);

        let fees = GasFees {
            max_fee_per_gas: margined_base_fee + max_priority_fee_per_gas,
            max_priority_fee_per_gas,
        };

        let submission_cost = if mode.requires_submission_cost() {
            self.submission_cost().await?
        } else {
            U256::ZERO
        };

        debug!(
            base_fee,
            fees.max_fee_per_gas,
            fees.max_priority_fee_per_gas,
            %submission_cost,
            "quoted fees"
        );

        Ok(FeeQuote {
            base_fee,
            fees,
            submission_cost,
        })
    }

    async fn submission_cost(&self) -> Result<U256, FeeEstimatorError> {
        let destination = self.destination.as_ref().ok_or_else(|| {
            FeeEstimatorError::Unavailable("no destination chain provider configured".to_string())
        })?;
        let gas_price = destination.get_gas_price().await?;
        Ok(U256::from(gas_price) * U256::from(self.config.l2_submission_gas_limit))
    }
}

// Median of the first reward entry across non-empty blocks. Blocks without
// usable rewards are skipped; a fully quiet window estimates zero and the
// caller's floor takes over.
fn median_priority_fee(reward: &[Vec<u128>]) -> u128 {
    let mut values = reward
        .iter()
        .filter(|block| !block.is_empty() && block[0] != 0)
        .map(|block| block[0])
        .collect::<Vec<_>>();
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    values[values.len() / 2]
}

#[cfg(test)]
mod tests {
    use alloy_rpc_types_eth::FeeHistory;

    use super::*;
    use crate::MockEvmProvider;

    const GWEI: u128 = 1_000_000_000;

    fn fee_history(base_fees: Vec<u128>, rewards: Option<Vec<Vec<u128>>>) -> FeeHistory {
        FeeHistory {
            base_fee_per_gas: base_fees,
            reward: rewards,
            ..Default::default()
        }
    }

    fn source_with_history(history: FeeHistory) -> Arc<MockEvmProvider> {
        let mut source = MockEvmProvider::new();
        source
            .expect_fee_history()
            .returning(move |_, _, _| Ok(history.clone()));
        Arc::new(source)
    }

    #[tokio::test]
    async fn test_quote_applies_margin() {
        let source = source_with_history(fee_history(
            vec![90 * GWEI, 100 * GWEI],
            Some(vec![vec![2 * GWEI], vec![4 * GWEI], vec![3 * GWEI]]),
        ));
        let estimator = FeeEstimator::new(source, None, FeeEstimatorConfig::default());

        let quote = estimator
            .quote(BridgeMode::BaseStandardBridge)
            .await
            .unwrap();
        assert_eq!(quote.base_fee, 100 * GWEI);
        // 20% margin on the 3 gwei median priority fee and the base fee.
        assert_eq!(
            quote.fees.max_priority_fee_per_gas,
            3 * GWEI + 3 * GWEI / 5
        );
        assert_eq!(
            quote.fees.max_fee_per_gas,
            120 * GWEI + quote.fees.max_priority_fee_per_gas
        );
        assert!(
            quote.fees.max_fee_per_gas
                >= quote.base_fee + quote.fees.max_priority_fee_per_gas
        );
        assert_eq!(quote.submission_cost, U256::ZERO);
    }

    #[tokio::test]
    async fn test_quote_without_margin_is_unmargined_estimate() {
        let source = source_with_history(fee_history(
            vec![100 * GWEI],
            Some(vec![vec![3 * GWEI]]),
        ));
        let config = FeeEstimatorConfig {
            base_fee_overhead_percent: 0,
            priority_fee_overhead_percent: 0,
            min_priority_fee: 0,
            ..Default::default()
        };
        let estimator = FeeEstimator::new(source, None, config);

        let quote = estimator
            .quote(BridgeMode::BaseStandardBridge)
            .await
            .unwrap();
        assert_eq!(quote.fees.max_priority_fee_per_gas, 3 * GWEI);
        assert_eq!(quote.fees.max_fee_per_gas, 103 * GWEI);
    }

    #[tokio::test]
    async fn test_quote_floors_priority_fee() {
        let source = source_with_history(fee_history(
            vec![100 * GWEI],
            Some(vec![vec![0], Vec::new()]),
        ));
        let estimator = FeeEstimator::new(source, None, FeeEstimatorConfig::default());

        let quote = estimator
            .quote(BridgeMode::BaseStandardBridge)
            .await
            .unwrap();
        assert_eq!(quote.fees.max_priority_fee_per_gas, GWEI);
    }

    #[tokio::test]
    async fn test_quote_empty_base_fee_history_is_unavailable() {
        let source = source_with_history(fee_history(Vec::new(), Some(vec![vec![GWEI]])));
        let estimator = FeeEstimator::new(source, None, FeeEstimatorConfig::default());

        let err = estimator
            .quote(BridgeMode::BaseStandardBridge)
            .await
            .unwrap_err();
        assert!(matches!(err, FeeEstimatorError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_quote_missing_rewards_is_unavailable() {
        let source = source_with_history(fee_history(vec![100 * GWEI], None));
        let estimator = FeeEstimator::new(source, None, FeeEstimatorConfig::default());

        let err = estimator
            .quote(BridgeMode::BaseStandardBridge)
            .await
            .unwrap_err();
        assert!(matches!(err, FeeEstimatorError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_submission_cost_from_destination_gas_price() {
        let source = source_with_history(fee_history(
            vec![100 * GWEI],
            Some(vec![vec![2 * GWEI]]),
        ));
        let mut destination = MockEvmProvider::new();
        destination
            .expect_get_gas_price()
            .times(1)
            .returning(|| Ok(2 * GWEI));
        let estimator = FeeEstimator::new(
            source,
            Some(Arc::new(destination)),
            FeeEstimatorConfig::default(),
        );

        let quote = estimator
            .quote(BridgeMode::ArbitrumRetryable)
            .await
            .unwrap();
        assert_eq!(
            quote.submission_cost,
            U256::from(2 * GWEI) * U256::from(500_000u64)
        );
    }

    #[tokio::test]
    async fn test_submission_cost_requires_destination_provider() {
        let source = source_with_history(fee_history(
            vec![100 * GWEI],
            Some(vec![vec![2 * GWEI]]),
        ));
        let estimator = FeeEstimator::new(source, None, FeeEstimatorConfig::default());

        let err = estimator
            .quote(BridgeMode::ArbitrumRetryable)
            .await
            .unwrap_err();
        assert!(matches!(err, FeeEstimatorError::Unavailable(_)));
    }

    #[test]
    fn test_median_priority_fee_skips_empty_blocks() {
        let reward = vec![vec![300], Vec::new(), vec![100], vec![200]];
        assert_eq!(median_priority_fee(&reward), 200);
    }

    #[test]
    fn test_median_priority_fee_single() {
        assert_eq!(median_priority_fee(&[vec![200]]), 200);
    }

    #[test]
    fn test_median_priority_fee_all_empty() {
        assert_eq!(median_priority_fee(&[Vec::new(), vec![0]]), 0);
    }
}
