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

use alloy_primitives::{Address, B256};

/// Terminal outcome for one wallet after its attempt budget.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalletOutcome {
    /// A bridge transaction was confirmed on the source chain.
    Success {
        /// Hash of the confirmed transaction.
        tx_hash: B256,
        /// Block the transaction was mined in, when the receipt carried it.
        block_number: Option<u64>,
        /// Gas used by the confirmed transaction.
        gas_used: u64,
    },
    /// All attempts failed, or a fatal error stopped the wallet early.
    Failed {
        /// Last observed failure reason.
        reason: String,
        /// True when every attempt failed at the RPC boundary (fee data or
        /// submission unreachable). Used to surface run-level loss of
        /// connectivity.
        connectivity: bool,
    },
}

impl WalletOutcome {
    /// Whether the wallet's bridge confirmed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Final per-wallet record produced by the batch runner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WalletResult {
    /// Wallet the bridge was issued from.
    pub wallet: Address,
    /// Attempts used to reach the terminal outcome.
    pub attempts: u32,
    /// The terminal outcome.
    pub outcome: WalletOutcome,
}

/// Aggregate statistics for a completed batch. Write-once: derived by
/// folding the wallet results after the last wallet finishes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunStatistics {
    /// Wallets whose bridge confirmed.
    pub succeeded: u32,
    /// Wallets that exhausted their attempts or failed fatally.
    pub failed: u32,
    /// Longest run of consecutive wallets that failed every attempt at the
    /// RPC boundary. A large value relative to the batch size indicates the
    /// node endpoints were unreachable, not that the wallets were unable to
    /// bridge.
    pub connectivity_streak: u32,
}

impl RunStatistics {
    /// Fold wallet results into run statistics.
    pub fn from_results(results: &[WalletResult]) -> Self {
        let mut stats = Self::default();
        let mut streak = 0u32;
        for result in results {
            match &result.outcome {
                WalletOutcome::Success { .. } => {
                    stats.succeeded += 1;
                    streak = 0;
                }
                WalletOutcome::Failed { connectivity, .. } => {
                    stats.failed += 1;
                    if *connectivity {
                        streak += 1;
                        stats.connectivity_streak = stats.connectivity_streak.max(streak);
                    } else {
                        streak = 0;
                    }
                }
            }
        }
        stats
    }

    /// Wallets processed.
    pub fn total(&self) -> u32 {
        self.succeeded + self.failed
    }

    /// Fraction of processed wallets that succeeded, 0.0 for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            f64::from(self.succeeded) / f64::from(self.total())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(wallet: Address) -> WalletResult {
        WalletResult {
            wallet,
            attempts: 1,
            outcome: WalletOutcome::Success {
                tx_hash: B256::ZERO,
                block_number: Some(1),
                gas_used: 100_000,
            },
        }
    }

    fn failure(wallet: Address, connectivity: bool) -> WalletResult {
        WalletResult {
            wallet,
            attempts: 3,
            outcome: WalletOutcome::Failed {
                reason: "transaction underpriced".to_string(),
                connectivity,
            },
        }
    }

    #[test]
    fn test_success_rate() {
        let results = vec![
            success(Address::ZERO),
            success(Address::ZERO),
            failure(Address::ZERO, false),
            success(Address::ZERO),
            failure(Address::ZERO, false),
        ];
        let stats = RunStatistics::from_results(&results);
        assert_eq!(stats.succeeded, 3);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.success_rate(), 0.6);
    }

    #[test]
    fn test_success_rate_empty_batch() {
        let stats = RunStatistics::from_results(&[]);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_connectivity_streak_resets_on_success() {
        let results = vec![
            failure(Address::ZERO, true),
            failure(Address::ZERO, true),
            success(Address::ZERO),
            failure(Address::ZERO, true),
        ];
        let stats = RunStatistics::from_results(&results);
        assert_eq!(stats.connectivity_streak, 2);
    }

    #[test]
    fn test_non_connectivity_failures_do_not_count() {
        let results = vec![failure(Address::ZERO, false), failure(Address::ZERO, true)];
        let stats = RunStatistics::from_results(&results);
        assert_eq!(stats.connectivity_streak, 1);
        assert_eq!(stats.failed, 2);
    }
}
