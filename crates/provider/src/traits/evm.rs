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

//! Trait for interacting with chain data.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::{BlockNumberOrTag, FeeHistory, TransactionReceipt, TransactionRequest};
#[cfg(feature = "test-utils")]
use mockall::automock;

use super::error::ProviderResult;

/// Trait for interacting with chain data.
///
/// One instance is bound to one chain; the engine holds a handle per chain
/// it reads from.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait EvmProvider: Send + Sync {
    /// Get the balance of an address
    async fn get_balance(&self, address: Address) -> ProviderResult<U256>;

    /// Get fee history given a number of blocks and reward percentiles
    async fn fee_history(
        &self,
        block_count: u64,
        block_number: BlockNumberOrTag,
        reward_percentiles: &[f64],
    ) -> ProviderResult<FeeHistory>;

    /// Get the current gas price as reported by the node's RPC
    async fn get_gas_price(&self) -> ProviderResult<u128>;

    /// Get the nonce/transaction count of an address, including transactions
    /// pending in the mempool
    async fn get_transaction_count(&self, address: Address) -> ProviderResult<u64>;

    /// Estimate the gas required for a transaction
    async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64>;

    /// Submit a signed raw transaction, returning its hash
    async fn send_raw_transaction(&self, raw: Bytes) -> ProviderResult<TxHash>;

    /// Get transaction receipt by hash, `None` while unmined
    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ProviderResult<Option<TransactionReceipt>>;
}
