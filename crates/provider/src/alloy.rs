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

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::{DynProvider, Provider as _};
use alloy_rpc_types_eth::{BlockNumberOrTag, FeeHistory, TransactionReceipt, TransactionRequest};

use crate::{EvmProvider, ProviderResult};

/// [`EvmProvider`] implementation over an [alloy](https://github.com/alloy-rs/alloy) provider.
pub struct AlloyEvmProvider {
    inner: DynProvider,
}

impl AlloyEvmProvider {
    /// Create a new `AlloyEvmProvider`
    pub fn new(inner: DynProvider) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl EvmProvider for AlloyEvmProvider {
    async fn get_balance(&self, address: Address) -> ProviderResult<U256> {
        Ok(self.inner.get_balance(address).await?)
    }

    async fn fee_history(
        &self,
        block_count: u64,
        block_number: BlockNumberOrTag,
        reward_percentiles: &[f64],
    ) -> ProviderResult<FeeHistory> {
        Ok(self
            .inner
            .get_fee_history(block_count, block_number, reward_percentiles)
            .await?)
    }

    async fn get_gas_price(&self) -> ProviderResult<u128> {
        Ok(self.inner.get_gas_price().await?)
    }

    async fn get_transaction_count(&self, address: Address) -> ProviderResult<u64> {
        Ok(self.inner.get_transaction_count(address).pending().await?)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64> {
        Ok(self.inner.estimate_gas(tx.clone()).await?)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> ProviderResult<TxHash> {
        Ok(*self.inner.send_raw_transaction(&raw).await?.tx_hash())
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ProviderResult<Option<TransactionReceipt>> {
        Ok(self.inner.get_transaction_receipt(tx_hash).await?)
    }
}
