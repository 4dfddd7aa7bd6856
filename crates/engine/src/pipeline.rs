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

//! Turns a bridge request into a signed, submittable transaction.

use std::sync::Arc;

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_eips::{eip2718::Encodable2718, eip2930::AccessList};
use alloy_network::TxSignerSync;
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use massbridge_provider::{EvmProvider, FeeEstimator};
use massbridge_types::{chain, BridgeMode, GasFees};
use tracing::{debug, warn};

use crate::{payload, BridgeError};

/// One wallet's bridge order: who signs, how much, and over which bridge.
/// Immutable once constructed; a batch holds one per wallet.
#[derive(Clone, Debug)]
pub struct BridgeRequest {
    /// Key the transaction is signed with; also the recipient on the
    /// destination chain (self-bridge).
    pub signer: PrivateKeySigner,
    /// Amount to bridge, in wei.
    pub amount: U256,
    /// Destination bridge.
    pub mode: BridgeMode,
}

impl BridgeRequest {
    /// Address the bridge is issued from.
    pub fn wallet(&self) -> Address {
        self.signer.address()
    }
}

/// A signed EIP-1559 transaction ready for submission, plus the metadata
/// the submitter reports on. Consumed by exactly one submission: a retry
/// goes through [`TransactionPipeline::prepare`] again instead of reusing
/// these bytes, since both the fees and the nonce may have moved.
#[derive(Clone, Debug)]
pub struct SignedBridgeTx {
    /// 2718-encoded signed transaction.
    pub raw: Bytes,
    /// Transaction hash.
    pub tx_hash: B256,
    /// Nonce the transaction was signed with.
    pub nonce: u64,
    /// Gas limit attached to the transaction.
    pub gas_limit: u64,
    /// Fees attached to the transaction.
    pub fees: GasFees,
    /// Total value sent with the call.
    pub value: U256,
}

/// Builds and signs bridge transactions.
pub struct TransactionPipeline<P> {
    provider: Arc<P>,
    estimator: FeeEstimator<P>,
}

impl<P: EvmProvider> TransactionPipeline<P> {
    /// Create a new pipeline over the source chain `provider`.
    pub fn new(provider: Arc<P>, estimator: FeeEstimator<P>) -> Self {
        Self {
            provider,
            estimator,
        }
    }

    /// Prepare one attempt: quote fees, build the payload, verify the wallet
    /// can pay, then assemble and sign with a freshly fetched nonce.
    ///
    /// `min_fees` floors the quoted fees. A retry over a transaction that
    /// may still be pending passes the previous attempt's fees bumped by the
    /// replacement increase, since nodes reject same-nonce replacements
    /// that don't outbid the original.
    ///
    /// The balance check runs before the nonce fetch so a wallet that cannot
    /// pay never consumes a nonce on a transaction certain to fail. The
    /// nonce comes from the mined-plus-pending view, covering transactions
    /// from this wallet that are still in the mempool.
    pub async fn prepare(
        &self,
        request: &BridgeRequest,
        min_fees: Option<GasFees>,
    ) -> Result<SignedBridgeTx, BridgeError> {
        let wallet = request.wallet();
        let mut quote = self.estimator.quote(request.mode).await?;
        if let Some(min_fees) = min_fees {
            quote.fees = GasFees {
                max_fee_per_gas: quote.fees.max_fee_per_gas.max(min_fees.max_fee_per_gas),
                max_priority_fee_per_gas: quote
                    .fees
                    .max_priority_fee_per_gas
                    .max(min_fees.max_priority_fee_per_gas),
            };
        }
        let payload = payload::build_payload(request.mode, request.amount, wallet, &quote)?;

        let balance = self.provider.get_balance(wallet).await?;
        let gas_limit = match request.mode.fixed_gas_limit() {
            Some(gas_limit) => gas_limit,
            None => {
                let call = estimate_call(wallet, request.mode, &payload);
                self.provider
                    .estimate_gas(&call)
                    .await
                    .map_err(|err| match err.rpc_error_message() {
                        Some(message) if message.contains("insufficient funds") => {
                            BridgeError::InsufficientBalance {
                                balance,
                                required: payload.value,
                            }
                        }
                        _ => BridgeError::Provider(err),
                    })?
            }
        };

        let gas_cost = U256::from(quote.fees.max_fee_per_gas) * U256::from(gas_limit);
        let required = payload.value + gas_cost;
        if balance < required {
            warn!(
                %wallet,
                %balance,
                %required,
                bridge_value = %payload.value,
                %gas_cost,
                "wallet cannot cover bridge amount plus gas"
            );
            return Err(BridgeError::InsufficientBalance { balance, required });
        }

        let nonce = self.provider.get_transaction_count(wallet).await?;

        let mut tx = TxEip1559 {
            chain_id: chain::SOURCE_CHAIN_ID,
            nonce,
            gas_limit,
            max_fee_per_gas: quote.fees.max_fee_per_gas,
            max_priority_fee_per_gas: quote.fees.max_priority_fee_per_gas,
            to: TxKind::Call(request.mode.bridge_address()),
            value: payload.value,
            access_list: AccessList::default(),
            input: payload.calldata,
        };
        let signature = request.signer.sign_transaction_sync(&mut tx)?;
        let signed = tx.into_signed(signature);
        let tx_hash = *signed.hash();
        let envelope = TxEnvelope::from(signed);

        debug!(
            %wallet,
            %tx_hash,
            nonce,
            gas_limit,
            max_fee_per_gas = quote.fees.max_fee_per_gas,
            max_priority_fee_per_gas = quote.fees.max_priority_fee_per_gas,
            value = %payload.value,
            "prepared bridge transaction"
        );

        Ok(SignedBridgeTx {
            raw: envelope.encoded_2718().into(),
            tx_hash,
            nonce,
            gas_limit,
            fees: quote.fees,
            value: payload.value,
        })
    }
}

fn estimate_call(
    wallet: Address,
    mode: BridgeMode,
    payload: &payload::BridgePayload,
) -> TransactionRequest {
    let mut call = TransactionRequest::default();
    call.from = Some(wallet);
    call.to = Some(TxKind::Call(mode.bridge_address()));
    call.value = Some(payload.value);
    call.input = TransactionInput::new(payload.calldata.clone());
    call
}
