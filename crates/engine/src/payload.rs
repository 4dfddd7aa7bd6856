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

//! Contract call payloads for the supported bridges.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use massbridge_types::{BridgeMode, FeeQuote};

use crate::BridgeError;

sol! {
    #[allow(missing_docs)]
    interface IInbox {
        function createRetryableTicket(
            address to,
            uint256 l2CallValue,
            uint256 maxSubmissionCost,
            address excessFeeRefundAddress,
            address callValueRefundAddress,
            uint256 gasLimit,
            uint256 maxFeePerGas,
            bytes calldata data
        ) external payable returns (uint256);
    }

    #[allow(missing_docs)]
    interface IL1StandardBridge {
        function bridgeETHTo(
            address _to,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external payable;
    }
}

/// Minimum gas forwarded to the L2 side of a standard-bridge deposit.
const BASE_MIN_GAS_LIMIT: u32 = 200_000;

/// Extra data attached to standard-bridge deposits so they group with
/// deposits made through the canonical bridge UI.
const BASE_EXTRA_DATA: &[u8] = b"superbridge";

/// Calldata and value for one bridge transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BridgePayload {
    /// ABI-encoded contract call.
    pub calldata: Bytes,
    /// ETH attached to the call.
    pub value: U256,
}

/// Build the contract call for `mode`, bridging `amount` wei from `sender`
/// back to itself on the destination chain.
///
/// For the retryable-ticket mode the quoted submission cost is prepaid on
/// top of the amount and the ticket's own gas fields are left at zero: the
/// deposit is credited on redemption, which a plain value bridge does not
/// need to schedule up front.
pub fn build_payload(
    mode: BridgeMode,
    amount: U256,
    sender: Address,
    quote: &FeeQuote,
) -> Result<BridgePayload, BridgeError> {
    if amount.is_zero() {
        return Err(BridgeError::InvalidAmount);
    }
    match mode {
        BridgeMode::ArbitrumRetryable => {
            let call = IInbox::createRetryableTicketCall {
                to: sender,
                l2CallValue: amount,
                maxSubmissionCost: quote.submission_cost,
                excessFeeRefundAddress: sender,
                callValueRefundAddress: sender,
                gasLimit: U256::ZERO,
                maxFeePerGas: U256::ZERO,
                data: Bytes::new(),
            };
            Ok(BridgePayload {
                calldata: call.abi_encode().into(),
                value: amount + quote.submission_cost,
            })
        }
        BridgeMode::BaseStandardBridge => {
            let call = IL1StandardBridge::bridgeETHToCall {
                _to: sender,
                _minGasLimit: BASE_MIN_GAS_LIMIT,
                _extraData: Bytes::from_static(BASE_EXTRA_DATA),
            };
            Ok(BridgePayload {
                calldata: call.abi_encode().into(),
                value: amount,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use massbridge_types::GasFees;

    use super::*;

    const SENDER: Address = address!("00000000000000000000000000000000000000aa");

    fn quote(submission_cost: u64) -> FeeQuote {
        FeeQuote {
            base_fee: 10_000_000_000,
            fees: GasFees {
                max_fee_per_gas: 14_000_000_000,
                max_priority_fee_per_gas: 2_000_000_000,
            },
            submission_cost: U256::from(submission_cost),
        }
    }

    #[test]
    fn test_arbitrum_payload_selector_and_value() {
        let amount = U256::from(100_000_000_000_000u64);
        let payload = build_payload(
            BridgeMode::ArbitrumRetryable,
            amount,
            SENDER,
            &quote(50_000_000_000_000),
        )
        .unwrap();

        assert!(!payload.calldata.is_empty());
        assert_eq!(
            payload.calldata[..4],
            IInbox::createRetryableTicketCall::SELECTOR
        );
        assert_eq!(payload.value, amount + U256::from(50_000_000_000_000u64));
    }

    #[test]
    fn test_base_payload_selector_and_value() {
        let amount = U256::from(100_000_000_000_000u64);
        let payload =
            build_payload(BridgeMode::BaseStandardBridge, amount, SENDER, &quote(0)).unwrap();

        assert!(!payload.calldata.is_empty());
        assert_eq!(
            payload.calldata[..4],
            IL1StandardBridge::bridgeETHToCall::SELECTOR
        );
        // The value is exactly the amount; no submission cost applies.
        assert_eq!(payload.value, amount);
    }

    #[test]
    fn test_base_payload_carries_superbridge_tag() {
        let payload = build_payload(
            BridgeMode::BaseStandardBridge,
            U256::from(1),
            SENDER,
            &quote(0),
        )
        .unwrap();
        assert!(payload
            .calldata
            .windows(BASE_EXTRA_DATA.len())
            .any(|window| window == BASE_EXTRA_DATA));
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let err = build_payload(BridgeMode::ArbitrumRetryable, U256::ZERO, SENDER, &quote(0))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount));
    }

    #[test]
    fn test_arbitrum_submission_cost_is_ignored_for_base() {
        // Even with a non-zero quote the standard bridge only sends the amount.
        let amount = U256::from(7);
        let payload = build_payload(
            BridgeMode::BaseStandardBridge,
            amount,
            SENDER,
            &quote(123_456),
        )
        .unwrap();
        assert_eq!(payload.value, amount);
    }
}
