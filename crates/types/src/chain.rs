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

//! Chain ids and bridge contract addresses.
//!
//! These constants are part of the engine's compatibility contract: the
//! payloads built against them are only valid for these exact deployments.

use std::{fmt, str::FromStr};

use alloy_primitives::{address, Address, B256};

/// Chain id of the source chain, Ethereum Sepolia.
pub const SOURCE_CHAIN_ID: u64 = 11_155_111;

/// Chain id of Arbitrum Sepolia.
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421_614;

/// Chain id of Base Sepolia.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84_532;

/// Arbitrum Sepolia delayed inbox on the source chain.
pub const ARBITRUM_INBOX_ADDRESS: Address =
    address!("aae29b0366299461418f5324a79afc425be5ae21");

/// Base Sepolia `L1StandardBridge` proxy on the source chain.
pub const BASE_STANDARD_BRIDGE_ADDRESS: Address =
    address!("fd0bf71f60660e2f608ed56e1659c450eb113120");

/// Gas limit used for every `bridgeETHTo` transaction. The standard bridge's
/// gas usage is stable, so this is fixed rather than estimated.
pub const BASE_BRIDGE_GAS_LIMIT: u64 = 756_499;

const SOURCE_EXPLORER_TX_BASE: &str = "https://sepolia.etherscan.io/tx/";

/// Explorer URL for a transaction on the source chain.
pub fn source_explorer_tx_url(tx_hash: B256) -> String {
    format!("{SOURCE_EXPLORER_TX_BASE}{tx_hash}")
}

/// Supported bridge destinations.
///
/// Each variant is bound to one bridge contract on the source chain and
/// carries that contract's fixed parameters. Adding a destination means
/// adding a variant here and a payload rule in the engine; the exhaustive
/// matches below make a missing rule a compile error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BridgeMode {
    /// ETH to Arbitrum Sepolia via a retryable ticket on the delayed inbox.
    ArbitrumRetryable,
    /// ETH to Base Sepolia via `bridgeETHTo` on the L1 standard bridge.
    BaseStandardBridge,
}

impl BridgeMode {
    /// Chain id of the destination rollup.
    pub fn destination_chain_id(&self) -> u64 {
        match self {
            Self::ArbitrumRetryable => ARBITRUM_SEPOLIA_CHAIN_ID,
            Self::BaseStandardBridge => BASE_SEPOLIA_CHAIN_ID,
        }
    }

    /// Bridge contract to call on the source chain.
    pub fn bridge_address(&self) -> Address {
        match self {
            Self::ArbitrumRetryable => ARBITRUM_INBOX_ADDRESS,
            Self::BaseStandardBridge => BASE_STANDARD_BRIDGE_ADDRESS,
        }
    }

    /// Fixed gas limit for this mode, or `None` if the gas limit must be
    /// estimated per transaction.
    pub fn fixed_gas_limit(&self) -> Option<u64> {
        match self {
            Self::ArbitrumRetryable => None,
            Self::BaseStandardBridge => Some(BASE_BRIDGE_GAS_LIMIT),
        }
    }

    /// Whether this mode prepays a destination-side submission cost as part
    /// of the transaction value.
    pub fn requires_submission_cost(&self) -> bool {
        match self {
            Self::ArbitrumRetryable => true,
            Self::BaseStandardBridge => false,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::ArbitrumRetryable => "arbitrum",
            Self::BaseStandardBridge => "base",
        }
    }
}

impl fmt::Display for BridgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BridgeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arbitrum" => Ok(Self::ArbitrumRetryable),
            "base" => Ok(Self::BaseStandardBridge),
            _ => anyhow::bail!("Invalid destination. Must be one of either 'arbitrum' or 'base'"),
        }
    }
}
