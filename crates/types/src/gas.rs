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

use alloy_primitives::U256;

use crate::math;

/// EIP-1559 gas fees for a transaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GasFees {
    /// EIP-1559 max fee per gas
    pub max_fee_per_gas: u128,
    /// EIP-1559 max priority fee per gas
    pub max_priority_fee_per_gas: u128,
}

impl GasFees {
    /// Increase the gas fees by a percentage
    pub fn increase_by_percent(self, percent: u32) -> Self {
        Self {
            max_fee_per_gas: math::increase_by_percent_ceil(self.max_fee_per_gas, percent),
            max_priority_fee_per_gas: math::increase_by_percent_ceil(
                self.max_priority_fee_per_gas,
                percent,
            ),
        }
    }
}

/// Fee parameters for a single bridge transaction attempt.
///
/// A quote is produced fresh per attempt and never reused: the base fee
/// drifts block to block, so a retried attempt always re-quotes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FeeQuote {
    /// Base fee the quote was derived from, without margin.
    pub base_fee: u128,
    /// Margined fees to attach to the transaction. Always satisfies
    /// `max_fee_per_gas >= base_fee + max_priority_fee_per_gas`.
    pub fees: GasFees,
    /// Destination-side submission cost prepaid in the transaction value.
    /// Zero for modes without a submission cost.
    pub submission_cost: U256,
}
