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

#![warn(missing_docs, unreachable_pub, unused_crate_dependencies)]
#![deny(unused_must_use, rust_2018_idioms)]
//! Shared data model for the Massbridge engine: bridge destinations and their
//! fixed chain constants, EIP-1559 fee types, and batch run results.

mod batch;
pub use batch::{RunStatistics, WalletOutcome, WalletResult};

pub mod chain;
pub use chain::BridgeMode;

mod gas;
pub use gas::{FeeQuote, GasFees};

pub mod math;
