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

#![warn(unreachable_pub, unused_crate_dependencies)]
#![deny(unused_must_use, rust_2018_idioms)]
//! Chain access boundary for the Massbridge engine.
//!
//! The engine never talks to a node directly: everything it needs from a
//! chain goes through the [`EvmProvider`] trait, which is implemented over
//! an alloy provider for real use and mocked (`test-utils` feature) in
//! tests. Fee estimation lives here too since it is purely a view over
//! chain fee data.

mod traits;
pub use traits::*;

mod alloy;
pub use alloy::AlloyEvmProvider;

mod fees;
pub use fees::{FeeEstimator, FeeEstimatorConfig, FeeEstimatorError};

// Re-exported for consumers so they don't need a direct alloy-rpc-types
// dependency for the common cases.
pub use alloy_rpc_types_eth::{FeeHistory, TransactionReceipt, TransactionRequest};
