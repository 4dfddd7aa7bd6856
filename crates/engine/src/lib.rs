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
//! Bridge transaction engine.
//!
//! Drives a batch of wallets through construct → sign → submit → confirm
//! against one of the supported bridge contracts, retrying recoverable
//! failures with fresh fees and nonces and folding the per-wallet outcomes
//! into run statistics.

mod batch;
pub use batch::BatchRunner;

mod error;
pub use error::BridgeError;

mod payload;
pub use payload::{build_payload, BridgePayload};

mod pipeline;
pub use pipeline::{BridgeRequest, SignedBridgeTx, TransactionPipeline};

mod sender;
pub use sender::{RawTransactionSender, TransactionSender, TxSenderError};

mod submitter;
pub use submitter::{AttemptOutcome, RetrySubmitter, SubmitterSettings};
