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

use alloy_transport::{RpcError, TransportErrorKind};

/// Error enumeration for the [`EvmProvider`](super::EvmProvider) trait.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// JSON-RPC error
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    /// Message of the node's error response, if the error is one. Submission
    /// errors are classified off this message.
    pub fn rpc_error_message(&self) -> Option<String> {
        match self {
            Self::Rpc(RpcError::ErrorResp(payload)) => Some(payload.message.to_string()),
            _ => None,
        }
    }

    /// Whether the error happened below the RPC layer (connection refused,
    /// timeout, DNS). These never carry a node verdict about the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Rpc(RpcError::Transport(_)))
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
