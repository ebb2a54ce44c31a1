// Lottery Facade - Errors
use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::abi;

/// EIP-1193 code for a request the user declined in the wallet
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// JSON-RPC internal error, used by wallets for most failed calls
pub const INTERNAL_ERROR: i64 = -32603;

/// Error object returned by a wallet provider
///
/// Mirrors the EIP-1193 `ProviderRpcError` shape: a numeric code, a message
/// and optional data. When a call reverts, `data` usually holds the revert
/// payload, either as a hex string or nested inside another error object.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_REQUEST, "User rejected the request.")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_REQUEST
    }

    /// Raw revert payload carried by the error, if any
    pub fn revert_data(&self) -> Option<Bytes> {
        self.data.as_ref().and_then(find_revert_data)
    }
}

// Wallets nest the payload differently: MetaMask puts it under
// `data.originalError.data`, plain nodes put the hex string directly in `data`.
fn find_revert_data(value: &Value) -> Option<Bytes> {
    match value {
        Value::String(hex) => hex.parse().ok(),
        Value::Object(map) => ["data", "originalError"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(find_revert_data),
        _ => None,
    }
}

/// Errors surfaced by the lottery facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LotteryError {
    /// No wallet provider was injected into the environment
    #[error("No wallet provider available")]
    WalletUnavailable,

    /// The user declined a wallet prompt
    #[error("Request was rejected by the user")]
    UserRejected,

    /// The operation needs a connected wallet
    #[error("Wallet is not connected")]
    NotConnected,

    /// Another state-changing call is still in flight
    #[error("Another transaction is already in progress")]
    Busy,

    /// The contract reverted with a decodable reason
    #[error("Transaction reverted: {reason}")]
    Reverted { reason: String },

    /// The transaction was mined but its receipt reports failure
    #[error("Transaction {hash} failed")]
    TransactionFailed { hash: B256 },

    /// Any other provider, node or contract error
    #[error(transparent)]
    Provider(ProviderError),

    /// The provider answered with something that does not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An ether amount could not be parsed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ProviderError> for LotteryError {
    fn from(e: ProviderError) -> Self {
        if e.is_user_rejection() {
            return LotteryError::UserRejected;
        }
        match e.revert_data().and_then(|data| abi::decode_revert_reason(&data)) {
            Some(reason) => LotteryError::Reverted { reason },
            None => LotteryError::Provider(e),
        }
    }
}
