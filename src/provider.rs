// Lottery Facade - Wallet provider boundary
use std::{future::Future, sync::Arc, time::Duration};

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::error::{LotteryError, ProviderError};

/// An injected wallet provider
///
/// This is the whole surface the facade needs from a browser wallet: the
/// EIP-1193 `request` method. Key custody, signing prompts and account
/// selection all happen behind it.
pub trait WalletProvider: Send + Sync {
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, ProviderError>> + Send;
}

/// Parameters of `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

/// Parameters of `eth_call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

/// The subset of a transaction receipt the facade reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `0x1` on success, `0x0` on revert; absent on pre-Byzantium chains
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status != Some(U64::ZERO)
    }
}

/// Typed `eth_*` calls over a wallet provider
pub struct Eth<P> {
    provider: Arc<P>,
}

impl<P> Clone for Eth<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: WalletProvider> Eth<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, LotteryError> {
        trace!(method, %params, "provider request");
        let value = self.provider.request(method, params).await?;
        serde_json::from_value(value)
            .map_err(|e| LotteryError::InvalidResponse(format!("{method}: {e}")))
    }

    /// Asks the wallet for account access; may prompt the user
    pub async fn request_accounts(&self) -> Result<Vec<Address>, LotteryError> {
        self.request("eth_requestAccounts", json!([])).await
    }

    /// Accounts the wallet has already authorized
    pub async fn accounts(&self) -> Result<Vec<Address>, LotteryError> {
        self.request("eth_accounts", json!([])).await
    }

    /// Read-only call against the latest block
    pub async fn call(&self, call: &CallRequest) -> Result<Bytes, LotteryError> {
        self.request("eth_call", json!([call, "latest"])).await
    }

    /// Hands a transaction to the wallet for signing and broadcast
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, LotteryError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    pub async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, LotteryError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }

    /// Polls until the transaction is mined
    ///
    /// There is no deadline here: the wallet and node decide when a pending
    /// transaction is dropped.
    pub async fn wait_for_receipt(
        &self,
        hash: B256,
        poll_interval: Duration,
    ) -> Result<TransactionReceipt, LotteryError> {
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    return Err(LotteryError::TransactionFailed { hash });
                }
                return Ok(receipt);
            }
            debug!(%hash, "transaction pending");
            tokio::time::sleep(poll_interval).await;
        }
    }
}
