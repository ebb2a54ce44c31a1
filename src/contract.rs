// Lottery Facade - Contract client
use alloy_primitives::{Address, Bytes, B256, U256};
use tracing::debug;

use crate::{
    abi::{self, LotteryCall},
    error::LotteryError,
    provider::{CallRequest, Eth, WalletProvider},
};

/// Client bound to the lottery ABI and one deployed address
pub struct LotteryContract<P> {
    eth: Eth<P>,
    address: Address,
}

impl<P> Clone for LotteryContract<P> {
    fn clone(&self) -> Self {
        Self {
            eth: self.eth.clone(),
            address: self.address,
        }
    }
}

impl<P: WalletProvider> LotteryContract<P> {
    pub fn new(eth: Eth<P>, address: Address) -> Self {
        Self { eth, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn eth(&self) -> &Eth<P> {
        &self.eth
    }

    async fn view(&self, call: LotteryCall) -> Result<Bytes, LotteryError> {
        debug_assert!(call.is_view());
        debug!(method = call.signature(), "contract view call");
        self.eth
            .call(&CallRequest {
                from: None,
                to: self.address,
                data: call.pack(),
            })
            .await
    }

    /// Contract balance in wei
    pub async fn get_balance(&self) -> Result<U256, LotteryError> {
        let output = self.view(LotteryCall::GetBalance).await?;
        abi::decode_uint(&output)
    }

    pub async fn get_player_count(&self) -> Result<u64, LotteryError> {
        let output = self.view(LotteryCall::GetPlayerCount).await?;
        abi::uint_to_u64(abi::decode_uint(&output)?)
    }

    pub async fn manager(&self) -> Result<Address, LotteryError> {
        let output = self.view(LotteryCall::Manager).await?;
        abi::decode_address(&output)
    }

    /// Player at `index` in the contract's list
    pub async fn players(&self, index: u64) -> Result<Address, LotteryError> {
        let output = self
            .view(LotteryCall::Players {
                index: U256::from(index),
            })
            .await?;
        abi::decode_address(&output)
    }

    /// Sends the entry fee from `player`; returns the transaction hash
    pub async fn enter(&self, player: Address, value: U256, gas: u64) -> Result<B256, LotteryError> {
        let tx = abi::enter_lottery(&self.address, &player, value, gas);
        self.eth.send_transaction(&tx).await
    }

    /// Sends `pickWinner()` from `sender`; returns the transaction hash
    ///
    /// No manager check happens here. The contract rejects anyone else.
    pub async fn pick_winner(&self, sender: Address, gas: u64) -> Result<B256, LotteryError> {
        let tx = abi::pick_winner(&self.address, &sender, gas);
        self.eth.send_transaction(&tx).await
    }
}
