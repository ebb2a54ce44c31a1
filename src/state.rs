// Lottery Facade - State
use std::sync::Arc;

use alloy_primitives::{Address, U256};

use crate::{contract::LotteryContract, utils};

/// Status messages shown to the user
pub mod status {
    pub const WELCOME: &str = "Let the game begin...";
    pub const INSTALL_WALLET: &str = "Please install MetaMask to use this app.";
    pub const CONNECTED: &str = "Wallet connected.";
    pub const CONNECT_REJECTED: &str = "Wallet connection was rejected by the user.";
    pub const WALLET_UNREACHABLE: &str = "Unable to access the wallet. Please try again.";
    pub const DISCONNECTED: &str = "Disconnected. Please connect your wallet.";
    pub const CONNECT_FIRST: &str = "Please connect your wallet first.";
    pub const REFRESH_FAILED: &str = "Failed to retrieve contract details.";
    pub const ENTERING: &str = "Entering the lottery...";
    pub const ENTERED: &str = "You have been entered into the lottery!";
    pub const PICKING_WINNER: &str = "Picking a winner...";
    pub const WINNER_PICKED: &str = "A winner has been picked!";
    pub const TX_REJECTED: &str = "Transaction was rejected by the user.";
    pub const TX_FAILED: &str = "Transaction failed. Please try again.";
    pub const BUSY: &str = "Another transaction is already in progress.";
}

/// A connected wallet
///
/// The account, the provider handle and the contract client only ever exist
/// together: the facade holds an `Option<Session>`, so a half-connected
/// state cannot be represented.
pub struct Session<P> {
    /// Bumped on every connect; stale refreshes compare against it
    pub(crate) generation: u64,
    account: Address,
    provider: Arc<P>,
    contract: LotteryContract<P>,
}

impl<P> Clone for Session<P> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            account: self.account,
            provider: Arc::clone(&self.provider),
            contract: self.contract.clone(),
        }
    }
}

impl<P> Session<P> {
    pub(crate) fn new(
        generation: u64,
        account: Address,
        provider: Arc<P>,
        contract: LotteryContract<P>,
    ) -> Self {
        Self {
            generation,
            account,
            provider,
            contract,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn contract(&self) -> &LotteryContract<P> {
        &self.contract
    }
}

/// Contract state as of the last successful refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSnapshot {
    pub player_count: u64,
    pub balance_wei: U256,
    /// `balance_wei` rendered in ether
    pub balance: String,
}

impl Default for ContractSnapshot {
    fn default() -> Self {
        Self::new(0, U256::ZERO)
    }
}

impl ContractSnapshot {
    pub fn new(player_count: u64, balance_wei: U256) -> Self {
        Self {
            player_count,
            balance_wei,
            balance: utils::wei_to_ether(balance_wei),
        }
    }
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacadeState {
    pub account: Option<Address>,
    pub snapshot: ContractSnapshot,
    /// Outcome of the last operation attempted
    pub status: String,
    /// A state-changing transaction is in flight
    pub busy: bool,
}

impl Default for FacadeState {
    fn default() -> Self {
        Self {
            account: None,
            snapshot: ContractSnapshot::default(),
            status: status::WELCOME.to_string(),
            busy: false,
        }
    }
}

impl FacadeState {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Addresses compare as bytes, so letter case in their hex form is irrelevant
    pub fn is_manager(&self, manager: Address) -> bool {
        self.account == Some(manager)
    }

    pub fn can_enter(&self) -> bool {
        self.is_connected() && !self.busy
    }

    /// Whether the pick-winner control should be enabled
    ///
    /// Cosmetic only: the contract is what actually refuses non-managers.
    pub fn can_pick_winner(&self, manager: Address) -> bool {
        self.can_enter() && self.is_manager(manager)
    }
}
