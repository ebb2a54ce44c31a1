// Lottery Facade - Configuration
use std::time::Duration;

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

use crate::{error::LotteryError, utils};

/// Deployed lottery contract
pub const CONTRACT_ADDRESS: Address = address!("fF623f9184D0e49c4Bd442FEc4Fdb272177ead7b");

/// The only account the contract lets pick a winner
pub const MANAGER_ADDRESS: Address = address!("0b0D3cde7bFf54B935095C2078A1F23c52A0D26b");

/// Entry fee in ether
pub const ENTRY_FEE: &str = "0.001";

/// Gas ceiling for both entry and winner selection
pub const GAS_LIMIT: u64 = 300_000;

pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;

/// Upper bound on the player list read back from the contract
pub const MAX_PLAYERS: u64 = 10_000;

/// Facade settings
///
/// `Default` gives the values the lottery was deployed with. Hosts that
/// point at another deployment can load overrides from JSON; missing keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LotteryConfig {
    pub contract_address: Address,
    pub manager_address: Address,
    /// Entry fee in ether, e.g. `"0.001"`
    pub entry_fee: String,
    pub gas_limit: u64,
    pub receipt_poll_interval_ms: u64,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            contract_address: CONTRACT_ADDRESS,
            manager_address: MANAGER_ADDRESS,
            entry_fee: ENTRY_FEE.to_string(),
            gas_limit: GAS_LIMIT,
            receipt_poll_interval_ms: RECEIPT_POLL_INTERVAL_MS,
        }
    }
}

impl LotteryConfig {
    pub fn from_json(json: &str) -> Result<Self, LotteryError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LotteryError::InvalidConfig(e.to_string()))?;
        config.entry_fee_wei()?;
        Ok(config)
    }

    pub fn entry_fee_wei(&self) -> Result<U256, LotteryError> {
        utils::ether_to_wei(&self.entry_fee)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}
