// Lottery Facade
// Client for a fixed on-chain lottery contract, driven through an injected wallet provider

pub mod abi;
pub mod config;
pub mod contract;
pub mod error;
pub mod facade;
pub mod provider;
pub mod state;
pub mod utils;

pub use config::{LotteryConfig, CONTRACT_ADDRESS, MANAGER_ADDRESS, MAX_PLAYERS};
pub use error::{LotteryError, ProviderError};
pub use facade::LotteryFacade;
pub use provider::WalletProvider;
pub use state::{ContractSnapshot, FacadeState, Session};
