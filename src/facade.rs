// Lottery Facade - Operations
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use alloy_primitives::{Address, B256};
use tokio::sync::{watch, RwLock, Semaphore, SemaphorePermit};
use tracing::{debug, error, info, warn};

use crate::{
    config::{LotteryConfig, MAX_PLAYERS},
    contract::LotteryContract,
    error::LotteryError,
    provider::{Eth, WalletProvider},
    state::{status, ContractSnapshot, FacadeState, Session},
};

/// Client-side handle on the lottery contract
///
/// Owns the wallet session and publishes a [`FacadeState`] that a UI can
/// watch. All operations take `&self` and report their outcome through the
/// status message as well as their return value, so a host that ignores the
/// `Result` still shows the user what happened.
pub struct LotteryFacade<P> {
    config: LotteryConfig,
    /// Provider injected by the environment, if any
    injected: Option<Arc<P>>,
    session: RwLock<Option<Session<P>>>,
    /// Bumped by every connect attempt and every disconnect
    generation: AtomicU64,
    state: watch::Sender<FacadeState>,
    /// Single slot shared by enter and pick_winner
    in_flight: Semaphore,
}

/// State-changing calls guarded by the in-flight slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Submission {
    Entry,
    PickWinner,
}

impl Submission {
    fn label(self) -> &'static str {
        match self {
            Submission::Entry => "enter",
            Submission::PickWinner => "pick_winner",
        }
    }

    fn pending_status(self) -> &'static str {
        match self {
            Submission::Entry => status::ENTERING,
            Submission::PickWinner => status::PICKING_WINNER,
        }
    }

    fn done_status(self) -> &'static str {
        match self {
            Submission::Entry => status::ENTERED,
            Submission::PickWinner => status::WINNER_PICKED,
        }
    }

    fn failure_status(self, err: &LotteryError) -> String {
        match (self, err) {
            (_, LotteryError::Reverted { reason }) => format!("Transaction failed: {reason}"),
            (Submission::Entry, LotteryError::UserRejected) => status::TX_REJECTED.to_string(),
            _ => status::TX_FAILED.to_string(),
        }
    }
}

/// Holds the in-flight slot; clears the busy flag when dropped
struct InFlight<'a> {
    _permit: SemaphorePermit<'a>,
    state: &'a watch::Sender<FacadeState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.busy = false);
    }
}

impl<P: WalletProvider> LotteryFacade<P> {
    pub fn new(config: LotteryConfig, injected: Option<Arc<P>>) -> Self {
        let (state, _) = watch::channel(FacadeState::default());
        Self {
            config,
            injected,
            session: RwLock::new(None),
            generation: AtomicU64::new(0),
            state,
            in_flight: Semaphore::new(1),
        }
    }

    /// Facade over an injected provider with the deployed settings
    pub fn with_provider(provider: P) -> Self {
        Self::new(LotteryConfig::default(), Some(Arc::new(provider)))
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    /// Receiver that sees every state change
    pub fn subscribe(&self) -> watch::Receiver<FacadeState> {
        self.state.subscribe()
    }

    /// Current state
    pub fn state(&self) -> FacadeState {
        self.state.borrow().clone()
    }

    pub async fn session(&self) -> Option<Session<P>> {
        self.session.read().await.clone()
    }

    /// Whether the connected account is the configured manager
    pub fn is_manager(&self) -> bool {
        self.state.borrow().is_manager(self.config.manager_address)
    }

    fn set_status(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|state| state.status = message);
    }

    /// Whether `generation` still names the installed session
    fn is_current(current: &Option<Session<P>>, generation: u64) -> bool {
        current.as_ref().map(|s| s.generation) == Some(generation)
    }

    async fn require_session(&self) -> Result<Session<P>, LotteryError> {
        match self.session().await {
            Some(session) => Ok(session),
            None => {
                warn!("wallet not connected");
                self.set_status(status::CONNECT_FIRST);
                Err(LotteryError::NotConnected)
            }
        }
    }

    /// Connect the injected wallet and load contract state
    ///
    /// Does nothing if a wallet is already connected.
    pub async fn connect(&self) -> Result<(), LotteryError> {
        let Some(provider) = self.injected.clone() else {
            warn!("no wallet provider injected");
            self.set_status(status::INSTALL_WALLET);
            return Err(LotteryError::WalletUnavailable);
        };
        if self.session.read().await.is_some() {
            debug!("wallet already connected");
            return Ok(());
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let session = match self.open_session(generation, provider).await {
            Ok(session) => session,
            Err(err) => {
                warn!(%err, "wallet connection failed");
                self.set_status(match err {
                    LotteryError::UserRejected => status::CONNECT_REJECTED,
                    _ => status::WALLET_UNREACHABLE,
                });
                return Err(err);
            }
        };

        {
            let mut current = self.session.write().await;
            if current.is_some() {
                debug!("another connect finished first");
                return Ok(());
            }
            if self.generation.load(Ordering::Relaxed) != generation {
                warn!("wallet disconnected while connecting, dropping session");
                return Err(LotteryError::NotConnected);
            }
            let account = session.account();
            info!(%account, "wallet connected");
            *current = Some(session);
            self.state.send_modify(|state| {
                state.account = Some(account);
                state.status = status::CONNECTED.to_string();
            });
        }

        self.refresh_state().await
    }

    async fn open_session(
        &self,
        generation: u64,
        provider: Arc<P>,
    ) -> Result<Session<P>, LotteryError> {
        let eth = Eth::new(Arc::clone(&provider));
        eth.request_accounts().await?;
        let accounts = eth.accounts().await?;
        let account = accounts.first().copied().ok_or_else(|| {
            LotteryError::InvalidResponse("wallet authorized no accounts".to_string())
        })?;

        let contract = LotteryContract::new(eth, self.config.contract_address);
        Ok(Session::new(generation, account, provider, contract))
    }

    /// Forget the wallet locally; the wallet itself is not contacted
    pub async fn disconnect(&self) {
        let mut current = self.session.write().await;
        self.generation.fetch_add(1, Ordering::Relaxed);
        if let Some(session) = current.take() {
            info!(account = %session.account(), "wallet disconnected");
        }
        self.state.send_modify(|state| {
            state.account = None;
            state.snapshot = ContractSnapshot::default();
            state.status = status::DISCONNECTED.to_string();
        });
    }

    /// Re-read player count and balance from the contract
    ///
    /// Without a session this is a no-op. On failure the previous snapshot
    /// stays in place.
    pub async fn refresh_state(&self) -> Result<(), LotteryError> {
        let Some(session) = self.session().await else {
            warn!("refresh skipped, wallet not connected");
            return Ok(());
        };

        let snapshot = match Self::fetch_snapshot(session.contract()).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(%err, "failed to retrieve contract details");
                self.set_status(status::REFRESH_FAILED);
                return Err(err);
            }
        };

        // Hold the session lock so a disconnect cannot slip in between the check and the write.
        let current = self.session.read().await;
        if !Self::is_current(&current, session.generation) {
            debug!("discarding snapshot from a closed session");
            return Ok(());
        }
        info!(
            players = snapshot.player_count,
            balance = %snapshot.balance,
            "contract state refreshed"
        );
        self.state.send_modify(|state| state.snapshot = snapshot);
        Ok(())
    }

    async fn fetch_snapshot(contract: &LotteryContract<P>) -> Result<ContractSnapshot, LotteryError> {
        let player_count = contract.get_player_count().await?;
        let balance = contract.get_balance().await?;
        Ok(ContractSnapshot::new(player_count, balance))
    }

    /// Pay the entry fee from the connected account
    pub async fn enter(&self) -> Result<B256, LotteryError> {
        self.submit(Submission::Entry).await
    }

    /// Ask the contract to pick a winner
    ///
    /// Sent from whichever account is connected; the contract decides whether
    /// that account is allowed.
    pub async fn pick_winner(&self) -> Result<B256, LotteryError> {
        self.submit(Submission::PickWinner).await
    }

    async fn submit(&self, submission: Submission) -> Result<B256, LotteryError> {
        let session = self.require_session().await?;
        let _in_flight = self.begin_transaction()?;

        self.set_status(submission.pending_status());
        info!(
            action = submission.label(),
            account = %session.account(),
            "submitting transaction"
        );

        let result = self.send(&session, submission).await;

        {
            let current = self.session.read().await;
            if !Self::is_current(&current, session.generation) {
                let action = submission.label();
                match &result {
                    Ok(hash) => info!(action, %hash, "transaction confirmed after disconnect"),
                    Err(err) => warn!(action, %err, "transaction failed after disconnect"),
                }
                return result;
            }
            match &result {
                Ok(hash) => {
                    info!(action = submission.label(), %hash, "transaction confirmed");
                    self.set_status(submission.done_status());
                }
                Err(err) => {
                    error!(action = submission.label(), %err, "transaction failed");
                    self.set_status(submission.failure_status(err));
                    return result;
                }
            }
        }

        if let Err(err) = self.refresh_state().await {
            debug!(%err, "refresh after transaction failed");
        }
        result
    }

    async fn send(&self, session: &Session<P>, submission: Submission) -> Result<B256, LotteryError> {
        let contract = session.contract();
        let gas = self.config.gas_limit;
        let hash = match submission {
            Submission::Entry => {
                let value = self.config.entry_fee_wei()?;
                contract.enter(session.account(), value, gas).await?
            }
            Submission::PickWinner => contract.pick_winner(session.account(), gas).await?,
        };

        debug!(%hash, "waiting for receipt");
        let receipt = contract
            .eth()
            .wait_for_receipt(hash, self.config.receipt_poll_interval())
            .await?;
        Ok(receipt.transaction_hash)
    }

    fn begin_transaction(&self) -> Result<InFlight<'_>, LotteryError> {
        let permit = self.in_flight.try_acquire().map_err(|_| {
            warn!("transaction already in flight");
            self.set_status(status::BUSY);
            LotteryError::Busy
        })?;
        self.state.send_modify(|state| state.busy = true);
        Ok(InFlight {
            _permit: permit,
            state: &self.state,
        })
    }

    /// Manager address recorded in the contract
    pub async fn manager(&self) -> Result<Address, LotteryError> {
        let session = self.require_session().await?;
        session.contract().manager().await
    }

    /// Every current player, in contract order
    pub async fn players(&self) -> Result<Vec<Address>, LotteryError> {
        let session = self.require_session().await?;
        let contract = session.contract();

        let count = contract.get_player_count().await?;
        if count > MAX_PLAYERS {
            warn!(count, "player count over the read limit");
            return Err(LotteryError::InvalidResponse(format!(
                "player count {count} exceeds {MAX_PLAYERS}"
            )));
        }
        let mut players = Vec::with_capacity(count as usize);
        for index in 0..count {
            players.push(contract.players(index).await?);
        }
        Ok(players)
    }
}
