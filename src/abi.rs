// Lottery Facade - Contract ABI
use alloy_primitives::{hex, keccak256, Address, Bytes, U256, U64};
use arrayref::{array_ref, array_refs};

use crate::{error::LotteryError, provider::TransactionRequest};

/// Length of a function selector
pub const SELECTOR_LEN: usize = 4;

/// Length of one ABI word
pub const WORD_LEN: usize = 32;

/// Selector of the built-in `Error(string)` revert payload
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Calls exposed by the lottery contract
///
/// Entry is not listed: the contract registers a player through its payable
/// `receive` function, so entering is a bare value transfer with no calldata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotteryCall {
    /// `getBalance() -> uint256`, view
    GetBalance,

    /// `getPlayerCount() -> uint256`, view
    GetPlayerCount,

    /// `manager() -> address`, view
    Manager,

    /// `pickWinner()`, state-changing, manager only
    ///
    /// The contract pays the pot to a random player and resets the round.
    PickWinner,

    /// `players(uint256) -> address`, view
    Players {
        /// Position in the contract's player list
        index: U256,
    },
}

impl LotteryCall {
    /// Canonical signature the selector is derived from
    pub fn signature(&self) -> &'static str {
        match self {
            Self::GetBalance => "getBalance()",
            Self::GetPlayerCount => "getPlayerCount()",
            Self::Manager => "manager()",
            Self::PickWinner => "pickWinner()",
            Self::Players { .. } => "players(uint256)",
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        selector(self.signature())
    }

    /// Whether the call only reads contract state
    pub fn is_view(&self) -> bool {
        !matches!(self, Self::PickWinner)
    }

    /// Unpacks calldata into a LotteryCall
    pub fn unpack(input: &[u8]) -> Result<Self, LotteryError> {
        if input.len() < SELECTOR_LEN {
            return Err(LotteryError::InvalidResponse(format!(
                "calldata too short: {} bytes",
                input.len()
            )));
        }
        let (tag, rest) = input.split_at(SELECTOR_LEN);

        let players = Self::Players { index: U256::ZERO };
        if tag == players.selector() {
            let (index, _) = unpack_word(rest)?;
            return Ok(Self::Players {
                index: U256::from_be_bytes(*index),
            });
        }

        [
            Self::GetBalance,
            Self::GetPlayerCount,
            Self::Manager,
            Self::PickWinner,
        ]
        .into_iter()
        .find(|call| tag == call.selector())
        .ok_or_else(|| {
            LotteryError::InvalidResponse(format!("unknown selector 0x{}", hex::encode(tag)))
        })
    }

    /// Packs a LotteryCall into calldata
    pub fn pack(&self) -> Bytes {
        let mut buf = Vec::with_capacity(SELECTOR_LEN + WORD_LEN);
        buf.extend_from_slice(&self.selector());
        if let Self::Players { index } = self {
            buf.extend_from_slice(&encode_uint(*index));
        }
        buf.into()
    }
}

/// First four bytes of the keccak-256 hash of a signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    *array_ref![hash.as_slice(), 0, SELECTOR_LEN]
}

/// Splits the leading ABI word off a buffer
pub fn unpack_word(input: &[u8]) -> Result<(&[u8; WORD_LEN], &[u8]), LotteryError> {
    if input.len() < WORD_LEN {
        return Err(LotteryError::InvalidResponse(format!(
            "expected a {}-byte word, got {} bytes",
            WORD_LEN,
            input.len()
        )));
    }
    let (word, rest) = input.split_at(WORD_LEN);
    Ok((array_ref![word, 0, WORD_LEN], rest))
}

pub fn encode_uint(value: U256) -> [u8; WORD_LEN] {
    value.to_be_bytes::<WORD_LEN>()
}

pub fn encode_address(address: Address) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[12..].copy_from_slice(address.as_slice());
    word
}

/// Decodes a single `uint256` return value
pub fn decode_uint(output: &[u8]) -> Result<U256, LotteryError> {
    let (word, _) = unpack_word(output)?;
    Ok(U256::from_be_bytes(*word))
}

/// Decodes a single `address` return value
pub fn decode_address(output: &[u8]) -> Result<Address, LotteryError> {
    let (word, _) = unpack_word(output)?;
    let (padding, address) = array_refs![word, 12, 20];
    if padding.iter().any(|b| *b != 0) {
        return Err(LotteryError::InvalidResponse(
            "address word has dirty high bytes".to_string(),
        ));
    }
    Ok(Address::from(*address))
}

/// Narrows a decoded `uint256` to a u64
pub fn uint_to_u64(value: U256) -> Result<u64, LotteryError> {
    if value.bit_len() > 64 {
        return Err(LotteryError::InvalidResponse(format!(
            "{value} does not fit in 64 bits"
        )));
    }
    Ok(value.as_limbs()[0])
}

/// Extracts the message from an `Error(string)` revert payload
///
/// Returns `None` for custom errors, panics (`Panic(uint256)`) and anything
/// that does not decode cleanly.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < SELECTOR_LEN || data[..SELECTOR_LEN] != ERROR_STRING_SELECTOR {
        return None;
    }
    let body = &data[SELECTOR_LEN..];

    let (offset, _) = unpack_word(body).ok()?;
    let offset = word_to_usize(offset)?;
    let (length, rest) = unpack_word(body.get(offset..)?).ok()?;
    let length = word_to_usize(length)?;

    let reason = rest.get(..length)?;
    String::from_utf8(reason.to_vec()).ok()
}

/// Encodes an `Error(string)` revert payload
pub fn encode_revert_reason(reason: &str) -> Bytes {
    let padded_len = reason.len().div_ceil(WORD_LEN) * WORD_LEN;
    let mut buf = Vec::with_capacity(SELECTOR_LEN + 2 * WORD_LEN + padded_len);
    buf.extend_from_slice(&ERROR_STRING_SELECTOR);
    buf.extend_from_slice(&encode_uint(U256::from(WORD_LEN)));
    buf.extend_from_slice(&encode_uint(U256::from(reason.len())));
    buf.extend_from_slice(reason.as_bytes());
    buf.resize(SELECTOR_LEN + 2 * WORD_LEN + padded_len, 0);
    buf.into()
}

fn word_to_usize(word: &[u8; WORD_LEN]) -> Option<usize> {
    let (high, low) = array_refs![word, 24, 8];
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    usize::try_from(u64::from_be_bytes(*low)).ok()
}

/// Create the entry transaction: a bare value transfer to the contract
pub fn enter_lottery(
    contract: &Address,
    player: &Address,
    value: U256,
    gas: u64,
) -> TransactionRequest {
    TransactionRequest {
        from: *player,
        to: *contract,
        value: Some(value),
        gas: Some(U64::from(gas)),
        data: None,
    }
}

/// Create the pick_winner transaction
pub fn pick_winner(contract: &Address, manager: &Address, gas: u64) -> TransactionRequest {
    TransactionRequest {
        from: *manager,
        to: *contract,
        value: None,
        gas: Some(U64::from(gas)),
        data: Some(LotteryCall::PickWinner.pack()),
    }
}
