//! Core type definitions for APWine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::ProtocolError;

/// On-chain token amount in the token's smallest unit.
///
/// Amounts come off the ledger as 256-bit words, so they are kept as
/// arbitrary-precision unsigned integers end to end.
pub type Amount = num_bigint::BigUint;

/// EVM account or contract address (20 bytes, `0x`-prefixed, lower-case hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address. Checksum casing is accepted but not verified.
    pub fn parse(addr: &str) -> Result<Self, ProtocolError> {
        let hex_part = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .ok_or_else(|| ProtocolError::InvalidAddress {
                address: addr.to_string(),
            })?;

        if hex_part.len() != 40 || hex::decode(hex_part).is_err() {
            return Err(ProtocolError::InvalidAddress {
                address: addr.to_string(),
            });
        }

        Ok(Self(format!("0x{}", hex_part.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash (32 bytes, hex-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Kovan,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Kovan => "kovan",
        }
    }

    /// EIP-155 chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Kovan => 42,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "kovan" => Ok(Self::Kovan),
            other => Err(ProtocolError::NetworkNotSupported {
                network: other.to_string(),
            }),
        }
    }
}

/// The three token kinds an APWine AMM trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Principal token, present on one side of every pool
    #[serde(rename = "PT")]
    Pt,
    /// Yield-bearing deposit asset
    #[serde(rename = "Underlying")]
    Underlying,
    /// Future yield token
    #[serde(rename = "FYT")]
    Fyt,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [TokenKind::Pt, TokenKind::Underlying, TokenKind::Fyt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pt => "PT",
            Self::Underlying => "Underlying",
            Self::Fyt => "FYT",
        }
    }

    /// Dense index used by fixed-size lookup tables
    pub const fn index(&self) -> usize {
        match self {
            Self::Pt => 0,
            Self::Underlying => 1,
            Self::Fyt => 2,
        }
    }

    /// Which side of a pool pair this token sits on: 0 for PT, 1 otherwise
    pub const fn side_index(&self) -> u8 {
        match self {
            Self::Pt => 0,
            Self::Underlying | Self::Fyt => 1,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pt" => Ok(Self::Pt),
            "underlying" => Ok(Self::Underlying),
            "fyt" => Ok(Self::Fyt),
            _ => Err(ProtocolError::UnknownToken {
                name: s.to_string(),
            }),
        }
    }
}

/// AMM pool (pair) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PoolId {
    /// PT / Underlying
    Zero,
    /// PT / FYT
    One,
}

impl PoolId {
    pub const ALL: [PoolId; 2] = [PoolId::Zero, PoolId::One];

    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// The pair traded by this pool, PT first.
    pub const fn tokens(&self) -> [TokenKind; 2] {
        match self {
            Self::Zero => [TokenKind::Pt, TokenKind::Underlying],
            Self::One => [TokenKind::Pt, TokenKind::Fyt],
        }
    }
}

impl TryFrom<u8> for PoolId {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            other => Err(ProtocolError::UnknownPool { id: other }),
        }
    }
}

impl From<PoolId> for u8 {
    fn from(pool: PoolId) -> Self {
        pool.as_u8()
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Absolute execution deadline, Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(pub u64);

impl Deadline {
    pub fn from_unix(secs: u64) -> Self {
        Self(secs)
    }

    /// Deadline `window` from now
    pub fn after(window: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(now.as_secs().saturating_add(window.as_secs()))
    }

    pub fn as_unix(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constants
pub mod constants {
    /// Default swap deadline window (seconds)
    pub const DEFAULT_DEADLINE_SECS: u64 = 60;
}
