//! Core type definitions for the Sluice ledger
//!
//! This module defines the fundamental types shared by every component:
//! account and content identifiers, amount/height scalars, and token
//! metadata.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Token amount in atomic units (u128 for high precision)
pub type Amount = u128;

/// Checkpoint identifier. Ids are allocated sequentially starting at 1;
/// 0 always means "no checkpoint".
pub type CheckpointId = u64;

/// Chain block height
pub type BlockHeight = u64;

/// AccountId - unique identifier for ledger accounts
///
/// Serializes as a hex string so it can key JSON maps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccountId {
    /// Derived from key material or seed bytes
    id: [u8; 32],
}

impl AccountId {
    pub fn new(id: [u8; 32]) -> Self {
        Self { id }
    }

    /// Derive an AccountId from arbitrary seed material using BLAKE3
    pub fn from_seed(seed: &[u8]) -> Self {
        let hash = blake3::hash(seed);
        Self {
            id: *hash.as_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.id
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes);
        Ok(Self { id })
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..12])
    }
}

/// ContentId - fixed identifier derived from an opaque content URI
///
/// ContentId = BLAKE3(uri). The id is stable for the lifetime of a token
/// and is only ever compared for equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentId {
    /// 256-bit BLAKE3 hash
    hash: [u8; 32],
}

impl ContentId {
    pub fn new(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    /// Create a ContentId from the URI's bytes using BLAKE3
    pub fn from_uri(uri: &str) -> Self {
        let hash = blake3::hash(uri.as_bytes());
        Self {
            hash: *hash.as_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("content id must be 32 bytes"));
        }
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Self { hash })
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Display metadata attached to a token at construction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable name
    pub name: String,

    /// Ticker symbol
    pub symbol: String,

    /// Decimal places for display
    pub decimals: u8,
}

impl TokenMetadata {
    /// Create metadata with the default 18 decimal places
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: 18,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}
