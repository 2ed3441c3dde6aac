// crates/thkx-core/src/address.rs
//
// Account addresses for the THKX ledger.
//
// An address is a 20-byte account identity supplied by the external
// signing/authorization layer. The core never verifies signatures; it
// trusts that the caller identity attached to each operation was already
// authenticated before the call reached it.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LedgerError;

/// A 20-byte account address.
///
/// Serialized as a lowercase `0x`-prefixed hex string so addresses can key
/// JSON maps in snapshots and journal records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address, reserved as a non-account sentinel.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Build an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Render as a lowercase `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        let body: String = self.0.iter().map(|b| format!("{:02x}", b)).collect();
        format!("0x{}", body)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        if body.len() != 40 {
            return Err(LedgerError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        for (i, chunk) in body.as_bytes().chunks(2).enumerate() {
            let hi = hex_nibble(chunk[0]).ok_or_else(|| LedgerError::InvalidAddress(s.to_string()))?;
            let lo = hex_nibble(chunk[1]).ok_or_else(|| LedgerError::InvalidAddress(s.to_string()))?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Address(bytes))
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct AddressVisitor;

impl Visitor<'_> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 0x-prefixed 40-digit hex address")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Address, E> {
        Address::from_str(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(AddressVisitor)
    }
}
