//! Bitcom protocol registry
//!
//! Maps human-readable protocol names to the prefix token pushed on-chain. Lookups
//! go the other way round: the decoder sees a token and wants the name.

use serde::{Deserialize, Serialize};

/// Protocol prefix constants (Source: the respective protocol specifications on bitcom)
pub mod constants {
    /// B:// file and content attachment
    pub const B_PREFIX: &str = "19HxigV4QyBv3tHpQVcUEQyq1pzZVdoAut";

    /// Magic Attribute Protocol - arbitrary key/value metadata
    pub const MAP_PREFIX: &str = "1PuQa7K62MiKCtssSLKy1kh56WWU7MtUR5";

    /// Metanet hierarchical naming
    pub const METANET_PREFIX: &str = "meta";

    /// Author Identity Protocol - signature attestation
    pub const AIP_PREFIX: &str = "15PciHG22SNLQJXMoSUaWVi7WSqc7hCfva";

    /// Bit.sv placeholder protocol (registered, no schema)
    pub const BITSV_PREFIX: &str = "1L8eNuA8ToLGK5aV4d5d9rXUAbRZUxKrhF";

    pub const B: &str = "B";
    pub const MAP: &str = "MAP";
    pub const METANET: &str = "METANET";
    pub const AIP: &str = "AIP";
    pub const BITSV: &str = "Bit.sv";
}

/// A (name, prefix) registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub name: String,
    pub prefix: String,
}

/// Ordered protocol table. The first entry matching a token wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRegistry {
    entries: Vec<ProtocolEntry>,
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        use constants::*;

        let mut registry = Self::empty();
        registry.register(B, B_PREFIX);
        registry.register(MAP, MAP_PREFIX);
        registry.register(METANET, METANET_PREFIX);
        registry.register(AIP, AIP_PREFIX);
        registry.register(BITSV, BITSV_PREFIX);
        registry
    }
}

impl ProtocolRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `name` under `prefix`. Re-registering a name replaces its prefix.
    pub fn register(&mut self, name: impl Into<String>, prefix: impl Into<String>) {
        let name = name.into();
        let prefix = prefix.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.prefix = prefix,
            None => self.entries.push(ProtocolEntry { name, prefix }),
        }
    }

    /// Canonical protocol name for an on-chain token, or `None` if unregistered
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.prefix == token)
            .map(|entry| entry.name.as_str())
    }

    pub fn prefix_for(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.prefix.as_str())
    }

    pub fn entries(&self) -> &[ProtocolEntry] {
        &self.entries
    }
}
