//! Network Selection
//!
//! Resolves the mainnet/testnet switch into the version bytes every
//! derivation and address encoding needs. Selected once per run and then
//! passed by value; nothing in the crate keeps a global network default.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{HdKeygenError, HdResult};
use crate::utils::crypto::extended_key_payload;

/// Which parameter set is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Mainnet,
    Testnet,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Mainnet => write!(f, "mainnet"),
            NetworkKind::Testnet => write!(f, "testnet"),
        }
    }
}

/// Version bytes for one network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParameters {
    pub kind: NetworkKind,
    /// Base58Check prefix of a P2PKH address
    pub p2pkh_version: u8,
    /// Serialized extended private key prefix
    pub xprv_version: [u8; 4],
    /// Serialized extended public key prefix
    pub xpub_version: [u8; 4],
}

pub const MAINNET: NetworkParameters = NetworkParameters {
    kind: NetworkKind::Mainnet,
    p2pkh_version: 0x00,
    xprv_version: [0x04, 0x88, 0xAD, 0xE4],
    xpub_version: [0x04, 0x88, 0xB2, 0x1E],
};

pub const TESTNET: NetworkParameters = NetworkParameters {
    kind: NetworkKind::Testnet,
    p2pkh_version: 0x6F,
    xprv_version: [0x04, 0x35, 0x83, 0x94],
    xpub_version: [0x04, 0x35, 0x87, 0xCF],
};

/// Pick the parameter set for a run
pub fn select_network(mainnet: bool) -> NetworkParameters {
    if mainnet {
        MAINNET
    } else {
        TESTNET
    }
}

impl NetworkParameters {
    pub fn is_mainnet(&self) -> bool {
        self.kind == NetworkKind::Mainnet
    }

    /// The `bitcoin` crate's view of this network, used for BIP-32 serialization
    pub fn bitcoin_kind(&self) -> bitcoin::NetworkKind {
        match self.kind {
            NetworkKind::Mainnet => bitcoin::NetworkKind::Main,
            NetworkKind::Testnet => bitcoin::NetworkKind::Test,
        }
    }

    /// Fail unless a Base58Check extended key carries this network's prefix
    pub fn check_extended_key(&self, extended_key: &str, private: bool) -> HdResult<()> {
        let payload = extended_key_payload(extended_key)?;
        let (expected, kind) = if private {
            (self.xprv_version, "private")
        } else {
            (self.xpub_version, "public")
        };

        if payload[..4] != expected[..] {
            return Err(HdKeygenError::invalid_key(format!(
                "Extended {} key version {} does not match {} ({})",
                kind,
                hex::encode(&payload[..4]),
                self.kind,
                hex::encode(expected)
            )));
        }
        Ok(())
    }
}

impl From<NetworkKind> for NetworkParameters {
    fn from(kind: NetworkKind) -> Self {
        select_network(kind == NetworkKind::Mainnet)
    }
}
