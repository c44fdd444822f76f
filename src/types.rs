//! Shared types for hd-keygen
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization across the CLI, FFI and validator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{HdKeygenError, HdResult};
use crate::wallet::NetworkKind;

// =============================================================================
// Namespaces
// =============================================================================

/// Blockchain address family, identified by its numeric namespace id.
///
/// The set is closed: adding a chain means adding a variant here and an
/// encoder arm in `wallet::address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Bitcoin,
    Ethereum,
}

impl Namespace {
    /// Enumeration order used for every wallet index
    pub const ALL: [Namespace; 2] = [Namespace::Bitcoin, Namespace::Ethereum];

    pub fn id(&self) -> u32 {
        match self {
            Namespace::Bitcoin => 0,
            Namespace::Ethereum => 60,
        }
    }

    pub fn from_id(id: u32) -> HdResult<Self> {
        match id {
            0 => Ok(Namespace::Bitcoin),
            60 => Ok(Namespace::Ethereum),
            other => Err(HdKeygenError::unsupported_namespace(other)),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Namespace::Bitcoin => "BTC",
            Namespace::Ethereum => "ETH",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

// =============================================================================
// Derived key material
// =============================================================================

/// Key material derived for exactly one (seed, path) combination.
///
/// Extended keys are Base58Check (`xprv`/`xpub`, `tprv`/`tpub` on testnet),
/// raw keys are lowercase hex: 32-byte scalar and 33-byte compressed point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedKeyPair {
    pub extended_private_key: String,
    pub extended_public_key: String,
    pub private_key: String,
    pub public_key: String,
}

/// One derived wallet address for a single namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub wallet_index: u32,
    pub namespace: Namespace,
    pub path: String,
    pub public_key: String,
    pub private_key: String,
    pub address: String,
}

/// Top-level extended key pair reported at the fixed master path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedKeyRecord {
    pub path: String,
    pub extended_private_key: String,
    pub extended_public_key: String,
}

/// Everything a single run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletReport {
    pub network: NetworkKind,
    pub start_index: u32,
    pub wallet_count: u32,
    pub master: ExtendedKeyRecord,
    pub wallets: Vec<WalletRecord>,
}

impl WalletReport {
    /// Records for one namespace, in wallet index order
    pub fn wallets_for(&self, namespace: Namespace) -> impl Iterator<Item = &WalletRecord> {
        self.wallets.iter().filter(move |w| w.namespace == namespace)
    }
}

// =============================================================================
// FFI envelope
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<HdKeygenError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: HdKeygenError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed","details":null}}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_namespace_ids() {
        assert_eq!(Namespace::Bitcoin.id(), 0);
        assert_eq!(Namespace::Ethereum.id(), 60);
        assert_eq!(Namespace::from_id(60).unwrap(), Namespace::Ethereum);
        assert_eq!(Namespace::ALL.len(), 2);
    }

    #[test]
    fn test_unknown_namespace_rejected() {
        let err = Namespace::from_id(501).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedNamespace);
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::ok("payload".to_string());
        let json = response.to_json();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("payload"));

        let failed: ApiResponse<()> = ApiResponse::err(HdKeygenError::invalid_seed("empty"));
        assert!(failed.to_json().contains("invalid_seed"));
    }
}
