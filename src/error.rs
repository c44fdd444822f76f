//! Unified error types for hd-keygen
//!
//! Every fallible operation in the crate returns [`HdResult`]. The error
//! carries a machine-readable [`ErrorCode`] so the CLI, the FFI layer and
//! the report validator can all classify failures the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all derivation and encoding operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdKeygenError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl HdKeygenError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_seed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidSeed, msg)
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidKey, msg)
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPath, msg)
    }

    pub fn unsupported_namespace(id: u32) -> Self {
        Self::new(
            ErrorCode::UnsupportedNamespace,
            format!("Namespace {} is not supported (expected 0 or 60)", id),
        )
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }
}

impl fmt::Display for HdKeygenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for HdKeygenError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Derivation errors
    InvalidSeed,
    InvalidKey,
    InvalidPath,
    UnsupportedNamespace,

    // Input errors
    InvalidMnemonic,
    InvalidInput,
    InvalidAddress,

    // Crypto errors
    CryptoError,

    // Parse errors
    HexError,
    JsonError,

    // Internal
    Internal,
}

/// Result type alias for hd-keygen operations
pub type HdResult<T> = Result<T, HdKeygenError>;

// Conversions from common error types

impl From<serde_json::Error> for HdKeygenError {
    fn from(e: serde_json::Error) -> Self {
        HdKeygenError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for HdKeygenError {
    fn from(e: hex::FromHexError) -> Self {
        HdKeygenError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for HdKeygenError {
    fn from(e: std::io::Error) -> Self {
        HdKeygenError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<bitcoin::bip32::Error> for HdKeygenError {
    fn from(e: bitcoin::bip32::Error) -> Self {
        use bitcoin::bip32::Error as Bip32Error;

        match e {
            Bip32Error::Secp256k1(inner) => {
                HdKeygenError::invalid_key(format!("BIP32 child key is not a valid point: {}", inner))
            }
            Bip32Error::InvalidChildNumber(n) => {
                HdKeygenError::invalid_path(format!("Child number {} is out of range", n))
            }
            Bip32Error::InvalidChildNumberFormat | Bip32Error::InvalidDerivationPathFormat => {
                HdKeygenError::invalid_path(format!("BIP32 error: {}", e))
            }
            other => HdKeygenError::crypto_error(format!("BIP32 error: {}", other)),
        }
    }
}

impl From<bitcoin::secp256k1::Error> for HdKeygenError {
    fn from(e: bitcoin::secp256k1::Error) -> Self {
        HdKeygenError::invalid_key(format!("Secp256k1 error: {}", e))
    }
}

impl From<bip39::Error> for HdKeygenError {
    fn from(e: bip39::Error) -> Self {
        HdKeygenError::invalid_mnemonic(format!("BIP39 error: {}", e))
    }
}
