//! Address Validation
//!
//! Decodes and checks the two address formats the encoders produce:
//! - Base58Check P2PKH with the network's version byte
//! - EIP-55 checksum validation and normalization

use bitcoin::base58;
use thiserror::Error;

use crate::error::{HdKeygenError, HdResult};
use crate::types::Namespace;
use crate::utils::crypto::to_checksum_address;
use crate::wallet::network::NetworkParameters;

/// Why a Base58Check address failed to decode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressDecodeError {
    #[error("invalid Base58 encoding")]
    InvalidBase58,
    #[error("expected 25 decoded bytes, got {0}")]
    InvalidLength(usize),
    #[error("invalid Base58Check checksum")]
    InvalidChecksum,
    #[error("version byte 0x{found:02X} does not match network (expected 0x{expected:02X})")]
    WrongVersion { expected: u8, found: u8 },
}

impl From<AddressDecodeError> for HdKeygenError {
    fn from(e: AddressDecodeError) -> Self {
        HdKeygenError::invalid_address(e.to_string())
    }
}

/// Detailed address validation result
#[derive(Debug, Clone)]
pub struct AddressValidation {
    pub is_valid: bool,
    pub normalized: Option<String>,
    pub checksum_valid: bool,
    pub network_match: bool,
    pub warnings: Vec<String>,
}

impl AddressValidation {
    fn rejected(checksum_valid: bool, network_match: bool, warning: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            normalized: None,
            checksum_valid,
            network_match,
            warnings: vec![warning.into()],
        }
    }
}

/// Decode a P2PKH address back to its 20-byte public key hash
pub fn decode_bitcoin_address(address: &str, network: NetworkParameters) -> HdResult<[u8; 20]> {
    Ok(decode_p2pkh(address, network)?)
}

/// Base58Check decode with a typed failure reason
pub fn decode_p2pkh(
    address: &str,
    network: NetworkParameters,
) -> Result<[u8; 20], AddressDecodeError> {
    let address = address.trim();
    let decoded = base58::decode(address).map_err(|_| AddressDecodeError::InvalidBase58)?;

    if decoded.len() != 25 {
        return Err(AddressDecodeError::InvalidLength(decoded.len()));
    }

    // Version byte plus 20-byte hash once the checksum is stripped
    let payload =
        base58::decode_check(address).map_err(|_| AddressDecodeError::InvalidChecksum)?;

    if payload[0] != network.p2pkh_version {
        return Err(AddressDecodeError::WrongVersion {
            expected: network.p2pkh_version,
            found: payload[0],
        });
    }

    let mut pubkey_hash = [0u8; 20];
    pubkey_hash.copy_from_slice(&payload[1..]);
    Ok(pubkey_hash)
}

/// Validate Base58Check Bitcoin address
pub fn validate_bitcoin_address(address: &str, network: NetworkParameters) -> AddressValidation {
    match decode_p2pkh(address, network) {
        Ok(_) => AddressValidation {
            is_valid: true,
            normalized: Some(address.trim().to_string()),
            checksum_valid: true,
            network_match: true,
            warnings: vec![],
        },
        Err(e @ AddressDecodeError::WrongVersion { .. }) => {
            AddressValidation::rejected(true, false, e.to_string())
        }
        Err(e) => AddressValidation::rejected(false, false, e.to_string()),
    }
}

/// Validate EVM address with EIP-55 checksum
pub fn validate_ethereum_address(address: &str) -> AddressValidation {
    let trimmed = address.trim();
    let mut warnings = Vec::new();

    // Basic format check
    let hex_part = match trimmed.strip_prefix("0x") {
        Some(rest) if rest.len() == 40 => rest,
        _ => {
            return AddressValidation::rejected(
                false,
                true,
                "Invalid format: expected 0x followed by 40 hex characters",
            )
        }
    };

    // Validate hex characters
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return AddressValidation::rejected(false, true, "Invalid hex characters");
    }

    let bytes = match hex::decode(hex_part.to_ascii_lowercase()) {
        Ok(b) => b,
        Err(_) => return AddressValidation::rejected(false, true, "Invalid address bytes"),
    };

    let checksummed = to_checksum_address(&bytes);
    let checksum_valid = trimmed == checksummed;

    // All lowercase or all uppercase carries no checksum at all
    let has_mixed_case = hex_part.chars().any(|c| c.is_ascii_uppercase())
        && hex_part.chars().any(|c| c.is_ascii_lowercase());

    if !checksum_valid {
        if has_mixed_case {
            warnings.push("Invalid EIP-55 checksum - address may be corrupted".to_string());
        } else {
            warnings.push("Address has no EIP-55 checksum - using normalized form".to_string());
        }
    }

    AddressValidation {
        is_valid: checksum_valid || !has_mixed_case,
        normalized: Some(checksummed),
        checksum_valid,
        network_match: true,
        warnings,
    }
}

/// Strict EIP-55 check: the address must be exactly its checksummed form
pub fn is_valid_checksum_address(address: &str) -> bool {
    validate_ethereum_address(address).checksum_valid
}

/// Raw 20 bytes of an Ethereum address, case-insensitive
pub fn decode_ethereum_address(address: &str) -> HdResult<[u8; 20]> {
    let validation = validate_ethereum_address(address);
    let normalized = match validation.normalized {
        Some(n) if validation.is_valid => n,
        _ => {
            return Err(HdKeygenError::invalid_address(format!(
                "Invalid Ethereum address '{}': {}",
                address,
                validation.warnings.join("; ")
            )))
        }
    };
    let bytes = hex::decode(normalized[2..].to_ascii_lowercase())?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Validate an address for a namespace
pub fn validate_address(address: &str, namespace: Namespace, network: NetworkParameters) -> AddressValidation {
    match namespace {
        Namespace::Bitcoin => validate_bitcoin_address(address, network),
        Namespace::Ethereum => validate_ethereum_address(address),
    }
}
