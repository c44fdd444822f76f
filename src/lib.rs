//! hd-keygen Core Library
//!
//! Deterministic BIP-32 key and address derivation under the fixed
//! `m/244'/0/{namespace}/{wallet}/0/{address}` scheme, for Bitcoin P2PKH
//! (namespace 0) and Ethereum EIP-55 (namespace 60) addresses.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: seed intake, network selection, path building, derivation,
//!   address encoding and validation, wallet enumeration
//! - **utils**: hashing helpers, redacting logger, run configuration
//! - **ffi**: C-ABI exports taking and returning JSON
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `hdkeygen_free_string`)
//!
//! # Security
//!
//! Seeds are held in `zeroize` buffers and cleared when dropped. Log fields
//! that carry private material are redacted before they are printed.
//!
//! # Example
//!
//! ```rust,ignore
//! use hd_keygen::{generate_report, seed_from_phrase, RunConfig};
//!
//! let seed = seed_from_phrase(phrase, "")?;
//! let report = generate_report(&seed, &RunConfig::default())?;
//! println!("Master xpub: {}", report.master.extended_public_key);
//! ```

pub mod error;
pub mod ffi;
pub mod types;
pub mod utils;
pub mod wallet;

// Re-export key types for convenience
pub use error::{ErrorCode, HdKeygenError, HdResult};
pub use types::*;

pub use utils::crypto::{extended_key_to_hex, keccak256, to_checksum_address};
pub use utils::run_config::{ExtendedKeyFormat, RunConfig};

pub use wallet::{
    build_master_path, build_path, decode_bitcoin_address, decode_ethereum_address, derive_key_pair,
    encode_address, enumerate_wallets, generate_report, is_valid_checksum_address, seed_from_phrase,
    select_network, validate_address, validate_ethereum_address, DerivationPath, KeyDeriver,
    NetworkKind, NetworkParameters, Seed, WalletIter, MAINNET, TESTNET,
};

pub use ffi::{hdkeygen_derive_key_pair, hdkeygen_derive_wallets, hdkeygen_free_string};
