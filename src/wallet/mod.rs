//! Wallet Module
//!
//! Seed intake, network selection, path building, BIP-32 derivation,
//! address encoding and validation, and wallet enumeration.

pub mod address;
pub mod address_validation;
pub mod derivation;
pub mod derivation_path;
pub mod enumerator;
pub mod keygen;
pub mod network;

pub use address::{encode_address, AddressEncoder};
pub use address_validation::{
    decode_bitcoin_address, decode_ethereum_address, is_valid_checksum_address, validate_address,
    validate_ethereum_address, AddressValidation,
};
pub use derivation::{derive_key_pair, KeyDeriver};
pub use derivation_path::{build_master_path, build_path, DerivationComponent, DerivationPath};
pub use enumerator::{enumerate_wallets, generate_report, master_record, WalletIter};
pub use keygen::{parse_mnemonic, parse_mnemonic_strict, seed_from_mnemonic, seed_from_phrase, Seed};
pub use network::{select_network, NetworkKind, NetworkParameters, MAINNET, TESTNET};
