//! Seed Input
//!
//! Turns a BIP-39 mnemonic into the seed bytes the derivation engine
//! consumes. The engine itself never sees words, only a validated [`Seed`].
//!
//! SECURITY: seed bytes are zeroized on drop.

use bip39::{Language, Mnemonic};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{HdKeygenError, HdResult};

/// Word count the CLI insists on
pub const MNEMONIC_WORDCOUNT: usize = 24;

/// BIP-32 bounds on seed length, in bytes
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Seed bytes for one run
#[derive(Clone)]
pub struct Seed(Zeroizing<Vec<u8>>);

impl Seed {
    pub fn from_bytes(bytes: &[u8]) -> HdResult<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&bytes.len()) {
            return Err(HdKeygenError::invalid_seed(format!(
                "Seed must be {} to {} bytes",
                MIN_SEED_LEN, MAX_SEED_LEN
            ))
            .with_details(format!("got {} bytes", bytes.len())));
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    pub fn from_hex(seed_hex: &str) -> HdResult<Self> {
        let bytes = Zeroizing::new(
            hex::decode(seed_hex.trim())
                .map_err(|e| HdKeygenError::invalid_seed(format!("Seed is not valid hex: {}", e)))?,
        );
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed([REDACTED:{}bytes])", self.0.len())
    }
}

/// Lowercase, trim and single-space the words of a phrase
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an English mnemonic of any valid BIP-39 length
pub fn parse_mnemonic(phrase: &str) -> HdResult<Mnemonic> {
    let normalized = normalize_phrase(phrase);
    Mnemonic::parse_in(Language::English, normalized.as_str())
        .map_err(|e| HdKeygenError::invalid_mnemonic(format!("Invalid mnemonic: {}", e)))
}

/// Parse a mnemonic that must be exactly 24 words
pub fn parse_mnemonic_strict(phrase: &str) -> HdResult<Mnemonic> {
    let count = phrase.split_whitespace().count();
    if count != MNEMONIC_WORDCOUNT {
        return Err(HdKeygenError::invalid_mnemonic(format!(
            "Expected {} words, got {}",
            MNEMONIC_WORDCOUNT, count
        )));
    }
    parse_mnemonic(phrase)
}

/// Stretch a mnemonic into a seed (PBKDF2, per BIP-39)
pub fn seed_from_mnemonic(mnemonic: &Mnemonic, passphrase: &str) -> HdResult<Seed> {
    let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
    Seed::from_bytes(seed.as_ref())
}

/// Parse and stretch in one step
pub fn seed_from_phrase(phrase: &str, passphrase: &str) -> HdResult<Seed> {
    let mnemonic = parse_mnemonic(phrase)?;
    seed_from_mnemonic(&mnemonic, passphrase)
}
