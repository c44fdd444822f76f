//! Run Configuration
//!
//! Settings for a single derivation run, validated once before any key
//! material is touched.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HdKeygenError, HdResult};
use crate::wallet::derivation_path::HARDENED;
use crate::wallet::network::{select_network, NetworkParameters};

/// Wallets derived when no count is given
pub const DEFAULT_WALLET_COUNT: u32 = 10;

/// How extended keys are rendered in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtendedKeyFormat {
    /// `xprv...` / `tprv...` strings
    #[default]
    Base58,
    /// Hex of the 78-byte serialization
    Hex,
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mainnet: bool,
    pub wallet_count: u32,
    pub start_index: u32,
    pub xkey_format: ExtendedKeyFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mainnet: true,
            wallet_count: DEFAULT_WALLET_COUNT,
            start_index: 0,
            xkey_format: ExtendedKeyFormat::Base58,
        }
    }
}

impl RunConfig {
    pub fn testnet() -> Self {
        Self {
            mainnet: false,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, start_index: u32, wallet_count: u32) -> Self {
        self.start_index = start_index;
        self.wallet_count = wallet_count;
        self
    }

    pub fn with_xkey_format(mut self, format: ExtendedKeyFormat) -> Self {
        self.xkey_format = format;
        self
    }

    /// Network parameters for this run
    pub fn network(&self) -> NetworkParameters {
        select_network(self.mainnet)
    }

    /// One past the last wallet index
    pub fn end_index(&self) -> u64 {
        u64::from(self.start_index) + u64::from(self.wallet_count)
    }

    /// Validate the settings
    pub fn validate(&self) -> HdResult<()> {
        if self.wallet_count == 0 {
            return Err(HdKeygenError::invalid_input("Wallet count must be greater than zero"));
        }

        if self.end_index() > u64::from(HARDENED) {
            return Err(HdKeygenError::invalid_input(format!(
                "Wallet range {}..{} leaves the non-hardened index space",
                self.start_index,
                self.end_index()
            )));
        }

        Ok(())
    }
}
