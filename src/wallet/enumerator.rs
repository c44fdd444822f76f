//! Wallet Enumeration
//!
//! Fans a wallet index range out across every namespace, producing one
//! [`WalletRecord`] per (wallet index, namespace) pair. Records come out in
//! wallet index order, Bitcoin before Ethereum within an index.
//!
//! The iterator is lazy and a pure function of its inputs: cloning it or
//! rebuilding it with the same arguments replays identical records.

use crate::error::HdResult;
use crate::types::{ExtendedKeyRecord, Namespace, WalletRecord, WalletReport};
use crate::utils::crypto::extended_key_to_hex;
use crate::utils::run_config::{ExtendedKeyFormat, RunConfig};
use crate::wallet::address::AddressEncoder;
use crate::wallet::derivation::KeyDeriver;
use crate::wallet::derivation_path::{build_master_path, build_path};
use crate::wallet::keygen::Seed;
use crate::wallet::network::NetworkParameters;

/// Only the first address under each wallet is enumerated
const ADDRESS_INDEX: u32 = 0;

/// Lazy sequence of wallet records over `[start, start + count)`
#[derive(Clone)]
pub struct WalletIter {
    deriver: KeyDeriver,
    next_wallet: u64,
    end_wallet: u64,
    namespace_pos: usize,
}

impl WalletIter {
    pub fn new(deriver: KeyDeriver, start_index: u32, count: u32) -> Self {
        Self {
            deriver,
            next_wallet: u64::from(start_index),
            end_wallet: u64::from(start_index) + u64::from(count),
            namespace_pos: 0,
        }
    }

    fn remaining(&self) -> usize {
        let wallets = self.end_wallet.saturating_sub(self.next_wallet) as usize;
        (wallets * Namespace::ALL.len()).saturating_sub(self.namespace_pos)
    }
}

impl Iterator for WalletIter {
    type Item = HdResult<WalletRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_wallet >= self.end_wallet {
            return None;
        }

        let namespace = Namespace::ALL[self.namespace_pos];
        // Indices past u32 are reported by build_path as out of range
        let wallet_index = u32::try_from(self.next_wallet).unwrap_or(u32::MAX);

        self.namespace_pos += 1;
        if self.namespace_pos == Namespace::ALL.len() {
            self.namespace_pos = 0;
            self.next_wallet += 1;
        }

        Some(derive_wallet_record(&self.deriver, namespace, wallet_index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WalletIter {}

/// Derive the record for one (wallet index, namespace) pair
pub fn derive_wallet_record(
    deriver: &KeyDeriver,
    namespace: Namespace,
    wallet_index: u32,
) -> HdResult<WalletRecord> {
    let path = build_path(namespace, wallet_index, ADDRESS_INDEX)?;
    let pair = deriver.derive(&path)?;
    let address = AddressEncoder::for_namespace(namespace).encode_with(
        deriver.secp(),
        &pair.private_key,
        deriver.network(),
    )?;

    crate::log_debug!(
        "enumerator",
        "Wallet derived",
        wallet_index = wallet_index,
        namespace = namespace,
        path = path
    );

    Ok(WalletRecord {
        wallet_index,
        namespace,
        path: path.to_string(),
        public_key: pair.public_key,
        private_key: pair.private_key,
        address,
    })
}

/// Records for `count` wallets starting at `start_index`; `count == 0` yields nothing
pub fn enumerate_wallets(
    seed: &Seed,
    network: NetworkParameters,
    start_index: u32,
    count: u32,
) -> HdResult<WalletIter> {
    let deriver = KeyDeriver::new(seed, network)?;
    Ok(WalletIter::new(deriver, start_index, count))
}

/// Top-level extended key pair at `m/244'`
pub fn master_record(deriver: &KeyDeriver) -> HdResult<ExtendedKeyRecord> {
    let path = build_master_path();
    let pair = deriver.derive(&path)?;
    Ok(ExtendedKeyRecord {
        path: path.to_string(),
        extended_private_key: pair.extended_private_key,
        extended_public_key: pair.extended_public_key,
    })
}

fn apply_xkey_format(record: ExtendedKeyRecord, format: ExtendedKeyFormat) -> HdResult<ExtendedKeyRecord> {
    match format {
        ExtendedKeyFormat::Base58 => Ok(record),
        ExtendedKeyFormat::Hex => Ok(ExtendedKeyRecord {
            extended_private_key: extended_key_to_hex(&record.extended_private_key)?,
            extended_public_key: extended_key_to_hex(&record.extended_public_key)?,
            path: record.path,
        }),
    }
}

/// Run a whole configuration. Stops at the first failing record.
pub fn generate_report(seed: &Seed, config: &RunConfig) -> HdResult<WalletReport> {
    config.validate()?;
    let network = config.network();
    let deriver = KeyDeriver::new(seed, network)?;

    let master = apply_xkey_format(master_record(&deriver)?, config.xkey_format)?;
    let wallets = WalletIter::new(deriver, config.start_index, config.wallet_count)
        .collect::<HdResult<Vec<_>>>()?;

    crate::log_debug!(
        "enumerator",
        "Report complete",
        network = network.kind,
        start_index = config.start_index,
        records = wallets.len()
    );

    Ok(WalletReport {
        network: network.kind,
        start_index: config.start_index,
        wallet_count: config.wallet_count,
        master,
        wallets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::wallet::derivation_path::HARDENED;
    use crate::wallet::keygen::seed_from_phrase;
    use crate::wallet::network::{MAINNET, TESTNET};

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_seed() -> Seed {
        seed_from_phrase(ABANDON_ABOUT, "").unwrap()
    }

    #[test]
    fn test_single_wallet_yields_one_record_per_namespace() {
        let records: Vec<_> = enumerate_wallets(&test_seed(), MAINNET, 0, 1)
            .unwrap()
            .collect::<HdResult<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].namespace, Namespace::Bitcoin);
        assert_eq!(records[0].path, "m/244'/0/0/0/0/0");
        assert_eq!(records[0].address, "19wLTzbwpazZGRAYDLtnfpiQiARjujQSq2");
        assert_eq!(records[1].namespace, Namespace::Ethereum);
        assert_eq!(records[1].path, "m/244'/0/60/0/0/0");
        assert_eq!(records[1].address, "0x9c836dA69aE928bB0A68d3A1DF73EbaC46Bf5362");
    }

    #[test]
    fn test_zero_count_yields_nothing() {
        let iter = enumerate_wallets(&test_seed(), MAINNET, 5, 0).unwrap();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.count(), 0);
    }

    #[test]
    fn test_range_respects_start_index() {
        let records: Vec<_> = enumerate_wallets(&test_seed(), MAINNET, 1, 2)
            .unwrap()
            .collect::<HdResult<_>>()
            .unwrap();

        let indices: Vec<u32> = records.iter().map(|r| r.wallet_index).collect();
        assert_eq!(indices, vec![1, 1, 2, 2]);
        assert_eq!(records[0].address, "1JqdBwBNmA4jjdoNYFrXeRBWgacc9pbouT");
        assert_eq!(records[1].address, "0xF27AAAd03DAa66F28B61C1c41c496919fDCD91B4");
    }

    #[test]
    fn test_iterator_is_restartable() {
        let iter = enumerate_wallets(&test_seed(), TESTNET, 0, 3).unwrap();
        let replay = iter.clone();
        let first: Vec<_> = iter.collect::<HdResult<_>>().unwrap();
        let second: Vec<_> = replay.collect::<HdResult<_>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let mut iter = enumerate_wallets(&test_seed(), MAINNET, 0, 2).unwrap();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn test_out_of_range_index_is_an_error_item() {
        let mut iter = enumerate_wallets(&test_seed(), MAINNET, HARDENED, 1).unwrap();
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_report_contents() {
        let report = generate_report(&test_seed(), &RunConfig::default().with_range(0, 1)).unwrap();
        assert_eq!(report.wallets.len(), 2);
        assert_eq!(report.master.path, "m/244'");
        assert_eq!(
            report.master.extended_public_key,
            "xpub68jrRzQopSUbTVUMAado6Z6o8pfzk7xfbJyCgKCyQ3bbtdNuJFAnbfVfQauKMLVUB3MUmZASSMMELZTCMFe8oQjhgVXxf3LVTZD9iRHhBcL"
        );
        assert_eq!(report.wallets_for(Namespace::Ethereum).count(), 1);
    }

    #[test]
    fn test_report_hex_xkeys() {
        let config = RunConfig::testnet()
            .with_range(0, 1)
            .with_xkey_format(ExtendedKeyFormat::Hex);
        let report = generate_report(&test_seed(), &config).unwrap();
        assert_eq!(report.master.extended_private_key.len(), 156);
        assert!(report.master.extended_private_key.starts_with("04358394"));
        assert!(report.master.extended_public_key.starts_with("043587cf"));
    }

    #[test]
    fn test_report_rejects_zero_count() {
        let err = generate_report(&test_seed(), &RunConfig::default().with_range(0, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
