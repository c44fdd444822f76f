//! Key Derivation
//!
//! Walks the BIP-32 tree from the seed's master key down a
//! [`DerivationPath`] and reports the key quadruple at the end of it.
//! Hardened segments feed the parent private key into HMAC-SHA512, normal
//! segments the parent public key; both are handled by `bitcoin::bip32`.
//!
//! The seed buffer is zeroized on drop, but the master `Xpriv` held by a
//! [`KeyDeriver`] (and every clone of it) is a plain value that is not
//! wiped.

use bitcoin::bip32::{self, Xpriv, Xpub};
use bitcoin::secp256k1::{All, Secp256k1};

use crate::error::HdResult;
use crate::types::ExtendedKeyPair;
use crate::wallet::derivation_path::DerivationPath;
use crate::wallet::keygen::Seed;
use crate::wallet::network::NetworkParameters;

/// Master key for one seed under one network, ready to derive children
#[derive(Clone)]
pub struct KeyDeriver {
    secp: Secp256k1<All>,
    master: Xpriv,
    network: NetworkParameters,
}

impl KeyDeriver {
    pub fn new(seed: &Seed, network: NetworkParameters) -> HdResult<Self> {
        let master = Xpriv::new_master(network.bitcoin_kind(), seed.as_bytes())?;
        crate::log_debug!("derivation", "Master key ready", network = network.kind);
        Ok(Self {
            secp: Secp256k1::new(),
            master,
            network,
        })
    }

    pub fn network(&self) -> NetworkParameters {
        self.network
    }

    pub fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }

    /// Extended private key at `path`
    pub fn derive_xpriv(&self, path: &DerivationPath) -> HdResult<Xpriv> {
        self.derive_child(&path.to_bip32()?)
    }

    fn derive_child(&self, path: &bip32::DerivationPath) -> HdResult<Xpriv> {
        let child = self.master.derive_priv(&self.secp, path)?;
        Ok(child)
    }

    /// Key quadruple at `path`
    pub fn derive(&self, path: &DerivationPath) -> HdResult<ExtendedKeyPair> {
        let child = self.derive_xpriv(path)?;
        let xpub = Xpub::from_priv(&self.secp, &child);

        let secret_key = child.private_key;
        let public_key = secret_key.public_key(&self.secp);

        crate::log_debug!("derivation", "Derived key pair", path = path, depth = child.depth);

        Ok(ExtendedKeyPair {
            extended_private_key: child.to_string(),
            extended_public_key: xpub.to_string(),
            private_key: hex::encode(secret_key.secret_bytes()),
            public_key: hex::encode(public_key.serialize()),
        })
    }
}

/// Derive the key quadruple for a single (seed, path, network)
pub fn derive_key_pair(
    seed: &Seed,
    path: &DerivationPath,
    network: NetworkParameters,
) -> HdResult<ExtendedKeyPair> {
    KeyDeriver::new(seed, network)?.derive(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Namespace;
    use crate::wallet::derivation_path::{build_master_path, build_path};
    use crate::wallet::keygen::seed_from_phrase;
    use crate::wallet::network::{MAINNET, TESTNET};
    use std::str::FromStr;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_seed() -> Seed {
        seed_from_phrase(ABANDON_ABOUT, "").unwrap()
    }

    #[test]
    fn test_master_path_key_pair() {
        let pair = derive_key_pair(&test_seed(), &build_master_path(), MAINNET).unwrap();
        assert_eq!(
            pair.extended_private_key,
            "xprv9ukW2Usuz4vJF1Pt4Z6njRA4anqWLfEpE63bsvoMqi4d1q3kkhrY3sBBZHcjDxaZTR9n6gCRhWD3AqJt5VkeGEECqu8WXuXwW1ZTEJrCguj"
        );
        assert_eq!(
            pair.private_key,
            "c70a24bb0c7cbe19fc68c101f23a7831a3501294ed4e344e22494e15a1b1a6ff"
        );
        assert_eq!(
            pair.public_key,
            "03f0165babac4144f48f55b3a08ebe09b7cfc5c1e813557374dca334512efd0043"
        );
    }

    fn derive_raw(seed: &Seed, path: &str) -> Xpriv {
        let deriver = KeyDeriver::new(seed, MAINNET).unwrap();
        deriver.derive_child(&bip32::DerivationPath::from_str(path).unwrap()).unwrap()
    }

    #[test]
    fn test_root_matches_standard_wallets() {
        let root = derive_raw(&test_seed(), "m");
        assert_eq!(
            root.to_string(),
            "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu"
        );
        assert_eq!(
            Xpub::from_priv(&Secp256k1::new(), &root).to_string(),
            "xpub661MyMwAqRbcFkPHucMnrGNzDwb6teAX1RbKQmqtEF8kK3Z7LZ59qafCjB9eCRLiTVG3uxBxgKvRgbubRhqSKXnGGb1aoaqLrpMBDrVxga8"
        );
    }

    #[test]
    fn test_bip32_vector_one() {
        let seed = Seed::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        assert_eq!(
            derive_raw(&seed, "m").to_string(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            derive_raw(&seed, "m/0'/1").to_string(),
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs"
        );
    }

    #[test]
    fn test_network_changes_only_the_envelope() {
        let path = build_path(Namespace::Bitcoin, 0, 0).unwrap();
        let main = derive_key_pair(&test_seed(), &path, MAINNET).unwrap();
        let test = derive_key_pair(&test_seed(), &path, TESTNET).unwrap();

        assert_eq!(main.private_key, test.private_key);
        assert_eq!(main.public_key, test.public_key);
        assert!(main.extended_private_key.starts_with("xprv"));
        assert!(main.extended_public_key.starts_with("xpub"));
        assert!(test.extended_private_key.starts_with("tprv"));
        assert!(test.extended_public_key.starts_with("tpub"));
    }

    #[test]
    fn test_deriver_reuse_is_deterministic() {
        let deriver = KeyDeriver::new(&test_seed(), MAINNET).unwrap();
        let path = build_path(Namespace::Ethereum, 4, 0).unwrap();
        assert_eq!(deriver.derive(&path).unwrap(), deriver.derive(&path).unwrap());
        assert_eq!(deriver.derive(&path).unwrap(), derive_key_pair(&test_seed(), &path, MAINNET).unwrap());
    }

    #[test]
    fn test_raw_key_shapes() {
        let path = build_path(Namespace::Ethereum, 0, 0).unwrap();
        let pair = derive_key_pair(&test_seed(), &path, MAINNET).unwrap();
        assert_eq!(pair.private_key.len(), 64);
        assert_eq!(pair.public_key.len(), 66);
        assert!(pair.public_key.starts_with("02") || pair.public_key.starts_with("03"));
    }

    #[test]
    fn test_xpriv_depth_follows_path() {
        let deriver = KeyDeriver::new(&test_seed(), MAINNET).unwrap();
        let path = build_path(Namespace::Bitcoin, 0, 0).unwrap();
        assert_eq!(deriver.derive_xpriv(&path).unwrap().depth, 6);
        assert_eq!(deriver.derive_xpriv(&build_master_path()).unwrap().depth, 1);
    }
}
