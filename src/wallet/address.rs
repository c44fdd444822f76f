//! Address Encoding
//!
//! Turns a derived raw private key into the address string of its
//! namespace:
//! - Bitcoin (0): Base58Check P2PKH of the compressed public key
//! - Ethereum (60): EIP-55 checksummed Keccak-256 address

use bitcoin::base58;
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

use crate::error::{HdKeygenError, HdResult};
use crate::types::Namespace;
use crate::utils::crypto::{hash160, keccak256, strip_hex_prefix, to_checksum_address};
use crate::wallet::network::NetworkParameters;

/// Encoder for one namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressEncoder {
    Bitcoin,
    Ethereum,
}

impl AddressEncoder {
    pub fn for_namespace(namespace: Namespace) -> Self {
        match namespace {
            Namespace::Bitcoin => AddressEncoder::Bitcoin,
            Namespace::Ethereum => AddressEncoder::Ethereum,
        }
    }

    pub fn namespace(&self) -> Namespace {
        match self {
            AddressEncoder::Bitcoin => Namespace::Bitcoin,
            AddressEncoder::Ethereum => Namespace::Ethereum,
        }
    }

    /// Encode the address for a hex private key
    pub fn encode(&self, private_key_hex: &str, network: NetworkParameters) -> HdResult<String> {
        let secp = Secp256k1::signing_only();
        self.encode_with(&secp, private_key_hex, network)
    }

    /// Same as [`encode`](Self::encode) with a caller-owned context
    pub fn encode_with<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        private_key_hex: &str,
        network: NetworkParameters,
    ) -> HdResult<String> {
        let secret_key = parse_private_key(private_key_hex)?;
        let public_key = PublicKey::from_secret_key(secp, &secret_key);

        let address = match self {
            AddressEncoder::Bitcoin => bitcoin_address(&public_key, network),
            AddressEncoder::Ethereum => ethereum_address(&public_key),
        };
        Ok(address)
    }
}

/// Encode the address of `private_key_hex` for a namespace id
pub fn encode_address(private_key_hex: &str, namespace: u32, network: NetworkParameters) -> HdResult<String> {
    let namespace = Namespace::from_id(namespace)?;
    AddressEncoder::for_namespace(namespace).encode(private_key_hex, network)
}

/// Parse a 32-byte hex scalar, with or without `0x`
pub fn parse_private_key(private_key_hex: &str) -> HdResult<SecretKey> {
    let raw = strip_hex_prefix(private_key_hex.trim());
    let bytes = hex::decode(raw)
        .map_err(|e| HdKeygenError::invalid_key(format!("Private key is not valid hex: {}", e)))?;
    if bytes.len() != 32 {
        return Err(HdKeygenError::invalid_key(format!(
            "Private key must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(SecretKey::from_slice(&bytes)?)
}

/// P2PKH: version byte || HASH160(compressed pubkey), Base58Check
pub fn bitcoin_address(public_key: &PublicKey, network: NetworkParameters) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(network.p2pkh_version);
    payload.extend_from_slice(&hash160(&public_key.serialize()));
    base58::encode_check(&payload)
}

/// Last 20 bytes of Keccak-256 over the uncompressed point (sans 0x04)
pub fn ethereum_address_bytes(public_key: &PublicKey) -> [u8; 20] {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    out
}

pub fn ethereum_address(public_key: &PublicKey) -> String {
    to_checksum_address(&ethereum_address_bytes(public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::wallet::network::{MAINNET, TESTNET};

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_bitcoin_address_for_key_one() {
        let address = encode_address(KEY_ONE, 0, MAINNET).unwrap();
        assert_eq!(address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");

        let testnet = encode_address(KEY_ONE, 0, TESTNET).unwrap();
        assert_eq!(testnet, "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r");
    }

    #[test]
    fn test_ethereum_address_for_key_one() {
        let address = encode_address(KEY_ONE, 60, MAINNET).unwrap();
        assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn test_ethereum_ignores_network() {
        let main = encode_address(KEY_ONE, 60, MAINNET).unwrap();
        let test = encode_address(KEY_ONE, 60, TESTNET).unwrap();
        assert_eq!(main, test);
    }

    #[test]
    fn test_hex_prefix_is_optional() {
        let with_prefix = format!("0x{}", KEY_ONE);
        assert_eq!(
            encode_address(&with_prefix, 60, MAINNET).unwrap(),
            encode_address(KEY_ONE, 60, MAINNET).unwrap()
        );
    }

    #[test]
    fn test_invalid_scalars_rejected() {
        let zero = "00".repeat(32);
        let order = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        for bad in [zero.as_str(), order, "abcd", "xyz"] {
            for ns in [0, 60] {
                let err = encode_address(bad, ns, MAINNET).unwrap_err();
                assert_eq!(err.code, ErrorCode::InvalidKey, "{} accepted for {}", bad, ns);
            }
        }
    }

    #[test]
    fn test_unsupported_namespace() {
        let err = encode_address(KEY_ONE, 501, MAINNET).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedNamespace);
    }

    #[test]
    fn test_encoder_namespace_mapping() {
        for ns in Namespace::ALL {
            assert_eq!(AddressEncoder::for_namespace(ns).namespace(), ns);
        }
    }
}
