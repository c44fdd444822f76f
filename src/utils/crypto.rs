//! Hashing and Encoding Helpers
//!
//! Small primitives shared by the address encoders, the address validator
//! and the report validator binary.

use bitcoin::base58;
use bitcoin::hashes::{hash160, Hash};
use tiny_keccak::{Hasher, Keccak};

use crate::error::{HdKeygenError, HdResult};

/// Keccak256 hash (used for Ethereum addresses)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// RIPEMD160(SHA256(data)), the Bitcoin public key hash
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

/// Convert raw address bytes to checksummed (EIP-55) Ethereum address
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(2 + lower.len());
    result.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_alphabetic() && nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Strip an optional `0x` prefix
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// The 78-byte binary serialization behind a Base58Check extended key
pub fn extended_key_payload(extended_key: &str) -> HdResult<Vec<u8>> {
    let payload = base58::decode_check(extended_key)
        .map_err(|e| HdKeygenError::invalid_key(format!("Extended key is not Base58Check: {}", e)))?;
    if payload.len() != 78 {
        return Err(HdKeygenError::invalid_key(format!(
            "Extended key has {} bytes, expected 78",
            payload.len()
        )));
    }
    Ok(payload)
}

/// Hex of the 78-byte binary serialization behind a Base58Check extended key
pub fn extended_key_to_hex(extended_key: &str) -> HdResult<String> {
    Ok(hex::encode(extended_key_payload(extended_key)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_checksum_address_eip55_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let raw = hex::decode(&expected[2..]).unwrap();
            assert_eq!(to_checksum_address(&raw), expected);
        }
    }

    #[test]
    fn test_strip_hex_prefix() {
        assert_eq!(strip_hex_prefix("0xabcd"), "abcd");
        assert_eq!(strip_hex_prefix("0Xabcd"), "abcd");
        assert_eq!(strip_hex_prefix("abcd"), "abcd");
    }

    #[test]
    fn test_hash160_of_generator() {
        // Compressed public key of private key 1
        let pubkey = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
        assert_eq!(hex::encode(hash160(&pubkey)), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn test_extended_key_to_hex() {
        let xprv = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
        let hex = extended_key_to_hex(xprv).unwrap();
        assert_eq!(hex.len(), 156);
        assert!(hex.starts_with("0488ade4000000000000000000"));
        assert!(extended_key_to_hex("not-a-key").is_err());
    }
}
