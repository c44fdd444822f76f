use bitcoin::base58;
use bitcoin::bip32::{ChildNumber, Xpriv, Xpub};
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey, Signing, Verification};
use hd_keygen::{
    decode_bitcoin_address, keccak256, to_checksum_address, validate_address, DerivationPath,
    ExtendedKeyRecord, Namespace, NetworkParameters, WalletRecord, WalletReport,
};
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::str::FromStr;

struct ValidationResult {
    name: String,
    success: bool,
    message: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let payload = if let Some(path) = args.get(1) {
        fs::read_to_string(path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let report: WalletReport = serde_json::from_str(&payload)?;
    let network = NetworkParameters::from(report.network);
    let secp = Secp256k1::new();

    // Every record must hang off this key; a bad master fails its own row
    let master_xpub = parse_extended_key(&report.master.extended_public_key)
        .and_then(|key| Xpub::from_str(&key).map_err(|e| e.to_string()))
        .ok();

    let mut results = Vec::new();
    results.push(run_validation(format!("Master {}", report.master.path), || {
        validate_master(&secp, &report.master, network)
    }));
    for record in &report.wallets {
        let name = format!("{} #{}", record.namespace.symbol(), record.wallet_index);
        results.push(run_validation(name, || {
            validate_record(&secp, record, master_xpub.as_ref(), network)
        }));
    }

    let expected = report.wallet_count as usize * Namespace::ALL.len();
    results.push(run_validation("Record count".to_string(), || {
        if report.wallets.len() == expected {
            Ok(())
        } else {
            Err(format!("expected {} records, found {}", expected, report.wallets.len()))
        }
    }));

    println!("================ Report Validation ================");
    for result in &results {
        let status = if result.success { "✅ PASS" } else { "❌ FAIL" };
        println!("{:<16} {}", result.name, status);
        if !result.success {
            println!("    {}", result.message);
        }
    }

    let overall_success = results.iter().all(|r| r.success);
    println!("===================================================");
    if overall_success {
        println!("Overall status: ✅ All {} records verified", report.wallets.len());
        Ok(())
    } else {
        println!("Overall status: ❌ Validation failed");
        Err("report validation failed".into())
    }
}

fn run_validation<F>(name: String, f: F) -> ValidationResult
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(_) => ValidationResult {
            name,
            success: true,
            message: String::new(),
        },
        Err(err) => ValidationResult {
            name,
            success: false,
            message: err,
        },
    }
}

/// Accepts both Base58Check and raw-hex extended keys
fn parse_extended_key(value: &str) -> Result<String, String> {
    if value.starts_with("04") && value.len() == 156 {
        let bytes = hex::decode(value).map_err(|e| e.to_string())?;
        Ok(base58::encode_check(&bytes))
    } else {
        Ok(value.to_string())
    }
}

fn validate_master<C: Signing>(
    secp: &Secp256k1<C>,
    master: &ExtendedKeyRecord,
    network: NetworkParameters,
) -> Result<(), String> {
    let xprv_key = parse_extended_key(&master.extended_private_key)?;
    let xpub_key = parse_extended_key(&master.extended_public_key)?;
    network.check_extended_key(&xprv_key, true).map_err(|e| e.message)?;
    network.check_extended_key(&xpub_key, false).map_err(|e| e.message)?;

    let xprv = Xpriv::from_str(&xprv_key).map_err(|e| e.to_string())?;
    let xpub = Xpub::from_str(&xpub_key).map_err(|e| e.to_string())?;
    if Xpub::from_priv(secp, &xprv) != xpub {
        return Err("Extended public key does not match extended private key".to_string());
    }
    if xprv.depth != 1 {
        return Err(format!("Master record depth is {}, expected 1", xprv.depth));
    }

    Ok(())
}

fn validate_record<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    record: &WalletRecord,
    master_xpub: Option<&Xpub>,
    network: NetworkParameters,
) -> Result<(), String> {
    let path = DerivationPath::from_str(&record.path).map_err(|e| e.message)?;
    if path.wallet_indices() != Some((record.namespace.id(), record.wallet_index, 0)) {
        return Err(format!("Path {} does not belong to this wallet record", record.path));
    }

    let secret_bytes = hex::decode(&record.private_key).map_err(|e| e.to_string())?;
    let secret_key = SecretKey::from_slice(&secret_bytes).map_err(|e| e.to_string())?;
    let public_key = PublicKey::from_secret_key(secp, &secret_key);

    if hex::encode(public_key.serialize()) != record.public_key {
        return Err("Compressed public key does not match private key".to_string());
    }

    // Below m/244' every step is non-hardened, so the master xpub reaches the record
    let master_xpub = master_xpub.ok_or("Master extended public key is unreadable")?;
    let below_root = path.components()[1..]
        .iter()
        .map(|c| ChildNumber::from_normal_idx(c.index))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    let child = master_xpub.derive_pub(secp, &below_root).map_err(|e| e.to_string())?;
    if child.public_key != public_key {
        return Err("Public key does not derive from the master extended public key".to_string());
    }

    match record.namespace {
        Namespace::Bitcoin => {
            let pubkey_hash = hash160::Hash::hash(&public_key.serialize()).to_byte_array();
            let decoded = decode_bitcoin_address(&record.address, network).map_err(|e| e.message)?;
            if decoded != pubkey_hash {
                return Err("Bitcoin address does not commit to the public key".to_string());
            }
        }
        Namespace::Ethereum => {
            let uncompressed = public_key.serialize_uncompressed();
            let address_bytes = keccak256(&uncompressed[1..]);
            let expected_address = to_checksum_address(&address_bytes[12..]);
            if expected_address != record.address {
                return Err("Ethereum checksum address mismatch".to_string());
            }
            if !validate_address(&record.address, record.namespace, network).checksum_valid {
                return Err("Ethereum address fails EIP-55 validation".to_string());
            }
        }
    }

    Ok(())
}
