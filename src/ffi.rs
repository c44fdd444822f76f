//! FFI Layer for hd-keygen
//!
//! All C-ABI exports are defined here. Every function follows one pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `hdkeygen_free_string`)
//!
//! Error handling: all functions return JSON with a `success` field.
//! On error, `success: false` and the `error` object is populated.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::Deserialize;

use crate::error::HdKeygenError;
use crate::types::ApiResponse;
use crate::utils::run_config::{ExtendedKeyFormat, RunConfig, DEFAULT_WALLET_COUNT};
use crate::wallet::derivation::derive_key_pair;
use crate::wallet::derivation_path::DerivationPath;
use crate::wallet::enumerator::generate_report;
use crate::wallet::keygen::{seed_from_phrase, Seed};
use crate::wallet::network::select_network;

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any hdkeygen_* function
///
/// # Safety
/// The pointer must have been returned by a hdkeygen_* function and not freed yet
#[unsafe(no_mangle)]
pub extern "C" fn hdkeygen_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert C string to Rust string, returning error JSON if invalid
fn parse_input<'a>(input: *const c_char) -> Result<&'a str, *mut c_char> {
    if input.is_null() {
        return Err(error_response(HdKeygenError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    c_str
        .to_str()
        .map_err(|_| error_response(HdKeygenError::invalid_input("Invalid UTF-8 string")))
}

/// Deserialize a request body, returning error JSON if malformed
fn parse_request<'a, T: Deserialize<'a>>(json_str: &'a str) -> Result<T, *mut c_char> {
    serde_json::from_str(json_str).map_err(|e| {
        error_response(HdKeygenError::invalid_input(format!("Invalid JSON: {}", e)))
    })
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: HdKeygenError) -> *mut c_char {
    crate::log_warn!("ffi", "Request failed", code = format!("{:?}", error.code));
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        // serde_json escapes NUL, so this only triggers on a broken invariant
        Err(_) => std::ptr::null_mut(),
    }
}

fn default_mainnet() -> bool {
    true
}

fn default_wallet_count() -> u32 {
    DEFAULT_WALLET_COUNT
}

// =============================================================================
// Derivation
// =============================================================================

#[derive(Deserialize)]
struct DeriveWalletsRequest {
    mnemonic: String,
    #[serde(default)]
    passphrase: String,
    #[serde(default = "default_mainnet")]
    mainnet: bool,
    #[serde(default)]
    start_index: u32,
    #[serde(default = "default_wallet_count")]
    wallet_count: u32,
    #[serde(default)]
    xkey_format: ExtendedKeyFormat,
}

/// Derive the master record and wallet records for a mnemonic
///
/// # Input
/// ```json
/// { "mnemonic": "word1 word2 ...", "passphrase": "", "mainnet": true,
///   "start_index": 0, "wallet_count": 10 }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "network": "mainnet", "master": {...}, "wallets": [...] } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn hdkeygen_derive_wallets(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    let request: DeriveWalletsRequest = match parse_request(json_str) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    let config = RunConfig {
        mainnet: request.mainnet,
        wallet_count: request.wallet_count,
        start_index: request.start_index,
        xkey_format: request.xkey_format,
    };

    let result = seed_from_phrase(&request.mnemonic, &request.passphrase)
        .and_then(|seed| generate_report(&seed, &config));

    match result {
        Ok(report) => success_response(report),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct DeriveKeyPairRequest {
    seed_hex: String,
    path: String,
    #[serde(default = "default_mainnet")]
    mainnet: bool,
}

/// Derive the extended key pair at `m/244'` or at one wallet path
///
/// Any other path is rejected with `invalid_path`.
///
/// # Input
/// ```json
/// { "seed_hex": "5eb00bbd...", "path": "m/244'/0/60/0/0/0", "mainnet": true }
/// ```
///
/// # Output
/// ```json
/// { "success": true, "data": { "extended_private_key": "xprv...", "extended_public_key": "xpub...",
///   "private_key": "...", "public_key": "..." } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn hdkeygen_derive_key_pair(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    let request: DeriveKeyPairRequest = match parse_request(json_str) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    let result = Seed::from_hex(&request.seed_hex).and_then(|seed| {
        let path: DerivationPath = request.path.parse()?;
        derive_key_pair(&seed, &path, select_network(request.mainnet))
    });

    match result {
        Ok(pair) => success_response(pair),
        Err(e) => error_response(e),
    }
}
