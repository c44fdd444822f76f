//! Derivation Path Construction
//!
//! Every path this crate derives hangs off the fixed hardened root
//! `m/244'`:
//!
//! ```text
//! m/244'/0/{namespace}/{wallet_index}/0/{address_index}
//! ```
//!
//! Only the root is hardened. Paths are built here and parsed back with
//! [`DerivationPath::from_str`] so both directions agree on syntax. A
//! `DerivationPath` is always either the root itself or a full wallet path;
//! the parser rejects anything else.

use std::fmt;
use std::str::FromStr;

use bitcoin::bip32::{self, ChildNumber};

use crate::error::{HdKeygenError, HdResult};
use crate::types::Namespace;

/// Purpose segment of the root path (always hardened)
pub const ROOT_PURPOSE: u32 = 244;

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x80000000;

/// Parsed derivation path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<DerivationComponent>,
}

/// Single component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationComponent {
    pub index: u32,
    pub hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> Self {
        Self { index, hardened }
    }

    pub fn normal(index: u32) -> Self {
        Self::new(index, false)
    }

    pub fn hardened(index: u32) -> Self {
        Self::new(index, true)
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }

    fn to_child_number(self) -> HdResult<ChildNumber> {
        let child = if self.hardened {
            ChildNumber::from_hardened_idx(self.index)?
        } else {
            ChildNumber::from_normal_idx(self.index)?
        };
        Ok(child)
    }
}

impl fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = HdKeygenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

impl DerivationPath {
    pub fn components(&self) -> &[DerivationComponent] {
        &self.components
    }

    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// Whether this is the `m/244'` root rather than a wallet path
    pub fn is_root(&self) -> bool {
        self.components.len() == 1
    }

    /// Convert to the `bitcoin` crate's path type for key derivation
    pub fn to_bip32(&self) -> HdResult<bip32::DerivationPath> {
        let children = self
            .components
            .iter()
            .map(|c| c.to_child_number())
            .collect::<HdResult<Vec<_>>>()?;
        Ok(bip32::DerivationPath::from(children))
    }

    /// Namespace, wallet index and address index of a wallet path
    ///
    /// Returns `None` for paths that do not follow the wallet layout.
    pub fn wallet_indices(&self) -> Option<(u32, u32, u32)> {
        match self.components.as_slice() {
            [_, _, namespace, wallet, _, address] => {
                Some((namespace.index, wallet.index, address.index))
            }
            _ => None,
        }
    }
}

/// Fixed root path `m/244'` used for the top-level extended key pair
pub fn build_master_path() -> DerivationPath {
    DerivationPath {
        components: vec![DerivationComponent::hardened(ROOT_PURPOSE)],
    }
}

/// Path for one wallet address: `m/244'/0/{namespace}/{wallet}/0/{address}`
///
/// Indices must fit the non-hardened range; anything at or above 2^31 would
/// silently turn into a hardened child and is rejected instead.
pub fn build_path(namespace: Namespace, wallet_index: u32, address_index: u32) -> HdResult<DerivationPath> {
    for (name, value) in [("wallet index", wallet_index), ("address index", address_index)] {
        if value >= HARDENED {
            return Err(HdKeygenError::invalid_input(format!(
                "{} {} exceeds the non-hardened range",
                name, value
            )));
        }
    }

    let mut path = build_master_path();
    path.components.extend([
        DerivationComponent::normal(0),
        DerivationComponent::normal(namespace.id()),
        DerivationComponent::normal(wallet_index),
        DerivationComponent::normal(0),
        DerivationComponent::normal(address_index),
    ]);
    Ok(path)
}

/// Parse a derivation path string
///
/// Only `m/244'` and `m/244'/0/{namespace}/{wallet}/0/{address}` parse.
fn parse_path(path: &str) -> HdResult<DerivationPath> {
    let trimmed = path.trim();

    // Must start with m/
    let path_part = trimmed
        .strip_prefix("m/")
        .or_else(|| trimmed.strip_prefix("M/"))
        .ok_or_else(|| {
            HdKeygenError::invalid_path("Derivation path must start with 'm/'").with_details(path)
        })?;

    let components = path_part
        .split('/')
        .map(parse_component)
        .collect::<HdResult<Vec<_>>>()
        .map_err(|e| e.with_details(path))?;

    check_layout(&components).map_err(|e| e.with_details(path))?;
    Ok(DerivationPath { components })
}

/// Enforce the fixed root and the wallet layout beneath it
fn check_layout(components: &[DerivationComponent]) -> HdResult<()> {
    if components.first() != Some(&DerivationComponent::hardened(ROOT_PURPOSE)) {
        return Err(HdKeygenError::invalid_path(format!(
            "Derivation path must be rooted at m/{}'",
            ROOT_PURPOSE
        )));
    }

    let rest = &components[1..];
    if rest.is_empty() {
        return Ok(());
    }

    let layout_ok = rest.len() == 5
        && rest.iter().all(|c| !c.hardened)
        && rest[0].index == 0
        && rest[3].index == 0
        && Namespace::from_id(rest[1].index).is_ok();
    if !layout_ok {
        return Err(HdKeygenError::invalid_path(format!(
            "Path must be m/{}'/0/{{namespace}}/{{wallet}}/0/{{address}} with namespace 0 or 60",
            ROOT_PURPOSE
        )));
    }
    Ok(())
}

/// Parse a single path component
fn parse_component(s: &str) -> HdResult<DerivationComponent> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(HdKeygenError::invalid_path("Empty path component"));
    }

    // Check for hardened indicator
    let (number_str, hardened) = match trimmed.strip_suffix(['\'', 'h', 'H']) {
        Some(number) => (number, true),
        None => (trimmed, false),
    };

    if number_str.is_empty() || !number_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HdKeygenError::invalid_path(format!("Invalid path component '{}'", s)));
    }

    let index: u32 = number_str
        .parse()
        .map_err(|e| HdKeygenError::invalid_path(format!("Invalid path component '{}': {}", s, e)))?;

    // The hardened bit is expressed by the suffix, never by the number itself
    if index >= HARDENED {
        return Err(HdKeygenError::invalid_path(format!(
            "Path component {} exceeds maximum value",
            index
        )));
    }

    Ok(DerivationComponent::new(index, hardened))
}
