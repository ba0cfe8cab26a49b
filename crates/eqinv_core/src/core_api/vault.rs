//! Content signatures for the shared vault.
//!
//! Every character's export carries its own copy of the one shared vault, so
//! copies are recognised by content and only the first copy is kept.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::types::{InventorySlot, VaultOrigin};

const ITEM_SEPARATOR: &str = ":::";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaultSignature(String);

impl VaultSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VaultSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn signature(vault_slots: &[InventorySlot]) -> VaultSignature {
    let mut sorted: Vec<&InventorySlot> = vault_slots.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.location, &a.name, a.id, a.count).cmp(&(&b.location, &b.name, b.id, b.count))
    });

    let items: Vec<String> = sorted
        .iter()
        .filter(|slot| !slot.is_empty())
        .map(|slot| format!("{}|{}|{}|{}", slot.location, slot.name, slot.id, slot.count))
        .collect();

    // Empty vaults of the same size are indistinguishable.
    if items.is_empty() {
        return VaultSignature(format!("empty_bank_{}_slots", vault_slots.len()));
    }

    let mut hasher = Sha256::new();
    hasher.update(items.join(ITEM_SEPARATOR).as_bytes());
    VaultSignature(hex::encode(hasher.finalize()))
}

pub fn is_duplicate(signature: &VaultSignature, seen: &VaultLedger) -> bool {
    seen.contains(signature)
}

/// Signatures already ingested, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct VaultLedger {
    index: HashMap<VaultSignature, usize>,
    origins: Vec<VaultOrigin>,
}

impl VaultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, signature: &VaultSignature) -> bool {
        self.index.contains_key(signature)
    }

    pub fn first_seen(&self, signature: &VaultSignature) -> Option<&VaultOrigin> {
        self.index
            .get(signature)
            .and_then(|&position| self.origins.get(position))
    }

    /// Returns false without recording when the signature is already known.
    pub fn record(&mut self, signature: VaultSignature, origin: VaultOrigin) -> bool {
        if self.contains(&signature) {
            return false;
        }
        self.index.insert(signature, self.origins.len());
        self.origins.push(origin);
        true
    }

    pub fn into_origins(self) -> Vec<VaultOrigin> {
        self.origins
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}
