use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ingest::Ingestion;
use super::types::{InventorySlot, SHARED_VAULT_OWNER, SkippedVault, VaultOrigin};
use super::vault::{self, VaultLedger};

/// The merged inventory of every ingested character plus the shared vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTable {
    rows: Vec<InventorySlot>,
}

impl InventoryTable {
    pub fn new(rows: Vec<InventorySlot>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[InventorySlot] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InventorySlot> {
        self.rows.iter()
    }

    pub fn occupied(&self) -> impl Iterator<Item = &InventorySlot> {
        self.rows.iter().filter(|slot| !slot.is_empty())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct owners in first-appearance order.
    pub fn owners(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|slot| slot.owner.as_str())
            .filter(|owner| seen.insert(*owner))
            .collect()
    }
}

impl<'a> IntoIterator for &'a InventoryTable {
    type Item = &'a InventorySlot;
    type IntoIter = std::slice::Iter<'a, InventorySlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidation {
    pub table: InventoryTable,
    pub retained_vaults: Vec<VaultOrigin>,
    pub skipped_vaults: Vec<SkippedVault>,
    pub duplicate_rows_removed: usize,
}

/// Merges ingestions in the order given. The first copy of each distinct
/// shared vault wins; later identical copies are dropped.
pub fn consolidate(ingestions: Vec<Ingestion>) -> Consolidation {
    let mut personal = Vec::new();
    let mut vault_rows = Vec::new();
    let mut ledger = VaultLedger::new();
    let mut skipped_vaults = Vec::new();

    for ingestion in ingestions {
        personal.extend(ingestion.personal);

        let Some(slots) = ingestion.vault else {
            continue;
        };
        let signature = vault::signature(&slots);
        if let Some(kept) = ledger.first_seen(&signature) {
            tracing::debug!(
                character = %ingestion.owner,
                kept = %kept.source_character,
                "skipping duplicate shared vault"
            );
            skipped_vaults.push(SkippedVault {
                source_character: ingestion.owner,
                source_file: ingestion.source_file,
                duplicate_of: kept.source_character.clone(),
            });
            continue;
        }

        ledger.record(
            signature.clone(),
            VaultOrigin {
                signature: signature.to_string(),
                source_character: ingestion.owner,
                source_file: ingestion.source_file,
                slots: slots.len(),
            },
        );
        vault_rows.extend(slots.into_iter().map(|mut slot| {
            slot.owner = SHARED_VAULT_OWNER.to_string();
            slot
        }));
    }

    let before = personal.len();
    let mut rows = dedup_personal(personal);
    let duplicate_rows_removed = before - rows.len();
    if duplicate_rows_removed > 0 {
        tracing::info!(duplicate_rows_removed, "removed duplicate inventory rows");
    }
    rows.extend(vault_rows);

    Consolidation {
        table: InventoryTable::new(rows),
        retained_vaults: ledger.into_origins(),
        skipped_vaults,
        duplicate_rows_removed,
    }
}

fn dedup_personal(rows: Vec<InventorySlot>) -> Vec<InventorySlot> {
    let mut keep = Vec::with_capacity(rows.len());
    {
        let mut seen = HashSet::with_capacity(rows.len());
        for slot in &rows {
            keep.push(seen.insert(slot.content_key()));
        }
    }
    rows.into_iter()
        .zip(keep)
        .filter_map(|(slot, keep)| keep.then_some(slot))
        .collect()
}
