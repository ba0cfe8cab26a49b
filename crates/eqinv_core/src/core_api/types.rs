use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::{Category, LocationClass, classify};

use super::error::CoreError;

pub const SHARED_VAULT_OWNER: &str = "SHARED-VAULT";
pub const SHARED_VAULT_PREFIX: &str = "SharedBank";
pub const EMPTY_ITEM_NAME: &str = "Empty";
pub const INVENTORY_FILE_SUFFIX: &str = "-Inventory.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub owner: String,
    pub location: String,
    pub name: String,
    pub id: i64,
    pub count: i64,
    /// Client-specific columns beyond Location/Name/ID/Count, in header order.
    pub extra: Vec<(String, String)>,
    pub source_timestamp: Option<DateTime<Utc>>,
    pub source_file: Option<String>,
    pub class: LocationClass,
}

impl InventorySlot {
    pub fn new(
        owner: impl Into<String>,
        location: impl Into<String>,
        name: impl Into<String>,
        id: i64,
        count: i64,
    ) -> Self {
        let location = location.into();
        let class = classify(&location);
        Self {
            owner: owner.into(),
            location,
            name: name.into(),
            id,
            count,
            extra: Vec::new(),
            source_timestamp: None,
            source_file: None,
            class,
        }
    }

    pub fn with_extra(mut self, extra: Vec<(String, String)>) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_source(
        mut self,
        source_file: Option<String>,
        source_timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        self.source_file = source_file;
        self.source_timestamp = source_timestamp;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name == EMPTY_ITEM_NAME
    }

    pub fn category(&self) -> Category {
        self.class.category
    }

    pub fn slot_depth(&self) -> usize {
        self.class.slot_depth
    }

    pub fn is_augment_in_gear(&self) -> bool {
        self.class.augment_in_gear
    }

    pub fn is_vault_location(&self) -> bool {
        self.location.starts_with(SHARED_VAULT_PREFIX)
    }

    pub fn owned_by(&self, owner: &str) -> bool {
        self.owner.to_lowercase() == owner.to_lowercase()
    }

    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Every column except provenance (source file and timestamp).
    pub(crate) fn content_key(&self) -> SlotKey<'_> {
        SlotKey {
            owner: &self.owner,
            location: &self.location,
            name: &self.name,
            id: self.id,
            count: self.count,
            extra: &self.extra,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey<'a> {
    owner: &'a str,
    location: &'a str,
    name: &'a str,
    id: i64,
    count: i64,
    extra: &'a [(String, String)],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    pub owner: Option<String>,
    pub category: Option<Category>,
    pub exact_match: bool,
}

impl SearchQuery {
    pub const ALTERNATION_SEPARATOR: char = '|';

    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            owner: None,
            category: None,
            exact_match: false,
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn exact(mut self, exact_match: bool) -> Self {
        self.exact_match = exact_match;
        self
    }

    pub fn alternatives(&self) -> Option<Vec<String>> {
        if !self.term.contains(Self::ALTERNATION_SEPARATOR) {
            return None;
        }
        Some(
            self.term
                .split(Self::ALTERNATION_SEPARATOR)
                .map(|part| part.trim().to_lowercase())
                .filter(|part| !part.is_empty())
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: SearchQuery,
    pub rows: Vec<InventorySlot>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub name: String,
    pub id: i64,
    /// Number of non-empty rows holding this item across all owners.
    pub total_found: usize,
    pub total_quantity: i64,
    pub members: Vec<InventorySlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub owner: String,
    pub total_items: usize,
    pub equipped_count: usize,
    pub inventory_count: usize,
    pub bank_count: usize,
    pub unique_item_names: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterOverview {
    pub owner: String,
    pub item_count: usize,
    pub empty_slots: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub source_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOverview {
    pub total_slots: usize,
    pub non_empty_items: usize,
    pub empty_slots: usize,
    pub owners: usize,
    pub files_loaded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedFile {
    pub file_name: String,
    pub owner: String,
    pub slots: usize,
    pub items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub file_name: Option<String>,
    pub line: Option<usize>,
    pub error: CoreError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultOrigin {
    pub signature: String,
    pub source_character: String,
    pub source_file: Option<String>,
    pub slots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedVault {
    pub source_character: String,
    pub source_file: Option<String>,
    /// Character whose copy of the same vault was kept.
    pub duplicate_of: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub files: Vec<LoadedFile>,
    pub warnings: Vec<LoadWarning>,
    pub retained_vaults: Vec<VaultOrigin>,
    pub skipped_vaults: Vec<SkippedVault>,
    pub duplicate_rows_removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinationRule {
    /// Present at the required quantity or not.
    Single,
    /// `enchanted_per_legendary` Enchanted units stand in for one Legendary.
    Tiered { enchanted_per_legendary: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredComponent {
    pub name: String,
    pub quantity: u32,
    pub rule: CombinationRule,
    pub source: String,
}

impl RequiredComponent {
    pub fn single(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            rule: CombinationRule::Single,
            source: source.into(),
        }
    }

    pub fn tiered(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            rule: CombinationRule::Tiered {
                enchanted_per_legendary: 4,
            },
            source: source.into(),
        }
    }

    pub fn legendary_name(&self) -> String {
        format!("{} (Legendary)", self.name)
    }

    pub fn enchanted_name(&self) -> String {
        format!("{} (Enchanted)", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentProgress {
    Tiered {
        legendary: usize,
        enchanted: usize,
        locked_legendary: usize,
        locked_enchanted: usize,
        /// Enchanted units still missing for a combine, floored at zero.
        shortfall: usize,
    },
    Single {
        count: usize,
        locked: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub name: String,
    pub source: String,
    pub ready: bool,
    pub progress: ComponentProgress,
    /// `owner: location` of each matching row in the available pool.
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReport {
    pub include_equipped: bool,
    pub components: Vec<ComponentStatus>,
    pub ready_count: usize,
    pub can_complete: bool,
}

impl ComponentReport {
    pub fn component(&self, name: &str) -> Option<&ComponentStatus> {
        self.components
            .iter()
            .find(|status| status.name.eq_ignore_ascii_case(name))
    }

    pub fn missing(&self) -> impl Iterator<Item = &ComponentStatus> {
        self.components.iter().filter(|status| !status.ready)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProgress {
    pub name: String,
    pub owned: i64,
    pub required: u32,
    pub satisfied: bool,
    pub missing: i64,
    pub source: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest: String,
    pub items: Vec<ItemProgress>,
    pub items_satisfied: usize,
    pub total_items: usize,
    pub progress_percentage: f64,
    pub can_complete: bool,
}
