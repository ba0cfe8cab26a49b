mod analyzer;
mod consolidate;
mod engine;
mod error;
mod ingest;
mod query;
pub mod recipes;
mod types;
pub mod vault;

pub use analyzer::analyze;
pub use consolidate::{Consolidation, InventoryTable, consolidate};
pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use ingest::{
    Ingestion, InventoryFile, ingest, ingest_file, is_inventory_file_name, owner_from_file_name,
};
pub use recipes::{Quest, QuestItem, RecipeBook, quest_progress, zeb_weapon_components};
pub use types::{
    CharacterOverview, CharacterSummary, CombinationRule, ComponentProgress, ComponentReport,
    ComponentStatus, DuplicateGroup, EMPTY_ITEM_NAME, INVENTORY_FILE_SUFFIX, InventorySlot,
    ItemProgress, LoadReport, LoadWarning, LoadedFile, QuestProgress, RequiredComponent,
    SHARED_VAULT_OWNER, SHARED_VAULT_PREFIX, SearchQuery, SearchResults, SkippedVault,
    TableOverview, VaultOrigin,
};
pub use vault::{VaultLedger, VaultSignature};
