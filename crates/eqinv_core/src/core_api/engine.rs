use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::analyzer;
use super::consolidate::{self, InventoryTable};
use super::error::{CoreError, CoreErrorCode};
use super::ingest::{self, InventoryFile, is_inventory_file_name};
use super::recipes::{self, Quest};
use super::types::{
    CharacterOverview, CharacterSummary, ComponentReport, DuplicateGroup, INVENTORY_FILE_SUFFIX,
    LoadReport, LoadWarning, LoadedFile, QuestProgress, RequiredComponent, SearchQuery,
    SearchResults, TableOverview,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug, Clone)]
pub struct Session {
    table: InventoryTable,
    report: LoadReport,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Loads every `*-Inventory.txt` in `dir`, processed in file-name order.
    pub fn load_directory(&self, dir: &Path) -> Result<Session, CoreError> {
        let entries = fs::read_dir(dir).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", dir.display()),
            )
        })?;

        let mut warnings = Vec::new();
        let listing = entries.map(|entry| {
            entry.map(|entry| {
                let file_type = entry.file_type().ok()?;
                let file_name = entry.file_name().to_string_lossy().to_string();
                (file_type.is_file() && is_inventory_file_name(&file_name))
                    .then(|| (file_name, entry.path()))
            })
        });
        let paths = inventory_paths(dir, listing, &mut warnings);

        let mut files = Vec::with_capacity(paths.len());
        for (file_name, path) in paths {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    let error = CoreError::new(
                        CoreErrorCode::Io,
                        format!("failed to read {}: {e}", path.display()),
                    );
                    tracing::warn!(file = %file_name, "skipping file: {error}");
                    warnings.push(LoadWarning {
                        file_name: Some(file_name),
                        line: None,
                        error,
                    });
                    continue;
                }
            };
            let modified = fs::metadata(&path)
                .and_then(|metadata| metadata.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            files.push(InventoryFile::new(
                file_name,
                String::from_utf8_lossy(&bytes),
                modified,
            ));
        }

        let mut session = self.open_files(files);
        if !warnings.is_empty() {
            warnings.append(&mut session.report.warnings);
            session.report.warnings = warnings;
        }
        Ok(session)
    }

    /// Ingests and consolidates already-read files in the order given.
    pub fn open_files(&self, files: Vec<InventoryFile>) -> Session {
        let mut report = LoadReport::default();
        if files.is_empty() {
            let error = CoreError::new(
                CoreErrorCode::NoFilesFound,
                format!("no *{INVENTORY_FILE_SUFFIX} files to load"),
            );
            tracing::warn!("{error}");
            report.warnings.push(LoadWarning {
                file_name: None,
                line: None,
                error,
            });
        }

        let mut ingestions = Vec::with_capacity(files.len());
        for file in &files {
            match ingest::ingest_file(file) {
                Ok(mut ingestion) => {
                    tracing::info!(
                        file = %file.file_name,
                        owner = %ingestion.owner,
                        slots = ingestion.slot_count(),
                        items = ingestion.item_count(),
                        "loaded inventory file"
                    );
                    report.files.push(LoadedFile {
                        file_name: file.file_name.clone(),
                        owner: ingestion.owner.clone(),
                        slots: ingestion.slot_count(),
                        items: ingestion.item_count(),
                    });
                    report.warnings.append(&mut ingestion.warnings);
                    ingestions.push(ingestion);
                }
                Err(error) => {
                    tracing::warn!(file = %file.file_name, "skipping file: {error}");
                    report.warnings.push(LoadWarning {
                        file_name: Some(file.file_name.clone()),
                        line: None,
                        error,
                    });
                }
            }
        }

        let consolidated = consolidate::consolidate(ingestions);
        report.retained_vaults = consolidated.retained_vaults;
        report.skipped_vaults = consolidated.skipped_vaults;
        report.duplicate_rows_removed = consolidated.duplicate_rows_removed;

        Session {
            table: consolidated.table,
            report,
        }
    }
}

/// Keeps the inventory files of a directory listing, sorted by name. An
/// entry that cannot be read becomes a warning instead of failing the load.
fn inventory_paths(
    dir: &Path,
    listing: impl IntoIterator<Item = io::Result<Option<(String, PathBuf)>>>,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<(String, PathBuf)> {
    let mut paths = Vec::new();
    for entry in listing {
        match entry {
            Ok(Some(path)) => paths.push(path),
            Ok(None) => {}
            Err(e) => {
                let error = CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to read entry in {}: {e}", dir.display()),
                );
                tracing::warn!(dir = %dir.display(), "skipping directory entry: {error}");
                warnings.push(LoadWarning {
                    file_name: None,
                    line: None,
                    error,
                });
            }
        }
    }
    paths.sort();
    paths
}

impl Session {
    pub fn table(&self) -> &InventoryTable {
        &self.table
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn overview(&self) -> TableOverview {
        self.table.overview(self.report.files.len())
    }

    pub fn search(&self, query: &SearchQuery) -> SearchResults {
        self.table.search(query)
    }

    pub fn find_duplicates(&self, min_owner_count: usize) -> Vec<DuplicateGroup> {
        self.table.find_duplicates(min_owner_count)
    }

    pub fn character_summary(&self, owner: &str) -> Result<CharacterSummary, CoreError> {
        self.table.character_summary(owner)
    }

    pub fn character_overview(&self) -> Vec<CharacterOverview> {
        self.table.character_overview()
    }

    pub fn analyze_components(
        &self,
        components: &[RequiredComponent],
        include_equipped: bool,
    ) -> ComponentReport {
        analyzer::analyze(&self.table, components, include_equipped)
    }

    pub fn zeb_weapon(&self, include_equipped: bool) -> ComponentReport {
        self.analyze_components(&recipes::zeb_weapon_components(), include_equipped)
    }

    /// Runs every item of `quest`, nested components included, through the
    /// component analyzer.
    pub fn quest_components(&self, quest: &Quest, include_equipped: bool) -> ComponentReport {
        self.analyze_components(&quest.required_components(), include_equipped)
    }

    pub fn quest_progress(&self, quest: &Quest) -> QuestProgress {
        recipes::quest_progress(&self.table, quest)
    }
}
