use chrono::{DateTime, Utc};

use crate::records::{
    COLUMN_COUNT, COLUMN_ID, COLUMN_LOCATION, COLUMN_NAME, RawRecord, RawRecordSet,
};

use super::error::{CoreError, CoreErrorCode};
use super::types::{INVENTORY_FILE_SUFFIX, InventorySlot, LoadWarning};

/// One character's export, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFile {
    pub file_name: String,
    pub contents: String,
    pub modified: Option<DateTime<Utc>>,
}

impl InventoryFile {
    pub fn new(
        file_name: impl Into<String>,
        contents: impl Into<String>,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
            modified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingestion {
    pub owner: String,
    pub source_file: Option<String>,
    pub source_timestamp: Option<DateTime<Utc>>,
    pub personal: Vec<InventorySlot>,
    /// Still attributed to `owner`; relabelled once the vault is known to be new.
    pub vault: Option<Vec<InventorySlot>>,
    pub warnings: Vec<LoadWarning>,
}

impl Ingestion {
    pub fn slot_count(&self) -> usize {
        self.personal.len() + self.vault.as_ref().map_or(0, Vec::len)
    }

    pub fn item_count(&self) -> usize {
        self.personal
            .iter()
            .chain(self.vault.iter().flatten())
            .filter(|slot| !slot.is_empty())
            .count()
    }
}

struct ColumnLayout {
    location: usize,
    name: usize,
    id: usize,
    count: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn resolve(records: &RawRecordSet) -> Result<Self, CoreError> {
        if records.header.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::Parse,
                "inventory text has no header row",
            ));
        }
        let missing = records.missing_columns();
        if !missing.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::Parse,
                format!("header is missing required columns: {}", missing.join(", ")),
            ));
        }

        let index = |column: &str| records.column_index(column).unwrap_or(usize::MAX);
        let location = index(COLUMN_LOCATION);
        let name = index(COLUMN_NAME);
        let id = index(COLUMN_ID);
        let count = index(COLUMN_COUNT);
        let required = [location, name, id, count];
        let extra = records
            .header
            .iter()
            .enumerate()
            .filter(|(i, _)| !required.contains(i))
            .map(|(i, column)| (i, column.clone()))
            .collect();

        Ok(Self {
            location,
            name,
            id,
            count,
            extra,
        })
    }
}

pub fn owner_from_file_name(file_name: &str) -> Result<String, CoreError> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.split_once('-') {
        Some((owner, _)) if !owner.trim().is_empty() => Ok(owner.trim().to_string()),
        _ => Err(CoreError::new(
            CoreErrorCode::MissingOwner,
            format!("could not determine character name from file name '{base}'"),
        )),
    }
}

pub fn is_inventory_file_name(file_name: &str) -> bool {
    file_name.len() > INVENTORY_FILE_SUFFIX.len() && file_name.ends_with(INVENTORY_FILE_SUFFIX)
}

pub fn ingest(
    records: &RawRecordSet,
    owner_hint: &str,
    source_timestamp: Option<DateTime<Utc>>,
) -> Result<Ingestion, CoreError> {
    ingest_with_source(records, owner_hint, None, source_timestamp)
}

pub fn ingest_file(file: &InventoryFile) -> Result<Ingestion, CoreError> {
    let owner = owner_from_file_name(&file.file_name)?;
    let records = RawRecordSet::parse(&file.contents);
    ingest_with_source(&records, &owner, Some(file.file_name.clone()), file.modified)
}

fn ingest_with_source(
    records: &RawRecordSet,
    owner_hint: &str,
    source_file: Option<String>,
    source_timestamp: Option<DateTime<Utc>>,
) -> Result<Ingestion, CoreError> {
    let owner = owner_hint.trim();
    if owner.is_empty() {
        return Err(CoreError::new(
            CoreErrorCode::MissingOwner,
            "no character name supplied for inventory records",
        ));
    }
    let layout = ColumnLayout::resolve(records)?;

    let mut personal = Vec::new();
    let mut vault = Vec::new();
    let mut warnings = Vec::new();

    for record in &records.records {
        let slot = match slot_from_record(record, &layout, owner) {
            Ok(slot) => slot.with_source(source_file.clone(), source_timestamp),
            Err(error) => {
                tracing::warn!(
                    file = source_file.as_deref().unwrap_or("<memory>"),
                    line = record.line,
                    "skipping record: {error}"
                );
                warnings.push(LoadWarning {
                    file_name: source_file.clone(),
                    line: Some(record.line),
                    error,
                });
                continue;
            }
        };

        if slot.is_vault_location() {
            vault.push(slot);
        } else {
            personal.push(slot);
        }
    }

    Ok(Ingestion {
        owner: owner.to_string(),
        source_file,
        source_timestamp,
        personal,
        vault: (!vault.is_empty()).then_some(vault),
        warnings,
    })
}

fn slot_from_record(
    record: &RawRecord,
    layout: &ColumnLayout,
    owner: &str,
) -> Result<InventorySlot, CoreError> {
    let location = required_field(record, layout.location, COLUMN_LOCATION)?;
    let name = required_field(record, layout.name, COLUMN_NAME)?;
    let id = numeric_field(record, layout.id, COLUMN_ID)?;
    let count = numeric_field(record, layout.count, COLUMN_COUNT)?;
    let extra = layout
        .extra
        .iter()
        .map(|(index, column)| {
            (
                column.clone(),
                record.field(*index).unwrap_or_default().to_string(),
            )
        })
        .collect();

    Ok(InventorySlot::new(owner, location, name, id, count).with_extra(extra))
}

fn required_field<'a>(
    record: &'a RawRecord,
    index: usize,
    column: &str,
) -> Result<&'a str, CoreError> {
    match record.field(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CoreError::new(
            CoreErrorCode::MalformedRecord,
            format!("line {} is missing the {column} column", record.line),
        )),
    }
}

fn numeric_field(record: &RawRecord, index: usize, column: &str) -> Result<i64, CoreError> {
    match record.field(index) {
        None | Some("") => Ok(0),
        Some(value) => value.parse::<i64>().map_err(|_| {
            CoreError::new(
                CoreErrorCode::MalformedRecord,
                format!(
                    "line {} has non-numeric {column} value '{value}'",
                    record.line
                ),
            )
        }),
    }
}
