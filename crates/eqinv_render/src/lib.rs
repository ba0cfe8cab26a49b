use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use eqinv_core::core_api::{
    CharacterOverview, CharacterSummary, ComponentProgress, ComponentReport, ComponentStatus,
    DuplicateGroup, InventorySlot, LoadReport, LoadWarning, QuestProgress, SearchResults,
    TableOverview,
};
use serde_json::{Map as JsonMap, Value as JsonValue, json};

const OWNER_COL_WIDTH: usize = 18;
const LOCATION_COL_WIDTH: usize = 22;
const ITEM_COL_WIDTH: usize = 36;
const COMPONENT_COL_WIDTH: usize = 34;
const QUEST_ITEM_COL_WIDTH: usize = 32;
const LABEL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Adds per-row detail: component locations and extra columns.
    pub verbose: bool,
}

// JSON

pub fn render_json_overview(
    overview: &TableOverview,
    characters: &[CharacterOverview],
    report: &LoadReport,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            out.insert("overview".to_string(), table_overview_to_json(overview));
            out.insert(
                "characters".to_string(),
                JsonValue::Array(characters.iter().map(character_overview_to_json).collect()),
            );
            out.insert("load".to_string(), load_report_to_json(report));
            JsonValue::Object(out)
        }
    }
}

pub fn render_json_search(results: &SearchResults, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let query = &results.query;
            let mut query_json = JsonMap::new();
            query_json.insert("term".to_string(), JsonValue::String(query.term.clone()));
            query_json.insert(
                "character".to_string(),
                query
                    .owner
                    .clone()
                    .map_or(JsonValue::Null, JsonValue::String),
            );
            query_json.insert(
                "type".to_string(),
                query
                    .category
                    .map_or(JsonValue::Null, |category| json!(category.as_str())),
            );
            query_json.insert("exact".to_string(), JsonValue::Bool(query.exact_match));

            let mut out = JsonMap::new();
            out.insert("query".to_string(), JsonValue::Object(query_json));
            out.insert("count".to_string(), json!(results.len()));
            out.insert(
                "results".to_string(),
                JsonValue::Array(results.rows.iter().map(slot_to_json).collect()),
            );
            JsonValue::Object(out)
        }
    }
}

pub fn render_json_duplicates(
    groups: &[DuplicateGroup],
    min_count: usize,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let groups_json = groups
                .iter()
                .map(|group| {
                    let mut out = JsonMap::new();
                    out.insert("name".to_string(), JsonValue::String(group.name.clone()));
                    out.insert("id".to_string(), json!(group.id));
                    out.insert("total_found".to_string(), json!(group.total_found));
                    out.insert("total_quantity".to_string(), json!(group.total_quantity));
                    out.insert(
                        "members".to_string(),
                        JsonValue::Array(group.members.iter().map(slot_to_json).collect()),
                    );
                    JsonValue::Object(out)
                })
                .collect();

            let mut out = JsonMap::new();
            out.insert("min_count".to_string(), json!(min_count));
            out.insert("groups".to_string(), JsonValue::Array(groups_json));
            JsonValue::Object(out)
        }
    }
}

pub fn render_json_character_summary(summary: &CharacterSummary, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            out.insert("character".to_string(), JsonValue::String(summary.owner.clone()));
            out.insert("total_items".to_string(), json!(summary.total_items));
            out.insert("equipped".to_string(), json!(summary.equipped_count));
            out.insert("inventory".to_string(), json!(summary.inventory_count));
            out.insert("bank".to_string(), json!(summary.bank_count));
            out.insert(
                "unique_item_names".to_string(),
                json!(summary.unique_item_names),
            );
            out.insert(
                "last_updated".to_string(),
                timestamp_to_json(summary.last_updated),
            );
            JsonValue::Object(out)
        }
    }
}

pub fn render_json_characters(characters: &[CharacterOverview], style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            JsonValue::Array(characters.iter().map(character_overview_to_json).collect())
        }
    }
}

pub fn render_json_component_report(report: &ComponentReport, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut out = JsonMap::new();
            out.insert(
                "include_equipped".to_string(),
                JsonValue::Bool(report.include_equipped),
            );
            out.insert("ready_count".to_string(), json!(report.ready_count));
            out.insert("total".to_string(), json!(report.components.len()));
            out.insert("can_complete".to_string(), JsonValue::Bool(report.can_complete));
            out.insert(
                "components".to_string(),
                JsonValue::Array(report.components.iter().map(component_to_json).collect()),
            );
            JsonValue::Object(out)
        }
    }
}

/// `quests` pairs each quest key with its progress, in display order.
pub fn render_json_quest_progress(quests: &[(String, QuestProgress)], style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => {
            let quests_json = quests
                .iter()
                .map(|(key, progress)| {
                    let items = progress
                        .items
                        .iter()
                        .map(|item| {
                            let mut out = JsonMap::new();
                            out.insert("name".to_string(), JsonValue::String(item.name.clone()));
                            out.insert("owned".to_string(), json!(item.owned));
                            out.insert("required".to_string(), json!(item.required));
                            out.insert("satisfied".to_string(), JsonValue::Bool(item.satisfied));
                            out.insert("missing".to_string(), json!(item.missing));
                            out.insert("source".to_string(), JsonValue::String(item.source.clone()));
                            out.insert("kind".to_string(), JsonValue::String(item.kind.clone()));
                            JsonValue::Object(out)
                        })
                        .collect();

                    let mut out = JsonMap::new();
                    out.insert("key".to_string(), JsonValue::String(key.clone()));
                    out.insert("quest".to_string(), JsonValue::String(progress.quest.clone()));
                    out.insert("items_satisfied".to_string(), json!(progress.items_satisfied));
                    out.insert("total_items".to_string(), json!(progress.total_items));
                    out.insert(
                        "progress_percentage".to_string(),
                        json!(progress.progress_percentage),
                    );
                    out.insert("can_complete".to_string(), JsonValue::Bool(progress.can_complete));
                    out.insert("items".to_string(), JsonValue::Array(items));
                    JsonValue::Object(out)
                })
                .collect();

            let mut out = JsonMap::new();
            out.insert("quests".to_string(), JsonValue::Array(quests_json));
            JsonValue::Object(out)
        }
    }
}

fn slot_to_json(slot: &InventorySlot) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("character".to_string(), JsonValue::String(slot.owner.clone()));
    out.insert("location".to_string(), JsonValue::String(slot.location.clone()));
    out.insert("name".to_string(), JsonValue::String(slot.name.clone()));
    out.insert("id".to_string(), json!(slot.id));
    out.insert("count".to_string(), json!(slot.count));
    out.insert("type".to_string(), json!(slot.category().as_str()));
    out.insert("slot_depth".to_string(), json!(slot.slot_depth()));
    out.insert(
        "augment_in_gear".to_string(),
        JsonValue::Bool(slot.is_augment_in_gear()),
    );
    out.insert(
        "source_file".to_string(),
        slot.source_file
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    out.insert(
        "source_timestamp".to_string(),
        timestamp_to_json(slot.source_timestamp),
    );
    if !slot.extra.is_empty() {
        let extra = slot
            .extra
            .iter()
            .map(|(column, value)| (column.clone(), JsonValue::String(value.clone())))
            .collect();
        out.insert("extra".to_string(), JsonValue::Object(extra));
    }
    JsonValue::Object(out)
}

fn table_overview_to_json(overview: &TableOverview) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("files_loaded".to_string(), json!(overview.files_loaded));
    out.insert("total_slots".to_string(), json!(overview.total_slots));
    out.insert("non_empty_items".to_string(), json!(overview.non_empty_items));
    out.insert("empty_slots".to_string(), json!(overview.empty_slots));
    out.insert("characters".to_string(), json!(overview.owners));
    JsonValue::Object(out)
}

fn character_overview_to_json(character: &CharacterOverview) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("character".to_string(), JsonValue::String(character.owner.clone()));
    out.insert("item_count".to_string(), json!(character.item_count));
    out.insert("empty_slots".to_string(), json!(character.empty_slots));
    out.insert(
        "last_updated".to_string(),
        timestamp_to_json(character.last_updated),
    );
    out.insert(
        "source_file".to_string(),
        character
            .source_file
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    JsonValue::Object(out)
}

fn load_report_to_json(report: &LoadReport) -> JsonValue {
    let files = report
        .files
        .iter()
        .map(|file| {
            json!({
                "file": file.file_name,
                "character": file.owner,
                "slots": file.slots,
                "items": file.items,
            })
        })
        .collect();
    let retained = report
        .retained_vaults
        .iter()
        .map(|vault| {
            json!({
                "signature": vault.signature,
                "source_character": vault.source_character,
                "source_file": vault.source_file,
                "slots": vault.slots,
            })
        })
        .collect();
    let skipped = report
        .skipped_vaults
        .iter()
        .map(|vault| {
            json!({
                "source_character": vault.source_character,
                "source_file": vault.source_file,
                "duplicate_of": vault.duplicate_of,
            })
        })
        .collect();

    let mut out = JsonMap::new();
    out.insert("files".to_string(), JsonValue::Array(files));
    out.insert(
        "warnings".to_string(),
        JsonValue::Array(report.warnings.iter().map(warning_to_json).collect()),
    );
    out.insert("retained_vaults".to_string(), JsonValue::Array(retained));
    out.insert("skipped_vaults".to_string(), JsonValue::Array(skipped));
    out.insert(
        "duplicate_rows_removed".to_string(),
        json!(report.duplicate_rows_removed),
    );
    JsonValue::Object(out)
}

fn warning_to_json(warning: &LoadWarning) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "file".to_string(),
        warning
            .file_name
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    out.insert("line".to_string(), json!(warning.line));
    out.insert(
        "code".to_string(),
        JsonValue::String(format!("{:?}", warning.error.code)),
    );
    out.insert(
        "message".to_string(),
        JsonValue::String(warning.error.message.clone()),
    );
    JsonValue::Object(out)
}

fn component_to_json(status: &ComponentStatus) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("name".to_string(), JsonValue::String(status.name.clone()));
    out.insert("source".to_string(), JsonValue::String(status.source.clone()));
    out.insert("ready".to_string(), JsonValue::Bool(status.ready));
    match status.progress {
        ComponentProgress::Tiered {
            legendary,
            enchanted,
            locked_legendary,
            locked_enchanted,
            shortfall,
        } => {
            out.insert("rule".to_string(), json!("tiered"));
            out.insert("legendary".to_string(), json!(legendary));
            out.insert("enchanted".to_string(), json!(enchanted));
            out.insert("locked_legendary".to_string(), json!(locked_legendary));
            out.insert("locked_enchanted".to_string(), json!(locked_enchanted));
            out.insert("enchanted_needed".to_string(), json!(shortfall));
        }
        ComponentProgress::Single { count, locked } => {
            out.insert("rule".to_string(), json!("single"));
            out.insert("count".to_string(), json!(count));
            out.insert("locked".to_string(), json!(locked));
        }
    }
    out.insert(
        "locations".to_string(),
        JsonValue::Array(
            status
                .locations
                .iter()
                .cloned()
                .map(JsonValue::String)
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

fn timestamp_to_json(timestamp: Option<DateTime<Utc>>) -> JsonValue {
    timestamp.map_or(JsonValue::Null, |ts| JsonValue::String(ts.to_rfc3339()))
}

// Text

pub fn render_overview_text(overview: &TableOverview, characters: &[CharacterOverview]) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Inventory Overview :::").expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    write_label(&mut out, "Files loaded", &format_count(overview.files_loaded));
    write_label(&mut out, "Characters", &format_count(overview.owners));
    write_label(&mut out, "Total slots", &format_count(overview.total_slots));
    write_label(&mut out, "Items", &format_count(overview.non_empty_items));
    write_label(&mut out, "Empty slots", &format_count(overview.empty_slots));
    writeln!(&mut out).expect("writing to String cannot fail");
    out.push_str(&render_characters_text(characters));
    out
}

pub fn render_characters_text(characters: &[CharacterOverview]) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: Characters :::").expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    if characters.is_empty() {
        writeln!(&mut out, "  none").expect("writing to String cannot fail");
        return out;
    }

    writeln!(
        &mut out,
        "{:<ow$} {:>9} {:>9}  Last Updated",
        "Character",
        "Items",
        "Empty",
        ow = OWNER_COL_WIDTH
    )
    .expect("writing to String cannot fail");
    for character in characters {
        let line = format!(
            "{:<ow$} {:>9} {:>9}  {}",
            fit_column(&character.owner, OWNER_COL_WIDTH),
            format_count(character.item_count),
            format_count(character.empty_slots),
            format_timestamp(character.last_updated),
            ow = OWNER_COL_WIDTH
        );
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
    out
}

pub fn render_load_report_text(report: &LoadReport) -> String {
    let mut out = String::new();
    if report.retained_vaults.is_empty()
        && report.skipped_vaults.is_empty()
        && report.warnings.is_empty()
        && report.duplicate_rows_removed == 0
    {
        return out;
    }

    writeln!(&mut out, " ::: Load Notes :::").expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    for vault in &report.retained_vaults {
        writeln!(
            &mut out,
            "  Shared vault kept from {} ({} slots)",
            vault.source_character,
            format_count(vault.slots)
        )
        .expect("writing to String cannot fail");
    }
    for vault in &report.skipped_vaults {
        writeln!(
            &mut out,
            "  Shared vault from {} skipped, same as {}",
            vault.source_character, vault.duplicate_of
        )
        .expect("writing to String cannot fail");
    }
    if report.duplicate_rows_removed > 0 {
        writeln!(
            &mut out,
            "  Duplicate rows removed: {}",
            format_count(report.duplicate_rows_removed)
        )
        .expect("writing to String cannot fail");
    }
    for warning in &report.warnings {
        let origin = match (&warning.file_name, warning.line) {
            (Some(file), Some(line)) => format!("{file}:{line}: "),
            (Some(file), None) => format!("{file}: "),
            _ => String::new(),
        };
        writeln!(&mut out, "  warning: {origin}{}", warning.error.message)
            .expect("writing to String cannot fail");
    }
    out
}

pub fn render_search_text(results: &SearchResults, options: TextRenderOptions) -> String {
    let mut out = String::new();
    let query = &results.query;
    let mut filters = Vec::new();
    if let Some(owner) = &query.owner {
        filters.push(format!("character {owner}"));
    }
    if let Some(category) = query.category {
        filters.push(format!("type {category}"));
    }
    if query.exact_match {
        filters.push("exact".to_string());
    }
    let filter_note = if filters.is_empty() {
        String::new()
    } else {
        format!(" [{}]", filters.join(", "))
    };

    if results.is_empty() {
        writeln!(
            &mut out,
            "No items found matching \"{}\"{filter_note}.",
            query.term
        )
        .expect("writing to String cannot fail");
        return out;
    }

    writeln!(
        &mut out,
        "Found {} matching \"{}\"{filter_note}:",
        plural(results.len(), "item", "items"),
        query.term
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    write_slot_header(&mut out);
    for slot in &results.rows {
        write_slot_line(&mut out, slot, options);
    }
    out
}

pub fn render_duplicates_text(groups: &[DuplicateGroup], min_count: usize) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        writeln!(
            &mut out,
            "No items found in {} or more places.",
            format_count(min_count)
        )
        .expect("writing to String cannot fail");
        return out;
    }

    writeln!(
        &mut out,
        "Items found in {} or more places ({}):",
        format_count(min_count),
        format_count(groups.len())
    )
    .expect("writing to String cannot fail");
    for group in groups {
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(
            &mut out,
            "{} (ID {}): {}, {} total",
            group.name,
            group.id,
            plural(group.total_found, "place", "places"),
            format_number_with_commas(group.total_quantity)
        )
        .expect("writing to String cannot fail");
        for slot in &group.members {
            let line = format!(
                "  {:<ow$} {:<lw$} x{}",
                fit_column(&slot.owner, OWNER_COL_WIDTH),
                fit_column(&slot.location, LOCATION_COL_WIDTH),
                format_number_with_commas(slot.count),
                ow = OWNER_COL_WIDTH,
                lw = LOCATION_COL_WIDTH
            );
            writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
        }
    }
    out
}

pub fn render_character_summary_text(summary: &CharacterSummary) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: {} :::", summary.owner).expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    write_label(&mut out, "Total items", &format_count(summary.total_items));
    write_label(&mut out, "Equipped", &format_count(summary.equipped_count));
    write_label(&mut out, "Inventory", &format_count(summary.inventory_count));
    write_label(&mut out, "Bank", &format_count(summary.bank_count));
    write_label(
        &mut out,
        "Unique items",
        &format_count(summary.unique_item_names),
    );
    write_label(&mut out, "Last updated", &format_timestamp(summary.last_updated));
    out
}

pub fn render_component_report_text(
    title: &str,
    report: &ComponentReport,
    options: TextRenderOptions,
) -> String {
    let mut out = String::new();
    writeln!(&mut out, " ::: {title} :::").expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "Augments in equipped gear are {}.",
        if report.include_equipped {
            "counted"
        } else {
            "not counted"
        }
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "Ready: {}/{}",
        report.ready_count,
        report.components.len()
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    for status in &report.components {
        let marker = if status.ready { "[READY]  " } else { "[MISSING]" };
        let line = format!(
            "{marker} {:<cw$} {}",
            fit_column(&status.name, COMPONENT_COL_WIDTH),
            progress_text(&status.progress),
            cw = COMPONENT_COL_WIDTH
        );
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
        if options.verbose {
            for location in &status.locations {
                writeln!(&mut out, "            {location}")
                    .expect("writing to String cannot fail");
            }
        }
    }

    writeln!(&mut out).expect("writing to String cannot fail");
    if report.can_complete {
        writeln!(&mut out, "All components are available.")
            .expect("writing to String cannot fail");
    } else {
        let missing: Vec<&str> = report.missing().map(|status| status.name.as_str()).collect();
        writeln!(&mut out, "Still needed: {}", missing.join(", "))
            .expect("writing to String cannot fail");
    }
    out
}

pub fn render_quest_progress_text(
    quests: &[(String, QuestProgress)],
    options: TextRenderOptions,
) -> String {
    let mut out = String::new();
    for (index, (key, progress)) in quests.iter().enumerate() {
        if index > 0 {
            writeln!(&mut out).expect("writing to String cannot fail");
        }
        writeln!(
            &mut out,
            " ::: {key}. {} :::  {}/{} items ({:.1}%){}",
            progress.quest,
            progress.items_satisfied,
            progress.total_items,
            progress.progress_percentage,
            if progress.can_complete { "  ready" } else { "" }
        )
        .expect("writing to String cannot fail");
        for item in &progress.items {
            let marker = if item.satisfied { "[x]" } else { "[ ]" };
            let mut line = format!(
                "  {marker} {:<qw$} {:>5}/{:<5}",
                fit_column(&item.name, QUEST_ITEM_COL_WIDTH),
                format_number_with_commas(item.owned),
                item.required,
                qw = QUEST_ITEM_COL_WIDTH
            );
            if !item.satisfied {
                line.push_str(&format!(" need {}", item.missing));
            }
            if options.verbose && !item.source.is_empty() {
                line.push_str(&format!("  ({})", item.source));
            }
            writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
        }
    }
    out
}

fn progress_text(progress: &ComponentProgress) -> String {
    match *progress {
        ComponentProgress::Tiered {
            legendary,
            enchanted,
            locked_legendary,
            locked_enchanted,
            shortfall,
        } => {
            let mut text = format!("{legendary} Legendary, {enchanted} Enchanted");
            if shortfall > 0 {
                text.push_str(&format!(", need {shortfall} more Enchanted"));
            }
            if locked_legendary + locked_enchanted > 0 {
                text.push_str(&format!(
                    " ({locked_legendary} Legendary, {locked_enchanted} Enchanted in gear)"
                ));
            }
            text
        }
        ComponentProgress::Single { count, locked } => {
            let mut text = format!("{count} found");
            if locked > 0 {
                text.push_str(&format!(" ({locked} in gear)"));
            }
            text
        }
    }
}

fn write_slot_header(out: &mut String) {
    writeln!(
        out,
        "{:<ow$} {:<lw$} {:<iw$} {:>7} {:>6}",
        "Character",
        "Location",
        "Item",
        "ID",
        "Count",
        ow = OWNER_COL_WIDTH,
        lw = LOCATION_COL_WIDTH,
        iw = ITEM_COL_WIDTH
    )
    .expect("writing to String cannot fail");
}

fn write_slot_line(out: &mut String, slot: &InventorySlot, options: TextRenderOptions) {
    let mut line = format!(
        "{:<ow$} {:<lw$} {:<iw$} {:>7} {:>6}",
        fit_column(&slot.owner, OWNER_COL_WIDTH),
        fit_column(&slot.location, LOCATION_COL_WIDTH),
        fit_column(&slot.name, ITEM_COL_WIDTH),
        slot.id,
        format_number_with_commas(slot.count),
        ow = OWNER_COL_WIDTH,
        lw = LOCATION_COL_WIDTH,
        iw = ITEM_COL_WIDTH
    );
    if options.verbose && !slot.extra.is_empty() {
        let extra: Vec<String> = slot
            .extra
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect();
        line.push_str("  ");
        line.push_str(&extra.join(" "));
    }
    writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
}

fn write_label(out: &mut String, label: &str, value: &str) {
    writeln!(out, "{:<lw$} {value}", format!("{label}:"), lw = LABEL_WIDTH)
        .expect("writing to String cannot fail");
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", format_count(n), if n == 1 { singular } else { plural })
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "unknown".to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

fn format_count(n: usize) -> String {
    format_number_with_commas(i64::try_from(n).unwrap_or(i64::MAX))
}

fn format_number_with_commas(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
