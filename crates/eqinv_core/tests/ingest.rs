use chrono::{TimeZone, Utc};
use eqinv_core::core_api::{
    CoreErrorCode, InventoryFile, SHARED_VAULT_OWNER, ingest, ingest_file,
};
use eqinv_core::location::Category;
use eqinv_core::records::RawRecordSet;

const HEADER: &str = "Location\tName\tID\tCount\tSlots";

fn inventory_text(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

#[test]
fn ingest_splits_vault_rows_from_personal_rows() {
    let text = inventory_text(&[
        "Primary\tLegendary Sword\t1001\t1\t0",
        "General1\tBackpack\t2001\t1\t10",
        "General1-Slot1\tBread\t3001\t20\t0",
        "SharedBank1\tShared Box\t4001\t1\t8",
        "SharedBank1-Slot1\tHope Stone\t5001\t1\t0",
    ]);
    let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let ingestion =
        ingest(&RawRecordSet::parse(&text), "Tarbo", Some(ts)).expect("ingest should succeed");

    assert_eq!(ingestion.owner, "Tarbo");
    assert_eq!(ingestion.personal.len(), 3);
    let vault = ingestion.vault.as_ref().expect("vault rows present");
    assert_eq!(vault.len(), 2);

    // Vault rows stay with the source character until deduplicated.
    assert!(vault.iter().all(|slot| slot.owner == "Tarbo"));
    assert!(vault.iter().all(|slot| slot.owner != SHARED_VAULT_OWNER));
    assert!(ingestion.personal.iter().all(|slot| slot.owner == "Tarbo"));
    assert!(
        ingestion
            .personal
            .iter()
            .all(|slot| slot.source_timestamp == Some(ts))
    );

    assert_eq!(ingestion.personal[0].category(), Category::Equipped);
    assert_eq!(ingestion.personal[2].category(), Category::Inventory);
    assert_eq!(vault[1].category(), Category::Bank);
    assert!(!vault[1].is_augment_in_gear());
}

#[test]
fn ingest_without_vault_rows_reports_none() {
    let text = inventory_text(&["Primary\tRusty Axe\t12\t1\t0"]);
    let ingestion = ingest(&RawRecordSet::parse(&text), "Solo", None).expect("ingest");
    assert!(ingestion.vault.is_none());
    assert_eq!(ingestion.slot_count(), 1);
}

#[test]
fn empty_owner_hint_aborts_the_file() {
    let text = inventory_text(&["Primary\tRusty Axe\t12\t1\t0"]);
    let err = ingest(&RawRecordSet::parse(&text), "  ", None).expect_err("owner required");
    assert_eq!(err.code, CoreErrorCode::MissingOwner);
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let text = inventory_text(&[
        "Primary\tRusty Axe\t12\t1\t0",
        "General1",
        "\tNameless Location\t5\t1\t0",
        "General2\tBag of Holding\tnot-a-number\t1\t0",
        "General3\tSilk\t77\t5\t0",
    ]);
    let ingestion = ingest(&RawRecordSet::parse(&text), "Ali", None).expect("ingest");

    let names: Vec<&str> = ingestion
        .personal
        .iter()
        .map(|slot| slot.name.as_str())
        .collect();
    assert_eq!(names, vec!["Rusty Axe", "Silk"]);

    assert_eq!(ingestion.warnings.len(), 3);
    assert!(
        ingestion
            .warnings
            .iter()
            .all(|warning| warning.error.code == CoreErrorCode::MalformedRecord)
    );
    let lines: Vec<Option<usize>> = ingestion.warnings.iter().map(|w| w.line).collect();
    assert_eq!(lines, vec![Some(3), Some(4), Some(5)]);
}

#[test]
fn missing_numeric_fields_default_to_zero() {
    let text = "Location\tName\tID\tCount\nGeneral1\tEmpty\n";
    let ingestion = ingest(&RawRecordSet::parse(text), "Ali", None).expect("ingest");
    let slot = &ingestion.personal[0];
    assert!(slot.is_empty());
    assert_eq!((slot.id, slot.count), (0, 0));
}

#[test]
fn header_without_required_columns_is_a_parse_error() {
    let text = "Location\tName\tCount\nPrimary\tAxe\t1\n";
    let err = ingest(&RawRecordSet::parse(text), "Ali", None).expect_err("ID column missing");
    assert_eq!(err.code, CoreErrorCode::Parse);
    assert!(err.message.contains("ID"));
}

#[test]
fn extra_columns_pass_through_in_header_order() {
    let text = "Location\tName\tID\tCount\tSlots\tCharges\nPrimary\tWand\t9\t1\t0\t5\n";
    let ingestion = ingest(&RawRecordSet::parse(text), "Ali", None).expect("ingest");
    assert_eq!(
        ingestion.personal[0].extra,
        vec![
            ("Slots".to_string(), "0".to_string()),
            ("Charges".to_string(), "5".to_string()),
        ]
    );
}

#[test]
fn ingest_file_takes_owner_and_provenance_from_the_file() {
    let file = InventoryFile::new(
        "Bristle-Inventory.txt",
        inventory_text(&["Primary\tRusty Axe\t12\t1\t0"]),
        None,
    );
    let ingestion = ingest_file(&file).expect("ingest");
    assert_eq!(ingestion.owner, "Bristle");
    assert_eq!(
        ingestion.personal[0].source_file.as_deref(),
        Some("Bristle-Inventory.txt")
    );
}

#[test]
fn ingest_file_without_owner_in_name_fails() {
    let file = InventoryFile::new("Inventory.txt", inventory_text(&[]), None);
    let err = ingest_file(&file).expect_err("no owner");
    assert_eq!(err.code, CoreErrorCode::MissingOwner);
}
