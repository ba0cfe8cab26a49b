use chrono::{TimeZone, Utc};
use eqinv_core::core_api::{CoreErrorCode, InventorySlot, InventoryTable, SearchQuery};
use eqinv_core::location::Category;
use proptest::prelude::*;

fn slot(owner: &str, location: &str, name: &str, id: i64, count: i64) -> InventorySlot {
    InventorySlot::new(owner, location, name, id, count)
}

fn sample_table() -> InventoryTable {
    let early = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2025, 5, 3, 9, 30, 0).unwrap();
    InventoryTable::new(vec![
        slot("Tarbo", "Primary", "Legendary Sword", 1001, 1).with_source(None, Some(early)),
        slot("Tarbo", "General1-Slot1", "Bread", 3001, 20).with_source(None, Some(late)),
        slot("Tarbo", "General1-Slot2", "Bread", 3001, 20).with_source(None, Some(early)),
        slot("Tarbo", "Bank1", "Short Sword", 1002, 1),
        slot("Tarbo", "General2", "Empty", 0, 0),
        slot("Alpha", "General1-Slot1", "Water Flask", 4001, 6),
        slot("Alpha", "Bank2-Slot3", "Bread", 3001, 10),
        slot("SHARED-VAULT", "SharedBank1-Slot1", "Bread", 3001, 5),
    ])
}

#[test]
fn search_is_case_insensitive_substring_by_default() {
    let results = sample_table().search(&SearchQuery::new("sword"));
    let names: Vec<&str> = results.rows.iter().map(|slot| slot.name.as_str()).collect();
    assert_eq!(names, vec!["Legendary Sword", "Short Sword"]);
    assert_eq!(results.query.term, "sword");
}

#[test]
fn exact_match_requires_full_name() {
    let table = sample_table();
    assert!(table.search(&SearchQuery::new("sword").exact(true)).is_empty());
    let results = table.search(&SearchQuery::new("short SWORD").exact(true));
    assert_eq!(results.len(), 1);
}

#[test]
fn alternation_matches_any_alternative() {
    let results = sample_table().search(&SearchQuery::new("Flask|legendary"));
    let names: Vec<&str> = results.rows.iter().map(|slot| slot.name.as_str()).collect();
    assert_eq!(names, vec!["Water Flask", "Legendary Sword"]);
}

#[test]
fn filters_combine_with_the_name_match() {
    let table = sample_table();
    let by_owner = table.search(&SearchQuery::new("bread").owner("tarbo"));
    assert_eq!(by_owner.len(), 2);

    let by_category = table.search(&SearchQuery::new("bread").category(Category::Bank));
    let owners: Vec<&str> = by_category.rows.iter().map(|s| s.owner.as_str()).collect();
    assert_eq!(owners, vec!["Alpha", "SHARED-VAULT"]);
}

#[test]
fn search_never_returns_empty_slots() {
    let results = sample_table().search(&SearchQuery::new(""));
    assert_eq!(results.len(), 7);
    assert!(results.rows.iter().all(|slot| !slot.is_empty()));
}

#[test]
fn duplicates_group_by_name_and_id() {
    let groups = sample_table().find_duplicates(2);
    assert_eq!(groups.len(), 1);
    let bread = &groups[0];
    assert_eq!(bread.name, "Bread");
    assert_eq!(bread.total_found, 4);
    assert_eq!(bread.total_quantity, 55);
    assert_eq!(bread.members.len(), 4);

    assert_eq!(sample_table().find_duplicates(5).len(), 0);
    assert_eq!(sample_table().find_duplicates(1).len(), 4);
}

#[test]
fn character_summary_counts_categories() {
    let summary = sample_table()
        .character_summary("TARBO")
        .expect("Tarbo exists");
    assert_eq!(summary.owner, "Tarbo");
    assert_eq!(summary.total_items, 4);
    assert_eq!(summary.equipped_count, 1);
    assert_eq!(summary.inventory_count, 2);
    assert_eq!(summary.bank_count, 1);
    assert_eq!(summary.unique_item_names, 3);
    assert_eq!(
        summary.last_updated,
        Some(Utc.with_ymd_and_hms(2025, 5, 3, 9, 30, 0).unwrap())
    );
}

#[test]
fn character_summary_of_unknown_owner_fails() {
    let err = sample_table()
        .character_summary("Nobody")
        .expect_err("unknown owner");
    assert_eq!(err.code, CoreErrorCode::OwnerNotFound);
}

#[test]
fn character_with_only_empty_slots_is_not_found() {
    let table = InventoryTable::new(vec![slot("Ghost", "General1", "Empty", 0, 0)]);
    assert!(table.character_summary("Ghost").is_err());
}

#[test]
fn character_overview_orders_by_item_count() {
    let overview = sample_table().character_overview();
    let owners: Vec<(&str, usize, usize)> = overview
        .iter()
        .map(|row| (row.owner.as_str(), row.item_count, row.empty_slots))
        .collect();
    assert_eq!(
        owners,
        vec![("Tarbo", 4, 1), ("Alpha", 2, 0), ("SHARED-VAULT", 1, 0)]
    );
}

#[test]
fn table_overview_counts_slots() {
    let overview = sample_table().overview(2);
    assert_eq!(overview.total_slots, 8);
    assert_eq!(overview.non_empty_items, 7);
    assert_eq!(overview.empty_slots, 1);
    assert_eq!(overview.owners, 3);
    assert_eq!(overview.files_loaded, 2);
}

fn arb_slot() -> impl Strategy<Value = InventorySlot> {
    (
        prop::sample::select(vec!["Alpha", "Beta", "Gamma", "SHARED-VAULT"]),
        prop::sample::select(vec!["Primary", "General1-Slot1", "Bank2", "Primary-Slot1"]),
        prop::sample::select(vec!["Bread", "Water Flask", "Empty", "Hope Stone"]),
        0i64..3,
        0i64..20,
    )
        .prop_map(|(owner, location, name, id, count)| slot(owner, location, name, id, count))
}

proptest! {
    #[test]
    fn duplicate_groups_respect_min_count(
        rows in prop::collection::vec(arb_slot(), 0..40),
        min in 0usize..6,
    ) {
        let table = InventoryTable::new(rows);
        for group in table.find_duplicates(min) {
            prop_assert!(group.total_found >= min);
            prop_assert_eq!(group.members.len(), group.total_found);
            prop_assert!(group.members.iter().all(|slot| !slot.is_empty()));
        }
    }
}
