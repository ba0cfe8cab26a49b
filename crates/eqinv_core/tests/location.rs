use eqinv_core::location::{Category, LocationClass, classify};
use proptest::prelude::*;

#[test]
fn depth_and_augment_truth_table() {
    let cases = [
        ("Primary", 0, false),
        ("Primary-Slot1", 1, true),
        ("General1-Slot1", 1, false),
        ("General2-Slot1-Slot2", 2, true),
        ("Bank4-Slot7", 1, false),
        ("SharedBank1-Slot3", 1, false),
        ("Bank4-Slot7-Slot1", 2, true),
        ("Range-Slot2", 1, true),
    ];
    for (location, depth, augment) in cases {
        let class = classify(location);
        assert_eq!(class.slot_depth, depth, "depth of {location}");
        assert_eq!(class.augment_in_gear, augment, "augment flag of {location}");
    }
}

#[test]
fn categories_follow_location_keywords() {
    assert_eq!(classify("Bank12").category, Category::Bank);
    assert_eq!(classify("SharedBank2-Slot1").category, Category::Bank);
    assert_eq!(classify("General1-Slot1").category, Category::Inventory);
    assert_eq!(classify("Primary-Slot1").category, Category::Inventory);
    assert_eq!(classify("Bag3").category, Category::Inventory);
    assert_eq!(classify("Primary").category, Category::Equipped);
    assert_eq!(classify("Shoulders").category, Category::Equipped);
    assert_eq!(classify("General1").category, Category::Other);
    assert_eq!(classify("").category, Category::Other);
}

#[test]
fn bare_gear_is_never_an_augment() {
    let class = classify("Head");
    assert_eq!(
        class,
        LocationClass {
            category: Category::Equipped,
            slot_depth: 0,
            augment_in_gear: false,
        }
    );
}

proptest! {
    #[test]
    fn classify_is_total_and_deterministic(location in ".{0,40}") {
        let first = classify(&location);
        let second = classify(&location);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.slot_depth, location.matches("-Slot").count());
        if first.slot_depth == 0 {
            prop_assert!(!first.augment_in_gear);
        }
        if first.slot_depth >= 2 {
            prop_assert!(first.augment_in_gear);
        }
    }

    #[test]
    fn nested_locations_are_always_augments(
        base in "(General|Bank|SharedBank|Primary|Ear)[0-9]{0,2}",
        first in 1u8..20,
        second in 1u8..20,
    ) {
        let location = format!("{base}-Slot{first}-Slot{second}");
        let class = classify(&location);
        prop_assert_eq!(class.slot_depth, 2);
        prop_assert!(class.augment_in_gear);
    }
}
