use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const SLOT_MARKER: &str = "-Slot";

// Worn gear slot names as they appear in the Location column, lowercased.
const WORN_GEAR_SLOTS: &[&str] = &[
    "charm",
    "ear",
    "head",
    "face",
    "neck",
    "shoulders",
    "arms",
    "wrist",
    "hands",
    "finger",
    "chest",
    "legs",
    "feet",
    "waist",
    "primary",
    "secondary",
    "range",
    "ammo",
];

// A single `-Slot` below one of these is an item sitting in a container.
const CONTAINER_MARKERS: &[&str] = &["General", "Bank", "SharedBank"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Equipped,
    Inventory,
    Bank,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Equipped,
        Category::Inventory,
        Category::Bank,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Equipped => "Equipped",
            Self::Inventory => "Inventory",
            Self::Bank => "Bank",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                format!("unknown item type '{value}', expected Equipped, Inventory, Bank or Other")
            })
    }
}

/// Everything derived from a raw `Location` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationClass {
    pub category: Category,
    pub slot_depth: usize,
    /// Socketed into gear (worn or stored), so not free for crafting.
    pub augment_in_gear: bool,
}

pub fn classify(location: &str) -> LocationClass {
    let slot_depth = slot_depth(location);
    LocationClass {
        category: category(location),
        slot_depth,
        augment_in_gear: augment_in_gear(location, slot_depth),
    }
}

pub fn slot_depth(location: &str) -> usize {
    location.matches(SLOT_MARKER).count()
}

pub fn category(location: &str) -> Category {
    let lowered = location.to_lowercase();
    if lowered.contains("bank") {
        Category::Bank
    } else if lowered.contains("bag") || lowered.contains("slot") {
        Category::Inventory
    } else if WORN_GEAR_SLOTS.contains(&lowered.as_str()) {
        Category::Equipped
    } else {
        Category::Other
    }
}

fn augment_in_gear(location: &str, slot_depth: usize) -> bool {
    match slot_depth {
        0 => false,
        1 => !CONTAINER_MARKERS
            .iter()
            .any(|marker| location.contains(marker)),
        _ => true,
    }
}
