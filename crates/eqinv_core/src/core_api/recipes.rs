//! Crafting manifests for the Zeb weapon and the Signet of Might quest chain,
//! plus loading of additional quest manifests from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::consolidate::InventoryTable;
use super::error::{CoreError, CoreErrorCode};
use super::types::{InventorySlot, ItemProgress, QuestProgress, RequiredComponent};

const ZEB_FRAGMENTS: &[&str] = &[
    "Akhevan Fragment of Truth",
    "Fiery Fragment of Truth",
    "Gelid Fragment of Truth",
    "Hastened Fragment of Truth",
    "Healing Fragment of Truth",
    "Icy Fragment of Truth",
    "Lethal Fragment of Truth",
    "Magical Fragment of Truth",
    "Replenishing Fragment of Truth",
    "Runic Fragment of Truth",
    "Ssraeshzian Fragment of Truth",
    "Yttrium Fragment of Truth",
];

const ZEB_OTHER_COMPONENTS: &[&str] = &["Time Phased Quintessence", "Vortex of the Past"];

pub fn zeb_weapon_components() -> Vec<RequiredComponent> {
    ZEB_FRAGMENTS
        .iter()
        .map(|name| RequiredComponent::tiered(*name, "Fragment of Truth drop or combine"))
        .chain(
            ZEB_OTHER_COMPONENTS
                .iter()
                .map(|name| RequiredComponent::single(*name, "drop")),
        )
        .collect()
}

struct SignetQuest {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    prerequisite: Option<&'static str>,
}

struct SignetItem {
    quest: &'static str,
    name: &'static str,
    quantity: u32,
    source: &'static str,
    kind: &'static str,
}

#[rustfmt::skip]
const SIGNET_QUESTS: &[SignetQuest] = &[
    SignetQuest { key: "1", name: "Blacksmithing", description: "Create Imbued Breastplate to receive Hardened Leather Signet", prerequisite: None },
    SignetQuest { key: "2", name: "Brewing", description: "Create Portable Drink to receive Clay Signet", prerequisite: Some("Hardened Leather Signet") },
    SignetQuest { key: "3", name: "Jewelcrafting", description: "Create Velium Blue Diamond Ring to receive Wooden Signet", prerequisite: Some("Clay Signet") },
    SignetQuest { key: "4", name: "Pottery", description: "Create Filled Sacred Urn to receive Metal Signet", prerequisite: Some("Wooden Signet") },
    SignetQuest { key: "5", name: "Tailoring", description: "Create Fire Undergarment Tunic to receive Marked Signet", prerequisite: Some("Metal Signet") },
    SignetQuest { key: "6", name: "Fletching", description: "Create Signet Featherwood Bow to receive Runed Signet", prerequisite: Some("Marked Signet") },
    SignetQuest { key: "7", name: "Baking + Final Turn-In", description: "Create Food Satchel and complete final turn-ins for Signet of Might", prerequisite: Some("Runed Signet") },
];

#[rustfmt::skip]
const SIGNET_ITEMS: &[SignetItem] = &[
    // Blacksmithing
    SignetItem { quest: "1", name: "Drop of Pure Rain",              quantity: 1, source: "rare drop, Bastion of Thunder 'vann' mobs",       kind: "drop" },
    SignetItem { quest: "1", name: "Sandstorm Pearl",                quantity: 3, source: "uncommon, Bastion of Thunder 'jord' mobs",        kind: "drop" },
    SignetItem { quest: "1", name: "Storm Rider Blood",              quantity: 1, source: "common, Bastion of Thunder 'stormrider' mobs",    kind: "drop" },
    SignetItem { quest: "1", name: "Raw Diamond",                    quantity: 2, source: "random world drop",                               kind: "drop" },
    SignetItem { quest: "1", name: "Nightmare Mephit Blood",         quantity: 2, source: "PoNightmare mephits, common",                     kind: "drop" },
    SignetItem { quest: "1", name: "Jar of Acid",                    quantity: 1, source: "vendor: Kanio Paerk, PoK",                        kind: "vendor" },
    SignetItem { quest: "1", name: "Concentrated Celestial Solvent", quantity: 1, source: "vendor: Darius Gandril, PoK",                     kind: "vendor" },
    SignetItem { quest: "1", name: "The Scent of Marr",              quantity: 3, source: "vendor: Loran Thu'Leth, PoK",                     kind: "vendor" },
    SignetItem { quest: "1", name: "Mixing Bowl",                    quantity: 1, source: "vendor: Klen Ironstove, PoK",                     kind: "vendor" },

    // Brewing
    SignetItem { quest: "2", name: "Water Flask",                    quantity: 6, source: "vendor: Perago Crotal, PoK",                      kind: "vendor" },
    SignetItem { quest: "2", name: "Kaladim Constitutional",         quantity: 6, source: "crafted, Brewing 335",                            kind: "crafted" },
    SignetItem { quest: "2", name: "Concentrated Celestial Solvent", quantity: 1, source: "vendor: Darius Gandril, PoK",                     kind: "vendor" },
    SignetItem { quest: "2", name: "The Scent of Marr",              quantity: 3, source: "vendor: Loran Thu'Leth, PoK",                     kind: "vendor" },
    SignetItem { quest: "2", name: "Mixing Bowl",                    quantity: 1, source: "vendor: Klen Ironstove, PoK",                     kind: "vendor" },

    // Jewelcrafting
    SignetItem { quest: "3", name: "Etching Tools",                  quantity: 1, source: "quest: Meg Tucter, Thurgadin",                    kind: "quest" },
    SignetItem { quest: "3", name: "Water Flask",                    quantity: 2, source: "vendor: Perago Crotal, PoK",                      kind: "vendor" },
    SignetItem { quest: "3", name: "Velium Bar",                     quantity: 5, source: "vendor: Talem Tucter, Thurgadin; enchant 3 with Enchanter", kind: "vendor" },
    SignetItem { quest: "3", name: "Blue Diamond",                   quantity: 1, source: "random world drop",                               kind: "drop" },
    SignetItem { quest: "3", name: "Concentrated Celestial Solvent", quantity: 1, source: "vendor: Darius Gandril, PoK",                     kind: "vendor" },
    SignetItem { quest: "3", name: "The Scent of Marr",              quantity: 3, source: "vendor: Loran Thu'Leth, PoK",                     kind: "vendor" },
    SignetItem { quest: "3", name: "Mixing Bowl",                    quantity: 1, source: "vendor: Klen Ironstove, PoK",                     kind: "vendor" },
    SignetItem { quest: "3", name: "Planar's Jewelry Kit",           quantity: 1, source: "vendor: Noirin Khalen, PoK",                      kind: "vendor" },
    SignetItem { quest: "3", name: "Coldain Smithing Hammer",        quantity: 1, source: "quest: Coldain Ring #4",                          kind: "quest" },
    SignetItem { quest: "3", name: "Coldain Velium Temper",          quantity: 1, source: "vendor: Nimren Stonecutter, Thurgadin",           kind: "vendor" },

    // Pottery
    SignetItem { quest: "4", name: "Iron Oxide",                     quantity: 1, source: "drop",                                            kind: "drop" },
    SignetItem { quest: "4", name: "Permafrost Crystals",            quantity: 1, source: "drop",                                            kind: "drop" },
    SignetItem { quest: "4", name: "Sacred Water",                   quantity: 1, source: "drop",                                            kind: "drop" },

    // Tailoring
    SignetItem { quest: "5", name: "Fire Mephit Blood",              quantity: 1, source: "drop",                                            kind: "drop" },
    SignetItem { quest: "5", name: "Molten Ore",                     quantity: 1, source: "drop",                                            kind: "drop" },
    SignetItem { quest: "5", name: "Obsidianwood Sap",               quantity: 1, source: "drop",                                            kind: "drop" },
    SignetItem { quest: "5", name: "Fire Arachnid Silk",             quantity: 1, source: "drop",                                            kind: "drop" },

    // Fletching
    SignetItem { quest: "6", name: "Featherwood Bowstave",           quantity: 1, source: "drop, Plane of Air",                              kind: "drop" },
    SignetItem { quest: "6", name: "Planing Tool",                   quantity: 1, source: "vendor: Ellis Cloudchaser, PoK",                  kind: "vendor" },
    SignetItem { quest: "6", name: "Air Arachnid Silk",              quantity: 2, source: "drop, Plane of Air spiders",                      kind: "drop" },
    SignetItem { quest: "6", name: "Clump of Wax",                   quantity: 1, source: "vendor: Ellis Cloudchaser, PoK",                  kind: "vendor" },
    SignetItem { quest: "6", name: "Wind Metal Bow Cam",             quantity: 2, source: "tinkered, trivial 282",                           kind: "crafted" },

    // Baking and the final turn-in
    SignetItem { quest: "7", name: "Bristlebane's Party Platter",    quantity: 3, source: "Baking 322; many sub-recipes",                    kind: "crafted" },
    SignetItem { quest: "7", name: "Hope Stone",                     quantity: 1, source: "rare random drop, Elemental Planes",              kind: "drop" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<QuestItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisite: Option<String>,
    pub items: Vec<QuestItem>,
}

impl Quest {
    /// Every item and nested component as name/quantity pairs, merging
    /// repeated names by summing their quantities.
    pub fn flattened(&self) -> Vec<(String, u32)> {
        let mut out: Vec<(String, u32)> = Vec::new();
        let mut stack: Vec<&QuestItem> = self.items.iter().rev().collect();
        while let Some(item) = stack.pop() {
            match out.iter_mut().find(|(name, _)| *name == item.name) {
                Some((_, quantity)) => *quantity += item.quantity,
                None => out.push((item.name.clone(), item.quantity)),
            }
            stack.extend(item.components.iter().rev());
        }
        out
    }

    /// The flattened manifest as analyzer input, one entry per distinct name.
    pub fn required_components(&self) -> Vec<RequiredComponent> {
        self.flattened()
            .into_iter()
            .map(|(name, quantity)| {
                let source = self.source_of(&name).unwrap_or_default().to_string();
                RequiredComponent {
                    quantity,
                    ..RequiredComponent::single(name, source)
                }
            })
            .collect()
    }

    /// First non-empty source listed for `name`, nested components included.
    fn source_of(&self, name: &str) -> Option<&str> {
        let mut stack: Vec<&QuestItem> = self.items.iter().rev().collect();
        while let Some(item) = stack.pop() {
            if item.name == name && !item.source.is_empty() {
                return Some(&item.source);
            }
            stack.extend(item.components.iter().rev());
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
    quests: BTreeMap<String, Quest>,
}

impl RecipeBook {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to parse recipe manifest: {e}"),
            )
        })
    }

    pub fn signet_of_might() -> Self {
        let quests = SIGNET_QUESTS
            .iter()
            .map(|quest| {
                let items = SIGNET_ITEMS
                    .iter()
                    .filter(|item| item.quest == quest.key)
                    .map(|item| QuestItem {
                        name: item.name.to_string(),
                        quantity: item.quantity,
                        source: item.source.to_string(),
                        kind: item.kind.to_string(),
                        components: Vec::new(),
                    })
                    .collect();
                (
                    quest.key.to_string(),
                    Quest {
                        name: quest.name.to_string(),
                        description: quest.description.to_string(),
                        prerequisite: quest.prerequisite.map(str::to_string),
                        items,
                    },
                )
            })
            .collect();
        Self { quests }
    }

    pub fn get(&self, key: &str) -> Option<&Quest> {
        self.quests.get(key)
    }

    pub fn quests(&self) -> impl Iterator<Item = (&str, &Quest)> {
        self.quests.iter().map(|(key, quest)| (key.as_str(), quest))
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

pub fn quest_progress(table: &InventoryTable, quest: &Quest) -> QuestProgress {
    let items: Vec<ItemProgress> = quest
        .items
        .iter()
        .map(|item| {
            let owned = owned_quantity(table, &item.name);
            let required = i64::from(item.quantity);
            ItemProgress {
                name: item.name.clone(),
                owned,
                required: item.quantity,
                satisfied: owned >= required,
                missing: (required - owned).max(0),
                source: item.source.clone(),
                kind: item.kind.clone(),
            }
        })
        .collect();

    let total_items = items.len();
    let items_satisfied = items.iter().filter(|item| item.satisfied).count();
    let progress_percentage = if total_items == 0 {
        0.0
    } else {
        items_satisfied as f64 / total_items as f64 * 100.0
    };

    QuestProgress {
        quest: quest.name.clone(),
        can_complete: items_satisfied == total_items,
        items,
        items_satisfied,
        total_items,
        progress_percentage,
    }
}

/// Summed stack count, preferring exact name hits over partial ones.
fn owned_quantity(table: &InventoryTable, name: &str) -> i64 {
    let lowered = name.to_lowercase();
    let exact: Vec<&InventorySlot> = table
        .occupied()
        .filter(|slot| slot.name.to_lowercase() == lowered)
        .collect();
    if !exact.is_empty() {
        return exact.iter().map(|slot| slot.count).sum();
    }
    table
        .occupied()
        .filter(|slot| slot.name_contains(name))
        .map(|slot| slot.count)
        .sum()
}
