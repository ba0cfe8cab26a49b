use std::collections::{BTreeSet, HashMap};

use crate::location::Category;

use super::consolidate::InventoryTable;
use super::error::{CoreError, CoreErrorCode};
use super::types::{
    CharacterOverview, CharacterSummary, DuplicateGroup, InventorySlot, SearchQuery,
    SearchResults, TableOverview,
};

impl InventoryTable {
    pub fn search(&self, query: &SearchQuery) -> SearchResults {
        let alternatives = query.alternatives();
        let term = query.term.to_lowercase();

        let mut rows: Vec<InventorySlot> = self
            .occupied()
            .filter(|slot| {
                let name = slot.name.to_lowercase();
                match &alternatives {
                    Some(parts) => parts.iter().any(|part| name.contains(part.as_str())),
                    None if query.exact_match => name == term,
                    None => name.contains(&term),
                }
            })
            .filter(|slot| query.owner.as_deref().is_none_or(|owner| slot.owned_by(owner)))
            .filter(|slot| query.category.is_none_or(|category| slot.category() == category))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.owner, &a.name).cmp(&(&b.owner, &b.name)));

        SearchResults {
            query: query.clone(),
            rows,
        }
    }

    pub fn find_duplicates(&self, min_owner_count: usize) -> Vec<DuplicateGroup> {
        let mut index: HashMap<(&str, i64), usize> = HashMap::new();
        let mut groups: Vec<DuplicateGroup> = Vec::new();

        for slot in self.occupied() {
            let position = *index
                .entry((slot.name.as_str(), slot.id))
                .or_insert_with(|| {
                    groups.push(DuplicateGroup {
                        name: slot.name.clone(),
                        id: slot.id,
                        total_found: 0,
                        total_quantity: 0,
                        members: Vec::new(),
                    });
                    groups.len() - 1
                });
            let group = &mut groups[position];
            group.total_found += 1;
            group.total_quantity += slot.count;
            group.members.push(slot.clone());
        }

        groups.retain(|group| group.total_found >= min_owner_count);
        groups.sort_by(|a, b| {
            b.total_found
                .cmp(&a.total_found)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        groups
    }

    pub fn character_summary(&self, owner: &str) -> Result<CharacterSummary, CoreError> {
        let rows: Vec<&InventorySlot> = self.occupied().filter(|slot| slot.owned_by(owner)).collect();
        let Some(first) = rows.first() else {
            return Err(CoreError::new(
                CoreErrorCode::OwnerNotFound,
                format!("character '{owner}' not found"),
            ));
        };

        let count_category =
            |category: Category| rows.iter().filter(|slot| slot.category() == category).count();
        let unique_item_names = rows
            .iter()
            .map(|slot| slot.name.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Ok(CharacterSummary {
            owner: first.owner.clone(),
            total_items: rows.len(),
            equipped_count: count_category(Category::Equipped),
            inventory_count: count_category(Category::Inventory),
            bank_count: count_category(Category::Bank),
            unique_item_names,
            last_updated: rows.iter().filter_map(|slot| slot.source_timestamp).max(),
        })
    }

    pub fn character_overview(&self) -> Vec<CharacterOverview> {
        let mut overview: Vec<CharacterOverview> = self
            .owners()
            .into_iter()
            .map(|owner| {
                let rows: Vec<&InventorySlot> =
                    self.iter().filter(|slot| slot.owner == owner).collect();
                let item_count = rows.iter().filter(|slot| !slot.is_empty()).count();
                CharacterOverview {
                    owner: owner.to_string(),
                    item_count,
                    empty_slots: rows.len() - item_count,
                    last_updated: rows.iter().filter_map(|slot| slot.source_timestamp).max(),
                    source_file: rows.iter().find_map(|slot| slot.source_file.clone()),
                }
            })
            .collect();
        overview.sort_by(|a, b| {
            b.item_count
                .cmp(&a.item_count)
                .then_with(|| a.owner.cmp(&b.owner))
        });
        overview
    }

    pub fn overview(&self, files_loaded: usize) -> TableOverview {
        let non_empty_items = self.occupied().count();
        TableOverview {
            total_slots: self.len(),
            non_empty_items,
            empty_slots: self.len() - non_empty_items,
            owners: self.owners().len(),
            files_loaded,
        }
    }
}
