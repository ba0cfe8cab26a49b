use super::consolidate::InventoryTable;
use super::types::{
    CombinationRule, ComponentProgress, ComponentReport, ComponentStatus, InventorySlot,
    RequiredComponent,
};

/// Checks a crafting manifest against the table.
///
/// The available pool is every occupied slot, minus augments socketed into
/// gear unless `include_equipped` is set. Locked counts (augments in gear)
/// are reported either way but never count toward readiness on their own.
pub fn analyze(
    table: &InventoryTable,
    components: &[RequiredComponent],
    include_equipped: bool,
) -> ComponentReport {
    let available: Vec<&InventorySlot> = table
        .occupied()
        .filter(|slot| include_equipped || !slot.is_augment_in_gear())
        .collect();
    let locked: Vec<&InventorySlot> = table
        .occupied()
        .filter(|slot| slot.is_augment_in_gear())
        .collect();

    let statuses: Vec<ComponentStatus> = components
        .iter()
        .map(|component| component_status(component, &available, &locked))
        .collect();
    let ready_count = statuses.iter().filter(|status| status.ready).count();

    ComponentReport {
        include_equipped,
        can_complete: ready_count == statuses.len(),
        ready_count,
        components: statuses,
    }
}

fn component_status(
    component: &RequiredComponent,
    available: &[&InventorySlot],
    locked: &[&InventorySlot],
) -> ComponentStatus {
    let required = component.quantity.max(1) as usize;

    let (ready, progress, patterns) = match component.rule {
        CombinationRule::Tiered {
            enchanted_per_legendary,
        } => {
            let legendary_name = component.legendary_name();
            let enchanted_name = component.enchanted_name();
            let per = enchanted_per_legendary.max(1);

            let legendary = count_matching(available, &legendary_name);
            let enchanted = count_matching(available, &enchanted_name);
            let ready = legendary + enchanted / per >= required;
            let shortfall = if ready {
                0
            } else {
                (required - legendary) * per - enchanted
            };

            (
                ready,
                ComponentProgress::Tiered {
                    legendary,
                    enchanted,
                    locked_legendary: count_matching(locked, &legendary_name),
                    locked_enchanted: count_matching(locked, &enchanted_name),
                    shortfall,
                },
                vec![legendary_name, enchanted_name],
            )
        }
        CombinationRule::Single => {
            let count = stack_total(available, &component.name);
            (
                count >= required,
                ComponentProgress::Single {
                    count,
                    locked: stack_total(locked, &component.name),
                },
                vec![component.name.clone()],
            )
        }
    };

    let locations = available
        .iter()
        .filter(|slot| patterns.iter().any(|pattern| slot.name_contains(pattern)))
        .map(|slot| format!("{}: {}", slot.owner, slot.location))
        .collect();

    ComponentStatus {
        name: component.name.clone(),
        source: component.source.clone(),
        ready,
        progress,
        locations,
    }
}

fn count_matching(rows: &[&InventorySlot], pattern: &str) -> usize {
    rows.iter().filter(|slot| slot.name_contains(pattern)).count()
}

/// Summed stack counts of matching rows; negative counts contribute nothing.
fn stack_total(rows: &[&InventorySlot], pattern: &str) -> usize {
    rows.iter()
        .filter(|slot| slot.name_contains(pattern))
        .map(|slot| usize::try_from(slot.count).unwrap_or(0))
        .sum()
}
