//! Selection validation

use super::{CustomizationError, MAX_OPTION_QUANTITY, Violation};
use shared::models::{
    CustomizationGroup, CustomizationGroupWithOptions, CustomizationOption, OptionSelection,
    PriceType,
};
use std::collections::{HashMap, HashSet};

/// A selection matched to its group and option
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSelection<'a> {
    pub group: &'a CustomizationGroup,
    pub option: &'a CustomizationOption,
    pub quantity: i32,
}

/// Check `selections` against the item's attached `groups`.
///
/// All violations are collected rather than stopping at the first one. On
/// success the selections are returned resolved, in request order.
pub fn validate_selections<'a>(
    groups: &'a [CustomizationGroupWithOptions],
    selections: &[OptionSelection],
) -> Result<Vec<ResolvedSelection<'a>>, CustomizationError> {
    let mut by_option: HashMap<i64, (&CustomizationGroup, &CustomizationOption)> = HashMap::new();
    for g in groups {
        for o in &g.options {
            by_option.insert(o.id, (&g.group, o));
        }
    }

    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(selections.len());
    let mut per_group: HashMap<i64, i32> = HashMap::new();

    for sel in selections {
        if !seen.insert(sel.option_id) {
            violations.push(Violation::option(
                sel.option_id,
                format!("Option {} is selected more than once", sel.option_id),
            ));
            continue;
        }

        let Some(&(group, option)) = by_option.get(&sel.option_id) else {
            violations.push(Violation::option(
                sel.option_id,
                format!("Option {} is not offered for this item", sel.option_id),
            ));
            continue;
        };

        let mut ok = true;
        if !group.is_active {
            violations.push(Violation::group(
                group.id,
                &group.name,
                format!("{} is not currently offered", group.name),
            ));
            ok = false;
        }
        if !option.is_selectable() {
            violations.push(Violation {
                option_id: Some(option.id),
                ..Violation::group(group.id, &group.name, format!("{} is unavailable", option.name))
            });
            ok = false;
        }
        if let Some(msg) = quantity_problem(option, sel.quantity) {
            violations.push(Violation {
                option_id: Some(option.id),
                ..Violation::group(group.id, &group.name, msg)
            });
            ok = false;
        }

        *per_group.entry(group.id).or_default() += 1;
        if ok {
            resolved.push(ResolvedSelection {
                group,
                option,
                quantity: sel.quantity,
            });
        }
    }

    for g in groups {
        let group = &g.group;
        if !group.is_active {
            continue;
        }
        let count = per_group.get(&group.id).copied().unwrap_or(0);
        let min = group.effective_min();
        if count < min {
            let noun = if min == 1 { "selection" } else { "selections" };
            violations.push(Violation::group(
                group.id,
                &group.name,
                format!("{} requires at least {min} {noun}", group.name),
            ));
        }
        if let Some(max) = group.effective_max()
            && count > max
        {
            violations.push(Violation::group(
                group.id,
                &group.name,
                format!("{} allows at most {max} selection(s), got {count}", group.name),
            ));
        }
    }

    if violations.is_empty() {
        Ok(resolved)
    } else {
        Err(CustomizationError { violations })
    }
}

fn quantity_problem(option: &CustomizationOption, quantity: i32) -> Option<String> {
    if quantity < 1 {
        return Some(format!("{} quantity must be at least 1", option.name));
    }
    if quantity > 1 && option.price_type != PriceType::PerUnit {
        return Some(format!("{} can only be selected once", option.name));
    }
    if quantity > MAX_OPTION_QUANTITY {
        return Some(format!(
            "{} quantity cannot exceed {MAX_OPTION_QUANTITY}",
            option.name
        ));
    }
    None
}
