//! Category to department-code mapping.

use std::collections::HashSet;

use intake_core::{Category, Department};
use tracing::debug;

/// Code used when nothing better is known.
pub const DEFAULT_DEPARTMENT_CODE: &str = "PW";

/// Static routing table.
pub fn static_department_code(category: Category) -> &'static str {
    match category {
        Category::Sanitation => "BBMP",
        Category::StreetLighting => "BESCOM",
        Category::WaterSupply => "PW",
        Category::Roads => "PW-SUB",
        Category::PublicSafety => "PD",
        Category::Other => DEFAULT_DEPARTMENT_CODE,
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Map a category label to a department code. Never fails.
///
/// With no department list the static table answers directly. With a list,
/// the table's code is used only if that department exists; otherwise the
/// label is matched against department names by substring, then by shared
/// tokens, then the first department is taken.
pub fn map_department(category: &str, departments: Option<&[Department]>) -> String {
    let target = Category::from_label(category).map(static_department_code);

    let departments = match departments {
        Some(list) if !list.is_empty() => list,
        _ => return target.unwrap_or(DEFAULT_DEPARTMENT_CODE).to_string(),
    };

    if let Some(code) = target {
        if departments.iter().any(|d| d.code == code) {
            return code.to_string();
        }
    }

    let needle = category.trim().to_lowercase();
    if !needle.is_empty() {
        if let Some(department) = departments
            .iter()
            .find(|d| d.name.to_lowercase().contains(&needle))
        {
            debug!(category, code = %department.code, "Mapped department by name");
            return department.code.clone();
        }
    }

    let wanted = tokens(category);
    let mut best: Option<(&Department, usize)> = None;
    for department in departments {
        let mut candidate = tokens(&department.name);
        candidate.extend(tokens(&department.code));
        let score = wanted.intersection(&candidate).count();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((department, score));
        }
    }

    if let Some((department, score)) = best {
        debug!(category, code = %department.code, score, "Mapped department by token overlap");
        return department.code.clone();
    }

    departments[0].code.clone()
}
