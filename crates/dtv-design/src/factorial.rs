use std::collections::BTreeMap;

use dtv_core::errors::{DtvError, ErrorInfo};
use indexmap::IndexMap;

/// Factor names mapped to their level lists, in declaration order.
pub type FactorMap = IndexMap<String, Vec<String>>;

/// One row of an expanded design: factor name to assigned level.
pub type DesignRow = BTreeMap<String, String>;

/// Builds the full factorial cross product of the given factors.
///
/// Rows are enumerated with the last declared factor varying fastest, so
/// the output order is a function of factor declaration order alone.
pub fn counterbalance(factors: &FactorMap) -> Result<Vec<DesignRow>, DtvError> {
    if factors.is_empty() {
        return Err(DtvError::Design(ErrorInfo::new(
            "no-factors",
            "counterbalance requires at least one factor",
        )));
    }
    for (name, levels) in factors {
        if levels.is_empty() {
            return Err(DtvError::Design(
                ErrorInfo::new("empty-factor", "factor has no levels").with_context("factor", name),
            ));
        }
    }

    let entries: Vec<(&String, &Vec<String>)> = factors.iter().collect();
    let mut rows = Vec::new();
    cross(&entries, 0, BTreeMap::new(), &mut rows);
    Ok(rows)
}

fn cross(
    factors: &[(&String, &Vec<String>)],
    idx: usize,
    current: DesignRow,
    rows: &mut Vec<DesignRow>,
) {
    if idx == factors.len() {
        rows.push(current);
        return;
    }
    let (name, levels) = factors[idx];
    for level in levels.iter() {
        let mut next = current.clone();
        next.insert(name.clone(), level.clone());
        cross(factors, idx + 1, next, rows);
    }
}
