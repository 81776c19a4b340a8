// src/query.rs

//! Pure selection functions over a snapshot of the record set.
//!
//! Nothing here mutates its input or touches engine state; callers
//! pass the records slice from a snapshot and get owned results back.

use std::cmp::Reverse;

use crate::models::{Difficulty, ProblemRecord};

/// Archive sort modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Numeric id descending; non-numeric ids rank as 0
    Newest,
    /// Numeric id ascending
    Oldest,
    /// Difficulty rank descending, stable within equal ranks
    Difficulty,
}

/// Keep records matching the search text and difficulty filter.
///
/// A record matches the search when its title, any tag, or its id
/// contains the text (case-insensitive). An empty search matches
/// everything. `difficulty` of `None` means "All".
pub fn filter_records(
    records: &[ProblemRecord],
    search: &str,
    difficulty: Option<Difficulty>,
) -> Vec<ProblemRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|r| {
            let matches_search = r.title.to_lowercase().contains(&needle)
                || r.tags.iter().any(|t| t.contains(&needle))
                || r.id.to_lowercase().contains(&needle);
            let matches_difficulty = difficulty.is_none_or(|d| r.difficulty == d);
            matches_search && matches_difficulty
        })
        .cloned()
        .collect()
}

/// Return the records in the requested order.
pub fn sorted(records: &[ProblemRecord], order: SortOrder) -> Vec<ProblemRecord> {
    let mut out = records.to_vec();
    match order {
        SortOrder::Newest => out.sort_by_key(|r| Reverse(r.numeric_id())),
        SortOrder::Oldest => out.sort_by_key(ProblemRecord::numeric_id),
        SortOrder::Difficulty => out.sort_by_key(|r| Reverse(r.difficulty.rank())),
    }
    out
}

/// Filter then sort in one call.
pub fn search_archive(
    records: &[ProblemRecord],
    search: &str,
    difficulty: Option<Difficulty>,
    order: SortOrder,
) -> Vec<ProblemRecord> {
    sorted(&filter_records(records, search, difficulty), order)
}

/// Select "today's" problem: the record with the latest parsed date,
/// tie-broken by highest numeric id. Malformed dates rank as the epoch
/// so dated records always win over undated ones. Fully tied records
/// resolve to the first in snapshot order.
pub fn daily_pick(records: &[ProblemRecord]) -> Option<&ProblemRecord> {
    // max_by_key keeps the last of equal keys; reversing keeps the first
    records
        .iter()
        .rev()
        .max_by_key(|r| (r.date_timestamp(), r.numeric_id()))
}

/// The curated top-10 subset, in held snapshot order.
pub fn featured(records: &[ProblemRecord]) -> Vec<ProblemRecord> {
    records.iter().filter(|r| r.is_featured).cloned().collect()
}

/// The most recently added records, newest first.
pub fn recent(records: &[ProblemRecord], limit: usize) -> Vec<ProblemRecord> {
    let mut out = sorted(records, SortOrder::Newest);
    out.truncate(limit);
    out
}

/// Look up a record by exact id.
pub fn by_id<'a>(records: &'a [ProblemRecord], id: &str) -> Option<&'a ProblemRecord> {
    records.iter().find(|r| r.id == id)
}
