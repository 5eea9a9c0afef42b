use crate::constants::MATCHED_FRAGMENT_MAX_LEN;
use crate::signatures::match_condition::EntryText;
use crate::signatures::{Risk, SignatureCatalog};
use crate::types::snapshot::ProcessSnapshotEntry;

/// One rule firing on one live process. Carries exactly what the tracker
/// and emitter need; the full command line never leaves the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub pid: u32,
    pub start_time: u64,
    pub rule_id: String,
    pub category: String,
    pub risk: Risk,
    pub matched_fragment: String,
    pub process_name: String,
    pub user: String,
}

/// Evaluates `entry` against every rule in the catalog. Pure function of
/// its inputs: no I/O, no hidden state. Every matching rule contributes a
/// result, so one process can be flagged under several categories.
pub fn match_entry(entry: &ProcessSnapshotEntry, catalog: &SignatureCatalog) -> Vec<MatchResult> {
    let text = EntryText::from(entry);
    catalog
        .signatures()
        .iter()
        .filter_map(|signature| {
            signature
                .condition
                .get_match(&text)
                .map(|fragment| MatchResult {
                    pid: entry.pid,
                    start_time: entry.start_time,
                    rule_id: signature.id.clone(),
                    category: signature.category.clone(),
                    risk: signature.risk,
                    matched_fragment: truncate_fragment(fragment),
                    process_name: process_display_name(entry),
                    user: entry.user.clone(),
                })
        })
        .collect()
}

fn process_display_name(entry: &ProcessSnapshotEntry) -> String {
    if entry.name.is_empty() {
        entry.executable_basename().to_string()
    } else {
        entry.name.clone()
    }
}

fn truncate_fragment(fragment: String) -> String {
    if fragment.len() <= MATCHED_FRAGMENT_MAX_LEN {
        return fragment;
    }
    let mut end = MATCHED_FRAGMENT_MAX_LEN;
    while !fragment.is_char_boundary(end) {
        end -= 1;
    }
    fragment[..end].to_string()
}
