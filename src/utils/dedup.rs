//! URL-keyed deduplication of source records.

use std::collections::{HashMap, HashSet};

use crate::models::SourceRecord;

/// Find records sharing a URL
///
/// Returns groups of record indices, one group per URL that occurs more than
/// once. Groups are ordered by their first occurrence and indices within a
/// group are ascending.
pub fn find_duplicates(records: &[SourceRecord]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        match group_of.get(record.url.as_str()) {
            Some(&g) => groups[g].push(idx),
            None => {
                group_of.insert(record.url.as_str(), groups.len());
                groups.push(vec![idx]);
            }
        }
    }

    groups.retain(|g| g.len() > 1);
    groups
}

/// Remove records whose URL was already seen
///
/// The first occurrence of each URL is kept and everything else about the
/// input order is preserved. Later duplicates are dropped whole, even when
/// their title or content differ.
pub fn deduplicate_by_url(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    deduplicate_by_url_indexed(records)
        .into_iter()
        .map(|(_, record)| record)
        .collect()
}

/// Like [`deduplicate_by_url`], pairing each kept record with its input index
pub fn deduplicate_by_url_indexed(records: Vec<SourceRecord>) -> Vec<(usize, SourceRecord)> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    records
        .into_iter()
        .enumerate()
        .filter(|(_, record)| seen.insert(record.url.clone()))
        .collect()
}
