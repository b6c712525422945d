//! Weaves Russian hymns into the primary corpus.
//!
//! Every Russian hymn arrives with a single link to its English original.
//! Merging walks the whole translation clique around that English hymn:
//! each member gains a `Russian` reference, and the Russian hymn gains a
//! reference to each member, so the clique stays a clique with one more node.
//!
//! The walk is an explicit worklist over the combined map. A member that
//! already carries the Russian reference has been visited, which is what
//! bounds the walk and makes a second merge of the same input a no-op.

use tracing::{debug, trace};

use crate::key::HymnKey;
use crate::models::{Corpus, Hymn, Reference, RUSSIAN};

/// Counters reported by [`merge_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Russian links whose anchor was present and walked.
    pub linked: usize,
    /// Russian links whose anchor is missing from the primary corpus.
    pub dangling: usize,
    /// Hymns that gained a Russian reference (anchors plus their clique).
    pub hymns_touched: usize,
}

/// Merge `russian` into `primary`, returning the combined corpus.
pub fn merge(primary: Corpus, russian: &Corpus) -> Corpus {
    merge_with_stats(primary, russian).0
}

pub fn merge_with_stats(primary: Corpus, russian: &Corpus) -> (Corpus, MergeStats) {
    let mut combined = primary;
    let mut stats = MergeStats::default();

    for (russian_key, russian_hymn) in russian {
        for link in &russian_hymn.language_references {
            if !combined.contains_key(&link.key) {
                trace!(
                    "{} was not found in all hymns. Occurred in {}",
                    link.key,
                    russian_key
                );
                stats.dangling += 1;
                continue;
            }
            stats.linked += 1;
            stats.hymns_touched += link_clique(&mut combined, &link.key, russian_key, russian_hymn);
        }
    }

    debug!(
        linked = stats.linked,
        dangling = stats.dangling,
        touched = stats.hymns_touched,
        "russian merge complete"
    );
    (combined, stats)
}

/// Link `russian_key` into the clique reachable from `anchor`. Returns the
/// number of members that gained the Russian reference.
fn link_clique(
    combined: &mut Corpus,
    anchor: &HymnKey,
    russian_key: &HymnKey,
    seed: &Hymn,
) -> usize {
    let russian_ref = Reference::new(RUSSIAN, russian_key.clone());
    let mut pending = vec![anchor.clone()];
    let mut touched = 0;

    while let Some(key) = pending.pop() {
        if &key == russian_key {
            continue;
        }
        let member_refs = match combined.get(&key) {
            Some(member) if member.language_references.contains(&russian_ref) => continue,
            Some(member) => member.language_references.clone(),
            None => {
                trace!("{} was not found in all hymns. Linked from {}", key, russian_key);
                continue;
            }
        };

        // The freshly parsed record replaces any stored copy of this key.
        if touched == 0 {
            combined.insert(russian_key.clone(), seed.clone());
        }
        let russian = combined
            .entry(russian_key.clone())
            .or_insert_with(|| seed.clone());
        russian.language_references.extend(
            member_refs
                .iter()
                .filter(|r| **r != russian_ref)
                .cloned(),
        );

        if let Some(member) = combined.get_mut(&key) {
            member.language_references.insert(russian_ref.clone());
        }
        touched += 1;

        // Reverse so the first stored reference is walked first.
        pending.extend(member_refs.into_iter().rev().map(|r| r.key));
    }
    touched
}
