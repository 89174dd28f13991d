use std::collections::HashSet;

use crate::models::{EmpireSet, PostKey, TradingPost, Year};

/// Posts visible in `year` for the enabled empires, in input order.
pub fn visible_posts<'a>(
    posts: &'a [TradingPost],
    year: Year,
    active: &EmpireSet,
) -> Vec<&'a TradingPost> {
    posts.iter().filter(|p| p.is_visible(year, active)).collect()
}

/// How the rendered marker set must change to match a new visible set.
///
/// The three partitions are disjoint. `entering` and `persisting` keep the
/// order of the new set, `exiting` the order of the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub entering: Vec<PostKey>,
    pub persisting: Vec<PostKey>,
    pub exiting: Vec<PostKey>,
}

impl Reconciliation {
    /// Whether the set of rendered markers stays the same.
    pub fn is_unchanged(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// Keyed set difference between the currently rendered keys and the next
/// visible set.
pub fn diff_keys(previous: &[PostKey], next: &[PostKey]) -> Reconciliation {
    let before: HashSet<&PostKey> = previous.iter().collect();
    let after: HashSet<&PostKey> = next.iter().collect();

    let mut reconciliation = Reconciliation::default();
    for key in next {
        if before.contains(key) {
            reconciliation.persisting.push(key.clone());
        } else {
            reconciliation.entering.push(key.clone());
        }
    }
    reconciliation.exiting = previous
        .iter()
        .filter(|key| !after.contains(key))
        .cloned()
        .collect();
    reconciliation
}

/// [`diff_keys`] against a slice of visible posts.
pub fn diff_visible(previous: &[PostKey], next: &[&TradingPost]) -> Reconciliation {
    let next_keys: Vec<PostKey> = next.iter().map(|p| p.key()).collect();
    diff_keys(previous, &next_keys)
}
