//! Grouping of related events for consolidation.
//!
//! Two events are related when their titles share the same leading
//! significant word, or when their attendee sets intersect. Relation is made
//! transitive with a union-find, so `a ~ b` and `b ~ c` puts all three in one
//! group.

use crate::event::CalendarEvent;
use crate::tuning;

/// Normalized leading title word used to relate events.
///
/// Title words are lowercased and split on anything that is not
/// alphanumeric; stop words and words shorter than
/// [`tuning::CONSOLIDATION_MIN_TOKEN_LEN`] are skipped.
pub fn consolidation_key(title: &str) -> Option<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .find(|token| {
            token.chars().count() >= tuning::CONSOLIDATION_MIN_TOKEN_LEN
                && !tuning::CONSOLIDATION_STOP_WORDS.contains(&token.as_str())
        })
}

/// Groups of at least two related events.
///
/// Members keep their input order; groups are ordered by their first member.
pub fn consolidation_groups(events: &[CalendarEvent]) -> Vec<Vec<&CalendarEvent>> {
    let keys: Vec<Option<String>> = events.iter().map(|e| consolidation_key(&e.title)).collect();
    let mut sets = DisjointSets::new(events.len());

    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            let same_key = keys[i].is_some() && keys[i] == keys[j];
            if same_key || events[i].shares_attendee_with(&events[j]) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<(usize, Vec<&CalendarEvent>)> = Vec::new();
    for (i, event) in events.iter().enumerate() {
        let root = sets.find(i);
        match groups.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(event),
            None => groups.push((root, vec![event])),
        }
    }

    groups
        .into_iter()
        .map(|(_, members)| members)
        .filter(|members| members.len() >= 2)
        .collect()
}

struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Lower index stays the root.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}
