//! Keyed diff between what a layer shows and what it should show.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Create { key: String, item: T },
    Update { key: String, item: T },
    Delete { key: String },
}

impl<T> Patch<T> {
    pub fn key(&self) -> &str {
        match self {
            Patch::Create { key, .. } | Patch::Update { key, .. } | Patch::Delete { key } => key,
        }
    }
}

/// Compute the patches that turn `existing` keys into `incoming` items.
///
/// Deletes come first, in `existing` order, followed by creates and updates
/// in `incoming` order. Duplicate incoming keys keep their first item.
pub fn reconcile<T>(existing: &[String], incoming: Vec<(String, T)>) -> Vec<Patch<T>> {
    let mut seen: HashSet<String> = HashSet::with_capacity(incoming.len());
    let mut upserts = Vec::with_capacity(incoming.len());

    for (key, item) in incoming {
        if !seen.insert(key.clone()) {
            continue;
        }
        if existing.contains(&key) {
            upserts.push(Patch::Update { key, item });
        } else {
            upserts.push(Patch::Create { key, item });
        }
    }

    let mut patches: Vec<Patch<T>> = existing
        .iter()
        .filter(|key| !seen.contains(*key))
        .map(|key| Patch::Delete { key: key.clone() })
        .collect();
    patches.extend(upserts);
    patches
}

/// Count of (created, updated, deleted) patches.
pub fn summarize<T>(patches: &[Patch<T>]) -> (usize, usize, usize) {
    patches.iter().fold((0, 0, 0), |(c, u, d), patch| match patch {
        Patch::Create { .. } => (c + 1, u, d),
        Patch::Update { .. } => (c, u + 1, d),
        Patch::Delete { .. } => (c, u, d + 1),
    })
}
