//! Collapse resolved assets to unique URLs.

use crate::types::ResolvedAsset;
use std::collections::HashSet;

/// Remove assets whose URL was already seen. First occurrence wins and
/// keeps its kind; order is preserved. URLs compare as exact strings.
pub fn dedupe(assets: Vec<ResolvedAsset>) -> Vec<ResolvedAsset> {
    let mut seen: HashSet<String> = HashSet::with_capacity(assets.len());
    assets
        .into_iter()
        .filter(|a| seen.insert(a.url.clone()))
        .collect()
}
