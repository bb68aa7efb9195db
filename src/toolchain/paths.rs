//! Filtering candidate directories down to ones present in the source tree.

use crate::core::source_tree::SourceTree;

/// Keep the candidates that exist, each prefixed with `prefix`.
///
/// Order is preserved. Missing directories are expected (not every checkout
/// contains every project) and are skipped without error.
pub fn filter_existing<'a, I, F>(prefix: &str, candidates: I, exists: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> bool,
{
    candidates
        .into_iter()
        .filter(|candidate| {
            let found = exists(*candidate);
            if !found {
                tracing::debug!("skipping missing source directory `{}`", candidate);
            }
            found
        })
        .map(|candidate| format!("{}{}", prefix, candidate))
        .collect()
}

/// [`filter_existing`] against a [`SourceTree`], joined with single spaces.
pub fn prefixed_existent_paths(prefix: &str, candidates: &[&str], tree: &dyn SourceTree) -> String {
    filter_existing(prefix, candidates.iter().copied(), |path| tree.exists(path)).join(" ")
}
