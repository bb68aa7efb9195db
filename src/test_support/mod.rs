//! Test utilities for ccvars unit tests.
//!
//! Provides an in-memory source tree and a call-counting lazy resolver so
//! tests can check existence filtering and memoization without touching the
//! real filesystem.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::configuration::BuildConfiguration;
use crate::core::source_tree::SourceTree;

/// In-memory source tree.
///
/// Adding a directory also adds all of its parents. Every `exists` call is
/// recorded so tests can check which paths were probed.
#[derive(Debug, Default)]
pub struct MockSourceTree {
    dirs: BTreeSet<String>,
    probes: Mutex<Vec<String>>,
}

impl MockSourceTree {
    pub fn new() -> Self {
        MockSourceTree::default()
    }

    /// Create a tree containing `dirs`.
    pub fn with_dirs<'a>(dirs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tree = MockSourceTree::new();
        for dir in dirs {
            tree.add_dir(dir);
        }
        tree
    }

    /// Add a directory and its parents.
    pub fn add_dir(&mut self, path: &str) {
        let mut current = path.trim_end_matches('/');
        while !current.is_empty() {
            self.dirs.insert(current.to_string());
            current = match current.rfind('/') {
                Some(i) => &current[..i],
                None => "",
            };
        }
    }

    /// Paths passed to `exists`, in call order.
    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

impl SourceTree for MockSourceTree {
    fn exists(&self, path: &str) -> bool {
        self.probes.lock().unwrap().push(path.to_string());
        self.dirs.contains(path.trim_end_matches('/'))
    }
}

/// A lazy resolver that returns a fixed value and counts its invocations.
#[derive(Debug, Clone)]
pub struct CountingResolver {
    value: String,
    calls: Arc<AtomicUsize>,
}

impl CountingResolver {
    pub fn new(value: impl Into<String>) -> Self {
        CountingResolver {
            value: value.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A resolver closure sharing this counter.
    pub fn resolver(&self) -> impl Fn(&dyn BuildConfiguration) -> String + Send + Sync + 'static {
        let value = self.value.clone();
        let calls = Arc::clone(&self.calls);
        move |_: &dyn BuildConfiguration| {
            calls.fetch_add(1, Ordering::SeqCst);
            value.clone()
        }
    }

    /// Number of times any resolver from this counter ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    /// Assert that a result is Ok and return the value.
    pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    }

    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }

    /// Assert that a flag string contains `flag` as a whole token.
    pub fn assert_has_flag(flags: &str, flag: &str) {
        assert!(
            flags.split(' ').any(|f| f == flag),
            "expected `{}` in flags: {}",
            flag,
            flags
        );
    }

    /// Assert that a flag string does not contain `flag` as a whole token.
    pub fn assert_lacks_flag(flags: &str, flag: &str) {
        assert!(
            !flags.split(' ').any(|f| f == flag),
            "unexpected `{}` in flags: {}",
            flag,
            flags
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::configuration::{BuildConfig, TargetOs};

    #[test]
    fn test_mock_source_tree_parents() {
        let tree = MockSourceTree::with_dirs(["system/core/include"]);
        assert!(tree.exists("system/core/include"));
        assert!(tree.exists("system/core"));
        assert!(tree.exists("system"));
        assert!(!tree.exists("system/media"));
        assert_eq!(tree.probes().len(), 4);
    }

    #[test]
    fn test_counting_resolver() {
        let counter = CountingResolver::new("x");
        let resolver = counter.resolver();
        let config = BuildConfig::new(TargetOs::Android);

        assert_eq!(resolver(&config), "x");
        assert_eq!(resolver(&config), "x");
        assert_eq!(counter.calls(), 2);
    }
}
