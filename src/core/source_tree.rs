//! Source tree existence checks.

use std::path::PathBuf;

/// Answers whether a project-relative path exists in the source tree.
pub trait SourceTree: Send + Sync {
    fn exists(&self, path: &str) -> bool;
}

/// A source tree rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirSourceTree {
    root: PathBuf,
}

impl DirSourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSourceTree { root: root.into() }
    }
}

impl SourceTree for DirSourceTree {
    fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }
}

impl<F> SourceTree for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}
