//! Ordered compiler and linker flag lists.

use std::fmt;

/// An ordered list of command-line flags.
///
/// Order is significant: later flags may override earlier ones on the
/// compiler command line. Flags containing spaces must already be escaped
/// by whoever declares them.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<String>,
}

impl FlagSet {
    pub fn new() -> Self {
        FlagSet { flags: Vec::new() }
    }

    /// Append a single flag.
    pub fn push(&mut self, flag: impl Into<String>) {
        self.flags.push(flag.into());
    }

    /// Return a new set with `extra` appended after the existing flags.
    pub fn chain<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.flags
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Join the flags with single spaces.
    pub fn join(&self) -> String {
        self.flags.join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FlagSet {
            flags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&[&str]> for FlagSet {
    fn from(flags: &[&str]) -> Self {
        flags.iter().copied().collect()
    }
}

impl From<Vec<String>> for FlagSet {
    fn from(flags: Vec<String>) -> Self {
        FlagSet { flags }
    }
}

impl IntoIterator for FlagSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.into_iter()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}
