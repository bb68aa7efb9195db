//! Per-compiler-version tables of flags to strip.
//!
//! The global flag lists are written once and shared by every supported
//! compiler release. Each release has a set of flags it rejects (gcc-only
//! options, renamed warnings, linker options lld does not understand) which
//! are removed before the lists are joined into variables.
//!
//! Matching is exact. A prefix rule applies only where one is explicitly
//! declared; flags differing by a numeric suffix are otherwise listed one by one.

use std::collections::{BTreeMap, HashSet};

use crate::core::flags::FlagSet;
use crate::toolchain::globals::CLANG_DEFAULT_VERSION;
use crate::util::config::UnsupportedFlagsConfig;

/// A set of flags one compiler version does not accept.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedFlags {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl UnsupportedFlags {
    pub fn new() -> Self {
        UnsupportedFlags::default()
    }

    /// Build a set of exact-match rules.
    pub fn exact<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        UnsupportedFlags {
            exact: flags.into_iter().map(Into::into).collect(),
            prefixes: Vec::new(),
        }
    }

    /// Add an exact-match rule.
    pub fn insert(&mut self, flag: impl Into<String>) {
        self.exact.insert(flag.into());
    }

    /// Add a prefix rule: every flag starting with `prefix` is unsupported.
    pub fn insert_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    /// Add every rule from `other`.
    pub fn extend(&mut self, other: &UnsupportedFlags) {
        self.exact.extend(other.exact.iter().cloned());
        for prefix in &other.prefixes {
            self.insert_prefix(prefix.clone());
        }
    }

    pub fn is_unsupported(&self, flag: &str) -> bool {
        self.exact.contains(flag) || self.prefixes.iter().any(|p| flag.starts_with(p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    /// Remove unsupported flags, keeping the survivors in order.
    pub fn filter(&self, flags: &FlagSet) -> FlagSet {
        flags
            .iter()
            .filter(|flag| !self.is_unsupported(flag))
            .collect()
    }
}

/// Remove every flag in `unsupported` from `flags`, preserving order.
pub fn filter_unsupported(flags: &FlagSet, unsupported: &UnsupportedFlags) -> FlagSet {
    unsupported.filter(flags)
}

/// Unsupported compile and link flags for one compiler version.
#[derive(Debug, Clone, Default)]
pub struct CompilerRules {
    /// Compile flags the compiler rejects
    pub cflags: UnsupportedFlags,
    /// Link flags the linker rejects
    pub lldflags: UnsupportedFlags,
}

impl CompilerRules {
    fn extend(&mut self, other: &CompilerRules) {
        self.cflags.extend(&other.cflags);
        self.lldflags.extend(&other.lldflags);
    }
}

impl From<&UnsupportedFlagsConfig> for CompilerRules {
    fn from(config: &UnsupportedFlagsConfig) -> Self {
        let mut rules = CompilerRules {
            cflags: UnsupportedFlags::exact(config.cflags.iter().cloned()),
            lldflags: UnsupportedFlags::exact(config.lldflags.iter().cloned()),
        };
        for prefix in &config.cflag_prefixes {
            rules.cflags.insert_prefix(prefix.clone());
        }
        for prefix in &config.lldflag_prefixes {
            rules.lldflags.insert_prefix(prefix.clone());
        }
        rules
    }
}

/// Gcc-era compile flags the default clang rejects.
const CLANG_UNKNOWN_CFLAGS: &[&str] = &[
    "-finline-functions",
    "-finline-limit=64",
    "-fno-canonical-system-headers",
    "-Wno-clobbered",
    "-fno-devirtualize",
    "-fno-tree-sra",
    "-fprefetch-loop-arrays",
    "-funswitch-loops",
    "-Werror=unused-but-set-parameter",
    "-Werror=unused-but-set-variable",
    "-Wmaybe-uninitialized",
    "-Wno-error=clobbered",
    "-Wno-error=maybe-uninitialized",
    "-Wno-error=unused-but-set-parameter",
    "-Wno-error=unused-but-set-variable",
    "-Wno-extended-offsetof",
    "-Wno-free-nonheap-object",
    "-Wno-literal-suffix",
    "-Wno-maybe-uninitialized",
    "-Wno-old-style-declaration",
    "-Wno-psabi",
    "-Wno-unused-but-set-parameter",
    "-Wno-unused-but-set-variable",
    "-Wno-unused-local-typedefs",
    "-Wunused-but-set-parameter",
    "-Wunused-but-set-variable",
    "-fdiagnostics-color",
    "-mthumb-interwork",
    "-fgcse-after-reload",
    "-frerun-cse-after-loop",
    "-frename-registers",
    "-fno-strict-volatile-bitfields",
    "-fno-align-jumps",
    "-fno-builtin-sin",
    "-fno-caller-saves",
    "-fno-early-inlining",
    "-fno-move-loop-invariants",
    "-fno-partial-inlining",
    "-fno-tree-copy-prop",
    "-fno-tree-loop-optimize",
    "-mvectorize-with-neon-quad",
    "-mvectorize-with-neon-double",
];

/// Link flags lld rejects.
const CLANG_UNKNOWN_LLDFLAGS: &[&str] = &[
    "-fuse-ld=gold",
    "-Wl,--fix-cortex-a8",
    "-Wl,--no-fix-cortex-a8",
    "-Wl,-m,aarch64_elf64_le_vec",
];

/// Compiler version → unsupported flag rules.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedFlagTable {
    versions: BTreeMap<String, CompilerRules>,
}

impl UnsupportedFlagTable {
    pub fn new() -> Self {
        UnsupportedFlagTable::default()
    }

    /// The table shipped with ccvars, covering the default clang.
    pub fn builtin() -> Self {
        let mut table = UnsupportedFlagTable::new();
        table.insert(
            CLANG_DEFAULT_VERSION,
            CompilerRules {
                cflags: UnsupportedFlags::exact(CLANG_UNKNOWN_CFLAGS.iter().copied()),
                lldflags: UnsupportedFlags::exact(CLANG_UNKNOWN_LLDFLAGS.iter().copied()),
            },
        );
        table
    }

    /// Add rules for `version`, merging with any rules already present.
    pub fn insert(&mut self, version: impl Into<String>, rules: CompilerRules) {
        self.versions.entry(version.into()).or_default().extend(&rules);
    }

    /// Merge per-version sections from configuration.
    pub fn with_config(mut self, sections: &BTreeMap<String, UnsupportedFlagsConfig>) -> Self {
        for (version, section) in sections {
            self.insert(version.clone(), CompilerRules::from(section));
        }
        self
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }

    /// Known versions, sorted.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Rules for `version`; empty if the version is unknown.
    pub fn rules_for(&self, version: &str) -> CompilerRules {
        match self.versions.get(version) {
            Some(rules) => rules.clone(),
            None => {
                tracing::warn!(
                    "no unsupported-flag rules for compiler `{}`, flags will not be filtered",
                    version
                );
                CompilerRules::default()
            }
        }
    }
}
