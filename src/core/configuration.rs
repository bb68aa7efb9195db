//! Build configuration seen by lazy variable resolvers.
//!
//! A configuration is identified by its [`ConfigId`]. Lazy variables are
//! memoized per id, so two handles to the same configuration share cached
//! values while a modified configuration always gets a fresh id.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

/// Process-wide counter for configuration identities.
static NEXT_CONFIG_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a build configuration.
///
/// Clones share one identity. Caches hold a [`ConfigKey`] instead, which
/// notices once every clone of the identity has been dropped.
#[derive(Debug, Clone)]
pub struct ConfigId(Arc<u64>);

impl ConfigId {
    /// Allocate a new, never-before-seen identity.
    pub fn fresh() -> Self {
        ConfigId(Arc::new(NEXT_CONFIG_ID.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn as_u64(&self) -> u64 {
        *self.0
    }

    /// A cache key that does not keep this identity alive.
    pub fn key(&self) -> ConfigKey {
        ConfigKey {
            id: *self.0,
            live: Arc::downgrade(&self.0),
        }
    }
}

impl PartialEq for ConfigId {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl Eq for ConfigId {}

impl Hash for ConfigId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config#{}", self.0)
    }
}

/// Weak handle to a [`ConfigId`], used as a memoization key.
#[derive(Debug, Clone)]
pub struct ConfigKey {
    id: u64,
    live: Weak<u64>,
}

impl ConfigKey {
    pub fn as_u64(&self) -> u64 {
        self.id
    }

    /// Whether any configuration with this identity still exists.
    pub fn is_live(&self) -> bool {
        self.live.strong_count() > 0
    }
}

/// Operating system a module is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// The default device target
    #[default]
    Android,
    /// Specialized device target with a reduced flag set
    Fuchsia,
    Linux,
    Darwin,
    Windows,
}

impl TargetOs {
    /// Get the OS name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Android => "android",
            TargetOs::Fuchsia => "fuchsia",
            TargetOs::Linux => "linux",
            TargetOs::Darwin => "darwin",
            TargetOs::Windows => "windows",
        }
    }

    /// Whether this target needs the specialized (reduced) flag set.
    pub fn is_specialized(&self) -> bool {
        matches!(self, TargetOs::Fuchsia)
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" | "device" => Ok(TargetOs::Android),
            "fuchsia" => Ok(TargetOs::Fuchsia),
            "linux" | "linux_glibc" => Ok(TargetOs::Linux),
            "darwin" | "macos" => Ok(TargetOs::Darwin),
            "windows" => Ok(TargetOs::Windows),
            other => Err(format!(
                "unknown target OS `{}` (expected android, fuchsia, linux, darwin or windows)",
                other
            )),
        }
    }
}

/// Operating system running the build itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    Linux,
    Darwin,
    Windows,
}

impl HostOs {
    /// Detect the OS this process is running on.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => HostOs::Darwin,
            "windows" => HostOs::Windows,
            _ => HostOs::Linux,
        }
    }

    /// Directory tag used for host prebuilts (e.g. `linux-x86`).
    pub fn prebuilt_tag(&self) -> &'static str {
        match self {
            HostOs::Linux => "linux-x86",
            HostOs::Darwin => "darwin-x86",
            HostOs::Windows => "windows-x86",
        }
    }
}

/// Read accessors a lazy variable resolver may consult.
///
/// Implementations must be cheap to query and must return the same answers for
/// the lifetime of a given [`ConfigId`].
pub trait BuildConfiguration: Send + Sync {
    /// Identity used as the memoization key.
    fn id(&self) -> &ConfigId;

    /// OS being built for.
    fn target_os(&self) -> TargetOs;

    /// OS running the build.
    fn build_os(&self) -> HostOs;

    /// Look up an environment variable as seen by this configuration.
    fn getenv(&self, name: &str) -> Option<String>;

    /// Whether this is a specialized OS build.
    fn is_specialized_target(&self) -> bool {
        self.target_os().is_specialized()
    }

    /// Host prebuilt directory tag for this build.
    fn prebuilt_os(&self) -> &'static str {
        self.build_os().prebuilt_tag()
    }
}

/// A concrete build configuration backed by an environment snapshot.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    id: ConfigId,
    target_os: TargetOs,
    build_os: HostOs,
    env: HashMap<String, String>,
}

impl BuildConfig {
    /// Create a configuration with an empty environment.
    pub fn new(target_os: TargetOs) -> Self {
        BuildConfig {
            id: ConfigId::fresh(),
            target_os,
            build_os: HostOs::current(),
            env: HashMap::new(),
        }
    }

    /// Create a configuration that snapshots the current process environment.
    pub fn from_process_env(target_os: TargetOs) -> Self {
        BuildConfig {
            env: std::env::vars().collect(),
            ..BuildConfig::new(target_os)
        }
    }

    /// Set an environment variable. The result is a different configuration.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self.id = ConfigId::fresh();
        self
    }

    /// Set the build OS. The result is a different configuration.
    pub fn with_build_os(mut self, build_os: HostOs) -> Self {
        self.build_os = build_os;
        self.id = ConfigId::fresh();
        self
    }

    /// Set the target OS. The result is a different configuration.
    pub fn with_target_os(mut self, target_os: TargetOs) -> Self {
        self.target_os = target_os;
        self.id = ConfigId::fresh();
        self
    }
}

impl BuildConfiguration for BuildConfig {
    fn id(&self) -> &ConfigId {
        &self.id
    }

    fn target_os(&self) -> TargetOs {
        self.target_os
    }

    fn build_os(&self) -> HostOs {
        self.build_os
    }

    fn getenv(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }
}
