//! Loading a registry and build configuration for command-line use.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::configuration::{BuildConfig, BuildConfiguration, TargetOs};
use crate::core::source_tree::DirSourceTree;
use crate::registry::{ExternalReference, VariableKind, VariableRegistry};
use crate::toolchain::globals::{global_registry, GlobalFlags, GlobalsEnv, CLANG_DEFAULT_VERSION};
use crate::toolchain::overrides::LLVM_PREBUILTS_VERSION;
use crate::toolchain::unsupported::UnsupportedFlagTable;
use crate::util::config::{global_config_path, project_config_path, Config};

/// Options for [`load_session`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Top of the source tree; falls back to config, then the current directory
    pub source_root: Option<PathBuf>,
    /// Target OS; falls back to config, then android
    pub target: Option<TargetOs>,
    /// Global config file; falls back to `~/.ccvars/config.toml`
    pub global_config: Option<PathBuf>,
}

/// A frozen registry plus the configuration to resolve it against.
#[derive(Debug)]
pub struct Session {
    pub registry: VariableRegistry,
    pub config: BuildConfig,
    pub source_root: PathBuf,
    /// Compiler version whose unsupported-flag rules were applied
    pub compiler_version: String,
}

/// A resolved variable, as reported by `ccvars list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVariable {
    pub name: String,
    pub kind: VariableKind,
    pub value: String,
}

/// Run the declaration phase for the global toolchain variables.
///
/// The source root comes from the options, else the global config, else the
/// current directory. A project config found there may move the root with
/// its own `[source] root`, taken relative to that directory.
pub fn load_session(opts: &SessionOptions) -> Result<Session> {
    let global_path = opts.global_config.clone().or_else(global_config_path);
    let mut config = global_path
        .as_deref()
        .map(Config::load_or_default)
        .unwrap_or_default();

    let start = match opts.source_root.clone().or_else(|| config.source.root.clone()) {
        Some(root) => root,
        None => std::env::current_dir().context("failed to get current directory")?,
    };

    let project = Config::load_or_default(&project_config_path(&start));
    let project_root = project.source.root.clone();
    config.merge(project);

    let source_root = match (&opts.source_root, project_root) {
        (Some(root), _) => root.clone(),
        (None, Some(root)) => start.join(root),
        (None, None) => start,
    };

    let target = match opts.target {
        Some(target) => target,
        None => config.target_os()?.unwrap_or_default(),
    };

    let compiler_version = LLVM_PREBUILTS_VERSION.resolve_process(CLANG_DEFAULT_VERSION);
    tracing::debug!(
        "declaring globals for {} (source root {}, compiler {})",
        target,
        source_root.display(),
        compiler_version
    );

    let rules = UnsupportedFlagTable::builtin()
        .with_config(&config.unsupported)
        .rules_for(&compiler_version);
    let tree = DirSourceTree::new(&source_root);
    let build_config = BuildConfig::from_process_env(target);

    let env = GlobalsEnv {
        flags: GlobalFlags::new(build_config.build_os()),
        rules,
        source_tree: &tree,
    };
    let registry = global_registry(&env)?;

    Ok(Session {
        registry,
        config: build_config,
        source_root,
        compiler_version,
    })
}

impl Session {
    /// Resolve one variable.
    pub fn resolve(&self, name: &str) -> Result<String> {
        Ok(self.registry.resolve(name, &self.config)?)
    }

    /// Resolve every variable in declaration order.
    pub fn list(&self) -> Result<Vec<ResolvedVariable>> {
        let resolved = self.registry.resolve_all(&self.config)?;
        Ok(resolved
            .into_iter()
            .zip(self.registry.iter())
            .map(|((name, value), variable)| ResolvedVariable {
                name,
                kind: variable.kind(),
                value,
            })
            .collect())
    }

    /// `${...}` references to variables declared elsewhere.
    pub fn external_references(&self) -> Vec<ExternalReference> {
        self.registry.external_references()
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target(&self) -> TargetOs {
        self.config.target_os()
    }
}
