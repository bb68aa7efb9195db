//! Environment overrides for toolchain variables.
//!
//! A handful of variables (compiler base directory, compiler version,
//! compiler release version, compiler wrapper) prefer an explicit environment
//! value over the built-in default. Empty and unset are both "no override".

use crate::core::configuration::BuildConfiguration;

/// How a non-empty override value is turned into the variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideMode {
    /// The override replaces the default verbatim
    Replace,
    /// The override is a command prefix; a trailing space is appended
    CommandPrefix,
}

/// An environment variable that can override a computed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvOverride {
    var: &'static str,
    mode: OverrideMode,
}

/// Base directory of the clang prebuilts.
pub const LLVM_PREBUILTS_BASE: EnvOverride = EnvOverride::replace("LLVM_PREBUILTS_BASE");

/// Clang prebuilt version directory (e.g. `clang-r353983c`).
pub const LLVM_PREBUILTS_VERSION: EnvOverride = EnvOverride::replace("LLVM_PREBUILTS_VERSION");

/// Clang release version (e.g. `9.0.3`).
pub const LLVM_RELEASE_VERSION: EnvOverride = EnvOverride::replace("LLVM_RELEASE_VERSION");

/// Wrapper command placed in front of every compiler invocation.
pub const CC_WRAPPER: EnvOverride = EnvOverride::command_prefix("CC_WRAPPER");

impl EnvOverride {
    pub const fn replace(var: &'static str) -> Self {
        EnvOverride {
            var,
            mode: OverrideMode::Replace,
        }
    }

    pub const fn command_prefix(var: &'static str) -> Self {
        EnvOverride {
            var,
            mode: OverrideMode::CommandPrefix,
        }
    }

    pub fn mode(&self) -> OverrideMode {
        self.mode
    }

    /// Combine an (optional) override value with `default`.
    pub fn apply(&self, value: Option<String>, default: &str) -> String {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => match self.mode {
                OverrideMode::Replace => v,
                OverrideMode::CommandPrefix => v + " ",
            },
            None => default.to_string(),
        }
    }

    /// Resolve against the environment of a build configuration.
    pub fn resolve(&self, config: &dyn BuildConfiguration, default: &str) -> String {
        self.apply(config.getenv(self.var), default)
    }

    /// Resolve against the process environment.
    pub fn resolve_process(&self, default: &str) -> String {
        self.apply(std::env::var(self.var).ok(), default)
    }
}

/// Return `env_var` from the process environment if set and non-empty,
/// otherwise `default`.
pub fn resolve_override(env_var: &'static str, default: &str) -> String {
    EnvOverride::replace(env_var).resolve_process(default)
}
