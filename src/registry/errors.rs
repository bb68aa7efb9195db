//! Registry error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Programming errors surfaced by the variable registry.
///
/// None of these are recoverable: callers are expected to abort the build.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum RegistryError {
    #[error("variable `{name}` is already declared in `{namespace}`")]
    #[diagnostic(code(ccvars::registry::duplicate))]
    DuplicateDeclaration { namespace: String, name: String },

    #[error("variable `{name}` is not declared in `{namespace}`")]
    #[diagnostic(code(ccvars::registry::undeclared))]
    UndeclaredReference {
        namespace: String,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("resolver for `{name}` panicked: {message}")]
    #[diagnostic(code(ccvars::registry::resolver_panicked))]
    ResolverPanicked { name: String, message: String },

    #[error("resolver for `{name}` depends on its own value")]
    #[diagnostic(code(ccvars::registry::cyclic_resolution))]
    CyclicResolution { name: String },

    #[error("invalid source path `{path}` for `{name}`: {reason}")]
    #[diagnostic(code(ccvars::registry::invalid_source_path))]
    InvalidSourcePath {
        name: String,
        path: String,
        reason: &'static str,
    },
}

impl RegistryError {
    /// Name of the variable the error is about.
    pub fn variable(&self) -> &str {
        match self {
            RegistryError::DuplicateDeclaration { name, .. }
            | RegistryError::UndeclaredReference { name, .. }
            | RegistryError::ResolverPanicked { name, .. }
            | RegistryError::CyclicResolution { name }
            | RegistryError::InvalidSourcePath { name, .. } => name,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RegistryError::DuplicateDeclaration { namespace, name } => {
                Diagnostic::error(format!("variable `{}` declared twice", name))
                    .with_context(format!("namespace: {}", namespace))
                    .with_suggestion(format!(
                        "Rename one of the declarations of `{}` or remove the duplicate",
                        name
                    ))
            }

            RegistryError::UndeclaredReference {
                namespace,
                name,
                suggestions,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "no variable named `{}` in `{}`",
                    name, namespace
                ));

                for suggestion in suggestions {
                    diag = diag.with_suggestion(format!("Did you mean `{}`?", suggestion));
                }

                diag.with_suggestion("Run `ccvars list` to see all declared variables")
            }

            RegistryError::ResolverPanicked { name, message } => {
                Diagnostic::error(format!("failed to resolve `{}`", name))
                    .with_context(format!("resolver panicked: {}", message))
            }

            RegistryError::CyclicResolution { name } => {
                Diagnostic::error(format!("failed to resolve `{}`", name))
                    .with_context("its resolver asked for its own value for the same configuration")
                    .with_suggestion("Declare the shared part as a separate variable")
            }

            RegistryError::InvalidSourcePath { name, path, reason } => {
                Diagnostic::error(format!("invalid source path for `{}`", name))
                    .with_context(format!("`{}` {}", path, reason))
                    .with_suggestion("Use a path relative to the top of the source tree")
            }
        }
    }
}
