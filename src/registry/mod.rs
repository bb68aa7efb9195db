//! Namespaced store of toolchain variables.
//!
//! The registry has two phases. During declaration a [`RegistryBuilder`] is
//! filled with static and lazy variables; [`RegistryBuilder::freeze`] then
//! produces a read-only [`VariableRegistry`] that build-rule generators query
//! concurrently.
//!
//! ```rust,ignore
//! let mut builder = RegistryBuilder::new("cc/config");
//! builder.declare_static("CStdVersion", "gnu99")?;
//! builder.declare_lazy("CcWrapper", |config| CC_WRAPPER.resolve(config, ""))?;
//! let registry = builder.freeze();
//!
//! let wrapper = registry.resolve("CcWrapper", &config)?;
//! ```

pub mod errors;
pub mod references;
pub mod variable;

use std::collections::HashMap;
use std::path::{Component, Path};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::core::configuration::BuildConfiguration;

pub use errors::RegistryError;
pub use references::{reference, references};
pub use variable::{Resolver, Variable, VariableKind};

/// Declaration-phase view of a registry.
#[derive(Debug)]
pub struct RegistryBuilder {
    namespace: String,
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    /// Create an empty builder for `namespace` (e.g. `cc/config`).
    pub fn new(namespace: impl Into<String>) -> Self {
        RegistryBuilder {
            namespace: namespace.into(),
            variables: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Declare a variable with a fixed value.
    pub fn declare_static(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.insert(Variable::new_static(name.into(), value.into()))
    }

    /// Declare a variable computed from the build configuration on first use.
    ///
    /// The resolver runs at most once per configuration. It must not depend on
    /// its own value for the same configuration; doing so resolves to
    /// [`RegistryError::CyclicResolution`].
    pub fn declare_lazy<F>(&mut self, name: impl Into<String>, resolver: F) -> Result<(), RegistryError>
    where
        F: Fn(&dyn BuildConfiguration) -> String + Send + Sync + 'static,
    {
        self.insert(Variable::new_lazy(name.into(), Arc::new(resolver)))
    }

    /// Declare a static variable holding a path relative to the source tree.
    pub fn declare_source_path(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let path = path.into();

        let reason = if path.is_empty() {
            Some("is empty")
        } else if Path::new(&path).is_absolute() {
            Some("is absolute")
        } else if Path::new(&path)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            Some("escapes the source tree")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(RegistryError::InvalidSourcePath { name, path, reason });
        }

        self.declare_static(name, path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// End the declaration phase.
    pub fn freeze(self) -> VariableRegistry {
        tracing::debug!(
            "froze `{}` with {} variables",
            self.namespace,
            self.variables.len()
        );

        VariableRegistry {
            namespace: self.namespace,
            variables: self.variables,
            index: self.index,
        }
    }

    fn insert(&mut self, variable: Variable) -> Result<(), RegistryError> {
        if self.index.contains_key(variable.name()) {
            return Err(RegistryError::DuplicateDeclaration {
                namespace: self.namespace.clone(),
                name: variable.name().to_string(),
            });
        }

        tracing::debug!(
            "declared {} variable `{}`",
            variable.kind().as_str(),
            variable.name()
        );

        self.index
            .insert(variable.name().to_string(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }
}

/// A `${Name}` placeholder naming a variable outside this registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalReference {
    /// Variable whose value contains the placeholder
    pub variable: String,
    /// Referenced name
    pub reference: String,
}

/// Query-phase registry. Immutable apart from lazy memoization.
#[derive(Debug)]
pub struct VariableRegistry {
    namespace: String,
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl VariableRegistry {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Resolve `name` for `config`.
    pub fn resolve(
        &self,
        name: &str,
        config: &dyn BuildConfiguration,
    ) -> Result<String, RegistryError> {
        match self.get(name) {
            Some(variable) => variable.resolve(config),
            None => Err(RegistryError::UndeclaredReference {
                namespace: self.namespace.clone(),
                name: name.to_string(),
                suggestions: self.similar_names(name),
            }),
        }
    }

    /// Resolve every variable, in declaration order.
    pub fn resolve_all(
        &self,
        config: &dyn BuildConfiguration,
    ) -> Result<Vec<(String, String)>, RegistryError> {
        self.variables
            .par_iter()
            .map(|variable| {
                variable
                    .resolve(config)
                    .map(|value| (variable.name().to_string(), value))
            })
            .collect()
    }

    /// Placeholders in static values that name variables not declared here.
    ///
    /// Lazy values are not inspected since they depend on a configuration.
    pub fn external_references(&self) -> Vec<ExternalReference> {
        self.variables
            .iter()
            .filter_map(|variable| variable.static_value().map(|value| (variable, value)))
            .flat_map(|(variable, value)| {
                references(value)
                    .into_iter()
                    .filter(|name| !self.contains(name))
                    .map(move |name| ExternalReference {
                        variable: variable.name().to_string(),
                        reference: name.to_string(),
                    })
            })
            .collect()
    }

    fn similar_names(&self, name: &str) -> Vec<String> {
        let needle = name.to_ascii_lowercase();
        self.variables
            .iter()
            .map(Variable::name)
            .filter(|candidate| {
                let candidate = candidate.to_ascii_lowercase();
                candidate == needle
                    || (needle.len() >= 4
                        && (candidate.contains(&needle) || needle.contains(&candidate)))
            })
            .take(3)
            .map(str::to_string)
            .collect()
    }
}
