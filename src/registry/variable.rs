//! Declared variables and their per-configuration memoization.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Serialize;

use crate::core::configuration::{BuildConfiguration, ConfigId, ConfigKey};
use crate::registry::errors::RegistryError;

/// A function computing a variable's value from the active configuration.
pub type Resolver = Arc<dyn Fn(&dyn BuildConfiguration) -> String + Send + Sync>;

/// How a variable gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Fixed for the process lifetime
    Static,
    /// Computed once per configuration
    Lazy,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Static => "static",
            VariableKind::Lazy => "lazy",
        }
    }
}

/// A memoized value for one configuration.
struct MemoSlot {
    key: ConfigKey,
    value: Arc<OnceLock<String>>,
}

/// Memoized values keyed by configuration id. Slots for configurations that
/// no longer exist are swept whenever a new slot is added.
type MemoTable = RwLock<HashMap<u64, MemoSlot>>;

enum Value {
    Static(String),
    Lazy { resolver: Resolver, memo: MemoTable },
}

thread_local! {
    /// (variable, configuration) pairs being resolved on this thread.
    static ACTIVE: RefCell<Vec<(usize, u64)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a (variable, configuration) pair as being resolved on this thread.
struct ActiveGuard {
    key: (usize, u64),
}

impl ActiveGuard {
    /// Returns `None` if the pair is already being resolved further up the stack.
    fn enter(key: (usize, u64)) -> Option<Self> {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&key) {
                None
            } else {
                active.push(key);
                Some(ActiveGuard { key })
            }
        })
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|k| *k == self.key) {
                active.remove(pos);
            }
        });
    }
}

/// A named variable owned by a registry.
pub struct Variable {
    name: String,
    value: Value,
}

impl Variable {
    pub(crate) fn new_static(name: String, value: String) -> Self {
        Variable {
            name,
            value: Value::Static(value),
        }
    }

    pub(crate) fn new_lazy(name: String, resolver: Resolver) -> Self {
        Variable {
            name,
            value: Value::Lazy {
                resolver,
                memo: RwLock::new(HashMap::new()),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        match self.value {
            Value::Static(_) => VariableKind::Static,
            Value::Lazy { .. } => VariableKind::Lazy,
        }
    }

    /// The declared value of a static variable.
    pub fn static_value(&self) -> Option<&str> {
        match &self.value {
            Value::Static(value) => Some(value),
            Value::Lazy { .. } => None,
        }
    }

    /// Resolve the value for `config`.
    ///
    /// A lazy resolver runs at most once per configuration, even under
    /// concurrent callers; everyone else observes the memoized string. A
    /// resolver that panics leaves no cached value and is reported as
    /// [`RegistryError::ResolverPanicked`]. A resolver that needs its own
    /// value for the same configuration, directly or through other
    /// variables, gets [`RegistryError::CyclicResolution`].
    pub fn resolve(&self, config: &dyn BuildConfiguration) -> Result<String, RegistryError> {
        let (resolver, memo) = match &self.value {
            Value::Static(value) => return Ok(value.clone()),
            Value::Lazy { resolver, memo } => (resolver, memo),
        };

        let id = config.id();
        let slot = slot_for(memo, id);
        if let Some(value) = slot.get() {
            return Ok(value.clone());
        }

        let _guard = ActiveGuard::enter((self as *const Variable as usize, id.as_u64()))
            .ok_or_else(|| RegistryError::CyclicResolution {
                name: self.name.clone(),
            })?;

        panic::catch_unwind(AssertUnwindSafe(|| {
            slot.get_or_init(|| {
                tracing::trace!("resolving `{}` for {}", self.name, id);
                resolver(config)
            })
            .clone()
        }))
        .map_err(|payload| {
            evict_empty(memo, id.as_u64());
            RegistryError::ResolverPanicked {
                name: self.name.clone(),
                message: panic_message(payload.as_ref()),
            }
        })
    }

    /// Number of memoized values held, including ones for configurations
    /// dropped since the last sweep.
    pub fn cached_configurations(&self) -> usize {
        match &self.value {
            Value::Static(_) => 0,
            Value::Lazy { memo, .. } => memo
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .filter(|slot| slot.value.get().is_some())
                .count(),
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Variable");
        s.field("name", &self.name);
        match &self.value {
            Value::Static(value) => s.field("value", value),
            Value::Lazy { .. } => s.field("value", &"<lazy>"),
        };
        s.finish()
    }
}

/// Fetch or create the memo slot for `id`.
fn slot_for(memo: &MemoTable, id: &ConfigId) -> Arc<OnceLock<String>> {
    // Fast path: slot already exists (read lock only)
    if let Some(slot) = memo
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id.as_u64())
    {
        return Arc::clone(&slot.value);
    }

    let mut memo = memo.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(slot) = memo.get(&id.as_u64()) {
        return Arc::clone(&slot.value);
    }

    memo.retain(|_, slot| slot.key.is_live());
    let value = Arc::new(OnceLock::new());
    memo.insert(
        id.as_u64(),
        MemoSlot {
            key: id.key(),
            value: Arc::clone(&value),
        },
    );
    value
}

/// Drop the slot for `id` if nothing was stored in it.
fn evict_empty(memo: &MemoTable, id: u64) {
    let mut memo = memo.write().unwrap_or_else(PoisonError::into_inner);
    if memo.get(&id).is_some_and(|slot| slot.value.get().is_none()) {
        memo.remove(&id);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
