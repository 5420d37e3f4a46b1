//! Bean registry module
//!
//! Name-keyed storage for managed singleton instances. Populated once
//! during bootstrap, read-only afterward; owns every bean for the process
//! lifetime.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// A managed singleton instance, type-erased for name-keyed storage
pub type BeanRef = Arc<dyn Any + Send + Sync>;

/// Mapping from unique bean name to bean instance
#[derive(Default)]
pub struct BeanRegistry {
    beans: HashMap<String, BeanRef>,
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("beans", &self.names())
            .finish()
    }
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bean under `name`. Returns `true` if an earlier entry was
    /// overwritten (names are not checked for collisions up front).
    pub fn insert(&mut self, name: String, bean: BeanRef) -> bool {
        self.beans.insert(name, bean).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&BeanRef> {
        self.beans.get(name)
    }

    /// Fetch a bean by name, downcast to its concrete type.
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.beans
            .get(name)
            .and_then(|bean| Arc::clone(bean).downcast::<T>().ok())
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    /// Registered bean names, sorted for stable diagnostics output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.beans.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Write-once dependency slot filled by the wiring pass.
///
/// An unfilled slot reads as `None`; under lenient wiring that is the
/// observable outcome of an unresolved dependency.
pub struct Injected<T> {
    slot: OnceLock<Arc<T>>,
}

impl<T> Injected<T> {
    pub const fn empty() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Fill the slot. Returns `false` if it was already filled.
    pub fn fill(&self, value: Arc<T>) -> bool {
        self.slot.set(value).is_ok()
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.get().map(Arc::as_ref)
    }

    pub fn is_filled(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T> Default for Injected<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> std::fmt::Debug for Injected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_filled() {
            f.write_str("Injected(filled)")
        } else {
            f.write_str("Injected(empty)")
        }
    }
}
