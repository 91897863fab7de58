//! Value Registries
//!
//! Named sources of allowed identifiers (target types, entity ids, tags).
//! Registries are shared read-only between comparisons, so implementations
//! must be safe for concurrent reads.

use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A named, possibly reloadable set of allowed strings
pub trait Registry: Send + Sync + fmt::Debug {
    /// Name used in audit descriptions
    fn name(&self) -> &str;

    /// Refresh the contents. Idempotent; may be expensive.
    fn populate(&self);

    /// Current contents in registry order
    fn values(&self) -> Vec<String>;

    fn has(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }

    fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// Fixed, in-memory registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRegistry {
    name: String,
    values: Vec<String>,
}

impl SimpleRegistry {
    pub fn new<S: Into<String>>(name: &str, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Registry with no values; as a dynamic-selector target set it means
    /// "no explicit type"
    pub fn empty(name: &str) -> Self {
        Self::new::<String>(name, [])
    }
}

impl Registry for SimpleRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn populate(&self) {}

    fn values(&self) -> Vec<String> {
        self.values.clone()
    }

    fn has(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

type Loader = Box<dyn Fn() -> Vec<String> + Send + Sync>;

/// Registry backed by a loader, reloaded on every [`Registry::populate`].
///
/// Reads use the last loaded snapshot; the first read loads it lazily.
pub struct ReloadableRegistry {
    name: String,
    loader: Loader,
    snapshot: RwLock<Option<Vec<String>>>,
}

impl ReloadableRegistry {
    pub fn new(name: &str, loader: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            name: name.to_string(),
            loader: Box::new(loader),
            snapshot: RwLock::new(None),
        }
    }

    fn with_snapshot<T>(&self, read: impl FnOnce(&[String]) -> T) -> T {
        {
            let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(values) = guard.as_deref() {
                return read(values);
            }
        }
        self.populate();
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        read(guard.as_deref().unwrap_or_default())
    }
}

impl fmt::Debug for ReloadableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadableRegistry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Registry for ReloadableRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn populate(&self) {
        let values = (self.loader)();
        log::debug!("registry '{}' loaded {} values", self.name, values.len());
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(values);
    }

    fn values(&self) -> Vec<String> {
        self.with_snapshot(<[String]>::to_vec)
    }

    fn has(&self, value: &str) -> bool {
        self.with_snapshot(|values| values.iter().any(|v| v == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_simple_registry() {
        let registry = SimpleRegistry::new("entities", ["pig", "cow"]);
        assert_eq!(registry.name(), "entities");
        assert!(registry.has("pig"));
        assert!(!registry.has("horse"));
        assert_eq!(registry.values(), vec!["pig", "cow"]);
        assert!(SimpleRegistry::empty("none").is_empty());
    }

    #[test]
    fn test_reloadable_loads_lazily_and_reloads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = ReloadableRegistry::new("dynamic", move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                vec!["a".to_string()]
            } else {
                vec!["a".to_string(), "b".to_string()]
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(registry.has("a"));
        assert!(!registry.has("b"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        registry.populate();
        assert!(registry.has("b"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
