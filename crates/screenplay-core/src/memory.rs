//! Typed key/value memory scoped to an actor's lifetime
//!
//! Heterogeneous store: values of any `'static` type keyed by string.
//! Keys are unique; re-remembering a key overwrites it. Recall
//! distinguishes a key that was never remembered from a key remembered
//! under a different type.

use dashmap::DashMap;
use std::any::Any;

struct StoredValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// Why a recall failed
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RecallError {
    /// The key was never remembered
    KeyNotFound,
    /// The key holds a value of a different type
    TypeMismatch {
        /// Type actually stored under the key
        stored: &'static str,
    },
}

/// An actor's private scratch store
#[derive(Default)]
pub(crate) struct Memory {
    entries: DashMap<String, StoredValue>,
}

impl Memory {
    pub(crate) fn remember<V>(&self, key: impl Into<String>, value: V)
    where
        V: Any + Send + Sync,
    {
        self.entries.insert(
            key.into(),
            StoredValue {
                value: Box::new(value),
                type_name: std::any::type_name::<V>(),
            },
        );
    }

    pub(crate) fn recall<V>(&self, key: &str) -> Result<V, RecallError>
    where
        V: Any + Clone,
    {
        let entry = self.entries.get(key).ok_or(RecallError::KeyNotFound)?;
        entry
            .value
            .downcast_ref::<V>()
            .cloned()
            .ok_or(RecallError::TypeMismatch {
                stored: entry.type_name,
            })
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn forget(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("len", &self.len()).finish()
    }
}
