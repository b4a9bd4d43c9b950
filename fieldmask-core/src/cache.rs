//! cache.rs - Manages the caching of compiled rule sets.
//!
//! This module provides a thread-safe cache that converts a list of rule
//! expressions into a shared `RuleSet` once per key. The cache is an explicit
//! object owned by the caller; entries live as long as the cache and are never
//! evicted, so its size is bounded by the number of distinct rule
//! configurations, not by request volume.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;
use once_cell::sync::OnceCell;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::FieldMaskError;
use crate::rules::{compile_rule_set, RuleSet};

/// Identity of a rule configuration in a [`RuleCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RuleSetKey(String);

impl RuleSetKey {
    /// A caller-chosen identity, such as `"orders.create/request"`.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A stable SHA-256 fingerprint of the ordered expression list.
    pub fn from_expressions<S: AsRef<str>>(expressions: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for expr in expressions {
            let bytes = expr.as_ref().as_bytes();
            // Length prefix keeps ["ab", "c"] and ["a", "bc"] apart.
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Slot = Arc<OnceCell<Arc<RuleSet>>>;

/// A build-once cache of compiled rule sets.
///
/// Concurrent first requests for the same key compile at most once; every
/// caller receives the same `Arc`. A failed build is not stored, so a later
/// request for that key compiles again.
#[derive(Debug, Default)]
pub struct RuleCache {
    slots: RwLock<HashMap<RuleSetKey, Slot>>,
    compilations: AtomicUsize,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rule set stored under `key`, compiling `expressions` on first use.
    pub fn get_or_build<S: AsRef<str>>(
        &self,
        key: &RuleSetKey,
        expressions: &[S],
    ) -> Result<Arc<RuleSet>, FieldMaskError> {
        let slot = self.slot(key);

        if let Some(rules) = slot.get() {
            debug!("Serving compiled rule set from cache for key: {}", key);
            return Ok(Arc::clone(rules));
        }

        let rules = slot.get_or_try_init(|| {
            debug!("Compiled rule set not found in cache. Compiling now for key: {}", key);
            self.compilations.fetch_add(1, Ordering::Relaxed);
            compile_rule_set(expressions).map(Arc::new)
        })?;

        Ok(Arc::clone(rules))
    }

    /// Same as [`get_or_build`](Self::get_or_build), keyed by the expressions' fingerprint.
    pub fn get_or_build_for<S: AsRef<str>>(
        &self,
        expressions: &[S],
    ) -> Result<Arc<RuleSet>, FieldMaskError> {
        self.get_or_build(&RuleSetKey::from_expressions(expressions), expressions)
    }

    /// Returns the rule set stored under `key`, if it has been built.
    pub fn get(&self, key: &RuleSetKey) -> Option<Arc<RuleSet>> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, key: &RuleSetKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of rule sets built and stored.
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times this cache has run the compiler, successful or not.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    fn slot(&self, key: &RuleSetKey) -> Slot {
        // Attempt to find the slot under a read lock first.
        {
            let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        } // Read lock is released here.

        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}
