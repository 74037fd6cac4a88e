//! Import accounting for one generation unit.
//!
//! An [`ImportTable`] maps fully-qualified type names to the short names
//! emitted in a single output file. Both directions are unique: no two full
//! names share a short name, and a full name is registered at most once.
//! Collisions never fail; the colliding type is emitted fully qualified.

// Internal imports (std, crate)
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

/// Host-language knowledge about names that are available without an import.
pub trait ImplicitImports: Send + Sync {
    /// Whether the fully-qualified type itself needs no import (e.g. `java.lang.String`)
    fn is_implicit_type(&self, full_name: &str) -> bool;

    /// Whether a simple name already denotes a built-in of the host language
    fn is_implicit_name(&self, simple_name: &str) -> bool;
}

/// Process-wide, read-through memo of "is this simple name a built-in" lookups.
///
/// Entries are idempotent and never removed, so concurrent readers and
/// writers only ever observe the same answer for a given name.
pub struct ImplicitNames {
    lookup: Box<dyn Fn(&str) -> bool + Send + Sync>,
    cache: RwLock<HashMap<String, bool>>,
}

impl ImplicitNames {
    pub fn new(lookup: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Memoizing lookup over a fixed table of built-in names
    pub fn from_table(names: &'static [&'static str]) -> Self {
        let table: HashSet<&'static str> = names.iter().copied().collect();
        Self::new(move |name| table.contains(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        if let Some(&known) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return known;
        }

        let known = (self.lookup)(name);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), known);
        known
    }

    /// Number of memoized names
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for ImplicitNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplicitNames")
            .field("cached", &self.cached_len())
            .finish()
    }
}

/// Bidirectional full-name/short-name registry for one output unit.
#[derive(Debug, Default, Clone)]
pub struct ImportTable {
    by_full_name: HashMap<String, String>,
    by_short_name: HashMap<String, String>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `full_name` to the name to emit, registering an import when possible.
    ///
    /// Returns the short name if it is (or can become) this unit's binding for
    /// `full_name`; returns `full_name` unchanged when the short name is taken
    /// by another type or shadows a host-language built-in.
    pub fn minimally_qualified(
        &mut self,
        full_name: &str,
        short_name: &str,
        host: &dyn ImplicitImports,
    ) -> String {
        if let Some(short) = self.by_full_name.get(full_name) {
            return short.clone();
        }
        if self.by_short_name.contains_key(short_name)
            || (!host.is_implicit_type(full_name) && host.is_implicit_name(short_name))
        {
            return full_name.to_string();
        }
        self.by_full_name
            .insert(full_name.to_string(), short_name.to_string());
        self.by_short_name
            .insert(short_name.to_string(), full_name.to_string());
        short_name.to_string()
    }

    pub fn clear(&mut self) {
        self.by_full_name.clear();
        self.by_short_name.clear();
    }

    /// Registered full names minus the excluded ones, sorted lexicographically
    pub fn cleaned_imports(&self, exclude: impl Fn(&str) -> bool) -> Vec<String> {
        let mut imports: Vec<String> = self
            .by_full_name
            .keys()
            .filter(|name| !exclude(name.as_str()))
            .cloned()
            .collect();
        imports.sort();
        imports
    }
}
