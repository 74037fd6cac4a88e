//! Per-unit type resolution.
//!
//! A [`ModelTypeTable`] turns model type references into names that are safe
//! to emit in one output file of a target language, recording the imports
//! that this requires in an [`ImportTable`](crate::imports::ImportTable).
//! One table is created per generation unit and never shared.

use crate::model::{Field, TypeRef};

pub trait ModelTypeTable: Send {
    /// Emission-safe name for a type, with list/map wrapping for repeated types
    fn nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String>;

    /// Emission-safe name of the element type (map value for maps), boxed where
    /// the language distinguishes primitive and object types
    fn element_nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String>;

    /// Zero-value expression for the type, registering the names it uses
    fn zero_value_and_save_nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String>;

    /// Register a fully-qualified language name and return the name to emit
    fn save_nickname_for_full_name(&mut self, full_name: &str) -> String;

    /// Default token literal for a string or bytes field.
    ///
    /// Fails with [`Error::UnsupportedFieldType`](crate::Error::UnsupportedFieldType)
    /// for any other kind.
    fn default_token_value(&mut self, field: &Field) -> crate::Result<String>;

    /// Sorted imports of the unit, minus names in `namespace` and implicit names
    fn import_list(&self, namespace: &str) -> Vec<String>;

    /// Forget every import, ready for a new unit
    fn reset(&mut self);
}

/// Trailing segment of a `sep`-separated full name.
pub(crate) fn simple_name(full_name: &str, sep: char) -> &str {
    full_name.rsplit(sep).next().unwrap_or(full_name)
}

/// True if `full_name` sits directly inside `namespace` (not in a sub-namespace).
pub(crate) fn in_namespace(full_name: &str, namespace: &str, sep: char) -> bool {
    full_name
        .strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix(sep))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains(sep))
}

/// Full language name and package-relative proto name of a message or enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementName {
    pub full_name: String,
    pub short_name: String,
}
