//! Target language definitions for vgen.
//!
//! This module defines the supported target languages and the factory that
//! hands out each language's naming policy and a fresh type table. The
//! language-neutral builder only ever talks to these through the
//! [`SurfaceNamer`] and [`ModelTypeTable`] traits.
//!
//! # Examples
//!
//! ```
//! use vgen_core::languages::TargetLanguage;
//! use std::str::FromStr;
//!
//! let language = TargetLanguage::from_str("php").unwrap();
//! assert_eq!(language, TargetLanguage::Php);
//! assert_eq!(language.to_string(), "php");
//!
//! // The default language is Java
//! assert_eq!(TargetLanguage::default(), TargetLanguage::Java);
//! ```

pub mod java;
pub mod php;

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::model::{Model, ProtoFile};
use crate::naming::SurfaceNamer;
use crate::types::ModelTypeTable;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Supported target languages
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Java,
    Php,
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(TargetLanguage::Java),
            "php" => Ok(TargetLanguage::Php),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// Returns the language identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Php => "php",
        }
    }

    /// Returns an iterator over all supported languages
    pub fn all() -> impl Iterator<Item = Self> {
        use TargetLanguage::*;
        [Java, Php].iter().copied()
    }

    pub fn namer(&self) -> Box<dyn SurfaceNamer> {
        match self {
            Self::Java => Box::new(java::JavaSurfaceNamer),
            Self::Php => Box::new(php::PhpSurfaceNamer),
        }
    }

    /// A fresh type table for one generation unit
    pub fn type_table(&self, model: Arc<Model>) -> Box<dyn ModelTypeTable> {
        match self {
            Self::Java => Box::new(java::JavaTypeTable::new(model)),
            Self::Php => Box::new(php::PhpTypeTable::new(model)),
        }
    }

    /// Package or namespace the unit generated for `file` lives in
    pub fn namespace(&self, file: &ProtoFile) -> String {
        match self {
            Self::Java => java::java_package(file),
            Self::Php => php::php_namespace(file),
        }
    }

    /// Output directory, relative to the language root, for a namespace
    pub fn output_path(&self, namespace: &str) -> String {
        match self {
            Self::Java => namespace.replace('.', "/"),
            Self::Php => namespace.replace('\\', "/"),
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Php => "php",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
