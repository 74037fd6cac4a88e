//! Externally supplied per-interface, per-method generation configuration.
//!
//! The API config names, for each method, which request fields are required
//! and which are optional, plus page streaming fields. It can be written in
//! YAML, JSON or TOML:
//!
//! ```yaml
//! interfaces:
//!   - name: google.example.library.v1.LibraryService
//!     methods:
//!       - name: ListBooks
//!         required_fields: [parent]
//!         optional_fields: [page_size]
//!         page_streaming:
//!           request_token_field: page_token
//!           page_size_field: page_size
//!           response_token_field: next_page_token
//!           resources_field: books
//! ```
//!
//! Methods without an entry fall back to the field-behavior annotations.

// Internal imports (std, crate)
use std::collections::HashSet;
use std::path::Path;

use crate::method_config::{MethodConfig, PageStreamingConfig};
use crate::model::{Field, MessageType, Method, Model};
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Full name of the interface
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodConfigEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodConfigEntry {
    pub name: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub optional_fields: Vec<String>,
    #[serde(default)]
    pub page_streaming: Option<PageStreamingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageStreamingEntry {
    pub request_token_field: String,
    #[serde(default)]
    pub page_size_field: Option<String>,
    pub response_token_field: String,
    #[serde(default)]
    pub resources_field: Option<String>,
}

impl ApiConfig {
    /// Load an API config, choosing the format from the file extension
    /// (`.json`, `.toml`, anything else is read as YAML)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    pub fn interface(&self, full_name: &str) -> Option<&InterfaceConfig> {
        self.interfaces.iter().find(|i| i.name == full_name)
    }

    pub fn method_entry(&self, interface: &str, method: &str) -> Option<&MethodConfigEntry> {
        self.interface(interface)?
            .methods
            .iter()
            .find(|m| m.name == method)
    }

    /// Resolve and validate the configuration of one method.
    ///
    /// Fields named by the entry must exist on the request (or, for the
    /// response token and resources fields, the response) message, and the
    /// required and optional sets must not overlap. Methods without an entry
    /// get [`MethodConfig::from_annotations`].
    pub fn method_config(
        &self,
        model: &Model,
        interface: &str,
        method: &Method,
    ) -> crate::Result<MethodConfig> {
        let Some(entry) = self.method_entry(interface, &method.name) else {
            log::debug!(
                "No configuration for {}.{}, deriving from annotations",
                interface,
                method.name
            );
            return MethodConfig::from_annotations(model, method);
        };

        let overlap: Vec<&str> = {
            let required: HashSet<&str> =
                entry.required_fields.iter().map(String::as_str).collect();
            entry
                .optional_fields
                .iter()
                .map(String::as_str)
                .filter(|f| required.contains(f))
                .collect()
        };
        if !overlap.is_empty() {
            return Err(Error::config(format!(
                "Method {}.{} lists fields as both required and optional: {}",
                interface,
                method.name,
                overlap.join(", ")
            )));
        }

        let input = model.input_message(method)?;
        let required = resolve_fields(input, &entry.required_fields, method)?;
        let optional = resolve_fields(input, &entry.optional_fields, method)?;

        let page_streaming = match &entry.page_streaming {
            Some(paging) => {
                let (_, output) = model.lookup_message(&method.output_type).ok_or_else(|| {
                    Error::model(format!(
                        "Output type '{}' of method '{}' not found",
                        method.output_type, method.name
                    ))
                })?;
                Some(PageStreamingConfig {
                    request_token_field: resolve_field(input, &paging.request_token_field, method)?,
                    response_token_field: resolve_field(
                        output,
                        &paging.response_token_field,
                        method,
                    )?,
                    page_size_field: paging
                        .page_size_field
                        .as_deref()
                        .map(|f| resolve_field(input, f, method))
                        .transpose()?,
                    resources_field: paging
                        .resources_field
                        .as_deref()
                        .map(|f| resolve_field(output, f, method))
                        .transpose()?,
                })
            }
            None => None,
        };

        Ok(MethodConfig::new(required, optional, page_streaming))
    }
}

fn resolve_fields(
    message: &MessageType,
    names: &[String],
    method: &Method,
) -> crate::Result<Vec<Field>> {
    names
        .iter()
        .map(|name| resolve_field(message, name, method))
        .collect()
}

fn resolve_field(message: &MessageType, name: &str, method: &Method) -> crate::Result<Field> {
    message.field(name).cloned().ok_or_else(|| {
        Error::config(format!(
            "Field '{}' configured for method '{}' does not exist on {}",
            name, method.name, message.name
        ))
    })
}
