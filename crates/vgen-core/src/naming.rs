//! Identifier casing and the per-language naming policy.

use crate::method_config::MethodConfig;
use crate::model::{Field, Interface, Method, TypeRef};
use crate::types::ModelTypeTable;

/// A language-neutral identifier, stored as lower-case words.
///
/// ```
/// use vgen_core::naming::Name;
///
/// let name = Name::from_words(&["optional", "args"]);
/// assert_eq!(name.to_lower_camel(), "optionalArgs");
/// assert_eq!(Name::from_identifier("viewType").to_lower_underscore(), "view_type");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    words: Vec<String>,
}

impl Name {
    pub fn from_words(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Split an identifier in any common casing (snake, kebab, camel, spaced) into words
    pub fn from_identifier(s: &str) -> Self {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut prev_is_lowercase = false;

        for ch in s.chars() {
            if ch.is_uppercase() {
                if prev_is_lowercase && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                current.extend(ch.to_lowercase());
                prev_is_lowercase = false;
            } else if ch.is_alphanumeric() {
                current.push(ch);
                prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
            } else {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                prev_is_lowercase = false;
            }
        }
        if !current.is_empty() {
            words.push(current);
        }

        Self { words }
    }

    pub fn to_lower_underscore(&self) -> String {
        self.words.join("_")
    }

    pub fn to_upper_underscore(&self) -> String {
        self.to_lower_underscore().to_uppercase()
    }

    pub fn to_upper_camel(&self) -> String {
        self.words.iter().map(|w| capitalize(w)).collect()
    }

    pub fn to_lower_camel(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i == 0 {
                out.push_str(word);
            } else {
                out.push_str(&capitalize(word));
            }
        }
        out
    }

    /// A new name with `other`'s words appended
    pub fn join(&self, other: &Name) -> Name {
        let mut words = self.words.clone();
        words.extend(other.words.iter().cloned());
        Name { words }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Naming and doc-formatting capability of one target language.
pub trait SurfaceNamer: Send + Sync {
    /// Name of a local variable or parameter
    fn var_name(&self, name: &Name) -> String;

    /// How a parameter is referenced from inside doc text
    fn var_reference(&self, name: &Name) -> String;

    fn variable_name(&self, field: &Field) -> String {
        self.var_name(&Name::from_identifier(&field.name))
    }

    fn api_wrapper_class_name(&self, service: &Interface) -> String;

    fn api_wrapper_variable_name(&self, service: &Interface) -> String {
        self.var_name(&Name::from_identifier(
            &self.api_wrapper_class_name(service),
        ))
    }

    fn api_method_name(&self, method: &Method) -> String;

    fn method_key(&self, method: &Method) -> String;

    /// Wire-level name of the method
    fn grpc_method_name(&self, method: &Method) -> String;

    /// Split doc text into lines made safe for the language's doc comments.
    /// Always returns at least one line.
    fn doc_lines(&self, text: &str) -> Vec<String>;

    fn element_doc_lines(&self, description: Option<&str>) -> Vec<String> {
        self.doc_lines(description.unwrap_or_default())
    }

    /// Type name documented for the optional-args and call-settings bags
    fn optional_array_type_name(&self) -> String;

    fn retry_settings_type_name(&self) -> String;

    /// Return type documented for a method under the given configuration
    fn dynamic_return_type_name(
        &self,
        types: &mut dyn ModelTypeTable,
        method: &Method,
        config: &MethodConfig,
    ) -> crate::Result<String>;

    /// Whether a request-object field type can be resolved and imported as-is
    fn should_import_request_object_param_type(&self, _field: &Field) -> bool {
        true
    }

    fn not_implemented_string(&self, feature: &str) -> String {
        format!("$ NOT IMPLEMENTED: {} $", feature)
    }

    /// Name of the request-builder call that sets a field of the given type
    fn set_function_call_name(&self, type_ref: &TypeRef, name: &Name) -> String;
}

/// Split text on newlines, escaping the block-comment terminator.
pub(crate) fn block_comment_doc_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').replace("*/", "&ast;/"))
        .collect()
}
