//! Semantic model of an annotated API.
//!
//! The model is produced by an upstream IDL front end and handed to the
//! generator in serialized form (JSON or YAML). It is read-only once loaded:
//! every accessor here borrows from it and nothing in the generation core
//! mutates it.
//!
//! # Examples
//!
//! ```no_run
//! use vgen_core::model::Model;
//! use vgen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let model = Model::from_file("library.model.json").await?;
//! for (file, iface) in model.api_interfaces()? {
//!     println!("{} in {}", iface.name, file.name);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::Path;

use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Deserializer, Serialize};
use serde_value::Value as SerdeValue;
use tokio::fs;

/// Full name of the message that stands for "no value".
pub const EMPTY_TYPE_NAME: &str = "google.protobuf.Empty";

/// Returns true if `full_name` is the designated empty/void message.
pub fn is_empty_type(full_name: &str) -> bool {
    full_name == EMPTY_TYPE_NAME
}

/// Root of the semantic model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Service configuration (which interfaces make up the API)
    #[serde(default)]
    pub service_config: ServiceConfig,
    /// Every file of the model, dependencies included
    #[serde(default)]
    pub files: Vec<ProtoFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub apis: Vec<Api>,
}

/// One API entry of the service config, naming an interface by full name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub name: String,
}

/// A single IDL file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Path of the file, e.g. "google/example/library/v1/library.proto"
    pub name: String,
    /// Package of the file; this is also the file's full name
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub options: FileOptions,
    #[serde(default)]
    pub messages: Vec<MessageType>,
    #[serde(default)]
    pub enums: Vec<EnumType>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

impl ProtoFile {
    /// Full name of the file (its package)
    pub fn full_name(&self) -> &str {
        &self.package
    }

    /// Base name of the file without directories or extension
    pub fn base_name(&self) -> &str {
        let file = self.name.rsplit('/').next().unwrap_or(&self.name);
        match file.rfind('.') {
            Some(idx) if idx > 0 => &file[..idx],
            _ => file,
        }
    }

    /// Qualify a package-relative element name
    pub fn qualify(&self, name: &str) -> String {
        if self.package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.package, name)
        }
    }

    fn owns(&self, relative: &str, full_name: &str) -> bool {
        if self.package.is_empty() {
            return relative == full_name;
        }
        full_name
            .strip_prefix(self.package.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            == Some(relative)
    }
}

/// Language options carried on a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileOptions {
    #[serde(default)]
    pub java_package: Option<String>,
    #[serde(default)]
    pub java_multiple_files: bool,
    #[serde(default)]
    pub java_outer_classname: Option<String>,
    #[serde(default)]
    pub php_namespace: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageType {
    /// Package-relative name; nested messages use dots ("Outer.Inner")
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl MessageType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Last segment of the (possibly nested) name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// A service interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: ServiceOptions,
    #[serde(default)]
    pub methods: Vec<Method>,
}

/// Service-level annotation extensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOptions {
    #[serde(default)]
    pub default_host: Option<String>,
    #[serde(default)]
    pub oauth_scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Full name of the request message
    pub input_type: String,
    /// Full name of the response message
    pub output_type: String,
    #[serde(default)]
    pub options: MethodOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodOptions {
    #[serde(default)]
    pub http: Option<HttpRule>,
    #[serde(default)]
    pub method_signatures: Vec<MethodSignature>,
    #[serde(default)]
    pub long_running: Option<LongRunningOperation>,
}

/// HTTP binding of a method. At most one verb is expected to be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpRule {
    #[serde(default)]
    pub get: Option<String>,
    #[serde(default)]
    pub put: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
    #[serde(default)]
    pub delete: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// One flattening of a method: the request fields exposed as direct parameters.
///
/// Accepts either a comma-separated string (`"name,view"`) or a list of
/// field names when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MethodSignature {
    pub fields: Vec<String>,
}

impl<'de> Deserialize<'de> for MethodSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = SerdeValue::deserialize(deserializer)?;

        match value {
            SerdeValue::String(s) => Ok(Self {
                fields: s
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect(),
            }),
            SerdeValue::Seq(seq) => {
                let mut fields = Vec::new();
                for item in seq {
                    if let SerdeValue::String(s) = item {
                        fields.push(s);
                    } else {
                        return Err(serde::de::Error::custom(
                            "Expected a field name in method signature",
                        ));
                    }
                }
                Ok(Self { fields })
            }
            _ => Err(serde::de::Error::custom(
                "Expected string or array of field names",
            )),
        }
    }
}

/// Long-running operation annotation of a method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongRunningOperation {
    /// Full name of the eventual response message
    pub response_type: String,
    /// Full name of the progress metadata message
    pub metadata_type: String,
    #[serde(default)]
    pub polling: Option<PollingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    pub initial_poll_delay_millis: u64,
    pub poll_delay_multiplier: f64,
    pub max_poll_delay_millis: u64,
    pub total_poll_timeout_millis: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub options: FieldOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(default)]
    pub field_behavior: Vec<FieldBehavior>,
    #[serde(default)]
    pub resource: Option<Resource>,
    #[serde(default)]
    pub resource_reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldBehavior {
    Optional,
    Required,
    OutputOnly,
    InputOnly,
    Immutable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Path pattern, e.g. "shelves/*"
    pub path: String,
}

/// Kind of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Int32 => "int32",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Group => "group",
            Self::Message => "message",
            Self::Bytes => "bytes",
            Self::Uint32 => "uint32",
            Self::Enum => "enum",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Optional,
    Required,
    Repeated,
}

/// Reference to a field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Full name of the message or enum for `message`/`enum` kinds
    #[serde(default)]
    pub type_name: Option<String>,
    /// Key and value types when this is a map field
    #[serde(default)]
    pub map_entry: Option<Box<MapEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: TypeRef,
    pub value: TypeRef,
}

impl TypeRef {
    /// A singular type of the given primitive kind
    pub fn of(kind: TypeKind) -> Self {
        Self {
            kind,
            cardinality: Cardinality::Optional,
            type_name: None,
            map_entry: None,
        }
    }

    pub fn message(full_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(full_name.into()),
            ..Self::of(TypeKind::Message)
        }
    }

    pub fn enumeration(full_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(full_name.into()),
            ..Self::of(TypeKind::Enum)
        }
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self {
            kind: TypeKind::Message,
            cardinality: Cardinality::Repeated,
            type_name: None,
            map_entry: Some(Box::new(MapEntry { key, value })),
        }
    }

    pub fn make_repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    pub fn is_map(&self) -> bool {
        self.is_repeated() && self.map_entry.is_some()
    }
}

impl Model {
    /// Load a model from a file (supports both JSON and YAML)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            Error::model(format!(
                "Failed to parse model at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> Result<Self, String> {
        let json_err = match serde_json::from_str(content) {
            Ok(model) => return Ok(model),
            Err(e) => e,
        };

        serde_yaml::from_str(content)
            .map_err(|yaml_err| format!("not a JSON ({json_err}) or YAML ({yaml_err}) model"))
    }

    /// Look up an interface by full name, together with its defining file
    pub fn lookup_interface(&self, full_name: &str) -> Option<(&ProtoFile, &Interface)> {
        self.files.iter().find_map(|file| {
            file.interfaces
                .iter()
                .find(|iface| file.owns(&iface.name, full_name))
                .map(|iface| (file, iface))
        })
    }

    /// Look up a message by full name, together with its defining file
    pub fn lookup_message(&self, full_name: &str) -> Option<(&ProtoFile, &MessageType)> {
        self.files.iter().find_map(|file| {
            file.messages
                .iter()
                .find(|msg| file.owns(&msg.name, full_name))
                .map(|msg| (file, msg))
        })
    }

    /// Look up an enum by full name, together with its defining file
    pub fn lookup_enum(&self, full_name: &str) -> Option<(&ProtoFile, &EnumType)> {
        self.files.iter().find_map(|file| {
            file.enums
                .iter()
                .find(|e| file.owns(&e.name, full_name))
                .map(|e| (file, e))
        })
    }

    /// Full name of a field of this model, e.g. `google.example.Book.title`.
    ///
    /// Fields that do not belong to any message of the model keep their bare name.
    pub fn field_full_name(&self, field: &Field) -> String {
        self.files
            .iter()
            .flat_map(|file| file.messages.iter().map(move |msg| (file, msg)))
            .find(|(_, msg)| msg.fields.iter().any(|f| std::ptr::eq(f, field)))
            .map(|(file, msg)| format!("{}.{}", file.qualify(&msg.name), field.name))
            .unwrap_or_else(|| field.name.clone())
    }

    /// The request message of a method
    pub fn input_message(&self, method: &Method) -> crate::Result<&MessageType> {
        self.lookup_message(&method.input_type)
            .map(|(_, msg)| msg)
            .ok_or_else(|| {
                Error::model(format!(
                    "Input type '{}' of method '{}' not found",
                    method.input_type, method.name
                ))
            })
    }

    /// Resolve every API entry of the service config to its interface, in config order
    pub fn api_interfaces(&self) -> crate::Result<Vec<(&ProtoFile, &Interface)>> {
        self.service_config
            .apis
            .iter()
            .map(|api| {
                self.lookup_interface(&api.name).ok_or_else(|| {
                    Error::model(format!("API interface '{}' not found", api.name))
                })
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::library_model;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lookup_by_full_name() {
        let model = library_model();
        let (file, iface) = model
            .lookup_interface("google.example.library.v1.LibraryService")
            .unwrap();
        assert_eq!(file.package, "google.example.library.v1");
        assert_eq!(iface.methods.len(), 3);

        assert!(model.lookup_message("google.example.library.v1.Book").is_some());
        assert!(model.lookup_message("google.example.library.Book").is_none());
        assert!(model.lookup_message("Book").is_none());
        assert!(model.lookup_enum("google.example.library.v1.BookView").is_some());
    }

    #[test]
    fn test_method_signature_string_or_list() {
        let model = library_model();
        let (_, iface) = model
            .lookup_interface("google.example.library.v1.LibraryService")
            .unwrap();
        let sigs = &iface.methods[0].options.method_signatures;
        assert_eq!(sigs[0].fields, vec!["name".to_string()]);
        assert_eq!(
            sigs[1].fields,
            vec!["name".to_string(), "view_type".to_string()]
        );

        let sig: MethodSignature = serde_json::from_str(r#""parent, page_size""#).unwrap();
        assert_eq!(sig.fields, vec!["parent".to_string(), "page_size".to_string()]);
        assert!(serde_json::from_str::<MethodSignature>("42").is_err());
    }

    #[test]
    fn test_type_ref_cardinality() {
        let map = TypeRef::map(TypeRef::of(TypeKind::String), TypeRef::of(TypeKind::Int32));
        assert!(map.is_map());
        assert!(map.is_repeated());

        let list = TypeRef::of(TypeKind::String).make_repeated();
        assert!(list.is_repeated());
        assert!(!list.is_map());
    }

    #[test]
    fn test_field_full_name() {
        let model = library_model();
        let (_, request) = model
            .lookup_message("google.example.library.v1.ListBooksRequest")
            .unwrap();
        let page_size = request.field("page_size").unwrap();
        assert_eq!(
            model.field_full_name(page_size),
            "google.example.library.v1.ListBooksRequest.page_size"
        );

        let detached = page_size.clone();
        assert_eq!(model.field_full_name(&detached), "page_size");
    }

    #[test]
    fn test_base_name() {
        let file = ProtoFile {
            name: "google/example/library/v1/library_service.proto".to_string(),
            ..Default::default()
        };
        assert_eq!(file.base_name(), "library_service");
    }

    #[test]
    fn test_unknown_api_interface() {
        let mut model = library_model();
        model.service_config.apis.push(Api {
            name: "google.example.Missing".to_string(),
        });
        assert!(matches!(model.api_interfaces(), Err(Error::Model(_))));
    }

    #[tokio::test]
    async fn test_from_file_yaml() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("model.yaml");
        let yaml = r#"
service_config:
  apis:
    - name: example.Echo
files:
  - name: echo.proto
    package: example
    interfaces:
      - name: Echo
        methods:
          - name: Ping
            input_type: example.PingRequest
            output_type: google.protobuf.Empty
"#;
        tokio::fs::write(&path, yaml).await?;

        let model = Model::from_file(&path).await?;
        let units = model.api_interfaces()?;
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].1.methods[0].name, "Ping");
        Ok(())
    }
}
