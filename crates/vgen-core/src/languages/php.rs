//! PHP binding: type table and naming policy.

// Internal imports (std, crate)
use std::sync::Arc;

use crate::imports::{ImplicitImports, ImplicitNames, ImportTable};
use crate::method_config::MethodConfig;
use crate::model::{is_empty_type, Field, Interface, Method, Model, ProtoFile, TypeKind, TypeRef};
use crate::naming::{block_comment_doc_lines, Name, SurfaceNamer};
use crate::types::{in_namespace, simple_name, ElementName, ModelTypeTable};
use crate::Error;

// External imports (alphabetized)
use once_cell::sync::Lazy;

const PAGED_LIST_RESPONSE_TYPE: &str = "Google\\GAX\\PagedListResponse";

/// Reserved words and built-in classes that cannot be used, or would be
/// shadowed, as imported class names. PHP compares them case-insensitively.
const PHP_RESERVED_NAMES: &[&str] = &[
    "array", "bool", "callable", "false", "float", "int", "iterable", "list", "mixed", "never",
    "null", "object", "parent", "resource", "self", "static", "string", "true", "void",
    "ArrayAccess", "ArrayIterator", "ArrayObject", "Closure", "Countable", "DateInterval",
    "DateTime", "DateTimeImmutable", "DateTimeInterface", "DateTimeZone", "Error", "Exception",
    "Generator", "InvalidArgumentException", "Iterator", "IteratorAggregate", "JsonSerializable",
    "LogicException", "RuntimeException", "Serializable", "SplObjectStorage", "Stringable",
    "Throwable", "Traversable", "stdClass",
];

static PHP_IMPLICIT_NAMES: Lazy<ImplicitNames> = Lazy::new(|| {
    ImplicitNames::new(|name| {
        PHP_RESERVED_NAMES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(name))
    })
});

#[derive(Debug, Clone, Copy)]
struct PhpImplicitImports;

impl ImplicitImports for PhpImplicitImports {
    /// Un-namespaced names live in the global namespace
    fn is_implicit_type(&self, full_name: &str) -> bool {
        !full_name.contains('\\')
    }

    fn is_implicit_name(&self, simple_name: &str) -> bool {
        PHP_IMPLICIT_NAMES.contains(simple_name)
    }
}

/// Gets the PHP namespace for the given proto file: the namespace option, or
/// each package segment in upper camel case.
pub fn php_namespace(file: &ProtoFile) -> String {
    match file.options.php_namespace.as_deref() {
        Some(namespace) if !namespace.is_empty() => namespace.to_string(),
        _ => file
            .full_name()
            .split('.')
            .map(|segment| Name::from_identifier(segment).to_upper_camel())
            .collect::<Vec<_>>()
            .join("\\"),
    }
}

fn primitive_type_name(kind: TypeKind) -> Option<&'static str> {
    match kind {
        TypeKind::Bool => Some("bool"),
        TypeKind::Double | TypeKind::Float => Some("float"),
        TypeKind::Int64
        | TypeKind::Uint64
        | TypeKind::Sint64
        | TypeKind::Fixed64
        | TypeKind::Sfixed64
        | TypeKind::Int32
        | TypeKind::Uint32
        | TypeKind::Sint32
        | TypeKind::Fixed32
        | TypeKind::Sfixed32 => Some("int"),
        // enum values are plain integers in PHP
        TypeKind::Enum => Some("int"),
        TypeKind::String | TypeKind::Bytes => Some("string"),
        TypeKind::Message | TypeKind::Group => None,
    }
}

#[derive(Debug)]
pub struct PhpTypeTable {
    model: Arc<Model>,
    imports: ImportTable,
}

impl PhpTypeTable {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            imports: ImportTable::new(),
        }
    }

    /// Full PHP class name of a message: the file's namespace, then the
    /// proto-relative name with nesting flattened by underscores.
    pub fn element_name(&self, full_proto_name: &str) -> crate::Result<ElementName> {
        let (file, message) = self
            .model
            .lookup_message(full_proto_name)
            .ok_or_else(|| Error::model(format!("Type '{}' not found", full_proto_name)))?;
        let short_name = message.name.replace('.', "_");
        Ok(ElementName {
            full_name: format!("{}\\{}", php_namespace(file), short_name),
            short_name,
        })
    }

    fn basic_type_name(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if let Some(primitive) = primitive_type_name(type_ref.kind) {
            return Ok(primitive.to_string());
        }
        match type_ref.kind {
            TypeKind::Message => {
                let proto_name = type_ref
                    .type_name
                    .as_deref()
                    .ok_or_else(|| Error::model("message type without a type name"))?;
                let element = self.element_name(proto_name)?;
                Ok(self.resolve(&element.full_name, &element.short_name))
            }
            other => Err(Error::model(format!("unknown type kind: {}", other))),
        }
    }

    /// Import keys carry no leading `\`; a name that falls back to full
    /// qualification is emitted from the global namespace.
    fn resolve(&mut self, full_name: &str, short_name: &str) -> String {
        let resolved = self
            .imports
            .minimally_qualified(full_name, short_name, &PhpImplicitImports);
        if resolved != short_name && resolved == full_name {
            format!("\\{}", resolved)
        } else {
            resolved
        }
    }
}

impl ModelTypeTable for PhpTypeTable {
    fn nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if type_ref.is_repeated() {
            return Ok("array".to_string());
        }
        self.basic_type_name(type_ref)
    }

    fn element_nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if let Some(entry) = type_ref.map_entry.as_deref().filter(|_| type_ref.is_map()) {
            return self.basic_type_name(&entry.value);
        }
        self.basic_type_name(type_ref)
    }

    fn zero_value_and_save_nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if type_ref.is_repeated() {
            return Ok("[]".to_string());
        }
        let zero = match type_ref.kind {
            TypeKind::Bool => "false".to_string(),
            TypeKind::Double | TypeKind::Float => "0.0".to_string(),
            TypeKind::String | TypeKind::Bytes => "\"\"".to_string(),
            TypeKind::Message => format!("new {}()", self.basic_type_name(type_ref)?),
            TypeKind::Group => return Err(Error::model("unknown type kind: group")),
            _ => "0".to_string(),
        };
        Ok(zero)
    }

    fn save_nickname_for_full_name(&mut self, full_name: &str) -> String {
        let full_name = full_name.trim_start_matches('\\');
        let short_name = simple_name(full_name, '\\');
        self.resolve(full_name, short_name)
    }

    fn default_token_value(&mut self, field: &Field) -> crate::Result<String> {
        match field.type_ref.kind {
            // PHP byte sequences are strings too
            TypeKind::String | TypeKind::Bytes => Ok("\"\"".to_string()),
            kind => Err(Error::UnsupportedFieldType {
                field: self.model.field_full_name(field),
                kind,
            }),
        }
    }

    fn import_list(&self, namespace: &str) -> Vec<String> {
        self.imports.cleaned_imports(|imported| {
            in_namespace(imported, namespace, '\\') || PhpImplicitImports.is_implicit_type(imported)
        })
    }

    fn reset(&mut self) {
        self.imports.clear();
    }
}

/// Naming policy for PHP surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpSurfaceNamer;

impl SurfaceNamer for PhpSurfaceNamer {
    fn var_name(&self, name: &Name) -> String {
        name.to_lower_camel()
    }

    fn var_reference(&self, name: &Name) -> String {
        format!("${}", self.var_name(name))
    }

    fn api_wrapper_class_name(&self, service: &Interface) -> String {
        Name::from_identifier(&service.name)
            .join(&Name::from_words(&["api"]))
            .to_upper_camel()
    }

    fn api_method_name(&self, method: &Method) -> String {
        Name::from_identifier(&method.name).to_lower_camel()
    }

    fn method_key(&self, method: &Method) -> String {
        method.name.clone()
    }

    fn grpc_method_name(&self, method: &Method) -> String {
        method.name.clone()
    }

    fn doc_lines(&self, text: &str) -> Vec<String> {
        block_comment_doc_lines(text)
    }

    fn optional_array_type_name(&self) -> String {
        "array".to_string()
    }

    fn retry_settings_type_name(&self) -> String {
        "\\Google\\GAX\\RetrySettings".to_string()
    }

    fn dynamic_return_type_name(
        &self,
        types: &mut dyn ModelTypeTable,
        method: &Method,
        config: &MethodConfig,
    ) -> crate::Result<String> {
        if is_empty_type(&method.output_type) {
            return Ok("void".to_string());
        }
        if config.is_page_streaming() {
            return Ok(types.save_nickname_for_full_name(PAGED_LIST_RESPONSE_TYPE));
        }
        types.nickname_for(&TypeRef::message(method.output_type.as_str()))
    }

    /// Map fields are passed to the request as plain arrays
    fn should_import_request_object_param_type(&self, field: &Field) -> bool {
        !field.type_ref.is_map()
    }

    fn set_function_call_name(&self, _type_ref: &TypeRef, name: &Name) -> String {
        format!("set{}", name.to_upper_camel())
    }
}
