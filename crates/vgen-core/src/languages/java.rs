//! Java binding: type table and naming policy.

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
use regex::Regex;

/// The package prefix protoc uses if no java package option was provided.
const DEFAULT_JAVA_PACKAGE_PREFIX: &str = "com.google.protos";

const BYTE_STRING_TYPE: &str = "com.google.protobuf.ByteString";
const PAGED_LIST_RESPONSE_TYPE: &str = "com.google.api.gax.paging.PagedListResponse";

/// Matches types from java.lang. Assumes well-formed qualified type names.
static JAVA_LANG_TYPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^java[.]lang[.][^.]+$").expect("java.lang pattern is valid"));

/// Public classes and interfaces of java.lang, visible in every compilation unit.
const JAVA_LANG_NAMES: &[&str] = &[
    "AbstractMethodError", "Appendable", "ArithmeticException", "ArrayIndexOutOfBoundsException",
    "ArrayStoreException", "AssertionError", "AutoCloseable", "Boolean", "Byte", "CharSequence",
    "Character", "Class", "ClassCastException", "ClassLoader", "ClassNotFoundException",
    "CloneNotSupportedException", "Cloneable", "Comparable", "Compiler", "Deprecated", "Double",
    "Enum", "Error", "Exception", "ExceptionInInitializerError", "Float", "FunctionalInterface",
    "IllegalAccessException", "IllegalArgumentException", "IllegalStateException",
    "IndexOutOfBoundsException", "InheritableThreadLocal", "InstantiationException", "Integer",
    "InternalError", "InterruptedException", "Iterable", "LinkageError", "Long", "Math",
    "NegativeArraySizeException", "NoClassDefFoundError", "NoSuchFieldException",
    "NoSuchMethodException", "NullPointerException", "Number", "NumberFormatException", "Object",
    "OutOfMemoryError", "Override", "Package", "Process", "ProcessBuilder", "Readable", "Record",
    "Runnable", "Runtime", "RuntimeException", "SafeVarargs", "SecurityException",
    "SecurityManager", "Short", "StackOverflowError", "StackTraceElement", "StrictMath", "String",
    "StringBuffer", "StringBuilder", "StringIndexOutOfBoundsException", "SuppressWarnings",
    "System", "Thread", "ThreadDeath", "ThreadGroup", "ThreadLocal", "Throwable",
    "TypeNotPresentException", "UnsupportedOperationException", "VerifyError",
    "VirtualMachineError", "Void",
];

/// Process-wide memo of java.lang name lookups.
static JAVA_IMPLICIT_NAMES: Lazy<ImplicitNames> =
    Lazy::new(|| ImplicitNames::from_table(JAVA_LANG_NAMES));

#[derive(Debug, Clone, Copy)]
struct JavaImplicitImports;

impl ImplicitImports for JavaImplicitImports {
    fn is_implicit_type(&self, full_name: &str) -> bool {
        JAVA_LANG_TYPE_REGEX.is_match(full_name)
    }

    fn is_implicit_name(&self, simple_name: &str) -> bool {
        JAVA_IMPLICIT_NAMES.contains(simple_name)
    }
}

/// Java counterpart of a primitive proto kind.
fn primitive_type_name(kind: TypeKind) -> Option<&'static str> {
    match kind {
        TypeKind::Bool => Some("boolean"),
        TypeKind::Double => Some("double"),
        TypeKind::Float => Some("float"),
        TypeKind::Int64
        | TypeKind::Uint64
        | TypeKind::Sint64
        | TypeKind::Fixed64
        | TypeKind::Sfixed64 => Some("long"),
        TypeKind::Int32
        | TypeKind::Uint32
        | TypeKind::Sint32
        | TypeKind::Fixed32
        | TypeKind::Sfixed32 => Some("int"),
        TypeKind::String => Some("java.lang.String"),
        TypeKind::Bytes => Some(BYTE_STRING_TYPE),
        TypeKind::Message | TypeKind::Enum | TypeKind::Group => None,
    }
}

fn boxed_type_name(primitive: &str) -> Option<&'static str> {
    match primitive {
        "boolean" => Some("Boolean"),
        "int" => Some("Integer"),
        "long" => Some("Long"),
        "double" => Some("Double"),
        "float" => Some("Float"),
        _ => None,
    }
}

/// Gets the java package for the given proto file.
pub fn java_package(file: &ProtoFile) -> String {
    match file.options.java_package.as_deref() {
        Some(package) if !package.is_empty() => package.to_string(),
        _ => format!("{}.{}", DEFAULT_JAVA_PACKAGE_PREFIX, file.full_name()),
    }
}

/// Gets the outer class name protoc derives for the given proto file.
fn file_class_name(file: &ProtoFile) -> String {
    match file.options.java_outer_classname.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => Name::from_identifier(file.base_name()).to_upper_camel(),
    }
}

/// Given a method output type, returns the return statement prefix for it:
/// empty for the Empty type (no return statement for void).
pub fn method_return_statement(output_type: &str) -> &'static str {
    if is_empty_type(output_type) {
        ""
    } else {
        "return "
    }
}

/// Type table for one generated Java file.
#[derive(Debug)]
pub struct JavaTypeTable {
    model: Arc<Model>,
    imports: ImportTable,
}

impl JavaTypeTable {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            imports: ImportTable::new(),
        }
    }

    /// Full Java name of a message or enum: package, outer class unless the
    /// file uses multiple files, then the proto-relative name.
    pub fn element_name(
        &self,
        full_proto_name: &str,
        kind: TypeKind,
    ) -> crate::Result<ElementName> {
        let found = match kind {
            TypeKind::Enum => self
                .model
                .lookup_enum(full_proto_name)
                .map(|(file, e)| (file, e.name.as_str())),
            _ => self
                .model
                .lookup_message(full_proto_name)
                .map(|(file, m)| (file, m.name.as_str())),
        };
        let (file, relative) = found
            .ok_or_else(|| Error::model(format!("Type '{}' not found", full_proto_name)))?;

        let mut name = java_package(file);
        if !file.options.java_multiple_files {
            name = format!("{}.{}", name, file_class_name(file));
        }
        Ok(ElementName {
            full_name: format!("{}.{}", name, relative),
            short_name: relative.to_string(),
        })
    }

    /// Java representation of a type without cardinality. `boxed` converts
    /// primitives to their object counterparts.
    pub fn basic_type_name(&mut self, type_ref: &TypeRef, boxed: bool) -> crate::Result<String> {
        if let Some(result) = primitive_type_name(type_ref.kind) {
            if result.contains('.') {
                // already an object type, no boxing needed
                return Ok(self.save_nickname_for_full_name(result));
            }
            if boxed {
                if let Some(boxed) = boxed_type_name(result) {
                    return Ok(boxed.to_string());
                }
            }
            return Ok(result.to_string());
        }
        match type_ref.kind {
            TypeKind::Message | TypeKind::Enum => {
                let proto_name = type_ref.type_name.as_deref().ok_or_else(|| {
                    Error::model(format!("{} type without a type name", type_ref.kind))
                })?;
                let element = self.element_name(proto_name, type_ref.kind)?;
                Ok(self.imports.minimally_qualified(
                    &element.full_name,
                    &element.short_name,
                    &JavaImplicitImports,
                ))
            }
            other => Err(Error::model(format!("unknown type kind: {}", other))),
        }
    }

    /// "void" for the Empty type, the resolved output type otherwise.
    pub fn method_return_type_name(&mut self, output_type: &str) -> crate::Result<String> {
        if is_empty_type(output_type) {
            Ok("void".to_string())
        } else {
            self.nickname_for(&TypeRef::message(output_type))
        }
    }
}

impl ModelTypeTable for JavaTypeTable {
    fn nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if let Some(entry) = type_ref.map_entry.as_deref().filter(|_| type_ref.is_map()) {
            let map = self.save_nickname_for_full_name("java.util.Map");
            let key = self.basic_type_name(&entry.key, true)?;
            let value = self.basic_type_name(&entry.value, true)?;
            return Ok(format!("{}<{}, {}>", map, key, value));
        }
        if type_ref.is_repeated() {
            let list = self.save_nickname_for_full_name("java.util.List");
            let element = self.basic_type_name(type_ref, true)?;
            return Ok(format!("{}<{}>", list, element));
        }
        self.basic_type_name(type_ref, false)
    }

    fn element_nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if let Some(entry) = type_ref.map_entry.as_deref().filter(|_| type_ref.is_map()) {
            return self.basic_type_name(&entry.value, true);
        }
        self.basic_type_name(type_ref, type_ref.is_repeated())
    }

    fn zero_value_and_save_nickname_for(&mut self, type_ref: &TypeRef) -> crate::Result<String> {
        if type_ref.is_map() {
            let map = self.save_nickname_for_full_name("java.util.HashMap");
            return Ok(format!("new {}<>()", map));
        }
        if type_ref.is_repeated() {
            let list = self.save_nickname_for_full_name("java.util.ArrayList");
            let element = self.basic_type_name(type_ref, true)?;
            return Ok(format!("new {}<{}>()", list, element));
        }
        let zero = match type_ref.kind {
            TypeKind::Bool => "false".to_string(),
            TypeKind::Double => "0.0".to_string(),
            TypeKind::Float => "0.0F".to_string(),
            TypeKind::Int64
            | TypeKind::Uint64
            | TypeKind::Sint64
            | TypeKind::Fixed64
            | TypeKind::Sfixed64 => "0L".to_string(),
            TypeKind::Int32
            | TypeKind::Uint32
            | TypeKind::Sint32
            | TypeKind::Fixed32
            | TypeKind::Sfixed32 => "0".to_string(),
            TypeKind::String => "\"\"".to_string(),
            TypeKind::Bytes => {
                format!("{}.EMPTY", self.save_nickname_for_full_name(BYTE_STRING_TYPE))
            }
            TypeKind::Message => {
                format!("{}.newBuilder().build()", self.basic_type_name(type_ref, false)?)
            }
            TypeKind::Enum => format!("{}.forNumber(0)", self.basic_type_name(type_ref, false)?),
            TypeKind::Group => {
                return Err(Error::model("unknown type kind: group"));
            }
        };
        Ok(zero)
    }

    fn save_nickname_for_full_name(&mut self, full_name: &str) -> String {
        let short_name = simple_name(full_name, '.');
        self.imports
            .minimally_qualified(full_name, short_name, &JavaImplicitImports)
    }

    fn default_token_value(&mut self, field: &Field) -> crate::Result<String> {
        match field.type_ref.kind {
            TypeKind::String => Ok("\"\"".to_string()),
            TypeKind::Bytes => {
                let byte_string = self.save_nickname_for_full_name(BYTE_STRING_TYPE);
                Ok(format!("new {}()", byte_string))
            }
            kind => Err(Error::UnsupportedFieldType {
                field: self.model.field_full_name(field),
                kind,
            }),
        }
    }

    fn import_list(&self, namespace: &str) -> Vec<String> {
        self.imports.cleaned_imports(|imported| {
            // in the unit's own package or in java.lang: no import needed
            in_namespace(imported, namespace, '.') || JAVA_LANG_TYPE_REGEX.is_match(imported)
        })
    }

    fn reset(&mut self) {
        self.imports.clear();
    }
}

/// Naming policy for Java surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaSurfaceNamer;

impl JavaSurfaceNamer {
    /// Name of the class which is the grpc container for this service interface.
    pub fn grpc_container_name(&self, service: &Interface) -> String {
        format!("{}Grpc", service.name)
    }

    /// Name of the class which is the blocking client for this service interface.
    pub fn blocking_client_name(&self, service: &Interface) -> String {
        format!(
            "{}.{}BlockingClient",
            self.grpc_container_name(service),
            service.name
        )
    }

    /// Name of the class which contains request building helpers.
    pub fn request_factory_name(&self, service: &Interface) -> String {
        format!("{}Requests", service.name)
    }
}

impl SurfaceNamer for JavaSurfaceNamer {
    fn var_name(&self, name: &Name) -> String {
        name.to_lower_camel()
    }

    fn var_reference(&self, name: &Name) -> String {
        format!("{{@code {}}}", self.var_name(name))
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
        format!(
            "METHOD_{}",
            Name::from_identifier(&method.name).to_upper_underscore()
        )
    }

    fn doc_lines(&self, text: &str) -> Vec<String> {
        block_comment_doc_lines(text)
    }

    fn optional_array_type_name(&self) -> String {
        "Map<String, Object>".to_string()
    }

    fn retry_settings_type_name(&self) -> String {
        "RetrySettings".to_string()
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
        if let Some(paging) = config.page_streaming() {
            let paged = types.save_nickname_for_full_name(PAGED_LIST_RESPONSE_TYPE);
            return match &paging.resources_field {
                Some(resources) => {
                    let element = types.element_nickname_for(&resources.type_ref)?;
                    Ok(format!("{}<{}>", paged, element))
                }
                None => Ok(paged),
            };
        }
        types.nickname_for(&TypeRef::message(method.output_type.as_str()))
    }

    fn set_function_call_name(&self, type_ref: &TypeRef, name: &Name) -> String {
        let prefix = if type_ref.is_map() {
            "putAll"
        } else if type_ref.is_repeated() {
            "addAll"
        } else {
            "set"
        };
        format!("{}{}", prefix, name.to_upper_camel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::library_model;
    use crate::model::FieldOptions;

    fn table() -> JavaTypeTable {
        JavaTypeTable::new(Arc::new(library_model()))
    }

    fn field(name: &str, type_ref: TypeRef) -> Field {
        Field {
            name: name.to_string(),
            description: None,
            type_ref,
            options: FieldOptions::default(),
        }
    }

    fn outer_class_model() -> Model {
        serde_json::from_str(
            r#"{
                "files": [
                    {
                        "name": "google/example/shelf_types.proto",
                        "package": "google.example",
                        "messages": [ { "name": "Shelf" }, { "name": "Shelf.Label" }, { "name": "Object" } ]
                    },
                    {
                        "name": "other/book.proto",
                        "package": "other",
                        "options": { "java_package": "com.other", "java_outer_classname": "BookProto" },
                        "messages": [ { "name": "Book" } ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_element_names() {
        let types = JavaTypeTable::new(Arc::new(outer_class_model()));

        let shelf = types.element_name("google.example.Shelf", TypeKind::Message).unwrap();
        assert_eq!(shelf.full_name, "com.google.protos.google.example.ShelfTypes.Shelf");
        assert_eq!(shelf.short_name, "Shelf");

        let label = types
            .element_name("google.example.Shelf.Label", TypeKind::Message)
            .unwrap();
        assert_eq!(
            label.full_name,
            "com.google.protos.google.example.ShelfTypes.Shelf.Label"
        );
        assert_eq!(label.short_name, "Shelf.Label");

        let book = types.element_name("other.Book", TypeKind::Message).unwrap();
        assert_eq!(book.full_name, "com.other.BookProto.Book");

        let multiple = table()
            .element_name("google.example.library.v1.Book", TypeKind::Message)
            .unwrap();
        assert_eq!(multiple.full_name, "com.google.example.library.v1.Book");

        assert!(matches!(
            types.element_name("google.example.Missing", TypeKind::Message),
            Err(Error::Model(_))
        ));
    }

    #[test]
    fn test_message_shadowing_java_lang_is_fully_qualified() {
        let mut table = JavaTypeTable::new(Arc::new(outer_class_model()));
        let object = TypeRef::message("google.example.Object");
        assert_eq!(
            table.nickname_for(&object).unwrap(),
            "com.google.protos.google.example.ShelfTypes.Object"
        );
        // strings resolve via java.lang and stay short
        assert_eq!(
            table.nickname_for(&TypeRef::of(TypeKind::String)).unwrap(),
            "String"
        );
    }

    #[test]
    fn test_repeated_and_boxed_names() {
        let mut table = table();
        let ints = TypeRef::of(TypeKind::Int32).make_repeated();
        assert_eq!(table.nickname_for(&ints).unwrap(), "List<Integer>");
        assert_eq!(table.element_nickname_for(&ints).unwrap(), "Integer");
        assert_eq!(table.nickname_for(&TypeRef::of(TypeKind::Int64)).unwrap(), "long");

        let books = TypeRef::message("google.example.library.v1.Book").make_repeated();
        assert_eq!(table.nickname_for(&books).unwrap(), "List<Book>");
        assert_eq!(table.element_nickname_for(&books).unwrap(), "Book");

        let labels = TypeRef::map(TypeRef::of(TypeKind::String), TypeRef::of(TypeKind::Int64));
        assert_eq!(table.nickname_for(&labels).unwrap(), "Map<String, Long>");
        assert_eq!(table.element_nickname_for(&labels).unwrap(), "Long");
    }

    #[test]
    fn test_zero_values() {
        let mut table = table();
        let strings = TypeRef::of(TypeKind::String).make_repeated();
        assert_eq!(
            table.zero_value_and_save_nickname_for(&strings).unwrap(),
            "new ArrayList<String>()"
        );
        assert_eq!(
            table
                .zero_value_and_save_nickname_for(&TypeRef::of(TypeKind::Int64))
                .unwrap(),
            "0L"
        );
        let book = TypeRef::message("google.example.library.v1.Book");
        assert_eq!(
            table.zero_value_and_save_nickname_for(&book).unwrap(),
            "Book.newBuilder().build()"
        );
        assert!(table
            .zero_value_and_save_nickname_for(&TypeRef::of(TypeKind::Group))
            .is_err());
    }

    #[test]
    fn test_default_token_value() {
        let mut table = table();
        assert_eq!(
            table
                .default_token_value(&field("name", TypeRef::of(TypeKind::String)))
                .unwrap(),
            "\"\""
        );
        assert_eq!(
            table
                .default_token_value(&field("etag", TypeRef::of(TypeKind::Bytes)))
                .unwrap(),
            "new ByteString()"
        );
    }

    #[test]
    fn test_unsupported_token_names_the_message_field() {
        let model = Arc::new(library_model());
        let mut table = JavaTypeTable::new(Arc::clone(&model));
        let (_, request) = model
            .lookup_message("google.example.library.v1.ListBooksRequest")
            .unwrap();
        let page_size = request.field("page_size").unwrap();

        let err = table.default_token_value(page_size).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedFieldType { ref field, kind: TypeKind::Int32 }
                if field == "google.example.library.v1.ListBooksRequest.page_size"
        ));
    }

    #[test]
    fn test_import_list_excludes_own_package_and_java_lang() {
        let mut table = table();
        table
            .nickname_for(&TypeRef::message("google.example.library.v1.Book"))
            .unwrap();
        table
            .nickname_for(&TypeRef::message("google.protobuf.Empty"))
            .unwrap();
        table
            .nickname_for(&TypeRef::of(TypeKind::String).make_repeated())
            .unwrap();
        table
            .nickname_for(&TypeRef::of(TypeKind::Bytes))
            .unwrap();

        assert_eq!(
            table.import_list("com.google.example.library.v1"),
            vec![
                "com.google.protobuf.ByteString".to_string(),
                "com.google.protobuf.Empty".to_string(),
                "java.util.List".to_string(),
            ]
        );

        table.reset();
        assert!(table.import_list("com.google.example.library.v1").is_empty());
    }

    #[test]
    fn test_return_types_and_statements() {
        let mut table = table();
        assert_eq!(table.method_return_type_name("google.protobuf.Empty").unwrap(), "void");
        assert_eq!(
            table
                .method_return_type_name("google.example.library.v1.Book")
                .unwrap(),
            "Book"
        );
        assert_eq!(method_return_statement("google.protobuf.Empty"), "");
        assert_eq!(method_return_statement("google.example.library.v1.Book"), "return ");
    }

    #[test]
    fn test_namer() {
        let namer = JavaSurfaceNamer;
        let model = library_model();
        let (_, service) = model
            .lookup_interface("google.example.library.v1.LibraryService")
            .unwrap();
        assert_eq!(namer.api_wrapper_class_name(service), "LibraryServiceApi");
        assert_eq!(namer.api_wrapper_variable_name(service), "libraryServiceApi");
        assert_eq!(namer.api_method_name(&service.methods[0]), "getBook");
        assert_eq!(namer.grpc_method_name(&service.methods[0]), "METHOD_GET_BOOK");
        assert_eq!(
            namer.blocking_client_name(service),
            "LibraryServiceGrpc.LibraryServiceBlockingClient"
        );
        assert_eq!(namer.request_factory_name(service), "LibraryServiceRequests");
        assert_eq!(
            namer.var_reference(&Name::from_words(&["timeout", "millis"])),
            "{@code timeoutMillis}"
        );

        let list = TypeRef::of(TypeKind::String).make_repeated();
        let name = Name::from_identifier("authors");
        assert_eq!(namer.set_function_call_name(&list, &name), "addAllAuthors");
        assert_eq!(
            namer.set_function_call_name(&TypeRef::of(TypeKind::String), &name),
            "setAuthors"
        );
    }
}
