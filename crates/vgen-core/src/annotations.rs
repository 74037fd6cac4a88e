//! Reading generation facts out of annotated model elements.
//!
//! [`AnnotationResolver`] is a stateless reader: every accessor is a pure
//! function of the (immutable) model and returns a well-defined "absent"
//! value when an annotation is missing.

use serde::Serialize;

use crate::model::{
    Field, FieldBehavior, Interface, LongRunningOperation, MessageType, Method, MethodSignature,
    Model,
};

/// Method-level generation facts, derived fresh per method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodFacts {
    pub method: String,
    /// Path of the first request field naming a resource, e.g. "shelves/*"
    pub resource_path: Option<String>,
    /// Resource type the first referencing request field points at
    pub resource_type: Option<String>,
    pub required_fields: Vec<String>,
    pub method_signatures: Vec<MethodSignature>,
    pub long_running: Option<LongRunningOperation>,
    pub is_http_get: bool,
    pub service_address: Option<String>,
    pub auth_scopes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationResolver;

impl AnnotationResolver {
    /// Return the path, e.g. "shelves/*" for a resource field, or `None`.
    pub fn resource_path<'a>(&self, field: &'a Field) -> Option<&'a str> {
        field.options.resource.as_ref().map(|r| r.path.as_str())
    }

    /// Base package name for an API's client: the full name of the file
    /// defining the first API's interface.
    pub fn package_name<'a>(&self, model: &'a Model) -> Option<&'a str> {
        let api = model.service_config.apis.first()?;
        model
            .lookup_interface(&api.name)
            .map(|(file, _)| file.full_name())
    }

    /// Entity name of a resource field, e.g. "shelf" for a field of `Shelf`.
    pub fn resource_entity_name(&self, parent: &MessageType) -> String {
        parent.simple_name().to_lowercase()
    }

    pub fn long_running_operation<'a>(
        &self,
        method: &'a Method,
    ) -> Option<&'a LongRunningOperation> {
        method.options.long_running.as_ref()
    }

    /// Method signatures (flattenings) of a method; empty when none are declared.
    pub fn method_signatures(&self, method: &Method) -> Vec<MethodSignature> {
        method.options.method_signatures.clone()
    }

    /// Names of the input message fields annotated as REQUIRED, in declaration order.
    pub fn required_fields(&self, model: &Model, method: &Method) -> crate::Result<Vec<String>> {
        let input = model.input_message(method)?;
        Ok(input
            .fields
            .iter()
            .filter(|f| self.is_field_required(f))
            .map(|f| f.name.clone())
            .collect())
    }

    pub fn is_field_required(&self, field: &Field) -> bool {
        field
            .options
            .field_behavior
            .contains(&FieldBehavior::Required)
    }

    pub fn resource_type<'a>(&self, field: &'a Field) -> Option<&'a str> {
        field.options.resource_reference.as_deref()
    }

    /// Whether the method's HTTP binding is a GET with a non-empty path.
    pub fn is_http_get(&self, method: &Method) -> bool {
        method
            .options
            .http
            .as_ref()
            .and_then(|rule| rule.get.as_deref())
            .is_some_and(|path| !path.is_empty())
    }

    /// The hostname for this service (e.g. "foo.googleapis.com").
    pub fn service_address<'a>(&self, service: &'a Interface) -> Option<&'a str> {
        service.options.default_host.as_deref()
    }

    /// The OAuth scopes for this service.
    pub fn auth_scopes<'a>(&self, service: &'a Interface) -> &'a [String] {
        &service.options.oauth_scopes
    }

    pub fn method_facts(
        &self,
        model: &Model,
        service: &Interface,
        method: &Method,
    ) -> crate::Result<MethodFacts> {
        let input = model.input_message(method)?;
        Ok(MethodFacts {
            method: method.name.clone(),
            resource_path: input
                .fields
                .iter()
                .find_map(|f| self.resource_path(f))
                .map(String::from),
            resource_type: input
                .fields
                .iter()
                .find_map(|f| self.resource_type(f))
                .map(String::from),
            required_fields: self.required_fields(model, method)?,
            method_signatures: self.method_signatures(method),
            long_running: self.long_running_operation(method).cloned(),
            is_http_get: self.is_http_get(method),
            service_address: self.service_address(service).map(String::from),
            auth_scopes: self.auth_scopes(service).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::library_model;
    use crate::model::{HttpRule, Resource, TypeKind, TypeRef};

    fn field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            description: None,
            type_ref: TypeRef::of(TypeKind::String),
            options: Default::default(),
        }
    }

    fn library_service(model: &Model) -> &Interface {
        model
            .lookup_interface("google.example.library.v1.LibraryService")
            .unwrap()
            .1
    }

    #[test]
    fn test_resource_path_present_and_absent() {
        let resolver = AnnotationResolver;
        let mut annotated = field("name");
        annotated.options.resource = Some(Resource {
            path: "shelves/*".to_string(),
        });
        let plain = field("name");

        assert_eq!(resolver.resource_path(&annotated), Some("shelves/*"));
        assert_eq!(resolver.resource_path(&plain), None);
    }

    #[test]
    fn test_package_name() {
        let resolver = AnnotationResolver;
        let mut model = library_model();
        assert_eq!(
            resolver.package_name(&model),
            Some("google.example.library.v1")
        );

        model.service_config.apis[0].name = "google.example.Nope".to_string();
        assert_eq!(resolver.package_name(&model), None);

        model.service_config.apis.clear();
        assert_eq!(resolver.package_name(&model), None);
    }

    #[test]
    fn test_required_fields_filters_on_behavior() {
        let resolver = AnnotationResolver;
        let model = library_model();
        let service = library_service(&model);

        let get = &service.methods[0];
        assert_eq!(resolver.required_fields(&model, get).unwrap(), vec!["name"]);

        let list = &service.methods[1];
        assert_eq!(
            resolver.required_fields(&model, list).unwrap(),
            vec!["parent", "page_size"]
        );

        // REQUIRED alongside other behaviors still counts; OUTPUT_ONLY alone does not
        let delete = &service.methods[2];
        assert_eq!(resolver.required_fields(&model, delete).unwrap(), vec!["name"]);
    }

    #[test]
    fn test_method_signatures_never_absent() {
        let resolver = AnnotationResolver;
        let model = library_model();
        let service = library_service(&model);

        assert_eq!(resolver.method_signatures(&service.methods[0]).len(), 2);
        assert!(resolver.method_signatures(&service.methods[1]).is_empty());
    }

    #[test]
    fn test_is_http_get() {
        let resolver = AnnotationResolver;
        let model = library_model();
        let service = library_service(&model);
        assert!(resolver.is_http_get(&service.methods[0]));
        assert!(!resolver.is_http_get(&service.methods[2]));

        let mut method = service.methods[0].clone();
        method.options.http = Some(HttpRule {
            get: Some(String::new()),
            ..Default::default()
        });
        assert!(!resolver.is_http_get(&method));
        method.options.http = None;
        assert!(!resolver.is_http_get(&method));
    }

    #[test]
    fn test_service_level_annotations() {
        let resolver = AnnotationResolver;
        let model = library_model();
        let service = library_service(&model);
        assert_eq!(
            resolver.service_address(service),
            Some("library-example.googleapis.com")
        );
        assert_eq!(
            resolver.auth_scopes(service),
            &[
                "https://www.googleapis.com/auth/cloud-platform".to_string(),
                "https://www.googleapis.com/auth/library".to_string()
            ]
        );
    }

    #[test]
    fn test_resource_reference_and_entity_name() {
        let resolver = AnnotationResolver;
        let model = library_model();
        let (_, request) = model
            .lookup_message("google.example.library.v1.GetBookRequest")
            .unwrap();
        assert_eq!(
            resolver.resource_type(&request.fields[0]),
            Some("library.googleapis.com/Book")
        );
        assert_eq!(resolver.resource_type(&request.fields[1]), None);

        let (_, shelf) = model
            .lookup_message("google.example.library.v1.Shelf")
            .unwrap();
        assert_eq!(resolver.resource_entity_name(shelf), "shelf");
    }

    #[test]
    fn test_method_facts() {
        let resolver = AnnotationResolver;
        let model = library_model();
        let service = library_service(&model);

        let facts = resolver
            .method_facts(&model, service, &service.methods[2])
            .unwrap();
        assert_eq!(facts.method, "DeleteBook");
        assert!(!facts.is_http_get);
        let lro = facts.long_running.unwrap();
        assert_eq!(lro.metadata_type, "google.example.library.v1.Book");
        assert_eq!(facts.auth_scopes.len(), 2);
        assert_eq!(facts.resource_path, None);

        let get_facts = resolver
            .method_facts(&model, service, &service.methods[0])
            .unwrap();
        assert!(get_facts.long_running.is_none());
        assert_eq!(
            get_facts.resource_type.as_deref(),
            Some("library.googleapis.com/Book")
        );
    }

    #[test]
    fn test_method_facts_resource_path() {
        let resolver = AnnotationResolver;
        let mut model = library_model();
        let request = model.files[0]
            .messages
            .iter_mut()
            .find(|m| m.name == "DeleteBookRequest")
            .unwrap();
        request.fields[0].options.resource = Some(Resource {
            path: "shelves/*/books/*".to_string(),
        });

        let service = library_service(&model);
        let facts = resolver
            .method_facts(&model, service, &service.methods[2])
            .unwrap();
        assert_eq!(facts.resource_path.as_deref(), Some("shelves/*/books/*"));
        assert_eq!(facts.resource_type, None);
    }
}
