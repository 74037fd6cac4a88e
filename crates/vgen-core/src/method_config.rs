//! Resolved per-method generation configuration.

use crate::annotations::AnnotationResolver;
use crate::model::{Field, FieldBehavior, Method, Model};

/// Page streaming fields of a method.
#[derive(Debug, Clone)]
pub struct PageStreamingConfig {
    pub request_token_field: Field,
    pub response_token_field: Field,
    pub page_size_field: Option<Field>,
    /// Repeated response field holding the page's resources
    pub resources_field: Option<Field>,
}

impl PageStreamingConfig {
    pub fn has_page_size_field(&self) -> bool {
        self.page_size_field.is_some()
    }

    pub fn is_page_size_field(&self, field: &Field) -> bool {
        self.page_size_field
            .as_ref()
            .is_some_and(|page_size| page_size.name == field.name)
    }
}

/// Partition of a method's input fields into required and optional sets.
///
/// The partition is trusted: the view builder does not re-check that the
/// sets are disjoint or that they belong to the method.
#[derive(Debug, Clone, Default)]
pub struct MethodConfig {
    required_fields: Vec<Field>,
    optional_fields: Vec<Field>,
    page_streaming: Option<PageStreamingConfig>,
}

impl MethodConfig {
    pub fn new(
        required_fields: Vec<Field>,
        optional_fields: Vec<Field>,
        page_streaming: Option<PageStreamingConfig>,
    ) -> Self {
        Self {
            required_fields,
            optional_fields,
            page_streaming,
        }
    }

    /// Derive a configuration from field-behavior annotations: REQUIRED fields
    /// are required, every other input field except OUTPUT_ONLY ones is optional.
    pub fn from_annotations(model: &Model, method: &Method) -> crate::Result<Self> {
        let resolver = AnnotationResolver;
        let input = model.input_message(method)?;
        let (required, optional): (Vec<Field>, Vec<Field>) = input
            .fields
            .iter()
            .filter(|f| {
                resolver.is_field_required(f)
                    || !f.options.field_behavior.contains(&FieldBehavior::OutputOnly)
            })
            .cloned()
            .partition(|f| resolver.is_field_required(f));
        Ok(Self::new(required, optional, None))
    }

    pub fn required_fields(&self) -> &[Field] {
        &self.required_fields
    }

    pub fn optional_fields(&self) -> &[Field] {
        &self.optional_fields
    }

    pub fn is_page_streaming(&self) -> bool {
        self.page_streaming.is_some()
    }

    pub fn page_streaming(&self) -> Option<&PageStreamingConfig> {
        self.page_streaming.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::library_model;

    #[test]
    fn test_from_annotations() {
        let model = library_model();
        let (_, service) = model
            .lookup_interface("google.example.library.v1.LibraryService")
            .unwrap();

        let get = MethodConfig::from_annotations(&model, &service.methods[0]).unwrap();
        let names = |fields: &[Field]| fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(get.required_fields()), vec!["name"]);
        assert_eq!(names(get.optional_fields()), vec!["view_type"]);
        assert!(!get.is_page_streaming());

        // OUTPUT_ONLY fields are not inputs
        let delete = MethodConfig::from_annotations(&model, &service.methods[2]).unwrap();
        assert_eq!(names(delete.required_fields()), vec!["name"]);
        assert!(delete.optional_fields().is_empty());
    }
}
