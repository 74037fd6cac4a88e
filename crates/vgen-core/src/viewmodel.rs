//! Language-neutral view models handed to the renderer.
//!
//! Every view is a plain value: built once by a transformer, then only read
//! (and serialized for the external renderer).

// External imports (alphabetized)
use serde::Serialize;

/// Shape of a generated API method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiMethodType {
    OptionalArrayMethod,
    PagedOptionalArrayMethod,
}

/// A method surface taking the required fields positionally, followed by an
/// optional-args bag and a call-settings bag.
#[derive(Debug, Clone, Serialize)]
pub struct OptionalArrayMethodView {
    #[serde(rename = "type")]
    pub method_type: ApiMethodType,
    pub api_class_name: String,
    pub api_variable_name: String,
    pub init_code: InitCodeView,
    pub doc: ApiMethodDocView,
    pub name: String,
    pub request_type_name: String,
    pub has_return_value: bool,
    pub key: String,
    pub grpc_method_name: String,
    pub method_params: Vec<DynamicDefaultableParamView>,
    pub required_request_object_params: Vec<RequestObjectParamView>,
    pub optional_request_object_params: Vec<RequestObjectParamView>,
}

impl OptionalArrayMethodView {
    pub fn is_paged(&self) -> bool {
        self.method_type == ApiMethodType::PagedOptionalArrayMethod
    }
}

/// A positional method parameter with its default value ("" for none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicDefaultableParamView {
    pub name: String,
    pub default_value: String,
}

/// A request field as seen by the request-building code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestObjectParamView {
    pub name: String,
    pub type_name: String,
    pub element_type_name: String,
    pub set_call_name: String,
    pub is_map: bool,
    pub is_array: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiMethodDocView {
    pub main_doc_lines: Vec<String>,
    pub param_docs: Vec<ParamDocView>,
    pub return_type_name: String,
    pub throws_doc_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParamDocView {
    Simple(SimpleParamDocView),
    Map(MapParamDocView),
}

impl ParamDocView {
    pub fn param_name(&self) -> &str {
        match self {
            Self::Simple(doc) => &doc.param_name,
            Self::Map(doc) => &doc.param_name,
        }
    }

    pub fn first_line(&self) -> &str {
        match self {
            Self::Simple(doc) => &doc.first_line,
            Self::Map(doc) => &doc.first_line,
        }
    }

    /// All doc lines, first line included
    pub fn lines(&self) -> Vec<&str> {
        let (first, rest) = match self {
            Self::Simple(doc) => (&doc.first_line, &doc.remaining_lines),
            Self::Map(doc) => (&doc.first_line, &doc.remaining_lines),
        };
        std::iter::once(first.as_str())
            .chain(rest.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleParamDocView {
    pub param_name: String,
    pub type_name: String,
    pub first_line: String,
    pub remaining_lines: Vec<String>,
}

/// Doc of a key-value bag parameter, with a doc per documented key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapParamDocView {
    pub param_name: String,
    pub type_name: String,
    pub first_line: String,
    pub remaining_lines: Vec<String>,
    pub array_key_docs: Vec<ParamDocView>,
}

/// Sample initialization of the required fields of a method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitCodeView {
    pub lines: Vec<InitCodeLineView>,
    pub field_settings: Vec<FieldSettingView>,
}

/// `<type_name> <identifier> = <initial_value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitCodeLineView {
    pub type_name: String,
    pub identifier: String,
    pub initial_value: String,
}

/// How an initialized value is set on the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSettingView {
    pub set_function_call_name: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDocView {
    pub name: String,
    pub lines: Vec<String>,
    pub values: Vec<EnumValueDocView>,
    pub package_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValueDocView {
    pub name: String,
    pub number: i32,
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_doc_accessors_and_tagging() {
        let doc = ParamDocView::Simple(SimpleParamDocView {
            param_name: "name".to_string(),
            type_name: "String".to_string(),
            first_line: "The name.".to_string(),
            remaining_lines: vec!["More.".to_string()],
        });
        assert_eq!(doc.param_name(), "name");
        assert_eq!(doc.lines(), vec!["The name.", "More."]);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["kind"], "simple");
        assert_eq!(json["param_name"], "name");
    }
}
