//! Builds optional-array method views from method definitions.

use crate::model::{is_empty_type, Field, TypeKind, TypeRef};
use crate::naming::{Name, SurfaceNamer};
use crate::transformer::{InitCodeTransformer, MethodTransformerContext};
use crate::viewmodel::{
    ApiMethodDocView, ApiMethodType, DynamicDefaultableParamView, MapParamDocView,
    OptionalArrayMethodView, ParamDocView, RequestObjectParamView, SimpleParamDocView,
};

const PAGE_SIZE_DOC_LINES: [&str; 5] = [
    "The maximum number of resources contained in the underlying API",
    "response. If page streaming is performed per-resource, this",
    "parameter does not affect the return value. If page streaming is",
    "performed per-page, this determines the maximum number of",
    "resources in a page.",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ApiMethodTransformer {
    init_code_transformer: InitCodeTransformer,
}

impl ApiMethodTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the view of the method in `context`.
    ///
    /// Names are resolved in a fixed order (class names, init code, docs,
    /// request type, method params, request-object params) so that a unit's
    /// import table always sees the same arrival order.
    pub fn generate_optional_array_method(
        &self,
        context: &mut MethodTransformerContext<'_>,
    ) -> crate::Result<OptionalArrayMethodView> {
        let namer = context.namer;
        let method = context.method;
        let config = context.method_config;

        let method_type = if config.is_page_streaming() {
            ApiMethodType::PagedOptionalArrayMethod
        } else {
            ApiMethodType::OptionalArrayMethod
        };
        let api_class_name = namer.api_wrapper_class_name(context.interface);
        let api_variable_name = namer.api_wrapper_variable_name(context.interface);
        let init_code = self
            .init_code_transformer
            .generate_init_code(context, config.required_fields())?;

        let doc = self.generate_optional_array_method_doc(context);

        let name = namer.api_method_name(method);
        let request_type_name = context
            .type_table
            .nickname_for(&TypeRef::message(method.input_type.as_str()))?;
        let has_return_value = !is_empty_type(&method.output_type);
        let key = namer.method_key(method);
        let grpc_method_name = namer.grpc_method_name(method);

        let method_params = self.generate_optional_array_method_params(context)?;

        let required_request_object_params =
            self.generate_request_object_params(context, config.required_fields())?;
        let optional_request_object_params =
            self.generate_request_object_params(context, config.optional_fields())?;

        log::debug!(
            "Built {:?} view for {}.{}",
            method_type,
            context.interface.name,
            method.name
        );

        Ok(OptionalArrayMethodView {
            method_type,
            api_class_name,
            api_variable_name,
            init_code,
            doc,
            name,
            request_type_name,
            has_return_value,
            key,
            grpc_method_name,
            method_params,
            required_request_object_params,
            optional_request_object_params,
        })
    }

    fn generate_optional_array_method_doc(
        &self,
        context: &mut MethodTransformerContext<'_>,
    ) -> ApiMethodDocView {
        let namer = context.namer;
        let method = context.method;
        let config = context.method_config;

        let main_doc_lines = namer.element_doc_lines(method.description.as_deref());
        let mut param_docs = self.method_param_docs(context, config.required_fields());
        param_docs.push(self.optional_array_param_doc(context, config.optional_fields()));
        param_docs.push(self.call_settings_param_doc(context));

        let return_type_name = doc_type_name(
            namer,
            namer.dynamic_return_type_name(&mut *context.type_table, method, config),
            "ApiMethodTransformer.generate_optional_array_method_doc - returnTypeName",
        );

        ApiMethodDocView {
            main_doc_lines,
            param_docs,
            return_type_name,
            throws_doc_lines: Vec::new(),
        }
    }

    fn generate_optional_array_method_params(
        &self,
        context: &mut MethodTransformerContext<'_>,
    ) -> crate::Result<Vec<DynamicDefaultableParamView>> {
        let namer = context.namer;
        let mut params: Vec<DynamicDefaultableParamView> = context
            .method_config
            .required_fields()
            .iter()
            .map(|field| DynamicDefaultableParamView {
                name: namer.variable_name(field),
                default_value: String::new(),
            })
            .collect();

        // Stand-in for an untyped key-value bag; the element type of the
        // container is not modeled at this layer.
        let array_type = TypeRef::of(TypeKind::String).make_repeated();

        params.push(DynamicDefaultableParamView {
            name: namer.var_name(&Name::from_words(&["optional", "args"])),
            default_value: context
                .type_table
                .zero_value_and_save_nickname_for(&array_type)?,
        });
        params.push(DynamicDefaultableParamView {
            name: namer.var_name(&Name::from_words(&["call", "settings"])),
            default_value: context
                .type_table
                .zero_value_and_save_nickname_for(&array_type)?,
        });

        Ok(params)
    }

    fn generate_request_object_params(
        &self,
        context: &mut MethodTransformerContext<'_>,
        fields: &[Field],
    ) -> crate::Result<Vec<RequestObjectParamView>> {
        fields
            .iter()
            .map(|field| self.generate_request_object_param(context, field))
            .collect()
    }

    fn generate_request_object_param(
        &self,
        context: &mut MethodTransformerContext<'_>,
        field: &Field,
    ) -> crate::Result<RequestObjectParamView> {
        let namer = context.namer;
        let type_ref = &field.type_ref;

        let (element_type_name, type_name) = if namer.should_import_request_object_param_type(field)
        {
            let element = context.type_table.element_nickname_for(type_ref)?;
            (element, context.type_table.nickname_for(type_ref)?)
        } else {
            (
                namer.not_implemented_string(
                    "ApiMethodTransformer.generate_request_object_param - elementTypeName",
                ),
                namer.not_implemented_string(
                    "ApiMethodTransformer.generate_request_object_param - typeName",
                ),
            )
        };

        Ok(RequestObjectParamView {
            name: namer.variable_name(field),
            type_name,
            element_type_name,
            set_call_name: namer
                .set_function_call_name(type_ref, &Name::from_identifier(&field.name)),
            is_map: type_ref.is_map(),
            is_array: !type_ref.is_map() && type_ref.is_repeated(),
        })
    }

    fn method_param_docs(
        &self,
        context: &mut MethodTransformerContext<'_>,
        fields: &[Field],
    ) -> Vec<ParamDocView> {
        let namer = context.namer;
        let config = context.method_config;

        fields
            .iter()
            .map(|field| {
                let type_name = doc_type_name(
                    namer,
                    context.type_table.nickname_for(&field.type_ref),
                    "ApiMethodTransformer.method_param_docs - typeName",
                );

                let is_page_size = config
                    .page_streaming()
                    .is_some_and(|paging| paging.is_page_size_field(field));
                let doc_lines = if is_page_size {
                    PAGE_SIZE_DOC_LINES.iter().map(|l| l.to_string()).collect()
                } else {
                    namer.element_doc_lines(field.description.as_deref())
                };
                let (first_line, remaining_lines) = split_doc_lines(doc_lines);

                ParamDocView::Simple(SimpleParamDocView {
                    param_name: namer.variable_name(field),
                    type_name,
                    first_line,
                    remaining_lines,
                })
            })
            .collect()
    }

    fn optional_array_param_doc(
        &self,
        context: &mut MethodTransformerContext<'_>,
        fields: &[Field],
    ) -> ParamDocView {
        let namer = context.namer;
        let optional_args_name = Name::from_words(&["optional", "args"]);

        let doc_lines = if fields.is_empty() {
            // TODO: line-wrap generated doc text per language instead of here
            let text = format!(
                "Optional. There are no optional parameters for this method yet;\n          \
                 this {} parameter reserves a spot for future ones.",
                namer.var_reference(&optional_args_name)
            );
            namer.doc_lines(&text)
        } else {
            vec!["Optional.".to_string()]
        };
        let (first_line, remaining_lines) = split_doc_lines(doc_lines);

        ParamDocView::Map(MapParamDocView {
            param_name: namer.var_name(&optional_args_name),
            type_name: namer.optional_array_type_name(),
            first_line,
            remaining_lines,
            array_key_docs: self.method_param_docs(context, fields),
        })
    }

    fn call_settings_param_doc(&self, context: &mut MethodTransformerContext<'_>) -> ParamDocView {
        let namer = context.namer;
        let retry_settings_name = Name::from_words(&["retry", "settings"]);
        let timeout_millis_name = Name::from_words(&["timeout", "millis"]);

        let (first_line, remaining_lines) = split_doc_lines(namer.doc_lines(&format!(
            "Retry settings to use for this call. If present, then\n{} is ignored.",
            namer.var_reference(&timeout_millis_name)
        )));
        let retry_settings_doc = ParamDocView::Simple(SimpleParamDocView {
            param_name: namer.var_name(&retry_settings_name),
            type_name: namer.retry_settings_type_name(),
            first_line,
            remaining_lines,
        });

        let timeout_type_name = doc_type_name(
            namer,
            context.type_table.nickname_for(&TypeRef::of(TypeKind::Int32)),
            "ApiMethodTransformer.call_settings_param_doc - timeoutMillis",
        );
        let (first_line, remaining_lines) = split_doc_lines(namer.doc_lines(&format!(
            "Timeout to use for this call. Only used if {}\nis not set.",
            namer.var_reference(&retry_settings_name)
        )));
        let timeout_doc = ParamDocView::Simple(SimpleParamDocView {
            param_name: namer.var_name(&timeout_millis_name),
            type_name: timeout_type_name,
            first_line,
            remaining_lines,
        });

        ParamDocView::Map(MapParamDocView {
            param_name: namer.var_name(&Name::from_words(&["call", "settings"])),
            type_name: namer.optional_array_type_name(),
            first_line: "Optional.".to_string(),
            remaining_lines: Vec::new(),
            array_key_docs: vec![retry_settings_doc, timeout_doc],
        })
    }
}

/// Type names in docs degrade to a marker instead of failing the method.
fn doc_type_name(namer: &dyn SurfaceNamer, resolved: crate::Result<String>, site: &str) -> String {
    resolved.unwrap_or_else(|err| {
        log::warn!("Falling back to a placeholder doc type name ({}): {}", site, err);
        namer.not_implemented_string(site)
    })
}

fn split_doc_lines(mut lines: Vec<String>) -> (String, Vec<String>) {
    if lines.is_empty() {
        return (String::new(), lines);
    }
    let first = lines.remove(0);
    (first, lines)
}
