//! Sample initialization code for the fields of a request.

use crate::annotations::AnnotationResolver;
use crate::model::{Field, TypeKind};
use crate::naming::Name;
use crate::transformer::MethodTransformerContext;
use crate::viewmodel::{FieldSettingView, InitCodeLineView, InitCodeView};

#[derive(Debug, Clone, Copy, Default)]
pub struct InitCodeTransformer;

impl InitCodeTransformer {
    /// One initialization line and one field setting per field, in order.
    ///
    /// String fields carrying a resource path are initialized with the path
    /// itself; every other field with the zero value of its type.
    pub fn generate_init_code(
        &self,
        context: &mut MethodTransformerContext<'_>,
        fields: &[Field],
    ) -> crate::Result<InitCodeView> {
        let resolver = AnnotationResolver;
        let namer = context.namer;
        let mut view = InitCodeView::default();

        for field in fields {
            let identifier = namer.variable_name(field);
            let type_name = context.type_table.nickname_for(&field.type_ref)?;
            let initial_value = match resolver.resource_path(field) {
                Some(path) if field.type_ref.kind == TypeKind::String => format!("\"{}\"", path),
                _ => context
                    .type_table
                    .zero_value_and_save_nickname_for(&field.type_ref)?,
            };

            view.lines.push(InitCodeLineView {
                type_name,
                identifier: identifier.clone(),
                initial_value,
            });
            view.field_settings.push(FieldSettingView {
                set_function_call_name: namer
                    .set_function_call_name(&field.type_ref, &Name::from_identifier(&field.name)),
                identifier,
            });
        }

        Ok(view)
    }
}
