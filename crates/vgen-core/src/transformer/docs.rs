//! Documentation views for the enums of a file.

use crate::model::ProtoFile;
use crate::naming::SurfaceNamer;
use crate::viewmodel::{EnumDocView, EnumValueDocView};

#[derive(Debug, Clone, Copy, Default)]
pub struct EnumDocTransformer;

impl EnumDocTransformer {
    pub fn generate_enum_docs(
        &self,
        namer: &dyn SurfaceNamer,
        file: &ProtoFile,
    ) -> Vec<EnumDocView> {
        file.enums
            .iter()
            .map(|e| EnumDocView {
                name: e.name.clone(),
                lines: namer.element_doc_lines(e.description.as_deref()),
                values: e
                    .values
                    .iter()
                    .map(|value| EnumValueDocView {
                        name: value.name.clone(),
                        number: value.number,
                        lines: namer.element_doc_lines(value.description.as_deref()),
                    })
                    .collect(),
                package_name: file.full_name().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::java::JavaSurfaceNamer;
    use crate::model::fixtures::library_model;

    #[test]
    fn test_enum_docs() {
        let model = library_model();
        let docs = EnumDocTransformer.generate_enum_docs(&JavaSurfaceNamer, &model.files[0]);

        assert_eq!(docs.len(), 1);
        let view = &docs[0];
        assert_eq!(view.name, "BookView");
        assert_eq!(view.lines, vec!["How much of a book to return."]);
        assert_eq!(view.package_name, "google.example.library.v1");
        assert_eq!(view.values[0].lines, vec!["Title only."]);
        // no description still yields one (empty) line
        assert_eq!(view.values[1].lines, vec![""]);
        assert_eq!(view.values[1].number, 1);

        assert!(EnumDocTransformer
            .generate_enum_docs(&JavaSurfaceNamer, &model.files[1])
            .is_empty());
    }
}
