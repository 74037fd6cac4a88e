//! Transformers from model elements to view models.
pub mod api_method;
pub mod docs;
pub mod init_code;

pub use api_method::ApiMethodTransformer;
pub use docs::EnumDocTransformer;
pub use init_code::InitCodeTransformer;

use crate::method_config::MethodConfig;
use crate::model::{Interface, Method, Model};
use crate::naming::SurfaceNamer;
use crate::types::ModelTypeTable;

/// Everything a transformer needs to build the views of one method.
///
/// The type table belongs to the generation unit; transformers must resolve
/// names through it in a fixed order so the unit's imports are reproducible.
pub struct MethodTransformerContext<'a> {
    pub model: &'a Model,
    pub interface: &'a Interface,
    pub method: &'a Method,
    pub method_config: &'a MethodConfig,
    pub namer: &'a dyn SurfaceNamer,
    pub type_table: &'a mut dyn ModelTypeTable,
}

impl<'a> MethodTransformerContext<'a> {
    pub fn new(
        model: &'a Model,
        interface: &'a Interface,
        method: &'a Method,
        method_config: &'a MethodConfig,
        namer: &'a dyn SurfaceNamer,
        type_table: &'a mut dyn ModelTypeTable,
    ) -> Self {
        Self {
            model,
            interface,
            method,
            method_config,
            namer,
            type_table,
        }
    }
}
