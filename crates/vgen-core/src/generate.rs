//! Generation driver: one unit per API interface and target language.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    api_config::ApiConfig,
    config::Config,
    error::{Error, Result},
    languages::TargetLanguage,
    model::Model,
    transformer::{ApiMethodTransformer, EnumDocTransformer, MethodTransformerContext},
    viewmodel::{EnumDocView, OptionalArrayMethodView},
};

use futures::future::try_join_all;
use serde::Serialize;
use tokio::fs;

/// Everything the renderer needs for one output file.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedUnit {
    pub language: TargetLanguage,
    /// Full name of the interface the unit was generated for
    pub interface: String,
    pub namespace: String,
    /// Output directory relative to the language root
    pub path: String,
    pub filename: String,
    pub methods: Vec<OptionalArrayMethodView>,
    pub enum_docs: Vec<EnumDocView>,
    /// Sorted imports the rendered body needs
    pub imports: Vec<String>,
}

/// Main entry point for code generation
pub async fn generate(config: &Config) -> Result<Vec<PathBuf>> {
    // 1. Load the model and the optional API config
    let model = Arc::new(Model::from_file(&config.model_path).await?);
    let api_config = match &config.api_config_path {
        Some(path) => ApiConfig::from_file(path).await?,
        None => ApiConfig::default(),
    };
    let api_config = Arc::new(api_config);

    // 2. Generate and write the units of every language
    let mut written = Vec::new();
    for language in config.target_languages()? {
        let units = generate_units(Arc::clone(&model), Arc::clone(&api_config), language).await?;
        let root = Path::new(&config.output_dir).join(language.as_str());
        for unit in &units {
            written.push(write_unit(unit, &root).await?);
        }
        log::info!("Generated {} unit(s) for {}", units.len(), language);
    }

    Ok(written)
}

/// Generate the units of every API interface, in service config order.
///
/// Each unit runs on its own blocking task with its own type table; the
/// model and API config are shared read-only.
pub async fn generate_units(
    model: Arc<Model>,
    api_config: Arc<ApiConfig>,
    language: TargetLanguage,
) -> Result<Vec<GeneratedUnit>> {
    let interfaces: Vec<String> = model
        .api_interfaces()?
        .into_iter()
        .map(|(file, interface)| file.qualify(&interface.name))
        .collect();

    let tasks = interfaces.into_iter().map(|name| {
        let model = Arc::clone(&model);
        let api_config = Arc::clone(&api_config);
        tokio::task::spawn_blocking(move || generate_unit(&model, &name, &api_config, language))
    });

    try_join_all(tasks).await?.into_iter().collect()
}

/// Generate the unit of one interface with a fresh type table.
pub fn generate_unit(
    model: &Arc<Model>,
    interface_name: &str,
    api_config: &ApiConfig,
    language: TargetLanguage,
) -> Result<GeneratedUnit> {
    let (file, interface) = model
        .lookup_interface(interface_name)
        .ok_or_else(|| Error::model(format!("API interface '{}' not found", interface_name)))?;

    let namer = language.namer();
    let mut types = language.type_table(Arc::clone(model));
    types.reset();

    let transformer = ApiMethodTransformer::new();
    let mut methods = Vec::with_capacity(interface.methods.len());
    for method in &interface.methods {
        let method_config = api_config.method_config(model, interface_name, method)?;
        let mut context = MethodTransformerContext::new(
            model,
            interface,
            method,
            &method_config,
            namer.as_ref(),
            types.as_mut(),
        );
        methods.push(transformer.generate_optional_array_method(&mut context)?);
    }

    let enum_docs = EnumDocTransformer.generate_enum_docs(namer.as_ref(), file);
    let namespace = language.namespace(file);
    let imports = types.import_list(&namespace);
    let filename = format!(
        "{}.{}",
        namer.api_wrapper_class_name(interface),
        language.file_extension()
    );

    log::debug!(
        "Generated {} for {}: {} method(s), {} import(s)",
        filename,
        interface_name,
        methods.len(),
        imports.len()
    );

    Ok(GeneratedUnit {
        language,
        interface: interface_name.to_string(),
        path: language.output_path(&namespace),
        namespace,
        filename,
        methods,
        enum_docs,
        imports,
    })
}

/// Write a unit as `<root>/<path>/<filename>.json` and return that path.
pub async fn write_unit(unit: &GeneratedUnit, root: &Path) -> Result<PathBuf> {
    let dir = root.join(&unit.path);
    fs::create_dir_all(&dir).await?;

    let file_path = dir.join(format!("{}.json", unit.filename));
    let content = serde_json::to_string_pretty(unit)?;
    fs::write(&file_path, content).await?;
    Ok(file_path)
}
