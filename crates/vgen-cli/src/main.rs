//! vgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vgen_core::{AnnotationResolver, Config, MethodFacts, Model, TargetLanguage};

#[derive(Parser)]
#[command(name = "vgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate view models and import lists for one or more languages
    Generate {
        /// Path to the annotated model (JSON or YAML)
        #[arg(long)]
        model: Option<PathBuf>,
        /// Path to the API config (YAML, JSON or TOML)
        #[arg(long)]
        api_config: Option<PathBuf>,
        /// Target language; repeat for several
        #[arg(long = "language", value_enum)]
        languages: Vec<TargetLanguage>,
        /// Output directory for the generated documents
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Run configuration file; command-line flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the annotation facts of every API method as JSON
    Facts {
        /// Path to the annotated model (JSON or YAML)
        #[arg(long)]
        model: PathBuf,
    },
}

#[derive(Serialize)]
struct InterfaceFacts {
    interface: String,
    package: String,
    methods: Vec<MethodFacts>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            model,
            api_config,
            languages,
            output_dir,
            config,
        } => {
            let mut run = match &config {
                Some(path) => Config::from_file(path)
                    .await
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => {
                    let model = model
                        .as_ref()
                        .context("--model is required when no --config is given")?;
                    Config::new(model.to_string_lossy(), "vgen-out")
                }
            };
            if let Some(model) = model {
                run.model_path = model.to_string_lossy().into_owned();
            }
            if let Some(api_config) = api_config {
                run.api_config_path = Some(api_config.to_string_lossy().into_owned());
            }
            if let Some(output_dir) = output_dir {
                run.output_dir = output_dir.to_string_lossy().into_owned();
            }
            if !languages.is_empty() {
                run.languages = languages.iter().map(ToString::to_string).collect();
            }

            tracing::info!(
                model = %run.model_path,
                languages = ?run.languages,
                output_dir = %run.output_dir,
                "Generating view models"
            );
            let written = vgen_core::generate(&run)
                .await
                .context("Generation failed")?;
            for path in &written {
                tracing::info!("Wrote {}", path.display());
            }
            println!("✅ Generated {} file(s) in {}", written.len(), run.output_dir);
        }
        Commands::Facts { model } => {
            let loaded = Model::from_file(&model)
                .await
                .with_context(|| format!("Failed to load model from {}", model.display()))?;

            let resolver = AnnotationResolver;
            let package = resolver
                .package_name(&loaded)
                .context("No API interface of the service config is defined in the model")?
                .to_string();
            let mut facts = Vec::new();
            for (file, interface) in loaded.api_interfaces()? {
                let methods = interface
                    .methods
                    .iter()
                    .map(|method| resolver.method_facts(&loaded, interface, method))
                    .collect::<vgen_core::Result<Vec<_>>>()?;
                facts.push(InterfaceFacts {
                    interface: file.qualify(&interface.name),
                    package: package.clone(),
                    methods,
                });
            }
            println!("{}", serde_json::to_string_pretty(&facts)?);
        }
    }

    Ok(())
}
