//! Test utilities for vgen integration tests

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use tempfile::TempDir;

/// Creates a temporary directory for test outputs
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

/// Creates a small annotated model (YAML) in the given directory
pub fn create_test_model(dir: &Path) -> anyhow::Result<PathBuf> {
    let model_path = dir.join("echo.model.yaml");
    let model_content = r#"
service_config:
  apis:
    - name: example.echo.v1.Echo
files:
  - name: example/echo/v1/echo.proto
    package: example.echo.v1
    options:
      java_package: com.example.echo.v1
      java_multiple_files: true
    messages:
      - name: EchoRequest
        fields:
          - name: content
            description: The content to echo back.
            type: { kind: string }
            options:
              field_behavior: [REQUIRED]
              resource: { path: "echoes/*" }
          - name: severity
            type: { kind: int32 }
      - name: EchoResponse
        fields:
          - name: content
            type: { kind: string }
    interfaces:
      - name: Echo
        options:
          default_host: "localhost:7469"
          oauth_scopes: ["https://www.googleapis.com/auth/cloud-platform"]
        methods:
          - name: Echo
            description: Echoes the request content.
            input_type: example.echo.v1.EchoRequest
            output_type: example.echo.v1.EchoResponse
            options:
              http: { post: "/v1/echo:echo", body: "*" }
              method_signatures: ["content,severity"]
"#;

    fs::write(&model_path, model_content)
        .with_context(|| format!("Failed to write model to {}", model_path.display()))?;
    Ok(model_path)
}
