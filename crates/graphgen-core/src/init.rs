//! Project bootstrap: starter schema and configuration resolution.
//!
//! `init` is safe to re-run: an existing configuration short-circuits
//! the whole bootstrap as [`InitOutcome::AlreadyInitialized`] and an
//! existing schema file is never touched. Only a genuinely missing
//! configuration is replaced by defaults, and only then are
//! command-line overrides applied and the result persisted.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{
    Config, PackageTarget, TypeBinding, DEFAULT_CONFIG_FILENAME, DEFAULT_SCHEMA_FILENAME,
};
use crate::error::{Error, Result};

// External imports (alphabetized)
use tokio::fs;

/// Header comment written above a freshly created configuration.
pub const CONFIG_COMMENT: &str = r#"
# graphgen.yml example
#
# Lists the schema source, output targets and type bindings graphgen
# uses on every run. Edit it freely; graphgen never rewrites it.
"#;

/// Starter schema written when no schema file exists yet.
pub const SCHEMA_DEFAULT: &str = r#"
# GraphQL schema example
#
# Replace this with your own schema; graphgen reads it on every run.

type Todo {
  id: ID!
  text: String!
  done: Boolean!
  user: User!
}

type User {
  id: ID!
  name: String!
}

type Query {
  todos: [Todo!]!
}

input NewTodo {
  text: String!
  userId: String!
}

type Mutation {
  createTodo(input: NewTodo!): Todo!
}
"#;

/// Command-line overrides applied onto a freshly created configuration.
///
/// `None` fields never overwrite a default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Explicit configuration path
    pub config: Option<PathBuf>,
    /// Schema source path
    pub schema: Option<String>,
    /// Output filename for generated model types
    pub models: Option<String>,
    /// Output filename for the generated execution layer
    pub output: Option<String>,
    /// Module name for the generated execution layer
    pub package: Option<String>,
    /// Module name for generated model types
    pub model_package: Option<String>,
    /// File whose contents replace the model map wholesale
    pub typemap: Option<PathBuf>,
}

/// Result of configuration resolution.
#[derive(Debug)]
pub enum InitOutcome {
    /// A fresh configuration was created and persisted to `path`.
    Created { config: Config, path: PathBuf },
    /// A configuration already exists at `path`; nothing was written.
    AlreadyInitialized(PathBuf),
}

/// Make sure a schema source file exists, writing the starter schema
/// when it does not. Existing files are never modified.
pub async fn ensure_schema(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SCHEMA_FILENAME));
    match fs::metadata(path).await {
        Ok(_) => return Ok(path.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::write(path, SCHEMA_DEFAULT.trim()).await?;
    log::debug!("wrote starter schema to {}", path.display());
    Ok(path.to_path_buf())
}

/// Resolve the configuration to use, by precedence: an explicit path
/// override, then the default search locations, then fresh defaults.
/// A configuration that already exists wins outright and stops the
/// bootstrap; a fresh one has the overrides applied and is persisted.
pub async fn resolve_config(overrides: &Overrides) -> Result<InitOutcome> {
    let (mut config, config_path) = match &overrides.config {
        Some(path) => match Config::load(path).await {
            Ok(_) => return Ok(InitOutcome::AlreadyInitialized(path.clone())),
            Err(e) if e.is_not_found() => (Config::default(), path.clone()),
            Err(e) => return Err(e),
        },
        None => match Config::load_from_default_locations().await {
            Ok((_, path)) => return Ok(InitOutcome::AlreadyInitialized(path)),
            Err(e) if e.is_not_found() => {
                let mut config = Config::default();
                config.resolver = Some(PackageTarget {
                    filename: "src/graph/resolver.rs".to_string(),
                    package: "graph".to_string(),
                    type_name: Some("Resolver".to_string()),
                });
                (config, PathBuf::from(DEFAULT_CONFIG_FILENAME))
            }
            Err(e) => return Err(e),
        },
    };

    if let Some(schema) = &overrides.schema {
        config.schema_filename = schema.clone();
    }
    if let Some(models) = &overrides.models {
        config.model.filename = models.clone();
    }
    if let Some(output) = &overrides.output {
        config.exec.filename = output.clone();
    }
    if let Some(package) = &overrides.package {
        config.exec.package = package.clone();
    }
    if let Some(model_package) = &overrides.model_package {
        config.model.package = model_package.clone();
    }
    if let Some(typemap) = &overrides.typemap {
        config.models = load_model_map(typemap).await?;
    }

    let mut buf = String::from(CONFIG_COMMENT.trim());
    buf.push_str("\n\n");
    buf.push_str(&serde_yaml::to_string(&config)?);
    fs::write(&config_path, buf).await?;
    log::debug!("wrote configuration to {}", config_path.display());

    Ok(InitOutcome::Created {
        config,
        path: config_path,
    })
}

// A typemap file is a plain mapping of schema type name to Rust type,
// in YAML or JSON. It replaces the model map, it is not merged into it.
async fn load_model_map(path: &Path) -> Result<BTreeMap<String, TypeBinding>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| Error::config(format!("unable to open typemap {}: {e}", path.display())))?;
    let raw: BTreeMap<String, String> = serde_yaml::from_str(&content)?;
    Ok(raw
        .into_iter()
        .map(|(name, model)| (name, TypeBinding { model }))
        .collect())
}
