//! Configuration management for Graphgen code generation.
//!
//! This module defines the `Config` document that is persisted as YAML
//! between invocations. The configuration names the schema source file,
//! the output targets for generated code, and the bindings from schema
//! type names to Rust types.
//!
//! # Examples
//!
//! ```no_run
//! use graphgen_core::config::Config;
//!
//! # async fn demo() -> graphgen_core::Result<()> {
//! let config = Config::load("graphgen.yml").await?;
//! assert!(!config.schema_filename.is_empty());
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::schema::{self, TypeKind};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Filenames probed, in order, when no explicit config path is given.
pub const DEFAULT_LOCATIONS: &[&str] = &["graphgen.yml", "graphgen.yaml", ".graphgen.yml"];

/// Path a freshly created configuration is written to.
pub const DEFAULT_CONFIG_FILENAME: &str = "graphgen.yml";

/// Default schema source file.
pub const DEFAULT_SCHEMA_FILENAME: &str = "schema.graphql";

static MODULE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid module name pattern"));

/// Configuration for Graphgen server generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the GraphQL schema source file
    #[serde(rename = "schema", default)]
    pub schema_filename: String,

    /// Schema source text, populated from disk before generation.
    /// Never persisted.
    #[serde(skip)]
    pub schema_str: String,

    /// Output target for the generated execution layer
    #[serde(default)]
    pub exec: PackageTarget,

    /// Output target for generated model types
    #[serde(default)]
    pub model: PackageTarget,

    /// Output target for the resolver skeleton; nothing is generated
    /// for resolvers when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<PackageTarget>,

    /// Name of the crate the generated modules live in, referenced by
    /// the generated server entrypoint's imports
    #[serde(default = "default_package")]
    pub package: String,

    /// Bindings from schema type names to Rust types
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub models: BTreeMap<String, TypeBinding>,
}

/// Output location for a generated artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTarget {
    /// File the artifact is written to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,

    /// Module the artifact lives in
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,

    /// Root type name; used by the resolver target
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// Binding from a schema type name to a Rust type path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBinding {
    /// Fully qualified Rust type, e.g. `chrono::DateTime<chrono::Utc>`
    pub model: String,
}

fn default_package() -> String {
    "graphql_server".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_filename: DEFAULT_SCHEMA_FILENAME.to_string(),
            schema_str: String::new(),
            exec: PackageTarget {
                filename: "src/graph/generated.rs".to_string(),
                package: "graph".to_string(),
                type_name: None,
            },
            model: PackageTarget {
                filename: "src/graph/model.rs".to_string(),
                package: "graph".to_string(),
                type_name: None,
            },
            resolver: None,
            package: default_package(),
            models: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load a configuration from a YAML file.
    ///
    /// A missing file maps to [`Error::ConfigNotFound`] so callers can
    /// substitute defaults; every other failure is surfaced as-is.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Probe the fixed list of default locations in the working
    /// directory and load the first configuration found, returning the
    /// path it was loaded from.
    pub async fn load_from_default_locations() -> Result<(Self, PathBuf)> {
        for candidate in DEFAULT_LOCATIONS {
            let path = Path::new(candidate);
            match Self::load(path).await {
                Ok(config) => return Ok((config, path.to_path_buf())),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Err(Error::ConfigNotFound(PathBuf::from(DEFAULT_CONFIG_FILENAME)))
    }

    /// Validate internal consistency once `schema_str` is populated.
    pub fn check(&self) -> Result<()> {
        if self.schema_str.trim().is_empty() {
            return Err(Error::config(
                "schema source is empty; read the schema file before validating",
            ));
        }
        let doc = schema::parse(&self.schema_str)?;
        if !doc
            .definitions
            .iter()
            .any(|def| def.kind == TypeKind::Object && def.name == "Query")
        {
            return Err(Error::config("schema must define a Query type"));
        }

        check_target("exec", &self.exec, true)?;
        check_target("model", &self.model, true)?;
        if let Some(resolver) = &self.resolver {
            check_target("resolver", resolver, false)?;
        }
        if !MODULE_NAME.is_match(&self.package) {
            return Err(Error::config(format!(
                "package {} is not a valid crate name",
                self.package
            )));
        }

        // Generated code has no way to represent an unbound custom scalar.
        for def in &doc.definitions {
            if def.kind == TypeKind::Scalar && !self.models.contains_key(&def.name) {
                return Err(Error::config(format!(
                    "scalar {} must be bound to a Rust type in the models map",
                    def.name
                )));
            }
        }

        for (name, binding) in &self.models {
            if binding.model.trim().is_empty() {
                return Err(Error::config(format!(
                    "model binding for {name} names no Rust type"
                )));
            }
            if !doc.definitions.iter().any(|def| def.name == *name) {
                return Err(Error::config(format!(
                    "model binding {name} does not match any type declared in the schema"
                )));
            }
        }

        Ok(())
    }
}

fn check_target(label: &str, target: &PackageTarget, package_required: bool) -> Result<()> {
    if target.filename.is_empty() {
        return Err(Error::config(format!("{label} filename is required")));
    }
    if !target.filename.ends_with(".rs") {
        return Err(Error::config(format!(
            "{label} filename {} must name a .rs file",
            target.filename
        )));
    }
    if package_required && target.package.is_empty() {
        return Err(Error::config(format!("{label} package name is required")));
    }
    if !target.package.is_empty() && !MODULE_NAME.is_match(&target.package) {
        return Err(Error::config(format!(
            "{label} package {} is not a valid module name",
            target.package
        )));
    }
    if let Some(type_name) = &target.type_name {
        if !MODULE_NAME.is_match(type_name) {
            return Err(Error::config(format!(
                "{label} type {type_name} is not a valid type name"
            )));
        }
    }
    Ok(())
}
