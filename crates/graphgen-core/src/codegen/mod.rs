//! Code generation stages for Graphgen.
//!
//! The templates are embedded in the binary and rendered with `tera`
//! from a context built out of the parsed schema: model structs and
//! enums, resolver traits for the operation roots, and a runnable
//! server entrypoint. The model and execution-layer outputs are
//! regenerated on every run; the resolver skeleton is written once and
//! then belongs to the user.

pub mod rust;

// Internal imports (std, crate)
use std::io;
use std::path::Path;

use crate::config::{Config, PackageTarget};
use crate::error::{Error, Result};
use crate::schema;

// External imports (alphabetized)
use tera::{Context, Tera};
use tokio::fs;

const MODEL_TEMPLATE: &str = include_str!("templates/model.rs.tera");
const EXEC_TEMPLATE: &str = include_str!("templates/exec.rs.tera");
const RESOLVER_TEMPLATE: &str = include_str!("templates/resolver.rs.tera");
const SERVER_TEMPLATE: &str = include_str!("templates/server.rs.tera");

/// Generate model types, the execution layer and, when configured and
/// absent, the resolver skeleton.
pub async fn generate(config: &Config) -> Result<()> {
    let tera = engine()?;
    let context = build_context(config)?;

    render_to_file(
        &tera,
        "model.rs.tera",
        &context,
        Path::new(&config.model.filename),
    )
    .await?;
    render_to_file(
        &tera,
        "exec.rs.tera",
        &context,
        Path::new(&config.exec.filename),
    )
    .await?;

    if let Some(resolver) = &config.resolver {
        let path = Path::new(&resolver.filename);
        match fs::metadata(path).await {
            Ok(_) => {
                // User-owned after the first run.
                log::debug!("resolver {} already exists, skipping", path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                render_to_file(&tera, "resolver.rs.tera", &context, path).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Generate the runnable server entrypoint at `output`.
pub async fn generate_server(config: &Config, output: &Path) -> Result<()> {
    let tera = engine()?;
    let mut context = build_context(config)?;
    context.insert("server_bin", &bin_name(output));
    render_to_file(&tera, "server.rs.tera", &context, output).await
}

/// Cargo binary name for a server entrypoint path.
pub fn bin_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("server")
        .to_string()
}

fn engine() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("model.rs.tera", MODEL_TEMPLATE),
        ("exec.rs.tera", EXEC_TEMPLATE),
        ("resolver.rs.tera", RESOLVER_TEMPLATE),
        ("server.rs.tera", SERVER_TEMPLATE),
    ])?;
    Ok(tera)
}

fn build_context(config: &Config) -> Result<Context> {
    let doc = schema::parse(&config.schema_str)?;

    let models = rust::build_models(&doc, &config.models);
    let enums = rust::build_enums(&doc, &config.models);
    let query_fields = doc
        .get("Query")
        .map(|def| rust::build_resolver_fields(def, &config.models))
        .unwrap_or_default();
    let mutation_fields = doc
        .get("Mutation")
        .map(|def| rust::build_resolver_fields(def, &config.models))
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("package", &config.package);
    context.insert("schema_raw", config.schema_str.trim());
    context.insert("has_models", &(!models.is_empty() || !enums.is_empty()));
    context.insert("models", &models);
    context.insert("enums", &enums);
    context.insert("query_fields", &query_fields);
    context.insert("has_mutation", &(!mutation_fields.is_empty()));
    context.insert("mutation_fields", &mutation_fields);
    context.insert("exec_path", &module_path(&config.exec));
    context.insert("model_path", &module_path(&config.model));
    match &config.resolver {
        Some(resolver) => {
            context.insert("has_resolver", &true);
            context.insert("resolver_path", &module_path(resolver));
            context.insert(
                "resolver_type",
                resolver.type_name.as_deref().unwrap_or("Resolver"),
            );
        }
        None => context.insert("has_resolver", &false),
    }

    Ok(context)
}

// Module path a generated file is addressed by, e.g. `graph::model`
// for src/graph/model.rs in package `graph`.
fn module_path(target: &PackageTarget) -> String {
    let stem = Path::new(&target.filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("generated");
    if target.package.is_empty() {
        stem.to_string()
    } else {
        format!("{}::{stem}", target.package)
    }
}

async fn render_to_file(tera: &Tera, template: &str, context: &Context, output: &Path) -> Result<()> {
    log::debug!("rendering {template} to {}", output.display());
    let content = tera
        .render(template, context)
        .map_err(|e| Error::codegen(format!("unable to render {template}: {e}")))?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(output, content).await?;
    Ok(())
}
