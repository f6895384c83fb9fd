//! Generation pipeline entry point.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::codegen;
use crate::config::Config;
use crate::error::{Error, Result};

/// Server entrypoint written when no override is given.
pub const DEFAULT_SERVER_FILENAME: &str = "src/bin/server.rs";

/// Run the full generation pipeline for a resolved configuration: read
/// the schema source, validate the configuration against it, then
/// generate models, execution layer and server entrypoint in order,
/// stopping at the first failure. Partial output from a failed stage is
/// left on disk for inspection.
pub async fn generate_graph_server(
    config: &mut Config,
    server_filename: Option<&Path>,
) -> Result<PathBuf> {
    config.schema_str = fs::read_to_string(&config.schema_filename)
        .await
        .map_err(|e| {
            Error::schema(format!(
                "unable to open schema {}: {e}",
                config.schema_filename
            ))
        })?;

    config.check()?;

    let server_filename = server_filename.unwrap_or_else(|| Path::new(DEFAULT_SERVER_FILENAME));

    codegen::generate(config).await?;
    codegen::generate_server(config, server_filename).await?;

    Ok(server_filename.to_path_buf())
}
