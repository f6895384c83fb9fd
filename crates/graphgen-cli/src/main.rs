//! graphgen CLI entrypoint
//! Parses command-line arguments and dispatches to the core bootstrap
//! and generation pipeline. Exit-code translation happens here and
//! nowhere else: the "config file already exists" no-op is a success,
//! every error is exit code 1 with the message on stderr.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use graphgen_core::{codegen, generate, init, InitOutcome, Overrides};

#[derive(Parser)]
#[command(name = "graphgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Create a graphgen project: configuration, starter schema and
    /// generated server scaffolding
    Init {
        /// Configuration file to create or reuse
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
        /// Path to the GraphQL schema source
        #[arg(long, short = 's')]
        schema: Option<String>,
        /// Output filename for generated model types
        #[arg(long)]
        models: Option<String>,
        /// Output filename for the generated execution layer
        #[arg(long)]
        output: Option<String>,
        /// Module name for the generated execution layer
        #[arg(long)]
        package: Option<String>,
        /// Module name for generated model types
        #[arg(long)]
        model_package: Option<String>,
        /// YAML or JSON file of type bindings; replaces the model map
        /// of the configuration wholesale
        #[arg(long)]
        typemap: Option<PathBuf>,
        /// Output filename for the generated server entrypoint
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            config,
            schema,
            models,
            output,
            package,
            model_package,
            typemap,
            server,
        } => {
            let overrides = Overrides {
                config,
                schema,
                models,
                output,
                package,
                model_package,
                typemap,
            };
            run_init(overrides, server).await
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_init(overrides: Overrides, server: Option<String>) -> anyhow::Result<ExitCode> {
    tracing::debug!(?overrides, "running init");

    init::ensure_schema(overrides.schema.as_deref().map(Path::new))
        .await
        .context("unable to write schema file")?;

    let mut config = match init::resolve_config(&overrides).await? {
        InitOutcome::Created { config, .. } => config,
        InitOutcome::AlreadyInitialized(_) => {
            eprintln!("config file already exists");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let server_path =
        generate::generate_graph_server(&mut config, server.as_deref().map(Path::new)).await?;

    println!(
        "Exec \"cargo run --bin {}\" to start GraphQL server",
        codegen::bin_name(&server_path)
    );
    Ok(ExitCode::SUCCESS)
}
