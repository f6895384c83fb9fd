//! Graphgen Core Library
//!
//! This library provides the core functionality for bootstrapping a
//! GraphQL project and generating server scaffolding from a schema
//! definition file: configuration resolution with override precedence,
//! starter-schema bootstrap, and the fixed-order generation pipeline.

pub mod codegen;
pub mod config;
pub mod error;
pub mod generate;
pub mod init;
pub mod schema;

pub use crate::{
    config::Config,
    error::{Error, Result},
    generate::{generate_graph_server, DEFAULT_SERVER_FILENAME},
    init::{ensure_schema, resolve_config, InitOutcome, Overrides},
};
