// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! routelib CLI
//!
//! Command-line interface for working with router schema files.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "routelib")]
#[command(author, version, about = "Router schema CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schema file without realizing it
    Validate {
        /// Schema file to check (JSON or YAML)
        #[arg(value_name = "SCHEMA_FILE")]
        schema_file: PathBuf,
    },

    /// Show the atoms, ports, and connections of a schema file
    Inspect {
        /// Schema file to inspect (JSON or YAML)
        #[arg(value_name = "SCHEMA_FILE")]
        schema_file: PathBuf,
    },

    /// Render a schema file's atom graph as GraphViz DOT
    Dot {
        /// Schema file to render (JSON or YAML)
        #[arg(value_name = "SCHEMA_FILE")]
        schema_file: PathBuf,
    },

    /// List the registered actions
    Actions,

    /// Print the JSON Schema for schema files
    Schema,

    /// Realize a schema file and push packets through it
    Simulate {
        /// Schema file to realize (JSON or YAML)
        #[arg(value_name = "SCHEMA_FILE")]
        schema_file: PathBuf,

        /// Packets to route from every source port
        #[arg(short, long, default_value = "10")]
        packets: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { schema_file } => commands::validate::run(&schema_file),
        Commands::Inspect { schema_file } => commands::inspect::run(&schema_file),
        Commands::Dot { schema_file } => commands::dot::run(&schema_file),
        Commands::Actions => commands::actions::run(),
        Commands::Schema => commands::schema::run(),
        Commands::Simulate {
            schema_file,
            packets,
        } => commands::simulate::run(&schema_file, packets),
    }
}
