// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::Path;

use anyhow::Result;
use routelib::core::schema::RouterSchema;

/// Print the GraphViz DOT rendering of a schema file's atom graph.
pub fn run(schema_file: &Path) -> Result<()> {
    let schema = RouterSchema::from_file(schema_file)?;
    print!("{}", schema.to_dot());
    Ok(())
}
