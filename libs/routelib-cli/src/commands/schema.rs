// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use anyhow::Result;
use routelib::core::schema::RouterSchema;

/// Print the JSON Schema for router schema files.
pub fn run() -> Result<()> {
    println!("{}", RouterSchema::json_schema()?);
    Ok(())
}
