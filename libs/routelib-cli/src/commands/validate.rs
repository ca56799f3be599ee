// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::Path;

use anyhow::Result;
use routelib::core::registry::is_action_registered;
use routelib::core::schema::RouterSchema;

/// Validate a schema file and report actions this binary does not know.
pub fn run(schema_file: &Path) -> Result<()> {
    let schema = RouterSchema::from_file(schema_file)?;
    schema.validate()?;

    let mut unknown = 0;
    for atom in &schema.atoms {
        if !is_action_registered(&atom.action) {
            println!(
                "warning: atom '{}' uses unregistered action '{}'",
                atom.id, atom.action
            );
            unknown += 1;
        }
    }

    println!(
        "{}: OK ({} atoms, {} ports, {} connections)",
        schema_file.display(),
        schema.atoms.len(),
        schema.ports.len(),
        schema.connections.len()
    );
    if unknown > 0 {
        println!(
            "note: {} action(s) are not registered here; the schema still realizes,",
            unknown
        );
        println!("      since ports carry their own descriptors");
    }

    Ok(())
}
