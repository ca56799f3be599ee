// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::Path;

use anyhow::Result;
use routelib::core::handles::Direction;
use routelib::core::schema::RouterSchema;

/// Print a schema file's atoms, ports, and connections.
pub fn run(schema_file: &Path) -> Result<()> {
    let schema = RouterSchema::from_file(schema_file)?;

    let name = if schema.name.is_empty() {
        "(unnamed)"
    } else {
        &schema.name
    };
    println!("Net: {}", name);
    println!("  Flow control: {} (credits_per_port={})", schema.flow_control.policy, schema.flow_control.credits_per_port);
    println!();

    if schema.atoms.is_empty() {
        println!("No atoms declared.");
        return Ok(());
    }

    println!("Atoms ({}):", schema.atoms.len());
    for atom in &schema.atoms {
        println!("  {} ({})", atom.id, atom.action);
        for port in schema.ports.iter().filter(|p| p.atom == atom.id) {
            let arrow = match port.direction {
                Direction::Source => "->",
                Direction::Sink => "<-",
            };
            let label = if port.name.is_empty() {
                String::new()
            } else {
                format!(" {}", port.name)
            };
            println!(
                "    {} {} {}[{}]{}",
                arrow, port.vd, port.direction, port.index, label
            );
        }
    }

    println!();
    println!("Connections ({}):", schema.connections.len());
    for conn in &schema.connections {
        println!(
            "  {}[{}] -> {}[{}]",
            conn.from_atom, conn.from_port, conn.to_atom, conn.to_port
        );
    }

    let sources = schema.source_atoms();
    let sinks = schema.sink_atoms();
    if !sources.is_empty() || !sinks.is_empty() {
        println!();
        println!("Boundary: sources {:?}, sinks {:?}", sources, sinks);
    }

    Ok(())
}
