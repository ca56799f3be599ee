// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use anyhow::Result;
use routelib::core::registry::list_actions;

/// List every registered action with its channel signature.
pub fn run() -> Result<()> {
    let mut descriptors = list_actions();
    descriptors.sort_by(|a, b| a.name.cmp(&b.name));

    if descriptors.is_empty() {
        println!("No actions registered.");
        return Ok(());
    }

    println!("Available actions ({}):\n", descriptors.len());

    for descriptor in &descriptors {
        println!("  {}", descriptor.name);
        if !descriptor.description.is_empty() {
            println!("    {}", descriptor.description);
        }

        if descriptor.sink_count() > 0 {
            println!("    Sinks:");
            for channel in descriptor.sinks.iter() {
                println!("      - {}", channel.qualified_name());
            }
        }

        if descriptor.source_count() > 0 {
            println!("    Sources:");
            for channel in descriptor.sources.iter() {
                println!("      - {}", channel.qualified_name());
            }
        }

        println!();
    }

    Ok(())
}
