// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::Path;

use anyhow::Result;
use routelib::core::packet::Packet;
use routelib::core::schema::RouterSchema;

/// Realize a schema file and route packets from every source port.
///
/// Routing here is accounting only: no atoms run, the counters just show
/// where packets would fan out.
pub fn run(schema_file: &Path, packets: u64) -> Result<()> {
    let schema = RouterSchema::from_file(schema_file)?;
    let mut net = schema.realize()?;

    let sources = net.source_handles();
    if sources.is_empty() {
        println!("Net '{}' has no source ports, nothing to simulate.", net.name());
        return Ok(());
    }

    let mut routed_calls = 0u64;
    let mut dropped_calls = 0u64;
    for seq in 0..packets {
        for &src in &sources {
            if net.router_mut().route_packet(src, &Packet::new(seq)) {
                routed_calls += 1;
            } else {
                dropped_calls += 1;
            }
        }
    }

    println!(
        "Simulated {} packet(s) on {} source port(s): {} routed, {} dropped",
        packets,
        sources.len(),
        routed_calls,
        dropped_calls
    );
    println!(
        "Edge traversals recorded: {}",
        net.router().total_packets_routed()
    );
    println!();
    print!("{}", net.router().dump_topology());
    println!();
    print!("{}", net.router().dump_port_status());

    Ok(())
}
