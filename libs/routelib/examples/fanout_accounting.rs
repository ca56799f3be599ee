//! Fan-out Accounting Example
//!
//! Uses the raw router API directly, without nets or actions: register
//! ports, connect one generator to several sinks, route packets, and read
//! the per-edge counters back out of the diagnostic dumps.

use anyhow::Result;
use routelib::core::atom::AtomRegistry;
use routelib::core::descriptors::{ChannelDesc, Realm, ValueClass, ValueDescriptor};
use routelib::core::handles::Direction;
use routelib::core::packet::Packet;
use routelib::core::ports::Metadata;
use routelib::core::router::PacketRouter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let audio = ValueDescriptor::single(ChannelDesc::new(Realm::Center, ValueClass::Audio));

    let mut atoms = AtomRegistry::new();
    let mut router = PacketRouter::new();

    let generator = atoms.issue("generator");
    let src = router.register_port(generator, Direction::Source, 0, audio.clone(), Metadata::new())?;

    for i in 0..3 {
        let sink = atoms.issue(format!("monitor-{}", i));
        let dst = router.register_port(sink, Direction::Sink, 0, audio.clone(), Metadata::new())?;
        router.connect(src, dst, Metadata::new())?;
    }

    for seq in 0..10 {
        router.route_packet(src, &Packet::new(seq));
    }

    // Deactivate one edge: the record keeps its counters and further
    // routes still count it (see the connection table below).
    if let Some(first) = router.connection_info(0) {
        router.disconnect(first.src, first.dst);
    }
    for seq in 10..15 {
        router.route_packet(src, &Packet::new(seq));
    }

    print!("{}", router.dump_topology());
    println!();
    print!("{}", router.dump_connection_table());
    println!();
    println!(
        "Edge traversals: {} across {} connections",
        router.total_packets_routed(),
        router.connection_count()
    );

    Ok(())
}
