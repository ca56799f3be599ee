//! Legacy Customer Loop Example
//!
//! Builds the classic three-atom net: a customer places orders with a
//! generator, the generator produces audio for a sink, and the sink sends
//! receipts back to the customer. Each turn is gated by the customer's
//! credit budget.
//!
//! Run with `RUST_LOG=routelib=debug cargo run --example legacy_loop` to
//! watch the router's own logging alongside the printed output.

use anyhow::Result;
use routelib::core::atom::{dispatch_packet, Atom};
use routelib::core::handles::{AtomId, Direction, PortHandle};
use routelib::core::net::NetBuilder;
use routelib::core::packet::Packet;
use routelib::core::router::PacketRouter;
use serde_json::json;

/// Counts whatever lands on its sink ports.
struct LoopAtom {
    label: &'static str,
    id: AtomId,
    received: u64,
}

impl LoopAtom {
    fn new(label: &'static str, id: AtomId) -> Self {
        Self {
            label,
            id,
            received: 0,
        }
    }
}

impl Atom for LoopAtom {
    fn id(&self) -> AtomId {
        self.id
    }

    fn register_ports(
        &mut self,
        _router: &mut PacketRouter,
    ) -> routelib::core::error::Result<Vec<PortHandle>> {
        // Ports are declared through the net for this demo.
        Ok(Vec::new())
    }

    fn emit_packet(&mut self, port: PortHandle, packet: &Packet) -> bool {
        self.received += 1;
        println!("  {} received packet {} on {}", self.label, packet.seq, port);
        true
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let mut net = NetBuilder::new("legacy-loop");
    net.add_atom("customer", "center.customer")?;
    net.add_atom("gen", "center.audio.src.dbg_generator")?;
    net.add_atom("out", "center.audio.sink.test.realtime")?;

    net.add_port("customer", Direction::Sink, "receipt.in")?;
    net.add_port("customer", Direction::Source, "order.out")?;
    net.add_port("gen", Direction::Sink, "order.in")?;
    net.add_port("gen", Direction::Source, "audio.out")?;
    net.add_port("out", Direction::Sink, "audio.in")?;
    net.add_port("out", Direction::Source, "receipt.out")?;

    net.connect("customer", 0, "gen", 0)?;
    net.connect("gen", 0, "out", 0)?;
    net.connect("out", 0, "customer", 0)?;

    println!("Atom graph:\n{}", net.schema().to_dot());

    let mut net = net.build()?;
    let order_out = net.handle("customer", Direction::Source, 0).expect("declared port");
    let audio_out = net.handle("gen", Direction::Source, 0).expect("declared port");
    let receipt_out = net.handle("out", Direction::Source, 0).expect("declared port");

    let mut customer = LoopAtom::new("customer", net.atom_id("customer").expect("declared atom"));
    let mut generator = LoopAtom::new("gen", net.atom_id("gen").expect("declared atom"));
    let mut out = LoopAtom::new("out", net.atom_id("out").expect("declared atom"));

    for turn in 0..3 {
        println!("Turn {}:", turn);

        let granted = net.router_mut().request_credits(order_out, 1);
        if granted == 0 {
            println!("  customer is out of credits, skipping turn");
            continue;
        }

        let order = Packet::new(turn).with_payload(json!({ "turn": turn }));
        let mut stage: Vec<&mut dyn Atom> = vec![&mut generator];
        dispatch_packet(net.router_mut(), order_out, &order, &mut stage);

        let mut stage: Vec<&mut dyn Atom> = vec![&mut out];
        dispatch_packet(net.router_mut(), audio_out, &Packet::new(turn), &mut stage);

        let mut stage: Vec<&mut dyn Atom> = vec![&mut customer];
        dispatch_packet(net.router_mut(), receipt_out, &Packet::new(turn), &mut stage);

        // The receipt pays the customer back for the next turn.
        net.router_mut().ack_credits(order_out, 1);
    }

    println!();
    println!(
        "Totals: customer={} gen={} out={} ({} edge traversals, {} failures)",
        customer.received,
        generator.received,
        out.received,
        net.router().total_packets_routed(),
        net.router().total_delivery_failures()
    );
    println!();
    print!("{}", net.router().dump_topology());
    println!();
    print!("{}", net.router().dump_port_status());

    Ok(())
}
