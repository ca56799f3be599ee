//! The packet router: port registry, connection table, routing accounting,
//! and credit-based flow control.
//!
//! The router is deliberately synchronous and single-threaded; wrap it in a
//! [`SharedRouter`](crate::core::shared::SharedRouter) when multiple threads
//! need it. It also performs no payload delivery of its own. `route_packet`
//! is accounting: it answers "which edges would this packet traverse" and
//! updates the per-edge counters. Handing the payload to sink atoms is the
//! calling layer's job (see [`dispatch_packet`](crate::core::atom::dispatch_packet)).

use crate::core::connection::{Connection, ConnectionInfo};
use crate::core::descriptors::ValueDescriptor;
use crate::core::error::{Result, RouterError};
use crate::core::handles::{AtomId, Direction, PortHandle};
use crate::core::packet::Packet;
use crate::core::ports::{Metadata, Port};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::{debug, trace, warn};

/// Routes packets between typed, directional ports.
#[derive(Debug, Default)]
pub struct PacketRouter {
    ports: Vec<Port>,
    connection_table: Vec<Connection>,
    /// Distinct atoms that registered at least one port, in first-seen order.
    atoms: Vec<AtomId>,
    total_packets_routed: u64,
    total_delivery_failures: u64,
}

impl PacketRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a port and return its handle.
    ///
    /// `port_index` is the port's index within its atom, counted per
    /// direction. Uniqueness of (atom, direction, index) is the caller's
    /// responsibility; the router does not cross-check it. Fails if the atom
    /// id is the invalid sentinel, the index is negative, or the descriptor
    /// carries no channels.
    pub fn register_port(
        &mut self,
        atom: AtomId,
        direction: Direction,
        port_index: i32,
        descriptor: ValueDescriptor,
        metadata: Metadata,
    ) -> Result<PortHandle> {
        if !atom.is_valid() {
            return Err(RouterError::InvalidArgument(
                "cannot register a port for the invalid atom id".to_string(),
            ));
        }
        if port_index < 0 {
            return Err(RouterError::InvalidArgument(format!(
                "port index must be non-negative (got {port_index})"
            )));
        }
        if !descriptor.is_valid() {
            return Err(RouterError::InvalidArgument(format!(
                "value descriptor must carry at least one channel ({atom} port {port_index})"
            )));
        }

        let router_index = self.ports.len() as i64;
        let handle = PortHandle::new(atom, port_index, direction, router_index);
        self.ports.push(Port::new(handle, descriptor, metadata));

        if !self.atoms.contains(&atom) {
            self.atoms.push(atom);
        }

        let port = &self.ports[router_index as usize];
        debug!(
            "Registered {} port {} for {} (vd={}, router_idx={})",
            direction, port_index, atom, port.descriptor, router_index
        );

        Ok(handle)
    }

    /// Connect a source port to a sink port, appending a new edge to the
    /// connection table and to both ports' adjacency lists.
    ///
    /// Validation runs in a fixed order and the first failure is returned;
    /// nothing is recorded on failure. Duplicate edges are not deduplicated,
    /// every successful call appends a distinct record. Returns the new
    /// edge's connection-table index.
    pub fn connect(&mut self, src: PortHandle, dst: PortHandle, metadata: Metadata) -> Result<usize> {
        let (src_slot, dst_slot) = match self.validate_connection(src, dst) {
            Ok(slots) => slots,
            Err(e) => {
                warn!("Connect failed validation: {}", e);
                return Err(e);
            }
        };

        let conn_index = self.connection_table.len();
        self.connection_table
            .push(Connection::new(src_slot, dst_slot, metadata));
        self.ports[src_slot].outgoing.push(conn_index);
        self.ports[dst_slot].incoming.push(conn_index);

        debug!(
            "Connected port {} -> port {} (connection {})",
            src_slot, dst_slot, conn_index
        );

        Ok(conn_index)
    }

    /// Deactivate the first active connection between the two ports.
    ///
    /// The record stays in the table with its counters and the edge index
    /// stays in both ports' adjacency lists; only `active` flips. Matching is
    /// by the handles' router indices. Returns whether an edge was
    /// deactivated.
    pub fn disconnect(&mut self, src: PortHandle, dst: PortHandle) -> bool {
        for (i, conn) in self.connection_table.iter_mut().enumerate() {
            if conn.active
                && conn.src_port as i64 == src.router_index
                && conn.dst_port as i64 == dst.router_index
            {
                conn.active = false;
                debug!(
                    "Deactivated connection {} (src={}, dst={})",
                    i, conn.src_port, conn.dst_port
                );
                return true;
            }
        }

        warn!(
            "No active connection found to disconnect (src={}, dst={})",
            src.router_index, dst.router_index
        );
        false
    }

    /// Account a packet against every edge fanning out of `src`.
    ///
    /// Increments `packets_routed` on each connection in the port's outgoing
    /// list, in insertion order. Deactivated edges still count: disconnect
    /// leaves the edge index in the adjacency list, and callers that want
    /// live edges only should filter on [`ConnectionInfo::active`]. Returns
    /// false without side effects when the handle does not resolve or the
    /// port has no outgoing connections.
    pub fn route_packet(&mut self, src: PortHandle, packet: &Packet) -> bool {
        let Some(slot) = self.resolve(src) else {
            warn!("Cannot route packet {}: source handle {} does not resolve", packet.seq, src);
            return false;
        };

        let fan_out = self.ports[slot].outgoing.len();
        if fan_out == 0 {
            debug!(
                "Port {} has no outgoing connections, dropping packet {}",
                slot, packet.seq
            );
            return false;
        }

        trace!(
            "Routing packet {} from port {} to {} destination(s)",
            packet.seq, slot, fan_out
        );

        for i in 0..fan_out {
            let conn_index = self.ports[slot].outgoing[i];
            if let Some(conn) = self.connection_table.get_mut(conn_index) {
                conn.packets_routed += 1;
                self.total_packets_routed += 1;
            }
        }

        true
    }

    /// Record that a delivery attempt over `connection_index` failed.
    ///
    /// Called by the dispatch layer when a sink rejects or loses a packet.
    /// Returns whether the connection exists.
    pub fn record_delivery_failure(&mut self, connection_index: usize) -> bool {
        match self.connection_table.get_mut(connection_index) {
            Some(conn) => {
                conn.delivery_failures += 1;
                self.total_delivery_failures += 1;
                debug!(
                    "Recorded delivery failure on connection {} (total {})",
                    connection_index, self.total_delivery_failures
                );
                true
            }
            None => {
                warn!(
                    "Delivery failure reported for unknown connection {}",
                    connection_index
                );
                false
            }
        }
    }

    /// Grant up to `requested` credits from the port's available balance.
    ///
    /// The port's requested tally grows by the full demand either way.
    /// An unresolvable handle grants 0 with no side effects.
    pub fn request_credits(&mut self, port: PortHandle, requested: u32) -> u32 {
        let Some(slot) = self.resolve(port) else {
            warn!("Credit request on unresolvable handle {}", port);
            return 0;
        };
        let granted = self.ports[slot].request_credits(requested);
        trace!(
            "Port {} requested {} credits, granted {} (available now {})",
            slot, requested, granted, self.ports[slot].credits_available
        );
        granted
    }

    /// Return `count` credits to the port's available balance.
    pub fn ack_credits(&mut self, port: PortHandle, count: u32) {
        let Some(slot) = self.resolve(port) else {
            warn!("Credit ack on unresolvable handle {}", port);
            return;
        };
        self.ports[slot].ack_credits(count);
        trace!(
            "Port {} acked {} credits (available now {})",
            slot, count, self.ports[slot].credits_available
        );
    }

    /// Spendable credit balance of the port, or 0 if the handle does not
    /// resolve.
    pub fn available_credits(&self, port: PortHandle) -> u32 {
        self.find_port(port).map_or(0, |p| p.credits_available)
    }

    /// Resolve a handle to its port record.
    ///
    /// The embedded router index is only trusted after the stored (atom,
    /// port index) pair matches the handle, so stale and forged handles
    /// return `None` instead of aliasing another port.
    pub fn find_port(&self, handle: PortHandle) -> Option<&Port> {
        self.resolve(handle).map(|slot| &self.ports[slot])
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Number of connection records ever created, including deactivated
    /// ones. Count live edges via `connections().filter(|c| c.active)`.
    pub fn connection_count(&self) -> usize {
        self.connection_table.len()
    }

    /// Number of distinct atoms that have registered at least one port.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Sum of per-edge routed-packet counts.
    pub fn total_packets_routed(&self) -> u64 {
        self.total_packets_routed
    }

    pub fn total_delivery_failures(&self) -> u64 {
        self.total_delivery_failures
    }

    /// Snapshot of one connection with endpoints resolved to handles.
    pub fn connection_info(&self, index: usize) -> Option<ConnectionInfo> {
        let conn = self.connection_table.get(index)?;
        Some(ConnectionInfo {
            index,
            src: self.ports[conn.src_port].handle,
            dst: self.ports[conn.dst_port].handle,
            active: conn.active,
            packets_routed: conn.packets_routed,
            delivery_failures: conn.delivery_failures,
        })
    }

    /// Snapshots of the whole connection table, inactive records included.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionInfo> + '_ {
        self.connection_table
            .iter()
            .enumerate()
            .map(|(index, conn)| ConnectionInfo {
                index,
                src: self.ports[conn.src_port].handle,
                dst: self.ports[conn.dst_port].handle,
                active: conn.active,
                packets_routed: conn.packets_routed,
                delivery_failures: conn.delivery_failures,
            })
    }

    /// Export the live atom graph: one node per atom, one edge per active
    /// connection, weighted by its connection-table index.
    pub fn topology_graph(&self) -> DiGraph<AtomId, usize> {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<AtomId, NodeIndex> = HashMap::new();
        for &atom in &self.atoms {
            nodes.insert(atom, graph.add_node(atom));
        }
        for (i, conn) in self.connection_table.iter().enumerate() {
            if !conn.active {
                continue;
            }
            let src_atom = self.ports[conn.src_port].handle.atom;
            let dst_atom = self.ports[conn.dst_port].handle.atom;
            if let (Some(&a), Some(&b)) = (nodes.get(&src_atom), nodes.get(&dst_atom)) {
                graph.add_edge(a, b, i);
            }
        }
        graph
    }

    /// Human-readable overview: counts, every port, every active connection.
    pub fn dump_topology(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "PacketRouter Topology:");
        let _ = writeln!(out, "  Atoms: {}", self.atoms.len());
        let _ = writeln!(out, "  Ports: {}", self.ports.len());
        let _ = writeln!(out, "  Connections: {}", self.connection_table.len());
        let _ = writeln!(out);

        let _ = writeln!(out, "Ports:");
        for (i, port) in self.ports.iter().enumerate() {
            let _ = writeln!(
                out,
                "  [{}] {} {} port={} vd={} credits={} out={} in={}",
                i,
                port.handle.direction.tag(),
                port.handle.atom,
                port.handle.port_index,
                port.descriptor,
                port.credits_available,
                port.outgoing.len(),
                port.incoming.len()
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Connections:");
        for (i, conn) in self.connection_table.iter().enumerate() {
            if !conn.active {
                continue;
            }
            let _ = writeln!(
                out,
                "  [{}] port {} -> port {} (routed: {} packets)",
                i, conn.src_port, conn.dst_port, conn.packets_routed
            );
        }

        out
    }

    /// Credit counters for every port.
    pub fn dump_port_status(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "PacketRouter Port Status:");
        for (i, port) in self.ports.iter().enumerate() {
            let _ = writeln!(
                out,
                "  Port {}: credits={} requested={} acked={}",
                i, port.credits_available, port.credits_requested, port.credits_acked
            );
        }
        out
    }

    /// Every connection record, active or not.
    pub fn dump_connection_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "PacketRouter Connection Table:");
        for (i, conn) in self.connection_table.iter().enumerate() {
            let active_str = if conn.active { "active" } else { "inactive" };
            if conn.delivery_failures > 0 {
                let _ = writeln!(
                    out,
                    "  [{}] {} -> {} ({}, routed={}, failures={})",
                    i, conn.src_port, conn.dst_port, active_str, conn.packets_routed,
                    conn.delivery_failures
                );
            } else {
                let _ = writeln!(
                    out,
                    "  [{}] {} -> {} ({}, routed={})",
                    i, conn.src_port, conn.dst_port, active_str, conn.packets_routed
                );
            }
        }
        out
    }

    fn resolve(&self, handle: PortHandle) -> Option<usize> {
        if handle.router_index < 0 {
            return None;
        }
        let slot = handle.router_index as usize;
        let port = self.ports.get(slot)?;
        if port.handle.atom != handle.atom || port.handle.port_index != handle.port_index {
            return None;
        }
        Some(slot)
    }

    fn validate_connection(&self, src: PortHandle, dst: PortHandle) -> Result<(usize, usize)> {
        if !src.is_valid() {
            return Err(RouterError::InvalidConnection(
                "Invalid source port handle".to_string(),
            ));
        }
        if !dst.is_valid() {
            return Err(RouterError::InvalidConnection(
                "Invalid destination port handle".to_string(),
            ));
        }
        if src.direction != Direction::Source {
            return Err(RouterError::InvalidConnection(
                "Source port must have Source direction".to_string(),
            ));
        }
        if dst.direction != Direction::Sink {
            return Err(RouterError::InvalidConnection(
                "Destination port must have Sink direction".to_string(),
            ));
        }
        let src_slot = self.resolve(src).ok_or_else(|| {
            RouterError::InvalidConnection("Source port not found in router".to_string())
        })?;
        let dst_slot = self.resolve(dst).ok_or_else(|| {
            RouterError::InvalidConnection("Destination port not found in router".to_string())
        })?;
        Ok((src_slot, dst_slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::{ChannelDesc, Realm, ValueClass};

    fn audio_vd() -> ValueDescriptor {
        ValueDescriptor::single(ChannelDesc::new(Realm::Center, ValueClass::Audio))
    }

    fn router_with_pair() -> (PacketRouter, PortHandle, PortHandle) {
        let mut router = PacketRouter::new();
        let src = router
            .register_port(AtomId(1), Direction::Source, 0, audio_vd(), Metadata::new())
            .unwrap();
        let dst = router
            .register_port(AtomId(2), Direction::Sink, 0, audio_vd(), Metadata::new())
            .unwrap();
        (router, src, dst)
    }

    #[test]
    fn test_register_assigns_monotonic_router_indices() {
        let mut router = PacketRouter::new();
        for i in 0..4 {
            let handle = router
                .register_port(AtomId(1), Direction::Source, i, audio_vd(), Metadata::new())
                .unwrap();
            assert_eq!(handle.router_index(), i64::from(i));
        }
        assert_eq!(router.port_count(), 4);
        assert_eq!(router.atom_count(), 1);
    }

    #[test]
    fn test_register_rejects_bad_arguments() {
        let mut router = PacketRouter::new();
        assert!(matches!(
            router.register_port(
                AtomId::INVALID,
                Direction::Source,
                0,
                audio_vd(),
                Metadata::new()
            ),
            Err(RouterError::InvalidArgument(_))
        ));
        assert!(matches!(
            router.register_port(AtomId(1), Direction::Source, -1, audio_vd(), Metadata::new()),
            Err(RouterError::InvalidArgument(_))
        ));
        assert!(matches!(
            router.register_port(
                AtomId(1),
                Direction::Source,
                0,
                ValueDescriptor::empty(),
                Metadata::new()
            ),
            Err(RouterError::InvalidArgument(_))
        ));
        assert_eq!(router.port_count(), 0);
    }

    #[test]
    fn test_connect_validation_order_and_messages() {
        let (mut router, src, dst) = router_with_pair();

        let err = router
            .connect(PortHandle::invalid(), dst, Metadata::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection rejected: Invalid source port handle"
        );

        let err = router
            .connect(src, PortHandle::invalid(), Metadata::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection rejected: Invalid destination port handle"
        );

        // Both handles structurally fine, but swapped roles: the source
        // direction check fires first.
        let err = router.connect(dst, src, Metadata::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection rejected: Source port must have Source direction"
        );

        let src2 = PortHandle::new(AtomId(1), 0, Direction::Source, 1);
        let err = router.connect(src, src2, Metadata::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection rejected: Destination port must have Sink direction"
        );

        // Stale handle: plausible fields, wrong slot contents.
        let stale = PortHandle::new(AtomId(9), 4, Direction::Source, 0);
        let err = router.connect(stale, dst, Metadata::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection rejected: Source port not found in router"
        );

        let stale_dst = PortHandle::new(AtomId(9), 4, Direction::Sink, 1);
        let err = router.connect(src, stale_dst, Metadata::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection rejected: Destination port not found in router"
        );

        assert_eq!(router.connection_count(), 0);
    }

    #[test]
    fn test_connect_appends_duplicate_edges() {
        let (mut router, src, dst) = router_with_pair();
        assert_eq!(router.connect(src, dst, Metadata::new()).unwrap(), 0);
        assert_eq!(router.connect(src, dst, Metadata::new()).unwrap(), 1);
        assert_eq!(router.connection_count(), 2);
        assert_eq!(router.find_port(src).unwrap().outgoing(), &[0, 1]);
        assert_eq!(router.find_port(dst).unwrap().incoming(), &[0, 1]);
    }

    #[test]
    fn test_find_port_double_checks_slot_contents() {
        let (router, src, _dst) = router_with_pair();

        // Right slot, wrong atom.
        let forged = PortHandle::new(AtomId(42), src.port_index(), src.direction(), src.router_index());
        assert!(router.find_port(forged).is_none());

        // Right atom, wrong port index.
        let forged = PortHandle::new(src.atom(), 7, src.direction(), src.router_index());
        assert!(router.find_port(forged).is_none());

        // Out of range.
        let forged = PortHandle::new(src.atom(), src.port_index(), src.direction(), 99);
        assert!(router.find_port(forged).is_none());

        assert!(router.find_port(src).is_some());
    }

    #[test]
    fn test_route_counts_every_outgoing_edge_in_order() {
        let mut router = PacketRouter::new();
        let src = router
            .register_port(AtomId(1), Direction::Source, 0, audio_vd(), Metadata::new())
            .unwrap();
        let dst_a = router
            .register_port(AtomId(2), Direction::Sink, 0, audio_vd(), Metadata::new())
            .unwrap();
        let dst_b = router
            .register_port(AtomId(3), Direction::Sink, 0, audio_vd(), Metadata::new())
            .unwrap();
        let conn_a = router.connect(src, dst_a, Metadata::new()).unwrap();
        let conn_b = router.connect(src, dst_b, Metadata::new()).unwrap();

        for seq in 0..3 {
            assert!(router.route_packet(src, &Packet::new(seq)));
        }

        assert_eq!(router.connection_info(conn_a).unwrap().packets_routed, 3);
        assert_eq!(router.connection_info(conn_b).unwrap().packets_routed, 3);
        assert_eq!(router.total_packets_routed(), 6);
    }

    #[test]
    fn test_route_returns_false_without_side_effects_on_bad_handle() {
        let (mut router, src, dst) = router_with_pair();
        router.connect(src, dst, Metadata::new()).unwrap();

        assert!(!router.route_packet(PortHandle::invalid(), &Packet::new(0)));
        // Sink port has no outgoing edges.
        assert!(!router.route_packet(dst, &Packet::new(0)));
        assert_eq!(router.total_packets_routed(), 0);
    }

    #[test]
    fn test_disconnect_keeps_record_and_adjacency() {
        let (mut router, src, dst) = router_with_pair();
        let conn = router.connect(src, dst, Metadata::new()).unwrap();

        assert!(router.disconnect(src, dst));
        assert!(!router.connection_info(conn).unwrap().active);
        // Record and adjacency survive deactivation.
        assert_eq!(router.connection_count(), 1);
        assert_eq!(router.find_port(src).unwrap().outgoing(), &[conn]);

        // Second disconnect finds nothing active.
        assert!(!router.disconnect(src, dst));
    }

    #[test]
    fn test_route_still_counts_deactivated_edges() {
        let (mut router, src, dst) = router_with_pair();
        let conn = router.connect(src, dst, Metadata::new()).unwrap();
        router.route_packet(src, &Packet::new(0));
        router.disconnect(src, dst);
        router.route_packet(src, &Packet::new(1));

        let info = router.connection_info(conn).unwrap();
        assert!(!info.active);
        assert_eq!(info.packets_routed, 2);
    }

    #[test]
    fn test_disconnect_deactivates_first_active_duplicate_only() {
        let (mut router, src, dst) = router_with_pair();
        let first = router.connect(src, dst, Metadata::new()).unwrap();
        let second = router.connect(src, dst, Metadata::new()).unwrap();

        assert!(router.disconnect(src, dst));
        assert!(!router.connection_info(first).unwrap().active);
        assert!(router.connection_info(second).unwrap().active);

        assert!(router.disconnect(src, dst));
        assert!(!router.connection_info(second).unwrap().active);
    }

    #[test]
    fn test_credit_flow_grant_and_replenish() {
        let (mut router, src, _dst) = router_with_pair();

        assert_eq!(router.available_credits(src), 1);
        assert_eq!(router.request_credits(src, 5), 1);
        assert_eq!(router.available_credits(src), 0);
        assert_eq!(router.request_credits(src, 2), 0);

        router.ack_credits(src, 3);
        assert_eq!(router.available_credits(src), 3);
        assert_eq!(router.request_credits(src, 2), 2);
        assert_eq!(router.available_credits(src), 1);

        let port = router.find_port(src).unwrap();
        assert_eq!(port.credits_requested(), 9);
        assert_eq!(port.credits_acked(), 3);
    }

    #[test]
    fn test_credit_ops_ignore_unresolvable_handles() {
        let (mut router, src, _dst) = router_with_pair();
        assert_eq!(router.request_credits(PortHandle::invalid(), 5), 0);
        router.ack_credits(PortHandle::invalid(), 5);
        assert_eq!(router.available_credits(PortHandle::invalid()), 0);
        // Untouched.
        assert_eq!(router.available_credits(src), 1);
    }

    #[test]
    fn test_record_delivery_failure() {
        let (mut router, src, dst) = router_with_pair();
        let conn = router.connect(src, dst, Metadata::new()).unwrap();

        assert!(router.record_delivery_failure(conn));
        assert!(router.record_delivery_failure(conn));
        assert!(!router.record_delivery_failure(99));

        assert_eq!(router.total_delivery_failures(), 2);
        assert_eq!(router.connection_info(conn).unwrap().delivery_failures, 2);
    }

    #[test]
    fn test_topology_graph_tracks_active_edges() {
        let mut router = PacketRouter::new();
        let src = router
            .register_port(AtomId(1), Direction::Source, 0, audio_vd(), Metadata::new())
            .unwrap();
        let dst_a = router
            .register_port(AtomId(2), Direction::Sink, 0, audio_vd(), Metadata::new())
            .unwrap();
        let dst_b = router
            .register_port(AtomId(3), Direction::Sink, 0, audio_vd(), Metadata::new())
            .unwrap();
        router.connect(src, dst_a, Metadata::new()).unwrap();
        router.connect(src, dst_b, Metadata::new()).unwrap();

        let graph = router.topology_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        router.disconnect(src, dst_a);
        let graph = router.topology_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_dump_topology_lists_only_active_connections() {
        let (mut router, src, dst) = router_with_pair();
        router.connect(src, dst, Metadata::new()).unwrap();
        router.route_packet(src, &Packet::new(0));

        let dump = router.dump_topology();
        assert!(dump.contains("PacketRouter Topology:"));
        assert!(dump.contains("  Atoms: 2"));
        assert!(dump.contains("  Ports: 2"));
        assert!(dump.contains("  Connections: 1"));
        assert!(dump.contains("[0] SRC atom#1 port=0 vd=center-audio credits=1 out=1 in=0"));
        assert!(dump.contains("[1] SNK atom#2 port=0 vd=center-audio credits=1 out=0 in=1"));
        assert!(dump.contains("[0] port 0 -> port 1 (routed: 1 packets)"));

        router.disconnect(src, dst);
        let dump = router.dump_topology();
        // Deactivated edges stay in the count but leave the listing.
        assert!(dump.contains("  Connections: 1"));
        assert!(!dump.contains("port 0 -> port 1"));
    }

    #[test]
    fn test_dump_port_status_and_connection_table() {
        let (mut router, src, dst) = router_with_pair();
        let conn = router.connect(src, dst, Metadata::new()).unwrap();
        router.request_credits(src, 4);
        router.ack_credits(src, 2);
        router.route_packet(src, &Packet::new(0));
        router.record_delivery_failure(conn);

        let status = router.dump_port_status();
        assert!(status.contains("PacketRouter Port Status:"));
        assert!(status.contains("  Port 0: credits=2 requested=4 acked=2"));
        assert!(status.contains("  Port 1: credits=1 requested=0 acked=0"));

        let table = router.dump_connection_table();
        assert!(table.contains("PacketRouter Connection Table:"));
        assert!(table.contains("  [0] 0 -> 1 (active, routed=1, failures=1)"));

        router.disconnect(src, dst);
        assert!(router
            .dump_connection_table()
            .contains("(inactive, routed=1, failures=1)"));
    }
}
