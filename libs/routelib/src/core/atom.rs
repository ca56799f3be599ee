//! Atom identity and the delivery-side boundary.
//!
//! Atoms are the endpoints of the fabric. The router only ever sees their
//! ids; everything behavioral lives behind the [`Atom`] trait, which the
//! dispatch layer drives when packets actually change hands.

use crate::core::error::Result;
use crate::core::handles::{AtomId, PortHandle};
use crate::core::packet::Packet;
use crate::core::router::PacketRouter;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Issues [`AtomId`]s and keeps a diagnostic label per atom.
///
/// Ids are never reused; the zero id stays reserved as the invalid
/// sentinel.
#[derive(Debug, Default)]
pub struct AtomRegistry {
    next_id: u64,
    labels: HashMap<AtomId, String>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh id under the given label.
    pub fn issue(&mut self, label: impl Into<String>) -> AtomId {
        self.next_id += 1;
        let id = AtomId(self.next_id);
        self.labels.insert(id, label.into());
        id
    }

    pub fn label(&self, id: AtomId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.labels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Behavior contract for an atom participating in a net.
///
/// The router never calls these hooks itself; they belong to the layers
/// that drive delivery, such as [`dispatch_packet`].
pub trait Atom {
    /// The registry-issued identity of this atom.
    fn id(&self) -> AtomId;

    /// Register this atom's ports with the router. Returns the handles in
    /// declaration order.
    fn register_ports(&mut self, router: &mut PacketRouter) -> Result<Vec<PortHandle>>;

    /// Notification that one of this atom's sink ports has a packet
    /// waiting. Called after a successful delivery.
    fn on_port_ready(&mut self, _port: PortHandle) {}

    /// Delivery hook: accept a packet arriving on one of this atom's sink
    /// ports. Returning false rejects the packet, which the dispatch layer
    /// records as a delivery failure.
    fn emit_packet(&mut self, _port: PortHandle, _packet: &Packet) -> bool {
        true
    }
}

/// Route a packet and hand it to the connected sink atoms.
///
/// First accounts the packet through [`PacketRouter::route_packet`], then
/// walks the source port's **active** outgoing connections and offers the
/// packet to the matching atom in `atoms` via [`Atom::emit_packet`]. A
/// missing atom or a rejecting hook is recorded against the connection as a
/// delivery failure. Returns the number of successful deliveries.
pub fn dispatch_packet(
    router: &mut PacketRouter,
    src: PortHandle,
    packet: &Packet,
    atoms: &mut [&mut dyn Atom],
) -> usize {
    if !router.route_packet(src, packet) {
        return 0;
    }

    // Snapshot the live edges before handing out mutable borrows.
    let targets: Vec<(usize, PortHandle)> = match router.find_port(src) {
        Some(port) => port
            .outgoing()
            .iter()
            .filter_map(|&i| router.connection_info(i))
            .filter(|info| info.active)
            .map(|info| (info.index, info.dst))
            .collect(),
        None => return 0,
    };

    let mut delivered = 0;
    for (conn_index, dst) in targets {
        let Some(atom) = atoms.iter_mut().find(|a| a.id() == dst.atom()) else {
            warn!(
                "No atom {} present for delivery over connection {}",
                dst.atom(),
                conn_index
            );
            router.record_delivery_failure(conn_index);
            continue;
        };

        if atom.emit_packet(dst, packet) {
            atom.on_port_ready(dst);
            delivered += 1;
        } else {
            debug!(
                "Atom {} rejected packet {} on {}",
                dst.atom(),
                packet.seq,
                dst
            );
            router.record_delivery_failure(conn_index);
        }
    }

    delivered
}
