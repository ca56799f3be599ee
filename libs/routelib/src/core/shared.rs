// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! SharedRouter - thread-safe handle to a PacketRouter.

use crate::core::connection::ConnectionInfo;
use crate::core::descriptors::ValueDescriptor;
use crate::core::error::Result;
use crate::core::handles::{AtomId, Direction, PortHandle};
use crate::core::packet::Packet;
use crate::core::ports::Metadata;
use crate::core::router::PacketRouter;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cheaply clonable, thread-safe wrapper around a [`PacketRouter`].
///
/// All clones share one router behind a single coarse mutex; every call
/// locks for its duration, so each operation is atomic with respect to the
/// others. Fine-grained locking is deliberately not attempted here.
#[derive(Clone)]
pub struct SharedRouter {
    inner: Arc<Mutex<PacketRouter>>,
}

impl SharedRouter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PacketRouter::new())),
        }
    }

    /// Wrap an already-populated router.
    pub fn from_router(router: PacketRouter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(router)),
        }
    }

    pub fn register_port(
        &self,
        atom: AtomId,
        direction: Direction,
        port_index: i32,
        descriptor: ValueDescriptor,
        metadata: Metadata,
    ) -> Result<PortHandle> {
        self.inner
            .lock()
            .register_port(atom, direction, port_index, descriptor, metadata)
    }

    pub fn connect(&self, src: PortHandle, dst: PortHandle, metadata: Metadata) -> Result<usize> {
        self.inner.lock().connect(src, dst, metadata)
    }

    pub fn disconnect(&self, src: PortHandle, dst: PortHandle) -> bool {
        self.inner.lock().disconnect(src, dst)
    }

    pub fn route_packet(&self, src: PortHandle, packet: &Packet) -> bool {
        self.inner.lock().route_packet(src, packet)
    }

    pub fn record_delivery_failure(&self, connection_index: usize) -> bool {
        self.inner.lock().record_delivery_failure(connection_index)
    }

    pub fn request_credits(&self, port: PortHandle, requested: u32) -> u32 {
        self.inner.lock().request_credits(port, requested)
    }

    pub fn ack_credits(&self, port: PortHandle, count: u32) {
        self.inner.lock().ack_credits(port, count)
    }

    pub fn available_credits(&self, port: PortHandle) -> u32 {
        self.inner.lock().available_credits(port)
    }

    pub fn port_count(&self) -> usize {
        self.inner.lock().port_count()
    }

    pub fn connection_count(&self) -> usize {
        self.inner.lock().connection_count()
    }

    pub fn atom_count(&self) -> usize {
        self.inner.lock().atom_count()
    }

    pub fn total_packets_routed(&self) -> u64 {
        self.inner.lock().total_packets_routed()
    }

    pub fn total_delivery_failures(&self) -> u64 {
        self.inner.lock().total_delivery_failures()
    }

    pub fn connection_info(&self, index: usize) -> Option<ConnectionInfo> {
        self.inner.lock().connection_info(index)
    }

    /// Snapshot of the whole connection table.
    pub fn connection_infos(&self) -> Vec<ConnectionInfo> {
        self.inner.lock().connections().collect()
    }

    pub fn dump_topology(&self) -> String {
        self.inner.lock().dump_topology()
    }

    pub fn dump_port_status(&self) -> String {
        self.inner.lock().dump_port_status()
    }

    pub fn dump_connection_table(&self) -> String {
        self.inner.lock().dump_connection_table()
    }
}

impl Default for SharedRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::{ChannelDesc, Realm, ValueClass};

    fn audio_vd() -> ValueDescriptor {
        ValueDescriptor::single(ChannelDesc::new(Realm::Center, ValueClass::Audio))
    }

    #[test]
    fn test_shared_router_creation() {
        let router = SharedRouter::new();
        assert_eq!(router.port_count(), 0);
        assert_eq!(router.connection_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let router = SharedRouter::new();
        let clone = router.clone();

        clone
            .register_port(AtomId(1), Direction::Source, 0, audio_vd(), Metadata::new())
            .unwrap();
        assert_eq!(router.port_count(), 1);
    }

    #[test]
    fn test_concurrent_routing_accounts_every_packet() {
        let router = SharedRouter::new();
        let src = router
            .register_port(AtomId(1), Direction::Source, 0, audio_vd(), Metadata::new())
            .unwrap();
        let dst = router
            .register_port(AtomId(2), Direction::Sink, 0, audio_vd(), Metadata::new())
            .unwrap();
        let conn = router.connect(src, dst, Metadata::new()).unwrap();

        let threads: Vec<_> = (0..4)
            .map(|t| {
                let router = router.clone();
                std::thread::spawn(move || {
                    for seq in 0..250 {
                        assert!(router.route_packet(src, &Packet::new(t * 1000 + seq)));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(router.total_packets_routed(), 1000);
        assert_eq!(router.connection_info(conn).unwrap().packets_routed, 1000);
    }
}
