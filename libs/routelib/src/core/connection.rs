//! Connection records and observable snapshots.

use crate::core::handles::PortHandle;
use crate::core::ports::Metadata;

/// A directed edge in the router's connection table.
///
/// Records are append-only; disconnecting clears `active` but keeps the
/// record and its counters in place, so table indices stay stable for the
/// lifetime of the router.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Port-table index of the source endpoint.
    pub(crate) src_port: usize,
    /// Port-table index of the destination endpoint.
    pub(crate) dst_port: usize,
    /// Routing policy attached at connect time.
    pub(crate) metadata: Metadata,
    pub(crate) active: bool,
    pub(crate) packets_routed: u64,
    pub(crate) delivery_failures: u64,
}

impl Connection {
    pub(crate) fn new(src_port: usize, dst_port: usize, metadata: Metadata) -> Self {
        Self {
            src_port,
            dst_port,
            metadata,
            active: true,
            packets_routed: 0,
            delivery_failures: 0,
        }
    }

    pub fn src_port(&self) -> usize {
        self.src_port
    }

    pub fn dst_port(&self) -> usize {
        self.dst_port
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn packets_routed(&self) -> u64 {
        self.packets_routed
    }

    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures
    }
}

/// Point-in-time view of one connection, with endpoints resolved to handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Position in the connection table.
    pub index: usize,
    pub src: PortHandle,
    pub dst: PortHandle,
    pub active: bool,
    pub packets_routed: u64,
    pub delivery_failures: u64,
}
