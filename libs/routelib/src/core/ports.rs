//! Port records and per-port credit accounting.

use crate::core::descriptors::ValueDescriptor;
use crate::core::handles::PortHandle;

/// Ordered string-keyed metadata attached to ports and connections.
///
/// Backed by `serde_json::Map` with `preserve_order`, so keys serialize in
/// insertion order.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Every port starts with this many credits available.
pub const DEFAULT_PORT_CREDITS: u32 = 1;

/// A registered port: identity, value type, adjacency, and credit counters.
///
/// `credits_available` is the spendable balance. `credits_requested` and
/// `credits_acked` are monotonic tallies of total demand and total
/// replenishment; together with the routed-packet counters they make the
/// flow auditable after the fact.
#[derive(Debug, Clone)]
pub struct Port {
    pub(crate) handle: PortHandle,
    pub(crate) descriptor: ValueDescriptor,
    pub(crate) metadata: Metadata,
    /// Connection-table indices where this port is the source.
    pub(crate) outgoing: Vec<usize>,
    /// Connection-table indices where this port is the destination.
    pub(crate) incoming: Vec<usize>,
    pub(crate) credits_available: u32,
    pub(crate) credits_requested: u64,
    pub(crate) credits_acked: u64,
}

impl Port {
    pub(crate) fn new(handle: PortHandle, descriptor: ValueDescriptor, metadata: Metadata) -> Self {
        Self {
            handle,
            descriptor,
            metadata,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            credits_available: DEFAULT_PORT_CREDITS,
            credits_requested: 0,
            credits_acked: 0,
        }
    }

    pub fn handle(&self) -> PortHandle {
        self.handle
    }

    pub fn descriptor(&self) -> &ValueDescriptor {
        &self.descriptor
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Connection-table indices fanning out of this port.
    pub fn outgoing(&self) -> &[usize] {
        &self.outgoing
    }

    /// Connection-table indices fanning into this port.
    pub fn incoming(&self) -> &[usize] {
        &self.incoming
    }

    pub fn credits_available(&self) -> u32 {
        self.credits_available
    }

    pub fn credits_requested(&self) -> u64 {
        self.credits_requested
    }

    pub fn credits_acked(&self) -> u64 {
        self.credits_acked
    }

    /// Grant up to `requested` credits from the available balance.
    ///
    /// The requested tally always grows by the full demand, granted or not,
    /// so unmet demand stays visible.
    pub(crate) fn request_credits(&mut self, requested: u32) -> u32 {
        let granted = requested.min(self.credits_available);
        self.credits_requested += u64::from(requested);
        self.credits_available -= granted;
        granted
    }

    /// Return `count` credits to the available balance.
    pub(crate) fn ack_credits(&mut self, count: u32) {
        self.credits_acked += u64::from(count);
        self.credits_available += count;
    }
}
