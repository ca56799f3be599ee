//! Atom and Port Handle Types
//!
//! Handles provide stable references to ports after they've been registered
//! with a router. A handle carries enough identity (atom, per-direction port
//! index, direction) for the router to double-check it against its own table
//! before trusting the embedded router index.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an atom participating in a net.
///
/// Ids are issued by [`AtomRegistry`](crate::core::atom::AtomRegistry) and are
/// never reused within a registry. The zero value is reserved as the invalid
/// sentinel.
///
/// # Example
///
/// ```ignore
/// let mut atoms = AtomRegistry::new();
/// let generator = atoms.issue("audio.generator");
/// assert!(generator.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub(crate) u64);

impl AtomId {
    /// The invalid sentinel id. Never issued by a registry.
    pub const INVALID: AtomId = AtomId(0);

    /// Whether this id was issued by a registry.
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Raw numeric value, for diagnostics.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom#{}", self.0)
    }
}

/// Which way packets flow through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The port emits packets into connections.
    Source,
    /// The port receives packets from connections.
    Sink,
}

impl Direction {
    /// Short tag used by the diagnostic dumps.
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::Source => "SRC",
            Direction::Sink => "SNK",
        }
    }

    /// The opposite direction.
    pub fn flipped(&self) -> Direction {
        match self {
            Direction::Source => Direction::Sink,
            Direction::Sink => Direction::Source,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Source => write!(f, "source"),
            Direction::Sink => write!(f, "sink"),
        }
    }
}

/// Handle to a port registered with a [`PacketRouter`](crate::core::router::PacketRouter).
///
/// Returned by `register_port()` and used to reference the port in every
/// later call. The handle embeds the router's slot index as a fast path, but
/// the router re-validates the (atom, port index) pair on every lookup, so a
/// stale or forged handle degrades to a failed lookup rather than touching
/// the wrong port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortHandle {
    /// Owning atom.
    pub(crate) atom: AtomId,
    /// Index of the port within the atom, assigned per direction.
    pub(crate) port_index: i32,
    /// Flow direction of the port.
    pub(crate) direction: Direction,
    /// Slot in the router's port table. Negative means unresolved.
    pub(crate) router_index: i64,
}

impl PortHandle {
    pub(crate) fn new(atom: AtomId, port_index: i32, direction: Direction, router_index: i64) -> Self {
        Self {
            atom,
            port_index,
            direction,
            router_index,
        }
    }

    /// A handle that resolves to nothing. Useful for negative tests and as a
    /// placeholder before registration.
    pub fn invalid() -> Self {
        Self {
            atom: AtomId::INVALID,
            port_index: -1,
            direction: Direction::Source,
            router_index: -1,
        }
    }

    /// Whether the handle's fields are structurally plausible. The router
    /// still double-checks against its table before using the slot index.
    pub fn is_valid(&self) -> bool {
        self.atom.is_valid() && self.port_index >= 0 && self.router_index >= 0
    }

    /// Owning atom.
    pub fn atom(&self) -> AtomId {
        self.atom
    }

    /// Per-direction index of the port within its atom.
    pub fn port_index(&self) -> i32 {
        self.port_index
    }

    /// Flow direction of the port.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Slot in the router's port table.
    pub fn router_index(&self) -> i64 {
        self.router_index
    }
}

impl fmt::Display for PortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}{}",
            self.atom,
            self.direction.tag(),
            self.port_index
        )
    }
}
