// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

// Re-export inventory for macro-generated code
pub use inventory;

pub mod core;

pub use crate::core::prelude;

pub use crate::core::{
    actions,
    atom::{dispatch_packet, Atom, AtomRegistry},
    connection::ConnectionInfo,
    descriptors::{ActionDescriptor, ChannelDesc, Realm, ValueClass, ValueDescriptor},
    error::{Result, RouterError},
    handles::{AtomId, Direction, PortHandle},
    net::{AtomSpec, NetBuilder, RouterNet},
    packet::Packet,
    ports::{Metadata, Port, DEFAULT_PORT_CREDITS},
    registry::{
        global_registry, is_action_registered, list_actions, lookup_action, register_action,
        unregister_action, ActionProvider, ActionRegistration, ActionRegistry,
    },
    router::PacketRouter,
    schema::{AtomEntry, FlowControl, RouterSchema, SchemaConnection, SchemaPort},
    shared::SharedRouter,
};
