// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Commonly used types for `use routelib::prelude::*`.

pub use crate::core::{
    // Errors
    error::{Result, RouterError},

    // Identity and handles
    handles::{AtomId, Direction, PortHandle},

    // Value typing
    descriptors::{ActionDescriptor, ChannelDesc, Realm, ValueClass, ValueDescriptor},

    // Routing
    connection::ConnectionInfo,
    packet::Packet,
    ports::Metadata,
    router::PacketRouter,
    shared::SharedRouter,

    // Atoms and delivery
    atom::{dispatch_packet, Atom, AtomRegistry},

    // Nets and schemas
    net::{NetBuilder, RouterNet},
    registry::{list_actions, lookup_action, register_action},
    schema::{FlowControl, RouterSchema},
};
