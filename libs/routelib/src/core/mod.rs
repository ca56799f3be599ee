// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod actions;
pub mod atom;
pub mod connection;
pub mod descriptors;
pub mod error;
pub mod handles;
pub mod net;
pub mod packet;
pub mod ports;
pub mod prelude;
pub mod registry;
pub mod router;
pub mod schema;
pub mod shared;

pub use atom::*;
pub use connection::*;
pub use descriptors::*;
pub use error::*;
pub use handles::*;
pub use net::*;
pub use packet::*;
pub use ports::*;
pub use registry::*;
pub use router::*;
pub use schema::*;
pub use shared::*;
