// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Building nets: from named atoms and declared ports to a live router.
//!
//! [`NetBuilder`] accumulates a description. Actions are resolved against
//! the global action registry when ports are declared, so each port picks
//! up its value descriptor from the action's channel list. [`build`]
//! realizes the description: atom ids are issued, ports registered,
//! connections made, and every port topped up to the configured credit
//! budget.
//!
//! [`build`]: NetBuilder::build

use crate::core::atom::AtomRegistry;
use crate::core::descriptors::ValueDescriptor;
use crate::core::error::{Result, RouterError};
use crate::core::handles::{AtomId, Direction, PortHandle};
use crate::core::ports::Metadata;
use crate::core::registry::lookup_action;
use crate::core::router::PacketRouter;
use crate::core::schema::{AtomEntry, FlowControl, RouterSchema, SchemaConnection, SchemaPort};
use std::collections::HashMap;
use tracing::info;

/// A declared port of an atom under construction.
#[derive(Debug, Clone)]
struct PortSpec {
    name: String,
    direction: Direction,
    index: i32,
    descriptor: ValueDescriptor,
    metadata: Metadata,
}

/// An atom under construction: id, action, instance args, declared ports.
#[derive(Debug, Clone)]
pub struct AtomSpec {
    id: String,
    action: String,
    args: Metadata,
    ports: Vec<PortSpec>,
}

impl AtomSpec {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn args(&self) -> &Metadata {
        &self.args
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    fn next_index(&self, direction: Direction) -> i32 {
        self.ports.iter().filter(|p| p.direction == direction).count() as i32
    }

    fn port(&self, direction: Direction, index: i32) -> Option<&PortSpec> {
        self.ports
            .iter()
            .find(|p| p.direction == direction && p.index == index)
    }
}

/// Accumulates a net description and realizes it into a [`RouterNet`].
#[derive(Debug, Default)]
pub struct NetBuilder {
    name: String,
    atoms: Vec<AtomSpec>,
    atom_lookup: HashMap<String, usize>,
    connections: Vec<SchemaConnection>,
    flow_control: FlowControl,
}

impl NetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }

    /// Declare an atom under a unique id, implemented by the named action.
    ///
    /// The action is looked up lazily when ports are declared, not here.
    pub fn add_atom(&mut self, id: impl Into<String>, action: impl Into<String>) -> Result<()> {
        let id = id.into();
        if self.atom_lookup.contains_key(&id) {
            return Err(RouterError::DuplicateAtom(id));
        }
        self.atom_lookup.insert(id.clone(), self.atoms.len());
        self.atoms.push(AtomSpec {
            id,
            action: action.into(),
            args: Metadata::new(),
            ports: Vec::new(),
        });
        Ok(())
    }

    /// Set an instance argument on a declared atom.
    pub fn set_arg(
        &mut self,
        atom: &str,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<()> {
        let spec = self.atom_mut(atom)?;
        spec.args.insert(key.into(), value);
        Ok(())
    }

    /// Declare the next port of `direction` on an atom and return its
    /// per-direction index.
    ///
    /// The atom's action must be registered and must declare a channel at
    /// that index on the matching side; the channel supplies the port's
    /// value descriptor and its `optional`/`vd`/`vd_name` metadata.
    pub fn add_port(
        &mut self,
        atom: &str,
        direction: Direction,
        name: impl Into<String>,
    ) -> Result<i32> {
        let slot = self.atom_slot(atom)?;
        let action_name = self.atoms[slot].action.clone();
        let action = lookup_action(&action_name)
            .ok_or_else(|| RouterError::ActionNotFound(action_name.clone()))?;

        let index = self.atoms[slot].next_index(direction);
        let channel = action.channel(direction, index as usize).ok_or_else(|| {
            RouterError::Configuration(format!(
                "action '{}' declares no {} channel at index {}",
                action_name, direction, index
            ))
        })?;

        let mut metadata = Metadata::new();
        metadata.insert("optional".to_string(), channel.optional.into());
        metadata.insert("vd".to_string(), channel.compact_name().into());
        metadata.insert("vd_name".to_string(), channel.qualified_name().into());

        self.atoms[slot].ports.push(PortSpec {
            name: name.into(),
            direction,
            index,
            descriptor: ValueDescriptor::single(*channel),
            metadata,
        });
        Ok(index)
    }

    /// Connect a declared source port to a declared sink port. Returns the
    /// connection's index. The edge is stamped with the flow-control policy
    /// and credit budget.
    pub fn connect(
        &mut self,
        from_atom: &str,
        from_port: i32,
        to_atom: &str,
        to_port: i32,
    ) -> Result<usize> {
        let from = self.atom_ref(from_atom)?;
        from.port(Direction::Source, from_port).ok_or_else(|| {
            RouterError::PortNotFound(format!(
                "atom '{}' has no source port {}",
                from_atom, from_port
            ))
        })?;
        let to = self.atom_ref(to_atom)?;
        to.port(Direction::Sink, to_port).ok_or_else(|| {
            RouterError::PortNotFound(format!("atom '{}' has no sink port {}", to_atom, to_port))
        })?;

        let mut metadata = Metadata::new();
        metadata.insert("policy".to_string(), self.flow_control.policy.clone().into());
        metadata.insert("credits".to_string(), self.flow_control.credits_per_port.into());

        let index = self.connections.len();
        self.connections.push(SchemaConnection {
            from_atom: from_atom.to_string(),
            from_port,
            to_atom: to_atom.to_string(),
            to_port,
            metadata,
        });
        Ok(index)
    }

    pub fn atom(&self, id: &str) -> Option<&AtomSpec> {
        self.atom_lookup.get(id).map(|&slot| &self.atoms[slot])
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Snapshot the current description as a persistable schema.
    pub fn schema(&self) -> RouterSchema {
        let atoms = self
            .atoms
            .iter()
            .map(|spec| AtomEntry {
                id: spec.id.clone(),
                action: spec.action.clone(),
            })
            .collect();

        let ports = self
            .atoms
            .iter()
            .flat_map(|spec| {
                spec.ports.iter().map(|port| SchemaPort {
                    atom: spec.id.clone(),
                    name: port.name.clone(),
                    direction: port.direction,
                    index: port.index,
                    vd: port.descriptor.to_string(),
                    metadata: port.metadata.clone(),
                })
            })
            .collect();

        RouterSchema {
            name: self.name.clone(),
            atoms,
            ports,
            connections: self.connections.clone(),
            flow_control: self.flow_control.clone(),
        }
    }

    /// Rebuild a builder from a schema.
    ///
    /// Schema ports carry their descriptor strings, so this path does not
    /// consult the action registry; actions only need to be registered when
    /// ports are declared through [`add_port`](Self::add_port).
    pub fn from_schema(schema: &RouterSchema) -> Result<Self> {
        schema.validate()?;

        let mut builder = Self::new(schema.name.clone()).with_flow_control(schema.flow_control.clone());
        for atom in &schema.atoms {
            builder.add_atom(&atom.id, &atom.action)?;
        }

        for port in &schema.ports {
            let descriptor: ValueDescriptor = port.vd.parse().map_err(|e: RouterError| {
                RouterError::Schema(format!(
                    "Port '{}' of atom '{}' has invalid descriptor '{}': {}",
                    port.name, port.atom, port.vd, e
                ))
            })?;
            let slot = builder.atom_slot(&port.atom)?;
            builder.atoms[slot].ports.push(PortSpec {
                name: port.name.clone(),
                direction: port.direction,
                index: port.index,
                descriptor,
                metadata: port.metadata.clone(),
            });
        }

        builder.connections = schema.connections.clone();
        Ok(builder)
    }

    /// Realize the description into a live net.
    ///
    /// Issues an id per atom, registers every declared port, makes every
    /// connection, then tops each port up to `credits_per_port` through the
    /// ack path so the extra grants show in the acked tally.
    pub fn build(self) -> Result<RouterNet> {
        if self.flow_control.credits_per_port == 0 {
            return Err(RouterError::Configuration(
                "flow_control.credits_per_port must be at least 1".to_string(),
            ));
        }

        let schema = self.schema();
        let mut registry = AtomRegistry::new();
        let mut router = PacketRouter::new();
        let mut atom_ids: HashMap<String, AtomId> = HashMap::new();
        let mut handles: HashMap<(String, Direction, i32), PortHandle> = HashMap::new();

        for spec in &self.atoms {
            let id = registry.issue(&spec.id);
            atom_ids.insert(spec.id.clone(), id);
            for port in &spec.ports {
                let handle = router.register_port(
                    id,
                    port.direction,
                    port.index,
                    port.descriptor.clone(),
                    port.metadata.clone(),
                )?;
                handles.insert((spec.id.clone(), port.direction, port.index), handle);
            }
        }

        for conn in &self.connections {
            let src = handles
                .get(&(conn.from_atom.clone(), Direction::Source, conn.from_port))
                .copied()
                .ok_or_else(|| {
                    RouterError::PortNotFound(format!(
                        "atom '{}' has no source port {}",
                        conn.from_atom, conn.from_port
                    ))
                })?;
            let dst = handles
                .get(&(conn.to_atom.clone(), Direction::Sink, conn.to_port))
                .copied()
                .ok_or_else(|| {
                    RouterError::PortNotFound(format!(
                        "atom '{}' has no sink port {}",
                        conn.to_atom, conn.to_port
                    ))
                })?;
            router.connect(src, dst, conn.metadata.clone())?;
        }

        let top_up = self.flow_control.credits_per_port - 1;
        if top_up > 0 {
            for handle in handles.values() {
                router.ack_credits(*handle, top_up);
            }
        }

        info!(
            "Built net '{}': {} atoms, {} ports, {} connections",
            self.name,
            router.atom_count(),
            router.port_count(),
            router.connection_count()
        );

        Ok(RouterNet {
            name: self.name,
            router,
            schema,
            atoms: registry,
            atom_ids,
            handles,
        })
    }

    fn atom_slot(&self, id: &str) -> Result<usize> {
        self.atom_lookup
            .get(id)
            .copied()
            .ok_or_else(|| RouterError::AtomNotFound(id.to_string()))
    }

    fn atom_ref(&self, id: &str) -> Result<&AtomSpec> {
        self.atom_slot(id).map(|slot| &self.atoms[slot])
    }

    fn atom_mut(&mut self, id: &str) -> Result<&mut AtomSpec> {
        let slot = self.atom_slot(id)?;
        Ok(&mut self.atoms[slot])
    }
}

/// A realized net: the live router plus the naming context it was built
/// from.
#[derive(Debug)]
pub struct RouterNet {
    name: String,
    router: PacketRouter,
    schema: RouterSchema,
    atoms: AtomRegistry,
    atom_ids: HashMap<String, AtomId>,
    handles: HashMap<(String, Direction, i32), PortHandle>,
}

impl RouterNet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn router(&self) -> &PacketRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut PacketRouter {
        &mut self.router
    }

    /// The schema snapshot taken at build time.
    pub fn schema(&self) -> &RouterSchema {
        &self.schema
    }

    pub fn atom_registry(&self) -> &AtomRegistry {
        &self.atoms
    }

    /// The issued id of a named atom.
    pub fn atom_id(&self, id: &str) -> Option<AtomId> {
        self.atom_ids.get(id).copied()
    }

    /// The handle of a declared port.
    pub fn handle(&self, atom: &str, direction: Direction, index: i32) -> Option<PortHandle> {
        self.handles
            .get(&(atom.to_string(), direction, index))
            .copied()
    }

    /// All source-port handles, ordered by registration.
    pub fn source_handles(&self) -> Vec<PortHandle> {
        self.direction_handles(Direction::Source)
    }

    /// All sink-port handles, ordered by registration.
    pub fn sink_handles(&self) -> Vec<PortHandle> {
        self.direction_handles(Direction::Sink)
    }

    fn direction_handles(&self, direction: Direction) -> Vec<PortHandle> {
        let mut handles: Vec<PortHandle> = self
            .handles
            .iter()
            .filter(|((_, d, _), _)| *d == direction)
            .map(|(_, &h)| h)
            .collect();
        handles.sort_by_key(|h| h.router_index());
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptors::{ActionDescriptor, ChannelDesc, Realm, ValueClass};
    use crate::core::packet::Packet;
    use crate::core::registry::{register_action, unregister_action};
    use serial_test::serial;

    /// The classic three-atom loop: customer orders, generator produces,
    /// sink consumes and receipts back to the customer.
    fn legacy_loop() -> NetBuilder {
        legacy_loop_with(FlowControl::default())
    }

    fn legacy_loop_with(flow_control: FlowControl) -> NetBuilder {
        let mut net = NetBuilder::new("legacy-loop").with_flow_control(flow_control);
        net.add_atom("customer", "center.customer").unwrap();
        net.add_atom("gen", "center.audio.src.test").unwrap();
        net.add_atom("out", "center.audio.sink.test.realtime").unwrap();

        net.add_port("customer", Direction::Sink, "receipt.in").unwrap();
        net.add_port("customer", Direction::Source, "order.out").unwrap();
        net.add_port("gen", Direction::Sink, "order.in").unwrap();
        net.add_port("gen", Direction::Source, "audio.out").unwrap();
        net.add_port("out", Direction::Sink, "audio.in").unwrap();
        net.add_port("out", Direction::Source, "receipt.out").unwrap();

        net.connect("customer", 0, "gen", 0).unwrap();
        net.connect("gen", 0, "out", 0).unwrap();
        net.connect("out", 0, "customer", 0).unwrap();
        net
    }

    #[test]
    fn test_add_atom_rejects_duplicate_id() {
        let mut net = NetBuilder::new("t");
        net.add_atom("gen", "center.audio.src.test").unwrap();
        let err = net.add_atom("gen", "center.customer").unwrap_err();
        assert!(matches!(err, RouterError::DuplicateAtom(_)));
        assert_eq!(net.atom_count(), 1);
    }

    #[test]
    fn test_add_port_takes_descriptor_from_action() {
        let mut net = NetBuilder::new("t");
        net.add_atom("gen", "center.audio.src.dbg_generator").unwrap();

        assert_eq!(net.add_port("gen", Direction::Sink, "order.in").unwrap(), 0);
        assert_eq!(net.add_port("gen", Direction::Source, "audio.out").unwrap(), 0);

        let schema = net.schema();
        let port = schema.port("gen", Direction::Source, 0).unwrap();
        assert_eq!(port.vd, "center-audio");
        assert_eq!(port.metadata["vd"], "center-audio");
        assert_eq!(port.metadata["vd_name"], "center.audio");
        assert_eq!(port.metadata["optional"], false);

        // The generator declares a single source channel.
        let err = net
            .add_port("gen", Direction::Source, "audio.out.2")
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("declares no source channel at index 1"));
    }

    #[test]
    fn test_add_port_unknown_atom_or_action() {
        let mut net = NetBuilder::new("t");
        net.add_atom("x", "no.such.action").unwrap();

        assert!(matches!(
            net.add_port("ghost", Direction::Sink, "in").unwrap_err(),
            RouterError::AtomNotFound(_)
        ));
        assert!(matches!(
            net.add_port("x", Direction::Sink, "in").unwrap_err(),
            RouterError::ActionNotFound(_)
        ));
    }

    #[test]
    fn test_connect_requires_declared_ports() {
        let mut net = NetBuilder::new("t");
        net.add_atom("gen", "center.audio.src.test").unwrap();
        net.add_atom("out", "center.audio.sink.test.realtime").unwrap();

        let err = net.connect("gen", 0, "out", 0).unwrap_err();
        assert!(matches!(err, RouterError::PortNotFound(_)));
        assert!(err.to_string().contains("has no source port 0"));

        net.add_port("gen", Direction::Source, "audio.out").unwrap();
        let err = net.connect("gen", 0, "out", 0).unwrap_err();
        assert!(err.to_string().contains("has no sink port 0"));

        net.add_port("out", Direction::Sink, "audio.in").unwrap();
        assert_eq!(net.connect("gen", 0, "out", 0).unwrap(), 0);

        let schema = net.schema();
        assert_eq!(schema.connections[0].metadata["policy"], "legacy-loop");
        assert_eq!(schema.connections[0].metadata["credits"], 1);
    }

    #[test]
    fn test_set_arg() {
        let mut net = NetBuilder::new("t");
        net.add_atom("gen", "center.audio.src.dbg_generator").unwrap();
        net.set_arg("gen", "rate", serde_json::json!(48000)).unwrap();

        assert_eq!(net.atom("gen").unwrap().args()["rate"], 48000);
        assert!(matches!(
            net.set_arg("ghost", "rate", serde_json::json!(1)).unwrap_err(),
            RouterError::AtomNotFound(_)
        ));
    }

    #[test]
    fn test_build_realizes_the_legacy_loop() {
        let mut built = legacy_loop().build().unwrap();

        assert_eq!(built.name(), "legacy-loop");
        assert_eq!(built.router().atom_count(), 3);
        assert_eq!(built.router().port_count(), 6);
        assert_eq!(built.router().connection_count(), 3);

        let gen_id = built.atom_id("gen").unwrap();
        assert!(gen_id.is_valid());
        assert_eq!(built.atom_registry().label(gen_id), Some("gen"));

        let audio_out = built.handle("gen", Direction::Source, 0).unwrap();
        assert_eq!(audio_out.atom(), gen_id);
        assert!(built.router().find_port(audio_out).is_some());

        assert_eq!(built.source_handles().len(), 3);
        assert_eq!(built.sink_handles().len(), 3);

        assert!(built.router_mut().route_packet(audio_out, &Packet::new(0)));
        assert_eq!(built.router().total_packets_routed(), 1);
    }

    #[test]
    fn test_build_tops_up_credits_via_ack_path() {
        let net = legacy_loop_with(FlowControl {
            policy: "legacy-loop".to_string(),
            credits_per_port: 4,
        });
        let schema = net.schema();
        assert_eq!(schema.connections[0].metadata["credits"], 4);

        let built = net.build().unwrap();
        for handle in built.source_handles().into_iter().chain(built.sink_handles()) {
            assert_eq!(built.router().available_credits(handle), 4);
            assert_eq!(built.router().find_port(handle).unwrap().credits_acked(), 3);
        }
    }

    #[test]
    fn test_build_rejects_zero_credit_budget() {
        let net = legacy_loop_with(FlowControl {
            policy: "legacy-loop".to_string(),
            credits_per_port: 0,
        });
        let err = net.build().unwrap_err();
        assert!(matches!(err, RouterError::Configuration(_)));
        assert!(err.to_string().contains("credits_per_port"));
    }

    #[test]
    fn test_schema_snapshot_realizes_without_registry() {
        let schema = legacy_loop().schema();
        assert_eq!(schema.atoms.len(), 3);
        assert_eq!(schema.ports.len(), 6);
        assert_eq!(schema.connections.len(), 3);

        // from_schema reads descriptors from the ports themselves.
        let rebuilt = NetBuilder::from_schema(&schema).unwrap().build().unwrap();
        assert_eq!(rebuilt.router().port_count(), 6);
        assert_eq!(rebuilt.router().connection_count(), 3);
        assert_eq!(rebuilt.schema(), &schema);
    }

    #[test]
    #[serial]
    fn test_add_port_indexes_count_per_direction() {
        register_action(
            ActionDescriptor::new("test.net.mixer", "two-input test mixer")
                .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Audio))
                .with_sink(ChannelDesc::optional(Realm::Center, ValueClass::Video))
                .with_source(ChannelDesc::new(Realm::Center, ValueClass::Audio)),
        )
        .unwrap();

        let mut net = NetBuilder::new("t");
        net.add_atom("mix", "test.net.mixer").unwrap();
        assert_eq!(net.add_port("mix", Direction::Sink, "audio.in").unwrap(), 0);
        assert_eq!(net.add_port("mix", Direction::Sink, "video.in").unwrap(), 1);
        assert_eq!(net.add_port("mix", Direction::Source, "audio.out").unwrap(), 0);

        let schema = net.schema();
        let video_in = schema.port("mix", Direction::Sink, 1).unwrap();
        assert_eq!(video_in.vd, "center-video");
        assert_eq!(video_in.metadata["optional"], true);

        unregister_action("test.net.mixer");
    }
}
