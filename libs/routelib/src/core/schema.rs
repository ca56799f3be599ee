// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Declarative router schema files (JSON/YAML).
//!
//! A schema is the persisted form of a net: atoms with their actions,
//! fully-described ports, connections, and flow-control settings. Ports
//! carry their resolved value-descriptor string, so realizing a file does
//! not need the action registry.
//!
//! # Example Schema File
//!
//! ```json
//! {
//!   "name": "audio-loop",
//!   "atoms": [
//!     { "id": "gen", "action": "center.audio.src.dbg_generator" },
//!     { "id": "out", "action": "center.audio.sink.test.realtime" }
//!   ],
//!   "ports": [
//!     { "atom": "gen", "name": "audio.out", "direction": "source", "index": 0, "vd": "center-audio" },
//!     { "atom": "out", "name": "audio.in", "direction": "sink", "index": 0, "vd": "center-audio" }
//!   ],
//!   "connections": [
//!     { "from_atom": "gen", "from_port": 0, "to_atom": "out", "to_port": 0 }
//!   ],
//!   "flow_control": { "policy": "legacy-loop", "credits_per_port": 1 }
//! }
//! ```

use crate::core::descriptors::ValueDescriptor;
use crate::core::error::{Result, RouterError};
use crate::core::handles::Direction;
use crate::core::net::{NetBuilder, RouterNet};
use crate::core::ports::Metadata;
use petgraph::Direction as GraphDirection;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Flow-control settings applied when a schema is realized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FlowControl {
    /// Policy tag stamped into every connection's metadata.
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Credits each port holds after realization. Must be at least 1.
    #[serde(default = "default_credits")]
    pub credits_per_port: u32,
}

fn default_policy() -> String {
    "legacy-loop".to_string()
}

fn default_credits() -> u32 {
    1
}

impl Default for FlowControl {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            credits_per_port: default_credits(),
        }
    }
}

/// An atom declaration: stable id plus the action implementing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AtomEntry {
    /// Local id for referencing in ports and connections.
    ///
    /// Must be unique within the schema.
    pub id: String,

    /// Action name (resolved against the action registry when ports are
    /// declared through a builder; informational once ports are described).
    pub action: String,
}

/// A fully-described port of one atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaPort {
    /// Owning atom id.
    pub atom: String,

    /// Human label, e.g. `"audio.out"`. May be empty.
    #[serde(default)]
    pub name: String,

    pub direction: Direction,

    /// Per-direction index within the atom.
    pub index: i32,

    /// Compact value-descriptor string, e.g. `"center-audio"`.
    pub vd: String,

    #[serde(default)]
    pub metadata: Metadata,
}

/// A directed edge between two declared ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaConnection {
    pub from_atom: String,
    /// Source-side per-direction port index on `from_atom`.
    pub from_port: i32,
    pub to_atom: String,
    /// Sink-side per-direction port index on `to_atom`.
    pub to_port: i32,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Complete declarative description of a router net.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouterSchema {
    /// Optional net name for display/logging.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub atoms: Vec<AtomEntry>,

    #[serde(default)]
    pub ports: Vec<SchemaPort>,

    #[serde(default)]
    pub connections: Vec<SchemaConnection>,

    #[serde(default)]
    pub flow_control: FlowControl,
}

enum SchemaFormat {
    Json,
    Yaml,
}

fn format_for(path: &Path) -> Result<SchemaFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(SchemaFormat::Json),
        Some("yaml") | Some("yml") => Ok(SchemaFormat::Yaml),
        other => Err(RouterError::Configuration(format!(
            "Unsupported schema extension '{}' for '{}' (expected .json, .yaml, or .yml)",
            other.unwrap_or(""),
            path.display()
        ))),
    }
}

impl RouterSchema {
    /// Load from a file; the format is chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            RouterError::Configuration(format!(
                "Failed to read schema file '{}': {}",
                path.display(),
                e
            ))
        })?;
        match format {
            SchemaFormat::Json => Self::from_json_str(&content),
            SchemaFormat::Yaml => Self::from_yaml_str(&content),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RouterError::Schema(format!("Failed to parse schema JSON: {}", e)))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| RouterError::Schema(format!("Failed to parse schema YAML: {}", e)))
    }

    /// Write to a file; the format is chosen by extension.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = match format_for(path)? {
            SchemaFormat::Json => self.to_json_string()?,
            SchemaFormat::Yaml => self.to_yaml_string()?,
        };
        std::fs::write(path, content).map_err(|e| {
            RouterError::Configuration(format!(
                "Failed to write schema file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RouterError::Schema(format!("Failed to serialize schema: {}", e)))
    }

    /// JSON Schema describing the schema file format itself, for editor
    /// completion and external validators.
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(RouterSchema);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| RouterError::Schema(format!("Failed to serialize schema: {}", e)))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RouterError::Schema(format!("Failed to serialize schema: {}", e)))
    }

    /// The declared port at (atom, direction, index), if any.
    pub fn port(&self, atom: &str, direction: Direction, index: i32) -> Option<&SchemaPort> {
        self.ports
            .iter()
            .find(|p| p.atom == atom && p.direction == direction && p.index == index)
    }

    /// Check the schema for internal consistency without realizing it.
    ///
    /// Catches duplicate atom ids, ports of unknown atoms, duplicate
    /// (atom, direction, index) triples, negative indices, descriptor
    /// strings that do not parse, connections whose endpoints are not
    /// declared with the right direction, and a zero credit budget.
    pub fn validate(&self) -> Result<()> {
        let mut atom_ids: HashSet<&str> = HashSet::new();
        for atom in &self.atoms {
            if atom.id.is_empty() {
                return Err(RouterError::Schema("Empty atom id".to_string()));
            }
            if !atom_ids.insert(atom.id.as_str()) {
                return Err(RouterError::Schema(format!(
                    "Duplicate atom id: '{}'",
                    atom.id
                )));
            }
        }

        let mut seen_ports: HashSet<(&str, Direction, i32)> = HashSet::new();
        for port in &self.ports {
            if !atom_ids.contains(port.atom.as_str()) {
                return Err(RouterError::Schema(format!(
                    "Port '{}' references unknown atom '{}'",
                    port.name, port.atom
                )));
            }
            if port.index < 0 {
                return Err(RouterError::Schema(format!(
                    "Port '{}' of atom '{}' has negative index {}",
                    port.name, port.atom, port.index
                )));
            }
            if !seen_ports.insert((port.atom.as_str(), port.direction, port.index)) {
                return Err(RouterError::Schema(format!(
                    "Duplicate {} port {} on atom '{}'",
                    port.direction, port.index, port.atom
                )));
            }
            port.vd.parse::<ValueDescriptor>().map_err(|e| {
                RouterError::Schema(format!(
                    "Port '{}' of atom '{}' has invalid descriptor '{}': {}",
                    port.name, port.atom, port.vd, e
                ))
            })?;
        }

        for (i, conn) in self.connections.iter().enumerate() {
            if !atom_ids.contains(conn.from_atom.as_str()) {
                return Err(RouterError::Schema(format!(
                    "Connection {} references unknown atom '{}'",
                    i, conn.from_atom
                )));
            }
            if !atom_ids.contains(conn.to_atom.as_str()) {
                return Err(RouterError::Schema(format!(
                    "Connection {} references unknown atom '{}'",
                    i, conn.to_atom
                )));
            }
            if self
                .port(&conn.from_atom, Direction::Source, conn.from_port)
                .is_none()
            {
                return Err(RouterError::Schema(format!(
                    "Connection {} references undeclared source port {} on atom '{}'",
                    i, conn.from_port, conn.from_atom
                )));
            }
            if self
                .port(&conn.to_atom, Direction::Sink, conn.to_port)
                .is_none()
            {
                return Err(RouterError::Schema(format!(
                    "Connection {} references undeclared sink port {} on atom '{}'",
                    i, conn.to_port, conn.to_atom
                )));
            }
        }

        if self.flow_control.credits_per_port == 0 {
            return Err(RouterError::Schema(
                "flow_control.credits_per_port must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the atom graph in GraphViz DOT format.
    pub fn to_dot(&self) -> String {
        let graph = self.atom_graph();
        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }

    /// Atoms with no incoming connections.
    pub fn source_atoms(&self) -> Vec<String> {
        self.boundary_atoms(GraphDirection::Incoming)
    }

    /// Atoms with no outgoing connections.
    pub fn sink_atoms(&self) -> Vec<String> {
        self.boundary_atoms(GraphDirection::Outgoing)
    }

    /// Realize this schema into a live net.
    pub fn realize(&self) -> Result<RouterNet> {
        NetBuilder::from_schema(self)?.build()
    }

    fn atom_graph(&self) -> DiGraph<&str, String> {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
        for atom in &self.atoms {
            nodes.insert(atom.id.as_str(), graph.add_node(atom.id.as_str()));
        }
        for conn in &self.connections {
            let from = match nodes.get(conn.from_atom.as_str()) {
                Some(&n) => n,
                None => continue,
            };
            let to = match nodes.get(conn.to_atom.as_str()) {
                Some(&n) => n,
                None => continue,
            };
            graph.add_edge(from, to, format!("{}:{}", conn.from_port, conn.to_port));
        }
        graph
    }

    fn boundary_atoms(&self, direction: GraphDirection) -> Vec<String> {
        let graph = self.atom_graph();
        graph
            .node_indices()
            .filter(|&idx| graph.neighbors_directed(idx, direction).count() == 0)
            .map(|idx| graph[idx].to_string())
            .collect()
    }
}
