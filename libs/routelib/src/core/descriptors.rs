// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Value-channel and action descriptor types.
//!
//! A [`ValueDescriptor`] states what kind of packets a port carries, as one
//! or more realm/class channels. An [`ActionDescriptor`] states the port
//! interface of an action: which channels its sink side consumes and which
//! its source side produces, in declaration order.

use crate::core::error::{Result, RouterError};
use crate::core::handles::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device realm a channel lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    /// CPU-side processing.
    Center,
    /// Network transport.
    Net,
    /// OpenGL device.
    Ogl,
    /// Direct3D device.
    Dx,
}

impl Realm {
    pub fn name(&self) -> &'static str {
        match self {
            Realm::Center => "center",
            Realm::Net => "net",
            Realm::Ogl => "ogl",
            Realm::Dx => "dx",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Realm {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "center" => Ok(Realm::Center),
            "net" => Ok(Realm::Net),
            "ogl" => Ok(Realm::Ogl),
            "dx" => Ok(Realm::Dx),
            other => Err(RouterError::InvalidArgument(format!(
                "unknown realm '{other}'"
            ))),
        }
    }
}

/// Class of value carried on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueClass {
    Audio,
    Video,
    Midi,
    Event,
    /// Demand signal flowing ahead of produced media.
    Order,
    /// Confirmation signal flowing back to the demand side.
    Receipt,
    Fbo,
    Volume,
}

impl ValueClass {
    pub fn name(&self) -> &'static str {
        match self {
            ValueClass::Audio => "audio",
            ValueClass::Video => "video",
            ValueClass::Midi => "midi",
            ValueClass::Event => "event",
            ValueClass::Order => "order",
            ValueClass::Receipt => "receipt",
            ValueClass::Fbo => "fbo",
            ValueClass::Volume => "volume",
        }
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueClass {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "audio" => Ok(ValueClass::Audio),
            "video" => Ok(ValueClass::Video),
            "midi" => Ok(ValueClass::Midi),
            "event" => Ok(ValueClass::Event),
            "order" => Ok(ValueClass::Order),
            "receipt" => Ok(ValueClass::Receipt),
            "fbo" => Ok(ValueClass::Fbo),
            "volume" => Ok(ValueClass::Volume),
            other => Err(RouterError::InvalidArgument(format!(
                "unknown value class '{other}'"
            ))),
        }
    }
}

/// One realm/class channel of a value descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelDesc {
    pub realm: Realm,
    pub class: ValueClass,
    /// Optional channels may be left unconnected in a valid net.
    #[serde(default)]
    pub optional: bool,
}

impl ChannelDesc {
    pub fn new(realm: Realm, class: ValueClass) -> Self {
        Self {
            realm,
            class,
            optional: false,
        }
    }

    pub fn optional(realm: Realm, class: ValueClass) -> Self {
        Self {
            realm,
            class,
            optional: true,
        }
    }

    /// Compact `realm-class` form, e.g. `center-audio`. This is the form
    /// persisted in schema files.
    pub fn compact_name(&self) -> String {
        format!("{}-{}", self.realm, self.class)
    }

    /// Dotted `realm.class` form, e.g. `center.audio`. This is the form
    /// surfaced through port metadata.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.realm, self.class)
    }
}

impl fmt::Display for ChannelDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.realm, self.class)
    }
}

impl FromStr for ChannelDesc {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        let (realm, class) = s.split_once('-').ok_or_else(|| {
            RouterError::InvalidArgument(format!(
                "channel descriptor '{s}' is not in realm-class form"
            ))
        })?;
        Ok(ChannelDesc::new(realm.parse()?, class.parse()?))
    }
}

/// Describes the value type of a port as an ordered list of channels.
///
/// An empty descriptor is invalid; the router refuses to register a port
/// with one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDescriptor {
    channels: Vec<ChannelDesc>,
}

impl ValueDescriptor {
    /// An empty, invalid descriptor.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(channel: ChannelDesc) -> Self {
        Self {
            channels: vec![channel],
        }
    }

    pub fn with_channel(mut self, channel: ChannelDesc) -> Self {
        self.channels.push(channel);
        self
    }

    /// A descriptor is valid once it carries at least one channel.
    pub fn is_valid(&self) -> bool {
        !self.channels.is_empty()
    }

    pub fn channels(&self) -> &[ChannelDesc] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// First channel, if any. Single-channel descriptors are the common case
    /// for net-built ports.
    pub fn primary(&self) -> Option<&ChannelDesc> {
        self.channels.first()
    }
}

impl fmt::Display for ValueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.channels.is_empty() {
            return f.write_str("invalid");
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{channel}")?;
        }
        Ok(())
    }
}

impl FromStr for ValueDescriptor {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(RouterError::InvalidArgument(
                "empty value descriptor".to_string(),
            ));
        }
        let channels = s
            .split('+')
            .map(ChannelDesc::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { channels })
    }
}

impl From<ChannelDesc> for ValueDescriptor {
    fn from(channel: ChannelDesc) -> Self {
        ValueDescriptor::single(channel)
    }
}

/// Describes the port interface of an action.
///
/// Sink channels are what the action consumes, source channels what it
/// produces, each in declaration order. A net builder resolves a port's
/// value descriptor by looking up the channel at the port's per-direction
/// index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    pub sinks: Vec<ChannelDesc>,
    pub sources: Vec<ChannelDesc>,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            sinks: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn with_sink(mut self, channel: ChannelDesc) -> Self {
        self.sinks.push(channel);
        self
    }

    pub fn with_source(mut self, channel: ChannelDesc) -> Self {
        self.sources.push(channel);
        self
    }

    /// Channel declared at `index` on the given side, if the action has one.
    pub fn channel(&self, direction: Direction, index: usize) -> Option<&ChannelDesc> {
        match direction {
            Direction::Source => self.sources.get(index),
            Direction::Sink => self.sinks.get(index),
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RouterError::Schema(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RouterError::Schema(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_string_forms() {
        let audio = ChannelDesc::new(Realm::Center, ValueClass::Audio);
        assert_eq!(audio.compact_name(), "center-audio");
        assert_eq!(audio.qualified_name(), "center.audio");
        assert_eq!(format!("{audio}"), "center-audio");
    }

    #[test]
    fn test_channel_parse_roundtrip() {
        let parsed: ChannelDesc = "net-receipt".parse().unwrap();
        assert_eq!(parsed.realm, Realm::Net);
        assert_eq!(parsed.class, ValueClass::Receipt);
        assert!(!parsed.optional);
    }

    #[test]
    fn test_channel_parse_rejects_malformed() {
        assert!("centeraudio".parse::<ChannelDesc>().is_err());
        assert!("center-nosuch".parse::<ChannelDesc>().is_err());
        assert!("mars-audio".parse::<ChannelDesc>().is_err());
    }

    #[test]
    fn test_empty_descriptor_is_invalid() {
        let vd = ValueDescriptor::empty();
        assert!(!vd.is_valid());
        assert_eq!(format!("{vd}"), "invalid");
        assert!("".parse::<ValueDescriptor>().is_err());
    }

    #[test]
    fn test_multi_channel_descriptor_display_and_parse() {
        let vd = ValueDescriptor::single(ChannelDesc::new(Realm::Center, ValueClass::Audio))
            .with_channel(ChannelDesc::new(Realm::Center, ValueClass::Volume));
        assert_eq!(format!("{vd}"), "center-audio+center-volume");

        let parsed: ValueDescriptor = "center-audio+center-volume".parse().unwrap();
        assert_eq!(parsed.channel_count(), 2);
        assert_eq!(parsed.channels()[1].class, ValueClass::Volume);
    }

    #[test]
    fn test_action_descriptor_channel_lookup() {
        let action = ActionDescriptor::new("center.customer", "demand-side test atom")
            .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Receipt))
            .with_source(ChannelDesc::new(Realm::Center, ValueClass::Order));

        assert_eq!(
            action.channel(Direction::Sink, 0).unwrap().class,
            ValueClass::Receipt
        );
        assert_eq!(
            action.channel(Direction::Source, 0).unwrap().class,
            ValueClass::Order
        );
        assert!(action.channel(Direction::Source, 1).is_none());
    }
}
