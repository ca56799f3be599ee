// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Built-in action interfaces.
//!
//! These mirror the legacy-loop test atoms: a customer drives demand with
//! orders, generators turn orders into media, sinks consume media and send
//! receipts back. Each constructor is also submitted to the global registry
//! via [`register_action!`](crate::register_action).

use crate::core::descriptors::{ActionDescriptor, ChannelDesc, Realm, ValueClass};
use crate::register_action;

/// Demand-side customer: consumes receipts, emits orders.
pub fn customer() -> ActionDescriptor {
    ActionDescriptor::new("center.customer", "Demand-side customer atom")
        .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Receipt))
        .with_source(ChannelDesc::new(Realm::Center, ValueClass::Order))
}

/// Test audio source: consumes orders, emits audio.
pub fn audio_test_src() -> ActionDescriptor {
    ActionDescriptor::new("center.audio.src.test", "Test audio source atom")
        .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Order))
        .with_source(ChannelDesc::new(Realm::Center, ValueClass::Audio))
}

/// Realtime test audio sink: consumes audio, emits receipts.
pub fn audio_realtime_sink() -> ActionDescriptor {
    ActionDescriptor::new(
        "center.audio.sink.test.realtime",
        "Realtime test audio sink atom",
    )
    .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Audio))
    .with_source(ChannelDesc::new(Realm::Center, ValueClass::Receipt))
}

/// Polling test audio sink: consumes audio, emits receipts.
pub fn audio_poller_sink() -> ActionDescriptor {
    ActionDescriptor::new(
        "center.audio.sink.test.poller",
        "Polling test audio sink atom",
    )
    .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Audio))
    .with_source(ChannelDesc::new(Realm::Center, ValueClass::Receipt))
}

/// Debug audio generator: consumes orders, emits audio.
pub fn audio_dbg_generator() -> ActionDescriptor {
    ActionDescriptor::new(
        "center.audio.src.dbg_generator",
        "Debug waveform generator atom",
    )
    .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Order))
    .with_source(ChannelDesc::new(Realm::Center, ValueClass::Audio))
}

/// Debug video generator: consumes orders, emits video.
pub fn video_dbg_generator() -> ActionDescriptor {
    ActionDescriptor::new(
        "center.video.src.dbg_generator",
        "Debug test-pattern video generator atom",
    )
    .with_sink(ChannelDesc::new(Realm::Center, ValueClass::Order))
    .with_source(ChannelDesc::new(Realm::Center, ValueClass::Video))
}

register_action!(crate::core::actions::customer());
register_action!(crate::core::actions::audio_test_src());
register_action!(crate::core::actions::audio_realtime_sink());
register_action!(crate::core::actions::audio_poller_sink());
register_action!(crate::core::actions::audio_dbg_generator());
register_action!(crate::core::actions::video_dbg_generator());
