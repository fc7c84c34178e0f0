//! Realtime client traits

mod client;

pub use client::{ClientFactory, EventSink, RealtimeClient};
