//! # audio-relay-cpal
//!
//! cpal microphone backend for audio-relay.
//!
//! Provides `CpalMicSource`, a `CaptureSource` implementation over the
//! system's default audio host. Device audio is converted to mono f32 at
//! the requested rate before it reaches the session's ring buffer.

pub mod mic_source;

pub use mic_source::CpalMicSource;
