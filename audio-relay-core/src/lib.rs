//! # audio-relay-core
//!
//! Platform-agnostic trailing-window audio capture core.
//!
//! Continuously records microphone audio into a fixed-size circular
//! buffer, extracts arbitrary trailing time windows (stitching across the
//! wrap boundary), converts them to 16-bit PCM, and muxes canonical
//! RIFF/WAVE containers for file persistence or base64 transport framing.
//! Device backends implement the `CaptureSource` trait and plug into the
//! generic `CaptureSession`; an external WebSocket-style client plugs in
//! behind the `Transport` trait.
//!
//! ## Architecture
//!
//! ```text
//! audio-relay-core (this crate)
//! ├── traits/       ← CaptureSource, SampleTap, Transport, SessionDelegate
//! ├── models/       ← AudioError, CaptureState, MonitorConfig, wire messages
//! ├── processing/   ← CircularBuffer, window extraction, PCM16, WAV muxing, levels
//! ├── session/      ← CaptureSession (generic orchestrator)
//! ├── transport/    ← TransportLink connection state machine
//! └── storage/      ← WavFileWriter, metadata sidecars
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;
pub mod transport;

// Re-export key types at crate root for convenience.
pub use models::audio::{AudioDevice, AudioLevels, SessionDiagnostics};
pub use models::config::MonitorConfig;
pub use models::error::AudioError;
pub use models::message::{AnalysisMessage, WindowMessage};
pub use models::recording::{RecordingMetadata, RecordingResult};
pub use models::state::CaptureState;
pub use processing::circular_buffer::CircularBuffer;
pub use processing::pcm::{encode_pcm16, PcmFrame};
pub use processing::wav_format::{mux_wav, WavHeader, WAV_HEADER_SIZE};
pub use processing::window::extract_last;
pub use session::capture::CaptureSession;
pub use storage::wav_writer::WavFileWriter;
pub use traits::capture_source::{CaptureSource, SampleCallback};
pub use traits::delegate::SessionDelegate;
pub use traits::sample_tap::SampleTap;
pub use traits::transport::{Transport, TransportHandler};
pub use transport::connection::{ConnectionState, TransportEvent, TransportLink};
