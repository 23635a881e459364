use std::sync::Arc;

use crate::models::audio::AudioDevice;
use crate::models::error::AudioError;

/// Callback invoked when the device delivers a block of samples.
///
/// Parameters:
/// - `samples`: mono f32 samples, normalized to approx. [-1.0, 1.0].
/// - `sample_rate`: the rate of the delivered audio in Hz.
///
/// The callback fires on a dedicated capture thread — keep processing minimal.
pub type SampleCallback = Arc<dyn Fn(&[f32], u32) + Send + Sync + 'static>;

/// Interface for microphone capture backends.
///
/// Implemented by `CpalMicSource` in the `audio-relay-cpal` crate; test
/// doubles implement it to drive the session without hardware.
pub trait CaptureSource: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing audio, delivering blocks via `callback`.
    fn start(&mut self, callback: SampleCallback) -> Result<(), AudioError>;

    /// Stop capturing and release the device.
    fn stop(&mut self) -> Result<(), AudioError>;

    /// Information about the input device backing this source.
    fn device_info(&self) -> AudioDevice;
}
