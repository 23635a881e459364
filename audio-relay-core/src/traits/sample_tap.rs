use crate::models::error::AudioError;

/// Read interface over a circular capture buffer.
///
/// This is the only surface the window extractor depends on, so the ring
/// can be the in-crate `CircularBuffer` or a wrapper over an OS-level ring
/// owned by the audio driver.
pub trait SampleTap {
    /// Declared sample rate of the stored audio, in Hz.
    fn sample_rate(&self) -> u32;

    /// Fixed capacity of the ring, in samples.
    fn capacity(&self) -> usize;

    /// Current write position, in `[0, capacity)`.
    fn write_position(&self) -> usize;

    /// Total samples ever written. Monotone; does not wrap.
    fn total_written(&self) -> u64;

    /// Copy out `length` samples starting at logical offset `start`,
    /// interpreted modulo capacity (`start` may be negative).
    fn read_region(&self, start: i64, length: usize) -> Result<Vec<f32>, AudioError>;
}
