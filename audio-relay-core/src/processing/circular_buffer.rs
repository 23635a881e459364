use crate::models::error::AudioError;
use crate::traits::sample_tap::SampleTap;

/// Fixed-capacity circular audio buffer with a wrapping write cursor.
///
/// The capture source appends continuously; once full, the oldest samples
/// are overwritten in place. Reads are positional copies addressed by
/// logical offset, so extraction never consumes data.
///
/// Storage is zero-initialized: reading a region that has not been written
/// yet yields silence. Not internally synchronized — wrap in
/// `Arc<parking_lot::Mutex<CircularBuffer>>` for the single-writer /
/// multi-reader capture layout.
#[derive(Debug)]
pub struct CircularBuffer {
    samples: Vec<f32>,
    cursor: usize,
    total_written: u64,
    sample_rate: u32,
}

impl CircularBuffer {
    /// Create a ring holding `buffer_secs` seconds of audio at `sample_rate`.
    pub fn new(sample_rate: u32, buffer_secs: u32) -> Self {
        Self::with_capacity(sample_rate, sample_rate as usize * buffer_secs as usize)
    }

    /// Create a ring with an explicit sample capacity.
    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Self {
        // A zero-length ring would leave the modulo arithmetic undefined.
        let capacity = capacity.max(1);
        Self {
            samples: vec![0.0; capacity],
            cursor: 0,
            total_written: 0,
            sample_rate,
        }
    }

    /// Append samples at the cursor, overwriting the oldest data once
    /// capacity is exceeded. Input longer than the ring keeps only the
    /// trailing `capacity` samples. No-op on empty input.
    pub fn write(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        self.total_written += samples.len() as u64;

        let capacity = self.samples.len();
        let tail = if samples.len() > capacity {
            &samples[samples.len() - capacity..]
        } else {
            samples
        };

        let first = tail.len().min(capacity - self.cursor);
        self.samples[self.cursor..self.cursor + first].copy_from_slice(&tail[..first]);
        if tail.len() > first {
            self.samples[..tail.len() - first].copy_from_slice(&tail[first..]);
        }
        self.cursor = (self.cursor + tail.len()) % capacity;
    }

    /// Current write position, in `[0, capacity)`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total samples ever written. Monotone; does not wrap.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Copy out `length` samples starting at logical offset `start`.
    ///
    /// `start` is interpreted modulo capacity and may be negative
    /// ("distance before the cursor"). A window that straddles the wrap
    /// boundary is stitched from the two physical segments, oldest first.
    /// Pure copy: identical arguments with no intervening writes yield
    /// identical output.
    pub fn snapshot_range(&self, start: i64, length: usize) -> Result<Vec<f32>, AudioError> {
        let capacity = self.samples.len();
        if length > capacity {
            return Err(AudioError::OutOfRange {
                requested: length,
                capacity,
            });
        }
        if length == 0 {
            return Ok(Vec::new());
        }

        let begin = start.rem_euclid(capacity as i64) as usize;
        let first = length.min(capacity - begin);
        let mut out = Vec::with_capacity(length);
        out.extend_from_slice(&self.samples[begin..begin + first]);
        out.extend_from_slice(&self.samples[..length - first]);
        Ok(out)
    }
}

impl SampleTap for CircularBuffer {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn capacity(&self) -> usize {
        self.samples.len()
    }

    fn write_position(&self) -> usize {
        self.cursor
    }

    fn total_written(&self) -> u64 {
        self.total_written
    }

    fn read_region(&self, start: i64, length: usize) -> Result<Vec<f32>, AudioError> {
        self.snapshot_range(start, length)
    }
}
