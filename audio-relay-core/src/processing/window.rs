//! Trailing-window extraction from a circular capture buffer.

use crate::models::error::AudioError;
use crate::traits::sample_tap::SampleTap;

/// Extract the trailing `duration_secs` of audio from `tap`.
///
/// The result always has exactly `duration_secs × sample_rate` samples
/// (rounded to the nearest sample). When less audio than that has been
/// captured so far, the missing prefix is silence — the window is padded
/// with leading zeros rather than shortened, so downstream consumers can
/// rely on a fixed length.
///
/// The start offset is computed with signed arithmetic ("distance before
/// the cursor"), so the read is correct both before the ring first wraps
/// and at any wrap point afterwards.
pub fn extract_last<T: SampleTap + ?Sized>(tap: &T, duration_secs: f64) -> Result<Vec<f32>, AudioError> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(AudioError::InvalidDuration {
            seconds: duration_secs,
            reason: "duration must be positive".into(),
        });
    }

    let sample_count = (duration_secs * tap.sample_rate() as f64).round() as usize;
    if sample_count > tap.capacity() {
        return Err(AudioError::InvalidDuration {
            seconds: duration_secs,
            reason: format!(
                "window of {sample_count} samples exceeds ring capacity {}",
                tap.capacity()
            ),
        });
    }
    if sample_count == 0 {
        // Sub-sample durations round down to an empty window.
        return Ok(Vec::new());
    }

    let available = tap.total_written().min(sample_count as u64) as usize;
    let start = tap.write_position() as i64 - available as i64;

    let mut window = vec![0.0f32; sample_count - available];
    window.extend(tap.read_region(start, available)?);
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::circular_buffer::CircularBuffer;

    fn ramp(len: usize, denom: f32) -> Vec<f32> {
        (0..len).map(|i| i as f32 / denom).collect()
    }

    #[test]
    fn window_length_is_exact() {
        let mut buf = CircularBuffer::new(100, 10);
        buf.write(&ramp(150, 150.0));

        for secs in [0.25, 0.5, 1.0, 2.0, 10.0] {
            let window = extract_last(&buf, secs).unwrap();
            assert_eq!(window.len(), (secs * 100.0) as usize);
        }
    }

    #[test]
    fn returns_most_recent_samples() {
        let mut buf = CircularBuffer::new(100, 10);
        let signal = ramp(150, 150.0);
        buf.write(&signal);

        let window = extract_last(&buf, 1.0).unwrap();
        assert_eq!(window, signal[50..150]);
    }

    #[test]
    fn short_recording_is_padded_with_leading_zeros() {
        let mut buf = CircularBuffer::new(100, 10);
        let signal = ramp(150, 150.0);
        buf.write(&signal);

        let window = extract_last(&buf, 2.0).unwrap();
        assert_eq!(window.len(), 200);
        assert_eq!(&window[..50], &[0.0; 50]);
        assert_eq!(&window[50..], &signal[..]);
    }

    #[test]
    fn fresh_buffer_yields_pure_silence() {
        let buf = CircularBuffer::new(100, 10);
        let window = extract_last(&buf, 1.0).unwrap();
        assert_eq!(window, vec![0.0; 100]);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_durations() {
        let buf = CircularBuffer::new(100, 10);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = extract_last(&buf, bad).unwrap_err();
            assert!(matches!(err, AudioError::InvalidDuration { .. }));
        }
    }

    #[test]
    fn rejects_window_longer_than_ring() {
        let buf = CircularBuffer::new(100, 10);
        let err = extract_last(&buf, 10.5).unwrap_err();
        assert!(matches!(err, AudioError::InvalidDuration { .. }));
    }

    #[test]
    fn fractional_duration_rounds_to_nearest_sample() {
        let buf = CircularBuffer::new(16000, 10);
        let window = extract_last(&buf, 0.5).unwrap();
        assert_eq!(window.len(), 8000);
    }

    /// 10s ring at 16 kHz; 200000 samples of a known ramp written in
    /// capture-sized blocks; the last second must be the last 16000 ramp
    /// values, undisturbed by the 40000 overwritten ones.
    #[test]
    fn wraparound_survives_long_overwrite() {
        let mut buf = CircularBuffer::new(16000, 10);
        assert_eq!(buf.capacity(), 160000);

        let signal = ramp(200000, 200000.0);
        for block in signal.chunks(1600) {
            buf.write(block);
        }

        let window = extract_last(&buf, 1.0).unwrap();
        assert_eq!(window.len(), 16000);
        assert_eq!(window, signal[200000 - 16000..]);
    }

    #[test]
    fn extraction_does_not_consume() {
        let mut buf = CircularBuffer::new(100, 10);
        buf.write(&ramp(300, 300.0));

        let a = extract_last(&buf, 1.5).unwrap();
        let b = extract_last(&buf, 1.5).unwrap();
        assert_eq!(a, b);
    }
}
