//! f32 → 16-bit PCM conversion.

/// An owned frame of signed 16-bit little-endian PCM samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmFrame {
    bytes: Vec<u8>,
}

impl PcmFrame {
    /// Number of 16-bit samples in the frame.
    pub fn sample_count(&self) -> usize {
        self.bytes.len() / 2
    }

    /// Serialized length: always `2 × sample_count`.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Iterate the frame as decoded i16 samples.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
    }
}

/// Convert normalized f32 samples to mono 16-bit little-endian PCM.
///
/// Each sample is clamped to [-1.0, 1.0] before scaling, so +1.0 maps to
/// `i16::MAX` instead of wrapping negative at the boundary. The scaled
/// value is cast, which truncates toward zero (not round-to-nearest) —
/// downstream consumers expect byte-exact truncation.
pub fn encode_pcm16(samples: &[f32]) -> PcmFrame {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    PcmFrame { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(frame: &PcmFrame) -> Vec<i16> {
        frame.samples().collect()
    }

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(decode(&encode_pcm16(&[0.0])), vec![0]);
    }

    #[test]
    fn positive_boundary_maps_to_max_not_negative() {
        assert_eq!(decode(&encode_pcm16(&[1.0])), vec![i16::MAX]);
    }

    #[test]
    fn negative_boundary_maps_to_negative_max() {
        assert_eq!(decode(&encode_pcm16(&[-1.0])), vec![-i16::MAX]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(decode(&encode_pcm16(&[2.0, -3.0])), vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn cast_truncates_toward_zero() {
        // 0.5 × 32767 = 16383.5 → 16383 on both sides of zero
        assert_eq!(decode(&encode_pcm16(&[0.5, -0.5])), vec![16383, -16383]);
    }

    #[test]
    fn output_is_little_endian() {
        let frame = encode_pcm16(&[1.0]);
        assert_eq!(frame.as_bytes(), &[0xFF, 0x7F]);
    }

    #[test]
    fn byte_length_is_twice_sample_count() {
        let frame = encode_pcm16(&[0.1; 300]);
        assert_eq!(frame.sample_count(), 300);
        assert_eq!(frame.byte_len(), 600);
    }

    #[test]
    fn empty_input_empty_frame() {
        let frame = encode_pcm16(&[]);
        assert!(frame.is_empty());
        assert_eq!(frame.byte_len(), 0);
    }
}
