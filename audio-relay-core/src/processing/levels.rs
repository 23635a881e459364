//! Input level metering.

/// Root-mean-square level of a sample block (0.0–1.0 for normalized audio).
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Peak absolute level of a sample block.
pub fn peak_level(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// RMS expressed in dBFS, floored at -120 dB for silence.
pub fn rms_dbfs(samples: &[f32]) -> f32 {
    let rms = rms_level(samples);
    if rms <= 0.0 {
        return -120.0;
    }
    (20.0 * rms.log10()).max(-120.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms_level(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(rms_level(&[]), 0.0);
    }

    #[test]
    fn rms_of_full_scale_is_one() {
        assert_relative_eq!(rms_level(&[1.0, -1.0, 1.0]), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn peak_uses_absolute_value() {
        assert_relative_eq!(peak_level(&[0.1, -0.5, 0.3]), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn dbfs_of_silence_is_floored() {
        assert_eq!(rms_dbfs(&[0.0; 16]), -120.0);
    }

    #[test]
    fn dbfs_of_full_scale_is_zero() {
        assert_relative_eq!(rms_dbfs(&[1.0; 16]), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn dbfs_of_half_scale() {
        // 20·log10(0.5) ≈ -6.02 dB
        assert_relative_eq!(rms_dbfs(&[0.5; 16]), -6.0206, epsilon = 1e-3);
    }
}
