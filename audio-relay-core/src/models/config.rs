use std::path::PathBuf;

/// Configuration for a monitoring session.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Target sample rate in Hz (default: 16000).
    pub sample_rate: u32,

    /// Ring buffer length in seconds (default: 10).
    pub buffer_secs: u32,

    /// Trailing window extracted per dispatch, in seconds (default: 10).
    pub window_secs: f64,

    /// Directory where saved window recordings are written.
    pub output_directory: PathBuf,

    /// Specific input device name, or None for the system default.
    pub device_name: Option<String>,
}

impl MonitorConfig {
    /// Output is always mono 16-bit PCM.
    pub const CHANNELS: u16 = 1;
    pub const BITS_PER_SAMPLE: u16 = 16;

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.buffer_secs == 0 {
            return Err("buffer length must be at least one second".into());
        }
        if !self.window_secs.is_finite() || self.window_secs <= 0.0 {
            return Err(format!("window length must be positive, got {}", self.window_secs));
        }
        if self.window_secs > self.buffer_secs as f64 {
            return Err(format!(
                "window of {}s cannot exceed the {}s ring",
                self.window_secs, self.buffer_secs
            ));
        }
        Ok(())
    }

    /// Ring capacity in samples: sample_rate × buffer_secs.
    pub fn buffer_capacity(&self) -> usize {
        self.sample_rate as usize * self.buffer_secs as usize
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            buffer_secs: 10,
            window_secs: 10.0,
            output_directory: PathBuf::from("."),
            device_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let config = MonitorConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_window_longer_than_ring() {
        let config = MonitorConfig {
            buffer_secs: 5,
            window_secs: 6.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_window() {
        for bad in [0.0, -1.0, f64::NAN] {
            let config = MonitorConfig {
                window_secs: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn capacity_is_rate_times_seconds() {
        let config = MonitorConfig::default();
        assert_eq!(config.buffer_capacity(), 160000);
    }
}
