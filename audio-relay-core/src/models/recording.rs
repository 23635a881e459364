use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result returned when a trailing window is persisted to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    pub metadata: RecordingMetadata,
    pub checksum: String,
}

/// Metadata stored alongside a recording as a JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub file_path: String,
    pub checksum: String,
    pub created_at: String,
}

impl RecordingMetadata {
    /// Metadata for a mono 16-bit window recording.
    pub fn new_mono(duration_secs: f64, sample_rate: u32, file_path: &str, checksum: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            duration_secs,
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
            file_path: file_path.to_string(),
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
