use std::fs;
use std::path::Path;

use crate::models::error::AudioError;
use crate::models::recording::RecordingMetadata;

/// Write recording metadata as a JSON sidecar file.
///
/// Creates `{recording}.metadata.json` alongside the recording.
pub fn write_metadata(metadata: &RecordingMetadata, recording_path: &Path) -> Result<(), AudioError> {
    let metadata_path = recording_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| AudioError::Storage(format!("failed to serialize metadata: {e}")))?;
    fs::write(&metadata_path, json)
        .map_err(|e| AudioError::Storage(format!("failed to write metadata: {e}")))?;
    Ok(())
}

/// Read recording metadata from a JSON sidecar file.
pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, AudioError> {
    let metadata_path = recording_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| AudioError::Storage(format!("failed to read metadata: {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| AudioError::Storage(format!("failed to parse metadata: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_round_trip() {
        let recording_path = std::env::temp_dir().join(format!(
            "audio_relay_test_{}_sidecar.wav",
            std::process::id()
        ));
        let metadata = RecordingMetadata::new_mono(10.0, 16000, "recording.wav", "deadbeef");

        write_metadata(&metadata, &recording_path).unwrap();
        let loaded = read_metadata(&recording_path).unwrap();
        assert_eq!(loaded, metadata);

        fs::remove_file(recording_path.with_extension("metadata.json")).ok();
    }

    #[test]
    fn missing_sidecar_is_a_storage_error() {
        let err = read_metadata(Path::new("/nonexistent/recording.wav")).unwrap_err();
        assert!(matches!(err, AudioError::Storage(_)));
    }
}
