use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::AudioError;
use crate::processing::wav_format;

/// Streaming WAV file writer.
///
/// `open` writes a 44-byte header with a zero data size; PCM bytes are
/// appended with `write`; `close` seeks back to patch the RIFF and data
/// sizes to what was actually written and returns the SHA-256 checksum of
/// the finished file.
pub struct WavFileWriter {
    file_path: PathBuf,
    file: Option<File>,
    bytes_written: u64,
}

impl WavFileWriter {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            file: None,
            bytes_written: 0,
        }
    }

    /// Create the file and write the placeholder header. Idempotent while open.
    pub fn open(
        &mut self,
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
    ) -> Result<(), AudioError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AudioError::Storage(format!("failed to create directory: {e}")))?;
        }

        let file = File::create(&self.file_path)
            .map_err(|e| AudioError::Storage(format!("failed to create file: {e}")))?;
        self.file = Some(file);

        let header = wav_format::wav_header(sample_rate, channels, bits_per_sample, 0)?;
        self.write_raw(&header)
    }

    /// Append raw PCM bytes.
    pub fn write(&mut self, pcm_bytes: &[u8]) -> Result<(), AudioError> {
        if self.file.is_none() {
            return Err(AudioError::Storage("file is not open for writing".into()));
        }
        self.write_raw(pcm_bytes)
    }

    /// Patch header sizes, flush, and return the file's SHA-256 hex digest.
    pub fn close(&mut self) -> Result<String, AudioError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| AudioError::Storage("file is not open".into()))?;

        let riff_size = (self.bytes_written - 8) as u32;
        file.seek(SeekFrom::Start(4))
            .map_err(|e| AudioError::Storage(e.to_string()))?;
        file.write_all(&riff_size.to_le_bytes())
            .map_err(|e| AudioError::Storage(e.to_string()))?;

        let data_size = (self.bytes_written - wav_format::WAV_HEADER_SIZE as u64) as u32;
        file.seek(SeekFrom::Start(40))
            .map_err(|e| AudioError::Storage(e.to_string()))?;
        file.write_all(&data_size.to_le_bytes())
            .map_err(|e| AudioError::Storage(e.to_string()))?;

        file.flush().map_err(|e| AudioError::Storage(e.to_string()))?;
        self.file = None;

        sha256_file(&self.file_path)
    }

    /// Total bytes written so far, including the header.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), AudioError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| AudioError::Storage("file is not open".into()))?;
        file.write_all(data)
            .map_err(|e| AudioError::Storage(format!("write failed: {e}")))?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }
}

/// SHA-256 hex digest of a file.
fn sha256_file(path: &Path) -> Result<String, AudioError> {
    let data = fs::read(path)
        .map_err(|e| AudioError::Storage(format!("failed to read file for checksum: {e}")))?;
    let digest = Sha256::digest(&data);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::pcm::encode_pcm16;
    use crate::processing::wav_format::WavHeader;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_relay_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn finished_file_has_patched_sizes() {
        let path = temp_file_path("patched.wav");

        let mut writer = WavFileWriter::new(path.clone());
        writer.open(16000, 1, 16).unwrap();
        let pcm = encode_pcm16(&vec![0.5; 800]);
        writer.write(pcm.as_bytes()).unwrap();
        let checksum = writer.close().unwrap();
        assert_eq!(checksum.len(), 64);

        let data = fs::read(&path).unwrap();
        assert_eq!(data.len(), 44 + 1600);

        let header = WavHeader::parse(&data).unwrap();
        assert_eq!(header.sample_rate, 16000);
        assert_eq!(header.data_len, 1600);
        let riff_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        assert_eq!(riff_size as usize, data.len() - 8);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn checksum_is_stable_for_identical_content() {
        let path_a = temp_file_path("stable_a.wav");
        let path_b = temp_file_path("stable_b.wav");
        let pcm = encode_pcm16(&[0.1, 0.2, 0.3]);

        let mut checksums = Vec::new();
        for path in [&path_a, &path_b] {
            let mut writer = WavFileWriter::new(path.clone());
            writer.open(16000, 1, 16).unwrap();
            writer.write(pcm.as_bytes()).unwrap();
            checksums.push(writer.close().unwrap());
        }
        assert_eq!(checksums[0], checksums[1]);

        fs::remove_file(&path_a).ok();
        fs::remove_file(&path_b).ok();
    }

    #[test]
    fn write_before_open_fails() {
        let mut writer = WavFileWriter::new(temp_file_path("unopened.wav"));
        assert!(writer.write(&[0u8; 4]).is_err());
    }

    #[test]
    fn close_without_open_fails() {
        let mut writer = WavFileWriter::new(temp_file_path("never_opened.wav"));
        assert!(writer.close().is_err());
    }

    #[test]
    fn multiple_writes_accumulate() {
        let path = temp_file_path("accumulate.wav");

        let mut writer = WavFileWriter::new(path.clone());
        writer.open(16000, 1, 16).unwrap();
        for _ in 0..4 {
            writer.write(&[0u8; 100]).unwrap();
        }
        assert_eq!(writer.bytes_written(), 44 + 400);
        writer.close().unwrap();

        let header = WavHeader::parse(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(header.data_len, 400);

        fs::remove_file(&path).ok();
    }
}
