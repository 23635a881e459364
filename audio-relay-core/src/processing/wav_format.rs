//! Canonical RIFF/WAVE container muxing.
//!
//! Byte-exact output is a correctness requirement: any container produced
//! here must open in any standard decoder expecting uncompressed PCM.
//!
//! Layout:
//! ```text
//! [0-3]    "RIFF"
//! [4-7]    total size - 8 (= 36 + data_len)
//! [8-11]   "WAVE"
//! [12-15]  "fmt "
//! [16-19]  16 (PCM format chunk size)
//! [20-21]  1 (PCM format tag)
//! [22-23]  channels
//! [24-27]  sample_rate
//! [28-31]  byte_rate = sample_rate × channels × bits/8
//! [32-33]  block_align = channels × bits/8
//! [34-35]  bits_per_sample
//! [36-39]  "data"
//! [40-43]  data_len
//! [44..]   PCM bytes
//! ```

use crate::models::error::AudioError;
use crate::processing::pcm::PcmFrame;

/// Size of the canonical RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Parsed form of the 44-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    /// Parse the leading 44 bytes of a container.
    pub fn parse(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(AudioError::Encoding(format!(
                "container of {} bytes is shorter than the 44-byte header",
                bytes.len()
            )));
        }
        if &bytes[0..4] != b"RIFF"
            || &bytes[8..12] != b"WAVE"
            || &bytes[12..16] != b"fmt "
            || &bytes[36..40] != b"data"
        {
            return Err(AudioError::Encoding("missing RIFF/WAVE chunk markers".into()));
        }
        let format_tag = u16::from_le_bytes([bytes[20], bytes[21]]);
        if format_tag != 1 {
            return Err(AudioError::Encoding(format!(
                "unsupported format tag {format_tag}, expected 1 (PCM)"
            )));
        }
        Ok(Self {
            sample_rate: u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            channels: u16::from_le_bytes([bytes[22], bytes[23]]),
            bits_per_sample: u16::from_le_bytes([bytes[34], bytes[35]]),
            data_len: u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]),
        })
    }
}

fn check_format(channels: u16, bits_per_sample: u16) -> Result<(), AudioError> {
    if channels < 1 {
        return Err(AudioError::Encoding("channel count must be at least 1".into()));
    }
    if bits_per_sample == 0 || bits_per_sample % 8 != 0 {
        return Err(AudioError::Encoding(format!(
            "bits per sample must be a positive multiple of 8, got {bits_per_sample}"
        )));
    }
    Ok(())
}

/// Build the canonical 44-byte header for `data_len` bytes of PCM.
pub fn wav_header(
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    data_len: u32,
) -> Result<[u8; WAV_HEADER_SIZE], AudioError> {
    check_format(channels, bits_per_sample)?;

    let byte_rate = sample_rate * channels as u32 * bits_per_sample as u32 / 8;
    let block_align = channels * bits_per_sample / 8;
    let riff_size = 36 + data_len;

    let mut header = [0u8; WAV_HEADER_SIZE];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&riff_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());

    Ok(header)
}

/// Wrap a PCM frame in a self-describing RIFF/WAVE container.
///
/// Total output length is exactly `44 + pcm.byte_len()`, and the header's
/// data-length field always equals the trailing PCM byte count.
pub fn mux_wav(
    pcm: &PcmFrame,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
) -> Result<Vec<u8>, AudioError> {
    let header = wav_header(sample_rate, channels, bits_per_sample, pcm.byte_len() as u32)?;
    let mut container = Vec::with_capacity(WAV_HEADER_SIZE + pcm.byte_len());
    container.extend_from_slice(&header);
    container.extend_from_slice(pcm.as_bytes());
    Ok(container)
}
