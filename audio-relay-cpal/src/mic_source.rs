//! Microphone capture via cpal.
//!
//! Opens an input device in its native format and delivers mono f32
//! blocks at the requested rate through the core's `SampleCallback`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use parking_lot::Mutex;

use audio_relay_core::models::audio::AudioDevice;
use audio_relay_core::models::error::AudioError;
use audio_relay_core::traits::capture_source::{CaptureSource, SampleCallback};

/// Microphone capture backend.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated
/// capture thread; `stop` flips the run flag and joins it.
pub struct CpalMicSource {
    device_name: Option<String>,
    target_rate: u32,
    running: Arc<AtomicBool>,
    capture_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalMicSource {
    /// Capture from the system default input device.
    pub fn default_device(target_rate: u32) -> Self {
        Self {
            device_name: None,
            target_rate,
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }

    /// Capture from a named input device.
    pub fn with_device(name: impl Into<String>, target_rate: u32) -> Self {
        Self {
            device_name: Some(name.into()),
            target_rate,
            running: Arc::new(AtomicBool::new(false)),
            capture_handle: Mutex::new(None),
        }
    }

    /// Input device names, for a device selector.
    pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
        let host = cpal::default_host();
        let devices = host.input_devices().map_err(|e| {
            log::debug!("input device enumeration failed: {e}");
            AudioError::DeviceNotAvailable
        })?;
        Ok(devices.filter_map(|d| d.name().ok()).collect())
    }
}

impl CaptureSource for CpalMicSource {
    fn is_available(&self) -> bool {
        find_device(self.device_name.as_deref()).is_ok()
    }

    fn start(&mut self, callback: SampleCallback) -> Result<(), AudioError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(AudioError::ConfigurationFailed(
                "mic capture already running".into(),
            ));
        }

        let running = Arc::clone(&self.running);
        let device_name = self.device_name.clone();
        let target_rate = self.target_rate;

        let handle = thread::Builder::new()
            .name("cpal-mic-capture".into())
            .spawn(move || {
                if let Err(e) = capture_loop(&running, device_name.as_deref(), target_rate, callback)
                {
                    log::error!("mic capture error: {e}");
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                AudioError::ConfigurationFailed(format!("failed to spawn capture thread: {e}"))
            })?;

        *self.capture_handle.lock() = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn device_info(&self) -> AudioDevice {
        let name = find_device(self.device_name.as_deref())
            .and_then(|d| {
                d.name().map_err(|e| {
                    log::debug!("device name query failed: {e}");
                    AudioError::DeviceNotAvailable
                })
            })
            .unwrap_or_else(|_| "Unknown Device".into());

        AudioDevice {
            id: self
                .device_name
                .clone()
                .unwrap_or_else(|| "default-input".into()),
            name,
            is_default: self.device_name.is_none(),
        }
    }
}

fn find_device(name: Option<&str>) -> Result<cpal::Device, AudioError> {
    let host = cpal::default_host();
    match name {
        Some(name) => {
            let mut devices = host.input_devices().map_err(|e| {
                log::debug!("input device enumeration failed: {e}");
                AudioError::DeviceNotAvailable
            })?;
            devices
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or(AudioError::DeviceNotAvailable)
        }
        None => host
            .default_input_device()
            .ok_or(AudioError::DeviceNotAvailable),
    }
}

/// Owns the stream for the lifetime of the capture.
fn capture_loop(
    running: &AtomicBool,
    device_name: Option<&str>,
    target_rate: u32,
    callback: SampleCallback,
) -> Result<(), AudioError> {
    let device = find_device(device_name)?;
    let default_config = device
        .default_input_config()
        .map_err(|e| AudioError::ConfigurationFailed(format!("no default input config: {e}")))?;
    let format = default_config.sample_format();
    let config: StreamConfig = default_config.into();
    let device_rate = config.sample_rate.0;
    let channels = usize::from(config.channels.max(1));

    log::debug!(
        "input stream: format={format:?} rate={device_rate}Hz channels={channels} → mono {target_rate}Hz"
    );

    fn err_fn(err: cpal::StreamError) {
        log::warn!("input stream error: {err}");
    }

    let stream = match format {
        SampleFormat::F32 => {
            let cb = callback.clone();
            device.build_input_stream(
                &config,
                move |data: &[f32], _| forward(&cb, data, channels, device_rate, target_rate),
                err_fn,
                None,
            )
        }
        SampleFormat::I16 => {
            let cb = callback.clone();
            device.build_input_stream(
                &config,
                move |data: &[i16], _| {
                    let floats: Vec<f32> =
                        data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                    forward(&cb, &floats, channels, device_rate, target_rate);
                },
                err_fn,
                None,
            )
        }
        SampleFormat::U16 => {
            let cb = callback.clone();
            device.build_input_stream(
                &config,
                move |data: &[u16], _| {
                    let floats: Vec<f32> = data
                        .iter()
                        .map(|&s| s as f32 / u16::MAX as f32 * 2.0 - 1.0)
                        .collect();
                    forward(&cb, &floats, channels, device_rate, target_rate);
                },
                err_fn,
                None,
            )
        }
        other => {
            return Err(AudioError::ConfigurationFailed(format!(
                "unsupported sample format {other:?}"
            )))
        }
    }
    .map_err(|e| AudioError::ConfigurationFailed(format!("failed to build input stream: {e}")))?;

    stream
        .play()
        .map_err(|e| AudioError::ConfigurationFailed(format!("failed to start input stream: {e}")))?;

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(50));
    }
    drop(stream);
    Ok(())
}

fn forward(
    callback: &SampleCallback,
    data: &[f32],
    channels: usize,
    device_rate: u32,
    target_rate: u32,
) {
    let mono = downmix_to_mono(data, channels);
    let block = resample_linear(&mono, device_rate, target_rate);
    callback(&block, target_rate);
}

/// Downmix interleaved multi-channel audio to mono by averaging channels
/// per frame.
fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let frame_count = samples.len() / channels;
    let scale = 1.0 / channels as f32;
    let mut mono = Vec::with_capacity(frame_count);
    for frame in 0..frame_count {
        let sum: f32 = samples[frame * channels..(frame + 1) * channels].iter().sum();
        mono.push(sum * scale);
    }
    mono
}

/// Linear-interpolation resampling for mono audio. Input is returned
/// unchanged when the rates already match.
fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_count = (samples.len() as f64 * ratio) as usize;
    if output_count == 0 {
        return Vec::new();
    }

    let mut output = vec![0.0f32; output_count];
    for (i, sample) in output.iter_mut().enumerate() {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = (source_index - index as f64) as f32;

        if index + 1 < samples.len() {
            *sample = samples[index] * (1.0 - fraction) + samples[index + 1] * fraction;
        } else if index < samples.len() {
            *sample = samples[index];
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_stereo_averages_frames() {
        let stereo = [0.2, 0.8, 0.4, 0.6];
        let mono = downmix_to_mono(&stereo, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.5).abs() < 1e-6);
        assert!((mono[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn downmix_mono_is_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(resample_linear(&samples, 16000, 16000), samples);
    }

    #[test]
    fn resample_upsample_doubles_length() {
        let out = resample_linear(&[0.0, 1.0], 8000, 16000);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 0.0).abs() < 0.01);
        assert!((out[1] - 0.5).abs() < 0.1); // midpoint interpolated
    }

    #[test]
    fn resample_downsample_halves_length() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let out = resample_linear(&samples, 32000, 16000);
        assert_eq!(out.len(), 50);
    }
}
