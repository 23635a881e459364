use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::audio::{AudioDevice, AudioLevels, SessionDiagnostics};
use crate::models::config::MonitorConfig;
use crate::models::error::AudioError;
use crate::models::message::WindowMessage;
use crate::models::recording::{RecordingMetadata, RecordingResult};
use crate::models::state::CaptureState;
use crate::processing::circular_buffer::CircularBuffer;
use crate::processing::levels;
use crate::processing::pcm;
use crate::processing::window;
use crate::storage::metadata;
use crate::storage::wav_writer::WavFileWriter;
use crate::traits::capture_source::{CaptureSource, SampleCallback};
use crate::traits::delegate::SessionDelegate;
use crate::traits::transport::Transport;
use crate::transport::connection::TransportLink;

/// Internal mutable session state, behind one `parking_lot::Mutex`.
struct SessionShared {
    state: CaptureState,
    levels: AudioLevels,
    capture_start: Option<Instant>,
    diagnostics: SessionDiagnostics,
}

impl SessionShared {
    fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            levels: AudioLevels::default(),
            capture_start: None,
            diagnostics: SessionDiagnostics::default(),
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.capture_start
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Explicitly owned monitoring session.
///
/// Owns the ring buffer, the session state machine, and the periodic
/// window dispatch. The capture backend pushes samples in through a
/// callback; the transport link carries framed windows out.
///
/// ```text
/// [CaptureSource] → [CircularBuffer] → extract_last → encode_pcm16
///                                                          ├→ WavFileWriter (save_window)
///                                                          └→ WindowMessage → TransportLink (dispatch)
/// ```
///
/// Exactly one writer (the capture callback) and any number of readers
/// (extraction calls) share the ring through one mutex; writes are
/// whole-slice under the lock, so stopping at any point never leaves a
/// torn buffer.
pub struct CaptureSession<S: CaptureSource> {
    source: S,
    config: MonitorConfig,
    buffer: Arc<Mutex<CircularBuffer>>,
    shared: Arc<Mutex<SessionShared>>,
    delegate: Option<Arc<dyn SessionDelegate>>,
    dispatch_running: Arc<AtomicBool>,
    dispatch_handle: Option<thread::JoinHandle<()>>,
}

impl<S: CaptureSource> CaptureSession<S> {
    /// Validate `config` and bind the session to a capture backend.
    pub fn new(source: S, config: MonitorConfig) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::ConfigurationFailed)?;
        let buffer = CircularBuffer::new(config.sample_rate, config.buffer_secs);
        Ok(Self {
            source,
            config,
            buffer: Arc::new(Mutex::new(buffer)),
            shared: Arc::new(Mutex::new(SessionShared::new())),
            delegate: None,
            dispatch_running: Arc::new(AtomicBool::new(false)),
            dispatch_handle: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Current state; the capturing variant carries live elapsed time.
    pub fn state(&self) -> CaptureState {
        let shared = self.shared.lock();
        match shared.state {
            CaptureState::Capturing { .. } => CaptureState::Capturing {
                duration_secs: shared.elapsed_secs(),
            },
            ref other => other.clone(),
        }
    }

    pub fn current_levels(&self) -> AudioLevels {
        self.shared.lock().levels
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.shared.lock().diagnostics.clone()
    }

    pub fn device_info(&self) -> AudioDevice {
        self.source.device_info()
    }

    /// Start capturing into the ring. Transitions: idle/failed → capturing.
    pub fn start(&mut self) -> Result<(), AudioError> {
        {
            let shared = self.shared.lock();
            if !shared.state.is_idle() && !shared.state.is_failed() {
                return Err(AudioError::ConfigurationFailed(
                    "can only start from idle state".into(),
                ));
            }
        }

        if !self.source.is_available() {
            return Err(self.fail(AudioError::DeviceNotAvailable));
        }

        // Fresh ring per run; earlier audio never leaks into a new session.
        *self.buffer.lock() =
            CircularBuffer::new(self.config.sample_rate, self.config.buffer_secs);

        let buffer = Arc::clone(&self.buffer);
        let shared = Arc::clone(&self.shared);
        let delegate = self.delegate.clone();
        let target_rate = self.config.sample_rate;

        let callback: SampleCallback = Arc::new(move |samples: &[f32], sample_rate: u32| {
            if sample_rate != target_rate {
                log::warn!("capture delivered {sample_rate} Hz but the ring expects {target_rate} Hz");
            }

            let block_levels = AudioLevels {
                rms: levels::rms_level(samples),
                peak: levels::peak_level(samples),
            };
            {
                let mut s = shared.lock();
                s.levels = block_levels;
                s.diagnostics.callback_count += 1;
                s.diagnostics.samples_captured += samples.len() as u64;
            }
            buffer.lock().write(samples);

            if let Some(ref d) = delegate {
                d.on_levels_updated(&block_levels);
            }
        });

        if let Err(err) = self.source.start(callback) {
            return Err(self.fail(err));
        }

        self.shared.lock().capture_start = Some(Instant::now());
        self.set_state(CaptureState::Capturing { duration_secs: 0.0 });
        log::info!("capture started on {}", self.source.device_info().name);
        Ok(())
    }

    /// Stop dispatch (if running) and capture.
    /// Transitions: capturing → stopping → idle. Safe at any point.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        {
            let shared = self.shared.lock();
            if !shared.state.is_capturing() {
                return Err(AudioError::ConfigurationFailed(
                    "can only stop from capturing state".into(),
                ));
            }
        }

        self.set_state(CaptureState::Stopping);
        self.stop_dispatch();
        let stopped = self.source.stop();

        self.shared.lock().capture_start = None;
        self.set_state(CaptureState::Idle);
        log::info!("capture stopped");
        stopped
    }

    /// Copy out the trailing `seconds` of audio. O(window length); the
    /// ring lock is held only for the copy.
    pub fn extract_window(&self, seconds: f64) -> Result<Vec<f32>, AudioError> {
        let buffer = self.buffer.lock();
        window::extract_last(&*buffer, seconds)
    }

    /// Persist the trailing `seconds` as `recording_<uuid>.wav` in the
    /// configured output directory, plus a JSON metadata sidecar.
    pub fn save_window(&self, seconds: f64) -> Result<RecordingResult, AudioError> {
        let samples = self.extract_window(seconds)?;
        let frame = pcm::encode_pcm16(&samples);

        let file_name = format!("recording_{}.wav", uuid::Uuid::new_v4());
        let file_path = self.config.output_directory.join(file_name);

        let mut writer = WavFileWriter::new(file_path.clone());
        writer.open(
            self.config.sample_rate,
            MonitorConfig::CHANNELS,
            MonitorConfig::BITS_PER_SAMPLE,
        )?;
        writer.write(frame.as_bytes())?;
        let checksum = writer.close()?;

        let meta = RecordingMetadata::new_mono(
            seconds,
            self.config.sample_rate,
            &file_path.to_string_lossy(),
            &checksum,
        );
        metadata::write_metadata(&meta, &file_path)?;
        log::info!("saved {seconds}s window to {}", file_path.display());

        Ok(RecordingResult {
            file_path,
            duration_secs: seconds,
            metadata: meta,
            checksum,
        })
    }

    /// Start the periodic dispatch loop: every `interval`, frame the
    /// configured trailing window and send it through `link`. Ticks are
    /// skipped while the link is not connected; extraction and send
    /// failures are reported to the delegate, never swallowed.
    pub fn start_dispatch<T: Transport + 'static>(
        &mut self,
        link: Arc<TransportLink<T>>,
        interval: Duration,
    ) -> Result<(), AudioError> {
        if !self.shared.lock().state.is_capturing() {
            return Err(AudioError::ConfigurationFailed(
                "dispatch requires an active capture".into(),
            ));
        }
        if self.dispatch_running.swap(true, Ordering::SeqCst) {
            return Err(AudioError::ConfigurationFailed(
                "dispatch loop already running".into(),
            ));
        }

        let running = Arc::clone(&self.dispatch_running);
        let buffer = Arc::clone(&self.buffer);
        let shared = Arc::clone(&self.shared);
        let delegate = self.delegate.clone();
        let window_secs = self.config.window_secs;

        let handle = thread::Builder::new()
            .name("window-dispatch".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }
                    if !shared.lock().state.is_capturing() {
                        continue;
                    }
                    if !link.state().is_connected() {
                        continue;
                    }

                    match Self::dispatch_once(&buffer, &link, window_secs) {
                        Ok(message) => {
                            {
                                let mut s = shared.lock();
                                s.diagnostics.windows_dispatched += 1;
                                s.diagnostics.payload_bytes_sent += message.payload.len() as u64;
                            }
                            log::debug!(
                                "dispatched {window_secs}s window at {}",
                                message.timestamp
                            );
                            if let Some(ref d) = delegate {
                                d.on_window_sent(&message);
                            }
                        }
                        Err(err) => {
                            log::error!("window dispatch failed: {err}");
                            if let Some(ref d) = delegate {
                                d.on_error(&err);
                            }
                        }
                    }
                }
            })
            .map_err(|e| {
                self.dispatch_running.store(false, Ordering::SeqCst);
                AudioError::ConfigurationFailed(format!("failed to spawn dispatch thread: {e}"))
            })?;

        self.dispatch_handle = Some(handle);
        Ok(())
    }

    /// Stop the dispatch loop. Safe to call when not running.
    pub fn stop_dispatch(&mut self) {
        self.dispatch_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.dispatch_handle.take() {
            let _ = handle.join();
        }
    }

    fn dispatch_once<T: Transport>(
        buffer: &Mutex<CircularBuffer>,
        link: &TransportLink<T>,
        window_secs: f64,
    ) -> Result<WindowMessage, AudioError> {
        let samples = {
            let buf = buffer.lock();
            window::extract_last(&*buf, window_secs)?
        };
        let frame = pcm::encode_pcm16(&samples);
        let message = WindowMessage::from_pcm(&frame, chrono::Utc::now());
        link.send_window(&message)?;
        Ok(message)
    }

    fn set_state(&self, new_state: CaptureState) {
        self.shared.lock().state = new_state.clone();
        if let Some(ref d) = self.delegate {
            d.on_state_changed(&new_state);
        }
    }

    fn fail(&self, err: AudioError) -> AudioError {
        self.set_state(CaptureState::Failed(err.clone()));
        if let Some(ref d) = self.delegate {
            d.on_error(&err);
        }
        err
    }
}

impl<S: CaptureSource> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.stop_dispatch();
        if self.shared.lock().state.is_capturing() {
            let _ = self.source.stop();
        }
    }
}
