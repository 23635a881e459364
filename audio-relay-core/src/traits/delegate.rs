use crate::models::audio::AudioLevels;
use crate::models::error::AudioError;
use crate::models::message::WindowMessage;
use crate::models::state::CaptureState;

/// Event delegate for monitoring session notifications.
///
/// All methods are called from capture or dispatch threads, not the UI
/// thread; implementations should marshal if needed. Every method has an
/// empty default so observers implement only what they care about.
pub trait SessionDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, _state: &CaptureState) {}

    /// Called with updated input levels as capture blocks arrive.
    fn on_levels_updated(&self, _levels: &AudioLevels) {}

    /// Called after a trailing window was framed and handed to the transport.
    fn on_window_sent(&self, _message: &WindowMessage) {}

    /// Called when capture or dispatch fails.
    fn on_error(&self, _error: &AudioError) {}
}
