//! Transient alerts: a short tone plus a toast
//!
//! Tone playback may be refused by the host (muted terminal, blocked audio);
//! that failure is dropped after a debug line and never reaches the caller.

use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ToastLevel::Info => "info",
            ToastLevel::Success => "success",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        };
        f.write_str(label)
    }
}

/// Short-lived message shown to the admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Output surface for alerts
pub trait AlertSink: Send + Sync {
    fn play_tone(&self) -> std::io::Result<()>;
    fn show_toast(&self, toast: &Toast);
}

/// Alert front end used by the push dispatcher and pages
#[derive(Clone)]
pub struct Alerts {
    sink: Arc<dyn AlertSink>,
}

impl Alerts {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self { sink }
    }

    /// Tone then toast
    pub fn notify(&self, toast: &Toast) {
        if let Err(e) = self.sink.play_tone() {
            tracing::debug!("Alert tone suppressed: {e}");
        }
        self.sink.show_toast(toast);
    }

    /// Toast only
    pub fn toast(&self, toast: &Toast) {
        self.sink.show_toast(toast);
    }
}

/// Terminal bell and a line on stdout
#[derive(Debug, Default)]
pub struct TerminalAlertSink;

impl AlertSink for TerminalAlertSink {
    fn play_tone(&self) -> std::io::Result<()> {
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()
    }

    fn show_toast(&self, toast: &Toast) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "[{}] {}", toast.level, toast.message) {
            tracing::debug!("Toast not shown: {e}");
        }
    }
}

/// Records alerts; for headless runs and tests
#[derive(Debug, Default)]
pub struct MemoryAlertSink {
    tone_blocked: bool,
    tones: Mutex<usize>,
    toasts: Mutex<Vec<Toast>>,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tone request fails, like a host that blocks audio
    pub fn blocking_tones() -> Self {
        Self {
            tone_blocked: true,
            ..Self::default()
        }
    }

    pub fn tones(&self) -> usize {
        *self.tones.lock()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }
}

impl AlertSink for MemoryAlertSink {
    fn play_tone(&self) -> std::io::Result<()> {
        if self.tone_blocked {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "audio playback blocked",
            ));
        }
        *self.tones.lock() += 1;
        Ok(())
    }

    fn show_toast(&self, toast: &Toast) {
        self.toasts.lock().push(toast.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_tone_still_shows_toast() {
        let sink = Arc::new(MemoryAlertSink::blocking_tones());
        let alerts = Alerts::new(sink.clone());
        alerts.notify(&Toast::info("New booking"));

        assert_eq!(sink.tones(), 0);
        assert_eq!(sink.toasts(), vec![Toast::info("New booking")]);
    }
}
