//! Linux-specific implementation for keyrecorder
//!
//! The key code table is built on macOS virtual key codes, so there is no
//! event tap here yet. This crate exposes the same surface as the macOS crate
//! and reports the platform as unsupported.

#![cfg(target_os = "linux")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use thiserror::Error;
use tracing::debug;

/// The kind of keyboard event the tap observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEventKind {
    /// A key was pressed.
    KeyDown,
    /// A modifier key changed state.
    FlagsChanged,
}

/// A raw keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapEvent {
    /// What kind of event this is.
    pub kind: TapEventKind,
    /// Platform key code.
    pub key_code: u16,
    /// Modifier mask at the time of the event.
    pub flags: u64,
}

/// Errors raised while installing the event tap.
#[derive(Debug, Error)]
pub enum TapError {
    /// No global keyboard tap is available on this platform.
    #[error("global keyboard capture is not supported on Linux")]
    Unsupported,
}

impl TapError {
    /// Remediation text to show the operator, if any
    #[must_use]
    pub fn instructions(&self) -> Option<&'static str> {
        None
    }
}

/// Modifier flags currently held; always empty here
#[must_use]
pub fn current_modifier_flags() -> u64 {
    0
}

/// Install the keyboard tap
///
/// # Errors
///
/// Always returns [`TapError::Unsupported`]
pub fn run_event_tap<F>(_handler: F) -> Result<(), TapError>
where
    F: FnMut(TapEvent),
{
    debug!("No keyboard event tap available for Linux");
    Err(TapError::Unsupported)
}

/// Get platform name
#[must_use]
pub fn platform_name() -> &'static str {
    "Linux"
}
