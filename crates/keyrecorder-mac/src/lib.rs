//! macOS-specific implementation for keyrecorder.
//!
//! This crate installs the session-wide keyboard event tap, reports the raw
//! key-down and flags-changed events to a caller-supplied handler, and
//! explains the permissions the tap needs when the OS refuses it.

#![cfg(target_os = "macos")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod event;
pub mod permissions;
pub mod tap;

pub use event::{TapEvent, TapEventKind};
pub use permissions::{
    check_permission, get_permission_instructions, is_accessibility_enabled, PermissionStatus,
};
pub use tap::{current_modifier_flags, run_event_tap, TapError};

/// Get the platform name.
#[must_use]
pub fn platform_name() -> &'static str {
    "macOS"
}
