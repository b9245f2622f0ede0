//! Permission handling for the macOS event tap.
//!
//! Installing a session-wide keyboard tap requires the process (or the
//! terminal hosting it) to be trusted for Input Monitoring / Accessibility.
//! The OS only reports the refusal as a null tap, so this module provides the
//! status check and the remediation text shown alongside that failure.

use macos_accessibility_client::accessibility;

/// Information about the current accessibility permission status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionStatus {
    /// Whether the process is trusted for accessibility.
    pub is_granted: bool,

    /// Human-readable description of the status.
    pub description: String,
}

impl PermissionStatus {
    /// Create a new granted status.
    #[must_use]
    pub fn granted() -> Self {
        Self {
            is_granted: true,
            description: "Accessibility permission is granted".to_string(),
        }
    }

    /// Create a new not-granted status.
    #[must_use]
    pub fn not_granted() -> Self {
        Self {
            is_granted: false,
            description: "Accessibility permission is not granted".to_string(),
        }
    }
}

/// Check if the process is trusted for accessibility.
#[must_use]
pub fn is_accessibility_enabled() -> bool {
    accessibility::application_is_trusted()
}

/// Check accessibility permission status.
#[must_use]
pub fn check_permission() -> PermissionStatus {
    if is_accessibility_enabled() {
        PermissionStatus::granted()
    } else {
        PermissionStatus::not_granted()
    }
}

/// Get instructions for granting the permissions the event tap needs.
#[must_use]
pub fn get_permission_instructions() -> &'static str {
    r"You need to enable access for assistive devices:

1. Open System Settings (System Preferences before macOS Ventura)
2. Go to Privacy & Security > Input Monitoring
3. Enable 'keyrec' (or the terminal application running it)
4. Repeat under Privacy & Security > Accessibility
5. If it is not listed, click the '+' button and add it

After granting permission, relaunch keyrec."
}
