//! Core event types for keyrecorder.
//!
//! A [`RawKeyEvent`] is what the platform tap hands over; the input tap turns
//! it into a timestamped [`KeyEvent`] for the sink. Modifier state is tracked
//! across events by [`CapturedFlagsState`].

use bitflags::bitflags;
use chrono::{DateTime, Local};

/// OS-assigned identifier of a physical key (a macOS `CGKeyCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for KeyCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// The kind of keyboard event observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A key was pressed.
    KeyDown,
    /// A modifier key changed state.
    FlagsChanged,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyDown => write!(f, "key_down"),
            Self::FlagsChanged => write!(f, "flags_changed"),
        }
    }
}

/// An event as delivered by the platform event tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// What kind of event this is.
    pub kind: EventKind,
    /// Key that produced the event.
    pub key_code: KeyCode,
    /// Raw modifier mask reported with the event.
    pub flags: u64,
}

impl RawKeyEvent {
    /// A key-down event.
    #[must_use]
    pub fn key_down(code: u16, flags: u64) -> Self {
        Self {
            kind: EventKind::KeyDown,
            key_code: KeyCode(code),
            flags,
        }
    }

    /// A flags-changed event.
    #[must_use]
    pub fn flags_changed(code: u16, flags: u64) -> Self {
        Self {
            kind: EventKind::FlagsChanged,
            key_code: KeyCode(code),
            flags,
        }
    }
}

/// One observed keyboard event, stamped with local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that produced the event.
    pub key_code: KeyCode,
    /// When the event was captured.
    pub timestamp: DateTime<Local>,
    /// What kind of event this is.
    pub kind: EventKind,
}

impl KeyEvent {
    /// Create an event stamped with the current local time.
    #[must_use]
    pub fn now(key_code: KeyCode, kind: EventKind) -> Self {
        Self::at(key_code, kind, Local::now())
    }

    /// Create an event with an explicit timestamp.
    #[must_use]
    pub fn at(key_code: KeyCode, kind: EventKind, timestamp: DateTime<Local>) -> Self {
        Self {
            key_code,
            timestamp,
            kind,
        }
    }
}

bitflags! {
    /// Device-independent modifier bits of a macOS `CGEventFlags` mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u64 {
        /// Caps lock is on.
        const CAPS_LOCK = 0x0001_0000;
        /// Either shift key.
        const SHIFT = 0x0002_0000;
        /// Either control key.
        const CONTROL = 0x0004_0000;
        /// Either option key.
        const OPTION = 0x0008_0000;
        /// Either command key.
        const COMMAND = 0x0010_0000;
        /// Key is on the numeric keypad.
        const NUMERIC_PAD = 0x0020_0000;
        /// Help key.
        const HELP = 0x0040_0000;
        /// Fn key.
        const FUNCTION = 0x0080_0000;
    }
}

impl ModifierFlags {
    /// Keep only the modifier bits of a raw event mask.
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self::from_bits_truncate(raw)
    }
}

/// Change in held modifiers between two flags-changed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTransition {
    /// These modifiers became active.
    Pressed(ModifierFlags),
    /// These modifiers became inactive.
    Released(ModifierFlags),
    /// No modifier bit changed (e.g. the second of two shift keys).
    Unchanged,
}

/// Last-known modifier state, retained across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapturedFlagsState {
    flags: ModifierFlags,
}

impl CapturedFlagsState {
    /// Start from the given raw mask (normally the OS-reported state).
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self {
            flags: ModifierFlags::from_raw(raw),
        }
    }

    /// The currently retained modifiers.
    #[must_use]
    pub fn flags(&self) -> ModifierFlags {
        self.flags
    }

    /// Replace the retained state with `raw` and report what changed.
    pub fn update(&mut self, raw: u64) -> ModifierTransition {
        let new = ModifierFlags::from_raw(raw);
        let old = std::mem::replace(&mut self.flags, new);

        let pressed = new.difference(old);
        let released = old.difference(new);
        if !pressed.is_empty() {
            ModifierTransition::Pressed(pressed)
        } else if !released.is_empty() {
            ModifierTransition::Released(released)
        } else {
            ModifierTransition::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_code_display() {
        assert_eq!(KeyCode(53).to_string(), "53");
        assert_eq!(KeyCode::from(7), KeyCode(7));
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::KeyDown.to_string(), "key_down");
        assert_eq!(EventKind::FlagsChanged.to_string(), "flags_changed");
    }

    #[test]
    fn test_raw_constructors() {
        let down = RawKeyEvent::key_down(0, 0);
        assert_eq!(down.kind, EventKind::KeyDown);
        assert_eq!(down.key_code, KeyCode(0));

        let flags = RawKeyEvent::flags_changed(56, 0x0002_0102);
        assert_eq!(flags.kind, EventKind::FlagsChanged);
        assert_eq!(flags.flags, 0x0002_0102);
    }

    #[test]
    fn test_key_event_at() {
        let timestamp = Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let event = KeyEvent::at(KeyCode(0), EventKind::KeyDown, timestamp);
        assert_eq!(event.timestamp, timestamp);
        assert_eq!(event.key_code, KeyCode(0));
    }

    #[test]
    fn test_key_event_now_is_recent() {
        let before = Local::now();
        let event = KeyEvent::now(KeyCode(1), EventKind::KeyDown);
        assert!(event.timestamp >= before);
        assert!(event.timestamp <= Local::now());
    }

    #[test]
    fn test_modifier_flags_drop_device_bits() {
        // 0x02 is the left-shift device bit, 0x100 the non-coalesced marker.
        let flags = ModifierFlags::from_raw(0x0002_0102);
        assert_eq!(flags, ModifierFlags::SHIFT);
    }

    #[test]
    fn test_flags_state_initial() {
        let state = CapturedFlagsState::new(0x0010_0000);
        assert_eq!(state.flags(), ModifierFlags::COMMAND);
        assert_eq!(CapturedFlagsState::default().flags(), ModifierFlags::empty());
    }

    #[test]
    fn test_flags_state_press_and_release() {
        let mut state = CapturedFlagsState::default();

        let pressed = state.update(ModifierFlags::SHIFT.bits());
        assert_eq!(pressed, ModifierTransition::Pressed(ModifierFlags::SHIFT));
        assert_eq!(state.flags(), ModifierFlags::SHIFT);

        let released = state.update(0);
        assert_eq!(released, ModifierTransition::Released(ModifierFlags::SHIFT));
        assert!(state.flags().is_empty());
    }

    #[test]
    fn test_flags_state_chord() {
        let mut state = CapturedFlagsState::new(ModifierFlags::COMMAND.bits());
        let both = (ModifierFlags::COMMAND | ModifierFlags::OPTION).bits();

        assert_eq!(
            state.update(both),
            ModifierTransition::Pressed(ModifierFlags::OPTION)
        );
        assert_eq!(
            state.update(ModifierFlags::OPTION.bits()),
            ModifierTransition::Released(ModifierFlags::COMMAND)
        );
    }

    #[test]
    fn test_flags_state_unchanged() {
        let mut state = CapturedFlagsState::new(ModifierFlags::SHIFT.bits());
        // Right shift pressed while left shift is held: coalesced bit stays set.
        assert_eq!(
            state.update(ModifierFlags::SHIFT.bits() | 0x4),
            ModifierTransition::Unchanged
        );
    }
}
