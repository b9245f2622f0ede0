//! Raw events delivered by the macOS event tap.

/// The kind of keyboard event the tap observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEventKind {
    /// A key was pressed.
    KeyDown,
    /// A modifier key changed state.
    FlagsChanged,
}

/// A keyboard event as read from a `CGEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapEvent {
    /// What kind of event this is.
    pub kind: TapEventKind,

    /// The `CGKeyCode` of the key that produced the event.
    pub key_code: u16,

    /// The `CGEventFlags` modifier mask at the time of the event.
    pub flags: u64,
}
