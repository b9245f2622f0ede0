//! Input tap dispatch.
//!
//! [`InputTap`] is the state the platform event-tap callback closes over. It
//! runs once per delivered event, on the OS run-loop thread, and does exactly
//! one symbol lookup and one sink write before returning. Sink failures,
//! including a log file that cannot be opened, are reported and the event is
//! dropped; they never reach the run loop.

use std::io::Write;

use tracing::{debug, error};

use crate::error::Error;
use crate::event::{CapturedFlagsState, EventKind, KeyEvent, ModifierTransition, RawKeyEvent};
use crate::sink::LogSink;
use crate::symbols::SymbolTable;

/// Counters kept by an [`InputTap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapStats {
    /// Events written to the log.
    pub recorded: u64,
    /// Events dropped because the sink failed.
    pub dropped: u64,
}

/// Translates raw events and hands them to the log sink.
#[derive(Debug)]
pub struct InputTap<W: Write> {
    symbols: SymbolTable,
    sink: LogSink<W>,
    flags: CapturedFlagsState,
    stats: TapStats,
}

impl<W: Write> InputTap<W> {
    /// Create a tap writing to `sink`, starting from `flags`.
    pub fn new(symbols: SymbolTable, sink: LogSink<W>, flags: CapturedFlagsState) -> Self {
        Self {
            symbols,
            sink,
            flags,
            stats: TapStats::default(),
        }
    }

    /// Handle one event delivered by the OS, stamped with the current time.
    pub fn handle(&mut self, raw: RawKeyEvent) {
        let event = KeyEvent::now(raw.key_code, raw.kind);
        self.dispatch(&event, raw.flags);
    }

    /// Handle an already-timestamped event.
    ///
    /// `flags` is the modifier mask that came with the event; it only matters
    /// for [`EventKind::FlagsChanged`].
    pub fn dispatch(&mut self, event: &KeyEvent, flags: u64) {
        if event.kind == EventKind::FlagsChanged {
            match self.flags.update(flags) {
                ModifierTransition::Pressed(changed) => {
                    debug!(key_code = %event.key_code, ?changed, "Modifier pressed");
                }
                ModifierTransition::Released(changed) => {
                    debug!(key_code = %event.key_code, ?changed, "Modifier released");
                }
                ModifierTransition::Unchanged => {
                    debug!(key_code = %event.key_code, "Modifier event without flag change");
                }
            }
        }

        let token = self.symbols.translate(event.key_code);
        match self.sink.record(event, token) {
            Ok(()) => self.stats.recorded += 1,
            Err(e @ Error::LogOpen { .. }) => {
                self.stats.dropped += 1;
                error!(error = %e, key_code = %event.key_code, "Log file not created, dropping event");
            }
            Err(e) => {
                self.stats.dropped += 1;
                error!(error = %e, key_code = %event.key_code, "Dropping event");
            }
        }
    }

    /// Modifier state as of the last event.
    #[must_use]
    pub fn flags(&self) -> &CapturedFlagsState {
        &self.flags
    }

    /// Event counters.
    #[must_use]
    pub fn stats(&self) -> TapStats {
        self.stats
    }

    /// Borrow the sink.
    #[must_use]
    pub fn sink(&self) -> &LogSink<W> {
        &self.sink
    }
}
