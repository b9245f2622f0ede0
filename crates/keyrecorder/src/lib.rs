//! `keyrecorder` - global keystroke transcript recorder
//!
//! This library holds the platform-independent half of the recorder: the key
//! code symbol table, the event model, the append-only log sink, and the input
//! tap dispatcher that the platform event tap drives.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod sink;
pub mod symbols;
pub mod tap;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{CapturedFlagsState, EventKind, KeyCode, KeyEvent, RawKeyEvent};
pub use logging::init_logging;
pub use sink::LogSink;
pub use symbols::{SymbolTable, UNKNOWN_TOKEN};
pub use tap::InputTap;
