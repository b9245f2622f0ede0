//! Command-line interface for keyrecorder.
//!
//! The recorder takes no operands; only diagnostic verbosity can be adjusted.

use clap::Parser;

use crate::logging::Verbosity;

/// keyrec - Record global keystrokes to `keystroke.log`
///
/// Installs a session-wide keyboard event tap and appends one timestamped
/// line per key-down or modifier change to the log file in the working
/// directory. Runs until terminated.
#[derive(Debug, Parser)]
#[command(name = "keyrec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase diagnostic verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
