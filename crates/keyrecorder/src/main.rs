//! `keyrec` - record global keystrokes to a log file
//!
//! Installs the platform keyboard tap and blocks in the OS run loop. The
//! keystroke log is created when the first event arrives. Exits with status 1
//! only if the tap cannot be installed.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use keyrecorder::cli::Cli;
use keyrecorder::{init_logging, CapturedFlagsState, Config, InputTap, LogSink, RawKeyEvent, SymbolTable};

// Platform-specific imports using conditional compilation
#[cfg(target_os = "linux")]
use keyrecorder_linux as platform;

#[cfg(target_os = "macos")]
use keyrecorder_mac as platform;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let sink = LogSink::new(config.log_path());
    let flags = CapturedFlagsState::new(platform::current_modifier_flags());
    let mut tap = InputTap::new(SymbolTable::new(), sink, flags);

    info!(
        platform = platform::platform_name(),
        log = %tap.sink().path().display(),
        "Installing keyboard event tap"
    );

    match platform::run_event_tap(|event| tap.handle(to_raw(event))) {
        Ok(()) => {
            let stats = tap.stats();
            info!(
                recorded = stats.recorded,
                dropped = stats.dropped,
                log_opened = tap.sink().is_open(),
                "Stopped"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            if let Some(instructions) = e.instructions() {
                eprintln!("{instructions}");
            }
            ExitCode::FAILURE
        }
    }
}

fn to_raw(event: platform::TapEvent) -> RawKeyEvent {
    match event.kind {
        platform::TapEventKind::KeyDown => RawKeyEvent::key_down(event.key_code, event.flags),
        platform::TapEventKind::FlagsChanged => {
            RawKeyEvent::flags_changed(event.key_code, event.flags)
        }
    }
}
