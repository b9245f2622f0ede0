//! Session-wide keyboard event tap.
//!
//! The tap is a listen-only `CGEventTap` inserted at the head of the session
//! event stream and filtered to key-down and flags-changed events. It is added
//! to the current thread's `CFRunLoop`, which then blocks; the handler runs
//! synchronously on that thread once per event. Events are never modified or
//! swallowed.

use std::cell::RefCell;

use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop};
use core_graphics::event::{
    CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
    EventField,
};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::event::{TapEvent, TapEventKind};
use crate::permissions::{self, PermissionStatus};

/// Errors raised while installing the event tap.
#[derive(Debug, Error)]
pub enum TapError {
    /// The OS refused to create the tap, almost always a missing permission.
    #[error("failed to create event tap ({description})", description = .status.description)]
    PermissionDenied {
        /// Accessibility trust status at the time of the failure.
        status: PermissionStatus,
        /// Instructions for granting the permission.
        instructions: &'static str,
    },

    /// The tap's mach port could not be turned into a run loop source.
    #[error("failed to create a run loop source for the event tap")]
    RunLoopSource,
}

impl TapError {
    /// Remediation text to show the operator, if any.
    #[must_use]
    pub fn instructions(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { instructions, .. } => Some(*instructions),
            Self::RunLoopSource => None,
        }
    }
}

/// Read the modifier flags currently reported for the combined session.
///
/// Returns an empty mask if the event source cannot be created.
#[must_use]
pub fn current_modifier_flags() -> u64 {
    CGEventSource::new(CGEventSourceStateID::CombinedSessionState)
        .and_then(CGEvent::new)
        .map_or(0, |event| event.get_flags().bits())
}

/// Install the keyboard tap and run the current thread's run loop.
///
/// `handler` is called once per key-down or flags-changed event, in delivery
/// order, on the calling thread. This only returns if the run loop is stopped.
///
/// # Errors
///
/// Returns [`TapError::PermissionDenied`] if the OS refuses the tap and
/// [`TapError::RunLoopSource`] if it cannot be scheduled.
pub fn run_event_tap<F>(handler: F) -> Result<(), TapError>
where
    F: FnMut(TapEvent),
{
    let handler = RefCell::new(handler);

    let tap = CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        vec![CGEventType::KeyDown, CGEventType::FlagsChanged],
        |_proxy, event_type, event| {
            if let Some(tap_event) = convert_event(event_type, event) {
                (&mut *handler.borrow_mut())(tap_event);
            }
            // Listen-only: the original event continues down the chain.
            None
        },
    )
    .map_err(|()| TapError::PermissionDenied {
        status: permissions::check_permission(),
        instructions: permissions::get_permission_instructions(),
    })?;

    let source = tap
        .mach_port
        .create_runloop_source(0)
        .map_err(|()| TapError::RunLoopSource)?;

    // SAFETY: `kCFRunLoopCommonModes` is an immutable constant exported by
    // CoreFoundation and valid for the life of the process.
    #[allow(unsafe_code)]
    let common_modes = unsafe { kCFRunLoopCommonModes };
    CFRunLoop::get_current().add_source(&source, common_modes);
    tap.enable();

    info!("Keyboard event tap installed, entering run loop");
    CFRunLoop::run_current();
    info!("Run loop exited");

    Ok(())
}

fn convert_event(event_type: CGEventType, event: &CGEvent) -> Option<TapEvent> {
    let kind = match event_type {
        CGEventType::KeyDown => TapEventKind::KeyDown,
        CGEventType::FlagsChanged => TapEventKind::FlagsChanged,
        CGEventType::TapDisabledByTimeout => {
            warn!("Event tap disabled by the OS: callback exceeded the timeout");
            return None;
        }
        CGEventType::TapDisabledByUserInput => {
            warn!("Event tap disabled by user input");
            return None;
        }
        other => {
            debug!(?other, "Ignoring unexpected event type");
            return None;
        }
    };

    let raw = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
    // CGKeyCode is 16 bits; anything else falls through to the unknown token.
    let key_code = u16::try_from(raw).unwrap_or(u16::MAX);

    Some(TapEvent {
        kind,
        key_code,
        flags: event.get_flags().bits(),
    })
}
