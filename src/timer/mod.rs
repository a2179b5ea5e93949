//! Focus countdown. [state::FocusTimer] holds the rules, [countdown::run_countdown] drives it
//! with a [crate::utils::clock::Clock].

pub mod countdown;
pub mod shutdown;
pub mod state;

/// Length of a focus session when nothing else is asked for.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
