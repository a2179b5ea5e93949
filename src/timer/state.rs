use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerState {
    Idle,
    Running {
        remaining_seconds: u32,
        total_seconds: u32,
    },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start { seconds: u32 },
    Tick,
    Reset,
}

/// Countdown state machine. All changes go through [FocusTimer::apply].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTimer {
    state: TimerState,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        match self.state {
            TimerState::Running {
                remaining_seconds, ..
            } => remaining_seconds,
            TimerState::Idle | TimerState::Completed => 0,
        }
    }

    /// Elapsed part of the countdown, from 0 to 1.
    pub fn progress(&self) -> f64 {
        match self.state {
            TimerState::Idle => 0.,
            TimerState::Running {
                remaining_seconds,
                total_seconds,
            } => (total_seconds - remaining_seconds) as f64 / total_seconds as f64,
            TimerState::Completed => 1.,
        }
    }

    /// Applies a command and returns the new state. Failed commands leave the state untouched.
    pub fn apply(&mut self, command: TimerCommand) -> Result<TimerState> {
        self.state = match (self.state, command) {
            (TimerState::Running { .. }, TimerCommand::Start { .. }) => {
                bail!("Timer is already running")
            }
            (_, TimerCommand::Start { seconds: 0 }) => {
                bail!("Timer needs at least one second to count down")
            }
            (_, TimerCommand::Start { seconds }) => TimerState::Running {
                remaining_seconds: seconds,
                total_seconds: seconds,
            },
            (
                TimerState::Running {
                    remaining_seconds,
                    total_seconds,
                },
                TimerCommand::Tick,
            ) => match remaining_seconds.saturating_sub(1) {
                0 => TimerState::Completed,
                remaining_seconds => TimerState::Running {
                    remaining_seconds,
                    total_seconds,
                },
            },
            (state @ (TimerState::Idle | TimerState::Completed), TimerCommand::Tick) => state,
            (_, TimerCommand::Reset) => TimerState::Idle,
        };
        Ok(self.state)
    }
}
