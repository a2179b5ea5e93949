use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::utils::clock::Clock;

use super::state::{FocusTimer, TimerCommand, TimerState};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Completed,
    Cancelled,
}

/// Starts `timer` for `seconds` and ticks it once per [TICK_INTERVAL] until it completes.
/// `on_tick` sees the timer after the start and after every tick, which is where the display
/// refresh hooks in.
#[instrument(skip(timer, clock, shutdown, on_tick))]
pub async fn run_countdown(
    timer: &mut FocusTimer,
    seconds: u32,
    clock: &dyn Clock,
    shutdown: CancellationToken,
    mut on_tick: impl FnMut(&FocusTimer),
) -> Result<CountdownOutcome> {
    timer.apply(TimerCommand::Start { seconds })?;
    on_tick(timer);

    // Deadlines are derived from the start rather than from the previous wake up, so slow
    // redraws don't make the countdown drift.
    let mut tick_point = clock.instant();
    loop {
        tick_point += TICK_INTERVAL;

        tokio::select! {
            // Cancelled sessions are never recorded, the timer goes back to idle.
            _ = shutdown.cancelled() => {
                info!("Countdown cancelled with {} seconds left", timer.remaining_seconds());
                timer.apply(TimerCommand::Reset)?;
                return Ok(CountdownOutcome::Cancelled);
            }
            _ = clock.sleep_until(tick_point) => ()
        }

        let state = timer.apply(TimerCommand::Tick)?;
        on_tick(timer);
        debug!("Tick {state:?}");

        if state == TimerState::Completed {
            info!("Countdown of {seconds} seconds completed");
            return Ok(CountdownOutcome::Completed);
        }
    }
}
