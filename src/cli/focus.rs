use std::io::Write;

use ansi_term::Colour;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    storage::{entities::PLANTS, recorder::Recorder, session_store::CsvSessionStore},
    timer::{
        countdown::{run_countdown, CountdownOutcome},
        shutdown::detect_shutdown,
        state::FocusTimer,
        DEFAULT_FOCUS_MINUTES,
    },
    utils::{
        clock::{Clock, DefaultClock},
        time::{format_countdown, format_minutes},
    },
};

use super::{output::bar, Args};

const PROGRESS_WIDTH: usize = 30;

#[derive(Debug, Parser)]
pub struct FocusCommand {
    #[arg(short, long, default_value_t = DEFAULT_FOCUS_MINUTES, help = "Length of the session in minutes")]
    minutes: u32,
    #[arg(
        short,
        long,
        help = "Plant grown by the session. A random one is picked by default"
    )]
    category: Option<String>,
}

/// Runs a countdown and records the session once it completes. Ctrl-C abandons the session.
pub async fn process_focus_command(
    FocusCommand { minutes, category }: FocusCommand,
    store: CsvSessionStore,
) -> Result<()> {
    if minutes == 0 {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                "Focus session should last at least 1 minute",
            )
            .into());
    }

    let category = category.unwrap_or_else(|| {
        PLANTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PLANTS[0])
            .to_string()
    });

    let clock = DefaultClock;
    let started_at = clock.time().naive_local();
    let shutdown = CancellationToken::new();
    let mut timer = FocusTimer::new();

    println!(
        "Focusing for {} on {category}. Ctrl-C to give up",
        format_minutes(minutes as u64)
    );

    let (_, outcome) = tokio::join!(detect_shutdown(shutdown.clone()), async {
        let outcome = run_countdown(
            &mut timer,
            minutes.saturating_mul(60),
            &clock,
            shutdown.clone(),
            print_timer,
        )
        .await;
        // Lets shutdown detection finish as well.
        shutdown.cancel();
        outcome
    });
    println!();

    match outcome? {
        CountdownOutcome::Completed => {
            let recorder = Recorder::new(store, Box::new(clock));
            let sessions = recorder
                .record_session_started_at(started_at, minutes, &category)
                .await?;
            info!("Session recorded");
            println!(
                "{} You grew {category}. That's {} sessions so far",
                Colour::Green.bold().paint("Done!"),
                sessions.len()
            );
        }
        CountdownOutcome::Cancelled => {
            println!("{}", Colour::Red.paint("Session abandoned, nothing was recorded"));
        }
    }
    Ok(())
}

fn print_timer(timer: &FocusTimer) {
    print!(
        "\r{} {} {:>3.0}%",
        Colour::White.bold().paint(format_countdown(timer.remaining_seconds())),
        bar(timer.progress(), 1., PROGRESS_WIDTH),
        timer.progress() * 100.
    );
    let _ = std::io::stdout().flush();
}
