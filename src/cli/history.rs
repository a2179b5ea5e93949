use anyhow::Result;
use clap::Parser;

use crate::{
    storage::{
        entities::{weekday_name, SessionEntity},
        session_store::{CsvSessionStore, SessionStore},
    },
    utils::time::{format_record_date, format_record_time},
};

#[derive(Debug, Parser)]
pub struct HistoryCommand {
    #[arg(short = 'n', long, default_value_t = 20, help = "Number of sessions to show")]
    limit: usize,
}

pub async fn process_history_command(
    HistoryCommand { limit }: HistoryCommand,
    store: CsvSessionStore,
) -> Result<()> {
    let sessions = store.load_all().await?;
    if sessions.is_empty() {
        println!("No sessions recorded yet");
        return Ok(());
    }

    for line in history_lines(sessions, limit) {
        println!("{line}");
    }
    Ok(())
}

fn history_lines(mut sessions: Vec<SessionEntity>, limit: usize) -> Vec<String> {
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    sessions
        .iter()
        .take(limit)
        .map(|v| {
            format!(
                "{}\t{}\t{}\t{}m\t{}",
                format_record_date(v.date()),
                format_record_time(v.start_time()),
                weekday_name(v.day_of_week()),
                v.duration_minutes,
                v.category
            )
        })
        .collect()
}
