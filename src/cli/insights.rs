use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use now::DateTimeNow;

use crate::{
    analysis::insights::{compute_insights, sessions_between},
    storage::session_store::{CsvSessionStore, SessionStore},
    utils::time::next_day_start,
};

use super::{output::dashboard::render_insights, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct InsightsCommand {
    #[arg(
        long = "start",
        short,
        help = "Start of the range. Examples are \"yesterday\", \"2 weeks ago\", \"15/03/2025\". Whole history by default"
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the range. Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\". Now by default"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(
        long = "days",
        default_value_t = false,
        help = "Take inputs as whole days. For example if start and end are both 15/03/2025 this option includes the whole day"
    )]
    treat_as_days: bool,
    #[arg(long, help = "Print aggregates as json instead of charts")]
    json: bool,
}

/// Command to process `insights` command. Reads the whole store and aggregates the sessions that
/// fall between `start_date` and `end_date`.
pub async fn process_insights_command(
    InsightsCommand {
        start_date,
        end_date,
        date_style,
        treat_as_days,
        json,
    }: InsightsCommand,
    store: CsvSessionStore,
) -> Result<()> {
    let (start, end) = parse_range(start_date, end_date, date_style, treat_as_days)?;

    let sessions = sessions_between(store.load_all().await?, start, end);
    let insights = compute_insights(&sessions);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else if insights.is_empty() {
        println!("{}", empty_message(start, end));
    } else {
        print!("{}", render_insights(&insights));
    }
    Ok(())
}

fn empty_message(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if start == NaiveDateTime::MIN && end == NaiveDateTime::MAX {
        return "No sessions yet. Finish a focus session with `focus-garden focus` or try `focus-garden generate`".into();
    }

    let bound = |v: NaiveDateTime, open: &str| {
        if v == NaiveDateTime::MIN || v == NaiveDateTime::MAX {
            open.to_string()
        } else {
            v.format("%Y-%m-%d %H:%M").to_string()
        }
    };
    format!(
        "No sessions between {} and {}",
        bound(start, "the beginning"),
        bound(end, "now")
    )
}

/// Turns user input into a `[start, end)` range of local timestamps.
fn parse_range(
    start_date: Option<String>,
    end_date: Option<String>,
    date_style: DateStyle,
    treat_as_days: bool,
) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let now = Local::now();
    let dialect: chrono_english::Dialect = date_style.into();
    let parse = |value: Option<String>, name: &str| -> Result<Option<DateTime<Local>>> {
        match value.map(|s| parse_date_string(&s, now, dialect)) {
            Some(Ok(v)) => Ok(Some(v.with_timezone(&Local))),
            Some(Err(e)) => Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate {name} date {e}"),
                )
                .into()),
            None => Ok(None),
        }
    };

    let mut start = parse(start_date, "start")?;
    let mut end = parse(end_date, "end")?;
    if treat_as_days {
        start = start.map(|v| v.beginning_of_day());
        end = end.map(next_day_start);
    }

    Ok((
        start.map_or(NaiveDateTime::MIN, |v| v.naive_local()),
        end.map_or(NaiveDateTime::MAX, |v| v.naive_local()),
    ))
}
