pub mod focus;
pub mod generate;
pub mod history;
pub mod insights;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use focus::{process_focus_command, FocusCommand};
use generate::{process_generate_command, GenerateCommand};
use history::{process_history_command, HistoryCommand};
use insights::{process_insights_command, InsightsCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    storage::session_store::CsvSessionStore,
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "focus-garden", version, long_about = None)]
#[command(about = "Focus timer that records your sessions and shows where your focus goes", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Print logs into the console as well")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start a focus countdown. The session is recorded once it runs out")]
    Focus {
        #[command(flatten)]
        command: FocusCommand,
    },
    #[command(about = "Display statistics over recorded sessions")]
    Insights {
        #[command(flatten)]
        command: InsightsCommand,
    },
    #[command(about = "List recorded sessions, newest first")]
    History {
        #[command(flatten)]
        command: HistoryCommand,
    },
    #[command(about = "Fill the history with generated sessions. Intended for trying the dashboard out")]
    Generate {
        #[command(flatten)]
        command: GenerateCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    let store = CsvSessionStore::in_dir(&app_dir)?;
    debug!("Using store {:?}", store.path());

    match args.commands {
        Commands::Focus { command } => process_focus_command(command, store).await,
        Commands::Insights { command } => process_insights_command(command, store).await,
        Commands::History { command } => process_history_command(command, store).await,
        Commands::Generate { command } => process_generate_command(command, store).await,
    }
}
