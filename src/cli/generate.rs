use ansi_term::Colour;
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    analysis::generator::{generate_history, GenerationOutcome, GeneratorConfig},
    storage::session_store::CsvSessionStore,
};

const MAX_GENERATED_DAYS: i64 = 3650;

#[derive(Debug, Parser)]
pub struct GenerateCommand {
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::value_parser!(u32).range(1..=MAX_GENERATED_DAYS),
        help = "Number of days to generate, ending yesterday"
    )]
    days: u32,
    #[arg(long, help = "Seed for reproducible histories")]
    seed: Option<u64>,
}

pub async fn process_generate_command(
    GenerateCommand { days, seed }: GenerateCommand,
    store: CsvSessionStore,
) -> Result<()> {
    let config = GeneratorConfig {
        days,
        ..Default::default()
    };
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    match generate_history(&store, &config, Local::now().date_naive(), &mut rng).await? {
        GenerationOutcome::Skipped { existing } => {
            println!(
                "{} The history already has {existing} sessions. Remove {:?} to generate a fresh one",
                Colour::Yellow.paint("Skipped."),
                store.path()
            );
        }
        GenerationOutcome::Generated(report) => {
            println!(
                "Generated {} sessions. Daily focus went from {:.0}m to {:.0}m",
                report.generated, report.before_daily_minutes, report.after_daily_minutes
            );
            if let Some(uplift) = report.uplift {
                println!("Daily focus time improved by {}", Colour::Green.paint(uplift.to_string()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::GenerateCommand;

    #[test]
    fn test_days_are_bounded() {
        assert_eq!(GenerateCommand::try_parse_from(["generate"]).unwrap().days, 30);
        assert_eq!(
            GenerateCommand::try_parse_from(["generate", "--days", "3650"])
                .unwrap()
                .days,
            3650
        );
        assert!(GenerateCommand::try_parse_from(["generate", "--days", "0"]).is_err());
        assert!(GenerateCommand::try_parse_from(["generate", "--days", "4000000000"]).is_err());
    }
}
