use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveTime};
use rand::{seq::SliceRandom, Rng};
use tracing::{info, instrument, warn};

use crate::{
    storage::{
        entities::{SessionEntity, PLANTS},
        session_store::SessionStore,
    },
    utils::percentage::{relative_change, Percentage},
};

/// Generation phase: how many sessions a day gets and how long they roughly are.
#[derive(Debug, Clone)]
pub struct Regime {
    pub sessions_per_day: RangeInclusive<u32>,
    pub mean_duration: f64,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of synthetic days, ending yesterday. The first half uses `before`, the rest `after`.
    pub days: u32,
    pub before: Regime,
    pub after: Regime,
    pub duration_std_dev: f64,
    pub min_duration: u32,
    pub hours: RangeInclusive<u32>,
    /// Generation is skipped when the store already holds more sessions than this.
    pub existing_limit: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: 30,
            before: Regime {
                sessions_per_day: 1..=2,
                mean_duration: 25.,
            },
            after: Regime {
                sessions_per_day: 4..=6,
                mean_duration: 45.,
            },
            duration_std_dev: 5.,
            min_duration: 10,
            hours: 9..=22,
            existing_limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The store already had real data and was left alone.
    Skipped { existing: usize },
    Generated(GenerationReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub generated: usize,
    pub before_daily_minutes: f64,
    pub after_daily_minutes: f64,
    /// Growth of the mean daily focus time between regimes.
    pub uplift: Option<Percentage>,
}

/// Fills the store with a made-up history that gets visibly better halfway through. Existing
/// sessions are kept, and nothing happens at all if there are too many of them.
#[instrument(skip(store, rng))]
pub async fn generate_history(
    store: &impl SessionStore,
    config: &GeneratorConfig,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<GenerationOutcome> {
    let mut sessions = store.load_all().await?;
    if sessions.len() > config.existing_limit {
        warn!(
            "Store already holds {} sessions, refusing to mix in synthetic ones",
            sessions.len()
        );
        return Ok(GenerationOutcome::Skipped {
            existing: sessions.len(),
        });
    }

    let first_day = first_day(config, today)?;
    let synthetic = synthetic_sessions(config, first_day, rng);
    let report = report(config, first_day, &synthetic);

    sessions.extend(synthetic);
    store.replace_all(&sessions).await?;

    info!("Generated {} synthetic sessions", report.generated);
    Ok(GenerationOutcome::Generated(report))
}

/// First synthetic day, so that the last one is the day before `today`.
pub fn first_day(config: &GeneratorConfig, today: NaiveDate) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(config.days as u64))
        .with_context(|| format!("Can't generate {} days back from {today}", config.days))
}

/// Sessions for `config.days` days starting at `first_day`, oldest day first.
pub fn synthetic_sessions(
    config: &GeneratorConfig,
    first_day: NaiveDate,
    rng: &mut impl Rng,
) -> Vec<SessionEntity> {
    let mut sessions = vec![];
    for index in 0..config.days {
        let date = first_day + Days::new(index as u64);
        let regime = regime_for(config, index);

        for _ in 0..rng.gen_range(regime.sessions_per_day.clone()) {
            let hour = rng.gen_range(config.hours.clone());
            let duration = normal_sample(rng, regime.mean_duration, config.duration_std_dev) as i64;
            let category = PLANTS.choose(rng).copied().unwrap_or(PLANTS[0]);

            sessions.push(SessionEntity {
                started_at: date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()),
                duration_minutes: duration.max(config.min_duration as i64) as u32,
                category: category.into(),
            });
        }
    }
    sessions
}

fn regime_for(config: &GeneratorConfig, day_index: u32) -> &Regime {
    if day_index < config.days / 2 {
        &config.before
    } else {
        &config.after
    }
}

fn report(
    config: &GeneratorConfig,
    first_day: NaiveDate,
    sessions: &[SessionEntity],
) -> GenerationReport {
    let before_days = config.days / 2;
    let split = first_day + Days::new(before_days as u64);
    let after_days = config.days - before_days;

    let (before, after): (Vec<_>, Vec<_>) = sessions.iter().partition(|v| v.date() < split);
    let daily_mean = |values: &[&SessionEntity], days: u32| {
        if days == 0 {
            0.
        } else {
            values.iter().map(|v| v.duration_minutes as f64).sum::<f64>() / days as f64
        }
    };

    let before_daily_minutes = daily_mean(&before, before_days);
    let after_daily_minutes = daily_mean(&after, after_days);

    GenerationReport {
        generated: sessions.len(),
        before_daily_minutes,
        after_daily_minutes,
        uplift: relative_change(before_daily_minutes, after_daily_minutes),
    }
}

/// Box-Muller transform. One normal sample out of two uniform ones.
fn normal_sample(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.);
    let u2: f64 = rng.gen();
    let z = (-2. * u1.ln()).sqrt() * (2. * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}
