use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

use crate::storage::entities::SessionEntity;

/// Summary of the whole session history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total_sessions: usize,
    pub total_hours: f64,
    /// Most frequent starting hour. Ties go to the earliest hour, `None` without sessions.
    pub favorite_hour: Option<u32>,
    /// Minutes per date, oldest first.
    pub daily_trend: Vec<DailyTotal>,
    /// Sessions per category, most common first. Equal counts keep the order categories first
    /// appeared in.
    pub category_distribution: Vec<CategoryCount>,
    /// Sparse: only cells that have at least one session. Monday first, then by hour.
    pub weekday_hour_matrix: Vec<WeekdayHourCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub duration_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Arc<str>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayHourCount {
    pub day_of_week: Weekday,
    pub hour_of_day: u32,
    pub count: usize,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

/// Computes every aggregate over `sessions`. Pure, so calling it again on the same data gives
/// the same result.
pub fn compute_insights(sessions: &[SessionEntity]) -> Insights {
    let total_minutes: u64 = sessions.iter().map(|v| v.duration_minutes as u64).sum();

    Insights {
        total_sessions: sessions.len(),
        total_hours: round_to_tenth(total_minutes as f64 / 60.),
        favorite_hour: favorite_hour(sessions),
        daily_trend: daily_trend(sessions),
        category_distribution: category_distribution(sessions),
        weekday_hour_matrix: weekday_hour_matrix(sessions),
    }
}

/// Keeps sessions that started in `[start, end)`.
pub fn sessions_between(
    sessions: Vec<SessionEntity>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<SessionEntity> {
    sessions
        .into_iter()
        .filter(|v| v.started_at >= start && v.started_at < end)
        .collect()
}

/// Halves go to the even tenth, so 15 minutes are 0.2 hours.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.).round_ties_even() / 10.
}

fn favorite_hour(sessions: &[SessionEntity]) -> Option<u32> {
    let mut counts = [0usize; 24];
    for session in sessions {
        counts[session.hour_of_day() as usize] += 1;
    }

    // max_by_key returns the last maximum, so walk the hours backwards to land on the earliest one.
    counts
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, count)| **count > 0)
        .max_by_key(|(_, count)| **count)
        .map(|(hour, _)| hour as u32)
}

fn daily_trend(sessions: &[SessionEntity]) -> Vec<DailyTotal> {
    let mut days = BTreeMap::<NaiveDate, u64>::new();
    for session in sessions {
        *days.entry(session.date()).or_default() += session.duration_minutes as u64;
    }

    days.into_iter()
        .map(|(date, duration_minutes)| DailyTotal {
            date,
            duration_minutes,
        })
        .collect()
}

fn category_distribution(sessions: &[SessionEntity]) -> Vec<CategoryCount> {
    let mut positions = HashMap::<Arc<str>, usize>::new();
    let mut counts = Vec::<CategoryCount>::new();

    for session in sessions {
        let position = *positions.entry(session.category.clone()).or_insert_with(|| {
            counts.push(CategoryCount {
                category: session.category.clone(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[position].count += 1;
    }

    // Stable sort, so equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn weekday_hour_matrix(sessions: &[SessionEntity]) -> Vec<WeekdayHourCount> {
    let mut cells = BTreeMap::<(u32, u32), (Weekday, usize)>::new();
    for session in sessions {
        let day = session.day_of_week();
        cells
            .entry((day.num_days_from_monday(), session.hour_of_day()))
            .or_insert((day, 0))
            .1 += 1;
    }

    cells
        .into_iter()
        .map(|((_, hour_of_day), (day_of_week, count))| WeekdayHourCount {
            day_of_week,
            hour_of_day,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

    use crate::storage::entities::SessionEntity;

    use super::{compute_insights, sessions_between, CategoryCount, DailyTotal, WeekdayHourCount};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
        NaiveDateTime::new(date, NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
    }

    fn session(started_at: NaiveDateTime, duration_minutes: u32, category: &str) -> SessionEntity {
        SessionEntity {
            started_at,
            duration_minutes,
            category: category.into(),
        }
    }

    #[test]
    fn test_empty_history() {
        let insights = compute_insights(&[]);

        assert!(insights.is_empty());
        assert_eq!(insights.total_sessions, 0);
        assert_eq!(insights.total_hours, 0.);
        assert_eq!(insights.favorite_hour, None);
        assert!(insights.daily_trend.is_empty());
        assert!(insights.category_distribution.is_empty());
        assert!(insights.weekday_hour_matrix.is_empty());
    }

    #[test]
    fn test_single_day_scenario() {
        let sessions = [
            session(at(TEST_DATE, 9), 25, "🌱"),
            session(at(TEST_DATE, 9), 45, "🌱"),
            session(at(TEST_DATE, 14), 30, "🌻"),
        ];

        let insights = compute_insights(&sessions);

        assert_eq!(insights.total_sessions, 3);
        assert_eq!(insights.total_hours, 1.7);
        assert_eq!(insights.favorite_hour, Some(9));
        assert_eq!(
            insights.daily_trend,
            vec![DailyTotal {
                date: TEST_DATE,
                duration_minutes: 100
            }]
        );
    }

    #[test]
    fn test_total_hours_rounds_halves_to_even() {
        let hours = |minutes: u32| {
            compute_insights(&[session(at(TEST_DATE, 9), minutes, "🌱")]).total_hours
        };

        assert_eq!(hours(15), 0.2);
        assert_eq!(hours(27), 0.4);
        assert_eq!(hours(9), 0.2);
        assert_eq!(hours(45), 0.8);
        assert_eq!(hours(100), 1.7);
    }

    #[test]
    fn test_category_distribution_order() {
        let sessions = [
            session(at(TEST_DATE, 9), 25, "🌱"),
            session(at(TEST_DATE, 10), 25, "🌱"),
            session(at(TEST_DATE, 11), 25, "🌻"),
        ];

        assert_eq!(
            compute_insights(&sessions).category_distribution,
            vec![
                CategoryCount {
                    category: Arc::from("🌱"),
                    count: 2
                },
                CategoryCount {
                    category: Arc::from("🌻"),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_category_ties_keep_first_seen() {
        let sessions = [
            session(at(TEST_DATE, 9), 25, "🌵"),
            session(at(TEST_DATE, 10), 25, "🌲"),
            session(at(TEST_DATE, 11), 25, "🌲"),
            session(at(TEST_DATE, 12), 25, "🌵"),
            session(at(TEST_DATE, 13), 25, "🌻"),
        ];

        let order = compute_insights(&sessions)
            .category_distribution
            .into_iter()
            .map(|v| v.category.to_string())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["🌵", "🌲", "🌻"]);
    }

    #[test]
    fn test_favorite_hour_ties_pick_earliest() {
        let sessions = [
            session(at(TEST_DATE, 20), 25, "🌱"),
            session(at(TEST_DATE, 7), 25, "🌱"),
            session(at(TEST_DATE, 20), 25, "🌱"),
            session(at(TEST_DATE, 7), 25, "🌱"),
            session(at(TEST_DATE, 12), 25, "🌱"),
        ];

        assert_eq!(compute_insights(&sessions).favorite_hour, Some(7));
    }

    #[test]
    fn test_daily_trend_is_sorted() {
        let later = TEST_DATE + Duration::days(2);
        let sessions = [
            session(at(later, 9), 40, "🌱"),
            session(at(TEST_DATE, 9), 25, "🌱"),
            session(at(later, 18), 20, "🌱"),
        ];

        assert_eq!(
            compute_insights(&sessions).daily_trend,
            vec![
                DailyTotal {
                    date: TEST_DATE,
                    duration_minutes: 25
                },
                DailyTotal {
                    date: later,
                    duration_minutes: 60
                },
            ]
        );
    }

    #[test]
    fn test_weekday_hour_matrix_is_sparse() {
        // 2024-01-01 is a Monday.
        let sunday = TEST_DATE + Duration::days(6);
        let sessions = [
            session(at(sunday, 9), 25, "🌱"),
            session(at(TEST_DATE, 14), 25, "🌱"),
            session(at(TEST_DATE, 9), 25, "🌱"),
            session(at(TEST_DATE, 9), 25, "🌱"),
        ];

        assert_eq!(
            compute_insights(&sessions).weekday_hour_matrix,
            vec![
                WeekdayHourCount {
                    day_of_week: Weekday::Mon,
                    hour_of_day: 9,
                    count: 2
                },
                WeekdayHourCount {
                    day_of_week: Weekday::Mon,
                    hour_of_day: 14,
                    count: 1
                },
                WeekdayHourCount {
                    day_of_week: Weekday::Sun,
                    hour_of_day: 9,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_compute_insights_is_idempotent() {
        let sessions = [
            session(at(TEST_DATE, 9), 25, "🌱"),
            session(at(TEST_DATE + Duration::days(1), 22), 50, "🌻"),
        ];

        assert_eq!(compute_insights(&sessions), compute_insights(&sessions));
    }

    #[test]
    fn test_sessions_between() {
        let sessions = vec![
            session(at(TEST_DATE, 9), 25, "🌱"),
            session(at(TEST_DATE + Duration::days(1), 9), 25, "🌱"),
            session(at(TEST_DATE + Duration::days(2), 9), 25, "🌱"),
        ];

        let filtered = sessions_between(
            sessions,
            at(TEST_DATE + Duration::days(1), 0),
            at(TEST_DATE + Duration::days(2), 9),
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date(), TEST_DATE + Duration::days(1));
    }
}
