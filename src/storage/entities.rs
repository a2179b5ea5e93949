use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rewards handed out for a finished session. Labels match the ones existing history files carry,
/// so they are kept verbatim.
pub const PLANTS: [&str; 4] = ["🌱 嫩芽", "🌻 向日葵", "🌲 松树", "🌵 仙人掌"];

/// A completed focus session. Only the canonical facts are kept, everything else (weekday, hour)
/// is derived on demand so it can never disagree with the timestamp.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone)]
pub struct SessionEntity {
    pub started_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub category: Arc<str>,
}

impl SessionEntity {
    pub fn date(&self) -> NaiveDate {
        self.started_at.date()
    }

    pub fn start_time(&self) -> NaiveTime {
        self.started_at.time()
    }

    pub fn day_of_week(&self) -> Weekday {
        self.started_at.weekday()
    }

    pub fn hour_of_day(&self) -> u32 {
        self.started_at.hour()
    }
}

/// Row layout of the store file. Column order is part of the file format.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRow {
    #[serde(with = "date_ser")]
    pub date: NaiveDate,
    #[serde(with = "time_ser")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub plant_type: String,
    pub day_of_week: String,
    pub hour_of_day: u32,
}

pub const STORE_HEADER: [&str; 6] = [
    "date",
    "start_time",
    "duration_minutes",
    "plant_type",
    "day_of_week",
    "hour_of_day",
];

impl From<&SessionEntity> for SessionRow {
    fn from(entity: &SessionEntity) -> Self {
        SessionRow {
            date: entity.date(),
            start_time: entity.start_time(),
            duration_minutes: entity.duration_minutes,
            plant_type: entity.category.to_string(),
            day_of_week: weekday_name(entity.day_of_week()).to_string(),
            hour_of_day: entity.hour_of_day(),
        }
    }
}

impl From<SessionRow> for SessionEntity {
    fn from(
        SessionRow {
            date,
            start_time,
            duration_minutes,
            plant_type,
            day_of_week,
            hour_of_day,
        }: SessionRow,
    ) -> Self {
        let entity = SessionEntity {
            started_at: date.and_time(start_time),
            duration_minutes,
            category: plant_type.into(),
        };
        // Redundant columns are only written for readers of the raw file. Ours are re-derived.
        if day_of_week != weekday_name(entity.day_of_week()) || hour_of_day != entity.hour_of_day()
        {
            warn!(
                "Stored weekday/hour ({day_of_week}, {hour_of_day}) disagree with {}, using the timestamp",
                entity.started_at
            );
        }
        entity
    }
}

/// Full English weekday name, the form the store file uses.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

mod date_ser {
    use chrono::NaiveDate;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::format_record_date;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_record_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(D::Error::custom)
    }
}

mod time_ser {
    use chrono::NaiveTime;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    use crate::utils::time::format_record_time;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_record_time(*time))
    }

    /// Older generated files wrote hours without padding (`9:00:00`), %H accepts both.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").map_err(D::Error::custom)
    }
}
