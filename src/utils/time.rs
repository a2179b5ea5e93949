use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

/// This is the standard way of converting a date to a string in focus-garden.
pub fn format_record_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_record_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Drops sub-second precision. Stored timestamps only keep whole seconds.
pub fn trim_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

/// Returns start of the next day.
pub fn next_day_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    let next = date + Duration::days(1);
    next.with_time(NaiveTime::MIN).earliest().unwrap_or(next)
}

/// Formats seconds the way the countdown shows them: `MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_minutes(minutes: u64) -> String {
    let v = Duration::minutes(minutes as i64);
    if v.num_hours() > 0 {
        format!("{}h{}m", v.num_hours(), v.num_minutes() % 60)
    } else {
        format!("{}m", v.num_minutes())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    use super::{
        format_countdown, format_minutes, format_record_date, format_record_time, next_day_start,
    };

    #[test]
    fn test_record_formats() {
        assert_eq!(
            format_record_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            "2024-01-05"
        );
        assert_eq!(
            format_record_time(NaiveTime::from_hms_opt(9, 3, 7).unwrap()),
            "09:03:07"
        );
    }

    #[test]
    fn test_next_day_start() {
        let date = Utc.with_ymd_and_hms(2024, 2, 29, 17, 45, 0).unwrap();
        assert_eq!(
            next_day_start(date),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(25 * 60), "25:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(100), "1h40m");
    }
}
