use chrono::Weekday;

use crate::{analysis::insights::WeekdayHourCount, storage::entities::weekday_name};

const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekday × hour grid, each cell shaded by the number of sessions started there.
pub fn render_heatmap(cells: &[WeekdayHourCount]) -> String {
    let mut grid = [[0usize; 24]; 7];
    for cell in cells {
        grid[cell.day_of_week.num_days_from_monday() as usize][cell.hour_of_day as usize] +=
            cell.count;
    }
    let max = cells.iter().map(|v| v.count).max().unwrap_or(0);

    let mut result = String::new();
    result.push_str(&format!("{:<10}", ""));
    for hour in 0..24 {
        if hour % 3 == 0 {
            result.push_str(&format!("{hour:<3}"));
        }
    }
    result.push('\n');

    for day in WEEK {
        result.push_str(&format!("{:<10}", weekday_name(day)));
        for count in grid[day.num_days_from_monday() as usize] {
            result.push(shade(count, max));
        }
        result.push('\n');
    }
    result
}

fn shade(count: usize, max: usize) -> char {
    if count == 0 || max == 0 {
        return SHADES[0];
    }
    // Any session at all gets at least the lightest shade.
    let level = (count * (SHADES.len() - 1)).div_ceil(max);
    SHADES[level.clamp(1, SHADES.len() - 1)]
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use crate::analysis::insights::WeekdayHourCount;

    use super::{render_heatmap, shade};

    #[test]
    fn test_shade() {
        assert_eq!(shade(0, 4), ' ');
        assert_eq!(shade(1, 100), '░');
        assert_eq!(shade(4, 4), '█');
    }

    #[test]
    fn test_render_heatmap() {
        let map = render_heatmap(&[
            WeekdayHourCount {
                day_of_week: Weekday::Tue,
                hour_of_day: 0,
                count: 2,
            },
            WeekdayHourCount {
                day_of_week: Weekday::Sun,
                hour_of_day: 23,
                count: 1,
            },
        ]);
        let lines = map.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 8);
        assert!(lines[2].starts_with("Tuesday   █"));
        assert!(lines[7].starts_with("Sunday"));
        assert!(lines[7].ends_with('▒'));
        assert!(lines[1].trim_end() == "Monday");
    }
}
