use std::fmt::Write;

use ansi_term::Colour;

use crate::{
    analysis::insights::Insights,
    utils::{
        percentage::share,
        time::{format_minutes, format_record_date},
    },
};

use super::{bar, heading, heatmap::render_heatmap};

const BAR_WIDTH: usize = 30;

/// Full dashboard: headline numbers, daily trend, garden composition and the weekly heatmap.
pub fn render_insights(insights: &Insights) -> String {
    let mut result = String::new();
    // Writing into a String can't fail.
    let _ = write_insights(&mut result, insights);
    result
}

fn write_insights(out: &mut String, insights: &Insights) -> std::fmt::Result {
    writeln!(out, "{}", heading("Focus insights"))?;
    writeln!(out, "Sessions\t{}", insights.total_sessions)?;
    writeln!(out, "Focus time\t{} h", insights.total_hours)?;
    match insights.favorite_hour {
        Some(hour) => writeln!(out, "Best hours\t{hour}:00 - {}:00", hour + 1)?,
        None => writeln!(out, "Best hours\t-")?,
    }
    writeln!(out)?;

    writeln!(out, "{}", heading("Daily focus"))?;
    let max_day = insights
        .daily_trend
        .iter()
        .map(|v| v.duration_minutes)
        .max()
        .unwrap_or(0);
    for day in &insights.daily_trend {
        writeln!(
            out,
            "{}\t{}\t{}",
            format_record_date(day.date),
            Colour::Green.paint(bar(
                day.duration_minutes as f64,
                max_day as f64,
                BAR_WIDTH
            )),
            format_minutes(day.duration_minutes)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", heading("Garden"))?;
    let total = insights.total_sessions as u64;
    for plant in &insights.category_distribution {
        let percentage = share(plant.count as u64, total);
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            plant.category,
            Colour::Yellow.paint(bar(*percentage, 100., BAR_WIDTH)),
            plant.count,
            percentage
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", heading("Focus habits"))?;
    write!(out, "{}", render_heatmap(&insights.weekday_hour_matrix))?;
    Ok(())
}
