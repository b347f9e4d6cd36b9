use clap::Subcommand;
use habit_tracker_core::SeriesPoint;

use super::{open_tracker, print_json, select, CmdResult};

const BAR_WIDTH: f64 = 20.0;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completion for one day
    Day {
        /// Day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Completion series over the chart window
    Series {
        /// Last day of the window (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Print a text chart instead of JSON
        #[arg(long)]
        plot: bool,
    },
}

pub fn run(user: Option<String>, action: StatsAction) -> CmdResult {
    let mut tracker = open_tracker(user)?;
    match action {
        StatsAction::Day { date } => {
            select(&mut tracker, date.as_deref())?;
            print_json(&tracker.day_view().completion)?;
        }
        StatsAction::Series { date, plot } => {
            select(&mut tracker, date.as_deref())?;
            let series = tracker.series();
            if plot {
                print!("{}", render_plot(&series));
            } else {
                print_json(&series)?;
            }
        }
    }
    Ok(())
}

fn render_plot(series: &[SeriesPoint]) -> String {
    series
        .iter()
        .map(|p| {
            let bar = "#".repeat((p.rate / 100.0 * BAR_WIDTH).round() as usize);
            format!("{} {:<20} {:>3.0}%\n", p.date, bar, p.rate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn plot_scales_bars_to_rate() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = [
            SeriesPoint { date: day, rate: 0.0 },
            SeriesPoint { date: day, rate: 50.0 },
            SeriesPoint { date: day, rate: 100.0 },
        ];
        let lines: Vec<_> = render_plot(&series).lines().map(str::to_string).collect();
        assert_eq!(lines[0], format!("2024-01-01 {:<20}   0%", ""));
        assert_eq!(lines[1], format!("2024-01-01 {:<20}  50%", "#".repeat(10)));
        assert_eq!(lines[2], format!("2024-01-01 {} 100%", "#".repeat(20)));
    }
}
