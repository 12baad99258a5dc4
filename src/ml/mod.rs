//! ML module - aggregation, balance and trends over workout logs
//!
//! Features:
//! - Per-part muscle load aggregation from tagged logs
//! - Left/right, upper/lower and front/back balance analysis
//! - Volume trend lines using linear regression (linfa)

pub mod balance;
pub mod muscle_tracker;
pub mod predictor;

pub use balance::{BalanceAnalyzer, BalanceReport, PairBalance, Threshold};
pub use muscle_tracker::MuscleTracker;
pub use predictor::{TrendDirection, VolumeTrend};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};

use crate::db::WorkoutLog;

/// Look-back window relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFrame {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Week => "week",
            TimeFrame::Month => "month",
            TimeFrame::Year => "year",
            TimeFrame::All => "all",
        }
    }

    /// Days back from the reference day, `None` for all time
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeFrame::Week => Some(7),
            TimeFrame::Month => Some(30),
            TimeFrame::Year => Some(365),
            TimeFrame::All => None,
        }
    }

    /// Next frame in week → month → year → all → week order
    pub fn next(&self) -> TimeFrame {
        match self {
            TimeFrame::Week => TimeFrame::Month,
            TimeFrame::Month => TimeFrame::Year,
            TimeFrame::Year => TimeFrame::All,
            TimeFrame::All => TimeFrame::Week,
        }
    }

    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        DateRange::last(*self, today)
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(TimeFrame::Week),
            "month" => Ok(TimeFrame::Month),
            "year" => Ok(TimeFrame::Year),
            "all" => Ok(TimeFrame::All),
            other => Err(format!("unknown timeframe '{other}' (expected week, month, year or all)")),
        }
    }
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Bounds are swapped if given in reverse
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end { Self { start, end } } else { Self { start: end, end: start } }
    }

    pub fn last(frame: TimeFrame, today: NaiveDate) -> Option<DateRange> {
        frame
            .days()
            .map(|days| DateRange::new(today - Duration::days(days), today))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Logs whose (UTC) day falls in the window; everything when no window
pub fn filter_logs(logs: &[WorkoutLog], range: Option<DateRange>) -> impl Iterator<Item = &WorkoutLog> {
    logs.iter()
        .filter(move |log| range.is_none_or(|r| r.contains(log.date.date_naive())))
}

/// Workout analytics
pub struct Analytics {
    logs: Vec<WorkoutLog>,
}

impl Analytics {
    pub fn new(logs: Vec<WorkoutLog>) -> Self {
        Self { logs }
    }

    /// Keep only logs inside the window
    pub fn within(self, range: Option<DateRange>) -> Self {
        let logs = filter_logs(&self.logs, range).cloned().collect();
        Self { logs }
    }

    pub fn logs(&self) -> &[WorkoutLog] {
        &self.logs
    }

    /// Total work for exercises whose name contains `exercise` (case-insensitive)
    pub fn total_volume(&self, exercise: &str) -> f64 {
        let needle = exercise.to_lowercase();
        self.logs
            .iter()
            .filter(|l| l.exercise.to_lowercase().contains(&needle))
            .map(|l| l.work())
            .sum()
    }

    /// Work summed per day
    pub fn volume_by_date(&self) -> BTreeMap<NaiveDate, f64> {
        let mut days = BTreeMap::new();
        for log in &self.logs {
            *days.entry(log.date.date_naive()).or_insert(0.0) += log.work();
        }
        days
    }

    /// Work per exercise name, largest first
    pub fn totals_by_exercise(&self) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for log in &self.logs {
            *totals.entry(log.exercise.as_str()).or_insert(0.0) += log.work();
        }
        let mut totals: Vec<(String, f64)> = totals
            .into_iter()
            .map(|(name, work)| (name.to_string(), work))
            .collect();
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));
        totals
    }

    /// Distinct training days per week over the logged span
    pub fn weekly_frequency(&self) -> f64 {
        let days: HashSet<NaiveDate> = self.logs.iter().map(|l| l.date.date_naive()).collect();
        if days.len() < 2 {
            return days.len() as f64;
        }

        let (Some(first), Some(last)) = (days.iter().min(), days.iter().max()) else {
            return 0.0;
        };
        let span = (*last - *first).num_days() as f64;
        (days.len() as f64 / span) * 7.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_log(exercise: &str, date: NaiveDate, volume: f64) -> WorkoutLog {
        WorkoutLog {
            id: None,
            date: Utc.from_utc_datetime(&date.and_hms_opt(18, 0, 0).unwrap()),
            exercise: exercise.to_string(),
            tags: vec![],
            reps: None,
            weight: None,
            volume,
            notes: None,
        }
    }

    #[test]
    fn test_timeframe_windows() {
        let today = day(2024, 3, 31);
        let week = TimeFrame::Week.range(today).unwrap();
        assert_eq!(week.start, day(2024, 3, 24));
        assert!(week.contains(today));
        assert!(week.contains(day(2024, 3, 24)));
        assert!(!week.contains(day(2024, 3, 23)));
        assert_eq!(TimeFrame::Year.range(today).unwrap().start, day(2023, 4, 1));
        assert!(TimeFrame::All.range(today).is_none());
    }

    #[test]
    fn test_timeframe_parse_and_cycle() {
        assert_eq!("Month".parse::<TimeFrame>(), Ok(TimeFrame::Month));
        assert!("decade".parse::<TimeFrame>().is_err());
        assert_eq!(TimeFrame::All.next(), TimeFrame::Week);
        assert_eq!(TimeFrame::Week.next().next().next().next(), TimeFrame::Week);
    }

    #[test]
    fn test_date_range_swaps_reversed_bounds() {
        let range = DateRange::new(day(2024, 2, 10), day(2024, 2, 1));
        assert_eq!(range.start, day(2024, 2, 1));
        assert_eq!(range.end, day(2024, 2, 10));
    }

    #[test]
    fn test_filter_logs_inclusive() {
        let logs = vec![
            create_log("Squat", day(2024, 1, 1), 100.0),
            create_log("Squat", day(2024, 1, 5), 100.0),
            create_log("Squat", day(2024, 1, 9), 100.0),
        ];
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 5));
        assert_eq!(filter_logs(&logs, Some(range)).count(), 2);
        assert_eq!(filter_logs(&logs, None).count(), 3);
    }

    #[test]
    fn test_volume_by_date_sums_same_day() {
        let analytics = Analytics::new(vec![
            create_log("Squat", day(2024, 1, 1), 100.0),
            create_log("Bench", day(2024, 1, 1), 50.0),
            create_log("Squat", day(2024, 1, 3), 80.0),
        ]);
        let days = analytics.volume_by_date();
        assert_eq!(days.len(), 2);
        assert_eq!(days[&day(2024, 1, 1)], 150.0);
        assert_eq!(days[&day(2024, 1, 3)], 80.0);
    }

    #[test]
    fn test_totals_by_exercise() {
        let analytics = Analytics::new(vec![
            create_log("Bench press", day(2024, 1, 1), 100.0),
            create_log("Squat", day(2024, 1, 1), 300.0),
            create_log("Bench press", day(2024, 1, 2), 150.0),
        ]);
        assert_eq!(
            analytics.totals_by_exercise(),
            vec![("Squat".to_string(), 300.0), ("Bench press".to_string(), 250.0)]
        );
        assert_eq!(analytics.total_volume("bench"), 250.0);
        assert_eq!(analytics.total_volume("deadlift"), 0.0);
    }

    #[test]
    fn test_within_narrows_logs() {
        let analytics = Analytics::new(vec![
            create_log("Row", day(2024, 1, 1), 100.0),
            create_log("Row", day(2024, 2, 1), 100.0),
        ])
        .within(Some(DateRange::new(day(2024, 1, 15), day(2024, 2, 15))));
        assert_eq!(analytics.logs().len(), 1);
    }

    #[test]
    fn test_weekly_frequency() {
        assert_eq!(Analytics::new(vec![]).weekly_frequency(), 0.0);

        let analytics = Analytics::new(vec![
            create_log("Row", day(2024, 1, 1), 100.0),
            create_log("Row", day(2024, 1, 1), 100.0),
            create_log("Row", day(2024, 1, 8), 100.0),
        ]);
        // two distinct days over a 7-day span
        assert_eq!(analytics.weekly_frequency(), 2.0);
    }
}
