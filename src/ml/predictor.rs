//! Volume trend using linear regression (linfa)

use std::fmt;

use chrono::{Duration, NaiveDate};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use serde::Serialize;

use super::{DateRange, filter_logs};
use super::muscle_tracker::row_targets;
use crate::db::WorkoutLog;
use crate::tags::{MappingTarget, TagMap};

/// Minimum distinct days for a trend line
const MIN_DATA_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
            TrendDirection::InsufficientData => "insufficient data",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "↗",
            TrendDirection::Decreasing => "↘",
            TrendDirection::Stable => "→",
            TrendDirection::InsufficientData => "·",
        }
    }

    /// A slope counts only beyond `max(5% of the mean, 1)`
    pub fn classify(slope: f64, values: &[f64]) -> TrendDirection {
        if values.len() < MIN_DATA_POINTS {
            return TrendDirection::InsufficientData;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let threshold = (0.05 * mean).max(1.0);
        if slope > threshold {
            TrendDirection::Increasing
        } else if slope < -threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Least-squares line over daily volumes
#[derive(Debug, Clone, Serialize)]
pub struct VolumeTrend {
    pub points: Vec<(NaiveDate, f64)>,
    /// Volume change per day
    pub slope: f64,
    pub intercept: f64,
    pub r2_score: f64,
    pub mean: f64,
    pub direction: TrendDirection,
}

impl VolumeTrend {
    /// Fit a line through `(day, volume)` points; x is days since the first point
    pub fn from_points(mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        let mean = if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 };

        let fitted = if points.len() >= MIN_DATA_POINTS { fit_line(&points) } else { None };
        match fitted {
            Some((slope, intercept, r2_score)) => Self {
                direction: TrendDirection::classify(slope, &values),
                points,
                slope,
                intercept,
                r2_score,
                mean,
            },
            None => Self {
                points,
                slope: 0.0,
                intercept: mean,
                r2_score: 0.0,
                mean,
                direction: TrendDirection::InsufficientData,
            },
        }
    }

    /// Daily volume of rows mapped to `target` (all rows when `None`)
    pub fn for_target(
        logs: &[WorkoutLog],
        tags: &TagMap,
        target: Option<MappingTarget>,
        range: Option<DateRange>,
    ) -> Self {
        let mut days = std::collections::BTreeMap::new();
        for log in filter_logs(logs, range) {
            if let Some(target) = target
                && !row_targets(log, tags).contains(&target)
            {
                continue;
            }
            *days.entry(log.date.date_naive()).or_insert(0.0) += log.work();
        }
        Self::from_points(days.into_iter().collect())
    }

    /// Predicted daily volume `days_ahead` after the last point
    pub fn predict(&self, days_ahead: i64) -> f64 {
        let Some(((first, _), (last, _))) = self.points.first().zip(self.points.last()) else {
            return 0.0;
        };
        let x = (*last + Duration::days(days_ahead) - *first).num_days() as f64;
        (self.slope * x + self.intercept).max(0.0)
    }
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trend: {} {}", self.direction.arrow(), self.direction)?;
        writeln!(f, "Days with data: {}", self.points.len())?;
        writeln!(f, "Average daily volume: {:.1}", self.mean)?;
        if self.direction != TrendDirection::InsufficientData {
            writeln!(f, "Change per day: {:+.1}", self.slope)?;
            writeln!(f, "R²: {:.2}", self.r2_score)?;
            writeln!(f, "In 7 days: {:.1}", self.predict(7))?;
        }
        Ok(())
    }
}

/// Slope, intercept and R² of a least-squares fit
fn fit_line(points: &[(NaiveDate, f64)]) -> Option<(f64, f64, f64)> {
    let first = points.first()?.0;
    let x_data: Vec<f64> = points.iter().map(|(d, _)| (*d - first).num_days() as f64).collect();
    let y_data: Vec<f64> = points.iter().map(|(_, v)| *v).collect();

    let records = Array2::from_shape_vec((x_data.len(), 1), x_data).ok()?;
    let targets = Array1::from_vec(y_data);
    let dataset = Dataset::new(records, targets);

    let model = LinearRegression::default().fit(&dataset).ok()?;
    let slope = model.params()[0];
    let intercept = model.intercept();
    if !(slope.is_finite() && intercept.is_finite()) {
        return None;
    }

    let predictions = model.predict(&dataset);
    let r2 = predictions.r2(&dataset).unwrap_or(0.0);
    let r2 = if r2.is_finite() { r2 } else { 0.0 };

    Some((slope, intercept, r2))
}
