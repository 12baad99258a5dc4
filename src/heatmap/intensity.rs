//! Intensity normalization - raw accumulated load to a 0..=1 scale

use serde::Serialize;

use crate::body::{Body, PartRef};

/// Normalization ceiling used when none (or an unusable one) is configured
pub const DEFAULT_MAX_VALUE: f64 = 1000.0;

/// Normalized load of one part
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartIntensity {
    pub part: PartRef,
    /// Raw accumulated value (kg volume or count)
    pub value: f64,
    pub intensity: f64,
}

/// Maps raw values onto `[0, 1]` against a ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityCalculator {
    max_value: f64,
}

impl Default for IntensityCalculator {
    fn default() -> Self {
        Self { max_value: DEFAULT_MAX_VALUE }
    }
}

impl IntensityCalculator {
    pub fn new(max_value: f64) -> Self {
        let mut calc = Self::default();
        calc.set_max_value(max_value);
        calc
    }

    /// `min(1, value / max)`; non-positive and non-finite input gives 0
    pub fn normalize(&self, value: f64) -> f64 {
        if !(value.is_finite() && value > 0.0) {
            return 0.0;
        }
        (value / self.max_value).min(1.0)
    }

    /// Bilateral muscles take the busier side
    pub fn normalize_bilateral(&self, left: f64, right: f64) -> f64 {
        self.normalize(left.max(right))
    }

    pub fn normalize_average(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let average = values.iter().sum::<f64>() / values.len() as f64;
        self.normalize(average)
    }

    /// Ignored unless positive and finite
    pub fn set_max_value(&mut self, max_value: f64) {
        if max_value.is_finite() && max_value > 0.0 {
            self.max_value = max_value;
        }
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Every part of the body, zero-valued ones included
    pub fn intensities(&self, body: &Body) -> Vec<PartIntensity> {
        PartRef::all()
            .into_iter()
            .map(|part| {
                let value = body.value(part);
                PartIntensity { part, value, intensity: self.normalize(value) }
            })
            .collect()
    }

    pub fn intensity_of(&self, body: &Body, part: PartRef) -> f64 {
        self.normalize(body.value(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps_above_max() {
        let calc = IntensityCalculator::new(1000.0);
        assert_eq!(calc.normalize(1000.0), 1.0);
        assert_eq!(calc.normalize(1500.0), 1.0);
        assert_eq!(calc.normalize(f64::MAX), 1.0);
    }

    #[test]
    fn test_normalize_non_positive_is_zero() {
        let calc = IntensityCalculator::new(1000.0);
        assert_eq!(calc.normalize(0.0), 0.0);
        assert_eq!(calc.normalize(-25.0), 0.0);
        assert_eq!(calc.normalize(f64::NAN), 0.0);
        assert_eq!(calc.normalize(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_linear() {
        let calc = IntensityCalculator::new(200.0);
        assert_eq!(calc.normalize(50.0), 0.25);
        assert_eq!(calc.normalize_bilateral(20.0, 100.0), 0.5);
        assert_eq!(calc.normalize_average(&[100.0, 0.0]), 0.25);
        assert_eq!(calc.normalize_average(&[]), 0.0);
    }

    #[test]
    fn test_bad_max_falls_back() {
        assert_eq!(IntensityCalculator::new(0.0).max_value(), DEFAULT_MAX_VALUE);
        assert_eq!(IntensityCalculator::new(-5.0).max_value(), DEFAULT_MAX_VALUE);
        assert_eq!(IntensityCalculator::new(f64::INFINITY).max_value(), DEFAULT_MAX_VALUE);

        let mut calc = IntensityCalculator::new(500.0);
        calc.set_max_value(0.0);
        assert_eq!(calc.max_value(), 500.0);
    }

    #[test]
    fn test_intensities_cover_all_parts() {
        let mut body = Body::default();
        let abs = PartRef::parse("core.abs").unwrap();
        body.set_value(abs, 250.0);

        let calc = IntensityCalculator::default();
        let all = calc.intensities(&body);
        assert_eq!(all.len(), PartRef::all().len());

        for entry in &all {
            let expected = if entry.part == abs { 0.25 } else { 0.0 };
            assert_eq!(entry.intensity, expected, "{}", entry.part);
        }
    }

    #[test]
    fn test_intensity_of_single_part() {
        let mut body = Body::default();
        let quads = PartRef::parse("legs.quads_left").unwrap();
        body.set_value(quads, 1500.0);

        let calc = IntensityCalculator::new(2000.0);
        assert_eq!(calc.intensity_of(&body, quads), 0.75);
        assert_eq!(calc.intensity_of(&body, PartRef::parse("legs.quads_right").unwrap()), 0.0);
    }
}
