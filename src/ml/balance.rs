//! Balance analysis - symmetric pairs and front/back chain comparison

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::body::{Body, PartRef};

/// When two sides count as imbalanced
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Threshold {
    /// `|a - b| / max(a, b)` above this ratio
    Relative(f64),
    /// `|a - b|` above this amount
    Absolute(f64),
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Relative(0.15)
    }
}

impl Threshold {
    /// Negative bounds clamp to zero, non-finite ones fall back to the default
    pub fn sanitized(self) -> Self {
        match self {
            Threshold::Relative(r) | Threshold::Absolute(r) if !r.is_finite() => Threshold::default(),
            Threshold::Relative(r) => Threshold::Relative(r.max(0.0)),
            Threshold::Absolute(d) => Threshold::Absolute(d.max(0.0)),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Relative(r) => write!(f, "{:.0}%", r * 100.0),
            Threshold::Absolute(d) => write!(f, "abs:{d}"),
        }
    }
}

/// `15%` or `0.15` for a ratio, `abs:50` for an absolute difference
impl FromStr for Threshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let number = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| format!("invalid threshold '{s}'"))
        };

        if let Some(rest) = s.strip_prefix("abs:") {
            return number(rest).map(Threshold::Absolute);
        }
        if let Some(rest) = s.strip_suffix('%') {
            return number(rest).map(|p| Threshold::Relative(p / 100.0));
        }
        let ratio = number(&s)?;
        if ratio > 1.0 {
            return Err(format!("ratio threshold must be within 0..=1, got {ratio} (use '%' or 'abs:')"));
        }
        Ok(Threshold::Relative(ratio))
    }
}

/// One compared pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairBalance {
    pub pair_label: &'static str,
    pub side_a: &'static str,
    pub side_b: &'static str,
    pub value_a: f64,
    pub value_b: f64,
    pub delta_ratio: f64,
    pub is_imbalanced: bool,
}

impl PairBalance {
    /// Name of the heavier side, `None` when even
    pub fn dominant(&self) -> Option<&'static str> {
        if self.value_a > self.value_b {
            Some(self.side_a)
        } else if self.value_b > self.value_a {
            Some(self.side_b)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub pairs: Vec<PairBalance>,
    /// Mean of the non-zero part values
    pub avg_volume: f64,
    pub has_data: bool,
    pub threshold: Threshold,
}

impl BalanceReport {
    pub fn imbalanced(&self) -> impl Iterator<Item = &PairBalance> {
        self.pairs.iter().filter(|p| p.is_imbalanced)
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_data {
            return writeln!(f, "No workout data found for the selected time period.");
        }

        writeln!(f, "Training analysis (threshold {})", self.threshold)?;
        writeln!(f, "Average volume: {:.0} kg", self.avg_volume)?;
        writeln!(f)?;
        for pair in &self.pairs {
            let mark = if pair.is_imbalanced { "!" } else { " " };
            writeln!(
                f,
                "{mark} {:<18} {:>5} {:>9.1} | {:<5} {:>9.1}  ({:>3.0}%)",
                pair.pair_label,
                pair.side_a,
                pair.value_a,
                pair.side_b,
                pair.value_b,
                pair.delta_ratio * 100.0,
            )?;
        }
        writeln!(f)?;

        let mut any = false;
        for pair in self.imbalanced() {
            any = true;
            match pair.dominant() {
                Some(side) => writeln!(f, "{} imbalance detected ({side} dominant)", pair.pair_label)?,
                None => writeln!(f, "{} imbalance detected", pair.pair_label)?,
            }
        }
        if !any {
            writeln!(f, "No major muscle imbalances detected")?;
        }
        Ok(())
    }
}

struct PairSpec {
    label: &'static str,
    side_a: &'static str,
    side_b: &'static str,
    parts_a: &'static [&'static str],
    parts_b: &'static [&'static str],
}

const fn lr(label: &'static str, left: &'static [&'static str], right: &'static [&'static str]) -> PairSpec {
    PairSpec { label, side_a: "L", side_b: "R", parts_a: left, parts_b: right }
}

static PAIRS: &[PairSpec] = &[
    lr("Front delts", &["shoulders.front_left"], &["shoulders.front_right"]),
    lr("Side delts", &["shoulders.lateral_left"], &["shoulders.lateral_right"]),
    lr("Rear delts", &["shoulders.rear_left"], &["shoulders.rear_right"]),
    lr("Biceps", &["arms.biceps_left"], &["arms.biceps_right"]),
    lr("Triceps", &["arms.triceps_left"], &["arms.triceps_right"]),
    lr("Forearms", &["arms.forearms_left"], &["arms.forearms_right"]),
    lr("Quads", &["legs.quads_left"], &["legs.quads_right"]),
    lr("Hamstrings", &["legs.hamstrings_left"], &["legs.hamstrings_right"]),
    lr("Glutes", &["legs.glutes_left"], &["legs.glutes_right"]),
    lr("Calves", &["legs.calves_left"], &["legs.calves_right"]),
    PairSpec {
        label: "Chest upper/lower",
        side_a: "Upper",
        side_b: "Lower",
        parts_a: &["chest.upper"],
        parts_b: &["chest.lower"],
    },
    PairSpec {
        label: "Front-Back",
        side_a: "Front",
        side_b: "Back",
        parts_a: &[
            "chest.upper",
            "chest.middle",
            "chest.lower",
            "core.abs",
            "arms.biceps_left",
            "arms.biceps_right",
            "legs.quads_left",
            "legs.quads_right",
        ],
        parts_b: &[
            "back.lats",
            "back.lower_back",
            "arms.triceps_left",
            "arms.triceps_right",
            "legs.hamstrings_left",
            "legs.hamstrings_right",
            "legs.glutes_left",
            "legs.glutes_right",
        ],
    },
];

fn sum_parts(body: &Body, paths: &[&str]) -> f64 {
    paths
        .iter()
        .filter_map(|p| PartRef::parse(p))
        .map(|p| body.value(p))
        .sum()
}

/// Compares paired body parts against one threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAnalyzer {
    threshold: Threshold,
}

impl BalanceAnalyzer {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold: threshold.sanitized() }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Difference ratio and verdict for two values. Both zero is balanced.
    pub fn compare(&self, a: f64, b: f64) -> (f64, bool) {
        let a = a.max(0.0);
        let b = b.max(0.0);
        let diff = (a - b).abs();
        if diff == 0.0 {
            return (0.0, false);
        }
        let max = a.max(b);
        let ratio = if max > 0.0 { diff / max } else { 0.0 };

        let imbalanced = match self.threshold {
            Threshold::Relative(r) => ratio > r,
            Threshold::Absolute(d) => diff > d,
        };
        (ratio, imbalanced)
    }

    pub fn analyze(&self, body: &Body) -> BalanceReport {
        let values: Vec<f64> = PartRef::all()
            .into_iter()
            .map(|p| body.value(p))
            .filter(|v| *v > 0.0)
            .collect();
        let has_data = !values.is_empty();
        let avg_volume = if has_data { values.iter().sum::<f64>() / values.len() as f64 } else { 0.0 };

        let pairs = PAIRS
            .iter()
            .map(|spec| {
                let value_a = sum_parts(body, spec.parts_a);
                let value_b = sum_parts(body, spec.parts_b);
                let (delta_ratio, is_imbalanced) = self.compare(value_a, value_b);
                PairBalance {
                    pair_label: spec.label,
                    side_a: spec.side_a,
                    side_b: spec.side_b,
                    value_a,
                    value_b,
                    delta_ratio,
                    is_imbalanced,
                }
            })
            .collect();

        BalanceReport { pairs, avg_volume, has_data, threshold: self.threshold }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_with(values: &[(&str, f64)]) -> Body {
        let mut body = Body::default();
        for (path, value) in values {
            body.set_value(PartRef::parse(path).unwrap(), *value);
        }
        body
    }

    fn pair<'a>(report: &'a BalanceReport, label: &str) -> &'a PairBalance {
        report.pairs.iter().find(|p| p.pair_label == label).unwrap()
    }

    #[test]
    fn test_equal_is_balanced() {
        let analyzer = BalanceAnalyzer::default();
        assert_eq!(analyzer.compare(80.0, 80.0), (0.0, false));
    }

    #[test]
    fn test_both_zero_is_balanced() {
        let analyzer = BalanceAnalyzer::default();
        assert_eq!(analyzer.compare(0.0, 0.0), (0.0, false));
    }

    #[test]
    fn test_ties_balanced_under_any_threshold() {
        let negative = BalanceAnalyzer::new(Threshold::Relative(-0.1));
        assert_eq!(negative.compare(80.0, 80.0), (0.0, false));
        assert_eq!(negative.threshold(), Threshold::Relative(0.0));

        let absolute = BalanceAnalyzer::new(Threshold::Absolute(-1.0));
        assert_eq!(absolute.compare(0.0, 0.0), (0.0, false));
        assert_eq!(absolute.threshold(), Threshold::Absolute(0.0));

        let nan = BalanceAnalyzer::new(Threshold::Relative(f64::NAN));
        assert_eq!(nan.threshold(), Threshold::default());
        assert_eq!(nan.compare(100.0, 50.0), (0.5, true));
        assert_eq!(nan.compare(50.0, 50.0), (0.0, false));
    }

    #[test]
    fn test_relative_threshold() {
        let analyzer = BalanceAnalyzer::new(Threshold::Relative(0.15));
        assert_eq!(analyzer.compare(100.0, 50.0), (0.5, true));
        assert_eq!(analyzer.compare(100.0, 90.0), (0.1, false));
    }

    #[test]
    fn test_absolute_threshold() {
        let analyzer = BalanceAnalyzer::new(Threshold::Absolute(30.0));
        assert!(!analyzer.compare(100.0, 80.0).1);
        assert!(analyzer.compare(100.0, 60.0).1);
    }

    #[test]
    fn test_analyze_pairs() {
        let body = body_with(&[("arms.biceps_left", 100.0), ("arms.biceps_right", 50.0), ("legs.calves_left", 40.0), ("legs.calves_right", 40.0)]);
        let report = BalanceAnalyzer::default().analyze(&body);

        assert_eq!(report.pairs.len(), PAIRS.len());
        let biceps = pair(&report, "Biceps");
        assert!(biceps.is_imbalanced);
        assert_eq!(biceps.dominant(), Some("L"));
        assert!(!pair(&report, "Calves").is_imbalanced);
        assert!(!pair(&report, "Glutes").is_imbalanced);
        assert!(report.has_data);
        assert_eq!(report.avg_volume, 57.5);
    }

    #[test]
    fn test_front_back_chain() {
        let body = body_with(&[("chest.middle", 300.0), ("core.abs", 100.0), ("back.lats", 200.0)]);
        let report = BalanceAnalyzer::default().analyze(&body);
        let chain = pair(&report, "Front-Back");
        assert_eq!(chain.value_a, 400.0);
        assert_eq!(chain.value_b, 200.0);
        assert!(chain.is_imbalanced);
        assert_eq!(chain.dominant(), Some("Front"));
    }

    #[test]
    fn test_no_data_report() {
        let report = BalanceAnalyzer::default().analyze(&Body::default());
        assert!(!report.has_data);
        assert_eq!(report.avg_volume, 0.0);
        assert_eq!(report.imbalanced().count(), 0);
        assert!(report.to_string().starts_with("No workout data"));
    }

    #[test]
    fn test_report_text() {
        let body = body_with(&[("legs.quads_left", 200.0), ("legs.quads_right", 100.0)]);
        let text = BalanceAnalyzer::default().analyze(&body).to_string();
        assert!(text.contains("Quads imbalance detected (L dominant)"));
        assert!(text.contains("Average volume: 150 kg"));
    }

    #[test]
    fn test_report_json_keys() {
        let body = body_with(&[("shoulders.front_left", 110.0), ("shoulders.front_right", 100.0)]);
        let report = BalanceAnalyzer::default().analyze(&body);
        let json = serde_json::to_value(&report).unwrap();

        for key in ["pairs", "avgVolume", "hasData", "threshold"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let first = &json["pairs"][0];
        assert_eq!(first["pairLabel"], "Front delts");
        assert_eq!(first["valueA"], 110.0);
        assert_eq!(first["valueB"], 100.0);
        assert!(first.get("deltaRatio").is_some());
        assert_eq!(first["isImbalanced"], false);
        assert_eq!(first["sideA"], "L");
        assert!(first.get("label").is_none());
    }

    #[test]
    fn test_threshold_from_str() {
        assert_eq!("15%".parse::<Threshold>(), Ok(Threshold::Relative(0.15)));
        assert_eq!("0.2".parse::<Threshold>(), Ok(Threshold::Relative(0.2)));
        assert_eq!("abs:50".parse::<Threshold>(), Ok(Threshold::Absolute(50.0)));
        assert!("1.5".parse::<Threshold>().is_err());
        assert!("-3%".parse::<Threshold>().is_err());
        assert!("lots".parse::<Threshold>().is_err());
    }
}
