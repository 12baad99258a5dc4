//! Muscle load tracking - tagged logs aggregated onto body parts

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{DateRange, filter_logs};
use crate::body::{Body, BodyData, HeatMapOptions, PartRef};
use crate::db::WorkoutLog;
use crate::tags::{MappingTarget, TagMap, normalize_tag};

/// Load statistics for one body part
#[derive(Debug, Clone, PartialEq)]
pub struct PartLoad {
    pub part: PartRef,
    pub volume: f64,
    /// Number of log rows that touched the part
    pub sessions: usize,
    pub last_trained: Option<DateTime<Utc>>,
}

/// Accumulated work per body part
#[derive(Debug, Clone, Default)]
pub struct MuscleTracker {
    loads: BTreeMap<PartRef, PartLoad>,
    rows_used: usize,
    rows_skipped: usize,
}

/// Distinct targets a row maps to. Rows without tags fall back to the exercise name.
pub fn row_targets(log: &WorkoutLog, tags: &TagMap) -> Vec<MappingTarget> {
    let keys: Vec<String> = if log.tags.is_empty() {
        vec![normalize_tag(&log.exercise)]
    } else {
        log.tags.iter().map(|t| normalize_tag(t)).collect()
    };

    let mut seen = HashSet::new();
    keys.iter()
        .filter_map(|key| tags.get(key))
        .filter(|target| seen.insert(*target))
        .collect()
}

impl MuscleTracker {
    /// Build from history, keeping only rows inside `range`
    pub fn from_logs(logs: &[WorkoutLog], tags: &TagMap, range: Option<DateRange>) -> Self {
        let mut tracker = Self::default();

        for log in filter_logs(logs, range) {
            let targets = row_targets(log, tags);
            let work = log.work();
            if targets.is_empty() || work <= 0.0 {
                tracker.rows_skipped += 1;
                continue;
            }
            tracker.rows_used += 1;

            for target in targets {
                for (part, weight) in target.parts() {
                    tracker.add(part, work * weight, log.date);
                }
            }
        }

        debug!(
            used = tracker.rows_used,
            skipped = tracker.rows_skipped,
            parts = tracker.loads.len(),
            "aggregated muscle load"
        );
        tracker
    }

    fn add(&mut self, part: PartRef, amount: f64, date: DateTime<Utc>) {
        let load = self.loads.entry(part).or_insert(PartLoad {
            part,
            volume: 0.0,
            sessions: 0,
            last_trained: None,
        });
        load.volume += amount;
        load.sessions += 1;
        if load.last_trained.is_none_or(|last| last < date) {
            load.last_trained = Some(date);
        }
    }

    pub fn get_load(&self, part: PartRef) -> Option<&PartLoad> {
        self.loads.get(&part)
    }

    pub fn volume(&self, part: PartRef) -> f64 {
        self.loads.get(&part).map_or(0.0, |l| l.volume)
    }

    /// Loads sorted by volume, heaviest first
    pub fn loads_sorted(&self) -> Vec<&PartLoad> {
        let mut loads: Vec<_> = self.loads.values().collect();
        loads.sort_by(|a, b| b.volume.total_cmp(&a.volume));
        loads
    }

    /// Rows that contributed work
    pub fn rows_used(&self) -> usize {
        self.rows_used
    }

    /// Rows with no mapped tag or no work
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    pub fn into_body(self, options: HeatMapOptions) -> Body {
        let mut body = Body::new(options);
        for load in self.loads.values() {
            body.set_value(load.part, load.volume);
        }
        body
    }

    pub fn body_data(&self) -> BodyData {
        self.clone().into_body(HeatMapOptions::default()).body_data()
    }
}
