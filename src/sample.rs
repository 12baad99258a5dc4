//! Sample data - six weeks of tagged sessions with progressive loading

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;

use crate::db::WorkoutLog;

struct SampleExercise {
    name: &'static str,
    tags: &'static [&'static str],
    base_weight: f64, // kg, 0 for bodyweight
    weekly_step: f64,
    round_to: f64,
    base_reps: [i32; 4],
}

struct SampleWorkout {
    name: &'static str,
    /// Days before today, oldest first
    offsets: &'static [i64],
    exercises: &'static [SampleExercise],
}

const PROGRAM_WEEKS: i64 = 6;

const WORKOUTS: &[SampleWorkout] = &[
    SampleWorkout {
        name: "Lower body A",
        offsets: &[40, 37, 33, 30, 26, 23, 19, 16, 12, 9, 5, 2],
        exercises: &[
            SampleExercise {
                name: "Squat (Smith machine)",
                tags: &["squat", "quads", "glutes"],
                base_weight: 70.0,
                weekly_step: 2.5,
                round_to: 2.5,
                base_reps: [10, 9, 8, 8],
            },
            SampleExercise {
                name: "Romanian deadlift",
                tags: &["hamstrings", "glutes", "back"],
                base_weight: 50.0,
                weekly_step: 2.5,
                round_to: 2.5,
                base_reps: [12, 11, 10, 10],
            },
            SampleExercise {
                name: "Leg press 45",
                tags: &["quads"],
                base_weight: 100.0,
                weekly_step: 5.0,
                round_to: 5.0,
                base_reps: [15, 14, 12, 12],
            },
            SampleExercise {
                name: "Leg curl",
                tags: &["hamstrings"],
                base_weight: 30.0,
                weekly_step: 1.25,
                round_to: 1.25,
                base_reps: [12, 12, 10, 10],
            },
            SampleExercise {
                name: "Calf raise",
                tags: &["calves"],
                base_weight: 35.0,
                weekly_step: 2.5,
                round_to: 2.5,
                base_reps: [15, 15, 12, 12],
            },
        ],
    },
    SampleWorkout {
        name: "Upper body A",
        offsets: &[41, 38, 34, 31, 27, 24, 20, 17, 13, 10, 6, 3],
        exercises: &[
            SampleExercise {
                name: "Bench press",
                tags: &["chest", "triceps"],
                base_weight: 60.0,
                weekly_step: 2.5,
                round_to: 2.5,
                base_reps: [10, 8, 8, 6],
            },
            SampleExercise {
                name: "Barbell row",
                tags: &["row", "rear_delts", "biceps"],
                base_weight: 50.0,
                weekly_step: 2.5,
                round_to: 2.5,
                base_reps: [10, 10, 8, 8],
            },
            SampleExercise {
                name: "Overhead press",
                tags: &["press"],
                base_weight: 35.0,
                weekly_step: 1.25,
                round_to: 1.25,
                base_reps: [8, 8, 6, 6],
            },
            SampleExercise {
                name: "Dumbbell curl",
                tags: &["curl", "forearms"],
                base_weight: 12.0,
                weekly_step: 1.0,
                round_to: 1.0,
                base_reps: [12, 10, 10, 8],
            },
            SampleExercise {
                name: "Shrug",
                tags: &["traps"],
                base_weight: 40.0,
                weekly_step: 2.5,
                round_to: 2.5,
                base_reps: [15, 12, 12, 12],
            },
            SampleExercise {
                name: "Crunch",
                tags: &["abs", "core"],
                base_weight: 0.0,
                weekly_step: 0.0,
                round_to: 1.0,
                base_reps: [20, 20, 15, 15],
            },
        ],
    },
];

/// Number of rows `generate` produces
pub fn sample_size() -> usize {
    WORKOUTS
        .iter()
        .map(|w| w.offsets.len() * w.exercises.iter().map(|e| e.base_reps.len()).sum::<usize>())
        .sum()
}

/// Sessions ending shortly before `now`, oldest first. Every fourth session
/// is a harder day with slightly lower load and reps.
pub fn generate(rng: &mut impl Rng, now: DateTime<Utc>) -> Vec<WorkoutLog> {
    let mut logs = Vec::with_capacity(sample_size());

    for workout in WORKOUTS {
        for (session, days_ago) in workout.offsets.iter().enumerate() {
            let weeks = ((PROGRAM_WEEKS * 7 - days_ago) / 7) as f64;
            let tough = session % 4 == 2;
            let modifier = if tough { 0.95 } else { 1.0 };

            let day = (now - Duration::days(*days_ago)).date_naive();
            let start = day.and_hms_opt(rng.gen_range(7..10), rng.gen_range(0..60), 0).unwrap_or_default();
            let mut time = Utc.from_utc_datetime(&start);

            for exercise in workout.exercises {
                let weight = if exercise.base_weight > 0.0 {
                    let raw = (exercise.base_weight + weeks * exercise.weekly_step) * modifier;
                    Some((raw / exercise.round_to).round() * exercise.round_to)
                } else {
                    None
                };

                for base in exercise.base_reps {
                    let bonus = if rng.gen_bool(0.3) { 1 } else { 0 };
                    let reps = (base - if tough { 1 } else { 0 } + bonus).max(1);
                    let volume = weight.map_or(0.0, |w| w * reps as f64);

                    logs.push(WorkoutLog {
                        id: None,
                        date: time,
                        exercise: exercise.name.to_string(),
                        tags: exercise.tags.iter().map(|t| t.to_string()).collect(),
                        reps: Some(reps),
                        weight,
                        volume,
                        notes: Some(workout.name.to_string()),
                    });
                    time += Duration::seconds(rng.gen_range(120..240));
                }
            }
        }
    }

    logs.sort_by_key(|l| l.date);
    logs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagMap;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample() -> Vec<WorkoutLog> {
        let mut rng = StdRng::seed_from_u64(7);
        generate(&mut rng, Utc::now())
    }

    #[test]
    fn test_sample_size() {
        assert_eq!(sample().len(), sample_size());
        assert_eq!(sample_size(), 12 * 5 * 4 + 12 * 6 * 4);
    }

    #[test]
    fn test_sample_dates_in_window() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(1);
        let logs = generate(&mut rng, now);
        assert!(logs.iter().all(|l| l.date < now));
        assert!(logs.iter().all(|l| l.date > now - Duration::days(43)));
        assert!(logs.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_weights_progress() {
        let logs = sample();
        let squats: Vec<f64> = logs
            .iter()
            .filter(|l| l.exercise.starts_with("Squat"))
            .filter_map(|l| l.weight)
            .collect();
        assert!(squats.last().unwrap() > squats.first().unwrap());
    }

    #[test]
    fn test_sample_tags_are_mapped() {
        let tags = TagMap::defaults();
        for log in sample() {
            assert!(log.work() > 0.0, "{}", log.exercise);
            for tag in &log.tags {
                assert!(tags.contains(tag), "unmapped sample tag {tag}");
            }
        }
    }
}
