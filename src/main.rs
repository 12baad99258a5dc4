//! musclemap - Muscle heat-map engine for workout logs

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use musclemap::body::{HeatMapOptions, View};
use musclemap::db::{Database, WorkoutLog};
use musclemap::heatmap::{self, BodyHeatMap, DEFAULT_MAX_VALUE, SvgTarget};
use musclemap::ml::{Analytics, BalanceAnalyzer, DateRange, Threshold, TimeFrame, VolumeTrend};
use musclemap::sample;
use musclemap::tags::{self, ImportMode, MappingTarget};
use musclemap::tui::App;

#[derive(Parser)]
#[command(name = "musclemap")]
#[command(author, version, about = "Muscle heat-map engine for workout logs")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "MUSCLEMAP_DB", default_value = "musclemap.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Date window and rendering options shared by the analysis commands
#[derive(Args, Clone)]
struct ViewArgs {
    /// Figure side to draw
    #[arg(long, default_value = "front")]
    view: View,

    /// Hide per-part labels
    #[arg(long)]
    no_labels: bool,

    /// Volume that maps to full intensity
    #[arg(long, env = "MUSCLEMAP_MAX_VALUE", default_value_t = DEFAULT_MAX_VALUE)]
    max_value: f64,

    /// Look-back window: week, month, year or all
    #[arg(long, default_value = "month")]
    timeframe: TimeFrame,

    /// Explicit start date (YYYY-MM-DD), overrides --timeframe
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Explicit end date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl ViewArgs {
    fn options(&self) -> HeatMapOptions {
        HeatMapOptions { view: self.view, show_labels: !self.no_labels, max_value: self.max_value }
    }

    fn range(&self) -> Option<DateRange> {
        let today = Utc::now().date_naive();
        match (self.from, self.to) {
            (Some(from), to) => Some(DateRange::new(from, to.unwrap_or(today))),
            (None, Some(to)) => self.timeframe.range(to),
            (None, None) => self.timeframe.range(today),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui {
        #[command(flatten)]
        view: ViewArgs,

        /// Imbalance threshold: 15%, 0.15 or abs:50
        #[arg(long, default_value = "15%")]
        threshold: Threshold,
    },

    /// Log a set or exercise entry
    Log {
        /// Exercise name (e.g., "Bench press")
        exercise: String,

        /// Muscle tags, comma separated (e.g., "chest,triceps")
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Reps performed
        #[arg(short, long)]
        reps: Option<i32>,

        /// Weight in kg
        #[arg(short, long)]
        weight: Option<f64>,

        /// Total volume; computed from reps × weight when omitted
        #[arg(long)]
        volume: Option<f64>,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List workout history
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Render the heat map as SVG
    Heatmap {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the body snapshot as JSON
    Snapshot {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print the muscle balance report
    Balance {
        #[command(flatten)]
        view: ViewArgs,

        /// Imbalance threshold: 15%, 0.15 or abs:50
        #[arg(long, default_value = "15%")]
        threshold: Threshold,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the daily volume trend for a muscle group or part
    Trend {
        /// Group (e.g. "quads") or part path (e.g. "chest.upper"); all rows when omitted
        target: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Manage the tag → muscle mapping
    Tags {
        #[command(subcommand)]
        action: TagCommands,
    },

    /// Fill the database with sample sessions
    Seed,
}

#[derive(Subcommand)]
enum TagCommands {
    /// Show the current mapping
    List,

    /// Map a tag to a muscle group or part path
    Set { tag: String, target: String },

    /// Remove a tag
    Remove { tag: String },

    /// Write the mapping as CSV
    Export {
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Read a tag CSV (columns tag, muscleGroup)
    Import {
        file: PathBuf,

        /// merge keeps existing tags, replace discards them
        #[arg(long, default_value = "merge")]
        mode: ImportMode,
    },
}

fn write_output(output: Option<PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db)?;

    match cli.command {
        Some(Commands::Tui { view, threshold }) => {
            let mut app = App::new(db, view.options(), view.timeframe, threshold)?;
            app.run()?;
        }

        Some(Commands::Log { exercise, tags, reps, weight, volume, notes }) => {
            let mut log = WorkoutLog {
                id: None,
                date: Utc::now(),
                exercise: exercise.clone(),
                tags: tags.iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect(),
                reps,
                weight,
                volume: volume.unwrap_or(0.0),
                notes,
            };
            if log.volume <= 0.0 {
                log.volume = log.work();
            }
            let id = db.add_log(&log)?;
            println!("Logged: {} - volume {} [{}] (id: {})", exercise, log.volume, log.tags.join(", "), id);
        }

        Some(Commands::List { limit }) => {
            let logs = db.get_logs()?;
            println!("Recent workouts:");
            println!("{:-<80}", "");
            for l in logs.iter().take(limit) {
                let load = match (l.reps, l.weight) {
                    (Some(r), Some(w)) => format!("{r}x{w}kg"),
                    (Some(r), None) => format!("{r} reps"),
                    _ => "-".to_string(),
                };
                println!(
                    "{} | {:22} | {:>10} | {:>8.1} | {}",
                    l.date.format("%Y-%m-%d %H:%M"),
                    l.exercise,
                    load,
                    l.volume,
                    l.tags.join(","),
                );
            }
        }

        Some(Commands::Heatmap { view, output }) => {
            let logs = db.get_logs()?;
            let tag_map = db.load_tag_map()?;
            let body = heatmap::build_body(&logs, &tag_map, view.range(), view.options());

            let mut map = BodyHeatMap::new(body);
            map.render(SvgTarget::default());
            let svg = map.detach().map(|t| t.svg).unwrap_or_default();
            write_output(output, &svg)?;
        }

        Some(Commands::Snapshot { view }) => {
            let logs = db.get_logs()?;
            let tag_map = db.load_tag_map()?;
            let body = heatmap::build_body(&logs, &tag_map, view.range(), view.options());
            println!("{}", serde_json::to_string_pretty(&body.body_data())?);
        }

        Some(Commands::Balance { view, threshold, json }) => {
            let logs = db.get_logs()?;
            let tag_map = db.load_tag_map()?;
            let body = heatmap::build_body(&logs, &tag_map, view.range(), view.options());
            let report = BalanceAnalyzer::new(threshold).analyze(&body);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }

        Some(Commands::Trend { target, view }) => {
            let target = match target {
                Some(t) => Some(t.parse::<MappingTarget>()?),
                None => None,
            };
            let logs = db.get_logs()?;
            let tag_map = db.load_tag_map()?;
            let trend = VolumeTrend::for_target(&logs, &tag_map, target, view.range());

            match target {
                Some(t) => println!("Volume trend for {t}"),
                None => println!("Volume trend for all workouts"),
            }
            println!("{:-<40}", "");
            print!("{trend}");

            let analytics = Analytics::new(logs).within(view.range());
            println!("Training days per week: {:.1}", analytics.weekly_frequency());
            for (exercise, total) in analytics.totals_by_exercise().iter().take(5) {
                println!("  {exercise:24} {total:>10.1}");
            }
        }

        Some(Commands::Tags { action }) => match action {
            TagCommands::List => {
                let tag_map = db.load_tag_map()?;
                for (tag, target) in tag_map.iter() {
                    println!("{tag:24} {target}");
                }
                println!("{} tags", tag_map.len());
            }
            TagCommands::Set { tag, target } => {
                db.set_tag(&tag, &target)?;
                println!("Mapped '{}' → {}", tags::normalize_tag(&tag), target.trim().to_lowercase());
            }
            TagCommands::Remove { tag } => {
                if !db.remove_tag(&tag)? {
                    bail!("tag '{}' is not mapped", tags::normalize_tag(&tag));
                }
                println!("Removed '{}'", tags::normalize_tag(&tag));
            }
            TagCommands::Export { output } => {
                let csv = db.load_tag_map()?.export_csv()?;
                write_output(output, &csv)?;
            }
            TagCommands::Import { file, mode } => {
                let input = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
                let report = tags::parse_csv(&input)?;
                for error in &report.errors {
                    eprintln!("{error}");
                }

                let mut tag_map = db.load_tag_map()?;
                let taken = tag_map.apply_import(&report.tags, mode);
                db.save_tag_map(&tag_map)?;
                println!("Imported {} tags ({} rows rejected)", taken, report.errors.len());
            }
        },

        Some(Commands::Seed) => {
            let logs = sample::generate(&mut rand::thread_rng(), Utc::now());
            let count = db.add_logs(&logs)?;
            println!("Added {count} sample entries to {}", cli.db);
        }

        None => {
            // Default: show TUI
            let mut app = App::new(db, HeatMapOptions::default(), TimeFrame::default(), Threshold::default())?;
            app.run()?;
        }
    }

    Ok(())
}
