//! Database module - SQLite storage for workout logs and the tag mapping

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tags::TagMap;

/// One logged set or exercise entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Option<i64>,
    pub date: DateTime<Utc>,
    pub exercise: String,
    pub tags: Vec<String>,
    pub reps: Option<i32>,
    pub weight: Option<f64>, // kg
    pub volume: f64,
    pub notes: Option<String>,
}

impl WorkoutLog {
    /// Work credited to muscles: volume, else reps × weight, else reps as a count
    pub fn work(&self) -> f64 {
        if self.volume.is_finite() && self.volume > 0.0 {
            return self.volume;
        }
        let reps = self.reps.unwrap_or(0).max(0) as f64;
        match self.weight {
            Some(weight) if weight.is_finite() && weight > 0.0 && reps > 0.0 => reps * weight,
            _ => reps,
        }
    }
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("opening database {path}"))?;
        let db = Self { conn };
        db.init_schema()?;
        info!(path, "database ready");
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workout_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                exercise TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',
                reps INTEGER,
                weight REAL,
                volume REAL NOT NULL DEFAULT 0,
                notes TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_workout_logs_date ON workout_logs(date);
            CREATE TABLE IF NOT EXISTS muscle_tags (
                tag TEXT PRIMARY KEY,
                muscle_group TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn add_log(&self, log: &WorkoutLog) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO workout_logs (date, exercise, tags, reps, weight, volume, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                log.date.to_rfc3339(),
                log.exercise,
                serde_json::to_string(&log.tags)?,
                log.reps,
                log.weight,
                log.volume,
                log.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert many logs in one transaction
    pub fn add_logs(&mut self, logs: &[WorkoutLog]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO workout_logs (date, exercise, tags, reps, weight, volume, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for log in logs {
                stmt.execute(params![
                    log.date.to_rfc3339(),
                    log.exercise,
                    serde_json::to_string(&log.tags)?,
                    log.reps,
                    log.weight,
                    log.volume,
                    log.notes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(logs.len())
    }

    /// All logs, newest first
    pub fn get_logs(&self) -> Result<Vec<WorkoutLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, exercise, tags, reps, weight, volume, notes FROM workout_logs ORDER BY date DESC, id DESC",
        )?;

        let logs = stmt
            .query_map([], |row| {
                let date_str: String = row.get(1)?;
                let tags_json: String = row.get(3)?;
                Ok(WorkoutLog {
                    id: Some(row.get(0)?),
                    date: DateTime::parse_from_rfc3339(&date_str)
                        .map(|d| d.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                    exercise: row.get(2)?,
                    tags: serde_json::from_str(&tags_json).unwrap_or_default(),
                    reps: row.get(4)?,
                    weight: row.get(5)?,
                    volume: row.get(6)?,
                    notes: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    pub fn count_logs(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM workout_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Stored mapping, or the built-in table when nothing is stored yet
    pub fn load_tag_map(&self) -> Result<TagMap> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag, muscle_group FROM muscle_tags ORDER BY tag")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(TagMap::defaults());
        }

        let mut map = TagMap::new();
        for (tag, group) in rows {
            if let Err(e) = map.insert(&tag, &group) {
                warn!(%tag, %group, error = %e, "ignoring stored tag");
            }
        }
        Ok(map)
    }

    /// Replace the stored mapping with `map`
    pub fn save_tag_map(&mut self, map: &TagMap) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM muscle_tags", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO muscle_tags (tag, muscle_group) VALUES (?1, ?2)")?;
            for (tag, target) in map.iter() {
                stmt.execute(params![tag, target.to_string()])?;
            }
        }
        tx.commit()?;
        info!(tags = map.len(), "saved tag mapping");
        Ok(())
    }

    /// Set one tag, seeding the store with the current mapping first
    pub fn set_tag(&mut self, tag: &str, target: &str) -> Result<()> {
        let mut map = self.load_tag_map()?;
        map.insert(tag, target)?;
        self.save_tag_map(&map)
    }

    /// Returns whether the tag existed
    pub fn remove_tag(&mut self, tag: &str) -> Result<bool> {
        let mut map = self.load_tag_map()?;
        let removed = map.remove(tag);
        if removed {
            self.save_tag_map(&map)?;
        }
        Ok(removed)
    }
}
