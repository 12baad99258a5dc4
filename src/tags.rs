//! Tag mapping - workout tags to muscle groups or body parts, with CSV exchange

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::body::PartRef;
use crate::muscles::{CanonicalGroup, DEFAULT_TAGS};

/// Accepted header names for the target column, compared case-insensitively
const GROUP_COLUMNS: &[&str] = &["musclegroup", "muscle_group", "group"];

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag is empty")]
    EmptyTag,
    #[error("unknown muscle group '{0}'")]
    UnknownTarget(String),
    #[error("CSV header has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trim and lowercase
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Right-hand side of a tag mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingTarget {
    Group(CanonicalGroup),
    Part(PartRef),
}

impl MappingTarget {
    /// `chest.upper` is a part path, anything else must be a canonical group
    pub fn parse(s: &str) -> Option<MappingTarget> {
        let s = s.trim();
        if s.contains('.') {
            PartRef::parse(s).map(MappingTarget::Part)
        } else {
            CanonicalGroup::parse(s).map(MappingTarget::Group)
        }
    }

    /// Parts receiving work and the share each gets
    pub fn parts(&self) -> Vec<(PartRef, f64)> {
        match self {
            MappingTarget::Group(group) => group.parts(),
            MappingTarget::Part(part) => vec![(*part, 1.0)],
        }
    }
}

impl fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingTarget::Group(group) => write!(f, "{group}"),
            MappingTarget::Part(part) => write!(f, "{part}"),
        }
    }
}

impl FromStr for MappingTarget {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MappingTarget::parse(s).ok_or_else(|| TagError::UnknownTarget(s.trim().to_string()))
    }
}

/// Normalized tag → target, ordered by tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    entries: BTreeMap<String, MappingTarget>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English/Italian table
    pub fn defaults() -> Self {
        let entries = DEFAULT_TAGS
            .iter()
            .map(|(tag, group)| (tag.to_string(), MappingTarget::Group(*group)))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, tag: &str, target: &str) -> Result<MappingTarget, TagError> {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return Err(TagError::EmptyTag);
        }
        let target: MappingTarget = target.parse()?;
        self.entries.insert(tag, target);
        Ok(target)
    }

    pub fn get(&self, tag: &str) -> Option<MappingTarget> {
        self.entries.get(&normalize_tag(tag)).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(&normalize_tag(tag))
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.entries.remove(&normalize_tag(tag)).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MappingTarget)> {
        self.entries.iter().map(|(tag, target)| (tag.as_str(), *target))
    }

    /// `tag,muscleGroup` CSV sorted by tag
    pub fn export_csv(&self) -> Result<String, TagError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["tag", "muscleGroup"])?;
        for (tag, target) in self.iter() {
            writer.write_record([tag, target.to_string().as_str()])?;
        }
        let bytes = writer.into_inner().map_err(|e| TagError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fold an imported map in; returns how many tags were taken from it
    pub fn apply_import(&mut self, imported: &TagMap, mode: ImportMode) -> usize {
        match mode {
            ImportMode::Replace => {
                *self = imported.clone();
                self.len()
            }
            ImportMode::Merge => {
                let mut added = 0;
                for (tag, target) in &imported.entries {
                    if !self.entries.contains_key(tag) {
                        self.entries.insert(tag.clone(), *target);
                        added += 1;
                    }
                }
                added
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Add new tags only, existing ones win
    #[default]
    Merge,
    /// Discard the current map
    Replace,
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(ImportMode::Merge),
            "replace" => Ok(ImportMode::Replace),
            other => Err(format!("unknown import mode '{other}' (expected merge or replace)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line in the input
    pub line: u64,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Valid rows plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub tags: TagMap,
    pub errors: Vec<RowError>,
}

/// Parse a tag CSV. Only a broken header fails the whole import;
/// bad rows are reported and skipped.
pub fn parse_csv(input: &str) -> Result<ImportReport, TagError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.to_lowercase().as_str()))
    };
    let tag_col = column(&["tag"]).ok_or(TagError::MissingColumn("tag"))?;
    let group_col = column(GROUP_COLUMNS).ok_or(TagError::MissingColumn("muscleGroup"))?;

    let mut report = ImportReport::default();
    for (idx, record) in reader.records().enumerate() {
        let fallback_line = idx as u64 + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                report.errors.push(RowError { line, message: e.to_string() });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line());

        let tag = record.get(tag_col).unwrap_or("");
        let group = record.get(group_col).unwrap_or("");
        let outcome = if tag.is_empty() {
            Err("missing tag".to_string())
        } else if group.is_empty() {
            Err(format!("missing muscle group for '{tag}'"))
        } else {
            report.tags.insert(tag, group).map_err(|e| e.to_string())
        };

        if let Err(message) = outcome {
            warn!(line, %message, "skipping tag row");
            report.errors.push(RowError { line, message });
        }
    }

    info!(tags = report.tags.len(), errors = report.errors.len(), "parsed tag CSV");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> TagMap {
        let mut map = TagMap::new();
        map.insert("Bench", "chest.upper").unwrap();
        map.insert("squat", "quads").unwrap();
        map.insert("row, cable", "back").unwrap();
        map
    }

    #[test]
    fn test_targets() {
        assert_eq!(MappingTarget::parse("rear_delts"), Some(MappingTarget::Group(CanonicalGroup::RearDelts)));
        assert_eq!(
            MappingTarget::parse("Back.Traps_Middle"),
            Some(MappingTarget::Part(PartRef::parse("back.traps_middle").unwrap()))
        );
        assert!(MappingTarget::parse("neck").is_none());
        assert!(MappingTarget::parse("chest.bottom").is_none());
        assert_eq!(MappingTarget::parse("traps").unwrap().parts().len(), 2);
    }

    #[test]
    fn test_insert_normalizes() {
        let mut map = TagMap::new();
        map.insert("  PETTO ", "Chest").unwrap();
        assert!(map.contains("petto"));
        assert_eq!(map.get("Petto"), Some(MappingTarget::Group(CanonicalGroup::Chest)));
        assert!(matches!(map.insert(" ", "chest"), Err(TagError::EmptyTag)));
        assert!(matches!(map.insert("x", "wings"), Err(TagError::UnknownTarget(_))));
        assert!(map.remove("PETTO"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_export_sorted_and_quoted() {
        let csv = sample_map().export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["tag,muscleGroup", "bench,chest.upper", "\"row, cable\",back", "squat,quads"]);
    }

    #[test]
    fn test_export_import_replace_roundtrip() {
        let original = sample_map();
        let report = parse_csv(&original.export_csv().unwrap()).unwrap();
        assert!(report.errors.is_empty());

        let mut current = TagMap::defaults();
        let taken = current.apply_import(&report.tags, ImportMode::Replace);
        assert_eq!(taken, 3);
        assert_eq!(current, original);
    }

    #[test]
    fn test_merge_never_overwrites() {
        let mut current = TagMap::new();
        current.insert("bench", "chest").unwrap();

        let report = parse_csv("tag,muscleGroup\nbench,triceps\ndip,triceps\n").unwrap();
        let taken = current.apply_import(&report.tags, ImportMode::Merge);

        assert_eq!(taken, 1);
        assert_eq!(current.get("bench"), Some(MappingTarget::Group(CanonicalGroup::Chest)));
        assert_eq!(current.get("dip"), Some(MappingTarget::Group(CanonicalGroup::Triceps)));
    }

    #[test]
    fn test_import_collects_row_errors() {
        let input = "Tag,Language,muscle_group\nplank,en,core\n,en,abs\nfoo,en,wings\ncurl,en,\nrow,en,back\n";
        let report = parse_csv(input).unwrap();

        assert_eq!(report.tags.len(), 2);
        assert!(report.tags.contains("plank"));
        assert!(report.tags.contains("row"));
        let lines: Vec<u64> = report.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(report.errors[1].message.contains("wings"));
    }

    #[test]
    fn test_import_header_required() {
        assert!(matches!(parse_csv("name,group\nx,chest\n"), Err(TagError::MissingColumn("tag"))));
        assert!(matches!(parse_csv("tag,muscle\nx,chest\n"), Err(TagError::MissingColumn("muscleGroup"))));
        assert!(matches!(parse_csv(""), Err(TagError::MissingColumn("tag"))));
    }

    #[test]
    fn test_import_mode_from_str() {
        assert_eq!("Replace".parse::<ImportMode>(), Ok(ImportMode::Replace));
        assert!("upsert".parse::<ImportMode>().is_err());
    }
}
