//! Canonical muscle groups and the built-in tag table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::body::{PartRef, Region};

/// Coarse muscle groups a tag can map to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
    Core,
    Forearms,
    Traps,
    RearDelts,
}

impl CanonicalGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalGroup::Chest => "chest",
            CanonicalGroup::Back => "back",
            CanonicalGroup::Shoulders => "shoulders",
            CanonicalGroup::Biceps => "biceps",
            CanonicalGroup::Triceps => "triceps",
            CanonicalGroup::Quads => "quads",
            CanonicalGroup::Hamstrings => "hamstrings",
            CanonicalGroup::Glutes => "glutes",
            CanonicalGroup::Calves => "calves",
            CanonicalGroup::Abs => "abs",
            CanonicalGroup::Core => "core",
            CanonicalGroup::Forearms => "forearms",
            CanonicalGroup::Traps => "traps",
            CanonicalGroup::RearDelts => "rear_delts",
        }
    }

    pub fn all() -> &'static [CanonicalGroup] {
        &[
            CanonicalGroup::Chest,
            CanonicalGroup::Back,
            CanonicalGroup::Shoulders,
            CanonicalGroup::Biceps,
            CanonicalGroup::Triceps,
            CanonicalGroup::Quads,
            CanonicalGroup::Hamstrings,
            CanonicalGroup::Glutes,
            CanonicalGroup::Calves,
            CanonicalGroup::Abs,
            CanonicalGroup::Core,
            CanonicalGroup::Forearms,
            CanonicalGroup::Traps,
            CanonicalGroup::RearDelts,
        ]
    }

    pub fn parse(s: &str) -> Option<CanonicalGroup> {
        let s = s.trim().to_lowercase();
        CanonicalGroup::all().iter().copied().find(|g| g.as_str() == s)
    }

    /// How one unit of work on this group spreads over body parts.
    /// Weights are per part and need not sum to 1.
    pub fn distribution(&self) -> &'static [(Region, &'static str, f64)] {
        match self {
            CanonicalGroup::Chest => &[
                (Region::Chest, "upper", 0.4),
                (Region::Chest, "middle", 0.4),
                (Region::Chest, "lower", 0.2),
            ],
            CanonicalGroup::Back => &[(Region::Back, "lats", 1.0), (Region::Back, "lower_back", 0.3)],
            CanonicalGroup::Traps => &[(Region::Back, "traps", 1.0), (Region::Back, "traps_middle", 0.5)],
            CanonicalGroup::Shoulders => &[
                (Region::Shoulders, "front_left", 0.5),
                (Region::Shoulders, "front_right", 0.5),
            ],
            CanonicalGroup::RearDelts => &[
                (Region::Shoulders, "rear_left", 0.5),
                (Region::Shoulders, "rear_right", 0.5),
            ],
            CanonicalGroup::Biceps => &[(Region::Arms, "biceps_left", 0.5), (Region::Arms, "biceps_right", 0.5)],
            CanonicalGroup::Triceps => &[(Region::Arms, "triceps_left", 0.5), (Region::Arms, "triceps_right", 0.5)],
            CanonicalGroup::Forearms => &[
                (Region::Arms, "forearms_left", 0.5),
                (Region::Arms, "forearms_right", 0.5),
            ],
            CanonicalGroup::Quads => &[(Region::Legs, "quads_left", 0.5), (Region::Legs, "quads_right", 0.5)],
            CanonicalGroup::Hamstrings => &[
                (Region::Legs, "hamstrings_left", 0.5),
                (Region::Legs, "hamstrings_right", 0.5),
            ],
            CanonicalGroup::Glutes => &[(Region::Legs, "glutes_left", 0.5), (Region::Legs, "glutes_right", 0.5)],
            CanonicalGroup::Calves => &[(Region::Legs, "calves_left", 0.5), (Region::Legs, "calves_right", 0.5)],
            CanonicalGroup::Abs => &[(Region::Core, "abs", 1.0)],
            CanonicalGroup::Core => &[(Region::Core, "obliques", 0.5)],
        }
    }

    /// Distribution resolved to part references
    pub fn parts(&self) -> Vec<(PartRef, f64)> {
        self.distribution()
            .iter()
            .filter_map(|(region, field, weight)| PartRef::new(*region, field).map(|p| (p, *weight)))
            .collect()
    }
}

impl fmt::Display for CanonicalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalGroup::parse(s).ok_or_else(|| format!("unknown muscle group '{}'", s.trim()))
    }
}

/// Built-in tag → group table (English and Italian), used when the store has no mapping
pub const DEFAULT_TAGS: &[(&str, CanonicalGroup)] = &[
    // chest
    ("chest", CanonicalGroup::Chest),
    ("petto", CanonicalGroup::Chest),
    ("pettorale", CanonicalGroup::Chest),
    ("pettoralesuperior", CanonicalGroup::Chest),
    ("pettoraleinferior", CanonicalGroup::Chest),
    ("pettoralemedio", CanonicalGroup::Chest),
    // back
    ("back", CanonicalGroup::Back),
    ("schiena", CanonicalGroup::Back),
    ("dorsale", CanonicalGroup::Back),
    // shoulders
    ("shoulders", CanonicalGroup::Shoulders),
    ("spalle", CanonicalGroup::Shoulders),
    ("deltoidi", CanonicalGroup::Shoulders),
    ("deltoideanteriore", CanonicalGroup::Shoulders),
    ("deltoidilaterale", CanonicalGroup::Shoulders),
    // arms
    ("biceps", CanonicalGroup::Biceps),
    ("bicipiti", CanonicalGroup::Biceps),
    ("triceps", CanonicalGroup::Triceps),
    ("tricipiti", CanonicalGroup::Triceps),
    // legs
    ("legs", CanonicalGroup::Quads),
    ("gambe", CanonicalGroup::Quads),
    ("quads", CanonicalGroup::Quads),
    ("quadricipiti", CanonicalGroup::Quads),
    ("hamstrings", CanonicalGroup::Hamstrings),
    ("ischiocrurali", CanonicalGroup::Hamstrings),
    ("femorali", CanonicalGroup::Hamstrings),
    // glutes
    ("glutes", CanonicalGroup::Glutes),
    ("glutei", CanonicalGroup::Glutes),
    ("gluteo", CanonicalGroup::Glutes),
    ("grandegluteo", CanonicalGroup::Glutes),
    ("abduttori", CanonicalGroup::Glutes),
    ("adduttori", CanonicalGroup::Glutes),
    // calves
    ("calves", CanonicalGroup::Calves),
    ("polpacci", CanonicalGroup::Calves),
    // core
    ("abs", CanonicalGroup::Abs),
    ("addominali", CanonicalGroup::Abs),
    ("core", CanonicalGroup::Core),
    ("cardio", CanonicalGroup::Core),
    // secondary
    ("forearms", CanonicalGroup::Forearms),
    ("avambracci", CanonicalGroup::Forearms),
    ("traps", CanonicalGroup::Traps),
    ("trapezi", CanonicalGroup::Traps),
    ("rear_delts", CanonicalGroup::RearDelts),
    ("deltoidi_posteriori", CanonicalGroup::RearDelts),
    ("deltoidiposteriori", CanonicalGroup::RearDelts),
    // movement patterns
    ("push", CanonicalGroup::Chest),
    ("pull", CanonicalGroup::Back),
    ("squat", CanonicalGroup::Quads),
    ("deadlift", CanonicalGroup::Back),
    ("press", CanonicalGroup::Shoulders),
    ("curl", CanonicalGroup::Biceps),
    ("extension", CanonicalGroup::Triceps),
    ("fly", CanonicalGroup::Chest),
    ("row", CanonicalGroup::Back),
    ("spintaanca", CanonicalGroup::Glutes),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_group() {
        assert_eq!(CanonicalGroup::parse(" Rear_Delts "), Some(CanonicalGroup::RearDelts));
        assert_eq!("quads".parse::<CanonicalGroup>(), Ok(CanonicalGroup::Quads));
        assert!(CanonicalGroup::parse("legs").is_none());
        assert_eq!(CanonicalGroup::all().len(), 14);
    }

    #[test]
    fn test_every_distribution_resolves() {
        for group in CanonicalGroup::all() {
            let parts = group.parts();
            assert_eq!(parts.len(), group.distribution().len(), "{group}");
            assert!(parts.iter().all(|(_, w)| *w > 0.0), "{group}");
        }
    }

    #[test]
    fn test_default_tags_unique() {
        let mut seen = HashSet::new();
        for (tag, _) in DEFAULT_TAGS {
            assert_eq!(*tag, tag.trim().to_lowercase());
            assert!(seen.insert(*tag), "duplicate tag {tag}");
        }
    }
}
