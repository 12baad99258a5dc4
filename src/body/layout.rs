//! Static region layouts - group titles, part labels and named field slots
//!
//! Every region of the body is one generic [`Muscle`](super::Muscle) whose
//! shape comes from a table here. A field name maps to exactly one
//! `(group, part)` slot and every slot has exactly one field.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Body regions, one `Muscle` each
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
}

impl Region {
    /// Type tag used in part paths and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Chest => "chest",
            Region::Back => "back",
            Region::Shoulders => "shoulders",
            Region::Arms => "arms",
            Region::Legs => "legs",
            Region::Core => "core",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Region::Chest => "Chest",
            Region::Back => "Back",
            Region::Shoulders => "Shoulders",
            Region::Arms => "Arms",
            Region::Legs => "Legs",
            Region::Core => "Core",
        }
    }

    /// All regions in rendering order
    pub fn all() -> &'static [Region] {
        &[
            Region::Chest,
            Region::Back,
            Region::Shoulders,
            Region::Arms,
            Region::Legs,
            Region::Core,
        ]
    }

    pub fn parse(s: &str) -> Option<Region> {
        let s = s.trim().to_lowercase();
        Region::all().iter().copied().find(|r| r.as_str() == s)
    }

    pub fn layout(&self) -> &'static RegionLayout {
        match self {
            Region::Chest => &CHEST,
            Region::Back => &BACK,
            Region::Shoulders => &SHOULDERS,
            Region::Arms => &ARMS,
            Region::Legs => &LEGS,
            Region::Core => &CORE,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct GroupLayout {
    pub title: &'static str,
    pub parts: &'static [&'static str],
}

/// Named field bound to one `(group, part)` slot
#[derive(Debug)]
pub struct FieldSlot {
    pub field: &'static str,
    /// Human readable name for labels and reports
    pub name: &'static str,
    pub group: usize,
    pub part: usize,
}

#[derive(Debug)]
pub struct RegionLayout {
    pub groups: &'static [GroupLayout],
    pub fields: &'static [FieldSlot],
}

impl RegionLayout {
    pub fn slot(&self, field: &str) -> Option<(usize, usize)> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| (f.group, f.part))
    }

    pub fn field_at(&self, group: usize, part: usize) -> Option<&'static FieldSlot> {
        let fields: &'static [FieldSlot] = self.fields;
        fields.iter().find(|f| f.group == group && f.part == part)
    }

    pub fn part_count(&self) -> usize {
        self.groups.iter().map(|g| g.parts.len()).sum()
    }
}

const fn slot(field: &'static str, name: &'static str, group: usize, part: usize) -> FieldSlot {
    FieldSlot { field, name, group, part }
}

static CHEST: RegionLayout = RegionLayout {
    groups: &[GroupLayout { title: "Chest", parts: &["Upper", "Middle", "Lower"] }],
    fields: &[
        slot("upper", "Upper chest", 0, 0),
        slot("middle", "Middle chest", 0, 1),
        slot("lower", "Lower chest", 0, 2),
    ],
};

static BACK: RegionLayout = RegionLayout {
    groups: &[GroupLayout {
        title: "Back",
        parts: &["Traps", "Middle traps", "Lats", "Lower back"],
    }],
    fields: &[
        slot("traps", "Traps", 0, 0),
        slot("traps_middle", "Middle traps", 0, 1),
        slot("lats", "Lats", 0, 2),
        slot("lower_back", "Lower back", 0, 3),
    ],
};

static SHOULDERS: RegionLayout = RegionLayout {
    groups: &[
        GroupLayout { title: "Front delts", parts: &["R", "L"] },
        GroupLayout { title: "Side delts", parts: &["R", "L"] },
        GroupLayout { title: "Rear delts", parts: &["R", "L"] },
    ],
    fields: &[
        slot("front_right", "Front delt (R)", 0, 0),
        slot("front_left", "Front delt (L)", 0, 1),
        slot("lateral_right", "Side delt (R)", 1, 0),
        slot("lateral_left", "Side delt (L)", 1, 1),
        slot("rear_right", "Rear delt (R)", 2, 0),
        slot("rear_left", "Rear delt (L)", 2, 1),
    ],
};

static ARMS: RegionLayout = RegionLayout {
    groups: &[
        GroupLayout { title: "Biceps", parts: &["R", "L"] },
        GroupLayout { title: "Triceps", parts: &["R", "L"] },
        GroupLayout { title: "Forearms", parts: &["R", "L"] },
    ],
    fields: &[
        slot("biceps_right", "Biceps (R)", 0, 0),
        slot("biceps_left", "Biceps (L)", 0, 1),
        slot("triceps_right", "Triceps (R)", 1, 0),
        slot("triceps_left", "Triceps (L)", 1, 1),
        slot("forearms_right", "Forearm (R)", 2, 0),
        slot("forearms_left", "Forearm (L)", 2, 1),
    ],
};

static LEGS: RegionLayout = RegionLayout {
    groups: &[
        GroupLayout { title: "Quads", parts: &["R", "L"] },
        GroupLayout { title: "Hamstrings", parts: &["R", "L"] },
        GroupLayout { title: "Glutes", parts: &["R", "L"] },
        GroupLayout { title: "Calves", parts: &["R", "L"] },
    ],
    fields: &[
        slot("quads_right", "Quads (R)", 0, 0),
        slot("quads_left", "Quads (L)", 0, 1),
        slot("hamstrings_right", "Hamstrings (R)", 1, 0),
        slot("hamstrings_left", "Hamstrings (L)", 1, 1),
        slot("glutes_right", "Glutes (R)", 2, 0),
        slot("glutes_left", "Glutes (L)", 2, 1),
        slot("calves_right", "Calves (R)", 3, 0),
        slot("calves_left", "Calves (L)", 3, 1),
    ],
};

static CORE: RegionLayout = RegionLayout {
    groups: &[GroupLayout { title: "Core", parts: &["Abs", "Obliques"] }],
    fields: &[slot("abs", "Abs", 0, 0), slot("obliques", "Obliques", 0, 1)],
};

/// Address of one muscle part, e.g. `chest.upper`. Only built from a
/// layout entry, so the slot lookup always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartRef {
    region: Region,
    index: usize,
}

impl PartRef {
    /// Build a reference only if the field exists in the region layout
    pub fn new(region: Region, field: &str) -> Option<PartRef> {
        region
            .layout()
            .fields
            .iter()
            .position(|f| f.field == field)
            .map(|index| PartRef { region, index })
    }

    /// Parse a `region.field` path (case-insensitive)
    pub fn parse(path: &str) -> Option<PartRef> {
        let path = path.trim().to_lowercase();
        let (region, field) = path.split_once('.')?;
        PartRef::new(Region::parse(region)?, field)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn field(&self) -> &'static str {
        self.slot().field
    }

    pub fn slot(&self) -> &'static FieldSlot {
        &self.region.layout().fields[self.index]
    }

    pub fn name(&self) -> &'static str {
        self.slot().name
    }

    /// Every part of every region in layout order
    pub fn all() -> Vec<PartRef> {
        Region::all()
            .iter()
            .flat_map(|region| {
                (0..region.layout().fields.len()).map(move |index| PartRef { region: *region, index })
            })
            .collect()
    }
}

impl fmt::Display for PartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.region.as_str(), self.field())
    }
}

impl Serialize for PartRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_layouts_are_bijective() {
        for region in Region::all() {
            let layout = region.layout();
            let mut slots = HashSet::new();
            let mut names = HashSet::new();

            for field in layout.fields {
                let group = &layout.groups[field.group];
                assert!(field.part < group.parts.len(), "{region}.{} out of range", field.field);
                assert!(slots.insert((field.group, field.part)), "{region}: slot reused by {}", field.field);
                assert!(names.insert(field.field), "{region}: duplicate field {}", field.field);
            }

            assert_eq!(slots.len(), layout.part_count(), "{region}: unmapped slot");
        }
    }

    #[test]
    fn test_back_traps_middle_has_own_slot() {
        let back = Region::Back.layout();
        assert_eq!(back.slot("traps"), Some((0, 0)));
        assert_eq!(back.slot("traps_middle"), Some((0, 1)));
    }

    #[test]
    fn test_part_ref_parse() {
        let part = PartRef::parse(" Chest.Upper ").unwrap();
        assert_eq!(part.region(), Region::Chest);
        assert_eq!(part.field(), "upper");
        assert_eq!(part.slot().field, "upper");
        assert_eq!(part.to_string(), "chest.upper");
        assert_eq!(part.name(), "Upper chest");

        assert!(PartRef::parse("chest").is_none());
        assert!(PartRef::parse("chest.biceps").is_none());
        assert!(PartRef::parse("neck.upper").is_none());
    }

    #[test]
    fn test_every_part_resolves_its_own_slot() {
        for part in PartRef::all() {
            assert_eq!(PartRef::new(part.region(), part.field()), Some(part));
            assert_eq!(PartRef::parse(&part.to_string()), Some(part));
        }
        let traps_middle = PartRef::parse("back.traps_middle").unwrap();
        assert_eq!((traps_middle.slot().group, traps_middle.slot().part), (0, 1));
    }

    #[test]
    fn test_all_parts_count() {
        assert_eq!(PartRef::all().len(), 3 + 4 + 6 + 6 + 8 + 2);
    }
}
