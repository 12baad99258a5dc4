//! Body model - per-region muscle groups and parts holding accumulated load
//!
//! One generic [`Muscle`] type covers every region; its shape comes from the
//! static tables in [`layout`]. Typed records (`ChestData`, `BackData`, ...)
//! project to and from the indexed storage through the same tables.

pub mod layout;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::heatmap::intensity::DEFAULT_MAX_VALUE;
pub use layout::{FieldSlot, PartRef, Region, RegionLayout};

/// Smallest addressable unit of the body model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusclePart {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleGroup {
    pub title: String,
    pub parts: Vec<MusclePart>,
}

/// Stored values are never negative
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// One body region: fixed groups and parts, mutable values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Muscle {
    region: Region,
    groups: Vec<MuscleGroup>,
}

impl Muscle {
    /// Build an all-zero region from its layout table
    pub fn new(region: Region) -> Self {
        let layout = region.layout();
        let groups = layout
            .groups
            .iter()
            .enumerate()
            .map(|(gi, group)| MuscleGroup {
                title: group.title.to_string(),
                parts: group
                    .parts
                    .iter()
                    .enumerate()
                    .map(|(pi, label)| MusclePart {
                        label: label.to_string(),
                        value: 0.0,
                        id: layout
                            .field_at(gi, pi)
                            .map(|f| format!("{}.{}", region.as_str(), f.field)),
                    })
                    .collect(),
            })
            .collect();

        Self { region, groups }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Region type tag (`"chest"`, `"back"`, ...)
    pub fn get_type(&self) -> &'static str {
        self.region.as_str()
    }

    /// Deep copy of groups and parts; mutating it never touches `self`
    pub fn data(&self) -> Vec<MuscleGroup> {
        self.groups.clone()
    }

    pub fn groups(&self) -> &[MuscleGroup] {
        &self.groups
    }

    /// Set one part's value. Out-of-range indices are ignored.
    pub fn update_data(&mut self, group: usize, part: usize, value: f64) -> bool {
        match self.groups.get_mut(group).and_then(|g| g.parts.get_mut(part)) {
            Some(slot) => {
                slot.value = sanitize(value);
                true
            }
            None => false,
        }
    }

    /// Replace the values of a group's parts positionally.
    ///
    /// Labels and ids stay as built; extra incoming parts are dropped and a
    /// missing group is ignored.
    pub fn update_group(&mut self, group: usize, parts: &[MusclePart]) -> bool {
        let Some(target) = self.groups.get_mut(group) else {
            return false;
        };
        for (slot, incoming) in target.parts.iter_mut().zip(parts) {
            slot.value = sanitize(incoming.value);
        }
        true
    }

    pub fn value(&self, field: &str) -> Option<f64> {
        let (g, p) = self.region.layout().slot(field)?;
        Some(self.groups[g].parts[p].value)
    }

    pub fn set_field(&mut self, field: &str, value: f64) -> bool {
        match self.region.layout().slot(field) {
            Some((g, p)) => self.update_data(g, p, value),
            None => false,
        }
    }

    /// Accumulate into a named field
    pub fn add(&mut self, field: &str, amount: f64) -> bool {
        match self.value(field) {
            Some(current) => self.set_field(field, current + sanitize(amount)),
            None => false,
        }
    }

    pub fn total(&self) -> f64 {
        self.groups
            .iter()
            .flat_map(|g| g.parts.iter())
            .map(|p| p.value)
            .sum()
    }

    pub fn reset(&mut self) {
        for part in self.groups.iter_mut().flat_map(|g| g.parts.iter_mut()) {
            part.value = 0.0;
        }
    }

    /// Typed view of this region, `None` if `T` belongs to another region
    pub fn typed<T: RegionData>(&self) -> Option<T> {
        (T::REGION == self.region).then(|| T::from_muscle(self))
    }

    pub fn set_typed<T: RegionData>(&mut self, data: &T) -> bool {
        if T::REGION != self.region {
            return false;
        }
        data.write_to(self);
        true
    }

    /// Write only the fields present in the patch
    pub fn patch<T: RegionData>(&mut self, patch: &T::Patch) -> bool {
        if T::REGION != self.region {
            return false;
        }
        T::apply_patch(patch, self);
        true
    }
}

/// Typed record bound to one region's layout
pub trait RegionData: Sized {
    type Patch;
    const REGION: Region;

    fn from_muscle(muscle: &Muscle) -> Self;
    fn write_to(&self, muscle: &mut Muscle);
    fn apply_patch(patch: &Self::Patch, muscle: &mut Muscle);
}

/// Declares a typed region record, its patch type and the layout binding.
/// Field names must match the `field` column of the region's layout table.
macro_rules! region_data {
    ($(#[$meta:meta])* $name:ident, $patch:ident, $region:expr, [$($field:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(pub $field: f64,)+
        }

        #[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $patch {
            $(pub $field: Option<f64>,)+
        }

        impl RegionData for $name {
            type Patch = $patch;
            const REGION: Region = $region;

            fn from_muscle(muscle: &Muscle) -> Self {
                Self {
                    $($field: muscle.value(stringify!($field)).unwrap_or(0.0),)+
                }
            }

            fn write_to(&self, muscle: &mut Muscle) {
                $(muscle.set_field(stringify!($field), self.$field);)+
            }

            fn apply_patch(patch: &$patch, muscle: &mut Muscle) {
                $(
                    if let Some(value) = patch.$field {
                        muscle.set_field(stringify!($field), value);
                    }
                )+
            }
        }
    };
}

region_data!(ChestData, ChestPatch, Region::Chest, [upper, middle, lower]);

region_data!(BackData, BackPatch, Region::Back, [traps, traps_middle, lats, lower_back]);

region_data!(
    /// Lateral delts have no canonical tag group; they only fill from part paths
    ShoulderData,
    ShoulderPatch,
    Region::Shoulders,
    [front_right, front_left, lateral_right, lateral_left, rear_right, rear_left]
);

region_data!(
    ArmsData,
    ArmsPatch,
    Region::Arms,
    [biceps_right, biceps_left, triceps_right, triceps_left, forearms_right, forearms_left]
);

region_data!(
    LegsData,
    LegsPatch,
    Region::Legs,
    [
        quads_right,
        quads_left,
        hamstrings_right,
        hamstrings_left,
        glutes_right,
        glutes_left,
        calves_right,
        calves_left,
    ]
);

region_data!(CoreData, CorePatch, Region::Core, [abs, obliques]);

/// Snapshot of every region's typed values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyData {
    pub shoulders: ShoulderData,
    pub chest: ChestData,
    pub back: BackData,
    pub arms: ArmsData,
    pub legs: LegsData,
    pub core: CoreData,
}

/// Partial body update; absent regions and fields stay untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyPatch {
    pub shoulders: Option<ShoulderPatch>,
    pub chest: Option<ChestPatch>,
    pub back: Option<BackPatch>,
    pub arms: Option<ArmsPatch>,
    pub legs: Option<LegsPatch>,
    pub core: Option<CorePatch>,
}

/// Which side of the figure is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Front,
    Back,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
        }
    }

    pub fn toggled(&self) -> View {
        match self {
            View::Front => View::Back,
            View::Back => View::Front,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(View::Front),
            "back" => Ok(View::Back),
            other => Err(format!("unknown view '{other}' (expected front or back)")),
        }
    }
}

/// Visualization options: `{ view, showLabels, maxValue }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatMapOptions {
    pub view: View,
    pub show_labels: bool,
    /// Normalization ceiling for intensity
    pub max_value: f64,
}

impl Default for HeatMapOptions {
    fn default() -> Self {
        Self {
            view: View::Front,
            show_labels: true,
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}

impl HeatMapOptions {
    /// Configured ceiling, or the default when it is unusable (<= 0, NaN)
    pub fn effective_max(&self) -> f64 {
        if self.max_value.is_finite() && self.max_value > 0.0 {
            self.max_value
        } else {
            DEFAULT_MAX_VALUE
        }
    }
}

/// All regions plus view state
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    chest: Muscle,
    back: Muscle,
    shoulders: Muscle,
    arms: Muscle,
    legs: Muscle,
    core: Muscle,
    options: HeatMapOptions,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(HeatMapOptions::default())
    }
}

impl Body {
    pub fn new(options: HeatMapOptions) -> Self {
        Self {
            chest: Muscle::new(Region::Chest),
            back: Muscle::new(Region::Back),
            shoulders: Muscle::new(Region::Shoulders),
            arms: Muscle::new(Region::Arms),
            legs: Muscle::new(Region::Legs),
            core: Muscle::new(Region::Core),
            options,
        }
    }

    pub fn from_data(data: &BodyData, options: HeatMapOptions) -> Self {
        let mut body = Self::new(options);
        body.set_body_data(data);
        body
    }

    pub fn options(&self) -> &HeatMapOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: HeatMapOptions) {
        self.options = options;
    }

    pub fn view(&self) -> View {
        self.options.view
    }

    /// Swap the drawn side; region data is kept
    pub fn set_view(&mut self, view: View) {
        self.options.view = view;
    }

    pub fn muscle(&self, region: Region) -> &Muscle {
        match region {
            Region::Chest => &self.chest,
            Region::Back => &self.back,
            Region::Shoulders => &self.shoulders,
            Region::Arms => &self.arms,
            Region::Legs => &self.legs,
            Region::Core => &self.core,
        }
    }

    pub fn muscle_mut(&mut self, region: Region) -> &mut Muscle {
        match region {
            Region::Chest => &mut self.chest,
            Region::Back => &mut self.back,
            Region::Shoulders => &mut self.shoulders,
            Region::Arms => &mut self.arms,
            Region::Legs => &mut self.legs,
            Region::Core => &mut self.core,
        }
    }

    pub fn muscles(&self) -> impl Iterator<Item = &Muscle> {
        Region::all().iter().map(|r| self.muscle(*r))
    }

    pub fn value(&self, part: PartRef) -> f64 {
        self.muscle(part.region()).value(part.field()).unwrap_or(0.0)
    }

    pub fn set_value(&mut self, part: PartRef, value: f64) -> bool {
        self.muscle_mut(part.region()).set_field(part.field(), value)
    }

    pub fn add_value(&mut self, part: PartRef, amount: f64) -> bool {
        self.muscle_mut(part.region()).add(part.field(), amount)
    }

    pub fn body_data(&self) -> BodyData {
        BodyData {
            shoulders: ShoulderData::from_muscle(&self.shoulders),
            chest: ChestData::from_muscle(&self.chest),
            back: BackData::from_muscle(&self.back),
            arms: ArmsData::from_muscle(&self.arms),
            legs: LegsData::from_muscle(&self.legs),
            core: CoreData::from_muscle(&self.core),
        }
    }

    pub fn set_body_data(&mut self, data: &BodyData) {
        data.shoulders.write_to(&mut self.shoulders);
        data.chest.write_to(&mut self.chest);
        data.back.write_to(&mut self.back);
        data.arms.write_to(&mut self.arms);
        data.legs.write_to(&mut self.legs);
        data.core.write_to(&mut self.core);
    }

    /// Merge a partial snapshot into the current values
    pub fn update_body_data(&mut self, patch: &BodyPatch) {
        if let Some(p) = &patch.shoulders {
            ShoulderData::apply_patch(p, &mut self.shoulders);
        }
        if let Some(p) = &patch.chest {
            ChestData::apply_patch(p, &mut self.chest);
        }
        if let Some(p) = &patch.back {
            BackData::apply_patch(p, &mut self.back);
        }
        if let Some(p) = &patch.arms {
            ArmsData::apply_patch(p, &mut self.arms);
        }
        if let Some(p) = &patch.legs {
            LegsData::apply_patch(p, &mut self.legs);
        }
        if let Some(p) = &patch.core {
            CoreData::apply_patch(p, &mut self.core);
        }
    }

    pub fn reset(&mut self) {
        for region in Region::all() {
            self.muscle_mut(*region).reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_muscle_shape() {
        let legs = Muscle::new(Region::Legs);
        assert_eq!(legs.get_type(), "legs");
        assert_eq!(legs.groups().len(), 4);
        assert_eq!(legs.groups()[1].title, "Hamstrings");
        assert_eq!(legs.groups()[1].parts[1].label, "L");
        assert_eq!(legs.groups()[1].parts[1].id.as_deref(), Some("legs.hamstrings_left"));
        assert_eq!(legs.total(), 0.0);
    }

    #[test]
    fn test_data_is_independent_copy() {
        let mut chest = Muscle::new(Region::Chest);
        chest.update_data(0, 0, 120.0);

        let mut copy = chest.data();
        copy[0].parts[0].value = 999.0;
        copy[0].parts.clear();

        assert_eq!(chest.data()[0].parts.len(), 3);
        assert_eq!(chest.data()[0].parts[0].value, 120.0);
    }

    #[test]
    fn test_update_data_out_of_range_is_noop() {
        let mut arms = Muscle::new(Region::Arms);
        arms.update_data(1, 1, 50.0);
        let before = arms.data();

        assert!(!arms.update_data(7, 0, 10.0));
        assert!(!arms.update_data(0, 9, 10.0));
        assert_eq!(arms.data(), before);
    }

    #[test]
    fn test_update_data_clamps_negative() {
        let mut core = Muscle::new(Region::Core);
        assert!(core.update_data(0, 0, -40.0));
        assert_eq!(core.value("abs"), Some(0.0));
        core.update_data(0, 1, f64::NAN);
        assert_eq!(core.value("obliques"), Some(0.0));
    }

    #[test]
    fn test_update_group_keeps_shape() {
        let mut shoulders = Muscle::new(Region::Shoulders);
        let incoming = vec![
            MusclePart { label: "x".into(), value: 10.0, id: None },
            MusclePart { label: "y".into(), value: 20.0, id: None },
            MusclePart { label: "z".into(), value: 30.0, id: None },
        ];

        assert!(shoulders.update_group(2, &incoming));
        let groups = shoulders.data();
        assert_eq!(groups[2].parts.len(), 2);
        assert_eq!(groups[2].parts[0].label, "R");
        assert_eq!(shoulders.value("rear_right"), Some(10.0));
        assert_eq!(shoulders.value("rear_left"), Some(20.0));

        assert!(!shoulders.update_group(3, &incoming));
    }

    #[test]
    fn test_update_group_deep_copies() {
        let mut chest = Muscle::new(Region::Chest);
        let mut incoming = vec![MusclePart { label: "Upper".into(), value: 5.0, id: None }];
        chest.update_group(0, &incoming);
        incoming[0].value = 500.0;
        assert_eq!(chest.value("upper"), Some(5.0));
    }

    #[test]
    fn test_typed_roundtrip_touches_every_slot() {
        let mut legs = Muscle::new(Region::Legs);
        let data = LegsData {
            quads_right: 1.0,
            quads_left: 2.0,
            hamstrings_right: 3.0,
            hamstrings_left: 4.0,
            glutes_right: 5.0,
            glutes_left: 6.0,
            calves_right: 7.0,
            calves_left: 8.0,
        };
        assert!(legs.set_typed(&data));
        assert_eq!(legs.typed::<LegsData>(), Some(data));

        let values: Vec<f64> = legs
            .groups()
            .iter()
            .flat_map(|g| g.parts.iter().map(|p| p.value))
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_typed_wrong_region() {
        let mut chest = Muscle::new(Region::Chest);
        assert!(chest.typed::<BackData>().is_none());
        assert!(!chest.set_typed(&CoreData { abs: 1.0, obliques: 1.0 }));
        assert_eq!(chest.total(), 0.0);
    }

    #[test]
    fn test_muscle_patch() {
        let mut chest = Muscle::new(Region::Chest);
        chest.set_typed(&ChestData { upper: 1.0, middle: 2.0, lower: 3.0 });

        assert!(chest.patch::<ChestData>(&ChestPatch { lower: Some(30.0), ..Default::default() }));
        assert_eq!(chest.typed::<ChestData>(), Some(ChestData { upper: 1.0, middle: 2.0, lower: 30.0 }));

        assert!(!chest.patch::<CoreData>(&CorePatch { abs: Some(9.0), ..Default::default() }));
        assert_eq!(chest.total(), 33.0);
    }

    #[test]
    fn test_body_from_data() {
        let data = BodyData {
            back: BackData { traps: 10.0, traps_middle: 20.0, lats: 30.0, lower_back: 40.0 },
            ..Default::default()
        };
        let options = HeatMapOptions { view: View::Back, ..Default::default() };
        let body = Body::from_data(&data, options);

        assert_eq!(body.view(), View::Back);
        assert_eq!(body.body_data(), data);
        assert_eq!(body.value(PartRef::parse("back.traps_middle").unwrap()), 20.0);
    }

    #[test]
    fn test_back_fields_are_distinct() {
        let mut back = Muscle::new(Region::Back);
        back.set_typed(&BackData { traps: 10.0, traps_middle: 20.0, lats: 30.0, lower_back: 40.0 });
        let data = back.typed::<BackData>().unwrap();
        assert_eq!(data.traps, 10.0);
        assert_eq!(data.traps_middle, 20.0);
    }

    #[test]
    fn test_patch_touches_only_supplied_fields() {
        let mut body = Body::default();
        body.set_body_data(&BodyData {
            chest: ChestData { upper: 1.0, middle: 2.0, lower: 3.0 },
            core: CoreData { abs: 4.0, obliques: 5.0 },
            ..Default::default()
        });

        body.update_body_data(&BodyPatch {
            chest: Some(ChestPatch { middle: Some(20.0), ..Default::default() }),
            ..Default::default()
        });

        let data = body.body_data();
        assert_eq!(data.chest, ChestData { upper: 1.0, middle: 20.0, lower: 3.0 });
        assert_eq!(data.core, CoreData { abs: 4.0, obliques: 5.0 });
    }

    #[test]
    fn test_patch_from_json() {
        let patch: BodyPatch =
            serde_json::from_str(r#"{"back": {"trapsMiddle": 12.5}}"#).unwrap();
        let mut body = Body::default();
        body.update_body_data(&patch);
        assert_eq!(body.body_data().back.traps_middle, 12.5);
        assert_eq!(body.body_data().back.traps, 0.0);
    }

    #[test]
    fn test_body_data_json_keys() {
        let mut body = Body::default();
        body.set_value(PartRef::parse("legs.calves_left").unwrap(), 42.0);
        let json = serde_json::to_value(body.body_data()).unwrap();
        assert_eq!(json["legs"]["calvesLeft"], 42.0);
        assert_eq!(json["back"]["lowerBack"], 0.0);
    }

    #[test]
    fn test_set_view_keeps_data() {
        let mut body = Body::default();
        let part = PartRef::parse("arms.biceps_left").unwrap();
        body.add_value(part, 30.0);
        body.add_value(part, 12.0);
        body.set_view(View::Back);
        assert_eq!(body.view(), View::Back);
        assert_eq!(body.value(part), 42.0);
    }

    #[test]
    fn test_options_defaults() {
        let options: HeatMapOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, HeatMapOptions::default());
        assert_eq!(options.view, View::Front);
        assert!(options.show_labels);
        assert_eq!(options.max_value, 1000.0);

        let options: HeatMapOptions =
            serde_json::from_str(r#"{"view": "back", "showLabels": false, "maxValue": 0}"#).unwrap();
        assert_eq!(options.view, View::Back);
        assert!(!options.show_labels);
        assert_eq!(options.effective_max(), 1000.0);
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("BACK".parse::<View>(), Ok(View::Back));
        assert!("side".parse::<View>().is_err());
        assert_eq!(View::Front.toggled(), View::Back);
    }
}
