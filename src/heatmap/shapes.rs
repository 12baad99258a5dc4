//! Fixed anatomical layout for the front and back figures
//!
//! Coordinates live in a `660.46 x 1206.46` view box. The front figure faces
//! the viewer, so the body's right side is drawn on the left half.

use serde::Serialize;

use crate::body::{PartRef, View};

pub const VIEW_BOX_WIDTH: f64 = 660.46;
pub const VIEW_BOX_HEIGHT: f64 = 1206.46;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Polygon { points: &'static [(f64, f64)] },
}

impl Geometry {
    /// Label anchor: ellipse center or polygon vertex mean
    pub fn center(&self) -> (f64, f64) {
        match self {
            Geometry::Ellipse { cx, cy, .. } => (*cx, *cy),
            Geometry::Polygon { points } => {
                if points.is_empty() {
                    return (0.0, 0.0);
                }
                let n = points.len() as f64;
                let (sx, sy) = points
                    .iter()
                    .fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
                (sx / n, sy / n)
            }
        }
    }
}

/// One drawn area bound to a muscle part path
#[derive(Debug)]
pub struct ShapeSpec {
    pub part: &'static str,
    pub geometry: Geometry,
}

const fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> Geometry {
    Geometry::Ellipse { cx, cy, rx, ry }
}

const fn polygon(points: &'static [(f64, f64)]) -> Geometry {
    Geometry::Polygon { points }
}

const fn shape(part: &'static str, geometry: Geometry) -> ShapeSpec {
    ShapeSpec { part, geometry }
}

/// Neutral outline drawn under the muscles in both views
pub static SILHOUETTE: &[Geometry] = &[
    ellipse(330.0, 90.0, 52.0, 66.0),
    polygon(&[(305.0, 150.0), (355.0, 150.0), (360.0, 185.0), (300.0, 185.0)]),
    polygon(&[(225.0, 190.0), (435.0, 190.0), (420.0, 560.0), (240.0, 560.0)]),
    polygon(&[(240.0, 560.0), (420.0, 560.0), (430.0, 640.0), (230.0, 640.0)]),
    polygon(&[(180.0, 200.0), (225.0, 200.0), (215.0, 420.0), (165.0, 420.0)]),
    polygon(&[(435.0, 200.0), (480.0, 200.0), (495.0, 420.0), (445.0, 420.0)]),
    polygon(&[(165.0, 420.0), (215.0, 420.0), (200.0, 600.0), (150.0, 600.0)]),
    polygon(&[(445.0, 420.0), (495.0, 420.0), (510.0, 600.0), (460.0, 600.0)]),
    ellipse(172.0, 630.0, 22.0, 32.0),
    ellipse(488.0, 630.0, 22.0, 32.0),
    polygon(&[(235.0, 640.0), (325.0, 640.0), (315.0, 900.0), (250.0, 900.0)]),
    polygon(&[(335.0, 640.0), (425.0, 640.0), (410.0, 900.0), (345.0, 900.0)]),
    polygon(&[(250.0, 900.0), (315.0, 900.0), (305.0, 1140.0), (262.0, 1140.0)]),
    polygon(&[(345.0, 900.0), (410.0, 900.0), (398.0, 1140.0), (355.0, 1140.0)]),
    ellipse(282.0, 1165.0, 30.0, 16.0),
    ellipse(378.0, 1165.0, 30.0, 16.0),
];

pub static FRONT: &[ShapeSpec] = &[
    shape("back.traps", polygon(&[(285.0, 182.0), (312.0, 158.0), (318.0, 200.0)])),
    shape("back.traps", polygon(&[(375.0, 182.0), (348.0, 158.0), (342.0, 200.0)])),
    shape("shoulders.lateral_right", ellipse(190.0, 235.0, 16.0, 34.0)),
    shape("shoulders.lateral_left", ellipse(470.0, 235.0, 16.0, 34.0)),
    shape("shoulders.front_right", ellipse(215.0, 225.0, 32.0, 38.0)),
    shape("shoulders.front_left", ellipse(445.0, 225.0, 32.0, 38.0)),
    shape("chest.upper", polygon(&[(240.0, 215.0), (420.0, 215.0), (415.0, 255.0), (245.0, 255.0)])),
    shape("chest.middle", polygon(&[(245.0, 255.0), (415.0, 255.0), (410.0, 300.0), (250.0, 300.0)])),
    shape("chest.lower", polygon(&[(250.0, 300.0), (410.0, 300.0), (395.0, 335.0), (265.0, 335.0)])),
    shape("arms.biceps_right", ellipse(198.0, 310.0, 20.0, 62.0)),
    shape("arms.biceps_left", ellipse(462.0, 310.0, 20.0, 62.0)),
    shape("arms.forearms_right", polygon(&[(170.0, 430.0), (212.0, 430.0), (198.0, 580.0), (158.0, 580.0)])),
    shape("arms.forearms_left", polygon(&[(448.0, 430.0), (490.0, 430.0), (502.0, 580.0), (462.0, 580.0)])),
    shape("core.abs", polygon(&[(295.0, 345.0), (365.0, 345.0), (360.0, 540.0), (300.0, 540.0)])),
    shape("core.obliques", polygon(&[(255.0, 350.0), (292.0, 350.0), (297.0, 530.0), (262.0, 510.0)])),
    shape("core.obliques", polygon(&[(405.0, 350.0), (368.0, 350.0), (363.0, 530.0), (398.0, 510.0)])),
    shape("legs.quads_right", polygon(&[(245.0, 660.0), (320.0, 660.0), (310.0, 880.0), (258.0, 880.0)])),
    shape("legs.quads_left", polygon(&[(340.0, 660.0), (415.0, 660.0), (402.0, 880.0), (350.0, 880.0)])),
    shape("legs.calves_right", ellipse(283.0, 980.0, 22.0, 70.0)),
    shape("legs.calves_left", ellipse(377.0, 980.0, 22.0, 70.0)),
];

pub static BACK: &[ShapeSpec] = &[
    shape(
        "back.traps",
        polygon(&[(290.0, 180.0), (370.0, 180.0), (395.0, 215.0), (330.0, 235.0), (265.0, 215.0)]),
    ),
    shape(
        "back.traps_middle",
        polygon(&[
            (265.0, 215.0),
            (330.0, 235.0),
            (395.0, 215.0),
            (380.0, 290.0),
            (330.0, 310.0),
            (280.0, 290.0),
        ]),
    ),
    shape("back.lats", polygon(&[(240.0, 250.0), (282.0, 290.0), (300.0, 430.0), (255.0, 400.0)])),
    shape("back.lats", polygon(&[(420.0, 250.0), (378.0, 290.0), (360.0, 430.0), (405.0, 400.0)])),
    shape("back.lower_back", polygon(&[(300.0, 430.0), (360.0, 430.0), (365.0, 540.0), (295.0, 540.0)])),
    shape("shoulders.lateral_left", ellipse(190.0, 235.0, 16.0, 34.0)),
    shape("shoulders.lateral_right", ellipse(470.0, 235.0, 16.0, 34.0)),
    shape("shoulders.rear_left", ellipse(215.0, 225.0, 32.0, 36.0)),
    shape("shoulders.rear_right", ellipse(445.0, 225.0, 32.0, 36.0)),
    shape("arms.triceps_left", ellipse(195.0, 315.0, 21.0, 62.0)),
    shape("arms.triceps_right", ellipse(465.0, 315.0, 21.0, 62.0)),
    shape("arms.forearms_left", polygon(&[(170.0, 430.0), (212.0, 430.0), (198.0, 580.0), (158.0, 580.0)])),
    shape("arms.forearms_right", polygon(&[(448.0, 430.0), (490.0, 430.0), (502.0, 580.0), (462.0, 580.0)])),
    shape("legs.glutes_left", ellipse(290.0, 600.0, 46.0, 45.0)),
    shape("legs.glutes_right", ellipse(370.0, 600.0, 46.0, 45.0)),
    shape("legs.hamstrings_left", polygon(&[(245.0, 660.0), (320.0, 660.0), (310.0, 880.0), (258.0, 880.0)])),
    shape("legs.hamstrings_right", polygon(&[(340.0, 660.0), (415.0, 660.0), (402.0, 880.0), (350.0, 880.0)])),
    shape("legs.calves_left", ellipse(283.0, 990.0, 26.0, 75.0)),
    shape("legs.calves_right", ellipse(377.0, 990.0, 26.0, 75.0)),
];

pub fn shapes_for(view: View) -> &'static [ShapeSpec] {
    match view {
        View::Front => FRONT,
        View::Back => BACK,
    }
}

/// Distinct parts drawn in a view, in table order
pub fn visible_parts(view: View) -> Vec<PartRef> {
    let mut parts: Vec<PartRef> = Vec::new();
    for spec in shapes_for(view) {
        if let Some(part) = PartRef::parse(spec.part)
            && !parts.contains(&part)
        {
            parts.push(part);
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_shape_names_a_real_part() {
        for view in [View::Front, View::Back] {
            for spec in shapes_for(view) {
                assert!(PartRef::parse(spec.part).is_some(), "{view}: {}", spec.part);
            }
        }
    }

    #[test]
    fn test_views_cover_every_part() {
        let covered: HashSet<PartRef> = visible_parts(View::Front)
            .into_iter()
            .chain(visible_parts(View::Back))
            .collect();
        for part in PartRef::all() {
            assert!(covered.contains(&part), "{part} is never drawn");
        }
    }

    #[test]
    fn test_views_use_different_shape_sets() {
        let front = visible_parts(View::Front);
        let back = visible_parts(View::Back);
        assert!(front.contains(&PartRef::parse("chest.upper").unwrap()));
        assert!(!back.contains(&PartRef::parse("chest.upper").unwrap()));
        assert!(back.contains(&PartRef::parse("back.lats").unwrap()));
        assert!(!front.contains(&PartRef::parse("back.lats").unwrap()));
    }

    #[test]
    fn test_shapes_inside_view_box() {
        for spec in FRONT.iter().chain(BACK.iter()) {
            let (x, y) = spec.geometry.center();
            assert!((0.0..=VIEW_BOX_WIDTH).contains(&x), "{}", spec.part);
            assert!((0.0..=VIEW_BOX_HEIGHT).contains(&y), "{}", spec.part);
        }
    }

    #[test]
    fn test_polygon_center() {
        let g = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(g.center(), (5.0, 5.0));
    }
}
