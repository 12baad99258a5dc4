//! Heat-map engine - logs in, colored body scene out
//!
//! Pipeline: logs → date window → tag mapping → per-part aggregation
//! ([`MuscleTracker`]) → [`Body`] → normalization → colors → [`Scene`].

pub mod color;
pub mod intensity;
pub mod scene;
pub mod shapes;

pub use color::{ColorScale, HeatGradient, Rgb, heat_color};
pub use intensity::{DEFAULT_MAX_VALUE, IntensityCalculator, PartIntensity};
pub use scene::Scene;

use tracing::debug;

use crate::body::{Body, BodyPatch, HeatMapOptions, View};
use crate::db::WorkoutLog;
use crate::ml::{DateRange, MuscleTracker};
use crate::tags::TagMap;

/// Aggregate logs into a fresh body model
pub fn build_body(
    logs: &[WorkoutLog],
    tags: &TagMap,
    range: Option<DateRange>,
    options: HeatMapOptions,
) -> Body {
    MuscleTracker::from_logs(logs, tags, range).into_body(options)
}

/// Anything that can display a scene. Each call replaces what was shown before.
pub trait RenderTarget {
    fn replace(&mut self, scene: &Scene);
}

/// Keeps the latest SVG document
#[derive(Debug, Default)]
pub struct SvgTarget {
    pub svg: String,
    pub renders: usize,
}

impl RenderTarget for SvgTarget {
    fn replace(&mut self, scene: &Scene) {
        self.svg = scene.to_svg();
        self.renders += 1;
    }
}

/// Keeps the latest scene as-is, for hosts that draw it themselves
#[derive(Debug, Default)]
pub struct SceneTarget {
    pub scene: Option<Scene>,
}

impl RenderTarget for SceneTarget {
    fn replace(&mut self, scene: &Scene) {
        self.scene = Some(scene.clone());
    }
}

/// Owns a body model and the target it was last rendered into
pub struct BodyHeatMap<T: RenderTarget> {
    body: Body,
    colors: HeatGradient,
    target: Option<T>,
}

impl<T: RenderTarget> BodyHeatMap<T> {
    pub fn new(body: Body) -> Self {
        Self { body, colors: HeatGradient, target: None }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.body, &self.colors)
    }

    /// Attach `target` and draw into it, replacing anything attached before
    pub fn render(&mut self, target: T) {
        self.target = Some(target);
        self.redraw();
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn detach(&mut self) -> Option<T> {
        self.target.take()
    }

    /// Switch front/back; region data is kept
    pub fn set_view(&mut self, view: View) {
        self.body.set_view(view);
        self.redraw();
    }

    pub fn update_body_data(&mut self, patch: &BodyPatch) {
        self.body.update_body_data(patch);
        self.redraw();
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = body;
        self.redraw();
    }

    fn redraw(&mut self) {
        if self.target.is_none() {
            return;
        }
        let scene = self.scene();
        debug!(view = %scene.view, shapes = scene.shapes.len(), labels = scene.labels.len(), "render");
        if let Some(target) = self.target.as_mut() {
            target.replace(&scene);
        }
    }
}
