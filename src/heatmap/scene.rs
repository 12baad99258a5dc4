//! Scene description and SVG serialization
//!
//! A [`Scene`] is the toolkit-neutral output of the renderer: shapes with
//! fills and optional labels. [`Scene::to_svg`] turns it into a standalone
//! SVG document; other hosts can walk the scene themselves.

use std::fmt::Write;

use serde::Serialize;

use super::color::{ColorScale, Rgb};
use super::intensity::IntensityCalculator;
use super::shapes::{self, Geometry, VIEW_BOX_HEIGHT, VIEW_BOX_WIDTH};
use crate::body::{Body, PartRef, View};

const SILHOUETTE_FILL: &str = "#f8f9fa";
const OUTLINE: &str = "#adb5bd";
const MUSCLE_STROKE: &str = "#495057";
const LABEL_FILL: &str = "#212529";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub part: PartRef,
    pub geometry: Geometry,
    pub fill: Rgb,
    pub intensity: f64,
    /// Tooltip text: part name and value
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub part: PartRef,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub view: View,
    pub width: f64,
    pub height: f64,
    pub silhouette: Vec<Geometry>,
    pub shapes: Vec<Shape>,
    pub labels: Vec<Label>,
}

/// Whole numbers print without decimals, others with one
pub fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

impl Scene {
    /// Lay out the body for its current view and color each part
    pub fn build(body: &Body, colors: &impl ColorScale) -> Scene {
        let options = body.options();
        let calc = IntensityCalculator::new(options.effective_max());
        let view = options.view;

        let shapes: Vec<Shape> = shapes::shapes_for(view)
            .iter()
            .filter_map(|spec| {
                let part = PartRef::parse(spec.part)?;
                let value = body.value(part);
                let intensity = calc.normalize(value);
                Some(Shape {
                    part,
                    geometry: spec.geometry,
                    fill: colors.color(intensity),
                    intensity,
                    title: format!("{}: {}", part.name(), format_value(value)),
                })
            })
            .collect();

        let labels = if options.show_labels {
            shapes::visible_parts(view)
                .into_iter()
                .filter_map(|part| {
                    let first = shapes.iter().find(|s| s.part == part)?;
                    let (x, y) = first.geometry.center();
                    Some(Label { part, x, y, text: first.title.clone() })
                })
                .collect()
        } else {
            Vec::new()
        };

        Scene {
            view,
            width: VIEW_BOX_WIDTH,
            height: VIEW_BOX_HEIGHT,
            silhouette: shapes::SILHOUETTE.to_vec(),
            shapes,
            labels,
        }
    }

    pub fn shapes_for(&self, part: PartRef) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |s| s.part == part)
    }

    /// Serialize to a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMid meet" class="body-svg body-{}">"#,
            self.width, self.height, self.view,
        );

        let _ = writeln!(
            out,
            r#"  <g class="body-silhouette" fill="{SILHOUETTE_FILL}" stroke="{OUTLINE}" stroke-width="2">"#,
        );
        for geometry in &self.silhouette {
            let _ = writeln!(out, "    <{} />", geometry_element(geometry));
        }
        let _ = writeln!(out, "  </g>");

        let _ = writeln!(
            out,
            r#"  <g class="muscles" stroke="{MUSCLE_STROKE}" stroke-width="1">"#,
        );
        for shape in &self.shapes {
            let element = geometry_element(&shape.geometry);
            let tag = element.split_whitespace().next().unwrap_or("path");
            let _ = writeln!(
                out,
                r#"    <{element} class="muscle" data-part="{}" fill="{}"><title>{}</title></{tag}>"#,
                shape.part,
                shape.fill,
                xml_escape(&shape.title),
            );
        }
        let _ = writeln!(out, "  </g>");

        if !self.labels.is_empty() {
            let _ = writeln!(
                out,
                r#"  <g class="muscle-labels" font-size="14" text-anchor="middle" fill="{LABEL_FILL}">"#,
            );
            for label in &self.labels {
                let _ = writeln!(
                    out,
                    r#"    <text x="{:.1}" y="{:.1}" data-part="{}">{}</text>"#,
                    label.x,
                    label.y,
                    label.part,
                    xml_escape(&label.text),
                );
            }
            let _ = writeln!(out, "  </g>");
        }

        let _ = writeln!(out, "</svg>");
        out
    }
}

/// Element name plus geometry attributes, without the angle brackets
fn geometry_element(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Ellipse { cx, cy, rx, ry } => {
            format!(r#"ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}""#)
        }
        Geometry::Polygon { points } => {
            let points: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
            format!(r#"polygon points="{}""#, points.join(" "))
        }
    }
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
