//! musclemap - Muscle heat-map engine for workout logs
//!
//! Tagged workout rows are aggregated onto a fixed body model, normalized
//! and colored into a front/back scene, and checked for left/right and
//! front/back imbalances.

pub mod body;
pub mod db;
pub mod heatmap;
pub mod ml;
pub mod muscles;
pub mod sample;
pub mod tags;
pub mod tui;

pub use body::{Body, BodyData, HeatMapOptions, View};
pub use db::Database;
pub use heatmap::BodyHeatMap;
