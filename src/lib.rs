//! Scene composition for an interactive HVAC air-handling-unit viewer.
//!
//! A fixed catalog of sub-assemblies is loaded once into an [`assets::AssetCache`].
//! Every frame, [`viewer::HvacViewer::tick`] turns the operator's visibility
//! switches and the fan-animation flag into a [`composition::Frame`]: private
//! copies of the visible assets, centered once on first appearance, with
//! spinning fans and telemetry overlays on the instrumented parts.

pub mod assets;
pub mod camera;
pub mod catalog;
pub mod composition;
pub mod config;
pub mod math;
pub mod overlay;
pub mod scene_graph;
pub mod viewer;
pub mod visibility;

pub use viewer::HvacViewer;
pub use visibility::VisibilityState;
