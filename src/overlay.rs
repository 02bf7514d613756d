//! Turns an anchor point plus telemetry rows into something drawable.

use std::fmt;

use glam::Vec3;
use itertools::Itertools;

use crate::composition::{Overlay, TelemetryRow};

/// Host-side collaborator that draws an annotation. Receives the anchor in
/// world space and the rows in display order.
pub trait OverlayRenderer {
    type Output;

    fn render(&mut self, position: Vec3, rows: &[TelemetryRow]) -> Self::Output;

    fn render_overlay(&mut self, overlay: &Overlay) -> Self::Output {
        self.render(overlay.world_position, &overlay.rows)
    }
}

/// A plain text label box, one `label: value` line per row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBox {
    pub anchor: Vec3,
    pub lines: Vec<String>,
}

impl LabelBox {
    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for LabelBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@({:.2}, {:.2}, {:.2}) [{}]",
            self.anchor.x,
            self.anchor.y,
            self.anchor.z,
            self.lines.iter().join(" | ")
        )
    }
}

#[derive(Debug, Default)]
pub struct LabelBoxRenderer;

impl OverlayRenderer for LabelBoxRenderer {
    type Output = LabelBox;

    fn render(&mut self, position: Vec3, rows: &[TelemetryRow]) -> LabelBox {
        LabelBox {
            anchor: position,
            lines: rows
                .iter()
                .map(|row| format!("{}: {}", row.label, row.value))
                .collect(),
        }
    }
}
