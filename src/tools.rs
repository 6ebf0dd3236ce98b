//! Tool identities and transient drag-session state.
//!
//! The `Session` enum is the drag state machine: one variant per active
//! interaction, all cleared the moment a drag completes or the tool changes.
//! The editor owns one `Session` and drives it from input events.

use egui::Pos2;

use crate::canvas::Snapshot;

/// Airbrush timer period.
pub const AIRBRUSH_TICK_MS: u64 = 25;

/// Dots scattered per airbrush tick.
pub const AIRBRUSH_DOTS_PER_TICK: usize = 25;

/// Golden angle in radians, used to space airbrush dots evenly.
const GOLDEN_ANGLE: f32 = 2.399_963_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pencil,
    Brush,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Circle,
    RoundedRect,
    Polygon,
    Curve,
    Select,
    Airbrush,
    Text,
    Pick,
}

impl Tool {
    /// Brush size applied when the tool is activated. `None` keeps whatever
    /// size the user had set.
    pub fn default_brush_size(self) -> Option<u32> {
        match self {
            Tool::Pencil => Some(1),
            Tool::Brush => Some(4),
            Tool::Eraser => Some(20),
            Tool::Airbrush => Some(25),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::RoundedRect => "Rounded Rect",
            Tool::Polygon => "Polygon",
            Tool::Curve => "Curve",
            Tool::Select => "Select",
            Tool::Airbrush => "Airbrush",
            Tool::Text => "Text",
            Tool::Pick => "Pick",
        }
    }

    /// Tools that drag a preview between an anchor and the pointer.
    pub fn is_shape_drag(self) -> bool {
        matches!(
            self,
            Tool::Line | Tool::Rectangle | Tool::Circle | Tool::RoundedRect
        )
    }

    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Pencil | Tool::Brush | Tool::Eraser)
    }

    pub const ALL: [Tool; 14] = [
        Tool::Pencil,
        Tool::Brush,
        Tool::Eraser,
        Tool::Fill,
        Tool::Line,
        Tool::Rectangle,
        Tool::Circle,
        Tool::RoundedRect,
        Tool::Polygon,
        Tool::Curve,
        Tool::Select,
        Tool::Airbrush,
        Tool::Text,
        Tool::Pick,
    ];
}

impl Default for Tool {
    fn default() -> Self {
        Tool::Pencil
    }
}

/// Per-drag transient state. Snapshot-carrying variants restore it before
/// every preview redraw so previews never compound.
#[derive(Default)]
pub enum Session {
    #[default]
    Idle,
    Freehand {
        last: Pos2,
    },
    ShapeDrag {
        anchor: Pos2,
        last: Pos2,
        snapshot: Snapshot,
    },
    SelectionDrag {
        anchor: Pos2,
        last: Pos2,
        snapshot: Snapshot,
    },
    CurveBuilding {
        points: Vec<Pos2>,
        snapshot: Snapshot,
    },
    PolygonBuilding {
        points: Vec<Pos2>,
        snapshot: Snapshot,
    },
    AirbrushSpraying {
        last: Pos2,
        ticks: u64,
    },
}

impl Session {
    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }
}

/// Offsets for one airbrush tick: a golden-angle spiral of single-pixel dots
/// inside a disk of radius `brush_size`. The square-root radius scaling keeps
/// area density uniform; the tick index rotates the spiral so consecutive
/// ticks do not restamp the same pattern.
pub fn airbrush_offsets(brush_size: u32, tick: u64) -> Vec<(f32, f32)> {
    let radius = brush_size.max(1) as f32;
    let phase = (tick as usize) * AIRBRUSH_DOTS_PER_TICK;
    (0..AIRBRUSH_DOTS_PER_TICK)
        .map(|i| {
            let angle = (phase + i) as f32 * GOLDEN_ANGLE;
            let r = radius * ((i as f32 + 0.5) / AIRBRUSH_DOTS_PER_TICK as f32).sqrt();
            (r * angle.cos(), r * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_sizes_match_tool_expectations() {
        assert_eq!(Tool::Pencil.default_brush_size(), Some(1));
        assert_eq!(Tool::Brush.default_brush_size(), Some(4));
        assert_eq!(Tool::Eraser.default_brush_size(), Some(20));
        assert_eq!(Tool::Airbrush.default_brush_size(), Some(25));
        assert_eq!(Tool::Line.default_brush_size(), None);
    }

    #[test]
    fn airbrush_offsets_stay_inside_the_brush_size_disk() {
        for brush_size in [1u32, 10, 25] {
            let radius = brush_size as f32;
            let mut outermost = 0.0f32;
            for tick in 0..8 {
                for (dx, dy) in airbrush_offsets(brush_size, tick) {
                    let r = (dx * dx + dy * dy).sqrt();
                    assert!(r <= radius + 1e-3, "dot at {r} outside disk {radius}");
                    outermost = outermost.max(r);
                }
            }
            // The spray uses the whole disk, not a smaller or doubled one.
            assert!(outermost > radius * 0.95);
        }
    }

    #[test]
    fn airbrush_offsets_are_deterministic() {
        assert_eq!(airbrush_offsets(10, 3), airbrush_offsets(10, 3));
        assert_ne!(airbrush_offsets(10, 3), airbrush_offsets(10, 4));
    }

    #[test]
    fn airbrush_density_is_roughly_uniform() {
        // Accumulate many ticks and compare dot counts in the inner half-radius
        // disk (a quarter of the area) against the rest.
        let radius = 20.0f32;
        let mut inner = 0usize;
        let mut total = 0usize;
        for tick in 0..200 {
            for (dx, dy) in airbrush_offsets(20, tick) {
                total += 1;
                if (dx * dx + dy * dy).sqrt() < radius / 2.0 {
                    inner += 1;
                }
            }
        }
        let frac = inner as f32 / total as f32;
        assert!(
            (0.15..=0.35).contains(&frac),
            "inner-disk fraction {frac} should be near 0.25"
        );
    }
}
