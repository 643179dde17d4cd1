//! Alignment guides shown while a panel is dragged.
//!
//! Guides are advisory: they never move the panel. Every comparison that
//! falls under the threshold yields its own guide, so two comparisons that
//! land on the same coordinate produce two guides.

use crate::id::PanelId;
use crate::model::{Panel, Rect, Size};
use serde::Serialize;
use smallvec::SmallVec;

/// Distance in pixels under which two coordinates count as aligned.
pub const GUIDE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A vertical line at an x coordinate.
    Vertical,
    /// A horizontal line at a y coordinate.
    Horizontal,
}

/// A guide line at the matched coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Guide {
    pub orientation: Orientation,
    pub position: f64,
}

pub type Guides = SmallVec<[Guide; 8]>;

/// Left, right, and center of a rectangle on one axis.
#[derive(Clone, Copy)]
struct AxisLines {
    start: f64,
    end: f64,
    center: f64,
}

impl AxisLines {
    fn horizontal(r: &Rect) -> Self {
        Self {
            start: r.x,
            end: r.right(),
            center: r.x + r.width / 2.0,
        }
    }

    fn vertical(r: &Rect) -> Self {
        Self {
            start: r.y,
            end: r.bottom(),
            center: r.y + r.height / 2.0,
        }
    }

    /// (dragged coordinate, target coordinate) pairs compared per sibling.
    fn pairs(self, other: AxisLines) -> [(f64, f64); 5] {
        [
            (self.start, other.start),
            (self.start, other.end),
            (self.end, other.start),
            (self.end, other.end),
            (self.center, other.center),
        ]
    }
}

/// Compute guides for `dragged` at its candidate position.
///
/// Compares against the canvas center and against every panel in `panels`
/// except `dragged_id`.
pub fn alignment_guides(
    dragged: Rect,
    dragged_id: PanelId,
    panels: &[Panel],
    canvas: Size,
    threshold: f64,
) -> Guides {
    let mut guides = Guides::new();
    let mut check = |orientation: Orientation, ours: f64, target: f64| {
        if (ours - target).abs() < threshold {
            guides.push(Guide {
                orientation,
                position: target,
            });
        }
    };

    let xs = AxisLines::horizontal(&dragged);
    let ys = AxisLines::vertical(&dragged);
    let (canvas_cx, canvas_cy) = canvas.center();
    check(Orientation::Vertical, xs.center, canvas_cx);
    check(Orientation::Horizontal, ys.center, canvas_cy);

    for other in panels.iter().filter(|p| p.id != dragged_id) {
        let rect = other.rect();
        for (ours, target) in xs.pairs(AxisLines::horizontal(&rect)) {
            check(Orientation::Vertical, ours, target);
        }
        for (ours, target) in ys.pairs(AxisLines::vertical(&rect)) {
            check(Orientation::Horizontal, ours, target);
        }
    }

    log::trace!("guides for {dragged_id}: {}", guides.len());
    guides
}
