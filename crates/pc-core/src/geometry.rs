//! Geometry engine: resize-corner math and bounds clamping.
//!
//! Every resize is expressed per axis. On each axis the dragged corner moves
//! either the *near* edge (left / top) or the *far* edge (right / bottom);
//! the other edge of that axis is the anchor and never moves. A corner is
//! just the pair of per-axis choices, so all four corners share one routine.

use crate::model::{MAX_CANVAS_SIZE, MIN_CANVAS_SIZE, MIN_PANEL_SIZE, PanelShape, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Corners ─────────────────────────────────────────────────────────────

/// A resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which edge of one axis a resize moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Left or top: position and size change together, the far edge is fixed.
    Near,
    /// Right or bottom: only the size changes, the position is fixed.
    Far,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    /// The (horizontal, vertical) edges this corner drags.
    pub fn edges(self) -> (Edge, Edge) {
        match self {
            Corner::TopLeft => (Edge::Near, Edge::Near),
            Corner::TopRight => (Edge::Far, Edge::Near),
            Corner::BottomLeft => (Edge::Near, Edge::Far),
            Corner::BottomRight => (Edge::Far, Edge::Far),
        }
    }

    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Absolute position of this corner on `rect`.
    pub fn point_on(self, rect: Rect) -> (f64, f64) {
        let (h, v) = self.edges();
        let x = match h {
            Edge::Near => rect.x,
            Edge::Far => rect.right(),
        };
        let y = match v {
            Edge::Near => rect.y,
            Edge::Far => rect.bottom(),
        };
        (x, y)
    }
}

impl FromStr for Corner {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Corner::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Panel resize ────────────────────────────────────────────────────────

/// New size on one axis plus the largest size that axis allows.
///
/// `pos`/`start` are the panel's starting position and size on the axis,
/// `extent` the canvas size on the same axis.
fn resize_axis(pos: f64, start: f64, delta: f64, extent: f64, edge: Edge) -> (f64, f64) {
    match edge {
        Edge::Far => {
            let limit = extent - pos;
            ((start + delta).min(limit).max(MIN_PANEL_SIZE), limit)
        }
        Edge::Near => {
            let limit = pos + start;
            let potential = (start - delta).max(MIN_PANEL_SIZE);
            (potential.min(limit), limit)
        }
    }
}

/// Position on one axis that keeps the anchor edge where it started.
fn anchor_position(pos: f64, start: f64, size: f64, edge: Edge) -> f64 {
    match edge {
        Edge::Far => pos,
        Edge::Near => (pos + start - size).max(0.0),
    }
}

/// Compute a panel's rectangle for a resize gesture.
///
/// `start` is the rectangle at gesture start and `(dx, dy)` the pointer
/// delta since then. The corner opposite to `corner` stays fixed, sizes
/// never drop below 50, and the result stays inside `bounds`. Aspect-locked
/// shapes collapse to a square whose side is the larger of the two axes,
/// capped by both axis limits.
pub fn resize_panel(
    start: Rect,
    corner: Corner,
    dx: f64,
    dy: f64,
    bounds: Size,
    shape: PanelShape,
) -> Rect {
    let (h_edge, v_edge) = corner.edges();
    let (mut width, max_w) = resize_axis(start.x, start.width, dx, bounds.width, h_edge);
    let (mut height, max_h) = resize_axis(start.y, start.height, dy, bounds.height, v_edge);

    if shape.is_aspect_locked() {
        let side = width.max(height).min(max_w.min(max_h)).max(MIN_PANEL_SIZE);
        width = side;
        height = side;
    }

    Rect::new(
        anchor_position(start.x, start.width, width, h_edge),
        anchor_position(start.y, start.height, height, v_edge),
        width,
        height,
    )
}

// ─── Canvas resize ───────────────────────────────────────────────────────

fn clamp_canvas_dimension(value: f64) -> f64 {
    value.min(MAX_CANVAS_SIZE).max(MIN_CANVAS_SIZE)
}

/// Compute the canvas size for a canvas-corner resize gesture.
///
/// Dragging a near edge outward (negative delta) grows the canvas. The
/// result is clamped to `[200, 1200]` on both axes.
pub fn resize_canvas(start: Size, corner: Corner, dx: f64, dy: f64) -> Size {
    let axis = |size: f64, delta: f64, edge: Edge| match edge {
        Edge::Far => clamp_canvas_dimension(size + delta),
        Edge::Near => clamp_canvas_dimension(size - delta),
    };
    let (h_edge, v_edge) = corner.edges();
    Size::new(
        axis(start.width, dx, h_edge),
        axis(start.height, dy, v_edge),
    )
}

// ─── Clamping ────────────────────────────────────────────────────────────

/// Clamp a requested top-left position so a `width × height` panel stays
/// inside `bounds`. Floors at 0 when the panel is larger than the canvas.
pub fn clamp_position(x: f64, y: f64, width: f64, height: f64, bounds: Size) -> (f64, f64) {
    (
        x.min(bounds.width - width).max(0.0),
        y.min(bounds.height - height).max(0.0),
    )
}

/// Shrink and shift `rect` until it fits in `bounds`.
///
/// Used when placing a new panel whose default size may exceed a small
/// canvas. Aspect-locked shapes stay square.
pub fn fit_rect(rect: Rect, bounds: Size, shape: PanelShape) -> Rect {
    let mut width = rect.width.min(bounds.width);
    let mut height = rect.height.min(bounds.height);
    if shape.is_aspect_locked() {
        let side = width.min(height);
        width = side;
        height = side;
    }
    let (x, y) = clamp_position(rect.x, rect.y, width, height, bounds);
    Rect::new(x, y, width, height)
}

/// Apply an explicit width/height edit to a panel at `rect`.
///
/// Sizes are floored at 50 and capped so the panel does not cross the
/// right or bottom canvas edge. For aspect-locked shapes the height
/// follows the width.
pub fn edit_dimensions(rect: Rect, width: f64, height: f64, bounds: Size, shape: PanelShape) -> Rect {
    let max_w = bounds.width - rect.x;
    let max_h = bounds.height - rect.y;
    let mut w = width.min(max_w).max(MIN_PANEL_SIZE);
    let mut h = height.min(max_h).max(MIN_PANEL_SIZE);
    if shape.is_aspect_locked() {
        let side = width.min(max_w.min(max_h)).max(MIN_PANEL_SIZE);
        w = side;
        h = side;
    }
    Rect::new(rect.x, rect.y, w, h)
}
