//! Core data model for the panel canvas.
//!
//! A document is a bounded rectangular `Canvas` holding a flat list of
//! `Panel`s. Panels are positioned in canvas pixel coordinates with the
//! origin at the top-left corner. Stacking is a plain integer `z_index`;
//! insertion order only breaks ties.

use crate::id::PanelId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Constants ───────────────────────────────────────────────────────────

/// Smallest width or height a panel may have.
pub const MIN_PANEL_SIZE: f64 = 50.0;

/// Smallest width or height the canvas may have.
pub const MIN_CANVAS_SIZE: f64 = 200.0;

/// Largest width or height the canvas may have.
pub const MAX_CANVAS_SIZE: f64 = 1200.0;

/// Canvas size of a fresh editor session.
pub const INITIAL_CANVAS_WIDTH: f64 = 1180.0;
pub const INITIAL_CANVAS_HEIGHT: f64 = 720.0;

/// Canvas size assumed when an imported document omits it.
pub const IMPORT_DEFAULT_CANVAS_WIDTH: f64 = 1280.0;
pub const IMPORT_DEFAULT_CANVAS_HEIGHT: f64 = 720.0;

pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_FOREGROUND: &str = "#000000";

/// Title shown for panels that have none.
pub const UNTITLED: &str = "Untitled";

/// Imported stacking indices are clamped to `±Z_INDEX_LIMIT`.
pub const Z_INDEX_LIMIT: i64 = i32::MAX as i64;

// ─── Shapes ──────────────────────────────────────────────────────────────

/// The fixed set of shapes a panel can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelShape {
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Hexagon,
    Pentagon,
    Star,
    Diamond,
}

impl PanelShape {
    pub const ALL: [PanelShape; 8] = [
        PanelShape::Rectangle,
        PanelShape::Circle,
        PanelShape::Ellipse,
        PanelShape::Triangle,
        PanelShape::Hexagon,
        PanelShape::Pentagon,
        PanelShape::Star,
        PanelShape::Diamond,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelShape::Rectangle => "rectangle",
            PanelShape::Circle => "circle",
            PanelShape::Ellipse => "ellipse",
            PanelShape::Triangle => "triangle",
            PanelShape::Hexagon => "hexagon",
            PanelShape::Pentagon => "pentagon",
            PanelShape::Star => "star",
            PanelShape::Diamond => "diamond",
        }
    }

    /// Shapes whose width and height must always be equal.
    pub fn is_aspect_locked(self) -> bool {
        matches!(self, PanelShape::Circle)
    }
}

impl FromStr for PanelShape {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for PanelShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Geometry primitives ─────────────────────────────────────────────────

/// Width and height, used for canvas bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Whether the rectangle lies fully inside `[0, width] × [0, height]`.
    pub fn fits_in(&self, bounds: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.width
            && self.bottom() <= bounds.height
    }
}

// ─── Panel ───────────────────────────────────────────────────────────────

/// A positioned, sized, shaped element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: PanelId,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i64,
    pub shape: PanelShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

impl Panel {
    pub fn new(id: PanelId, shape: PanelShape, rect: Rect) -> Self {
        Self {
            id,
            title: UNTITLED.to_string(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            z_index: 0,
            shape,
            fill_color: None,
            border_color: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Collapse an aspect-locked panel to a square of its width.
    pub fn lock_aspect(&mut self) {
        if self.shape.is_aspect_locked() {
            self.height = self.width;
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }
}

/// Highest `z_index` among `panels`, or 0 when there are none.
pub fn max_z_index(panels: &[Panel]) -> i64 {
    panels.iter().map(|p| p.z_index).max().unwrap_or(0)
}

/// Stacking index for a panel placed above every panel in `panels`.
pub fn next_z_index(panels: &[Panel]) -> i64 {
    max_z_index(panels).saturating_add(1)
}

/// Panels in paint order: ascending `z_index`, insertion order on ties.
pub fn paint_order(panels: &[Panel]) -> Vec<&Panel> {
    let mut ordered: Vec<&Panel> = panels.iter().collect();
    ordered.sort_by_key(|p| p.z_index);
    ordered
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// The bounded drawing surface and its style flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    pub foreground_color: String,
    pub rounded_corners: bool,
    pub show_grid: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: INITIAL_CANVAS_WIDTH,
            height: INITIAL_CANVAS_HEIGHT,
            background_color: DEFAULT_BACKGROUND.to_string(),
            foreground_color: DEFAULT_FOREGROUND.to_string(),
            rounded_corners: true,
            show_grid: false,
        }
    }
}

impl Canvas {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Whether a canvas dimension is inside the allowed range.
pub fn canvas_dimension_in_range(value: f64) -> bool {
    value.is_finite() && (MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_parse_and_display() {
        for shape in PanelShape::ALL {
            assert_eq!(shape.as_str().parse::<PanelShape>(), Ok(shape));
            assert_eq!(shape.to_string(), shape.as_str());
        }
        assert!("square".parse::<PanelShape>().is_err());
    }

    #[test]
    fn only_circle_is_aspect_locked() {
        let locked: Vec<_> = PanelShape::ALL
            .into_iter()
            .filter(|s| s.is_aspect_locked())
            .collect();
        assert_eq!(locked, vec![PanelShape::Circle]);
    }

    #[test]
    fn panel_serializes_with_document_keys() {
        let mut panel = Panel::new(
            PanelId::intern("a"),
            PanelShape::Star,
            Rect::new(10.0, 20.0, 60.0, 70.0),
        );
        panel.z_index = 3;
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["zIndex"], 3);
        assert_eq!(json["shape"], "star");
        assert_eq!(json["title"], "Untitled");
        assert!(json.get("fillColor").is_none());
    }

    #[test]
    fn paint_order_is_stable_on_ties() {
        let mk = |id: &str, z: i64| {
            let mut p = Panel::new(
                PanelId::intern(id),
                PanelShape::Rectangle,
                Rect::new(0.0, 0.0, 50.0, 50.0),
            );
            p.z_index = z;
            p
        };
        let panels = vec![mk("top", 5), mk("first", 1), mk("second", 1)];
        let order: Vec<_> = paint_order(&panels).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "top"]);
        assert_eq!(max_z_index(&panels), 5);
        assert_eq!(max_z_index(&[]), 0);
        assert_eq!(next_z_index(&panels), 6);
    }

    #[test]
    fn next_z_index_saturates() {
        let mut p = Panel::new(
            PanelId::intern("z-max"),
            PanelShape::Rectangle,
            Rect::new(0.0, 0.0, 50.0, 50.0),
        );
        p.z_index = i64::MAX;
        assert_eq!(next_z_index(&[p]), i64::MAX);
    }

    #[test]
    fn rect_fits_in_bounds() {
        let bounds = Size::new(100.0, 100.0);
        assert!(Rect::new(0.0, 0.0, 100.0, 100.0).fits_in(bounds));
        assert!(!Rect::new(1.0, 0.0, 100.0, 100.0).fits_in(bounds));
        assert!(!Rect::new(-1.0, 0.0, 50.0, 50.0).fits_in(bounds));
    }

    #[test]
    fn canvas_range_check() {
        assert!(canvas_dimension_in_range(200.0));
        assert!(canvas_dimension_in_range(1200.0));
        assert!(!canvas_dimension_in_range(150.0));
        assert!(!canvas_dimension_in_range(1201.0));
        assert!(!canvas_dimension_in_range(f64::NAN));
    }
}
