//! Hit testing: point → panel, resize handle, or canvas handle.
//!
//! Walks panels in reverse paint order so the topmost panel wins.

use crate::geometry::Corner;
use crate::id::PanelId;
use crate::model::{Panel, Rect, Size, paint_order};

/// Radius in pixels around a corner that counts as grabbing its handle.
pub const HANDLE_RADIUS: f64 = 6.0;

/// Find the topmost panel containing (px, py).
pub fn hit_test(panels: &[Panel], px: f64, py: f64) -> Option<PanelId> {
    paint_order(panels)
        .into_iter()
        .rev()
        .find(|p| p.rect().contains(px, py))
        .map(|p| p.id)
}

fn corner_near(rect: Rect, px: f64, py: f64, radius: f64) -> Option<Corner> {
    Corner::ALL.into_iter().find(|c| {
        let (cx, cy) = c.point_on(rect);
        (px - cx).abs() <= radius && (py - cy).abs() <= radius
    })
}

/// Find the topmost panel whose resize handle is under (px, py).
pub fn hit_test_handle(panels: &[Panel], px: f64, py: f64, radius: f64) -> Option<(PanelId, Corner)> {
    paint_order(panels)
        .into_iter()
        .rev()
        .find_map(|p| corner_near(p.rect(), px, py, radius).map(|c| (p.id, c)))
}

/// Find the canvas resize handle under (px, py), if any.
pub fn hit_test_canvas_handle(canvas: Size, px: f64, py: f64, radius: f64) -> Option<Corner> {
    corner_near(Rect::new(0.0, 0.0, canvas.width, canvas.height), px, py, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PanelShape;

    fn panel(id: &str, z: i64, rect: Rect) -> Panel {
        let mut p = Panel::new(PanelId::intern(id), PanelShape::Rectangle, rect);
        p.z_index = z;
        p
    }

    #[test]
    fn topmost_panel_wins() {
        let panels = vec![
            panel("front", 2, Rect::new(50.0, 50.0, 100.0, 100.0)),
            panel("back", 1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        ];
        assert_eq!(hit_test(&panels, 75.0, 75.0), Some(PanelId::intern("front")));
        assert_eq!(hit_test(&panels, 10.0, 10.0), Some(PanelId::intern("back")));
        assert_eq!(hit_test(&panels, 400.0, 400.0), None);
    }

    #[test]
    fn handle_hit_reports_corner() {
        let panels = vec![panel("a", 1, Rect::new(100.0, 100.0, 200.0, 100.0))];
        assert_eq!(
            hit_test_handle(&panels, 302.0, 198.0, HANDLE_RADIUS),
            Some((PanelId::intern("a"), Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handle(&panels, 99.0, 101.0, HANDLE_RADIUS),
            Some((PanelId::intern("a"), Corner::TopLeft))
        );
        assert_eq!(hit_test_handle(&panels, 200.0, 150.0, HANDLE_RADIUS), None);
    }

    #[test]
    fn canvas_handle_hit() {
        let canvas = Size::new(800.0, 600.0);
        assert_eq!(
            hit_test_canvas_handle(canvas, 797.0, 4.0, HANDLE_RADIUS),
            Some(Corner::TopRight)
        );
        assert_eq!(hit_test_canvas_handle(canvas, 400.0, 300.0, HANDLE_RADIUS), None);
    }
}
