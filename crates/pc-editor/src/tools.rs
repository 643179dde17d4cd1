//! Pointer gestures on the canvas.
//!
//! `SelectTool` turns pointer events plus a hit-test result into
//! `ToolAction`s that the editor applies to the state store. One gesture
//! is active at a time:
//!
//! | Pointer-down on | Gesture | Committed as |
//! |-----------------|---------|--------------|
//! | panel handle | resize | live updates batched into one history entry |
//! | canvas handle | canvas resize | `SetCanvasDimensions` on pointer-up |
//! | panel (free drag) | drag | `UpdatePanelPosition` on pointer-up |
//! | panel | none | selection only |
//! | background | none | clears selection |

use crate::input::InputEvent;
use crate::state::{CanvasState, PanelPatch, StateMutation};
use pc_core::geometry::{Corner, clamp_position, resize_canvas, resize_panel};
use pc_core::guides::{GUIDE_THRESHOLD, Guide, Guides, alignment_guides};
use pc_core::id::PanelId;
use pc_core::model::{PanelShape, Rect, Size};

/// What the pointer landed on at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Background,
    Panel(PanelId),
    PanelHandle(PanelId, Corner),
    CanvasHandle(Corner),
}

/// Output of the tool, applied in order by the editor.
#[derive(Debug, Clone)]
pub enum ToolAction {
    Select(Option<PanelId>),
    BeginBatch(&'static str),
    Mutate(StateMutation),
    EndBatch,
}

#[derive(Debug, Clone)]
pub struct DragGesture {
    pub id: PanelId,
    start_x: f64,
    start_y: f64,
    pub origin: Rect,
    /// Where the panel would land if released now.
    pub candidate: Rect,
    pub guides: Guides,
}

#[derive(Debug, Clone)]
pub struct ResizeGesture {
    pub id: PanelId,
    pub corner: Corner,
    start_x: f64,
    start_y: f64,
    pub origin: Rect,
    shape: PanelShape,
}

#[derive(Debug, Clone)]
pub struct CanvasResizeGesture {
    pub corner: Corner,
    start_x: f64,
    start_y: f64,
    pub origin: Size,
    /// Live preview size, committed on pointer-up.
    pub preview: Size,
}

#[derive(Debug, Clone)]
pub enum Gesture {
    Drag(DragGesture),
    Resize(ResizeGesture),
    CanvasResize(CanvasResizeGesture),
}

pub struct SelectTool {
    gesture: Option<Gesture>,
    pub guide_threshold: f64,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new(GUIDE_THRESHOLD)
    }
}

impl SelectTool {
    pub fn new(guide_threshold: f64) -> Self {
        Self {
            gesture: None,
            guide_threshold,
        }
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Guides for the panel being dragged; empty otherwise.
    pub fn guides(&self) -> &[Guide] {
        match &self.gesture {
            Some(Gesture::Drag(drag)) => &drag.guides,
            _ => &[],
        }
    }

    pub fn drag_preview(&self) -> Option<(PanelId, Rect)> {
        match &self.gesture {
            Some(Gesture::Drag(drag)) => Some((drag.id, drag.candidate)),
            _ => None,
        }
    }

    pub fn canvas_preview(&self) -> Option<Size> {
        match &self.gesture {
            Some(Gesture::CanvasResize(resize)) => Some(resize.preview),
            _ => None,
        }
    }

    /// Handle a pointer event. `hit` is only consulted on pointer-down.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Hit,
        state: &CanvasState,
        free_drag: bool,
    ) -> Vec<ToolAction> {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                // A lost pointer-up: settle the old gesture first.
                let mut actions = self.finish();
                self.pointer_down(*x, *y, hit, state, free_drag || modifiers.command(), &mut actions);
                actions
            }
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(*x, *y, state),
            InputEvent::PointerUp { .. } => self.finish(),
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } => Vec::new(),
        }
    }

    fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        hit: Hit,
        state: &CanvasState,
        free_drag: bool,
        actions: &mut Vec<ToolAction>,
    ) {
        match hit {
            Hit::PanelHandle(id, corner) => {
                let Some(panel) = state.panel(id) else {
                    return;
                };
                actions.push(ToolAction::Select(Some(id)));
                actions.push(ToolAction::BeginBatch("Resize panel"));
                self.gesture = Some(Gesture::Resize(ResizeGesture {
                    id,
                    corner,
                    start_x: x,
                    start_y: y,
                    origin: panel.rect(),
                    shape: panel.shape,
                }));
            }
            Hit::CanvasHandle(corner) => {
                let size = state.canvas.size();
                self.gesture = Some(Gesture::CanvasResize(CanvasResizeGesture {
                    corner,
                    start_x: x,
                    start_y: y,
                    origin: size,
                    preview: size,
                }));
            }
            Hit::Panel(id) => {
                let Some(panel) = state.panel(id) else {
                    return;
                };
                actions.push(ToolAction::Select(Some(id)));
                if free_drag {
                    self.gesture = Some(Gesture::Drag(DragGesture {
                        id,
                        start_x: x,
                        start_y: y,
                        origin: panel.rect(),
                        candidate: panel.rect(),
                        guides: Guides::new(),
                    }));
                }
            }
            Hit::Background => actions.push(ToolAction::Select(None)),
        }
    }

    fn pointer_move(&mut self, x: f64, y: f64, state: &CanvasState) -> Vec<ToolAction> {
        let bounds = state.canvas.size();
        match &mut self.gesture {
            Some(Gesture::Drag(drag)) => {
                let (cx, cy) = clamp_position(
                    drag.origin.x + (x - drag.start_x),
                    drag.origin.y + (y - drag.start_y),
                    drag.origin.width,
                    drag.origin.height,
                    bounds,
                );
                drag.candidate = Rect::new(cx, cy, drag.origin.width, drag.origin.height);
                drag.guides = alignment_guides(
                    drag.candidate,
                    drag.id,
                    &state.panels,
                    bounds,
                    self.guide_threshold,
                );
                Vec::new()
            }
            Some(Gesture::Resize(resize)) => {
                let rect = resize_panel(
                    resize.origin,
                    resize.corner,
                    x - resize.start_x,
                    y - resize.start_y,
                    bounds,
                    resize.shape,
                );
                log::trace!("resize {} {}: {rect:?}", resize.id, resize.corner);
                vec![ToolAction::Mutate(StateMutation::UpdatePanel {
                    id: resize.id,
                    patch: Box::new(PanelPatch::rect(rect)),
                })]
            }
            Some(Gesture::CanvasResize(resize)) => {
                resize.preview = resize_canvas(
                    resize.origin,
                    resize.corner,
                    x - resize.start_x,
                    y - resize.start_y,
                );
                log::trace!("canvas resize {}: {:?}", resize.corner, resize.preview);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// End the active gesture and return the actions that commit it.
    pub fn finish(&mut self) -> Vec<ToolAction> {
        match self.gesture.take() {
            Some(Gesture::Drag(drag)) => {
                if drag.candidate == drag.origin {
                    return Vec::new();
                }
                vec![ToolAction::Mutate(StateMutation::UpdatePanelPosition {
                    id: drag.id,
                    x: drag.candidate.x,
                    y: drag.candidate.y,
                })]
            }
            Some(Gesture::Resize(_)) => vec![ToolAction::EndBatch],
            Some(Gesture::CanvasResize(resize)) => {
                if resize.preview == resize.origin {
                    return Vec::new();
                }
                vec![ToolAction::Mutate(StateMutation::SetCanvasDimensions {
                    width: resize.preview.width,
                    height: resize.preview.height,
                })]
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use pc_core::model::Panel;

    fn state() -> CanvasState {
        let mut state = CanvasState::new();
        state.panels.push(Panel::new(
            PanelId::intern("tool-a"),
            PanelShape::Rectangle,
            Rect::new(100.0, 100.0, 200.0, 100.0),
        ));
        state
    }

    fn id() -> PanelId {
        PanelId::intern("tool-a")
    }

    #[test]
    fn click_selects_without_dragging() {
        let mut tool = SelectTool::default();
        let actions = tool.handle(
            &InputEvent::pointer_down(150.0, 150.0),
            Hit::Panel(id()),
            &state(),
            false,
        );
        assert!(matches!(actions.as_slice(), [ToolAction::Select(Some(sel))] if *sel == id()));
        assert!(!tool.is_active());
    }

    #[test]
    fn background_click_deselects() {
        let mut tool = SelectTool::default();
        let actions = tool.handle(
            &InputEvent::pointer_down(900.0, 600.0),
            Hit::Background,
            &state(),
            false,
        );
        assert!(matches!(actions.as_slice(), [ToolAction::Select(None)]));
    }

    #[test]
    fn ctrl_drag_commits_on_release() {
        let st = state();
        let mut tool = SelectTool::default();
        let down = InputEvent::PointerDown {
            x: 150.0,
            y: 150.0,
            modifiers: Modifiers::CTRL,
        };
        tool.handle(&down, Hit::Panel(id()), &st, false);
        assert!(tool.is_active());

        let moved = tool.handle(&InputEvent::pointer_move(180.0, 170.0), Hit::Background, &st, false);
        assert!(moved.is_empty());
        assert_eq!(tool.drag_preview(), Some((id(), Rect::new(130.0, 120.0, 200.0, 100.0))));

        let up = tool.handle(&InputEvent::pointer_up(180.0, 170.0), Hit::Background, &st, false);
        assert!(matches!(
            up.as_slice(),
            [ToolAction::Mutate(StateMutation::UpdatePanelPosition { x, y, .. })]
                if *x == 130.0 && *y == 120.0
        ));
        assert!(!tool.is_active());
        assert!(tool.guides().is_empty());
    }

    #[test]
    fn drag_without_movement_commits_nothing() {
        let st = state();
        let mut tool = SelectTool::default();
        tool.handle(&InputEvent::pointer_down(150.0, 150.0), Hit::Panel(id()), &st, true);
        let up = tool.handle(&InputEvent::pointer_up(150.0, 150.0), Hit::Background, &st, true);
        assert!(up.is_empty());
    }

    #[test]
    fn drag_reports_canvas_center_guide() {
        let st = state();
        let mut tool = SelectTool::default();
        tool.handle(&InputEvent::pointer_down(150.0, 150.0), Hit::Panel(id()), &st, true);
        // Canvas is 1180 wide: center x 590. Panel center lands at 590.
        tool.handle(&InputEvent::pointer_move(540.0, 150.0), Hit::Background, &st, true);
        assert!(
            tool.guides()
                .iter()
                .any(|g| g.orientation == pc_core::Orientation::Vertical && g.position == 590.0)
        );
    }

    #[test]
    fn resize_is_batched() {
        let st = state();
        let mut tool = SelectTool::default();
        let down = tool.handle(
            &InputEvent::pointer_down(300.0, 200.0),
            Hit::PanelHandle(id(), Corner::BottomRight),
            &st,
            false,
        );
        assert!(matches!(
            down.as_slice(),
            [ToolAction::Select(Some(_)), ToolAction::BeginBatch(_)]
        ));

        let moved = tool.handle(&InputEvent::pointer_move(350.0, 260.0), Hit::Background, &st, false);
        match moved.as_slice() {
            [ToolAction::Mutate(StateMutation::UpdatePanel { patch, .. })] => {
                assert_eq!(patch.width, Some(250.0));
                assert_eq!(patch.height, Some(160.0));
                assert_eq!(patch.x, Some(100.0));
            }
            other => panic!("unexpected actions: {other:?}"),
        }

        let up = tool.handle(&InputEvent::pointer_up(350.0, 260.0), Hit::Background, &st, false);
        assert!(matches!(up.as_slice(), [ToolAction::EndBatch]));
    }

    #[test]
    fn canvas_resize_previews_then_commits() {
        let st = state();
        let mut tool = SelectTool::default();
        tool.handle(
            &InputEvent::pointer_down(1180.0, 720.0),
            Hit::CanvasHandle(Corner::BottomRight),
            &st,
            false,
        );
        tool.handle(&InputEvent::pointer_move(900.0, 500.0), Hit::Background, &st, false);
        assert_eq!(tool.canvas_preview(), Some(Size::new(900.0, 500.0)));

        let up = tool.handle(&InputEvent::pointer_up(900.0, 500.0), Hit::Background, &st, false);
        assert!(matches!(
            up.as_slice(),
            [ToolAction::Mutate(StateMutation::SetCanvasDimensions { width, height })]
                if *width == 900.0 && *height == 500.0
        ));
        assert_eq!(tool.canvas_preview(), None);
    }
}
