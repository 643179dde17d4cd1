//! State store: the single source of truth for canvas + panels.
//!
//! Every history-significant change goes through `CanvasState::apply` with a
//! `StateMutation`. Invalid inputs (unknown ids, out-of-range canvas sizes)
//! leave the state untouched; the history layer notices the state did not
//! change and records nothing. Selection and editing flags are transient
//! and have their own setters that bypass history.

use pc_core::document::{LoadedLayout, validate_panels};
use pc_core::geometry::{clamp_position, edit_dimensions};
use pc_core::id::PanelId;
use pc_core::model::*;

/// Application state captured by every history snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasState {
    /// Panels in insertion order.
    pub panels: Vec<Panel>,
    pub canvas: Canvas,
    pub selected_panel: Option<PanelId>,
    /// Panel whose title is being edited in place.
    pub editing_panel: Option<PanelId>,
    pub is_editing_canvas: bool,
}

/// A partial panel update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelPatch {
    pub title: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i64>,
    pub shape: Option<PanelShape>,
    pub fill_color: Option<String>,
    pub border_color: Option<String>,
}

impl PanelPatch {
    /// Patch that moves and resizes a panel to `rect`.
    pub fn rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// A history-significant transition of the state store.
#[derive(Debug, Clone)]
pub enum StateMutation {
    /// Replace the whole panel list.
    SetPanels(Vec<Panel>),
    /// Append a panel. The caller picks the id and `z_index`.
    AddPanel(Box<Panel>),
    RemovePanel {
        id: PanelId,
    },
    /// Shallow-merge a patch. Position is not re-clamped.
    UpdatePanel {
        id: PanelId,
        patch: Box<PanelPatch>,
    },
    /// Move a panel, clamped into the canvas.
    UpdatePanelPosition {
        id: PanelId,
        x: f64,
        y: f64,
    },
    /// Explicit dimension edit, floored at the minimum and capped by the canvas.
    UpdatePanelDimensions {
        id: PanelId,
        width: f64,
        height: f64,
    },
    ClearPanels,
    /// Resize the canvas and re-clamp every panel. Ignored when out of range.
    SetCanvasDimensions {
        width: f64,
        height: f64,
    },
    SetCanvasColors {
        background: Option<String>,
        foreground: Option<String>,
    },
    SetCanvasOptions {
        rounded_corners: Option<bool>,
        show_grid: Option<bool>,
    },
    /// Replace canvas and panels with an imported document.
    LoadLayout(Box<LoadedLayout>),
    BringForward {
        id: PanelId,
    },
    SendBackward {
        id: PanelId,
    },
}

impl StateMutation {
    /// Short label recorded with the history entry.
    pub fn description(&self) -> &'static str {
        match self {
            StateMutation::SetPanels(_) => "Replace panels",
            StateMutation::AddPanel(_) => "Add panel",
            StateMutation::RemovePanel { .. } => "Delete panel",
            StateMutation::UpdatePanel { .. } => "Edit panel",
            StateMutation::UpdatePanelPosition { .. } => "Move panel",
            StateMutation::UpdatePanelDimensions { .. } => "Resize panel",
            StateMutation::ClearPanels => "Clear panels",
            StateMutation::SetCanvasDimensions { .. } => "Resize canvas",
            StateMutation::SetCanvasColors { .. } => "Change canvas colors",
            StateMutation::SetCanvasOptions { .. } => "Change canvas options",
            StateMutation::LoadLayout(_) => "Import layout",
            StateMutation::BringForward { .. } => "Bring forward",
            StateMutation::SendBackward { .. } => "Send backward",
        }
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    pub fn selected(&self) -> Option<&Panel> {
        self.selected_panel.and_then(|id| self.panel(id))
    }

    // ─── Transient (not history-significant) ─────────────────────────────

    pub fn set_selected_panel(&mut self, id: Option<PanelId>) {
        self.selected_panel = id;
    }

    /// Update the editing flags. `None` leaves a flag as it is.
    pub fn set_editing_states(
        &mut self,
        editing_panel: Option<Option<PanelId>>,
        is_editing_canvas: Option<bool>,
    ) {
        if let Some(editing) = editing_panel {
            self.editing_panel = editing;
        }
        if let Some(flag) = is_editing_canvas {
            self.is_editing_canvas = flag;
        }
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    /// Apply a history-significant transition in place.
    pub fn apply(&mut self, mutation: StateMutation) {
        let bounds = self.canvas.size();
        match mutation {
            StateMutation::SetPanels(mut panels) => {
                panels.iter_mut().for_each(Panel::lock_aspect);
                self.panels = panels;
            }
            StateMutation::AddPanel(mut panel) => {
                if self.panel(panel.id).is_some() {
                    log::debug!("add ignored: panel {} already exists", panel.id);
                    return;
                }
                panel.lock_aspect();
                self.panels.push(*panel);
            }
            StateMutation::RemovePanel { id } => {
                self.panels.retain(|p| p.id != id);
                if self.selected_panel == Some(id) {
                    self.selected_panel = None;
                }
                if self.editing_panel == Some(id) {
                    self.editing_panel = None;
                }
            }
            StateMutation::UpdatePanel { id, patch } => {
                if let Some(panel) = self.panel_mut(id) {
                    merge_patch(panel, *patch);
                }
            }
            StateMutation::UpdatePanelPosition { id, x, y } => {
                if let Some(panel) = self.panel_mut(id) {
                    let (x, y) = clamp_position(x, y, panel.width, panel.height, bounds);
                    panel.x = x;
                    panel.y = y;
                }
            }
            StateMutation::UpdatePanelDimensions { id, width, height } => {
                if let Some(panel) = self.panel_mut(id) {
                    let rect = edit_dimensions(panel.rect(), width, height, bounds, panel.shape);
                    panel.set_rect(rect);
                }
            }
            StateMutation::ClearPanels => {
                self.panels.clear();
                self.selected_panel = None;
                self.editing_panel = None;
            }
            StateMutation::SetCanvasDimensions { width, height } => {
                if !canvas_dimension_in_range(width) || !canvas_dimension_in_range(height) {
                    log::debug!("canvas size {width}x{height} out of range, ignored");
                    return;
                }
                self.canvas.width = width;
                self.canvas.height = height;
                let (panels, _report) = validate_panels(&self.panels, self.canvas.size());
                self.panels = panels;
            }
            StateMutation::SetCanvasColors {
                background,
                foreground,
            } => {
                if let Some(bg) = background.filter(|c| !c.is_empty()) {
                    self.canvas.background_color = bg;
                }
                if let Some(fg) = foreground.filter(|c| !c.is_empty()) {
                    self.canvas.foreground_color = fg;
                }
            }
            StateMutation::SetCanvasOptions {
                rounded_corners,
                show_grid,
            } => {
                if let Some(rounded) = rounded_corners {
                    self.canvas.rounded_corners = rounded;
                }
                if let Some(grid) = show_grid {
                    self.canvas.show_grid = grid;
                }
            }
            StateMutation::LoadLayout(layout) => {
                let LoadedLayout { panels, canvas, .. } = *layout;
                self.panels = panels;
                self.canvas = canvas;
            }
            StateMutation::BringForward { id } => {
                if let Some(panel) = self.panel_mut(id) {
                    panel.z_index = panel.z_index.saturating_add(1);
                }
            }
            StateMutation::SendBackward { id } => {
                if let Some(panel) = self.panel_mut(id) {
                    panel.z_index = panel.z_index.saturating_sub(1).max(0);
                }
            }
        }
    }
}

/// Shallow merge. Aspect-locked shapes collapse to the edited side; width
/// wins when both or neither dimension was touched.
fn merge_patch(panel: &mut Panel, patch: PanelPatch) {
    let height_only = patch.height.is_some() && patch.width.is_none();
    if let Some(title) = patch.title {
        panel.title = title;
    }
    if let Some(x) = patch.x {
        panel.x = x;
    }
    if let Some(y) = patch.y {
        panel.y = y;
    }
    if let Some(width) = patch.width {
        panel.width = width;
    }
    if let Some(height) = patch.height {
        panel.height = height;
    }
    if let Some(z) = patch.z_index {
        panel.z_index = z;
    }
    if let Some(shape) = patch.shape {
        panel.shape = shape;
    }
    if let Some(fill) = patch.fill_color {
        panel.fill_color = Some(fill);
    }
    if let Some(border) = patch.border_color {
        panel.border_color = Some(border);
    }
    if panel.shape.is_aspect_locked() {
        let side = if height_only { panel.height } else { panel.width };
        panel.width = side;
        panel.height = side;
    }
}
