//! The editor facade.
//!
//! `Editor` owns the state store, its history, the clipboard, and the
//! pointer tool. Hosts call its methods directly or feed it raw
//! `InputEvent`s; either way every history-significant change goes
//! through `History::execute`.

use crate::clipboard::Clipboard;
use crate::commands::{DEFAULT_HISTORY_DEPTH, History};
use crate::input::{InputEvent, is_free_drag_key};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::{CanvasState, PanelPatch, StateMutation};
use crate::tools::{Hit, SelectTool, ToolAction};
use pc_core::document::{
    LayoutDocument, LoadError, LoadReport, LoadedLayout, parse_layout, rejected_panels,
};
use pc_core::geometry::fit_rect;
use pc_core::guides::{GUIDE_THRESHOLD, Guide};
use pc_core::hit::{HANDLE_RADIUS, hit_test, hit_test_canvas_handle, hit_test_handle};
use pc_core::id::PanelId;
use pc_core::model::*;

/// Tunables for an editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    /// Distance under which alignment guides appear.
    pub guide_threshold: f64,
    /// Offset applied to pasted panels on both axes.
    pub paste_offset: f64,
    /// Side length of a newly added panel.
    pub new_panel_size: f64,
    /// Grab radius for resize handles.
    pub handle_radius: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            guide_threshold: GUIDE_THRESHOLD,
            paste_offset: 20.0,
            new_panel_size: 400.0,
            handle_radius: HANDLE_RADIUS,
        }
    }
}

pub struct Editor {
    state: CanvasState,
    history: History,
    clipboard: Clipboard,
    tool: SelectTool,
    config: EditorConfig,
    /// Control or Meta is held down.
    free_drag_held: bool,
    /// Sticky move mode toggled by the host.
    move_mode: bool,
    last_report: LoadReport,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            state: CanvasState::new(),
            history: History::new(config.history_depth),
            clipboard: Clipboard::new(),
            tool: SelectTool::new(config.guide_threshold),
            config,
            free_drag_held: false,
            move_mode: false,
            last_report: LoadReport::default(),
        }
    }

    // ─── Read access ─────────────────────────────────────────────────────

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn panels(&self) -> &[Panel] {
        &self.state.panels
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.state.panel(id)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.state.canvas
    }

    /// Panels dropped by the most recent import or canvas resize.
    pub fn last_report(&self) -> &LoadReport {
        &self.last_report
    }

    pub fn selected_panel(&self) -> Option<PanelId> {
        self.state.selected_panel
    }

    /// Panels sorted for drawing, lowest `z_index` first.
    pub fn panels_in_paint_order(&self) -> Vec<&Panel> {
        paint_order(&self.state.panels)
    }

    /// Guides for the panel currently being dragged.
    pub fn guides(&self) -> &[Guide] {
        self.tool.guides()
    }

    /// Canvas size while a canvas-resize gesture is in progress.
    pub fn canvas_preview(&self) -> Option<Size> {
        self.tool.canvas_preview()
    }

    /// Candidate rectangle of the panel being dragged.
    pub fn drag_preview(&self) -> Option<(PanelId, Rect)> {
        self.tool.drag_preview()
    }

    /// Whether pointer-down on a panel starts a drag.
    pub fn free_drag(&self) -> bool {
        self.free_drag_held || self.move_mode
    }

    pub fn set_move_mode(&mut self, enabled: bool) {
        self.move_mode = enabled;
    }

    // ─── Panel transitions ───────────────────────────────────────────────

    fn execute(&mut self, mutation: StateMutation) -> bool {
        let loading = matches!(mutation, StateMutation::LoadLayout(_));
        let report = match &mutation {
            StateMutation::SetCanvasDimensions { .. } => Some(rejected_panels(&self.state.panels)),
            StateMutation::LoadLayout(layout) => Some(layout.report.clone()),
            _ => None,
        };
        let changed = self.history.execute(&mut self.state, mutation);
        if let Some(report) = report.filter(|_| changed || loading) {
            if !report.is_clean() {
                log::warn!("{} panel(s) dropped", report.rejected.len());
            }
            self.last_report = report;
        }
        changed
    }

    /// Add a panel of `shape` near the canvas center, above every other
    /// panel. Returns the new id.
    pub fn add_panel(&mut self, shape: PanelShape) -> PanelId {
        let (cx, cy) = self.state.canvas.size().center();
        let side = self.config.new_panel_size;
        let rect = fit_rect(
            Rect::new(cx - 50.0, cy - 50.0, side, side),
            self.state.canvas.size(),
            shape,
        );
        let mut panel = Panel::new(PanelId::fresh(), shape, rect);
        panel.title = format!("Panel {}", self.state.panels.len() + 1);
        panel.z_index = next_z_index(&self.state.panels);
        let id = panel.id;
        self.execute(StateMutation::AddPanel(Box::new(panel)));
        id
    }

    /// Insert a fully specified panel as-is.
    pub fn insert_panel(&mut self, panel: Panel) -> bool {
        self.execute(StateMutation::AddPanel(Box::new(panel)))
    }

    pub fn set_panels(&mut self, panels: Vec<Panel>) -> bool {
        self.execute(StateMutation::SetPanels(panels))
    }

    pub fn remove_panel(&mut self, id: PanelId) -> bool {
        self.execute(StateMutation::RemovePanel { id })
    }

    pub fn remove_selected(&mut self) -> bool {
        match self.state.selected_panel {
            Some(id) => self.remove_panel(id),
            None => false,
        }
    }

    pub fn update_panel(&mut self, id: PanelId, patch: PanelPatch) -> bool {
        self.execute(StateMutation::UpdatePanel {
            id,
            patch: Box::new(patch),
        })
    }

    pub fn update_panel_position(&mut self, id: PanelId, x: f64, y: f64) -> bool {
        self.execute(StateMutation::UpdatePanelPosition { id, x, y })
    }

    pub fn update_panel_dimensions(&mut self, id: PanelId, width: f64, height: f64) -> bool {
        self.execute(StateMutation::UpdatePanelDimensions { id, width, height })
    }

    pub fn bring_forward(&mut self, id: PanelId) -> bool {
        self.execute(StateMutation::BringForward { id })
    }

    pub fn send_backward(&mut self, id: PanelId) -> bool {
        self.execute(StateMutation::SendBackward { id })
    }

    pub fn clear_panels(&mut self) -> bool {
        self.execute(StateMutation::ClearPanels)
    }

    pub fn set_selected_panel(&mut self, id: Option<PanelId>) {
        self.state.set_selected_panel(id);
    }

    pub fn set_editing_states(
        &mut self,
        editing_panel: Option<Option<PanelId>>,
        is_editing_canvas: Option<bool>,
    ) {
        self.state.set_editing_states(editing_panel, is_editing_canvas);
    }

    // ─── Canvas transitions ──────────────────────────────────────────────

    /// Resize the canvas. Sizes outside `[200, 1200]` are refused.
    pub fn set_canvas_dimensions(&mut self, width: f64, height: f64) -> bool {
        if !canvas_dimension_in_range(width) || !canvas_dimension_in_range(height) {
            log::warn!(
                "canvas size must be between {MIN_CANVAS_SIZE} and {MAX_CANVAS_SIZE}, got {width}x{height}"
            );
            return false;
        }
        self.execute(StateMutation::SetCanvasDimensions { width, height })
    }

    /// Resize the canvas from text fields. Leading integer digits are
    /// parsed; anything unparsable is refused.
    pub fn submit_canvas_dimensions(&mut self, width: &str, height: &str) -> bool {
        match (parse_leading_int(width), parse_leading_int(height)) {
            (Some(w), Some(h)) => self.set_canvas_dimensions(w as f64, h as f64),
            _ => {
                log::warn!("invalid canvas size input: {width:?} x {height:?}");
                false
            }
        }
    }

    pub fn set_canvas_colors(&mut self, background: Option<&str>, foreground: Option<&str>) -> bool {
        self.execute(StateMutation::SetCanvasColors {
            background: background.map(str::to_string),
            foreground: foreground.map(str::to_string),
        })
    }

    pub fn set_canvas_options(&mut self, rounded_corners: Option<bool>, show_grid: Option<bool>) -> bool {
        self.execute(StateMutation::SetCanvasOptions {
            rounded_corners,
            show_grid,
        })
    }

    // ─── Import / export ─────────────────────────────────────────────────

    /// Replace canvas and panels with an already validated layout.
    pub fn load_layout(&mut self, layout: LoadedLayout) -> LoadReport {
        let report = layout.report.clone();
        self.execute(StateMutation::LoadLayout(Box::new(layout)));
        report
    }

    /// Parse a JSON layout document and load it as one undoable step.
    pub fn import_json(&mut self, text: &str) -> Result<LoadReport, LoadError> {
        let layout = parse_layout(text)?;
        Ok(self.load_layout(layout))
    }

    pub fn export_document(&self) -> LayoutDocument {
        LayoutDocument::new(&self.state.panels, &self.state.canvas)
    }

    pub fn export_json(&self) -> serde_json::Result<String> {
        self.export_document().to_json()
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    /// Copy the selected panel. Returns false when nothing is selected.
    pub fn copy(&mut self) -> bool {
        self.clipboard.copy(self.state.selected())
    }

    /// Paste the clipboard panel as a new panel. Returns its id.
    pub fn paste(&mut self) -> Option<PanelId> {
        let panel = self.clipboard.paste_candidate(
            &self.state.panels,
            self.config.paste_offset,
            self.state.canvas.size(),
        )?;
        let id = panel.id;
        self.execute(StateMutation::AddPanel(Box::new(panel)))
            .then_some(id)
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        self.history.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> Option<String> {
        self.history.redo(&mut self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Classify a point: selected-panel handles beat panel bodies, which
    /// beat canvas handles.
    pub fn hit(&self, x: f64, y: f64) -> Hit {
        let radius = self.config.handle_radius;
        let handle = self
            .state
            .selected()
            .and_then(|p| hit_test_handle(std::slice::from_ref(p), x, y, radius));
        if let Some((id, corner)) = handle {
            return Hit::PanelHandle(id, corner);
        }
        if let Some(id) = hit_test(&self.state.panels, x, y) {
            return Hit::Panel(id);
        }
        match hit_test_canvas_handle(self.state.canvas.size(), x, y, radius) {
            Some(corner) => Hit::CanvasHandle(corner),
            None => Hit::Background,
        }
    }

    /// Feed a raw input event. Returns whether the state store changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                match ShortcutMap::resolve(key, modifiers.ctrl, modifiers.shift, modifiers.alt, modifiers.meta) {
                    Some(action) => self.run_shortcut(action),
                    None => false,
                }
            }
            InputEvent::KeyUp { key } => {
                if is_free_drag_key(key) {
                    self.free_drag_held = false;
                }
                false
            }
            InputEvent::PointerDown { x, y, .. } => {
                let hit = self.hit(*x, *y);
                let free_drag = self.free_drag();
                let actions = self.tool.handle(event, hit, &self.state, free_drag);
                self.apply_actions(actions)
            }
            InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => {
                let free_drag = self.free_drag();
                let actions = self.tool.handle(event, Hit::Background, &self.state, free_drag);
                self.apply_actions(actions)
            }
        }
    }

    /// Abandon the active gesture, keeping whatever it already applied.
    pub fn cancel_gesture(&mut self) -> bool {
        let actions = self.tool.finish();
        self.apply_actions(actions)
    }

    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        log::debug!("shortcut: {action:?}");
        match action {
            ShortcutAction::Undo => self.undo().is_some(),
            ShortcutAction::Redo => self.redo().is_some(),
            ShortcutAction::Copy => {
                self.copy();
                false
            }
            ShortcutAction::Paste => self.paste().is_some(),
            ShortcutAction::Delete => self.remove_selected(),
            ShortcutAction::ClearAll => self.clear_panels(),
            ShortcutAction::BringForward => match self.state.selected_panel {
                Some(id) => self.bring_forward(id),
                None => false,
            },
            ShortcutAction::SendBackward => match self.state.selected_panel {
                Some(id) => self.send_backward(id),
                None => false,
            },
            ShortcutAction::FreeDragStart => {
                self.free_drag_held = true;
                false
            }
            ShortcutAction::Deselect => {
                self.state.set_selected_panel(None);
                false
            }
        }
    }

    fn apply_actions(&mut self, actions: Vec<ToolAction>) -> bool {
        let mut changed = false;
        for action in actions {
            match action {
                ToolAction::Select(id) => self.state.set_selected_panel(id),
                ToolAction::BeginBatch(description) => {
                    self.history.begin_batch(&self.state, description);
                }
                ToolAction::Mutate(mutation) => changed |= self.execute(mutation),
                ToolAction::EndBatch => {
                    self.history.end_batch(&self.state);
                }
            }
        }
        changed
    }
}

/// Parse the leading run of ASCII digits (with optional sign) as an integer.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_start + digits_len].parse().ok()
}
