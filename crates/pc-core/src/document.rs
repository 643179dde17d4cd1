//! JSON layout document: export, lenient import, and panel validation.
//!
//! Import is all-or-nothing at the document level (bad JSON or a wrong
//! top-level shape fails the whole load) and lenient at the panel level:
//! panels that fail validation are dropped and listed in a `LoadReport`.

use crate::geometry::clamp_position;
use crate::id::PanelId;
use crate::model::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ─── Errors & diagnostics ────────────────────────────────────────────────

/// Failure to load a layout document. The editor state is left untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("layout document is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("layout document has an invalid structure: {0}")]
    Structure(#[source] serde_json::Error),
}

/// Why a panel was dropped during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("panel is not a JSON object")]
    NotAnObject,
    #[error("panel has no id")]
    MissingId,
    #[error("field `{0}` is missing or not a finite number")]
    NonFiniteField(&'static str),
    #[error("panel is smaller than the 50px minimum")]
    TooSmall,
    #[error("unknown shape")]
    UnknownShape,
}

/// A dropped panel: its position in the input list, its id if it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRejection {
    pub index: usize,
    pub id: Option<String>,
    pub reason: RejectReason,
}

/// Panels dropped while validating a document or a canvas resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub rejected: Vec<PanelRejection>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

// ─── Exported document ───────────────────────────────────────────────────

/// The exchanged configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub panels: Vec<Panel>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub canvas_bg_color: String,
    pub canvas_fg_color: String,
    pub rounded_corners: bool,
    pub show_grid: bool,
}

impl LayoutDocument {
    pub fn new(panels: &[Panel], canvas: &Canvas) -> Self {
        Self {
            panels: panels.to_vec(),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            canvas_bg_color: canvas.background_color.clone(),
            canvas_fg_color: canvas.foreground_color.clone(),
            rounded_corners: canvas.rounded_corners,
            show_grid: canvas.show_grid,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.canvas_width,
            height: self.canvas_height,
            background_color: self.canvas_bg_color.clone(),
            foreground_color: self.canvas_fg_color.clone(),
            rounded_corners: self.rounded_corners,
            show_grid: self.show_grid,
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ─── Import ──────────────────────────────────────────────────────────────

/// Lenient view of an incoming document: every field optional, panels
/// kept as raw JSON until validated one by one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayout {
    panels: Option<Vec<Value>>,
    canvas_width: Option<f64>,
    canvas_height: Option<f64>,
    canvas_bg_color: Option<String>,
    canvas_fg_color: Option<String>,
    rounded_corners: Option<bool>,
    show_grid: Option<bool>,
}

/// A validated document ready to replace the editor's canvas and panels.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLayout {
    pub panels: Vec<Panel>,
    pub canvas: Canvas,
    pub report: LoadReport,
}

/// Parse and validate a layout document from JSON text.
pub fn parse_layout(text: &str) -> Result<LoadedLayout, LoadError> {
    let value: Value = serde_json::from_str(text).map_err(LoadError::Syntax)?;
    load_layout(value)
}

/// Validate an already-parsed layout document.
///
/// Missing or falsy canvas fields fall back to the import defaults
/// (1280×720, white on black, rounded corners on, grid off).
pub fn load_layout(value: Value) -> Result<LoadedLayout, LoadError> {
    let raw: RawLayout = serde_json::from_value(value).map_err(LoadError::Structure)?;

    let non_zero = |v: Option<f64>, fallback: f64| v.filter(|n| *n != 0.0).unwrap_or(fallback);
    let non_empty = |v: Option<String>, fallback: &str| {
        v.filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };

    let canvas = Canvas {
        width: non_zero(raw.canvas_width, IMPORT_DEFAULT_CANVAS_WIDTH),
        height: non_zero(raw.canvas_height, IMPORT_DEFAULT_CANVAS_HEIGHT),
        background_color: non_empty(raw.canvas_bg_color, DEFAULT_BACKGROUND),
        foreground_color: non_empty(raw.canvas_fg_color, DEFAULT_FOREGROUND),
        rounded_corners: raw.rounded_corners.unwrap_or(true),
        show_grid: raw.show_grid.unwrap_or(false),
    };

    let mut panels = Vec::new();
    let mut report = LoadReport::default();
    for (index, value) in raw.panels.unwrap_or_default().iter().enumerate() {
        match panel_from_value(value) {
            Ok(mut panel) => {
                panel.lock_aspect();
                panels.push(clamp_into(panel, canvas.size()));
            }
            Err(reason) => {
                let id = value
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                log::warn!("dropping panel #{index} ({id:?}) on import: {reason}");
                report.rejected.push(PanelRejection { index, id, reason });
            }
        }
    }

    log::debug!(
        "loaded layout: {} panels kept, {} dropped, canvas {}x{}",
        panels.len(),
        report.rejected.len(),
        canvas.width,
        canvas.height
    );
    Ok(LoadedLayout {
        panels,
        canvas,
        report,
    })
}

fn finite_field(obj: &Map<String, Value>, name: &'static str) -> Result<f64, RejectReason> {
    obj.get(name)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or(RejectReason::NonFiniteField(name))
}

fn optional_string(obj: &Map<String, Value>, name: &str) -> Option<String> {
    obj.get(name).and_then(Value::as_str).map(str::to_string)
}

fn panel_from_value(value: &Value) -> Result<Panel, RejectReason> {
    let obj = value.as_object().ok_or(RejectReason::NotAnObject)?;
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(RejectReason::MissingId)?;

    let x = finite_field(obj, "x")?;
    let y = finite_field(obj, "y")?;
    let width = finite_field(obj, "width")?;
    let height = finite_field(obj, "height")?;
    let z_index = finite_field(obj, "zIndex")?;
    if width < MIN_PANEL_SIZE || height < MIN_PANEL_SIZE {
        return Err(RejectReason::TooSmall);
    }
    let shape = obj
        .get("shape")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<PanelShape>().ok())
        .ok_or(RejectReason::UnknownShape)?;

    Ok(Panel {
        id: PanelId::intern(id),
        title: optional_string(obj, "title").unwrap_or_else(|| UNTITLED.to_string()),
        x,
        y,
        width,
        height,
        // Stacking is integral; fractional indices truncate.
        z_index: z_index.clamp(-(Z_INDEX_LIMIT as f64), Z_INDEX_LIMIT as f64) as i64,
        shape,
        fill_color: optional_string(obj, "fillColor"),
        border_color: optional_string(obj, "borderColor"),
    })
}

// ─── Validation of in-memory panels ──────────────────────────────────────

fn check_panel(panel: &Panel) -> Result<(), RejectReason> {
    if panel.id.as_str().is_empty() {
        return Err(RejectReason::MissingId);
    }
    for (name, value) in [
        ("x", panel.x),
        ("y", panel.y),
        ("width", panel.width),
        ("height", panel.height),
    ] {
        if !value.is_finite() {
            return Err(RejectReason::NonFiniteField(name));
        }
    }
    if panel.width < MIN_PANEL_SIZE || panel.height < MIN_PANEL_SIZE {
        return Err(RejectReason::TooSmall);
    }
    Ok(())
}

/// Move a panel's position into `[0, bounds - size]` without resizing it.
fn clamp_into(mut panel: Panel, bounds: Size) -> Panel {
    let (x, y) = clamp_position(panel.x, panel.y, panel.width, panel.height, bounds);
    panel.x = x;
    panel.y = y;
    panel
}

/// List the panels a canvas resize would drop, without touching them.
pub fn rejected_panels(panels: &[Panel]) -> LoadReport {
    let rejected = panels
        .iter()
        .enumerate()
        .filter_map(|(index, panel)| {
            check_panel(panel).err().map(|reason| PanelRejection {
                index,
                id: Some(panel.id.as_str().to_string()),
                reason,
            })
        })
        .collect();
    LoadReport { rejected }
}

/// Re-validate panels against new canvas bounds.
///
/// Invalid panels are dropped and reported; kept panels are repositioned
/// but never shrunk, so a panel larger than the canvas stays at the origin
/// and still overhangs.
pub fn validate_panels(panels: &[Panel], bounds: Size) -> (Vec<Panel>, LoadReport) {
    let mut kept = Vec::with_capacity(panels.len());
    let mut report = LoadReport::default();
    for (index, panel) in panels.iter().enumerate() {
        match check_panel(panel) {
            Ok(()) => kept.push(clamp_into(panel.clone(), bounds)),
            Err(reason) => {
                log::warn!("dropping panel {} after canvas resize: {reason}", panel.id);
                report.rejected.push(PanelRejection {
                    index,
                    id: Some(panel.id.as_str().to_string()),
                    reason,
                });
            }
        }
    }
    (kept, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let loaded = parse_layout("{}").unwrap();
        assert!(loaded.panels.is_empty());
        assert_eq!(loaded.canvas.width, 1280.0);
        assert_eq!(loaded.canvas.height, 720.0);
        assert_eq!(loaded.canvas.background_color, "#ffffff");
        assert_eq!(loaded.canvas.foreground_color, "#000000");
        assert!(loaded.canvas.rounded_corners);
        assert!(!loaded.canvas.show_grid);
    }

    #[test]
    fn zero_and_empty_fields_use_defaults() {
        let loaded = load_layout(json!({
            "canvasWidth": 0,
            "canvasBgColor": "",
            "roundedCorners": false
        }))
        .unwrap();
        assert_eq!(loaded.canvas.width, 1280.0);
        assert_eq!(loaded.canvas.background_color, "#ffffff");
        assert!(!loaded.canvas.rounded_corners);
    }

    #[test]
    fn invalid_panels_are_dropped_and_reported() {
        let loaded = load_layout(json!({
            "canvasWidth": 800,
            "canvasHeight": 600,
            "panels": [
                { "id": "ok", "title": "A", "x": 10, "y": 10, "width": 100, "height": 100, "zIndex": 1, "shape": "star" },
                { "title": "no id", "x": 10, "y": 10, "width": 100, "height": 100, "zIndex": 1, "shape": "star" },
                { "id": "small", "x": 10, "y": 10, "width": 40, "height": 100, "zIndex": 1, "shape": "star" },
                { "id": "text-x", "x": "10", "y": 10, "width": 100, "height": 100, "zIndex": 1, "shape": "star" },
                { "id": "blob", "x": 10, "y": 10, "width": 100, "height": 100, "zIndex": 1, "shape": "blob" },
                { "id": "no-z", "x": 10, "y": 10, "width": 100, "height": 100, "shape": "star" },
                42
            ]
        }))
        .unwrap();

        assert_eq!(loaded.panels.len(), 1);
        assert_eq!(loaded.panels[0].id.as_str(), "ok");
        let reasons: Vec<_> = loaded
            .report
            .rejected
            .iter()
            .map(|r| (r.index, r.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (1, RejectReason::MissingId),
                (2, RejectReason::TooSmall),
                (3, RejectReason::NonFiniteField("x")),
                (4, RejectReason::UnknownShape),
                (5, RejectReason::NonFiniteField("zIndex")),
                (6, RejectReason::NotAnObject),
            ]
        );
    }

    #[test]
    fn kept_panels_are_clamped_into_canvas() {
        let loaded = load_layout(json!({
            "canvasWidth": 400,
            "canvasHeight": 300,
            "panels": [
                { "id": "p", "x": 390, "y": -20, "width": 100, "height": 100, "zIndex": 2, "shape": "circle" }
            ]
        }))
        .unwrap();
        let p = &loaded.panels[0];
        assert_eq!((p.x, p.y), (300.0, 0.0));
        assert_eq!(p.title, UNTITLED);
    }

    #[test]
    fn syntax_and_structure_errors_are_distinct() {
        assert!(matches!(parse_layout("{ not json"), Err(LoadError::Syntax(_))));
        assert!(matches!(parse_layout("[1, 2]"), Err(LoadError::Structure(_))));
        assert!(matches!(
            parse_layout(r#"{ "panels": "nope" }"#),
            Err(LoadError::Structure(_))
        ));
        assert!(matches!(
            parse_layout(r#"{ "canvasWidth": "wide" }"#),
            Err(LoadError::Structure(_))
        ));
    }

    #[test]
    fn validate_panels_repositions_without_shrinking() {
        let wide = Panel::new(
            PanelId::intern("wide"),
            PanelShape::Rectangle,
            Rect::new(100.0, 50.0, 500.0, 100.0),
        );
        let (kept, report) = validate_panels(&[wide], Size::new(300.0, 300.0));
        assert!(report.is_clean());
        assert_eq!(kept[0].rect(), Rect::new(0.0, 50.0, 500.0, 100.0));
    }

    #[test]
    fn huge_z_index_is_clamped() {
        let loaded = load_layout(json!({
            "panels": [
                { "id": "hi", "x": 0, "y": 0, "width": 60, "height": 60, "zIndex": 1e300, "shape": "star" },
                { "id": "lo", "x": 0, "y": 0, "width": 60, "height": 60, "zIndex": -1e300, "shape": "star" }
            ]
        }))
        .unwrap();
        assert_eq!(loaded.panels[0].z_index, Z_INDEX_LIMIT);
        assert_eq!(loaded.panels[1].z_index, -Z_INDEX_LIMIT);
    }

    #[test]
    fn rejected_panels_lists_without_moving() {
        let mut tiny = Panel::new(
            PanelId::intern("rp-tiny"),
            PanelShape::Rectangle,
            Rect::new(0.0, 0.0, 60.0, 60.0),
        );
        tiny.width = 20.0;
        let ok = Panel::new(
            PanelId::intern("rp-ok"),
            PanelShape::Rectangle,
            Rect::new(0.0, 0.0, 60.0, 60.0),
        );
        let report = rejected_panels(&[ok, tiny]);
        assert_eq!(
            report.rejected,
            vec![PanelRejection {
                index: 1,
                id: Some("rp-tiny".to_string()),
                reason: RejectReason::TooSmall,
            }]
        );
    }

    #[test]
    fn validate_panels_drops_undersized() {
        let mut tiny = Panel::new(
            PanelId::intern("tiny"),
            PanelShape::Rectangle,
            Rect::new(0.0, 0.0, 60.0, 60.0),
        );
        tiny.width = 20.0;
        let (kept, report) = validate_panels(&[tiny], Size::new(300.0, 300.0));
        assert!(kept.is_empty());
        assert_eq!(report.rejected[0].reason, RejectReason::TooSmall);
        assert_eq!(report.rejected[0].id.as_deref(), Some("tiny"));
    }

    #[test]
    fn export_uses_document_keys() {
        let mut panel = Panel::new(
            PanelId::intern("x1"),
            PanelShape::Hexagon,
            Rect::new(1.0, 2.0, 60.0, 70.0),
        );
        panel.fill_color = Some("#ff0000".into());
        let doc = LayoutDocument::new(&[panel], &Canvas::default());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["canvasWidth"], 1180.0);
        assert_eq!(value["canvasBgColor"], "#ffffff");
        assert_eq!(value["showGrid"], false);
        assert_eq!(value["panels"][0]["fillColor"], "#ff0000");
        assert!(value["panels"][0].get("borderColor").is_none());
    }
}
