//! Integration tests: layout document import → export → import.

use pc_core::document::{LayoutDocument, RejectReason, parse_layout};
use pc_core::id::PanelId;
use pc_core::model::*;
use pretty_assertions::assert_eq;

#[test]
fn fixture_loads_without_rejections() {
    let loaded = parse_layout(include_str!("fixtures/layout.json")).unwrap();
    assert!(loaded.report.is_clean());
    assert_eq!(loaded.panels.len(), 3);
    assert_eq!(loaded.canvas.background_color, "#f8fafc");
    assert!(!loaded.canvas.rounded_corners);
    assert!(loaded.canvas.show_grid);

    let logo = loaded
        .panels
        .iter()
        .find(|p| p.id == PanelId::intern("logo"))
        .unwrap();
    assert_eq!(logo.shape, PanelShape::Circle);
    assert_eq!(logo.fill_color.as_deref(), Some("#fde68a"));
}

#[test]
fn export_then_import_is_identity_for_valid_layouts() {
    let first = parse_layout(include_str!("fixtures/layout.json")).unwrap();
    let exported = LayoutDocument::new(&first.panels, &first.canvas)
        .to_json()
        .unwrap();
    let second = parse_layout(&exported).unwrap();

    assert_eq!(second.panels, first.panels);
    assert_eq!(second.canvas, first.canvas);
}

#[test]
fn exported_json_matches_source_document() {
    let source: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/layout.json")).unwrap();
    let loaded = parse_layout(include_str!("fixtures/layout.json")).unwrap();
    let exported = serde_json::to_value(LayoutDocument::new(&loaded.panels, &loaded.canvas)).unwrap();

    // Integers come back as floats; compare through f64.
    for (a, b) in source["panels"]
        .as_array()
        .unwrap()
        .iter()
        .zip(exported["panels"].as_array().unwrap())
    {
        for key in ["x", "y", "width", "height"] {
            assert_eq!(a[key].as_f64(), b[key].as_f64(), "{key}");
        }
        assert_eq!(a["id"], b["id"]);
        assert_eq!(a["shape"], b["shape"]);
        assert_eq!(a["zIndex"].as_i64(), b["zIndex"].as_i64());
    }
    assert_eq!(source["canvasFgColor"], exported["canvasFgColor"]);
}

#[test]
fn messy_fixture_keeps_valid_panels_only() {
    let loaded = parse_layout(include_str!("fixtures/messy.json")).unwrap();

    assert_eq!(loaded.panels.len(), 1);
    let kept = &loaded.panels[0];
    assert_eq!(kept.id, PanelId::intern("keep"));
    // Clamped into the 1000×700 canvas.
    assert_eq!((kept.x, kept.y), (800.0, 600.0));

    let reasons: Vec<_> = loaded
        .report
        .rejected
        .iter()
        .map(|r| r.reason.clone())
        .collect();
    assert_eq!(
        reasons,
        vec![
            RejectReason::TooSmall,
            RejectReason::UnknownShape,
            RejectReason::MissingId,
        ]
    );
    for panel in &loaded.panels {
        assert!(panel.rect().fits_in(loaded.canvas.size()));
    }
}
