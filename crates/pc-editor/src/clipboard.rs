//! In-memory panel clipboard.
//!
//! Copy stores a snapshot of the selected panel, so later edits to the
//! original do not affect what gets pasted.

use pc_core::geometry::clamp_position;
use pc_core::id::PanelId;
use pc_core::model::{Panel, Size, next_z_index};

/// Suffix appended to a pasted panel's title.
pub const COPY_SUFFIX: &str = " (Copy)";

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    copied: Option<Panel>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot of `panel`. `None` leaves the clipboard as it is.
    pub fn copy(&mut self, panel: Option<&Panel>) -> bool {
        match panel {
            Some(panel) => {
                log::debug!("copied panel {}", panel.id);
                self.copied = Some(panel.clone());
                true
            }
            None => false,
        }
    }

    pub fn copied(&self) -> Option<&Panel> {
        self.copied.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.copied.is_none()
    }

    /// Build the panel a paste would insert: fresh id, suffixed title,
    /// shifted by `offset`, and stacked above every panel in `panels`.
    pub fn paste_candidate(&self, panels: &[Panel], offset: f64, canvas: Size) -> Option<Panel> {
        let source = self.copied.as_ref()?;
        let mut panel = source.clone();
        panel.id = PanelId::fresh();
        panel.title = format!("{}{COPY_SUFFIX}", source.title);
        let (x, y) = clamp_position(
            source.x + offset,
            source.y + offset,
            panel.width,
            panel.height,
            canvas,
        );
        panel.x = x;
        panel.y = y;
        panel.z_index = next_z_index(panels);
        Some(panel)
    }
}
