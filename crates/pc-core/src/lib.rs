pub mod document;
pub mod geometry;
pub mod guides;
pub mod hit;
pub mod id;
pub mod model;

pub use document::{LayoutDocument, LoadError, LoadReport, LoadedLayout, RejectReason, parse_layout};
pub use geometry::{Corner, resize_canvas, resize_panel};
pub use guides::{Guide, Orientation, alignment_guides};
pub use id::PanelId;
pub use model::*;
