pub mod clipboard;
pub mod commands;
pub mod editor;
pub mod input;
pub mod shortcuts;
pub mod state;
pub mod tools;

pub use commands::History;
pub use editor::{Editor, EditorConfig};
pub use input::{InputEvent, Modifiers};
pub use state::{CanvasState, PanelPatch, StateMutation};
