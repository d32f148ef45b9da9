//! Application-Layer: Events, Host-Schnittstelle, Vorschau und Zeichen-Sitzung.

pub mod box_tool;
pub mod events;
pub mod host;
pub mod move_tool;
pub mod preview;
pub mod replay;
/// Zeichen-Sitzung (Zustandsautomat)
///
/// Eine Sitzung pro aktivem Werkzeug; der Zustand gehört ausschließlich ihr.
pub mod session;

pub use box_tool::create_box;
pub use events::{Key, ToolEvent};
pub use host::{ElementId, ElementTag, RecordingHost, SceneHost};
pub use move_tool::MoveDrag;
pub use preview::{PreviewPrimitive, PrimitiveKind, ToolPreview};
pub use replay::{load_script, parse_script, run_script, ReplayReport, ReplayScript};
pub use session::{
    Direction, DrawSession, SessionAction, SessionState, ToolFeatures, ToolPreset,
};
