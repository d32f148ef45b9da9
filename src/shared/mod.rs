//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Konfiguration, die zwischen `core` und `app` geteilt wird.

pub mod options;

pub use options::ToolOptions;
pub use options::{AUTO_SNAP_DISTANCE_THRESHOLD, SNAP_ANGLE_THRESHOLD};
