//! Pipe Draw Engine Library.
//! Host-unabhängiger Kern für interaktives Zeichnen von Linien, Kurven und Rohren,
//! als Library exportiert für Hosts, Tests und den Replay-Binary.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    create_box, load_script, run_script, DrawSession, ElementTag, Key, RecordingHost,
    ReplayReport, ReplayScript, SceneHost, SessionAction, SessionState, ToolEvent, ToolFeatures,
    ToolPreset, ToolPreview,
};
pub use core::{
    AxisLock, AxisSnapper, BoxSpec, Camera, CurveSpec, DrawError, PipePathBuilder, PipeSegment,
    Point3, SnapResult, Vector3,
};
pub use shared::ToolOptions;
