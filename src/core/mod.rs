//! Core-Geometrie: Vektoren, Achsen-Inferenz, Bézier-Kurven, Rohr-Segmente, Längen-Eingabe.

pub mod axis;
pub mod box_shape;
pub mod camera;
pub mod curve;
pub mod error;
pub mod pipe;
pub mod snapper;
pub mod units;
/// Punkt-/Vektor-Typen und Helfer
///
/// Alle anderen Module rechnen mit `Point3`/`Vector3` (f64).
pub mod vector;

pub use axis::AxisLock;
pub use box_shape::{box_footprint, BoxSpec};
pub use camera::Camera;
pub use curve::{
    approx_length, bezier_point, chord_bulge, circular_arc, control_point_from_bulge,
    control_point_with_bulge,
    default_smoothing, perpendicular_vector, tessellate, ControlPoint, ControlRole, CurveSpec,
};
pub use error::{DrawError, Result};
pub use pipe::{plane_basis, PipePathBuilder, PipeProfile, PipeSegment, PipeWireframe};
pub use snapper::{AxisSnapper, SnapResult};
pub use units::{
    is_length_input_char, parse_typed_value, LengthParser, LengthUnit, MetricLengthParser,
    TypedValue,
};
pub use vector::{
    angle_between, distance_to_line, intersect_line_plane, is_parallel, linear_combination,
    midpoint, normalize_or_zero, offset, project_to_line, try_normalize, Point3, Vector3,
    DEGENERATE_LENGTH, EPSILON_LENGTH, X_AXIS, Y_AXIS, Z_AXIS,
};
