//! Achsen-Inferenz: rastet eine freie Zeichenrichtung auf eine Welt-Halbachse ein.
//!
//! Reine Funktion ohne Zustand: gleiche Eingaben liefern immer dasselbe Ergebnis.

use super::axis::AxisLock;
use super::camera::Camera;
use super::vector::{angle_between, distance_to_line, try_normalize, Point3, Vector3};
use crate::shared::options::{AUTO_SNAP_DISTANCE_THRESHOLD, SNAP_ANGLE_THRESHOLD};

/// Ergebnis einer Achsen-Inferenz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapResult {
    /// Richtung ist auf eine Halbachse eingerastet
    Locked(AxisLock),
    /// Freie, normalisierte Richtung
    Free(Vector3),
    /// Kein Richtungsvektor vorhanden (Länge 0)
    NoDirection,
}

impl SnapResult {
    /// Richtungsvektor des Ergebnisses, falls vorhanden.
    pub fn direction(&self) -> Option<Vector3> {
        match self {
            SnapResult::Locked(axis) => axis.unit_vector(),
            SnapResult::Free(v) => Some(*v),
            SnapResult::NoDirection => None,
        }
    }
}

/// Achsen-Snapper mit Winkel- und Abstandsschwelle.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSnapper {
    /// Kandidaten-Halbachsen in Prüfreihenfolge (bei Gleichstand gewinnt die erste)
    pub candidates: Vec<AxisLock>,
    /// Maximaler Winkel (rad) zur Achse für ein Einrasten
    pub angle_threshold: f64,
    /// Maximaler Lotabstand des Live-Punkts zur Achsgeraden
    pub distance_threshold: f64,
}

impl Default for AxisSnapper {
    fn default() -> Self {
        Self::new(SNAP_ANGLE_THRESHOLD, AUTO_SNAP_DISTANCE_THRESHOLD)
    }
}

impl AxisSnapper {
    /// Standard-Kandidaten: +X, +Y, +Z, −Z.
    pub const DEFAULT_CANDIDATES: [AxisLock; 4] = [
        AxisLock::PosX,
        AxisLock::PosY,
        AxisLock::PosZ,
        AxisLock::NegZ,
    ];

    pub fn new(angle_threshold: f64, distance_threshold: f64) -> Self {
        Self {
            candidates: Self::DEFAULT_CANDIDATES.to_vec(),
            angle_threshold,
            distance_threshold,
        }
    }

    /// Verwendet alle sechs Halbachsen als Kandidaten.
    pub fn with_all_axes(mut self) -> Self {
        self.candidates = AxisLock::ALL.to_vec();
        self
    }

    /// Bestimmt die Zeichenrichtung für `free_vector` ausgehend von `origin`.
    ///
    /// `live_point` ist der aktuelle Cursor-Punkt; sein Lotabstand zur
    /// Achsgeraden durch `origin` muss unter `distance_threshold` liegen.
    /// Die Kamera wird für die Inferenz derzeit nicht ausgewertet.
    pub fn infer(
        &self,
        origin: Point3,
        live_point: Point3,
        free_vector: Vector3,
        _camera: &Camera,
    ) -> SnapResult {
        let Some(free_dir) = try_normalize(free_vector) else {
            return SnapResult::NoDirection;
        };

        let mut best: Option<(AxisLock, f64)> = None;
        for &axis in &self.candidates {
            let Some(axis_vec) = axis.unit_vector() else {
                continue;
            };
            let Some(angle) = angle_between(free_dir, axis_vec) else {
                continue;
            };
            // Strikt kleiner: bei Gleichstand bleibt der erste Kandidat
            match best {
                Some((_, min)) if angle >= min => {}
                _ => best = Some((axis, angle)),
            }
        }

        match best {
            Some((axis, angle)) if angle < self.angle_threshold => {
                let axis_vec = axis.unit_vector().unwrap_or(free_dir);
                if distance_to_line(live_point, origin, axis_vec) < self.distance_threshold {
                    SnapResult::Locked(axis)
                } else {
                    SnapResult::Free(free_dir)
                }
            }
            _ => SnapResult::Free(free_dir),
        }
    }
}
