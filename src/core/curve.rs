//! Quadratische Bézier-Kurven: Auswertung, Tessellierung und Kontrollpunkt-Bestimmung.
//!
//! Der Kontrollpunkt wird entweder aus dem Bulge (Abstand des Cursors zur
//! Sehnenmitte) oder automatisch über einen kleinen Stich (Sagitta) bestimmt.

use super::camera::Camera;
use super::error::{DrawError, Result};
use super::vector::{
    is_parallel, midpoint, try_normalize, Point3, Vector3, DEGENERATE_LENGTH, EPSILON_LENGTH,
    X_AXIS, Y_AXIS, Z_AXIS,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Rolle eines Punkts innerhalb einer Kurve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlRole {
    /// Start- oder Endpunkt (liegt auf der Kurve)
    Anchor,
    /// Bézier-Steuerpunkt (zieht die Kurve an)
    BezierControl,
}

/// Punkt mit Rolle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Point3,
    pub role: ControlRole,
}

/// Beschreibung einer quadratischen Bézier-Kurve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    pub start: Point3,
    pub control: Point3,
    pub end: Point3,
    /// Anzahl Segmente der Tessellierung (≥ 1)
    pub segments: usize,
}

impl CurveSpec {
    /// Erstellt eine Kurve; `segments == 0` ist ungültig.
    pub fn new(start: Point3, control: Point3, end: Point3, segments: usize) -> Result<Self> {
        if segments == 0 {
            return Err(DrawError::InvalidArgument(
                "Segmentanzahl muss mindestens 1 sein".into(),
            ));
        }
        Ok(Self {
            start,
            control,
            end,
            segments,
        })
    }

    pub fn point_at(&self, t: f64) -> Point3 {
        bezier_point(self.start, self.control, self.end, t)
    }

    /// Punkte der Kurve (`segments + 1` Stück).
    pub fn tessellate(&self) -> Vec<Point3> {
        (0..=self.segments)
            .map(|i| self.point_at(i as f64 / self.segments as f64))
            .collect()
    }

    pub fn control_points(&self) -> [ControlPoint; 3] {
        [
            ControlPoint {
                position: self.start,
                role: ControlRole::Anchor,
            },
            ControlPoint {
                position: self.control,
                role: ControlRole::BezierControl,
            },
            ControlPoint {
                position: self.end,
                role: ControlRole::Anchor,
            },
        ]
    }

    /// Näherungslänge über `samples` Polygonabschnitte.
    pub fn approx_length(&self, samples: usize) -> f64 {
        approx_length(|t| self.point_at(t), samples)
    }
}

/// Quadratischer Bézier: B(t) = (1−t)²·P0 + 2(1−t)t·P1 + t²·P2
pub fn bezier_point(p0: Point3, p1: Point3, p2: Point3, t: f64) -> Point3 {
    let inv = 1.0 - t;
    p0 * (inv * inv) + p1 * (2.0 * inv * t) + p2 * (t * t)
}

/// Tesselliert die Kurve `p0 → p2` mit Steuerpunkt `control` in `segments` Abschnitte.
///
/// Liefert `segments + 1` Punkte; erster Punkt ist `p0`, letzter `p2`.
pub fn tessellate(p0: Point3, p2: Point3, control: Point3, segments: usize) -> Result<Vec<Point3>> {
    Ok(CurveSpec::new(p0, control, p2, segments)?.tessellate())
}

/// Kreisbogen von `p0` über `p1` nach `p2` mit `segments + 1` Punkten.
///
/// So fittet der Host gebogene Rohrpfade. `None` bei (fast) kollinearen Punkten.
pub fn circular_arc(p0: Point3, p1: Point3, p2: Point3, segments: usize) -> Option<Vec<Point3>> {
    let a = p1 - p0;
    let b = p2 - p0;
    let normal = a.cross(b);
    let normal_sq = normal.length_squared();
    if normal_sq < EPSILON_LENGTH * EPSILON_LENGTH {
        return None;
    }
    let center =
        p0 + (b * a.length_squared() - a * b.length_squared()).cross(normal) / (2.0 * normal_sq);
    let radius = p0.distance(center);
    let e1 = (p0 - center) / radius;
    let e2 = try_normalize(normal)?.cross(e1);

    // Umlauf p0 → p1 → p2 ist positiv um `normal`
    let rel = p2 - center;
    let mut sweep = rel.dot(e2).atan2(rel.dot(e1));
    if sweep <= 0.0 {
        sweep += TAU;
    }

    let segments = segments.max(1);
    let mut points: Vec<Point3> = (0..=segments)
        .map(|i| {
            let angle = sweep * i as f64 / segments as f64;
            center + (e1 * angle.cos() + e2 * angle.sin()) * radius
        })
        .collect();
    points[0] = p0;
    points[segments] = p2;
    Some(points)
}

/// Polylinien-Länge einer parametrischen Kurve (t ∈ [0, 1]).
pub fn approx_length(eval: impl Fn(f64) -> Point3, samples: usize) -> f64 {
    let samples = samples.max(1);
    let mut length = 0.0;
    let mut prev = eval(0.0);
    for i in 1..=samples {
        let p = eval(i as f64 / samples as f64);
        length += prev.distance(p);
        prev = p;
    }
    length
}

fn non_degenerate(v: Vector3) -> Option<Vector3> {
    if v.length() > EPSILON_LENGTH {
        try_normalize(v)
    } else {
        None
    }
}

/// Senkrechte zu `line_dir`, möglichst in der Bildebene der Kamera.
///
/// Fallback-Kette: Kamera-Ebenennormale → Kamera-Up → Welt-Z (bzw. Welt-X
/// bei Linie ∥ Z) → Welt-Y. Nur eine Null-Linie liefert einen Fehler.
pub fn perpendicular_vector(line_dir: Vector3, camera: &Camera) -> Result<Vector3> {
    let line = try_normalize(line_dir).ok_or_else(|| {
        DrawError::InvalidArgument("Linienrichtung hat keine Länge".into())
    })?;

    if let Some(plane_normal) = non_degenerate(camera.direction.cross(camera.up)) {
        if let Some(perp) = non_degenerate(line.cross(plane_normal)) {
            return Ok(perp);
        }
    }

    if let Some(perp) = non_degenerate(line.cross(camera.up)) {
        return Ok(perp);
    }

    let world = if is_parallel(line, Z_AXIS) {
        X_AXIS
    } else {
        Z_AXIS
    };
    if let Some(perp) = non_degenerate(line.cross(world)) {
        return Ok(perp);
    }

    // Welt-Y nur, wenn exakt senkrecht
    if line.dot(Y_AXIS) == 0.0 {
        Ok(Y_AXIS)
    } else {
        Ok(line.any_orthonormal_vector())
    }
}

/// Signierter Bulge eines vorhandenen Steuerpunkts relativ zur Sehne `p0 → p2`.
///
/// Entartete Sehne liefert 0.
pub fn chord_bulge(p0: Point3, p2: Point3, control: Point3, camera: &Camera) -> f64 {
    if p0.distance(p2) < DEGENERATE_LENGTH {
        return 0.0;
    }
    match perpendicular_vector(p2 - p0, camera) {
        Ok(perp) => (control - midpoint(p0, p2)).dot(perp),
        Err(_) => 0.0,
    }
}

/// Steuerpunkt = Sehnenmitte + Senkrechte · `bulge`.
///
/// Entartete Sehne liefert `p0`.
pub fn control_point_with_bulge(p0: Point3, p2: Point3, bulge: f64, camera: &Camera) -> Point3 {
    if p0.distance(p2) < DEGENERATE_LENGTH {
        return p0;
    }
    match perpendicular_vector(p2 - p0, camera) {
        Ok(perp) => midpoint(p0, p2) + perp * bulge,
        Err(_) => p0,
    }
}

/// Steuerpunkt aus der Cursor-Position (Bogen-Modus).
///
/// Der Abstand des Cursors von der Sehnenmitte, projiziert auf die Senkrechte,
/// wird mit `amplify` verstärkt.
pub fn control_point_from_bulge(
    p0: Point3,
    p2: Point3,
    cursor: Point3,
    camera: &Camera,
    amplify: f64,
) -> Point3 {
    let bulge = chord_bulge(p0, p2, cursor, camera) * amplify;
    control_point_with_bulge(p0, p2, bulge, camera)
}

/// Automatischer Steuerpunkt für eine leichte Rundung gerader Segmente.
///
/// Liegt bei `p0 + direction·length/2`, seitlich versetzt um `length·sagitta_factor`.
pub fn default_smoothing(
    p0: Point3,
    length: f64,
    direction: Vector3,
    camera: &Camera,
    sagitta_factor: f64,
) -> Result<Point3> {
    let dir = try_normalize(direction).ok_or_else(|| {
        DrawError::InvalidArgument("Richtung für Glättung hat keine Länge".into())
    })?;
    let perp = perpendicular_vector(dir, camera)?;
    Ok(p0 + dir * (length / 2.0) + perp * (length * sagitta_factor))
}
