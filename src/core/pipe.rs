//! Rohr-Segmente: Extrusionspfad plus kreisförmiges Profil.
//!
//! Gebogene Segmente werden als 3-Punkt-Pfad übergeben; den Bogen fittet der Host.

use super::camera::Camera;
use super::curve::perpendicular_vector;
use super::error::{DrawError, Result};
use super::vector::{is_parallel, midpoint, try_normalize, Point3, Vector3, X_AXIS, Z_AXIS};
use crate::shared::options::{PIPE_RADIUS, PIPE_SIDES};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Kreisförmiger Rohr-Querschnitt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeProfile {
    /// Kreismittelpunkt (Startpunkt des Pfads)
    pub center: Point3,
    /// Normale der Kreisebene (normalisiert)
    pub normal: Vector3,
    pub radius: f64,
    /// Anzahl Polygonseiten (≥ 3)
    pub sides: usize,
}

impl PipeProfile {
    pub fn new(center: Point3, normal: Vector3, radius: f64, sides: usize) -> Result<Self> {
        if !(radius > 0.0) {
            return Err(DrawError::InvalidArgument(format!(
                "Rohrradius muss positiv sein, erhalten: {radius}"
            )));
        }
        if sides < 3 {
            return Err(DrawError::InvalidArgument(format!(
                "Rohrprofil braucht mindestens 3 Seiten, erhalten: {sides}"
            )));
        }
        let normal = try_normalize(normal).ok_or_else(|| {
            DrawError::InvalidArgument("Profilnormale hat keine Länge".into())
        })?;
        Ok(Self {
            center,
            normal,
            radius,
            sides,
        })
    }

    /// Geschlossener Punktring des Profils (`sides + 1` Punkte, letzter = erster).
    pub fn ring(&self) -> Vec<Point3> {
        ring_points(self.center, self.normal, self.radius, self.sides)
    }
}

/// Orthonormale Basis (u, v) der Kreisebene zur Normalen `normal`.
///
/// `u = Z × n`, bzw. `X × n` wenn `n ∥ Z`.
pub fn plane_basis(normal: Vector3) -> (Vector3, Vector3) {
    let n = try_normalize(normal).unwrap_or(Z_AXIS);
    let helper = if is_parallel(n, Z_AXIS) { X_AXIS } else { Z_AXIS };
    let u = try_normalize(helper.cross(n)).unwrap_or_else(|| n.any_orthonormal_vector());
    let v = n.cross(u);
    (u, v)
}

fn ring_points(center: Point3, normal: Vector3, radius: f64, sides: usize) -> Vec<Point3> {
    let (u, v) = plane_basis(normal);
    let mut ring: Vec<Point3> = (0..sides)
        .map(|i| {
            let angle = TAU * i as f64 / sides as f64;
            center + (u * angle.cos() + v * angle.sin()) * radius
        })
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Ein Rohrabschnitt: Mittellinie und Profil am Pfadanfang.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSegment {
    pub path: Vec<Point3>,
    pub profile: PipeProfile,
}

impl PipeSegment {
    pub fn start(&self) -> Option<Point3> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<Point3> {
        self.path.last().copied()
    }

    pub fn is_curved(&self) -> bool {
        self.path.len() > 2
    }
}

/// Drahtgitter-Vorschau eines Rohrsegments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipeWireframe {
    pub start_ring: Vec<Point3>,
    pub end_ring: Vec<Point3>,
    /// Verbindungskanten zwischen den Ringen
    pub edges: Vec<[Point3; 2]>,
}

/// Erzeugt Rohrsegmente mit festem Radius und fester Seitenzahl.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipePathBuilder {
    radius: f64,
    sides: usize,
}

impl Default for PipePathBuilder {
    fn default() -> Self {
        Self {
            radius: PIPE_RADIUS,
            sides: PIPE_SIDES,
        }
    }
}

impl PipePathBuilder {
    pub fn new(radius: f64, sides: usize) -> Result<Self> {
        // Validierung über das Profil
        PipeProfile::new(Point3::ZERO, Z_AXIS, radius, sides)?;
        Ok(Self { radius, sides })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Baut ein Segment `start → end`; `bulge != 0` erzeugt einen gebogenen 3-Punkt-Pfad.
    ///
    /// Null-Länge liefert `None` (unabhängig vom Bulge).
    pub fn build_segment(
        &self,
        start: Point3,
        end: Point3,
        bulge: f64,
        camera: &Camera,
    ) -> Option<PipeSegment> {
        let chord = end - start;
        try_normalize(chord)?;

        let path = if bulge == 0.0 {
            vec![start, end]
        } else {
            let perp = perpendicular_vector(chord, camera).ok()?;
            vec![start, midpoint(start, end) + perp * bulge, end]
        };

        let normal = try_normalize(path[1] - path[0])?;
        let profile = PipeProfile {
            center: start,
            normal,
            radius: self.radius,
            sides: self.sides,
        };
        Some(PipeSegment { path, profile })
    }

    /// Zylinder-Drahtgitter `start → end` für die Live-Vorschau.
    pub fn preview_cylinder(&self, start: Point3, end: Point3) -> Option<PipeWireframe> {
        let normal = try_normalize(end - start)?;
        let start_ring = ring_points(start, normal, self.radius, self.sides);
        let end_ring = ring_points(end, normal, self.radius, self.sides);
        let edges = start_ring
            .iter()
            .zip(&end_ring)
            .take(self.sides)
            .map(|(&a, &b)| [a, b])
            .collect();
        Some(PipeWireframe {
            start_ring,
            end_ring,
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec3;

    #[test]
    fn test_straight_segment_scenario() {
        let builder = PipePathBuilder::default();
        let seg = builder
            .build_segment(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), 0.0, &Camera::default())
            .expect("Segment erwartet");
        assert_eq!(seg.path, vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)]);
        assert_relative_eq!(seg.profile.normal.x, 1.0, epsilon = 1e-12);
        assert!(!seg.is_curved());
    }

    #[test]
    fn test_zero_length_segment_is_skipped_for_any_bulge() {
        let builder = PipePathBuilder::default();
        let p = DVec3::new(3.0, 4.0, 5.0);
        for bulge in [0.0, 1.5, -7.0] {
            assert!(builder
                .build_segment(p, p, bulge, &Camera::default())
                .is_none());
        }
    }

    #[test]
    fn test_bulged_segment_has_three_points() {
        let cam = Camera::front();
        let builder = PipePathBuilder::default();
        let end = DVec3::new(10.0, 0.0, 0.0);
        let seg = builder
            .build_segment(DVec3::ZERO, end, 2.0, &cam)
            .expect("Segment erwartet");
        assert_eq!(seg.path.len(), 3);
        assert_relative_eq!(seg.path[1].distance(DVec3::new(5.0, 0.0, 0.0)), 2.0, epsilon = 1e-9);
        let first_dir = (seg.path[1] - seg.path[0]).normalize();
        assert_relative_eq!(seg.profile.normal.dot(first_dir), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_basis_vertical_normal_uses_x_fallback() {
        let (u, v) = plane_basis(DVec3::Z);
        assert_relative_eq!(u.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(u.dot(DVec3::Z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.dot(DVec3::Z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(u.dot(v), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ring_is_closed_and_on_radius() {
        let profile =
            PipeProfile::new(DVec3::ONE, DVec3::new(1.0, 1.0, 0.0), 0.5, 16).expect("Profil erwartet");
        let ring = profile.ring();
        assert_eq!(ring.len(), 17);
        assert_eq!(ring[0], ring[16]);
        for p in &ring {
            assert_relative_eq!(p.distance(DVec3::ONE), 0.5, epsilon = 1e-12);
            assert_relative_eq!((*p - DVec3::ONE).dot(profile.normal), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_profile_rejects_invalid_parameters() {
        assert!(PipeProfile::new(DVec3::ZERO, DVec3::X, 0.0, 16).is_err());
        assert!(PipeProfile::new(DVec3::ZERO, DVec3::X, 1.0, 2).is_err());
        assert!(PipeProfile::new(DVec3::ZERO, DVec3::ZERO, 1.0, 8).is_err());
        assert!(PipePathBuilder::new(-1.0, 16).is_err());
    }

    #[test]
    fn test_preview_cylinder_matches_side_count() {
        let builder = PipePathBuilder::new(0.1, 16).expect("Builder erwartet");
        let wire = builder
            .preview_cylinder(DVec3::ZERO, DVec3::new(0.0, 0.0, 3.0))
            .expect("Vorschau erwartet");
        assert_eq!(wire.start_ring.len(), 17);
        assert_eq!(wire.end_ring.len(), 17);
        assert_eq!(wire.edges.len(), 16);
        assert!(builder.preview_cylinder(DVec3::ONE, DVec3::ONE).is_none());
    }
}
