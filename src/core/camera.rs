//! Kamera-Kontext des Viewports (nur die Vektoren, die der Kern braucht).

use super::vector::{try_normalize, Vector3};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Blick-Kontext der Host-Kamera.
///
/// Der Host liefert `up` und `direction` bei jedem Event; der Kern
/// verwendet sie nur, um Senkrechten "ungefähr in der Bildebene" zu finden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Up-Vektor der Kamera
    pub up: Vector3,
    /// Blickrichtung der Kamera
    pub direction: Vector3,
}

impl Camera {
    /// Erstellt einen Kamera-Kontext (Vektoren werden normalisiert, Null bleibt Null).
    pub fn new(up: Vector3, direction: Vector3) -> Self {
        Self {
            up: try_normalize(up).unwrap_or(DVec3::ZERO),
            direction: try_normalize(direction).unwrap_or(DVec3::ZERO),
        }
    }

    /// Draufsicht: Blick entlang −Z, Up = +Y.
    pub fn top() -> Self {
        Self::new(DVec3::Y, DVec3::NEG_Z)
    }

    /// Vorderansicht: Blick entlang +Y, Up = +Z.
    pub fn front() -> Self {
        Self::new(DVec3::Z, DVec3::Y)
    }

    /// Rechts-Vektor (`direction × up`), `None` wenn entartet.
    pub fn right(&self) -> Option<Vector3> {
        try_normalize(self.direction.cross(self.up))
    }
}

impl Default for Camera {
    /// Isometrische Standardansicht wie beim Öffnen eines neuen Modells.
    fn default() -> Self {
        let direction = DVec3::new(-1.0, 1.0, -1.0);
        let right = direction.cross(DVec3::Z);
        Self::new(right.cross(direction), direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_front_camera_right_is_x() {
        let right = Camera::front().right().expect("Rechts-Vektor erwartet");
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_camera_is_orthonormal() {
        let cam = Camera::default();
        assert_relative_eq!(cam.up.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cam.up.dot(cam.direction), 0.0, epsilon = 1e-12);
        assert!(cam.up.z > 0.0);
    }
}
