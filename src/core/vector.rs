//! Punkt- und Vektor-Helfer auf Basis von `glam::DVec3`.
//!
//! Alle Konsumenten müssen Null-Vektoren abfangen, bevor sie normalisieren:
//! `try_normalize` liefert dafür `None` statt NaN.

use glam::DVec3;

/// 3D-Punkt in Welteinheiten (Meter).
pub type Point3 = DVec3;
/// 3D-Richtung bzw. Verschiebung.
pub type Vector3 = DVec3;

/// Welt-X-Achse
pub const X_AXIS: Vector3 = DVec3::X;
/// Welt-Y-Achse
pub const Y_AXIS: Vector3 = DVec3::Y;
/// Welt-Z-Achse
pub const Z_AXIS: Vector3 = DVec3::Z;

/// Unterhalb dieser Länge gilt ein Hilfsvektor (Kreuzprodukt) als entartet.
pub const EPSILON_LENGTH: f64 = 1e-4;
/// Unterhalb dieser Länge gilt eine Sehne bzw. ein Segment als entartet (Maus-Zittern).
pub const DEGENERATE_LENGTH: f64 = 1e-3;
/// Toleranz für Parallelitäts-Tests (Sinus des Zwischenwinkels).
const PARALLEL_TOLERANCE: f64 = 1e-9;

/// Normalisiert `v`, gibt `None` bei Länge ≈ 0 oder nicht-endlichen Werten zurück.
pub fn try_normalize(v: Vector3) -> Option<Vector3> {
    v.try_normalize()
}

/// Normalisiert `v` oder liefert den Null-Vektor (Sentinel) zurück.
pub fn normalize_or_zero(v: Vector3) -> Vector3 {
    v.try_normalize().unwrap_or(DVec3::ZERO)
}

/// Winkel zwischen zwei Vektoren in Radiant (0..=π).
///
/// Gibt `None` zurück, wenn einer der Vektoren keine Länge hat.
pub fn angle_between(a: Vector3, b: Vector3) -> Option<f64> {
    let a = try_normalize(a)?;
    let b = try_normalize(b)?;
    Some(a.dot(b).clamp(-1.0, 1.0).acos())
}

/// Prüft ob zwei Vektoren parallel (gleich- oder gegensinnig) sind.
///
/// Null-Vektoren gelten als nicht parallel.
pub fn is_parallel(a: Vector3, b: Vector3) -> bool {
    match (try_normalize(a), try_normalize(b)) {
        (Some(a), Some(b)) => a.cross(b).length() < PARALLEL_TOLERANCE,
        _ => false,
    }
}

/// Verschiebt `point` um `distance` entlang `direction` (Richtung wird normalisiert).
///
/// Bei Null-Richtung bleibt der Punkt unverändert.
pub fn offset(point: Point3, direction: Vector3, distance: f64) -> Point3 {
    point + normalize_or_zero(direction) * distance
}

/// Gewichtete Kombination zweier Punkte: `w1·p1 + w2·p2`.
pub fn linear_combination(w1: f64, p1: Point3, w2: f64, p2: Point3) -> Point3 {
    p1 * w1 + p2 * w2
}

/// Mittelpunkt der Strecke `a`–`b`.
pub fn midpoint(a: Point3, b: Point3) -> Point3 {
    linear_combination(0.5, a, 0.5, b)
}

/// Projiziert `point` auf die unendliche Gerade durch `origin` entlang `direction`.
///
/// Bei Null-Richtung wird `origin` zurückgegeben.
pub fn project_to_line(point: Point3, origin: Point3, direction: Vector3) -> Point3 {
    match try_normalize(direction) {
        Some(dir) => origin + dir * (point - origin).dot(dir),
        None => origin,
    }
}

/// Lotabstand von `point` zur unendlichen Geraden durch `origin` entlang `direction`.
pub fn distance_to_line(point: Point3, origin: Point3, direction: Vector3) -> f64 {
    point.distance(project_to_line(point, origin, direction))
}

/// Schnittpunkt der Geraden `origin + t·direction` mit der Ebene durch
/// `plane_point` mit Normale `plane_normal`.
///
/// `None` bei Gerade parallel zur Ebene oder Null-Vektoren.
pub fn intersect_line_plane(
    origin: Point3,
    direction: Vector3,
    plane_point: Point3,
    plane_normal: Vector3,
) -> Option<Point3> {
    let dir = try_normalize(direction)?;
    let normal = try_normalize(plane_normal)?;
    let denom = dir.dot(normal);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (plane_point - origin).dot(normal) / denom;
    Some(origin + dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_try_normalize_zero_is_none() {
        assert!(try_normalize(DVec3::ZERO).is_none());
        assert_eq!(normalize_or_zero(DVec3::ZERO), DVec3::ZERO);
    }

    #[test]
    fn test_angle_between_axes() {
        let angle = angle_between(X_AXIS, Y_AXIS).expect("Winkel erwartet");
        assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert!(angle_between(X_AXIS, DVec3::ZERO).is_none());
    }

    #[test]
    fn test_parallel_detects_opposite_direction() {
        assert!(is_parallel(Z_AXIS, -Z_AXIS * 3.0));
        assert!(!is_parallel(Z_AXIS, X_AXIS));
        assert!(!is_parallel(Z_AXIS, DVec3::ZERO));
    }

    #[test]
    fn test_offset_normalizes_direction() {
        let p = offset(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0), 2.0);
        assert_relative_eq!(p.x, 2.0);
        assert_eq!(offset(DVec3::ONE, DVec3::ZERO, 5.0), DVec3::ONE);
    }

    #[test]
    fn test_distance_to_line() {
        let d = distance_to_line(DVec3::new(0.05, 0.0, 10.0), DVec3::ZERO, Z_AXIS);
        assert_relative_eq!(d, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_line_plane_intersection() {
        let hit = intersect_line_plane(
            DVec3::new(1.0, 2.0, 10.0),
            DVec3::new(0.0, 0.0, -3.0),
            DVec3::new(0.0, 0.0, 4.0),
            Z_AXIS,
        )
        .expect("Schnittpunkt erwartet");
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.y, 2.0);
        assert_relative_eq!(hit.z, 4.0);

        assert!(intersect_line_plane(DVec3::ZERO, X_AXIS, DVec3::Z, Z_AXIS).is_none());
        assert!(intersect_line_plane(DVec3::ZERO, DVec3::ZERO, DVec3::Z, Z_AXIS).is_none());
    }
}
