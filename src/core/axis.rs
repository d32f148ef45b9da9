//! Achsen-Sperre (Axis Lock) und zugehörige Farb-Rückmeldung.

use super::vector::Vector3;
use crate::shared::options::{AXIS_COLOR_X, AXIS_COLOR_Y, AXIS_COLOR_Z, FREE_DIRECTION_COLOR};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Gesperrte Halbachse für die Zeichenrichtung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisLock {
    /// Keine Sperre
    #[default]
    None,
    PosX,
    PosY,
    PosZ,
    NegX,
    NegY,
    NegZ,
}

impl AxisLock {
    /// Alle sechs Halbachsen in fester Reihenfolge.
    pub const ALL: [AxisLock; 6] = [
        AxisLock::PosX,
        AxisLock::PosY,
        AxisLock::PosZ,
        AxisLock::NegX,
        AxisLock::NegY,
        AxisLock::NegZ,
    ];

    /// Einheitsvektor der Achse (`None` für keine Sperre).
    pub fn unit_vector(self) -> Option<Vector3> {
        match self {
            AxisLock::None => None,
            AxisLock::PosX => Some(DVec3::X),
            AxisLock::PosY => Some(DVec3::Y),
            AxisLock::PosZ => Some(DVec3::Z),
            AxisLock::NegX => Some(DVec3::NEG_X),
            AxisLock::NegY => Some(DVec3::NEG_Y),
            AxisLock::NegZ => Some(DVec3::NEG_Z),
        }
    }

    /// Anzeigefarbe: X rot, Y grün, Z blau, frei schwarz.
    pub fn color(self) -> [f32; 4] {
        match self {
            AxisLock::None => FREE_DIRECTION_COLOR,
            AxisLock::PosX | AxisLock::NegX => AXIS_COLOR_X,
            AxisLock::PosY | AxisLock::NegY => AXIS_COLOR_Y,
            AxisLock::PosZ | AxisLock::NegZ => AXIS_COLOR_Z,
        }
    }

    /// Umschalten: erneutes Anwählen derselben Achse hebt die Sperre auf.
    pub fn toggled(self, requested: AxisLock) -> AxisLock {
        if self == requested {
            AxisLock::None
        } else {
            requested
        }
    }

    pub fn is_locked(self) -> bool {
        self != AxisLock::None
    }

    /// Kurzname für Statuszeilen und Logs.
    pub fn label(self) -> &'static str {
        match self {
            AxisLock::None => "frei",
            AxisLock::PosX => "+X",
            AxisLock::PosY => "+Y",
            AxisLock::PosZ => "+Z",
            AxisLock::NegX => "-X",
            AxisLock::NegY => "-Y",
            AxisLock::NegZ => "-Z",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_axis_clears_lock() {
        assert_eq!(AxisLock::PosX.toggled(AxisLock::PosX), AxisLock::None);
        assert_eq!(AxisLock::PosX.toggled(AxisLock::NegZ), AxisLock::NegZ);
        assert_eq!(AxisLock::None.toggled(AxisLock::PosY), AxisLock::PosY);
    }

    #[test]
    fn test_colors_follow_axis_family() {
        assert_eq!(AxisLock::NegZ.color(), AXIS_COLOR_Z);
        assert_eq!(AxisLock::PosX.color(), AXIS_COLOR_X);
        assert_eq!(AxisLock::None.color(), FREE_DIRECTION_COLOR);
    }

    #[test]
    fn test_unit_vectors_are_normalized() {
        for axis in AxisLock::ALL {
            let v = axis.unit_vector().expect("Achsvektor erwartet");
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
        assert!(AxisLock::None.unit_vector().is_none());
    }
}
