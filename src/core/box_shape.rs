//! Quader aus Breite, Länge und Höhe (Grundfläche + Extrusion).

use super::error::{DrawError, Result};
use super::vector::Point3;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Maße und Metadaten eines Quaders (Meter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    /// Name der erzeugten Gruppe
    pub name: String,
    /// Layer/Tag, dem die Gruppe zugeordnet wird
    pub layer: String,
    /// Ursprung der Grundfläche
    #[serde(default)]
    pub origin: Point3,
}

impl BoxSpec {
    /// Prüft alle Maße (> 0) und den Namen.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("Breite", self.width),
            ("Länge", self.length),
            ("Höhe", self.height),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(DrawError::InvalidArgument(format!(
                    "{label} muss größer als 0 sein, erhalten: {value}"
                )));
            }
        }
        if self.name.trim().is_empty() {
            return Err(DrawError::InvalidArgument("Box-Name darf nicht leer sein".into()));
        }
        Ok(())
    }
}

/// Grundfläche des Quaders (gegen den Uhrzeigersinn, Normale +Z).
pub fn box_footprint(spec: &BoxSpec) -> [Point3; 4] {
    let o = spec.origin;
    [
        o,
        o + DVec3::new(spec.width, 0.0, 0.0),
        o + DVec3::new(spec.width, spec.length, 0.0),
        o + DVec3::new(0.0, spec.length, 0.0),
    ]
}
