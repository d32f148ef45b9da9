//! Vorschau-Geometrie für das Immediate-Mode-Rendering des Hosts.
//!
//! Wird bei jedem Render-Tick neu aus dem Sitzungszustand gebaut und nie persistiert.

use crate::core::Point3;
use serde::Serialize;

/// Zeichen-Primitiv des Hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Zusammenhängender Linienzug
    LineStrip,
    /// Geschlossener Linienzug
    LineLoop,
    /// Einzelne Linien aus Punktpaaren
    Lines,
}

/// Ein Vorschau-Primitiv mit Farbe und Linienstärke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPrimitive {
    pub kind: PrimitiveKind,
    pub points: Vec<Point3>,
    pub color: [f32; 4],
    pub width: f32,
    /// Gestrichelt zeichnen
    pub stipple: bool,
}

/// Preview-Geometrie für das Rendering (Draw-Liste).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolPreview {
    pub primitives: Vec<PreviewPrimitive>,
    /// Länge für das Eingabefeld des Hosts (VCB)
    pub length: Option<f64>,
}

impl ToolPreview {
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn push(&mut self, kind: PrimitiveKind, points: Vec<Point3>, color: [f32; 4], width: f32) {
        if points.len() < 2 {
            return;
        }
        self.primitives.push(PreviewPrimitive {
            kind,
            points,
            color,
            width,
            stipple: false,
        });
    }

    pub fn push_stippled(&mut self, points: Vec<Point3>, color: [f32; 4], width: f32) {
        if points.len() < 2 {
            return;
        }
        self.primitives.push(PreviewPrimitive {
            kind: PrimitiveKind::Lines,
            points,
            color,
            width,
            stipple: true,
        });
    }

    /// Anzahl Primitive einer Art.
    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.primitives.iter().filter(|p| p.kind == kind).count()
    }
}
