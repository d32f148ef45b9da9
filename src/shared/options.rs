//! Zentrale Konfiguration der Zeichen-Werkzeuge.
//!
//! `ToolOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Achsen-Inferenz ─────────────────────────────────────────────────

/// Maximaler Winkel (rad) zwischen Zeichenrichtung und Achse für automatisches Einrasten.
pub const SNAP_ANGLE_THRESHOLD: f64 = 0.1;
/// Maximaler Abstand (Meter, = 50 Zoll) des Cursors zur Achsgeraden für automatisches Einrasten.
pub const AUTO_SNAP_DISTANCE_THRESHOLD: f64 = 1.27;

// ── Kurven ──────────────────────────────────────────────────────────

/// Segmentanzahl der Bézier-Tessellierung.
pub const BEZIER_SEGMENTS: usize = 100;
/// Stich-Faktor (Anteil der Segmentlänge) der automatischen Glättung.
pub const DEFAULT_CURVE_SAGITTA_FACTOR: f64 = 0.1;
/// Verstärkung des Cursor-Abstands im Bogen-Modus.
pub const SUPER_CURVE_AMPLIFY_FACTOR: f64 = 100.0;

// ── Rohre ───────────────────────────────────────────────────────────

/// Rohrradius in Metern (= 1 Zoll).
pub const PIPE_RADIUS: f64 = 0.0254;
/// Seitenzahl des Rohrprofils.
pub const PIPE_SIDES: usize = 16;

// ── Vorschau ────────────────────────────────────────────────────────

/// Linienstärke der Achs-Hilfslinie bei gesperrter Achse.
pub const LOCKED_AXIS_LINE_WIDTH: f32 = 4.0;
/// Linienstärke der Vorschau.
pub const PREVIEW_LINE_WIDTH: f32 = 2.0;
/// Halbe Länge der Achs-Hilfslinie in Metern (= 1000 Fuß).
pub const AXIS_GUIDE_LENGTH: f64 = 304.8;

/// Farbe für X-Achse (RGBA: Rot).
pub const AXIS_COLOR_X: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
/// Farbe für Y-Achse (RGBA: Grün).
pub const AXIS_COLOR_Y: [f32; 4] = [0.0, 0.8, 0.0, 1.0];
/// Farbe für Z-Achse (RGBA: Blau).
pub const AXIS_COLOR_Z: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
/// Farbe für freie Richtung (RGBA: Schwarz).
pub const FREE_DIRECTION_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Farbe im Bogen-Modus (RGBA: Blau).
pub const ARC_MODE_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
/// Farbe der Hilfslinien (Sehne, Bulge) (RGBA: Grau).
pub const GUIDE_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
/// Farbe der Rohr-Vorschau (RGBA: Blau).
pub const PIPE_PREVIEW_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

// ── Sitzung ─────────────────────────────────────────────────────────

/// Maximale Anzahl gemerkter Ankerpunkte für "letzten Punkt zurücknehmen".
pub const POINT_HISTORY_DEPTH: usize = 64;

/// Laufzeit-Optionen der Zeichen-Werkzeuge (persistierbar als TOML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOptions {
    // ── Achsen-Inferenz ─────────────────────────────────────────
    /// Winkel-Schwelle für automatisches Einrasten (rad)
    pub snap_angle_threshold: f64,
    /// Abstands-Schwelle für automatisches Einrasten (Meter)
    pub snap_distance_threshold: f64,
    /// Alle sechs Halbachsen statt +X, +Y, +Z, −Z als Kandidaten
    #[serde(default)]
    pub snap_all_axes: bool,

    // ── Kurven ──────────────────────────────────────────────────
    pub bezier_segments: usize,
    pub sagitta_factor: f64,
    pub amplify_factor: f64,

    // ── Rohre ───────────────────────────────────────────────────
    pub pipe_radius: f64,
    pub pipe_sides: usize,

    // ── Vorschau ────────────────────────────────────────────────
    pub locked_axis_line_width: f32,
    pub preview_line_width: f32,
    pub axis_guide_length: f64,

    // ── Sitzung ─────────────────────────────────────────────────
    /// Tiefe der Punkt-Historie
    #[serde(default = "default_point_history_depth")]
    pub point_history_depth: usize,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            snap_angle_threshold: SNAP_ANGLE_THRESHOLD,
            snap_distance_threshold: AUTO_SNAP_DISTANCE_THRESHOLD,
            snap_all_axes: false,

            bezier_segments: BEZIER_SEGMENTS,
            sagitta_factor: DEFAULT_CURVE_SAGITTA_FACTOR,
            amplify_factor: SUPER_CURVE_AMPLIFY_FACTOR,

            pipe_radius: PIPE_RADIUS,
            pipe_sides: PIPE_SIDES,

            locked_axis_line_width: LOCKED_AXIS_LINE_WIDTH,
            preview_line_width: PREVIEW_LINE_WIDTH,
            axis_guide_length: AXIS_GUIDE_LENGTH,

            point_history_depth: POINT_HISTORY_DEPTH,
        }
    }
}

/// Serde-Default für `point_history_depth` (ältere TOML-Dateien ohne den Eintrag).
fn default_point_history_depth() -> usize {
    POINT_HISTORY_DEPTH
}

impl ToolOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ToolOptions>(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.sanitized()
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("pipe-draw-replay"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("pipe_draw_engine.toml")
    }

    /// Korrigiert unbrauchbare Werte auf die Defaults (mit Log-Hinweis).
    pub fn sanitized(mut self) -> Self {
        if self.bezier_segments == 0 {
            log::warn!("bezier_segments = 0 ungültig, verwende {}", BEZIER_SEGMENTS);
            self.bezier_segments = BEZIER_SEGMENTS;
        }
        if self.pipe_sides < 3 {
            log::warn!("pipe_sides = {} ungültig, verwende {}", self.pipe_sides, PIPE_SIDES);
            self.pipe_sides = PIPE_SIDES;
        }
        if !(self.pipe_radius > 0.0) {
            log::warn!("pipe_radius = {} ungültig, verwende {}", self.pipe_radius, PIPE_RADIUS);
            self.pipe_radius = PIPE_RADIUS;
        }
        if !(self.snap_angle_threshold >= 0.0) {
            self.snap_angle_threshold = SNAP_ANGLE_THRESHOLD;
        }
        if !(self.snap_distance_threshold >= 0.0) {
            self.snap_distance_threshold = AUTO_SNAP_DISTANCE_THRESHOLD;
        }
        self.point_history_depth = self.point_history_depth.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip_keeps_values() {
        let mut opts = ToolOptions::default();
        opts.pipe_sides = 24;
        opts.snap_all_axes = true;
        let text = toml::to_string_pretty(&opts).expect("TOML erwartet");
        let parsed: ToolOptions = toml::from_str(&text).expect("Optionen erwartet");
        assert_eq!(parsed, opts);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let text = toml::to_string(&ToolOptions::default()).expect("TOML erwartet");
        let mut table: toml::Table = toml::from_str(&text).expect("Tabelle erwartet");
        table.remove("snap_all_axes");
        table.remove("point_history_depth");
        let parsed: ToolOptions = toml::from_str(&table.to_string()).expect("Optionen erwartet");
        assert!(!parsed.snap_all_axes);
        assert_eq!(parsed.point_history_depth, POINT_HISTORY_DEPTH);
    }

    #[test]
    fn test_sanitized_repairs_invalid_values() {
        let opts = ToolOptions {
            bezier_segments: 0,
            pipe_sides: 2,
            pipe_radius: -1.0,
            point_history_depth: 0,
            ..ToolOptions::default()
        }
        .sanitized();
        assert_eq!(opts.bezier_segments, BEZIER_SEGMENTS);
        assert_eq!(opts.pipe_sides, PIPE_SIDES);
        assert_eq!(opts.pipe_radius, PIPE_RADIUS);
        assert_eq!(opts.point_history_depth, 1);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("pipe_draw_engine_gibt_es_nicht.toml");
        assert_eq!(ToolOptions::load_from_file(&path), ToolOptions::default());
    }
}
