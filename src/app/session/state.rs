//! State-Definitionen und Konstruktor der Zeichen-Sitzung.

use crate::app::host::ElementId;
use crate::core::{
    AxisLock, AxisSnapper, Camera, LengthParser, MetricLengthParser, PipePathBuilder, Point3,
    Result, Vector3,
};
use crate::shared::options::FREE_DIRECTION_COLOR;
use crate::shared::ToolOptions;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Zustand der Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Noch kein Punkt gesetzt
    Idle,
    /// Mindestens ein Ankerpunkt gesetzt
    Placing,
}

/// Maßgebliche Quelle der Zeichenrichtung (genau eine ist aktiv).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    /// Auf eine Halbachse gesperrt (per Taste oder automatisch eingerastet)
    Locked(AxisLock),
    /// Freie, normalisierte Richtung
    Free(Vector3),
    /// Keine Richtung (kein Anker, kein Cursor-Versatz oder Bogen-Modus)
    Undetermined,
}

impl Direction {
    pub fn vector(&self) -> Option<Vector3> {
        match self {
            Direction::Locked(axis) => axis.unit_vector(),
            Direction::Free(v) => Some(*v),
            Direction::Undetermined => None,
        }
    }
}

/// Rückmeldung eines verarbeiteten Events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionAction {
    /// Event hatte keine Wirkung
    Ignored,
    /// Vorschau/Zustand aktualisiert
    Updated,
    /// Erster Ankerpunkt gesetzt, Operation geöffnet
    AnchorPlaced,
    /// Segment an den Host übergeben, Kette läuft weiter
    SegmentCommitted,
    /// Klick ohne Länge: Punkt am Anker gesetzt
    PointPlaced,
    /// Kette abgeschlossen, zurück zu Idle
    Finished,
    /// Abgebrochen, zurück zu Idle
    Cancelled,
}

/// Feature-Flags eines Zeichen-Werkzeugs.
///
/// Ersetzt die früheren Werkzeug-Varianten durch eine konfigurierbare Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFeatures {
    /// Pfeiltasten sperren Achsen
    pub axis_lock: bool,
    /// Shift gehalten = Bogen-Modus
    pub arc_mode: bool,
    /// Gerade Segmente automatisch leicht runden
    pub default_smoothing: bool,
    /// Segmente als Rohr (Profil + Extrusion) statt als Kurve
    pub pipe: bool,
    /// Gemeinsame Kanten ab dem zweiten Segment weich zeichnen
    pub soften_edges: bool,
    /// Längen-/Bulge-Eingabe über das Eingabefeld
    pub typed_length: bool,
}

impl ToolFeatures {
    /// Linien-/Kurven-Werkzeug.
    pub fn curve_line() -> Self {
        Self {
            axis_lock: true,
            arc_mode: true,
            default_smoothing: true,
            pipe: false,
            soften_edges: false,
            typed_length: true,
        }
    }

    /// Gerade Linien ohne Glättung und ohne Bogen-Modus.
    pub fn straight_line() -> Self {
        Self {
            axis_lock: true,
            arc_mode: false,
            default_smoothing: false,
            pipe: false,
            soften_edges: false,
            typed_length: true,
        }
    }

    /// Rohr-Werkzeug.
    pub fn pipe() -> Self {
        Self {
            axis_lock: true,
            arc_mode: true,
            default_smoothing: false,
            pipe: true,
            soften_edges: true,
            typed_length: true,
        }
    }
}

/// Benannte Werkzeug-Voreinstellung (z.B. im Replay-Skript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolPreset {
    #[default]
    CurveLine,
    StraightLine,
    Pipe,
}

impl ToolPreset {
    pub fn features(self) -> ToolFeatures {
        match self {
            ToolPreset::CurveLine => ToolFeatures::curve_line(),
            ToolPreset::StraightLine => ToolFeatures::straight_line(),
            ToolPreset::Pipe => ToolFeatures::pipe(),
        }
    }
}

/// Interaktive Zeichen-Sitzung eines Werkzeugs (Linie, Kurve oder Rohr).
pub struct DrawSession {
    pub(crate) features: ToolFeatures,
    pub(crate) options: ToolOptions,
    pub(crate) snapper: AxisSnapper,
    pub(crate) pipe_builder: PipePathBuilder,
    pub(crate) parser: Box<dyn LengthParser>,
    pub(crate) active: bool,
    /// Punkte der laufenden Kette (nach jedem Commit nur noch der letzte)
    pub(crate) points: Vec<Point3>,
    /// Gesetzte Anker für "letzten Punkt zurücknehmen"
    pub(crate) history: VecDeque<Point3>,
    /// Per Pfeiltaste erzwungene Achse
    pub(crate) forced_lock: AxisLock,
    pub(crate) direction: Direction,
    pub(crate) arc_mode: bool,
    /// Sehnenrichtung, eingefroren beim Eintritt in den Bogen-Modus
    pub(crate) arc_chord: Option<Vector3>,
    /// Bézier-Steuerpunkt im Bogen-Modus
    pub(crate) bezier_control: Option<Point3>,
    /// Verstärkter Bulge-Skalar des Steuerpunkts
    pub(crate) arc_bulge: f64,
    /// Shift gehalten
    pub(crate) constrain_held: bool,
    /// Getippter, noch nicht bestätigter Text
    pub(crate) pending_text: String,
    /// Endpunkt aus getippter Länge
    pub(crate) override_end: Option<Point3>,
    pub(crate) cursor: Option<Point3>,
    pub(crate) camera: Camera,
    pub(crate) transaction_open: bool,
    /// Anzahl Segmente der laufenden Kette
    pub(crate) chain_segments: usize,
    /// Vom Host erzeugte Elemente der laufenden Kette
    pub(crate) chain_elements: Vec<ElementId>,
    pub(crate) color: [f32; 4],
}

impl DrawSession {
    /// Erstellt eine aktive Sitzung mit den gegebenen Features.
    pub fn new(features: ToolFeatures, options: ToolOptions) -> Result<Self> {
        let options = options.sanitized();
        let mut snapper =
            AxisSnapper::new(options.snap_angle_threshold, options.snap_distance_threshold);
        if options.snap_all_axes {
            snapper = snapper.with_all_axes();
        }
        let pipe_builder = PipePathBuilder::new(options.pipe_radius, options.pipe_sides)?;

        log::info!(
            "Zeichen-Sitzung aktiviert ({})",
            if features.pipe { "Rohr" } else { "Linie/Kurve" }
        );

        Ok(Self {
            features,
            snapper,
            pipe_builder,
            parser: Box::new(MetricLengthParser::default()),
            active: true,
            points: Vec::new(),
            history: VecDeque::with_capacity(options.point_history_depth),
            forced_lock: AxisLock::None,
            direction: Direction::Undetermined,
            arc_mode: false,
            arc_chord: None,
            bezier_control: None,
            arc_bulge: 0.0,
            constrain_held: false,
            pending_text: String::new(),
            override_end: None,
            cursor: None,
            camera: Camera::default(),
            transaction_open: false,
            chain_segments: 0,
            chain_elements: Vec::new(),
            color: FREE_DIRECTION_COLOR,
            options,
        })
    }

    pub fn from_preset(preset: ToolPreset, options: ToolOptions) -> Result<Self> {
        Self::new(preset.features(), options)
    }

    /// Ersetzt den Längen-Parser (z.B. für eine andere Standard-Einheit).
    pub fn with_parser(mut self, parser: Box<dyn LengthParser>) -> Self {
        self.parser = parser;
        self
    }

    // ── Abfragen ────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> SessionState {
        if self.points.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Placing
        }
    }

    /// Aktuell wirksame Achse (erzwungen oder eingerastet).
    pub fn axis_lock(&self) -> AxisLock {
        match self.direction {
            Direction::Locked(axis) => axis,
            _ => AxisLock::None,
        }
    }

    /// Per Pfeiltaste erzwungene Achse.
    pub fn forced_axis_lock(&self) -> AxisLock {
        self.forced_lock
    }

    pub fn is_arc_mode(&self) -> bool {
        self.arc_mode
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn bezier_control(&self) -> Option<Point3> {
        self.bezier_control
    }

    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    /// Endpunkt aus getippter Länge (falls Eingabe anliegt).
    pub fn override_end(&self) -> Option<Point3> {
        self.override_end
    }

    pub fn cursor(&self) -> Option<Point3> {
        self.cursor
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn features(&self) -> &ToolFeatures {
        &self.features
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn chain_segments(&self) -> usize {
        self.chain_segments
    }

    pub fn is_transaction_open(&self) -> bool {
        self.transaction_open
    }

    /// Statuszeilen-Text für den Host.
    pub fn status_text(&self) -> &'static str {
        if !self.active {
            return "Werkzeug inaktiv";
        }
        match self.state() {
            SessionState::Idle => {
                if self.features.pipe {
                    "Startpunkt des Rohrs klicken"
                } else {
                    "Startpunkt klicken"
                }
            }
            SessionState::Placing => {
                if self.arc_mode {
                    "Bogen-Modus: Cursor seitlich ziehen für Wölbung, klicken zum Setzen"
                } else if self.forced_lock.is_locked() {
                    "Achse gesperrt (Pfeiltaste erneut zum Lösen) | Länge tippen + Enter"
                } else if self.features.pipe {
                    "Nächsten Punkt klicken | Enter: Rohr fertigstellen | Esc: Abbruch"
                } else {
                    "Nächsten Punkt klicken oder Länge tippen | Pfeiltasten: Achse | Shift: Bogen"
                }
            }
        }
    }
}
