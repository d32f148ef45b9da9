//! Zeichen-Sitzung: Zustandsautomat für Linien-, Kurven- und Rohr-Werkzeuge.
//!
//! **Ablauf:** Klick setzt den Startpunkt und öffnet eine Host-Operation →
//! jeder weitere Klick (oder eine getippte Länge) erzeugt ein Segment und
//! macht dessen Endpunkt zum neuen Anker → Enter schließt ab, Esc bricht ab.
//!
//! **Richtung:** Pfeiltasten sperren eine Achse, sonst rastet der
//! `AxisSnapper` automatisch ein. Shift gehalten schaltet den Bogen-Modus:
//! der seitliche Cursor-Versatz zur Sehne steuert die Wölbung.
//!
//! Aufgeteilt in:
//! - `state`:     Structs, Enums, Konstruktor, Abfragen
//! - `lifecycle`: Event-Verarbeitung und Zustandsübergänge
//! - `geometry`:  Endpunkte, Segment-Erzeugung, Host-Fehlerbehandlung
//! - `preview`:   Draw-Liste für den Render-Tick

mod geometry;
mod lifecycle;
mod preview;
mod state;

pub use state::{
    Direction, DrawSession, SessionAction, SessionState, ToolFeatures, ToolPreset,
};
