//! Eingabe-Events des Hosts an die Zeichen-Sitzung.

use crate::core::{AxisLock, Camera, Point3};
use serde::{Deserialize, Serialize};

/// Tasten, die die Sitzung auswertet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    /// Modifikator für den Bogen-Modus (gehalten)
    Shift,
    Escape,
    Enter,
    Backspace,
}

impl Key {
    /// Achsen-Zuordnung der Pfeiltasten: → X, ← Y, ↑ +Z, ↓ −Z.
    pub fn axis_lock(self) -> Option<AxisLock> {
        match self {
            Key::ArrowRight => Some(AxisLock::PosX),
            Key::ArrowLeft => Some(AxisLock::PosY),
            Key::ArrowUp => Some(AxisLock::PosZ),
            Key::ArrowDown => Some(AxisLock::NegZ),
            _ => None,
        }
    }
}

/// Ein Event aus der Event-Schleife des Hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolEvent {
    /// Werkzeug wurde aktiviert
    Activate,
    /// Werkzeug wurde deaktiviert (Wechsel auf ein anderes Werkzeug)
    Deactivate,
    /// Cursor bewegt (Weltpunkt nach Picking/Inferenz des Hosts)
    PointerMove { point: Point3 },
    /// Primärklick
    Click { point: Point3 },
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// Einzelnes Zeichen im Eingabefeld
    TypeChar { ch: char },
    /// Bestätigter Text des Eingabefelds (leer = aktueller Puffer)
    TextCommit {
        #[serde(default)]
        text: String,
    },
    /// Kamera hat sich geändert
    CameraChanged { camera: Camera },
    /// Letzten Punkt zurücknehmen
    UndoPoint,
    /// Kette abschließen (Enter ohne Eingabe)
    Finish,
    /// Abbrechen (Escape)
    Cancel,
}
