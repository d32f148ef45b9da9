//! Replay von Event-Skripten gegen einen `RecordingHost`.
//! Alle Dateisystem-Operationen des Replays sind hier zentralisiert.

use crate::app::box_tool::create_box;
use crate::app::events::ToolEvent;
use crate::app::host::RecordingHost;
use crate::app::session::{DrawSession, SessionAction, SessionState, ToolPreset};
use crate::core::{BoxSpec, Camera};
use crate::shared::ToolOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aufgezeichnete Werkzeug-Sitzung (JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub tool: ToolPreset,
    /// Startkamera (sonst isometrische Standardansicht)
    #[serde(default)]
    pub camera: Option<Camera>,
    #[serde(default)]
    pub events: Vec<ToolEvent>,
    /// Boxen aus dem Dialog, vor den Events erzeugt
    #[serde(default)]
    pub boxes: Vec<BoxSpec>,
}

/// Ergebnis eines Replays: Szene, Aktionen und abgelehnte Events.
#[derive(Debug, Default, Serialize)]
pub struct ReplayReport {
    pub host: RecordingHost,
    pub actions: Vec<SessionAction>,
    pub errors: Vec<String>,
}

/// Parst ein Replay-Skript aus JSON.
pub fn parse_script(json: &str) -> anyhow::Result<ReplayScript> {
    serde_json::from_str(json).context("Replay-Skript ist kein gültiges JSON")
}

/// Lädt ein Replay-Skript aus einer Datei.
pub fn load_script(path: &Path) -> anyhow::Result<ReplayScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Skript nicht lesbar: {}", path.display()))?;
    let script = parse_script(&content)?;
    log::info!(
        "Skript geladen: {} ({} Events, {} Boxen)",
        path.display(),
        script.events.len(),
        script.boxes.len()
    );
    Ok(script)
}

/// Spielt ein Skript ab. Abgelehnte Events werden protokolliert, das Replay läuft weiter.
///
/// Eine am Skriptende noch offene Kette wird abgeschlossen.
pub fn run_script(script: &ReplayScript, options: &ToolOptions) -> crate::core::Result<ReplayReport> {
    let mut session = DrawSession::from_preset(script.tool, options.clone())?;
    let mut report = ReplayReport::default();

    if let Some(camera) = script.camera {
        session.set_camera(camera);
    }

    for spec in &script.boxes {
        if let Err(e) = create_box(spec, &mut report.host) {
            log::warn!("Box '{}' übersprungen: {}", spec.name, e);
            report.errors.push(format!("Box '{}': {}", spec.name, e));
        }
    }

    for (index, event) in script.events.iter().enumerate() {
        match session.handle_event(event, &mut report.host) {
            Ok(action) => report.actions.push(action),
            Err(e) => {
                log::warn!("Event {} ({:?}) abgelehnt: {}", index, event, e);
                report.errors.push(format!("Event {}: {}", index, e));
            }
        }
    }

    if session.state() == SessionState::Placing || session.is_transaction_open() {
        match session.finish(&mut report.host) {
            Ok(action) => report.actions.push(action),
            Err(e) => report.errors.push(format!("Abschluss: {}", e)),
        }
    }

    log::info!(
        "Replay beendet: {} Elemente, {} Operationen, {} Fehler",
        report.host.elements().len(),
        report.host.committed_operations(),
        report.errors.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::host::ElementTag;
    use glam::DVec3;

    #[test]
    fn test_parse_minimal_script_uses_defaults() {
        let script = parse_script("{}").expect("Skript erwartet");
        assert_eq!(script.tool, ToolPreset::CurveLine);
        assert!(script.camera.is_none());
        assert!(script.events.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        let result = parse_script(r#"{"events": [{"type": "teleport"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_script_finishes_open_chain() {
        let script = ReplayScript {
            tool: ToolPreset::Pipe,
            events: vec![
                ToolEvent::Click {
                    point: DVec3::ZERO,
                },
                ToolEvent::Click {
                    point: DVec3::new(0.0, 5.0, 0.0),
                },
            ],
            ..ReplayScript::default()
        };

        let report = run_script(&script, &ToolOptions::default()).expect("Report erwartet");

        assert_eq!(report.host.committed_operations(), 1);
        // Segment + Rohr-Gruppe
        assert_eq!(report.host.elements_tagged(ElementTag::Pipe).count(), 2);
        let segment = report.host.element(1).expect("Segment erwartet");
        assert_eq!(segment.parent, Some(2));
        assert_eq!(report.actions.last(), Some(&SessionAction::Finished));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_run_script_collects_rejected_events() {
        let script = ReplayScript {
            tool: ToolPreset::StraightLine,
            events: vec![
                ToolEvent::Click {
                    point: DVec3::ZERO,
                },
                ToolEvent::TextCommit {
                    text: "zwei Meter".into(),
                },
                ToolEvent::TextCommit { text: "2".into() },
            ],
            ..ReplayScript::default()
        };

        let report = run_script(&script, &ToolOptions::default()).expect("Report erwartet");

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Event 1"));
        assert_eq!(report.host.elements_tagged(ElementTag::Line).count(), 1);
    }
}
