//! Box- und Flächen-Extrusions-Werkzeug (Dialog-gesteuert, ohne Zustand).

use crate::app::host::{ElementId, ElementTag, SceneHost};
use crate::core::{box_footprint, BoxSpec, DrawError, Result};

/// Extrusionsrichtung relativ zur Flächennormalen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushDirection {
    Outward,
    Inward,
}

impl PushDirection {
    pub fn sign(self) -> f64 {
        match self {
            PushDirection::Outward => 1.0,
            PushDirection::Inward => -1.0,
        }
    }
}

/// Führt `body` in einer eigenen Host-Operation aus.
///
/// Jeder Fehler (auch beim Bestätigen) bricht die Operation ab.
fn run_operation<T>(
    host: &mut dyn SceneHost,
    name: &str,
    body: impl FnOnce(&mut dyn SceneHost) -> anyhow::Result<T>,
) -> Result<T> {
    host.begin_operation(name)
        .map_err(DrawError::HostOperation)?;
    match body(&mut *host).and_then(|value| host.commit_operation().map(|()| value)) {
        Ok(value) => Ok(value),
        Err(e) => {
            log::error!("Operation '{}' fehlgeschlagen: {:#}", name, e);
            if let Err(abort) = host.abort_operation() {
                log::error!("Abbruch der Operation fehlgeschlagen: {:#}", abort);
            }
            Err(DrawError::HostOperation(e))
        }
    }
}

/// Erzeugt einen Quader als benannte Gruppe auf dem gewünschten Layer.
pub fn create_box(spec: &BoxSpec, host: &mut dyn SceneHost) -> Result<ElementId> {
    spec.validate()?;
    let group = run_operation(host, "Box erstellen", |host| {
        let face = host.add_face(&box_footprint(spec))?;
        let solid = host.push_pull(face, spec.height)?;
        let group = host.group(&[face, solid], &spec.name, ElementTag::Box)?;
        if !spec.layer.trim().is_empty() {
            host.tag_layer(group, &spec.layer)?;
        }
        Ok(group)
    })?;
    log::info!(
        "Box '{}' erstellt ({} x {} x {} m)",
        spec.name,
        spec.width,
        spec.length,
        spec.height
    );
    Ok(group)
}

/// Extrudiert eine vorhandene Fläche um `distance` (> 0) nach außen oder innen.
pub fn push_pull_face(
    face: ElementId,
    distance: f64,
    direction: PushDirection,
    host: &mut dyn SceneHost,
) -> Result<ElementId> {
    if !(distance > 0.0) || !distance.is_finite() {
        return Err(DrawError::InvalidArgument(format!(
            "Extrusionsabstand muss größer als 0 sein, erhalten: {distance}"
        )));
    }
    run_operation(host, "Fläche extrudieren", |host| {
        host.push_pull(face, distance * direction.sign())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::host::{ElementKind, HostCall, OperationOutcome, RecordingHost};
    use glam::DVec3;

    fn spec() -> BoxSpec {
        BoxSpec {
            width: 2.0,
            length: 1.0,
            height: 0.5,
            name: "Kiste".into(),
            layer: "Möbel".into(),
            origin: DVec3::ZERO,
        }
    }

    #[test]
    fn test_create_box_builds_named_group_on_layer() {
        let mut host = RecordingHost::new();
        let group = create_box(&spec(), &mut host).expect("Box erwartet");

        let element = host.element(group).expect("Gruppe erwartet");
        assert_eq!(element.layer.as_deref(), Some("Möbel"));
        match &element.kind {
            ElementKind::Group { name, children } => {
                assert_eq!(name, "Kiste");
                assert_eq!(children.len(), 2);
            }
            other => panic!("Gruppe erwartet, erhalten: {other:?}"),
        }
        assert_eq!(host.committed_operations(), 1);
    }

    #[test]
    fn test_invalid_box_touches_nothing() {
        let mut host = RecordingHost::new();
        let mut bad = spec();
        bad.height = 0.0;
        assert!(matches!(
            create_box(&bad, &mut host),
            Err(DrawError::InvalidArgument(_))
        ));
        assert!(host.operations().is_empty());
        assert!(host.elements().is_empty());
    }

    #[test]
    fn test_host_failure_aborts_box_operation() {
        let mut host = RecordingHost::new();
        host.fail_next(HostCall::PushPull);
        assert!(matches!(
            create_box(&spec(), &mut host),
            Err(DrawError::HostOperation(_))
        ));
        assert!(host.elements().is_empty());
        assert_eq!(host.operations()[0].outcome, OperationOutcome::Aborted);
    }

    #[test]
    fn test_push_pull_inward_negates_distance() {
        let mut host = RecordingHost::new();
        let face = host
            .add_face(&[DVec3::ZERO, DVec3::X, DVec3::ONE])
            .expect("Fläche erwartet");
        let solid =
            push_pull_face(face, 0.1, PushDirection::Inward, &mut host).expect("Körper erwartet");
        match host.element(solid).map(|e| &e.kind) {
            Some(ElementKind::Solid { distance, .. }) => assert_eq!(*distance, -0.1),
            other => panic!("Körper erwartet, erhalten: {other:?}"),
        }
        assert!(push_pull_face(face, 0.0, PushDirection::Outward, &mut host).is_err());
    }
}
