//! Schnittstelle zum Szenen-Host (Transaktionen + Geometrie-Erzeugung).
//!
//! `RecordingHost` ist ein In-Memory-Host für Tests und den Replay-Binary:
//! er protokolliert alle erzeugten Elemente und Operationen.

use crate::core::{PipeSegment, Point3, Vector3};
use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// ID eines vom Host erzeugten Elements.
pub type ElementId = u64;

/// Explizite Kennzeichnung erzeugter Elemente (statt Namens-Prüfung).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementTag {
    Line,
    Curve,
    Pipe,
    Box,
}

/// Szenen-Mutations-API des Hosts.
///
/// Pro Sitzung ist höchstens eine Operation offen; sie muss bestätigt oder
/// abgebrochen werden, bevor eine neue beginnt.
pub trait SceneHost {
    fn begin_operation(&mut self, name: &str) -> anyhow::Result<()>;
    fn commit_operation(&mut self) -> anyhow::Result<()>;
    /// Bricht die offene Operation ab und verwirft alle Änderungen seit `begin_operation`.
    fn abort_operation(&mut self) -> anyhow::Result<()>;

    /// Freiform-Kurve (Polylinie) aus mehreren Punkten.
    fn add_curve(&mut self, points: &[Point3], tag: ElementTag) -> anyhow::Result<ElementId>;
    fn add_point(&mut self, point: Point3) -> anyhow::Result<ElementId>;
    /// Kreisprofil entlang des Pfads extrudieren (Follow-Me).
    fn add_pipe(&mut self, segment: &PipeSegment, tag: ElementTag) -> anyhow::Result<ElementId>;
    /// Geschlossene ebene Fläche.
    fn add_face(&mut self, points: &[Point3]) -> anyhow::Result<ElementId>;
    /// Fläche entlang ihrer Normalen zu einem Körper extrudieren.
    fn push_pull(&mut self, face: ElementId, distance: f64) -> anyhow::Result<ElementId>;
    /// Fasst Elemente zu einer benannten Gruppe mit Kennzeichnung zusammen.
    fn group(
        &mut self,
        elements: &[ElementId],
        name: &str,
        tag: ElementTag,
    ) -> anyhow::Result<ElementId>;
    fn tag_layer(&mut self, element: ElementId, layer: &str) -> anyhow::Result<()>;
    /// Gemeinsame Kanten der Elemente als weich/glatt markieren.
    fn soften_edges(&mut self, elements: &[ElementId]) -> anyhow::Result<()>;
    /// Verschiebt ein Element (Gruppen samt Inhalt) um `offset`.
    fn translate(&mut self, element: ElementId, offset: Vector3) -> anyhow::Result<()>;
}

// ── RecordingHost ───────────────────────────────────────────────────

/// Host-Aufruf, der für Tests gezielt fehlschlagen kann.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostCall {
    BeginOperation,
    CommitOperation,
    AddCurve,
    AddPoint,
    AddPipe,
    AddFace,
    PushPull,
    Group,
    TagLayer,
    SoftenEdges,
    Translate,
}

/// Art eines aufgezeichneten Elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Curve { points: Vec<Point3> },
    Point { position: Point3 },
    Pipe { segment: PipeSegment },
    Face { points: Vec<Point3> },
    Solid { face: ElementId, distance: f64 },
    Group { name: String, children: Vec<ElementId> },
}

/// Aufgezeichnetes Szenen-Element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneElement {
    pub id: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ElementTag>,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    pub soft: bool,
}

/// Ausgang einer abgeschlossenen Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOutcome {
    Committed,
    Aborted,
}

/// Protokoll-Eintrag einer Operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    pub name: String,
    pub outcome: OperationOutcome,
}

#[derive(Debug, Clone)]
struct OpenOperation {
    name: String,
    /// Szene vor Beginn der Operation (für Rollback)
    snapshot: Vec<SceneElement>,
}

/// In-Memory-Host, der alle Aufrufe protokolliert.
#[derive(Debug, Default, Serialize)]
pub struct RecordingHost {
    elements: Vec<SceneElement>,
    operations: Vec<OperationRecord>,
    #[serde(skip)]
    open: Option<OpenOperation>,
    #[serde(skip)]
    next_id: ElementId,
    #[serde(skip)]
    fail_on: Option<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lässt den nächsten Aufruf der Art `call` fehlschlagen.
    pub fn fail_next(&mut self, call: HostCall) {
        self.fail_on = Some(call);
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Alle Elemente mit dem gegebenen Tag.
    pub fn elements_tagged(&self, tag: ElementTag) -> impl Iterator<Item = &SceneElement> {
        self.elements.iter().filter(move |e| e.tag == Some(tag))
    }

    pub fn operations(&self) -> &[OperationRecord] {
        &self.operations
    }

    pub fn committed_operations(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.outcome == OperationOutcome::Committed)
            .count()
    }

    pub fn is_operation_open(&self) -> bool {
        self.open.is_some()
    }

    fn check(&mut self, call: HostCall) -> anyhow::Result<()> {
        if self.fail_on == Some(call) {
            self.fail_on = None;
            bail!("Host-Aufruf {:?} fehlgeschlagen (simuliert)", call);
        }
        Ok(())
    }

    fn push(&mut self, kind: ElementKind, tag: Option<ElementTag>) -> ElementId {
        self.next_id += 1;
        let id = self.next_id;
        self.elements.push(SceneElement {
            id,
            tag,
            kind,
            layer: None,
            parent: None,
            soft: false,
        });
        id
    }

    fn element_mut(&mut self, id: ElementId) -> anyhow::Result<&mut SceneElement> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow!("Element {} existiert nicht", id))
    }
}

impl SceneHost for RecordingHost {
    fn begin_operation(&mut self, name: &str) -> anyhow::Result<()> {
        self.check(HostCall::BeginOperation)?;
        if let Some(open) = &self.open {
            bail!("Operation '{}' ist noch offen", open.name);
        }
        self.open = Some(OpenOperation {
            name: name.to_string(),
            snapshot: self.elements.clone(),
        });
        Ok(())
    }

    fn commit_operation(&mut self) -> anyhow::Result<()> {
        self.check(HostCall::CommitOperation)?;
        let open = self
            .open
            .take()
            .ok_or_else(|| anyhow!("Keine offene Operation zum Bestätigen"))?;
        self.operations.push(OperationRecord {
            name: open.name,
            outcome: OperationOutcome::Committed,
        });
        Ok(())
    }

    fn abort_operation(&mut self) -> anyhow::Result<()> {
        let open = self
            .open
            .take()
            .ok_or_else(|| anyhow!("Keine offene Operation zum Abbrechen"))?;
        self.elements = open.snapshot;
        self.operations.push(OperationRecord {
            name: open.name,
            outcome: OperationOutcome::Aborted,
        });
        Ok(())
    }

    fn add_curve(&mut self, points: &[Point3], tag: ElementTag) -> anyhow::Result<ElementId> {
        self.check(HostCall::AddCurve)?;
        if points.len() < 2 {
            bail!("Kurve braucht mindestens 2 Punkte, erhalten: {}", points.len());
        }
        Ok(self.push(
            ElementKind::Curve {
                points: points.to_vec(),
            },
            Some(tag),
        ))
    }

    fn add_point(&mut self, point: Point3) -> anyhow::Result<ElementId> {
        self.check(HostCall::AddPoint)?;
        Ok(self.push(ElementKind::Point { position: point }, None))
    }

    fn add_pipe(&mut self, segment: &PipeSegment, tag: ElementTag) -> anyhow::Result<ElementId> {
        self.check(HostCall::AddPipe)?;
        Ok(self.push(
            ElementKind::Pipe {
                segment: segment.clone(),
            },
            Some(tag),
        ))
    }

    fn add_face(&mut self, points: &[Point3]) -> anyhow::Result<ElementId> {
        self.check(HostCall::AddFace)?;
        if points.len() < 3 {
            bail!("Fläche braucht mindestens 3 Punkte, erhalten: {}", points.len());
        }
        Ok(self.push(
            ElementKind::Face {
                points: points.to_vec(),
            },
            None,
        ))
    }

    fn push_pull(&mut self, face: ElementId, distance: f64) -> anyhow::Result<ElementId> {
        self.check(HostCall::PushPull)?;
        match self.element(face).map(|e| &e.kind) {
            Some(ElementKind::Face { .. }) => {}
            Some(_) => bail!("Element {} ist keine Fläche", face),
            None => bail!("Element {} existiert nicht", face),
        }
        Ok(self.push(ElementKind::Solid { face, distance }, None))
    }

    fn group(
        &mut self,
        elements: &[ElementId],
        name: &str,
        tag: ElementTag,
    ) -> anyhow::Result<ElementId> {
        self.check(HostCall::Group)?;
        for &id in elements {
            self.element_mut(id)?;
        }
        let group_id = self.push(
            ElementKind::Group {
                name: name.to_string(),
                children: elements.to_vec(),
            },
            Some(tag),
        );
        for &id in elements {
            self.element_mut(id)?.parent = Some(group_id);
        }
        Ok(group_id)
    }

    fn tag_layer(&mut self, element: ElementId, layer: &str) -> anyhow::Result<()> {
        self.check(HostCall::TagLayer)?;
        self.element_mut(element)?.layer = Some(layer.to_string());
        Ok(())
    }

    fn soften_edges(&mut self, elements: &[ElementId]) -> anyhow::Result<()> {
        self.check(HostCall::SoftenEdges)?;
        for &id in elements {
            self.element_mut(id)?.soft = true;
        }
        Ok(())
    }

    fn translate(&mut self, element: ElementId, offset: Vector3) -> anyhow::Result<()> {
        self.check(HostCall::Translate)?;
        let mut pending = vec![element];
        let mut moved: HashSet<ElementId> = HashSet::new();
        while let Some(id) = pending.pop() {
            if !moved.insert(id) {
                continue;
            }
            match &mut self.element_mut(id)?.kind {
                ElementKind::Curve { points } | ElementKind::Face { points } => {
                    points.iter_mut().for_each(|p| *p += offset);
                }
                ElementKind::Point { position } => *position += offset,
                ElementKind::Pipe { segment } => {
                    segment.path.iter_mut().for_each(|p| *p += offset);
                    segment.profile.center += offset;
                }
                // Körper folgt seiner Grundfläche
                ElementKind::Solid { face, .. } => pending.push(*face),
                ElementKind::Group { children, .. } => pending.extend(children.iter().copied()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_abort_rolls_back_elements() {
        let mut host = RecordingHost::new();
        host.begin_operation("Eins").expect("begin erwartet");
        host.add_point(DVec3::ZERO).expect("Punkt erwartet");
        host.commit_operation().expect("commit erwartet");

        host.begin_operation("Zwei").expect("begin erwartet");
        host.add_curve(&[DVec3::ZERO, DVec3::X], ElementTag::Line)
            .expect("Kurve erwartet");
        assert_eq!(host.elements().len(), 2);
        host.abort_operation().expect("abort erwartet");

        assert_eq!(host.elements().len(), 1);
        assert_eq!(host.operations()[1].outcome, OperationOutcome::Aborted);
        assert!(!host.is_operation_open());
    }

    #[test]
    fn test_nested_begin_is_rejected() {
        let mut host = RecordingHost::new();
        host.begin_operation("Eins").expect("begin erwartet");
        assert!(host.begin_operation("Zwei").is_err());
        assert!(host.is_operation_open());
    }

    #[test]
    fn test_injected_failure_fires_once() {
        let mut host = RecordingHost::new();
        host.fail_next(HostCall::AddPoint);
        assert!(host.add_point(DVec3::ZERO).is_err());
        assert!(host.add_point(DVec3::ZERO).is_ok());
    }

    #[test]
    fn test_group_and_layer_metadata() {
        let mut host = RecordingHost::new();
        let face = host
            .add_face(&[DVec3::ZERO, DVec3::X, DVec3::ONE, DVec3::Y])
            .expect("Fläche erwartet");
        let solid = host.push_pull(face, 2.0).expect("Körper erwartet");
        let group = host.group(&[face, solid], "Kiste", ElementTag::Box).expect("Gruppe erwartet");
        host.tag_layer(group, "Möbel").expect("Layer erwartet");

        assert_eq!(host.element(face).and_then(|e| e.parent), Some(group));
        assert_eq!(
            host.element(group).and_then(|e| e.layer.clone()),
            Some("Möbel".to_string())
        );
        assert!(host.push_pull(group, 1.0).is_err());
    }

    #[test]
    fn test_translate_moves_group_contents_once() {
        let mut host = RecordingHost::new();
        let face = host
            .add_face(&[DVec3::ZERO, DVec3::X, DVec3::Y])
            .expect("Fläche erwartet");
        let solid = host.push_pull(face, 1.0).expect("Körper erwartet");
        let point = host.add_point(DVec3::ONE).expect("Punkt erwartet");
        let group = host
            .group(&[face, solid, point], "Kiste", ElementTag::Box)
            .expect("Gruppe erwartet");

        host.translate(group, DVec3::new(0.0, 0.0, 2.0))
            .expect("Verschieben erwartet");

        match host.element(face).map(|e| &e.kind) {
            Some(ElementKind::Face { points }) => {
                assert_eq!(points[1], DVec3::new(1.0, 0.0, 2.0));
            }
            other => panic!("Fläche erwartet, erhalten: {other:?}"),
        }
        match host.element(point).map(|e| &e.kind) {
            Some(ElementKind::Point { position }) => {
                assert_eq!(*position, DVec3::new(1.0, 1.0, 3.0));
            }
            other => panic!("Punkt erwartet, erhalten: {other:?}"),
        }
        assert!(host.translate(99, DVec3::X).is_err());
    }
}
