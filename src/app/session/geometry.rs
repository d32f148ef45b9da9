//! Endpunkt-Bestimmung und Übergabe fertiger Segmente an den Host.

use super::state::{Direction, DrawSession, SessionAction};
use crate::app::host::{ElementId, ElementTag, SceneHost};
use crate::core::{
    default_smoothing, project_to_line, tessellate, try_normalize, DrawError, Point3, Result,
    SnapResult, Vector3, DEGENERATE_LENGTH,
};

/// Form des nächsten Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SegmentShape {
    /// Gerade (bzw. automatisch geglättet, falls aktiviert)
    Straight,
    /// Bogen mit Steuerpunkt und verstärktem Bulge-Skalar
    Arc { control: Point3, bulge: f64 },
}

impl DrawSession {
    /// Operations-Name für den Host (erscheint in dessen Undo-Liste).
    pub(crate) fn operation_name(&self) -> &'static str {
        if self.features.pipe {
            "3D-Rohr erstellen"
        } else {
            "Linie/Kurve zeichnen"
        }
    }

    /// Richtung für Längen-Eingaben: Bogen-Sehne, aktuelle Richtung oder Cursor-Richtung.
    pub(crate) fn current_direction_vector(&self, anchor: Point3) -> Option<Vector3> {
        let current = if self.arc_mode {
            self.arc_chord
        } else {
            self.direction.vector()
        };
        current.or_else(|| self.cursor.and_then(|c| try_normalize(c - anchor)))
    }

    /// Automatische Achsen-Inferenz über den `AxisSnapper`.
    pub(crate) fn infer_direction(&self, anchor: Point3, cursor: Point3) -> Direction {
        match self
            .snapper
            .infer(anchor, cursor, cursor - anchor, &self.camera)
        {
            SnapResult::Locked(axis) => Direction::Locked(axis),
            SnapResult::Free(dir) => Direction::Free(dir),
            SnapResult::NoDirection => Direction::Undetermined,
        }
    }

    /// Endpunkt im Bogen-Modus: Cursor projiziert auf die eingefrorene Sehne.
    pub(crate) fn arc_endpoint(&self, anchor: Point3, cursor: Point3) -> Point3 {
        match self.arc_chord {
            Some(chord) => project_to_line(cursor, anchor, chord),
            None => cursor,
        }
    }

    /// Endpunkt bei gesperrter Achse: Cursor projiziert auf die Achsgerade.
    pub(crate) fn locked_endpoint(&self, anchor: Point3, cursor: Point3) -> Point3 {
        match self.direction {
            Direction::Locked(axis) => match axis.unit_vector() {
                Some(dir) => project_to_line(cursor, anchor, dir),
                None => cursor,
            },
            _ => cursor,
        }
    }

    pub(crate) fn begin_transaction(&mut self, host: &mut dyn SceneHost) -> Result<()> {
        if self.transaction_open {
            return Ok(());
        }
        if let Err(e) = host.begin_operation(self.operation_name()) {
            log::error!("Operation konnte nicht gestartet werden: {:#}", e);
            self.reset();
            return Err(DrawError::HostOperation(e));
        }
        self.transaction_open = true;
        Ok(())
    }

    /// Bricht die offene Operation ab, setzt auf Idle zurück und reicht den Fehler durch.
    pub(crate) fn fail(&mut self, host: &mut dyn SceneHost, err: DrawError) -> DrawError {
        log::error!("{}", err);
        if self.transaction_open {
            if let Err(e) = host.abort_operation() {
                log::error!("Abbruch der Operation fehlgeschlagen: {:#}", e);
            }
        }
        self.reset();
        err
    }

    /// Erzeugt das Segment `anchor → end` beim Host und setzt die Kette fort.
    ///
    /// Entartete Segmente werden übersprungen.
    pub(crate) fn commit_segment(
        &mut self,
        anchor: Point3,
        end: Point3,
        shape: SegmentShape,
        host: &mut dyn SceneHost,
    ) -> Result<SessionAction> {
        if anchor.distance(end) < DEGENERATE_LENGTH {
            log::warn!("Segment kürzer als {} m, übersprungen", DEGENERATE_LENGTH);
            return Ok(SessionAction::Ignored);
        }
        self.begin_transaction(host)?;

        let ids = match self.emit_segment(anchor, end, shape, host) {
            Ok(ids) => ids,
            Err(e) => return Err(self.fail(host, e)),
        };
        if ids.is_empty() {
            return Ok(SessionAction::Ignored);
        }

        self.chain_segments += 1;
        self.chain_elements.extend(ids);

        if self.features.soften_edges && self.chain_segments >= 2 {
            let elements = self.chain_elements.clone();
            if let Err(e) = host.soften_edges(&elements) {
                return Err(self.fail(host, DrawError::HostOperation(e)));
            }
        }

        // Kurven-Modus: jedes Segment ist eine eigene Operation
        if !self.features.pipe {
            if let Err(e) = host.commit_operation() {
                return Err(self.fail(host, DrawError::HostOperation(e)));
            }
            self.transaction_open = false;
        }

        log::info!(
            "Segment {} übernommen: {:.3} m",
            self.chain_segments,
            anchor.distance(end)
        );
        self.push_anchor(end);

        if !self.features.pipe {
            self.begin_transaction(host)?;
        }
        Ok(SessionAction::SegmentCommitted)
    }

    /// Klick auf den Anker im Linien-/Kurven-Modus: Punkt setzen statt Segment.
    ///
    /// Eigene Operation wie ein Segment; der Anker bleibt, Sperre und Bogen werden gelöst.
    pub(crate) fn mark_point(
        &mut self,
        anchor: Point3,
        host: &mut dyn SceneHost,
    ) -> Result<SessionAction> {
        self.begin_transaction(host)?;
        if let Err(e) = host.add_point(anchor) {
            return Err(self.fail(host, DrawError::HostOperation(e)));
        }
        if let Err(e) = host.commit_operation() {
            return Err(self.fail(host, DrawError::HostOperation(e)));
        }
        self.transaction_open = false;
        log::info!("Punkt gesetzt: {:?}", anchor);
        self.reset_transients();
        self.begin_transaction(host)?;
        Ok(SessionAction::PointPlaced)
    }

    fn emit_segment(
        &self,
        anchor: Point3,
        end: Point3,
        shape: SegmentShape,
        host: &mut dyn SceneHost,
    ) -> Result<Vec<ElementId>> {
        if self.features.pipe {
            let bulge = match shape {
                SegmentShape::Arc { bulge, .. } => bulge,
                SegmentShape::Straight => 0.0,
            };
            let Some(segment) = self
                .pipe_builder
                .build_segment(anchor, end, bulge, &self.camera)
            else {
                return Ok(Vec::new());
            };
            let id = host
                .add_pipe(&segment, ElementTag::Pipe)
                .map_err(DrawError::HostOperation)?;
            return Ok(vec![id]);
        }

        let segments = self.options.bezier_segments;
        let (points, tag) = match shape {
            SegmentShape::Arc { control, .. } => {
                (tessellate(anchor, end, control, segments)?, ElementTag::Curve)
            }
            SegmentShape::Straight if self.features.default_smoothing => {
                let length = anchor.distance(end);
                let control =
                    default_smoothing(anchor, length, end - anchor, &self.camera, self.options.sagitta_factor)?;
                (tessellate(anchor, end, control, segments)?, ElementTag::Curve)
            }
            SegmentShape::Straight => (vec![anchor, end], ElementTag::Line),
        };
        let id = host
            .add_curve(&points, tag)
            .map_err(DrawError::HostOperation)?;
        Ok(vec![id])
    }
}
