//! Event-Verarbeitung der Zeichen-Sitzung (Zustandsübergänge).

use super::geometry::SegmentShape;
use super::state::{Direction, DrawSession, SessionAction};
use crate::app::events::{Key, ToolEvent};
use crate::app::host::{ElementTag, SceneHost};
use crate::core::{
    chord_bulge, control_point_with_bulge, is_length_input_char, parse_typed_value, AxisLock, Camera,
    DrawError, Point3, Result, TypedValue, DEGENERATE_LENGTH, X_AXIS,
};
use crate::shared::options::{ARC_MODE_COLOR, FREE_DIRECTION_COLOR};

impl DrawSession {
    /// Verarbeitet ein Host-Event.
    pub fn handle_event(
        &mut self,
        event: &ToolEvent,
        host: &mut dyn SceneHost,
    ) -> Result<SessionAction> {
        if !self.active && *event != ToolEvent::Activate {
            return Ok(SessionAction::Ignored);
        }
        match event {
            ToolEvent::Activate => Ok(self.activate()),
            ToolEvent::Deactivate => self.deactivate(host),
            ToolEvent::PointerMove { point } => Ok(self.on_pointer_move(*point)),
            ToolEvent::Click { point } => self.on_click(*point, host),
            ToolEvent::KeyDown { key } => self.on_key_down(*key, host),
            ToolEvent::KeyUp { key } => Ok(self.on_key_up(*key)),
            ToolEvent::TypeChar { ch } => Ok(self.on_type_char(*ch)),
            ToolEvent::TextCommit { text } => self.on_text_commit(text, host),
            ToolEvent::CameraChanged { camera } => Ok(self.set_camera(*camera)),
            ToolEvent::UndoPoint => self.undo_point(host),
            ToolEvent::Finish => self.finish(host),
            ToolEvent::Cancel => self.cancel(host),
        }
    }

    /// (Re-)Aktiviert das Werkzeug mit leerem Zustand.
    pub fn activate(&mut self) -> SessionAction {
        if !self.active {
            log::info!("Zeichen-Sitzung reaktiviert");
        }
        self.active = true;
        self.reset();
        SessionAction::Updated
    }

    /// Schließt die laufende Kette ab und deaktiviert das Werkzeug.
    pub fn deactivate(&mut self, host: &mut dyn SceneHost) -> Result<SessionAction> {
        let result = self.finish(host);
        self.active = false;
        log::info!("Zeichen-Sitzung deaktiviert");
        result
    }

    pub fn set_camera(&mut self, camera: Camera) -> SessionAction {
        self.camera = camera;
        self.refresh_from_cursor();
        SessionAction::Updated
    }

    pub fn on_pointer_move(&mut self, point: Point3) -> SessionAction {
        self.cursor = Some(point);
        match self.anchor() {
            Some(anchor) => {
                self.refresh_direction(anchor, point);
                SessionAction::Updated
            }
            None => SessionAction::Ignored,
        }
    }

    pub fn on_click(&mut self, point: Point3, host: &mut dyn SceneHost) -> Result<SessionAction> {
        self.cursor = Some(point);
        let Some(anchor) = self.anchor() else {
            self.begin_transaction(host)?;
            self.chain_elements.clear();
            self.chain_segments = 0;
            self.push_anchor(point);
            log::info!("Startpunkt gesetzt: {:?}", point);
            return Ok(SessionAction::AnchorPlaced);
        };

        self.refresh_direction(anchor, point);
        let (end, shape) = if self.arc_mode {
            let end = self
                .override_end
                .unwrap_or_else(|| self.arc_endpoint(anchor, point));
            let control = control_point_with_bulge(anchor, end, self.arc_bulge, &self.camera);
            (
                end,
                SegmentShape::Arc {
                    control,
                    bulge: self.arc_bulge,
                },
            )
        } else {
            let end = self
                .override_end
                .unwrap_or_else(|| self.locked_endpoint(anchor, point));
            (end, SegmentShape::Straight)
        };
        if !self.features.pipe && anchor.distance(end) < DEGENERATE_LENGTH {
            return self.mark_point(anchor, host);
        }
        self.commit_segment(anchor, end, shape, host)
    }

    pub fn on_key_down(&mut self, key: Key, host: &mut dyn SceneHost) -> Result<SessionAction> {
        match key {
            Key::Escape => self.cancel(host),
            Key::Shift => {
                self.constrain_held = true;
                self.refresh_from_cursor();
                Ok(SessionAction::Updated)
            }
            Key::Enter => {
                if self.pending_text.is_empty() {
                    self.finish(host)
                } else {
                    self.on_text_commit("", host)
                }
            }
            Key::Backspace => {
                if self.pending_text.pop().is_some() {
                    self.refresh_override();
                    Ok(SessionAction::Updated)
                } else {
                    self.undo_point(host)
                }
            }
            Key::ArrowRight | Key::ArrowLeft | Key::ArrowUp | Key::ArrowDown => {
                let Some(requested) = key.axis_lock() else {
                    return Ok(SessionAction::Ignored);
                };
                if !self.features.axis_lock {
                    return Ok(SessionAction::Ignored);
                }
                Ok(self.toggle_axis_lock(requested))
            }
        }
    }

    pub fn on_key_up(&mut self, key: Key) -> SessionAction {
        if key == Key::Shift {
            self.constrain_held = false;
            self.refresh_from_cursor();
            SessionAction::Updated
        } else {
            SessionAction::Ignored
        }
    }

    /// Hängt ein Zeichen an den Eingabepuffer an.
    pub fn on_type_char(&mut self, ch: char) -> SessionAction {
        if !self.features.typed_length || !is_length_input_char(ch) {
            return SessionAction::Ignored;
        }
        self.pending_text.push(ch);
        self.refresh_override();
        SessionAction::Updated
    }

    /// Bestätigt eine Längen- oder Bulge-Eingabe (leerer Text = Eingabepuffer).
    ///
    /// Ungültige Eingaben lassen den Zustand unverändert.
    pub fn on_text_commit(&mut self, text: &str, host: &mut dyn SceneHost) -> Result<SessionAction> {
        if !self.features.typed_length {
            return Ok(SessionAction::Ignored);
        }
        let Some(anchor) = self.anchor() else {
            return Ok(SessionAction::Ignored);
        };

        let source = if text.trim().is_empty() {
            self.pending_text.clone()
        } else {
            text.to_string()
        };
        let value = parse_typed_value(self.parser.as_ref(), &source).inspect_err(|e| {
            log::warn!("Eingabe abgelehnt: {}", e);
        })?;

        let (end, shape) = match value {
            TypedValue::Length(length) => {
                let dir = self.current_direction_vector(anchor).unwrap_or(X_AXIS);
                let end = anchor + dir * length;
                if self.arc_mode && self.bezier_control.is_some() {
                    // Gegriffene Wölbung bleibt erhalten, Steuerpunkt folgt der neuen Sehne
                    let control =
                        control_point_with_bulge(anchor, end, self.arc_bulge, &self.camera);
                    (
                        end,
                        SegmentShape::Arc {
                            control,
                            bulge: self.arc_bulge,
                        },
                    )
                } else {
                    (end, SegmentShape::Straight)
                }
            }
            TypedValue::Bulge(magnitude) => {
                if !self.features.arc_mode {
                    let err = DrawError::Parse("Bogen-Eingabe ist für dieses Werkzeug deaktiviert".into());
                    log::warn!("Eingabe abgelehnt: {}", err);
                    return Err(err);
                }
                let end = match (self.override_end, self.cursor) {
                    (Some(end), _) => end,
                    (None, Some(cursor)) if self.arc_mode => self.arc_endpoint(anchor, cursor),
                    (None, Some(cursor)) => self.locked_endpoint(anchor, cursor),
                    (None, None) => {
                        let err =
                            DrawError::Parse("Bulge braucht einen Endpunkt (Cursor bewegen)".into());
                        log::warn!("Eingabe abgelehnt: {}", err);
                        return Err(err);
                    }
                };
                let bulge = if self.arc_bulge < 0.0 {
                    -magnitude
                } else {
                    magnitude
                };
                let control = control_point_with_bulge(anchor, end, bulge, &self.camera);
                (end, SegmentShape::Arc { control, bulge })
            }
        };

        // Puffer und Override leert erst der erfolgreiche Commit (neuer Anker)
        self.commit_segment(anchor, end, shape, host)
    }

    /// Nimmt den letzten Ankerpunkt zurück; bereits erzeugte Geometrie bleibt bestehen.
    pub fn undo_point(&mut self, host: &mut dyn SceneHost) -> Result<SessionAction> {
        if self.history.pop_back().is_none() {
            return Ok(SessionAction::Ignored);
        }
        match self.history.back().copied() {
            Some(previous) => {
                self.points = vec![previous];
                self.reset_transients();
                self.refresh_from_cursor();
                log::debug!("Letzter Punkt zurückgenommen, Anker: {:?}", previous);
                Ok(SessionAction::Updated)
            }
            None => self.finish(host),
        }
    }

    /// Schließt die Kette ab: Rohr-Gruppe bestätigen, leere Operation verwerfen.
    pub fn finish(&mut self, host: &mut dyn SceneHost) -> Result<SessionAction> {
        if self.transaction_open {
            if self.features.pipe && !self.chain_elements.is_empty() {
                let elements = self.chain_elements.clone();
                if let Err(e) = host.group(&elements, "Rohr", ElementTag::Pipe) {
                    return Err(self.fail(host, DrawError::HostOperation(e)));
                }
                if let Err(e) = host.commit_operation() {
                    return Err(self.fail(host, DrawError::HostOperation(e)));
                }
                log::info!("Rohr mit {} Segment(en) erstellt", self.chain_segments);
            } else if let Err(e) = host.abort_operation() {
                self.reset();
                log::error!("Leere Operation konnte nicht verworfen werden: {:#}", e);
                return Err(DrawError::HostOperation(e));
            }
            self.transaction_open = false;
        }
        if self.chain_segments > 0 {
            log::info!("Kette abgeschlossen ({} Segment(e))", self.chain_segments);
        }
        self.reset();
        Ok(SessionAction::Finished)
    }

    /// Verwirft den Sitzungszustand und bricht die offene Operation ab.
    pub fn cancel(&mut self, host: &mut dyn SceneHost) -> Result<SessionAction> {
        let aborted = if self.transaction_open {
            host.abort_operation()
        } else {
            Ok(())
        };
        self.reset();
        match aborted {
            Ok(()) => {
                log::info!("Zeichnen abgebrochen");
                Ok(SessionAction::Cancelled)
            }
            Err(e) => {
                log::error!("Abbruch der Operation fehlgeschlagen: {:#}", e);
                Err(DrawError::HostOperation(e))
            }
        }
    }

    // ── Interne Übergänge ───────────────────────────────────────

    pub(crate) fn anchor(&self) -> Option<Point3> {
        self.points.last().copied()
    }

    fn toggle_axis_lock(&mut self, requested: AxisLock) -> SessionAction {
        self.forced_lock = self.forced_lock.toggled(requested);
        self.leave_arc_mode();
        // Sperre und Bogen schließen sich aus: Shift muss neu gedrückt werden
        self.constrain_held = false;
        self.direction = if self.forced_lock.is_locked() {
            Direction::Locked(self.forced_lock)
        } else {
            Direction::Undetermined
        };
        log::debug!("Achsen-Sperre: {}", self.forced_lock.label());
        self.refresh_from_cursor();
        SessionAction::Updated
    }

    pub(crate) fn refresh_from_cursor(&mut self) {
        if let (Some(anchor), Some(cursor)) = (self.anchor(), self.cursor) {
            self.refresh_direction(anchor, cursor);
        }
    }

    /// Bestimmt Richtung bzw. Bogen-Steuerpunkt für den aktuellen Cursor neu.
    pub(crate) fn refresh_direction(&mut self, anchor: Point3, cursor: Point3) {
        let arc_allowed = self.constrain_held && self.features.arc_mode && self.points.len() == 1;

        if arc_allowed {
            if !self.arc_mode {
                self.arc_chord = self.direction.vector();
                self.arc_mode = true;
                self.forced_lock = AxisLock::None;
                log::debug!("Bogen-Modus aktiv");
            }
            // Shift vor der ersten Bewegung: Sehne mit dem ersten Cursor-Versatz festlegen
            if self.arc_chord.is_none() {
                self.arc_chord = (cursor - anchor).try_normalize();
            }
            self.direction = Direction::Undetermined;
            self.refresh_override();
            let end = self
                .override_end
                .unwrap_or_else(|| self.arc_endpoint(anchor, cursor));
            self.arc_bulge =
                chord_bulge(anchor, end, cursor, &self.camera) * self.options.amplify_factor;
            self.bezier_control = Some(control_point_with_bulge(
                anchor,
                end,
                self.arc_bulge,
                &self.camera,
            ));
            self.color = ARC_MODE_COLOR;
        } else {
            self.leave_arc_mode();
            if self.forced_lock.is_locked() {
                self.direction = Direction::Locked(self.forced_lock);
                self.color = self.forced_lock.color();
            } else {
                self.direction = self.infer_direction(anchor, cursor);
                self.color = match self.direction {
                    Direction::Locked(axis) => axis.color(),
                    _ => FREE_DIRECTION_COLOR,
                };
            }
            self.refresh_override();
        }
    }

    pub(crate) fn leave_arc_mode(&mut self) {
        if self.arc_mode {
            log::debug!("Bogen-Modus beendet");
        }
        self.arc_mode = false;
        self.arc_chord = None;
        self.bezier_control = None;
        self.arc_bulge = 0.0;
    }

    /// Endpunkt aus dem Eingabepuffer neu berechnen (nur gültige Längen).
    pub(crate) fn refresh_override(&mut self) {
        self.override_end = None;
        if self.pending_text.is_empty() || !self.features.typed_length {
            return;
        }
        let Some(anchor) = self.anchor() else {
            return;
        };
        if let Ok(TypedValue::Length(length)) =
            parse_typed_value(self.parser.as_ref(), &self.pending_text)
        {
            if let Some(dir) = self.current_direction_vector(anchor) {
                self.override_end = Some(anchor + dir * length);
            }
        }
    }

    /// Neuer Anker: Kette zurücksetzen, Historie fortschreiben.
    pub(crate) fn push_anchor(&mut self, point: Point3) {
        self.points = vec![point];
        self.history.push_back(point);
        while self.history.len() > self.options.point_history_depth {
            self.history.pop_front();
        }
        self.reset_transients();
    }

    /// Setzt Sperre, Bogen, Eingabepuffer und Override zurück.
    pub(crate) fn reset_transients(&mut self) {
        self.forced_lock = AxisLock::None;
        self.direction = Direction::Undetermined;
        self.leave_arc_mode();
        self.pending_text.clear();
        self.override_end = None;
        self.color = FREE_DIRECTION_COLOR;
    }

    /// Zurück zu Idle (Kamera, Cursor und Aktivierung bleiben erhalten).
    pub(crate) fn reset(&mut self) {
        self.points.clear();
        self.history.clear();
        self.transaction_open = false;
        self.chain_segments = 0;
        self.chain_elements.clear();
        self.reset_transients();
    }
}
