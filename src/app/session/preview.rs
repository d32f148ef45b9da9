//! Vorschau der Sitzung für den Render-Tick des Hosts.

use super::state::{Direction, DrawSession};
use crate::app::preview::{PrimitiveKind, ToolPreview};
use crate::core::{circular_arc, default_smoothing, midpoint, tessellate, DEGENERATE_LENGTH};
use crate::shared::options::{GUIDE_COLOR, PIPE_PREVIEW_COLOR};

impl DrawSession {
    /// Baut die Draw-Liste für den aktuellen Zustand (leer ohne Anker oder Cursor).
    pub fn preview(&self) -> ToolPreview {
        let mut preview = ToolPreview::default();
        let (Some(anchor), Some(cursor)) = (self.anchor(), self.cursor) else {
            return preview;
        };
        let width = self.options.preview_line_width;
        let segments = self.options.bezier_segments;

        // Achs-Hilfslinie
        if let Direction::Locked(axis) = self.direction {
            if let Some(dir) = axis.unit_vector() {
                let reach = dir * self.options.axis_guide_length;
                preview.push(
                    PrimitiveKind::Lines,
                    vec![anchor - reach, anchor + reach],
                    axis.color(),
                    self.options.locked_axis_line_width,
                );
            }
        }

        if self.arc_mode {
            if let Some(control) = self.bezier_control {
                let end = self
                    .override_end
                    .unwrap_or_else(|| self.arc_endpoint(anchor, cursor));
                // Rohr: Kreisbogen durch den Pfad, den der Host fittet
                let points = if self.features.pipe {
                    self.pipe_builder
                        .build_segment(anchor, end, self.arc_bulge, &self.camera)
                        .map(|segment| match segment.path.as_slice() {
                            &[start, apex, finish] => circular_arc(start, apex, finish, segments)
                                .unwrap_or_else(|| segment.path.clone()),
                            _ => segment.path.clone(),
                        })
                } else {
                    tessellate(anchor, end, control, segments).ok()
                };
                if let Some(points) = points {
                    preview.push(PrimitiveKind::LineStrip, points, self.color, width);
                }
                preview.push_stippled(vec![anchor, end], GUIDE_COLOR, 1.0);
                preview.push_stippled(vec![midpoint(anchor, end), control], GUIDE_COLOR, 1.0);
                preview.length = Some(anchor.distance(end));
                return preview;
            }
        }

        let end = self
            .override_end
            .unwrap_or_else(|| self.locked_endpoint(anchor, cursor));
        let length = anchor.distance(end);
        preview.length = Some(length);

        if self.features.pipe {
            if let Some(wire) = self.pipe_builder.preview_cylinder(anchor, end) {
                for mut ring in [wire.start_ring, wire.end_ring] {
                    // LineLoop schließt selbst
                    ring.pop();
                    preview.push(PrimitiveKind::LineLoop, ring, PIPE_PREVIEW_COLOR, width);
                }
                let edges = wire.edges.into_iter().flatten().collect();
                preview.push(PrimitiveKind::Lines, edges, PIPE_PREVIEW_COLOR, width);
            }
            preview.push(PrimitiveKind::Lines, vec![anchor, end], self.color, width);
        } else if self.features.default_smoothing && length > DEGENERATE_LENGTH {
            let smoothed = default_smoothing(
                anchor,
                length,
                end - anchor,
                &self.camera,
                self.options.sagitta_factor,
            )
            .and_then(|control| tessellate(anchor, end, control, segments));
            match smoothed {
                Ok(points) => preview.push(PrimitiveKind::LineStrip, points, self.color, width),
                Err(_) => preview.push(PrimitiveKind::Lines, vec![anchor, end], self.color, width),
            }
        } else {
            preview.push(PrimitiveKind::Lines, vec![anchor, end], self.color, width);
        }
        preview
    }
}
