//! Verschieben eines Elements per Maus-Ziehen.
//!
//! Der Pick-Strahl wird mit der Ebene durch den Greifpunkt geschnitten,
//! deren Normale die Blickrichtung der Kamera ist. Jeder Zieh-Schritt
//! verschiebt um den Versatz zum vorherigen Schnittpunkt.

use crate::app::host::{ElementId, SceneHost};
use crate::core::{intersect_line_plane, try_normalize, Camera, DrawError, Point3, Result, Vector3};

/// Laufendes Verschieben (eine offene Host-Operation "Objekt verschieben").
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDrag {
    element: ElementId,
    /// Letzter Schnittpunkt auf der Zieh-Ebene
    grab_point: Point3,
    plane_normal: Vector3,
    total: Vector3,
    open: bool,
}

impl MoveDrag {
    /// Greift `element` am Punkt `grab_point` und öffnet die Operation.
    pub fn begin(
        element: ElementId,
        grab_point: Point3,
        camera: &Camera,
        host: &mut dyn SceneHost,
    ) -> Result<Self> {
        let plane_normal = try_normalize(camera.direction).ok_or_else(|| {
            DrawError::InvalidArgument("Blickrichtung der Kamera hat keine Länge".into())
        })?;
        host.begin_operation("Objekt verschieben")
            .map_err(DrawError::HostOperation)?;
        log::info!("Verschieben von Element {} gestartet", element);
        Ok(Self {
            element,
            grab_point,
            plane_normal,
            total: Vector3::ZERO,
            open: true,
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Bisheriger Gesamtversatz.
    pub fn total_offset(&self) -> Vector3 {
        self.total
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Zieht das Element zum Schnittpunkt des Pick-Strahls mit der Zieh-Ebene.
    ///
    /// Ein Strahl parallel zur Ebene hat keine Wirkung (`Ok(None)`).
    pub fn drag(
        &mut self,
        ray_origin: Point3,
        ray_direction: Vector3,
        host: &mut dyn SceneHost,
    ) -> Result<Option<Vector3>> {
        self.ensure_open()?;
        let Some(point) =
            intersect_line_plane(ray_origin, ray_direction, self.grab_point, self.plane_normal)
        else {
            return Ok(None);
        };
        let delta = point - self.grab_point;
        if let Err(e) = host.translate(self.element, delta) {
            return Err(self.abort(host, DrawError::HostOperation(e)));
        }
        self.grab_point = point;
        self.total += delta;
        Ok(Some(delta))
    }

    /// Maustaste losgelassen: Operation bestätigen.
    pub fn finish(mut self, host: &mut dyn SceneHost) -> Result<Vector3> {
        self.ensure_open()?;
        if let Err(e) = host.commit_operation() {
            return Err(self.abort(host, DrawError::HostOperation(e)));
        }
        self.open = false;
        log::info!("Element {} verschoben um {:?}", self.element, self.total);
        Ok(self.total)
    }

    /// Bricht ab; der Host nimmt alle Zieh-Schritte zurück.
    pub fn cancel(mut self, host: &mut dyn SceneHost) -> Result<()> {
        self.ensure_open()?;
        self.open = false;
        host.abort_operation().map_err(DrawError::HostOperation)
    }

    fn abort(&mut self, host: &mut dyn SceneHost, err: DrawError) -> DrawError {
        log::error!("{}", err);
        self.open = false;
        if let Err(e) = host.abort_operation() {
            log::error!("Abbruch der Operation fehlgeschlagen: {:#}", e);
        }
        err
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(DrawError::InvalidArgument(
                "Verschieben ist bereits beendet".into(),
            ))
        }
    }
}
