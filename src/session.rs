use crate::error::{ExtrusionError, Result, RoomcapError};
use crate::extrude::{AdjustHeight, ExtrudeRoom, HeightRange, RoomMaterials, RoomMesh};
use crate::math::{Point2, Point3, UnitQuat};
use crate::polygon::{FloorPolygon, PlacementOutcome};

/// Extrusion height a fresh session starts with.
pub const DEFAULT_HEIGHT: f64 = 1.5;

/// Camera-to-surface distance beyond which placement feedback degrades.
pub const MAX_SURFACE_DISTANCE: f64 = 2.0;

/// How long the proximity warning lingers after the camera moves back in.
pub const WARNING_DURATION: f64 = 1.0;

/// Position and orientation of a detected surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3,
    pub orientation: UnitQuat,
}

/// Surface detection collaborator, injected by the platform layer.
///
/// An implementation casts a ray from a screen-space point into the
/// tracked environment and reports the pose where it meets a detected
/// plane.
pub trait SurfaceProbe {
    /// Returns the surface pose under `screen_point`, if any plane is hit.
    fn hit_test(&self, screen_point: Point2) -> Option<Pose>;
}

/// Phase of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Accepting floor points; no mesh exists yet.
    #[default]
    PlacingFloor,
    /// The loop is closed and the room mesh built; only the height moves.
    AdjustingHeight,
}

/// What a point placement did to the session.
#[derive(Debug)]
pub enum PlaceOutcome {
    /// Point appended to the floor loop.
    Accepted,
    /// Loop closed and the room mesh built; the session now adjusts height.
    Closed,
    /// Point rejected; the loop and any mesh are unchanged. Callers should
    /// show an invalid-placement cue.
    Rejected(RoomcapError),
    /// Capture is already complete; the point was ignored.
    Ignored,
}

/// Warning timer for a camera that has drifted too far from the surface
/// being measured.
///
/// Driven by [`tick`](ProximityWarning::tick) with the frame delta and the
/// current camera distance. The warning activates as long as the distance
/// exceeds the threshold and lingers for [`WARNING_DURATION`] after the
/// condition clears; re-triggering while active just extends the linger.
#[derive(Debug, Clone)]
pub struct ProximityWarning {
    max_distance: f64,
    remaining: f64,
}

impl Default for ProximityWarning {
    fn default() -> Self {
        Self::new(MAX_SURFACE_DISTANCE)
    }
}

impl ProximityWarning {
    #[must_use]
    pub fn new(max_distance: f64) -> Self {
        Self {
            max_distance,
            remaining: 0.0,
        }
    }

    /// Advances the timer by `dt` given the current camera distance.
    pub fn tick(&mut self, dt: f64, camera_distance: f64) {
        if camera_distance > self.max_distance {
            self.remaining = WARNING_DURATION;
        } else {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// Returns true while the warning should be shown.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Deactivates the warning immediately.
    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

/// A room capture from first floor point to adjustable solid.
///
/// Owns the floor loop, the capture phase, and the generated mesh. All
/// geometry flows through here: points placed while
/// [`CaptureState::PlacingFloor`] grow the loop, closure builds the mesh
/// exactly once, and afterwards only [`set_height`](Self::set_height)
/// mutates it.
pub struct CaptureSession {
    polygon: FloorPolygon,
    mesh: Option<RoomMesh>,
    state: CaptureState,
    height: f64,
    range: HeightRange,
    materials: RoomMaterials,
    warning: ProximityWarning,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    /// Creates a session ready for the first floor point.
    #[must_use]
    pub fn new() -> Self {
        Self {
            polygon: FloorPolygon::new(),
            mesh: None,
            state: CaptureState::PlacingFloor,
            height: DEFAULT_HEIGHT,
            range: HeightRange::default(),
            materials: RoomMaterials::default(),
            warning: ProximityWarning::default(),
        }
    }

    /// Assigns the material handles placed on generated surfaces.
    #[must_use]
    pub fn with_materials(mut self, materials: RoomMaterials) -> Self {
        self.materials = materials;
        self
    }

    /// Overrides the default height clamp bounds.
    #[must_use]
    pub fn with_height_range(mut self, range: HeightRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub fn polygon(&self) -> &FloorPolygon {
        &self.polygon
    }

    #[must_use]
    pub fn mesh(&self) -> Option<&RoomMesh> {
        self.mesh.as_ref()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn warning(&self) -> &ProximityWarning {
        &self.warning
    }

    /// Offers a floor point to the session.
    ///
    /// While placing, the point goes to the loop; a closure builds the
    /// room mesh at the current height and moves the session to
    /// [`CaptureState::AdjustingHeight`]. A loop that fails validation at
    /// closure is reported as [`PlaceOutcome::Rejected`] with the error
    /// logged; the loop reopens with its points intact so placement can
    /// continue, and any previously built mesh is untouched.
    pub fn place_point(&mut self, position: Point3) -> PlaceOutcome {
        if self.state == CaptureState::AdjustingHeight {
            return PlaceOutcome::Ignored;
        }

        match self.polygon.try_place(position) {
            Ok(PlacementOutcome::Accepted) => PlaceOutcome::Accepted,
            Ok(PlacementOutcome::Closed) => match self.build_mesh() {
                Ok(mesh) => {
                    self.mesh = Some(mesh);
                    self.state = CaptureState::AdjustingHeight;
                    self.warning.reset();
                    tracing::debug!(points = self.polygon.len(), "floor loop closed, room built");
                    PlaceOutcome::Closed
                }
                Err(err) => {
                    // Closing produced an unusable room; undo the closure
                    // so the user can keep editing the loop.
                    self.polygon.reopen();
                    PlaceOutcome::Rejected(err)
                }
            },
            Err(err) => {
                tracing::debug!(%err, "floor point rejected");
                PlaceOutcome::Rejected(err.into())
            }
        }
    }

    /// Hit-tests `screen_point` through the probe and places the resulting
    /// surface position. Returns `None` when no plane is under the point.
    pub fn place_at_screen(
        &mut self,
        probe: &dyn SurfaceProbe,
        screen_point: Point2,
    ) -> Option<PlaceOutcome> {
        let pose = probe.hit_test(screen_point)?;
        Some(self.place_point(pose.position))
    }

    /// Changes the extrusion height, clamped to the session's range, and
    /// re-targets the built mesh in place if one exists. Safe to call
    /// every frame while a slider is dragged.
    ///
    /// # Errors
    ///
    /// Returns [`ExtrusionError::NonFiniteHeight`] for NaN or infinite
    /// input; neither the stored height nor the mesh change.
    pub fn set_height(&mut self, height: f64) -> Result<()> {
        if !height.is_finite() {
            return Err(ExtrusionError::NonFiniteHeight { value: height }.into());
        }
        self.height = self.range.clamp(height);
        if let Some(mesh) = &mut self.mesh {
            AdjustHeight::new(self.height)
                .with_range(self.range)
                .apply(mesh)?;
        }
        Ok(())
    }

    /// Per-frame update: drives the proximity warning from the camera's
    /// distance to the placement surface. Only relevant while placing
    /// floor points; afterwards the warning stays off.
    pub fn tick(&mut self, dt: f64, camera_distance: f64) {
        if self.state == CaptureState::PlacingFloor {
            self.warning.tick(dt, camera_distance);
        } else {
            self.warning.reset();
        }
    }

    /// Discards everything and starts a fresh capture.
    pub fn restart(&mut self) {
        self.polygon.clear();
        self.mesh = None;
        self.state = CaptureState::PlacingFloor;
        self.height = DEFAULT_HEIGHT;
        self.warning.reset();
    }

    fn build_mesh(&self) -> Result<RoomMesh> {
        let mut mesh = ExtrudeRoom::new(&self.polygon, self.height)
            .with_range(self.range)
            .with_materials(self.materials)
            .execute()?;
        // The extruder lifts tops relative to each base vertex; align them
        // to the absolute session height right away so the first height
        // event does not move a floor captured off the ground plane.
        AdjustHeight::new(self.height)
            .with_range(self.range)
            .apply(&mut mesh)?;
        Ok(mesh)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    struct FixedProbe(Option<Pose>);

    impl SurfaceProbe for FixedProbe {
        fn hit_test(&self, _screen_point: Point2) -> Option<Pose> {
            self.0
        }
    }

    fn captured_square() -> CaptureSession {
        let mut session = CaptureSession::new();
        for pt in [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)] {
            assert!(matches!(session.place_point(pt), PlaceOutcome::Accepted));
        }
        assert!(matches!(
            session.place_point(p(0.02, 0.0)),
            PlaceOutcome::Closed
        ));
        session
    }

    // ── Capture flow ───────────────────────────────────────────

    #[test]
    fn closure_builds_exactly_one_mesh() {
        let session = captured_square();
        assert_eq!(session.state(), CaptureState::AdjustingHeight);
        let mesh = session.mesh().unwrap();
        assert_eq!(mesh.walls.vertices.len(), 8);
        for v in &mesh.ceiling.vertices {
            assert_relative_eq!(v.y, DEFAULT_HEIGHT);
        }
    }

    #[test]
    fn completed_session_ignores_points() {
        let mut session = captured_square();
        assert!(matches!(
            session.place_point(p(5.0, 5.0)),
            PlaceOutcome::Ignored
        ));
        assert_eq!(session.polygon().len(), 4);
    }

    #[test]
    fn rejected_point_leaves_loop_unchanged() {
        let mut session = CaptureSession::new();
        session.place_point(p(0.0, 0.0));
        session.place_point(p(4.0, 0.0));
        session.place_point(p(4.0, 4.0));
        let outcome = session.place_point(p(2.0, -2.0));
        assert!(matches!(outcome, PlaceOutcome::Rejected(_)));
        assert_eq!(session.polygon().len(), 3);
        assert_eq!(session.state(), CaptureState::PlacingFloor);
        assert!(session.mesh().is_none());
    }

    #[test]
    fn rejected_closure_reopens_the_loop() {
        // Simple placements whose closing edge would cross edge 1.
        let mut session = CaptureSession::new();
        for pt in [p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0), p(2.0, 2.0)] {
            assert!(matches!(session.place_point(pt), PlaceOutcome::Accepted));
        }
        let outcome = session.place_point(p(0.02, 0.0));
        assert!(matches!(outcome, PlaceOutcome::Rejected(_)));

        // The failed closure must not strand the session: the loop is
        // open again and keeps accepting points.
        assert!(!session.polygon().is_closed());
        assert_eq!(session.state(), CaptureState::PlacingFloor);
        assert!(session.mesh().is_none());
        assert!(matches!(
            session.place_point(p(3.0, 3.0)),
            PlaceOutcome::Accepted
        ));
        assert_eq!(session.polygon().len(), 5);
    }

    #[test]
    fn probe_miss_places_nothing() {
        let mut session = CaptureSession::new();
        let probe = FixedProbe(None);
        assert!(session
            .place_at_screen(&probe, Point2::new(0.5, 0.5))
            .is_none());
        assert!(session.polygon().is_empty());
    }

    #[test]
    fn probe_hit_places_the_surface_point() {
        let mut session = CaptureSession::new();
        let probe = FixedProbe(Some(Pose {
            position: p(1.0, 2.0),
            orientation: UnitQuat::identity(),
        }));
        let outcome = session.place_at_screen(&probe, Point2::new(0.5, 0.5));
        assert!(matches!(outcome, Some(PlaceOutcome::Accepted)));
        assert_eq!(session.polygon().points()[0], p(1.0, 2.0));
    }

    // ── Height adjustment ──────────────────────────────────────

    #[test]
    fn set_height_retargets_the_mesh() {
        let mut session = captured_square();
        session.set_height(2.5).unwrap();
        assert_relative_eq!(session.height(), 2.5);
        for v in &session.mesh().unwrap().ceiling.vertices {
            assert_relative_eq!(v.y, 2.5);
        }
    }

    #[test]
    fn elevated_floor_does_not_jump_on_first_height_event() {
        // Floor captured half a unit above the world origin.
        let mut session = CaptureSession::new();
        for (x, z) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)] {
            session.place_point(Point3::new(x, 0.5, z));
        }
        assert!(matches!(
            session.place_point(Point3::new(0.02, 0.5, 0.0)),
            PlaceOutcome::Closed
        ));

        // Tops already sit at the absolute session height, so re-applying
        // the same height moves nothing.
        let before = session.mesh().unwrap().clone();
        for v in &before.ceiling.vertices {
            assert_relative_eq!(v.y, DEFAULT_HEIGHT);
        }
        session.set_height(DEFAULT_HEIGHT).unwrap();
        assert_eq!(session.mesh().unwrap(), &before);
    }

    #[test]
    fn set_height_clamps_to_range() {
        let mut session = captured_square();
        session.set_height(10.0).unwrap();
        assert_relative_eq!(session.height(), 3.0);
        session.set_height(0.0).unwrap();
        assert_relative_eq!(session.height(), 0.1);
    }

    #[test]
    fn set_height_before_closure_just_stores() {
        let mut session = CaptureSession::new();
        session.set_height(2.0).unwrap();
        assert_relative_eq!(session.height(), 2.0);
        assert!(session.mesh().is_none());
    }

    #[test]
    fn set_height_rejects_non_finite() {
        let mut session = captured_square();
        assert!(session.set_height(f64::NAN).is_err());
        assert_relative_eq!(session.height(), DEFAULT_HEIGHT);
    }

    // ── Restart ────────────────────────────────────────────────

    #[test]
    fn restart_discards_everything() {
        let mut session = captured_square();
        session.set_height(2.5).unwrap();
        session.restart();
        assert_eq!(session.state(), CaptureState::PlacingFloor);
        assert!(session.mesh().is_none());
        assert!(session.polygon().is_empty());
        assert_relative_eq!(session.height(), DEFAULT_HEIGHT);
        assert!(matches!(
            session.place_point(p(0.0, 0.0)),
            PlaceOutcome::Accepted
        ));
    }

    // ── Proximity warning ──────────────────────────────────────

    #[test]
    fn warning_activates_when_too_far() {
        let mut warning = ProximityWarning::default();
        assert!(!warning.is_active());
        warning.tick(0.016, 3.0);
        assert!(warning.is_active());
    }

    #[test]
    fn warning_lingers_then_expires() {
        let mut warning = ProximityWarning::default();
        warning.tick(0.016, 3.0);
        // Camera back within range: active through the linger window.
        warning.tick(0.5, 1.0);
        assert!(warning.is_active());
        warning.tick(0.6, 1.0);
        assert!(!warning.is_active());
    }

    #[test]
    fn retrigger_extends_the_warning() {
        let mut warning = ProximityWarning::default();
        warning.tick(0.016, 3.0);
        warning.tick(0.9, 1.0);
        // Still active, and drifting out again restarts the window.
        warning.tick(0.016, 3.0);
        warning.tick(0.9, 1.0);
        assert!(warning.is_active());
    }

    #[test]
    fn session_stops_warning_after_closure() {
        let mut session = captured_square();
        session.tick(0.016, 5.0);
        assert!(!session.warning().is_active());
    }

    #[test]
    fn session_warns_while_placing() {
        let mut session = CaptureSession::new();
        session.place_point(p(0.0, 0.0));
        session.tick(0.016, 5.0);
        assert!(session.warning().is_active());
    }
}
