use std::sync::atomic::{AtomicU64, Ordering};

use foundation::math::{Geodetic, Vec3, geodetic_to_ecef, surface_normal, surface_point};
use runtime::event_bus::{EventBus, kinds};
use runtime::frame::Frame;
use streaming::gate::{GateKind, GateSet, LockToken};

use crate::camera::{Basis, CameraPose, Projection};
use crate::flight::{FlightPlan, FlightTarget, plan_flight};
use crate::geodetic::GeodeticTracker;
use crate::settings::NavigationSettings;
use crate::terrain::{ContactState, TerrainProvider};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Flight executor state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlightState {
    Idle,
    Flying,
}

/// Single-slot flight callback; replaced, never queued.
pub type FlightCallback = Box<dyn FnOnce()>;

/// Destination of a fly request.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FlyTarget {
    Cartesian(Vec3),
    Geodetic(Geodetic),
}

impl FlyTarget {
    fn position(self) -> Vec3 {
        match self {
            FlyTarget::Cartesian(p) => p,
            FlyTarget::Geodetic(geo) => geodetic_to_ecef(geo).to_vec3(),
        }
    }
}

/// Optional parts of a fly request.
#[derive(Default)]
pub struct FlyOptions {
    /// Look target at arrival; the globe center when unset.
    pub look: Option<Vec3>,
    /// Up hint at arrival; world up when unset.
    pub up: Option<Vec3>,
    /// Invoked synchronously when the flight starts.
    pub on_start: Option<FlightCallback>,
    /// Invoked exactly once at natural completion; dropped unfired on
    /// interruption or replacement.
    pub on_complete: Option<FlightCallback>,
}

/// The navigation core: camera pose + geodetic tracking + flight execution
/// + terrain following, stepped once per render frame.
pub struct Navigator {
    settings: NavigationSettings,
    camera: CameraPose,
    tracker: GeodeticTracker,
    contact: ContactState,
    plan: Option<FlightPlan>,
    token: LockToken,
    on_complete: Option<FlightCallback>,
}

impl Navigator {
    pub fn new(settings: NavigationSettings, projection: Projection) -> Self {
        let camera = CameraPose::new(projection);
        let mut tracker = GeodeticTracker::new();
        tracker.update_from_eye(camera.eye());

        Self {
            settings,
            camera,
            tracker,
            contact: ContactState::new(),
            plan: None,
            token: LockToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed)),
            on_complete: None,
        }
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn contact(&self) -> &ContactState {
        &self.contact
    }

    /// This camera's private claim key on the streaming gates.
    pub fn lock_token(&self) -> LockToken {
        self.token
    }

    pub fn state(&self) -> FlightState {
        if self.plan.is_some() {
            FlightState::Flying
        } else {
            FlightState::Idle
        }
    }

    pub fn is_flying(&self) -> bool {
        self.plan.is_some()
    }

    pub fn flight_plan(&self) -> Option<&FlightPlan> {
        self.plan.as_ref()
    }

    pub fn position_geodetic(&self) -> Geodetic {
        self.tracker.geodetic()
    }

    /// Mercator form of the current position; `None` outside the band.
    pub fn position_mercator(&self) -> Option<foundation::math::Mercator> {
        self.tracker.mercator()
    }

    /// Replace the pose wholesale and re-derive everything from it.
    pub fn set_pose(&mut self, eye: Vec3, basis: Basis, frame: Frame, bus: &mut EventBus) {
        self.camera.set_pose(eye, basis);
        self.camera.recompute_derived(frame, bus);
        self.tracker.update_from_eye(eye);
    }

    /// Place the camera at a geographic location, looking at the local
    /// nadir.
    pub fn set_position_geodetic(&mut self, geo: Geodetic, frame: Frame, bus: &mut EventBus) {
        let eye = geodetic_to_ecef(geo).to_vec3();
        let down = surface_point(geo).to_vec3();
        let basis = Basis::from_look(eye, down, Vec3::UP);
        self.set_pose(eye, basis, frame, bus);
    }

    /// Reposition the eye along the local surface normal so it sits `alt`
    /// above the current terrain contact point.
    pub fn set_altitude(&mut self, alt: f64, frame: Frame, bus: &mut EventBus) {
        let geo = self.tracker.geodetic();
        let normal = surface_normal(geo);
        let terrain_point = match self.contact.altitude {
            Some(sampled) => self.camera.eye() - normal * sampled,
            None => surface_point(geo).to_vec3(),
        };
        let eye = terrain_point + normal * alt;
        let basis = self.camera.basis();
        self.set_pose(eye, basis, frame, bus);
        self.contact.altitude = Some(alt);
    }

    /// Start a flight. Any flight already in progress is cancelled first,
    /// silently; the new request's start callback runs synchronously.
    pub fn fly_to(
        &mut self,
        target: FlyTarget,
        mut opts: FlyOptions,
        frame: Frame,
        gates: &mut GateSet,
        bus: &mut EventBus,
    ) {
        self.stop_flying(frame, gates, bus);

        if let Some(on_start) = opts.on_start.take() {
            on_start();
        }

        let flight_target = FlightTarget {
            position: target.position(),
            look: opts.look,
            up: opts.up,
        };
        let plan = plan_flight(
            self.camera.eye(),
            self.camera.basis(),
            self.tracker.geodetic(),
            flight_target,
            &self.settings,
        );

        gates.lock_all(self.token);
        for kind in GateKind::ALL {
            bus.emit(frame, kinds::GATE_LOCKED, kind.name());
        }

        self.on_complete = opts.on_complete.take();
        self.plan = Some(plan);
        bus.emit(frame, kinds::FLIGHT_STARTED, "flight plan armed");
    }

    /// Cancel any flight in progress. Safe to call when idle; never fires
    /// the completion callback.
    pub fn stop_flying(&mut self, frame: Frame, gates: &mut GateSet, bus: &mut EventBus) {
        if self.plan.take().is_none() {
            return;
        }
        self.release_gates(frame, gates, bus);
        self.on_complete = None;
        bus.emit(frame, kinds::FLIGHT_STOPPED, "flight interrupted");
    }

    /// Advance one render tick: consume the next flight frame, or follow
    /// terrain when idle.
    pub fn tick(
        &mut self,
        frame: Frame,
        terrain: &mut dyn TerrainProvider,
        gates: &mut GateSet,
        bus: &mut EventBus,
    ) {
        self.tracker.update_from_eye(self.camera.eye());

        if self.plan.is_some() {
            // Position is authoritative from the plan while flying; terrain
            // following stays suspended.
            let pose = self.plan.as_mut().and_then(FlightPlan::take_next);
            let exhausted = self.plan.as_ref().is_none_or(FlightPlan::is_exhausted);
            match pose {
                Some(pose) => {
                    self.set_pose(pose.eye, pose.basis(), frame, bus);
                    if exhausted {
                        self.finish_flight(frame, gates, bus);
                    }
                }
                None => self.finish_flight(frame, gates, bus),
            }
            return;
        }

        self.follow_terrain(frame, terrain, bus);
    }

    fn finish_flight(&mut self, frame: Frame, gates: &mut GateSet, bus: &mut EventBus) {
        self.plan = None;
        self.release_gates(frame, gates, bus);
        bus.emit(frame, kinds::FLIGHT_COMPLETED, "arrived");
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }

    fn release_gates(&mut self, frame: Frame, gates: &mut GateSet, bus: &mut EventBus) {
        gates.free_all(self.token);
        for kind in GateKind::ALL {
            bus.emit(frame, kinds::GATE_FREED, kind.name());
        }
    }

    fn follow_terrain(&mut self, frame: Frame, terrain: &mut dyn TerrainProvider, bus: &mut EventBus) {
        let geo = self.tracker.geodetic();
        if geo.alt_m > self.settings.terrain_follow_ceiling {
            return;
        }

        let Some(node) = terrain.node_at(geo) else {
            self.contact.node = None;
            return;
        };
        self.contact.node = Some(node);

        let Some(altitude) =
            terrain.terrain_point(node, self.camera.eye(), &mut self.contact.local)
        else {
            self.contact.altitude = None;
            return;
        };
        self.contact.altitude = Some(altitude);

        if altitude < self.settings.min_altitude {
            self.set_altitude(self.settings.min_altitude, frame, bus);
            bus.emit(frame, kinds::TERRAIN_CLAMP, "clamped to minimum altitude");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{FlightState, FlyOptions, FlyTarget, Navigator};
    use crate::camera::Projection;
    use crate::settings::NavigationSettings;
    use crate::terrain::FlatTerrain;
    use foundation::math::{Geodetic, Vec3, geodetic_to_ecef, surface_normal};
    use runtime::event_bus::{EventBus, kinds};
    use runtime::frame::Frame;
    use streaming::gate::{GateKind, GateSet};

    fn setup() -> (Navigator, GateSet, EventBus, FlatTerrain) {
        let mut nav = Navigator::new(NavigationSettings::default(), Projection::default());
        let mut bus = EventBus::new();
        nav.set_position_geodetic(
            Geodetic::from_degrees(0.0, 0.0, 1_000.0),
            Frame::at_60hz(0),
            &mut bus,
        );
        bus.drain();
        (nav, GateSet::new(), bus, FlatTerrain::new(0.0))
    }

    fn run_flight_to_completion(
        nav: &mut Navigator,
        gates: &mut GateSet,
        bus: &mut EventBus,
        terrain: &mut FlatTerrain,
    ) -> u64 {
        let mut frame = Frame::at_60hz(1);
        let mut ticks = 0;
        while nav.is_flying() {
            nav.tick(frame, terrain, gates, bus);
            frame = frame.next();
            ticks += 1;
            assert!(ticks < 10_000, "flight never completed");
        }
        ticks
    }

    #[test]
    fn flight_runs_to_the_target_and_completes() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        let dest = Geodetic::from_degrees(10.0, 10.0, 1_000.0);

        nav.fly_to(
            FlyTarget::Geodetic(dest),
            FlyOptions::default(),
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );
        assert_eq!(nav.state(), FlightState::Flying);
        assert!(gates.any_held());

        let ticks = run_flight_to_completion(&mut nav, &mut gates, &mut bus, &mut terrain);
        // One tick per stored frame.
        assert_eq!(ticks, 51);

        assert_eq!(nav.state(), FlightState::Idle);
        assert!(!gates.any_held());
        let dest_eye = geodetic_to_ecef(dest).to_vec3();
        assert!((nav.camera().eye() - dest_eye).length() < 1e-6);
        assert_eq!(bus.count_of_kind(kinds::FLIGHT_COMPLETED), 1);
        // Every applied flight frame recomputed the pose.
        assert_eq!(bus.count_of_kind(kinds::VIEW_CHANGED), 51);
    }

    #[test]
    fn callbacks_fire_exactly_once_in_order() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        let started = Rc::new(Cell::new(0u32));
        let completed = Rc::new(Cell::new(0u32));

        let s = started.clone();
        let c = completed.clone();
        nav.fly_to(
            FlyTarget::Geodetic(Geodetic::from_degrees(5.0, 5.0, 1_000.0)),
            FlyOptions {
                on_start: Some(Box::new(move || s.set(s.get() + 1))),
                on_complete: Some(Box::new(move || c.set(c.get() + 1))),
                ..Default::default()
            },
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );
        // Start fires synchronously, completion not yet.
        assert_eq!(started.get(), 1);
        assert_eq!(completed.get(), 0);

        run_flight_to_completion(&mut nav, &mut gates, &mut bus, &mut terrain);
        assert_eq!(started.get(), 1);
        assert_eq!(completed.get(), 1);
    }

    #[test]
    fn reentrant_fly_drops_the_old_completion_silently() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        let first_completed = Rc::new(Cell::new(false));

        let c = first_completed.clone();
        nav.fly_to(
            FlyTarget::Geodetic(Geodetic::from_degrees(5.0, 5.0, 1_000.0)),
            FlyOptions {
                on_complete: Some(Box::new(move || c.set(true))),
                ..Default::default()
            },
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );

        // A few ticks in, request a different destination.
        for i in 1..=5 {
            nav.tick(Frame::at_60hz(i), &mut terrain, &mut gates, &mut bus);
        }
        nav.fly_to(
            FlyTarget::Geodetic(Geodetic::from_degrees(-5.0, 20.0, 1_000.0)),
            FlyOptions::default(),
            Frame::at_60hz(6),
            &mut gates,
            &mut bus,
        );
        assert!(nav.is_flying());
        assert!(gates.any_held());

        run_flight_to_completion(&mut nav, &mut gates, &mut bus, &mut terrain);
        assert!(!first_completed.get(), "cancelled flight must stay silent");
        assert!(!gates.any_held());
    }

    #[test]
    fn stop_flying_is_idempotent_and_balances_locks() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        nav.fly_to(
            FlyTarget::Geodetic(Geodetic::from_degrees(5.0, 5.0, 1_000.0)),
            FlyOptions::default(),
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );
        nav.tick(Frame::at_60hz(1), &mut terrain, &mut gates, &mut bus);

        nav.stop_flying(Frame::at_60hz(2), &mut gates, &mut bus);
        assert_eq!(nav.state(), FlightState::Idle);
        assert!(!gates.any_held());

        // Second stop is a no-op, not a double free.
        nav.stop_flying(Frame::at_60hz(3), &mut gates, &mut bus);
        assert_eq!(nav.state(), FlightState::Idle);

        for kind in GateKind::ALL {
            let gate = gates.gate(kind);
            assert_eq!(gate.lock_calls(), 1, "{}", kind.name());
            assert_eq!(gate.free_calls(), 1, "{}", kind.name());
        }
        assert_eq!(bus.count_of_kind(kinds::FLIGHT_STOPPED), 1);
        assert_eq!(bus.count_of_kind(kinds::FLIGHT_COMPLETED), 0);
    }

    #[test]
    fn lock_calls_balance_across_completed_flights() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        for round in 0..3 {
            nav.fly_to(
                FlyTarget::Geodetic(Geodetic::from_degrees(5.0 + f64::from(round), 5.0, 1_000.0)),
                FlyOptions::default(),
                Frame::at_60hz(0),
                &mut gates,
                &mut bus,
            );
            run_flight_to_completion(&mut nav, &mut gates, &mut bus, &mut terrain);
        }
        for kind in GateKind::ALL {
            let gate = gates.gate(kind);
            assert_eq!(gate.lock_calls(), 3, "{}", kind.name());
            assert_eq!(gate.free_calls(), 3, "{}", kind.name());
        }
    }

    #[test]
    fn terrain_clamp_restores_minimum_altitude() {
        let (mut nav, mut gates, mut bus, _) = setup();
        // Terrain 980 m up; the camera at 1000 m is only 20 m above it.
        let mut terrain = FlatTerrain::new(980.0);

        nav.tick(Frame::at_60hz(1), &mut terrain, &mut gates, &mut bus);

        let min = nav.settings().min_altitude;
        assert_eq!(nav.contact().altitude, Some(min));
        assert_eq!(bus.count_of_kind(kinds::TERRAIN_CLAMP), 1);

        // One more tick: already at the floor, no further clamping.
        nav.tick(Frame::at_60hz(2), &mut terrain, &mut gates, &mut bus);
        assert_eq!(bus.count_of_kind(kinds::TERRAIN_CLAMP), 1);
    }

    #[test]
    fn terrain_following_is_suspended_while_flying() {
        let (mut nav, mut gates, mut bus, _) = setup();
        let mut terrain = FlatTerrain::new(980.0);

        nav.fly_to(
            FlyTarget::Geodetic(Geodetic::from_degrees(10.0, 10.0, 1_000.0)),
            FlyOptions::default(),
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );
        for i in 1..=10 {
            nav.tick(Frame::at_60hz(i), &mut terrain, &mut gates, &mut bus);
        }
        assert_eq!(bus.count_of_kind(kinds::TERRAIN_CLAMP), 0);
    }

    #[test]
    fn terrain_following_skipped_above_the_ceiling() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        nav.set_position_geodetic(
            Geodetic::from_degrees(0.0, 0.0, 2_000_000.0),
            Frame::at_60hz(0),
            &mut bus,
        );
        nav.tick(Frame::at_60hz(1), &mut terrain, &mut gates, &mut bus);
        assert_eq!(nav.contact().node, None);
        assert_eq!(nav.contact().altitude, None);
    }

    #[test]
    fn set_altitude_places_eye_on_the_surface_normal() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        // Establish a terrain contact first.
        nav.tick(Frame::at_60hz(1), &mut terrain, &mut gates, &mut bus);
        let contact_alt = nav.contact().altitude.expect("contact sampled");
        let geo = nav.position_geodetic();
        let normal = surface_normal(geo);
        let terrain_point = nav.camera().eye() - normal * contact_alt;

        nav.set_altitude(200.0, Frame::at_60hz(2), &mut bus);

        let expected = terrain_point + normal * 200.0;
        assert!((nav.camera().eye() - expected).length() < 1e-9);
    }

    #[test]
    fn cartesian_targets_are_accepted_directly() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        let dest = geodetic_to_ecef(Geodetic::from_degrees(3.0, 3.0, 5_000.0)).to_vec3();
        nav.fly_to(
            FlyTarget::Cartesian(dest),
            FlyOptions::default(),
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );
        run_flight_to_completion(&mut nav, &mut gates, &mut bus, &mut terrain);
        assert!((nav.camera().eye() - dest).length() < 1e-6);
    }

    #[test]
    fn each_navigator_gets_its_own_token() {
        let a = Navigator::new(NavigationSettings::default(), Projection::default());
        let b = Navigator::new(NavigationSettings::default(), Projection::default());
        assert_ne!(a.lock_token(), b.lock_token());
    }

    #[test]
    fn mercator_position_follows_the_band() {
        let (mut nav, _gates, mut bus, _) = setup();
        assert!(nav.position_mercator().is_some());
        nav.set_position_geodetic(
            Geodetic::from_degrees(88.0, 0.0, 1_000.0),
            Frame::at_60hz(1),
            &mut bus,
        );
        assert!(nav.position_mercator().is_none());
    }

    #[test]
    fn flight_frames_apply_in_order_without_skips() {
        let (mut nav, mut gates, mut bus, mut terrain) = setup();
        nav.fly_to(
            FlyTarget::Geodetic(Geodetic::from_degrees(10.0, 10.0, 1_000.0)),
            FlyOptions::default(),
            Frame::at_60hz(0),
            &mut gates,
            &mut bus,
        );
        let expected: Vec<_> = nav
            .flight_plan()
            .expect("flying")
            .frames()
            .iter()
            .rev()
            .map(|f| f.eye)
            .collect();

        let mut applied = Vec::new();
        let mut frame = Frame::at_60hz(1);
        while nav.is_flying() {
            nav.tick(frame, &mut terrain, &mut gates, &mut bus);
            applied.push(nav.camera().eye());
            frame = frame.next();
        }
        assert_eq!(applied, expected);
    }
}
