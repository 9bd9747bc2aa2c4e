//! Minimal native driver: one scripted flight from Zurich to Sydney over
//! flat terrain, printing navigation events and demonstrating streaming
//! gate suppression along the way.

use foundation::math::Geodetic;
use navigation::camera::Projection;
use navigation::navigator::{FlyOptions, FlyTarget, Navigator};
use navigation::settings::NavigationSettings;
use navigation::terrain::FlatTerrain;
use runtime::budget::FrameBudget;
use runtime::event_bus::EventBus;
use runtime::frame::Frame;
use streaming::gate::GateKind;
use streaming::pipeline::Pipeline;
use streaming::request::{TileCoord, TileRequest};

fn drain(bus: &mut EventBus) {
    for ev in bus.drain() {
        println!("[{:>4}] {:<16} {}", ev.frame_index, ev.kind, ev.message);
    }
}

fn main() {
    let mut nav = Navigator::new(NavigationSettings::default(), Projection::default());
    let mut pipeline = Pipeline::new(64);
    let mut bus = EventBus::new();
    let mut terrain = FlatTerrain::new(400.0);

    let mut frame = Frame::at_60hz(0);
    nav.set_position_geodetic(
        Geodetic::from_degrees(47.37, 8.54, 1_500.0),
        frame,
        &mut bus,
    );

    nav.fly_to(
        FlyTarget::Geodetic(Geodetic::from_degrees(-33.87, 151.21, 2_000.0)),
        FlyOptions {
            on_start: Some(Box::new(|| println!("departing zurich"))),
            on_complete: Some(Box::new(|| println!("arrived in sydney"))),
            ..Default::default()
        },
        frame,
        pipeline.gates_mut(),
        &mut bus,
    );

    // Movement-driven streaming is suppressed while airborne.
    let probe = TileRequest::new(GateKind::TerrainStream, TileCoord::new(7, 66, 45));
    match pipeline.submit_movement(probe, 0, 1) {
        Err(err) => println!("mid-flight request refused: {err}"),
        Ok(_) => println!("mid-flight request unexpectedly accepted"),
    }

    while nav.is_flying() {
        nav.tick(frame, &mut terrain, pipeline.gates_mut(), &mut bus);
        drain(&mut bus);
        frame = frame.next();
    }

    // Gates are free again; the same request now queues.
    match pipeline.submit_movement(probe, 0, 1) {
        Ok(id) => println!("post-flight request queued as {id:?}"),
        Err(err) => println!("post-flight request refused: {err}"),
    }

    let mut budget = FrameBudget::new(8);
    while let Some((id, req)) = pipeline.pop_next_with_budget(&mut budget) {
        println!(
            "streaming {:?} tile z{}/{}/{} ({})",
            id,
            req.coord.z,
            req.coord.x,
            req.coord.y,
            req.subsystem.name()
        );
    }

    // A few idle ticks of plain terrain following.
    for _ in 0..3 {
        nav.tick(frame, &mut terrain, pipeline.gates_mut(), &mut bus);
        drain(&mut bus);
        frame = frame.next();
    }

    let geo = nav.position_geodetic();
    println!(
        "final position: lat {:.4} deg, lon {:.4} deg, alt {:.1} m",
        geo.lat_rad.to_degrees(),
        geo.lon_rad.to_degrees(),
        geo.alt_m
    );
}
