use approx::assert_relative_eq;
use nalgebra::Point3;
use solar_landing::focus::{FocusController, FocusState, PointerState};
use solar_landing::landing::Landing;
use solar_landing::projection::Viewport;
use solar_landing::rig::CameraRig;
use solar_landing::scene::{BodyID, BodyInfo, BodyKind, SceneRegistry};

const PRESSED: PointerState = PointerState { is_pressed: true };
const RELEASED: PointerState = PointerState { is_pressed: false };

fn body(name: &str, position: Point3<f32>) -> BodyInfo {
    BodyInfo {
        name: name.to_owned(),
        label: name.to_owned(),
        position,
        label_offset: 2.0,
        radius: 1.0,
        color: Point3::new(1.0, 1.0, 1.0),
        texture: None,
        kind: BodyKind::Planet,
    }
}

fn rig_at(eye: Point3<f32>) -> CameraRig {
    CameraRig::new(eye, Point3::origin(), Viewport::new(1280.0, 720.0))
}

/// Two bodies on the x axis; a camera at the origin is 10 from A and 50 from B.
fn two_bodies() -> (SceneRegistry, BodyID, BodyID) {
    let mut registry = SceneRegistry::new();
    let a = registry.add_body(body("A", Point3::new(10.0, 0.0, 0.0)));
    let b = registry.add_body(body("B", Point3::new(-50.0, 0.0, 0.0)));
    (registry, a, b)
}

fn check_single_state(state: FocusState) {
    // The enum makes overlap impossible; what's left to check is the payload.
    match state {
        FocusState::Idle => {}
        FocusState::Tracking { progress, .. } | FocusState::ZoomingTo { progress, .. } => {
            assert!((0.0..=1.0).contains(&progress), "progress {}", progress);
        }
    }
}

#[test]
fn test_press_tracks_nearest() {
    let (registry, a, _) = two_bodies();
    let mut rig = rig_at(Point3::new(0.0, 0.0, 0.0));
    // Keep the camera where it is, regardless of where the target goes
    rig.target = Point3::new(0.0, 0.0, -1.0);
    let eye = Point3::new(0.0, 0.0, 0.0);
    let mut focus = FocusController::new();

    focus.transition(&PRESSED, &registry, &eye);
    assert_eq!(focus.state(), FocusState::Tracking { body: a, progress: 0.0 });

    focus.advance(&registry, &mut rig);
    assert_relative_eq!(focus.state().progress(), 0.01);
    // A zero-progress lerp leaves the target alone
    assert_relative_eq!(rig.target, Point3::new(0.0, 0.0, -1.0));
}

#[test]
fn test_retarget_resets_progress() {
    let (registry, a, b) = two_bodies();
    let mut rig = rig_at(Point3::new(0.0, 0.0, 30.0));
    let mut focus = FocusController::new();

    let near_a = Point3::new(9.0, 0.0, 0.0);
    for _ in 0..5 {
        focus.transition(&PRESSED, &registry, &near_a);
        focus.advance(&registry, &mut rig);
    }
    assert_eq!(focus.state().body(), Some(a));
    assert_relative_eq!(focus.state().progress(), 0.05, epsilon = 1e-5);

    let near_b = Point3::new(-49.0, 0.0, 0.0);
    focus.transition(&PRESSED, &registry, &near_b);
    assert_eq!(focus.state(), FocusState::Tracking { body: b, progress: 0.0 });

    focus.advance(&registry, &mut rig);
    assert_relative_eq!(focus.state().progress(), 0.01);
}

#[test]
fn test_tracking_eases_toward_body() {
    let (registry, a, _) = two_bodies();
    let mut rig = rig_at(Point3::new(0.0, 0.0, 30.0));
    let mut focus = FocusController::new();

    let eye = Point3::new(5.0, 0.0, 0.0);
    let mut last_gap = nalgebra::distance(&rig.target, &Point3::new(10.0, 0.0, 0.0));
    for _ in 0..50 {
        focus.transition(&PRESSED, &registry, &eye);
        focus.advance(&registry, &mut rig);
        check_single_state(focus.state());

        let gap = nalgebra::distance(&rig.target, &Point3::new(10.0, 0.0, 0.0));
        assert!(gap <= last_gap);
        last_gap = gap;
    }
    assert_eq!(focus.state().body(), Some(a));
    assert!(last_gap < 10.0);
}

#[test]
fn test_label_zoom_scenario() {
    let registry = SceneRegistry::landing_page();
    let sun = registry.find_by_name("Sun").unwrap().id;
    let mut rig = rig_at(Point3::new(0.0, 0.0, 50.0));
    rig.min_distance = 20.0;
    rig.max_distance = 200.0;
    let mut focus = FocusController::new();

    focus.request_zoom(sun, &mut rig);
    assert_relative_eq!(rig.min_distance, 200.0);
    assert_relative_eq!(rig.max_distance, 200.0);
    assert!(rig.min_distance <= rig.max_distance);

    let mut frames = 0;
    while focus.state().is_zooming() {
        focus.update(&RELEASED, &registry, &mut rig);
        check_single_state(focus.state());
        frames += 1;

        if focus.state().is_zooming() {
            assert_relative_eq!(rig.min_distance, 200.0 - frames as f32);
            assert_relative_eq!(rig.max_distance, 200.0 - frames as f32);
            assert!(rig.auto_rotate);
        }
        assert!(frames <= 200, "zoom never finished");
    }

    // 200 -> 10 is the first value at or below 10.5
    assert_eq!(frames, 190);
    assert_eq!(focus.state(), FocusState::Idle);
    assert!(!rig.auto_rotate);
    assert_relative_eq!(rig.min_distance, 200.0);
    assert_relative_eq!(rig.max_distance, 400.0);
    assert_relative_eq!(rig.auto_rotate_speed, 0.5);
    assert_relative_eq!(rig.target, Point3::new(200.0, 0.0, 0.0), epsilon = 1e-3);

    // Back to idle spinning on the next frame
    focus.update(&RELEASED, &registry, &mut rig);
    assert!(rig.auto_rotate);
}

#[test]
fn test_zoom_overrides_tracking() {
    let (registry, a, b) = two_bodies();
    let mut rig = rig_at(Point3::new(0.0, 0.0, 30.0));
    let mut focus = FocusController::new();

    focus.update(&PRESSED, &registry, &mut rig);
    assert!(matches!(focus.state(), FocusState::Tracking { .. }));

    focus.request_zoom(b, &mut rig);
    assert_eq!(focus.state(), FocusState::ZoomingTo { body: b, progress: 0.0 });

    // Switching zoom targets also starts over
    focus.update(&RELEASED, &registry, &mut rig);
    focus.request_zoom(a, &mut rig);
    assert_eq!(focus.state(), FocusState::ZoomingTo { body: a, progress: 0.0 });
}

#[test]
fn test_swap_never_inverts_bounds() {
    let (registry, a, _) = two_bodies();
    let bounds = [(20.0, 200.0), (200.0, 20.0), (50.0, 50.0), (0.0, 1000.0)];
    for (min, max) in bounds.iter() {
        let mut rig = rig_at(Point3::new(0.0, 0.0, 30.0));
        rig.min_distance = *min;
        rig.max_distance = *max;
        let mut focus = FocusController::new();

        focus.request_zoom(a, &mut rig);
        assert!(rig.min_distance <= rig.max_distance);
        focus.update(&RELEASED, &registry, &mut rig);
        assert!(rig.min_distance <= rig.max_distance);
    }
}

#[test]
fn test_unloaded_body_is_skipped() {
    let registry = SceneRegistry::landing_page();
    let earth = registry.find_by_name("Earth").unwrap().id;
    let moon = registry.find_by_name("Moon").unwrap().id;
    let sun = registry.find_by_name("Sun").unwrap().id;

    let mut landing = Landing::new(registry);
    // Right next to the Earth, which hasn't loaded
    let mut rig = rig_at(Point3::new(0.0, 0.0, 15.0));

    landing.press();
    landing.frame(&mut rig);

    assert!(landing.label(earth).unwrap().anchor.is_none());
    assert!(landing.label(moon).unwrap().anchor.is_none());
    assert!(landing.label(sun).unwrap().anchor.is_some());
    // Only the Sun is ready, so it's the nearest candidate
    assert_eq!(landing.focus_state().body(), Some(sun));

    landing.release();
    landing.frame(&mut rig);
    assert_eq!(landing.focus_state(), FocusState::Idle);
}
