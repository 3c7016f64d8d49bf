use nalgebra::Point3;

use crate::rig::{CameraRig, DEFAULT_AUTO_ROTATE_SPEED};
use crate::scene::{BodyID, SceneRegistry};

// Tuning, all in one place
const TRACKING_STEP: f32 = 0.01;
const ZOOM_STEP: f32 = 0.02;
const ZOOM_DISTANCE_STEP: f32 = 1.0;
const ZOOM_SPIN_UP: f32 = 0.1;
const ZOOM_ARRIVAL_DISTANCE: f32 = 10.5;
pub const HOME_MIN_DISTANCE: f32 = 200.0;
pub const HOME_MAX_DISTANCE: f32 = 400.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub is_pressed: bool,
}

/// What the orbit target is doing this frame. `progress` is the lerp fraction
/// used on the next advance, and always lies in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusState {
    // Nothing selected; the camera just spins.
    Idle,
    // Pointer held down; easing toward whichever body is closest.
    Tracking { body: BodyID, progress: f32 },
    // A label was clicked; easing toward that body while diving in.
    ZoomingTo { body: BodyID, progress: f32 },
}

impl FocusState {
    pub fn body(&self) -> Option<BodyID> {
        match *self {
            FocusState::Idle => None,
            FocusState::Tracking { body, .. } | FocusState::ZoomingTo { body, .. } => Some(body),
        }
    }

    pub fn progress(&self) -> f32 {
        match *self {
            FocusState::Idle => 0.0,
            FocusState::Tracking { progress, .. } | FocusState::ZoomingTo { progress, .. } => {
                progress
            }
        }
    }

    pub fn is_zooming(&self) -> bool {
        matches!(self, FocusState::ZoomingTo { .. })
    }
}

impl Default for FocusState {
    fn default() -> Self {
        FocusState::Idle
    }
}

pub struct FocusController {
    state: FocusState,
}

impl FocusController {
    pub fn new() -> Self {
        FocusController {
            state: FocusState::Idle,
        }
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    /// Starts diving toward `body`. Both distance bounds are set to whichever
    /// is currently larger, so the rig can then shrink them together.
    pub fn request_zoom(&mut self, body: BodyID, rig: &mut CameraRig) {
        if rig.min_distance > rig.max_distance {
            rig.max_distance = rig.min_distance;
        } else {
            rig.min_distance = rig.max_distance;
        }

        let progress = match self.state {
            FocusState::ZoomingTo { body: current, progress } if current == body => progress,
            _ => 0.0,
        };
        log::debug!("Zooming to body {:?}", body);
        self.state = FocusState::ZoomingTo { body, progress };
    }

    /// One frame: pick the state for this frame, then move the rig.
    pub fn update(&mut self, pointer: &PointerState, registry: &SceneRegistry, rig: &mut CameraRig) {
        self.transition(pointer, registry, &rig.position());
        self.advance(registry, rig);
    }

    /// Chooses this frame's state. Selecting a different body than last frame
    /// restarts the lerp from 0.
    pub fn transition(
        &mut self,
        pointer: &PointerState,
        registry: &SceneRegistry,
        camera_position: &Point3<f32>,
    ) {
        let next = match self.state {
            FocusState::ZoomingTo { body, .. } if registry.get_ready_body(body).is_some() => {
                self.state
            }
            FocusState::ZoomingTo { body, .. } => {
                log::warn!("Zoom target {:?} is not available, giving up", body);
                FocusState::Idle
            }
            _ if pointer.is_pressed => match registry.nearest_ready(camera_position) {
                Some(nearest) => match self.state {
                    FocusState::Tracking { body, progress } if body == nearest => {
                        FocusState::Tracking { body, progress }
                    }
                    _ => FocusState::Tracking {
                        body: nearest,
                        progress: 0.0,
                    },
                },
                None => FocusState::Idle,
            },
            _ => FocusState::Idle,
        };

        if next.body() != self.state.body() {
            log::debug!("Focus {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    /// Moves the orbit target and bounds according to the current state.
    pub fn advance(&mut self, registry: &SceneRegistry, rig: &mut CameraRig) {
        match self.state {
            FocusState::Idle => {
                rig.auto_rotate = true;
            }
            FocusState::Tracking { body, progress } => {
                let desired = match registry.get_ready_body(body) {
                    Some(body) => body.position(),
                    None => {
                        self.state = FocusState::Idle;
                        return;
                    }
                };
                rig.target = rig.target.coords.lerp(&desired.coords, progress).into();

                // Wraps so the easing never stops while the pointer is held.
                let mut progress = progress + TRACKING_STEP;
                if progress >= 1.0 {
                    progress = 0.0;
                }
                self.state = FocusState::Tracking { body, progress };
            }
            FocusState::ZoomingTo { body, progress } => {
                let desired = match registry.get_ready_body(body) {
                    Some(body) => body.position(),
                    None => {
                        self.state = FocusState::Idle;
                        return;
                    }
                };
                rig.auto_rotate_speed += ZOOM_SPIN_UP;
                rig.auto_rotate = true;
                rig.target = rig.target.coords.lerp(&desired.coords, progress).into();
                rig.min_distance -= ZOOM_DISTANCE_STEP;
                rig.max_distance -= ZOOM_DISTANCE_STEP;

                // The distance check ends the zoom, so progress just saturates.
                let progress = (progress + ZOOM_STEP).min(1.0);
                self.state = FocusState::ZoomingTo { body, progress };

                if rig.min_distance <= ZOOM_ARRIVAL_DISTANCE {
                    log::debug!("Arrived at body {:?}", body);
                    rig.auto_rotate = false;
                    rig.auto_rotate_speed = DEFAULT_AUTO_ROTATE_SPEED;
                    rig.min_distance = HOME_MIN_DISTANCE;
                    rig.max_distance = HOME_MAX_DISTANCE;
                    self.state = FocusState::Idle;
                }
            }
        }
    }
}

impl Default for FocusController {
    fn default() -> Self {
        FocusController::new()
    }
}
