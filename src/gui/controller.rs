use std::time::Instant;

use kiss3d::event::{Action, Event, Key, MouseButton, WindowEvent};
use nalgebra::Point2;

use crate::landing::Landing;
use crate::rig::CameraRig;
use crate::scene::BodyID;

// Number keys zoom to the n-th body, same as clicking its label
const ZOOM_KEYS: [Key; 9] = [
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
];

pub struct Controller {
    cursor: Point2<f32>,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    /// Counts a frame. Returns true when a new measurement is available.
    pub fn increment(&mut self) -> bool {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
            return true;
        }
        false
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            cursor: Point2::origin(),
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, landing: &mut Landing, rig: &mut CameraRig) {
        match event.value {
            WindowEvent::CursorPos(x, y, _) => {
                self.cursor = Point2::new(x as f32, y as f32);
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                landing.press();
                if let Some(id) = landing.click(&self.cursor, rig) {
                    log::info!("Label clicked: {}", body_name(landing, id));
                }
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                landing.release();
            }
            WindowEvent::Key(key, Action::Press, _) => {
                if let Some(idx) = ZOOM_KEYS.iter().position(|k| *k == key) {
                    let id = BodyID(idx);
                    if landing.registry().get_body(id).is_some() {
                        log::info!("Zoom requested: {}", body_name(landing, id));
                        landing.zoom_to(id, rig);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn increment_frame_counter(&mut self) {
        if self.fps_counter.increment() {
            log::debug!("{:.0} fps", self.fps_counter.value());
        }
    }
}

fn body_name(landing: &Landing, id: BodyID) -> String {
    landing
        .registry()
        .get_body(id)
        .map(|b| b.info.name.clone())
        .unwrap_or_else(|| format!("{:?}", id))
}
