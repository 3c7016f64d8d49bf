use std::collections::HashMap;

use nalgebra::Point2;

use crate::assets::{AssetLoader, LoadResult};
use crate::focus::{FocusController, FocusState, PointerState};
use crate::projection::{project_with, ScreenPoint};
use crate::rig::CameraRig;
use crate::scene::{BodyID, SceneRegistry};

// Label sizes are in pixels
pub const LABEL_FONT_SIZE: f32 = 48.0;
// Rough advance of one glyph relative to the font size
const LABEL_CHAR_WIDTH: f32 = 0.5;

/// Screen rectangle of one label. The label sits centered above its anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl LabelRect {
    fn around(anchor: &ScreenPoint, text: &str) -> Self {
        let width = text.chars().count() as f32 * LABEL_FONT_SIZE * LABEL_CHAR_WIDTH;
        let height = LABEL_FONT_SIZE;
        LabelRect {
            left: anchor.x - width / 2.0,
            top: anchor.y - height,
            width,
            height,
        }
    }

    pub fn contains(&self, point: &Point2<f32>) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }

    pub fn top_left(&self) -> Point2<f32> {
        Point2::new(self.left, self.top)
    }
}

#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    // None until the body is ready and has been projected once
    pub anchor: Option<ScreenPoint>,
}

impl Label {
    pub fn rect(&self) -> Option<LabelRect> {
        self.anchor
            .filter(ScreenPoint::is_visible)
            .map(|anchor| LabelRect::around(&anchor, &self.text))
    }
}

/// Everything the landing page does in a frame that doesn't need a window:
/// the bodies, the focus state machine and label placement. The camera rig
/// belongs to whoever draws, and is lent in for each call that moves it.
pub struct Landing {
    registry: SceneRegistry,
    focus: FocusController,
    pointer: PointerState,
    labels: HashMap<BodyID, Label>,
    outstanding: HashMap<BodyID, usize>,
}

impl Landing {
    pub fn new(registry: SceneRegistry) -> Self {
        let labels = registry
            .bodies()
            .map(|body| {
                let label = Label {
                    text: body.info.label.clone(),
                    anchor: None,
                };
                (body.id, label)
            })
            .collect();

        Landing {
            registry,
            focus: FocusController::new(),
            pointer: PointerState::default(),
            labels,
            outstanding: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn label(&self, id: BodyID) -> Option<&Label> {
        self.labels.get(&id)
    }

    pub fn labels(&self) -> impl Iterator<Item = (BodyID, &Label)> + '_ {
        // Registry order, so drawing is stable from frame to frame
        self.registry
            .bodies()
            .filter_map(move |body| self.labels.get(&body.id).map(|label| (body.id, label)))
    }

    /// Kicks off a background read for every pending body's texture.
    pub fn start_loading(&mut self, loader: &mut AssetLoader) {
        for body in self.registry.bodies() {
            if body.is_ready() {
                continue;
            }
            if let Some(texture) = &body.info.texture {
                loader.request(body.id, texture);
                *self.outstanding.entry(body.id).or_insert(0) += 1;
            }
        }
    }

    /// Records a settled load. Returns the body that just became ready, if
    /// any. A failed load still counts as settled; the body keeps its flat
    /// color.
    pub fn finish_load(&mut self, result: &LoadResult) -> Option<BodyID> {
        let body = match result {
            Ok(asset) => {
                log::info!("Loaded {}", asset.path.display());
                asset.body
            }
            Err(err) => {
                log::warn!(
                    "Failed to load {}: {:#}; drawing body without it",
                    err.path.display(),
                    err.error
                );
                err.body
            }
        };

        let remaining = match self.outstanding.get_mut(&body) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining > 0 {
            return None;
        }

        self.outstanding.remove(&body);
        self.registry.mark_ready(body);
        Some(body)
    }

    pub fn press(&mut self) {
        self.pointer.is_pressed = true;
    }

    pub fn release(&mut self) {
        self.pointer.is_pressed = false;
    }

    /// Label under `pixel`, if any. Pending bodies have no label on screen.
    pub fn label_at(&self, pixel: &Point2<f32>) -> Option<BodyID> {
        self.labels()
            .filter(|(id, _)| self.registry.get_ready_body(*id).is_some())
            .find(|(_, label)| label.rect().map_or(false, |rect| rect.contains(pixel)))
            .map(|(id, _)| id)
    }

    /// Handles a click: a hit on a label starts a zoom to its body.
    pub fn click(&mut self, pixel: &Point2<f32>, rig: &mut CameraRig) -> Option<BodyID> {
        let hit = self.label_at(pixel)?;
        self.zoom_to(hit, rig);
        Some(hit)
    }

    pub fn zoom_to(&mut self, body: BodyID, rig: &mut CameraRig) {
        if self.registry.get_ready_body(body).is_none() {
            log::debug!("Ignoring zoom to {:?}, not loaded yet", body);
            return;
        }
        self.focus.request_zoom(body, rig);
    }

    /// The per-frame update: place labels for ready bodies, then run the
    /// focus state machine. The rig's own orbit step runs afterwards, when the
    /// window asks the camera to update.
    pub fn frame(&mut self, rig: &mut CameraRig) {
        self.update_labels(rig);
        self.focus.update(&self.pointer, &self.registry, rig);
    }

    fn update_labels(&mut self, rig: &CameraRig) {
        for body in self.registry.ready_bodies() {
            if let Some(label) = self.labels.get_mut(&body.id) {
                label.anchor = Some(project_with(&body.top_anchor(), rig));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::projection::Viewport;

    fn landing() -> Landing {
        Landing::new(SceneRegistry::landing_page())
    }

    fn rig() -> CameraRig {
        CameraRig::landing_page(Viewport::new(1280.0, 720.0))
    }

    #[test]
    fn test_pending_labels_stay_put() {
        let mut landing = landing();
        let mut rig = rig();
        let earth = landing.registry().find_by_name("Earth").unwrap().id;
        let sun = landing.registry().find_by_name("Sun").unwrap().id;

        landing.frame(&mut rig);
        assert!(landing.label(earth).unwrap().anchor.is_none());
        assert!(landing.label(sun).unwrap().anchor.is_some());
    }

    #[test]
    fn test_label_rect_hit() {
        let anchor = ScreenPoint {
            x: 100.0,
            y: 200.0,
            depth: 0.5,
        };
        let rect = LabelRect::around(&anchor, "Home");
        assert!(rect.contains(&Point2::new(100.0, 190.0)));
        assert!(!rect.contains(&Point2::new(100.0, 210.0)));
        assert!(!rect.contains(&Point2::new(300.0, 190.0)));
    }

    #[test]
    fn test_click_label_zooms() {
        let mut landing = landing();
        let mut rig = rig();
        let sun = landing.registry().find_by_name("Sun").unwrap().id;
        landing.frame(&mut rig);

        let rect = landing.label(sun).unwrap().rect().unwrap();
        let inside = Point2::new(rect.left + 1.0, rect.top + 1.0);
        assert_eq!(landing.click(&inside, &mut rig), Some(sun));
        assert_eq!(landing.focus_state().body(), Some(sun));
        assert!(landing.focus_state().is_zooming());

        assert_eq!(landing.click(&Point2::new(-50.0, -50.0), &mut rig), None);
    }

    #[test]
    fn test_zoom_to_pending_is_ignored() {
        let mut landing = landing();
        let mut rig = rig();
        let earth = landing.registry().find_by_name("Earth").unwrap().id;
        landing.zoom_to(earth, &mut rig);
        assert_eq!(landing.focus_state(), FocusState::Idle);
    }

    #[test]
    fn test_failed_load_still_readies_body() {
        let mut landing = landing();
        let mut loader = AssetLoader::new();
        landing.start_loading(&mut loader);
        assert_eq!(loader.in_flight(), 2);

        let moon = landing.registry().find_by_name("Moon").unwrap().id;
        let result: LoadResult = Err(crate::assets::LoadError {
            body: moon,
            path: "assets/moon_map.png".into(),
            error: anyhow::anyhow!("not an image"),
        });
        assert_eq!(landing.finish_load(&result), Some(moon));
        assert!(landing.registry().get_ready_body(moon).is_some());

        let mut rig = rig();
        landing.frame(&mut rig);
        let anchor = landing.label(moon).unwrap().anchor.unwrap();
        let expected = project_with(&Point3::new(20.0, 3.0, 0.0), &rig);
        assert_eq!(anchor, expected);
    }
}
