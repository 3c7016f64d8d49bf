use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::light::Light;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::assets::AssetLoader;
use crate::landing::Landing;
use crate::scene::{BodyKind, SceneRegistry};

mod camera;
mod controller;
mod renderers;
mod view;

pub use renderers::BloomSettings;

// Drives the page: one `step` per displayed frame, called by kiss3d's render
// loop right before it updates the camera and draws.
pub struct LandingPage {
    landing: Landing,
    view: View,
    controller: Controller,
    loader: AssetLoader,
    start: Instant,
}

impl LandingPage {
    pub fn new(registry: SceneRegistry, window: &mut Window, bloom: Option<BloomSettings>) -> Self {
        // Light comes from the star, if there is one
        let light = registry
            .bodies()
            .find(|b| b.info.kind == BodyKind::Star)
            .map(|b| Light::Absolute(b.position()))
            .unwrap_or(Light::StickToCamera);
        window.set_light(light);

        let view = View::new(&registry, window, bloom);
        let mut landing = Landing::new(registry);
        let mut loader = AssetLoader::new();
        landing.start_loading(&mut loader);

        LandingPage {
            landing,
            view,
            controller: Controller::new(),
            loader,
            start: Instant::now(),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller
                .process_event(event, &mut self.landing, self.view.rig_mut());
        }
    }

    fn receive_assets(&mut self) {
        for result in self.loader.drain() {
            let settled = self.landing.finish_load(&result);
            if let Ok(asset) = result {
                self.view.apply_texture(asset);
            }
            if let Some(id) = settled {
                self.view.show_body(id);
            }
        }
    }
}

impl State for LandingPage {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.view.set_time(self.start.elapsed().as_secs_f32());
        self.receive_assets();
        self.process_user_input(window.events());
        self.landing.frame(self.view.rig_mut());
        self.view.prerender_scene(window, &self.landing);
        self.controller.increment_frame_counter();
    }
}
