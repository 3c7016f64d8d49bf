use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::resource::TextureManager;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point3, Translation3};

use super::camera::OrbitCamera;
use super::renderers::{Bloom, BloomSettings, CompoundRenderer};
use crate::assets::LoadedAsset;
use crate::landing::{Landing, LABEL_FONT_SIZE};
use crate::projection::Viewport;
use crate::rig::CameraRig;
use crate::scene::{Body, BodyID, BodyKind, SceneRegistry};

pub struct View {
    // Planets are kiss3d scene nodes; stars go through the sun renderer
    body_spheres: HashMap<BodyID, SceneNode>,
    // Camera
    camera: OrbitCamera,
    // Misc
    renderer: CompoundRenderer,
    bloom: Option<Bloom>,
}

impl View {
    pub fn new(registry: &SceneRegistry, window: &mut Window, bloom: Option<BloomSettings>) -> Self {
        let viewport = Viewport::new(window.width() as f32, window.height() as f32);
        let camera = OrbitCamera::new(CameraRig::landing_page(viewport));

        let mut body_spheres = HashMap::new();
        for body in registry.bodies() {
            if body.info.kind == BodyKind::Planet {
                let sphere = Self::create_body_object(window, body);
                body_spheres.insert(body.id, sphere);
            }
        }

        View {
            body_spheres,
            camera,
            renderer: CompoundRenderer::new(),
            bloom: bloom.map(Bloom::new),
        }
    }

    fn create_body_object(window: &mut Window, body: &Body) -> SceneNode {
        let mut sphere = window.add_sphere(body.info.radius);
        let color = &body.info.color;
        sphere.set_color(color.x, color.y, color.z);
        sphere.set_local_translation(Translation3::from(body.position().coords));
        // Hidden until its texture has settled
        sphere.set_visible(body.is_ready());
        sphere
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        self.camera.rig_mut()
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.renderer.set_time(seconds);
    }

    pub fn apply_texture(&mut self, asset: LoadedAsset) {
        let sphere = match self.body_spheres.get_mut(&asset.body) {
            Some(sphere) => sphere,
            None => return,
        };

        // Decoded on the loader thread; only the GL upload happens here
        let name = asset.path.to_string_lossy().into_owned();
        let mut image = Some(asset.image);
        let texture = TextureManager::get_global_manager(|manager| {
            image.take().map(|image| manager.add_image(image, &name))
        });
        if let Some(texture) = texture {
            sphere.set_color(1.0, 1.0, 1.0);
            sphere.set_texture(texture);
        }
    }

    pub fn show_body(&mut self, id: BodyID) {
        if let Some(sphere) = self.body_spheres.get_mut(&id) {
            sphere.set_visible(true);
        }
    }

    pub fn prerender_scene(&mut self, window: &mut Window, landing: &Landing) {
        for body in landing.registry().ready_bodies() {
            if body.info.kind == BodyKind::Star {
                self.renderer
                    .draw_sun(body.position(), body.info.radius, body.info.color);
            }
        }
        self.draw_labels(window, landing);
    }

    fn draw_labels(&self, window: &mut Window, landing: &Landing) {
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);

        for (_, label) in landing.labels() {
            // No rect means not placed yet, or behind the camera
            if let Some(rect) = label.rect() {
                window.draw_text(
                    &label.text,
                    &rect.top_left(),
                    LABEL_FONT_SIZE,
                    &default_font,
                    &text_color,
                );
            }
        }
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        let effect = self
            .bloom
            .as_mut()
            .map(|bloom| bloom as &mut dyn PostProcessingEffect);
        (
            Some(&mut self.camera),
            None,
            Some(&mut self.renderer),
            effect,
        )
    }
}
