use kiss3d::camera::Camera;
use kiss3d::renderer::Renderer;
use nalgebra::Point3;

use self::sun_renderer::SunRenderer;

mod bloom;
mod sun_renderer;

pub use bloom::{Bloom, BloomSettings};

// Everything drawn by hand on top of kiss3d's own scene graph.
pub struct CompoundRenderer {
    sun_renderer: SunRenderer,
}

impl CompoundRenderer {
    pub fn new() -> Self {
        CompoundRenderer {
            sun_renderer: SunRenderer::new(),
        }
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.sun_renderer.set_time(seconds);
    }

    pub fn draw_sun(&mut self, center: Point3<f32>, radius: f32, color: Point3<f32>) {
        self.sun_renderer.add_sun(center, radius, color);
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.sun_renderer.render(pass, camera);
    }
}
