use kiss3d::context::Context;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, RenderTarget, ShaderAttribute, ShaderUniform,
};
use nalgebra::Vector2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    // Brightness above which a pixel starts to glow
    pub threshold: f32,
    pub strength: f32,
    // Blur radius as a fraction of the shorter screen side
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        BloomSettings {
            threshold: 0.1,
            strength: 1.0,
            radius: 0.1,
        }
    }
}

/// Single-pass bloom: keeps the part of each pixel brighter than the
/// threshold, blurs it over two rings of taps and adds it back on top of the
/// scene.
pub struct Bloom {
    settings: BloomSettings,
    shader: Effect,
    fbo_texture: ShaderUniform<i32>,
    threshold: ShaderUniform<f32>,
    strength: ShaderUniform<f32>,
    blur_step: ShaderUniform<Vector2<f32>>,
    v_coord: ShaderAttribute<Vector2<f32>>,
    fbo_vertices: GPUVec<Vector2<f32>>,
    screen_size: Vector2<f32>,
}

impl Bloom {
    pub fn new(settings: BloomSettings) -> Self {
        // Full-screen quad
        let fbo_vertices = vec![
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, -1.0),
            Vector2::new(-1.0, 1.0),
            Vector2::new(1.0, 1.0),
        ];
        let mut fbo_vertices =
            GPUVec::new(fbo_vertices, BufferType::Array, AllocationType::StaticDraw);
        fbo_vertices.load_to_gpu();
        fbo_vertices.unload_from_ram();

        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        Bloom {
            settings,
            fbo_texture: shader
                .get_uniform("fbo_texture")
                .expect("Failed to get shader uniform."),
            threshold: shader
                .get_uniform("threshold")
                .expect("Failed to get shader uniform."),
            strength: shader
                .get_uniform("strength")
                .expect("Failed to get shader uniform."),
            blur_step: shader
                .get_uniform("blur_step")
                .expect("Failed to get shader uniform."),
            v_coord: shader
                .get_attrib("v_coord")
                .expect("Failed to get shader attribute."),
            shader,
            fbo_vertices,
            screen_size: Vector2::new(800.0, 600.0),
        }
    }

    // Offset of the outer tap ring in texture coordinates. The radius is taken
    // relative to the shorter side so the glow stays round.
    fn blur_step(&self) -> Vector2<f32> {
        let short_side = self.screen_size.x.min(self.screen_size.y).max(1.0);
        let pixels = self.settings.radius * short_side * 0.25;
        Vector2::new(pixels / self.screen_size.x.max(1.0), pixels / self.screen_size.y.max(1.0))
    }
}

impl PostProcessingEffect for Bloom {
    fn update(&mut self, _: f32, w: f32, h: f32, _: f32, _: f32) {
        self.screen_size = Vector2::new(w, h);
    }

    fn draw(&mut self, target: &RenderTarget) {
        let ctxt = Context::get();
        let blur_step = self.blur_step();

        self.shader.use_program();
        self.v_coord.enable();

        ctxt.clear_color(0.0, 0.0, 0.0, 1.0);
        ctxt.clear(Context::COLOR_BUFFER_BIT | Context::DEPTH_BUFFER_BIT);
        ctxt.bind_texture(Context::TEXTURE_2D, target.texture_id());

        self.fbo_texture.upload(&0);
        self.threshold.upload(&self.settings.threshold);
        self.strength.upload(&self.settings.strength);
        self.blur_step.upload(&blur_step);
        self.v_coord.bind(&mut self.fbo_vertices);

        ctxt.draw_arrays(Context::TRIANGLE_STRIP, 0, 4);

        self.v_coord.disable();
    }
}

static VERTEX_SRC: &str = "#version 100
    attribute vec2    v_coord;
    varying   vec2    f_texcoord;

    void main(void) {
        gl_Position = vec4(v_coord, 0.0, 1.0);
        f_texcoord  = (v_coord + 1.0) / 2.0;
    }";

static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform sampler2D fbo_texture;
    uniform float     threshold;
    uniform float     strength;
    uniform vec2      blur_step;
    varying vec2      f_texcoord;

    vec3 bright(vec2 at) {
        return max(texture2D(fbo_texture, at).rgb - vec3(threshold), vec3(0.0));
    }

    void main(void) {
        vec3 base = texture2D(fbo_texture, f_texcoord).rgb;

        vec3 glow = bright(f_texcoord);
        float weight = 1.0;
        for (int i = 0; i < 8; i++) {
            float angle = float(i) * 0.7853982;
            vec2 dir = vec2(cos(angle), sin(angle));
            glow += 0.6 * bright(f_texcoord + dir * blur_step * 0.5);
            glow += 0.3 * bright(f_texcoord + dir * blur_step);
            weight += 0.9;
        }

        gl_FragColor = vec4(base + strength * glow / weight, 1.0);
    }";

