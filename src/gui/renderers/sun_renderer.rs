use std::f32::consts::{PI, TAU};

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};
use nalgebra::{Matrix4, Point2, Point3};

const RINGS: usize = 32;
const SEGMENTS: usize = 32;

struct SunData {
    pub center: Point3<f32>,
    pub radius: f32,
    pub color: Point3<f32>,
}

// Draws star bodies as UV spheres whose surface boils with 3D simplex noise.
// The third noise coordinate is time, so the pattern only moves if `set_time`
// is fed something that keeps increasing.
pub struct SunRenderer {
    // OpenGL stuff
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    uv: ShaderAttribute<Point2<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    center: ShaderUniform<Point3<f32>>,
    radius: ShaderUniform<f32>,
    color: ShaderUniform<Point3<f32>>,
    time: ShaderUniform<f32>,
    positions: GPUVec<Point3<f32>>,
    uvs: GPUVec<Point2<f32>>,
    // Data storage
    suns: Vec<SunData>,
    current_time: f32,
}

impl SunRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        let (positions, uvs) = Self::get_sphere_triangles(RINGS, SEGMENTS);

        SunRenderer {
            position: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            uv: shader
                .get_attrib::<Point2<f32>>("uv")
                .expect("Failed to get shader attribute."),
            transform: shader
                .get_uniform::<Matrix4<f32>>("transform")
                .expect("Failed to get shader uniform."),
            center: shader
                .get_uniform::<Point3<f32>>("center")
                .expect("Failed to get shader uniform."),
            radius: shader
                .get_uniform::<f32>("radius")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            time: shader
                .get_uniform::<f32>("u_time")
                .expect("Failed to get shader uniform."),
            shader,
            positions: GPUVec::new(positions, BufferType::Array, AllocationType::StaticDraw),
            uvs: GPUVec::new(uvs, BufferType::Array, AllocationType::StaticDraw),
            suns: vec![],
            current_time: 0.0,
        }
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.current_time = seconds;
    }

    pub fn add_sun(&mut self, center: Point3<f32>, radius: f32, color: Point3<f32>) {
        self.suns.push(SunData {
            center,
            radius,
            color,
        });
    }

    // Unit sphere as a plain triangle list, with (u, v) in [0, 1]^2
    fn get_sphere_triangles(rings: usize, segments: usize) -> (Vec<Point3<f32>>, Vec<Point2<f32>>) {
        let vertex = |ring: usize, segment: usize| {
            let u = segment as f32 / segments as f32;
            let v = ring as f32 / rings as f32;
            let theta = u * TAU;
            let phi = v * PI;
            let position = Point3::new(
                phi.sin() * theta.sin(),
                phi.cos(),
                phi.sin() * theta.cos(),
            );
            (position, Point2::new(u, 1.0 - v))
        };

        let mut positions = Vec::with_capacity(rings * segments * 6);
        let mut uvs = Vec::with_capacity(rings * segments * 6);
        for ring in 0..rings {
            for segment in 0..segments {
                let corners = [
                    vertex(ring, segment),
                    vertex(ring + 1, segment),
                    vertex(ring + 1, segment + 1),
                    vertex(ring, segment),
                    vertex(ring + 1, segment + 1),
                    vertex(ring, segment + 1),
                ];
                for (position, uv) in corners.iter() {
                    positions.push(*position);
                    uvs.push(*uv);
                }
            }
        }
        (positions, uvs)
    }
}

impl Renderer for SunRenderer {
    fn render(&mut self, _: usize, camera: &mut dyn Camera) {
        if self.suns.is_empty() {
            return;
        }

        let vp_transform = camera.transformation();

        self.shader.use_program();
        self.position.enable();
        self.uv.enable();

        self.transform.upload(&vp_transform);
        self.time.upload(&self.current_time);

        for sun in self.suns.iter() {
            self.position.bind(&mut self.positions);
            self.uv.bind(&mut self.uvs);
            self.center.upload(&sun.center);
            self.radius.upload(&sun.radius);
            self.color.upload(&sun.color);

            let ctxt = Context::get();
            ctxt.draw_arrays(Context::TRIANGLES, 0, self.positions.len() as i32);
        }

        self.uv.disable();
        self.position.disable();

        self.suns.clear();
    }
}

static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec2 uv;
    uniform   mat4 transform;
    uniform   vec3 center;
    uniform   float radius;
    varying   vec2 v_uv;

    void main() {
        v_uv = uv;
        gl_Position = transform * vec4(center + radius * position, 1.0);
    }";

// 3D simplex noise: skew into the simplex grid, sum the four corner
// contributions, each a pseudo-random gradient faded by (0.6 - r^2)^4.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform vec3  color;
    uniform float u_time;
    varying vec2  v_uv;

    const float F3 = 0.3333333;
    const float G3 = 0.1666667;

    vec3 gradient(vec3 c) {
        float j = 4096.0 * sin(dot(c, vec3(17.0, 59.4, 15.0)));
        vec3 r;
        r.z = fract(512.0 * j);
        j *= 0.125;
        r.x = fract(512.0 * j);
        j *= 0.125;
        r.y = fract(512.0 * j);
        return r - 0.5;
    }

    float simplex3(vec3 p) {
        vec3 s = floor(p + dot(p, vec3(F3)));
        vec3 x = p - s + dot(s, vec3(G3));

        vec3 e = step(vec3(0.0), x - x.yzx);
        vec3 i1 = e * (1.0 - e.zxy);
        vec3 i2 = 1.0 - e.zxy * (1.0 - e);

        vec3 x1 = x - i1 + G3;
        vec3 x2 = x - i2 + 2.0 * G3;
        vec3 x3 = x - 1.0 + 3.0 * G3;

        vec4 w = max(0.6 - vec4(dot(x, x), dot(x1, x1), dot(x2, x2), dot(x3, x3)), 0.0);
        vec4 d = vec4(
            dot(gradient(s), x),
            dot(gradient(s + i1), x1),
            dot(gradient(s + i2), x2),
            dot(gradient(s + 1.0), x3));

        w *= w;
        w *= w;
        return dot(d * w, vec4(52.0));
    }

    void main() {
        vec3 surface = color * (1.0 - simplex3(vec3(v_uv * 500.0, u_time)));
        gl_FragColor = vec4(surface / 4.0, 1.0);
    }";
