use std::f32::consts::PI;

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

use crate::projection::Viewport;

pub const DEFAULT_FOVY_DEGREES: f32 = 40.0;
pub const DEFAULT_MIN_DISTANCE: f32 = 20.0;
pub const DEFAULT_MAX_DISTANCE: f32 = 200.0;
pub const DEFAULT_AUTO_ROTATE_SPEED: f32 = 0.5;

// At speed 1.0 the camera goes around once a minute at 60 fps.
const AUTO_ROTATE_RADIANS_PER_FRAME: f32 = 2.0 * PI / 60.0 / 60.0;
const PHI_LIMIT: f32 = 1e-3;

/// The orbiting camera: a point on a sphere around `target`, plus everything
/// needed to turn that into view and projection matrices.
///
/// Angles follow a y-up convention: `phi` is measured down from +y and `theta`
/// goes around the y axis, starting at +z.
#[derive(Debug, Clone)]
pub struct CameraRig {
    // -- perspective --
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub viewport: Viewport,
    // -- position --
    pub target: Point3<f32>,
    theta: f32,
    phi: f32,
    radius: f32,
    // -- orbit controls --
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    // 0.0 disables damping; pending rotation is then applied in one frame
    pub damping_factor: f32,
    pub user_rotating: bool,
    pending_theta: f32,
    pending_phi: f32,
}

impl CameraRig {
    pub fn new(eye: Point3<f32>, target: Point3<f32>, viewport: Viewport) -> Self {
        let mut rig = CameraRig {
            fovy: DEFAULT_FOVY_DEGREES.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
            viewport,
            target,
            theta: 0.0,
            phi: PI / 2.0,
            radius: 1.0,
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            auto_rotate: true,
            auto_rotate_speed: DEFAULT_AUTO_ROTATE_SPEED,
            damping_factor: 0.0,
            user_rotating: false,
            pending_theta: 0.0,
            pending_phi: 0.0,
        };
        rig.set_position(eye);
        rig
    }

    /// Camera at (0, 0, 50) looking at the origin.
    pub fn landing_page(viewport: Viewport) -> Self {
        CameraRig::new(Point3::new(0.0, 0.0, 50.0), Point3::origin(), viewport)
    }

    pub fn position(&self) -> Point3<f32> {
        let offset = Vector3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        );
        self.target + offset
    }

    /// Moves the camera to `eye`, keeping the target where it is.
    pub fn set_position(&mut self, eye: Point3<f32>) {
        let offset = eye - self.target;
        self.radius = offset.norm();
        if self.radius > 0.0 {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
        }
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.theta, self.phi)
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    pub fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, self.znear, self.zfar)
    }

    pub fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.position(), &self.target, &Vector3::y())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn inverse_view_projection(&self) -> Option<Matrix4<f32>> {
        self.view_projection().try_inverse()
    }

    /// Queues a rotation; it is applied (or eased in, with damping) by the
    /// next `update`.
    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.pending_theta += dtheta;
        self.pending_phi += dphi;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = self.clamp_distance(self.radius * factor);
    }

    // The lower bound wins when the bounds cross; this must never panic.
    fn clamp_distance(&self, radius: f32) -> f32 {
        radius.min(self.max_distance).max(self.min_distance)
    }

    /// One frame of orbit control: auto-rotation, pending rotation and
    /// distance clamping. Moving the target moves the camera with it, since
    /// the camera is stored relative to the target.
    pub fn update(&mut self) {
        if self.auto_rotate && !self.user_rotating {
            self.rotate(-AUTO_ROTATE_RADIANS_PER_FRAME * self.auto_rotate_speed, 0.0);
        }

        if self.damping_factor > 0.0 {
            self.theta += self.pending_theta * self.damping_factor;
            self.phi += self.pending_phi * self.damping_factor;
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.theta += self.pending_theta;
            self.phi += self.pending_phi;
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }

        self.theta %= 2.0 * PI;
        self.phi = self.phi.max(PHI_LIMIT).min(PI - PHI_LIMIT);
        self.radius = self.clamp_distance(self.radius);
    }
}
