use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Point3, Vector2};

use crate::projection::Viewport;
use crate::rig::CameraRig;

const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

// Drag to orbit, scroll to zoom. Where the camera looks, how close it may get
// and whether it spins on its own all live in the rig, which the focus
// controller steers every frame; this type only feeds it user input and hands
// its matrices to kiss3d.
pub struct OrbitCamera {
    rig: CameraRig,
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    theta_step: f32,
    phi_step: f32,
    scroll_ratio: f32,
}

impl OrbitCamera {
    pub fn new(rig: CameraRig) -> Self {
        OrbitCamera {
            rig,
            last_cursor_pos: Vector2::zeros(),
            theta_step: 0.005,
            phi_step: 0.005,
            scroll_ratio: 1.1,
        }
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Rotate the opposite direction as the mouse moves (drag right == camera glides
                    // left)
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.rig
                        .rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::MouseButton(MouseButton::Button1, action, _) => {
                self.rig.user_rotating = action == Action::Press;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.rig.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.rig.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.rig.viewport = Viewport::new(w as f32, h as f32);
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rig.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rig.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rig.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rig.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.rig.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => {
                self.rig.zoom(KEY_ZOOM_STEP)
            }
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.rig.position()
    }

    fn view_transform(&self) -> Isometry3<f32> {
        self.rig.view_transform()
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.rig.view_projection()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.rig
            .inverse_view_projection()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.rig.znear, self.rig.zfar)
    }

    // This is the orbit-control step: it runs once per frame, after the focus
    // controller has had its say.
    fn update(&mut self, _canvas: &Canvas) {
        self.rig.update();
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.rig.projection_matrix());
        view.upload(&self.rig.view_matrix());
    }
}
