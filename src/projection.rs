use nalgebra::{Matrix4, Point3};

use crate::rig::CameraRig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    fn half_width(&self) -> f32 {
        0.5 * self.width
    }

    fn half_height(&self) -> f32 {
        0.5 * self.height
    }
}

/// A projected point: pixel coordinates with the origin at the top left, and
/// the normalized device depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenPoint {
    // Anything outside the depth range is behind the camera or past the far
    // plane.
    pub fn is_visible(&self) -> bool {
        (-1.0..=1.0).contains(&self.depth)
    }
}

pub fn project(
    world: &Point3<f32>,
    view_projection: &Matrix4<f32>,
    viewport: Viewport,
) -> ScreenPoint {
    let ndc = view_projection.transform_point(world);

    // NDC y points up, pixel rows go down
    ScreenPoint {
        x: ndc.x * viewport.half_width() + viewport.half_width(),
        y: -ndc.y * viewport.half_height() + viewport.half_height(),
        depth: ndc.z,
    }
}

pub fn unproject(
    screen: &ScreenPoint,
    inverse_view_projection: &Matrix4<f32>,
    viewport: Viewport,
) -> Point3<f32> {
    let ndc = Point3::new(
        (screen.x - viewport.half_width()) / viewport.half_width(),
        -(screen.y - viewport.half_height()) / viewport.half_height(),
        screen.depth,
    );
    inverse_view_projection.transform_point(&ndc)
}

pub fn project_with(world: &Point3<f32>, rig: &CameraRig) -> ScreenPoint {
    project(world, &rig.view_projection(), rig.viewport)
}

pub fn unproject_with(screen: &ScreenPoint, rig: &CameraRig) -> Option<Point3<f32>> {
    rig.inverse_view_projection()
        .map(|inverse| unproject(screen, &inverse, rig.viewport))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(
            Point3::new(30.0, 20.0, 50.0),
            Point3::new(5.0, 0.0, 0.0),
            Viewport::new(1280.0, 720.0),
        )
    }

    #[test]
    fn test_target_lands_in_center() {
        let rig = rig();
        let screen = project_with(&rig.target, &rig);
        assert_relative_eq!(screen.x, 640.0, epsilon = 1e-3);
        assert_relative_eq!(screen.y, 360.0, epsilon = 1e-3);
        assert!(screen.is_visible());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let rig = CameraRig::landing_page(Viewport::new(800.0, 600.0));
        let above = project_with(&Point3::new(0.0, 5.0, 0.0), &rig);
        let right = project_with(&Point3::new(5.0, 0.0, 0.0), &rig);

        // Screen y grows downward
        assert!(above.y < 300.0);
        assert_relative_eq!(above.x, 400.0, epsilon = 1e-3);
        assert!(right.x > 400.0);
        assert_relative_eq!(right.y, 300.0, epsilon = 1e-3);
    }

    #[test]
    fn test_round_trip() {
        let rig = rig();
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(20.0, 0.0, 0.0),
            Point3::new(-7.5, 12.0, 3.0),
            Point3::new(200.0, 90.0, 0.0),
        ];
        for point in points.iter() {
            let screen = project_with(point, &rig);
            let back = unproject_with(&screen, &rig).unwrap();
            assert_relative_eq!(back, *point, epsilon = 0.1);
        }
    }

    #[test]
    fn test_behind_camera_is_not_visible() {
        let rig = CameraRig::landing_page(Viewport::new(800.0, 600.0));
        let behind = project_with(&Point3::new(0.0, 0.0, 80.0), &rig);
        assert!(!behind.is_visible());
    }

    #[test]
    fn test_resize_moves_projection() {
        let mut rig = rig();
        let off_center = Point3::new(20.0, 0.0, 0.0);
        let before = project_with(&off_center, &rig);

        rig.viewport = Viewport::new(640.0, 640.0);
        let center = project_with(&rig.target, &rig);
        assert_relative_eq!(center.x, 320.0, epsilon = 1e-3);
        assert_relative_eq!(center.y, 320.0, epsilon = 1e-3);

        // Same world point, different pixels once the aspect changes
        let after = project_with(&off_center, &rig);
        assert!((after.x - before.x).abs() > 1.0);
        let back = unproject_with(&after, &rig).unwrap();
        assert_relative_eq!(back, off_center, epsilon = 0.1);
    }
}
