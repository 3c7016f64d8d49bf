use std::path::PathBuf;

use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    // Lit sphere, optionally textured
    Planet,
    // Self-lit sphere drawn by the noise shader; also where the light sits
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
}

#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub label: String,
    pub position: Point3<f32>,
    pub label_offset: f32,
    pub radius: f32,
    pub color: Point3<f32>,
    pub texture: Option<PathBuf>,
    pub kind: BodyKind,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub load_state: LoadState,
}

impl Body {
    pub fn position(&self) -> Point3<f32> {
        self.info.position
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    /// Center of the body's bounding box, in world space. Bodies are spheres
    /// placed by translation only, so this is just the position.
    pub fn bounding_center(&self) -> Point3<f32> {
        self.info.position
    }

    /// Point the label hangs from: the bounding-box center lifted by the
    /// body's label offset.
    pub fn top_anchor(&self) -> Point3<f32> {
        self.bounding_center() + Vector3::y() * self.info.label_offset
    }

    pub fn distance_to(&self, point: &Point3<f32>) -> f32 {
        nalgebra::distance(&self.info.position, point)
    }
}
