use std::path::PathBuf;

use nalgebra::Point3;

mod body;

pub use body::{Body, BodyID, BodyInfo, BodyKind, LoadState};

// Owns every focusable body. Iteration order is insertion order, which is also
// the tie-break order for nearest-body selection.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    bodies: Vec<Body>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        SceneRegistry { bodies: vec![] }
    }

    /// The three bodies of the landing page: Earth at the origin, the Moon
    /// beside it and the Sun off in the distance.
    pub fn landing_page() -> Self {
        let mut registry = SceneRegistry::new();
        registry.add_body(BodyInfo {
            name: String::from("Earth"),
            label: String::from("Home"),
            position: Point3::origin(),
            label_offset: 13.0,
            radius: 10.0,
            color: Point3::new(0.3, 0.45, 0.85),
            texture: Some(PathBuf::from("assets/earth_map.jpg")),
            kind: BodyKind::Planet,
        });
        registry.add_body(BodyInfo {
            name: String::from("Sun"),
            label: String::from("Projects"),
            position: Point3::new(200.0, 0.0, 0.0),
            label_offset: 90.0,
            radius: 75.0,
            color: Point3::new(1.0, 112.0 / 255.0, 34.0 / 255.0),
            texture: None,
            kind: BodyKind::Star,
        });
        registry.add_body(BodyInfo {
            name: String::from("Moon"),
            label: String::from("About"),
            position: Point3::new(20.0, 0.0, 0.0),
            label_offset: 3.0,
            radius: 2.7,
            color: Point3::new(0.7, 0.7, 0.7),
            texture: Some(PathBuf::from("assets/moon_map.png")),
            kind: BodyKind::Planet,
        });
        registry
    }

    /// Adds a body. Bodies with a texture to fetch start out pending; the
    /// rest are ready immediately.
    pub fn add_body(&mut self, info: BodyInfo) -> BodyID {
        let id = BodyID(self.bodies.len());
        let load_state = match info.texture {
            Some(_) => LoadState::Pending,
            None => LoadState::Ready,
        };
        self.bodies.push(Body {
            id,
            info,
            load_state,
        });
        id
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn ready_bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().filter(|b| b.is_ready())
    }

    pub fn get_body(&self, id: BodyID) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn get_ready_body(&self, id: BodyID) -> Option<&Body> {
        self.get_body(id).filter(|b| b.is_ready())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Body> {
        self.bodies
            .iter()
            .find(|b| b.info.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn mark_ready(&mut self, id: BodyID) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            body.load_state = LoadState::Ready;
        }
    }

    /// Forgets textures whose files don't exist, so those bodies are ready
    /// right away with their flat color instead of waiting on a load that can
    /// only fail. Returns the bodies that changed.
    pub fn drop_missing_textures(&mut self) -> Vec<BodyID> {
        let mut dropped = vec![];
        for body in self.bodies.iter_mut() {
            let missing = match &body.info.texture {
                Some(path) => !path.is_file(),
                None => false,
            };
            if missing {
                if let Some(path) = body.info.texture.take() {
                    log::info!(
                        "No texture at {}; {} keeps its flat color",
                        path.display(),
                        body.info.name
                    );
                }
                body.load_state = LoadState::Ready;
                dropped.push(body.id);
            }
        }
        dropped
    }

    /// Nearest ready body to `point`. Only a strictly smaller distance
    /// replaces the current best, so exact ties keep the earlier body.
    pub fn nearest_ready(&self, point: &Point3<f32>) -> Option<BodyID> {
        let mut best: Option<(BodyID, f32)> = None;
        for body in self.ready_bodies() {
            let distance = body.distance_to(point);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((body.id, distance)),
            }
        }
        best.map(|(id, _)| id)
    }
}
