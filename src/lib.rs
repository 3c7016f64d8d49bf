pub mod assets;
pub mod file;
pub mod focus;
pub mod gui;
pub mod landing;
pub mod projection;
pub mod rig;
pub mod scene;
