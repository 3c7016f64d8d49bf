use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::scene::BodyID;

/// A finished background load: one texture requested for a body, already
/// decoded to RGBA.
#[derive(Debug)]
pub struct LoadedAsset {
    pub body: BodyID,
    pub path: PathBuf,
    pub image: DynamicImage,
}

#[derive(Debug)]
pub struct LoadError {
    pub body: BodyID,
    pub path: PathBuf,
    pub error: anyhow::Error,
}

pub type LoadResult = Result<LoadedAsset, LoadError>;

/// Reads asset files off the render thread. Each request gets its own worker;
/// results are collected with [`AssetLoader::drain`] once per frame, so the
/// render loop never blocks on the disk.
pub struct AssetLoader {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
    in_flight: usize,
}

impl AssetLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        AssetLoader {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn request<P: AsRef<Path>>(&mut self, body: BodyID, path: P) {
        let path = path.as_ref().to_path_buf();
        let sender = self.sender.clone();
        self.in_flight += 1;

        log::debug!("Loading {} for body {:?}", path.display(), body);
        thread::spawn(move || {
            let result = match decode_texture(&path) {
                Ok(image) => Ok(LoadedAsset { body, path, image }),
                Err(error) => Err(LoadError { body, path, error }),
            };
            // The loader may be gone if the window closed mid-load
            let _ = sender.send(result);
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Everything that finished since the last call. Never blocks.
    pub fn drain(&mut self) -> Vec<LoadResult> {
        let mut finished = vec![];
        loop {
            match self.receiver.try_recv() {
                Ok(result) => {
                    self.in_flight -= 1;
                    finished.push(result);
                }
                // We hold a sender ourselves, so the channel can't disconnect
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        finished
    }

    /// Blocks until every outstanding request has finished.
    pub fn wait_all(&mut self) -> Vec<LoadResult> {
        let mut finished = vec![];
        while self.in_flight > 0 {
            match self.receiver.recv() {
                Ok(result) => {
                    self.in_flight -= 1;
                    finished.push(result);
                }
                Err(_) => break,
            }
        }
        finished
    }
}

// The GL upload only takes 8-bit RGB or RGBA, so everything is widened to
// RGBA here rather than on the render thread.
fn decode_texture(path: &Path) -> Result<DynamicImage> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let image = image::load_from_memory(&bytes)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(DynamicImage::ImageRgba8(image.into_rgba8()))
}

impl Default for AssetLoader {
    fn default() -> Self {
        AssetLoader::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use image::{GenericImageView, GrayImage, Luma};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "solar-landing-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sorted(mut results: Vec<LoadResult>) -> Vec<LoadResult> {
        results.sort_by_key(|r| match r {
            Ok(asset) => asset.body,
            Err(err) => err.body,
        });
        results
    }

    #[test]
    fn test_load_and_fail() {
        let dir = scratch_dir("assets");
        // Grayscale on disk, so this also checks the widening to RGBA
        let good = dir.join("good.png");
        GrayImage::from_pixel(4, 2, Luma([200u8])).save(&good).unwrap();
        let bad = dir.join("missing.png");

        let mut loader = AssetLoader::new();
        loader.request(BodyID(0), &good);
        loader.request(BodyID(1), &bad);
        assert_eq!(loader.in_flight(), 2);

        let results = sorted(loader.wait_all());
        assert_eq!(loader.in_flight(), 0);
        assert!(loader.drain().is_empty());

        match &results[0] {
            Ok(asset) => {
                assert_eq!(asset.body, BodyID(0));
                assert_eq!(asset.image.dimensions(), (4, 2));
                assert!(matches!(asset.image, DynamicImage::ImageRgba8(_)));
            }
            Err(err) => panic!("expected a load, got {:?}", err),
        }
        match &results[1] {
            Err(err) => {
                assert_eq!(err.body, BodyID(1));
                let io_error = err.error.downcast_ref::<io::Error>().unwrap();
                assert_eq!(io_error.kind(), io::ErrorKind::NotFound);
            }
            Ok(asset) => panic!("expected a failure, got {:?}", asset.path),
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_undecodable_texture_is_an_error() {
        let dir = scratch_dir("garbage");
        let path = dir.join("earth_map.jpg");
        fs::write(&path, b"this is not a jpeg").unwrap();

        let mut loader = AssetLoader::new();
        loader.request(BodyID(0), &path);
        let results = loader.wait_all();

        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(err) => {
                assert_eq!(err.body, BodyID(0));
                assert_eq!(err.path, path);
                assert!(format!("{:#}", err.error).contains("decoding"));
            }
            Ok(asset) => panic!("garbage decoded as {:?}", asset.image.dimensions()),
        }

        fs::remove_dir_all(&dir).unwrap();
    }
}
