use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kiss3d::window::Window;

use solar_landing::file::read_file;
use solar_landing::gui::{BloomSettings, LandingPage};
use solar_landing::scene::SceneRegistry;

#[derive(Debug, Parser)]
#[command(name = "solar-landing")]
#[command(about = "Earth, Moon and Sun with clickable labels", long_about = None)]
struct Args {
    /// Scene file to load instead of the built-in Earth/Moon/Sun layout
    #[arg(long)]
    scene: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Frame rate cap
    #[arg(long, default_value_t = 60)]
    fps: u64,

    /// Skip the bloom post-process
    #[arg(long = "no-bloom")]
    no_bloom: bool,

    #[arg(long, default_value_t = 1.0)]
    bloom_strength: f32,

    #[arg(long, default_value_t = 0.1)]
    bloom_threshold: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut registry = match &args.scene {
        Some(path) => read_file(path)?,
        None => SceneRegistry::landing_page(),
    };
    registry.drop_missing_textures();
    log::info!("Scene has {} bodies", registry.len());

    let bloom = if args.no_bloom {
        None
    } else {
        Some(BloomSettings {
            threshold: args.bloom_threshold,
            strength: args.bloom_strength,
            ..BloomSettings::default()
        })
    };

    let mut window = Window::new_with_size("Solar System", args.width, args.height);
    window.set_framerate_limit(Some(args.fps));

    let page = LandingPage::new(registry, &mut window, bloom);
    window.render_loop(page);
    Ok(())
}
