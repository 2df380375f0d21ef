use std::path::PathBuf;
use std::process;

use clap::{ ArgGroup, Parser };
use log::{ error, info };

use quadric_ray_tracer::consts::{ NUM_THREADS, OUT_FILE };
use quadric_ray_tracer::description;
use quadric_ray_tracer::error::Result;
use quadric_ray_tracer::parallel::parallel_render;
use quadric_ray_tracer::presets::{ preset, PRESET_NAMES };

#[derive(Parser, Debug)]
#[clap(version, about)]
#[clap(group(
    ArgGroup::new("input")
        .required(true)
        .args(&["scene", "preset"]),
))]
struct Opt {
    /// JSON scene description to render
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Built-in scene to render
    #[clap(short, long, possible_values = PRESET_NAMES)]
    preset: Option<String>,

    /// Where to write the PPM image
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Number of render threads; 1 renders on the main thread
    #[clap(short, long, default_value_t = NUM_THREADS)]
    threads: usize,

    /// Overrides the image width, in pixels
    #[clap(long)]
    width: Option<usize>,

    /// Overrides the image height, in pixels
    #[clap(long)]
    height: Option<usize>,
}

fn run(opt: Opt) -> Result<()> {
    let mut scene = match (&opt.scene, &opt.preset) {
        (Some(path), _) => description::load(path)?,
        (None, Some(name)) => preset(name)?,
        (None, None) => unreachable!("clap requires a scene or a preset"),
    };

    if opt.width.is_some() || opt.height.is_some() {
        let (rows, cols) = scene.camera.resolution();
        scene.camera = scene.camera.with_resolution(
            opt.height.unwrap_or(rows),
            opt.width.unwrap_or(cols),
        );
        scene.validate()?;
    }

    let image = if opt.threads > 1 {
        parallel_render(scene, opt.threads)
    } else {
        scene.render()
    };

    image.save(&opt.output)?;
    info!("Saved render to {}.", opt.output.display());

    Ok(())
}

fn main() {
    let opt = Opt::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run(opt) {
        error!("{}", e);
        process::exit(1);
    }
}
