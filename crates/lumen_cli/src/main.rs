use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use lumen_core::{builtin, Scene, SceneDesc, BUILTIN_SCENES};
use lumen_renderer::{
    build_integrator, IntegratorKind, RenderConfig, RenderSession, RenderStatus, TriangleScene,
};

#[derive(Parser)]
#[command(name = "lumen", version, about = "Whitted and path traced renders of triangle scenes")]
struct Cli {
    /// Built-in scene name or path to a JSON scene file
    #[arg(long, default_value = "cornell")]
    scene: String,

    /// JSON render config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    integrator: Option<IntegratorArg>,

    /// Samples per pixel
    #[arg(long)]
    spp: Option<u32>,

    /// Maximum bounces
    #[arg(long)]
    depth: Option<u32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Disable Whitted shadow rays
    #[arg(long)]
    no_shadows: bool,

    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 uses every core)
    #[arg(long)]
    threads: Option<usize>,

    /// Output gamma for the PNG (1.0 writes linear values)
    #[arg(long)]
    gamma: Option<f32>,

    #[arg(short, long, default_value = "render.png")]
    out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum IntegratorArg {
    Whitted,
    Path,
}

impl From<IntegratorArg> for IntegratorKind {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Whitted => IntegratorKind::Whitted,
            IntegratorArg::Path => IntegratorKind::Path,
        }
    }
}

fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            RenderConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    if let Some(integrator) = cli.integrator {
        config.integrator = integrator.into();
    }
    if let Some(spp) = cli.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if cli.no_shadows {
        config.enable_shadow = false;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(gamma) = cli.gamma {
        config.output_gamma = gamma;
    }

    Ok(config)
}

fn load_scene(name: &str) -> Result<Scene> {
    if let Some(scene) = builtin(name) {
        return Ok(scene);
    }

    let path = Path::new(name);
    if !path.exists() {
        bail!(
            "unknown scene '{}': not a file and not one of {}",
            name,
            BUILTIN_SCENES.join(", ")
        );
    }
    SceneDesc::load(path).with_context(|| format!("failed to load scene {}", path.display()))
}

fn save_png(path: &Path, session: &RenderSession) -> Result<()> {
    let image = session.image();
    let bytes = image.to_rgba8(session.config().output_gamma);
    let rgba = image::RgbaImage::from_raw(image.width, image.height, bytes)
        .ok_or_else(|| anyhow!("image buffer size mismatch"))?;
    rgba.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let scene = load_scene(&cli.scene)?;

    let query = TriangleScene::new(&scene);
    let integrator = build_integrator(&config);
    let mut session = RenderSession::new(config).context("invalid render settings")?;

    let stop = session.stop_handle();
    ctrlc::set_handler(move || {
        log::warn!("Interrupt received, finishing current pixels");
        stop.stop();
    })
    .context("failed to install Ctrl-C handler")?;

    let status = session.run(&query, &scene.camera, integrator.as_ref())?;
    if let RenderStatus::Stopped { pixel_index } = status {
        log::warn!(
            "Render stopped at pixel {} of {} ({:.1}%); resume from pixel {}",
            pixel_index,
            session.pixel_count(),
            session.progress() * 100.0,
            pixel_index
        );
    }

    save_png(&cli.out, &session)
}
