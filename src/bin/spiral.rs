use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use sha2::Digest as _;
use spiralsaver::{
    Dispatcher, FfmpegSink, FrameIndex, FrameRange, PngSequenceSink, RenderThreading,
    SpiralConfig, SpiralLayout, SpiralScene, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "spiral", version, about = "Render a rotating woven spiral")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize the opacity texture and write it as a grayscale PNG.
    Texture(TextureArgs),
    /// Render a single composited frame as a PNG.
    Frame(FrameArgs),
    /// Render an animation to MP4 (requires `ffmpeg` on PATH) or to a PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SpiralArgs {
    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of curves.
    #[arg(long)]
    curves: Option<u32>,

    /// Number of twist-direction reversals along the radius.
    #[arg(long)]
    alterations: Option<u32>,

    /// Twist per alteration segment, in radians.
    #[arg(long, allow_negative_numbers = true)]
    twist: Option<f64>,

    /// Painted fraction of each angular period, in [0, 1].
    #[arg(long)]
    line_width: Option<f64>,

    /// Worker threads (default: rayon's choice).
    #[arg(long)]
    threads: Option<usize>,

    /// Texture rows per synthesis task.
    #[arg(long)]
    rows_per_task: Option<usize>,

    /// Run everything on the calling thread.
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct ViewportArgs {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,
}

#[derive(Args, Debug)]
struct TextureArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Spiral radius in pixels. When omitted, the radius covers the viewport.
    #[arg(long)]
    radius: Option<u32>,

    #[command(flatten)]
    viewport: ViewportArgs,

    #[command(flatten)]
    spiral: SpiralArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Rotation speed in revolutions per second.
    #[arg(long, allow_negative_numbers = true)]
    rotation_speed: Option<f64>,

    #[command(flatten)]
    viewport: ViewportArgs,

    #[command(flatten)]
    spiral: SpiralArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output MP4 path, or output directory with `--png-dir`.
    #[arg(long)]
    out: PathBuf,

    /// Write numbered PNG frames into `--out` instead of encoding an MP4.
    #[arg(long)]
    png_dir: bool,

    /// Animation length in seconds.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Rotation speed in revolutions per second.
    #[arg(long, allow_negative_numbers = true)]
    rotation_speed: Option<f64>,

    #[command(flatten)]
    viewport: ViewportArgs,

    #[command(flatten)]
    spiral: SpiralArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Texture(args) => cmd_texture(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SpiralArgs) -> anyhow::Result<SpiralConfig> {
    let mut cfg = match &args.config {
        Some(path) => SpiralConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => SpiralConfig::default(),
    };

    if let Some(v) = args.curves {
        cfg.curves = v;
    }
    if let Some(v) = args.alterations {
        cfg.alterations = v;
    }
    if let Some(v) = args.twist {
        cfg.twist = v;
    }
    if let Some(v) = args.line_width {
        cfg.line_width = v;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    if let Some(v) = args.rows_per_task {
        cfg.threading.rows_per_task = v;
    }
    if args.sequential {
        cfg.threading.parallel = false;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn viewport(args: &ViewportArgs) -> anyhow::Result<Viewport> {
    Ok(Viewport::new(args.width, args.height)?)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_texture(args: TextureArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.spiral)?;
    let viewport = viewport(&args.viewport)?;
    let layout = match args.radius {
        Some(r) => SpiralLayout::new(f64::from(r), viewport)?,
        None => SpiralLayout::for_viewport(viewport)?,
    };
    let params = cfg.params_for(&layout)?;
    let dispatcher: Dispatcher = cfg.dispatcher();

    let started = std::time::Instant::now();
    let texture = spiralsaver::SpiralBuffer::with_size(&params, layout.texture_size, &dispatcher)?;
    tracing::info!(
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "texture synthesized"
    );

    ensure_parent(&args.out)?;
    texture
        .to_luma_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    println!(
        "{}x{} sha256:{}",
        texture.width(),
        texture.height(),
        sha256_hex(texture.data())
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.spiral)?;
    if let Some(v) = args.rotation_speed {
        cfg.rotation_speed = v;
    }
    let scene = SpiralScene::new(&cfg, viewport(&args.viewport)?)?;
    let frame = scene.render_frame(FrameIndex(args.frame));

    ensure_parent(&args.out)?;
    spiralsaver::write_png_rgba(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.spiral)?;
    if let Some(v) = args.fps {
        cfg.fps = v;
    }
    if let Some(v) = args.rotation_speed {
        cfg.rotation_speed = v;
    }
    cfg.validate()?;

    if !args.seconds.is_finite() || args.seconds <= 0.0 {
        anyhow::bail!("--seconds must be > 0");
    }
    let frames = cfg.fps()?.secs_to_frames_floor(args.seconds).max(1);
    let range = FrameRange::new(FrameIndex(0), FrameIndex(frames))?;

    let scene = SpiralScene::new(&cfg, viewport(&args.viewport)?)?;
    let threading = RenderThreading::from(&cfg.threading);

    let stats = if args.png_dir {
        let mut sink = PngSequenceSink::new(&args.out);
        spiralsaver::render_to_sink(&scene, range, &threading, &mut sink)?
    } else {
        if !spiralsaver::is_ffmpeg_on_path() {
            anyhow::bail!("ffmpeg is required for MP4 output; install it or pass --png-dir");
        }
        let mut sink = FfmpegSink::new(&args.out, true);
        spiralsaver::render_to_sink(&scene, range, &threading, &mut sink)?
    };

    eprintln!(
        "wrote {} ({} frames, {} rendered, {} reused)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
