use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stillmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Animate a local still into an MP4 (requires `ffmpeg` on PATH).
    Animate(AnimateArgs),
    /// Write a single animated frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Configuration file (TOML or JSON). Defaults to `stillmotion.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct SpecArgs {
    /// Video length in seconds.
    #[arg(long, default_value_t = stillmotion::AnimationSpec::DEFAULT_DURATION_SECS)]
    duration: f64,

    /// Frames per second.
    #[arg(long, default_value_t = stillmotion::AnimationSpec::DEFAULT_FPS)]
    fps: u32,

    /// Scale factor of the first frame.
    #[arg(long, default_value_t = 1.0)]
    zoom_start: f64,

    /// Scale factor approached by the last frame.
    #[arg(long, default_value_t = 1.2)]
    zoom_end: f64,
}

impl SpecArgs {
    fn to_spec(&self) -> anyhow::Result<stillmotion::AnimationSpec> {
        let zoom = stillmotion::ZoomRange::new(self.zoom_start, self.zoom_end)?;
        Ok(stillmotion::AnimationSpec::new(
            self.duration,
            self.fps,
            zoom,
        )?)
    }
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Input still (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    spec: SpecArgs,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames computed per parallel chunk.
    #[arg(long, default_value_t = 32)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input still (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    spec: SpecArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = stillmotion::config::load_config(args.config.as_deref())?;
    stillmotion::observability::setup_logging(&config.logging)?;
    tracing::info!("configuration loaded");

    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(stillmotion::server::run(config))
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let spec = args.spec.to_spec()?;
    let base = stillmotion::load_image(&args.in_path)?;

    let opts = stillmotion::AnimateToMp4Opts {
        overwrite: true,
        threading: stillmotion::AnimateThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
        },
    };
    let stats = stillmotion::animate_to_mp4(&base, &spec, &args.out, opts)
        .with_context(|| format!("animate '{}'", args.in_path.display()))?;

    eprintln!(
        "wrote {} ({} frames @ {} fps, {:.2}s)",
        args.out.display(),
        stats.frames_written,
        stats.fps.get(),
        stats.fps.frames_to_secs(stats.frames_written)
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = args.spec.to_spec()?;
    let base = stillmotion::load_image(&args.in_path)?;
    let frame = stillmotion::frame_at(&base, stillmotion::FrameIndex(args.index), &spec)?;
    stillmotion::save_png(&frame.image, &args.out)?;

    eprintln!("wrote {} (scale {:.4})", args.out.display(), frame.scale);
    Ok(())
}
