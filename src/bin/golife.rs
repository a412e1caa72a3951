use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use golife::{Run, RunOpts};

#[derive(Parser, Debug)]
#[command(name = "golife", version, about = "Play the Game of Life over PNG game boards")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a board and write the history as an animated GIF.
    Run(RunArgs),
    /// Render a single indexed frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input PNG game board.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Name for this run.
    #[arg(long, default_value = "game")]
    name: String,

    /// Number of cycles to play.
    #[arg(long, default_value_t = 10)]
    cycles: usize,

    /// Parallel row bands per cycle.
    #[arg(long, default_value_t = 1)]
    bands: usize,

    /// Magnification factor for rendered cells.
    #[arg(long, default_value_t = 1)]
    mag: u32,

    /// Maximum frames in the animation.
    #[arg(long, default_value_t = 20)]
    frames: usize,

    /// Per-frame delay in milliseconds.
    #[arg(long, default_value_t = 5000)]
    delay_ms: i64,

    /// Author embedded in the GIF metadata.
    #[arg(long, default_value = "golife")]
    author: String,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Print the run summary as JSON.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input PNG game board.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of cycles to play before rendering.
    #[arg(long, default_value_t = 10)]
    cycles: usize,

    /// Frame index (0 = initial grid, i > 0 = after-grid of cycle i).
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Magnification factor for rendered cells.
    #[arg(long, default_value_t = 1)]
    mag: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let opts = RunOpts {
        bands: args.bands,
        delay_ms: args.delay_ms,
        author: args.author.clone(),
    };
    let mut run = Run::open(&args.name, &args.in_path.to_string_lossy(), opts)
        .with_context(|| format!("loading '{}'", args.in_path.display()))?;
    run.run(args.cycles)?;

    let gif = run.make_animation(args.frames, args.mag)?;
    fs::write(&args.out, &gif)
        .with_context(|| format!("writing '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), gif.len());

    if args.report {
        println!("{}", serde_json::to_string_pretty(&run.summary())?);
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut run = Run::open("frame", &args.in_path.to_string_lossy(), RunOpts::default())
        .with_context(|| format!("loading '{}'", args.in_path.display()))?;
    run.run(args.cycles)?;

    let png = run.render_frame(args.index, args.mag)?;
    fs::write(&args.out, &png)
        .with_context(|| format!("writing '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), png.len());
    Ok(())
}
