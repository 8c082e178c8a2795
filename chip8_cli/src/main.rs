#![warn(clippy::all, rust_2018_idioms)]

use clap::Parser;

mod app;

/// Runs a Chip8 program in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the program image to run.
    rom: std::path::PathBuf,

    /// Interpreter steps executed per frame.
    #[arg(short, long, default_value_t = app::DEFAULT_STEPS_PER_FRAME)]
    steps_per_frame: u32,

    /// Frames per second. The sound timer is ticked once per frame.
    #[arg(short, long, default_value_t = app::DEFAULT_FRAME_RATE)]
    frame_rate: u32,

    /// Stop after this many frames instead of running until the program halts.
    #[arg(short, long)]
    max_frames: Option<u64>,

    /// Halt on every invalid opcode instead of stalling on some of them.
    #[arg(long)]
    strict: bool,

    /// Do not print the screen.
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    // Log to stdout (if you run with `RUST_LOG=debug`).

    use env_logger::{Builder, Target};
    let mut builder = Builder::from_default_env();

    builder.target(Target::Stdout);
    builder.init();

    let args = Args::parse();
    let config = if args.strict {
        chip8::Config::strict()
    } else {
        chip8::Config::default()
    };

    let mut app = app::App::new(&args.rom, config)?;
    app.steps_per_frame = args.steps_per_frame;
    app.frame_rate = args.frame_rate;
    app.max_frames = args.max_frames;
    app.headless = args.headless;
    app.run()
}
