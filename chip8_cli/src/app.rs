use std::{
    io::{self, Write},
    path::Path,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use chip8::{graphics::Frame, Chip8, Config, StepOutcome};

pub const DEFAULT_STEPS_PER_FRAME: u32 = 10;
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Drives a [`Chip8`]: steps it in batches once per frame, ticks its sound
/// timer and prints the screen whenever it changed.
pub struct App {
    chip8: Chip8,
    pub steps_per_frame: u32,
    pub frame_rate: u32,
    pub max_frames: Option<u64>,
    pub headless: bool,
}

impl App {
    /// Creates a new [`App`] running the program at `rom_path`.
    pub fn new(rom_path: &Path, config: Config) -> anyhow::Result<Self> {
        let mut chip8 = Chip8::new().with_config(config);
        chip8
            .load_program_file(rom_path)
            .with_context(|| format!("Failed to load program from {}", rom_path.display()))?;
        log::info!("Loaded {}", rom_path.display());

        Ok(Self {
            chip8,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            frame_rate: DEFAULT_FRAME_RATE,
            max_frames: None,
            headless: false,
        })
    }

    /// Runs frames until the program hits a terminal error or `max_frames` is reached.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let frame_time = Duration::from_secs(1) / self.frame_rate.max(1);
        let mut frames = 0u64;

        while self.max_frames.map_or(true, |max| frames < max) {
            let started = Instant::now();
            self.run_frame()
                .with_context(|| format!("Program stopped in frame {frames}"))?;
            frames += 1;

            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
        log::info!("Stopped after {frames} frames");
        Ok(())
    }

    /// Executes one frame worth of steps, then ticks the sound timer and redraws.
    fn run_frame(&mut self) -> anyhow::Result<()> {
        for _ in 0..self.steps_per_frame {
            match self.chip8.step()? {
                StepOutcome::Executed => {}
                // no point spinning for the rest of the frame
                StepOutcome::WaitingForKey | StepOutcome::Stalled { .. } => break,
            }
        }

        self.chip8.tick_sound_timer();

        if self.chip8.take_draw_flag() && !self.headless {
            render(self.chip8.display(), &mut io::stdout().lock())?;
        }
        Ok(())
    }
}

/// Prints `frame` as text, two characters per pixel, after moving the cursor home.
fn render(frame: &Frame, out: &mut impl Write) -> io::Result<()> {
    let mut text = String::from("\x1b[H");
    for row in frame {
        for &pixel in row {
            text.push_str(if pixel == 1 { "██" } else { "  " });
        }
        text.push('\n');
    }
    out.write_all(text.as_bytes())?;
    out.flush()
}
