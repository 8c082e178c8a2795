//! An interpreter for the Chip8 virtual machine.
//!
//! [`Chip8`] owns the whole machine and is driven from outside: the caller
//! loads a program, calls [`Chip8::step`] at whatever rate it likes, feeds key
//! presses in with [`Chip8::key_down`] and [`Chip8::key_up`], and redraws the
//! screen whenever [`Chip8::take_draw_flag`] says so. Pacing, audio and
//! rendering are left to the caller.
//!
//! ```
//! use chip8::{Chip8, StepOutcome};
//!
//! let mut chip8 = Chip8::new();
//! // V0 = 0x2A, then jump to self
//! chip8.load_program(&[0x60, 0x2A, 0x12, 0x02]).unwrap();
//! assert_eq!(chip8.step().unwrap(), StepOutcome::Executed);
//! assert_eq!(chip8.processor.v[0], 0x2A);
//! ```

use std::{fs::File, io::Read, path::Path};

use crate::processor::Cpu;

pub mod clock;
pub mod config;
pub mod error;
pub mod graphics;
pub mod input;
pub mod instruction;
pub mod memory;
pub mod processor;
pub mod random;

pub use config::{Config, InvalidOpcodePolicy};
pub use error::Chip8Error;
pub use graphics::Frame;
pub use processor::StepOutcome;
pub use random::{OsRandom, RandomSource, ScriptedRandom};

/// The [`Bus`] struct contains fields for different components of a computer system
#[derive(Default, Clone)]
pub struct Bus {
    /// The delay and sound timers.
    pub clock: clock::Clock,

    /// The display buffer of the computer, along with its draw-requested flag.
    pub graphics: graphics::Buffer,

    /// The state of the 16 keys.
    pub input: input::Input,

    /// The memory of the computer, holding the font, the program and its data.
    pub memory: memory::Memory,
}

/// The [`Chip8`] struct represents a computer system that uses the Chip-8 virtual machine.
///
/// `R` supplies the random bytes for the `Cxkk` instruction.
pub struct Chip8<R = OsRandom> {
    /// An instance of the [`Cpu`] struct, which represents the CPU of
    /// the system. This is responsible for executing the instructions in
    /// memory.
    pub processor: Cpu,

    /// An instance of the [`Bus`] struct, which represents the different
    /// components of the system.
    pub bus: Bus,

    random: R,

    /// Set once a step fails with a terminal error.
    halted: bool,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    /// Creates a new [`Chip8`] with a zeroed machine, the font in place,
    /// the program counter at `0x200` and OS randomness.
    #[must_use]
    pub fn new() -> Self {
        Self::with_random(OsRandom)
    }
}

impl<R: RandomSource> Chip8<R> {
    /// Creates a new [`Chip8`] that draws its random bytes from `random`.
    #[must_use]
    pub fn with_random(random: R) -> Self {
        Self {
            processor: Cpu::new(),
            bus: Bus::default(),
            random,
            halted: false,
        }
    }

    /// Replaces the configuration, keeping the rest of the machine as is.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.processor.config = config;
        self
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        self.processor.config
    }

    /// Executes exactly one instruction and ticks the delay timer.
    ///
    /// Returns [`StepOutcome::WaitingForKey`] without changing anything when
    /// the program is blocked on `Fx0A`; the caller simply steps again later.
    ///
    /// # Errors
    ///
    /// A terminal [`Chip8Error`] if the instruction cannot be executed. The
    /// machine is halted from then on and every later call returns
    /// [`Chip8Error::Halted`] until [`Chip8::reset`].
    pub fn step(&mut self) -> Result<StepOutcome, Chip8Error> {
        if self.halted {
            return Err(Chip8Error::Halted);
        }
        self.processor
            .cycle(&mut self.bus, &mut self.random)
            .map_err(|e| {
                log::error!("Halting at {:#06X}: {e}", self.processor.pc);
                self.halted = true;
                e
            })
    }

    /// Whether an earlier step failed with a terminal error.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Copies `data` into memory at `0x200`. Memory past the program is zeroed.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::ProgramTooLarge`] if `data` is longer than
    /// [`memory::MAX_PROGRAM_SIZE`]; memory is left untouched.
    pub fn load_program(&mut self, data: &[u8]) -> Result<(), Chip8Error> {
        self.bus.memory.load_rom(data)?;
        log::debug!("Loaded {} byte program", data.len());
        Ok(())
    }

    /// Reads a whole program image from `reader` and loads it.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::Io`] if reading fails and [`Chip8Error::ProgramTooLarge`]
    /// if the image does not fit. Memory is untouched in both cases.
    pub fn load_program_from(&mut self, reader: impl Read) -> Result<(), Chip8Error> {
        let mut data = Vec::new();
        // one byte more than fits is enough to know it does not fit
        let limit = memory::MAX_PROGRAM_SIZE as u64 + 1;
        reader.take(limit).read_to_end(&mut data)?;
        if data.len() > memory::MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: data.len(),
                max_size: memory::MAX_PROGRAM_SIZE,
            });
        }
        self.load_program(&data)
    }

    /// Reads the program image at `path` and loads it.
    ///
    /// # Errors
    ///
    /// See [`Chip8::load_program_from`].
    pub fn load_program_file(&mut self, path: impl AsRef<Path>) -> Result<(), Chip8Error> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        if size > memory::MAX_PROGRAM_SIZE as u64 {
            return Err(Chip8Error::ProgramTooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                max_size: memory::MAX_PROGRAM_SIZE,
            });
        }
        log::debug!("Reading program from {}", path.display());
        self.load_program_from(File::open(path)?)
    }

    /// Marks the key `key_code` as held down.
    ///
    /// # Panics
    ///
    /// If `key_code` is not in `0x0..=0xF`.
    pub fn key_down(&mut self, key_code: u8) {
        self.bus.input.update(key_code, true);
    }

    /// Marks the key `key_code` as released.
    ///
    /// # Panics
    ///
    /// If `key_code` is not in `0x0..=0xF`.
    pub fn key_up(&mut self, key_code: u8) {
        self.bus.input.update(key_code, false);
    }

    /// The current screen contents.
    #[must_use]
    pub fn display(&self) -> &Frame {
        self.bus.graphics.frame()
    }

    /// Returns whether the screen changed since the last call, and clears the flag.
    pub fn take_draw_flag(&mut self) -> bool {
        self.bus.graphics.take_draw_flag()
    }

    /// The current value of the delay timer.
    #[must_use]
    pub fn delay_timer(&self) -> u8 {
        self.bus.clock.delay_timer
    }

    /// The current value of the sound timer. A tone should play while it is above zero.
    #[must_use]
    pub fn sound_timer(&self) -> u8 {
        self.bus.clock.sound_timer
    }

    /// Counts the sound timer down by one. Meant to be called at 60Hz by
    /// the driving loop; the interpreter itself never ticks it.
    pub fn tick_sound_timer(&mut self) {
        self.bus.clock.tick_sound();
    }

    /// Puts the machine back into its power-on state. The configuration and
    /// the random source are kept.
    pub fn reset(&mut self) {
        let config = self.processor.config;
        self.bus = Bus::default();
        self.processor = Cpu::new();
        self.processor.config = config;
        self.halted = false;
    }

    /// Resets the machine with [`Chip8::reset`], then loads `data` with
    /// [`Chip8::load_program`].
    ///
    /// # Errors
    ///
    /// See [`Chip8::load_program`]. The machine is reset either way.
    pub fn reset_and_load(&mut self, data: &[u8]) -> Result<(), Chip8Error> {
        self.reset();
        self.load_program(data)
    }
}
