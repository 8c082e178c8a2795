//! This module contains the implementation of the Chip8 central processing
//! unit (CPU). The CPU executes the instructions stored in the memory of the
//! Chip8 computer.

use crate::{
    config::{Config, InvalidOpcodePolicy},
    error::Chip8Error,
    instruction::{Instruction, InvalidGroup},
    memory::{FONT_GLYPH_SIZE, MEMORY_SIZE},
    random::RandomSource,
    Bus,
};

/// The default starting address for the [`Cpu`].
const STARTING_PC: u16 = 0x200;

/// The number of return addresses the stack can hold.
pub const STACK_SIZE: usize = 16;

/// The flag register.
const VF: usize = 0xF;

/// Describes how the program counter should be updated after
/// executing an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgramCounterUpdate {
    /// Go directly to the next instruction (pc + 2)
    Next,

    /// Skip the next instruction (pc + 4).
    SkipNext,

    /// Jump to the given address.
    Jump(u16),

    /// No key is down for `Fx0A`. Nothing changed and the same
    /// instruction runs again on the next cycle.
    WaitForKey,

    /// An invalid opcode that is tolerated. The program counter stays put.
    Stall(u16),
}

/// What a single [`Cpu::cycle`] amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction ran to completion.
    Executed,

    /// The current instruction is waiting for a key press. No state changed,
    /// not even the delay timer.
    WaitingForKey,

    /// The current instruction is invalid but tolerated. The program counter
    /// did not move, so the next cycle will stall on it again.
    Stalled { opcode: u16 },
}

/// This struct represents the central processing unit of a computer.
#[derive(Clone)]
pub struct Cpu {
    /// An array of 16 unsigned 8-bit integers representing the Vx registers.
    pub v: [u8; 16],

    /// The index register.
    pub i: u16,

    /// The program counter.
    pub pc: u16,

    /// The stack pointer, the number of occupied stack slots.
    pub sp: usize,

    /// The return addresses of active subroutine calls.
    pub stack: [u16; STACK_SIZE],

    /// Behavioural switches, see [`Config`].
    pub config: Config,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Create a new [`Cpu`] instance with the program counter set to `STARTING_PC`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            v: [0; 16],
            i: 0,
            pc: STARTING_PC,
            sp: 0,
            stack: [0; STACK_SIZE],
            config: Config {
                invalid_opcode_policy: InvalidOpcodePolicy::Faithful,
            },
        }
    }

    /// Execute one processor cycle. This will fetch, decode, and execute the next
    /// opcode from memory, then tick the delay timer.
    ///
    /// If the instruction is `Fx0A` and no key is down, the cycle changes nothing
    /// at all and returns [`StepOutcome::WaitingForKey`].
    ///
    /// # Errors
    ///
    /// Any [`Chip8Error`] returned here is terminal for the running program.
    pub fn cycle(
        &mut self,
        bus: &mut Bus,
        random: &mut impl RandomSource,
    ) -> Result<StepOutcome, Chip8Error> {
        let opcode = bus.memory.read_word(usize::from(self.pc))?;
        let instruction = Instruction::decode(opcode);
        log::trace!("{:#06X}: {opcode:04X} {instruction}", self.pc);

        let pc_update = self.execute(instruction, bus, random)?;

        let outcome = match pc_update {
            ProgramCounterUpdate::Next => self.jump(self.pc + 2)?,
            ProgramCounterUpdate::SkipNext => self.jump(self.pc + 4)?,
            ProgramCounterUpdate::Jump(addr) => self.jump(addr)?,
            ProgramCounterUpdate::WaitForKey => return Ok(StepOutcome::WaitingForKey),
            ProgramCounterUpdate::Stall(opcode) => StepOutcome::Stalled { opcode },
        };

        bus.clock.tick_delay();
        Ok(outcome)
    }

    /// Moves the program counter to `addr`, refusing to leave memory.
    fn jump(&mut self, addr: u16) -> Result<StepOutcome, Chip8Error> {
        if usize::from(addr) >= MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: usize::from(addr),
            });
        }
        self.pc = addr;
        Ok(StepOutcome::Executed)
    }

    /// Apply the effects of a single instruction onto the [`Cpu`] and the
    /// given [`Bus`].
    fn execute(
        &mut self,
        instruction: Instruction,
        bus: &mut Bus,
        random: &mut impl RandomSource,
    ) -> Result<ProgramCounterUpdate, Chip8Error> {
        use Instruction as I;

        let pc_update = match instruction {
            I::ClearScreen => Self::op_00e0(bus),
            I::Return => self.op_00ee()?,
            I::Jump(nnn) => ProgramCounterUpdate::Jump(nnn),
            I::Call(nnn) => self.op_2nnn(nnn)?,
            I::SkipIfEqualImmediate { x, kk } => Self::skip_if(self.v[x] == kk),
            I::SkipIfNotEqualImmediate { x, kk } => Self::skip_if(self.v[x] != kk),
            I::SkipIfEqual { x, y } => Self::skip_if(self.v[x] == self.v[y]),
            I::LoadImmediate { x, kk } => {
                self.v[x] = kk;
                ProgramCounterUpdate::Next
            }
            I::AddImmediate { x, kk } => {
                self.v[x] = self.v[x].wrapping_add(kk);
                ProgramCounterUpdate::Next
            }
            I::Move { x, y } => {
                self.v[x] = self.v[y];
                ProgramCounterUpdate::Next
            }
            I::Or { x, y } => {
                self.v[x] |= self.v[y];
                ProgramCounterUpdate::Next
            }
            I::And { x, y } => {
                self.v[x] &= self.v[y];
                ProgramCounterUpdate::Next
            }
            I::Xor { x, y } => {
                self.v[x] ^= self.v[y];
                ProgramCounterUpdate::Next
            }
            I::Add { x, y } => self.op_8xy4(x, y),
            I::Sub { x, y } => self.op_8xy5(x, y),
            I::ShiftRight { x } => self.op_8xy6(x),
            I::SubReverse { x, y } => self.op_8xy7(x, y),
            I::ShiftLeft { x } => self.op_8xye(x),
            I::SkipIfNotEqual { x, y } => Self::skip_if(self.v[x] != self.v[y]),
            I::LoadIndex(nnn) => {
                self.i = nnn;
                ProgramCounterUpdate::Next
            }
            I::JumpOffset(nnn) => ProgramCounterUpdate::Jump(nnn + u16::from(self.v[0])),
            I::Random { x, kk } => {
                self.v[x] = random.next_byte()? & kk;
                ProgramCounterUpdate::Next
            }
            I::Draw { x, y, n } => self.op_dxyn(bus, x, y, n)?,
            I::SkipIfKey { x } => Self::skip_if(self.key_pressed(bus, x)?),
            I::SkipIfNotKey { x } => Self::skip_if(!self.key_pressed(bus, x)?),
            I::ReadDelay { x } => {
                self.v[x] = bus.clock.delay_timer;
                ProgramCounterUpdate::Next
            }
            I::WaitKey { x } => self.op_fx0a(bus, x),
            I::SetDelay { x } => {
                bus.clock.delay_timer = self.v[x];
                ProgramCounterUpdate::Next
            }
            I::SetSound { x } => {
                bus.clock.sound_timer = self.v[x];
                ProgramCounterUpdate::Next
            }
            I::AddIndex { x } => {
                self.i = self.i.wrapping_add(u16::from(self.v[x]));
                ProgramCounterUpdate::Next
            }
            I::FontGlyph { x } => {
                // 16-bit product: Vx above 0x33 points past the font instead of wrapping
                self.i = u16::from(self.v[x]) * FONT_GLYPH_SIZE;
                ProgramCounterUpdate::Next
            }
            I::StoreBcd { x } => self.op_fx33(bus, x)?,
            I::StoreRegisters { x } => {
                bus.memory.write(usize::from(self.i), &self.v[..=x])?;
                ProgramCounterUpdate::Next
            }
            I::LoadRegisters { x } => {
                let values = bus.memory.slice(usize::from(self.i), x + 1)?;
                self.v[..=x].copy_from_slice(values);
                ProgramCounterUpdate::Next
            }
            I::Invalid { opcode, group } => self.invalid(opcode, group)?,
        };
        Ok(pc_update)
    }

    fn skip_if(condition: bool) -> ProgramCounterUpdate {
        if condition {
            ProgramCounterUpdate::SkipNext
        } else {
            ProgramCounterUpdate::Next
        }
    }

    fn key_pressed(&self, bus: &Bus, x: usize) -> Result<bool, Chip8Error> {
        let key = self.v[x];
        bus.input
            .is_key_pressed(key)
            .ok_or(Chip8Error::KeyOutOfRange { key })
    }

    fn invalid(&self, opcode: u16, group: InvalidGroup) -> Result<ProgramCounterUpdate, Chip8Error> {
        match (group, self.config.invalid_opcode_policy) {
            (InvalidGroup::Soft, InvalidOpcodePolicy::Faithful) => {
                log::warn!("Invalid opcode {opcode:#06X} at {:#06X}, stalling", self.pc);
                Ok(ProgramCounterUpdate::Stall(opcode))
            }
            _ => Err(Chip8Error::InvalidOpcode {
                opcode,
                address: self.pc,
            }),
        }
    }

    fn op_00e0(bus: &mut Bus) -> ProgramCounterUpdate {
        bus.graphics.clear();
        ProgramCounterUpdate::Next
    }

    fn op_00ee(&mut self) -> Result<ProgramCounterUpdate, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        // the stack holds the call site, so step over the call
        Ok(ProgramCounterUpdate::Jump(self.stack[self.sp] + 2))
    }

    fn op_2nnn(&mut self, nnn: u16) -> Result<ProgramCounterUpdate, Chip8Error> {
        if self.sp == STACK_SIZE {
            return Err(Chip8Error::StackOverflow);
        }
        self.stack[self.sp] = self.pc;
        self.sp += 1;
        Ok(ProgramCounterUpdate::Jump(nnn))
    }

    fn op_8xy4(&mut self, x: usize, y: usize) -> ProgramCounterUpdate {
        let (result, overflow) = self.v[x].overflowing_add(self.v[y]);
        self.v[x] = result;
        self.v[VF] = u8::from(overflow);
        ProgramCounterUpdate::Next
    }

    // In 8xy5, 8xy6, 8xy7 and 8xyE the flag is written before Vx is
    // computed, so an operand living in VF reads the new flag.

    fn op_8xy5(&mut self, x: usize, y: usize) -> ProgramCounterUpdate {
        let no_borrow = self.v[x] > self.v[y];
        self.v[VF] = u8::from(no_borrow);
        // on borrow the operands swap instead of wrapping
        self.v[x] = if no_borrow {
            self.v[x].wrapping_sub(self.v[y])
        } else {
            self.v[y].wrapping_sub(self.v[x])
        };
        ProgramCounterUpdate::Next
    }

    fn op_8xy6(&mut self, x: usize) -> ProgramCounterUpdate {
        self.v[VF] = self.v[x] & 1;
        self.v[x] >>= 1;
        ProgramCounterUpdate::Next
    }

    fn op_8xy7(&mut self, x: usize, y: usize) -> ProgramCounterUpdate {
        self.v[VF] = u8::from(self.v[x] < self.v[y]);
        self.v[x] = self.v[y].wrapping_sub(self.v[x]);
        ProgramCounterUpdate::Next
    }

    fn op_8xye(&mut self, x: usize) -> ProgramCounterUpdate {
        self.v[VF] = self.v[x] >> 7;
        self.v[x] <<= 1;
        ProgramCounterUpdate::Next
    }

    fn op_dxyn(
        &mut self,
        bus: &mut Bus,
        x: usize,
        y: usize,
        n: u8,
    ) -> Result<ProgramCounterUpdate, Chip8Error> {
        let sprite = bus.memory.slice(usize::from(self.i), usize::from(n))?;
        let collision = bus.graphics.draw_sprite(
            usize::from(self.v[x]),
            usize::from(self.v[y]),
            sprite,
        );
        self.v[VF] = u8::from(collision);
        Ok(ProgramCounterUpdate::Next)
    }

    fn op_fx0a(&mut self, bus: &Bus, x: usize) -> ProgramCounterUpdate {
        match bus.input.first_pressed() {
            Some(key) => {
                self.v[x] = key;
                ProgramCounterUpdate::Next
            }
            None => ProgramCounterUpdate::WaitForKey,
        }
    }

    fn op_fx33(&mut self, bus: &mut Bus, x: usize) -> Result<ProgramCounterUpdate, Chip8Error> {
        let value = self.v[x];
        let digits = [value / 100, (value / 10) % 10, value % 10];
        bus.memory.write(usize::from(self.i), &digits)?;
        Ok(ProgramCounterUpdate::Next)
    }
}
