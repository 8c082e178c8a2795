//! Decoding of 16-bit instruction words.
//!
//! An instruction word is four nibbles `[a][x][y][n]`, or `[a][x][kk]`, or
//! `[a][nnn]`: `a` selects the group, `x` and `y` name registers, `kk` is an
//! 8-bit immediate and `nnn` a 12-bit address. [`Instruction::decode`] turns a
//! word into one [`Instruction`]; words that encode nothing become
//! [`Instruction::Invalid`] so that the processor has to handle them
//! explicitly.

use std::fmt;

/// Which kind of group an invalid word was found in. This decides what
/// [`crate::config::InvalidOpcodePolicy::Faithful`] does with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGroup {
    /// `8___` and `E___`: logged, and the step stalls on the word.
    Soft,
    /// `0___` and `F___`: the machine halts.
    Fatal,
}

/// One decoded instruction. Register fields are indices into `V0..=VF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    ClearScreen,
    /// `00EE`
    Return,
    /// `1nnn`
    Jump(u16),
    /// `2nnn`
    Call(u16),
    /// `3xkk`
    SkipIfEqualImmediate { x: usize, kk: u8 },
    /// `4xkk`
    SkipIfNotEqualImmediate { x: usize, kk: u8 },
    /// `5xy0`
    SkipIfEqual { x: usize, y: usize },
    /// `6xkk`
    LoadImmediate { x: usize, kk: u8 },
    /// `7xkk`
    AddImmediate { x: usize, kk: u8 },
    /// `8xy0`
    Move { x: usize, y: usize },
    /// `8xy1`
    Or { x: usize, y: usize },
    /// `8xy2`
    And { x: usize, y: usize },
    /// `8xy3`
    Xor { x: usize, y: usize },
    /// `8xy4`
    Add { x: usize, y: usize },
    /// `8xy5`
    Sub { x: usize, y: usize },
    /// `8xy6`
    ShiftRight { x: usize },
    /// `8xy7`
    SubReverse { x: usize, y: usize },
    /// `8xyE`
    ShiftLeft { x: usize },
    /// `9xy0`
    SkipIfNotEqual { x: usize, y: usize },
    /// `Annn`
    LoadIndex(u16),
    /// `Bnnn`
    JumpOffset(u16),
    /// `Cxkk`
    Random { x: usize, kk: u8 },
    /// `Dxyn`
    Draw { x: usize, y: usize, n: u8 },
    /// `Ex9E`
    SkipIfKey { x: usize },
    /// `ExA1`
    SkipIfNotKey { x: usize },
    /// `Fx07`
    ReadDelay { x: usize },
    /// `Fx0A`
    WaitKey { x: usize },
    /// `Fx15`
    SetDelay { x: usize },
    /// `Fx18`
    SetSound { x: usize },
    /// `Fx1E`
    AddIndex { x: usize },
    /// `Fx29`
    FontGlyph { x: usize },
    /// `Fx33`
    StoreBcd { x: usize },
    /// `Fx55`
    StoreRegisters { x: usize },
    /// `Fx65`
    LoadRegisters { x: usize },
    /// A word that encodes nothing.
    Invalid { opcode: u16, group: InvalidGroup },
}

impl Instruction {
    /// Decodes a single instruction word.
    #[must_use]
    pub fn decode(opcode: u16) -> Self {
        let x = usize::from((opcode & 0x0F00) >> 8);
        let y = usize::from((opcode & 0x00F0) >> 4);
        let n = (opcode & 0x000F) as u8;
        let kk = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;

        match opcode >> 12 {
            // the middle nibble of 0x_E0 and 0x_EE is not checked
            0x0 => match kk {
                0xE0 => Self::ClearScreen,
                0xEE => Self::Return,
                _ => Self::Invalid {
                    opcode,
                    group: InvalidGroup::Fatal,
                },
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x3 => Self::SkipIfEqualImmediate { x, kk },
            0x4 => Self::SkipIfNotEqualImmediate { x, kk },
            // the low nibble of 5xy_ and 9xy_ is not checked
            0x5 => Self::SkipIfEqual { x, y },
            0x6 => Self::LoadImmediate { x, kk },
            0x7 => Self::AddImmediate { x, kk },
            0x8 => match n {
                0x0 => Self::Move { x, y },
                0x1 => Self::Or { x, y },
                0x2 => Self::And { x, y },
                0x3 => Self::Xor { x, y },
                0x4 => Self::Add { x, y },
                0x5 => Self::Sub { x, y },
                0x6 => Self::ShiftRight { x },
                0x7 => Self::SubReverse { x, y },
                0xE => Self::ShiftLeft { x },
                _ => Self::Invalid {
                    opcode,
                    group: InvalidGroup::Soft,
                },
            },
            0x9 => Self::SkipIfNotEqual { x, y },
            0xA => Self::LoadIndex(nnn),
            0xB => Self::JumpOffset(nnn),
            0xC => Self::Random { x, kk },
            0xD => Self::Draw { x, y, n },
            0xE => match kk {
                0x9E => Self::SkipIfKey { x },
                0xA1 => Self::SkipIfNotKey { x },
                _ => Self::Invalid {
                    opcode,
                    group: InvalidGroup::Soft,
                },
            },
            0xF => match kk {
                0x07 => Self::ReadDelay { x },
                0x0A => Self::WaitKey { x },
                0x15 => Self::SetDelay { x },
                0x18 => Self::SetSound { x },
                0x1E => Self::AddIndex { x },
                0x29 => Self::FontGlyph { x },
                0x33 => Self::StoreBcd { x },
                0x55 => Self::StoreRegisters { x },
                0x65 => Self::LoadRegisters { x },
                _ => Self::Invalid {
                    opcode,
                    group: InvalidGroup::Fatal,
                },
            },
            _ => unreachable!("a u16 shifted right by 12 is a single nibble"),
        }
    }
}

impl fmt::Display for Instruction {
    /// A display-friendly explanation of what the instruction does.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "Clear the screen"),
            Self::Return => write!(f, "Return from subroutine"),
            Self::Jump(nnn) => write!(f, "Jump to addr {nnn:#06X}"),
            Self::Call(nnn) => write!(f, "Call subroutine at {nnn:#06X}"),
            Self::SkipIfEqualImmediate { x, kk } => {
                write!(f, "If V{x:X} == {kk:#04X}, skip next instr")
            }
            Self::SkipIfNotEqualImmediate { x, kk } => {
                write!(f, "If V{x:X} != {kk:#04X}, skip next instr")
            }
            Self::SkipIfEqual { x, y } => write!(f, "If V{x:X} == V{y:X}, skip next instr"),
            Self::LoadImmediate { x, kk } => write!(f, "Set V{x:X} to {kk:#04X}"),
            Self::AddImmediate { x, kk } => write!(f, "Add {kk:#04X} to V{x:X}"),
            Self::Move { x, y } => write!(f, "Set V{x:X} to V{y:X}"),
            Self::Or { x, y } => write!(f, "Set V{x:X} to V{x:X} OR V{y:X}"),
            Self::And { x, y } => write!(f, "Set V{x:X} to V{x:X} AND V{y:X}"),
            Self::Xor { x, y } => write!(f, "Set V{x:X} to V{x:X} XOR V{y:X}"),
            Self::Add { x, y } => write!(f, "Set V{x:X} to V{x:X} + V{y:X}, VF = carry"),
            Self::Sub { x, y } => write!(f, "Set V{x:X} to V{x:X} - V{y:X}, VF = not borrow"),
            Self::ShiftRight { x } => write!(f, "V{x:X} shifted one right, VF = low bit"),
            Self::SubReverse { x, y } => {
                write!(f, "Set V{x:X} to V{y:X} - V{x:X}, VF = not borrow")
            }
            Self::ShiftLeft { x } => write!(f, "V{x:X} shifted one left, VF = high bit"),
            Self::SkipIfNotEqual { x, y } => write!(f, "If V{x:X} != V{y:X}, skip next instr"),
            Self::LoadIndex(nnn) => write!(f, "Set I register to {nnn:#06X}"),
            Self::JumpOffset(nnn) => write!(f, "Jump to {nnn:#06X} + V0"),
            Self::Random { x, kk } => write!(f, "Set V{x:X} to [rand] AND {kk:#04X}"),
            Self::Draw { x, y, n } => {
                write!(f, "Draw {n} byte sprite from addr I at point (V{x:X}, V{y:X})")
            }
            Self::SkipIfKey { x } => write!(f, "Skip next instr if key V{x:X} pressed"),
            Self::SkipIfNotKey { x } => write!(f, "Skip next instr if key V{x:X} not pressed"),
            Self::ReadDelay { x } => write!(f, "Set V{x:X} to delay timer"),
            Self::WaitKey { x } => write!(f, "Store next key press in V{x:X}"),
            Self::SetDelay { x } => write!(f, "Set delay timer to V{x:X}"),
            Self::SetSound { x } => write!(f, "Set sound timer to V{x:X}"),
            Self::AddIndex { x } => write!(f, "Set I to I + V{x:X}"),
            Self::FontGlyph { x } => write!(f, "Set I to addr of sprite digit V{x:X}"),
            Self::StoreBcd { x } => write!(f, "Store BCD of V{x:X} starting at I"),
            Self::StoreRegisters { x } => write!(f, "Store V0 to V{x:X} starting at I"),
            Self::LoadRegisters { x } => write!(f, "Read memory at I into V0 to V{x:X}"),
            Self::Invalid { opcode, .. } => write!(f, "Invalid instruction {opcode:#06X}"),
        }
    }
}
