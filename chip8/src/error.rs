//! Errors reported by the [`super::Chip8`] loader and interpreter.

/// Everything that can go wrong while loading or running a program.
///
/// [`Chip8Error::ProgramTooLarge`] and [`Chip8Error::Io`] are reported by the
/// loader and leave the machine untouched. Every other variant is terminal:
/// the machine halts and any further [`super::Chip8::step`] returns
/// [`Chip8Error::Halted`].
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    /// The program image does not fit between the load address and the end of memory.
    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    /// The program image could not be read from its source.
    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),

    /// The instruction word does not encode any known operation.
    #[error("invalid opcode {opcode:#06X} at {address:#06X}")]
    InvalidOpcode { opcode: u16, address: u16 },

    /// A fetch, load or store touched an address outside of memory.
    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    /// A subroutine call was made with all 16 stack slots in use.
    #[error("stack overflow: more than 16 nested subroutine calls")]
    StackOverflow,

    /// A return was executed with an empty call stack.
    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    /// A key instruction named a key outside of `0x0..=0xF`.
    #[error("key {key:#04X} is out of range")]
    KeyOutOfRange { key: u8 },

    /// The random source could not produce a byte for `Cxkk`.
    #[error("failed to get a random byte: {0}")]
    Random(getrandom::Error),

    /// The machine stopped on an earlier terminal error.
    #[error("the machine is halted")]
    Halted,
}
