//! Behavioural switches for the interpreter.

/// How the interpreter reacts to an instruction word that encodes nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidOpcodePolicy {
    /// Invalid codes in the `8___` and `E___` groups are logged and the
    /// step stalls on them without advancing the program counter. Invalid
    /// codes in the `0___` and `F___` groups halt the machine. Old test
    /// programs rely on this split.
    #[default]
    Faithful,

    /// Every invalid code halts the machine.
    Strict,
}

/// Interpreter configuration. Survives [`super::Chip8::reset`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// See [`InvalidOpcodePolicy`].
    pub invalid_opcode_policy: InvalidOpcodePolicy,
}

impl Config {
    /// A configuration that halts on every invalid opcode.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            invalid_opcode_policy: InvalidOpcodePolicy::Strict,
        }
    }
}
