//! Sources of random bytes for the `Cxkk` instruction.
//!
//! The processor never talks to the operating system directly; it asks a
//! [`RandomSource`] owned by the [`super::Chip8`]. Tests can plug in a
//! [`ScriptedRandom`] to get a known sequence.

use std::collections::VecDeque;

use crate::error::Chip8Error;

/// Produces one random byte at a time.
pub trait RandomSource {
    /// Returns the next random byte.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::Random`] if the source cannot produce a byte. The
    /// machine halts on it.
    fn next_byte(&mut self) -> Result<u8, Chip8Error>;
}

/// Random bytes from the operating system via [`getrandom`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_byte(&mut self) -> Result<u8, Chip8Error> {
        let mut buf = [0u8; 1];
        getrandom::getrandom(&mut buf).map_err(Chip8Error::Random)?;
        Ok(buf[0])
    }
}

/// Replays a fixed sequence of bytes, cycling back to the start when it runs
/// out. An empty sequence always yields `0`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    bytes: VecDeque<u8>,
}

impl ScriptedRandom {
    /// Creates a source that replays `bytes` in order, forever.
    #[must_use]
    pub fn new(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            bytes: bytes.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_byte(&mut self) -> Result<u8, Chip8Error> {
        match self.bytes.pop_front() {
            Some(byte) => {
                self.bytes.push_back(byte);
                Ok(byte)
            }
            None => Ok(0),
        }
    }
}
