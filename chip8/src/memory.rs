//! The `memory` module provides a struct and some associated functions to
//! represent the memory of a Chip8 system. The memory is represented as an
//! array of 8-bit unsigned integers ([`u8`]), with a size of 4096 bytes.

use std::ops::Index;

use crate::error::Chip8Error;

/// The total size of the Chip8 memory.
pub const MEMORY_SIZE: usize = 4096;

/// The address programs are loaded at. Everything below it belongs to the interpreter.
pub const PROGRAM_START: usize = 0x200;

/// The largest program image that fits in memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;

/// The number of bytes in a single font glyph.
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Built-in Chip8 font data. This is stored at the start of memory.
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The [`Memory`] struct represents the memory of a Chip8 system.
///
/// Reads through [`Index`] panic on a bad address and are meant for callers
/// that already know the address is valid. The processor goes through
/// [`Memory::read`] and [`Memory::write`], which report
/// [`Chip8Error::MemoryOutOfBounds`] instead.
#[derive(Clone)]
pub struct Memory {
    memory: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..FONT.len()].copy_from_slice(&FONT);
        Self { memory }
    }
}

impl Index<usize> for Memory {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.memory[index]
    }
}

impl Memory {
    /// Creates a new [`Memory`] holding only the font.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the byte at `address`.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::MemoryOutOfBounds`] if `address` is past the end of memory.
    pub fn read(&self, address: usize) -> Result<u8, Chip8Error> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { address })
    }

    /// Reads the big-endian instruction word at `address`.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::MemoryOutOfBounds`] if either byte is past the end of memory.
    pub fn read_word(&self, address: usize) -> Result<u16, Chip8Error> {
        let high = self.read(address)?;
        let low = self.read(address + 1)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Borrows `len` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::MemoryOutOfBounds`] naming the first address past the
    /// end of memory if the range does not fit.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = address + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: address.max(MEMORY_SIZE),
            });
        }
        Ok(&self.memory[address..end])
    }

    /// Writes `data` starting at `address`. Nothing is written unless the
    /// whole range fits.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::MemoryOutOfBounds`] naming the first address past the
    /// end of memory if the range does not fit.
    pub fn write(&mut self, address: usize, data: &[u8]) -> Result<(), Chip8Error> {
        let end = address + data.len();
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: address.max(MEMORY_SIZE),
            });
        }
        self.memory[address..end].copy_from_slice(data);
        Ok(())
    }

    /// Loads the program bytes from `data` at [`PROGRAM_START`]. Memory past
    /// the end of the program is filled with zeroes, so nothing of a previous
    /// program survives.
    ///
    /// # Errors
    ///
    /// [`Chip8Error::ProgramTooLarge`] if `data` is longer than
    /// [`MAX_PROGRAM_SIZE`]. Memory is left untouched in that case.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), Chip8Error> {
        if data.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: data.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }
        let (program, rest) = self.memory[PROGRAM_START..].split_at_mut(data.len());
        program.copy_from_slice(data);
        rest.fill(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_loaded_at_zero() {
        let memory = Memory::new();
        assert_eq!(memory.slice(0, FONT.len()).unwrap(), &FONT);
        let rest = memory.slice(FONT.len(), MEMORY_SIZE - FONT.len()).unwrap();
        assert!(rest.iter().all(|&b| b == 0));
    }

    #[test]
    fn read_word_is_big_endian() {
        let mut memory = Memory::new();
        memory.write(0x300, &[0xA2, 0x2A]).unwrap();
        assert_eq!(memory.read_word(0x300).unwrap(), 0xA22A);
    }

    #[test]
    fn read_word_at_last_byte_is_out_of_bounds() {
        let memory = Memory::new();
        assert!(matches!(
            memory.read_word(MEMORY_SIZE - 1),
            Err(Chip8Error::MemoryOutOfBounds { address: 4096 })
        ));
    }

    #[test]
    fn partial_write_past_end_writes_nothing() {
        let mut memory = Memory::new();
        let result = memory.write(MEMORY_SIZE - 2, &[1, 2, 3]);
        assert!(matches!(result, Err(Chip8Error::MemoryOutOfBounds { address: 4096 })));
        assert_eq!(memory[MEMORY_SIZE - 2], 0);
        assert_eq!(memory[MEMORY_SIZE - 1], 0);
    }

    #[test]
    fn load_rom_zeroes_the_tail() {
        let mut memory = Memory::new();
        memory.load_rom(&[0xAA; 16]).unwrap();
        memory.load_rom(&[0xBB; 4]).unwrap();
        assert_eq!(memory.slice(PROGRAM_START, 4).unwrap(), &[0xBB; 4]);
        assert_eq!(memory[PROGRAM_START + 4], 0);
        assert_eq!(memory[PROGRAM_START + 15], 0);
    }

    #[test]
    fn load_rom_too_large_leaves_memory_alone() {
        let mut memory = Memory::new();
        memory.load_rom(&[0x11; 8]).unwrap();
        let result = memory.load_rom(&vec![0xFF; MAX_PROGRAM_SIZE + 1]);
        assert!(matches!(
            result,
            Err(Chip8Error::ProgramTooLarge { size: 3585, max_size: 3584 })
        ));
        assert_eq!(memory[PROGRAM_START], 0x11);
        assert_eq!(memory[PROGRAM_START + 8], 0);
    }
}
