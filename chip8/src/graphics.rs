//! This module provides a monochrome graphics buffer with a fixed resolution of 64x32 pixels.

/// The height of the graphics buffer in pixels.
pub const HEIGHT: usize = 32;
/// The width of the graphics buffer in pixels.
pub const WIDTH: usize = 64;

/// A snapshot of the screen: [`HEIGHT`] rows of [`WIDTH`] pixels, each `0` or `1`.
pub type Frame = [[u8; WIDTH]; HEIGHT];

/// The display buffer. Pixels only change through [`Buffer::clear`] and
/// [`Buffer::draw_sprite`], and both raise the draw-requested flag for the
/// presentation side to consume with [`Buffer::take_draw_flag`].
#[derive(Clone, Copy)]
pub struct Buffer {
    vram: Frame,
    draw_requested: bool,
}

impl Default for Buffer {
    /// A blank screen. The draw flag starts raised so the first frame gets shown.
    fn default() -> Self {
        Self {
            vram: [[0; WIDTH]; HEIGHT],
            draw_requested: true,
        }
    }
}

impl Buffer {
    /// Creates a new blank [`Buffer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// XOR-draws one 8-pixel row of a sprite with its left edge at (`x`, `y`).
    /// Every pixel wraps around both edges of the screen independently, so a
    /// row starting at column 63 continues at column 0.
    ///
    /// Returns `true` if any pixel went from set to unset.
    pub fn draw_byte(&mut self, x: usize, y: usize, data: u8) -> bool {
        let row = y % HEIGHT;
        let mut collision = false;

        for bit in 0..8 {
            if data & (0x80 >> bit) == 0 {
                continue;
            }
            let pixel = &mut self.vram[row][(x + bit) % WIDTH];
            if *pixel == 1 {
                collision = true;
            }
            *pixel ^= 1;
        }
        collision
    }

    /// Draws every row of `sprite` starting at (`x`, `y`), one row per line
    /// downwards, and raises the draw flag.
    ///
    /// Returns `true` if any pixel went from set to unset.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (offset, &data) in sprite.iter().enumerate() {
            collision |= self.draw_byte(x, y + offset, data);
        }
        self.draw_requested = true;
        collision
    }

    /// Clears every pixel and raises the draw flag.
    #[inline]
    pub fn clear(&mut self) {
        self.vram = [[0; WIDTH]; HEIGHT];
        self.draw_requested = true;
    }

    /// The current pixels.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.vram
    }

    /// Whether the pixel at (`x`, `y`) is set.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.vram[y % HEIGHT][x % WIDTH] == 1
    }

    /// Returns whether the screen changed since the last call and lowers the flag.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::take(&mut self.draw_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_flag_is_read_and_clear() {
        let mut buffer = Buffer::new();
        assert!(buffer.take_draw_flag());
        assert!(!buffer.take_draw_flag());
        buffer.clear();
        assert!(buffer.take_draw_flag());
        assert!(!buffer.take_draw_flag());
    }

    #[test]
    fn draw_byte_sets_bits_msb_first() {
        let mut buffer = Buffer::new();
        assert!(!buffer.draw_byte(10, 3, 0b1010_0000));
        assert!(buffer.pixel(10, 3));
        assert!(!buffer.pixel(11, 3));
        assert!(buffer.pixel(12, 3));
        assert!(!buffer.pixel(13, 3));
    }

    #[test]
    fn draw_byte_wraps_horizontally() {
        let mut buffer = Buffer::new();
        buffer.draw_byte(62, 0, 0xF0);
        assert!(buffer.pixel(62, 0));
        assert!(buffer.pixel(63, 0));
        assert!(buffer.pixel(0, 0));
        assert!(buffer.pixel(1, 0));
        assert!(!buffer.pixel(2, 0));
    }

    #[test]
    fn draw_sprite_wraps_vertically() {
        let mut buffer = Buffer::new();
        buffer.draw_sprite(0, 31, &[0x80, 0x80]);
        assert!(buffer.pixel(0, 31));
        assert!(buffer.pixel(0, 0));
    }

    #[test]
    fn only_set_to_unset_is_a_collision() {
        let mut buffer = Buffer::new();
        assert!(!buffer.draw_byte(0, 0, 0b1000_0000));
        assert!(!buffer.draw_byte(0, 0, 0b0100_0000));
        assert!(buffer.draw_byte(0, 0, 0b1000_0000));
        assert!(!buffer.pixel(0, 0));
        assert!(buffer.pixel(1, 0));
    }

    #[test]
    fn clear_blanks_every_pixel() {
        let mut buffer = Buffer::new();
        buffer.draw_sprite(5, 5, &[0xFF; 15]);
        buffer.clear();
        assert_eq!(buffer.frame(), &[[0; WIDTH]; HEIGHT]);
    }
}
