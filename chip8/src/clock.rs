//! This module holds the delay and sound timers of a Chip8 system.
//!
//! There is no wall clock in here. The delay timer is ticked once per
//! interpreter step; the sound timer is ticked by whoever drives the machine,
//! usually at 60Hz. Both stop at zero.

/// The two countdown timers.
#[derive(Clone, Copy, Default)]
pub struct Clock {
    /// The current value of the delay timer.
    pub delay_timer: u8,
    /// The current value of the sound timer. A tone should play while it is above zero.
    pub sound_timer: u8,
}

impl Clock {
    /// Create a new `Clock` with both timers at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decrements the delay timer unless it is already zero.
    pub fn tick_delay(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
    }

    /// Decrements the sound timer unless it is already zero.
    pub fn tick_sound(&mut self) {
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_saturate_at_zero() {
        let mut clock = Clock {
            delay_timer: 1,
            sound_timer: 1,
        };
        for _ in 0..3 {
            clock.tick_delay();
            clock.tick_sound();
        }
        assert_eq!(clock.delay_timer, 0);
        assert_eq!(clock.sound_timer, 0);
    }

    #[test]
    fn timers_are_independent() {
        let mut clock = Clock {
            delay_timer: 5,
            sound_timer: 5,
        };
        clock.tick_delay();
        assert_eq!(clock.delay_timer, 4);
        assert_eq!(clock.sound_timer, 5);
    }
}
