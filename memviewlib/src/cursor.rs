//! The `cursor` module provides the [`Cursor`], an (index, nibble) pair moved by explicit
//! command methods. Each command returns a [`CursorChanged`] value when, and only when,
//! the position actually changed, so the owner can react (e.g. scroll it into view).

use tracing::trace;

/// Selects one of the two hex digits of a byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nibble {
    /// First (most significant) digit
    #[default]
    High,
    /// Second (least significant) digit
    Low,
}

impl Nibble {
    /// Sub-column of the nibble within the two hex digits of a byte
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Low => 1,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Buffer index (not the absolute address)
    pub address: usize,
    pub nibble: Nibble,
}

/// Notification value produced by every cursor command that changed the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorChanged {
    pub previous: Cursor,
    pub current: Cursor,
}

impl Cursor {
    #[must_use]
    pub const fn new(address: usize, nibble: Nibble) -> Self {
        Self { address, nibble }
    }

    /// Apply `f` to a copy of the cursor and commit it. Reports a single change at most.
    fn apply(&mut self, f: impl FnOnce(&mut Self)) -> Option<CursorChanged> {
        let previous = *self;
        let mut next = *self;
        f(&mut next);

        if next == previous {
            return None;
        }
        *self = next;
        trace!(from = ?previous, to = ?next, "cursor moved");

        Some(CursorChanged {
            previous,
            current: next,
        })
    }

    /// Copy both fields from `other`
    pub fn update(&mut self, other: Self) -> Option<CursorChanged> {
        self.apply(|c| *c = other)
    }

    pub fn set_address(&mut self, address: usize) -> Option<CursorChanged> {
        self.apply(|c| c.address = address)
    }

    pub fn set_nibble(&mut self, nibble: Nibble) -> Option<CursorChanged> {
        self.apply(|c| c.nibble = nibble)
    }

    /// Move one hex digit right. Stops at the low nibble of the last byte (`len - 1`).
    pub fn move_right(&mut self, len: usize) -> Option<CursorChanged> {
        self.apply(|c| match c.nibble {
            Nibble::High => c.nibble = Nibble::Low,
            Nibble::Low => {
                if c.address + 1 < len {
                    c.address += 1;
                    c.nibble = Nibble::High;
                }
            }
        })
    }

    /// Move one hex digit left. Stops at the high nibble of the first byte.
    pub fn move_left(&mut self) -> Option<CursorChanged> {
        self.apply(|c| match c.nibble {
            Nibble::Low => c.nibble = Nibble::High,
            Nibble::High => {
                if c.address > 0 {
                    c.address -= 1;
                    c.nibble = Nibble::Low;
                }
            }
        })
    }

    /// Move back by `amount` bytes, stopping at index 0
    pub fn rewind(&mut self, amount: usize) -> Option<CursorChanged> {
        self.apply(|c| c.address = c.address.saturating_sub(amount))
    }

    /// Move forward by `amount` bytes, stopping at the last byte of a `len` long buffer
    pub fn forward(&mut self, amount: usize, len: usize) -> Option<CursorChanged> {
        self.apply(|c| {
            c.address = c
                .address
                .saturating_add(amount)
                .min(len.saturating_sub(1));
        })
    }

    /// Pull the cursor back inside a `len` long buffer
    pub fn clamp(&mut self, len: usize) -> Option<CursorChanged> {
        self.apply(|c| c.address = c.address.min(len.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_right_flips_nibble_then_advances() {
        // Arrange
        let mut cursor = Cursor::new(3, Nibble::High);

        // Act
        let first = cursor.move_right(10);
        let after_first = cursor;
        let second = cursor.move_right(10);

        // Assert
        assert!(first.is_some());
        assert_eq!(after_first, Cursor::new(3, Nibble::Low));
        assert!(second.is_some());
        assert_eq!(cursor, Cursor::new(4, Nibble::High));
    }

    #[test]
    fn test_move_left_mirrors_move_right() {
        // Arrange
        let mut cursor = Cursor::new(4, Nibble::High);

        // Act
        cursor.move_left();
        let after_first = cursor;
        cursor.move_left();

        // Assert
        assert_eq!(after_first, Cursor::new(3, Nibble::Low));
        assert_eq!(cursor, Cursor::new(3, Nibble::High));
    }

    #[test]
    fn test_move_left_at_origin_is_noop() {
        // Arrange
        let mut cursor = Cursor::default();

        // Act
        let res = cursor.move_left();

        // Assert
        assert!(res.is_none());
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn test_move_right_stops_at_last_byte() {
        // Arrange
        let mut cursor = Cursor::new(9, Nibble::Low);

        // Act
        let res = cursor.move_right(10);

        // Assert
        assert!(res.is_none());
        assert_eq!(cursor, Cursor::new(9, Nibble::Low));
    }

    #[test]
    fn test_rewind_clamps_at_zero() {
        // Arrange
        let mut cursor = Cursor::new(5, Nibble::Low);

        // Act
        let res = cursor.rewind(32);

        // Assert
        assert_eq!(
            res,
            Some(CursorChanged {
                previous: Cursor::new(5, Nibble::Low),
                current: Cursor::new(0, Nibble::Low),
            })
        );
    }

    #[test]
    fn test_forward_past_end_is_clamped() {
        // Boundary deliberately tightened: advancing past the end lands on the last byte
        // instead of leaving the cursor on a byte that does not exist.

        // Arrange
        let mut cursor = Cursor::new(60, Nibble::High);

        // Act
        cursor.forward(32, 64);

        // Assert
        assert_eq!(cursor.address, 63);
    }

    #[test]
    fn test_update_fires_once_for_both_fields() {
        // Arrange
        let mut cursor = Cursor::new(1, Nibble::High);

        // Act
        let res = cursor.update(Cursor::new(7, Nibble::Low));

        // Assert
        assert_eq!(
            res,
            Some(CursorChanged {
                previous: Cursor::new(1, Nibble::High),
                current: Cursor::new(7, Nibble::Low),
            })
        );
    }

    #[test]
    fn test_update_with_same_value_is_silent() {
        // Arrange
        let mut cursor = Cursor::new(7, Nibble::Low);

        // Act
        let res = cursor.update(Cursor::new(7, Nibble::Low));

        // Assert
        assert!(res.is_none());
    }

    #[test]
    fn test_clamp_into_shrunk_buffer() {
        // Arrange
        let mut cursor = Cursor::new(40, Nibble::Low);

        // Act
        cursor.clamp(8);

        // Assert
        assert_eq!(cursor, Cursor::new(7, Nibble::Low));
    }
}
