//! The `error` module defines the [`MemViewError`] enum describing the errors that can occur
//! while updating the buffer of a [`HexDisplay`](crate::HexDisplay), moving its cursor to an
//! explicit address, or loading display settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemViewError {
    /// Update target lies outside of `[start, end]` (end is one past the last byte)
    #[error("Update address 0x{address:X} is outside of the buffer extent 0x{start:X}..=0x{end:X}")]
    UpdateOutOfBounds { address: u64, start: u64, end: u64 },

    /// Address does not hold any byte of the buffer
    #[error("Address 0x{address:X} is outside of the buffer range 0x{start:X}..0x{end:X}")]
    AddressOutOfRange { address: u64, start: u64, end: u64 },

    /// Settings passed parsing but hold unusable values
    #[error("Invalid display configuration: {0}")]
    InvalidConfig(String),

    /// Settings file is not valid TOML for the expected layout
    #[error("Failed to parse display configuration:\n{0}")]
    ConfigParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_out_of_bounds_display() {
        // Arrange
        let err = MemViewError::UpdateOutOfBounds {
            address: 0x20,
            start: 0x10,
            end: 0x14,
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert_eq!(
            msg,
            "Update address 0x20 is outside of the buffer extent 0x10..=0x14"
        );
    }

    #[test]
    fn test_io_error_is_wrapped() {
        // Arrange
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");

        // Act
        let err: MemViewError = io.into();

        // Assert
        assert!(matches!(err, MemViewError::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
