//! # `memviewlib`
//!
//! `memviewlib` is the framework-independent core of a hexadecimal memory viewer widget.
//!
//! The library provides:
//! - A composition root, [`HexDisplay`], owning one byte buffer, a nibble-granular [`Cursor`],
//!   a primary [`Selection`] and a list of [`Highlight`]s.
//! - Bidirectional mapping between byte indices, character cells and pixels ([`Mapper`]).
//! - Dirty byte tracking that survives a shifting start address ([`DirtyTracker`]).
//! - A read-only paint pass against an abstract [`Canvas`], plus a [`TextGrid`] canvas.
//! - Error handling with [`MemViewError`].
//!
//! ## Example
//!
//! ```
//! use memviewlib::{DisplayConfig, HexDisplay};
//!
//! let mut display = HexDisplay::with_data(DisplayConfig::default(), b"AAAA".to_vec(), 100);
//! display.update_at(102, b"BA").unwrap();
//!
//! assert_eq!(display.data(), b"AABA");
//! assert!(display.is_dirty(2));
//! assert!(!display.is_dirty(3));
//! ```

mod config;
mod coords;
mod cursor;
mod dirty;
mod display;
mod error;
mod render;
mod search;
mod selection;
mod viewport;

// Public APIs
pub use config::{DisplayConfig, Palette, Rgba, Settings};
pub use coords::{Cell, CellMetrics, Layout, Mapper, Point, Rect, SelectionBand};
pub use cursor::{Cursor, CursorChanged, Nibble};
pub use dirty::{DirtyTracker, recompute};
pub use display::{DisplayEvent, HexDisplay, NavKey};
pub use error::MemViewError;
pub use render::{Canvas, RenderContext, TextGrid, to_ascii};
pub use search::{SearchType, parse_hex_pattern, search};
pub use selection::{AddressOrigin, Highlight, NamedSelection, Selection};
pub use viewport::{DragState, Viewport};
