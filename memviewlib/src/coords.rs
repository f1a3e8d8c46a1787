//! Coordinate juggling between byte indices, character cells and pixels.
//!
//! A line is laid out in character cells as
//!
//! ```text
//! | addr_start | address | gap_data | hex zone (3 * bpl - 1) | gap_code | ascii zone (bpl) |
//! ```
//!
//! Every hex byte takes two digit cells followed by one separator cell (omitted after the last
//! byte of a line). [`Mapper`] converts in both directions given the current scroll position.

use crate::config::DisplayConfig;
use crate::cursor::{Cursor, Nibble};
use std::ops::RangeInclusive;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Size of one glyph cell of the monospace font, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

/// Character cell position. Rows are relative to the first visible line and may be negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i64,
    pub row: i64,
}

impl Cell {
    #[must_use]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }
}

/// Column zones of a line, in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub bytes_per_line: usize,
    pub address_digits: usize,
    pub addr_start: usize,
    pub gap_data: usize,
    pub gap_code: usize,
}

impl From<&DisplayConfig> for Layout {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            bytes_per_line: config.bytes_per_line.max(1),
            address_digits: config.address_digits,
            addr_start: config.addr_start,
            gap_data: config.gap_data,
            gap_code: config.gap_code,
        }
    }
}

impl Layout {
    /// Width of the hex zone (no separator after the last byte)
    #[must_use]
    pub const fn data_width(&self) -> usize {
        self.bytes_per_line * 3 - 1
    }

    /// First column of the hex zone
    #[must_use]
    pub const fn data_start(&self) -> usize {
        self.addr_start + self.address_digits + self.gap_data
    }

    /// First column of the ASCII zone
    #[must_use]
    pub const fn code_start(&self) -> usize {
        self.data_start() + self.data_width() + self.gap_code
    }

    #[must_use]
    pub const fn total_chars_per_line(&self) -> usize {
        self.bytes_per_line * 4 + self.address_digits + self.addr_start + self.gap_data + self.gap_code
    }

    /// Number of lines needed for `len` bytes
    #[must_use]
    pub const fn num_lines(&self, len: usize) -> usize {
        len.div_ceil(self.bytes_per_line)
    }
}

/// One line of a selection, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBand {
    pub row: i64,
    pub hex: Rect,
    pub ascii: Rect,
}

/// Pure index/cell/pixel conversions for one scroll position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapper {
    pub layout: Layout,
    pub metrics: CellMetrics,
    /// Pixel offset of the first line
    pub top_margin: f32,
    /// Buffer index shown at the start of the first visible line
    pub first_index: usize,
    /// Horizontal scroll in character cells
    pub hscroll: usize,
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
impl Mapper {
    const fn bpl(&self) -> i64 {
        self.layout.bytes_per_line as i64
    }

    /// Row of the index relative to the first visible line
    #[must_use]
    pub const fn row_of(&self, index: usize) -> i64 {
        (index as i64 - self.first_index as i64).div_euclid(self.bpl())
    }

    /// Position of the byte within its line
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.layout.bytes_per_line
    }

    /// Cell of the given nibble of the byte at `index`
    #[must_use]
    pub const fn hex_cell(&self, index: usize, nibble: Nibble) -> Cell {
        let col = self.layout.data_start() + 3 * self.column_of(index) + nibble.index();
        Cell::new(col as i64, self.row_of(index))
    }

    #[must_use]
    pub const fn ascii_cell(&self, index: usize) -> Cell {
        let col = self.layout.code_start() + self.column_of(index);
        Cell::new(col as i64, self.row_of(index))
    }

    /// Upper left corner of the cell, in pixels
    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Point {
        Point::new(
            (cell.col - self.hscroll as i64) as f32 * self.metrics.width,
            cell.row as f32 * self.metrics.height + self.top_margin,
        )
    }

    /// Cell under a pixel. Horizontally this rounds to the nearest cell boundary, so the right
    /// half of a glyph resolves to the following column (caret placement).
    #[must_use]
    pub fn pixel_to_cell(&self, p: Point) -> Cell {
        let col = ((p.x + self.metrics.width / 2.0) / self.metrics.width).floor() as i64;
        let row = ((p.y - self.top_margin) / self.metrics.height).floor() as i64;
        Cell::new(col + self.hscroll as i64, row)
    }

    /// Cursor for a cell of the hex zone, `None` for any other cell.
    /// A separator cell addresses the high nibble of the following byte.
    #[must_use]
    pub const fn cell_to_cursor(&self, cell: Cell) -> Option<Cursor> {
        let data_start = self.layout.data_start() as i64;
        let data_end = data_start + self.layout.data_width() as i64;
        if cell.row < 0 || cell.col < data_start || cell.col >= data_end {
            return None;
        }

        let rel = cell.col - data_start;
        let in_line = (rel + 1) / 3;
        let nibble = if rel % 3 == 1 {
            Nibble::Low
        } else {
            Nibble::High
        };
        let index = self.first_index as i64 + cell.row * self.bpl() + in_line;

        Some(Cursor::new(index as usize, nibble))
    }

    #[must_use]
    pub fn pixel_to_cursor(&self, p: Point) -> Option<Cursor> {
        self.cell_to_cursor(self.pixel_to_cell(p))
    }

    /// Byte index under a pixel of the ASCII zone
    #[must_use]
    pub fn pixel_to_ascii_index(&self, p: Point) -> Option<usize> {
        let col = (p.x / self.metrics.width).floor() as i64 + self.hscroll as i64;
        let row = ((p.y - self.top_margin) / self.metrics.height).floor() as i64;
        let code_start = self.layout.code_start() as i64;
        if row < 0 || col < code_start || col >= code_start + self.bpl() {
            return None;
        }
        Some((self.first_index as i64 + row * self.bpl() + col - code_start) as usize)
    }

    fn cells_rect(&self, from: Cell, cells: usize) -> Rect {
        let origin = self.cell_origin(from);
        Rect::new(
            origin.x,
            origin.y,
            cells as f32 * self.metrics.width,
            self.metrics.height,
        )
    }

    /// Background of one hex byte (two digits and the separator)
    #[must_use]
    pub fn hex_byte_rect(&self, index: usize) -> Rect {
        self.cells_rect(self.hex_cell(index, Nibble::High), 3)
    }

    #[must_use]
    pub fn ascii_byte_rect(&self, index: usize) -> Rect {
        self.cells_rect(self.ascii_cell(index), 1)
    }

    /// Caret in front of the cursor nibble
    #[must_use]
    pub fn cursor_hex_rect(&self, cursor: Cursor) -> Rect {
        let origin = self.cell_origin(self.hex_cell(cursor.address, cursor.nibble));
        Rect::new(origin.x, origin.y, 2.0, self.metrics.height)
    }

    /// Caret in front of the cursor byte in the ASCII zone
    #[must_use]
    pub fn cursor_ascii_rect(&self, cursor: Cursor) -> Rect {
        let origin = self.cell_origin(self.ascii_cell(cursor.address));
        Rect::new(origin.x, origin.y, 2.0, self.metrics.height)
    }

    /// Per-line rectangles covering `range` in both zones, limited to the first
    /// `visible_lines` rows. Derived from byte indices only, so any line width works.
    #[must_use]
    pub fn selection_bands(
        &self,
        range: RangeInclusive<usize>,
        visible_lines: usize,
    ) -> Vec<SelectionBand> {
        let (start, end) = (*range.start(), *range.end());
        if start > end {
            return Vec::new();
        }

        let bpl = self.layout.bytes_per_line;
        let first_row = self.row_of(start).max(0);
        let last_row = self.row_of(end).min(visible_lines as i64 - 1);

        (first_row..=last_row)
            .map(|row| {
                let line_start = (self.first_index as i64 + row * self.bpl()) as usize;
                let first = start.max(line_start) - line_start;
                let last = end.min(line_start + bpl - 1) - line_start;
                let count = last - first + 1;

                let hex_from = self.hex_cell(line_start + first, Nibble::High);
                let ascii_from = self.ascii_cell(line_start + first);

                SelectionBand {
                    row,
                    hex: self.cells_rect(hex_from, 3 * count - 1),
                    ascii: self.cells_rect(ascii_from, count),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn mapper(bpl: usize, first_index: usize, hscroll: usize) -> Mapper {
        let config = DisplayConfig {
            bytes_per_line: bpl,
            ..DisplayConfig::default()
        };
        Mapper {
            layout: Layout::from(&config),
            metrics: CellMetrics {
                width: 8.0,
                height: 16.0,
            },
            top_margin: 2.0,
            first_index,
            hscroll,
        }
    }

    #[test]
    fn test_zone_starts() {
        // Arrange
        let m = mapper(32, 0, 0);

        // Act & Assert
        assert_eq!(m.layout.data_start(), 19);
        assert_eq!(m.layout.data_width(), 95);
        assert_eq!(m.layout.code_start(), 116);
        assert_eq!(m.layout.total_chars_per_line(), 149);
    }

    #[test]
    fn test_index_to_cells() {
        // Arrange
        let m = mapper(16, 32, 0);

        // Act
        let hex = m.hex_cell(32 + 16 + 5, Nibble::Low);
        let ascii = m.ascii_cell(32 + 16 + 5);

        // Assert
        assert_eq!(hex, Cell::new(19 + 15 + 1, 1));
        assert_eq!(ascii, Cell::new(m.layout.code_start() as i64 + 5, 1));
    }

    #[test]
    fn test_index_above_viewport_has_negative_row() {
        // Arrange
        let m = mapper(16, 64, 0);

        // Act
        let cell = m.hex_cell(63, Nibble::High);

        // Assert
        assert_eq!(cell.row, -1);
    }

    #[test]
    fn test_cell_round_trip_all_configurations() {
        for bpl in [1, 3, 8, 16, 32, 64] {
            // Arrange
            let m = mapper(bpl, bpl * 4, 0);

            for index in m.first_index..m.first_index + bpl * 20 {
                for nibble in [Nibble::High, Nibble::Low] {
                    // Act
                    let cursor = m.cell_to_cursor(m.hex_cell(index, nibble));

                    // Assert
                    assert_eq!(cursor, Some(Cursor::new(index, nibble)));
                }
            }
        }
    }

    #[test]
    fn test_pixel_round_trip_with_scroll() {
        // Arrange
        let mut rng = rand::rng();

        for _ in 0..500 {
            let bpl = rng.random_range(1..=64);
            let m = mapper(bpl, bpl * rng.random_range(0..100), rng.random_range(0..10));
            let index = m.first_index + rng.random_range(0..bpl * 30);
            let nibble = if rng.random_bool(0.5) {
                Nibble::High
            } else {
                Nibble::Low
            };

            // Act: click the caret position, half a line down
            let origin = m.cell_origin(m.hex_cell(index, nibble));
            let click = Point::new(origin.x, origin.y + m.metrics.height / 2.0);
            let cursor = m.pixel_to_cursor(click);

            // Assert
            assert_eq!(cursor, Some(Cursor::new(index, nibble)));
        }
    }

    #[test]
    fn test_separator_addresses_next_byte() {
        // Arrange
        let m = mapper(16, 0, 0);
        let data_start = m.layout.data_start() as i64;

        // Act
        let cursor = m.cell_to_cursor(Cell::new(data_start + 2, 0));

        // Assert
        assert_eq!(cursor, Some(Cursor::new(1, Nibble::High)));
    }

    #[test]
    fn test_points_outside_hex_zone_rejected() {
        // Arrange
        let m = mapper(16, 0, 0);
        let data_start = m.layout.data_start() as i64;
        let data_end = data_start + m.layout.data_width() as i64;

        // Act & Assert
        assert_eq!(m.cell_to_cursor(Cell::new(data_start - 1, 0)), None);
        assert_eq!(m.cell_to_cursor(Cell::new(data_end, 0)), None);
        assert_eq!(m.cell_to_cursor(Cell::new(data_start, -1)), None);
        assert_eq!(
            m.cell_to_cursor(Cell::new(data_end - 1, 0)),
            Some(Cursor::new(15, Nibble::Low))
        );
        assert_eq!(m.pixel_to_cursor(Point::new(1.0, 5.0)), None);
    }

    #[test]
    fn test_right_half_of_glyph_moves_caret() {
        // Arrange
        let m = mapper(16, 0, 0);
        let origin = m.cell_origin(m.hex_cell(0, Nibble::High));

        // Act
        let left_half = m.pixel_to_cursor(Point::new(origin.x + 1.0, origin.y + 4.0));
        let right_half = m.pixel_to_cursor(Point::new(origin.x + 5.0, origin.y + 4.0));

        // Assert
        assert_eq!(left_half, Some(Cursor::new(0, Nibble::High)));
        assert_eq!(right_half, Some(Cursor::new(0, Nibble::Low)));
    }

    #[test]
    fn test_horizontal_scroll_is_accounted() {
        // Arrange
        let m = mapper(16, 0, 5);
        let data_start = m.layout.data_start() as f32;

        // Act: hex zone now starts 5 cells further left
        let cursor = m.pixel_to_cursor(Point::new((data_start - 5.0) * 8.0, 10.0));

        // Assert
        assert_eq!(cursor, Some(Cursor::new(0, Nibble::High)));
    }

    #[test]
    fn test_ascii_pixel_to_index() {
        // Arrange
        let m = mapper(16, 16, 0);
        let origin = m.cell_origin(m.ascii_cell(16 + 16 + 7));

        // Act
        let index = m.pixel_to_ascii_index(Point::new(origin.x + 6.0, origin.y + 1.0));

        // Assert
        assert_eq!(index, Some(39));
    }

    #[test]
    fn test_single_line_selection_band() {
        // Arrange
        let m = mapper(16, 0, 0);

        // Act
        let bands = m.selection_bands(2..=4, 10);

        // Assert
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].hex.x, (19.0 + 6.0) * 8.0);
        assert_eq!(bands[0].hex.width, 8.0 * 8.0);
        assert_eq!(bands[0].ascii.width, 3.0 * 8.0);
    }

    #[test]
    fn test_multi_line_selection_bands() {
        // Arrange
        let m = mapper(8, 0, 0);

        // Act
        let bands = m.selection_bands(6..=17, 10);

        // Assert
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].ascii.width, 2.0 * 8.0);
        assert_eq!(bands[1].hex.width, 23.0 * 8.0);
        assert_eq!(bands[1].hex.x, m.layout.data_start() as f32 * 8.0);
        assert_eq!(bands[2].ascii.width, 2.0 * 8.0);
        assert_eq!(bands[2].row, 2);
    }

    #[test]
    fn test_selection_bands_clipped_to_viewport() {
        // Arrange
        let m = mapper(8, 16, 0);

        // Act
        let bands = m.selection_bands(0..=100, 3);

        // Assert
        let rows: Vec<_> = bands.iter().map(|b| b.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }
}
