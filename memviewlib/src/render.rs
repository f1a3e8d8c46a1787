//! Read-only paint pass of [`HexDisplay`] against an abstract [`Canvas`].
//!
//! Painting order: background, striped rows, selection backgrounds, address column, hex and
//! ASCII text, zone separators and finally the cursor carets. The pass only reads the
//! display, so painting twice without a mutation in between issues the same calls.

use crate::config::{Palette, Rgba};
use crate::coords::{Cell, CellMetrics, Point, Rect};
use crate::cursor::Nibble;
use crate::display::HexDisplay;
use std::fmt;
use std::ops::RangeInclusive;

/// Drawing surface provided by the host. Coordinates are pixels from the viewport corner.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Draw `text` with its first glyph cell at `pos` (upper left corner)
    fn draw_text(&mut self, pos: Point, text: &str, color: Rgba);

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba);
}

/// Per-paint settings supplied by the host
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub palette: Palette,
    /// Draw the cursor carets (e.g. only while focused)
    pub show_cursor: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl RenderContext {
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            show_cursor: true,
        }
    }
}

/// Printable ASCII stays, everything else (space included) becomes a dot
#[must_use]
pub const fn to_ascii(byte: u8) -> char {
    if byte >= 33 && byte <= 126 {
        byte as char
    } else {
        '.'
    }
}

/// Address text, keeping only the lowest `digits` hex digits
fn format_address(address: u64, digits: usize) -> String {
    let masked = if digits >= 16 {
        address
    } else {
        address & ((1u64 << (4 * digits)) - 1)
    };
    format!("{masked:0digits$x}")
}

#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
impl HexDisplay {
    /// Paint the visible part of the buffer
    pub fn render(&self, canvas: &mut impl Canvas, ctx: &RenderContext) {
        let mapper = self.mapper();
        let layout = mapper.layout;
        let metrics = mapper.metrics;
        let palette = &ctx.palette;
        let data = self.data();
        let viewport = self.viewport();
        let (width, height) = viewport.size();

        canvas.fill_rect(Rect::new(0.0, 0.0, width, height), palette.base);

        let lines = viewport.visible_lines().min(
            layout
                .num_lines(data.len())
                .saturating_sub(viewport.vertical()),
        );

        for row in (0..lines).step_by(2) {
            let y = row as f32 * metrics.height + mapper.top_margin;
            canvas.fill_rect(
                Rect::new(0.0, y, width, metrics.height),
                palette.alternate_base,
            );
        }

        // Primary selection first, then highlights in insertion order
        let mut ranges: Vec<(RangeInclusive<usize>, Rgba)> = Vec::new();
        let selection = self.selection();
        if selection.is_active() && selection.start() < data.len() {
            ranges.push((
                selection.start()..=selection.end().min(data.len() - 1),
                selection.color,
            ));
        }
        ranges.extend(
            self.highlights()
                .iter()
                .filter(|h| h.is_active())
                .filter_map(|h| h.index_range(data.len()).map(|r| (r, h.color()))),
        );

        // Reverse so the first matching range ends up on top
        for (range, color) in ranges.iter().rev() {
            for band in mapper.selection_bands(range.clone(), lines) {
                canvas.fill_rect(band.hex, *color);
                canvas.fill_rect(band.ascii, *color);
            }
        }

        let first = mapper.first_index;
        for row in 0..lines {
            let line_start = first + row * layout.bytes_per_line;
            let line_end = (line_start + layout.bytes_per_line).min(data.len());

            let address = format_address(self.address_of(line_start), layout.address_digits);
            let pos = mapper.cell_origin(Cell::new(layout.addr_start as i64, row as i64));
            canvas.draw_text(pos, &address, palette.address);

            for (index, &byte) in data
                .iter()
                .enumerate()
                .take(line_end)
                .skip(line_start)
            {
                let color = if self.is_dirty(index) {
                    palette.dirty
                } else if ranges.iter().any(|(r, _)| r.contains(&index)) {
                    palette.highlighted_text
                } else {
                    palette.text
                };

                let hex_pos = mapper.cell_origin(mapper.hex_cell(index, Nibble::High));
                canvas.draw_text(hex_pos, &format!("{byte:02x}"), color);

                let ascii_pos = mapper.cell_origin(mapper.ascii_cell(index));
                canvas.draw_text(ascii_pos, &to_ascii(byte).to_string(), color);
            }
        }

        // Zone separators in the cell left of the hex and ASCII zones
        for col in [layout.data_start(), layout.code_start()] {
            let x = mapper.cell_origin(Cell::new(col as i64 - 1, 0)).x + metrics.width / 2.0;
            canvas.draw_line(Point::new(x, 0.0), Point::new(x, height), palette.separator);
        }

        let cursor = self.cursor();
        let row = mapper.row_of(cursor.address);
        if ctx.show_cursor && cursor.address < data.len() && (0..lines as i64).contains(&row) {
            canvas.fill_rect(mapper.cursor_hex_rect(cursor), palette.cursor);
            canvas.fill_rect(mapper.cursor_ascii_rect(cursor), palette.cursor);
        }
    }
}

/// Character grid canvas. Pixels are mapped to cells with the given cell size, texts are
/// written cell by cell and vertical/horizontal lines land on blank cells only.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGrid {
    cols: usize,
    rows: usize,
    cell: CellMetrics,
    chars: Vec<char>,
    fg: Vec<Option<Rgba>>,
    bg: Vec<Option<Rgba>>,
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
impl TextGrid {
    #[must_use]
    pub fn new(cols: usize, rows: usize, cell: CellMetrics) -> Self {
        let size = cols * rows;
        Self {
            cols,
            rows,
            cell,
            chars: vec![' '; size],
            fg: vec![None; size],
            bg: vec![None; size],
        }
    }

    /// Pixel size matching the grid, for [`HexDisplay::resize`]
    #[must_use]
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            self.cols as f32 * self.cell.width,
            self.rows as f32 * self.cell.height,
        )
    }

    fn slot(&self, col: i64, row: i64) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    fn col_of(&self, x: f32) -> i64 {
        (x / self.cell.width).floor() as i64
    }

    fn row_of(&self, y: f32) -> i64 {
        (y / self.cell.height).floor() as i64
    }

    #[must_use]
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.slot(col as i64, row as i64).map(|i| self.chars[i])
    }

    /// Color of the text drawn in the cell
    #[must_use]
    pub fn fg_at(&self, col: usize, row: usize) -> Option<Rgba> {
        self.slot(col as i64, row as i64).and_then(|i| self.fg[i])
    }

    /// Last fill color of the cell
    #[must_use]
    pub fn bg_at(&self, col: usize, row: usize) -> Option<Rgba> {
        self.slot(col as i64, row as i64).and_then(|i| self.bg[i])
    }

    /// Rows as strings, trailing blanks removed
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.chars
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    /// Like [`TextGrid::lines`], wrapping every cell whose text color is `color` in `on`/`off`
    /// markers (e.g. ANSI escapes)
    #[must_use]
    pub fn lines_marked(&self, color: Rgba, on: &str, off: &str) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                let mut line = String::new();
                let mut blanks = String::new();
                for col in 0..self.cols {
                    let i = row * self.cols + col;
                    let c = self.chars[i];
                    if c == ' ' {
                        blanks.push(c);
                        continue;
                    }
                    line.push_str(&blanks);
                    blanks.clear();
                    if self.fg[i] == Some(color) {
                        line.push_str(on);
                        line.push(c);
                        line.push_str(off);
                    } else {
                        line.push(c);
                    }
                }
                line
            })
            .collect()
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Canvas for TextGrid {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let col_from = self.col_of(rect.x);
        let col_to = (((rect.x + rect.width) / self.cell.width).ceil() as i64).max(col_from + 1);
        let row_from = self.row_of(rect.y);
        let row_to = (((rect.y + rect.height) / self.cell.height).ceil() as i64).max(row_from + 1);

        for row in row_from..row_to {
            for col in col_from..col_to {
                if let Some(i) = self.slot(col, row) {
                    self.bg[i] = Some(color);
                }
            }
        }
    }

    fn draw_text(&mut self, pos: Point, text: &str, color: Rgba) {
        let row = self.row_of(pos.y);
        let col = self.col_of(pos.x);
        for (offset, c) in (0_i64..).zip(text.chars()) {
            if let Some(i) = self.slot(col + offset, row) {
                self.chars[i] = c;
                self.fg[i] = Some(color);
            }
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba) {
        let (glyph, cells): (char, Vec<(i64, i64)>) = if (from.x - to.x).abs() < f32::EPSILON {
            let col = self.col_of(from.x);
            let (top, bottom) = (from.y.min(to.y), from.y.max(to.y));
            let last = ((bottom / self.cell.height).ceil() as i64).max(self.row_of(top) + 1);
            ('|', (self.row_of(top)..last).map(|r| (col, r)).collect())
        } else if (from.y - to.y).abs() < f32::EPSILON {
            let row = self.row_of(from.y);
            let (left, right) = (from.x.min(to.x), from.x.max(to.x));
            let last = ((right / self.cell.width).ceil() as i64).max(self.col_of(left) + 1);
            ('-', (self.col_of(left)..last).map(|c| (c, row)).collect())
        } else {
            return;
        };

        for (col, row) in cells {
            if let Some(i) = self.slot(col, row)
                && self.chars[i] == ' '
            {
                self.chars[i] = glyph;
                self.fg[i] = Some(color);
            }
        }
    }
}
