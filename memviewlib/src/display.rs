//! The `display` module provides [`HexDisplay`], the composition root of the viewer. It owns
//! the buffer, its starting address, the cursor, the primary selection, the highlight list,
//! the dirty tracker and the scroll state, and turns host input into state changes.
//!
//! Notifications are not delivered through callbacks. Every mutation queues
//! [`DisplayEvent`]s which the host drains with [`HexDisplay::take_events`] once the call
//! returned, so host code never runs in the middle of a mutation.

use crate::config::{DisplayConfig, Palette, Rgba};
use crate::coords::{CellMetrics, Layout, Mapper, Point};
use crate::cursor::{Cursor, CursorChanged, Nibble};
use crate::dirty::DirtyTracker;
use crate::error::MemViewError;
use crate::search::{SearchType, search};
use crate::selection::{AddressOrigin, Highlight, NamedSelection, Selection};
use crate::viewport::{DragState, Viewport};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    CursorChanged(CursorChanged),
    /// Geometry of the primary selection or of any highlight changed
    SelectionChanged,
}

/// Keyboard navigation commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug)]
pub struct HexDisplay {
    config: DisplayConfig,
    /// Index 0 lives at the starting address held by `origin`
    data: Vec<u8>,
    origin: AddressOrigin,
    cursor: Cursor,
    /// Primary selection, driven by pointer drags
    selection: Selection,
    highlights: Vec<Highlight>,
    dirty: DirtyTracker,
    viewport: Viewport,
    metrics: CellMetrics,
    drag: DragState,
    events: Vec<DisplayEvent>,
}

impl Default for HexDisplay {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

impl HexDisplay {
    /// Empty display starting at address 0
    #[must_use]
    pub fn new(config: DisplayConfig) -> Self {
        let viewport = Viewport::new(config.scroll_margin);
        Self {
            config,
            data: Vec::new(),
            origin: AddressOrigin::new(0),
            cursor: Cursor::default(),
            selection: Selection::inactive(Palette::default().highlight),
            highlights: Vec::new(),
            dirty: DirtyTracker::default(),
            viewport,
            metrics: CellMetrics::default(),
            drag: DragState::Idle,
            events: Vec::new(),
        }
    }

    /// Display showing `data` at `starting_address`, nothing dirty
    #[must_use]
    pub fn with_data(config: DisplayConfig, data: Vec<u8>, starting_address: u64) -> Self {
        let mut display = Self::new(config);
        display.load(starting_address, data);
        display.take_events();
        display
    }

    // -- Accessors

    #[must_use]
    pub const fn config(&self) -> &DisplayConfig {
        &self.config
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn starting_address(&self) -> u64 {
        self.origin.get()
    }

    /// Handle to the live starting address, for creating [`NamedSelection`]s
    #[must_use]
    pub const fn origin(&self) -> &AddressOrigin {
        &self.origin
    }

    /// One past the last address of the buffer
    #[must_use]
    pub fn end_address(&self) -> u64 {
        self.starting_address()
            .saturating_add(u64::try_from(self.data.len()).unwrap_or(u64::MAX))
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.drag
    }

    #[must_use]
    pub const fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    #[must_use]
    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty.is_dirty(index)
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::from(&self.config)
    }

    /// Coordinate mapper for the current scroll position
    #[must_use]
    pub fn mapper(&self) -> Mapper {
        let layout = self.layout();
        Mapper {
            layout,
            metrics: self.metrics,
            top_margin: self.config.top_margin,
            first_index: self.viewport.first_visible_index(layout.bytes_per_line),
            hscroll: self.viewport.horizontal(),
        }
    }

    /// Absolute address of a buffer index
    #[must_use]
    pub fn address_of(&self, index: usize) -> u64 {
        self.starting_address()
            .saturating_add(u64::try_from(index).unwrap_or(u64::MAX))
    }

    /// Drain the notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<DisplayEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Notifications

    fn cursor_moved(&mut self, change: Option<CursorChanged>) {
        let Some(change) = change else {
            return;
        };
        self.events.push(DisplayEvent::CursorChanged(change));

        // Keep the cursor away from the viewport edges
        let row = self.mapper().row_of(change.current.address);
        self.viewport.follow_row(row);
    }

    fn selection_changed(&mut self) {
        self.events.push(DisplayEvent::SelectionChanged);
    }

    // -- Geometry

    /// Font metrics changed
    pub fn set_cell_metrics(&mut self, metrics: CellMetrics) {
        self.metrics = metrics;
        let (width, height) = self.viewport.size();
        self.viewport.resize(width, height, metrics);
        self.adjust();
    }

    /// Viewport resized, in pixels
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height, self.metrics);
        self.adjust();
    }

    /// Recompute scroll ranges from the content and viewport size
    fn adjust(&mut self) {
        let layout = self.layout();
        self.viewport
            .adjust(layout.num_lines(self.data.len()), layout.total_chars_per_line());
    }

    /// Set both scroll positions (columns, lines)
    pub fn set_scroll(&mut self, horizontal: usize, vertical: usize) {
        self.viewport.set_horizontal(horizontal);
        self.viewport.set_vertical(vertical);
    }

    /// Scroll by `delta` lines, e.g. from a mouse wheel
    pub fn scroll_lines(&mut self, delta: i64) -> bool {
        self.viewport.scroll_lines(delta)
    }

    /// Change the line width. The line holding the first visible byte stays on top.
    ///
    /// # Errors
    /// Returns [`MemViewError::InvalidConfig`] if `bytes_per_line` is outside `1..=256`.
    pub fn set_bytes_per_line(&mut self, bytes_per_line: usize) -> Result<(), MemViewError> {
        let config = DisplayConfig {
            bytes_per_line,
            ..self.config.clone()
        };
        config.validate()?;

        let first = self.viewport.first_visible_index(self.layout().bytes_per_line);
        self.config = config;
        self.adjust();
        self.viewport.set_vertical(first / bytes_per_line);
        self.selection_changed();
        Ok(())
    }

    // -- Buffer

    /// Replace the buffer and make it the clean baseline. Cursor and selection are reset.
    pub fn load(&mut self, starting_address: u64, data: Vec<u8>) {
        debug!(
            start = starting_address,
            len = data.len(),
            "loading buffer"
        );
        self.dirty.mark_clean(&data, starting_address);
        self.data = data;
        self.origin.set(starting_address);
        self.selection.collapse(0);
        self.drag = DragState::Idle;
        self.viewport.set_vertical(0);
        self.adjust();

        let change = self.cursor.update(Cursor::default());
        self.cursor_moved(change);
        self.selection_changed();
    }

    /// Overwrite the buffer from `address` on with `bytes`, discarding everything after them.
    /// The dirty mask is recomputed against the baseline before returning.
    ///
    /// # Errors
    /// Returns [`MemViewError::UpdateOutOfBounds`] (buffer untouched) if `address` lies before
    /// the starting address or past the end of the buffer.
    pub fn update_at(&mut self, address: u64, bytes: &[u8]) -> Result<(), MemViewError> {
        let start = self.starting_address();
        let end = self.end_address();
        if address < start || address > end {
            warn!(address, start, end, "rejected out of bounds update");
            return Err(MemViewError::UpdateOutOfBounds {
                address,
                start,
                end,
            });
        }

        let index = usize::try_from(address - start).unwrap_or(usize::MAX);
        self.data.truncate(index);
        self.data.extend_from_slice(bytes);
        self.dirty.refresh(&self.data, start);
        debug!(address, written = bytes.len(), len = self.data.len(), "buffer updated");

        self.after_buffer_change();
        Ok(())
    }

    /// Replace the buffer and its starting address (e.g. a new debugger stop). Bytes are
    /// compared with the previous baseline at the same absolute address, then the new buffer
    /// becomes the baseline.
    pub fn set_new_offset(&mut self, starting_address: u64, data: Vec<u8>) {
        self.dirty.advance(&data, starting_address);
        debug!(
            old_start = self.starting_address(),
            new_start = starting_address,
            len = data.len(),
            dirty = self.dirty.dirty_count(),
            "buffer replaced"
        );
        self.data = data;
        self.origin.set(starting_address);

        self.after_buffer_change();
    }

    /// Move the starting address without touching the bytes.
    /// Named highlights follow the new address, index based selections stay.
    /// The dirty baseline moves along, so later snapshots compare at the new address.
    pub fn set_starting_address(&mut self, starting_address: u64) {
        self.origin.set(starting_address);
        self.dirty.rebase(&self.data, starting_address);
        self.selection_changed();
    }

    /// Forget the differences, the current buffer becomes the baseline
    pub fn mark_clean(&mut self) {
        self.dirty.mark_clean(&self.data, self.starting_address());
    }

    fn after_buffer_change(&mut self) {
        self.adjust();
        let change = self.cursor.clamp(self.data.len());
        self.cursor_moved(change);
        self.selection_changed();
    }

    // -- Cursor

    /// Place the cursor on a buffer index. Indices past the end land on the last byte.
    pub fn move_cursor_to(&mut self, index: usize, nibble: Nibble) {
        let target = Cursor::new(index.min(self.data.len().saturating_sub(1)), nibble);
        let change = self.cursor.update(target);
        self.cursor_moved(change);
    }

    pub fn set_nibble(&mut self, nibble: Nibble) {
        let change = self.cursor.set_nibble(nibble);
        self.cursor_moved(change);
    }

    /// Move the cursor to the high nibble of an absolute address.
    ///
    /// # Errors
    /// Returns [`MemViewError::AddressOutOfRange`] if no byte lives at `address`.
    pub fn goto(&mut self, address: u64) -> Result<(), MemViewError> {
        let start = self.starting_address();
        let end = self.end_address();
        if address < start || address >= end {
            return Err(MemViewError::AddressOutOfRange {
                address,
                start,
                end,
            });
        }
        let index = usize::try_from(address - start).unwrap_or(usize::MAX);
        self.move_cursor_to(index, Nibble::High);
        Ok(())
    }

    pub fn handle_key(&mut self, key: NavKey) {
        let len = self.data.len();
        if len == 0 {
            return;
        }
        let bpl = self.layout().bytes_per_line;
        let page = bpl * self.viewport.visible_lines().max(1);

        let change = match key {
            NavKey::Left => self.cursor.move_left(),
            NavKey::Right => self.cursor.move_right(len),
            NavKey::Up => self.cursor.rewind(bpl),
            NavKey::Down => self.cursor.forward(bpl, len),
            NavKey::PageUp => self.cursor.rewind(page),
            NavKey::PageDown => self.cursor.forward(page, len),
            NavKey::Home => self.cursor.update(Cursor::new(0, Nibble::High)),
            NavKey::End => self.cursor.update(Cursor::new(len - 1, Nibble::High)),
        };
        self.cursor_moved(change);
    }

    /// Hex digit under the cursor and the byte holding it.
    /// `None` if the cursor is not on a byte (empty buffer).
    #[must_use]
    pub fn char_at_cursor(&self) -> Option<(char, u8)> {
        let byte = *self.data.get(self.cursor.address)?;
        let digit = match self.cursor.nibble {
            Nibble::High => byte >> 4,
            Nibble::Low => byte & 0x0F,
        };
        char::from_digit(u32::from(digit), 16).map(|c| (c, byte))
    }

    // -- Pointer

    /// Cursor under a pixel of the hex or ASCII zone, if it lands on a byte
    fn cursor_at(&self, p: Point) -> Option<Cursor> {
        let mapper = self.mapper();
        mapper
            .pixel_to_cursor(p)
            .or_else(|| {
                mapper
                    .pixel_to_ascii_index(p)
                    .map(|i| Cursor::new(i, Nibble::High))
            })
            .filter(|c| c.address < self.data.len())
    }

    /// Like `cursor_at`, but points past the last byte resolve to the last byte
    fn cursor_at_clamped(&self, p: Point) -> Option<Cursor> {
        let mapper = self.mapper();
        let last = self.data.len().checked_sub(1)?;
        mapper
            .pixel_to_cursor(p)
            .or_else(|| {
                mapper
                    .pixel_to_ascii_index(p)
                    .map(|i| Cursor::new(i, Nibble::High))
            })
            .map(|c| Cursor::new(c.address.min(last), c.nibble))
    }

    /// Pointer button pressed. Outside of the byte zones this does nothing.
    pub fn press(&mut self, p: Point) {
        let Some(cursor) = self.cursor_at(p) else {
            return;
        };

        if self.selection.is_active() {
            self.selection.collapse(cursor.address);
            self.selection_changed();
        }
        self.drag = DragState::PointPlaced;

        let change = self.cursor.update(cursor);
        self.cursor_moved(change);
    }

    /// Pointer moved with the button held. Extends the primary selection from the cursor.
    pub fn drag(&mut self, p: Point) {
        if self.drag == DragState::Idle {
            return;
        }
        let Some(target) = self.cursor_at_clamped(p) else {
            return;
        };

        let before = self.selection.clone();
        self.selection.set_start(self.cursor.address);
        self.selection.set_active(true);
        self.selection.set_end(target.address);
        self.drag = DragState::Extending;

        if self.selection != before {
            self.selection_changed();
        }
    }

    /// Pointer button released. The cursor follows the release point if it lands on a byte.
    pub fn release(&mut self, p: Point) {
        if self.drag == DragState::Idle {
            return;
        }
        self.drag = DragState::Idle;

        if let Some(cursor) = self.cursor_at(p) {
            let change = self.cursor.update(cursor);
            self.cursor_moved(change);
        }
    }

    /// Bytes covered by the active primary selection
    #[must_use]
    pub fn selected_bytes(&self) -> Option<&[u8]> {
        if !self.selection.is_active() {
            return None;
        }
        let end = self.selection.end().min(self.data.len().checked_sub(1)?);
        self.data.get(self.selection.start()..=end)
    }

    /// Drop the primary selection
    pub fn clear_selection(&mut self) {
        if self.selection.is_active() {
            self.selection.collapse(self.cursor.address);
            self.selection_changed();
        }
    }

    // -- Highlights

    /// Highlight `length` bytes from an absolute address. The highlight stays on that address
    /// when the starting address of the buffer moves.
    pub fn highlight_address(
        &mut self,
        name: impl Into<String>,
        address: u64,
        length: usize,
        color: Rgba,
    ) {
        let sel = NamedSelection::create(&self.origin, name, address, length, color);
        debug!(name = sel.name(), address, length, "named highlight added");
        self.highlights.push(Highlight::Named(sel));
        self.selection_changed();
    }

    /// Highlight a range of buffer indices
    pub fn highlight_range(&mut self, start: usize, end: usize, color: Rgba) {
        self.highlights
            .push(Highlight::Anonymous(Selection::new(start, end, true, color)));
        self.selection_changed();
    }

    /// Remove every highlight containing the absolute address. Returns how many were removed.
    pub fn remove_highlights_at(&mut self, address: u64) -> usize {
        let origin = self.starting_address();
        self.remove_highlights_where(|h| h.contains_address(address, origin))
    }

    /// Remove the named highlights called `name`. Returns how many were removed.
    pub fn remove_highlight_named(&mut self, name: &str) -> usize {
        self.remove_highlights_where(|h| h.name() == Some(name))
    }

    pub fn clear_highlights(&mut self) -> usize {
        self.remove_highlights_where(|_| true)
    }

    fn remove_highlights_where(&mut self, pred: impl Fn(&Highlight) -> bool) -> usize {
        let before = self.highlights.len();
        self.highlights.retain(|h| !pred(h));
        let removed = before - self.highlights.len();
        if removed > 0 {
            debug!(removed, "highlights removed");
            self.selection_changed();
        }
        removed
    }

    // -- Search

    /// Absolute addresses of all matches of the pattern in the buffer
    #[must_use]
    pub fn search(&self, pattern: &SearchType) -> Vec<u64> {
        search(&self.data, self.starting_address(), pattern)
    }
}
