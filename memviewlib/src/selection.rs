//! Byte ranges drawn on top of the hex and ASCII panes.
//!
//! A [`Selection`] stores buffer indices and is unaffected by the starting address. A
//! [`NamedSelection`] stores absolute addresses and translates them through the live starting
//! address of its owner, so it stays anchored to e.g. "top of stack" while the buffer moves.

use crate::config::Rgba;
use std::cell::Cell;
use std::ops::RangeInclusive;
use std::rc::{Rc, Weak};

/// Ordered `[start, end]` pair shared by both selection kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds<T> {
    start: T,
    end: T,
    active: bool,
}

impl<T: Ord + Copy> Bounds<T> {
    fn new(start: T, end: T, active: bool) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            active,
        }
    }

    fn set_start(&mut self, value: T) {
        if !self.active {
            self.start = value;
            self.end = value;
            return;
        }
        self.start = value.min(self.end);
        self.end = value.max(self.end);
    }

    fn set_end(&mut self, value: T) {
        if !self.active {
            self.start = value;
            self.end = value;
            return;
        }
        self.end = value.max(self.start);
        self.start = value.min(self.start);
    }

    fn contains(&self, value: T) -> bool {
        self.start <= value && value <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    bounds: Bounds<usize>,
    pub color: Rgba,
}

impl Selection {
    #[must_use]
    pub fn new(start: usize, end: usize, active: bool, color: Rgba) -> Self {
        Self {
            bounds: Bounds::new(start, end, active),
            color,
        }
    }

    /// Inactive point selection at index 0
    #[must_use]
    pub fn inactive(color: Rgba) -> Self {
        Self::new(0, 0, false, color)
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.bounds.start
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.bounds.end
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.bounds.active
    }

    pub const fn set_active(&mut self, active: bool) {
        self.bounds.active = active;
    }

    /// Set the lower bound. While inactive the range collapses to `value`.
    pub fn set_start(&mut self, value: usize) {
        self.bounds.set_start(value);
    }

    /// Set the upper bound. While inactive the range collapses to `value`.
    pub fn set_end(&mut self, value: usize) {
        self.bounds.set_end(value);
    }

    /// Deactivate and shrink to a single point
    pub fn collapse(&mut self, value: usize) {
        self.bounds.active = false;
        self.bounds.set_start(value);
    }

    /// Inclusive range test, independent of the active flag
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.bounds.contains(index)
    }

    #[must_use]
    pub const fn range(&self) -> RangeInclusive<usize> {
        self.bounds.start..=self.bounds.end
    }

    /// Number of selected bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bounds.end - self.bounds.start + 1
    }

    /// Always `false`: a selection covers at least one byte
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Shared, mutable starting address of a buffer.
///
/// The owner keeps the strong handle; [`NamedSelection`]s only hold a weak one and read the
/// current value on every query.
#[derive(Debug, Clone, Default)]
pub struct AddressOrigin(Rc<Cell<u64>>);

impl AddressOrigin {
    #[must_use]
    pub fn new(address: u64) -> Self {
        Self(Rc::new(Cell::new(address)))
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    pub fn set(&self, address: u64) {
        self.0.set(address);
    }

    fn downgrade(&self) -> Weak<Cell<u64>> {
        Rc::downgrade(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NamedSelection {
    name: String,
    /// Absolute addresses
    bounds: Bounds<u64>,
    pub color: Rgba,
    origin: Weak<Cell<u64>>,
}

impl NamedSelection {
    /// Create an active selection covering `length` bytes from `start_address`.
    /// A zero `length` covers the single byte at `start_address`.
    #[must_use]
    pub fn create(
        owner: &AddressOrigin,
        name: impl Into<String>,
        start_address: u64,
        length: usize,
        color: Rgba,
    ) -> Self {
        let span = u64::try_from(length.max(1)).unwrap_or(u64::MAX) - 1;
        Self {
            name: name.into(),
            bounds: Bounds::new(start_address, start_address.saturating_add(span), true),
            color,
            origin: owner.downgrade(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn start_address(&self) -> u64 {
        self.bounds.start
    }

    #[must_use]
    pub const fn end_address(&self) -> u64 {
        self.bounds.end
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.bounds.active
    }

    pub const fn set_active(&mut self, active: bool) {
        self.bounds.active = active;
    }

    pub fn set_start(&mut self, address: u64) {
        self.bounds.set_start(address);
    }

    pub fn set_end(&mut self, address: u64) {
        self.bounds.set_end(address);
    }

    /// Current starting address of the owner, `None` once the owner is gone
    fn base(&self) -> Option<u64> {
        self.origin.upgrade().map(|cell| cell.get())
    }

    /// Lower bound as an index into the owner's buffer. Negative when it lies before the buffer.
    #[allow(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn start(&self) -> Option<i64> {
        self.base()
            .map(|base| self.bounds.start.wrapping_sub(base) as i64)
    }

    /// Upper bound as an index into the owner's buffer
    #[allow(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn end(&self) -> Option<i64> {
        self.base().map(|base| self.bounds.end.wrapping_sub(base) as i64)
    }

    /// Is the buffer index inside the range, using the owner's current starting address
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        let Some(base) = self.base() else {
            return false;
        };
        u64::try_from(index)
            .ok()
            .and_then(|i| base.checked_add(i))
            .is_some_and(|addr| self.bounds.contains(addr))
    }

    #[must_use]
    pub fn contains_address(&self, address: u64) -> bool {
        self.bounds.contains(address)
    }

    /// Covered buffer indices, clipped to a `len` long buffer
    #[must_use]
    pub fn index_range(&self, len: usize) -> Option<RangeInclusive<usize>> {
        let base = self.base()?;
        if len == 0 || self.bounds.end < base {
            return None;
        }
        let lo = usize::try_from(self.bounds.start.saturating_sub(base)).unwrap_or(usize::MAX);
        let hi = usize::try_from(self.bounds.end - base).unwrap_or(usize::MAX);
        if lo >= len {
            return None;
        }
        Some(lo..=hi.min(len - 1))
    }
}

/// Entry of the highlight list
#[derive(Debug, Clone)]
pub enum Highlight {
    /// Index based range without a name
    Anonymous(Selection),
    /// Address anchored range with a name
    Named(NamedSelection),
}

impl Highlight {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Anonymous(_) => None,
            Self::Named(sel) => Some(sel.name()),
        }
    }

    #[must_use]
    pub const fn color(&self) -> Rgba {
        match self {
            Self::Anonymous(sel) => sel.color,
            Self::Named(sel) => sel.color,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        match self {
            Self::Anonymous(sel) => sel.is_active(),
            Self::Named(sel) => sel.is_active(),
        }
    }

    /// Active and containing the buffer index
    #[must_use]
    pub fn covers(&self, index: usize) -> bool {
        match self {
            Self::Anonymous(sel) => sel.is_active() && sel.contains(index),
            Self::Named(sel) => sel.is_active() && sel.contains(index),
        }
    }

    /// Does the range contain the absolute `address`, given the buffer starts at `origin`
    #[must_use]
    pub fn contains_address(&self, address: u64, origin: u64) -> bool {
        match self {
            Self::Anonymous(sel) => address
                .checked_sub(origin)
                .and_then(|i| usize::try_from(i).ok())
                .is_some_and(|i| sel.contains(i)),
            Self::Named(sel) => sel.contains_address(address),
        }
    }

    /// Covered buffer indices, clipped to a `len` long buffer
    #[must_use]
    pub fn index_range(&self, len: usize) -> Option<RangeInclusive<usize>> {
        match self {
            Self::Anonymous(sel) => {
                (sel.start() < len).then(|| sel.start()..=sel.end().min(len - 1))
            }
            Self::Named(sel) => sel.index_range(len),
        }
    }
}
