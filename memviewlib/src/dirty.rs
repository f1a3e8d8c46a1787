//! Change tracking between two snapshots of a buffer whose starting address may move
//! (e.g. a stack growing or shrinking between two debugger stops).

use tracing::debug;

/// Mark every byte of `new` that differs from its counterpart in `old`.
///
/// Counterparts are aligned by absolute address: byte `i` of `new` lives at `new_start + i`
/// and is compared with the byte of `old` at the same address. Bytes without a counterpart
/// (newly visible after growth) are dirty.
#[must_use]
pub fn recompute(old: &[u8], old_start: u64, new: &[u8], new_start: u64) -> Vec<bool> {
    // Compare `new[lead + i]` with `old[skip + i]`
    let (skip, lead) = if new_start >= old_start {
        (to_index(new_start - old_start), 0)
    } else {
        (0, to_index(old_start - new_start))
    };

    let mut mask = vec![true; new.len()];
    for (i, byte) in new.iter().enumerate().skip(lead) {
        let counterpart = (i - lead).checked_add(skip).and_then(|j| old.get(j));
        mask[i] = counterpart != Some(byte);
    }
    mask
}

fn to_index(offset: u64) -> usize {
    usize::try_from(offset).unwrap_or(usize::MAX)
}

/// Baseline snapshot plus the dirty mask of the current buffer against it
#[derive(Debug, Default, Clone)]
pub struct DirtyTracker {
    baseline: Vec<u8>,
    baseline_start: u64,
    mask: Vec<bool>,
}

impl DirtyTracker {
    /// Tracker with `data` as the baseline and nothing dirty
    #[must_use]
    pub fn new(data: &[u8], start: u64) -> Self {
        Self {
            baseline: data.to_vec(),
            baseline_start: start,
            mask: vec![false; data.len()],
        }
    }

    /// Recompute the mask of `current` against the baseline. The baseline stays.
    pub fn refresh(&mut self, current: &[u8], start: u64) {
        self.mask = recompute(&self.baseline, self.baseline_start, current, start);
        debug!(
            dirty = self.dirty_count(),
            len = current.len(),
            "dirty mask refreshed"
        );
    }

    /// Recompute the mask of `current` against the baseline, then make `current` the baseline
    pub fn advance(&mut self, current: &[u8], start: u64) {
        self.refresh(current, start);
        self.baseline.clear();
        self.baseline.extend_from_slice(current);
        self.baseline_start = start;
    }

    /// Move the baseline to a new starting address, keeping its bytes, and recompute the
    /// mask of `current` (already living at `start`) against it
    pub fn rebase(&mut self, current: &[u8], start: u64) {
        self.baseline_start = start;
        self.refresh(current, start);
    }

    /// Make `current` the baseline and clear the mask
    pub fn mark_clean(&mut self, current: &[u8], start: u64) {
        *self = Self::new(current, start);
    }

    /// Indices beyond the mask are never dirty
    #[must_use]
    pub fn is_dirty(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.mask.iter().filter(|&&d| d).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: bool = true;
    const F: bool = false;

    #[test]
    fn test_same_start_pairwise() {
        // Act
        let mask = recompute(b"AAAA", 100, b"AABA", 100);

        // Assert
        assert_eq!(mask, vec![F, F, T, F]);
    }

    #[test]
    fn test_same_start_grown_tail_is_dirty() {
        // Act
        let mask = recompute(b"AB", 0, b"ABCD", 0);

        // Assert
        assert_eq!(mask, vec![F, F, T, T]);
    }

    #[test]
    fn test_grown_from_front() {
        // Act
        let mask = recompute(b"AAAA", 100, b"XXAABA", 98);

        // Assert
        assert_eq!(mask, vec![T, T, F, F, T, F]);
    }

    #[test]
    fn test_shrunk_from_front() {
        // Arrange: stack popped two bytes
        let old = b"XYABCD";

        // Act
        let mask = recompute(old, 0x1000, b"ABcD", 0x1002);

        // Assert
        assert_eq!(mask, vec![F, F, T, F]);
    }

    #[test]
    fn test_moved_past_old_buffer() {
        // Act
        let mask = recompute(b"AB", 0, b"AB", 10);

        // Assert
        assert_eq!(mask, vec![T, T]);
    }

    #[test]
    fn test_is_dirty_beyond_mask() {
        // Arrange
        let mut tracker = DirtyTracker::new(b"AAAA", 0);
        tracker.refresh(b"AAAB", 0);

        // Act & Assert
        assert!(tracker.is_dirty(3));
        assert!(!tracker.is_dirty(4));
        assert!(!tracker.is_dirty(usize::MAX));
    }

    #[test]
    fn test_refresh_keeps_baseline_and_advance_moves_it() {
        // Arrange
        let mut tracker = DirtyTracker::new(b"AAAA", 100);

        // Act
        tracker.refresh(b"AABA", 100);
        let after_refresh = tracker.mask().to_vec();
        tracker.advance(b"XXAABA", 98);
        let after_advance = tracker.mask().to_vec();
        tracker.advance(b"XXAABA", 98);

        // Assert
        assert_eq!(after_refresh, vec![F, F, T, F]);
        assert_eq!(after_advance, vec![T, T, F, F, T, F]);
        assert_eq!(tracker.dirty_count(), 0);
    }

    #[test]
    fn test_mark_clean() {
        // Arrange
        let mut tracker = DirtyTracker::new(b"AAAA", 0);
        tracker.refresh(b"BBBB", 0);

        // Act
        tracker.mark_clean(b"BBBB", 0);

        // Assert
        assert_eq!(tracker.dirty_count(), 0);
        assert_eq!(tracker.mask().len(), 4);
    }

    #[test]
    fn test_rebase_moves_baseline_with_its_bytes() {
        // Arrange: one pending change before the buffer is re-addressed
        let mut tracker = DirtyTracker::new(b"AAAA", 0);
        tracker.refresh(b"AABA", 0);

        // Act
        tracker.rebase(b"AABA", 0x100);
        let after_rebase = tracker.mask().to_vec();
        tracker.refresh(b"AAAA", 0x100);

        // Assert
        assert_eq!(after_rebase, vec![F, F, T, F]);
        assert_eq!(tracker.mask(), &[F, F, F, F]);
    }
}
