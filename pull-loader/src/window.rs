use std::sync::Arc;

use crate::VisibleRange;

/// Computes the half-open range of rows to materialize for a fixed row pitch.
///
/// `start = max(0, floor(scroll_offset / row_height) - overscan)` and
/// `end = start + ceil(viewport_height / row_height) + overscan + 1`.
///
/// `row_height` must be finite and positive; [`crate::PullLoaderOptions::validate`] rejects
/// anything else before it reaches this function.
pub fn compute_range(
    scroll_offset: f64,
    viewport_height: f64,
    row_height: f64,
    overscan: usize,
) -> VisibleRange {
    debug_assert!(row_height > 0.0, "row_height must be positive");

    let first = (scroll_offset / row_height).floor();
    // Negative offsets (overscroll bounce) floor below zero; the cast saturates huge values.
    let first = if first > 0.0 { first as usize } else { 0 };
    let start = first.saturating_sub(overscan);

    let rows = (viewport_height / row_height).ceil();
    let rows = if rows > 0.0 { rows as usize } else { 0 };
    let end = start
        .saturating_add(rows)
        .saturating_add(overscan)
        .saturating_add(1);

    VisibleRange { start, end }
}

/// Holds the current [`VisibleRange`] and only reports a change when a bound moves.
#[derive(Clone, Debug)]
pub struct ViewportWindow {
    row_height: f64,
    overscan: usize,
    range: VisibleRange,
}

impl ViewportWindow {
    pub fn new(row_height: f64, overscan: usize) -> Self {
        Self {
            row_height,
            overscan,
            range: VisibleRange::default(),
        }
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Recomputes the range from live scroll metrics.
    ///
    /// Returns `true` if the stored range changed.
    pub fn update(&mut self, scroll_top: f64, client_height: f64) -> bool {
        let next = compute_range(scroll_top, client_height, self.row_height, self.overscan);
        if next == self.range {
            return false;
        }
        ptrace!(
            start = next.start,
            end = next.end,
            scroll_top,
            "ViewportWindow::update"
        );
        self.range = next;
        true
    }
}

/// A capacity-1 cache of the visible sub-sequence.
///
/// Keyed on the identity of the source sequence (`Arc` pointer) and the range bounds, so a
/// repeated lookup with unchanged inputs hands back the same allocation.
#[derive(Clone, Debug)]
pub struct SliceCache<T> {
    slot: Option<CachedSlice<T>>,
}

#[derive(Clone, Debug)]
struct CachedSlice<T> {
    source: Arc<[T]>,
    range: VisibleRange,
    slice: Arc<[T]>,
}

impl<T> Default for SliceCache<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> SliceCache<T> {
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<T: Clone> SliceCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `items[range]`, clamped to the sequence bounds.
    pub fn get(&mut self, items: &Arc<[T]>, range: VisibleRange) -> Arc<[T]> {
        if let Some(slot) = &self.slot {
            if Arc::ptr_eq(&slot.source, items) && slot.range == range {
                return Arc::clone(&slot.slice);
            }
        }

        let slice: Arc<[T]> = Arc::from(&items[range.clamp_to(items.len())]);
        self.slot = Some(CachedSlice {
            source: Arc::clone(items),
            range,
            slice: Arc::clone(&slice),
        });
        slice
    }
}
