use crate::{GestureStatus, VisibleRange};

/// A lightweight snapshot of the gesture machine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GestureState {
    pub status: GestureStatus,
    pub pull_height: f64,
}

/// Geometry of the content body that hosts the windowed rows.
///
/// The body reserves the full content height and pushes the first materialized row down to its
/// natural position, so the scrollbar reflects the whole sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyLayout {
    pub padding_top: f64,
    pub min_height: f64,
    /// Vertical offset applied while a pull is in progress.
    pub translate_y: Option<f64>,
}

impl BodyLayout {
    pub fn compute(
        range: VisibleRange,
        item_count: usize,
        row_height: f64,
        pull_height: f64,
    ) -> Self {
        Self {
            padding_top: range.start as f64 * row_height,
            min_height: item_count as f64 * row_height,
            translate_y: (pull_height != 0.0).then_some(pull_height),
        }
    }
}

/// Geometry of the pull indicator above the body.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorLayout {
    pub height: f64,
}

impl IndicatorLayout {
    pub const MIN_HEIGHT: f64 = 48.0;

    /// `None` when nothing is being pulled.
    pub fn for_pull_height(pull_height: f64) -> Option<Self> {
        if pull_height == 0.0 {
            return None;
        }
        Some(Self {
            height: pull_height.max(Self::MIN_HEIGHT),
        })
    }
}
