use pull_loader::{BodyLayout, GestureStatus, IndicatorLayout, Progress, VisibleRange};

/// Everything the presentation layer needs to draw the list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub status: GestureStatus,
    pub pull_height: f64,
    pub range: VisibleRange,
    pub footer_visible: bool,
    pub progress: Progress,
    pub body: BodyLayout,
    pub indicator: Option<IndicatorLayout>,
}

/// What the host should do after dispatching an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the native default action (scrolling) for this event.
    pub prevent_default: bool,
    /// The frame changed and the list should re-render.
    pub changed: bool,
}
