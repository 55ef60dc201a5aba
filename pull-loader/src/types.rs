/// The half-open index range `[start, end)` of items to materialize.
///
/// `end` may exceed the item count; slicing clamps it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Clamps the range to a sequence of `count` items.
    pub fn clamp_to(&self, count: usize) -> core::ops::Range<usize> {
        let end = self.end.min(count);
        self.start.min(end)..end
    }
}

/// Live scroll metrics reported by the rendering surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Remaining distance between the bottom of the viewport and the end of the content.
    pub fn scroll_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// Reference point captured at touch-start.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialTouch {
    pub client_y: f64,
    pub scroll_top: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureStatus {
    #[default]
    Init,
    Reset,
    Loading,
    /// A pull is in progress. `enough` is set once the pull height reaches the refresh threshold.
    Pulling {
        enough: bool,
    },
    Refreshed,
    Refreshing,
}

impl GestureStatus {
    /// A stable lowercase tag for styling hooks.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Reset => "reset",
            Self::Loading => "loading",
            Self::Pulling { .. } => "pulling",
            Self::Refreshed => "refreshed",
            Self::Refreshing => "refreshing",
        }
    }

    pub fn is_enough(self) -> bool {
        matches!(self, Self::Pulling { enough: true })
    }

    /// Whether an asynchronous operation is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Refreshing | Self::Loading)
    }
}

impl core::fmt::Display for GestureStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())?;
        if self.is_enough() {
            f.write_str(" enough")?;
        }
        Ok(())
    }
}

/// Progress-bar hint passed through to the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Progress {
    #[default]
    Disabled,
    Started,
    Done,
}

impl Progress {
    pub fn is_visible(self) -> bool {
        self != Self::Disabled
    }

    pub fn is_completed(self) -> bool {
        self == Self::Done
    }
}

/// Result of feeding a touch-move into the gesture machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchMove {
    /// The host should suppress the default scroll behavior for this event.
    pub prevent_default: bool,
}
