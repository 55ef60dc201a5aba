//! A headless windowed list engine with pull-to-refresh and load-more gestures.
//!
//! For host-surface wiring (listener registration, event routing, teardown), see the
//! `pull-loader-adapter` crate.
//!
//! Two pieces make up the core:
//! - the viewport window: given a fixed row pitch, overscan and live scroll metrics, it computes
//!   the half-open range of rows to materialize ([`compute_range`], [`ViewportWindow`],
//!   [`SliceCache`]);
//! - the gesture machine: it tracks a single touch, eases the drag into a pull height, and moves
//!   between [`GestureStatus`] values on touch, scroll, transition-end and completion events
//!   ([`GestureMachine`]).
//!
//! It is UI-agnostic. An adapter is expected to provide:
//! - scroll position, viewport height and content height
//! - touch positions and a "content body finished its transition" signal
//! - a clock (`now_ms`) and a periodic `tick`
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod completion;
mod delay;
mod easing;
mod error;
mod gesture;
mod options;
mod state;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use completion::{LoadMoreCompletion, RefreshCompletion, RequestId};
pub use delay::Delay;
pub use easing::{PULL_CAP_DIVISOR, PullEasing, ease_out_sine};
pub use error::ConfigError;
pub use gesture::GestureMachine;
pub use options::{
    DEFAULT_MAX_PULL_DISTANCE, DEFAULT_OVERSCAN, DEFAULT_REFRESH_THRESHOLD,
    DEFAULT_REFRESHED_HOLD_MS, DEFAULT_SCROLL_THRESHOLD, LoadMoreCallback, PullLoaderOptions,
    RefreshCallback,
};
pub use state::{BodyLayout, GestureState, IndicatorLayout};
pub use types::{GestureStatus, InitialTouch, Progress, ScrollMetrics, TouchMove, VisibleRange};
pub use window::{SliceCache, ViewportWindow, compute_range};
