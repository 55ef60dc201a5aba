use std::sync::Arc;

use crate::{ConfigError, LoadMoreCompletion, Progress, RefreshCompletion};

/// Caller-supplied refresh operation. It must eventually settle the handle it receives.
pub type RefreshCallback = Arc<dyn Fn(RefreshCompletion) + Send + Sync>;

/// Caller-supplied page fetch. It must eventually settle the handle it receives.
pub type LoadMoreCallback = Arc<dyn Fn(LoadMoreCompletion) + Send + Sync>;

pub const DEFAULT_OVERSCAN: usize = 1;
pub const DEFAULT_REFRESH_THRESHOLD: f64 = 72.0;
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 0.0;
/// Used when no display height is known.
pub const DEFAULT_MAX_PULL_DISTANCE: f64 = 720.0;
/// How long the "refreshed" confirmation stays up before reverting to idle.
pub const DEFAULT_REFRESHED_HOLD_MS: u64 = 300;

/// Configuration for [`crate::GestureMachine`].
///
/// Cheap to clone: callbacks are held in `Arc`s.
pub struct PullLoaderOptions {
    /// Row pitch used by the range math. Must be finite and positive.
    pub row_height: f64,
    /// Extra rows rendered beyond the viewport on each side.
    pub overscan: usize,
    /// Pull height (after easing) that arms a refresh.
    pub refresh_threshold: f64,
    /// Distance from the bottom of the content that triggers an automatic load-more.
    pub scroll_threshold: f64,
    pub auto_load_more: bool,
    /// Whether more data can be appended. Also controls footer visibility.
    pub has_more: bool,
    /// Maximum draggable distance for the easing curve, usually the display height.
    ///
    /// `None` falls back to [`DEFAULT_MAX_PULL_DISTANCE`].
    pub max_pull_distance: Option<f64>,
    pub refreshed_hold_ms: u64,
    pub progress: Progress,
    pub on_refresh: Option<RefreshCallback>,
    pub on_load_more: Option<LoadMoreCallback>,
}

impl Clone for PullLoaderOptions {
    fn clone(&self) -> Self {
        Self {
            row_height: self.row_height,
            overscan: self.overscan,
            refresh_threshold: self.refresh_threshold,
            scroll_threshold: self.scroll_threshold,
            auto_load_more: self.auto_load_more,
            has_more: self.has_more,
            max_pull_distance: self.max_pull_distance,
            refreshed_hold_ms: self.refreshed_hold_ms,
            progress: self.progress,
            on_refresh: self.on_refresh.clone(),
            on_load_more: self.on_load_more.clone(),
        }
    }
}

impl PullLoaderOptions {
    pub fn new(row_height: f64) -> Self {
        Self {
            row_height,
            overscan: DEFAULT_OVERSCAN,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            auto_load_more: true,
            has_more: false,
            max_pull_distance: None,
            refreshed_hold_ms: DEFAULT_REFRESHED_HOLD_MS,
            progress: Progress::Disabled,
            on_refresh: None,
            on_load_more: None,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_refresh_threshold(mut self, refresh_threshold: f64) -> Self {
        self.refresh_threshold = refresh_threshold;
        self
    }

    pub fn with_scroll_threshold(mut self, scroll_threshold: f64) -> Self {
        self.scroll_threshold = scroll_threshold;
        self
    }

    pub fn with_auto_load_more(mut self, auto_load_more: bool) -> Self {
        self.auto_load_more = auto_load_more;
        self
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    pub fn with_max_pull_distance(mut self, max_pull_distance: f64) -> Self {
        self.max_pull_distance = Some(max_pull_distance);
        self
    }

    pub fn with_refreshed_hold_ms(mut self, hold_ms: u64) -> Self {
        self.refreshed_hold_ms = hold_ms;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_on_refresh(
        mut self,
        on_refresh: Option<impl Fn(RefreshCompletion) + Send + Sync + 'static>,
    ) -> Self {
        self.on_refresh = on_refresh.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_load_more(
        mut self,
        on_load_more: Option<impl Fn(LoadMoreCompletion) + Send + Sync + 'static>,
    ) -> Self {
        self.on_load_more = on_load_more.map(|f| Arc::new(f) as _);
        self
    }

    pub fn resolved_max_pull_distance(&self) -> f64 {
        self.max_pull_distance.unwrap_or(DEFAULT_MAX_PULL_DISTANCE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        if !(self.refresh_threshold.is_finite() && self.refresh_threshold >= 0.0) {
            return Err(ConfigError::InvalidRefreshThreshold(self.refresh_threshold));
        }
        if !self.scroll_threshold.is_finite() {
            return Err(ConfigError::InvalidScrollThreshold(self.scroll_threshold));
        }
        let max_pull = self.resolved_max_pull_distance();
        if !(max_pull.is_finite() && max_pull > 0.0) {
            return Err(ConfigError::InvalidMaxPullDistance(max_pull));
        }
        Ok(())
    }
}

impl core::fmt::Debug for PullLoaderOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PullLoaderOptions")
            .field("row_height", &self.row_height)
            .field("overscan", &self.overscan)
            .field("refresh_threshold", &self.refresh_threshold)
            .field("scroll_threshold", &self.scroll_threshold)
            .field("auto_load_more", &self.auto_load_more)
            .field("has_more", &self.has_more)
            .field("max_pull_distance", &self.max_pull_distance)
            .field("refreshed_hold_ms", &self.refreshed_hold_ms)
            .field("progress", &self.progress)
            .field("on_refresh", &self.on_refresh.is_some())
            .field("on_load_more", &self.on_load_more.is_some())
            .finish()
    }
}
