use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::completion::{Outcome, Settlement};
use crate::{
    ConfigError, Delay, GestureState, GestureStatus, InitialTouch, LoadMoreCompletion, Progress,
    PullEasing, PullLoaderOptions, RefreshCompletion, RequestId, ScrollMetrics, TouchMove,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestKind {
    Refresh,
    LoadMore,
}

fn kind_of(outcome: Outcome) -> RequestKind {
    match outcome {
        Outcome::RefreshSucceeded | Outcome::RefreshFailed => RequestKind::Refresh,
        Outcome::LoadedMore => RequestKind::LoadMore,
    }
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    id: RequestId,
    kind: RequestKind,
}

/// The pull-to-refresh / load-more state machine.
///
/// This type holds no UI objects. Your adapter feeds it touch, scroll and transition-end events
/// together with the live scroll position, and reads back [`GestureStatus`] and the eased pull
/// height. Time is adapter-driven: pass `now_ms` from your clock and call [`tick`](Self::tick)
/// on each frame or timer callback so settlements and the "refreshed" hold delay are applied.
///
/// The machine never times out a request. A caller that never settles its completion handle
/// leaves the machine in `Refreshing` or `Loading` for good.
pub struct GestureMachine {
    options: PullLoaderOptions,
    easing: PullEasing,
    status: GestureStatus,
    pull_height: f64,
    initial_touch: InitialTouch,

    in_flight: Option<InFlight>,
    next_request: u64,
    revert: Option<Delay>,
    tx: Sender<Settlement>,
    rx: Receiver<Settlement>,

    detached: bool,
}

impl GestureMachine {
    pub fn new(options: PullLoaderOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let easing = PullEasing::new(options.resolved_max_pull_distance());
        pdebug!(
            row_height = options.row_height,
            refresh_threshold = options.refresh_threshold,
            max_pull_distance = easing.max_distance(),
            "GestureMachine::new"
        );
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            options,
            easing,
            status: GestureStatus::Init,
            pull_height: 0.0,
            initial_touch: InitialTouch::default(),
            in_flight: None,
            next_request: 0,
            revert: None,
            tx,
            rx,
            detached: false,
        })
    }

    pub fn options(&self) -> &PullLoaderOptions {
        &self.options
    }

    pub fn easing(&self) -> PullEasing {
        self.easing
    }

    pub fn status(&self) -> GestureStatus {
        self.status
    }

    pub fn pull_height(&self) -> f64 {
        self.pull_height
    }

    pub fn initial_touch(&self) -> InitialTouch {
        self.initial_touch
    }

    pub fn state(&self) -> GestureState {
        GestureState {
            status: self.status,
            pull_height: self.pull_height,
        }
    }

    pub fn progress(&self) -> Progress {
        self.options.progress
    }

    pub fn has_more(&self) -> bool {
        self.options.has_more
    }

    /// The id of the refresh or load-more request currently awaiting settlement.
    pub fn in_flight_request(&self) -> Option<RequestId> {
        self.in_flight.map(|r| r.id)
    }

    /// When the "refreshed" confirmation will revert to idle, if it is pending.
    pub fn revert_deadline_ms(&self) -> Option<u64> {
        self.revert.map(|d| d.deadline_ms())
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.options.has_more = has_more;
    }

    pub fn set_auto_load_more(&mut self, auto_load_more: bool) {
        self.options.auto_load_more = auto_load_more;
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.options.progress = progress;
    }

    pub fn set_on_refresh(
        &mut self,
        on_refresh: Option<impl Fn(RefreshCompletion) + Send + Sync + 'static>,
    ) {
        self.options.on_refresh = on_refresh.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_load_more(
        &mut self,
        on_load_more: Option<impl Fn(LoadMoreCompletion) + Send + Sync + 'static>,
    ) {
        self.options.on_load_more = on_load_more.map(|f| Arc::new(f) as _);
    }

    /// True unless a refresh or load-more is in flight (and the machine is still attached).
    pub fn can_load(&self) -> bool {
        !self.detached && !self.status.is_busy()
    }

    pub fn can_refresh(&self) -> bool {
        self.options.on_refresh.is_some() && self.can_load()
    }

    pub fn can_load_more(&self) -> bool {
        self.options.has_more && self.options.on_load_more.is_some() && self.can_load()
    }

    fn set_status(&mut self, status: GestureStatus) {
        if self.status == status {
            return;
        }
        ptrace!(from = %self.status, to = %status, "status transition");
        self.status = status;
    }

    /// Call once the list is attached to its surface.
    ///
    /// Starts an automatic load-more when allowed and records the current scroll position as the
    /// touch reference.
    pub fn mount(&mut self, scroll_top: f64, now_ms: u64) {
        if self.detached {
            return;
        }
        if self.options.auto_load_more && self.can_load_more() {
            self.load_more(now_ms);
        }
        self.initial_touch.scroll_top = scroll_top;
    }

    /// Only a single contact point arms a pull.
    pub fn touch_start(&mut self, touch_count: usize, client_y: f64, scroll_top: f64) {
        if touch_count != 1 || !self.can_refresh() {
            return;
        }
        self.initial_touch = InitialTouch {
            client_y,
            scroll_top,
        };
    }

    pub fn touch_move(&mut self, client_y: f64, cancelable: bool, scroll_top: f64) -> TouchMove {
        if !cancelable || !self.can_refresh() {
            return TouchMove::default();
        }

        let distance = client_y - self.initial_touch.client_y;
        if !(distance > 0.0 && scroll_top <= 0.0) {
            return TouchMove::default();
        }

        let mut pull_distance = distance - self.initial_touch.scroll_top;
        if pull_distance < 0.0 {
            // The scroll position read at touch-start is unreliable during momentum scrolling;
            // re-anchor so the pull starts from here.
            pull_distance = 0.0;
            self.initial_touch.scroll_top = distance;
        }

        let pull_height = self.easing.sample(pull_distance);
        self.pull_height = pull_height;
        self.set_status(GestureStatus::Pulling {
            enough: pull_height >= self.options.refresh_threshold,
        });

        TouchMove {
            prevent_default: pull_height > 0.0,
        }
    }

    /// Handles both touch-end and touch-cancel.
    pub fn touch_end(&mut self, scroll_top: f64) {
        if !self.can_refresh() {
            return;
        }
        self.pull_height = 0.0;
        let next = if self.status.is_enough() {
            GestureStatus::Refreshing
        } else if scroll_top == 0.0 {
            GestureStatus::Reset
        } else {
            GestureStatus::Init
        };
        self.set_status(next);
    }

    /// The content body finished its transition. The adapter must filter out transitions that
    /// bubbled up from descendants.
    pub fn transition_end(&mut self, now_ms: u64) {
        if self.detached {
            return;
        }
        match self.status {
            GestureStatus::Refreshing => self.request_refresh(now_ms),
            GestureStatus::Reset => self.set_status(GestureStatus::Init),
            _ => {}
        }
    }

    /// Evaluates the automatic load-more threshold after a scroll.
    ///
    /// Returns `true` if a load-more was started.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now_ms: u64) -> bool {
        if !self.options.auto_load_more || !self.can_load_more() {
            return false;
        }
        if metrics.scroll_bottom() > self.options.scroll_threshold {
            return false;
        }
        self.load_more(now_ms)
    }

    /// Starts a load-more (footer tap or automatic trigger).
    ///
    /// Returns `false` if the guard rejected it.
    pub fn load_more(&mut self, now_ms: u64) -> bool {
        if !self.can_load_more() {
            return false;
        }
        let Some(on_load_more) = self.options.on_load_more.clone() else {
            return false;
        };

        self.set_status(GestureStatus::Loading);
        let id = self.issue(RequestKind::LoadMore);
        on_load_more(LoadMoreCompletion::new(id, self.tx.clone()));
        self.poll(now_ms);
        true
    }

    fn request_refresh(&mut self, now_ms: u64) {
        if self.in_flight.is_some() {
            ptrace!("transition end while a request is in flight");
            return;
        }
        let Some(on_refresh) = self.options.on_refresh.clone() else {
            // The callback was removed after the pull was armed.
            self.pull_height = 0.0;
            self.set_status(GestureStatus::Reset);
            return;
        };

        let id = self.issue(RequestKind::Refresh);
        on_refresh(RefreshCompletion::new(id, self.tx.clone()));
        self.poll(now_ms);
    }

    fn issue(&mut self, kind: RequestKind) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request = self.next_request.wrapping_add(1);
        self.in_flight = Some(InFlight { id, kind });
        pdebug!(request = id.0, kind = ?kind, "request issued");
        id
    }

    /// Applies settlements delivered since the last poll.
    pub fn poll(&mut self, now_ms: u64) {
        if self.detached {
            return;
        }
        while let Ok(settlement) = self.rx.try_recv() {
            self.apply_settlement(settlement, now_ms);
        }
    }

    fn apply_settlement(&mut self, settlement: Settlement, now_ms: u64) {
        let matches = self.in_flight.is_some_and(|in_flight| {
            in_flight.id == settlement.request && in_flight.kind == kind_of(settlement.outcome)
        });
        if !matches {
            pwarn!(
                request = settlement.request.0,
                "ignoring settlement for a request that is not in flight"
            );
            return;
        }
        self.in_flight = None;
        pdebug!(
            request = settlement.request.0,
            outcome = ?settlement.outcome,
            "request settled"
        );

        match settlement.outcome {
            Outcome::RefreshSucceeded => {
                self.pull_height = 0.0;
                self.set_status(GestureStatus::Refreshed);
                self.revert = Some(Delay::new(now_ms, self.options.refreshed_hold_ms));
            }
            Outcome::RefreshFailed => {
                self.pull_height = 0.0;
                self.set_status(GestureStatus::Reset);
            }
            Outcome::LoadedMore => self.set_status(GestureStatus::Init),
        }
    }

    /// Fires the "refreshed" hold delay once it elapses, then applies pending settlements.
    ///
    /// A hold delay started by a settlement applied here is checked on the next tick at the
    /// earliest, so `Refreshed` is observable for at least one tick even with a zero hold.
    pub fn tick(&mut self, now_ms: u64) {
        if self.detached {
            return;
        }
        self.fire_revert(now_ms);
        self.poll(now_ms);
    }

    fn fire_revert(&mut self, now_ms: u64) {
        let Some(revert) = self.revert else {
            return;
        };
        if !revert.is_done(now_ms) {
            return;
        }
        self.revert = None;
        // A new gesture may have taken over since the confirmation was shown.
        if self.status == GestureStatus::Refreshed {
            self.set_status(GestureStatus::Init);
        }
    }

    /// Detaches the machine. Every later event, settlement and tick is a no-op and the pending
    /// hold delay is cancelled. In-flight requests are not cancelled; their settlements are
    /// discarded.
    pub fn teardown(&mut self) {
        if self.detached {
            return;
        }
        pdebug!(
            in_flight = self.in_flight.is_some(),
            revert_pending = self.revert.is_some(),
            "GestureMachine::teardown"
        );
        self.detached = true;
        self.revert = None;
        self.in_flight = None;
        while self.rx.try_recv().is_ok() {}
    }
}

impl core::fmt::Debug for GestureMachine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GestureMachine")
            .field("options", &self.options)
            .field("status", &self.status)
            .field("pull_height", &self.pull_height)
            .field("initial_touch", &self.initial_touch)
            .field("in_flight", &self.in_flight)
            .field("revert", &self.revert)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}
