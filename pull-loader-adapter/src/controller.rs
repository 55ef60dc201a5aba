use std::sync::Arc;

use pull_loader::{
    BodyLayout, GestureMachine, GestureStatus, IndicatorLayout, LoadMoreCompletion, Progress,
    PullLoaderOptions, RefreshCompletion, SliceCache, ViewportWindow, VisibleRange,
};

use crate::{
    AdapterError, EventResponse, Frame, GestureKind, HostEvent, ListenerOptions, Surface,
    TransitionTarget, passive_listeners_supported,
};

/// Renders one row. The second argument is the row's index in the full sequence.
pub type RenderRow<T, R> = Arc<dyn Fn(&T, usize) -> R + Send + Sync>;

/// Fired after an event, tick or prop change whenever the [`Frame`] differs from the last one.
pub type OnFrameChange = Arc<dyn Fn(&Frame) + Send + Sync>;

/// Builds a [`Controller`]. The row render callback is required.
pub struct ControllerBuilder<T, R> {
    options: PullLoaderOptions,
    items: Arc<[T]>,
    render_row: Option<RenderRow<T, R>>,
    on_change: Option<OnFrameChange>,
}

impl<T, R> ControllerBuilder<T, R> {
    pub fn new(options: PullLoaderOptions) -> Self {
        Self {
            options,
            items: Arc::from(Vec::new()),
            render_row: None,
            on_change: None,
        }
    }

    pub fn with_items(mut self, items: impl Into<Arc<[T]>>) -> Self {
        self.items = items.into();
        self
    }

    pub fn with_render_row(
        mut self,
        render_row: impl Fn(&T, usize) -> R + Send + Sync + 'static,
    ) -> Self {
        self.render_row = Some(Arc::new(render_row));
        self
    }

    pub fn with_on_change(mut self, on_change: impl Fn(&Frame) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    /// Validates the configuration and attaches it to `surface`.
    ///
    /// When no maximum pull distance is configured, the surface's display height is used.
    pub fn build<S: Surface>(self, surface: S) -> Result<Controller<S, T, R>, AdapterError> {
        let render_row = self.render_row.ok_or(AdapterError::MissingRenderRow)?;

        let mut options = self.options;
        if options.max_pull_distance.is_none() {
            options.max_pull_distance = surface.display_height();
        }
        let window = ViewportWindow::new(options.row_height, options.overscan);
        let machine = GestureMachine::new(options)?;

        let mut controller = Controller {
            surface,
            machine,
            window,
            items: self.items,
            slices: SliceCache::default(),
            render_row,
            on_change: self.on_change,
            listeners: Vec::new(),
            lifecycle: Lifecycle::Created,
            last_frame: Frame::default(),
        };
        controller.last_frame = controller.compute_frame();
        Ok(controller)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// A framework-neutral list controller: windowed rendering plus pull-to-refresh and load-more.
///
/// The controller owns the [`Surface`] handle but no rendering objects. Adapters drive it by
/// calling:
/// - [`mount`](Self::mount) once the surface is attached, [`unmount`](Self::unmount) before it
///   goes away
/// - [`handle_event`](Self::handle_event) for every touch, scroll, transition-end and footer tap
/// - [`tick`](Self::tick) each frame or timer tick, which applies asynchronous settlements and
///   ends the "refreshed" confirmation
pub struct Controller<S, T, R> {
    surface: S,
    machine: GestureMachine,
    window: ViewportWindow,
    items: Arc<[T]>,
    slices: SliceCache<T>,
    render_row: RenderRow<T, R>,
    on_change: Option<OnFrameChange>,
    listeners: Vec<GestureKind>,
    lifecycle: Lifecycle,
    last_frame: Frame,
}

impl<S: Surface, T, R> Controller<S, T, R> {
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn machine(&self) -> &GestureMachine {
        &self.machine
    }

    pub fn items(&self) -> &Arc<[T]> {
        &self.items
    }

    pub fn frame(&self) -> Frame {
        self.last_frame
    }

    pub fn status(&self) -> GestureStatus {
        self.machine.status()
    }

    pub fn range(&self) -> VisibleRange {
        self.window.range()
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Attaches to the surface: starts an automatic load-more if allowed, registers the touch
    /// listeners and computes the first visible range.
    pub fn mount(&mut self, now_ms: u64) -> bool {
        if self.lifecycle != Lifecycle::Created {
            return false;
        }
        self.lifecycle = Lifecycle::Mounted;

        let metrics = self.surface.metrics();
        self.machine.mount(metrics.scroll_top, now_ms);

        let surface = &self.surface;
        let passive = passive_listeners_supported(|| surface.probe_passive_listeners());
        let options = ListenerOptions::will_prevent_default(passive);
        for kind in GestureKind::ALL {
            self.surface.add_listener(kind, options);
            self.listeners.push(kind);
        }
        adebug!(?options, "listeners registered");

        self.window.update(metrics.scroll_top, metrics.client_height);
        self.commit()
    }

    /// Detaches from the surface. Listeners are removed and the pending "refreshed" revert is
    /// cancelled; every later event is ignored.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        for kind in self.listeners.drain(..) {
            self.surface.remove_listener(kind);
        }
        self.machine.teardown();
        self.lifecycle = Lifecycle::Unmounted;
        adebug!("unmounted");
    }

    /// Routes one host event.
    pub fn handle_event(&mut self, event: &HostEvent, now_ms: u64) -> EventResponse {
        if self.lifecycle != Lifecycle::Mounted {
            return EventResponse::default();
        }
        if let Some(kind) = event.gesture_kind() {
            if !self.listeners.contains(&kind) {
                return EventResponse::default();
            }
        }

        self.machine.poll(now_ms);

        let mut prevent_default = false;
        match event {
            HostEvent::TouchStart(touch) => {
                if let Some(first) = touch.first() {
                    let scroll_top = self.surface.metrics().scroll_top;
                    self.machine
                        .touch_start(touch.touches.len(), first.client_y, scroll_top);
                }
            }
            HostEvent::TouchMove(touch) => {
                if let Some(first) = touch.first() {
                    let scroll_top = self.surface.metrics().scroll_top;
                    prevent_default = self
                        .machine
                        .touch_move(first.client_y, touch.cancelable, scroll_top)
                        .prevent_default;
                }
            }
            HostEvent::TouchEnd(_) | HostEvent::TouchCancel(_) => {
                let scroll_top = self.surface.metrics().scroll_top;
                self.machine.touch_end(scroll_top);
            }
            HostEvent::Scroll => {
                let metrics = self.surface.metrics();
                self.window.update(metrics.scroll_top, metrics.client_height);
                self.machine.on_scroll(metrics, now_ms);
            }
            HostEvent::TransitionEnd(TransitionTarget::Body) => {
                self.machine.transition_end(now_ms);
            }
            HostEvent::TransitionEnd(TransitionTarget::Descendant) => {
                atrace!("ignoring bubbled transition end");
            }
            HostEvent::FooterTap => {
                if self.machine.has_more() {
                    self.machine.load_more(now_ms);
                }
            }
        }

        EventResponse {
            prevent_default,
            changed: self.commit(),
        }
    }

    /// Applies asynchronous settlements and the "refreshed" hold delay.
    ///
    /// Returns `true` if the frame changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.lifecycle != Lifecycle::Mounted {
            return false;
        }
        self.machine.tick(now_ms);
        self.commit()
    }

    /// Replaces the item sequence. Identity (not content) keys the visible-slice cache.
    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) -> bool {
        self.items = items.into();
        // Drop the cached slice so the previous sequence is not kept alive.
        self.slices.clear();
        self.commit()
    }

    pub fn set_has_more(&mut self, has_more: bool) -> bool {
        self.machine.set_has_more(has_more);
        self.commit()
    }

    /// Enables or disables the scroll-threshold trigger. Footer taps are unaffected.
    pub fn set_auto_load_more(&mut self, auto_load_more: bool) {
        self.machine.set_auto_load_more(auto_load_more);
    }

    pub fn set_progress(&mut self, progress: Progress) -> bool {
        self.machine.set_progress(progress);
        self.commit()
    }

    pub fn set_on_refresh(
        &mut self,
        on_refresh: Option<impl Fn(RefreshCompletion) + Send + Sync + 'static>,
    ) {
        self.machine.set_on_refresh(on_refresh);
    }

    pub fn set_on_load_more(
        &mut self,
        on_load_more: Option<impl Fn(LoadMoreCompletion) + Send + Sync + 'static>,
    ) {
        self.machine.set_on_load_more(on_load_more);
    }

    fn compute_frame(&self) -> Frame {
        let state = self.machine.state();
        let range = self.window.range();
        Frame {
            status: state.status,
            pull_height: state.pull_height,
            range,
            footer_visible: self.machine.has_more(),
            progress: self.machine.progress(),
            body: BodyLayout::compute(
                range,
                self.items.len(),
                self.window.row_height(),
                state.pull_height,
            ),
            indicator: IndicatorLayout::for_pull_height(state.pull_height),
        }
    }

    fn commit(&mut self) -> bool {
        let next = self.compute_frame();
        if next == self.last_frame {
            return false;
        }
        atrace!(status = %next.status, start = next.range.start, end = next.range.end, "frame");
        self.last_frame = next;
        if let Some(cb) = &self.on_change {
            cb(&self.last_frame);
        }
        true
    }
}

impl<S: Surface, T: Clone, R> Controller<S, T, R> {
    /// The items inside the current range. Unchanged inputs return the same allocation.
    pub fn visible_items(&mut self) -> Arc<[T]> {
        self.slices.get(&self.items, self.window.range())
    }

    /// Renders the visible items with the row callback.
    pub fn render_visible(&mut self) -> Vec<R> {
        let visible = self.visible_items();
        let first = self.window.range().start;
        visible
            .iter()
            .enumerate()
            .map(|(i, item)| (self.render_row)(item, first + i))
            .collect()
    }
}

impl<S: core::fmt::Debug, T, R> core::fmt::Debug for Controller<S, T, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("surface", &self.surface)
            .field("machine", &self.machine)
            .field("window", &self.window)
            .field("items", &self.items.len())
            .field("listeners", &self.listeners)
            .field("lifecycle", &self.lifecycle)
            .field("last_frame", &self.last_frame)
            .finish_non_exhaustive()
    }
}
