use std::sync::{Arc, Mutex};

use pull_loader::{LoadMoreCompletion, PullLoaderOptions, RefreshCompletion, ScrollMetrics};
use pull_loader_adapter::{
    ControllerBuilder, GestureKind, HostEvent, ListenerOptions, Surface, TouchEvent,
    TransitionTarget,
};

// A stand-in for a scrolling element: fixed viewport, content height follows the item count.
#[derive(Debug)]
struct FakeScroller {
    scroll_top: f64,
    client_height: f64,
    scroll_height: f64,
}

impl Surface for FakeScroller {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            client_height: self.client_height,
            scroll_height: self.scroll_height,
        }
    }

    fn display_height(&self) -> Option<f64> {
        Some(780.0)
    }

    fn add_listener(&mut self, kind: GestureKind, options: ListenerOptions) {
        println!("add_listener {kind:?} {options:?}");
    }

    fn remove_listener(&mut self, kind: GestureKind) {
        println!("remove_listener {kind:?}");
    }
}

fn main() {
    // Example: a feed that refreshes on pull and appends pages near the bottom.
    //
    // The caller owns data fetching. Here the callbacks park their completion handles and the
    // "network" settles them a few frames later.
    let pending_refresh: Arc<Mutex<Option<RefreshCompletion>>> = Arc::default();
    let pending_page: Arc<Mutex<Option<LoadMoreCompletion>>> = Arc::default();

    let r = Arc::clone(&pending_refresh);
    let p = Arc::clone(&pending_page);
    let options = PullLoaderOptions::new(60.0)
        .with_overscan(2)
        .with_has_more(true)
        .with_scroll_threshold(120.0)
        .with_on_refresh(Some(move |done: RefreshCompletion| {
            *r.lock().unwrap() = Some(done);
        }))
        .with_on_load_more(Some(move |done: LoadMoreCompletion| {
            *p.lock().unwrap() = Some(done);
        }));

    let items: Vec<String> = (0..40).map(|i| format!("post #{i}")).collect();
    let mut list = ControllerBuilder::new(options)
        .with_items(items)
        .with_render_row(|post: &String, index| format!("[{index:>3}] {post}"))
        .with_on_change(|frame| println!("  frame: {} range={:?}", frame.status, frame.range))
        .build(FakeScroller {
            scroll_top: 0.0,
            client_height: 600.0,
            scroll_height: 40.0 * 60.0,
        })
        .expect("valid configuration");

    let mut now_ms = 0u64;
    list.mount(now_ms);

    // The mount kicked off an automatic load-more; the "server" answers with 20 more posts.
    now_ms += 120;
    if let Some(done) = pending_page.lock().unwrap().take() {
        let more: Vec<String> = (0..60).map(|i| format!("post #{i}")).collect();
        list.surface_mut().scroll_height = more.len() as f64 * 60.0;
        list.set_items(more);
        done.done();
    }
    list.tick(now_ms);

    for row in list.render_visible() {
        println!("{row}");
    }

    // Pull down from the top.
    list.handle_event(&HostEvent::TouchStart(TouchEvent::single(80.0)), now_ms);
    for y in [120.0, 200.0, 320.0, 420.0] {
        now_ms += 16;
        let r = list.handle_event(&HostEvent::TouchMove(TouchEvent::single(y)), now_ms);
        println!(
            "move y={y} pull={:.1} prevent_default={}",
            list.frame().pull_height,
            r.prevent_default
        );
    }
    list.handle_event(&HostEvent::TouchEnd(TouchEvent::default()), now_ms);

    // The body animates back to its resting place, then the refresh is requested.
    now_ms += 200;
    list.handle_event(&HostEvent::TransitionEnd(TransitionTarget::Body), now_ms);

    now_ms += 400;
    if let Some(done) = pending_refresh.lock().unwrap().take() {
        done.success();
    }
    // Simulate a 60fps tick until the "refreshed" confirmation has been dismissed.
    loop {
        now_ms += 16;
        list.tick(now_ms);
        if list.machine().revert_deadline_ms().is_none() {
            break;
        }
    }

    // Scroll near the bottom to fetch the next page.
    list.surface_mut().scroll_top = 60.0 * 60.0 - 600.0 - 60.0;
    list.handle_event(&HostEvent::Scroll, now_ms);
    println!("after scroll: {}", list.status());

    list.unmount();
}
