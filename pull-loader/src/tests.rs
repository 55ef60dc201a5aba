use crate::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start))
    }

    fn gen_f64(&mut self, start: f64, end: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        start + (end - start) * unit
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

type Pending<T> = Arc<Mutex<Vec<T>>>;

/// Options whose callbacks park their completion handles for the test to settle later.
fn deferred_options() -> (
    PullLoaderOptions,
    Pending<RefreshCompletion>,
    Pending<LoadMoreCompletion>,
) {
    let refreshes: Pending<RefreshCompletion> = Arc::default();
    let loads: Pending<LoadMoreCompletion> = Arc::default();
    let r = Arc::clone(&refreshes);
    let l = Arc::clone(&loads);
    let options = PullLoaderOptions::new(50.0)
        .with_on_refresh(Some(move |done: RefreshCompletion| {
            r.lock().unwrap().push(done)
        }))
        .with_on_load_more(Some(move |done: LoadMoreCompletion| {
            l.lock().unwrap().push(done)
        }));
    (options, refreshes, loads)
}

fn take_one<T>(pending: &Pending<T>) -> T {
    let mut v = pending.lock().unwrap();
    assert_eq!(v.len(), 1, "expected exactly one pending handle");
    v.pop().unwrap()
}

/// Drags from y=0 to y=`distance` at the top of the list.
fn pull(m: &mut GestureMachine, distance: f64) -> TouchMove {
    m.touch_start(1, 0.0, 0.0);
    m.touch_move(distance, true, 0.0)
}

#[test]
fn range_matches_reference_scenario() {
    let r = compute_range(120.0, 300.0, 50.0, 1);
    assert_eq!(r, VisibleRange { start: 1, end: 9 });
}

#[test]
fn range_at_top_and_in_overscroll() {
    assert_eq!(
        compute_range(0.0, 300.0, 50.0, 1),
        VisibleRange { start: 0, end: 8 }
    );
    // Bounce above the top behaves like offset 0.
    assert_eq!(
        compute_range(-40.0, 300.0, 50.0, 1),
        VisibleRange { start: 0, end: 8 }
    );
    assert_eq!(
        compute_range(1000.0, 300.0, 50.0, 0),
        VisibleRange {
            start: 20,
            end: 27
        }
    );
}

#[test]
fn range_with_empty_viewport_still_covers_one_row() {
    let r = compute_range(500.0, 0.0, 50.0, 2);
    assert_eq!(r, VisibleRange { start: 8, end: 11 });
    assert!(!r.is_empty());
}

#[test]
fn window_update_skips_unchanged_range() {
    let mut w = ViewportWindow::new(50.0, 1);
    assert_eq!(w.overscan(), 1);
    assert!(w.update(120.0, 300.0));
    assert_eq!(w.range(), VisibleRange { start: 1, end: 9 });

    assert!(!w.update(120.0, 300.0));
    // Same row under the top edge: no change.
    assert!(!w.update(140.0, 300.0));
    assert!(w.update(150.0, 300.0));
    assert_eq!(w.range(), VisibleRange { start: 2, end: 10 });
}

#[test]
fn slice_cache_reuses_allocation_for_identical_inputs() {
    let items: Arc<[u32]> = (0..20).collect::<Vec<_>>().into();
    let mut cache = SliceCache::new();

    let a = cache.get(&items, VisibleRange { start: 2, end: 5 });
    let b = cache.get(&items, VisibleRange { start: 2, end: 5 });
    assert_eq!(&*a, &[2, 3, 4]);
    assert!(Arc::ptr_eq(&a, &b));

    let c = cache.get(&items, VisibleRange { start: 3, end: 5 });
    assert!(!Arc::ptr_eq(&a, &c));

    // Equal content, different sequence identity.
    let copy: Arc<[u32]> = items.to_vec().into();
    let d = cache.get(&copy, VisibleRange { start: 3, end: 5 });
    assert_eq!(&*c, &*d);
    assert!(!Arc::ptr_eq(&c, &d));

    cache.clear();
    let e = cache.get(&copy, VisibleRange { start: 3, end: 5 });
    assert!(!Arc::ptr_eq(&d, &e));
    assert_eq!(Arc::strong_count(&items), 1);
}

#[test]
fn slice_cache_clamps_to_sequence_bounds() {
    let items: Arc<[u32]> = (0..4).collect::<Vec<_>>().into();
    let mut cache = SliceCache::new();
    assert_eq!(&*cache.get(&items, VisibleRange { start: 2, end: 9 }), &[2, 3]);
    assert!(cache.get(&items, VisibleRange { start: 7, end: 9 }).is_empty());
}

#[test]
fn easing_is_bounded_and_monotone() {
    let mut rng = Lcg::new(7);
    for _ in 0..200 {
        let d = rng.gen_f64(100.0, 2000.0);
        let easing = PullEasing::new(d);
        assert_eq!(easing.sample(0.0), 0.0);

        let mut prev = 0.0;
        let mut distance = 0.0;
        for _ in 0..64 {
            distance += rng.gen_f64(0.0, d / 16.0);
            let h = easing.sample(distance);
            assert!(h >= 0.0);
            assert!(h <= d / PULL_CAP_DIVISOR + 1e-9);
            assert!(h >= prev, "easing decreased at distance {distance}");
            prev = h;
        }
    }
}

#[test]
fn easing_reaches_cap_at_max_distance_and_stays_there() {
    let easing = PullEasing::new(720.0);
    assert!((easing.sample(720.0) - 288.0).abs() < 1e-9);
    assert!((easing.sample(5000.0) - 288.0).abs() < 1e-9);
    assert_eq!(easing.sample(-30.0), 0.0);
    // Small drags are nearly proportional (slope C/D * π/2 ≈ 0.63).
    let h = easing.sample(10.0);
    assert!(h > 6.0 && h < 6.5, "h={h}");
}

#[test]
fn invalid_configuration_is_rejected() {
    let err = GestureMachine::new(PullLoaderOptions::new(0.0)).unwrap_err();
    assert_eq!(err, ConfigError::InvalidRowHeight(0.0));
    assert!(matches!(
        GestureMachine::new(PullLoaderOptions::new(f64::NAN)),
        Err(ConfigError::InvalidRowHeight(_))
    ));
    assert_eq!(
        PullLoaderOptions::new(10.0)
            .with_refresh_threshold(-1.0)
            .validate(),
        Err(ConfigError::InvalidRefreshThreshold(-1.0))
    );
    assert_eq!(
        PullLoaderOptions::new(10.0)
            .with_scroll_threshold(f64::INFINITY)
            .validate(),
        Err(ConfigError::InvalidScrollThreshold(f64::INFINITY))
    );
    assert_eq!(
        PullLoaderOptions::new(10.0)
            .with_max_pull_distance(0.0)
            .validate(),
        Err(ConfigError::InvalidMaxPullDistance(0.0))
    );
    assert!(PullLoaderOptions::new(10.0).validate().is_ok());
}

#[test]
fn config_error_messages_name_the_value() {
    let msg = ConfigError::InvalidRowHeight(-2.0).to_string();
    assert!(msg.contains("row height"));
    assert!(msg.contains("-2"));
}

#[test]
fn zero_drag_leaves_machine_idle() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    let out = pull(&mut m, 0.0);
    assert!(!out.prevent_default);
    assert_eq!(m.status(), GestureStatus::Init);
    assert_eq!(m.pull_height(), 0.0);
}

#[test]
fn drag_past_threshold_arms_refresh_and_release_starts_it() {
    let (options, refreshes, _) = deferred_options();
    let mut m = GestureMachine::new(options.with_refresh_threshold(72.0)).unwrap();

    let out = pull(&mut m, 200.0);
    assert!(out.prevent_default);
    assert!(m.pull_height() >= 72.0);
    assert_eq!(m.status(), GestureStatus::Pulling { enough: true });
    assert!(m.status().is_enough());

    m.touch_end(0.0);
    assert_eq!(m.status(), GestureStatus::Refreshing);
    assert_eq!(m.pull_height(), 0.0);
    // The refresh is only requested once the body transition ends.
    assert!(refreshes.lock().unwrap().is_empty());
}

#[test]
fn short_pull_resets_at_top_and_idles_elsewhere() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();

    pull(&mut m, 20.0);
    assert_eq!(m.status(), GestureStatus::Pulling { enough: false });
    assert!(m.pull_height() > 0.0);

    m.touch_end(0.0);
    assert_eq!(m.status(), GestureStatus::Reset);
    assert_eq!(m.pull_height(), 0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Init);

    pull(&mut m, 20.0);
    m.touch_end(35.0);
    assert_eq!(m.status(), GestureStatus::Init);
}

#[test]
fn refresh_success_shows_confirmation_then_reverts_after_hold() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let options = PullLoaderOptions::new(50.0).with_on_refresh(Some(move |done: RefreshCompletion| {
        c.fetch_add(1, Ordering::SeqCst);
        done.success();
    }));
    let mut m = GestureMachine::new(options).unwrap();

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(1_000);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(m.status(), GestureStatus::Refreshed);
    assert_eq!(m.pull_height(), 0.0);
    assert_eq!(m.revert_deadline_ms(), Some(1_300));

    m.tick(1_299);
    assert_eq!(m.status(), GestureStatus::Refreshed);
    m.tick(1_300);
    assert_eq!(m.status(), GestureStatus::Init);
    assert_eq!(m.revert_deadline_ms(), None);
}

#[test]
fn refresh_failure_reverts_without_confirmation() {
    let options = PullLoaderOptions::new(50.0)
        .with_on_refresh(Some(|done: RefreshCompletion| done.failure()));
    let mut m = GestureMachine::new(options).unwrap();

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Reset);
    assert_eq!(m.pull_height(), 0.0);
    assert_eq!(m.revert_deadline_ms(), None);

    m.transition_end(10);
    assert_eq!(m.status(), GestureStatus::Init);
}

#[test]
fn deferred_refresh_settles_on_next_tick() {
    let (options, refreshes, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Refreshing);
    let id = m.in_flight_request().unwrap();

    let done = take_one(&refreshes);
    assert_eq!(done.request_id(), id);
    // Settle from another thread, as a network callback would.
    std::thread::spawn(move || done.success()).join().unwrap();
    assert_eq!(m.status(), GestureStatus::Refreshing);

    m.tick(500);
    assert_eq!(m.status(), GestureStatus::Refreshed);
    assert_eq!(m.in_flight_request(), None);
    m.tick(800);
    assert_eq!(m.status(), GestureStatus::Init);
}

#[test]
fn zero_hold_shows_refreshed_for_one_tick() {
    let (options, refreshes, _) = deferred_options();
    let mut m = GestureMachine::new(options.with_refreshed_hold_ms(0)).unwrap();

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    take_one(&refreshes).success();

    m.tick(10);
    assert_eq!(m.status(), GestureStatus::Refreshed);
    assert_eq!(m.revert_deadline_ms(), Some(10));
    m.tick(10);
    assert_eq!(m.status(), GestureStatus::Init);
    assert_eq!(m.revert_deadline_ms(), None);
}

#[test]
fn repeated_transition_end_does_not_request_twice() {
    let (options, refreshes, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    m.transition_end(5);
    assert_eq!(refreshes.lock().unwrap().len(), 1);
}

#[test]
fn dropped_handle_leaves_request_in_flight() {
    let options =
        PullLoaderOptions::new(50.0).with_on_refresh(Some(|done: RefreshCompletion| drop(done)));
    let mut m = GestureMachine::new(options).unwrap();

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    m.tick(10_000);
    assert_eq!(m.status(), GestureStatus::Refreshing);
    assert!(!m.can_load());
}

#[test]
fn scroll_near_bottom_triggers_load_more() {
    let (options, _, loads) = deferred_options();
    let mut m =
        GestureMachine::new(options.with_has_more(true).with_scroll_threshold(0.0)).unwrap();

    let far = ScrollMetrics {
        scroll_top: 100.0,
        client_height: 300.0,
        scroll_height: 1000.0,
    };
    assert!(!m.on_scroll(far, 0));
    assert_eq!(m.status(), GestureStatus::Init);

    let bottom = ScrollMetrics {
        scroll_top: 700.0,
        client_height: 300.0,
        scroll_height: 1000.0,
    };
    assert_eq!(bottom.scroll_bottom(), 0.0);
    assert!(m.on_scroll(bottom, 0));
    assert_eq!(m.status(), GestureStatus::Loading);

    // Still at the bottom, but a load is in flight.
    assert!(!m.on_scroll(bottom, 1));
    assert_eq!(loads.lock().unwrap().len(), 1);

    take_one(&loads).done();
    m.tick(2);
    assert_eq!(m.status(), GestureStatus::Init);
}

#[test]
fn load_more_requires_has_more_and_callback() {
    let (options, _, loads) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    assert!(!m.can_load_more());
    assert!(!m.load_more(0));

    m.set_has_more(true);
    assert!(m.load_more(0));
    assert_eq!(loads.lock().unwrap().len(), 1);

    let mut bare = GestureMachine::new(PullLoaderOptions::new(50.0).with_has_more(true)).unwrap();
    assert!(!bare.load_more(0));
    assert!(!bare.can_refresh());
}

#[test]
fn scroll_threshold_widens_trigger_zone() {
    let (options, _, _) = deferred_options();
    let mut m =
        GestureMachine::new(options.with_has_more(true).with_scroll_threshold(120.0)).unwrap();
    let near = ScrollMetrics {
        scroll_top: 600.0,
        client_height: 300.0,
        scroll_height: 1000.0,
    };
    assert!(m.on_scroll(near, 0));

    let (options, _, _) = deferred_options();
    let mut manual_only = GestureMachine::new(
        options
            .with_has_more(true)
            .with_scroll_threshold(120.0)
            .with_auto_load_more(false),
    )
    .unwrap();
    assert!(!manual_only.on_scroll(near, 0));
    assert!(manual_only.load_more(0));
}

#[test]
fn mount_starts_automatic_load_more() {
    let (options, _, loads) = deferred_options();
    let mut m = GestureMachine::new(options.with_has_more(true)).unwrap();
    m.mount(12.0, 0);
    assert_eq!(m.status(), GestureStatus::Loading);
    assert_eq!(m.initial_touch().scroll_top, 12.0);
    assert_eq!(loads.lock().unwrap().len(), 1);

    let (options, _, loads) = deferred_options();
    let mut m =
        GestureMachine::new(options.with_has_more(true).with_auto_load_more(false)).unwrap();
    m.mount(0.0, 0);
    assert_eq!(m.status(), GestureStatus::Init);
    assert!(loads.lock().unwrap().is_empty());
}

#[test]
fn busy_states_block_new_operations() {
    let (options, refreshes, loads) = deferred_options();
    let mut m = GestureMachine::new(options.with_has_more(true)).unwrap();

    assert!(m.load_more(0));
    assert_eq!(m.status(), GestureStatus::Loading);
    assert!(!m.can_refresh());
    assert!(!pull(&mut m, 300.0).prevent_default);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Loading);
    assert!(!m.load_more(0));
    assert_eq!(loads.lock().unwrap().len(), 1);

    take_one(&loads).done();
    m.tick(0);

    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Refreshing);
    assert!(!m.can_load_more());
    assert!(!m.load_more(0));
    let bottom = ScrollMetrics {
        scroll_top: 700.0,
        client_height: 300.0,
        scroll_height: 1000.0,
    };
    assert!(!m.on_scroll(bottom, 0));
    assert!(loads.lock().unwrap().is_empty());
    assert_eq!(refreshes.lock().unwrap().len(), 1);
}

#[test]
fn second_finger_does_not_rearm_touch() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    m.touch_start(1, 40.0, 0.0);
    m.touch_start(2, 400.0, 0.0);
    assert_eq!(m.initial_touch().client_y, 40.0);
}

#[test]
fn non_cancelable_move_is_ignored() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    m.touch_start(1, 0.0, 0.0);
    let out = m.touch_move(200.0, false, 0.0);
    assert!(!out.prevent_default);
    assert_eq!(m.status(), GestureStatus::Init);
}

#[test]
fn upward_drag_or_scrolled_list_is_not_a_pull() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    m.touch_start(1, 300.0, 0.0);
    assert!(!m.touch_move(200.0, true, 0.0).prevent_default);
    assert!(!m.touch_move(400.0, true, 15.0).prevent_default);
    assert_eq!(m.status(), GestureStatus::Init);
}

#[test]
fn stale_scroll_position_is_reanchored() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();

    // Touch-start read scroll_top = 100 mid-momentum; the list has since reached the top.
    m.touch_start(1, 0.0, 100.0);
    let out = m.touch_move(50.0, true, 0.0);
    assert!(!out.prevent_default);
    assert_eq!(m.pull_height(), 0.0);
    assert_eq!(m.initial_touch().scroll_top, 50.0);
    assert_eq!(m.status(), GestureStatus::Pulling { enough: false });

    let out = m.touch_move(80.0, true, 0.0);
    assert!(out.prevent_default);
    let expected = m.easing().sample(30.0);
    assert!((m.pull_height() - expected).abs() < 1e-9);
}

#[test]
fn teardown_cancels_hold_delay_and_ignores_events() {
    let options = PullLoaderOptions::new(50.0)
        .with_on_refresh(Some(|done: RefreshCompletion| done.success()));
    let mut m = GestureMachine::new(options).unwrap();
    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Refreshed);

    m.teardown();
    assert!(m.is_detached());
    assert_eq!(m.revert_deadline_ms(), None);
    m.tick(10_000);
    assert_eq!(m.status(), GestureStatus::Refreshed);

    assert!(!pull(&mut m, 300.0).prevent_default);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Refreshed);
    assert!(!m.can_load());
}

#[test]
fn settlement_after_teardown_is_discarded() {
    let (options, refreshes, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);

    m.teardown();
    take_one(&refreshes).success();
    m.tick(100);
    assert_eq!(m.status(), GestureStatus::Refreshing);

    // Settling after the machine is gone must not panic either.
    let (options, refreshes, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    drop(m);
    take_one(&refreshes).failure();
}

#[test]
fn hold_delay_does_not_override_a_new_gesture() {
    let options = PullLoaderOptions::new(50.0)
        .with_on_refresh(Some(|done: RefreshCompletion| done.success()));
    let mut m = GestureMachine::new(options).unwrap();
    pull(&mut m, 300.0);
    m.touch_end(0.0);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Refreshed);

    pull(&mut m, 20.0);
    assert_eq!(m.status(), GestureStatus::Pulling { enough: false });
    m.tick(300);
    assert_eq!(m.status(), GestureStatus::Pulling { enough: false });
}

#[test]
fn removing_refresh_callback_mid_gesture_resets() {
    let (options, _, _) = deferred_options();
    let mut m = GestureMachine::new(options).unwrap();
    pull(&mut m, 300.0);
    m.touch_end(0.0);
    assert_eq!(m.status(), GestureStatus::Refreshing);

    m.set_on_refresh(None::<fn(RefreshCompletion)>);
    m.transition_end(0);
    assert_eq!(m.status(), GestureStatus::Reset);
}

#[test]
fn status_tags_and_display() {
    assert_eq!(GestureStatus::Init.tag(), "init");
    assert_eq!(GestureStatus::Pulling { enough: false }.to_string(), "pulling");
    assert_eq!(GestureStatus::Pulling { enough: true }.to_string(), "pulling enough");
    assert_eq!(GestureStatus::Refreshing.tag(), "refreshing");
    assert!(GestureStatus::Loading.is_busy());
    assert!(!GestureStatus::Refreshed.is_busy());
}

#[test]
fn body_and_indicator_layout() {
    let range = VisibleRange { start: 4, end: 12 };
    let body = BodyLayout::compute(range, 100, 50.0, 0.0);
    assert_eq!(body.padding_top, 200.0);
    assert_eq!(body.min_height, 5000.0);
    assert_eq!(body.translate_y, None);

    let body = BodyLayout::compute(range, 100, 50.0, 30.0);
    assert_eq!(body.translate_y, Some(30.0));

    assert_eq!(IndicatorLayout::for_pull_height(0.0), None);
    assert_eq!(
        IndicatorLayout::for_pull_height(30.0),
        Some(IndicatorLayout { height: 48.0 })
    );
    assert_eq!(
        IndicatorLayout::for_pull_height(90.0),
        Some(IndicatorLayout { height: 90.0 })
    );
}

#[test]
fn progress_flags() {
    assert!(!Progress::Disabled.is_visible());
    assert!(Progress::Started.is_visible());
    assert!(!Progress::Started.is_completed());
    assert!(Progress::Done.is_completed());
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Op {
    TouchStart,
    TouchMove,
    TouchEnd,
    TransitionEnd,
    ScrollBottom,
    LoadMore,
    SettleRefresh,
    SettleLoad,
    Tick,
}

#[test]
fn random_event_sequences_respect_refresh_and_guard_rules() {
    let ops = [
        Op::TouchStart,
        Op::TouchMove,
        Op::TouchEnd,
        Op::TransitionEnd,
        Op::ScrollBottom,
        Op::LoadMore,
        Op::SettleRefresh,
        Op::SettleLoad,
        Op::Tick,
    ];

    let mut rng = Lcg::new(0xC0FFEE);
    for _ in 0..200 {
        let (options, refreshes, loads) = deferred_options();
        let mut m = GestureMachine::new(options.with_has_more(true)).unwrap();
        let mut now_ms = 0u64;

        for _ in 0..300 {
            let op = ops[rng.gen_range_u64(0, ops.len() as u64) as usize];
            let before = m.status();
            let in_flight_before = m.in_flight_request();
            let requests_before =
                refreshes.lock().unwrap().len() + loads.lock().unwrap().len();
            let mut settled = false;

            match op {
                Op::TouchStart => m.touch_start(1, rng.gen_f64(0.0, 50.0), 0.0),
                Op::TouchMove => {
                    let scroll_top = if rng.gen_bool() { 0.0 } else { 20.0 };
                    m.touch_move(rng.gen_f64(0.0, 600.0), true, scroll_top);
                }
                Op::TouchEnd => m.touch_end(if rng.gen_bool() { 0.0 } else { 20.0 }),
                Op::TransitionEnd => m.transition_end(now_ms),
                Op::ScrollBottom => {
                    m.on_scroll(
                        ScrollMetrics {
                            scroll_top: 700.0,
                            client_height: 300.0,
                            scroll_height: 1000.0,
                        },
                        now_ms,
                    );
                }
                Op::LoadMore => {
                    m.load_more(now_ms);
                }
                Op::SettleRefresh => {
                    if let Some(done) = refreshes.lock().unwrap().pop() {
                        if rng.gen_bool() {
                            done.success();
                        } else {
                            done.failure();
                        }
                        settled = true;
                    }
                    m.tick(now_ms);
                }
                Op::SettleLoad => {
                    if let Some(done) = loads.lock().unwrap().pop() {
                        done.done();
                        settled = true;
                    }
                    m.tick(now_ms);
                }
                Op::Tick => {
                    now_ms += rng.gen_range_u64(0, 400);
                    m.tick(now_ms);
                }
            }

            let after = m.status();
            let requests_after = refreshes.lock().unwrap().len() + loads.lock().unwrap().len();

            if after == GestureStatus::Refreshing && before != GestureStatus::Refreshing {
                assert_eq!(op, Op::TouchEnd);
                assert!(before.is_enough());
            }
            if before == GestureStatus::Refreshing && after != GestureStatus::Refreshing {
                assert!(settled, "left Refreshing without a settlement via {op:?}");
            }
            // Entering Refreshing arms the request; once one is in flight nothing overlaps it.
            if before.is_busy() && in_flight_before.is_some() && !settled {
                assert!(
                    requests_after <= requests_before,
                    "new request issued while {before:?}"
                );
            }
            assert!(m.pull_height() >= 0.0);
            assert!(m.pull_height() <= m.easing().max_height() + 1e-9);
        }
    }
}
