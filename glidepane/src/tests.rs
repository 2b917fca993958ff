use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

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

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        start + (end - start) * unit
    }
}

const FRAME_MS: u64 = 16;

fn header(threshold: f32, collapsed: f32, expanded: f32) -> CollapsingHeaderState {
    CollapsingHeaderState::new(
        HeaderOptions::new(collapsed, expanded).with_snap_threshold(threshold),
    )
}

/// Ticks at 60 Hz until the header stops settling; returns the final timestamp.
fn settle(h: &mut CollapsingHeaderState, start_ms: u64) -> u64 {
    let mut now_ms = start_ms;
    for _ in 0..2_000 {
        if !h.is_settling() {
            return now_ms;
        }
        now_ms += FRAME_MS;
        h.tick(now_ms);
    }
    panic!("header did not settle: {h:?}");
}

fn bits(weights: &[f32]) -> Vec<u32> {
    weights.iter().map(|w| w.to_bits()).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stop {
    Low,
    Mid,
    High,
}

// ---------------------------------------------------------------------------
// Anchored controller
// ---------------------------------------------------------------------------

#[test]
fn raw_delta_is_clamped_and_reports_full_delta() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);

    assert_eq!(c.dispatch_raw_delta(30.0), 30.0);
    assert_eq!(c.offset(), 30.0);
    assert_eq!(c.current_value(), Stop::Low);
    assert_eq!(c.target_value(), Stop::Low);

    assert_eq!(c.dispatch_raw_delta(500.0), 500.0);
    assert_eq!(c.offset(), 100.0);
    assert_eq!(c.current_value(), Stop::High);

    c.dispatch_raw_delta(-1_000.0);
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.current_value(), Stop::Low);
}

#[test]
fn construction_rejects_missing_anchors() {
    let empty = AnchorSet::<Stop>::new();
    assert_eq!(
        AnchoredDragController::try_new(empty, Stop::Low).unwrap_err(),
        ConfigError::EmptyAnchors
    );
    let anchors = AnchorSet::new().with(Stop::Low, 0.0);
    assert_eq!(
        AnchoredDragController::try_new(anchors, Stop::High).unwrap_err(),
        ConfigError::UnknownInitialState
    );
}

#[test]
#[should_panic]
fn new_panics_on_empty_anchors() {
    let _ = AnchoredDragController::new(AnchorSet::<Stop>::new(), Stop::Low);
}

#[test]
fn newer_animation_preempts_and_try_drag_fails_fast() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);
    let spec = AnimationSpec::Tween(TweenSpec::new(100, Easing::Linear));

    let first = c.animate_to(Stop::High, 0.0, spec, 0);
    assert!(first.is_running());
    assert!(c.is_locked());

    let second = c.animate_to(Stop::Low, 0.0, spec, 0);
    assert!(first.is_cancelled());
    assert!(second.is_running());
    assert_eq!(c.target_value(), Stop::Low);

    // Continuous drags do not queue behind the animation.
    assert_eq!(c.try_drag(10.0), None);

    // Raw dispatch bypasses the lock.
    c.dispatch_raw_delta(40.0);
    assert_eq!(c.offset(), 40.0);

    let mut now_ms = 0;
    while c.is_settling() {
        now_ms += FRAME_MS;
        c.tick(now_ms);
    }
    assert!(second.is_settled());
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.current_value(), Stop::Low);
    assert!(!c.is_locked());
    assert_eq!(c.try_drag(10.0), Some(10.0));
    assert_eq!(c.offset(), 10.0);
}

#[test]
fn snap_cancels_running_animation() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);
    let anim = c.animate_to(Stop::High, 0.0, AnimationSpec::default(), 0);
    c.tick(16);

    let snap = c.snap_to(Stop::Low);
    assert!(anim.is_cancelled());
    assert!(snap.is_settled());
    assert!(!c.is_settling());
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.tick(32), None);
}

#[test]
fn snap_to_unknown_anchor_is_cancelled() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::High);
    let handle = c.snap_to(Stop::Mid);
    assert!(handle.is_cancelled());
    assert_eq!(c.offset(), 100.0);
}

#[test]
fn bouncy_spring_stays_within_anchor_range() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);
    let spec = AnimationSpec::Spring(SpringSpec::new(
        SpringSpec::STIFFNESS_MEDIUM_LOW,
        SpringSpec::DAMPING_HIGH_BOUNCY,
    ));
    let handle = c.animate_to(Stop::High, 0.0, spec, 0);

    let mut now_ms = 0;
    while c.is_settling() {
        now_ms += FRAME_MS;
        let off = c.tick(now_ms).unwrap();
        assert!((0.0..=100.0).contains(&off), "offset {off} escaped the anchors");
        assert!(now_ms < 30_000);
    }
    assert!(handle.is_settled());
    assert_eq!(c.offset(), 100.0);
}

#[test]
fn decay_fling_stops_exactly_on_anchor() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);
    // Projection 0 + 2000 / 4.2 overshoots the anchor, so decay carries the fling.
    let handle = c.animate_to_with_decay(
        Stop::High,
        2_000.0,
        DecaySpec::default(),
        AnimationSpec::default(),
        0,
    );
    c.tick(FRAME_MS);
    assert!(c.last_velocity() > 0.0);

    let mut now_ms = FRAME_MS;
    while c.is_settling() {
        now_ms += FRAME_MS;
        c.tick(now_ms);
    }
    assert!(handle.is_settled());
    assert_eq!(c.offset(), 100.0);
    assert_eq!(c.current_value(), Stop::High);
    assert_eq!(c.last_velocity(), 0.0);
}

#[test]
fn weak_fling_falls_back_to_spring() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 300.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);
    let handle = c.animate_to_with_decay(
        Stop::High,
        100.0,
        DecaySpec::default(),
        AnimationSpec::default(),
        0,
    );
    let mut now_ms = 0;
    while c.is_settling() {
        now_ms += FRAME_MS;
        c.tick(now_ms);
        assert!(now_ms < 10_000);
    }
    assert!(handle.is_settled());
    assert_eq!(c.offset(), 300.0);
}

#[test]
fn update_anchors_follows_resting_anchor() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors.clone(), Stop::High);

    c.update_anchors(anchors.clone().with(Stop::High, 160.0));
    assert_eq!(c.offset(), 160.0);
    assert_eq!(c.current_value(), Stop::High);

    // Not resting: only re-clamped.
    c.dispatch_raw_delta(-100.0);
    assert_eq!(c.offset(), 60.0);
    c.update_anchors(anchors.clone().with(Stop::High, 50.0));
    assert_eq!(c.offset(), 50.0);
    assert_eq!(c.current_value(), Stop::High);
}

#[test]
fn update_anchors_adopts_closest_when_current_anchor_disappears() {
    let anchors = AnchorSet::new()
        .with(Stop::Low, 0.0)
        .with(Stop::Mid, 40.0)
        .with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Mid);

    c.update_anchors(AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0));
    assert_eq!(c.current_value(), Stop::Low);
    assert_eq!(c.offset(), 0.0);

    // Empty sets are ignored.
    c.update_anchors(AnchorSet::new());
    assert_eq!(c.anchors().len(), 2);
}

#[test]
fn update_anchors_cancels_animation_whose_target_disappears() {
    let anchors = AnchorSet::new()
        .with(Stop::Low, 0.0)
        .with(Stop::Mid, 50.0)
        .with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::Low);
    let handle = c.animate_to(Stop::Mid, 0.0, AnimationSpec::default(), 0);
    c.tick(FRAME_MS);

    c.update_anchors(AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0));
    assert!(handle.is_cancelled());
    assert!(!c.is_settling());
    assert!(!c.is_locked());
}

#[test]
fn anchor_set_queries() {
    let mut anchors = AnchorSet::new()
        .with(Stop::High, 100.0)
        .with(Stop::Low, 0.0)
        .with(Stop::Mid, 50.0);
    assert_eq!(anchors.min_position(), Some(0.0));
    assert_eq!(anchors.max_position(), Some(100.0));
    assert_eq!(anchors.closest(70.0), Some(Stop::Mid));
    assert_eq!(anchors.state_at(50.0), Some(Stop::Mid));
    assert_eq!(anchors.clamp(-3.0), 0.0);

    anchors.insert(Stop::Mid, 60.0);
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors.position(Stop::Mid), Some(60.0));
    assert_eq!(anchors.state_at(50.0), None);

    let partial = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    assert!(!partial.contains(Stop::Mid));
    assert_eq!(partial.closest(50.0), Some(Stop::Low));
}

#[test]
fn clamp_passes_offset_through_nan_bounds() {
    let anchors = AnchorSet::new().with(Stop::Low, f32::NAN);
    assert_eq!(anchors.clamp(5.0), 5.0);
    let anchors = anchors.with(Stop::High, 100.0);
    assert_eq!(anchors.clamp(5.0), 5.0);
}

#[test]
fn non_finite_anchors_are_rejected() {
    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, f32::NAN);
    assert!(matches!(
        AnchoredDragController::try_new(anchors, Stop::Low),
        Err(ConfigError::InvalidAnchorPosition { .. })
    ));

    let anchors = AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, 100.0);
    let mut c = AnchoredDragController::new(anchors, Stop::High);
    c.update_anchors(AnchorSet::new().with(Stop::Low, 0.0).with(Stop::High, f32::INFINITY));
    assert_eq!(c.anchors().position(Stop::High), Some(100.0));
    assert_eq!(c.offset(), 100.0);
    assert_eq!(c.dispatch_raw_delta(-30.0), -30.0);
    assert_eq!(c.offset(), 70.0);
}

// ---------------------------------------------------------------------------
// Collapsing header
// ---------------------------------------------------------------------------

#[test]
fn snap_is_exact() {
    let mut h = header(0.25, 100.0, 400.0);
    assert!(h.snap_to(HeaderValue::Collapsed).is_settled());
    assert_eq!(h.progress(), 1.0);
    assert_eq!(h.translation(), 300.0);
    assert!(h.snap_to(HeaderValue::Expanded).is_settled());
    assert_eq!(h.progress(), 0.0);
    assert_eq!(h.translation(), 0.0);
}

#[test]
fn progress_is_monotonic_under_raw_delta() {
    let mut h = header(0.25, 100.0, 400.0);
    let mut last = h.progress();
    for _ in 0..60 {
        h.dispatch_raw_delta(-7.0);
        let p = h.progress();
        assert!(p >= last);
        assert!((0.0..=1.0).contains(&p));
        last = p;
    }
    assert_eq!(last, 1.0);
    assert_eq!(h.current_value(), HeaderValue::Collapsed);

    for _ in 0..60 {
        h.dispatch_raw_delta(13.0);
        let p = h.progress();
        assert!(p <= last);
        assert!((0.0..=1.0).contains(&p));
        last = p;
    }
    assert_eq!(last, 0.0);
    assert_eq!(h.current_value(), HeaderValue::Expanded);
}

#[test]
fn rewriting_heights_does_not_drift() {
    let mut h = header(0.25, 100.0, 400.0);
    h.dispatch_raw_delta(-123.5);
    let offset = h.offset();
    let progress = h.progress();
    for _ in 0..10 {
        h.set_collapsed_height(100.0);
        h.set_expanded_height(400.0);
        h.set_heights(HeaderHeights::new(100.0, 400.0));
    }
    assert_eq!(h.offset().to_bits(), offset.to_bits());
    assert_eq!(h.progress().to_bits(), progress.to_bits());
}

#[test]
fn expanded_header_stays_expanded_across_remeasure() {
    let mut h = header(0.25, 100.0, 400.0);
    h.set_expanded_height(520.0);
    assert_eq!(h.current_value(), HeaderValue::Expanded);
    assert_eq!(h.offset(), 520.0);
    assert_eq!(h.progress(), 0.0);

    h.snap_to(HeaderValue::Collapsed);
    h.set_collapsed_height(80.0);
    assert_eq!(h.current_value(), HeaderValue::Collapsed);
    assert_eq!(h.offset(), 80.0);
    assert_eq!(h.progress(), 1.0);
}

#[test]
fn shrinking_expanded_height_reclamps_partial_offset() {
    let mut h = header(0.25, 100.0, 400.0);
    h.dispatch_raw_delta(-30.0);
    assert_eq!(h.offset(), 370.0);
    h.set_expanded_height(300.0);
    assert_eq!(h.offset(), 300.0);
    assert_eq!(h.current_value(), HeaderValue::Expanded);
}

#[test]
fn remeasure_during_animation_retargets() {
    let mut h = header(0.25, 100.0, 400.0);
    h.snap_to(HeaderValue::Collapsed);
    let handle = h.animate_to(HeaderValue::Expanded, 0);
    h.tick(FRAME_MS);
    h.set_expanded_height(500.0);
    assert!(h.is_settling());
    settle(&mut h, FRAME_MS);
    assert!(handle.is_settled());
    assert_eq!(h.offset(), 500.0);
    assert_eq!(h.progress(), 0.0);
}

#[test]
fn fling_ends_below_threshold_expand() {
    let mut h = header(0.25, 100.0, 400.0);
    h.dispatch_raw_delta(-30.0);
    assert!((h.progress() - 0.1).abs() < 1e-6);

    let out = h.on_post_fling(Velocity::ZERO, Velocity::ZERO, 0);
    assert_eq!(out.consumed, Velocity::ZERO);
    let handle = out.animation.expect("expected a snap animation");
    assert_eq!(h.target_value(), HeaderValue::Expanded);

    settle(&mut h, 0);
    assert!(handle.is_settled());
    assert_eq!(h.progress(), 0.0);
    assert_eq!(h.current_value(), HeaderValue::Expanded);
}

#[test]
fn fling_ends_past_threshold_collapse() {
    let mut h = header(0.25, 100.0, 400.0);
    h.dispatch_raw_delta(-240.0);
    assert!((h.progress() - 0.8).abs() < 1e-6);

    let out = h.on_post_fling(Velocity::ZERO, Velocity::ZERO, 0);
    assert!(out.animation.is_some());
    settle(&mut h, 0);
    assert_eq!(h.progress(), 1.0);
    assert_eq!(h.current_value(), HeaderValue::Collapsed);
}

#[test]
fn fling_ends_mid_range_do_nothing() {
    let mut h = header(0.25, 100.0, 400.0);
    h.dispatch_raw_delta(-150.0);
    assert_eq!(h.progress(), 0.5);

    let out = h.on_post_fling(Velocity::ZERO, Velocity::ZERO, 0);
    assert!(out.animation.is_none());
    assert_eq!(out.consumed, Velocity::ZERO);
    assert!(!h.is_settling());
    assert_eq!(h.tick(100), None);
    assert_eq!(h.progress(), 0.5);
}

#[test]
fn residual_consumption_suppresses_snap() {
    let mut h = header(0.25, 100.0, 400.0);
    h.dispatch_raw_delta(-30.0);
    let out = h.on_post_fling(Velocity::new(0.0, -500.0), Velocity::ZERO, 0);
    assert!(out.animation.is_none());
}

#[test]
fn collapsed_header_flings_open_with_residual_velocity() {
    let mut h = header(0.25, 100.0, 400.0);
    h.snap_to(HeaderValue::Collapsed);
    assert_eq!(h.progress(), 1.0);

    let available = Velocity::new(0.0, 800.0);
    let out = h.on_post_fling(Velocity::new(0.0, -200.0), available, 0);
    assert_eq!(out.consumed, available);
    let handle = out.animation.expect("expected a fling animation");
    assert_eq!(h.target_value(), HeaderValue::Expanded);

    h.tick(FRAME_MS);
    assert!(h.controller().last_velocity() > 0.0);
    settle(&mut h, FRAME_MS);
    assert!(handle.is_settled());
    assert_eq!(h.progress(), 0.0);
}

#[test]
fn expanded_header_flings_closed_with_residual_velocity() {
    let mut h = header(0.25, 100.0, 400.0);
    let out = h.on_post_fling(Velocity::ZERO, Velocity::new(0.0, -5_000.0), 0);
    assert!(out.animation.is_some());
    settle(&mut h, 0);
    assert_eq!(h.progress(), 1.0);
}

#[test]
fn pre_scroll_only_collapses_and_never_consumes() {
    let mut h = header(0.25, 100.0, 400.0);

    let consumed = h.on_pre_scroll(Offset::new(0.0, 50.0), NestedScrollSource::Drag);
    assert_eq!(consumed, Offset::ZERO);
    assert_eq!(h.offset(), 400.0);

    let consumed = h.on_pre_scroll(Offset::new(12.0, -50.0), NestedScrollSource::Drag);
    assert_eq!(consumed, Offset::ZERO);
    assert_eq!(h.offset(), 350.0);
}

#[test]
fn post_scroll_forwards_both_directions() {
    let mut h = header(0.25, 100.0, 400.0);
    h.snap_to(HeaderValue::Collapsed);

    let consumed = h.on_post_scroll(
        Offset::new(0.0, 10.0),
        Offset::new(0.0, 30.0),
        NestedScrollSource::Drag,
    );
    assert_eq!(consumed, Offset::ZERO);
    assert_eq!(h.offset(), 130.0);

    h.on_post_scroll(Offset::ZERO, Offset::new(0.0, -10.0), NestedScrollSource::Wheel);
    assert_eq!(h.offset(), 120.0);
    assert_eq!(h.on_pre_fling(Velocity::new(0.0, 300.0)), Velocity::ZERO);
}

#[test]
fn zero_travel_header_has_nan_progress_and_never_snaps() {
    let mut h = header(0.25, 100.0, 100.0);
    assert!(h.progress().is_nan());
    let out = h.on_post_fling(Velocity::ZERO, Velocity::ZERO, 0);
    assert!(out.animation.is_none());
}

#[test]
fn header_rejects_bad_threshold() {
    for threshold in [0.0, 1.0, -0.2, 1.5, f32::NAN] {
        let err = CollapsingHeaderState::try_new(
            HeaderOptions::new(100.0, 400.0).with_snap_threshold(threshold),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSnapThreshold { .. }));
    }
    let err = CollapsingHeaderState::try_new(
        HeaderOptions::new(100.0, 400.0)
            .with_animation_spec(AnimationSpec::Spring(SpringSpec::new(0.0, 1.0))),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSpring { .. }));
}

#[test]
fn header_rejects_bad_motion_thresholds() {
    for threshold in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let spring = SpringSpec::new(1_500.0, 1.0).with_visibility_threshold(threshold);
        let err = CollapsingHeaderState::try_new(
            HeaderOptions::new(100.0, 400.0).with_animation_spec(AnimationSpec::Spring(spring)),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSpring { .. }));
    }
    for velocity_threshold in [-1.0, f32::NAN] {
        let decay = DecaySpec {
            friction: 4.2,
            velocity_threshold,
        };
        let err = CollapsingHeaderState::try_new(HeaderOptions::new(100.0, 400.0).with_decay(decay))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDecay { .. }));
    }
    let decay = DecaySpec {
        friction: 4.2,
        velocity_threshold: 0.0,
    };
    let options = HeaderOptions::new(100.0, 400.0).with_decay(decay);
    assert!(CollapsingHeaderState::try_new(options).is_ok());
}

#[test]
fn non_finite_heights_are_rejected_or_ignored() {
    assert!(matches!(
        CollapsingHeaderState::try_new(HeaderOptions::new(f32::NAN, f32::NAN)),
        Err(ConfigError::InvalidHeights { .. })
    ));
    assert!(matches!(
        CollapsingHeaderState::try_new(HeaderOptions::new(100.0, f32::INFINITY)),
        Err(ConfigError::InvalidHeights { .. })
    ));

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut h = CollapsingHeaderState::new(HeaderOptions::new(100.0, 400.0).with_on_change(Some(
        move |_: &CollapsingHeaderState| {
            counter.fetch_add(1, Ordering::Relaxed);
        },
    )));
    h.set_expanded_height(f32::NAN);
    h.set_collapsed_height(f32::NEG_INFINITY);
    assert_eq!(h.heights(), HeaderHeights::new(100.0, 400.0));
    assert_eq!(calls.load(Ordering::Relaxed), 0);

    h.dispatch_raw_delta(-10.0);
    assert_eq!(h.offset(), 390.0);
}

#[test]
#[should_panic]
fn header_new_panics_on_bad_threshold() {
    let _ = header(1.0, 100.0, 400.0);
}

#[test]
fn header_save_restore_round_trip() {
    let mut h = header(0.3, 100.0, 350.0);
    h.dispatch_raw_delta(-175.0);
    assert!((h.progress() - 0.7).abs() < 1e-6);

    let saved = h.save();
    assert_eq!(saved.version, HEADER_STATE_VERSION);
    assert_eq!(saved.expanded_height, 350.0);
    assert_eq!(saved.snap_threshold, 0.3);

    let restored = CollapsingHeaderState::restore(&saved, HeaderOptions::new(100.0, 0.0)).unwrap();
    assert_eq!(restored.current_value(), HeaderValue::Collapsed);
    assert_eq!(restored.expanded_height(), 350.0);
    assert_eq!(restored.collapsed_height(), 100.0);
    assert_eq!(restored.snap_threshold(), 0.3);
    assert_eq!(restored.progress(), 1.0);
}

#[test]
fn header_restore_below_half_starts_expanded() {
    let saved = HeaderSavedState {
        version: HEADER_STATE_VERSION,
        expanded_height: 300.0,
        progress: 0.5,
        snap_threshold: 0.25,
    };
    let restored = CollapsingHeaderState::restore(&saved, HeaderOptions::new(50.0, 0.0)).unwrap();
    assert_eq!(restored.current_value(), HeaderValue::Expanded);
    assert_eq!(restored.offset(), 300.0);

    let stale = HeaderSavedState {
        version: HEADER_STATE_VERSION + 1,
        ..saved
    };
    assert!(matches!(
        CollapsingHeaderState::restore(&stale, HeaderOptions::new(50.0, 0.0)),
        Err(ConfigError::UnsupportedVersion { .. })
    ));
}

#[test]
fn header_on_change_is_batched() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut h = CollapsingHeaderState::new(HeaderOptions::new(100.0, 400.0).with_on_change(Some(
        move |_: &CollapsingHeaderState| {
            counter.fetch_add(1, Ordering::Relaxed);
        },
    )));

    h.dispatch_raw_delta(-10.0);
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    h.batch_update(|h| {
        h.dispatch_raw_delta(-10.0);
        h.set_expanded_height(420.0);
        h.dispatch_raw_delta(5.0);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 2);

    // No-op writes do not notify.
    h.set_expanded_height(420.0);
    h.dispatch_raw_delta(0.0);
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

// ---------------------------------------------------------------------------
// Split layout
// ---------------------------------------------------------------------------

fn split(max_count: usize, size: f32, min_size: f32) -> SplitLayoutState {
    SplitLayoutState::new(
        SplitOptions::new(max_count)
            .with_size(size)
            .with_min_size(min_size),
    )
}

#[test]
fn split_starts_evenly_with_separators() {
    let s = split(3, 300.0, 0.0);
    assert_eq!(s.weights(), &[1.0f32 / 3.0; 3]);
    for i in 0..3 {
        assert!((s.weight_at(i) - 1.0 / 3.0).abs() < 1e-6);
    }
    let mut offsets = Vec::new();
    s.for_each_separator(|i, off| offsets.push((i, off)));
    assert_eq!(offsets.len(), 2);
    assert!((offsets[0].1 - 100.0).abs() < 1e-3);
    assert!((offsets[1].1 - 200.0).abs() < 1e-3);
    assert_eq!(s.separator_offset(0), Some(offsets[0].1));
    assert_eq!(s.separator_offset(1), Some(offsets[1].1));
    assert_eq!(s.separator_offset(2), None);
}

#[test]
fn set_weight_moves_delta_to_next_pane() {
    let mut s = split(3, 300.0, 0.0);
    assert!(s.set_weight_at(0, 0.5));
    let w = s.weights();
    assert_eq!(w[0], 0.5);
    assert!((w[1] - 1.0 / 6.0).abs() < 1e-6);
    assert_eq!(w[2], 1.0 / 3.0);
    assert!((s.pane_size(0) - 150.0).abs() < 1e-3);
}

#[test]
fn set_weight_search_wraps_around() {
    let mut s = split(3, 300.0, 0.0);
    assert!(s.set_weight_at(2, 0.5));
    let w = s.weights();
    assert!((w[0] - 1.0 / 6.0).abs() < 1e-6);
    assert_eq!(w[1], 1.0 / 3.0);
    assert_eq!(w[2], 0.5);
}

#[test]
fn set_weight_skips_panes_that_would_drop_below_min() {
    let mut s = split(4, 1_000.0, 90.0);
    assert!(s.set_weight_at(0, 0.4));
    assert!((s.weights()[1] - 0.1).abs() < 1e-6);

    // Pane 1 cannot give up another 0.1; pane 2 takes it.
    assert!(s.set_weight_at(0, 0.5));
    let w = s.weights();
    assert_eq!(w[0], 0.5);
    assert!((w[1] - 0.1).abs() < 1e-6);
    assert!((w[2] - 0.15).abs() < 1e-6);
    assert_eq!(w[3], 0.25);
}

#[test]
fn set_weight_failures_leave_weights_untouched() {
    let mut s = split(3, 300.0, 60.0);
    let before = bits(s.weights());

    // Below min size.
    assert!(!s.set_weight_at(0, 0.1));
    // No single pane can absorb the delta.
    assert!(!s.set_weight_at(0, 0.9));
    // Out of range weights.
    assert!(!s.set_weight_at(0, 0.0));
    assert!(!s.set_weight_at(0, -0.2));
    assert!(!s.set_weight_at(0, 1.5));
    assert!(!s.set_weight_at(0, f32::NAN));
    // Not a visible pane.
    assert!(!s.set_weight_at(3, 0.2));

    assert_eq!(bits(s.weights()), before);
}

#[test]
fn single_pane_cannot_be_resized() {
    let mut s = split(1, 300.0, 0.0);
    assert_eq!(s.weight_at(0), 1.0);
    assert!(!s.set_weight_at(0, 0.5));
    assert_eq!(s.separator_offset(0), None);
}

#[test]
fn hidden_panes_keep_weight_and_can_absorb() {
    let mut s = SplitLayoutState::new(
        SplitOptions::new(3)
            .with_visible_count(2)
            .with_size(300.0),
    );
    assert!((s.weight_at(0) - 0.5).abs() < 1e-6);
    assert!((s.weight_sum() - 2.0 / 3.0).abs() < 1e-6);

    // Pane 2 is hidden but comes first in the search from pane 1.
    assert!(s.set_weight_at(1, 0.5));
    let w = s.weights();
    assert_eq!(w[1], 0.5);
    assert!((w[2] - 1.0 / 6.0).abs() < 1e-6);
    assert!((s.weight_at(1) - 0.6).abs() < 1e-5);
    assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-5);

    s.set_visible_count(3);
    assert!((s.weight_at(2) - 1.0 / 6.0).abs() < 1e-5);
    s.set_visible_count(10);
    assert_eq!(s.visible_count(), 3);
}

#[test]
fn drag_by_moves_trailing_edge() {
    let mut s = split(3, 300.0, 50.0);
    assert!(s.drag_by(0, 30.0));
    assert!((s.pane_size(0) - 130.0).abs() < 1e-3);
    assert!((s.pane_size(1) - 70.0).abs() < 1e-3);
    assert!((s.separator_offset(0).unwrap() - 130.0).abs() < 1e-3);

    // Pane 1 would drop to 20 and pane 2 to 70: pane 2 absorbs.
    assert!(s.drag_by(0, 30.0));
    assert!((s.pane_size(0) - 160.0).abs() < 1e-3);
    assert!((s.pane_size(2) - 70.0).abs() < 1e-3);

    // Nothing left that can give up 100 more.
    assert!(!s.drag_by(0, 100.0));
}

#[test]
fn drag_by_needs_an_extent() {
    let mut s = split(2, 0.0, 0.0);
    assert!(!s.drag_by(0, 10.0));
    s.set_layout_size(Size::new(200.0, 50.0));
    assert_eq!(s.size(), 200.0);
    assert!(s.drag_by(0, 10.0));
}

#[test]
fn vertical_split_projects_height() {
    let mut s = SplitLayoutState::new(SplitOptions::new(2).with_orientation(Orientation::Vertical));
    s.set_layout_size(Size::new(200.0, 50.0));
    assert_eq!(s.size(), 50.0);
}

#[test]
fn weight_total_is_conserved_and_min_size_holds() {
    let mut rng = Lcg::new(0x5eed);
    for round in 0..40 {
        let max_count = rng.gen_range_usize(2, 7);
        let visible = rng.gen_range_usize(1, max_count + 1);
        let size = rng.gen_f32(200.0, 2_000.0);
        let min_size = rng.gen_f32(0.0, size / (max_count as f32 * 1.5));
        let mut s = SplitLayoutState::new(
            SplitOptions::new(max_count)
                .with_visible_count(visible)
                .with_size(size)
                .with_min_size(min_size),
        );

        for _ in 0..200 {
            let before = bits(s.weights());
            let index = rng.gen_range_usize(0, visible);
            let ok = if rng.next_u64() % 2 == 0 {
                let weight = rng.gen_f32(0.0, s.weight_sum() * 1.1);
                s.set_weight_at(index, weight)
            } else {
                let delta = rng.gen_f32(-size / 4.0, size / 4.0);
                s.drag_by(index, delta)
            };

            if ok {
                let total: f32 = s.weights().iter().sum();
                assert!((total - 1.0).abs() < 1e-3, "round {round}: total {total}");
                assert!(s.weights().iter().all(|w| *w > 0.0));
                for i in 0..s.visible_count() {
                    assert!(
                        s.weight_at(i) * s.size() >= s.min_size(),
                        "round {round}: pane {i} below min size"
                    );
                }
            } else {
                assert_eq!(bits(s.weights()), before, "round {round}: failed call mutated");
            }
        }
    }
}

#[test]
fn split_rejects_bad_options() {
    assert!(matches!(
        SplitLayoutState::try_new(SplitOptions::new(0)),
        Err(ConfigError::InvalidPaneCount { .. })
    ));
    assert!(matches!(
        SplitLayoutState::try_new(SplitOptions::new(2).with_visible_count(3)),
        Err(ConfigError::InvalidVisibleCount { .. })
    ));
    assert!(matches!(
        SplitLayoutState::try_new(SplitOptions::new(2).with_min_size(-1.0)),
        Err(ConfigError::InvalidMinSize { .. })
    ));
    assert!(matches!(
        SplitLayoutState::try_new(SplitOptions::new(2).with_min_size(f32::NAN)),
        Err(ConfigError::InvalidMinSize { .. })
    ));
    assert!(matches!(
        SplitLayoutState::try_new(SplitOptions::new(2).with_size(f32::NAN)),
        Err(ConfigError::InvalidSize { .. })
    ));
}

#[test]
fn split_ignores_invalid_extents() {
    let mut s = split(2, 100.0, 20.0);
    for bad in [f32::NAN, -1.0, f32::INFINITY] {
        s.set_min_size(bad);
        s.set_size(bad);
    }
    assert_eq!(s.min_size(), 20.0);
    assert_eq!(s.size(), 100.0);
    // 0.3 of 100 is above the floor, 0.1 is not.
    assert!(!s.set_weight_at(0, 0.1));
    assert!(s.set_weight_at(0, 0.3));
}

#[test]
#[should_panic]
fn weight_at_hidden_pane_panics() {
    let s = SplitLayoutState::new(SplitOptions::new(3).with_visible_count(2));
    let _ = s.weight_at(2);
}

#[test]
fn split_save_restore_round_trip() {
    let mut s = split(3, 300.0, 10.0);
    assert!(s.set_weight_at(1, 0.5));
    s.set_visible_count(2);
    let saved = s.save();
    assert_eq!(saved.version, SPLIT_STATE_VERSION);

    let restored =
        SplitLayoutState::restore(&saved, SplitOptions::new(1).with_size(600.0)).unwrap();
    assert_eq!(restored.max_count(), 3);
    assert_eq!(restored.visible_count(), 2);
    assert_eq!(bits(restored.weights()), bits(s.weights()));
    assert_eq!(restored.size(), 600.0);

    let broken = SplitSavedState {
        weights: alloc::vec![0.5, -0.5],
        ..saved
    };
    assert!(matches!(
        SplitLayoutState::restore(&broken, SplitOptions::new(1)),
        Err(ConfigError::InvalidWeights { .. })
    ));
}

#[test]
fn split_on_change_fires_on_success_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut s = SplitLayoutState::new(SplitOptions::new(2).with_size(100.0).with_on_change(Some(
        move |_: &SplitLayoutState| {
            counter.fetch_add(1, Ordering::Relaxed);
        },
    )));
    assert!(!s.set_weight_at(0, 2.0));
    assert_eq!(calls.load(Ordering::Relaxed), 0);
    assert!(s.set_weight_at(0, 0.6));
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    s.batch_update(|s| {
        s.set_size(200.0);
        s.drag_by(0, -10.0);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

// ---------------------------------------------------------------------------
// Motion and utilities
// ---------------------------------------------------------------------------

#[test]
fn easing_endpoints() {
    for easing in [
        Easing::Linear,
        Easing::SmoothStep,
        Easing::EaseInOutCubic,
        Easing::FastOutSlowIn,
    ] {
        assert!(easing.sample(0.0).abs() < 1e-4, "{easing:?}");
        assert!((easing.sample(1.0) - 1.0).abs() < 1e-4, "{easing:?}");
    }
    let mut last = 0.0;
    for i in 1..=20 {
        let v = Easing::FastOutSlowIn.sample(i as f32 / 20.0);
        assert!(v >= last);
        last = v;
    }
}

#[test]
fn tween_samples_and_retargets() {
    let mut t = Tween::new(0.0, 100.0, 0, 100, Easing::Linear);
    assert_eq!(t.sample(50), 50.0);
    assert!((t.velocity(50) - 1_000.0).abs() < 1.0);
    assert!(t.is_done(100));
    assert_eq!(t.velocity(100), 0.0);

    t.retarget(50, 0.0, 50);
    assert_eq!(t.from, 50.0);
    assert_eq!(t.sample(100), 0.0);
}

#[test]
fn decay_target_projects_velocity() {
    let decay = DecaySpec::new(5.0);
    assert_eq!(decay.target(10.0, 100.0), 30.0);
    assert!(DecaySpec::new(0.0).validate().is_err());
}

#[test]
fn orientation_projects_axes() {
    let o = Offset::new(3.0, 4.0);
    assert_eq!(Orientation::Horizontal.main(o), 3.0);
    assert_eq!(Orientation::Horizontal.cross(o), 4.0);
    assert_eq!(Orientation::Vertical.main(o), 4.0);
    assert_eq!(Orientation::Vertical.main(Size::new(10.0, 20.0)), 20.0);
    assert_eq!(Orientation::Vertical.offset(4.0, 3.0), o);
    assert_eq!(Orientation::Horizontal.velocity(1.0, 2.0), Velocity::new(1.0, 2.0));
}

#[test]
fn interpolation_helpers() {
    assert_eq!(lerp(10.0f32, 20.0, 0.25), 12.5);
    assert_eq!(lerp(10.0f32, 20.0, 1.5), 25.0);

    let a = lerp(BiasAlignment::TOP_START, BiasAlignment::CENTER, 0.5);
    assert_eq!(a, BiasAlignment::new(-0.5, -0.5));
    let pos = BiasAlignment::CENTER.align(Size::new(20.0, 10.0), Size::new(100.0, 50.0));
    assert_eq!(pos, Offset::new(40.0, 20.0));

    let scale = lerp(ScaleFactor::IDENTITY, ScaleFactor::uniform(0.5), 0.5);
    assert_eq!(scale, ScaleFactor::uniform(0.75));
    assert_eq!(scale.apply(Size::new(100.0, 40.0)), Size::new(75.0, 30.0));

    assert_eq!(fraction_between(0.5, 0.6, 1.0), 0.0);
    assert!((fraction_between(0.8, 0.6, 1.0) - 0.5).abs() < 1e-6);
    assert_eq!(fraction_between(1.2, 0.6, 1.0), 1.0);
    assert!(fraction_between(f32::NAN, 0.0, 1.0).is_nan());
}

#[test]
fn mutator_try_lock_and_preempt() {
    let mut m = Mutator::new();
    let a = m.try_lock().unwrap();
    assert!(m.try_lock().is_none());
    let b = m.lock_preempting();
    assert!(a.is_cancelled());
    assert!(!m.unlock(&a, AnimationStatus::Settled));
    assert!(m.unlock(&b, AnimationStatus::Settled));
    assert!(b.is_settled());
    assert!(!m.is_locked());
    assert_ne!(a.id(), b.id());
}

#[test]
fn config_error_display() {
    let msg = alloc::format!("{}", ConfigError::InvalidSnapThreshold { threshold: 1.5 });
    assert!(msg.contains("1.5"));
}
