use alloc::sync::Arc;
use core::fmt;

use crate::notify::NotifyBatch;
use crate::state::HEADER_STATE_VERSION;
use crate::{
    AnchorSet, AnchoredDragController, AnimationHandle, AnimationSpec, ConfigError, DecaySpec,
    HeaderSavedState, NestedScrollConnection, NestedScrollSource, Offset, Orientation, PostFling,
    Velocity,
};

/// The two resting states of a collapsing header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderValue {
    Collapsed,
    Expanded,
}

/// Measured heights of a collapsing header.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderHeights {
    pub collapsed: f32,
    pub expanded: f32,
}

impl HeaderHeights {
    pub fn new(collapsed: f32, expanded: f32) -> Self {
        Self {
            collapsed,
            expanded,
        }
    }

    /// Total travel between the two anchors.
    pub fn range(&self) -> f32 {
        self.expanded - self.collapsed
    }

    pub fn is_finite(&self) -> bool {
        self.collapsed.is_finite() && self.expanded.is_finite()
    }

    fn anchors(&self) -> AnchorSet<HeaderValue> {
        AnchorSet::new()
            .with(HeaderValue::Collapsed, self.collapsed)
            .with(HeaderValue::Expanded, self.expanded)
    }
}

/// A callback fired after the header state changes.
pub type HeaderChangeCallback = Arc<dyn Fn(&CollapsingHeaderState) + Send + Sync>;

/// Configuration for [`CollapsingHeaderState`].
#[derive(Clone)]
pub struct HeaderOptions {
    pub heights: HeaderHeights,
    pub initial_value: HeaderValue,
    /// Fraction of progress within which a released header snaps back to the nearer end.
    ///
    /// Must lie strictly between 0 and 1.
    pub snap_threshold: f32,
    /// Curve used for snapping and for flings the decay cannot carry to the anchor.
    pub animation_spec: AnimationSpec,
    pub decay: DecaySpec,
    pub on_change: Option<HeaderChangeCallback>,
}

impl HeaderOptions {
    pub fn new(collapsed_height: f32, expanded_height: f32) -> Self {
        Self {
            heights: HeaderHeights::new(collapsed_height, expanded_height),
            initial_value: HeaderValue::Expanded,
            snap_threshold: 0.5,
            animation_spec: AnimationSpec::default(),
            decay: DecaySpec::default(),
            on_change: None,
        }
    }

    pub fn with_initial_value(mut self, initial_value: HeaderValue) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn with_snap_threshold(mut self, snap_threshold: f32) -> Self {
        self.snap_threshold = snap_threshold;
        self
    }

    pub fn with_animation_spec(mut self, animation_spec: AnimationSpec) -> Self {
        self.animation_spec = animation_spec;
        self
    }

    pub fn with_decay(mut self, decay: DecaySpec) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&CollapsingHeaderState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.heights.is_finite() {
            return Err(ConfigError::InvalidHeights {
                collapsed: self.heights.collapsed,
                expanded: self.heights.expanded,
            });
        }
        let t = self.snap_threshold;
        if !(t > 0.0 && t < 1.0) {
            return Err(ConfigError::InvalidSnapThreshold { threshold: t });
        }
        self.animation_spec.validate()?;
        self.decay.validate()
    }
}

impl fmt::Debug for HeaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderOptions")
            .field("heights", &self.heights)
            .field("initial_value", &self.initial_value)
            .field("snap_threshold", &self.snap_threshold)
            .field("animation_spec", &self.animation_spec)
            .field("decay", &self.decay)
            .finish_non_exhaustive()
    }
}

/// A header that collapses from `expanded` to `collapsed` height as its body scrolls.
///
/// The live offset is the header's current height. Derived values are computed on every read:
/// - `translation = expanded - offset`
/// - `progress = translation / (expanded - collapsed)`, 0 when expanded and 1 when collapsed.
///
/// When both heights are equal `progress` is NaN. NaN fails every comparison, so the snap rules
/// in [`on_post_fling`](NestedScrollConnection::on_post_fling) never fire for such a header.
pub struct CollapsingHeaderState {
    drag: AnchoredDragController<HeaderValue>,
    heights: HeaderHeights,
    snap_threshold: f32,
    animation_spec: AnimationSpec,
    decay: DecaySpec,
    on_change: Option<HeaderChangeCallback>,
    batch: NotifyBatch,
}

impl CollapsingHeaderState {
    /// # Panics
    ///
    /// Panics when the options are invalid (see [`HeaderOptions::validate`]).
    pub fn new(options: HeaderOptions) -> Self {
        match Self::try_new(options) {
            Ok(state) => state,
            Err(err) => panic!("CollapsingHeaderState::new: {err}"),
        }
    }

    pub fn try_new(options: HeaderOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let drag =
            AnchoredDragController::try_new(options.heights.anchors(), options.initial_value)?;
        gdebug!(
            collapsed = options.heights.collapsed,
            expanded = options.heights.expanded,
            snap_threshold = options.snap_threshold,
            "CollapsingHeaderState::new"
        );
        Ok(Self {
            drag,
            heights: options.heights,
            snap_threshold: options.snap_threshold,
            animation_spec: options.animation_spec,
            decay: options.decay,
            on_change: options.on_change,
            batch: NotifyBatch::default(),
        })
    }

    /// Rebuilds a header from saved state.
    ///
    /// `options` supplies what is not persisted (collapsed height, motion, callback); its
    /// expanded height, threshold and initial value are replaced by the saved ones. The header
    /// starts collapsed when the saved progress exceeds 0.5.
    pub fn restore(saved: &HeaderSavedState, options: HeaderOptions) -> Result<Self, ConfigError> {
        if saved.version != HEADER_STATE_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                version: saved.version,
                expected: HEADER_STATE_VERSION,
            });
        }
        let initial_value = if saved.progress > 0.5 {
            HeaderValue::Collapsed
        } else {
            HeaderValue::Expanded
        };
        let mut options = options
            .with_snap_threshold(saved.snap_threshold)
            .with_initial_value(initial_value);
        options.heights.expanded = saved.expanded_height;
        Self::try_new(options)
    }

    pub fn save(&self) -> HeaderSavedState {
        HeaderSavedState {
            version: HEADER_STATE_VERSION,
            expanded_height: self.heights.expanded,
            progress: self.progress(),
            snap_threshold: self.snap_threshold,
        }
    }

    fn notify(&self) {
        if !self.batch.request() {
            return;
        }
        if let Some(cb) = &self.on_change {
            cb(self);
        }
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch.enter();
        f(self);
        if self.batch.exit() {
            if let Some(cb) = &self.on_change {
                cb(self);
            }
        }
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&CollapsingHeaderState) + Send + Sync + 'static>,
    ) {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn heights(&self) -> HeaderHeights {
        self.heights
    }

    pub fn collapsed_height(&self) -> f32 {
        self.heights.collapsed
    }

    pub fn expanded_height(&self) -> f32 {
        self.heights.expanded
    }

    pub fn set_collapsed_height(&mut self, collapsed: f32) {
        self.set_heights(HeaderHeights::new(collapsed, self.heights.expanded));
    }

    pub fn set_expanded_height(&mut self, expanded: f32) {
        self.set_heights(HeaderHeights::new(self.heights.collapsed, expanded));
    }

    /// Replaces both heights and re-clamps the offset.
    ///
    /// Writing the current heights is a no-op. NaN or infinite heights are ignored.
    pub fn set_heights(&mut self, heights: HeaderHeights) {
        if heights == self.heights {
            return;
        }
        if !heights.is_finite() {
            gwarn!(
                collapsed = heights.collapsed,
                expanded = heights.expanded,
                "set_heights: ignoring non-finite heights"
            );
            return;
        }
        gtrace!(
            collapsed = heights.collapsed,
            expanded = heights.expanded,
            "CollapsingHeaderState::set_heights"
        );
        self.heights = heights;
        self.drag.update_anchors(heights.anchors());
        self.notify();
    }

    pub fn snap_threshold(&self) -> f32 {
        self.snap_threshold
    }

    pub fn animation_spec(&self) -> AnimationSpec {
        self.animation_spec
    }

    pub fn decay(&self) -> DecaySpec {
        self.decay
    }

    /// Current header height.
    pub fn offset(&self) -> f32 {
        self.drag.offset()
    }

    pub fn translation(&self) -> f32 {
        self.heights.expanded - self.drag.offset()
    }

    pub fn progress(&self) -> f32 {
        self.translation() / self.heights.range()
    }

    pub fn current_value(&self) -> HeaderValue {
        self.drag.current_value()
    }

    pub fn target_value(&self) -> HeaderValue {
        self.drag.target_value()
    }

    pub fn is_settling(&self) -> bool {
        self.drag.is_settling()
    }

    pub fn controller(&self) -> &AnchoredDragController<HeaderValue> {
        &self.drag
    }

    /// Moves the header by `delta` (positive expands). See
    /// [`AnchoredDragController::dispatch_raw_delta`].
    pub fn dispatch_raw_delta(&mut self, delta: f32) -> f32 {
        let consumed = self.drag.dispatch_raw_delta(delta);
        if consumed != 0.0 {
            self.notify();
        }
        consumed
    }

    pub fn snap_to(&mut self, value: HeaderValue) -> AnimationHandle {
        let handle = self.drag.snap_to(value);
        self.notify();
        handle
    }

    pub fn animate_to(&mut self, value: HeaderValue, now_ms: u64) -> AnimationHandle {
        let handle = self.drag.animate_to(value, 0.0, self.animation_spec, now_ms);
        self.notify();
        handle
    }

    /// Flings toward `value` with `velocity`, decaying when the decay can reach the anchor.
    pub fn animate_to_with_velocity(
        &mut self,
        value: HeaderValue,
        velocity: f32,
        now_ms: u64,
    ) -> AnimationHandle {
        let handle = self.drag.animate_to_with_decay(
            value,
            velocity,
            self.decay,
            self.animation_spec,
            now_ms,
        );
        self.notify();
        handle
    }

    /// Advances a running animation. Returns the new height, or `None` when idle.
    pub fn tick(&mut self, now_ms: u64) -> Option<f32> {
        let offset = self.drag.tick(now_ms)?;
        self.notify();
        Some(offset)
    }

    pub fn cancel_animation(&mut self) {
        self.drag.cancel_animation();
    }
}

impl NestedScrollConnection for CollapsingHeaderState {
    /// Collapses the header by any upward scroll before the body sees it.
    ///
    /// Reports nothing consumed, so the body scrolls by the full delta as well.
    fn on_pre_scroll(&mut self, available: Offset, _source: NestedScrollSource) -> Offset {
        let delta = Orientation::Vertical.main(available);
        if delta < 0.0 {
            self.dispatch_raw_delta(delta);
        }
        Offset::ZERO
    }

    /// Feeds whatever the body left over (either direction) into the header, which lets it
    /// re-expand once the body is scrolled to its top.
    fn on_post_scroll(
        &mut self,
        _consumed: Offset,
        available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        let delta = Orientation::Vertical.main(available);
        if delta != 0.0 {
            self.dispatch_raw_delta(delta);
        }
        Offset::ZERO
    }

    fn on_post_fling(
        &mut self,
        consumed: Velocity,
        available: Velocity,
        now_ms: u64,
    ) -> PostFling {
        let velocity = Orientation::Vertical.main(available);
        let consumed_velocity = Orientation::Vertical.main(consumed);

        let fling_target = match self.current_value() {
            HeaderValue::Collapsed if velocity > 0.0 => Some(HeaderValue::Expanded),
            HeaderValue::Expanded if velocity < 0.0 => Some(HeaderValue::Collapsed),
            _ => None,
        };
        if let Some(target) = fling_target {
            gtrace!(velocity, state = ?target, "header fling-through");
            let handle = self.animate_to_with_velocity(target, velocity, now_ms);
            return PostFling {
                consumed: available,
                animation: Some(handle),
            };
        }

        if consumed_velocity == 0.0 && velocity == 0.0 {
            let progress = self.progress();
            let snap_target = if progress < self.snap_threshold {
                Some(HeaderValue::Expanded)
            } else if progress > 1.0 - self.snap_threshold {
                Some(HeaderValue::Collapsed)
            } else {
                None
            };
            if let Some(target) = snap_target {
                gtrace!(progress, state = ?target, "header snap");
                let handle = self.animate_to(target, now_ms);
                return PostFling {
                    consumed: Velocity::ZERO,
                    animation: Some(handle),
                };
            }
        }

        PostFling::ignored()
    }
}

impl fmt::Debug for CollapsingHeaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollapsingHeaderState")
            .field("heights", &self.heights)
            .field("offset", &self.drag.offset())
            .field("current_value", &self.drag.current_value())
            .field("snap_threshold", &self.snap_threshold)
            .field("settling", &self.drag.is_settling())
            .finish_non_exhaustive()
    }
}
