use glidepane::{
    AnimationHandle, CollapsingHeaderState, ConfigError, HeaderHeights, HeaderOptions,
    HeaderSavedState, HeaderValue, Interpolate, NestedScrollConnection, NestedScrollSource,
    Offset, Velocity,
};

/// A snapshot of what an adapter needs to place a collapsing header and its body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderFrame {
    /// Current header height.
    pub height: f32,
    /// How far the header has moved up from fully expanded.
    pub translation: f32,
    /// 0 when expanded, 1 when collapsed. NaN when both heights are equal.
    pub progress: f32,
}

impl HeaderFrame {
    pub fn from_state(state: &CollapsingHeaderState) -> Self {
        Self {
            height: state.offset(),
            translation: state.translation(),
            progress: state.progress(),
        }
    }

    /// Where the body's top edge goes: directly below the header.
    pub fn body_offset(&self) -> f32 {
        self.height
    }

    /// Interpolates a property from its expanded to its collapsed value.
    ///
    /// A header without travel (NaN progress) renders the expanded value.
    pub fn lerp<T: Interpolate>(&self, expanded: T, collapsed: T) -> T {
        let fraction = if self.progress.is_nan() {
            0.0
        } else {
            self.progress
        };
        expanded.lerp(&collapsed, fraction)
    }
}

/// A framework-neutral controller that wraps a [`CollapsingHeaderState`] and bridges it to the
/// scrollable body below it.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_header_measured` after layout
/// - `on_pre_scroll` / `on_post_scroll` around the body's own scroll handling
/// - `on_fling_end` once the body's fling runs out
/// - `tick(now_ms)` each frame while [`is_animating`](Self::is_animating)
#[derive(Debug)]
pub struct HeaderController {
    header: CollapsingHeaderState,
}

impl HeaderController {
    /// # Panics
    ///
    /// Panics when the options are invalid (see [`HeaderOptions::validate`]).
    pub fn new(options: HeaderOptions) -> Self {
        Self {
            header: CollapsingHeaderState::new(options),
        }
    }

    pub fn try_new(options: HeaderOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            header: CollapsingHeaderState::try_new(options)?,
        })
    }

    pub fn from_state(header: CollapsingHeaderState) -> Self {
        Self { header }
    }

    /// Rebuilds a controller from a saved header. See [`CollapsingHeaderState::restore`].
    pub fn restore(saved: &HeaderSavedState, options: HeaderOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            header: CollapsingHeaderState::restore(saved, options)?,
        })
    }

    pub fn save(&self) -> HeaderSavedState {
        self.header.save()
    }

    pub fn state(&self) -> &CollapsingHeaderState {
        &self.header
    }

    pub fn state_mut(&mut self) -> &mut CollapsingHeaderState {
        &mut self.header
    }

    pub fn into_state(self) -> CollapsingHeaderState {
        self.header
    }

    pub fn frame(&self) -> HeaderFrame {
        HeaderFrame::from_state(&self.header)
    }

    pub fn is_animating(&self) -> bool {
        self.header.is_settling()
    }

    pub fn cancel_animation(&mut self) {
        self.header.cancel_animation();
    }

    /// Call this when layout reports the header's collapsed and expanded heights.
    ///
    /// Both are written in one batch, so `on_change` fires at most once.
    pub fn on_header_measured(&mut self, collapsed: f32, expanded: f32) -> HeaderFrame {
        let heights = HeaderHeights::new(collapsed, expanded);
        if heights != self.header.heights() {
            adebug!(collapsed, expanded, "on_header_measured");
            self.header.set_heights(heights);
        }
        self.frame()
    }

    /// Call this with a vertical scroll delta before the body consumes it (negative scrolls the
    /// content up).
    ///
    /// A drag cancels any running header animation: the user has taken over. Returns the part of
    /// `delta_y` left for the body, which is all of it.
    pub fn on_pre_scroll(&mut self, delta_y: f32, source: NestedScrollSource) -> f32 {
        if source == NestedScrollSource::Drag && self.header.is_settling() {
            self.header.cancel_animation();
        }
        let consumed = self
            .header
            .on_pre_scroll(Offset::new(0.0, delta_y), source);
        delta_y - consumed.y
    }

    /// Call this with what the body consumed and what it left of a vertical scroll delta.
    pub fn on_post_scroll(
        &mut self,
        consumed_y: f32,
        available_y: f32,
        source: NestedScrollSource,
    ) {
        self.header.on_post_scroll(
            Offset::new(0.0, consumed_y),
            Offset::new(0.0, available_y),
            source,
        );
    }

    /// Call this when the body's fling ends, with the velocity it consumed and what remains.
    ///
    /// Returns the animation the header started in response, if any; keep calling
    /// [`tick`](Self::tick) until it settles.
    pub fn on_fling_end(
        &mut self,
        consumed_vy: f32,
        available_vy: f32,
        now_ms: u64,
    ) -> Option<AnimationHandle> {
        self.header
            .on_post_fling(
                Velocity::new(0.0, consumed_vy),
                Velocity::new(0.0, available_vy),
                now_ms,
            )
            .animation
    }

    /// Advances a running header animation.
    ///
    /// Returns the new frame, or `None` when nothing is animating.
    pub fn tick(&mut self, now_ms: u64) -> Option<HeaderFrame> {
        self.header.tick(now_ms)?;
        Some(self.frame())
    }

    /// Jumps to `value` without animation and returns the resulting frame.
    pub fn snap_to(&mut self, value: HeaderValue) -> HeaderFrame {
        self.header.snap_to(value);
        self.frame()
    }

    pub fn animate_to(&mut self, value: HeaderValue, now_ms: u64) -> AnimationHandle {
        self.header.animate_to(value, now_ms)
    }
}
