use crate::{AnimationHandle, Offset, Velocity};

/// Where a scroll delta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NestedScrollSource {
    /// A pointer/finger drag.
    Drag,
    /// Inertial scrolling after a drag was released.
    Fling,
    /// Mouse wheel or trackpad.
    Wheel,
}

/// Result of the post-fling phase.
#[derive(Clone, Debug)]
pub struct PostFling {
    /// Velocity claimed by the connection.
    pub consumed: Velocity,
    /// Animation started in response, if any.
    pub animation: Option<AnimationHandle>,
}

impl PostFling {
    pub fn ignored() -> Self {
        Self {
            consumed: Velocity::ZERO,
            animation: None,
        }
    }
}

/// Hooks an outer state object into an inner scrollable's scroll/fling pipeline.
///
/// The inner scrollable calls `on_pre_*` before consuming a delta and `on_post_*` with what it
/// left over. Every method defaults to consuming nothing.
pub trait NestedScrollConnection {
    fn on_pre_scroll(&mut self, _available: Offset, _source: NestedScrollSource) -> Offset {
        Offset::ZERO
    }

    fn on_post_scroll(
        &mut self,
        _consumed: Offset,
        _available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        Offset::ZERO
    }

    fn on_pre_fling(&mut self, _available: Velocity) -> Velocity {
        Velocity::ZERO
    }

    fn on_post_fling(
        &mut self,
        _consumed: Velocity,
        _available: Velocity,
        _now_ms: u64,
    ) -> PostFling {
        PostFling::ignored()
    }
}
