//! Headless state machines for collapsing headers, anchored drags and split panes.
//!
//! For adapter-level workflows (frame-driven header controller, divider drag sessions), see the
//! `glidepane-adapter` crate.
//!
//! This crate holds no UI objects. A UI layer is expected to provide:
//! - measured sizes (header heights, container extent)
//! - scroll deltas and fling velocities from its gesture/scroll machinery
//! - a frame clock (`now_ms`) to advance animations
//!
//! and reads back offsets, `progress`/`translation` and pane sizes to place content.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod anchored;
mod anchors;
mod error;
mod header;
pub mod interpolate;
mod motion;
mod mutator;
mod nested;
mod notify;
mod split;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use anchored::{AnchorState, AnchoredDragController};
pub use anchors::AnchorSet;
pub use error::ConfigError;
pub use header::{
    CollapsingHeaderState, HeaderChangeCallback, HeaderHeights, HeaderOptions, HeaderValue,
};
pub use interpolate::{BiasAlignment, Interpolate, ScaleFactor, fraction_between, lerp};
pub use motion::{AnimationSpec, DecaySpec, Easing, SpringSpec, Tween, TweenSpec};
pub use mutator::{AnimationHandle, AnimationStatus, Mutator};
pub use nested::{NestedScrollConnection, NestedScrollSource, PostFling};
pub use split::{SplitChangeCallback, SplitLayoutState, SplitOptions};
pub use state::{HEADER_STATE_VERSION, HeaderSavedState, SPLIT_STATE_VERSION, SplitSavedState};
pub use types::{Axial, Offset, Orientation, Size, Velocity};
