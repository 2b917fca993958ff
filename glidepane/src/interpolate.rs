//! Interpolation of layout properties, typically driven by a header's `progress`.
//!
//! Fractions are not clamped: spring overshoot passes straight through to the interpolated
//! value. Use [`fraction_between`] to map a sub-range of progress onto `[0, 1]`.

use crate::{Offset, Size, Velocity};

/// Linear interpolation between two values of the same type.
pub trait Interpolate: Sized {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self;
}

pub fn lerp<T: Interpolate>(start: T, stop: T, fraction: f32) -> T {
    start.lerp(&stop, fraction)
}

/// Maps `value` in `[start, end]` onto `[0, 1]`, clamped.
///
/// `fraction_between(progress, 0.6, 1.0)` is 0 until 60% collapsed, then ramps to 1.
/// NaN in, NaN out.
pub fn fraction_between(value: f32, start: f32, end: f32) -> f32 {
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

impl Interpolate for f32 {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self {
        self + (stop - self) * fraction
    }
}

impl Interpolate for Offset {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self {
        Offset::new(self.x.lerp(&stop.x, fraction), self.y.lerp(&stop.y, fraction))
    }
}

impl Interpolate for Size {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self {
        Size::new(
            self.width.lerp(&stop.width, fraction),
            self.height.lerp(&stop.height, fraction),
        )
    }
}

impl Interpolate for Velocity {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self {
        Velocity::new(self.x.lerp(&stop.x, fraction), self.y.lerp(&stop.y, fraction))
    }
}

/// Alignment expressed as a bias in `[-1, 1]` per axis (-1 start, 0 center, 1 end).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiasAlignment {
    pub horizontal: f32,
    pub vertical: f32,
}

impl BiasAlignment {
    pub const TOP_START: Self = Self::new(-1.0, -1.0);
    pub const TOP_CENTER: Self = Self::new(0.0, -1.0);
    pub const CENTER_START: Self = Self::new(-1.0, 0.0);
    pub const CENTER: Self = Self::new(0.0, 0.0);
    pub const BOTTOM_START: Self = Self::new(-1.0, 1.0);
    pub const BOTTOM_CENTER: Self = Self::new(0.0, 1.0);

    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Position of a `content` box inside `space`.
    pub fn align(&self, content: Size, space: Size) -> Offset {
        let cx = (space.width - content.width) / 2.0;
        let cy = (space.height - content.height) / 2.0;
        Offset::new(cx * (1.0 + self.horizontal), cy * (1.0 + self.vertical))
    }
}

impl Interpolate for BiasAlignment {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self {
        Self::new(
            self.horizontal.lerp(&stop.horizontal, fraction),
            self.vertical.lerp(&stop.vertical, fraction),
        )
    }
}

/// Per-axis content scale.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleFactor {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl ScaleFactor {
    pub const IDENTITY: Self = Self::uniform(1.0);

    pub const fn new(scale_x: f32, scale_y: f32) -> Self {
        Self { scale_x, scale_y }
    }

    pub const fn uniform(scale: f32) -> Self {
        Self::new(scale, scale)
    }

    pub fn apply(&self, size: Size) -> Size {
        Size::new(size.width * self.scale_x, size.height * self.scale_y)
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Interpolate for ScaleFactor {
    fn lerp(&self, stop: &Self, fraction: f32) -> Self {
        Self::new(
            self.scale_x.lerp(&stop.scale_x, fraction),
            self.scale_y.lerp(&stop.scale_y, fraction),
        )
    }
}
