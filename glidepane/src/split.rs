use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::notify::NotifyBatch;
use crate::state::SPLIT_STATE_VERSION;
use crate::{ConfigError, Orientation, Size, SplitSavedState};

/// A callback fired after the split layout changes.
pub type SplitChangeCallback = Arc<dyn Fn(&SplitLayoutState) + Send + Sync>;

/// Configuration for [`SplitLayoutState`].
#[derive(Clone)]
pub struct SplitOptions {
    /// Number of panes the layout keeps weights for.
    pub max_count: usize,
    /// Number of leading panes that are laid out; the rest keep their weight while hidden.
    pub visible_count: usize,
    pub orientation: Orientation,
    /// No pane may be rendered smaller than this along the split axis.
    pub min_size: f32,
    /// Extent of the container along the split axis.
    pub size: f32,
    pub on_change: Option<SplitChangeCallback>,
}

impl SplitOptions {
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count,
            visible_count: max_count,
            orientation: Orientation::Horizontal,
            min_size: 0.0,
            size: 0.0,
            on_change: None,
        }
    }

    pub fn with_visible_count(mut self, visible_count: usize) -> Self {
        self.visible_count = visible_count;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&SplitLayoutState) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == 0 {
            return Err(ConfigError::InvalidPaneCount {
                max_count: self.max_count,
            });
        }
        if self.visible_count == 0 || self.visible_count > self.max_count {
            return Err(ConfigError::InvalidVisibleCount {
                visible_count: self.visible_count,
                max_count: self.max_count,
            });
        }
        if !is_extent(self.min_size) {
            return Err(ConfigError::InvalidMinSize {
                min_size: self.min_size,
            });
        }
        if !is_extent(self.size) {
            return Err(ConfigError::InvalidSize { size: self.size });
        }
        Ok(())
    }
}

fn is_extent(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

impl fmt::Debug for SplitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitOptions")
            .field("max_count", &self.max_count)
            .field("visible_count", &self.visible_count)
            .field("orientation", &self.orientation)
            .field("min_size", &self.min_size)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Weight distribution over the panes of a split container.
///
/// Every pane starts with weight `1 / max_count`. A pane's rendered share is its weight over
/// the sum of the *visible* weights. Weights only change through
/// [`set_weight_at`](Self::set_weight_at) (and [`drag_by`](Self::drag_by)), which moves weight
/// between exactly two panes, so the total over all `max_count` panes never changes.
pub struct SplitLayoutState {
    orientation: Orientation,
    weights: Vec<f32>,
    visible_count: usize,
    min_size: f32,
    size: f32,
    on_change: Option<SplitChangeCallback>,
    batch: NotifyBatch,
}

impl SplitLayoutState {
    /// # Panics
    ///
    /// Panics when the options are invalid (see [`SplitOptions::validate`]).
    pub fn new(options: SplitOptions) -> Self {
        match Self::try_new(options) {
            Ok(state) => state,
            Err(err) => panic!("SplitLayoutState::new: {err}"),
        }
    }

    pub fn try_new(options: SplitOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let weight = 1.0 / options.max_count as f32;
        gdebug!(
            max_count = options.max_count,
            visible_count = options.visible_count,
            min_size = options.min_size,
            "SplitLayoutState::new"
        );
        Ok(Self {
            orientation: options.orientation,
            weights: alloc::vec![weight; options.max_count],
            visible_count: options.visible_count,
            min_size: options.min_size,
            size: options.size,
            on_change: options.on_change,
            batch: NotifyBatch::default(),
        })
    }

    /// Rebuilds a layout from saved weights.
    ///
    /// `options` supplies orientation, minimum size, extent and callback; its counts are
    /// replaced by the saved ones.
    pub fn restore(saved: &SplitSavedState, options: SplitOptions) -> Result<Self, ConfigError> {
        if saved.version != SPLIT_STATE_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                version: saved.version,
                expected: SPLIT_STATE_VERSION,
            });
        }
        let max_count = saved.weights.len();
        let valid = saved.weights.iter().all(|w| w.is_finite() && *w > 0.0);
        if !valid {
            return Err(ConfigError::InvalidWeights {
                len: max_count,
                max_count,
            });
        }
        let options = SplitOptions {
            max_count,
            visible_count: saved.visible_count,
            ..options
        };
        let mut state = Self::try_new(options)?;
        state.weights.copy_from_slice(&saved.weights);
        Ok(state)
    }

    pub fn save(&self) -> SplitSavedState {
        SplitSavedState {
            version: SPLIT_STATE_VERSION,
            weights: self.weights.clone(),
            visible_count: self.visible_count,
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
        on_change: Option<impl Fn(&SplitLayoutState) + Send + Sync + 'static>,
    ) {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn max_count(&self) -> usize {
        self.weights.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Shows the first `visible_count` panes (clamped to `1..=max_count`).
    pub fn set_visible_count(&mut self, visible_count: usize) {
        let clamped = visible_count.clamp(1, self.weights.len());
        if clamped != visible_count {
            gwarn!(visible_count, clamped, "set_visible_count: clamped");
        }
        if clamped == self.visible_count {
            return;
        }
        self.visible_count = clamped;
        self.notify();
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    /// Ignored unless finite and non-negative.
    pub fn set_min_size(&mut self, min_size: f32) {
        if !is_extent(min_size) {
            gwarn!(min_size, "set_min_size: ignoring invalid size");
            return;
        }
        if min_size == self.min_size {
            return;
        }
        self.min_size = min_size;
        self.notify();
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Ignored unless finite and non-negative.
    pub fn set_size(&mut self, size: f32) {
        if !is_extent(size) {
            gwarn!(size, "set_size: ignoring invalid size");
            return;
        }
        if size == self.size {
            return;
        }
        self.size = size;
        self.notify();
    }

    /// Updates the extent from a measured container size, projected onto the split axis.
    pub fn set_layout_size(&mut self, size: Size) {
        self.set_size(self.orientation.main(size));
    }

    /// Stored weights of all `max_count` panes, hidden ones included.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Sum of the weights of the visible panes.
    pub fn weight_sum(&self) -> f32 {
        self.weights[..self.visible_count].iter().sum()
    }

    /// Rendered share of pane `index` among the visible panes.
    ///
    /// # Panics
    ///
    /// Panics when `index >= visible_count`.
    pub fn weight_at(&self, index: usize) -> f32 {
        assert!(
            index < self.visible_count,
            "weight_at: index {index} out of visible range {}",
            self.visible_count
        );
        self.weights[index] / self.weight_sum()
    }

    /// Rendered extent of pane `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= visible_count`.
    pub fn pane_size(&self, index: usize) -> f32 {
        self.weight_at(index) * self.size
    }

    /// Trailing edge of visible pane `index`, for every visible pane but the last.
    pub fn separator_offset(&self, index: usize) -> Option<f32> {
        if index + 1 >= self.visible_count {
            return None;
        }
        let mut offset = 0.0;
        for i in 0..=index {
            offset += self.pane_size(i);
        }
        Some(offset)
    }

    /// Calls `f(index, offset)` for each separator in order.
    pub fn for_each_separator(&self, mut f: impl FnMut(usize, f32)) {
        let mut offset = 0.0;
        for i in 0..self.visible_count.saturating_sub(1) {
            offset += self.pane_size(i);
            f(i, offset);
        }
    }

    /// Sets pane `index` to `weight` (relative to [`weight_sum`](Self::weight_sum)), moving the
    /// difference onto exactly one other pane.
    ///
    /// Candidates are tried from `index + 1` onward, wrapping around, hidden panes included. The
    /// first one whose weight stays positive and under which every visible pane keeps at least
    /// `min_size` takes the whole difference.
    ///
    /// Returns `false` without touching any weight when `index` is not visible, `weight` is not
    /// in `(0, weight_sum]`, the pane would end up below `min_size`, or no candidate fits.
    pub fn set_weight_at(&mut self, index: usize, weight: f32) -> bool {
        if index >= self.visible_count {
            gwarn!(index, visible_count = self.visible_count, "set_weight_at: index not visible");
            return false;
        }
        let sum = self.weight_sum();
        if !(weight > 0.0) || weight > sum {
            return false;
        }
        if weight / sum * self.size < self.min_size {
            return false;
        }

        let delta = weight - self.weights[index];
        let count = self.weights.len();
        for step in 1..count {
            let candidate = (index + step) % count;
            let absorbed = self.weights[candidate] - delta;
            if !(absorbed > 0.0) {
                continue;
            }
            if self.fits(index, weight, candidate, absorbed) {
                self.weights[index] = weight;
                self.weights[candidate] = absorbed;
                gtrace!(index, candidate, weight, absorbed, "set_weight_at");
                self.notify();
                return true;
            }
        }
        gtrace!(index, weight, "set_weight_at: no pane can absorb the change");
        false
    }

    /// Whether every visible pane keeps `min_size` after the tentative two-pane change.
    fn fits(&self, index: usize, weight: f32, candidate: usize, absorbed: f32) -> bool {
        let tentative = |i: usize| {
            if i == index {
                weight
            } else if i == candidate {
                absorbed
            } else {
                self.weights[i]
            }
        };
        let sum: f32 = (0..self.visible_count).map(tentative).sum();
        (0..self.visible_count).all(|i| tentative(i) / sum * self.size >= self.min_size)
    }

    /// Moves the trailing edge of pane `index` by `delta` along the split axis.
    ///
    /// Same failure modes as [`set_weight_at`](Self::set_weight_at); also fails while the
    /// layout has no extent.
    pub fn drag_by(&mut self, index: usize, delta: f32) -> bool {
        if index >= self.visible_count || !(self.size > 0.0) {
            return false;
        }
        let current = self.pane_size(index);
        let target = (current + delta) / self.size * self.weight_sum();
        self.set_weight_at(index, target)
    }
}

impl fmt::Debug for SplitLayoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitLayoutState")
            .field("orientation", &self.orientation)
            .field("weights", &self.weights)
            .field("visible_count", &self.visible_count)
            .field("min_size", &self.min_size)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
