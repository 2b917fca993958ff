use glidepane::SplitLayoutState;

/// Tracks one drag gesture on a split separator.
///
/// Once a delta is rejected (a pane hit its minimum size or nothing could absorb the change),
/// further deltas in the same direction are dropped until the pointer reverses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeparatorDrag {
    index: Option<usize>,
    /// Direction of the last rejected delta (`true` = positive).
    blocked: Option<bool>,
}

impl SeparatorDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging the separator after pane `index`. Any previous session is dropped.
    pub fn begin(&mut self, index: usize) {
        adebug!(index, "separator drag begin");
        self.index = Some(index);
        self.blocked = None;
    }

    /// The separator being dragged, if any.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_active(&self) -> bool {
        self.index.is_some()
    }

    /// Whether the drag is pinned against a wall.
    pub fn is_blocked(&self) -> bool {
        self.blocked.is_some()
    }

    /// Applies a pointer delta along the split axis.
    ///
    /// Returns `true` when the layout changed.
    pub fn drag(&mut self, split: &mut SplitLayoutState, delta: f32) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        if delta == 0.0 || delta.is_nan() {
            return false;
        }
        let positive = delta > 0.0;
        if self.blocked == Some(positive) {
            return false;
        }
        if split.drag_by(index, delta) {
            self.blocked = None;
            return true;
        }
        atrace!(index, delta, "separator hit wall");
        self.blocked = Some(positive);
        false
    }

    pub fn end(&mut self) {
        adebug!(index = ?self.index, "separator drag end");
        *self = Self::default();
    }
}
