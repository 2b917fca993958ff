use core::cell::Cell;

/// Coalesces change notifications issued inside `batch_update` scopes.
#[derive(Debug, Default)]
pub(crate) struct NotifyBatch {
    depth: Cell<usize>,
    pending: Cell<bool>,
}

impl NotifyBatch {
    /// Returns `true` when the notification should fire immediately.
    pub(crate) fn request(&self) -> bool {
        if self.depth.get() > 0 {
            self.pending.set(true);
            return false;
        }
        true
    }

    pub(crate) fn enter(&self) {
        let depth = self.depth.get();
        self.depth.set(depth.saturating_add(1));
    }

    /// Leaves a batch scope. Returns `true` when the outermost scope closed with a pending
    /// notification.
    pub(crate) fn exit(&self) -> bool {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "notify depth underflow");
        let next = depth.saturating_sub(1);
        self.depth.set(next);
        next == 0 && self.pending.replace(false)
    }
}
