use alloc::rc::Rc;
use core::cell::Cell;

/// Lifecycle of a mutation started through a [`Mutator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationStatus {
    Running,
    /// Reached its target.
    Settled,
    /// Preempted by a newer mutation or cancelled explicitly.
    Cancelled,
}

/// Observes a mutation (snap, animation, drag) started on a controller.
///
/// The handle stays valid after the controller moves on; its status is final once it leaves
/// [`AnimationStatus::Running`].
#[derive(Clone, Debug)]
pub struct AnimationHandle {
    id: u64,
    status: Rc<Cell<AnimationStatus>>,
}

impl AnimationHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            status: Rc::new(Cell::new(AnimationStatus::Running)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn status(&self) -> AnimationStatus {
        self.status.get()
    }

    pub fn is_running(&self) -> bool {
        self.status() == AnimationStatus::Running
    }

    pub fn is_settled(&self) -> bool {
        self.status() == AnimationStatus::Settled
    }

    pub fn is_cancelled(&self) -> bool {
        self.status() == AnimationStatus::Cancelled
    }

    fn finish(&self, status: AnimationStatus) {
        if self.status.get() == AnimationStatus::Running {
            self.status.set(status);
        }
    }
}

/// A single-writer lock scoped to one controller.
///
/// Two acquisition modes:
/// - [`Mutator::try_lock`] fails fast while another mutation holds the lock (continuous drags).
/// - [`Mutator::lock_preempting`] cancels the current holder and takes over (snap/animate).
#[derive(Debug, Default)]
pub struct Mutator {
    next_id: u64,
    holder: Option<AnimationHandle>,
}

impl Mutator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.holder.is_some()
    }

    fn issue(&mut self) -> AnimationHandle {
        self.next_id = self.next_id.wrapping_add(1);
        AnimationHandle::new(self.next_id)
    }

    pub fn try_lock(&mut self) -> Option<AnimationHandle> {
        if self.holder.is_some() {
            return None;
        }
        let handle = self.issue();
        self.holder = Some(handle.clone());
        Some(handle)
    }

    pub fn lock_preempting(&mut self) -> AnimationHandle {
        self.cancel();
        let handle = self.issue();
        self.holder = Some(handle.clone());
        handle
    }

    /// Releases the lock if `handle` still holds it, finishing it with `status`.
    ///
    /// Returns `false` when `handle` was already preempted.
    pub fn unlock(&mut self, handle: &AnimationHandle, status: AnimationStatus) -> bool {
        match &self.holder {
            Some(h) if h.id == handle.id => {
                h.finish(status);
                self.holder = None;
                true
            }
            _ => false,
        }
    }

    /// Cancels the current holder, if any.
    pub fn cancel(&mut self) {
        if let Some(h) = self.holder.take() {
            h.finish(AnimationStatus::Cancelled);
        }
    }
}
