use core::fmt;

use crate::motion::Curve;
use crate::{
    AnchorSet, AnimationHandle, AnimationSpec, AnimationStatus, ConfigError, DecaySpec, Mutator,
};

/// Trait alias for types usable as anchor names.
pub trait AnchorState: Copy + PartialEq + fmt::Debug {}
impl<T: Copy + PartialEq + fmt::Debug> AnchorState for T {}

#[derive(Clone, Debug)]
struct ActiveAnimation<S> {
    handle: AnimationHandle,
    target: S,
    curve: Curve,
    /// Used when the curve has to be re-aimed and cannot be retargeted in kind.
    fallback: AnimationSpec,
}

/// A scalar offset constrained between named anchors.
///
/// The controller is headless: adapters push deltas in, start animations, and call
/// [`AnchoredDragController::tick`] once per frame while [`AnchoredDragController::is_settling`].
///
/// The offset is clamped into the anchor range after every update, animation frames included.
#[derive(Debug)]
pub struct AnchoredDragController<S> {
    anchors: AnchorSet<S>,
    offset: f32,
    current_value: S,
    animation: Option<ActiveAnimation<S>>,
    mutator: Mutator,
    last_frame_ms: Option<u64>,
    last_velocity: f32,
}

impl<S: AnchorState> AnchoredDragController<S> {
    /// Creates a controller resting on `initial`.
    ///
    /// # Panics
    ///
    /// Panics when `anchors` is empty, holds a non-finite position, or has no entry for
    /// `initial`.
    pub fn new(anchors: AnchorSet<S>, initial: S) -> Self {
        match Self::try_new(anchors, initial) {
            Ok(c) => c,
            Err(err) => panic!("AnchoredDragController::new: {err}"),
        }
    }

    pub fn try_new(anchors: AnchorSet<S>, initial: S) -> Result<Self, ConfigError> {
        if anchors.is_empty() {
            return Err(ConfigError::EmptyAnchors);
        }
        if let Some(position) = anchors.non_finite_position() {
            return Err(ConfigError::InvalidAnchorPosition { position });
        }
        let Some(offset) = anchors.position(initial) else {
            return Err(ConfigError::UnknownInitialState);
        };
        gdebug!(anchors = anchors.len(), offset, "AnchoredDragController::new");
        Ok(Self {
            anchors,
            offset,
            current_value: initial,
            animation: None,
            mutator: Mutator::new(),
            last_frame_ms: None,
            last_velocity: 0.0,
        })
    }

    pub fn anchors(&self) -> &AnchorSet<S> {
        &self.anchors
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The anchor the offset last rested on.
    pub fn current_value(&self) -> S {
        self.current_value
    }

    /// The animation target while settling, otherwise the anchor closest to the offset.
    pub fn target_value(&self) -> S {
        if let Some(anim) = &self.animation {
            return anim.target;
        }
        self.anchors.closest(self.offset).unwrap_or(self.current_value)
    }

    pub fn is_settling(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether a mutation currently holds the single-writer lock.
    pub fn is_locked(&self) -> bool {
        self.mutator.is_locked()
    }

    /// Velocity sampled on the most recent animation frame (0 when idle).
    pub fn last_velocity(&self) -> f32 {
        self.last_velocity
    }

    fn set_offset(&mut self, value: f32) {
        self.offset = self.anchors.clamp(value);
        if let Some(state) = self.anchors.state_at(self.offset) {
            self.current_value = state;
        }
    }

    /// Moves the offset by `delta` without animation and without taking the lock.
    ///
    /// Always reports the full delta as consumed. Calling this while an animation runs
    /// interleaves with it: the next [`tick`](Self::tick) overwrites the offset.
    pub fn dispatch_raw_delta(&mut self, delta: f32) -> f32 {
        if delta == 0.0 {
            return 0.0;
        }
        self.set_offset(self.offset + delta);
        gtrace!(delta, offset = self.offset, "dispatch_raw_delta");
        delta
    }

    /// Like [`dispatch_raw_delta`](Self::dispatch_raw_delta), but fails fast with `None` while
    /// another mutation holds the lock.
    pub fn try_drag(&mut self, delta: f32) -> Option<f32> {
        let handle = self.mutator.try_lock()?;
        let consumed = self.dispatch_raw_delta(delta);
        self.mutator.unlock(&handle, AnimationStatus::Settled);
        Some(consumed)
    }

    /// Jumps to `target`, cancelling any running animation.
    ///
    /// The returned handle is already settled (or cancelled if `target` has no anchor).
    pub fn snap_to(&mut self, target: S) -> AnimationHandle {
        let handle = self.mutator.lock_preempting();
        self.animation = None;
        self.last_velocity = 0.0;
        let Some(position) = self.anchors.position(target) else {
            gwarn!(state = ?target, "snap_to: no anchor for target");
            self.mutator.unlock(&handle, AnimationStatus::Cancelled);
            return handle;
        };
        self.offset = position;
        self.current_value = target;
        self.mutator.unlock(&handle, AnimationStatus::Settled);
        handle
    }

    /// Starts animating toward `target` with `spec`, cancelling any running animation.
    pub fn animate_to(
        &mut self,
        target: S,
        velocity: f32,
        spec: AnimationSpec,
        now_ms: u64,
    ) -> AnimationHandle {
        let handle = self.mutator.lock_preempting();
        self.animation = None;
        let Some(to) = self.anchors.position(target) else {
            gwarn!(state = ?target, "animate_to: no anchor for target");
            self.mutator.unlock(&handle, AnimationStatus::Cancelled);
            return handle;
        };
        let curve = Curve::start(spec, self.offset, to, velocity, now_ms);
        self.begin(handle, target, curve, spec, now_ms)
    }

    /// Starts a fling toward `target`.
    ///
    /// If the decay projected from the current offset and `velocity` reaches `target`, the
    /// decay drives the motion and stops on the anchor. Otherwise `spec` takes over, starting
    /// with `velocity`.
    pub fn animate_to_with_decay(
        &mut self,
        target: S,
        velocity: f32,
        decay: DecaySpec,
        spec: AnimationSpec,
        now_ms: u64,
    ) -> AnimationHandle {
        let handle = self.mutator.lock_preempting();
        self.animation = None;
        let Some(to) = self.anchors.position(target) else {
            gwarn!(state = ?target, "animate_to_with_decay: no anchor for target");
            self.mutator.unlock(&handle, AnimationStatus::Cancelled);
            return handle;
        };

        let from = self.offset;
        let toward = (to - from) * velocity > 0.0;
        let projected = decay.target(from, velocity);
        let reaches = toward
            && if velocity > 0.0 {
                projected >= to
            } else {
                projected <= to
            };

        let curve = if reaches {
            Curve::decay(decay, from, to, velocity, now_ms)
        } else {
            Curve::start(spec, from, to, velocity, now_ms)
        };
        gtrace!(from, to, velocity, projected, decay = reaches, "animate_to_with_decay");
        self.begin(handle, target, curve, spec, now_ms)
    }

    fn begin(
        &mut self,
        handle: AnimationHandle,
        target: S,
        curve: Curve,
        fallback: AnimationSpec,
        now_ms: u64,
    ) -> AnimationHandle {
        self.animation = Some(ActiveAnimation {
            handle: handle.clone(),
            target,
            curve,
            fallback,
        });
        self.last_frame_ms = Some(now_ms);
        handle
    }

    /// Advances the running animation to `now_ms`.
    ///
    /// Returns the new offset, or `None` when nothing is animating.
    pub fn tick(&mut self, now_ms: u64) -> Option<f32> {
        let anim = self.animation.as_ref()?;
        let sample = anim.curve.sample(now_ms);
        self.last_frame_ms = Some(now_ms);

        if !sample.done {
            self.last_velocity = sample.velocity;
            self.set_offset(sample.value);
            return Some(self.offset);
        }

        let anim = self.animation.take()?;
        self.last_velocity = 0.0;
        match self.anchors.position(anim.target) {
            Some(position) => {
                self.offset = position;
                self.current_value = anim.target;
            }
            None => self.set_offset(sample.value),
        }
        self.mutator.unlock(&anim.handle, AnimationStatus::Settled);
        gdebug!(state = ?anim.target, offset = self.offset, "animation settled");
        Some(self.offset)
    }

    pub fn cancel_animation(&mut self) {
        if self.animation.take().is_some() {
            gtrace!(offset = self.offset, "animation cancelled");
        }
        self.mutator.cancel();
        self.last_velocity = 0.0;
    }

    /// Replaces the anchor set.
    ///
    /// - Identical anchors are a no-op.
    /// - When resting exactly on the current anchor, the offset follows it to its new position.
    /// - A running animation is re-aimed at its target's new position; it is cancelled if the
    ///   target disappeared.
    /// - If the current anchor disappeared, the closest remaining anchor becomes current.
    ///
    /// An empty set, or one with a NaN or infinite position, is ignored.
    pub fn update_anchors(&mut self, anchors: AnchorSet<S>) {
        if anchors == self.anchors {
            return;
        }
        if anchors.is_empty() {
            gwarn!("update_anchors: ignoring empty anchor set");
            return;
        }
        if anchors.non_finite_position().is_some() {
            gwarn!(anchors = ?anchors, "update_anchors: ignoring non-finite anchor");
            return;
        }

        let was_resting = self.anchors.position(self.current_value) == Some(self.offset);
        self.anchors = anchors;
        if !self.anchors.contains(self.current_value) {
            if let Some(state) = self.anchors.closest(self.offset) {
                self.current_value = state;
            }
        }

        if let Some(mut anim) = self.animation.take() {
            match self.anchors.position(anim.target) {
                Some(to) => {
                    let now_ms = self.last_frame_ms.unwrap_or(0);
                    anim.curve = anim.curve.retarget(now_ms, to, anim.fallback);
                    self.animation = Some(anim);
                }
                None => {
                    self.mutator.cancel();
                    self.last_velocity = 0.0;
                }
            }
            self.set_offset(self.offset);
            return;
        }

        if was_resting {
            if let Some(position) = self.anchors.position(self.current_value) {
                self.offset = position;
                return;
            }
        }
        self.set_offset(self.offset);
    }
}
