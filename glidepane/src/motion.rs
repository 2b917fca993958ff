use crate::ConfigError;

/// A curve is considered settled once its velocity drops below one visibility threshold per
/// frame at this rate.
const SETTLE_FRAMES_PER_SECOND: f32 = 60.0;

/// A time-based tween between two positions.
///
/// Adapters can use it directly; the anchored controller also drives one for
/// [`AnimationSpec::Tween`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    pub fn sample(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0);
        let eased = self.easing.sample(t);
        self.from + (self.to - self.from) * eased
    }

    /// Approximate velocity in units per second at `now_ms`.
    pub fn velocity(&self, now_ms: u64) -> f32 {
        if self.is_done(now_ms) {
            return 0.0;
        }
        (self.sample(now_ms.saturating_add(1)) - self.sample(now_ms)) * 1000.0
    }

    pub fn retarget(&mut self, now_ms: u64, new_to: f32, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    SmoothStep,
    EaseInOutCubic,
    /// Material "standard" curve: quick start, long settle.
    #[default]
    FastOutSlowIn,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
            Self::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
        }
    }
}

/// Evaluates a CSS-style cubic bezier easing with endpoints (0,0) and (1,1).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let bezier = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * a * inv * inv * s + 3.0 * b * inv * s * s + s * s * s
    };
    // Bisection on x(s) = t; x is monotonic for control points in [0, 1].
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    let mut s = t;
    for _ in 0..24 {
        let x = bezier(x1, x2, s);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier(y1, y2, s)
}

/// Physics spring parameters (unit mass).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringSpec {
    pub stiffness: f32,
    pub damping_ratio: f32,
    /// Distance from the target below which the spring may settle. Must be positive.
    pub visibility_threshold: f32,
}

impl SpringSpec {
    pub const STIFFNESS_HIGH: f32 = 10_000.0;
    pub const STIFFNESS_MEDIUM: f32 = 1_500.0;
    pub const STIFFNESS_MEDIUM_LOW: f32 = 400.0;
    pub const STIFFNESS_LOW: f32 = 200.0;

    pub const DAMPING_NO_BOUNCY: f32 = 1.0;
    pub const DAMPING_LOW_BOUNCY: f32 = 0.75;
    pub const DAMPING_MEDIUM_BOUNCY: f32 = 0.5;
    pub const DAMPING_HIGH_BOUNCY: f32 = 0.2;

    pub fn new(stiffness: f32, damping_ratio: f32) -> Self {
        Self {
            stiffness,
            damping_ratio,
            ..Self::default()
        }
    }

    pub fn with_visibility_threshold(mut self, visibility_threshold: f32) -> Self {
        self.visibility_threshold = visibility_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if positive(self.stiffness)
            && positive(self.damping_ratio)
            && positive(self.visibility_threshold)
        {
            Ok(())
        } else {
            Err(ConfigError::InvalidSpring {
                stiffness: self.stiffness,
                damping_ratio: self.damping_ratio,
                visibility_threshold: self.visibility_threshold,
            })
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            stiffness: Self::STIFFNESS_MEDIUM,
            damping_ratio: Self::DAMPING_NO_BOUNCY,
            visibility_threshold: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TweenSpec {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl TweenSpec {
    pub fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self::new(300, Easing::FastOutSlowIn)
    }
}

/// The curve used to settle onto a target anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationSpec {
    Spring(SpringSpec),
    Tween(TweenSpec),
}

impl AnimationSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Spring(spring) => spring.validate(),
            Self::Tween(_) => Ok(()),
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Spring(SpringSpec::default())
    }
}

/// Exponential velocity decay used for flings: `v(t) = v0 * e^(-friction * t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecaySpec {
    pub friction: f32,
    /// Speed (units per second) below which the decay stops. Must be non-negative.
    pub velocity_threshold: f32,
}

impl DecaySpec {
    pub fn new(friction: f32) -> Self {
        Self {
            friction,
            ..Self::default()
        }
    }

    /// The resting position a decay starting at `from` with `velocity` would reach.
    pub fn target(&self, from: f32, velocity: f32) -> f32 {
        from + velocity / self.friction
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let friction_ok = self.friction.is_finite() && self.friction > 0.0;
        let threshold_ok = self.velocity_threshold.is_finite() && self.velocity_threshold >= 0.0;
        if friction_ok && threshold_ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidDecay {
                friction: self.friction,
                velocity_threshold: self.velocity_threshold,
            })
        }
    }
}

impl Default for DecaySpec {
    fn default() -> Self {
        Self {
            friction: 4.2,
            velocity_threshold: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MotionSample {
    pub value: f32,
    pub velocity: f32,
    pub done: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SpringMotion {
    to: f32,
    displacement: f32,
    velocity: f32,
    spec: SpringSpec,
    start_ms: u64,
}

impl SpringMotion {
    fn sample(&self, now_ms: u64) -> MotionSample {
        let t = now_ms.saturating_sub(self.start_ms) as f32 / 1000.0;
        let w = self.spec.stiffness.sqrt();
        let z = self.spec.damping_ratio;
        let a = self.displacement;
        let v0 = self.velocity;

        let (x, v) = if z < 1.0 {
            let wd = w * (1.0 - z * z).sqrt();
            let b = (v0 + z * w * a) / wd;
            let envelope = (-z * w * t).exp();
            let (s, c) = (wd * t).sin_cos();
            let x = envelope * (a * c + b * s);
            let v = envelope * (-z * w * (a * c + b * s) + wd * (b * c - a * s));
            (x, v)
        } else if z == 1.0 {
            let b = v0 + w * a;
            let envelope = (-w * t).exp();
            (envelope * (a + b * t), envelope * (b - w * (a + b * t)))
        } else {
            let root = (z * z - 1.0).sqrt();
            let r1 = -w * (z - root);
            let r2 = -w * (z + root);
            let c2 = (v0 - r1 * a) / (r2 - r1);
            let c1 = a - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        };

        let threshold = self.spec.visibility_threshold;
        let done = x.abs() <= threshold && v.abs() <= threshold * SETTLE_FRAMES_PER_SECOND;
        MotionSample {
            value: self.to + x,
            velocity: v,
            done,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DecayMotion {
    from: f32,
    velocity: f32,
    stop_at: f32,
    spec: DecaySpec,
    start_ms: u64,
}

impl DecayMotion {
    fn sample(&self, now_ms: u64) -> MotionSample {
        let t = now_ms.saturating_sub(self.start_ms) as f32 / 1000.0;
        let k = self.spec.friction;
        let falloff = (-k * t).exp();
        let value = self.from + self.velocity / k * (1.0 - falloff);
        let velocity = self.velocity * falloff;

        let crossed = if self.velocity >= 0.0 {
            value >= self.stop_at
        } else {
            value <= self.stop_at
        };
        if crossed || velocity.abs() < self.spec.velocity_threshold {
            return MotionSample {
                value: self.stop_at,
                velocity,
                done: true,
            };
        }
        MotionSample {
            value,
            velocity,
            done: false,
        }
    }
}

/// A running motion toward a single target position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Curve {
    Spring(SpringMotion),
    Tween(Tween),
    Decay(DecayMotion),
}

impl Curve {
    pub(crate) fn start(
        spec: AnimationSpec,
        from: f32,
        to: f32,
        velocity: f32,
        now_ms: u64,
    ) -> Self {
        match spec {
            AnimationSpec::Spring(spring) => Self::Spring(SpringMotion {
                to,
                displacement: from - to,
                velocity,
                spec: spring,
                start_ms: now_ms,
            }),
            AnimationSpec::Tween(tween) => Self::Tween(Tween::new(
                from,
                to,
                now_ms,
                tween.duration_ms,
                tween.easing,
            )),
        }
    }

    pub(crate) fn decay(
        decay: DecaySpec,
        from: f32,
        stop_at: f32,
        velocity: f32,
        now_ms: u64,
    ) -> Self {
        Self::Decay(DecayMotion {
            from,
            velocity,
            stop_at,
            spec: decay,
            start_ms: now_ms,
        })
    }

    pub(crate) fn sample(&self, now_ms: u64) -> MotionSample {
        match self {
            Self::Spring(spring) => spring.sample(now_ms),
            Self::Tween(tween) => MotionSample {
                value: tween.sample(now_ms),
                velocity: tween.velocity(now_ms),
                done: tween.is_done(now_ms),
            },
            Self::Decay(decay) => decay.sample(now_ms),
        }
    }

    /// Restarts toward `new_to` from the state sampled at `now_ms`.
    ///
    /// Decay motions fall back to `fallback`, since a decay cannot be aimed.
    pub(crate) fn retarget(&self, now_ms: u64, new_to: f32, fallback: AnimationSpec) -> Self {
        let cur = self.sample(now_ms);
        match self {
            Self::Spring(spring) => Self::Spring(SpringMotion {
                to: new_to,
                displacement: cur.value - new_to,
                velocity: cur.velocity,
                spec: spring.spec,
                start_ms: now_ms,
            }),
            Self::Tween(tween) => {
                let remaining = tween
                    .duration_ms
                    .saturating_sub(now_ms.saturating_sub(tween.start_ms));
                let mut next = *tween;
                next.retarget(now_ms, new_to, remaining);
                Self::Tween(next)
            }
            Self::Decay(_) => Self::start(fallback, cur.value, new_to, cur.velocity, now_ms),
        }
    }
}
