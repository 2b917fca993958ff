use core::fmt;

/// Invalid configuration detected while constructing or restoring a state object.
///
/// These are integration bugs, not runtime conditions: the panicking constructors (`new`)
/// surface them immediately, while `try_new`/`restore` hand them back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// An anchored controller needs at least one anchor.
    EmptyAnchors,
    /// The requested initial state has no anchor.
    UnknownInitialState,
    /// Anchor positions must be finite.
    InvalidAnchorPosition { position: f32 },
    /// Header heights must be finite.
    InvalidHeights { collapsed: f32, expanded: f32 },
    /// `snap_threshold` must lie strictly between 0 and 1.
    InvalidSnapThreshold { threshold: f32 },
    /// A split layout needs at least one pane.
    InvalidPaneCount { max_count: usize },
    /// `visible_count` must be in `1..=max_count`.
    InvalidVisibleCount { visible_count: usize, max_count: usize },
    /// Minimum pane size must be finite and non-negative.
    InvalidMinSize { min_size: f32 },
    /// Container extent must be finite and non-negative.
    InvalidSize { size: f32 },
    /// Saved weights must be positive and match `max_count`.
    InvalidWeights { len: usize, max_count: usize },
    /// Spring stiffness, damping ratio and visibility threshold must be positive.
    InvalidSpring {
        stiffness: f32,
        damping_ratio: f32,
        visibility_threshold: f32,
    },
    /// Decay friction must be positive and its velocity threshold non-negative.
    InvalidDecay { friction: f32, velocity_threshold: f32 },
    /// Saved state was written by an incompatible version.
    UnsupportedVersion { version: u32, expected: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAnchors => write!(f, "anchor set is empty"),
            Self::UnknownInitialState => write!(f, "initial state has no anchor"),
            Self::InvalidAnchorPosition { position } => {
                write!(f, "anchor position {position} is not finite")
            }
            Self::InvalidHeights {
                collapsed,
                expanded,
            } => write!(
                f,
                "header heights must be finite (collapsed={collapsed}, expanded={expanded})"
            ),
            Self::InvalidSnapThreshold { threshold } => {
                write!(f, "snap threshold {threshold} is outside (0, 1)")
            }
            Self::InvalidPaneCount { max_count } => {
                write!(f, "split layout needs at least one pane (max_count={max_count})")
            }
            Self::InvalidVisibleCount {
                visible_count,
                max_count,
            } => write!(
                f,
                "visible count {visible_count} is outside 1..={max_count}"
            ),
            Self::InvalidMinSize { min_size } => {
                write!(f, "minimum pane size {min_size} must be finite and >= 0")
            }
            Self::InvalidSize { size } => {
                write!(f, "container size {size} must be finite and >= 0")
            }
            Self::InvalidWeights { len, max_count } => write!(
                f,
                "invalid saved weights (len={len}, max_count={max_count})"
            ),
            Self::InvalidSpring {
                stiffness,
                damping_ratio,
                visibility_threshold,
            } => write!(
                f,
                "invalid spring (stiffness={stiffness}, damping_ratio={damping_ratio}, \
                 visibility_threshold={visibility_threshold})"
            ),
            Self::InvalidDecay {
                friction,
                velocity_threshold,
            } => write!(
                f,
                "invalid decay (friction={friction}, velocity_threshold={velocity_threshold})"
            ),
            Self::UnsupportedVersion { version, expected } => write!(
                f,
                "unsupported saved state version {version} (expected {expected})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
