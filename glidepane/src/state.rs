use alloc::vec::Vec;

pub const HEADER_STATE_VERSION: u32 = 1;
pub const SPLIT_STATE_VERSION: u32 = 1;

/// What a collapsing header persists across restoration.
///
/// Collapsed height and motion configuration are not persisted: the owner re-supplies them on
/// restore and must supply the same values every time.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderSavedState {
    pub version: u32,
    pub expanded_height: f32,
    pub progress: f32,
    pub snap_threshold: f32,
}

/// What a split layout persists across restoration.
///
/// Orientation, minimum size and current extent are re-supplied on restore.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitSavedState {
    pub version: u32,
    pub weights: Vec<f32>,
    pub visible_count: usize,
}
