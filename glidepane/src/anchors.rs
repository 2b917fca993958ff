use alloc::vec::Vec;

/// An ordered mapping from named states to positions.
///
/// Insertion order is preserved; inserting an existing state replaces its position in place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorSet<S> {
    entries: Vec<(S, f32)>,
}

impl<S> Default for AnchorSet<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S: Copy + PartialEq> AnchorSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, state: S, position: f32) -> Self {
        self.insert(state, position);
        self
    }

    pub fn insert(&mut self, state: S, position: f32) {
        match self.entries.iter_mut().find(|(s, _)| *s == state) {
            Some(entry) => entry.1 = position,
            None => self.entries.push((state, position)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, state: S) -> bool {
        self.entries.iter().any(|(s, _)| *s == state)
    }

    pub fn position(&self, state: S) -> Option<f32> {
        self.entries
            .iter()
            .find(|(s, _)| *s == state)
            .map(|&(_, p)| p)
    }

    /// Smallest anchor position, or `None` when empty.
    pub fn min_position(&self) -> Option<f32> {
        self.entries.iter().map(|&(_, p)| p).reduce(f32::min)
    }

    /// Largest anchor position, or `None` when empty.
    pub fn max_position(&self) -> Option<f32> {
        self.entries.iter().map(|&(_, p)| p).reduce(f32::max)
    }

    /// Clamps `offset` into `[min_position, max_position]`.
    ///
    /// Returns `offset` unchanged when empty or when any anchor is NaN.
    pub fn clamp(&self, offset: f32) -> f32 {
        if self.entries.iter().any(|(_, p)| p.is_nan()) {
            return offset;
        }
        match (self.min_position(), self.max_position()) {
            (Some(min), Some(max)) if min <= max => offset.clamp(min, max),
            _ => offset,
        }
    }

    /// The first position that is NaN or infinite, if any.
    pub(crate) fn non_finite_position(&self) -> Option<f32> {
        self.entries
            .iter()
            .map(|&(_, p)| p)
            .find(|p| !p.is_finite())
    }

    /// The state whose anchor is closest to `offset`. Ties go to the earlier entry.
    pub fn closest(&self, offset: f32) -> Option<S> {
        let mut best: Option<(S, f32)> = None;
        for &(s, p) in &self.entries {
            let d = (p - offset).abs();
            match best {
                Some((_, bd)) if bd <= d => {}
                _ => best = Some((s, d)),
            }
        }
        best.map(|(s, _)| s)
    }

    /// The state anchored exactly at `offset`, if any.
    pub fn state_at(&self, offset: f32) -> Option<S> {
        self.entries
            .iter()
            .find(|&&(_, p)| p == offset)
            .map(|&(s, _)| s)
    }
}
