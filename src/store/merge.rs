use std::{collections::HashMap, hash::Hash};

/// A state shape that accepts partial updates.
///
/// `Patch` carries only the fields to change. Merging overwrites exactly
/// those fields and leaves everything else as it was, at every depth.
/// Because patches are typed, a patch can never add a field the shape does
/// not already have.
pub trait Merge {
    /// The partial-update type for this shape.
    type Patch;

    /// Applies `patch` in place.
    fn merge(&mut self, patch: Self::Patch);
}

merge_by_replacement!(bool, u8, u16, u32, u64, usize, i32, i64, f64, String);

impl<T> Merge for Vec<T> {
    type Patch = Vec<T>;

    fn merge(&mut self, patch: Self::Patch) {
        *self = patch;
    }
}

impl<T> Merge for Option<T> {
    type Patch = Option<T>;

    fn merge(&mut self, patch: Self::Patch) {
        *self = patch;
    }
}

/// Maps merge entry by entry: patched keys are inserted or replaced whole,
/// keys the patch does not mention are kept.
impl<K: Eq + Hash, V> Merge for HashMap<K, V> {
    type Patch = HashMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}
