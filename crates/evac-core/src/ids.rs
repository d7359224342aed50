//! Arena indices for the road graph.
//!
//! Graph construction and both shortest-path queries work on integer
//! indices into flat `Vec`s rather than on the source data's string keys.
//! A `NodeId` is the position of a node in the loaded node list, a `LinkId`
//! the position of a link, and an `EdgeId` the position of a directed edge in
//! the CSR edge arrays of a built graph.

use std::fmt;

/// Generate a `u32` index wrapper.
macro_rules! arena_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "no index", e.g. the predecessor of a search root.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the owning arena.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build an id from an arena position.
            ///
            /// Returns `None` if `index` does not fit in `u32` or would
            /// collide with [`Self::INVALID`].
            #[inline]
            pub fn from_index(index: usize) -> Option<$name> {
                u32::try_from(index).ok().filter(|&i| i != u32::MAX).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_id! {
    /// Index of a road node in the loaded node list.
    pub struct NodeId;
}

arena_id! {
    /// Index of a road link (one physical road segment, both directions).
    pub struct LinkId;
}

arena_id! {
    /// Index of a directed edge in a built route graph's CSR arrays.
    pub struct EdgeId;
}
