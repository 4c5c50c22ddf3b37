//! Interned identifier for variant tags and binding names.

use std::fmt;

/// Index of a string in a [`StringInterner`](crate::StringInterner).
///
/// Shapes resolve tags by `Name`, and trees report bindings by `Name`, so
/// one interner must serve a registry, its patterns, and anything that
/// renders their values. Names order by interning time, not by spelling.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, interned by every interner. Stands in for the
    /// contents of opaque values.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
