//! Pattern arena.
//!
//! Patterns arrive from the front-end already parsed. They are stored flat:
//! each node lives in [`PatternArena`] and is addressed by [`PatternId`];
//! child lists are [`PatternRange`]s into a shared id buffer, so a pattern
//! tree never owns boxed children and sub-patterns can be shared.

use crate::Name;

/// Index of a pattern node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternId(u32);

impl PatternId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A contiguous run of child ids in the arena's list buffer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternRange {
    start: u32,
    len: u32,
}

impl PatternRange {
    pub const EMPTY: PatternRange = PatternRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Opaque handle for an arm guard. The engine never evaluates guards itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct GuardId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Int(i128),
    Bool(bool),
}

/// The `..` of a sequence pattern, optionally binding the middle slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct RestPattern {
    pub binding: Option<Name>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// `x`
    Binding(Name),
    /// `x @ inner`
    At { name: Name, inner: PatternId },
    Literal(Literal),
    /// `lo..=hi` or `lo..hi`
    Range { lo: i128, hi: i128, inclusive: bool },
    /// `Tag(fields...)`
    Constructor { tag: Name, fields: PatternRange },
    Tuple(PatternRange),
    /// `[prefix.., ..rest, suffix..]`. Without a rest the pattern matches
    /// exactly `prefix.len() + suffix.len()` elements.
    Sequence {
        prefix: PatternRange,
        rest: Option<RestPattern>,
        suffix: PatternRange,
    },
    /// `a | b | ...`
    Or(PatternRange),
}

/// One match arm. Its position in the arm list is its priority.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Arm {
    pub pattern: PatternId,
    pub guard: Option<GuardId>,
}

impl Arm {
    pub fn new(pattern: PatternId) -> Self {
        Arm {
            pattern,
            guard: None,
        }
    }

    pub fn guarded(pattern: PatternId, guard: GuardId) -> Self {
        Arm {
            pattern,
            guard: Some(guard),
        }
    }
}

/// Flat storage for pattern trees.
#[derive(Clone, Debug, Default)]
pub struct PatternArena {
    patterns: Vec<Pattern>,
    lists: Vec<PatternId>,
}

impl PatternArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a pattern node.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn alloc(&mut self, pattern: Pattern) -> PatternId {
        let id = u32::try_from(self.patterns.len())
            .unwrap_or_else(|_| panic!("pattern arena overflow: more than u32::MAX nodes"));
        self.patterns.push(pattern);
        PatternId(id)
    }

    /// Store a list of child ids.
    ///
    /// # Panics
    /// Panics if the list buffer exceeds `u32::MAX` entries.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = PatternId>) -> PatternRange {
        let start = self.lists.len();
        self.lists.extend(ids);
        let to_u32 = |n: usize| {
            u32::try_from(n)
                .unwrap_or_else(|_| panic!("pattern list overflow: more than u32::MAX entries"))
        };
        PatternRange {
            start: to_u32(start),
            len: to_u32(self.lists.len() - start),
        }
    }

    #[inline]
    pub fn get(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.0 as usize]
    }

    #[inline]
    pub fn list(&self, range: PatternRange) -> &[PatternId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    // Builders

    pub fn wildcard(&mut self) -> PatternId {
        self.alloc(Pattern::Wildcard)
    }

    pub fn binding(&mut self, name: Name) -> PatternId {
        self.alloc(Pattern::Binding(name))
    }

    pub fn at(&mut self, name: Name, inner: PatternId) -> PatternId {
        self.alloc(Pattern::At { name, inner })
    }

    pub fn int(&mut self, value: i128) -> PatternId {
        self.alloc(Pattern::Literal(Literal::Int(value)))
    }

    pub fn bool(&mut self, value: bool) -> PatternId {
        self.alloc(Pattern::Literal(Literal::Bool(value)))
    }

    pub fn range(&mut self, lo: i128, hi: i128, inclusive: bool) -> PatternId {
        self.alloc(Pattern::Range { lo, hi, inclusive })
    }

    pub fn constructor(&mut self, tag: Name, fields: impl IntoIterator<Item = PatternId>) -> PatternId {
        let fields = self.alloc_list(fields);
        self.alloc(Pattern::Constructor { tag, fields })
    }

    pub fn tuple(&mut self, fields: impl IntoIterator<Item = PatternId>) -> PatternId {
        let fields = self.alloc_list(fields);
        self.alloc(Pattern::Tuple(fields))
    }

    pub fn sequence(
        &mut self,
        prefix: impl IntoIterator<Item = PatternId>,
        rest: Option<RestPattern>,
        suffix: impl IntoIterator<Item = PatternId>,
    ) -> PatternId {
        let prefix = self.alloc_list(prefix);
        let suffix = self.alloc_list(suffix);
        self.alloc(Pattern::Sequence {
            prefix,
            rest,
            suffix,
        })
    }

    pub fn or(&mut self, alternatives: impl IntoIterator<Item = PatternId>) -> PatternId {
        let alternatives = self.alloc_list(alternatives);
        self.alloc(Pattern::Or(alternatives))
    }
}
