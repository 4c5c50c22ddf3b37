//! Decision tree types for compiled matches.
//!
//! Produced by `ori_match::decision_tree::compile` (Maranget 2008) and
//! walked by `ori_match::decision_tree::eval`. A tree owns no scrutinee
//! data: tests and bindings refer to sub-values through [`ScrutineePath`]s
//! rooted at the scrutinee.
//!
//! # References
//!
//! - Maranget (2008) "Compiling Pattern Matching to Good Decision Trees"
//! - Roc `crates/compiler/mono/src/ir/decision_tree.rs`

use smallvec::SmallVec;

use crate::{GuardId, Name, ShapeId};

// Scrutinee Path Tracking

/// A path from the root scrutinee to a sub-value.
///
/// Matching `Cons(Pair(x, _), _)`, the path to `x` is
/// `[TagPayload(0), TupleIndex(0)]`.
///
/// Inline capacity covers typical nesting depth; the compiler clones paths
/// on every specialization step.
pub type ScrutineePath = SmallVec<[PathInstruction; 4]>;

/// One step in a scrutinee path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum PathInstruction {
    /// Payload field of a sum value. Only valid after a tag test.
    TagPayload(u32),
    /// Field of a product value.
    TupleIndex(u32),
    /// Element of a sequence, counted from the start.
    SeqIndex(u32),
    /// Element of a sequence, counted from the end: `SeqFromEnd(1)` is the
    /// last element.
    SeqFromEnd(u32),
    /// The sub-sequence left after dropping `start` leading and `end`
    /// trailing elements (the `..rest` of a sequence pattern).
    SeqSlice { start: u32, end: u32 },
}

// Test Kinds

/// What kind of test a `Switch` node performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TestKind {
    /// Compare the discriminant of a sum value. Edges are `TestValue::Tag`.
    Tag,
    /// Locate an integer among disjoint intervals. Edges are
    /// `TestValue::Int` or `TestValue::IntRange`.
    Int,
    /// Edges are `TestValue::Bool`.
    Bool,
    /// Check the length of a sequence. Edges are `TestValue::SeqLen`.
    SeqLen,
}

/// A specific test value for one edge of a `Switch` node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TestValue {
    Tag {
        /// Discriminant.
        variant_index: u32,
        /// Variant tag, for readability.
        tag: Name,
    },
    Int(i128),
    /// Inclusive on both ends.
    IntRange { lo: i128, hi: i128 },
    Bool(bool),
    SeqLen {
        len: u32,
        /// `true`: exactly `len` elements. `false`: at least `len`.
        is_exact: bool,
    },
}

impl TestValue {
    /// Whether an integer lands on this edge.
    pub fn contains_int(&self, v: i128) -> bool {
        match self {
            TestValue::Int(x) => *x == v,
            TestValue::IntRange { lo, hi } => *lo <= v && v <= *hi,
            _ => false,
        }
    }

    /// Whether a sequence of length `n` lands on this edge.
    pub fn admits_len(&self, n: usize) -> bool {
        match self {
            TestValue::SeqLen { len, is_exact } => {
                let len = *len as usize;
                if *is_exact {
                    n == len
                } else {
                    n >= len
                }
            }
            _ => false,
        }
    }
}

// Decision Tree

/// A compiled decision tree for one match site.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionTree {
    /// Test a sub-value and branch on the outcome.
    Switch {
        /// Where the tested value lives.
        path: ScrutineePath,
        /// Shape of the tested value.
        shape: ShapeId,
        test_kind: TestKind,
        /// Disjoint edges; at most one matches a given value.
        edges: Vec<(TestValue, DecisionTree)>,
        /// Values covered by no edge. `None` when the edges are complete.
        default: Option<Box<DecisionTree>>,
    },
    /// An arm matched. Bind variables and run its body.
    Leaf {
        arm_index: usize,
        /// Each binding names the path where its value is found.
        bindings: Vec<(Name, ScrutineePath)>,
    },
    /// The arm matched structurally but has a guard. If the guard rejects,
    /// continue with `on_fail`, which holds the remaining compatible arms.
    Guard {
        arm_index: usize,
        bindings: Vec<(Name, ScrutineePath)>,
        guard: GuardId,
        on_fail: Box<DecisionTree>,
    },
    /// No arm matches. Only reachable for non-exhaustive matches.
    Fail,
}

impl DecisionTree {
    /// Whether any `Fail` node exists in the tree.
    pub fn can_fail(&self) -> bool {
        match self {
            DecisionTree::Fail => true,
            DecisionTree::Leaf { .. } => false,
            DecisionTree::Guard { on_fail, .. } => on_fail.can_fail(),
            DecisionTree::Switch { edges, default, .. } => {
                edges.iter().any(|(_, t)| t.can_fail())
                    || default.as_deref().is_some_and(DecisionTree::can_fail)
            }
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        match self {
            DecisionTree::Fail | DecisionTree::Leaf { .. } => 1,
            DecisionTree::Guard { on_fail, .. } => 1 + on_fail.size(),
            DecisionTree::Switch { edges, default, .. } => {
                1 + edges.iter().map(|(_, t)| t.size()).sum::<usize>()
                    + default.as_deref().map_or(0, DecisionTree::size)
            }
        }
    }

    /// Longest chain of tests from the root to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            DecisionTree::Fail | DecisionTree::Leaf { .. } => 0,
            DecisionTree::Guard { on_fail, .. } => 1 + on_fail.depth(),
            DecisionTree::Switch { edges, default, .. } => {
                let deepest_edge = edges.iter().map(|(_, t)| t.depth()).max().unwrap_or(0);
                let deepest_default = default.as_deref().map_or(0, DecisionTree::depth);
                1 + deepest_edge.max(deepest_default)
            }
        }
    }

    /// Arm indices reachable through some leaf or guard, in ascending order.
    pub fn arms(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_arms(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_arms(&self, out: &mut Vec<usize>) {
        match self {
            DecisionTree::Fail => {}
            DecisionTree::Leaf { arm_index, .. } => out.push(*arm_index),
            DecisionTree::Guard {
                arm_index, on_fail, ..
            } => {
                out.push(*arm_index);
                on_fail.collect_arms(out);
            }
            DecisionTree::Switch { edges, default, .. } => {
                for (_, t) in edges {
                    t.collect_arms(out);
                }
                if let Some(d) = default {
                    d.collect_arms(out);
                }
            }
        }
    }
}
