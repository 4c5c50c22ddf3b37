//! Pattern match decision trees.
//!
//! # Algorithm
//!
//! Follows Maranget (2008) "Compiling Pattern Matching to Good Decision
//! Trees", as implemented in Roc and Elm. Operates on a **pattern matrix**
//! where rows are match arms and columns are sub-values of the scrutinee.
//!
//! # Architecture
//!
//! Tree types live in `ori_match_ir::tree` so that consumers (code
//! generators, interpreters) can depend on them without the compiler.
//! Construction lives in [`compile`], and [`eval`] walks a tree against a
//! concrete [`Value`](ori_match_ir::Value).
//!
//! # References
//!
//! - Maranget (2008): foundational algorithm
//! - Roc `crates/compiler/mono/src/ir/decision_tree.rs`
//! - Elm `compiler/src/Nitpick/PatternMatches.hs`

pub(crate) mod compile;
pub mod eval;

use ori_match_ir::{DecisionTree, ShapeId, ShapeRegistry};
use tracing::debug;

use crate::config::ColumnHeuristic;
use crate::flatten::LoweredArm;

pub use eval::{eval_decision_tree, EvalError, MatchResult};

/// A compiled match site.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledMatch {
    pub tree: DecisionTree,
    /// Whether some value reaches a `Fail` node.
    pub fail_reachable: bool,
}

pub(crate) fn compile_arms(
    registry: &ShapeRegistry,
    shape: ShapeId,
    arms: &[LoweredArm],
    heuristic: ColumnHeuristic,
) -> CompiledMatch {
    let tree = compile::Compiler::new(registry, heuristic).compile_arms(shape, arms);
    let fail_reachable = tree.can_fail();
    debug!(
        arms = arms.len(),
        size = tree.size(),
        depth = tree.depth(),
        fail_reachable,
        "compiled match"
    );
    CompiledMatch {
        tree,
        fail_reachable,
    }
}
