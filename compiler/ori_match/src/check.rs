//! Exhaustiveness and reachability checking.
//!
//! One left-to-right pass over the arms with a single `covered` space:
//!
//! 1. `useful = space(arm) − covered`. Empty means the arm is unreachable.
//! 2. Unguarded arms add `useful` to `covered`. `useful` is disjoint from
//!    `covered` by construction, so the union is an append.
//! 3. After the last arm, `missing = full − covered`. If it is non-empty
//!    the match is non-exhaustive and witnesses are sampled from it.
//!
//! Guarded arms never add coverage: the guard might reject any value. Their
//! own reachability is still reported.

use ori_match_ir::{ShapeId, Value};
use tracing::debug;

use crate::flatten::LoweredArm;
use crate::space::{Space, SpaceCx};
use crate::witness;

/// Whether every value of the scrutinee shape is matched by some arm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exhaustiveness {
    Exhaustive,
    /// Sample values no arm is certain to match, smallest first. Never
    /// empty.
    NonExhaustive(Vec<Value>),
}

impl Exhaustiveness {
    pub fn is_exhaustive(&self) -> bool {
        matches!(self, Exhaustiveness::Exhaustive)
    }

    /// The witnesses, empty when exhaustive.
    pub fn witnesses(&self) -> &[Value] {
        match self {
            Exhaustiveness::Exhaustive => &[],
            Exhaustiveness::NonExhaustive(witnesses) => witnesses,
        }
    }
}

/// Both checks for one match site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    pub exhaustiveness: Exhaustiveness,
    /// Indices of arms no value can reach, ascending.
    pub unreachable: Vec<usize>,
}

/// Run both checks over lowered arms.
pub(crate) fn check_arms(
    cx: &SpaceCx<'_>,
    shape: ShapeId,
    arms: &[LoweredArm],
    max_witnesses: usize,
) -> MatchReport {
    let mut covered = Space::empty();
    let mut unreachable = Vec::new();

    for (arm_index, arm) in arms.iter().enumerate() {
        let space = cx.pattern_space(&arm.pattern, shape);
        let useful = cx.subtract(&space, &covered);
        if cx.is_empty(&useful) {
            debug!(arm_index, "unreachable arm");
            unreachable.push(arm_index);
            continue;
        }
        if arm.guard.is_none() {
            covered.extend_disjoint(useful);
        }
    }

    let missing = cx.subtract(&Space::full(shape), &covered);
    let exhaustiveness = if cx.is_empty(&missing) {
        Exhaustiveness::Exhaustive
    } else {
        Exhaustiveness::NonExhaustive(witness::sample(cx, &missing, max_witnesses))
    };

    debug!(
        arms = arms.len(),
        unreachable = unreachable.len(),
        witnesses = exhaustiveness.witnesses().len(),
        "checked match"
    );

    MatchReport {
        exhaustiveness,
        unreachable,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
