//! Decision tree evaluation.
//!
//! Walks a compiled [`DecisionTree`] against a concrete [`Value`] and
//! returns the selected arm with its bindings. Guards are opaque to the
//! engine, so the caller supplies a callback that decides them.

use ori_match_ir::{
    DecisionTree, GuardId, Name, PathInstruction, ScrutineePath, TestKind, TestValue, Value,
};

/// The arm a value selected and what its bindings resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub arm_index: usize,
    /// In the order the tree lists them.
    pub bindings: Vec<(Name, Value)>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The value reached a `Fail` node or a switch with no matching edge.
    #[error("no arm matches the value")]
    NoMatch,
    /// A path step does not fit the value, or a switch cannot test what
    /// the path leads to. The value does not have the compiled shape.
    #[error("path {path:?} does not fit the value")]
    InvalidPath { path: ScrutineePath },
}

/// Evaluate a compiled tree against a scrutinee.
///
/// `guard` is called at each `Guard` node with the guard id and the arm's
/// bindings; returning `false` continues with the node's `on_fail`.
pub fn eval_decision_tree<F>(
    tree: &DecisionTree,
    scrutinee: &Value,
    mut guard: F,
) -> Result<MatchResult, EvalError>
where
    F: FnMut(GuardId, &[(Name, Value)]) -> bool,
{
    eval_node(tree, scrutinee, &mut guard)
}

fn eval_node<F>(
    tree: &DecisionTree,
    scrutinee: &Value,
    guard: &mut F,
) -> Result<MatchResult, EvalError>
where
    F: FnMut(GuardId, &[(Name, Value)]) -> bool,
{
    match tree {
        DecisionTree::Leaf {
            arm_index,
            bindings,
        } => Ok(MatchResult {
            arm_index: *arm_index,
            bindings: resolve_bindings(scrutinee, bindings)?,
        }),

        DecisionTree::Guard {
            arm_index,
            bindings,
            guard: guard_id,
            on_fail,
        } => {
            let resolved = resolve_bindings(scrutinee, bindings)?;
            if guard(*guard_id, &resolved) {
                Ok(MatchResult {
                    arm_index: *arm_index,
                    bindings: resolved,
                })
            } else {
                eval_node(on_fail, scrutinee, guard)
            }
        }

        DecisionTree::Switch {
            path,
            test_kind,
            edges,
            default,
            ..
        } => {
            let sub_value = resolve_path(scrutinee, path)?;
            for (test_value, subtree) in edges {
                if test_matches(sub_value.as_value(), *test_kind, test_value, path)? {
                    return eval_node(subtree, scrutinee, guard);
                }
            }
            match default {
                Some(default) => eval_node(default, scrutinee, guard),
                None => Err(EvalError::NoMatch),
            }
        }

        DecisionTree::Fail => Err(EvalError::NoMatch),
    }
}

fn test_matches(
    value: &Value,
    kind: TestKind,
    test: &TestValue,
    path: &ScrutineePath,
) -> Result<bool, EvalError> {
    let matched = match (kind, value) {
        (TestKind::Tag, Value::Variant { index, .. }) => {
            matches!(test, TestValue::Tag { variant_index, .. } if variant_index == index)
        }
        (TestKind::Int, Value::Int(v)) => test.contains_int(*v),
        (TestKind::Bool, Value::Bool(b)) => matches!(test, TestValue::Bool(x) if x == b),
        (TestKind::SeqLen, Value::Sequence(items)) => test.admits_len(items.len()),
        _ => return Err(EvalError::InvalidPath { path: path.clone() }),
    };
    Ok(matched)
}

fn resolve_bindings(
    scrutinee: &Value,
    bindings: &[(Name, ScrutineePath)],
) -> Result<Vec<(Name, Value)>, EvalError> {
    bindings
        .iter()
        .map(|(name, path)| Ok((*name, resolve_path(scrutinee, path)?.into_value())))
        .collect()
}

// Path resolution

/// A sub-value found by path resolution.
///
/// Most steps borrow an existing sub-value (`Ref`). `SeqSlice` builds a
/// new sequence (`Owned`).
enum Resolved<'a> {
    Ref(&'a Value),
    Owned(Value),
}

impl Resolved<'_> {
    fn as_value(&self) -> &Value {
        match self {
            Resolved::Ref(r) => r,
            Resolved::Owned(v) => v,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Resolved::Ref(r) => r.clone(),
            Resolved::Owned(v) => v,
        }
    }
}

fn resolve_path<'a>(root: &'a Value, path: &ScrutineePath) -> Result<Resolved<'a>, EvalError> {
    let invalid = || EvalError::InvalidPath { path: path.clone() };
    let mut current = Resolved::Ref(root);
    for &instruction in path {
        current = match current {
            Resolved::Ref(r) => step(r, instruction).ok_or_else(invalid)?,
            Resolved::Owned(o) => {
                Resolved::Owned(step(&o, instruction).ok_or_else(invalid)?.into_value())
            }
        };
    }
    Ok(current)
}

fn step(value: &Value, instruction: PathInstruction) -> Option<Resolved<'_>> {
    match (instruction, value) {
        (PathInstruction::TagPayload(i), Value::Variant { fields, .. })
        | (PathInstruction::TupleIndex(i), Value::Tuple(fields))
        | (PathInstruction::SeqIndex(i), Value::Sequence(fields)) => {
            fields.get(i as usize).map(Resolved::Ref)
        }
        (PathInstruction::SeqFromEnd(k), Value::Sequence(items)) if k > 0 => {
            let index = items.len().checked_sub(k as usize)?;
            items.get(index).map(Resolved::Ref)
        }
        (PathInstruction::SeqSlice { start, end }, Value::Sequence(items)) => {
            let stop = items.len().checked_sub(end as usize)?;
            let middle = items.get(start as usize..stop)?;
            Some(Resolved::Owned(Value::Sequence(middle.to_vec())))
        }
        _ => None,
    }
}
