//! Helpers shared by the integration test binaries.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use ori_match::{FlatPattern, LoweredArm};
use ori_match_ir::{GuardId, Name, Value};

/// Reference semantics: try the arms in order and return the first whose
/// pattern matches and whose guard accepts, with its bindings sorted by
/// name.
pub fn first_match(
    arms: &[LoweredArm],
    value: &Value,
    mut guard: impl FnMut(GuardId) -> bool,
) -> Option<(usize, Vec<(Name, Value)>)> {
    for (arm_index, arm) in arms.iter().enumerate() {
        let mut bindings = Vec::new();
        if matches(&arm.pattern, value, &mut bindings) && arm.guard.map_or(true, &mut guard) {
            return Some((arm_index, sorted(bindings)));
        }
    }
    None
}

pub fn sorted(mut bindings: Vec<(Name, Value)>) -> Vec<(Name, Value)> {
    bindings.sort_by_key(|(name, _)| *name);
    bindings
}

fn matches(pat: &FlatPattern, value: &Value, out: &mut Vec<(Name, Value)>) -> bool {
    match (pat, value) {
        (FlatPattern::Wildcard, _) => true,
        (FlatPattern::Binding(name), _) => {
            out.push((*name, value.clone()));
            true
        }
        (FlatPattern::At { name, inner }, _) => {
            out.push((*name, value.clone()));
            matches(inner, value, out)
        }
        (FlatPattern::IntRange { lo, hi }, Value::Int(v)) => lo <= v && v <= hi,
        (FlatPattern::Bool(b), Value::Bool(v)) => b == v,
        (
            FlatPattern::Variant { index, fields, .. },
            Value::Variant {
                index: actual,
                fields: values,
            },
        ) => index == actual && all(fields, values, out),
        (FlatPattern::Tuple(fields), Value::Tuple(values)) => all(fields, values, out),
        (
            FlatPattern::Seq {
                prefix,
                rest,
                suffix,
            },
            Value::Sequence(items),
        ) => {
            let fixed = prefix.len() + suffix.len();
            let fits = match rest {
                Some(_) => items.len() >= fixed,
                None => items.len() == fixed,
            };
            if !fits {
                return false;
            }
            let tail = items.len() - suffix.len();
            if let Some(name) = rest.and_then(|r| r.binding) {
                out.push((name, Value::Sequence(items[prefix.len()..tail].to_vec())));
            }
            all(prefix, &items[..prefix.len()], out) && all(suffix, &items[tail..], out)
        }
        (FlatPattern::Or(alts), _) => alts.iter().any(|alt| {
            let mark = out.len();
            let hit = matches(alt, value, out);
            if !hit {
                out.truncate(mark);
            }
            hit
        }),
        _ => false,
    }
}

fn all(pats: &[FlatPattern], values: &[Value], out: &mut Vec<(Name, Value)>) -> bool {
    pats.len() == values.len() && pats.iter().zip(values).all(|(p, v)| matches(p, v, out))
}
