//! Lower arena patterns into self-contained, shape-checked `FlatPattern`s.
//!
//! Both consumers, the coverage engine ([`crate::space`]) and the decision
//! tree compiler ([`crate::decision_tree`]), work on `FlatPattern`. Lowering
//! resolves tags to discriminants, normalizes literals and ranges to
//! domain-clipped inclusive intervals, and rejects patterns that do not fit
//! their shape or bind names inconsistently.

use ori_match_ir::{
    Arm, GuardId, Literal, Name, Pattern, PatternArena, PatternId, RestPattern, SeqLen, ShapeId,
    ShapeRegistry, TypeShape,
};

use crate::error::{MatchError, ShapeMismatch};

/// A pattern after lowering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlatPattern {
    Wildcard,
    Binding(Name),
    /// Binds the value and matches `inner`.
    At { name: Name, inner: Box<FlatPattern> },
    /// Integers in `lo..=hi`, clipped to the domain.
    IntRange { lo: i128, hi: i128 },
    Bool(bool),
    Variant {
        tag: Name,
        index: u32,
        fields: Vec<FlatPattern>,
    },
    Tuple(Vec<FlatPattern>),
    /// Without `rest`: exactly `prefix.len() + suffix.len()` elements.
    Seq {
        prefix: Vec<FlatPattern>,
        rest: Option<RestPattern>,
        suffix: Vec<FlatPattern>,
    },
    /// Matches if any alternative matches. An empty `Or` matches nothing.
    Or(Vec<FlatPattern>),
}

impl FlatPattern {
    /// A pattern that matches no value, e.g. a literal outside its domain.
    pub const NEVER: FlatPattern = FlatPattern::Or(Vec::new());

    /// Matches every value without inspecting it.
    ///
    /// An or-pattern counts only when its first alternative does, so the
    /// bindings it produces are the first alternative's.
    pub fn is_wildcard_like(&self) -> bool {
        match self {
            FlatPattern::Wildcard | FlatPattern::Binding(_) => true,
            FlatPattern::At { inner, .. } => inner.is_wildcard_like(),
            FlatPattern::Or(alts) => alts.first().is_some_and(FlatPattern::is_wildcard_like),
            _ => false,
        }
    }

    /// Names bound by this pattern, sorted.
    ///
    /// Checks that no name is bound twice and that every or-pattern's
    /// alternatives bind the same names.
    pub fn bound_names(&self) -> Result<Vec<Name>, BindingError> {
        let mut names = Vec::new();
        self.collect_names(&mut names)?;
        names.sort_unstable();
        if let Some(w) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(BindingError::Duplicate(w[0]));
        }
        Ok(names)
    }

    fn collect_names(&self, out: &mut Vec<Name>) -> Result<(), BindingError> {
        match self {
            FlatPattern::Wildcard | FlatPattern::IntRange { .. } | FlatPattern::Bool(_) => {}
            FlatPattern::Binding(name) => out.push(*name),
            FlatPattern::At { name, inner } => {
                out.push(*name);
                inner.collect_names(out)?;
            }
            FlatPattern::Variant { fields, .. } | FlatPattern::Tuple(fields) => {
                for field in fields {
                    field.collect_names(out)?;
                }
            }
            FlatPattern::Seq {
                prefix,
                rest,
                suffix,
            } => {
                for elem in prefix.iter().chain(suffix) {
                    elem.collect_names(out)?;
                }
                if let Some(name) = rest.and_then(|r| r.binding) {
                    out.push(name);
                }
            }
            FlatPattern::Or(alts) => {
                let mut alts = alts.iter();
                let Some(first) = alts.next() else {
                    return Ok(());
                };
                let expected = first.bound_names()?;
                for alt in alts {
                    let names = alt.bound_names()?;
                    if names != expected {
                        return Err(BindingError::Inconsistent {
                            first: expected,
                            other: names,
                        });
                    }
                }
                out.extend(expected);
            }
        }
        Ok(())
    }
}

/// Binding problems found by [`FlatPattern::bound_names`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingError {
    Duplicate(Name),
    Inconsistent { first: Vec<Name>, other: Vec<Name> },
}

impl BindingError {
    fn at_arm(self, arm_index: usize) -> MatchError {
        match self {
            BindingError::Duplicate(name) => MatchError::DuplicateBinding { arm_index, name },
            BindingError::Inconsistent { first, other } => MatchError::InconsistentOrBindings {
                arm_index,
                first,
                other,
            },
        }
    }
}

/// One arm after lowering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoweredArm {
    pub pattern: FlatPattern,
    pub guard: Option<GuardId>,
    /// Names the arm binds, sorted.
    pub bindings: Vec<Name>,
}

/// Immutable context for pattern lowering.
pub struct FlattenCtx<'a> {
    pub registry: &'a ShapeRegistry,
    pub arena: &'a PatternArena,
}

impl<'a> FlattenCtx<'a> {
    pub fn new(registry: &'a ShapeRegistry, arena: &'a PatternArena) -> Self {
        Self { registry, arena }
    }

    /// Lower every arm of a match site, failing on the first malformed arm.
    pub fn lower_arms(&self, shape: ShapeId, arms: &[Arm]) -> Result<Vec<LoweredArm>, MatchError> {
        if !self.registry.contains(shape) {
            return Err(MatchError::UnknownShape(shape));
        }
        arms.iter()
            .enumerate()
            .map(|(arm_index, arm)| {
                let pattern = self
                    .flatten(arm.pattern, shape)
                    .map_err(|kind| MatchError::ShapeMismatch { arm_index, kind })?;
                let bindings = pattern.bound_names().map_err(|e| e.at_arm(arm_index))?;
                Ok(LoweredArm {
                    pattern,
                    guard: arm.guard,
                    bindings,
                })
            })
            .collect()
    }

    /// Lower one pattern against a shape.
    pub fn flatten(&self, id: PatternId, shape: ShapeId) -> Result<FlatPattern, ShapeMismatch> {
        let ty = self.registry.shape(shape);
        match *self.arena.get(id) {
            Pattern::Wildcard => Ok(FlatPattern::Wildcard),

            Pattern::Binding(name) => Ok(FlatPattern::Binding(name)),

            Pattern::At { name, inner } => Ok(FlatPattern::At {
                name,
                inner: Box::new(self.flatten(inner, shape)?),
            }),

            Pattern::Literal(Literal::Bool(b)) => match ty {
                TypeShape::Bool => Ok(FlatPattern::Bool(b)),
                _ => Err(kind_mismatch("bool literal", ty)),
            },

            Pattern::Literal(Literal::Int(v)) => match ty {
                TypeShape::Integer { min, max } => Ok(clip_range(v, v, *min, *max)),
                _ => Err(kind_mismatch("integer literal", ty)),
            },

            Pattern::Range { lo, hi, inclusive } => match ty {
                TypeShape::Integer { min, max } => {
                    let hi = if inclusive { Some(hi) } else { hi.checked_sub(1) };
                    Ok(hi.map_or(FlatPattern::NEVER, |hi| clip_range(lo, hi, *min, *max)))
                }
                _ => Err(kind_mismatch("range", ty)),
            },

            Pattern::Constructor { tag, fields } => {
                let TypeShape::Sum { variants } = ty else {
                    return Err(kind_mismatch("constructor", ty));
                };
                let index = self
                    .registry
                    .variant_index(shape, tag)
                    .ok_or(ShapeMismatch::UnknownTag { shape, tag })?;
                let def = &variants[index as usize];
                let ids = self.arena.list(fields);
                if ids.len() != def.arity() {
                    return Err(ShapeMismatch::VariantArity {
                        tag,
                        expected: def.arity(),
                        found: ids.len(),
                    });
                }
                let fields = ids
                    .iter()
                    .zip(&def.fields)
                    .map(|(&pat, &field_shape)| self.flatten(pat, field_shape))
                    .collect::<Result<_, _>>()?;
                Ok(FlatPattern::Variant { tag, index, fields })
            }

            Pattern::Tuple(elems) => {
                let TypeShape::Product { fields } = ty else {
                    return Err(kind_mismatch("tuple", ty));
                };
                let ids = self.arena.list(elems);
                if ids.len() != fields.len() {
                    return Err(ShapeMismatch::TupleArity {
                        expected: fields.len(),
                        found: ids.len(),
                    });
                }
                let elems = ids
                    .iter()
                    .zip(fields)
                    .map(|(&pat, &field_shape)| self.flatten(pat, field_shape))
                    .collect::<Result<_, _>>()?;
                Ok(FlatPattern::Tuple(elems))
            }

            Pattern::Sequence {
                prefix,
                rest,
                suffix,
            } => {
                let TypeShape::Sequence { element, len } = ty else {
                    return Err(kind_mismatch("sequence", ty));
                };
                let prefix_ids = self.arena.list(prefix);
                let suffix_ids = self.arena.list(suffix);
                let needed = prefix_ids.len() + suffix_ids.len();
                match (*len, rest) {
                    (SeqLen::Fixed(n), None) if needed != n as usize => {
                        return Err(ShapeMismatch::SequenceLength {
                            expected: n,
                            found: needed,
                        });
                    }
                    (SeqLen::Fixed(n), Some(_)) if needed > n as usize => {
                        return Err(ShapeMismatch::SequenceLength {
                            expected: n,
                            found: needed,
                        });
                    }
                    // Shorter than any value of the shape: matches nothing.
                    (SeqLen::AtLeast(min), None) if needed < min as usize => {
                        return Ok(FlatPattern::NEVER);
                    }
                    _ => {}
                }
                let lower = |ids: &[PatternId]| {
                    ids.iter()
                        .map(|&pat| self.flatten(pat, *element))
                        .collect::<Result<Vec<_>, _>>()
                };
                Ok(FlatPattern::Seq {
                    prefix: lower(prefix_ids)?,
                    rest,
                    suffix: lower(suffix_ids)?,
                })
            }

            Pattern::Or(alts) => {
                let ids = self.arena.list(alts);
                if ids.is_empty() {
                    return Err(ShapeMismatch::EmptyOr);
                }
                let alts = ids
                    .iter()
                    .map(|&pat| self.flatten(pat, shape))
                    .collect::<Result<_, _>>()?;
                Ok(FlatPattern::Or(alts))
            }
        }
    }
}

fn kind_mismatch(pattern: &'static str, shape: &TypeShape) -> ShapeMismatch {
    ShapeMismatch::PatternKind {
        pattern,
        shape: shape.kind_name(),
    }
}

/// Intersect `lo..=hi` with the domain; an empty result never matches.
fn clip_range(lo: i128, hi: i128, min: i128, max: i128) -> FlatPattern {
    let lo = lo.max(min);
    let hi = hi.min(max);
    if lo > hi {
        FlatPattern::NEVER
    } else {
        FlatPattern::IntRange { lo, hi }
    }
}
