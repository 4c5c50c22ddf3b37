//! Value spaces: exact set algebra over the values of a shape.
//!
//! A [`Space`] is a finite union of pairwise-disjoint [`Part`]s. Each part
//! is either the full space of a shape, left unexpanded until an operation
//! needs to look inside, or a constructor applied to sub-spaces. The
//! checker reduces exhaustiveness and reachability to three questions:
//! what a pattern covers, what is left after removing it, and whether that
//! remainder is empty.
//!
//! # Laziness
//!
//! `Full(shape)` is expanded one level at a time and only where the other
//! operand has structure. Subtracting a pattern of depth `d` from the full
//! space of a recursive shape therefore expands at most `d` levels, and the
//! result stays proportional to the pattern size.
//!
//! # Emptiness
//!
//! A part is empty iff one of its factors is empty, which bottoms out in an
//! empty interval set or an uninhabited shape (from the registry's
//! precomputed inhabitedness). Domains are never enumerated.
//!
//! # References
//!
//! - Kmeakin/lang `coverage` (useful-clause framing)
//! - Scala 3 `SpaceEngine` (space subtraction with lazy decomposition)

mod interval;

use ori_match_ir::{SeqLen, ShapeId, ShapeRegistry, TypeShape};

pub use interval::IntervalSet;

use crate::flatten::FlatPattern;

/// A union of pairwise-disjoint parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Space {
    parts: Vec<Part>,
}

/// One disjoint piece of a [`Space`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
    /// Every value of the shape.
    Full(ShapeId),
    /// Integers of an integer shape, or `{0, 1}` encoded booleans of a bool
    /// shape.
    Ints { shape: ShapeId, set: IntervalSet },
    /// One variant of a sum shape with one sub-space per field.
    Variant {
        shape: ShapeId,
        index: u32,
        fields: Vec<Space>,
    },
    Tuple { shape: ShapeId, fields: Vec<Space> },
    /// Sequences of exactly `elems.len()` elements.
    Exact { shape: ShapeId, elems: Vec<Space> },
    /// Sequences of at least `min_len` elements whose first and last
    /// elements lie in `prefix` and `suffix`; the rest are unconstrained.
    ///
    /// Invariant: `prefix.len() + suffix.len() <= min_len`.
    Open {
        shape: ShapeId,
        min_len: u32,
        prefix: Vec<Space>,
        suffix: Vec<Space>,
    },
}

impl Space {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn full(shape: ShapeId) -> Self {
        Space {
            parts: vec![Part::Full(shape)],
        }
    }

    fn from_part(part: Part) -> Self {
        Space { parts: vec![part] }
    }

    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Append parts known to be disjoint from every part already present.
    pub fn extend_disjoint(&mut self, other: Space) {
        self.parts.extend(other.parts);
    }
}

/// Shape-aware operations on spaces.
#[derive(Copy, Clone)]
pub struct SpaceCx<'a> {
    pub registry: &'a ShapeRegistry,
}

impl<'a> SpaceCx<'a> {
    pub fn new(registry: &'a ShapeRegistry) -> Self {
        Self { registry }
    }

    // Pattern -> Space

    /// The set of values of `shape` matched by `pattern`.
    pub fn pattern_space(&self, pattern: &FlatPattern, shape: ShapeId) -> Space {
        match pattern {
            FlatPattern::Wildcard | FlatPattern::Binding(_) => Space::full(shape),
            FlatPattern::At { inner, .. } => self.pattern_space(inner, shape),
            FlatPattern::IntRange { lo, hi } => Space::from_part(Part::Ints {
                shape,
                set: IntervalSet::range(*lo, *hi),
            }),
            FlatPattern::Bool(b) => Space::from_part(Part::Ints {
                shape,
                set: IntervalSet::single(i128::from(*b)),
            }),
            FlatPattern::Variant { index, fields, .. } => {
                let field_shapes = &self.registry.variants(shape)[*index as usize].fields;
                Space::from_part(Part::Variant {
                    shape,
                    index: *index,
                    fields: self.field_spaces(fields, field_shapes),
                })
            }
            FlatPattern::Tuple(fields) => {
                let TypeShape::Product {
                    fields: field_shapes,
                } = self.registry.shape(shape)
                else {
                    return Space::empty();
                };
                Space::from_part(Part::Tuple {
                    shape,
                    fields: self.field_spaces(fields, field_shapes),
                })
            }
            FlatPattern::Seq {
                prefix,
                rest,
                suffix,
            } => self.sequence_space(shape, prefix, rest.is_some(), suffix),
            FlatPattern::Or(alts) => alts.iter().fold(Space::empty(), |acc, alt| {
                self.union(&acc, &self.pattern_space(alt, shape))
            }),
        }
    }

    fn field_spaces(&self, fields: &[FlatPattern], shapes: &[ShapeId]) -> Vec<Space> {
        fields
            .iter()
            .zip(shapes)
            .map(|(p, &s)| self.pattern_space(p, s))
            .collect()
    }

    fn sequence_space(
        &self,
        shape: ShapeId,
        prefix: &[FlatPattern],
        has_rest: bool,
        suffix: &[FlatPattern],
    ) -> Space {
        let TypeShape::Sequence { element, len } = self.registry.shape(shape) else {
            return Space::empty();
        };
        let element = *element;
        let lower = |pats: &[FlatPattern]| -> Vec<Space> {
            pats.iter().map(|p| self.pattern_space(p, element)).collect()
        };
        let (prefix, suffix) = (lower(prefix), lower(suffix));
        let needed = prefix.len() + suffix.len();

        let part = match (has_rest, *len) {
            (false, _) => Part::Exact {
                shape,
                elems: prefix.into_iter().chain(suffix).collect(),
            },
            (true, SeqLen::Fixed(n)) => {
                let middle = (n as usize).saturating_sub(needed);
                Part::Exact {
                    shape,
                    elems: prefix
                        .into_iter()
                        .chain(std::iter::repeat_with(|| Space::full(element)).take(middle))
                        .chain(suffix)
                        .collect(),
                }
            }
            (true, SeqLen::AtLeast(min)) => Part::Open {
                shape,
                min_len: min.max(to_u32(needed)),
                prefix,
                suffix,
            },
        };
        Space::from_part(part)
    }

    // Algebra

    pub fn union(&self, a: &Space, b: &Space) -> Space {
        let mut out = a.clone();
        out.extend_disjoint(self.subtract(b, a));
        out
    }

    /// `a − b`, as a union of disjoint parts.
    pub fn subtract(&self, a: &Space, b: &Space) -> Space {
        let mut remaining = a.parts.clone();
        for bp in &b.parts {
            if remaining.is_empty() {
                break;
            }
            remaining = remaining
                .iter()
                .flat_map(|ap| self.subtract_part(ap, bp))
                .collect();
        }
        Space { parts: remaining }
    }

    pub fn intersect(&self, a: &Space, b: &Space) -> Space {
        let mut out = Vec::new();
        for ap in &a.parts {
            for bp in &b.parts {
                out.extend(self.intersect_part(ap, bp));
            }
        }
        Space { parts: out }
    }

    pub fn is_empty(&self, space: &Space) -> bool {
        space.parts.iter().all(|p| self.is_part_empty(p))
    }

    pub fn is_part_empty(&self, part: &Part) -> bool {
        match part {
            Part::Full(shape) => !self.registry.is_inhabited(*shape),
            Part::Ints { set, .. } => set.is_empty(),
            Part::Variant { fields, .. }
            | Part::Tuple { fields, .. }
            | Part::Exact { elems: fields, .. } => fields.iter().any(|f| self.is_empty(f)),
            Part::Open {
                shape,
                min_len,
                prefix,
                suffix,
            } => {
                prefix.iter().chain(suffix).any(|f| self.is_empty(f))
                    || (*min_len > 0
                        && self
                            .element_shape(*shape)
                            .is_some_and(|e| !self.registry.is_inhabited(e)))
            }
        }
    }

    // Expansion

    /// One level of structure for `Full(shape)`, as disjoint parts.
    ///
    /// Opaque shapes have no structure and stay `Full`.
    pub fn expand_full(&self, shape: ShapeId) -> Vec<Part> {
        match self.registry.shape(shape) {
            TypeShape::Integer { min, max } => vec![Part::Ints {
                shape,
                set: IntervalSet::range(*min, *max),
            }],
            TypeShape::Bool => vec![Part::Ints {
                shape,
                set: IntervalSet::range(0, 1),
            }],
            TypeShape::Opaque => vec![Part::Full(shape)],
            TypeShape::Product { fields } => vec![Part::Tuple {
                shape,
                fields: fields.iter().map(|&f| Space::full(f)).collect(),
            }],
            TypeShape::Sum { variants } => variants
                .iter()
                .enumerate()
                .map(|(index, v)| Part::Variant {
                    shape,
                    index: to_u32(index),
                    fields: v.fields.iter().map(|&f| Space::full(f)).collect(),
                })
                .collect(),
            TypeShape::Sequence { element, len } => match len {
                SeqLen::Fixed(n) => vec![Part::Exact {
                    shape,
                    elems: vec![Space::full(*element); *n as usize],
                }],
                SeqLen::AtLeast(min) => vec![Part::Open {
                    shape,
                    min_len: *min,
                    prefix: Vec::new(),
                    suffix: Vec::new(),
                }],
            },
        }
    }

    fn element_shape(&self, shape: ShapeId) -> Option<ShapeId> {
        match self.registry.shape(shape) {
            TypeShape::Sequence { element, .. } => Some(*element),
            _ => None,
        }
    }

    /// The sequences of an open part with exactly `len` elements.
    /// Requires `len >= min_len`.
    fn open_at_len(&self, shape: ShapeId, prefix: &[Space], suffix: &[Space], len: u32) -> Part {
        let middle = (len as usize).saturating_sub(prefix.len() + suffix.len());
        let full_elem = self
            .element_shape(shape)
            .map_or_else(Space::empty, Space::full);
        Part::Exact {
            shape,
            elems: prefix
                .iter()
                .cloned()
                .chain(std::iter::repeat(full_elem).take(middle))
                .chain(suffix.iter().cloned())
                .collect(),
        }
    }

    /// Pad an open part's prefix to `p` and suffix to `s` elements.
    /// Requires `p + s <= min_len` of the result, so the padding only
    /// restates what the part already allows.
    fn widen(
        &self,
        shape: ShapeId,
        prefix: &[Space],
        suffix: &[Space],
        p: usize,
        s: usize,
    ) -> Vec<Space> {
        let full_elem = self
            .element_shape(shape)
            .map_or_else(Space::empty, Space::full);
        prefix
            .iter()
            .cloned()
            .chain(std::iter::repeat(full_elem.clone()).take(p.saturating_sub(prefix.len())))
            .chain(std::iter::repeat(full_elem).take(s.saturating_sub(suffix.len())))
            .chain(suffix.iter().cloned())
            .collect()
    }

    // Part-level operations

    fn subtract_part(&self, a: &Part, b: &Part) -> Vec<Part> {
        match (a, b) {
            // Every part lies within the full space of its shape.
            (_, Part::Full(_)) => Vec::new(),
            (Part::Full(shape), _) => {
                let expanded = self.expand_full(*shape);
                if matches!(expanded.as_slice(), [Part::Full(_)]) {
                    return self.keep(a.clone());
                }
                expanded
                    .iter()
                    .filter(|p| !self.is_part_empty(p))
                    .flat_map(|p| self.subtract_part(p, b))
                    .collect()
            }

            (Part::Ints { shape, set: x }, Part::Ints { set: y, .. }) => {
                self.keep(Part::Ints {
                    shape: *shape,
                    set: x.subtract(y),
                })
            }

            (
                Part::Variant {
                    shape,
                    index: ia,
                    fields: fa,
                },
                Part::Variant {
                    index: ib,
                    fields: fb,
                    ..
                },
            ) => {
                if ia != ib {
                    return vec![a.clone()];
                }
                let (shape, index) = (*shape, *ia);
                self.subtract_fields(fa, fb, |fields| Part::Variant {
                    shape,
                    index,
                    fields,
                })
            }

            (Part::Tuple { shape, fields: fa }, Part::Tuple { fields: fb, .. }) => {
                let shape = *shape;
                self.subtract_fields(fa, fb, |fields| Part::Tuple { shape, fields })
            }

            (Part::Exact { shape, elems: ea }, Part::Exact { elems: eb, .. }) => {
                if ea.len() != eb.len() {
                    return vec![a.clone()];
                }
                let shape = *shape;
                self.subtract_fields(ea, eb, |elems| Part::Exact { shape, elems })
            }

            (
                Part::Exact { elems, .. },
                Part::Open {
                    shape,
                    min_len,
                    prefix,
                    suffix,
                },
            ) => {
                let len = to_u32(elems.len());
                if len < *min_len {
                    return vec![a.clone()];
                }
                let b = self.open_at_len(*shape, prefix, suffix, len);
                self.subtract_part(a, &b)
            }

            (
                Part::Open {
                    shape,
                    min_len,
                    prefix,
                    suffix,
                },
                Part::Exact { elems, .. },
            ) => {
                let len = to_u32(elems.len());
                if len < *min_len {
                    return vec![a.clone()];
                }
                // Split `a` by length: shorter, exactly `len`, longer.
                let mut out: Vec<Part> = (*min_len..len)
                    .map(|n| self.open_at_len(*shape, prefix, suffix, n))
                    .filter(|p| !self.is_part_empty(p))
                    .collect();
                let at_len = self.open_at_len(*shape, prefix, suffix, len);
                out.extend(self.subtract_part(&at_len, b));
                out.extend(self.keep(Part::Open {
                    shape: *shape,
                    min_len: len + 1,
                    prefix: prefix.clone(),
                    suffix: suffix.clone(),
                }));
                out
            }

            (
                Part::Open {
                    shape,
                    min_len: amin,
                    prefix: ap,
                    suffix: asuf,
                },
                Part::Open {
                    min_len: bmin,
                    prefix: bp,
                    suffix: bsuf,
                    ..
                },
            ) => {
                let shape = *shape;
                let p = ap.len().max(bp.len());
                let s = asuf.len().max(bsuf.len());
                let both = (*amin).max(*bmin);
                let k = both.max(to_u32(p + s));

                let mut out = Vec::new();
                // Lengths only `a` allows.
                for n in *amin..both {
                    out.extend(self.keep(self.open_at_len(shape, ap, asuf, n)));
                }
                // Lengths too short for the widened forms.
                for n in both..k {
                    let an = self.open_at_len(shape, ap, asuf, n);
                    let bn = self.open_at_len(shape, bp, bsuf, n);
                    out.extend(self.subtract_part(&an, &bn));
                }
                // Everything from `k` up, as a product over the widened
                // prefix and suffix positions.
                let wa = self.widen(shape, ap, asuf, p, s);
                let wb = self.widen(shape, bp, bsuf, p, s);
                out.extend(self.subtract_fields(&wa, &wb, |mut fields| {
                    let suffix = fields.split_off(p);
                    Part::Open {
                        shape,
                        min_len: k,
                        prefix: fields,
                        suffix,
                    }
                }));
                out
            }

            // Different constructors of incompatible kinds never overlap.
            _ => vec![a.clone()],
        }
    }

    /// Disjoint decomposition of a product difference:
    /// `A − B = ⋃ᵢ (a₁∩b₁ × … × aᵢ₋₁∩bᵢ₋₁ × (aᵢ − bᵢ) × aᵢ₊₁ × …)`.
    fn subtract_fields(
        &self,
        a: &[Space],
        b: &[Space],
        rebuild: impl Fn(Vec<Space>) -> Part,
    ) -> Vec<Part> {
        let mut common = Vec::with_capacity(a.len());
        for (x, y) in a.iter().zip(b) {
            let both = self.intersect(x, y);
            if self.is_empty(&both) {
                return self.keep(rebuild(a.to_vec()));
            }
            common.push(both);
        }

        let mut out = Vec::new();
        for i in 0..a.len() {
            let diff = self.subtract(&a[i], &b[i]);
            if self.is_empty(&diff) {
                continue;
            }
            let fields = common[..i]
                .iter()
                .cloned()
                .chain(std::iter::once(diff))
                .chain(a[i + 1..].iter().cloned())
                .collect();
            out.extend(self.keep(rebuild(fields)));
        }
        out
    }

    fn intersect_part(&self, a: &Part, b: &Part) -> Vec<Part> {
        match (a, b) {
            (Part::Full(x), Part::Full(y)) if x == y => self.keep(a.clone()),
            (Part::Full(_), _) => self.keep(b.clone()),
            (_, Part::Full(_)) => self.keep(a.clone()),

            (Part::Ints { shape, set: x }, Part::Ints { set: y, .. }) => self.keep(Part::Ints {
                shape: *shape,
                set: x.intersect(y),
            }),

            (
                Part::Variant {
                    shape,
                    index: ia,
                    fields: fa,
                },
                Part::Variant {
                    index: ib,
                    fields: fb,
                    ..
                },
            ) if ia == ib => self.intersect_fields(fa, fb).map_or_else(Vec::new, |fields| {
                vec![Part::Variant {
                    shape: *shape,
                    index: *ia,
                    fields,
                }]
            }),

            (Part::Tuple { shape, fields: fa }, Part::Tuple { fields: fb, .. }) => self
                .intersect_fields(fa, fb)
                .map_or_else(Vec::new, |fields| {
                    vec![Part::Tuple {
                        shape: *shape,
                        fields,
                    }]
                }),

            (Part::Exact { shape, elems: ea }, Part::Exact { elems: eb, .. })
                if ea.len() == eb.len() =>
            {
                self.intersect_fields(ea, eb).map_or_else(Vec::new, |elems| {
                    vec![Part::Exact {
                        shape: *shape,
                        elems,
                    }]
                })
            }

            (
                Part::Exact { elems, .. },
                Part::Open {
                    shape,
                    min_len,
                    prefix,
                    suffix,
                },
            )
            | (
                Part::Open {
                    shape,
                    min_len,
                    prefix,
                    suffix,
                },
                Part::Exact { elems, .. },
            ) => {
                let len = to_u32(elems.len());
                if len < *min_len {
                    return Vec::new();
                }
                let exact = Part::Exact {
                    shape: *shape,
                    elems: elems.clone(),
                };
                let open = self.open_at_len(*shape, prefix, suffix, len);
                self.intersect_part(&exact, &open)
            }

            (
                Part::Open {
                    shape,
                    min_len: amin,
                    prefix: ap,
                    suffix: asuf,
                },
                Part::Open {
                    min_len: bmin,
                    prefix: bp,
                    suffix: bsuf,
                    ..
                },
            ) => {
                let shape = *shape;
                let p = ap.len().max(bp.len());
                let s = asuf.len().max(bsuf.len());
                let both = (*amin).max(*bmin);
                let k = both.max(to_u32(p + s));

                let mut out = Vec::new();
                for n in both..k {
                    let an = self.open_at_len(shape, ap, asuf, n);
                    let bn = self.open_at_len(shape, bp, bsuf, n);
                    out.extend(self.intersect_part(&an, &bn));
                }
                let wa = self.widen(shape, ap, asuf, p, s);
                let wb = self.widen(shape, bp, bsuf, p, s);
                if let Some(mut fields) = self.intersect_fields(&wa, &wb) {
                    let suffix = fields.split_off(p);
                    out.push(Part::Open {
                        shape,
                        min_len: k,
                        prefix: fields,
                        suffix,
                    });
                }
                out
            }

            _ => Vec::new(),
        }
    }

    /// Field-wise intersection, `None` if any field is empty.
    fn intersect_fields(&self, a: &[Space], b: &[Space]) -> Option<Vec<Space>> {
        a.iter()
            .zip(b)
            .map(|(x, y)| {
                let both = self.intersect(x, y);
                (!self.is_empty(&both)).then_some(both)
            })
            .collect()
    }

    /// `part` as a one-element list, or nothing if it is empty.
    fn keep(&self, part: Part) -> Vec<Part> {
        if self.is_part_empty(&part) {
            Vec::new()
        } else {
            vec![part]
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "lengths and variant counts originate from u32 shape data"
)]
fn to_u32(n: usize) -> u32 {
    n.min(u32::MAX as usize) as u32
}
