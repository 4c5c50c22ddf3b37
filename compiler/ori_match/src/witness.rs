//! Witness sampling: concrete values drawn from a space.
//!
//! Every part contributes its smallest member first (lowest variant index,
//! lowest interval bound, shortest sequence); unconstrained sub-shapes use
//! the registry's minimum-height inhabitant, so sampling terminates on
//! recursive shapes. Integer parts contribute one value per disjoint
//! interval, so a remainder like `{0} ∪ 11..=255` yields both `0` and `11`.

use ori_match_ir::{ShapeId, ShapeRegistry, TypeShape, Value};

use crate::space::{Part, Space, SpaceCx};

/// Up to `limit` distinct values of `space`, smallest first.
pub fn sample(cx: &SpaceCx<'_>, space: &Space, limit: usize) -> Vec<Value> {
    let limit = limit.max(1);
    let mut out = Sampler { cx, limit }.space(space);
    out.sort_by(Value::witness_cmp);
    out.dedup();
    out.truncate(limit);
    out
}

struct Sampler<'a, 'cx> {
    cx: &'a SpaceCx<'cx>,
    limit: usize,
}

impl Sampler<'_, '_> {
    fn registry(&self) -> &ShapeRegistry {
        self.cx.registry
    }

    fn space(&self, space: &Space) -> Vec<Value> {
        let mut out = Vec::new();
        for part in space.parts() {
            if self.cx.is_part_empty(part) {
                continue;
            }
            out.extend(self.part(part));
        }
        out
    }

    fn part(&self, part: &Part) -> Vec<Value> {
        match part {
            Part::Full(shape) => self.registry().inhabitant(*shape).into_iter().collect(),
            Part::Ints { shape, set } => self.ints(*shape, set.ranges()),
            Part::Variant {
                index, fields, ..
            } => self
                .product(fields)
                .into_iter()
                .map(|fields| Value::Variant {
                    index: *index,
                    fields,
                })
                .collect(),
            Part::Tuple { fields, .. } => {
                self.product(fields).into_iter().map(Value::Tuple).collect()
            }
            Part::Exact { elems, .. } => {
                self.product(elems).into_iter().map(Value::Sequence).collect()
            }
            Part::Open {
                shape,
                min_len,
                prefix,
                suffix,
            } => {
                let middle = (*min_len as usize).saturating_sub(prefix.len() + suffix.len());
                let filler = if middle == 0 {
                    None
                } else {
                    let TypeShape::Sequence { element, .. } = self.registry().shape(*shape) else {
                        return Vec::new();
                    };
                    match self.registry().inhabitant(*element) {
                        Some(v) => Some(v),
                        None => return Vec::new(),
                    }
                };
                let p = prefix.len();
                let fields: Vec<Space> = prefix.iter().chain(suffix).cloned().collect();
                self.product(&fields)
                    .into_iter()
                    .map(|mut elems| {
                        let tail = elems.split_off(p);
                        if let Some(v) = &filler {
                            elems.extend(std::iter::repeat(v.clone()).take(middle));
                        }
                        elems.extend(tail);
                        Value::Sequence(elems)
                    })
                    .collect()
            }
        }
    }

    fn ints(&self, shape: ShapeId, ranges: &[(i128, i128)]) -> Vec<Value> {
        match self.registry().shape(shape) {
            TypeShape::Bool => [false, true]
                .into_iter()
                .filter(|&b| {
                    let v = i128::from(b);
                    ranges.iter().any(|&(lo, hi)| lo <= v && v <= hi)
                })
                .map(Value::Bool)
                .collect(),
            _ => ranges
                .iter()
                .take(self.limit)
                .map(|&(lo, _)| Value::Int(lo))
                .collect(),
        }
    }

    /// Field tuples: all fields at their first sample, then one field at a
    /// time moved to each of its other samples.
    fn product(&self, fields: &[Space]) -> Vec<Vec<Value>> {
        let per_field: Vec<Vec<Value>> = fields.iter().map(|f| self.space(f)).collect();
        let Some(base) = per_field
            .iter()
            .map(|samples| samples.first().cloned())
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };

        let mut out = vec![base.clone()];
        for (i, samples) in per_field.iter().enumerate() {
            for v in samples.iter().skip(1) {
                if out.len() >= self.limit {
                    return out;
                }
                let mut row = base.clone();
                row[i] = v.clone();
                out.push(row);
            }
        }
        out
    }
}
