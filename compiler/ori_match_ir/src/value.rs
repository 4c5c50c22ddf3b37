//! Concrete scrutinee values.
//!
//! Values are what the decision tree evaluator walks and what witnesses are
//! made of. Sum values carry their discriminant, not their tag name, so a
//! value is only meaningful together with the shape it was built for.

use std::cmp::Ordering;
use std::fmt;

use crate::{Name, ShapeId, ShapeRegistry, StringLookup, TypeShape};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i128),
    Bool(bool),
    /// A sum value: discriminant plus payload.
    Variant { index: u32, fields: Vec<Value> },
    Tuple(Vec<Value>),
    Sequence(Vec<Value>),
    /// A value of an opaque shape. The name identifies it (e.g. string contents).
    Opaque(Name),
}

impl Value {
    /// Shorthand for a payload-free variant.
    pub fn unit_variant(index: u32) -> Self {
        Value::Variant {
            index,
            fields: Vec::new(),
        }
    }

    /// Witness ordering: smaller integers, `false` before `true`, lower
    /// variant indices, shorter sequences, then element-wise.
    pub fn witness_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (
                Value::Variant {
                    index: a,
                    fields: fa,
                },
                Value::Variant {
                    index: b,
                    fields: fb,
                },
            ) => a.cmp(b).then_with(|| cmp_elements(fa, fb)),
            (Value::Tuple(a), Value::Tuple(b)) => cmp_elements(a, b),
            (Value::Sequence(a), Value::Sequence(b)) => {
                a.len().cmp(&b.len()).then_with(|| cmp_elements(a, b))
            }
            (Value::Opaque(a), Value::Opaque(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Bool(_) => 1,
            Value::Variant { .. } => 2,
            Value::Tuple(_) => 3,
            Value::Sequence(_) => 4,
            Value::Opaque(_) => 5,
        }
    }

    /// Render with tag names resolved through the registry.
    pub fn display<'a, I: StringLookup>(
        &'a self,
        shape: ShapeId,
        registry: &'a ShapeRegistry,
        interner: &'a I,
    ) -> ValueDisplay<'a, I> {
        ValueDisplay {
            value: self,
            shape,
            registry,
            interner,
        }
    }
}

fn cmp_elements(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = x.witness_cmp(y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Display adapter returned by [`Value::display`].
pub struct ValueDisplay<'a, I> {
    value: &'a Value,
    shape: ShapeId,
    registry: &'a ShapeRegistry,
    interner: &'a I,
}

impl<I: StringLookup> ValueDisplay<'_, I> {
    fn child<'b>(&'b self, value: &'b Value, shape: ShapeId) -> ValueDisplay<'b, I> {
        ValueDisplay {
            value,
            shape,
            registry: self.registry,
            interner: self.interner,
        }
    }

    fn list(
        &self,
        f: &mut fmt::Formatter<'_>,
        items: &[Value],
        shapes: impl Iterator<Item = ShapeId>,
    ) -> fmt::Result {
        for (i, (item, shape)) in items.iter().zip(shapes).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.child(item, shape))?;
        }
        Ok(())
    }
}

impl<I: StringLookup> fmt::Display for ValueDisplay<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value, self.registry.shape(self.shape)) {
            (Value::Int(v), _) => write!(f, "{v}"),
            (Value::Bool(b), _) => write!(f, "{b}"),
            (Value::Opaque(_), _) => f.write_str("_"),
            (Value::Variant { index, fields }, TypeShape::Sum { variants }) => {
                let Some(def) = variants.get(*index as usize) else {
                    return write!(f, "<variant {index}>");
                };
                f.write_str(self.interner.lookup(def.tag))?;
                if !fields.is_empty() {
                    f.write_str("(")?;
                    self.list(f, fields, def.fields.iter().copied())?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            (Value::Tuple(items), TypeShape::Product { fields }) => {
                f.write_str("(")?;
                self.list(f, items, fields.iter().copied())?;
                f.write_str(")")
            }
            (Value::Sequence(items), TypeShape::Sequence { element, .. }) => {
                f.write_str("[")?;
                self.list(f, items, std::iter::repeat(*element))?;
                f.write_str("]")
            }
            (value, _) => write!(f, "{value:?}"),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::{SeqLen, ShapeRegistryBuilder, StringInterner};

    #[test]
    fn witness_order_prefers_short_sequences() {
        let short = Value::Sequence(vec![Value::Int(9)]);
        let long = Value::Sequence(vec![Value::Int(0), Value::Int(0)]);
        assert_eq!(short.witness_cmp(&long), Ordering::Less);
    }

    #[test]
    fn witness_order_compares_variant_index_first() {
        let a = Value::Variant {
            index: 0,
            fields: vec![Value::Int(100)],
        };
        let b = Value::unit_variant(1);
        assert_eq!(a.witness_cmp(&b), Ordering::Less);
    }

    #[test]
    fn display_resolves_tags() {
        let interner = StringInterner::new();
        let mut builder = ShapeRegistryBuilder::new();
        let int = builder.integer(0, 10).unwrap();
        let flag = builder.bool();
        let seq = builder.sequence(flag, SeqLen::AtLeast(0));
        let msg = builder
            .sum(vec![
                (interner.intern("Quit"), vec![]),
                (interner.intern("Move"), vec![int, int]),
            ])
            .unwrap();
        let pair = builder.product(vec![msg, seq]);
        let registry = builder.build().unwrap();

        let value = Value::Tuple(vec![
            Value::Variant {
                index: 1,
                fields: vec![Value::Int(1), Value::Int(2)],
            },
            Value::Sequence(vec![Value::Bool(true)]),
        ]);
        assert_eq!(
            value.display(pair, &registry, &interner).to_string(),
            "(Move(1, 2), [true])"
        );
        assert_eq!(
            Value::unit_variant(0)
                .display(msg, &registry, &interner)
                .to_string(),
            "Quit"
        );
    }
}
