//! Scrutinee shape registry.
//!
//! A [`TypeShape`] describes the structure a pattern can inspect: sum
//! variants with their field shapes, tuples, sequences, integer domains,
//! booleans, and opaque values. Shapes are stored once in a
//! [`ShapeRegistry`] and referenced by [`ShapeId`].
//!
//! # Building
//!
//! Shapes are declared through a [`ShapeRegistryBuilder`]. Recursive types
//! reserve an id first and define it later:
//!
//! ```text
//! let list = builder.reserve();
//! let int = builder.integer(0, 9)?;
//! builder.define(list, TypeShape::sum(vec![(nil, vec![]), (cons, vec![int, list])]))?;
//! let registry = builder.build()?;
//! ```
//!
//! `build` checks that every referenced id is defined and computes, for
//! each shape, the height of its smallest value. Shapes with no finite
//! value (an empty sum, or a sum whose every variant recurses forever) are
//! uninhabited.

use rustc_hash::FxHashSet;

use crate::{Name, Value};

/// Index of a shape in a [`ShapeRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeId(u32);

impl ShapeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ShapeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Length constraint of a sequence shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum SeqLen {
    /// Arrays: every value has exactly this many elements.
    Fixed(u32),
    /// Slices: any length at or above the minimum.
    AtLeast(u32),
}

/// One variant of a sum shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantDef {
    pub tag: Name,
    /// Field shapes; the arity is `fields.len()`.
    pub fields: Vec<ShapeId>,
}

impl VariantDef {
    #[inline]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// Structure of a scrutinee.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeShape {
    /// Tagged union. Variant order defines the discriminant.
    Sum { variants: Vec<VariantDef> },
    /// Tuple or struct with positional fields.
    Product { fields: Vec<ShapeId> },
    /// Homogeneous sequence.
    Sequence { element: ShapeId, len: SeqLen },
    /// Integers in `min..=max`.
    Integer { min: i128, max: i128 },
    Bool,
    /// Only wildcards and bindings can match.
    Opaque,
}

impl TypeShape {
    /// Convenience constructor for a sum from `(tag, fields)` pairs.
    pub fn sum(variants: Vec<(Name, Vec<ShapeId>)>) -> Self {
        TypeShape::Sum {
            variants: variants
                .into_iter()
                .map(|(tag, fields)| VariantDef { tag, fields })
                .collect(),
        }
    }

    /// Short kind name, used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeShape::Sum { .. } => "sum",
            TypeShape::Product { .. } => "product",
            TypeShape::Sequence { .. } => "sequence",
            TypeShape::Integer { .. } => "integer",
            TypeShape::Bool => "bool",
            TypeShape::Opaque => "opaque",
        }
    }

    fn children(&self) -> Vec<ShapeId> {
        match self {
            TypeShape::Sum { variants } => variants
                .iter()
                .flat_map(|v| v.fields.iter().copied())
                .collect(),
            TypeShape::Product { fields } => fields.clone(),
            TypeShape::Sequence { element, .. } => vec![*element],
            TypeShape::Integer { .. } | TypeShape::Bool | TypeShape::Opaque => vec![],
        }
    }
}

/// Errors raised while declaring shapes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate tag {tag:?} in sum shape {shape:?}")]
    DuplicateTag { shape: ShapeId, tag: Name },
    #[error("empty integer domain {min}..={max}")]
    EmptyIntegerDomain { min: i128, max: i128 },
    #[error("shape {0:?} is referenced but was never defined")]
    Undefined(ShapeId),
    #[error("shape {0:?} is not part of this registry")]
    UnknownShape(ShapeId),
    #[error("shape {0:?} is already defined")]
    AlreadyDefined(ShapeId),
}

/// Mutable registry under construction.
#[derive(Default)]
pub struct ShapeRegistryBuilder {
    shapes: Vec<Option<TypeShape>>,
}

impl ShapeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id for a shape defined later (recursive types).
    pub fn reserve(&mut self) -> ShapeId {
        self.push(None)
    }

    /// Define a previously reserved shape.
    pub fn define(&mut self, id: ShapeId, shape: TypeShape) -> Result<(), RegistryError> {
        Self::validate(id, &shape)?;
        let slot = self
            .shapes
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownShape(id))?;
        if slot.is_some() {
            return Err(RegistryError::AlreadyDefined(id));
        }
        *slot = Some(shape);
        Ok(())
    }

    /// Add a fully specified shape.
    pub fn add(&mut self, shape: TypeShape) -> Result<ShapeId, RegistryError> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "`push` panics before the count leaves u32"
        )]
        let next = ShapeId(self.shapes.len() as u32);
        Self::validate(next, &shape)?;
        Ok(self.push(Some(shape)))
    }

    pub fn bool(&mut self) -> ShapeId {
        self.push(Some(TypeShape::Bool))
    }

    pub fn opaque(&mut self) -> ShapeId {
        self.push(Some(TypeShape::Opaque))
    }

    pub fn integer(&mut self, min: i128, max: i128) -> Result<ShapeId, RegistryError> {
        self.add(TypeShape::Integer { min, max })
    }

    pub fn product(&mut self, fields: Vec<ShapeId>) -> ShapeId {
        self.push(Some(TypeShape::Product { fields }))
    }

    pub fn sequence(&mut self, element: ShapeId, len: SeqLen) -> ShapeId {
        self.push(Some(TypeShape::Sequence { element, len }))
    }

    pub fn sum(&mut self, variants: Vec<(Name, Vec<ShapeId>)>) -> Result<ShapeId, RegistryError> {
        self.add(TypeShape::sum(variants))
    }

    fn push(&mut self, shape: Option<TypeShape>) -> ShapeId {
        let raw = u32::try_from(self.shapes.len()).unwrap_or_else(|_| {
            panic!("shape registry overflow: more than u32::MAX shapes")
        });
        self.shapes.push(shape);
        ShapeId(raw)
    }

    fn validate(id: ShapeId, shape: &TypeShape) -> Result<(), RegistryError> {
        match shape {
            TypeShape::Sum { variants } => {
                let mut seen = FxHashSet::default();
                for variant in variants {
                    if !seen.insert(variant.tag) {
                        return Err(RegistryError::DuplicateTag {
                            shape: id,
                            tag: variant.tag,
                        });
                    }
                }
                Ok(())
            }
            TypeShape::Integer { min, max } if min > max => {
                Err(RegistryError::EmptyIntegerDomain {
                    min: *min,
                    max: *max,
                })
            }
            _ => Ok(()),
        }
    }

    /// Seal the registry.
    pub fn build(self) -> Result<ShapeRegistry, RegistryError> {
        let mut shapes = Vec::with_capacity(self.shapes.len());
        for (i, slot) in self.shapes.into_iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "ids were issued from u32 by `push`"
            )]
            let id = ShapeId(i as u32);
            shapes.push(slot.ok_or(RegistryError::Undefined(id))?);
        }

        let len = shapes.len();
        for shape in &shapes {
            if let Some(bad) = shape.children().into_iter().find(|c| c.index() >= len) {
                return Err(RegistryError::UnknownShape(bad));
            }
        }

        let min_height = compute_min_heights(&shapes);
        Ok(ShapeRegistry { shapes, min_height })
    }
}

/// Height of the smallest value of every shape, `None` if uninhabited.
///
/// Least fixpoint by repeated relaxation: heights only ever decrease, and
/// each round either settles or lowers at least one entry.
fn compute_min_heights(shapes: &[TypeShape]) -> Vec<Option<u32>> {
    let mut heights: Vec<Option<u32>> = vec![None; shapes.len()];
    loop {
        let mut changed = false;
        for (i, shape) in shapes.iter().enumerate() {
            let candidate = shape_height(shape, &heights);
            let improves = match (candidate, heights[i]) {
                (Some(c), Some(h)) => c < h,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if improves {
                heights[i] = candidate;
                changed = true;
            }
        }
        if !changed {
            return heights;
        }
    }
}

fn fields_height(fields: &[ShapeId], heights: &[Option<u32>]) -> Option<u32> {
    fields
        .iter()
        .try_fold(0u32, |acc, f| heights[f.index()].map(|h| acc.max(h)))
        .map(|h| h + 1)
}

fn shape_height(shape: &TypeShape, heights: &[Option<u32>]) -> Option<u32> {
    match shape {
        TypeShape::Integer { .. } | TypeShape::Bool | TypeShape::Opaque => Some(1),
        TypeShape::Product { fields } => fields_height(fields, heights),
        TypeShape::Sum { variants } => variants
            .iter()
            .filter_map(|v| fields_height(&v.fields, heights))
            .min(),
        TypeShape::Sequence { element, len } => {
            let min = match len {
                SeqLen::Fixed(n) | SeqLen::AtLeast(n) => *n,
            };
            if min == 0 {
                Some(1)
            } else {
                heights[element.index()].map(|h| h + 1)
            }
        }
    }
}

/// Immutable, validated shape catalog.
#[derive(Clone, Debug)]
pub struct ShapeRegistry {
    shapes: Vec<TypeShape>,
    min_height: Vec<Option<u32>>,
}

impl ShapeRegistry {
    /// Look up a shape.
    ///
    /// # Panics
    /// Panics if `id` was issued by a different registry.
    #[inline]
    pub fn shape(&self, id: ShapeId) -> &TypeShape {
        &self.shapes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        id.index() < self.shapes.len()
    }

    /// Whether the shape has at least one finite value.
    #[inline]
    pub fn is_inhabited(&self, id: ShapeId) -> bool {
        self.min_height[id.index()].is_some()
    }

    /// Height of the smallest value of `id`, if any.
    pub fn min_height(&self, id: ShapeId) -> Option<u32> {
        self.min_height[id.index()]
    }

    /// Variants of a sum shape; empty for any other shape.
    pub fn variants(&self, id: ShapeId) -> &[VariantDef] {
        match self.shape(id) {
            TypeShape::Sum { variants } => variants,
            _ => &[],
        }
    }

    /// Discriminant of `tag` within a sum shape.
    pub fn variant_index(&self, id: ShapeId, tag: Name) -> Option<u32> {
        self.variants(id)
            .iter()
            .position(|v| v.tag == tag)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Whether the variant can be constructed.
    pub fn is_variant_inhabited(&self, variant: &VariantDef) -> bool {
        variant.fields.iter().all(|&f| self.is_inhabited(f))
    }

    /// The smallest value of a shape.
    ///
    /// Deterministic: integers pick the lower domain bound, booleans pick
    /// `false`, sums pick the lowest-index variant whose value has the
    /// minimum height, and sequences pick their minimum length. Because
    /// the chosen variant always has strictly lower-height fields, the
    /// recursion terminates even for recursive shapes.
    pub fn inhabitant(&self, id: ShapeId) -> Option<Value> {
        let height = self.min_height(id)?;
        match self.shape(id) {
            TypeShape::Integer { min, .. } => Some(Value::Int(*min)),
            TypeShape::Bool => Some(Value::Bool(false)),
            TypeShape::Opaque => Some(Value::Opaque(Name::EMPTY)),
            TypeShape::Product { fields } => fields
                .iter()
                .map(|&f| self.inhabitant(f))
                .collect::<Option<Vec<_>>>()
                .map(Value::Tuple),
            TypeShape::Sum { variants } => {
                let (index, variant) = variants
                    .iter()
                    .enumerate()
                    .find(|(_, v)| fields_height(&v.fields, &self.min_height) == Some(height))?;
                let fields = variant
                    .fields
                    .iter()
                    .map(|&f| self.inhabitant(f))
                    .collect::<Option<Vec<_>>>()?;
                Some(Value::Variant {
                    index: u32::try_from(index).ok()?,
                    fields,
                })
            }
            TypeShape::Sequence { element, len } => {
                let n = match len {
                    SeqLen::Fixed(n) | SeqLen::AtLeast(n) => *n as usize,
                };
                if n == 0 {
                    return Some(Value::Sequence(Vec::new()));
                }
                let elem = self.inhabitant(*element)?;
                Some(Value::Sequence(vec![elem; n]))
            }
        }
    }

    /// Whether `value` is a well-formed value of shape `id`.
    pub fn admits(&self, id: ShapeId, value: &Value) -> bool {
        match (self.shape(id), value) {
            (TypeShape::Integer { min, max }, Value::Int(v)) => min <= v && v <= max,
            (TypeShape::Bool, Value::Bool(_)) | (TypeShape::Opaque, Value::Opaque(_)) => true,
            (TypeShape::Product { fields }, Value::Tuple(items)) => {
                fields.len() == items.len()
                    && fields.iter().zip(items).all(|(&f, v)| self.admits(f, v))
            }
            (TypeShape::Sum { variants }, Value::Variant { index, fields }) => variants
                .get(*index as usize)
                .is_some_and(|def| {
                    def.fields.len() == fields.len()
                        && def.fields.iter().zip(fields).all(|(&f, v)| self.admits(f, v))
                }),
            (TypeShape::Sequence { element, len }, Value::Sequence(items)) => {
                let len_ok = match len {
                    SeqLen::Fixed(n) => items.len() == *n as usize,
                    SeqLen::AtLeast(n) => items.len() >= *n as usize,
                };
                len_ok && items.iter().all(|v| self.admits(*element, v))
            }
            _ => false,
        }
    }
}
