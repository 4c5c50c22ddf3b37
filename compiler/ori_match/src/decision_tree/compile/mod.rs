//! Decision tree construction via the Maranget (2008) algorithm.
//!
//! Compiles a [`PatternMatrix`] into a [`DecisionTree`] by repeatedly
//! selecting a column, testing the value it stands for, and specializing
//! the matrix for each outcome.
//!
//! # Algorithm
//!
//! 1. **Base cases**: a column of uninhabited shape → a `Switch` with no
//!    edges; empty matrix → `Fail`; first row all wildcards → `Leaf`, or
//!    `Guard` whose `on_fail` holds the remaining rows
//! 2. **Pick column**: see [`ColumnHeuristic`]
//! 3. **Normalize**: at the chosen column, `x @ p` becomes a binding plus
//!    `p`, and or-patterns become one row per alternative, in order
//! 4. **Switch** on the column's shape:
//!    - products and fixed-length sequences decompose without a test
//!    - sums switch on the discriminant, one edge per mentioned variant
//!    - integers split into elementary intervals; adjacent intervals that
//!      lead to the same rows share one edge
//!    - open sequences test the length first, then their elements
//! 5. **Default**: values no edge covers continue with the wildcard rows
//!
//! Edges are only emitted for values that exist (inhabited variants,
//! in-domain integers, possible lengths), and positions no value reaches
//! get no `Fail`, so a `Fail` node is reachable exactly when some value
//! matches no arm.
//!
//! # References
//!
//! - Maranget (2008) "Compiling Pattern Matching to Good Decision Trees"
//! - Roc `crates/compiler/mono/src/ir/decision_tree.rs`

use std::cmp::Reverse;

use ori_match_ir::{
    DecisionTree, GuardId, Name, PathInstruction, RestPattern, ScrutineePath, SeqLen, ShapeId,
    ShapeRegistry, TestKind, TestValue, TypeShape, VariantDef,
};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::config::ColumnHeuristic;
use crate::flatten::{FlatPattern, LoweredArm};

/// One row of the pattern matrix: the remaining sub-patterns of an arm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PatternRow {
    pub patterns: Vec<FlatPattern>,
    pub arm_index: usize,
    pub guard: Option<GuardId>,
    /// Bindings already consumed from columns that were tested away.
    pub bindings: Vec<(Name, ScrutineePath)>,
}

pub(crate) type PatternMatrix = Vec<PatternRow>;

/// The sub-value a matrix column stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Column {
    pub path: ScrutineePath,
    pub shape: ShapeId,
}

/// What a specialized row puts in place of the consumed column.
struct Sub {
    patterns: Vec<FlatPattern>,
    rest_binding: Option<(Name, ScrutineePath)>,
}

impl Sub {
    fn plain(patterns: Vec<FlatPattern>) -> Self {
        Sub {
            patterns,
            rest_binding: None,
        }
    }
}

pub(crate) struct Compiler<'a> {
    registry: &'a ShapeRegistry,
    heuristic: ColumnHeuristic,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a ShapeRegistry, heuristic: ColumnHeuristic) -> Self {
        Self {
            registry,
            heuristic,
        }
    }

    /// Compile lowered arms matched against a scrutinee of `shape`.
    pub fn compile_arms(&self, shape: ShapeId, arms: &[LoweredArm]) -> DecisionTree {
        let matrix = arms
            .iter()
            .enumerate()
            .map(|(arm_index, arm)| PatternRow {
                patterns: vec![arm.pattern.clone()],
                arm_index,
                guard: arm.guard,
                bindings: Vec::new(),
            })
            .collect();
        let root = Column {
            path: ScrutineePath::new(),
            shape,
        };
        self.compile(matrix, vec![root])
    }

    #[expect(
        clippy::needless_pass_by_value,
        reason = "recursive: sub-calls pass owned specialized matrices"
    )]
    fn compile(&self, matrix: PatternMatrix, cols: Vec<Column>) -> DecisionTree {
        check_width(&matrix, &cols);

        // 1. Base cases.
        if let Some(node) = self.unreachable_node(&cols) {
            return node;
        }
        let Some(first) = matrix.first() else {
            return DecisionTree::Fail;
        };
        if first.patterns.iter().all(FlatPattern::is_wildcard_like) {
            let bindings = extract_all_bindings(first, &cols);
            if let Some(guard) = first.guard {
                let on_fail = self.compile(matrix[1..].to_vec(), cols);
                return DecisionTree::Guard {
                    arm_index: first.arm_index,
                    bindings,
                    guard,
                    on_fail: Box::new(on_fail),
                };
            }
            return DecisionTree::Leaf {
                arm_index: first.arm_index,
                bindings,
            };
        }

        // 2-3. Pick and normalize a column.
        let col = self.pick_column(&matrix);
        let matrix = normalize_column(matrix, col, &cols[col].path);
        if matrix
            .first()
            .map_or(true, |row| row.patterns[col] == FlatPattern::Wildcard)
        {
            return self.compile(matrix, cols);
        }

        // 4. Switch on the column's shape.
        let column = cols[col].clone();
        match self.registry.shape(column.shape) {
            TypeShape::Product { fields } => {
                trace!(col, rows = matrix.len(), "decompose product");
                let sub_cols: Vec<Column> = fields
                    .iter()
                    .enumerate()
                    .map(|(i, &shape)| Column {
                        path: child_path(&column.path, PathInstruction::TupleIndex(to_u32(i))),
                        shape,
                    })
                    .collect();
                let arity = sub_cols.len();
                let sub = specialize(&matrix, col, |pat| match pat {
                    FlatPattern::Tuple(fields) => Some(Sub::plain(fields.clone())),
                    FlatPattern::Wildcard => Some(Sub::plain(wildcards(arity))),
                    _ => None,
                });
                self.compile(sub, replace_column(&cols, col, sub_cols))
            }

            TypeShape::Sequence {
                element,
                len: SeqLen::Fixed(n),
            } => {
                trace!(col, rows = matrix.len(), len = *n, "decompose array");
                let sub = specialize_len(&matrix, col, &column.path, *n);
                self.compile(
                    sub,
                    replace_column(&cols, col, element_columns(&column.path, *element, *n)),
                )
            }

            TypeShape::Sequence {
                element,
                len: SeqLen::AtLeast(min),
            } => self.switch_len(&matrix, &cols, col, *element, *min),

            TypeShape::Sum { variants } => self.switch_tag(&matrix, &cols, col, variants),

            TypeShape::Bool => self.switch_bool(&matrix, &cols, col),

            TypeShape::Integer { min, max } => self.switch_int(&matrix, &cols, col, *min, *max),

            // Opaque values admit only wildcards, which normalization
            // already turned into bindings.
            TypeShape::Opaque => {
                let sub = specialize(&matrix, col, |_| Some(Sub::plain(Vec::new())));
                self.compile(sub, remove_column(&cols, col))
            }
        }
    }

    /// A `Switch` with no edges and no default, for positions where some
    /// column has no values. It tests the innermost uninhabited sub-value.
    fn unreachable_node(&self, cols: &[Column]) -> Option<DecisionTree> {
        let column = cols.iter().find(|c| !self.registry.is_inhabited(c.shape))?;
        let mut path = column.path.clone();
        let mut shape = column.shape;
        // Bounded: products may refer to themselves through reserved ids.
        for _ in 0..self.registry.len() {
            let inner = match self.registry.shape(shape) {
                TypeShape::Product { fields } => fields
                    .iter()
                    .enumerate()
                    .find(|(_, field)| !self.registry.is_inhabited(**field))
                    .map(|(i, &field)| (PathInstruction::TupleIndex(to_u32(i)), field)),
                TypeShape::Sequence {
                    element,
                    len: SeqLen::Fixed(_),
                } => Some((PathInstruction::SeqIndex(0), *element)),
                _ => None,
            };
            let Some((instr, field)) = inner else {
                break;
            };
            path.push(instr);
            shape = field;
        }
        let test_kind = match self.registry.shape(shape) {
            TypeShape::Sequence { .. } => TestKind::SeqLen,
            _ => TestKind::Tag,
        };
        trace!(?path, "unreachable position");
        Some(DecisionTree::Switch {
            path,
            shape,
            test_kind,
            edges: Vec::new(),
            default: None,
        })
    }

    // Column selection

    fn pick_column(&self, matrix: &PatternMatrix) -> usize {
        let first = &matrix[0].patterns;
        let mut needed = (0..first.len()).filter(|&c| !first[c].is_wildcard_like());
        match self.heuristic {
            ColumnHeuristic::Leftmost => needed.next().unwrap_or(0),
            ColumnHeuristic::Necessity => needed
                .max_by_key(|&c| {
                    let rows = matrix
                        .iter()
                        .filter(|row| !row.patterns[c].is_wildcard_like())
                        .count();
                    (rows, Reverse(count_distinct_constructors(matrix, c)), Reverse(c))
                })
                .unwrap_or(0),
        }
    }

    // Switches

    fn switch_tag(
        &self,
        matrix: &PatternMatrix,
        cols: &[Column],
        col: usize,
        variants: &[VariantDef],
    ) -> DecisionTree {
        let column = &cols[col];

        // Variants in order of first mention.
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        for row in matrix {
            if let FlatPattern::Variant { index, .. } = row.patterns[col] {
                if seen.insert(index) {
                    order.push(index);
                }
            }
        }
        trace!(col, rows = matrix.len(), variants = order.len(), "switch on tag");

        let edges = order
            .into_iter()
            .filter(|&index| self.registry.is_variant_inhabited(&variants[index as usize]))
            .map(|index| {
                let def = &variants[index as usize];
                let arity = def.arity();
                let sub = specialize(matrix, col, |pat| match pat {
                    FlatPattern::Variant { index: i, fields, .. } if *i == index => {
                        Some(Sub::plain(fields.clone()))
                    }
                    FlatPattern::Wildcard => Some(Sub::plain(wildcards(arity))),
                    _ => None,
                });
                let sub_cols = def
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, &shape)| Column {
                        path: child_path(&column.path, PathInstruction::TagPayload(to_u32(i))),
                        shape,
                    })
                    .collect();
                let tree = self.compile(sub, replace_column(cols, col, sub_cols));
                (
                    TestValue::Tag {
                        variant_index: index,
                        tag: def.tag,
                    },
                    tree,
                )
            })
            .collect();

        let complete = variants.iter().enumerate().all(|(i, v)| {
            seen.contains(&to_u32(i)) || !self.registry.is_variant_inhabited(v)
        });
        self.switch(matrix, cols, col, TestKind::Tag, edges, !complete)
    }

    fn switch_bool(&self, matrix: &PatternMatrix, cols: &[Column], col: usize) -> DecisionTree {
        let mut order = Vec::new();
        for row in matrix {
            if let FlatPattern::Bool(b) = row.patterns[col] {
                if !order.contains(&b) {
                    order.push(b);
                }
            }
        }
        trace!(col, rows = matrix.len(), "switch on bool");

        let sub_cols = remove_column(cols, col);
        let edges = order
            .iter()
            .map(|&value| {
                let sub = specialize(matrix, col, |pat| match pat {
                    FlatPattern::Bool(b) if *b == value => Some(Sub::plain(Vec::new())),
                    FlatPattern::Wildcard => Some(Sub::plain(Vec::new())),
                    _ => None,
                });
                (TestValue::Bool(value), self.compile(sub, sub_cols.clone()))
            })
            .collect();
        self.switch(matrix, cols, col, TestKind::Bool, edges, order.len() < 2)
    }

    /// Split the domain at every range boundary in the column. Each
    /// elementary interval is either inside or outside each range, so one
    /// representative decides which rows it keeps.
    fn switch_int(
        &self,
        matrix: &PatternMatrix,
        cols: &[Column],
        col: usize,
        min: i128,
        max: i128,
    ) -> DecisionTree {
        let mut cuts = vec![min];
        for row in matrix {
            if let FlatPattern::IntRange { lo, hi } = row.patterns[col] {
                cuts.push(lo);
                if hi < max {
                    cuts.push(hi + 1);
                }
            }
        }
        cuts.sort_unstable();
        cuts.dedup();

        let mut has_gap = false;
        // (lo, hi, rows) per edge; adjacent intervals with equal rows merge.
        let mut segments: Vec<(i128, i128, PatternMatrix)> = Vec::new();
        for (i, &lo) in cuts.iter().enumerate() {
            let hi = cuts.get(i + 1).map_or(max, |next| next - 1);
            let tested = matrix.iter().any(|row| {
                matches!(row.patterns[col], FlatPattern::IntRange { lo: a, hi: b } if a <= lo && lo <= b)
            });
            if !tested {
                has_gap = true;
                continue;
            }
            let sub = specialize(matrix, col, |pat| match pat {
                FlatPattern::IntRange { lo: a, hi: b } if *a <= lo && lo <= *b => {
                    Some(Sub::plain(Vec::new()))
                }
                FlatPattern::Wildcard => Some(Sub::plain(Vec::new())),
                _ => None,
            });
            match segments.last_mut() {
                Some((_, prev_hi, prev_rows)) if *prev_hi + 1 == lo && *prev_rows == sub => {
                    *prev_hi = hi;
                }
                _ => segments.push((lo, hi, sub)),
            }
        }
        trace!(col, rows = matrix.len(), edges = segments.len(), has_gap, "switch on int");

        let sub_cols = remove_column(cols, col);
        let edges = segments
            .into_iter()
            .map(|(lo, hi, sub)| {
                let value = if lo == hi {
                    TestValue::Int(lo)
                } else {
                    TestValue::IntRange { lo, hi }
                };
                (value, self.compile(sub, sub_cols.clone()))
            })
            .collect();
        self.switch(matrix, cols, col, TestKind::Int, edges, has_gap)
    }

    /// Length switch for sequences of at least `min` elements.
    ///
    /// Lengths below `open_len` get an exact edge each (when some row
    /// tests them); all longer sequences share one at-least edge whose
    /// columns are the widest prefix and suffix any rest pattern uses.
    fn switch_len(
        &self,
        matrix: &PatternMatrix,
        cols: &[Column],
        col: usize,
        element: ShapeId,
        min: u32,
    ) -> DecisionTree {
        let path = &cols[col].path;
        let (mut max_prefix, mut max_suffix) = (0usize, 0usize);
        let mut max_exact: Option<usize> = None;
        let mut has_rest = false;
        for row in matrix {
            if let FlatPattern::Seq {
                prefix,
                rest,
                suffix,
            } = &row.patterns[col]
            {
                if rest.is_some() {
                    has_rest = true;
                    max_prefix = max_prefix.max(prefix.len());
                    max_suffix = max_suffix.max(suffix.len());
                } else {
                    let len = prefix.len() + suffix.len();
                    max_exact = Some(max_exact.map_or(len, |m| m.max(len)));
                }
            }
        }

        let mut open_len = min.max(to_u32(max_prefix + max_suffix));
        if let Some(exact) = max_exact {
            open_len = open_len.max(to_u32(exact + 1));
        }
        let element_inhabited = self.registry.is_inhabited(element);
        // Without elements, the empty sequence is the only value.
        let exact_lens: Vec<u32> = if element_inhabited {
            (min..open_len).collect()
        } else if min == 0 {
            vec![0]
        } else {
            Vec::new()
        };
        trace!(col, rows = matrix.len(), open_len, has_rest, "switch on length");

        let mut has_gap = element_inhabited && !has_rest;
        let mut edges = Vec::new();
        for n in exact_lens {
            let tested = matrix
                .iter()
                .any(|row| seq_admits_len(&row.patterns[col], n as usize));
            if !tested {
                has_gap = true;
                continue;
            }
            let sub = specialize_len(matrix, col, path, n);
            let tree = self.compile(
                sub,
                replace_column(cols, col, element_columns(path, element, n)),
            );
            edges.push((TestValue::SeqLen { len: n, is_exact: true }, tree));
        }

        if element_inhabited && has_rest {
            let sub = specialize(matrix, col, |pat| match pat {
                FlatPattern::Seq {
                    prefix,
                    rest: Some(rest),
                    suffix,
                } => {
                    let mut patterns = prefix.clone();
                    patterns.extend(wildcards(max_prefix - prefix.len()));
                    patterns.extend(wildcards(max_suffix - suffix.len()));
                    patterns.extend(suffix.iter().cloned());
                    Some(Sub {
                        patterns,
                        rest_binding: rest_binding(*rest, path, prefix.len(), suffix.len()),
                    })
                }
                FlatPattern::Wildcard => Some(Sub::plain(wildcards(max_prefix + max_suffix))),
                _ => None,
            });
            let mut sub_cols = Vec::with_capacity(max_prefix + max_suffix);
            sub_cols.extend((0..max_prefix).map(|i| Column {
                path: child_path(path, PathInstruction::SeqIndex(to_u32(i))),
                shape: element,
            }));
            sub_cols.extend((0..max_suffix).map(|j| Column {
                path: child_path(path, PathInstruction::SeqFromEnd(to_u32(max_suffix - j))),
                shape: element,
            }));
            let tree = self.compile(sub, replace_column(cols, col, sub_cols));
            edges.push((
                TestValue::SeqLen {
                    len: open_len,
                    is_exact: false,
                },
                tree,
            ));
        }

        self.switch(matrix, cols, col, TestKind::SeqLen, edges, has_gap)
    }

    /// Assemble a `Switch`; values outside every edge continue with the
    /// wildcard rows.
    fn switch(
        &self,
        matrix: &PatternMatrix,
        cols: &[Column],
        col: usize,
        test_kind: TestKind,
        edges: Vec<(TestValue, DecisionTree)>,
        needs_default: bool,
    ) -> DecisionTree {
        let default = needs_default.then(|| {
            let rows = specialize(matrix, col, |pat| {
                matches!(pat, FlatPattern::Wildcard).then(|| Sub::plain(Vec::new()))
            });
            Box::new(self.compile(rows, remove_column(cols, col)))
        });
        DecisionTree::Switch {
            path: cols[col].path.clone(),
            shape: cols[col].shape,
            test_kind,
            edges,
            default,
        }
    }
}

// Matrix helpers

/// Replace column `col` of every row by what `expand` returns; rows for
/// which it returns `None` are dropped.
fn specialize(
    matrix: &PatternMatrix,
    col: usize,
    mut expand: impl FnMut(&FlatPattern) -> Option<Sub>,
) -> PatternMatrix {
    matrix
        .iter()
        .filter_map(|row| {
            let sub = expand(&row.patterns[col])?;
            let mut patterns = Vec::with_capacity(row.patterns.len() - 1 + sub.patterns.len());
            patterns.extend_from_slice(&row.patterns[..col]);
            patterns.extend(sub.patterns);
            patterns.extend_from_slice(&row.patterns[col + 1..]);
            let mut bindings = row.bindings.clone();
            bindings.extend(sub.rest_binding);
            Some(PatternRow {
                patterns,
                arm_index: row.arm_index,
                guard: row.guard,
                bindings,
            })
        })
        .collect()
}

/// Specialize a sequence column to sequences of exactly `n` elements.
fn specialize_len(matrix: &PatternMatrix, col: usize, path: &ScrutineePath, n: u32) -> PatternMatrix {
    let n = n as usize;
    specialize(matrix, col, |pat| match pat {
        FlatPattern::Seq {
            prefix,
            rest,
            suffix,
        } if seq_admits_len(pat, n) => {
            let mut patterns = prefix.clone();
            patterns.extend(wildcards(n - prefix.len() - suffix.len()));
            patterns.extend(suffix.iter().cloned());
            Some(Sub {
                patterns,
                rest_binding: rest.and_then(|r| rest_binding(r, path, prefix.len(), suffix.len())),
            })
        }
        FlatPattern::Wildcard => Some(Sub::plain(wildcards(n))),
        _ => None,
    })
}

fn seq_admits_len(pat: &FlatPattern, n: usize) -> bool {
    match pat {
        FlatPattern::Seq {
            prefix,
            rest,
            suffix,
        } => {
            let needed = prefix.len() + suffix.len();
            if rest.is_some() {
                needed <= n
            } else {
                needed == n
            }
        }
        _ => false,
    }
}

fn rest_binding(
    rest: RestPattern,
    path: &ScrutineePath,
    prefix: usize,
    suffix: usize,
) -> Option<(Name, ScrutineePath)> {
    rest.binding.map(|name| {
        let slice = PathInstruction::SeqSlice {
            start: to_u32(prefix),
            end: to_u32(suffix),
        };
        (name, child_path(path, slice))
    })
}

/// Move `x @ p`, bare bindings and or-patterns out of column `col`.
fn normalize_column(matrix: PatternMatrix, col: usize, path: &ScrutineePath) -> PatternMatrix {
    let mut out = Vec::with_capacity(matrix.len());
    for row in matrix {
        normalize_row(row, col, path, &mut out);
    }
    out
}

fn normalize_row(
    mut row: PatternRow,
    col: usize,
    path: &ScrutineePath,
    out: &mut PatternMatrix,
) {
    match std::mem::replace(&mut row.patterns[col], FlatPattern::Wildcard) {
        FlatPattern::Binding(name) => {
            row.bindings.push((name, path.clone()));
            out.push(row);
        }
        FlatPattern::At { name, inner } => {
            row.bindings.push((name, path.clone()));
            row.patterns[col] = *inner;
            normalize_row(row, col, path, out);
        }
        FlatPattern::Or(alts) => {
            for alt in alts {
                let mut alt_row = row.clone();
                alt_row.patterns[col] = alt;
                normalize_row(alt_row, col, path, out);
            }
        }
        other => {
            row.patterns[col] = other;
            out.push(row);
        }
    }
}

/// Bindings for a row whose remaining patterns are all wildcard-like.
fn extract_all_bindings(row: &PatternRow, cols: &[Column]) -> Vec<(Name, ScrutineePath)> {
    let mut bindings = row.bindings.clone();
    for (pat, column) in row.patterns.iter().zip(cols) {
        collect_consumed_bindings(pat, &column.path, &mut bindings);
    }
    bindings
}

fn collect_consumed_bindings(
    pat: &FlatPattern,
    path: &ScrutineePath,
    out: &mut Vec<(Name, ScrutineePath)>,
) {
    match pat {
        FlatPattern::Binding(name) => out.push((*name, path.clone())),
        FlatPattern::At { name, inner } => {
            out.push((*name, path.clone()));
            collect_consumed_bindings(inner, path, out);
        }
        // Only the first alternative can be the one that matched here.
        FlatPattern::Or(alts) => {
            if let Some(first) = alts.first() {
                collect_consumed_bindings(first, path, out);
            }
        }
        _ => {}
    }
}

fn count_distinct_constructors(matrix: &PatternMatrix, col: usize) -> usize {
    let mut seen = FxHashSet::default();
    for row in matrix {
        if let Some(key) = constructor_key(&row.patterns[col]) {
            seen.insert(key);
        }
    }
    seen.len()
}

/// Identifies a constructor, ignoring sub-patterns.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ConstructorKey {
    Variant(u32),
    Ints(i128, i128),
    Bool(bool),
    Tuple,
    Seq(usize, bool),
}

fn constructor_key(pat: &FlatPattern) -> Option<ConstructorKey> {
    match pat {
        FlatPattern::Wildcard | FlatPattern::Binding(_) => None,
        FlatPattern::At { inner, .. } => constructor_key(inner),
        FlatPattern::IntRange { lo, hi } => Some(ConstructorKey::Ints(*lo, *hi)),
        FlatPattern::Bool(b) => Some(ConstructorKey::Bool(*b)),
        FlatPattern::Variant { index, .. } => Some(ConstructorKey::Variant(*index)),
        FlatPattern::Tuple(_) => Some(ConstructorKey::Tuple),
        FlatPattern::Seq {
            prefix,
            rest,
            suffix,
        } => Some(ConstructorKey::Seq(prefix.len() + suffix.len(), rest.is_some())),
        FlatPattern::Or(alts) => alts.first().and_then(constructor_key),
    }
}

fn wildcards(n: usize) -> Vec<FlatPattern> {
    vec![FlatPattern::Wildcard; n]
}

fn child_path(path: &ScrutineePath, instr: PathInstruction) -> ScrutineePath {
    let mut path = path.clone();
    path.push(instr);
    path
}

fn element_columns(path: &ScrutineePath, element: ShapeId, n: u32) -> Vec<Column> {
    (0..n)
        .map(|i| Column {
            path: child_path(path, PathInstruction::SeqIndex(i)),
            shape: element,
        })
        .collect()
}

fn replace_column(cols: &[Column], col: usize, with: Vec<Column>) -> Vec<Column> {
    let mut out = Vec::with_capacity(cols.len() - 1 + with.len());
    out.extend_from_slice(&cols[..col]);
    out.extend(with);
    out.extend_from_slice(&cols[col + 1..]);
    out
}

fn remove_column(cols: &[Column], col: usize) -> Vec<Column> {
    replace_column(cols, col, Vec::new())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "field indices and pattern lengths are always < u32::MAX"
)]
fn to_u32(n: usize) -> u32 {
    n as u32
}

/// Every row must have one pattern per column.
fn check_width(matrix: &PatternMatrix, cols: &[Column]) {
    if !cfg!(debug_assertions) {
        return;
    }
    if let Some((i, row)) = matrix
        .iter()
        .enumerate()
        .find(|(_, row)| row.patterns.len() != cols.len())
    {
        tracing::error!(
            row = i,
            arm_index = row.arm_index,
            patterns = row.patterns.len(),
            columns = cols.len(),
            "decision tree column mismatch"
        );
        for (ri, r) in matrix.iter().enumerate() {
            tracing::error!("  row[{ri}] (arm {}): {:?}", r.arm_index, r.patterns);
        }
        panic!(
            "column count mismatch at row {i}: columns={}, patterns={}, arm_index={}",
            cols.len(),
            row.patterns.len(),
            row.arm_index,
        );
    }
}
