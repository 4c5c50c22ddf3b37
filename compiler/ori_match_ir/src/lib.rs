//! Ori match IR - shared types for pattern match checking and compilation.
//!
//! This crate holds the data the match engine consumes and produces:
//! - Names and the string interner for tags and bindings
//! - Shapes: the structure of a scrutinee (`ShapeRegistry`)
//! - Patterns: arena-allocated pattern trees and match arms
//! - Values: concrete scrutinee values (evaluation input, witnesses)
//! - Decision trees: the compiled form of a match
//!
//! The algorithms live in `ori_match`.
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: tag and binding strings become `Name(u32)`
//! - **Flatten Everything**: patterns reference children by `PatternId`
//! - **Read-only after build**: a sealed `ShapeRegistry` and a filled
//!   `PatternArena` are `Sync` and can be shared by parallel checks

mod interner;
mod name;
pub mod pattern;
pub mod shape;
pub mod tree;
mod value;

pub use interner::{StringInterner, StringLookup};
pub use name::Name;
pub use pattern::{
    Arm, GuardId, Literal, Pattern, PatternArena, PatternId, PatternRange, RestPattern,
};
pub use shape::{
    RegistryError, SeqLen, ShapeId, ShapeRegistry, ShapeRegistryBuilder, TypeShape, VariantDef,
};
pub use tree::{DecisionTree, PathInstruction, ScrutineePath, TestKind, TestValue};
pub use value::{Value, ValueDisplay};
