//! Pattern match checking and compilation for the Ori compiler.
//!
//! Given a scrutinee shape from a [`ShapeRegistry`] and a list of arms whose
//! patterns live in a [`PatternArena`], this crate answers:
//!
//! - **Exhaustiveness**: does every value match some arm? If not, which
//!   values are missed ([`Exhaustiveness::NonExhaustive`] witnesses)?
//! - **Reachability**: which arms can never be selected?
//! - **Compilation**: a [`DecisionTree`](ori_match_ir::DecisionTree) that
//!   selects the first matching arm with as few tests as the heuristic
//!   finds.
//!
//! # Pipeline
//!
//! ```text
//! arena patterns → flatten (shape check, normalize)
//!                 ├→ space (set algebra) → check (exhaustiveness, reachability)
//!                 └→ decision_tree::compile → DecisionTree → decision_tree::eval
//! ```
//!
//! Checking and compilation are independent passes over the same lowered
//! arms. Both are pure functions of their inputs; [`MatchCtx::check_all`]
//! and [`MatchCtx::compile_all`] run many sites in parallel.
//!
//! # Guards
//!
//! Guards are opaque. The checker assumes any guard may fail, so guarded
//! arms never count toward exhaustiveness. The compiled tree calls back
//! into the caller at each `Guard` node.

mod batch;
mod check;
mod config;
pub mod decision_tree;
mod error;
mod flatten;
pub mod space;
mod witness;

use std::sync::Once;

use ori_match_ir::{Arm, PatternArena, ShapeId, ShapeRegistry};

pub use batch::MatchSite;
pub use check::{Exhaustiveness, MatchReport};
pub use config::{ColumnHeuristic, MatchConfig};
pub use decision_tree::{eval_decision_tree, CompiledMatch, EvalError, MatchResult};
pub use error::{MatchError, ShapeMismatch};
pub use flatten::{BindingError, FlatPattern, LoweredArm};

use crate::flatten::FlattenCtx;
use crate::space::SpaceCx;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has an
/// effect. Intended for tests and embedding tools.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already have installed a global subscriber.
            if let Err(err) = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
            {
                tracing::debug!(%err, "keeping the existing global subscriber");
            }
        }
    });
}

/// Entry point: shapes, patterns and configuration for a batch of checks.
///
/// Cheap to copy; holds only references and a small config.
#[derive(Copy, Clone)]
pub struct MatchCtx<'a> {
    pub registry: &'a ShapeRegistry,
    pub arena: &'a PatternArena,
    pub config: MatchConfig,
}

impl<'a> MatchCtx<'a> {
    pub fn new(registry: &'a ShapeRegistry, arena: &'a PatternArena) -> Self {
        Self {
            registry,
            arena,
            config: MatchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Shape-check and normalize the arms of one site.
    pub fn lower(&self, shape: ShapeId, arms: &[Arm]) -> Result<Vec<LoweredArm>, MatchError> {
        FlattenCtx::new(self.registry, self.arena).lower_arms(shape, arms)
    }

    pub fn check_exhaustiveness(
        &self,
        shape: ShapeId,
        arms: &[Arm],
    ) -> Result<Exhaustiveness, MatchError> {
        Ok(self.check(shape, arms)?.exhaustiveness)
    }

    /// Indices of arms no value can reach, ascending.
    pub fn check_reachability(
        &self,
        shape: ShapeId,
        arms: &[Arm],
    ) -> Result<Vec<usize>, MatchError> {
        Ok(self.check(shape, arms)?.unreachable)
    }

    /// Exhaustiveness and reachability in one pass.
    pub fn check(&self, shape: ShapeId, arms: &[Arm]) -> Result<MatchReport, MatchError> {
        let lowered = self.lower(shape, arms)?;
        let cx = SpaceCx::new(self.registry);
        Ok(check::check_arms(
            &cx,
            shape,
            &lowered,
            self.config.max_witnesses,
        ))
    }

    /// Compile the arms into a decision tree.
    pub fn compile(&self, shape: ShapeId, arms: &[Arm]) -> Result<CompiledMatch, MatchError> {
        let lowered = self.lower(shape, arms)?;
        Ok(decision_tree::compile_arms(
            self.registry,
            shape,
            &lowered,
            self.config.heuristic,
        ))
    }
}
