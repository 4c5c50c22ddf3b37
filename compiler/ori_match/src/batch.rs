//! Parallel checking and compilation of independent match sites.
//!
//! Sites share the read-only registry and arena and own everything else,
//! so they run on rayon's pool without coordination. Results come back in
//! input order.

use ori_match_ir::{Arm, ShapeId};
use rayon::prelude::*;
use tracing::debug;

use crate::check::MatchReport;
use crate::decision_tree::CompiledMatch;
use crate::error::MatchError;
use crate::MatchCtx;

/// One `match` expression: the scrutinee shape and its arms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSite {
    pub shape: ShapeId,
    pub arms: Vec<Arm>,
}

impl MatchSite {
    pub fn new(shape: ShapeId, arms: Vec<Arm>) -> Self {
        Self { shape, arms }
    }
}

impl MatchCtx<'_> {
    /// [`MatchCtx::check`] every site in parallel.
    pub fn check_all(&self, sites: &[MatchSite]) -> Vec<Result<MatchReport, MatchError>> {
        debug!(sites = sites.len(), "checking match sites");
        sites
            .par_iter()
            .map(|site| self.check(site.shape, &site.arms))
            .collect()
    }

    /// [`MatchCtx::compile`] every site in parallel.
    pub fn compile_all(&self, sites: &[MatchSite]) -> Vec<Result<CompiledMatch, MatchError>> {
        debug!(sites = sites.len(), "compiling match sites");
        sites
            .par_iter()
            .map(|site| self.compile(site.shape, &site.arms))
            .collect()
    }
}
