//! Property-based tests for checking and compilation.
//!
//! Random arm lists over one fixed scrutinee shape,
//! `(Option<0..=5>, bool, [bool])`, are checked against a naive
//! first-match interpreter:
//!
//! 1. The compiled tree selects the same arm with the same bindings.
//! 2. The match is exhaustive exactly when the tree has no reachable `Fail`.
//! 3. Every witness is a well-formed value that no unguarded arm matches.
//! 4. The column heuristic never changes which arm is selected.
//! 5. Removing arms reported unreachable never changes the selected arm.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

mod common;

use ori_match::{
    eval_decision_tree, init_tracing, ColumnHeuristic, EvalError, MatchConfig, MatchCtx,
};
use ori_match_ir::{
    Arm, DecisionTree, GuardId, Name, PatternArena, PatternId, RestPattern, SeqLen, ShapeId,
    ShapeRegistry, ShapeRegistryBuilder, StringInterner, Value,
};
use proptest::prelude::*;

/// Arms per generated match; also the number of guard outcomes.
const MAX_ARMS: usize = 6;

struct Universe {
    registry: ShapeRegistry,
    root: ShapeId,
    none: Name,
    some: Name,
    n: Name,
    rest: Name,
}

fn universe() -> Universe {
    let interner = StringInterner::new();
    let mut builder = ShapeRegistryBuilder::new();
    let digit = builder.integer(0, 5).unwrap();
    let flag = builder.bool();
    let none = interner.intern("None");
    let some = interner.intern("Some");
    let option = builder
        .sum(vec![(none, vec![]), (some, vec![digit])])
        .unwrap();
    let list = builder.sequence(flag, SeqLen::AtLeast(0));
    let root = builder.product(vec![option, flag, list]);
    Universe {
        registry: builder.build().unwrap(),
        root,
        none,
        some,
        n: interner.intern("n"),
        rest: interner.intern("rest"),
    }
}

// -- Pattern Generation --
//
// Each binding name has one possible position, so generated arms never
// bind a name twice, and or-patterns bind nothing.

#[derive(Clone, Debug)]
enum DigitPat {
    Any,
    Bind,
    /// `6` is outside the domain.
    Lit(i128),
    Range(i128, i128, bool),
}

#[derive(Clone, Debug)]
enum FlagPat {
    Any,
    Lit(bool),
    Either(bool, bool),
}

#[derive(Clone, Debug)]
enum OptionPat {
    Any,
    None,
    Some(DigitPat),
}

#[derive(Clone, Debug)]
enum ListPat {
    Any,
    Seq {
        prefix: Vec<FlagPat>,
        /// `None`: no rest. `Some(true)`: `..rest`.
        rest: Option<bool>,
        suffix: Vec<FlagPat>,
    },
}

#[derive(Clone, Debug)]
enum RootPat {
    Any,
    Tuple(OptionPat, FlagPat, ListPat),
}

#[derive(Clone, Debug)]
struct ArmPlan {
    pattern: RootPat,
    guarded: bool,
}

fn digit_pat() -> impl Strategy<Value = DigitPat> {
    prop_oneof![
        2 => Just(DigitPat::Any),
        1 => Just(DigitPat::Bind),
        3 => (0i128..=6).prop_map(DigitPat::Lit),
        2 => (0i128..=6, 0i128..=6, any::<bool>())
            .prop_map(|(lo, hi, inclusive)| DigitPat::Range(lo, hi, inclusive)),
    ]
}

fn flag_pat() -> impl Strategy<Value = FlagPat> {
    prop_oneof![
        2 => Just(FlagPat::Any),
        3 => any::<bool>().prop_map(FlagPat::Lit),
        1 => (any::<bool>(), any::<bool>()).prop_map(|(a, b)| FlagPat::Either(a, b)),
    ]
}

fn option_pat() -> impl Strategy<Value = OptionPat> {
    prop_oneof![
        2 => Just(OptionPat::Any),
        1 => Just(OptionPat::None),
        3 => digit_pat().prop_map(OptionPat::Some),
    ]
}

fn list_pat() -> impl Strategy<Value = ListPat> {
    prop_oneof![
        2 => Just(ListPat::Any),
        3 => (
            prop::collection::vec(flag_pat(), 0..3),
            prop::option::of(any::<bool>()),
            prop::collection::vec(flag_pat(), 0..2),
        )
            .prop_map(|(prefix, rest, suffix)| ListPat::Seq { prefix, rest, suffix }),
    ]
}

fn root_pat() -> impl Strategy<Value = RootPat> {
    prop_oneof![
        1 => Just(RootPat::Any),
        6 => (option_pat(), flag_pat(), list_pat())
            .prop_map(|(o, f, l)| RootPat::Tuple(o, f, l)),
    ]
}

fn arm_plans() -> impl Strategy<Value = Vec<ArmPlan>> {
    prop::collection::vec(
        (root_pat(), prop::bool::weighted(0.2))
            .prop_map(|(pattern, guarded)| ArmPlan { pattern, guarded }),
        1..=MAX_ARMS,
    )
}

// -- Value Generation --

fn root_value() -> impl Strategy<Value = Value> {
    let option = prop_oneof![
        Just(Value::unit_variant(0)),
        (0i128..=5).prop_map(|d| Value::Variant {
            index: 1,
            fields: vec![Value::Int(d)],
        }),
    ];
    let list = prop::collection::vec(any::<bool>().prop_map(Value::Bool), 0..5)
        .prop_map(Value::Sequence);
    (option, any::<bool>(), list).prop_map(|(o, f, l)| Value::Tuple(vec![o, Value::Bool(f), l]))
}

// -- Arena Allocation --

struct Alloc<'u> {
    u: &'u Universe,
    arena: PatternArena,
}

impl Alloc<'_> {
    fn digit(&mut self, p: &DigitPat) -> PatternId {
        match p {
            DigitPat::Any => self.arena.wildcard(),
            DigitPat::Bind => self.arena.binding(self.u.n),
            DigitPat::Lit(v) => self.arena.int(*v),
            DigitPat::Range(lo, hi, inclusive) => self.arena.range(*lo, *hi, *inclusive),
        }
    }

    fn flag(&mut self, p: &FlagPat) -> PatternId {
        match p {
            FlagPat::Any => self.arena.wildcard(),
            FlagPat::Lit(b) => self.arena.bool(*b),
            FlagPat::Either(a, b) => {
                let a = self.arena.bool(*a);
                let b = self.arena.bool(*b);
                self.arena.or([a, b])
            }
        }
    }

    fn option(&mut self, p: &OptionPat) -> PatternId {
        match p {
            OptionPat::Any => self.arena.wildcard(),
            OptionPat::None => self.arena.constructor(self.u.none, []),
            OptionPat::Some(d) => {
                let d = self.digit(d);
                self.arena.constructor(self.u.some, [d])
            }
        }
    }

    fn list(&mut self, p: &ListPat) -> PatternId {
        match p {
            ListPat::Any => self.arena.wildcard(),
            ListPat::Seq {
                prefix,
                rest,
                suffix,
            } => {
                let prefix: Vec<_> = prefix.iter().map(|f| self.flag(f)).collect();
                let suffix: Vec<_> = suffix.iter().map(|f| self.flag(f)).collect();
                let rest = rest.map(|bind| RestPattern {
                    binding: bind.then_some(self.u.rest),
                });
                self.arena.sequence(prefix, rest, suffix)
            }
        }
    }

    fn root(&mut self, p: &RootPat) -> PatternId {
        match p {
            RootPat::Any => self.arena.wildcard(),
            RootPat::Tuple(o, f, l) => {
                let o = self.option(o);
                let f = self.flag(f);
                let l = self.list(l);
                self.arena.tuple([o, f, l])
            }
        }
    }
}

/// Allocate the arms; arm `i` uses `GuardId(i)` when guarded.
fn build(u: &Universe, plans: &[ArmPlan]) -> (PatternArena, Vec<Arm>) {
    let mut alloc = Alloc {
        u,
        arena: PatternArena::new(),
    };
    let arms = plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let pattern = alloc.root(&plan.pattern);
            if plan.guarded {
                Arm::guarded(pattern, GuardId(u32::try_from(i).unwrap()))
            } else {
                Arm::new(pattern)
            }
        })
        .collect();
    (alloc.arena, arms)
}

type Selected = Result<(usize, Vec<(Name, Value)>), EvalError>;

fn select(tree: &DecisionTree, value: &Value, outcomes: &[bool]) -> Selected {
    eval_decision_tree(tree, value, |g, _| outcomes[g.0 as usize])
        .map(|r| (r.arm_index, common::sorted(r.bindings)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn tree_agrees_with_first_match(
        plans in arm_plans(),
        values in prop::collection::vec(root_value(), 1..8),
        outcomes in prop::collection::vec(any::<bool>(), MAX_ARMS),
    ) {
        init_tracing();
        let u = universe();
        let (arena, arms) = build(&u, &plans);
        let ctx = MatchCtx::new(&u.registry, &arena);
        let lowered = ctx.lower(u.root, &arms).unwrap();
        let compiled = ctx.compile(u.root, &arms).unwrap();

        for value in &values {
            let expected = common::first_match(&lowered, value, |g| outcomes[g.0 as usize])
                .ok_or(EvalError::NoMatch);
            prop_assert_eq!(select(&compiled.tree, value, &outcomes), expected);
        }
    }

    #[test]
    fn exhaustive_exactly_when_tree_cannot_fail(
        plans in arm_plans(),
        values in prop::collection::vec(root_value(), 1..8),
    ) {
        let u = universe();
        let (arena, arms) = build(&u, &plans);
        let ctx = MatchCtx::new(&u.registry, &arena);
        let report = ctx.check(u.root, &arms).unwrap();
        let compiled = ctx.compile(u.root, &arms).unwrap();

        prop_assert_eq!(report.exhaustiveness.is_exhaustive(), !compiled.fail_reachable);
        if report.exhaustiveness.is_exhaustive() {
            let rejecting = [false; MAX_ARMS];
            for value in &values {
                prop_assert!(select(&compiled.tree, value, &rejecting).is_ok());
            }
        }
    }

    #[test]
    fn witnesses_match_no_arm(plans in arm_plans()) {
        let u = universe();
        let (arena, arms) = build(&u, &plans);
        let ctx = MatchCtx::new(&u.registry, &arena);
        let lowered = ctx.lower(u.root, &arms).unwrap();
        let compiled = ctx.compile(u.root, &arms).unwrap();
        let witnesses = ctx.check_exhaustiveness(u.root, &arms).unwrap();
        let witnesses = witnesses.witnesses();

        prop_assert!(witnesses.len() <= MatchConfig::DEFAULT_MAX_WITNESSES);
        for pair in witnesses.windows(2) {
            prop_assert!(pair[0].witness_cmp(&pair[1]).is_lt());
        }
        let rejecting = [false; MAX_ARMS];
        for witness in witnesses {
            prop_assert!(u.registry.admits(u.root, witness));
            prop_assert_eq!(common::first_match(&lowered, witness, |_| false), None);
            prop_assert_eq!(
                select(&compiled.tree, witness, &rejecting),
                Err(EvalError::NoMatch)
            );
        }
    }

    #[test]
    fn heuristics_select_the_same_arm(
        plans in arm_plans(),
        values in prop::collection::vec(root_value(), 1..8),
        outcomes in prop::collection::vec(any::<bool>(), MAX_ARMS),
    ) {
        let u = universe();
        let (arena, arms) = build(&u, &plans);
        let ctx = MatchCtx::new(&u.registry, &arena);
        let with = |heuristic| {
            ctx.with_config(MatchConfig::default().with_heuristic(heuristic))
                .compile(u.root, &arms)
                .unwrap()
        };
        let necessity = with(ColumnHeuristic::Necessity);
        let leftmost = with(ColumnHeuristic::Leftmost);

        prop_assert_eq!(necessity.fail_reachable, leftmost.fail_reachable);
        for value in &values {
            prop_assert_eq!(
                select(&necessity.tree, value, &outcomes),
                select(&leftmost.tree, value, &outcomes)
            );
        }
    }

    #[test]
    fn unreachable_arms_can_be_removed(
        plans in arm_plans(),
        values in prop::collection::vec(root_value(), 1..8),
        outcomes in prop::collection::vec(any::<bool>(), MAX_ARMS),
    ) {
        let u = universe();
        let (arena, arms) = build(&u, &plans);
        let ctx = MatchCtx::new(&u.registry, &arena);
        let unreachable = ctx.check_reachability(u.root, &arms).unwrap();
        let kept: Vec<usize> = (0..arms.len()).filter(|i| !unreachable.contains(i)).collect();
        let kept_arms: Vec<Arm> = kept.iter().map(|&i| arms[i]).collect();

        let full = ctx.compile(u.root, &arms).unwrap();
        let pruned = ctx.compile(u.root, &kept_arms).unwrap();
        for value in &values {
            let before = select(&full.tree, value, &outcomes);
            if let Ok((arm, _)) = &before {
                prop_assert!(!unreachable.contains(arm));
            }
            let after = select(&pruned.tree, value, &outcomes)
                .map(|(arm, bindings)| (kept[arm], bindings));
            prop_assert_eq!(after, before);
        }
    }
}
