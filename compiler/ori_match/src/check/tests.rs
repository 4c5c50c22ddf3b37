use ori_match_ir::{
    Arm, GuardId, PatternArena, RestPattern, SeqLen, ShapeRegistry, ShapeRegistryBuilder,
    StringInterner, Value,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::{MatchConfig, MatchCtx};

fn byte_registry() -> (ShapeRegistry, ShapeId) {
    let mut builder = ShapeRegistryBuilder::new();
    let byte = builder.integer(0, 255).unwrap();
    (builder.build().unwrap(), byte)
}

#[test]
fn one_arm_per_variant_is_exhaustive() {
    let interner = StringInterner::new();
    let mut builder = ShapeRegistryBuilder::new();
    let int = builder.integer(i128::from(i64::MIN), i128::from(i64::MAX)).unwrap();
    let string = builder.opaque();
    let tags = ["Quit", "Move", "Write", "ChangeColor"].map(|t| interner.intern(t));
    let message = builder
        .sum(vec![
            (tags[0], vec![]),
            (tags[1], vec![int, int]),
            (tags[2], vec![string]),
            (tags[3], vec![int, int, int]),
        ])
        .unwrap();
    let registry = builder.build().unwrap();

    let mut arena = PatternArena::new();
    let arity = [0, 2, 1, 3];
    let arms: Vec<Arm> = tags
        .iter()
        .zip(arity)
        .map(|(&tag, n)| {
            let fields: Vec<_> = (0..n).map(|_| arena.wildcard()).collect();
            Arm::new(arena.constructor(tag, fields))
        })
        .collect();

    let report = MatchCtx::new(&registry, &arena).check(message, &arms).unwrap();
    assert_eq!(
        report,
        MatchReport {
            exhaustiveness: Exhaustiveness::Exhaustive,
            unreachable: vec![],
        }
    );
}

#[test]
fn integer_literals_and_ranges() {
    let (registry, byte) = byte_registry();
    let mut arena = PatternArena::new();
    let one = arena.int(1);
    let two = arena.int(2);
    let three = arena.int(3);
    let two_or_three = arena.or([two, three]);
    let four_to_ten = arena.range(4, 10, true);
    let rest = arena.wildcard();
    let arms = [
        Arm::new(one),
        Arm::new(two_or_three),
        Arm::new(four_to_ten),
        Arm::new(rest),
    ];
    let ctx = MatchCtx::new(&registry, &arena);

    assert_eq!(
        ctx.check_exhaustiveness(byte, &arms).unwrap(),
        Exhaustiveness::Exhaustive
    );
    let witnesses = ctx.check_exhaustiveness(byte, &arms[..3]).unwrap();
    assert_eq!(
        witnesses,
        Exhaustiveness::NonExhaustive(vec![Value::Int(0), Value::Int(11)])
    );
}

#[test]
fn arm_after_wildcard_is_unreachable() {
    let mut builder = ShapeRegistryBuilder::new();
    let digit = builder.integer(0, 9).unwrap();
    let registry = builder.build().unwrap();
    let mut arena = PatternArena::new();
    let any = arena.wildcard();
    let five = arena.int(5);
    let ctx = MatchCtx::new(&registry, &arena);
    let report = ctx.check(digit, &[Arm::new(any), Arm::new(five)]).unwrap();
    assert_eq!(report.exhaustiveness, Exhaustiveness::Exhaustive);
    assert_eq!(report.unreachable, vec![1]);
}

#[test]
fn rest_pattern_covers_all_lengths() {
    let mut builder = ShapeRegistryBuilder::new();
    let flag = builder.bool();
    let seq = builder.sequence(flag, SeqLen::AtLeast(0));
    let registry = builder.build().unwrap();
    let mut arena = PatternArena::new();
    let all = arena.sequence([], Some(RestPattern { binding: None }), []);
    let ctx = MatchCtx::new(&registry, &arena);
    assert_eq!(
        ctx.check_exhaustiveness(seq, &[Arm::new(all)]).unwrap(),
        Exhaustiveness::Exhaustive
    );
}

#[test]
fn guarded_arm_does_not_cover() {
    let mut builder = ShapeRegistryBuilder::new();
    let flag = builder.bool();
    let registry = builder.build().unwrap();
    let mut arena = PatternArena::new();
    let any = arena.wildcard();
    let t = arena.bool(true);
    let f = arena.bool(false);
    let ctx = MatchCtx::new(&registry, &arena);

    let report = ctx
        .check(flag, &[Arm::guarded(any, GuardId(0)), Arm::new(t)])
        .unwrap();
    assert_eq!(
        report.exhaustiveness,
        Exhaustiveness::NonExhaustive(vec![Value::Bool(false)])
    );
    assert!(report.unreachable.is_empty());

    // A guarded arm is still unreachable if earlier arms cover it.
    let report = ctx
        .check(
            flag,
            &[Arm::new(t), Arm::new(f), Arm::guarded(any, GuardId(1))],
        )
        .unwrap();
    assert_eq!(report.unreachable, vec![2]);
}

#[test]
fn out_of_domain_literal_is_unreachable() {
    let (registry, byte) = byte_registry();
    let mut arena = PatternArena::new();
    let big = arena.int(1000);
    let any = arena.wildcard();
    let ctx = MatchCtx::new(&registry, &arena);
    assert_eq!(
        ctx.check_reachability(byte, &[Arm::new(big), Arm::new(any)])
            .unwrap(),
        vec![0]
    );
}

#[test]
fn no_arms_over_inhabited_shape_reports_minimum() {
    let (registry, byte) = byte_registry();
    let arena = PatternArena::new();
    let ctx = MatchCtx::new(&registry, &arena);
    assert_eq!(
        ctx.check_exhaustiveness(byte, &[]).unwrap(),
        Exhaustiveness::NonExhaustive(vec![Value::Int(0)])
    );
}

#[test]
fn no_arms_over_empty_sum_is_exhaustive() {
    let mut builder = ShapeRegistryBuilder::new();
    let never = builder.sum(vec![]).unwrap();
    let registry = builder.build().unwrap();
    let arena = PatternArena::new();
    let ctx = MatchCtx::new(&registry, &arena);
    assert!(ctx.check_exhaustiveness(never, &[]).unwrap().is_exhaustive());
}

#[test]
fn witness_count_is_capped() {
    let (registry, byte) = byte_registry();
    let mut arena = PatternArena::new();
    let arms: Vec<Arm> = [1, 3, 5, 7]
        .into_iter()
        .map(|v| Arm::new(arena.int(v)))
        .collect();
    let ctx = MatchCtx::new(&registry, &arena)
        .with_config(MatchConfig::default().with_max_witnesses(2));
    assert_eq!(
        ctx.check_exhaustiveness(byte, &arms).unwrap(),
        Exhaustiveness::NonExhaustive(vec![Value::Int(0), Value::Int(2)])
    );
}

#[test]
fn nested_option_witness() {
    let interner = StringInterner::new();
    let mut builder = ShapeRegistryBuilder::new();
    let flag = builder.bool();
    let (none, some) = (interner.intern("None"), interner.intern("Some"));
    let option = builder
        .sum(vec![(none, vec![]), (some, vec![flag])])
        .unwrap();
    let registry = builder.build().unwrap();
    let mut arena = PatternArena::new();
    let none_pat = arena.constructor(none, []);
    let t = arena.bool(true);
    let some_true = arena.constructor(some, [t]);
    let ctx = MatchCtx::new(&registry, &arena);
    let result = ctx
        .check_exhaustiveness(option, &[Arm::new(none_pat), Arm::new(some_true)])
        .unwrap();
    let witnesses = result.witnesses();
    assert_eq!(witnesses.len(), 1);
    assert_eq!(
        witnesses[0].display(option, &registry, &interner).to_string(),
        "Some(false)"
    );
}
