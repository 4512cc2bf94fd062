use crossbeam::channel;
use pretty_assertions::assert_eq;
use weft_types::{MismatchContext, TypeError};
use weft_unify::{GenerateResult, Generator, Solution, UnifyError};

use super::stream::StructLookupOptionalNode;
use super::*;
use crate::{cancel_pair, StreamError};

fn point() -> Type {
    Type::structure([("a", Type::INT), ("b", Type::STR)]).unwrap()
}

fn sig(container: Type, field: Type, fallback: Type, ret: Type) -> Type {
    Type::func([("x", container), ("y", field), ("z", fallback)], ret).unwrap()
}

fn built() -> StructLookupOptionalFunc {
    let mut func = StructLookupOptionalFunc::new();
    func.build(&sig(point(), Type::STR, Type::INT, Type::INT))
        .unwrap();
    func
}

// Build

#[test]
fn arg_names() {
    let func = StructLookupOptionalFunc::new();
    assert_eq!(func.arg_name(0).unwrap(), "struct");
    assert_eq!(func.arg_name(1).unwrap(), "field");
    assert_eq!(func.arg_name(2).unwrap(), "optional");
    assert_eq!(
        func.arg_name(3).unwrap_err(),
        FuncError::ArgIndex { index: 3, len: 3 }
    );
}

#[test]
fn unbuilt_function_is_unspecified() {
    let func = StructLookupOptionalFunc::new();
    assert_eq!(func.validate().unwrap_err(), BuildError::Unspecified);

    let info = func.info();
    assert!(info.pure);
    assert!(!info.memo);
    assert_eq!(info.sig, None);
    assert_eq!(info.err, Some(BuildError::Unspecified));
}

#[test]
fn build_renames_arguments() {
    let mut func = StructLookupOptionalFunc::new();
    let built = func
        .build(&sig(point(), Type::STR, Type::INT, Type::INT))
        .unwrap();

    assert_eq!(
        built.to_string(),
        "func(struct struct{a int; b str}, field str, optional int) int"
    );
    assert!(func.validate().is_ok());
    let info = func.info();
    assert_eq!(info.sig, Some(built));
    assert_eq!(info.err, None);
}

#[test]
fn build_is_idempotent() {
    let mut func = StructLookupOptionalFunc::new();
    let input = sig(point(), Type::STR, Type::INT, Type::INT);
    let first = func.build(&input).unwrap();
    let second = func.build(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn build_rejects_bad_signatures() {
    let cases = [
        (Type::INT, BuildError::NotFunc { found: Type::INT }),
        (
            Type::func([("x", point()), ("y", Type::STR)], Type::INT).unwrap(),
            BuildError::Arity {
                func: STRUCT_LOOKUP_OPTIONAL,
                expected: 3,
                found: 2,
            },
        ),
        (
            sig(point(), Type::STR, Type::INT, Type::Unresolved),
            BuildError::MissingReturn,
        ),
        (
            sig(Type::Unresolved, Type::STR, Type::INT, Type::INT),
            BuildError::MissingArg { position: "first" },
        ),
        (
            sig(point(), Type::Unresolved, Type::INT, Type::INT),
            BuildError::MissingArg { position: "second" },
        ),
        (
            sig(point(), Type::STR, Type::Unresolved, Type::INT),
            BuildError::MissingArg { position: "third" },
        ),
        (
            sig(point(), Type::INT, Type::INT, Type::INT),
            BuildError::SelectorNotText(TypeError::Mismatch {
                expected: Type::INT,
                found: Type::STR,
                context: MismatchContext::TopLevel,
            }),
        ),
        (
            sig(point(), Type::STR, Type::BOOL, Type::INT),
            BuildError::FallbackMismatch(TypeError::Mismatch {
                expected: Type::BOOL,
                found: Type::INT,
                context: MismatchContext::TopLevel,
            }),
        ),
    ];
    for (input, expected) in cases {
        let mut func = StructLookupOptionalFunc::new();
        assert_eq!(func.build(&input).unwrap_err(), expected, "building {input}");
        assert_eq!(func.validate().unwrap_err(), BuildError::Unspecified);
    }
}

#[test]
fn failed_build_keeps_previous_signature() {
    let mut func = built();
    assert!(func.build(&Type::INT).is_err());
    assert!(func.validate().is_ok());
}

#[test]
fn non_struct_container_fails_validation() {
    let mut func = StructLookupOptionalFunc::new();
    func.build(&sig(Type::INT, Type::STR, Type::INT, Type::INT))
        .unwrap();
    assert_eq!(
        func.validate().unwrap_err(),
        BuildError::NotStruct { found: Type::INT }
    );
    assert!(func.info().err.is_some());
}

#[test]
fn init_requires_build() {
    let func = StructLookupOptionalFunc::new();
    let (_tx, input) = channel::unbounded();
    let (output, _rx) = channel::unbounded();
    let (_source, cancel) = cancel_pair();
    let err = func
        .init(Init {
            input,
            output,
            cancel,
        })
        .err()
        .unwrap();
    assert_eq!(err, FuncError::Build(BuildError::Unspecified));
}

// Unify

struct CallSite {
    site: Expr,
    invariants: Vec<Invariant>,
}

impl CallSite {
    fn new() -> Self {
        let site = Expr::placeholder();
        let invariants = StructLookupOptionalFunc::new().unify(&site).unwrap();
        CallSite { site, invariants }
    }

    fn generator(&self) -> &Generator {
        self.invariants
            .iter()
            .find_map(|invariant| match invariant {
                Invariant::Generator(generator) => Some(generator),
                _ => None,
            })
            .unwrap()
    }

    /// The internal return unknown.
    fn out(&self) -> &Expr {
        self.invariants
            .iter()
            .find_map(|invariant| match invariant {
                Invariant::WrapFunc(wrap) => Some(wrap.ret()),
                _ => None,
            })
            .unwrap()
    }

    fn run(&self, call: &Expr, args: Vec<Expr>, solution: &Solution) -> GenerateResult {
        let facts = [Invariant::call_args(call.clone(), self.site.clone(), args)];
        self.generator().generate(&facts, solution)
    }
}

fn typed(ty: Type) -> Expr {
    let expr = Expr::placeholder();
    expr.set_type(ty).unwrap();
    expr
}

fn selector(name: &str) -> Expr {
    Expr::literal(Value::str(name))
}

fn equals_for<'a>(derived: &'a [Invariant], target: &Expr) -> Option<&'a Type> {
    derived.iter().find_map(|invariant| match invariant {
        Invariant::Equals { expr, ty } if expr == target => Some(ty),
        _ => None,
    })
}

fn wrap_struct(derived: &[Invariant]) -> Option<&weft_unify::WrapStruct> {
    derived.iter().find_map(|invariant| match invariant {
        Invariant::WrapStruct(wrap) => Some(wrap),
        _ => None,
    })
}

#[test]
fn initial_invariants() {
    let call = CallSite::new();
    assert_eq!(call.invariants.len(), 4);
    assert_eq!(call.generator().site(), &call.site);

    let Invariant::WrapFunc(wrap) = &call.invariants[2] else {
        panic!("expected the function shape third");
    };
    assert_eq!(wrap.func(), &call.site);
    let names: Vec<&str> = wrap.args().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["struct", "field", "optional"]);

    let (_, field) = wrap.args().nth(1).unwrap();
    assert_eq!(equals_for(&call.invariants, field), Some(&Type::STR));
}

#[test]
fn each_unify_uses_fresh_unknowns() {
    let first = CallSite::new();
    let second = CallSite::new();
    assert_ne!(first.out(), second.out());
}

#[test]
fn waits_for_call_record() {
    let call = CallSite::new();
    let err = call
        .generator()
        .generate(&call.invariants, &Solution::new())
        .unwrap_err();
    assert_eq!(err, UnifyError::NoProgress);
}

#[test]
fn wrong_call_arity() {
    let call = CallSite::new();
    let err = call
        .run(
            &Expr::placeholder(),
            vec![Expr::placeholder(), Expr::placeholder()],
            &Solution::new(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        UnifyError::ArityMismatch {
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn present_member_types_the_result() {
    let call = CallSite::new();
    let ret = Expr::placeholder();
    let derived = call
        .run(
            &ret,
            vec![typed(point()), selector("a"), Expr::placeholder()],
            &Solution::new(),
        )
        .unwrap();

    assert_eq!(equals_for(&derived, call.out()), Some(&Type::INT));
    let wrap = wrap_struct(&derived).unwrap();
    assert_eq!(wrap.field("a"), Some(call.out()));
    assert_ne!(wrap.field("b"), Some(call.out()));
    assert!(matches!(
        derived.last(),
        Some(Invariant::WrapCall { call: c, func }) if *c == ret && *func == call.site
    ));
}

#[test]
fn reruns_derive_identical_invariants() {
    let call = CallSite::new();
    let ret = Expr::placeholder();
    let facts = [Invariant::call_args(
        ret,
        call.site.clone(),
        vec![typed(point()), selector("a"), Expr::placeholder()],
    )];
    let solution = Solution::new();

    let render = |derived: Vec<Invariant>| -> Vec<String> {
        derived.iter().map(ToString::to_string).collect()
    };
    let first = render(call.generator().generate(&facts, &solution).unwrap());
    let second = render(call.generator().generate(&facts, &solution).unwrap());
    assert_eq!(first, second);
    assert!(first.iter().any(|fact| fact.contains("struct{a ")));
}

#[test]
fn solved_container_refines_partial_declaration() {
    let call = CallSite::new();
    let partial = Type::structure([("a", Type::Unresolved), ("b", Type::STR)]).unwrap();
    let container = typed(partial);
    let mut solution = Solution::new();
    solution.insert(container.clone(), point()).unwrap();

    let derived = call
        .run(
            &Expr::placeholder(),
            vec![container, selector("b"), Expr::placeholder()],
            &solution,
        )
        .unwrap();

    let wrap = wrap_struct(&derived).unwrap();
    assert_eq!(equals_for(&derived, wrap.expr()), Some(&point()));
    assert_eq!(equals_for(&derived, call.out()), Some(&Type::STR));
}

#[test]
fn missing_member_follows_fallback() {
    let call = CallSite::new();
    let derived = call
        .run(
            &Expr::placeholder(),
            vec![typed(point()), selector("z"), Expr::literal(Value::Bool(true))],
            &Solution::new(),
        )
        .unwrap();

    assert!(wrap_struct(&derived).is_none());
    assert_eq!(equals_for(&derived, call.out()), Some(&Type::BOOL));
}

#[test]
fn missing_member_without_fallback_type_leaves_result_open() {
    let call = CallSite::new();
    let derived = call
        .run(
            &Expr::placeholder(),
            vec![typed(point()), selector("z"), Expr::placeholder()],
            &Solution::new(),
        )
        .unwrap();
    assert_eq!(equals_for(&derived, call.out()), None);
}

#[test]
fn unknown_selector_learns_container_only() {
    let call = CallSite::new();
    for field in [Expr::placeholder(), selector("")] {
        let container = typed(point());
        let derived = call
            .run(
                &Expr::placeholder(),
                vec![container, field, Expr::placeholder()],
                &Solution::new(),
            )
            .unwrap();
        assert!(wrap_struct(&derived).is_none());
        assert_eq!(equals_for(&derived, call.out()), None);
    }
}

#[test]
fn solved_container_type_is_used() {
    let call = CallSite::new();
    let container = Expr::placeholder();
    let mut solution = Solution::new();
    solution.insert(container.clone(), point()).unwrap();

    let derived = call
        .run(
            &Expr::placeholder(),
            vec![container, selector("b"), Expr::placeholder()],
            &solution,
        )
        .unwrap();
    assert_eq!(equals_for(&derived, call.out()), Some(&Type::STR));
}

#[test]
fn member_and_fallback_must_agree() {
    let call = CallSite::new();
    let err = call
        .run(
            &Expr::placeholder(),
            vec![typed(point()), selector("a"), Expr::literal(Value::str("x"))],
            &Solution::new(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        UnifyError::Inconsistent {
            origin: "declared optional arg type",
            previous: "declared struct member type",
            mismatch: TypeError::Mismatch {
                expected: Type::INT,
                found: Type::STR,
                context: MismatchContext::TopLevel,
            },
        }
    );
}

#[test]
fn bad_argument_kinds() {
    let call = CallSite::new();
    let err = call
        .run(
            &Expr::placeholder(),
            vec![typed(point()), Expr::literal(Value::Int(1)), Expr::placeholder()],
            &Solution::new(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        UnifyError::UnexpectedKind {
            position: "field",
            expected: "str",
            found: Type::INT,
        }
    );

    let err = call
        .run(
            &Expr::placeholder(),
            vec![typed(Type::INT), selector("a"), Expr::placeholder()],
            &Solution::new(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        UnifyError::UnexpectedKind {
            position: "struct",
            expected: "struct",
            found: Type::INT,
        }
    );
}

// Stream

fn node(container: Type, out: Type) -> StructLookupOptionalNode {
    let (_tx, input) = channel::unbounded();
    let (output, _rx) = channel::unbounded();
    let (_source, cancel) = cancel_pair();
    StructLookupOptionalNode::new(
        Compiled { container, out },
        Init {
            input,
            output,
            cancel,
        },
    )
}

fn point_value(a: i64) -> Value {
    Value::structure([("a", Value::Int(a)), ("b", Value::str("x"))]).unwrap()
}

fn record(container: Value, field: &str, fallback: Value) -> Value {
    StructLookupOptionalFunc::input(container, field, fallback).unwrap()
}

#[test]
fn step_looks_up_member() {
    let mut node = node(point(), Type::INT);
    let result = node.step(record(point_value(1), "a", Value::Int(0))).unwrap();
    assert_eq!(result, Some(Value::Int(1)));
}

#[test]
fn step_falls_back() {
    let mut node = node(point(), Type::INT);
    let result = node.step(record(point_value(1), "z", Value::Int(7))).unwrap();
    assert_eq!(result, Some(Value::Int(7)));
}

#[test]
fn step_skips_repeats() {
    let mut node = node(point(), Type::INT);
    assert!(node.step(record(point_value(1), "a", Value::Int(0))).unwrap().is_some());
    // identical record
    assert_eq!(node.step(record(point_value(1), "a", Value::Int(0))).unwrap(), None);
    // new record, same result
    assert_eq!(node.step(record(point_value(1), "a", Value::Int(9))).unwrap(), None);
    assert_eq!(
        node.step(record(point_value(2), "a", Value::Int(9))).unwrap(),
        Some(Value::Int(2))
    );
}

#[test]
fn step_pins_selector() {
    let mut node = node(point(), Type::STR);
    node.step(record(point_value(1), "b", Value::str(""))).unwrap();
    let err = node
        .step(record(point_value(1), "a", Value::str("")))
        .unwrap_err();
    assert_eq!(
        err,
        StreamError::SelectorChanged {
            from: "b".to_owned(),
            to: "a".to_owned()
        }
    );
}

#[test]
fn step_rejects_empty_selector() {
    let mut node = node(point(), Type::INT);
    let err = node.step(record(point_value(1), "", Value::Int(0))).unwrap_err();
    assert_eq!(err, StreamError::EmptySelector);
}

#[test]
fn step_rejects_malformed_records() {
    let mut node = node(point(), Type::INT);
    assert_eq!(
        node.step(Value::Int(1)).unwrap_err(),
        StreamError::WrongKind {
            name: "input",
            expected: "struct",
            found: Type::INT,
        }
    );

    let missing = Value::structure([("struct", point_value(1)), ("field", Value::str("a"))]).unwrap();
    assert_eq!(
        node.step(missing).unwrap_err(),
        StreamError::MissingArg { name: "optional" }
    );

    assert!(matches!(
        node.step(record(Value::Int(3), "a", Value::Int(0))).unwrap_err(),
        StreamError::WrongKind { name: "struct", .. }
    ));
}

#[test]
fn step_checks_result_type() {
    let mut node = node(point(), Type::INT);
    let err = node
        .step(record(point_value(1), "z", Value::str("wrong")))
        .unwrap_err();
    assert!(matches!(err, StreamError::ResultType(_)));
}
