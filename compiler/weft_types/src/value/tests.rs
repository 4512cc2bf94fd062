use pretty_assertions::assert_eq;

use super::*;

fn sample() -> Value {
    Value::structure([("a", Value::Int(1)), ("b", Value::str("x"))]).unwrap()
}

#[test]
fn lookup_present_and_absent() {
    let value = sample();
    let st = value.as_struct().unwrap();
    assert_eq!(st.lookup("a"), Some(&Value::Int(1)));
    assert_eq!(st.lookup("c"), None);
}

#[test]
fn struct_equality_ignores_member_order() {
    let reordered = Value::structure([("b", Value::str("x")), ("a", Value::Int(1))]).unwrap();
    assert_eq!(sample(), reordered);
}

#[test]
fn struct_equality_sees_changed_member() {
    let changed = Value::structure([("a", Value::Int(2)), ("b", Value::str("x"))]).unwrap();
    assert_ne!(sample(), changed);
}

#[test]
fn value_type_follows_shape() {
    let expected = Type::structure([("a", Type::INT), ("b", Type::STR)]).unwrap();
    assert_eq!(sample().ty(), expected);
    assert_eq!(Value::Float(1.5).ty(), Type::FLOAT);
    assert_eq!(Value::Bool(true).ty(), Type::BOOL);
}

#[test]
fn duplicate_member_rejected() {
    let err = Value::structure([("a", Value::Int(1)), ("a", Value::Int(2))]).unwrap_err();
    assert_eq!(
        err,
        TypeError::DuplicateName {
            name: "a".to_owned()
        }
    );
}

#[test]
fn str_accessor() {
    assert_eq!(Value::str("hello").as_str(), Some("hello"));
    assert_eq!(Value::Int(3).as_str(), None);
}

#[test]
fn display() {
    assert_eq!(sample().to_string(), "struct{a: 1; b: \"x\"}");
}
