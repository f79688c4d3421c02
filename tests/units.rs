use std::collections::HashMap;

use pretty_assertions::assert_eq;
use tokenscript::{
    ast::BinaryOperator,
    config::Config,
    error::{LanguageError, RuntimeError, SpecError},
    interpret, interpret_to_string,
    interpreter::units::{Quantity, UnitManager},
};

fn eval(src: &str) -> String {
    interpret_to_string(src, HashMap::new(), None).unwrap_or_else(|e| panic!("Script failed: {}", e.report(src)))
}

fn runtime_failure(src: &str) -> RuntimeError {
    match interpret(src, HashMap::new(), None) {
        Err(LanguageError::Runtime(e)) => e,
        other => panic!("Expected a runtime error, found {other:?}"),
    }
}

#[test]
fn same_units_add() {
    assert_eq!(eval("10px + 5px"), "15px");
    assert_eq!(eval("10px - 15px"), "-5px");
    assert_eq!(eval("2rem * 3"), "6rem");
    assert_eq!(eval("3 * 2rem"), "6rem");
    assert_eq!(eval("4px ^ 2"), "16px");
    assert_eq!(eval("2em + 1em"), "3em");
}

#[test]
fn convertible_units_meet_in_the_canonical_unit() {
    assert_eq!(eval("1rem + 10px"), "26px");
    assert_eq!(eval("1s + 500ms"), "1500ms");
    assert_eq!(eval("1in - 48px"), "48px");
    assert_eq!(eval("1turn + 90deg"), "450deg");
}

#[test]
fn percentages_resolve_against_their_co_operand() {
    assert_eq!(eval("10px + 10%"), "11px");
    assert_eq!(eval("200px - 25%"), "150px");
    assert_eq!(eval("100 * 25%"), "25");
    assert_eq!(eval("50% * 10px"), "5px");
    assert_eq!(eval("10% + 5%"), "15%");
}

#[test]
fn dividing_like_units_gives_a_ratio() {
    assert_eq!(eval("10px / 2px"), "5");
    assert_eq!(eval("32px / 1rem"), "2");
    assert_eq!(eval("10px / 2"), "5px");
}

#[test]
fn incompatible_units_are_errors() {
    assert!(matches!(runtime_failure("1s + 1px"), RuntimeError::UnitMismatch { .. }));
    assert!(matches!(runtime_failure("2px * 3px"), RuntimeError::UnitMismatch { .. }));
    assert!(matches!(runtime_failure("10 / 2px"), RuntimeError::UnitMismatch { .. }));
    assert!(matches!(runtime_failure("1em + 1px"), RuntimeError::UnitMismatch { .. }));
    assert!(matches!(runtime_failure("2 ^ 1px"), RuntimeError::UnitMismatch { .. }));
    assert!(matches!(runtime_failure("10px / 0px"), RuntimeError::DivisionByZero { .. }));
}

#[test]
fn relative_units_need_a_single_anchor() {
    assert!(matches!(runtime_failure("sum(1px, 1rem, 10%)"),
                     RuntimeError::AmbiguousRelativeUnits { .. }));
    assert_eq!(eval("1px + 1rem + 10%"), "18.7px");
}

#[test]
fn unit_comparisons() {
    assert_eq!(eval("2px < 3px"), "true");
    assert_eq!(eval("16px == 16"), "true");
    assert!(matches!(runtime_failure("2px < 3rem"), RuntimeError::UnitMismatch { .. }));
}

#[test]
fn unit_methods() {
    assert_eq!(eval("variable w: NumberWithUnit = 12px; return w.unit();"), "px");
    assert_eq!(eval("variable w: NumberWithUnit = 12px; return w.to_number() + 1;"), "13");
    assert_eq!(eval("variable w: NumberWithUnit = 4PX; return w;"), "4px");
}

#[test]
fn combine_sums_many_operands() {
    let units = UnitManager::default();
    let total = units.combine(BinaryOperator::Add,
                              &[Quantity::with_unit(1.0, "rem"),
                                Quantity::with_unit(4.0, "px"),
                                Quantity::with_unit(2.0, "px")],
                              1)
                     .unwrap();
    assert_eq!(total, Quantity::with_unit(22.0, "px"));

    let difference = units.combine(BinaryOperator::Sub,
                                   &[Quantity::plain(10.0), Quantity::plain(3.0), Quantity::plain(2.0)],
                                   1)
                          .unwrap();
    assert_eq!(difference, Quantity::plain(5.0));
}

#[test]
fn registered_units_are_lexed_and_converted() {
    let mut units = UnitManager::default();
    units.register_json(r#"[
            { "keyword": "q", "name": "quarter-millimeter", "category": "length",
              "kind": "absolute", "ratio": 0.25 },
            { "keyword": "pct", "category": "relative", "kind": "relative" }
        ]"#)
         .unwrap();
    let config = Config::default().with_units(units);

    let run = |src: &str| interpret_to_string(src, HashMap::new(), Some(config.clone())).unwrap();
    assert_eq!(run("8q + 2px"), "4px");
    assert_eq!(run("10px + 10pct"), "11px");
}

#[test]
fn invalid_unit_specs_are_rejected() {
    let mut units = UnitManager::new();
    assert!(matches!(units.register_json(r#"{ "keyword": "x", "category": "length", "kind": "sideways" }"#),
                     Err(SpecError::InvalidUnit { .. })));
    assert!(matches!(units.register_json(r#"{ "keyword": "y", "category": "length", "kind": "absolute", "ratio": -1 }"#),
                     Err(SpecError::InvalidUnit { .. })));
    assert!(matches!(units.register_json("{ \"keyword\": 1 }"), Err(SpecError::Json(_))));
    assert!(units.get("x").is_none());
}

#[test]
fn unit_functions() {
    assert_eq!(eval("sum(1rem, 4px)"), "20px");
    assert_eq!(eval("average(1rem, 16px)"), "16px");
    assert_eq!(eval("round(12.345px, 1)"), "12.3px");
    assert_eq!(eval("floor(2.7rem)"), "2rem");
    assert_eq!(eval("sin(90deg)"), "1");
}
