use std::{collections::HashMap, fs};

use pretty_assertions::assert_eq;
use tokenscript::{
    config::Config,
    error::{LanguageError, RuntimeError},
    interpret, interpret_to_string,
    interpreter::{colors::ColorManager, value::core::Value},
};
use walkdir::WalkDir;

fn book_config() -> Config {
    let mut colors = ColorManager::new();
    for spec in ["tests/fixtures/rgb.json", "tests/fixtures/hsl.json"] {
        let json = fs::read_to_string(spec).unwrap_or_else(|e| panic!("Failed to read {spec}: {e}"));
        colors.register_json(&json)
              .unwrap_or_else(|e| panic!("Failed to register {spec}: {e}"));
    }
    Config::default().with_colors(colors)
}

fn book_references() -> HashMap<String, Value> {
    HashMap::from([("base".to_string(), Value::with_unit(16.0, "px")),
                   ("scale".to_string(), Value::number(1.25)),
                   ("space.small".to_string(), Value::with_unit(4.0, "px"))])
}

#[test]
fn book_examples_work() {
    let config = book_config();
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = interpret(&code, book_references(), Some(config.clone())) {
                panic!("Example {} in {:?} failed:\n{}\nError: {}",
                       i + 1,
                       path,
                       code,
                       e.report(&code));
            }
        }
    }

    assert!(count > 0, "No examples found in book/src");
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```tokenscript") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn eval(src: &str) -> String {
    interpret_to_string(src, HashMap::new(), None).unwrap_or_else(|e| panic!("Script failed: {}", e.report(src)))
}

fn failure(src: &str) -> LanguageError {
    match interpret(src, HashMap::new(), None) {
        Ok(value) => panic!("Script succeeded with '{value}' but was expected to fail"),
        Err(e) => e,
    }
}

fn runtime_failure(src: &str) -> RuntimeError {
    match failure(src) {
        LanguageError::Runtime(e) => e,
        other => panic!("Expected a runtime error, found: {other}"),
    }
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(eval("1 + 2 * 3"), "7");
    assert_eq!(eval("(1 + 2) * 3"), "9");
    assert_eq!(eval("2 ^ 3 ^ 2"), "64");
    assert_eq!(eval("10 / 4"), "2.5");
    assert_eq!(eval("10 - 2 - 3"), "5");
    assert_eq!(eval("-(2 + 3)"), "-5");
    assert_eq!(eval(".5 * 4"), "2");
}

#[test]
fn float_literals_keep_their_notation() {
    assert_eq!(eval("1.0"), "1.0");
    assert_eq!(eval("0.5 + 0.5"), "1");
}

#[test]
fn additive_operators_bind_looser_than_comparisons() {
    assert!(matches!(runtime_failure("1 + 2 == 3"), RuntimeError::InvalidOperation { .. }));
    assert_eq!(eval("(1 + 2) == 3"), "true");
}

#[test]
fn division_by_zero_is_error() {
    assert!(matches!(runtime_failure("1 / 0"), RuntimeError::DivisionByZero { line: 1 }));
}

#[test]
fn declarations_and_reassignment() {
    assert_eq!(eval("variable x: Number = 10 + 5; return x.to_string().concat(\"px\");"),
               "15px");
    assert_eq!(eval("variable x: Number = 1; x = x + 1; return x;"), "2");
    assert_eq!(eval("variable label: String = \"a\"; label = \"b\"; return label;"), "b");
}

#[test]
fn declaration_type_errors() {
    assert!(matches!(runtime_failure("variable x: Number = 1; x = \"a\";"),
                     RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_failure("variable x: Number = \"a\";"), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_failure("variable x: Foo = 1;"), RuntimeError::UnknownType { .. }));
    assert!(matches!(runtime_failure("variable a-b: Number = 1;"),
                     RuntimeError::InvalidVariableName { .. }));
}

#[test]
fn redeclaration_is_error() {
    assert!(matches!(runtime_failure("variable x: Number = 1; variable x: Number = 2;"),
                     RuntimeError::VariableRedeclaration { .. }));
    assert!(matches!(runtime_failure("variable x: Number = 1; if (true) [ variable x: Number = 2; ]"),
                     RuntimeError::VariableRedeclaration { .. }));
}

#[test]
fn block_scopes() {
    assert_eq!(eval("variable x: Number = 1; if (true) [ variable y: Number = 2; x = x + y; ] return x;"),
               "3");
    assert_eq!(eval("if (true) [ variable y: Number = 2; ] if (true) [ variable y: Number = 3; ] return 1;"),
               "1");
    assert!(matches!(runtime_failure("if (true) [ variable y: Number = 2; ] return y;"),
                     RuntimeError::UnknownVariable { .. }));
}

#[test]
fn while_loops() {
    let src = "variable i: Number = 0;
               variable total: Number = 0;
               while (i < 5) [
                   i = i + 1;
                   total = total + i;
               ]
               return total;";
    assert_eq!(eval(src), "15");
}

#[test]
fn while_loops_stop_at_the_iteration_limit() {
    let src = "variable i: Number = 0; while (i < 100) [ i = i + 1; ] return i;";

    let bounded = Config::default().with_max_iterations(10);
    match interpret(src, HashMap::new(), Some(bounded)) {
        Err(LanguageError::Runtime(RuntimeError::IterationLimit { limit, .. })) => assert_eq!(limit, 10),
        other => panic!("Expected an iteration limit error, found {other:?}"),
    }

    let exact = Config::default().with_max_iterations(100);
    assert_eq!(interpret(src, HashMap::new(), Some(exact)).unwrap().to_string(), "100");
}

#[test]
fn if_elif_else() {
    let src = "variable x: Number = 5;
               variable label: String = \"\";
               if (x > 10) [ label = \"big\"; ]
               elif (x > 3) [ label = \"medium\"; ]
               else [ label = \"small\"; ]
               return label;";
    assert_eq!(eval(src), "medium");
    assert_eq!(eval("if (false) [ return 1; ] else if (true) [ return 2; ] return 3;"), "2");
    assert_eq!(eval("if (false) [ return 1; ] return 3;"), "3");
}

#[test]
fn conditions_must_be_boolean() {
    assert!(matches!(runtime_failure("if (1) [ return 1; ]"), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_failure("while (\"yes\") [ ]"), RuntimeError::TypeError { .. }));
}

#[test]
fn logic_and_comparison() {
    assert_eq!(eval("!true"), "false");
    assert_eq!(eval("true && false"), "false");
    assert_eq!(eval("true || false"), "true");
    assert_eq!(eval("(2 < 3) && (3 >= 3)"), "true");
    assert_eq!(eval("\"a\" < \"b\""), "true");
    assert_eq!(eval("true == false"), "false");
    assert!(matches!(runtime_failure("1 && true"), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_failure("true < false"), RuntimeError::InvalidOperation { .. }));
}

#[test]
fn string_methods() {
    assert_eq!(eval("variable text: String = \"Hello\"; return text.upper().concat(\" \", text.length());"),
               "HELLO 5");
    assert_eq!(eval("variable text: String = \"a,b,c\"; return text.split(\",\").join(\"-\");"),
               "a-b-c");
    assert_eq!(eval("variable text: String = \"tokenscript\"; return text.slice(-6);"), "script");
    assert_eq!(eval("variable text: String = \"7\"; return text.pad_start(3, \"0\");"), "007");
    assert_eq!(eval("\"a\" + \"b\""), "ab");
    assert!(matches!(runtime_failure("variable text: String = \"x\"; return text.shout();"),
                     RuntimeError::UnknownMethod { .. }));
}

#[test]
fn number_methods() {
    assert_eq!(eval("variable n: Number = 255; return n.to_string(16);"), "ff");
    assert_eq!(eval("variable n: Number = 3.14159; return n.to_fixed(2);"), "3.14");
}

#[test]
fn explicit_and_implicit_lists() {
    assert_eq!(eval("1, 2, 3"), "1, 2, 3");
    assert_eq!(eval("variable edges: List = 1px 2px; return edges;"), "1px 2px");
    assert_eq!(eval("variable items: List = 1, 2, 3; items.append(4, 5); return items.length();"),
               "5");
    assert_eq!(eval("variable items: List = 1, 2, 3; return items.get(-1);"), "3");
    assert_eq!(eval("variable items: List = \"a\", \"c\"; items.insert(1, \"b\"); return items.join(\"\");"),
               "abc");
    assert!(matches!(runtime_failure("variable items: List = 1, 2, 3; return items.get(3);"),
                     RuntimeError::IndexOutOfBounds { index: 3, length: 3, .. }));
}

#[test]
fn implicit_lists_do_not_double_spaces() {
    assert_eq!(eval("\"a \" \"b\" \"c\""), "a b c");
    assert_eq!(eval("\"a\" \" b\""), "a b");
}

#[test]
fn empty_programs_yield_an_empty_string() {
    assert_eq!(eval(""), "");
    assert_eq!(eval("// nothing to see\n"), "");
}

#[test]
fn dictionaries() {
    assert_eq!(eval("variable d: Dictionary; d.set(\"b\", 2); d.set(\"a\", 1); return d.keys();"),
               "a, b");
    assert_eq!(eval("variable d: Dictionary; d.set(\"a\", 1); return d.get(\"zz\");"), "null");
    assert_eq!(eval("variable d: Dictionary; d.set(\"a\", 1); d.a = 5; return d.get(\"a\");"), "5");
}

#[test]
fn nested_places_are_updated_in_place() {
    let src = "variable d: Dictionary;
               variable inner: Dictionary;
               d.set(\"inner\", inner);
               d.inner.x = 1;
               return d.inner.x;";
    assert_eq!(eval(src), "1");

    let src = "variable items: List = 1, 2;
               variable d: Dictionary;
               d.set(\"items\", items);
               d.items.append(3);
               return d.items.length() * 10 + items.length();";
    assert_eq!(eval(src), "32");
}

#[test]
fn builtin_functions() {
    assert_eq!(eval("round(2.5)"), "2");
    assert_eq!(eval("round(3.5)"), "4");
    assert_eq!(eval("round(1.125, 2)"), "1.12");
    assert_eq!(eval("abs(-4px)"), "4px");
    assert_eq!(eval("min(3, 1, 2)"), "1");
    assert_eq!(eval("max(1px, 4px)"), "4px");
    assert_eq!(eval("sum(1, 2, 3)"), "6");
    assert_eq!(eval("average(2, 4)"), "3");
    assert_eq!(eval("sqrt(16)"), "4");
    assert_eq!(eval("pow(2, 10)"), "1024");
    assert_eq!(eval("parse_int(\"ff\", 16)"), "255");
    assert_eq!(eval("log(1)"), "0");
    assert_eq!(eval("sin(0)"), "0");
    assert_eq!(eval("cos(0deg)"), "1");
    assert_eq!(eval("rgba(255, 0, 0, 0.5)"), "rgba(255, 0, 0, 0.5)");
}

#[test]
fn builtin_function_errors() {
    assert!(matches!(runtime_failure("asin(2)"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_failure("sqrt(-1)"), RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_failure("round()"), RuntimeError::ArgumentCountMismatch { .. }));
    assert!(matches!(runtime_failure("min(1px, 1rem)"), RuntimeError::UnitMismatch { .. }));
    assert!(matches!(runtime_failure("unknown(1)"), RuntimeError::UnknownFunction { .. }));
}

#[test]
fn uninterpreted_functions_are_kept_as_text() {
    assert_eq!(eval("linear-gradient(90deg, #ff0000, #0000ff)"),
               "linear-gradient(90deg, #ff0000, #0000ff)");
    assert_eq!(eval("var(--gap)"), "var(--gap)");
}

#[test]
fn references() {
    let refs = HashMap::from([("base".to_string(), Value::with_unit(4.0, "px")),
                              ("space.large".to_string(), Value::with_unit(16.0, "px"))]);
    assert_eq!(interpret_to_string("{base} * 2", refs.clone(), None).unwrap(), "8px");
    assert_eq!(interpret_to_string("{space.large} - {base}", refs.clone(), None).unwrap(),
               "12px");
    assert!(matches!(interpret("{missing} * 2", refs, None),
                     Err(LanguageError::Runtime(RuntimeError::UnknownReference { .. }))));
}

#[test]
fn errors_report_their_line() {
    let src = "variable x: Number = 1;\nreturn y;";
    let error = failure(src);
    assert_eq!(error.line(), Some(2));
    assert!(error.report(src).contains("Unknown variable 'y'"));
}

#[test]
fn syntax_errors() {
    assert!(matches!(failure("variable x: Number = ;"), LanguageError::Syntax(_)));
    assert!(matches!(failure("(1 + 2"), LanguageError::Syntax(_)));
    assert!(matches!(failure("variable x: Number = 1 variable y: Number = 2;"),
                     LanguageError::Syntax(_)));
}

#[test]
fn syntax_error_columns_count_characters() {
    let src = "variable café: Number = 1 )";
    match failure(src) {
        LanguageError::Syntax(error) => {
            assert_eq!(error.column(), Some(27));
            let excerpt = error.excerpt(src).unwrap();
            assert!(excerpt.ends_with(&format!("{}^", " ".repeat(30))), "{excerpt}");
        },
        other => panic!("Expected a syntax error, found: {other}"),
    }
}

#[test]
fn methods_apply_to_literals() {
    assert_eq!(eval("\"hello\".length()"), "5");
    assert_eq!(eval("\"rgb(\".concat(1, \", \", 2, \")\")"), "rgb(1, 2)");
    assert_eq!(eval("'Mixed'.upper().lower()"), "mixed");
    assert_eq!(eval("255.to_string(16)"), "ff");
    assert_eq!(eval("12px.unit()"), "px");
    assert_eq!(eval("-\"abc\".length()"), "-3");
}

#[test]
fn script_file() {
    let script = fs::read_to_string("tests/scale.tks").expect("missing file");
    let result = interpret_to_string(&script, book_references(), Some(book_config())).unwrap();
    assert_eq!(result, "12.8px 16px 20px 25px");
}

#[test]
fn programs_render_back_to_source() {
    use tokenscript::interpreter::{parser::parse, units::UnitManager};

    let units = UnitManager::default();
    for src in ["1 + 2 * 3",
                "(1 + 2) * 3",
                "10 - (4 - 3)",
                "return 2 ^ 3 - 1",
                "variable a: Number = 1; return a * (2 + 3);"]
    {
        let ast = parse(src, &units).unwrap_or_else(|e| panic!("Failed to parse {src}: {e}"));
        assert_eq!(ast.to_string(), src);
    }
}
