use std::{collections::HashMap, thread};

use pretty_assertions::assert_eq;
use tokenscript::{
    config::Config,
    error::{LanguageError, RuntimeError, SpecError},
    interpret, interpret_to_string,
    interpreter::{colors::ColorManager, value::core::Value},
};

const RGB_SPEC: &str = include_str!("fixtures/rgb.json");
const HSL_SPEC: &str = include_str!("fixtures/hsl.json");

fn config() -> Config {
    let mut colors = ColorManager::new();
    colors.register_json(RGB_SPEC).unwrap();
    colors.register_json(HSL_SPEC).unwrap();
    Config::default().with_colors(colors)
}

fn eval_with(config: &Config, src: &str) -> String {
    interpret_to_string(src, HashMap::new(), Some(config.clone())).unwrap_or_else(|e| panic!("Script failed: {}", e.report(src)))
}

fn eval(src: &str) -> String {
    eval_with(&config(), src)
}

fn runtime_failure(config: &Config, src: &str) -> RuntimeError {
    match interpret(src, HashMap::new(), Some(config.clone())) {
        Err(LanguageError::Runtime(e)) => e,
        other => panic!("Expected a runtime error, found {other:?}"),
    }
}

#[test]
fn hex_colors_need_no_registration() {
    let src = "variable c: Color = #FF8800; return c;";
    assert_eq!(interpret_to_string(src, HashMap::new(), None).unwrap(), "#FF8800");
    assert_eq!(interpret_to_string("variable c: Color = \"#fff\"; return c;", HashMap::new(), None).unwrap(),
               "#fff");
}

#[test]
fn initializers_build_colors() {
    assert_eq!(eval("rgb(255, 0, 0)"), "rgb(255, 0, 0)");
    assert_eq!(eval("hsl(120, 100, 25)"), "hsl(120, 100%, 25%)");
    assert_eq!(eval("RGB(1, 2, 3)"), "rgb(1, 2, 3)");
}

#[test]
fn typed_color_declarations() {
    assert_eq!(eval("variable c: Color.Rgb = rgb(10, 20, 30); return c.g;"), "20");
    assert!(matches!(runtime_failure(&config(), "variable c: Color.Rgb = hsl(0, 0, 0);"),
                     RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_failure(&config(), "variable c: Color.Rgb = \"#fff\";"),
                     RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_failure(&config(), "variable c: Color.Cmyk = rgb(1, 2, 3);"),
                     RuntimeError::UnknownType { .. }));
}

#[test]
fn hex_strings_can_be_reassigned_to_colors() {
    assert_eq!(eval("variable c: Color = #000000; c = \"#ffffff\"; return c;"), "#ffffff");
    assert!(matches!(runtime_failure(&config(), "variable c: Color = #000000; c = \"blue\";"),
                     RuntimeError::TypeError { .. }));
}

#[test]
fn hex_converts_to_rgb() {
    assert_eq!(eval("variable c: Color = #ff0000; return c.to.rgb();"), "rgb(255, 0, 0)");
    assert_eq!(eval("variable c: Color = #f00; return c.to.rgb().r;"), "255");
    assert_eq!(eval("variable c: Color = #336699; return c.to.rgb().g;"), "102");
}

#[test]
fn conversions_chain_through_intermediate_formats() {
    assert_eq!(eval("variable c: Color = #ff0000; return c.to.hsl();"), "hsl(0, 100%, 50%)");
    assert_eq!(eval("variable c: Color = #00ff00; return c.to.hsl();"), "hsl(120, 100%, 50%)");
    assert_eq!(eval("variable c: Color = #808080; return c.to.hsl();"), "hsl(0, 0%, 50%)");
    assert_eq!(eval("variable c: Color.Hsl = hsl(0, 100, 50); return c.to.hex();"), "#ff0000");
}

#[test]
fn converting_to_the_same_format_is_identity() {
    assert_eq!(eval("rgb(1, 2, 3).to.rgb()"), "rgb(1, 2, 3)");
}

#[test]
fn conversion_leaves_the_source_untouched() {
    let src = "variable c: Color = #00ff00;
               variable h: Color.Hsl = c.to.hsl();
               return c.to_string().concat(\" \", h.h);";
    assert_eq!(eval(src), "#00ff00 120");
}

#[test]
fn channels_can_be_written() {
    assert_eq!(eval("variable c: Color.Rgb = rgb(10, 20, 30); c.r = 255; return c;"),
               "rgb(255, 20, 30)");
    assert!(matches!(runtime_failure(&config(), "variable c: Color.Rgb = rgb(10, 20, 30); return c.alpha;"),
                     RuntimeError::UnknownAttribute { .. }));
}

#[test]
fn colors_convert_inside_references() {
    let config = config();
    let refs = HashMap::from([("brand".to_string(), Value::hex("#0000ff"))]);
    let value = interpret_to_string("{brand}.to.rgb()", refs, Some(config)).unwrap();
    assert_eq!(value, "rgb(0, 0, 255)");
}

#[test]
fn unknown_formats_and_missing_paths_are_errors() {
    let mut colors = ColorManager::new();
    colors.register_json(RGB_SPEC).unwrap();
    colors.register_json(HSL_SPEC).unwrap();
    colors.register_json(r#"{
        "$id": "https://example.com/schemas/gray/1.0.0/",
        "name": "Gray",
        "schema": { "properties": { "l": {} }, "required": ["l"], "order": ["l"] },
        "initializers": [{
            "keyword": "gray",
            "script": "variable c: Dictionary; c.set(\"l\", {input}.get(0)); return c;"
        }]
    }"#)
          .unwrap();
    let config = Config::default().with_colors(colors);

    assert!(config.colors.has_conversion("hex", "hsl"));
    assert!(!config.colors.has_conversion("gray", "hsl"));

    assert_eq!(eval_with(&config, "gray(40)"), "gray(40)");
    assert!(matches!(runtime_failure(&config, "gray(40).to.hsl()"),
                     RuntimeError::NoConversionPath { .. }));
    assert!(matches!(runtime_failure(&config, "variable c: Color = #ff0000; return c.to.cmyk();"),
                     RuntimeError::UnknownColorFormat { .. }));
    assert!(matches!(runtime_failure(&config, "variable c: Color = #ff0000; return c.to.rgb(1);"),
                     RuntimeError::ArgumentCountMismatch { .. }));
}

#[test]
fn conversion_endpoints_ignore_the_version_segment() {
    let mut colors = ColorManager::new();
    colors.register_json(RGB_SPEC).unwrap();
    colors.register_json(HSL_SPEC).unwrap();
    colors.register_json(r#"{
        "$id": "https://example.com/schemas/gray/1.0.0/",
        "name": "Gray",
        "schema": { "properties": { "l": {} }, "required": ["l"], "order": ["l"] },
        "conversions": [{
            "source": "https://example.com/schemas/rgb-color/2.0.0/",
            "target": "$self",
            "script": "variable c: Dictionary; c.set(\"l\", {input}.r); return c;"
        }]
    }"#)
          .unwrap();
    let config = Config::default().with_colors(colors);

    assert!(config.colors.has_conversion("rgb", "gray"));
    assert!(config.colors.has_conversion("hsl", "gray"));
    assert!(!config.colors.has_conversion("gray", "rgb"));
    assert_eq!(eval_with(&config, "#ff0000.to.gray()"), "gray(255)");
    assert_eq!(eval_with(&config, "hsl(0, 0, 50).to.gray()"), "gray(128)");
}

#[test]
fn unreachable_targets_end_the_search_in_a_cyclic_graph() {
    let mut colors = ColorManager::new();
    colors.register_json(RGB_SPEC).unwrap();
    colors.register_json(HSL_SPEC).unwrap();
    colors.register_json(r#"{
        "$id": "https://example.com/schemas/lab/1.0.0/",
        "name": "Lab",
        "schema": { "properties": { "l": {}, "a": {}, "b": {} }, "required": ["l", "a", "b"] },
        "conversions": [{
            "source": "$self",
            "target": "https://example.com/schemas/rgb-color/1.0.0/",
            "script": "variable c: Dictionary; c.set(\"r\", 0); c.set(\"g\", 0); c.set(\"b\", 0); return c;"
        }]
    }"#)
          .unwrap();
    let config = Config::default().with_colors(colors);

    assert!(config.colors.has_conversion("hsl", "hex"));
    assert!(config.colors.has_conversion("lab", "hsl"));
    assert!(!config.colors.has_conversion("hsl", "lab"));
    match runtime_failure(&config, "variable c: Color = #ff0000; return c.to.lab();") {
        RuntimeError::NoConversionPath { to, .. } => assert_eq!(to.to_lowercase(), "lab"),
        other => panic!("Expected no conversion path, found {other}"),
    }
}

#[test]
fn stringify_failures_report_the_calling_line() {
    let mut colors = ColorManager::new();
    colors.register_json(r#"{
        "$id": "https://example.com/schemas/odd/1.0.0/",
        "name": "Odd",
        "schema": { "properties": { "v": {} }, "required": ["v"] },
        "initializers": [{
            "keyword": "odd",
            "script": "variable c: Dictionary; c.set(\"v\", {input}.get(0)); return c;"
        }],
        "stringify": "return {input}.missing;"
    }"#)
          .unwrap();
    let config = Config::default().with_colors(colors);

    let src = "variable c: Color.Odd = odd(1);\nreturn c;";
    match interpret_to_string(src, HashMap::new(), Some(config)) {
        Err(LanguageError::Runtime(error @ RuntimeError::ColorScript { .. })) => {
            assert_eq!(error.line(), 2);
        },
        other => panic!("Expected a color script error, found {other:?}"),
    }
}

#[test]
fn scripts_must_produce_required_channels() {
    let mut colors = ColorManager::new();
    colors.register_json(r#"{
        "$id": "https://example.com/schemas/broken/1.0.0/",
        "name": "Broken",
        "schema": { "properties": { "a": {}, "b": {} }, "required": ["a", "b"] },
        "initializers": [{
            "keyword": "broken",
            "script": "variable c: Dictionary; c.set(\"a\", 1); return c;"
        }]
    }"#)
          .unwrap();
    let config = Config::default().with_colors(colors);

    match runtime_failure(&config, "broken()") {
        RuntimeError::ColorScript { format, details, .. } => {
            assert_eq!(format, "Broken");
            assert!(details.contains("'b'"), "{details}");
        },
        other => panic!("Expected a color script error, found {other}"),
    }
}

#[test]
fn invalid_specifications_are_rejected() {
    let mut colors = ColorManager::new();
    assert!(matches!(colors.register_json(r#"{ "name": "NoId" }"#),
                     Err(SpecError::MissingField { field: "$id" })));
    assert!(matches!(colors.register_json(r#"{ "$id": "https://example.com/x/", "name": "X", "type": "font" }"#),
                     Err(SpecError::UnsupportedType { .. })));
    assert!(matches!(colors.register_json(r#"{
            "$id": "https://example.com/y/", "name": "Y",
            "schema": { "properties": { "a": {} }, "required": ["a", "z"] }
        }"#),
                     Err(SpecError::MalformedSchema { .. })));
    assert!(matches!(colors.register_json("not json"), Err(SpecError::Json(_))));
    assert_eq!(colors.len(), 1);
}

#[test]
fn one_configuration_serves_many_threads() {
    let config = config();
    let colors = ["#ff0000", "#00ff00", "#808080"];

    let results = thread::scope(|scope| {
        let handles = colors.iter()
                            .map(|hex| {
                                let src = format!("variable c: Color = {hex}; return c.to.hsl();");
                                let config = &config;
                                scope.spawn(move || eval_with(config, &src))
                            })
                            .collect::<Vec<_>>();
        handles.into_iter()
               .map(|handle| handle.join().unwrap())
               .collect::<Vec<_>>()
    });

    assert_eq!(results, vec!["hsl(0, 100%, 50%)", "hsl(120, 100%, 50%)", "hsl(0, 0%, 50%)"]);
}
