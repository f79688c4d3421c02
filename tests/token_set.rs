use pretty_assertions::assert_eq;
use serde_json::json;
use tokenscript::{
    config::Config,
    error::{LanguageError, RuntimeError, TokenSetError},
    interpreter::colors::ColorManager,
    token_set::TokenSet,
};

fn resolve_text(json: &str, path: &str) -> String {
    let tokens = TokenSet::from_json(json).unwrap();
    let resolved = tokens.resolve(&Config::default())
                         .unwrap_or_else(|e| panic!("Token set failed: {e}"));
    resolved[path].text.clone()
}

#[test]
fn groups_flatten_into_dotted_paths() {
    let tokens = TokenSet::from_json(r##"{
        "$description": "ignored",
        "color": {
            "brand": { "primary": { "$value": "#0055ff" } },
            "text": { "value": "#222222" }
        },
        "note": "not a group"
    }"##)
    .unwrap();

    assert_eq!(tokens.len(), 2);
    assert!(tokens.get("color.brand.primary").is_some());
    assert!(tokens.get("color.text").is_some());
    assert!(tokens.get("note").is_none());
}

#[test]
fn types_are_inherited_from_groups() {
    let tokens = TokenSet::from_json(r##"{
        "size": {
            "$type": "dimension",
            "small": { "$value": "4px" },
            "ratio": { "$value": 1.5, "$type": "number" },
            "nested": { "large": { "$value": "16px" } }
        }
    }"##)
    .unwrap();

    let resolved = tokens.resolve(&Config::default()).unwrap();
    assert_eq!(resolved["size.small"].token_type.as_deref(), Some("dimension"));
    assert_eq!(resolved["size.ratio"].token_type.as_deref(), Some("number"));
    assert_eq!(resolved["size.nested.large"].token_type.as_deref(), Some("dimension"));
}

#[test]
fn metadata_passes_through() {
    let tokens = TokenSet::from_json(r##"{
        "gap": {
            "$value": "8px",
            "$description": "Default gap",
            "$extensions": { "com.example": { "deprecated": false } }
        }
    }"##)
    .unwrap();

    let resolved = tokens.resolve(&Config::default()).unwrap();
    let gap = &resolved["gap"];
    assert_eq!(gap.text, "8px");
    assert_eq!(gap.description.as_deref(), Some("Default gap"));
    assert_eq!(gap.extensions, Some(json!({ "com.example": { "deprecated": false } })));
}

#[test]
fn references_resolve_in_dependency_order() {
    let json = r##"{
        "a": { "$value": "{z.base} * 2" },
        "m": { "$value": "{a} + {z.base}" },
        "z": { "base": { "$value": "4px" } }
    }"##;
    assert_eq!(resolve_text(json, "a"), "8px");
    assert_eq!(resolve_text(json, "m"), "12px");
}

#[test]
fn non_string_values_are_imported() {
    let json = r##"{
        "weight": { "$value": 600 },
        "visible": { "$value": true },
        "double": { "$value": "{weight} * 2" }
    }"##;
    assert_eq!(resolve_text(json, "weight"), "600");
    assert_eq!(resolve_text(json, "visible"), "true");
    assert_eq!(resolve_text(json, "double"), "1200");
}

#[test]
fn plain_text_is_kept_as_written() {
    let json = r##"{
        "font": { "family": { "$value": "Inter, sans-serif" } },
        "easing": { "$value": "ease in out" }
    }"##;
    assert_eq!(resolve_text(json, "font.family"), "Inter, sans-serif");
    assert_eq!(resolve_text(json, "easing"), "ease in out");
}

#[test]
fn bare_words_around_references_are_substituted() {
    let json = r##"{
        "color": { "border": { "$value": "#000000" } },
        "width": { "$value": "1px" },
        "border": { "$value": "{width} solid {color.border}" }
    }"##;
    assert_eq!(resolve_text(json, "border"), "1px solid #000000");
}

#[test]
fn circular_references_are_errors() {
    let tokens = TokenSet::from_json(r##"{
        "a": { "$value": "{b} + 1" },
        "b": { "$value": "{c} + 1" },
        "c": { "$value": "{a} + 1" }
    }"##)
    .unwrap();

    match tokens.resolve(&Config::default()) {
        Err(TokenSetError::CircularReference { chain }) => {
            assert_eq!(chain, vec!["a", "b", "c", "a"]);
        },
        other => panic!("Expected a circular reference, found {other:?}"),
    }
}

#[test]
fn self_references_are_errors() {
    let tokens = TokenSet::from_json(r##"{ "a": { "$value": "{a}" } }"##).unwrap();
    assert!(matches!(tokens.resolve(&Config::default()),
                     Err(TokenSetError::CircularReference { .. })));
}

#[test]
fn dangling_references_are_errors() {
    let tokens = TokenSet::from_json(r##"{ "a": { "$value": "{missing} * 2" } }"##).unwrap();
    match tokens.resolve(&Config::default()) {
        Err(TokenSetError::UnknownReference { path, reference }) => {
            assert_eq!(path, "a");
            assert_eq!(reference, "missing");
        },
        other => panic!("Expected an unknown reference, found {other:?}"),
    }
}

#[test]
fn evaluation_failures_name_the_token() {
    let tokens = TokenSet::from_json(r##"{
        "base": { "$value": "4px" },
        "broken": { "$value": "{base} + 1s" }
    }"##)
    .unwrap();

    match tokens.resolve(&Config::default()) {
        Err(TokenSetError::Evaluation { path, source }) => {
            assert_eq!(path, "broken");
            assert!(matches!(source, LanguageError::Runtime(RuntimeError::UnitMismatch { .. })));
        },
        other => panic!("Expected an evaluation error, found {other:?}"),
    }
}

#[test]
fn documents_must_be_objects() {
    assert!(matches!(TokenSet::from_json("[1, 2]"), Err(TokenSetError::NotAnObject)));
    assert!(matches!(TokenSet::from_json("{"), Err(TokenSetError::Json(_))));
}

#[test]
fn color_tokens_use_registered_formats() {
    let mut colors = ColorManager::new();
    colors.register_json(include_str!("fixtures/rgb.json")).unwrap();
    colors.register_json(include_str!("fixtures/hsl.json")).unwrap();
    let config = Config::default().with_colors(colors);

    let tokens = TokenSet::from_json(r##"{
        "color": {
            "$type": "color",
            "primary": { "$value": "#ff0000" },
            "primary-hsl": { "$value": "{color.primary}.to.hsl()" },
            "accent": { "$value": "rgb(0, 128, 255)" }
        }
    }"##)
    .unwrap();

    let resolved = tokens.resolve(&config).unwrap();
    assert_eq!(resolved["color.primary"].text, "#ff0000");
    assert_eq!(resolved["color.primary-hsl"].text, "hsl(0, 100%, 50%)");
    assert_eq!(resolved["color.accent"].text, "rgb(0, 128, 255)");
}
