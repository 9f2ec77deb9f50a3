//! Edge case tests for tcss
//!
//! Malformed input, broken node graphs and configuration errors.

mod common;

use std::rc::Rc;

use common::{Loop, Widget, init_tracing};
use tcss::property::color::ColorProperty;
use tcss::{Color, Config, Origin, PropertyRegistry, Selector, Stylesheet, Term};

fn author(css: &str) -> Stylesheet {
    init_tracing();
    let mut sheet = Stylesheet::default();
    sheet.add_from_buffer(css, Origin::Author);
    sheet
}

// ============================================================================
// MALFORMED INPUT
// ============================================================================

#[test]
fn test_empty_and_comment_only() {
    for css in ["", "   \n\t ", "/* nothing */"] {
        let sheet = author(css);
        assert!(sheet.type_names().is_empty());
        assert!(sheet.query(&Widget::new(&["label"])).is_none());
    }
}

#[test]
fn test_malformed_rule_skipped() {
    let sheet = author("label { color: red; } a + b { color: blue; } ::before { color: lime; } entry { color: blue; }");
    assert_eq!(sheet.type_names(), vec!["entry", "label"]);
}

#[test]
fn test_bad_value_drops_only_that_declaration() {
    let sheet = author("label { color: 3px; padding: 2; border-style: wavy; }");
    let style = sheet.query(&Widget::new(&["label"])).unwrap();
    assert!(style.get("color").is_none());
    assert_eq!(style.number("padding-top"), Some(2.0));
    assert!(style.get("border-top-style").is_none());
}

#[test]
fn test_failed_shorthand_stores_nothing() {
    let sheet = author("label { border: 1px solid red blue; margin: x 1; }");
    assert!(sheet.type_names().is_empty());
}

#[test]
fn test_edge_shorthand_ignores_trailing_garbage() {
    let sheet = author("label { margin: 1 2 x 4; }");
    let style = sheet.query(&Widget::new(&["label"])).unwrap();
    assert_eq!(style.number("margin-bottom"), Some(1.0));
    assert_eq!(style.number("margin-left"), Some(2.0));
}

#[test]
fn test_overlong_selector_dropped_not_fatal() {
    let classes: String = (0..32).map(|i| format!(".c{i}")).collect();
    let sheet = author(&format!("label{classes} {{ color: red; }} label {{ color: blue; }}"));

    let node = Widget::new(&["label"]);
    assert_eq!(sheet.query(&node).unwrap().color("color"), Some(Color::rgb(0, 0, 255)));
    assert_eq!(sheet.group("label").map(|g| g.len()), Some(1));
}

#[test]
fn test_broken_inline_style_ignored() {
    let sheet = author("label { color: red; }");
    let node = Widget::new(&["label"]).inline(5, "color: ; : ;");
    assert_eq!(sheet.query(&node).unwrap().color("color"), Some(Color::rgb(255, 0, 0)));
}

// ============================================================================
// BROKEN NODE GRAPHS
// ============================================================================

#[test]
fn test_cyclic_node_terminates() {
    let sheet = author("spin { color: inherit; padding: 1; } spin spin { margin: 1; }");
    let style = sheet.query(&Loop("spin")).unwrap();

    assert!(style.get("color").is_none());
    assert_eq!(style.number("padding-top"), Some(1.0));
    assert_eq!(style.number("margin-top"), Some(1.0));
}

#[test]
fn test_nested_descendants_on_cyclic_node_finish() {
    let sheet = author(
        "spin { padding: 1; } \
         missing spin spin spin spin { color: red; } \
         missing spin spin spin spin spin spin spin spin { color: blue; } \
         spin spin spin spin spin { margin: 2; }",
    );
    let style = sheet.query(&Loop("spin")).unwrap();

    assert!(style.get("color").is_none());
    assert_eq!(style.number("padding-top"), Some(1.0));
    assert_eq!(style.number("margin-top"), Some(2.0));
}

#[test]
fn test_small_depth_limit() {
    init_tracing();
    let config = Config {
        max_node_depth: 1,
        ..Config::default()
    };
    let mut sheet = Stylesheet::new(config);
    sheet.add_from_buffer("window { color: red; } label { color: inherit; }", Origin::Author);

    let near = Widget::new(&["label"]).inside(Widget::new(&["window"]));
    assert!(sheet.query(&near).unwrap().color("color").is_some());

    let far = Widget::new(&["label"])
        .inside(Widget::new(&["box"]).inside(Widget::new(&["window"])));
    assert!(sheet.query(&far).unwrap().get("color").is_none());
}

#[test]
fn test_cyclic_declared_base_types() {
    let mut sheet = author("a { color: red; } b { padding: 1; }");
    sheet.set_base_type("a", "b");
    sheet.set_base_type("b", "a");

    let style = sheet.query_by_type_name("a").unwrap();
    assert_eq!(style.color("color"), Some(Color::rgb(255, 0, 0)));
    assert_eq!(style.number("padding-top"), Some(1.0));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
#[should_panic(expected = "registered twice")]
fn test_duplicate_property_class_panics() {
    let mut registry = PropertyRegistry::standard();
    registry.register(Rc::new(ColorProperty::new("color")));
}

#[test]
#[should_panic(expected = "specificity counter overflow")]
fn test_specificity_overflow_through_api_panics() {
    let mut selector = Selector::of_type("label");
    for _ in 0..32 {
        selector.refine(Selector::class("c"));
    }
}

#[test]
fn test_custom_url_hook() {
    init_tracing();
    let mut config = Config::default();
    config.functions.register("url", |args: &[Term]| match args {
        [Term::String(uri)] => Some(format!("/themes/adwaita/{uri}")),
        _ => None,
    });
    let mut sheet = Stylesheet::new(config);
    sheet.add_from_buffer("window { background-image: url(\"bg.png\"); }", Origin::Author);

    let style = sheet.query(&Widget::new(&["window"])).unwrap();
    assert_eq!(style.string("background-image"), Some("/themes/adwaita/bg.png".into()));
}

#[test]
fn test_registry_without_fallback_drops_unknown() {
    init_tracing();
    let mut properties = PropertyRegistry::new();
    properties.register(Rc::new(ColorProperty::new("color")));
    let config = Config {
        properties,
        ..Config::default()
    };
    let mut sheet = Stylesheet::new(config);
    sheet.add_from_buffer("label { color: red; padding: 1; }", Origin::Author);

    let style = sheet.query(&Widget::new(&["label"])).unwrap();
    assert_eq!(style.names(), vec!["color"]);
}
