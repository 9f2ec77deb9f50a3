//! Resolved Styles
//!
//! A [`Style`] is the flat result of one query: property name → value, with
//! no trace of the selectors that produced it. Values are shared with the
//! stylesheet's blocks.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::block::Block;
use crate::node::Viewport;
use crate::property::{Color, Converted, Property, PropertyState, Value, ValueKind};

#[derive(Debug, Clone, Default)]
pub struct Style {
    properties: HashMap<String, Rc<Property>>,
    viewport: Option<Viewport>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport of the queried node, captured at query time
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// Exact lookup, no fallback
    pub fn get(&self, name: &str) -> Option<&Rc<Property>> {
        self.properties.get(name)
    }

    /// Lookup walking the fallback chain while a name was never set,
    /// e.g. `border-left-color` → `border-color` → `color`
    pub fn lookup(&self, name: &str) -> Option<&Rc<Property>> {
        let mut current = name;
        loop {
            if let Some(property) = self.properties.get(current) {
                return Some(property);
            }
            current = fallback_for(current)?;
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, property: Rc<Property>) {
        self.properties.insert(name.into(), property);
    }

    pub fn remove(&mut self, name: &str) -> Option<Rc<Property>> {
        self.properties.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<Property>)> {
        self.properties.iter().map(|(name, property)| (name.as_str(), property))
    }

    /// Copy every property of `block`, overwriting what is there
    pub fn apply_block(&mut self, block: &Block) {
        for (name, property) in block.iter() {
            self.properties.insert(name.to_string(), Rc::clone(property));
        }
    }

    /// Names still waiting for `inherit` resolution
    pub(crate) fn pending_inherit(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .properties
            .iter()
            .filter(|(_, property)| property.state() == PropertyState::Inherit)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Color through the fallback chain
    pub fn color(&self, name: &str) -> Option<Color> {
        match self.lookup(name)?.value()? {
            Value::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// Numeric projection through the fallback chain
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.lookup(name)?.convert(ValueKind::Number) {
            Ok(Converted::Number(number)) => Some(number),
            _ => None,
        }
    }

    /// Textual projection through the fallback chain
    pub fn string(&self, name: &str) -> Option<String> {
        match self.lookup(name)?.convert(ValueKind::Text) {
            Ok(Converted::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.names() {
            writeln!(f, "{name}: {};", self.properties[name])?;
        }
        Ok(())
    }
}

/// Next name to try when `name` was never set in a style
pub fn fallback_for(name: &str) -> Option<&'static str> {
    Some(match name {
        "border-top-color" | "border-right-color" | "border-bottom-color"
        | "border-left-color" => "border-color",
        "border-color" => "color",
        "border-top-style" | "border-right-style" | "border-bottom-style"
        | "border-left-style" => "border-style",
        "border-top-width" | "border-right-width" | "border-bottom-width"
        | "border-left-width" => "border-width",
        "border-top-left-radius"
        | "border-top-right-radius"
        | "border-bottom-right-radius"
        | "border-bottom-left-radius" => "border-radius",
        "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => "padding",
        "margin-top" | "margin-right" | "margin-bottom" | "margin-left" => "margin",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::grammar::parse_declaration_list;

    fn style(css: &str) -> Style {
        let config = Config::default();
        let block = Block::from_declarations(&parse_declaration_list(css), &config.parse_context());
        let mut style = Style::new();
        style.apply_block(&block);
        style
    }

    #[test]
    fn test_fallback_to_general_border_color() {
        let style = style("border-color: red");
        assert_eq!(style.color("border-left-color"), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_fallback_to_plain_color() {
        let style = style("color: blue");
        assert_eq!(style.color("border-left-color"), Some(Color::rgb(0, 0, 255)));
        assert!(style.get("border-left-color").is_none());
    }

    #[test]
    fn test_specific_name_wins() {
        let style = style("color: blue; border-color: red; border-left-color: lime");
        assert_eq!(style.color("border-left-color"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(style.color("border-top-color"), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_multi_value_shorthand_has_no_general_name() {
        let style = style("color: blue; border-color: red green");
        assert_eq!(style.color("border-top-color"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(style.get("border-color").map(|p| p.state()), None);
    }

    #[test]
    fn test_typed_getters() {
        let style = style("padding: 3px; border-style: dotted");
        assert_eq!(style.number("padding-left"), Some(3.0));
        assert_eq!(style.string("border-bottom-style"), Some("dotted".into()));
        assert_eq!(style.number("border-bottom-style"), None);
        assert_eq!(style.number("margin-top"), None);
    }

    #[test]
    fn test_apply_block_overwrites() {
        let config = Config::default();
        let ctx = config.parse_context();
        let first = Block::from_declarations(&parse_declaration_list("color: red; padding-top: 1"), &ctx);
        let second = Block::from_declarations(&parse_declaration_list("color: blue"), &ctx);

        let mut style = Style::new();
        style.apply_block(&first);
        style.apply_block(&second);
        assert_eq!(style.color("color"), Some(Color::rgb(0, 0, 255)));
        assert_eq!(style.number("padding-top"), Some(1.0));
    }

    #[test]
    fn test_display() {
        let style = style("padding-top: 2; color: blue");
        assert_eq!(style.to_string(), "color: #0000ff;\npadding-top: 2;\n");
    }
}
