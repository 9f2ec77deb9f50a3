//! Border properties
//!
//! Per-side `border-{side}-{color,style,width}` and per-corner
//! `border-{corner}-radius` longhands, plus the `border` and
//! `border-{side}` shorthands. The N-value `border-color` etc. live in
//! [`edges`](super::edges).

use std::rc::Rc;

use super::edges::{CORNERS, EdgeKind, EdgeLonghand, SIDES, lookup_class};
use super::{
    BorderStyle, Color, Length, ParseContext, Property, PropertyClass, PropertyError,
    PropertyRegistry, Value,
};
use crate::grammar::Term;

/// `border` (all sides) or `border-{side}`: width, style and color in any order
#[derive(Debug)]
pub struct BorderShorthand {
    name: String,
    sides: Vec<&'static str>,
}

impl BorderShorthand {
    pub fn all_sides() -> Self {
        Self {
            name: "border".to_string(),
            sides: SIDES.to_vec(),
        }
    }

    pub fn side(side: &'static str) -> Self {
        Self {
            name: format!("border-{side}"),
            sides: vec![side],
        }
    }

    fn covers_all_sides(&self) -> bool {
        self.sides.len() == SIDES.len()
    }

    fn parse_parts(&self, terms: &[Term]) -> Result<BorderParts, PropertyError> {
        let mut parts = BorderParts::default();
        for term in terms {
            if parts.width.is_none() {
                if let Some(width) = Length::from_term(term) {
                    parts.width = Some(width);
                    continue;
                }
            }
            if parts.style.is_none() {
                if let Some(style) = BorderStyle::from_term(term) {
                    parts.style = Some(style);
                    continue;
                }
            }
            if parts.color.is_none() {
                if let Some(color) = Color::from_term(term) {
                    parts.color = Some(color);
                    continue;
                }
            }
            return Err(PropertyError::invalid(&self.name, terms));
        }
        Ok(parts)
    }
}

#[derive(Debug, Default)]
struct BorderParts {
    width: Option<Length>,
    style: Option<BorderStyle>,
    color: Option<Color>,
}

impl BorderParts {
    fn values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::with_capacity(3);
        if let Some(width) = self.width {
            values.push(("width", Value::Length(width)));
        }
        if let Some(style) = self.style {
            values.push(("style", Value::BorderStyle(style)));
        }
        if let Some(color) = self.color {
            values.push(("color", Value::Color(color)));
        }
        values
    }
}

impl PropertyClass for BorderShorthand {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, terms: &[Term], _ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        Err(PropertyError::invalid(&self.name, terms))
    }

    fn expand(
        &self,
        terms: &[Term],
        ctx: &ParseContext<'_>,
    ) -> Option<Result<Vec<(String, Property)>, PropertyError>> {
        let parts = match self.parse_parts(terms) {
            Ok(parts) => parts,
            Err(e) => return Some(Err(e)),
        };

        let mut expanded = Vec::new();
        for (part, value) in parts.values() {
            for side in &self.sides {
                let name = format!("border-{side}-{part}");
                let class = match lookup_class(ctx, &name) {
                    Ok(class) => class,
                    Err(e) => return Some(Err(e)),
                };
                expanded.push((name, Property::set(class, value.clone())));
            }
            if self.covers_all_sides() {
                let name = format!("border-{part}");
                let class = match lookup_class(ctx, &name) {
                    Ok(class) => class,
                    Err(e) => return Some(Err(e)),
                };
                expanded.push((name, Property::set(class, value)));
            }
        }

        if expanded.is_empty() {
            return Some(Err(PropertyError::EmptyValue(self.name.clone())));
        }
        Some(Ok(expanded))
    }

    fn longhands(&self) -> Vec<String> {
        let mut names = Vec::new();
        for part in ["width", "style", "color"] {
            names.extend(self.sides.iter().map(|side| format!("border-{side}-{part}")));
            if self.covers_all_sides() {
                names.push(format!("border-{part}"));
            }
        }
        names
    }
}

pub(crate) fn register(registry: &mut PropertyRegistry) {
    for side in SIDES {
        registry.register(Rc::new(EdgeLonghand::new(
            format!("border-{side}-color"),
            EdgeKind::BorderColor,
        )));
        registry.register(Rc::new(EdgeLonghand::new(
            format!("border-{side}-style"),
            EdgeKind::BorderStyle,
        )));
        registry.register(Rc::new(EdgeLonghand::new(
            format!("border-{side}-width"),
            EdgeKind::BorderWidth,
        )));
        registry.register(Rc::new(BorderShorthand::side(side)));
    }
    for corner in CORNERS {
        registry.register(Rc::new(EdgeLonghand::new(
            format!("border-{corner}-radius"),
            EdgeKind::BorderRadius,
        )));
    }
    registry.register(Rc::new(BorderShorthand::all_sides()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::property::{Converted, ValueKind};

    fn terms(css: &str) -> Vec<Term> {
        crate::grammar::parse_declaration_list(&format!("x: {css}"))
            .remove(0)
            .terms
    }

    #[test]
    fn test_border_any_order() {
        let config = Config::default();
        let ctx = config.parse_context();
        let class = BorderShorthand::all_sides();

        let expanded = class.expand(&terms("red 2px dashed"), &ctx).unwrap().unwrap();
        let get = |name: &str| {
            expanded
                .iter()
                .find(|(n, _)| n == name)
                .and_then(|(_, p)| p.value().cloned())
        };

        assert_eq!(get("border-left-color"), Some(Value::Color(Color::rgb(255, 0, 0))));
        assert_eq!(get("border-top-width"), Some(Value::Length(Length::px(2.0))));
        assert_eq!(get("border-bottom-style"), Some(Value::BorderStyle(BorderStyle::Dashed)));
        assert_eq!(get("border-color"), Some(Value::Color(Color::rgb(255, 0, 0))));
        assert_eq!(expanded.len(), 15);
    }

    #[test]
    fn test_border_side() {
        let config = Config::default();
        let ctx = config.parse_context();
        let class = BorderShorthand::side("top");

        let expanded = class.expand(&terms("solid"), &ctx).unwrap().unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].0, "border-top-style");
    }

    #[test]
    fn test_border_rejects_repeated_part() {
        let config = Config::default();
        let ctx = config.parse_context();
        let class = BorderShorthand::all_sides();
        assert!(class.expand(&terms("red blue"), &ctx).unwrap().is_err());
    }

    #[test]
    fn test_longhand_number_conversion() {
        let config = Config::default();
        let ctx = config.parse_context();
        let class = EdgeLonghand::new("border-left-width", EdgeKind::BorderWidth);

        let value = class.create(&[Term::Number(3.0)], &ctx).unwrap().unwrap();
        assert_eq!(class.convert(&value, ValueKind::Number), Ok(Converted::Number(3.0)));
    }
}
