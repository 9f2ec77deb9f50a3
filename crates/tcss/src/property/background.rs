//! Background properties

use std::rc::Rc;

use super::color::ColorProperty;
use super::edges::lookup_class;
use super::{
    Attachment, BackgroundSize, Color, Converted, ParseContext, Position, Property, PropertyClass,
    PropertyError, PropertyRegistry, Repeat, Value, ValueKind, convert_text,
};
use crate::grammar::Term;

/// Which `background-*` longhand a class parses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundPart {
    Image,
    Repeat,
    Attachment,
    Position,
    Size,
}

impl BackgroundPart {
    fn name(self) -> &'static str {
        match self {
            BackgroundPart::Image => "background-image",
            BackgroundPart::Repeat => "background-repeat",
            BackgroundPart::Attachment => "background-attachment",
            BackgroundPart::Position => "background-position",
            BackgroundPart::Size => "background-size",
        }
    }
}

/// Resolve an image term through the function hooks
fn parse_image(term: &Term, ctx: &ParseContext<'_>) -> Option<Option<Value>> {
    match term {
        term if term.is_ident("none") => Some(None),
        Term::Function { name, args } => ctx.functions.call(name, args).map(|uri| Some(Value::Image(uri))),
        Term::String(uri) => Some(Some(Value::Image(uri.clone()))),
        _ => None,
    }
}

#[derive(Debug)]
pub struct BackgroundProperty {
    part: BackgroundPart,
}

impl BackgroundProperty {
    pub fn new(part: BackgroundPart) -> Self {
        Self { part }
    }
}

impl PropertyClass for BackgroundProperty {
    fn name(&self) -> &str {
        self.part.name()
    }

    fn create(&self, terms: &[Term], ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        let invalid = || PropertyError::invalid(self.name(), terms);
        match (self.part, terms) {
            (BackgroundPart::Image, [term]) => parse_image(term, ctx).ok_or_else(invalid),
            (BackgroundPart::Repeat, [term]) => Repeat::from_term(term)
                .map(|repeat| Some(Value::Repeat(repeat)))
                .ok_or_else(invalid),
            (BackgroundPart::Attachment, [term]) => Attachment::from_term(term)
                .map(|attachment| Some(Value::Attachment(attachment)))
                .ok_or_else(invalid),
            (BackgroundPart::Position, terms) => match Position::from_terms(terms) {
                Some((position, used)) if used == terms.len() => Ok(Some(Value::Position(position))),
                _ => Err(invalid()),
            },
            (BackgroundPart::Size, terms) => BackgroundSize::from_terms(terms)
                .map(|size| Some(Value::Size(size)))
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    fn convert(&self, value: &Value, target: ValueKind) -> Result<Converted, PropertyError> {
        match (value, target) {
            (Value::Image(uri), ValueKind::Text) => Ok(Converted::Text(uri.clone())),
            _ => convert_text(self.name(), value, target),
        }
    }
}

/// `background: [color || image || repeat || attachment || position]`
#[derive(Debug, Default)]
pub struct BackgroundShorthand;

#[derive(Debug, Default)]
struct BackgroundParts {
    color: Option<Color>,
    image: Option<Option<Value>>,
    repeat: Option<Repeat>,
    attachment: Option<Attachment>,
    position: Option<Position>,
}

impl BackgroundShorthand {
    fn parse_parts(terms: &[Term], ctx: &ParseContext<'_>) -> Result<BackgroundParts, PropertyError> {
        let mut parts = BackgroundParts::default();
        let mut rest = terms;

        while let Some(term) = rest.first() {
            if parts.image.is_none() {
                if let Some(image) = parse_image(term, ctx) {
                    parts.image = Some(image);
                    rest = &rest[1..];
                    continue;
                }
            }
            if parts.repeat.is_none() {
                if let Some(repeat) = Repeat::from_term(term) {
                    parts.repeat = Some(repeat);
                    rest = &rest[1..];
                    continue;
                }
            }
            if parts.attachment.is_none() {
                if let Some(attachment) = Attachment::from_term(term) {
                    parts.attachment = Some(attachment);
                    rest = &rest[1..];
                    continue;
                }
            }
            if parts.color.is_none() {
                if let Some(color) = Color::from_term(term) {
                    parts.color = Some(color);
                    rest = &rest[1..];
                    continue;
                }
            }
            if parts.position.is_none() {
                if let Some((position, used)) = Position::from_terms(rest) {
                    parts.position = Some(position);
                    rest = &rest[used..];
                    continue;
                }
            }
            return Err(PropertyError::invalid("background", terms));
        }

        Ok(parts)
    }
}

impl PropertyClass for BackgroundShorthand {
    fn name(&self) -> &str {
        "background"
    }

    fn create(&self, terms: &[Term], _ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        Err(PropertyError::invalid(self.name(), terms))
    }

    fn expand(
        &self,
        terms: &[Term],
        ctx: &ParseContext<'_>,
    ) -> Option<Result<Vec<(String, Property)>, PropertyError>> {
        Some(Self::parse_parts(terms, ctx).and_then(|parts| {
            let mut values: Vec<(&str, Option<Value>)> = Vec::new();
            if let Some(color) = parts.color {
                values.push(("background-color", Some(Value::Color(color))));
            }
            if let Some(image) = parts.image {
                values.push(("background-image", image));
            }
            if let Some(repeat) = parts.repeat {
                values.push(("background-repeat", Some(Value::Repeat(repeat))));
            }
            if let Some(attachment) = parts.attachment {
                values.push(("background-attachment", Some(Value::Attachment(attachment))));
            }
            if let Some(position) = parts.position {
                values.push(("background-position", Some(Value::Position(position))));
            }

            values
                .into_iter()
                .map(|(name, value)| -> Result<(String, Property), PropertyError> {
                    let class = lookup_class(ctx, name)?;
                    let property = match value {
                        Some(value) => Property::set(class, value),
                        None => Property::none(class),
                    };
                    Ok((name.to_string(), property))
                })
                .collect()
        }))
    }

    fn longhands(&self) -> Vec<String> {
        [
            "background-color",
            "background-image",
            "background-repeat",
            "background-attachment",
            "background-position",
        ]
        .map(String::from)
        .to_vec()
    }
}

pub(crate) fn register(registry: &mut PropertyRegistry) {
    registry.register(Rc::new(ColorProperty::new("background-color").allowing_none()));
    for part in [
        BackgroundPart::Image,
        BackgroundPart::Repeat,
        BackgroundPart::Attachment,
        BackgroundPart::Position,
        BackgroundPart::Size,
    ] {
        registry.register(Rc::new(BackgroundProperty::new(part)));
    }
    registry.register(Rc::new(BackgroundShorthand));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::property::{Length, PropertyState};

    fn terms(css: &str) -> Vec<Term> {
        crate::grammar::parse_declaration_list(&format!("x: {css}"))
            .remove(0)
            .terms
    }

    #[test]
    fn test_image_through_url_hook() {
        let config = Config::default();
        let ctx = config.parse_context();
        let class = BackgroundProperty::new(BackgroundPart::Image);

        assert_eq!(
            class.create(&terms("url(theme/bg.png)"), &ctx),
            Ok(Some(Value::Image("theme/bg.png".into())))
        );
        assert_eq!(class.create(&terms("none"), &ctx), Ok(None));
        assert!(class.create(&terms("nope(1)"), &ctx).is_err());
    }

    #[test]
    fn test_position_and_size() {
        let config = Config::default();
        let ctx = config.parse_context();

        let position = BackgroundProperty::new(BackgroundPart::Position);
        assert_eq!(
            position.create(&terms("10px bottom"), &ctx),
            Ok(Some(Value::Position(Position {
                x: Length::px(10.0),
                y: Length::percent(100.0),
            })))
        );

        let size = BackgroundProperty::new(BackgroundPart::Size);
        assert_eq!(
            size.create(&terms("cover"), &ctx),
            Ok(Some(Value::Size(BackgroundSize::Cover)))
        );
    }

    #[test]
    fn test_shorthand() {
        let config = Config::default();
        let ctx = config.parse_context();

        let expanded = BackgroundShorthand
            .expand(&terms("#fff url(a.png) no-repeat fixed center top"), &ctx)
            .unwrap()
            .unwrap();
        let names: Vec<&str> = expanded.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "background-color",
                "background-image",
                "background-repeat",
                "background-attachment",
                "background-position",
            ]
        );
        assert_eq!(expanded[0].1.value(), Some(&Value::Color(Color::WHITE)));
    }

    #[test]
    fn test_shorthand_none() {
        let config = Config::default();
        let ctx = config.parse_context();

        let expanded = BackgroundShorthand.expand(&terms("none"), &ctx).unwrap().unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].1.state(), PropertyState::None);
    }
}
