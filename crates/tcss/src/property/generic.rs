//! Catch-all property class
//!
//! Stores the raw terms of any property nobody registered, so renderers can
//! still read custom properties as text or as a single number.

use super::{Converted, ParseContext, PropertyClass, PropertyError, Value, ValueKind};
use crate::grammar::Term;

#[derive(Debug, Default)]
pub struct GenericProperty;

impl PropertyClass for GenericProperty {
    fn name(&self) -> &str {
        "*"
    }

    fn create(&self, terms: &[Term], _ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        match terms {
            [term] if term.is_ident("none") => Ok(None),
            _ => Ok(Some(Value::Raw(terms.to_vec()))),
        }
    }

    fn convert(&self, value: &Value, target: ValueKind) -> Result<Converted, PropertyError> {
        match (value, target) {
            (Value::Raw(terms), ValueKind::Number) => match terms.as_slice() {
                [Term::Number(n)] | [Term::Percentage(n)] | [Term::Dimension { value: n, .. }] => {
                    Ok(Converted::Number(*n as f64))
                }
                _ => Err(PropertyError::NotConvertible {
                    property: self.name().to_string(),
                    target,
                }),
            },
            (Value::Raw(terms), ValueKind::Text) => match terms.as_slice() {
                [Term::String(text)] | [Term::Ident(text)] => Ok(Converted::Text(text.clone())),
                _ => Ok(Converted::Text(value.to_string())),
            },
            (value, ValueKind::Text) => Ok(Converted::Text(value.to_string())),
            _ => Err(PropertyError::NotConvertible {
                property: self.name().to_string(),
                target,
            }),
        }
    }
}
