//! Color properties

use std::rc::Rc;

use super::{
    Color, Converted, ParseContext, PropertyClass, PropertyError, PropertyRegistry, Value,
    ValueKind, convert_text,
};
use crate::grammar::Term;

/// A single color value; `none` is accepted where `allows_none` is set
#[derive(Debug)]
pub struct ColorProperty {
    name: String,
    allows_none: bool,
}

impl ColorProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allows_none: false,
        }
    }

    pub fn allowing_none(mut self) -> Self {
        self.allows_none = true;
        self
    }
}

impl PropertyClass for ColorProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, terms: &[Term], _ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        match terms {
            [term] if self.allows_none && term.is_ident("none") => Ok(None),
            [term] => Color::from_term(term)
                .map(|color| Some(Value::Color(color)))
                .ok_or_else(|| PropertyError::invalid(&self.name, terms)),
            _ => Err(PropertyError::invalid(&self.name, terms)),
        }
    }

    fn convert(&self, value: &Value, target: ValueKind) -> Result<Converted, PropertyError> {
        convert_text(&self.name, value, target)
    }
}

pub(crate) fn register(registry: &mut PropertyRegistry) {
    registry.register(Rc::new(ColorProperty::new("color")));
}
