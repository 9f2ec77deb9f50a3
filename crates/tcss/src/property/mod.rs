//! CSS Properties
//!
//! A [`Property`] is a value plus the [`PropertyClass`] that parsed it. Classes
//! are registered by name in a [`PropertyRegistry`]; one shared instance per
//! name, plus a single catch-all class for names nobody registered.
//!
//! Packs:
//! - [`color`]: `color`
//! - [`background`]: `background-*` and the `background` shorthand
//! - [`border`]: per-side/corner longhands, `border` and `border-{side}`
//! - [`box_model`]: `padding-*` and `margin-*`
//! - [`edges`]: the N-value edge shorthands
//! - [`generic`]: the catch-all class

pub mod background;
pub mod border;
pub mod box_model;
pub mod color;
pub mod edges;
pub mod generic;
mod registry;
mod values;

use std::fmt;
use std::rc::Rc;

use crate::function::FunctionRegistry;
use crate::grammar::Term;
use crate::style::Style;

pub use registry::PropertyRegistry;
pub use values::{
    Attachment, BackgroundSize, BorderStyle, Color, Length, LengthUnit, Position, Repeat, Value,
};

/// Lifecycle of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyState {
    /// Failed to parse; never stored
    Invalid,
    /// Explicitly nothing, e.g. `background-image: none`
    None,
    /// Take the value from the container node
    Inherit,
    /// Carries a value
    Set,
}

/// Target representation for [`PropertyClass::convert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
}

/// Result of [`PropertyClass::convert`]
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Number(f64),
    Text(String),
}

/// Property parse and conversion errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("Invalid value for {property}: {value}")]
    InvalidValue { property: String, value: String },

    #[error("Missing value for {0}")]
    EmptyValue(String),

    #[error("{property} cannot be converted to {target:?}")]
    NotConvertible { property: String, target: ValueKind },

    #[error("Unknown property: {0}")]
    UnknownProperty(String),
}

impl PropertyError {
    pub(crate) fn invalid(property: &str, terms: &[Term]) -> Self {
        let value = terms.iter().map(Term::to_string).collect::<Vec<_>>().join(" ");
        Self::InvalidValue {
            property: property.to_string(),
            value,
        }
    }
}

/// What a property class may consult while parsing
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub registry: &'a PropertyRegistry,
    pub functions: &'a FunctionRegistry,
}

/// Behavior table of one property.
///
/// The `inherit` keyword is handled before `create`/`expand` are called, so
/// implementations only see real values.
pub trait PropertyClass: fmt::Debug {
    fn name(&self) -> &str;

    /// Parse a value. `Ok(None)` stores the property in state `None`.
    fn create(&self, terms: &[Term], ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError>;

    /// Project a value for external inspection
    fn convert(&self, value: &Value, target: ValueKind) -> Result<Converted, PropertyError> {
        let _ = value;
        Err(PropertyError::NotConvertible {
            property: self.name().to_string(),
            target,
        })
    }

    /// Shorthand expansion into `(name, property)` pairs; `None` for longhands
    fn expand(
        &self,
        terms: &[Term],
        ctx: &ParseContext<'_>,
    ) -> Option<Result<Vec<(String, Property)>, PropertyError>> {
        let _ = (terms, ctx);
        None
    }

    /// Longhands a shorthand sets; they all take `inherit` with it
    fn longhands(&self) -> Vec<String> {
        Vec::new()
    }

    /// Resolve `name` (in state `Inherit`) against the container's style.
    /// Returns whether the property was resolved.
    fn inherit(&self, name: &str, container: &Style, style: &mut Style) -> bool {
        match container.get(name) {
            Some(property) if property.is_resolved() => {
                style.insert(name, Rc::clone(property));
                true
            }
            _ => false,
        }
    }
}

/// A property value and the class it belongs to
#[derive(Debug, Clone)]
pub struct Property {
    class: Rc<dyn PropertyClass>,
    state: PropertyState,
    value: Option<Value>,
}

impl Property {
    pub fn set(class: Rc<dyn PropertyClass>, value: Value) -> Self {
        Self {
            class,
            state: PropertyState::Set,
            value: Some(value),
        }
    }

    pub fn none(class: Rc<dyn PropertyClass>) -> Self {
        Self {
            class,
            state: PropertyState::None,
            value: None,
        }
    }

    pub fn inherit(class: Rc<dyn PropertyClass>) -> Self {
        Self {
            class,
            state: PropertyState::Inherit,
            value: None,
        }
    }

    /// Parse a longhand value with `class`
    pub fn parse(
        class: Rc<dyn PropertyClass>,
        terms: &[Term],
        ctx: &ParseContext<'_>,
    ) -> Result<Self, PropertyError> {
        if terms.is_empty() {
            return Err(PropertyError::EmptyValue(class.name().to_string()));
        }
        Ok(match class.create(terms, ctx)? {
            Some(value) => Self::set(class, value),
            None => Self::none(class),
        })
    }

    pub fn class(&self) -> &Rc<dyn PropertyClass> {
        &self.class
    }

    pub fn state(&self) -> PropertyState {
        self.state
    }

    /// The payload, only when the state is `Set`
    pub fn value(&self) -> Option<&Value> {
        match self.state {
            PropertyState::Set => self.value.as_ref(),
            _ => None,
        }
    }

    /// `Set` or `None`: nothing left to resolve
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, PropertyState::Set | PropertyState::None)
    }

    pub fn convert(&self, target: ValueKind) -> Result<Converted, PropertyError> {
        match self.value() {
            Some(value) => self.class.convert(value, target),
            None => Err(PropertyError::EmptyValue(self.class.name().to_string())),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.state, &self.value) {
            (PropertyState::Set, Some(value)) => write!(f, "{value}"),
            (PropertyState::Inherit, _) => f.write_str("inherit"),
            (PropertyState::Invalid, _) => f.write_str("<invalid>"),
            _ => f.write_str("none"),
        }
    }
}

/// Register every standard pack into `registry`
pub fn register_standard(registry: &mut PropertyRegistry) {
    color::register(registry);
    background::register(registry);
    border::register(registry);
    box_model::register(registry);
    edges::register(registry);
    registry.set_fallback(Rc::new(generic::GenericProperty));
}

/// Length conversion shared by the length-valued classes
pub(crate) fn convert_length(
    name: &str,
    value: &Value,
    target: ValueKind,
) -> Result<Converted, PropertyError> {
    match (value, target) {
        (Value::Length(length), ValueKind::Number) => Ok(Converted::Number(length.value as f64)),
        (value, ValueKind::Text) => Ok(Converted::Text(value.to_string())),
        _ => Err(PropertyError::NotConvertible {
            property: name.to_string(),
            target,
        }),
    }
}

/// Text-only conversion shared by keyword and color classes
pub(crate) fn convert_text(
    name: &str,
    value: &Value,
    target: ValueKind,
) -> Result<Converted, PropertyError> {
    match target {
        ValueKind::Text => Ok(Converted::Text(value.to_string())),
        ValueKind::Number => Err(PropertyError::NotConvertible {
            property: name.to_string(),
            target,
        }),
    }
}

/// Inherit hook of side and corner longhands: the container may only carry
/// the general shorthand (or, for colors, plain `color`).
pub(crate) fn inherit_through_fallback(name: &str, container: &Style, style: &mut Style) -> bool {
    match container.lookup(name) {
        Some(property) if property.is_resolved() => {
            style.insert(name, Rc::clone(property));
            true
        }
        _ => false,
    }
}
