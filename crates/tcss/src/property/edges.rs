//! N-value edge shorthands
//!
//! `border-color`, `border-style`, `border-width`, `border-radius`, `padding`
//! and `margin` take one to four values and distribute them over the four
//! edges clockwise from the top (from the top-left corner for radii):
//!
//! | values | top | right | bottom | left |
//! |--------|-----|-------|--------|------|
//! | 1      | v0  | v0    | v0     | v0   |
//! | 2      | v0  | v1    | v0     | v1   |
//! | 3      | v0  | v1    | v2     | v1   |
//! | 4      | v0  | v1    | v2     | v3   |

use std::rc::Rc;

use super::{
    BorderStyle, Color, Converted, Length, ParseContext, Property, PropertyClass, PropertyError,
    PropertyRegistry, Value, ValueKind, convert_length, convert_text, inherit_through_fallback,
};
use crate::grammar::Term;
use crate::style::Style;

/// Box sides, clockwise from the top
pub const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Box corners, clockwise from the top-left
pub const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

/// Which family of longhands a shorthand expands into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    BorderColor,
    BorderStyle,
    BorderWidth,
    BorderRadius,
    Padding,
    Margin,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 6] = [
        EdgeKind::BorderColor,
        EdgeKind::BorderStyle,
        EdgeKind::BorderWidth,
        EdgeKind::BorderRadius,
        EdgeKind::Padding,
        EdgeKind::Margin,
    ];

    pub fn shorthand(self) -> &'static str {
        match self {
            EdgeKind::BorderColor => "border-color",
            EdgeKind::BorderStyle => "border-style",
            EdgeKind::BorderWidth => "border-width",
            EdgeKind::BorderRadius => "border-radius",
            EdgeKind::Padding => "padding",
            EdgeKind::Margin => "margin",
        }
    }

    /// Longhand names in clockwise order
    pub fn longhands(self) -> [String; 4] {
        match self {
            EdgeKind::BorderColor => SIDES.map(|side| format!("border-{side}-color")),
            EdgeKind::BorderStyle => SIDES.map(|side| format!("border-{side}-style")),
            EdgeKind::BorderWidth => SIDES.map(|side| format!("border-{side}-width")),
            EdgeKind::BorderRadius => CORNERS.map(|corner| format!("border-{corner}-radius")),
            EdgeKind::Padding => SIDES.map(|side| format!("padding-{side}")),
            EdgeKind::Margin => SIDES.map(|side| format!("margin-{side}")),
        }
    }

    /// Parse one edge value
    pub fn parse_value(self, term: &Term) -> Option<Value> {
        match self {
            EdgeKind::BorderColor => Color::from_term(term).map(Value::Color),
            EdgeKind::BorderStyle => BorderStyle::from_term(term).map(Value::BorderStyle),
            EdgeKind::BorderWidth
            | EdgeKind::BorderRadius
            | EdgeKind::Padding
            | EdgeKind::Margin => Length::from_term(term).map(Value::Length),
        }
    }

    pub(crate) fn convert(
        self,
        name: &str,
        value: &Value,
        target: ValueKind,
    ) -> Result<Converted, PropertyError> {
        match self {
            EdgeKind::BorderColor | EdgeKind::BorderStyle => convert_text(name, value, target),
            _ => convert_length(name, value, target),
        }
    }
}

/// Spread 1-4 values over four edges
pub fn distribute<T: Clone>(values: &[T]) -> Option<[T; 4]> {
    match values {
        [v0] => Some([v0.clone(), v0.clone(), v0.clone(), v0.clone()]),
        [v0, v1] => Some([v0.clone(), v1.clone(), v0.clone(), v1.clone()]),
        [v0, v1, v2] => Some([v0.clone(), v1.clone(), v2.clone(), v1.clone()]),
        [v0, v1, v2, v3] => Some([v0.clone(), v1.clone(), v2.clone(), v3.clone()]),
        _ => None,
    }
}

/// Parse up to four leading values, stopping at the first that fails
pub fn parse_edge_values(kind: EdgeKind, terms: &[Term]) -> Vec<Value> {
    terms
        .iter()
        .take(4)
        .map_while(|term| kind.parse_value(term))
        .collect()
}

/// One side or corner longhand
#[derive(Debug)]
pub struct EdgeLonghand {
    name: String,
    kind: EdgeKind,
}

impl EdgeLonghand {
    pub fn new(name: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl PropertyClass for EdgeLonghand {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, terms: &[Term], _ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        match terms {
            [term] => self
                .kind
                .parse_value(term)
                .map(Some)
                .ok_or_else(|| PropertyError::invalid(&self.name, terms)),
            _ => Err(PropertyError::invalid(&self.name, terms)),
        }
    }

    fn convert(&self, value: &Value, target: ValueKind) -> Result<Converted, PropertyError> {
        self.kind.convert(&self.name, value, target)
    }

    fn inherit(&self, name: &str, container: &Style, style: &mut Style) -> bool {
        inherit_through_fallback(name, container, style)
    }
}

/// `border-width: 1 2 3 4` and friends
#[derive(Debug)]
pub struct EdgeShorthand {
    kind: EdgeKind,
}

impl EdgeShorthand {
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }
}

impl PropertyClass for EdgeShorthand {
    fn name(&self) -> &str {
        self.kind.shorthand()
    }

    fn create(&self, terms: &[Term], _ctx: &ParseContext<'_>) -> Result<Option<Value>, PropertyError> {
        match terms {
            [term] => self
                .kind
                .parse_value(term)
                .map(Some)
                .ok_or_else(|| PropertyError::invalid(self.name(), terms)),
            _ => Err(PropertyError::invalid(self.name(), terms)),
        }
    }

    fn convert(&self, value: &Value, target: ValueKind) -> Result<Converted, PropertyError> {
        self.kind.convert(self.name(), value, target)
    }

    fn expand(
        &self,
        terms: &[Term],
        ctx: &ParseContext<'_>,
    ) -> Option<Result<Vec<(String, Property)>, PropertyError>> {
        Some(expand_edges(self.kind, terms, ctx))
    }

    fn longhands(&self) -> Vec<String> {
        self.kind.longhands().to_vec()
    }
}

fn expand_edges(
    kind: EdgeKind,
    terms: &[Term],
    ctx: &ParseContext<'_>,
) -> Result<Vec<(String, Property)>, PropertyError> {
    let values = parse_edge_values(kind, terms);
    if values.len() < terms.len().min(4) {
        tracing::debug!(
            property = kind.shorthand(),
            used = values.len(),
            "ignoring trailing edge values"
        );
    }
    let edges = distribute(&values).ok_or_else(|| PropertyError::invalid(kind.shorthand(), terms))?;

    let mut expanded = Vec::with_capacity(5);
    for (name, value) in kind.longhands().into_iter().zip(edges) {
        let class = lookup_class(ctx, &name)?;
        expanded.push((name, Property::set(class, value)));
    }

    // A single value also stands for the general name, so fallback lookups
    // from a longhand find it.
    if let [value] = values.as_slice() {
        let class = lookup_class(ctx, kind.shorthand())?;
        expanded.push((kind.shorthand().to_string(), Property::set(class, value.clone())));
    }

    Ok(expanded)
}

pub(crate) fn lookup_class(
    ctx: &ParseContext<'_>,
    name: &str,
) -> Result<Rc<dyn PropertyClass>, PropertyError> {
    ctx.registry
        .lookup(name)
        .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))
}

pub(crate) fn register(registry: &mut PropertyRegistry) {
    for kind in EdgeKind::ALL {
        registry.register(Rc::new(EdgeShorthand::new(kind)));
    }
}
