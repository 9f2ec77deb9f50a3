//! Property Values
//!
//! Typed payloads stored in [`Property`](super::Property) plus the
//! term-level parsers shared by the property packs.

use std::fmt;

use crate::grammar::{Term, write_terms};

/// Resolved property payload
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Color(Color),
    Length(Length),
    BorderStyle(BorderStyle),
    Repeat(Repeat),
    Attachment(Attachment),
    Position(Position),
    Size(BackgroundSize),
    /// Resolved image location, e.g. the argument of `url()`
    Image(String),
    /// Unparsed terms of a property nobody registered
    Raw(Vec<Term>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Color(color) => write!(f, "{color}"),
            Value::Length(length) => write!(f, "{length}"),
            Value::BorderStyle(style) => f.write_str(style.as_str()),
            Value::Repeat(repeat) => f.write_str(repeat.as_str()),
            Value::Attachment(attachment) => f.write_str(attachment.as_str()),
            Value::Position(position) => write!(f, "{} {}", position.x, position.y),
            Value::Size(size) => write!(f, "{size}"),
            Value::Image(uri) => write!(f, "url({uri})"),
            Value::Raw(terms) => write_terms(f, terms),
        }
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color (#RGB, #RRGGBB, #RRGGBBAA)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Parse a named color
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" | "aqua" => Self::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "silver" => Self::rgb(192, 192, 192),
            "maroon" => Self::rgb(128, 0, 0),
            "olive" => Self::rgb(128, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "navy" => Self::rgb(0, 0, 128),
            "purple" => Self::rgb(128, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            _ => return None,
        })
    }

    /// Parse a single color term: name, hash, `rgb()` or `rgba()`
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Ident(name) => Self::from_name(name),
            Term::Hash(hex) => Self::from_hex(hex),
            Term::Function { name, args } if name == "rgb" || name == "rgba" => {
                Self::from_function_args(args)
            }
            _ => None,
        }
    }

    fn from_function_args(args: &[Term]) -> Option<Self> {
        let channels: Vec<&Term> = args.iter().filter(|t| **t != Term::Comma).collect();
        let channel = |term: &Term| -> Option<u8> {
            let value = match term {
                Term::Number(n) => *n,
                Term::Percentage(p) => p * 255.0 / 100.0,
                _ => return None,
            };
            Some(value.round().clamp(0.0, 255.0) as u8)
        };

        match channels.as_slice() {
            [r, g, b] => Some(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => {
                let alpha = match a {
                    Term::Number(n) => n * 255.0,
                    Term::Percentage(p) => p * 255.0 / 100.0,
                    _ => return None,
                };
                Some(Self::rgba(
                    channel(r)?,
                    channel(g)?,
                    channel(b)?,
                    alpha.round().clamp(0.0, 255.0) as u8,
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// Bare number, interpreted by the renderer (usually pixels)
    None,
    Px,
    Pt,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
    Vmin,
    Vmax,
    Ch,
    Ex,
}

impl LengthUnit {
    pub fn from_name(unit: &str) -> Option<Self> {
        Some(match unit {
            "px" => Self::Px,
            "pt" => Self::Pt,
            "em" => Self::Em,
            "rem" => Self::Rem,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "vmin" => Self::Vmin,
            "vmax" => Self::Vmax,
            "ch" => Self::Ch,
            "ex" => Self::Ex,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Px => "px",
            Self::Pt => "pt",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Percent => "%",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Ch => "ch",
            Self::Ex => "ex",
        }
    }
}

/// A number with a unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn px(value: f32) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    pub fn percent(value: f32) -> Self {
        Self::new(value, LengthUnit::Percent)
    }

    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Number(value) => Some(Self::new(*value, LengthUnit::None)),
            Term::Percentage(value) => Some(Self::percent(*value)),
            Term::Dimension { value, unit } => Some(Self::new(*value, LengthUnit::from_name(unit)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// Generates a keyword enum with `from_term` and `as_str`
macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $keyword:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn from_keyword(keyword: &str) -> Option<Self> {
                match keyword.to_ascii_lowercase().as_str() {
                    $($keyword => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn from_term(term: &Term) -> Option<Self> {
                term.as_ident().and_then(Self::from_keyword)
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword),+
                }
            }
        }
    };
}

keyword_enum!(
    /// Border line style
    BorderStyle {
        None => "none",
        Hidden => "hidden",
        Dotted => "dotted",
        Dashed => "dashed",
        Solid => "solid",
        Double => "double",
        Groove => "groove",
        Ridge => "ridge",
        Inset => "inset",
        Outset => "outset",
    }
);

keyword_enum!(
    /// Background tiling
    Repeat {
        Repeat => "repeat",
        RepeatX => "repeat-x",
        RepeatY => "repeat-y",
        NoRepeat => "no-repeat",
    }
);

keyword_enum!(
    /// Background scrolling behavior
    Attachment {
        Scroll => "scroll",
        Fixed => "fixed",
    }
);

/// Background offset; keywords resolve to percentages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: Length,
    pub y: Length,
}

impl Position {
    /// Parse one or two leading position terms, returning how many were used
    pub fn from_terms(terms: &[Term]) -> Option<(Self, usize)> {
        let first = terms.first()?;
        let (first_x, first_y) = position_component(first)?;

        if let Some(second) = terms.get(1) {
            if let Some((second_x, second_y)) = position_component(second) {
                // `top left` is written y first
                let (x, y) = if first_y.is_some() && first_x.is_none() {
                    (second_x.or(second_y), first_y)
                } else {
                    (first_x.or(first_y), second_y.or(second_x))
                };
                if let (Some(x), Some(y)) = (x, y) {
                    return Some((Self { x, y }, 2));
                }
            }
        }

        let center = Length::percent(50.0);
        let position = match (first_x, first_y) {
            (Some(x), None) => Self { x, y: center },
            (None, Some(y)) => Self { x: center, y },
            (Some(x), Some(_)) => Self { x, y: center },
            (None, None) => return None,
        };
        Some((position, 1))
    }
}

/// Split a position term into its horizontal and vertical readings
fn position_component(term: &Term) -> Option<(Option<Length>, Option<Length>)> {
    if let Some(length) = Length::from_term(term) {
        return Some((Some(length), Some(length)));
    }
    let keyword = term.as_ident()?.to_ascii_lowercase();
    Some(match keyword.as_str() {
        "left" => (Some(Length::percent(0.0)), None),
        "right" => (Some(Length::percent(100.0)), None),
        "top" => (None, Some(Length::percent(0.0))),
        "bottom" => (None, Some(Length::percent(100.0))),
        "center" => (Some(Length::percent(50.0)), Some(Length::percent(50.0))),
        _ => return None,
    })
}

/// Background scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundSize {
    Auto,
    Cover,
    Contain,
    /// Width and optional height, the missing one keeps the aspect ratio
    Explicit(Length, Option<Length>),
}

impl BackgroundSize {
    pub fn from_terms(terms: &[Term]) -> Option<Self> {
        match terms {
            [term] if term.is_ident("auto") => Some(Self::Auto),
            [term] if term.is_ident("cover") => Some(Self::Cover),
            [term] if term.is_ident("contain") => Some(Self::Contain),
            [width] => Some(Self::Explicit(Length::from_term(width)?, None)),
            [width, height] => Some(Self::Explicit(
                Length::from_term(width)?,
                Some(Length::from_term(height)?),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for BackgroundSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Cover => f.write_str("cover"),
            Self::Contain => f.write_str("contain"),
            Self::Explicit(width, None) => write!(f, "{width}"),
            Self::Explicit(width, Some(height)) => write!(f, "{width} {height}"),
        }
    }
}
