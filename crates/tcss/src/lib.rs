//! tcss - Theme CSS Engine
//!
//! Cascade and style resolution for a CSS subset used to theme widget trees.
//! A [`Stylesheet`] indexes selectors by root type, answers cascade queries for
//! caller-implemented [`Node`]s and resolves `inherit` against container nodes.
//!
//! # Example
//! ```rust,ignore
//! use tcss::{Origin, Stylesheet};
//!
//! let mut sheet = Stylesheet::default();
//! sheet.add_from_buffer("button { color: red; }", Origin::Author);
//! let style = sheet.query(&my_button).unwrap();
//! assert_eq!(style.color("color"), Some(tcss::Color::rgb(255, 0, 0)));
//! ```

mod block;
mod config;
mod function;
pub mod grammar;
mod inherit;
mod node;
pub mod property;
mod selector;
mod selector_group;
mod style;
mod stylesheet;

#[cfg(test)]
mod test_node;

use std::fmt;
use std::path::PathBuf;

pub use block::Block;
pub use config::Config;
pub use function::{FunctionHook, FunctionRegistry};
pub use grammar::{Declaration, Term};
pub use node::{Node, Viewport};
pub use property::{
    BorderStyle, Color, Converted, Length, LengthUnit, ParseContext, Property, PropertyClass,
    PropertyError, PropertyRegistry, PropertyState, Value, ValueKind,
};
pub use selector::{
    AttrOp, AttributeSelector, Importance, MAX_SPECIFICITY, Selector, SelectorKind, Specificity,
    SpecificityKey, SpecificityOverflow,
};
pub use selector_group::SelectorGroup;
pub use style::{Style, fallback_for};
pub use stylesheet::{Stylesheet, UNIVERSAL_KEY};

/// Handle for one batch of selectors loaded from a single source.
///
/// Descriptors are issued in increasing order and never reused by a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Descriptor(pub u32);

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stylesheet origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    /// Built-in defaults; `!important` is ignored
    UserAgent,
    /// User preferences
    User,
    /// Application or theme author
    Author,
}

impl Origin {
    /// Precedence rank packed into the specificity key
    pub fn precedence(self) -> u8 {
        match self {
            Origin::UserAgent => 0,
            Origin::User => 1,
            Origin::Author => 2,
        }
    }

    /// Importance given to `!important` declarations from this origin
    pub fn importance(self) -> Importance {
        match self {
            Origin::UserAgent => Importance::None,
            Origin::User => Importance::User,
            Origin::Author => Importance::Author,
        }
    }
}

/// Stylesheet loading error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
