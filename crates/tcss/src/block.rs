//! Declaration Blocks
//!
//! The parsed body of one rule: property name → value. Shorthands are stored
//! expanded, so a block only ever holds names a style can be queried for.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::grammar::Declaration;
use crate::property::edges::lookup_class;
use crate::property::{ParseContext, Property, PropertyError, PropertyState};

#[derive(Debug, Clone, Default)]
pub struct Block {
    properties: HashMap<String, Rc<Property>>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse declarations into a block; bad declarations are logged and dropped
    pub fn from_declarations<'a>(
        declarations: impl IntoIterator<Item = &'a Declaration>,
        ctx: &ParseContext<'_>,
    ) -> Self {
        let mut block = Self::new();
        for declaration in declarations {
            if let Err(e) = block.parse_declaration(declaration, ctx) {
                tracing::warn!(property = %declaration.name, "dropping declaration: {e}");
            }
        }
        block
    }

    /// Parse one declaration into this block.
    ///
    /// A failing shorthand stores none of its longhands.
    pub fn parse_declaration(
        &mut self,
        declaration: &Declaration,
        ctx: &ParseContext<'_>,
    ) -> Result<(), PropertyError> {
        let class = lookup_class(ctx, &declaration.name)?;

        if let [term] = declaration.terms.as_slice() {
            if term.is_ident("inherit") {
                for longhand in class.longhands() {
                    let longhand_class = lookup_class(ctx, &longhand)?;
                    self.insert(longhand, Property::inherit(longhand_class));
                }
                self.insert(declaration.name.clone(), Property::inherit(class));
                return Ok(());
            }
        }

        if let Some(expanded) = class.expand(&declaration.terms, ctx) {
            for (name, property) in expanded? {
                self.insert(name, property);
            }
            return Ok(());
        }

        let property = Property::parse(class, &declaration.terms, ctx)?;
        self.insert(declaration.name.clone(), property);
        Ok(())
    }

    pub fn insert(&mut self, name: impl Into<String>, property: Property) {
        assert!(
            property.state() != PropertyState::Invalid,
            "invalid properties are never stored"
        );
        self.properties.insert(name.into(), Rc::new(property));
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Property>> {
        self.properties.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<Property>)> {
        self.properties.iter().map(|(name, property)| (name.as_str(), property))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.properties.keys().collect();
        names.sort();
        f.write_str("{")?;
        for name in names {
            write!(f, " {name}: {};", self.properties[name])?;
        }
        f.write_str(" }")
    }
}
