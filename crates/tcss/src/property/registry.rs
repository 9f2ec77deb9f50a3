//! Property class registry

use std::collections::HashMap;
use std::rc::Rc;

use super::PropertyClass;

/// Name → property class table.
///
/// Registration happens before any parsing. A duplicate name is a
/// configuration error and panics.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    classes: HashMap<String, Rc<dyn PropertyClass>>,
    fallback: Option<Rc<dyn PropertyClass>>,
}

impl PropertyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every standard pack
    pub fn standard() -> Self {
        let mut registry = Self::new();
        super::register_standard(&mut registry);
        registry
    }

    pub fn register(&mut self, class: Rc<dyn PropertyClass>) {
        let name = class.name().to_string();
        assert!(
            !self.classes.contains_key(&name),
            "property class {name:?} registered twice"
        );
        tracing::trace!(property = %name, "registered property class");
        self.classes.insert(name, class);
    }

    /// Install the catch-all class used for unknown names
    pub fn set_fallback(&mut self, class: Rc<dyn PropertyClass>) {
        assert!(self.fallback.is_none(), "fallback property class registered twice");
        self.fallback = Some(class);
    }

    /// Exact lookup, no fallback
    pub fn get(&self, name: &str) -> Option<&Rc<dyn PropertyClass>> {
        self.classes.get(name)
    }

    /// Lookup falling back to the catch-all class
    pub fn lookup(&self, name: &str) -> Option<Rc<dyn PropertyClass>> {
        self.classes.get(name).or(self.fallback.as_ref()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
