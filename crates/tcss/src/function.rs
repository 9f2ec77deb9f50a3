//! CSS function hooks
//!
//! Property classes resolve function terms such as `url(...)` through an
//! injected table instead of hard-coding them, so a theme engine can map
//! `url()` onto its own resource lookup.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::grammar::Term;

/// Resolves a function's arguments to a string, `None` when they make no sense
pub type FunctionHook = Rc<dyn Fn(&[Term]) -> Option<String>>;

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    hooks: HashMap<String, FunctionHook>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `url()` returning its argument unchanged
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("url", url);
        registry
    }

    /// Install or replace the hook for `name`
    pub fn register<F>(&mut self, name: &str, hook: F)
    where
        F: Fn(&[Term]) -> Option<String> + 'static,
    {
        self.hooks.insert(name.to_ascii_lowercase(), Rc::new(hook));
    }

    pub fn call(&self, name: &str, args: &[Term]) -> Option<String> {
        match self.hooks.get(name) {
            Some(hook) => hook(args),
            None => {
                tracing::debug!(function = name, "no hook registered");
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry").field("hooks", &names).finish()
    }
}

fn url(args: &[Term]) -> Option<String> {
    match args {
        [Term::String(uri)] | [Term::Ident(uri)] => Some(uri.clone()),
        _ => None,
    }
}
