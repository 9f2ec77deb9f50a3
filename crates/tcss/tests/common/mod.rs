//! Shared test fixtures

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use tcss::{Descriptor, Node, Viewport};

/// Install a test-writer subscriber; `RUST_LOG=tcss=trace` shows the cascade
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Widget tree node with a single-inheritance type chain
#[derive(Debug, Clone, Default)]
pub struct Widget {
    /// Own type first, then supertypes
    types: Vec<String>,
    id: Option<String>,
    classes: Vec<String>,
    pseudo_classes: Vec<String>,
    attributes: Vec<(String, String)>,
    instance: Option<usize>,
    inline: Rc<RefCell<Option<String>>>,
    viewport: Option<Viewport>,
    parent: Option<Rc<Widget>>,
}

impl Widget {
    pub fn new(types: &[&str]) -> Self {
        assert!(!types.is_empty());
        Self {
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn state(mut self, pseudo_class: &str) -> Self {
        self.pseudo_classes.push(pseudo_class.to_string());
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn inline(mut self, instance: usize, css: &str) -> Self {
        self.instance = Some(instance);
        self.inline = Rc::new(RefCell::new(Some(css.to_string())));
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn inside(mut self, parent: Widget) -> Self {
        self.parent = Some(Rc::new(parent));
        self
    }
}

impl Node for Widget {
    fn type_name(&self) -> &str {
        &self.types[0]
    }

    fn is_a(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }

    fn container(&self) -> Option<Box<dyn Node + '_>> {
        let parent = self.parent.as_ref()?;
        Some(Box::new(parent.as_ref().clone()))
    }

    fn base_style(&self) -> Option<Box<dyn Node + '_>> {
        if self.types.len() < 2 {
            return None;
        }
        let mut base = self.clone();
        base.types.remove(0);
        Some(Box::new(base))
    }

    fn instance(&self) -> Option<usize> {
        self.instance
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn classes(&self) -> Vec<&str> {
        self.classes.iter().map(String::as_str).collect()
    }

    fn pseudo_classes(&self) -> Vec<&str> {
        self.pseudo_classes.iter().map(String::as_str).collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn inline_style(&self, _descriptor: Descriptor) -> Option<String> {
        self.inline.borrow_mut().take()
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

/// Node whose container and base style both loop back onto itself
#[derive(Debug, Clone)]
pub struct Loop(pub &'static str);

impl Node for Loop {
    fn type_name(&self) -> &str {
        self.0
    }

    fn container(&self) -> Option<Box<dyn Node + '_>> {
        Some(Box::new(self.clone()))
    }

    fn base_style(&self) -> Option<Box<dyn Node + '_>> {
        Some(Box::new(self.clone()))
    }
}
