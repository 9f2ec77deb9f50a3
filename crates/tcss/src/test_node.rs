//! In-memory node used by unit tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::node::{Node, Viewport};
use crate::Descriptor;

#[derive(Debug, Clone, Default)]
pub(crate) struct TestNode {
    type_name: String,
    supertypes: Vec<String>,
    id: Option<String>,
    classes: Vec<String>,
    pseudo_classes: Vec<String>,
    attributes: Vec<(String, String)>,
    instance: Option<usize>,
    inline: Rc<RefCell<Option<String>>>,
    viewport: Option<Viewport>,
    parent: Option<Rc<TestNode>>,
    cyclic: bool,
}

impl TestNode {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    /// Supertypes, nearest first
    pub(crate) fn with_supertypes(mut self, supertypes: &[&str]) -> Self {
        self.supertypes = supertypes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub(crate) fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes = classes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn with_pseudo_classes(mut self, pseudo_classes: &[&str]) -> Self {
        self.pseudo_classes = pseudo_classes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub(crate) fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn with_instance(mut self, instance: usize) -> Self {
        self.instance = Some(instance);
        self
    }

    pub(crate) fn with_inline(mut self, css: &str) -> Self {
        self.inline = Rc::new(RefCell::new(Some(css.to_string())));
        self
    }

    pub(crate) fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub(crate) fn with_parent(mut self, parent: TestNode) -> Self {
        self.parent = Some(Rc::new(parent));
        self
    }

    /// Container chain that loops back onto this node forever
    pub(crate) fn with_cyclic_container(mut self) -> Self {
        self.cyclic = true;
        self
    }
}

impl Node for TestNode {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn is_a(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.supertypes.iter().any(|s| s == type_name)
    }

    fn container(&self) -> Option<Box<dyn Node + '_>> {
        if self.cyclic {
            return Some(Box::new(self.clone()));
        }
        let parent = self.parent.as_ref()?;
        Some(Box::new(parent.as_ref().clone()))
    }

    fn base_style(&self) -> Option<Box<dyn Node + '_>> {
        let (base, rest) = self.supertypes.split_first()?;
        let mut node = self.clone();
        node.type_name = base.clone();
        node.supertypes = rest.to_vec();
        Some(Box::new(node))
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
