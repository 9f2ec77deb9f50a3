//! Node Capability Interface
//!
//! The engine never owns document nodes. Callers wrap whatever tree they have
//! (widgets, DOM elements, scene actors) in a type implementing [`Node`].

/// Visible area of a node, used by renderers to resolve relative geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// A node queried by the cascade.
///
/// Handles returned by [`Node::container`] and [`Node::base_style`] are
/// dropped as soon as the engine is done with them; that drop is the
/// release point for any resources the implementation holds.
///
/// The container graph and the base-style chain are expected to be finite
/// and acyclic. The engine bounds every walk by `Config::max_node_depth`
/// so a broken implementation degrades into missing matches, not a hang.
pub trait Node {
    /// Type name, e.g. `"button"`. This selects the selector group to query.
    fn type_name(&self) -> &str;

    /// Whether this node is an instance of `type_name`, including supertypes
    fn is_a(&self, type_name: &str) -> bool {
        self.type_name() == type_name
    }

    /// Direct container (parent) node
    fn container(&self) -> Option<Box<dyn Node + '_>> {
        None
    }

    /// This node viewed as its supertype, one level up the type hierarchy
    fn base_style(&self) -> Option<Box<dyn Node + '_>> {
        None
    }

    /// Stable identity used by inline-style selectors
    fn instance(&self) -> Option<usize> {
        None
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn classes(&self) -> Vec<&str> {
        Vec::new()
    }

    fn pseudo_classes(&self) -> Vec<&str> {
        Vec::new()
    }

    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    /// Inline declarations for this node.
    ///
    /// The stylesheet passes the descriptor it will assign to the parsed
    /// result. Implementations return the text once per descriptor; the
    /// parsed rules are kept until that descriptor is unloaded.
    fn inline_style(&self, _descriptor: crate::Descriptor) -> Option<String> {
        None
    }

    fn viewport(&self) -> Option<Viewport> {
        None
    }
}
