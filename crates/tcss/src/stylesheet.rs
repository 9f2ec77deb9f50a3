//! Stylesheet & Cascade Query
//!
//! Maps every root key to a [`SelectorGroup`]. A query collects the matching
//! selectors of the universal group, the node's own type group, each
//! base-style level and the node's inline rules into one transient group,
//! applies it in key order and then resolves `inherit`.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use crate::block::Block;
use crate::config::Config;
use crate::grammar::{self, Declaration};
use crate::inherit;
use crate::node::Node;
use crate::selector::{Importance, MAX_SPECIFICITY, Selector};
use crate::selector_group::SelectorGroup;
use crate::style::Style;
use crate::{CssError, Descriptor, Origin};

/// Root key of selectors whose subject has no type
pub const UNIVERSAL_KEY: &str = "*";

#[derive(Debug)]
pub struct Stylesheet {
    config: Config,
    groups: HashMap<String, SelectorGroup>,
    base_types: HashMap<String, String>,
    /// Parsed inline rules per node instance
    inline: RefCell<HashMap<usize, SelectorGroup>>,
    next_descriptor: Cell<u32>,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Stylesheet {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            groups: HashMap::new(),
            base_types: HashMap::new(),
            inline: RefCell::new(HashMap::new()),
            next_descriptor: Cell::new(1),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Group for a root key (a type name or [`UNIVERSAL_KEY`])
    pub fn group(&self, key: &str) -> Option<&SelectorGroup> {
        self.groups.get(key)
    }

    /// Type names that have rules, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .groups
            .keys()
            .map(String::as_str)
            .filter(|key| *key != UNIVERSAL_KEY)
            .collect();
        names.sort_unstable();
        names
    }

    /// Deepest base-type level a query visits; each matching level takes
    /// one reserved `e` value
    fn max_base_levels(&self) -> usize {
        self.config.max_node_depth.min(MAX_SPECIFICITY as usize)
    }

    fn issue_descriptor(&self) -> Descriptor {
        let descriptor = Descriptor(self.next_descriptor.get());
        self.next_descriptor.set(descriptor.0 + 1);
        descriptor
    }

    /// Load CSS text. Malformed rules and declarations are logged and skipped.
    pub fn add_from_buffer(&mut self, css: &str, origin: Origin) -> Descriptor {
        let descriptor = self.issue_descriptor();
        let ctx = self.config.parse_context();
        let mut added = 0;

        for rule in grammar::parse_stylesheet(css) {
            let (important, normal): (Vec<&Declaration>, Vec<&Declaration>) = rule
                .declarations
                .iter()
                .partition(|d| d.important && origin != Origin::UserAgent);

            for (declarations, importance) in [
                (normal, Importance::None),
                (important, origin.importance()),
            ] {
                let block = Block::from_declarations(declarations, &ctx);
                if block.is_empty() {
                    continue;
                }
                let block = Rc::new(block);

                for selector in &rule.selectors {
                    let mut selector = selector.clone();
                    selector.set_origin(importance, origin.precedence());
                    selector.set_block(Rc::clone(&block));
                    selector.set_descriptor(descriptor);
                    self.groups
                        .entry(selector.root_key().to_string())
                        .or_default()
                        .add(selector);
                    added += 1;
                }
            }
        }

        tracing::debug!(%descriptor, ?origin, selectors = added, "loaded stylesheet");
        descriptor
    }

    /// Load a CSS file
    pub fn add_from_file(
        &mut self,
        path: impl AsRef<Path>,
        origin: Origin,
    ) -> Result<Descriptor, CssError> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path).map_err(|source| CssError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.add_from_buffer(&css, origin))
    }

    /// Remove everything loaded under `descriptor`, inline rules included.
    /// Returns whether anything was removed.
    pub fn unload(&mut self, descriptor: Descriptor) -> bool {
        let mut removed = 0;
        for group in self.groups.values_mut() {
            removed += group.unload(descriptor);
        }
        self.groups.retain(|_, group| !group.is_empty());

        let inline = self.inline.get_mut();
        for group in inline.values_mut() {
            removed += group.unload(descriptor);
        }
        inline.retain(|_, group| !group.is_empty());

        tracing::debug!(%descriptor, selectors = removed, "unloaded");
        removed > 0
    }

    /// Declare `base` as the supertype of `type_name` for
    /// [`query_by_type_name`](Self::query_by_type_name)
    pub fn set_base_type(&mut self, type_name: impl Into<String>, base: impl Into<String>) {
        self.base_types.insert(type_name.into(), base.into());
    }

    /// Resolved style of `node`, or `None` when no rule matches
    pub fn query(&self, node: &dyn Node) -> Option<Style> {
        let mut style = self.cascade(node)?;
        inherit::resolve(self, node, &mut style);
        Some(style)
    }

    /// Cascaded style of `node` with `inherit` left unresolved
    pub fn cascade(&self, node: &dyn Node) -> Option<Style> {
        let limit = self.config.max_node_depth;
        let mut result = SelectorGroup::new();
        let mut matched = false;

        if let Some(group) = self.groups.get(UNIVERSAL_KEY) {
            matched |= group.collect(node, limit, &mut result, false);
        }
        if let Some(group) = self.groups.get(node.type_name()) {
            matched |= group.collect(node, limit, &mut result, false);
        }
        matched |= self.collect_base_styles(node, &mut result, 0);
        matched |= self.collect_inline(node, &mut result);

        if !matched {
            return None;
        }

        let mut style = Style::new();
        style.set_viewport(node.viewport());
        result.apply_all(&mut style);
        Some(style)
    }

    fn collect_base_styles(&self, node: &dyn Node, result: &mut SelectorGroup, level: usize) -> bool {
        let Some(base) = node.base_style() else {
            return false;
        };
        if level >= self.max_base_levels() {
            tracing::warn!(node = node.type_name(), "base-style chain too deep, giving up");
            return false;
        }

        let mut matched = false;
        if let Some(group) = self.groups.get(base.type_name()) {
            matched = group.collect(base.as_ref(), self.config.max_node_depth, result, true);
            result.settle_dangling();
        }
        self.collect_base_styles(base.as_ref(), result, level + 1) || matched
    }

    fn collect_inline(&self, node: &dyn Node, result: &mut SelectorGroup) -> bool {
        let Some(instance) = node.instance() else {
            return false;
        };

        let candidate = Descriptor(self.next_descriptor.get());
        if let Some(css) = node.inline_style(candidate) {
            match self.parse_inline(instance, &css, candidate) {
                Ok(group) => {
                    self.next_descriptor.set(candidate.0 + 1);
                    tracing::debug!(instance, descriptor = %candidate, "parsed inline style");
                    self.inline.borrow_mut().insert(instance, group);
                }
                Err(e) => tracing::warn!(instance, "ignoring inline style: {e}"),
            }
        }

        match self.inline.borrow().get(&instance) {
            Some(group) => group.collect(node, self.config.max_node_depth, result, false),
            None => false,
        }
    }

    fn parse_inline(
        &self,
        instance: usize,
        css: &str,
        descriptor: Descriptor,
    ) -> Result<SelectorGroup, CssError> {
        let ctx = self.config.parse_context();
        let declarations = grammar::parse_declaration_list(css);
        let (important, normal): (Vec<&Declaration>, Vec<&Declaration>) =
            declarations.iter().partition(|d| d.important);

        let mut group = SelectorGroup::new();
        for (declarations, importance) in [
            (normal, Importance::None),
            (important, Origin::Author.importance()),
        ] {
            let block = Block::from_declarations(declarations, &ctx);
            if block.is_empty() {
                continue;
            }
            let mut selector = Selector::instance(instance);
            selector.set_origin(importance, Origin::Author.precedence());
            selector.set_block(Rc::new(block));
            selector.set_descriptor(descriptor);
            group.add(selector);
        }

        if group.is_empty() {
            return Err(CssError::ParseError {
                line: 1,
                message: format!("no usable declaration in {css:?}"),
            });
        }
        Ok(group)
    }

    /// Style of a bare type, without a node.
    ///
    /// Only selectors without refinements or combinators take part; the type
    /// hierarchy comes from [`set_base_type`](Self::set_base_type).
    /// Properties left in `inherit` are dropped, there is no container.
    pub fn query_by_type_name(&self, type_name: &str) -> Option<Style> {
        let mut result = SelectorGroup::new();
        for key in [UNIVERSAL_KEY, type_name] {
            if let Some(group) = self.groups.get(key) {
                for selector in group.iter().filter(|s| s.is_type_only()) {
                    result.add(selector.clone());
                }
            }
        }

        let mut visited = HashSet::from([type_name]);
        let mut current = self.base_types.get(type_name);
        while let Some(base) = current {
            if !visited.insert(base.as_str()) || visited.len() > self.max_base_levels() + 1 {
                tracing::warn!(type_name, base = %base, "base type chain cyclic or too deep, giving up");
                break;
            }
            if let Some(group) = self.groups.get(base) {
                result.merge_as_base(&group.type_only());
            }
            current = self.base_types.get(base);
        }

        if result.is_empty() {
            return None;
        }

        let mut style = Style::new();
        result.apply_all(&mut style);
        for name in style.pending_inherit() {
            tracing::debug!(type_name, property = %name, "no container to inherit from");
            style.remove(&name);
        }
        Some(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Color;
    use crate::selector::SelectorKind;
    use crate::test_node::TestNode;

    const RED: Option<Color> = Some(Color { r: 255, g: 0, b: 0, a: 255 });
    const BLUE: Option<Color> = Some(Color { r: 0, g: 0, b: 255, a: 255 });

    fn sheet(css: &str) -> Stylesheet {
        let mut sheet = Stylesheet::default();
        sheet.add_from_buffer(css, Origin::Author);
        sheet
    }

    #[test]
    fn test_rules_grouped_by_root_key() {
        let sheet = sheet("* { color: black; } button, label { color: red; } .x { color: blue; }");
        assert_eq!(sheet.type_names(), vec!["button", "label"]);
        assert_eq!(sheet.group(UNIVERSAL_KEY).map(SelectorGroup::len), Some(2));
    }

    #[test]
    fn test_important_split() {
        let sheet = sheet("button { color: red !important; padding: 1; }");
        let group = sheet.group("button").unwrap();
        let importances: Vec<Importance> = group.iter().map(|s| s.importance()).collect();
        assert_eq!(importances, vec![Importance::None, Importance::Author]);
    }

    #[test]
    fn test_user_agent_ignores_important() {
        let mut sheet = Stylesheet::default();
        sheet.add_from_buffer("button { color: red !important; }", Origin::UserAgent);
        let group = sheet.group("button").unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.iter().next().map(|s| s.importance()), Some(Importance::None));
    }

    #[test]
    fn test_empty_block_adds_nothing() {
        let sheet = sheet("button { } label { bogus-color: ; }");
        assert!(sheet.type_names().is_empty());
    }

    #[test]
    fn test_no_match_is_none() {
        let sheet = sheet("button { color: red; }");
        assert!(sheet.query(&TestNode::new("label")).is_none());
    }

    #[test]
    fn test_base_style_rules_apply_below_own() {
        let sheet = sheet("widget { color: blue; padding: 4; } button { color: red; }");
        let node = TestNode::new("button").with_supertypes(&["widget"]);
        let style = sheet.query(&node).unwrap();
        assert_eq!(style.color("color"), RED);
        assert_eq!(style.number("padding-top"), Some(4.0));
    }

    #[test]
    fn test_viewport_captured() {
        let sheet = sheet("button { color: red; }");
        let viewport = crate::Viewport::new(1.0, 2.0, 30.0, 40.0);
        let style = sheet.query(&TestNode::new("button").with_viewport(viewport)).unwrap();
        assert_eq!(style.viewport(), Some(viewport));
    }

    #[test]
    fn test_inline_style() {
        let sheet = sheet("label { color: red; padding: 1; }");
        let node = TestNode::new("label").with_instance(7).with_inline("color: blue");

        let style = sheet.query(&node).unwrap();
        assert_eq!(style.color("color"), BLUE);
        assert_eq!(style.number("padding-left"), Some(1.0));

        // Text is handed out once; the parsed rules stay
        let style = sheet.query(&node).unwrap();
        assert_eq!(style.color("color"), BLUE);
        assert_eq!(
            sheet.inline.borrow()[&7].iter().next().map(|s| s.kind().clone()),
            Some(SelectorKind::Instance(7))
        );
    }

    #[test]
    fn test_inline_descriptor_committed_on_success_only() {
        let sheet = sheet("label { color: red; }");
        let before = sheet.next_descriptor.get();

        let broken = TestNode::new("label").with_instance(1).with_inline("color: ;");
        sheet.query(&broken);
        assert_eq!(sheet.next_descriptor.get(), before);
        assert!(sheet.inline.borrow().is_empty());

        let good = TestNode::new("label").with_instance(1).with_inline("color: blue");
        sheet.query(&good);
        assert_eq!(sheet.next_descriptor.get(), before + 1);
    }

    #[test]
    fn test_unload_inline() {
        let mut sheet = sheet("label { color: red; }");
        let descriptor = Descriptor(sheet.next_descriptor.get());
        let node = TestNode::new("label").with_instance(3).with_inline("color: blue");
        sheet.query(&node);

        assert!(sheet.unload(descriptor));
        assert_eq!(sheet.query(&node).unwrap().color("color"), RED);
    }

    #[test]
    fn test_query_by_type_name() {
        let mut sheet = sheet(
            "widget { color: blue; padding: 2; } button { color: red; } button:hover { color: lime; } \
             button { margin: inherit; }",
        );
        sheet.set_base_type("button", "widget");

        let style = sheet.query_by_type_name("button").unwrap();
        assert_eq!(style.color("color"), RED);
        assert_eq!(style.number("padding-top"), Some(2.0));
        assert!(style.get("margin-top").is_none());
        assert!(sheet.query_by_type_name("window").is_none());
    }

    #[test]
    fn test_base_type_cycle_terminates() {
        let mut sheet = sheet("a { color: red; }");
        sheet.set_base_type("a", "b");
        sheet.set_base_type("b", "a");
        assert_eq!(sheet.query_by_type_name("a").unwrap().color("color"), RED);
    }
}
