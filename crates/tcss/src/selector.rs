//! Selectors & Specificity
//!
//! A selector is a chain of simple match predicates. Refinements AND-compose on
//! the same node (`div.foo#bar`), `container` requires a matching direct
//! parent (`a > b`) and `antecessor` requires a matching ancestor (`a b`).
//!
//! Cascade priority is a packed 32-bit key:
//! `importance(2) | precedence(5) | a(5) | b(5) | c(5) | d(5) | e(5)`.
//! - a = inline (instance) selectors
//! - b = ID selectors
//! - c = class, attribute and pseudo-class selectors
//! - d = type selectors
//! - e = reserved for base-type merges

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::block::Block;
use crate::node::Node;
use crate::Descriptor;

/// Largest value any specificity counter (and the precedence) may hold
pub const MAX_SPECIFICITY: u8 = 31;

/// Depth used by [`Selector::matches`] when no configuration is at hand
pub(crate) const DEFAULT_MAX_NODE_DEPTH: usize = 256;

/// Per-match memo of failed searches.
///
/// Keys are `(chain link, hops above the subject, ancestor search)`. The
/// ancestor at a given distance is fixed once the subject is, so each key is
/// evaluated at most once and a match costs at most links × depth steps.
struct MatchState {
    depth_limit: usize,
    failed: HashSet<(usize, usize, bool)>,
}

/// Importance of a selector's declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Importance {
    #[default]
    None = 0,
    /// `!important` in an author stylesheet
    Author = 1,
    /// `!important` in a user stylesheet
    User = 2,
}

/// Specificity counters, each in `0..=MAX_SPECIFICITY`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Specificity {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
}

impl Specificity {
    pub fn new(a: u8, b: u8, c: u8, d: u8, e: u8) -> Self {
        for counter in [a, b, c, d, e] {
            assert!(
                counter <= MAX_SPECIFICITY,
                "specificity counter {counter} exceeds {MAX_SPECIFICITY}"
            );
        }
        Self { a, b, c, d, e }
    }

    /// Add another selector's counters to this one.
    ///
    /// `e` is left alone: it only carries base-type merge priority.
    ///
    /// Panics when a counter would exceed [`MAX_SPECIFICITY`].
    pub fn accumulate(&mut self, other: Specificity) {
        if let Err(e) = self.try_accumulate(other) {
            panic!("{e} ({self:?} + {other:?})");
        }
    }

    /// Checked [`accumulate`](Self::accumulate); leaves `self` untouched on overflow
    pub fn try_accumulate(&mut self, other: Specificity) -> Result<(), SpecificityOverflow> {
        *self = Self {
            a: add_counter(self.a, other.a)?,
            b: add_counter(self.b, other.b)?,
            c: add_counter(self.c, other.c)?,
            d: add_counter(self.d, other.d)?,
            e: self.e,
        };
        Ok(())
    }
}

fn add_counter(lhs: u8, rhs: u8) -> Result<u8, SpecificityOverflow> {
    let sum = lhs + rhs;
    if sum > MAX_SPECIFICITY {
        return Err(SpecificityOverflow);
    }
    Ok(sum)
}

/// A selector has more components of one kind than a counter can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("specificity counter overflow")]
pub struct SpecificityOverflow;

/// Packed cascade priority. Lower keys are applied first and lose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SpecificityKey(pub u32);

impl SpecificityKey {
    pub fn pack(importance: Importance, precedence: u8, specificity: Specificity) -> Self {
        assert!(
            precedence <= MAX_SPECIFICITY,
            "precedence {precedence} exceeds {MAX_SPECIFICITY}"
        );
        let Specificity { a, b, c, d, e } = specificity;
        Self(
            ((importance as u32) << 30)
                | ((precedence as u32) << 25)
                | ((a as u32) << 20)
                | ((b as u32) << 15)
                | ((c as u32) << 10)
                | ((d as u32) << 5)
                | (e as u32),
        )
    }

    pub fn importance(&self) -> Importance {
        match self.0 >> 30 {
            0 => Importance::None,
            1 => Importance::Author,
            _ => Importance::User,
        }
    }

    pub fn precedence(&self) -> u8 {
        ((self.0 >> 25) & 0x1F) as u8
    }

    pub fn specificity(&self) -> Specificity {
        let field = |shift: u32| ((self.0 >> shift) & 0x1F) as u8;
        Specificity {
            a: field(20),
            b: field(15),
            c: field(10),
            d: field(5),
            e: field(0),
        }
    }
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Exists,     // [attr]
    Equals,     // [attr=value]
    Contains,   // [attr*=value]
    StartsWith, // [attr^=value]
    EndsWith,   // [attr$=value]
    Includes,   // [attr~=value]
    DashMatch,  // [attr|=value]
}

impl AttrOp {
    fn as_str(self) -> &'static str {
        match self {
            AttrOp::Exists => "",
            AttrOp::Equals => "=",
            AttrOp::Contains => "*=",
            AttrOp::StartsWith => "^=",
            AttrOp::EndsWith => "$=",
            AttrOp::Includes => "~=",
            AttrOp::DashMatch => "|=",
        }
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
}

impl AttributeSelector {
    /// Check an attribute value (`None` when the node lacks the attribute)
    pub fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        let expected = self.value.as_str();

        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == expected,
            AttrOp::Contains => actual.contains(expected),
            AttrOp::StartsWith => actual.starts_with(expected),
            AttrOp::EndsWith => actual.ends_with(expected),
            AttrOp::Includes => actual.split_whitespace().any(|w| w == expected),
            AttrOp::DashMatch => {
                actual == expected
                    || (actual.starts_with(expected) && actual[expected.len()..].starts_with('-'))
            }
        }
    }
}

/// Match predicate of one selector link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    /// `*`
    Universal,
    /// `button`
    Type(String),
    /// A supertype rule merged into a subtype's group
    BaseType(String),
    /// `.class`
    Class(String),
    /// `#id`
    Id(String),
    /// `[name op value]`
    Attribute(AttributeSelector),
    /// `:hover`
    PseudoClass(String),
    /// Inline style of one node instance
    Instance(usize),
}

/// A selector chain and the declarations it carries
#[derive(Debug, Clone)]
pub struct Selector {
    kind: SelectorKind,
    importance: Importance,
    precedence: u8,
    specificity: Specificity,
    refinement: Option<Box<Selector>>,
    container: Option<Box<Selector>>,
    antecessor: Option<Box<Selector>>,
    block: Option<Rc<Block>>,
    descriptor: Option<Descriptor>,
}

impl Selector {
    fn with_kind(kind: SelectorKind, specificity: Specificity) -> Self {
        Self {
            kind,
            importance: Importance::None,
            precedence: 0,
            specificity,
            refinement: None,
            container: None,
            antecessor: None,
            block: None,
            descriptor: None,
        }
    }

    pub fn universal() -> Self {
        Self::with_kind(SelectorKind::Universal, Specificity::default())
    }

    pub fn of_type(name: impl Into<String>) -> Self {
        Self::with_kind(SelectorKind::Type(name.into()), Specificity::new(0, 0, 0, 1, 0))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(SelectorKind::Class(name.into()), Specificity::new(0, 0, 1, 0, 0))
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::with_kind(SelectorKind::Id(name.into()), Specificity::new(0, 1, 0, 0, 0))
    }

    pub fn attribute(name: impl Into<String>, op: AttrOp, value: impl Into<String>) -> Self {
        let attr = AttributeSelector {
            name: name.into(),
            op,
            value: value.into(),
        };
        Self::with_kind(SelectorKind::Attribute(attr), Specificity::new(0, 0, 1, 0, 0))
    }

    pub fn pseudo_class(name: impl Into<String>) -> Self {
        Self::with_kind(
            SelectorKind::PseudoClass(name.into()),
            Specificity::new(0, 0, 1, 0, 0),
        )
    }

    pub fn instance(instance: usize) -> Self {
        Self::with_kind(SelectorKind::Instance(instance), Specificity::new(1, 0, 0, 0, 0))
    }

    pub fn kind(&self) -> &SelectorKind {
        &self.kind
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Cascade priority of this selector
    pub fn key(&self) -> SpecificityKey {
        SpecificityKey::pack(self.importance, self.precedence, self.specificity)
    }

    /// Group key: the type name of the subject, or `*`
    pub fn root_key(&self) -> &str {
        match &self.kind {
            SelectorKind::Type(name) | SelectorKind::BaseType(name) => name,
            _ => crate::UNIVERSAL_KEY,
        }
    }

    pub fn refinement(&self) -> Option<&Selector> {
        self.refinement.as_deref()
    }

    pub fn container(&self) -> Option<&Selector> {
        self.container.as_deref()
    }

    pub fn antecessor(&self) -> Option<&Selector> {
        self.antecessor.as_deref()
    }

    pub fn block(&self) -> Option<&Rc<Block>> {
        self.block.as_ref()
    }

    pub fn descriptor(&self) -> Option<Descriptor> {
        self.descriptor
    }

    pub fn set_block(&mut self, block: Rc<Block>) {
        self.block = Some(block);
    }

    pub fn set_origin(&mut self, importance: Importance, precedence: u8) {
        assert!(precedence <= MAX_SPECIFICITY);
        self.importance = importance;
        self.precedence = precedence;
    }

    pub fn set_descriptor(&mut self, descriptor: Descriptor) {
        self.descriptor = Some(descriptor);
    }

    /// True for a bare `*` or type selector without refinement or combinators
    pub fn is_type_only(&self) -> bool {
        matches!(
            self.kind,
            SelectorKind::Universal | SelectorKind::Type(_) | SelectorKind::BaseType(_)
        ) && self.refinement.is_none()
            && self.container.is_none()
            && self.antecessor.is_none()
    }

    /// AND another simple selector onto this compound
    pub fn refine(&mut self, refinement: Selector) {
        if let Err(e) = self.try_refine(refinement) {
            panic!("{e} in {self}");
        }
    }

    /// Checked [`refine`](Self::refine)
    pub fn try_refine(&mut self, refinement: Selector) -> Result<(), SpecificityOverflow> {
        assert!(
            refinement.container.is_none() && refinement.antecessor.is_none(),
            "refinements cannot carry combinators"
        );
        self.specificity.try_accumulate(refinement.specificity)?;
        self.attach_refinement(refinement);
        Ok(())
    }

    fn attach_refinement(&mut self, refinement: Selector) {
        match self.refinement {
            Some(ref mut next) => next.attach_refinement(refinement),
            None => self.refinement = Some(Box::new(refinement)),
        }
    }

    /// `self > child`; returns the new subject
    pub fn append_child(self, child: Selector) -> Selector {
        match self.try_append_child(child) {
            Ok(subject) => subject,
            Err(e) => panic!("{e}"),
        }
    }

    /// Checked [`append_child`](Self::append_child)
    pub fn try_append_child(self, mut child: Selector) -> Result<Selector, SpecificityOverflow> {
        assert!(child.container.is_none() && child.antecessor.is_none());
        child.specificity.try_accumulate(self.specificity)?;
        child.container = Some(Box::new(self));
        Ok(child)
    }

    /// `self descendant`; returns the new subject
    pub fn append_descendant(self, descendant: Selector) -> Selector {
        match self.try_append_descendant(descendant) {
            Ok(subject) => subject,
            Err(e) => panic!("{e}"),
        }
    }

    /// Checked [`append_descendant`](Self::append_descendant)
    pub fn try_append_descendant(
        self,
        mut descendant: Selector,
    ) -> Result<Selector, SpecificityOverflow> {
        assert!(descendant.container.is_none() && descendant.antecessor.is_none());
        descendant.specificity.try_accumulate(self.specificity)?;
        descendant.antecessor = Some(Box::new(self));
        Ok(descendant)
    }

    /// Copy a type selector as a lower-priority base-type selector
    pub fn copy_as_base(&self, reserved_e: u8) -> Selector {
        let name = match &self.kind {
            SelectorKind::Type(name) => name.clone(),
            other => panic!("only type selectors can be merged as base, got {other:?}"),
        };
        assert!(reserved_e <= MAX_SPECIFICITY);

        let mut copy = self.clone();
        copy.kind = SelectorKind::BaseType(name);
        copy.specificity.d -= 1;
        copy.specificity.e = reserved_e;
        copy
    }

    /// Match against a node
    pub fn matches(&self, node: &dyn Node) -> bool {
        self.matches_within(node, DEFAULT_MAX_NODE_DEPTH)
    }

    /// Match with an explicit bound on how far up the container chain to look
    pub(crate) fn matches_within(&self, node: &dyn Node, depth_limit: usize) -> bool {
        let mut state = MatchState {
            depth_limit,
            failed: HashSet::new(),
        };
        self.match_at(node, 0, 0, &mut state)
    }

    /// Match the chain link `link` against the ancestor `distance` hops above
    /// the subject node
    fn match_at(&self, node: &dyn Node, link: usize, distance: usize, state: &mut MatchState) -> bool {
        if state.failed.contains(&(link, distance, false)) || !self.matches_compound(node) {
            return false;
        }

        let matched = self.match_combinators(node, link, distance, state);
        if !matched {
            state.failed.insert((link, distance, false));
        }
        matched
    }

    fn match_combinators(
        &self,
        node: &dyn Node,
        link: usize,
        distance: usize,
        state: &mut MatchState,
    ) -> bool {
        if let Some(container) = &self.container {
            if distance >= state.depth_limit {
                tracing::warn!(selector = %self, "container chain too deep, giving up");
                return false;
            }
            match node.container() {
                Some(parent) => {
                    if !container.match_at(parent.as_ref(), link + 1, distance + 1, state) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        if let Some(antecessor) = &self.antecessor {
            if !antecessor.match_some_ancestor(node, link + 1, distance, state) {
                return false;
            }
        }

        true
    }

    fn match_some_ancestor(
        &self,
        node: &dyn Node,
        link: usize,
        distance: usize,
        state: &mut MatchState,
    ) -> bool {
        if state.failed.contains(&(link, distance, true)) {
            return false;
        }
        if distance >= state.depth_limit {
            tracing::warn!(selector = %self, "ancestor chain too deep, giving up");
            return false;
        }

        let matched = match node.container() {
            Some(parent) => {
                self.match_at(parent.as_ref(), link, distance + 1, state)
                    || self.match_some_ancestor(parent.as_ref(), link, distance + 1, state)
            }
            None => false,
        };
        if !matched {
            state.failed.insert((link, distance, true));
        }
        matched
    }

    fn matches_compound(&self, node: &dyn Node) -> bool {
        let mut current = Some(self);
        while let Some(selector) = current {
            if !selector.matches_simple(node) {
                return false;
            }
            current = selector.refinement.as_deref();
        }
        true
    }

    fn matches_simple(&self, node: &dyn Node) -> bool {
        match &self.kind {
            SelectorKind::Universal => true,
            SelectorKind::Type(name) | SelectorKind::BaseType(name) => node.is_a(name),
            SelectorKind::Class(name) => node.classes().iter().any(|c| *c == name.as_str()),
            SelectorKind::Id(name) => node.id() == Some(name.as_str()),
            SelectorKind::Attribute(attr) => attr.matches(node.attribute(&attr.name).as_deref()),
            SelectorKind::PseudoClass(name) => node.pseudo_classes().iter().any(|p| *p == name.as_str()),
            SelectorKind::Instance(instance) => node.instance() == Some(*instance),
        }
    }

    fn fmt_compound(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SelectorKind::Universal => f.write_str("*")?,
            SelectorKind::Type(name) | SelectorKind::BaseType(name) => f.write_str(name)?,
            SelectorKind::Class(name) => write!(f, ".{name}")?,
            SelectorKind::Id(name) => write!(f, "#{name}")?,
            SelectorKind::Attribute(attr) => match attr.op {
                AttrOp::Exists => write!(f, "[{}]", attr.name)?,
                op => write!(f, "[{}{}\"{}\"]", attr.name, op.as_str(), attr.value)?,
            },
            SelectorKind::PseudoClass(name) => write!(f, ":{name}")?,
            SelectorKind::Instance(instance) => write!(f, "<instance {instance}>")?,
        }
        match &self.refinement {
            Some(refinement) => refinement.fmt_compound(f),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(container) = &self.container {
            write!(f, "{container} > ")?;
        } else if let Some(antecessor) = &self.antecessor {
            write!(f, "{antecessor} ")?;
        }
        self.fmt_compound(f)
    }
}
