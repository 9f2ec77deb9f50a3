//! Selector Groups
//!
//! All selectors sharing one root key (a type name or `*`), bucketed by
//! packed specificity key. Buckets are visited in ascending key order, and
//! within a bucket in insertion order, so the last applicable declaration
//! wins.
//!
//! Base-type rules are merged with a reserved `e` counter handed out
//! downwards from [`MAX_SPECIFICITY`]: the first base level merged (the
//! nearest supertype) outranks the ones after it, and own rules keep their
//! extra type count over every merged copy.

use std::collections::BTreeMap;
use std::fmt;

use crate::Descriptor;
use crate::node::Node;
use crate::selector::{MAX_SPECIFICITY, Selector, SpecificityKey};
use crate::style::Style;

#[derive(Debug, Clone)]
pub struct SelectorGroup {
    sets: BTreeMap<SpecificityKey, Vec<Selector>>,
    n_selectors: usize,
    min_reserved_e: u8,
    dangling: Vec<Selector>,
}

impl Default for SelectorGroup {
    fn default() -> Self {
        Self {
            sets: BTreeMap::new(),
            n_selectors: 0,
            min_reserved_e: MAX_SPECIFICITY + 1,
            dangling: Vec::new(),
        }
    }
}

impl SelectorGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket a selector under its key; ties keep insertion order
    pub fn add(&mut self, selector: Selector) {
        self.sets.entry(selector.key()).or_default().push(selector);
        self.n_selectors += 1;
    }

    pub fn len(&self) -> usize {
        self.n_selectors
    }

    pub fn is_empty(&self) -> bool {
        self.n_selectors == 0
    }

    /// Selectors in cascade order, lowest priority first
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.sets.values().flatten()
    }

    /// Copy of the group holding only bare type selectors
    pub fn type_only(&self) -> SelectorGroup {
        let mut group = SelectorGroup::new();
        for selector in self.iter().filter(|s| s.is_type_only()) {
            group.add(selector.clone());
        }
        group
    }

    /// Hand out the next base-type `e` value, below every one handed out so far
    pub fn reserve_e(&mut self) -> u8 {
        assert!(
            self.min_reserved_e > 1,
            "base-type priority range exhausted ({} levels)",
            MAX_SPECIFICITY
        );
        self.min_reserved_e -= 1;
        self.min_reserved_e
    }

    /// Merge `base` into this group as lower-priority base-type rules
    pub fn merge_as_base(&mut self, base: &SelectorGroup) {
        if base.is_empty() {
            return;
        }
        let e = self.reserve_e();
        for selector in base.iter() {
            self.add(selector.copy_as_base(e));
        }
        tracing::trace!(e, merged = base.len(), "merged base-type group");
    }

    /// Park a supertype selector until its base level is complete
    pub fn push_dangling(&mut self, selector: Selector) {
        self.dangling.push(selector);
    }

    /// Add parked selectors as one base level. Levels that matched nothing
    /// reserve no `e` value.
    pub fn settle_dangling(&mut self) {
        if self.dangling.is_empty() {
            return;
        }
        let e = self.reserve_e();
        for selector in std::mem::take(&mut self.dangling) {
            self.add(selector.copy_as_base(e));
        }
    }

    /// Copy every selector matching `node` into `into`, as base-level
    /// candidates when `as_base` is set. Returns whether any matched.
    pub fn collect(
        &self,
        node: &dyn Node,
        depth_limit: usize,
        into: &mut SelectorGroup,
        as_base: bool,
    ) -> bool {
        let mut matched = false;
        for selector in self.iter() {
            if !selector.matches_within(node, depth_limit) {
                continue;
            }
            matched = true;
            if as_base {
                into.push_dangling(selector.clone());
            } else {
                into.add(selector.clone());
            }
        }
        matched
    }

    /// Apply the blocks of every selector matching `node`, in cascade order.
    /// Returns whether any matched.
    pub fn apply(&self, node: &dyn Node, depth_limit: usize, style: &mut Style) -> bool {
        let mut matched = false;
        for selector in self.iter() {
            if selector.matches_within(node, depth_limit) {
                matched = true;
                apply_selector(selector, style);
            }
        }
        matched
    }

    /// Apply every selector's block, in cascade order
    pub fn apply_all(&self, style: &mut Style) {
        for selector in self.iter() {
            apply_selector(selector, style);
        }
    }

    /// Remove every selector loaded under `descriptor`; returns how many
    pub fn unload(&mut self, descriptor: Descriptor) -> usize {
        let before = self.n_selectors;
        for selectors in self.sets.values_mut() {
            selectors.retain(|s| s.descriptor() != Some(descriptor));
        }
        self.sets.retain(|_, selectors| !selectors.is_empty());
        self.dangling.retain(|s| s.descriptor() != Some(descriptor));
        self.n_selectors = self.sets.values().map(Vec::len).sum();
        before - self.n_selectors
    }
}

fn apply_selector(selector: &Selector, style: &mut Style) {
    if let Some(block) = selector.block() {
        tracing::trace!(selector = %selector, key = selector.key().0, "applying");
        style.apply_block(block);
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for selector in self.iter() {
            match selector.block() {
                Some(block) => writeln!(f, "{selector} {block}")?,
                None => writeln!(f, "{selector} {{ }}")?,
            }
        }
        Ok(())
    }
}
