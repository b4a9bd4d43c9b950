//! merge.rs - Combines rule trees that share prefixes.
//!
//! Parsing `x.y` and `x.z` yields two trees rooted at `x`. Merging deep-unions
//! them into one root with children `y` and `z`. Index matcher sets of
//! `Indexed` nodes are unioned. A leaf (mask the whole target) absorbs any
//! deeper rule for the same target, and an object rule meeting an array rule
//! for the same field masks that field whole, so the merged set never masks
//! less than one of its inputs would. Children of an `Indexed` node apply to
//! every matched index, so `e[2].f` with `e[4].g` masks `f` and `g` at both.
//!
//! License: MIT OR APACHE 2.0

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::rules::matcher::IndexMatcher;
use crate::rules::node::{RuleKind, RuleNode, RuleSet};

/// Merges parsed rule trees into a single `RuleSet`.
///
/// The result does not depend on the order of `nodes`, and repeating a node
/// has no effect.
pub fn merge<I>(nodes: I) -> RuleSet
where
    I: IntoIterator<Item = RuleNode>,
{
    let mut rule_set = RuleSet::new();
    for node in nodes {
        rule_set.merge_node(node);
    }
    rule_set
}

impl RuleSet {
    /// Merges one rule tree into this set.
    pub fn merge_node(&mut self, node: RuleNode) {
        match self.roots_mut().entry(node.key_name().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
            Entry::Occupied(mut slot) => {
                debug!("Merging rule tree into existing root '{}'.", node.key_name());
                merge_nodes(slot.get_mut(), node);
            }
        }
    }

    /// Merges every tree of `other` into this set.
    pub fn union(mut self, other: RuleSet) -> RuleSet {
        for node in other.into_nodes() {
            self.merge_node(node);
        }
        self
    }
}

/// Deep-unions `incoming` into `target`. Both must share a key name.
fn merge_nodes(target: &mut RuleNode, incoming: RuleNode) {
    let target_scalar_leaf = target.kind() == RuleKind::Scalar && target.is_leaf();
    let incoming_scalar_leaf = incoming.kind() == RuleKind::Scalar && incoming.is_leaf();
    let kinds_differ = target.kind() != incoming.kind();
    let either_leaf = target.is_leaf() || incoming.is_leaf();

    let (kind, children, matchers) = target.parts_mut();

    // A scalar leaf masks the whole field, whatever its shape. An object rule
    // meeting an array rule cannot keep both shapes, so the field is masked whole.
    if target_scalar_leaf || incoming_scalar_leaf || kinds_differ {
        if kinds_differ && !(target_scalar_leaf || incoming_scalar_leaf) {
            debug!("Object and array rules share one field; masking it whole.");
        }
        *kind = RuleKind::Scalar;
        children.clear();
        matchers.clear();
        return;
    }

    let (incoming_children, incoming_matchers) = into_parts(incoming);
    matchers.extend(incoming_matchers);

    if either_leaf {
        children.clear();
        return;
    }

    for (key, child) in incoming_children {
        match children.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(child);
            }
            Entry::Occupied(mut slot) => merge_nodes(slot.get_mut(), child),
        }
    }
}

fn into_parts(mut node: RuleNode) -> (BTreeMap<String, RuleNode>, BTreeSet<IndexMatcher>) {
    let (_, children, matchers) = node.parts_mut();
    (std::mem::take(children), std::mem::take(matchers))
}
