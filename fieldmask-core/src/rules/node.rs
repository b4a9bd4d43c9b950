//! node.rs - The compiled rule tree.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::rules::matcher::{any_matches, IndexMatcher};

/// Whether a rule addresses a plain field or selected elements of an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Scalar,
    Indexed,
}

/// One node of a compiled rule tree.
///
/// A node without children masks the whole field (or, for `Indexed`, each
/// matched element). A node with children descends and masks only the named
/// sub-fields. `index_matchers` is non-empty exactly when `kind` is `Indexed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleNode {
    key_name: String,
    kind: RuleKind,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, RuleNode>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    index_matchers: BTreeSet<IndexMatcher>,
}

impl RuleNode {
    /// A `Scalar` leaf named `key_name`.
    pub fn scalar(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            kind: RuleKind::Scalar,
            children: BTreeMap::new(),
            index_matchers: BTreeSet::new(),
        }
    }

    /// An `Indexed` leaf named `key_name`. Returns `None` if `matchers` is empty.
    pub fn indexed<I>(key_name: impl Into<String>, matchers: I) -> Option<Self>
    where
        I: IntoIterator<Item = IndexMatcher>,
    {
        let index_matchers: BTreeSet<IndexMatcher> = matchers.into_iter().collect();
        if index_matchers.is_empty() {
            return None;
        }
        Some(Self {
            key_name: key_name.into(),
            kind: RuleKind::Indexed,
            children: BTreeMap::new(),
            index_matchers,
        })
    }

    /// Attaches `child` under its own key name, replacing any child of that name.
    pub fn with_child(mut self, child: RuleNode) -> Self {
        self.children.insert(child.key_name.clone(), child);
        self
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn children(&self) -> &BTreeMap<String, RuleNode> {
        &self.children
    }

    pub fn child(&self, key: &str) -> Option<&RuleNode> {
        self.children.get(key)
    }

    pub fn index_matchers(&self) -> &BTreeSet<IndexMatcher> {
        &self.index_matchers
    }

    /// True when this node masks its whole target rather than descending.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when an `Indexed` node selects the element at `index`.
    /// Always false for `Scalar` nodes.
    pub fn matches_index(&self, index: usize) -> bool {
        self.kind == RuleKind::Indexed && any_matches(&self.index_matchers, index)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(RuleNode::node_count).sum::<usize>()
    }

    // Used by the merger, which is the only place nodes change after parsing.
    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut RuleKind,
        &mut BTreeMap<String, RuleNode>,
        &mut BTreeSet<IndexMatcher>,
    ) {
        (&mut self.kind, &mut self.children, &mut self.index_matchers)
    }
}

/// A compiled, merged forest of rule trees keyed by top-level field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    roots: BTreeMap<String, RuleNode>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&RuleNode> {
        self.roots.get(key)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuleNode)> {
        self.roots.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    /// Consumes the set, yielding its root trees in key order.
    pub fn into_nodes(self) -> impl Iterator<Item = RuleNode> {
        self.roots.into_values()
    }

    pub(crate) fn roots_mut(&mut self) -> &mut BTreeMap<String, RuleNode> {
        &mut self.roots
    }
}
