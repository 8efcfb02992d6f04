//! Filter query tree.
//!
//! A parsed filter is a tree of [`FilterNode`]s: conditions at the leaves and
//! groups combining their children with a single conjunction. The tree
//! serializes to the JSON shape the TaskNotes query endpoint accepts:
//!
//! ```json
//! {"type": "group", "id": "group-3", "conjunction": "and", "children": [
//!   {"type": "condition", "id": "condition-1", "property": "status", "operator": "is", "value": "open"},
//!   {"type": "condition", "id": "condition-2", "property": "tags", "operator": "contains", "value": "work"}
//! ]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::Operator;

/// The boolean combinator applied across a group's children.
///
/// Any conjunction other than `"or"` read from JSON is treated as `"and"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    /// Returns the lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }
}

impl From<String> for Conjunction {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("or") {
            Conjunction::Or
        } else {
            Conjunction::And
        }
    }
}

impl From<Conjunction> for String {
    fn from(c: Conjunction) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a condition compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// A number, produced for numeric properties.
    Number(f64),
    /// Raw text for every other property kind.
    Text(String),
}

impl ConditionValue {
    /// Returns the value as text, formatting numbers without a trailing `.0`.
    pub fn to_text(&self) -> String {
        match self {
            ConditionValue::Number(n) => n.to_string(),
            ConditionValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        ConditionValue::Text(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        ConditionValue::Text(s)
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

/// A leaf comparing one task property against a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Identifier unique within one tree.
    pub id: String,
    /// Canonical property name.
    pub property: String,
    /// Canonical operator.
    pub operator: Operator,
    /// Comparison value; `None` for operators that need no value.
    pub value: Option<ConditionValue>,
}

/// An interior node combining its children with one conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Identifier unique within one tree.
    pub id: String,
    /// How the children are combined.
    pub conjunction: Conjunction,
    /// Child nodes, in source order.
    #[serde(default)]
    pub children: Vec<FilterNode>,
}

/// A node in the filter query tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterNode {
    Condition(Condition),
    Group(FilterGroup),
}

impl FilterNode {
    /// Returns the node id.
    pub fn id(&self) -> &str {
        match self {
            FilterNode::Condition(c) => &c.id,
            FilterNode::Group(g) => &g.id,
        }
    }

    /// Returns the condition if this node is a leaf.
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            FilterNode::Condition(c) => Some(c),
            FilterNode::Group(_) => None,
        }
    }

    /// Returns the group if this node is an interior node.
    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            FilterNode::Group(g) => Some(g),
            FilterNode::Condition(_) => None,
        }
    }

    /// Counts the conditions in this subtree.
    pub fn condition_count(&self) -> usize {
        match self {
            FilterNode::Condition(_) => 1,
            FilterNode::Group(g) => g.children.iter().map(FilterNode::condition_count).sum(),
        }
    }

    /// Returns true if any condition in this subtree tests `property`.
    pub fn references_property(&self, property: &str) -> bool {
        match self {
            FilterNode::Condition(c) => c.property == property,
            FilterNode::Group(g) => g.children.iter().any(|c| c.references_property(property)),
        }
    }
}

/// The root of a parsed filter: always a group.
///
/// Serializes as a `"group"` node. Deserializing a bare condition wraps it in
/// a singleton `and` group, the same shape [`FilterParser`](crate::FilterParser)
/// produces for a single-condition expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FilterNode", into = "FilterNode")]
pub struct FilterQuery {
    root: FilterGroup,
}

/// Id given to roots created outside a parse.
const ROOT_ID: &str = "root";

impl FilterQuery {
    /// Creates a query from a conjunction and its top-level children.
    pub fn new(conjunction: Conjunction, children: Vec<FilterNode>) -> Self {
        Self {
            root: FilterGroup {
                id: ROOT_ID.to_string(),
                conjunction,
                children,
            },
        }
    }

    /// Creates a query that matches every task (an empty `and` group).
    pub fn match_all() -> Self {
        Self::new(Conjunction::And, Vec::new())
    }

    /// Returns the root group id.
    pub fn id(&self) -> &str {
        &self.root.id
    }

    /// Returns the root conjunction.
    pub fn conjunction(&self) -> Conjunction {
        self.root.conjunction
    }

    /// Returns the top-level children.
    pub fn children(&self) -> &[FilterNode] {
        &self.root.children
    }

    /// Returns the root group.
    pub fn as_group(&self) -> &FilterGroup {
        &self.root
    }

    /// Consumes the query, returning the root group.
    pub fn into_group(self) -> FilterGroup {
        self.root
    }

    /// Returns true if any condition tests the canonical `property`.
    pub fn references_property(&self, property: &str) -> bool {
        self.root
            .children
            .iter()
            .any(|c| c.references_property(property))
    }

    /// Returns true if the query has no conditions at all.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

impl From<FilterGroup> for FilterQuery {
    fn from(root: FilterGroup) -> Self {
        Self { root }
    }
}

impl From<FilterNode> for FilterQuery {
    fn from(node: FilterNode) -> Self {
        match node {
            FilterNode::Group(root) => Self { root },
            condition @ FilterNode::Condition(_) => Self::new(Conjunction::And, vec![condition]),
        }
    }
}

impl From<FilterQuery> for FilterNode {
    fn from(query: FilterQuery) -> Self {
        FilterNode::Group(query.root)
    }
}

/// Generates ids unique within one tree.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    next: u32,
    namespace: Option<&'static str>,
}

impl IdGenerator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Ids from a namespaced generator never collide with those of [`IdGenerator::new`].
    pub(crate) fn namespaced(namespace: &'static str) -> Self {
        Self {
            next: 0,
            namespace: Some(namespace),
        }
    }

    fn next_id(&mut self, kind: &str) -> String {
        self.next += 1;
        match self.namespace {
            Some(ns) => format!("{ns}-{kind}-{}", self.next),
            None => format!("{kind}-{}", self.next),
        }
    }

    pub(crate) fn condition_id(&mut self) -> String {
        self.next_id("condition")
    }

    pub(crate) fn group_id(&mut self) -> String {
        self.next_id("group")
    }
}
