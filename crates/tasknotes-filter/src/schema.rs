//! Property and operator schema for filter expressions.
//!
//! The tables here are plain constants shared by every parse. Properties are
//! looked up by canonical name or by one of their short aliases, operators by
//! canonical kebab-case name or by an alias such as `before` or `equals`.

use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use super::error::{FilterError, FilterResult};

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The schema-declared type category of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text, matched by substring.
    Text,
    /// One of a fixed set of values (or a list of them for array properties).
    Select,
    /// An ISO-8601 date or datetime string.
    Date,
    /// A checkbox-style flag.
    Boolean,
    /// A number.
    Numeric,
    /// Anything with bespoke semantics, such as recurrence rules.
    Special,
}

impl ValueKind {
    /// Returns the lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Select => "select",
            ValueKind::Date => "date",
            ValueKind::Boolean => "boolean",
            ValueKind::Numeric => "numeric",
            ValueKind::Special => "special",
        }
    }
}

/// A filterable task property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    /// Canonical property name, as it appears on task records.
    pub name: &'static str,
    /// Value kind, used to infer operators and coerce values.
    pub kind: ValueKind,
    /// Whether the property holds a list of strings.
    pub is_array: bool,
    /// One-line description for help output.
    pub description: &'static str,
}

const fn prop(
    name: &'static str,
    kind: ValueKind,
    is_array: bool,
    description: &'static str,
) -> PropertyDef {
    PropertyDef {
        name,
        kind,
        is_array,
        description,
    }
}

/// Every property a filter expression may reference.
pub const PROPERTIES: &[PropertyDef] = &[
    prop("title", ValueKind::Text, false, "Task title"),
    prop("path", ValueKind::Text, false, "Path of the task file"),
    prop("status", ValueKind::Select, false, "Task status (e.g. open, in-progress, done)"),
    prop("priority", ValueKind::Select, false, "Priority (e.g. low, normal, high, urgent)"),
    prop("tags", ValueKind::Select, true, "Tags on the task"),
    prop("contexts", ValueKind::Select, true, "Contexts (e.g. home, office)"),
    prop("projects", ValueKind::Select, true, "Projects the task belongs to"),
    prop("blockedBy", ValueKind::Select, true, "Tasks this task depends on"),
    prop("due", ValueKind::Date, false, "Due date (YYYY-MM-DD)"),
    prop("scheduled", ValueKind::Date, false, "Scheduled date (YYYY-MM-DD)"),
    prop("completedDate", ValueKind::Date, false, "Date the task was completed"),
    prop("file.ctime", ValueKind::Date, false, "Date the task was created"),
    prop("file.mtime", ValueKind::Date, false, "Date the task was last modified"),
    prop("archived", ValueKind::Boolean, false, "Whether the task is archived"),
    prop("status.isCompleted", ValueKind::Boolean, false, "Whether the status counts as completed"),
    prop("dependencies.isBlocked", ValueKind::Boolean, false, "Whether the task is blocked"),
    prop("dependencies.isBlocking", ValueKind::Boolean, false, "Whether the task blocks others"),
    prop("timeEstimate", ValueKind::Numeric, false, "Estimated time in minutes"),
    prop("recurrence", ValueKind::Special, false, "Recurrence rule"),
];

/// Short property names mapped to canonical property names.
pub const PROPERTY_ALIASES: &[(&str, &str)] = &[
    ("tag", "tags"),
    ("context", "contexts"),
    ("project", "projects"),
    ("created", "file.ctime"),
    ("modified", "file.mtime"),
    ("completed", "completedDate"),
    ("estimate", "timeEstimate"),
];

/// Canonical names of every valid operator.
pub const OPERATOR_NAMES: &[&str] = &[
    "is",
    "is-not",
    "contains",
    "does-not-contain",
    "is-before",
    "is-after",
    "is-on-or-before",
    "is-on-or-after",
    "is-empty",
    "is-not-empty",
    "is-checked",
    "is-not-checked",
    "is-greater-than",
    "is-less-than",
];

/// Operator spellings mapped to canonical operator names.
pub const OPERATOR_ALIASES: &[(&str, &str)] = &[
    ("equals", "is"),
    ("eq", "is"),
    ("not-equals", "is-not"),
    ("ne", "is-not"),
    ("has", "contains"),
    ("not-contains", "does-not-contain"),
    ("before", "is-before"),
    ("after", "is-after"),
    ("on-or-before", "is-on-or-before"),
    ("on-or-after", "is-on-or-after"),
    ("empty", "is-empty"),
    ("not-empty", "is-not-empty"),
    ("checked", "is-checked"),
    ("unchecked", "is-not-checked"),
    ("greater-than", "is-greater-than"),
    ("gt", "is-greater-than"),
    ("less-than", "is-less-than"),
    ("lt", "is-less-than"),
];

/// A comparison operator in a condition.
///
/// Serializes as its canonical kebab-case name. Names this crate does not
/// know are preserved as [`Operator::Other`] so that trees built elsewhere
/// survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Is,
    IsNot,
    Contains,
    DoesNotContain,
    IsBefore,
    IsAfter,
    IsOnOrBefore,
    IsOnOrAfter,
    IsEmpty,
    IsNotEmpty,
    IsChecked,
    IsNotChecked,
    IsGreaterThan,
    IsLessThan,
    /// An operator name outside the canonical set.
    Other(String),
}

impl Operator {
    /// Looks up an operator by its exact canonical name.
    pub fn from_canonical(name: &str) -> Option<Self> {
        let op = match name {
            "is" => Operator::Is,
            "is-not" => Operator::IsNot,
            "contains" => Operator::Contains,
            "does-not-contain" => Operator::DoesNotContain,
            "is-before" => Operator::IsBefore,
            "is-after" => Operator::IsAfter,
            "is-on-or-before" => Operator::IsOnOrBefore,
            "is-on-or-after" => Operator::IsOnOrAfter,
            "is-empty" => Operator::IsEmpty,
            "is-not-empty" => Operator::IsNotEmpty,
            "is-checked" => Operator::IsChecked,
            "is-not-checked" => Operator::IsNotChecked,
            "is-greater-than" => Operator::IsGreaterThan,
            "is-less-than" => Operator::IsLessThan,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the canonical name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "is-not",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does-not-contain",
            Operator::IsBefore => "is-before",
            Operator::IsAfter => "is-after",
            Operator::IsOnOrBefore => "is-on-or-before",
            Operator::IsOnOrAfter => "is-on-or-after",
            Operator::IsEmpty => "is-empty",
            Operator::IsNotEmpty => "is-not-empty",
            Operator::IsChecked => "is-checked",
            Operator::IsNotChecked => "is-not-checked",
            Operator::IsGreaterThan => "is-greater-than",
            Operator::IsLessThan => "is-less-than",
            Operator::Other(name) => name.as_str(),
        }
    }

    /// Returns true for operators that ignore the condition value.
    pub fn is_valueless(&self) -> bool {
        matches!(
            self,
            Operator::IsEmpty | Operator::IsNotEmpty | Operator::IsChecked | Operator::IsNotChecked
        )
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::from_canonical(&name).unwrap_or(Operator::Other(name))
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a property by its exact canonical name.
pub fn find_property(name: &str) -> Option<&'static PropertyDef> {
    PROPERTIES.iter().find(|p| p.name == name)
}

/// Resolves a user-written property name to its schema entry.
///
/// Aliases are tried first, then canonical names (exact, then
/// case-insensitive).
///
/// # Errors
///
/// Returns `FilterError::UnknownProperty` when nothing matches.
pub fn resolve_property(name: &str) -> FilterResult<&'static PropertyDef> {
    let lower = name.to_lowercase();
    let canonical = PROPERTY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name);

    find_property(canonical)
        .or_else(|| {
            PROPERTIES
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(canonical))
        })
        .ok_or_else(|| {
            let candidates = PROPERTIES
                .iter()
                .map(|p| p.name)
                .chain(PROPERTY_ALIASES.iter().map(|(alias, _)| *alias));
            FilterError::UnknownProperty {
                property: name.to_string(),
                suggestion: find_similar_name(name, candidates),
            }
        })
}

/// Resolves a user-written operator to a canonical [`Operator`].
///
/// # Errors
///
/// Returns `FilterError::UnknownOperator` when the name is neither an alias
/// nor a canonical operator.
pub fn resolve_operator(name: &str) -> FilterResult<Operator> {
    let lower = name.to_lowercase();
    let canonical = OPERATOR_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(lower.as_str());

    Operator::from_canonical(canonical).ok_or_else(|| {
        let candidates = OPERATOR_NAMES
            .iter()
            .copied()
            .chain(OPERATOR_ALIASES.iter().map(|(alias, _)| *alias));
        FilterError::UnknownOperator {
            operator: name.to_string(),
            suggestion: find_similar_name(name, candidates),
        }
    })
}

/// Chooses the operator for a `property:value` condition.
pub fn default_operator(property: &PropertyDef, raw_value: &str) -> Operator {
    match property.kind {
        ValueKind::Text => Operator::Contains,
        ValueKind::Select if property.is_array => Operator::Contains,
        ValueKind::Boolean if raw_value == "true" => Operator::IsChecked,
        ValueKind::Boolean => Operator::IsNotChecked,
        _ => Operator::Is,
    }
}

/// Returns the canonical names that map to the given property through an alias.
pub fn aliases_for(canonical: &str) -> impl Iterator<Item = &'static str> + '_ {
    PROPERTY_ALIASES
        .iter()
        .filter(move |(_, target)| *target == canonical)
        .map(|(alias, _)| *alias)
}

/// Returns the aliases that map to the given canonical operator name.
pub fn operator_aliases_for(canonical: &str) -> impl Iterator<Item = &'static str> + '_ {
    OPERATOR_ALIASES
        .iter()
        .filter(move |(_, target)| *target == canonical)
        .map(|(alias, _)| *alias)
}

/// Finds the best matching name from a list of candidates using Levenshtein distance.
fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
