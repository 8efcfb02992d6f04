//! Filter evaluation against task records.
//!
//! This module provides the [`FilterEvaluator`] for applying a [`FilterQuery`]
//! to tasks held in memory, for servers that cannot run the query themselves.
//! Its semantics define what a filter tree means; a server evaluating the
//! same tree is expected to agree with it.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tasknotes_filter_rs::{FilterEvaluator, FilterParser};
//!
//! let query = FilterParser::parse("status:done OR priority:low").unwrap();
//! let tasks = vec![
//!     json!({"status": "done", "priority": "high"}),
//!     json!({"status": "open", "priority": "normal"}),
//! ];
//!
//! let evaluator = FilterEvaluator::new(&query);
//! let matches = evaluator.filter_tasks(&tasks);
//! assert_eq!(matches.len(), 1);
//! ```

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::ast::{Condition, ConditionValue, Conjunction, FilterGroup, FilterNode, FilterQuery};
use super::schema::Operator;

/// A task as seen by the evaluator: a mapping from property name to value.
///
/// A property that is missing or `null` is treated as absent.
pub trait TaskRecord {
    /// Returns the value of a property, if present.
    fn property(&self, name: &str) -> Option<&Value>;
}

impl TaskRecord for Map<String, Value> {
    fn property(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl TaskRecord for Value {
    fn property(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(name))
    }
}

impl<T: TaskRecord + ?Sized> TaskRecord for &T {
    fn property(&self, name: &str) -> Option<&Value> {
        (**self).property(name)
    }
}

/// Evaluates a filter tree against task records.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    root: &'a FilterGroup,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator for a parsed query.
    pub fn new(query: &'a FilterQuery) -> Self {
        Self {
            root: query.as_group(),
        }
    }

    /// Creates an evaluator rooted at an arbitrary group.
    pub fn from_group(root: &'a FilterGroup) -> Self {
        Self { root }
    }

    /// Returns true if the task matches the filter.
    pub fn matches<T: TaskRecord + ?Sized>(&self, task: &T) -> bool {
        evaluate_group(self.root, task)
    }

    /// Filters a slice of tasks, returning only those that match, in order.
    pub fn filter_tasks<'b, T: TaskRecord>(&self, tasks: &'b [T]) -> Vec<&'b T> {
        tasks.iter().filter(|task| self.matches(*task)).collect()
    }
}

/// Filters tasks with a query; shorthand for [`FilterEvaluator::filter_tasks`].
pub fn evaluate<'b, T: TaskRecord>(query: &FilterQuery, tasks: &'b [T]) -> Vec<&'b T> {
    FilterEvaluator::new(query).filter_tasks(tasks)
}

/// Evaluates one node of the tree against a task.
pub fn node_matches<T: TaskRecord + ?Sized>(node: &FilterNode, task: &T) -> bool {
    match node {
        FilterNode::Condition(condition) => evaluate_condition(condition, task),
        FilterNode::Group(group) => evaluate_group(group, task),
    }
}

fn evaluate_group<T: TaskRecord + ?Sized>(group: &FilterGroup, task: &T) -> bool {
    if group.children.is_empty() {
        return true;
    }

    match group.conjunction {
        Conjunction::Or => group.children.iter().any(|child| node_matches(child, task)),
        Conjunction::And => group.children.iter().all(|child| node_matches(child, task)),
    }
}

fn evaluate_condition<T: TaskRecord + ?Sized>(condition: &Condition, task: &T) -> bool {
    let value = task.property(&condition.property).filter(|v| !v.is_null());
    let target = condition.value.as_ref();

    match &condition.operator {
        Operator::Is => is_equal(value, target),
        Operator::IsNot => !is_equal(value, target),
        Operator::Contains => contains(value, target),
        Operator::DoesNotContain => !contains(value, target),
        Operator::IsBefore => ordering(value, target) == Some(Ordering::Less),
        Operator::IsAfter => ordering(value, target) == Some(Ordering::Greater),
        Operator::IsOnOrBefore => {
            matches!(ordering(value, target), Some(Ordering::Less | Ordering::Equal))
        }
        Operator::IsOnOrAfter => {
            matches!(ordering(value, target), Some(Ordering::Greater | Ordering::Equal))
        }
        Operator::IsEmpty => is_empty(value),
        Operator::IsNotEmpty => !is_empty(value),
        Operator::IsChecked => is_truthy(value),
        Operator::IsNotChecked => !is_truthy(value),
        Operator::IsGreaterThan => numeric_ordering(value, target) == Some(Ordering::Greater),
        Operator::IsLessThan => numeric_ordering(value, target) == Some(Ordering::Less),
        // Operators from newer producers are not rejected here.
        Operator::Other(_) => true,
    }
}

/// Returns the text of a scalar value, or `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Applies `test` to every element of an array value, or to a scalar value.
fn any_text(value: Option<&Value>, test: impl Fn(&str) -> bool) -> bool {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .any(|item| test(&item.to_lowercase())),
        Some(scalar) => scalar_text(scalar).is_some_and(|text| test(&text.to_lowercase())),
        None => false,
    }
}

/// Numbers compare by value, so `30` equals a stored `30.0`; everything else
/// compares as case-insensitive text.
fn is_equal(value: Option<&Value>, target: Option<&ConditionValue>) -> bool {
    let Some(target) = target else {
        return false;
    };
    let target_number = match target {
        ConditionValue::Number(n) => Some(*n),
        ConditionValue::Text(s) => s.trim().parse::<f64>().ok(),
    };
    let target_text = target.to_text().to_lowercase();

    let item_equals = |item: &Value| match (item, target_number) {
        (Value::Number(n), Some(t)) if n.as_f64() == Some(t) => true,
        _ => scalar_text(item).is_some_and(|text| text.to_lowercase() == target_text),
    };

    match value {
        Some(Value::Array(items)) => items.iter().any(item_equals),
        Some(scalar) => item_equals(scalar),
        None => false,
    }
}

fn contains(value: Option<&Value>, target: Option<&ConditionValue>) -> bool {
    let Some(target) = target.map(|t| t.to_text().to_lowercase()) else {
        return false;
    };
    any_text(value, |text| text.contains(&target))
}

/// Orders a value against the target: numerically when the task holds a
/// number, otherwise by raw string comparison.
///
/// String comparison is only meaningful for ISO-8601 dates (`YYYY-MM-DD`
/// prefixed); other date formats are not parsed.
fn ordering(value: Option<&Value>, target: Option<&ConditionValue>) -> Option<Ordering> {
    let (value, target) = (value?, target?);

    match (value, target) {
        (Value::Number(n), ConditionValue::Number(t)) => n.as_f64()?.partial_cmp(t),
        (Value::Number(n), ConditionValue::Text(t)) => {
            n.as_f64()?.partial_cmp(&t.trim().parse::<f64>().ok()?)
        }
        _ => Some(scalar_text(value)?.as_str().cmp(target.to_text().as_str())),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number_prefix(s),
        _ => None,
    }
}

/// Parses the leading decimal number of `s`, ignoring trailing text, so
/// `"45min"` reads as 45. Returns `None` when no digits lead the string.
fn parse_number_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let skip_digits = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = skip_digits(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

fn numeric_ordering(value: Option<&Value>, target: Option<&ConditionValue>) -> Option<Ordering> {
    let value = as_number(value?)?;
    let target = match target? {
        ConditionValue::Number(n) => *n,
        ConditionValue::Text(s) => parse_number_prefix(s)?,
    };
    value.partial_cmp(&target)
}

/// Truthiness of a task value: absent, `false`, `0`, and `""` are falsy.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(items)) => items.is_empty(),
        other => !is_truthy(other),
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
