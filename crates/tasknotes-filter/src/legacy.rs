//! Translation of flag-style list filters into filter query trees.
//!
//! The `list` command accepts simple flags (`--status`, `--tag`, `--overdue`,
//! ...) alongside a free-form `--filter` expression. [`LegacyFilter`] turns
//! the flags into the same tree shape the parser produces, so both reach the
//! query endpoint and the local evaluator as one query.

use super::ast::{
    Condition, ConditionValue, Conjunction, FilterGroup, FilterNode, FilterQuery, IdGenerator,
};
use super::schema::Operator;

/// Flag-style filters, each one an implicit `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyFilter {
    /// Exact status match.
    pub status: Option<String>,
    /// Exact priority match.
    pub priority: Option<String>,
    /// Every tag must be present.
    pub tags: Vec<String>,
    /// Every context must be present.
    pub contexts: Vec<String>,
    /// Every project must be present.
    pub projects: Vec<String>,
    /// Due strictly before this date (`YYYY-MM-DD`).
    pub due_before: Option<String>,
    /// Due strictly after this date (`YYYY-MM-DD`).
    pub due_after: Option<String>,
    /// Incomplete and due before this date, usually today.
    pub overdue_as_of: Option<String>,
    /// Archived (`true`) or not archived (`false`).
    pub archived: Option<bool>,
    /// Completed (`true`) or not completed (`false`).
    pub completed: Option<bool>,
}

impl LegacyFilter {
    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Builds a flat `and` query from the set flags.
    ///
    /// An empty filter yields [`FilterQuery::match_all`].
    pub fn to_query(&self) -> FilterQuery {
        if self.is_empty() {
            return FilterQuery::match_all();
        }

        let mut ids = IdGenerator::namespaced("flag");
        let children = self.conditions(&mut ids);
        FilterQuery::from(FilterGroup {
            id: ids.group_id(),
            conjunction: Conjunction::And,
            children,
        })
    }

    /// Combines the flags with a parsed `--filter` query.
    ///
    /// An `and` query absorbs the flag conditions as siblings; any other
    /// query becomes a nested child next to them.
    pub fn merge_into(&self, query: FilterQuery) -> FilterQuery {
        if self.is_empty() {
            return query;
        }
        if query.is_empty() {
            return self.to_query();
        }

        let mut ids = IdGenerator::namespaced("flag");
        let flags = self.conditions(&mut ids);

        if query.conjunction() == Conjunction::And {
            let mut root = query.into_group();
            root.children.extend(flags);
            return FilterQuery::from(root);
        }

        let mut children = Vec::with_capacity(flags.len() + 1);
        children.push(FilterNode::from(query));
        children.extend(flags);
        FilterQuery::from(FilterGroup {
            id: ids.group_id(),
            conjunction: Conjunction::And,
            children,
        })
    }

    fn conditions(&self, ids: &mut IdGenerator) -> Vec<FilterNode> {
        let mut nodes = Vec::new();
        let mut push = |property: &str, operator: Operator, value: Option<&str>| {
            nodes.push(FilterNode::Condition(Condition {
                id: ids.condition_id(),
                property: property.to_string(),
                operator,
                value: value.map(ConditionValue::from),
            }));
        };

        if let Some(status) = &self.status {
            push("status", Operator::Is, Some(status.as_str()));
        }
        if let Some(priority) = &self.priority {
            push("priority", Operator::Is, Some(priority.as_str()));
        }
        for tag in &self.tags {
            push("tags", Operator::Contains, Some(tag.as_str()));
        }
        for context in &self.contexts {
            push("contexts", Operator::Contains, Some(context.as_str()));
        }
        for project in &self.projects {
            push("projects", Operator::Contains, Some(project.as_str()));
        }
        if let Some(date) = &self.due_before {
            push("due", Operator::IsBefore, Some(date.as_str()));
        }
        if let Some(date) = &self.due_after {
            push("due", Operator::IsAfter, Some(date.as_str()));
        }
        if let Some(date) = &self.overdue_as_of {
            push("due", Operator::IsBefore, Some(date.as_str()));
            push("status.isCompleted", Operator::IsNotChecked, None);
        }
        if let Some(archived) = self.archived {
            push("archived", checkbox(archived), None);
        }
        if let Some(completed) = self.completed {
            push("status.isCompleted", checkbox(completed), None);
        }

        nodes
    }
}

fn checkbox(checked: bool) -> Operator {
    if checked {
        Operator::IsChecked
    } else {
        Operator::IsNotChecked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::parser::FilterParser;
    use serde_json::json;

    fn conditions(query: &FilterQuery) -> Vec<(&str, &Operator, Option<String>)> {
        query
            .children()
            .iter()
            .filter_map(FilterNode::as_condition)
            .map(|c| {
                (
                    c.property.as_str(),
                    &c.operator,
                    c.value.as_ref().map(ConditionValue::to_text),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = LegacyFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.to_query(), FilterQuery::match_all());
    }

    #[test]
    fn test_flags_become_flat_and_group() {
        let filter = LegacyFilter {
            status: Some("open".to_string()),
            tags: vec!["work".to_string(), "urgent".to_string()],
            archived: Some(false),
            ..Default::default()
        };
        let query = filter.to_query();

        assert_eq!(query.conjunction(), Conjunction::And);
        assert_eq!(
            conditions(&query),
            vec![
                ("status", &Operator::Is, Some("open".to_string())),
                ("tags", &Operator::Contains, Some("work".to_string())),
                ("tags", &Operator::Contains, Some("urgent".to_string())),
                ("archived", &Operator::IsNotChecked, None),
            ]
        );
    }

    #[test]
    fn test_overdue_adds_incomplete_condition() {
        let filter = LegacyFilter {
            overdue_as_of: Some("2025-03-01".to_string()),
            ..Default::default()
        };
        let query = filter.to_query();
        assert_eq!(
            conditions(&query),
            vec![
                ("due", &Operator::IsBefore, Some("2025-03-01".to_string())),
                ("status.isCompleted", &Operator::IsNotChecked, None),
            ]
        );

        let tasks = vec![
            json!({"due": "2025-02-01", "status.isCompleted": false}),
            json!({"due": "2025-02-01", "status.isCompleted": true}),
            json!({"due": "2025-04-01"}),
            json!({}),
        ];
        assert_eq!(evaluate(&query, &tasks), vec![&tasks[0]]);
    }

    #[test]
    fn test_merge_splices_into_and_query() {
        let parsed = FilterParser::parse("tags:work AND priority:high").unwrap();
        let filter = LegacyFilter {
            status: Some("open".to_string()),
            ..Default::default()
        };
        let merged = filter.merge_into(parsed.clone());

        assert_eq!(merged.id(), parsed.id());
        assert_eq!(merged.conjunction(), Conjunction::And);
        assert_eq!(merged.children().len(), 3);
        assert!(merged.children().iter().all(|c| c.as_condition().is_some()));
    }

    #[test]
    fn test_merge_nests_or_query() {
        let parsed = FilterParser::parse("priority:urgent OR priority:high").unwrap();
        let filter = LegacyFilter {
            tags: vec!["project".to_string()],
            ..Default::default()
        };
        let merged = filter.merge_into(parsed);

        assert_eq!(merged.conjunction(), Conjunction::And);
        assert_eq!(merged.children().len(), 2);
        let nested = merged.children()[0].as_group().unwrap();
        assert_eq!(nested.conjunction, Conjunction::Or);
        assert_eq!(nested.children.len(), 2);
    }

    #[test]
    fn test_merge_keeps_ids_unique() {
        let parsed = FilterParser::parse("status:open OR tags:a").unwrap();
        let filter = LegacyFilter {
            tags: vec!["b".to_string()],
            priority: Some("high".to_string()),
            ..Default::default()
        };
        let merged: FilterNode = filter.merge_into(parsed).into();

        fn ids(node: &FilterNode, out: &mut Vec<String>) {
            out.push(node.id().to_string());
            if let Some(g) = node.as_group() {
                g.children.iter().for_each(|c| ids(c, out));
            }
        }
        let mut all = Vec::new();
        ids(&merged, &mut all);
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_merge_with_empty_sides() {
        let parsed = FilterParser::parse("status:open").unwrap();
        assert_eq!(LegacyFilter::default().merge_into(parsed.clone()), parsed);

        let filter = LegacyFilter {
            completed: Some(true),
            ..Default::default()
        };
        assert_eq!(filter.merge_into(FilterQuery::match_all()), filter.to_query());
    }
}
