//! Human-readable reference for the filter language.

use std::fmt;

use super::schema::{self, OPERATOR_NAMES, PROPERTIES};

const EXAMPLES: &[(&str, &str)] = &[
    ("status:open", "Open tasks"),
    ("tag:work AND priority:high", "High-priority work tasks"),
    (
        "(priority:urgent OR priority:high) AND tags:project",
        "Urgent or high-priority project tasks",
    ),
    ("due:before:2025-01-01", "Due before 2025"),
    (r#"title:contains:"meeting notes""#, "Title contains a phrase"),
    ("archived:false AND estimate:gt:30", "Unarchived tasks estimated over 30 minutes"),
    ("tags:is-empty:x", "Tasks without tags"),
];

/// Renders the filter reference; see [`help_text`].
struct FilterHelp;

impl fmt::Display for FilterHelp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FILTER EXPRESSIONS")?;
        writeln!(f)?;
        writeln!(f, "  property:value             operator inferred from the property")?;
        writeln!(f, "  property:operator:value    explicit operator")?;
        writeln!(f, "  Quote values containing spaces: title:\"two words\"")?;

        writeln!(f)?;
        writeln!(f, "PROPERTIES")?;
        let width = PROPERTIES.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for prop in PROPERTIES {
            let kind = if prop.is_array {
                format!("{} list", prop.kind.as_str())
            } else {
                prop.kind.as_str().to_string()
            };
            write!(f, "  {:width$}  {:<12} {}", prop.name, kind, prop.description)?;
            let aliases: Vec<_> = schema::aliases_for(prop.name).collect();
            if !aliases.is_empty() {
                write!(f, " (alias: {})", aliases.join(", "))?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "OPERATORS")?;
        let width = OPERATOR_NAMES.iter().map(|n| n.len()).max().unwrap_or(0);
        for name in OPERATOR_NAMES {
            let aliases: Vec<_> = schema::operator_aliases_for(name).collect();
            if aliases.is_empty() {
                writeln!(f, "  {name}")?;
            } else {
                writeln!(f, "  {name:width$}  also: {}", aliases.join(", "))?;
            }
        }
        writeln!(f)?;
        writeln!(f, "  Without an operator, text and list properties use 'contains',")?;
        writeln!(f, "  booleans use 'is-checked' for 'true' and 'is-not-checked' otherwise,")?;
        writeln!(f, "  and everything else uses 'is'.")?;

        writeln!(f)?;
        writeln!(f, "LOGICAL OPERATORS")?;
        writeln!(f, "  AND    both sides must match")?;
        writeln!(f, "  OR     either side must match")?;
        writeln!(f, "  AND binds tighter than OR; both are case-insensitive.")?;

        writeln!(f)?;
        writeln!(f, "GROUPING")?;
        writeln!(f, "  Use parentheses to override precedence:")?;
        writeln!(f, "  (status:open OR status:in-progress) AND tag:work")?;

        writeln!(f)?;
        writeln!(f, "EXAMPLES")?;
        let width = EXAMPLES.iter().map(|(e, _)| e.len()).max().unwrap_or(0);
        for (expr, description) in EXAMPLES {
            writeln!(f, "  {expr:width$}  {description}")?;
        }
        Ok(())
    }
}

/// Returns the filter language reference shown by `tn filter-help`.
pub fn help_text() -> String {
    FilterHelp.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FilterParser;

    #[test]
    fn test_help_lists_every_property_and_operator() {
        let help = help_text();
        for prop in PROPERTIES {
            assert!(help.contains(prop.name), "missing property {}", prop.name);
        }
        for name in OPERATOR_NAMES {
            assert!(help.contains(name), "missing operator {name}");
        }
    }

    #[test]
    fn test_help_shows_aliases() {
        let help = help_text();
        assert!(help.contains("(alias: tag)"));
        assert!(help.contains("(alias: created)"));
        assert!(help.contains("also: equals, eq"));
    }

    #[test]
    fn test_help_has_sections() {
        let help = help_text();
        for section in ["PROPERTIES", "OPERATORS", "LOGICAL OPERATORS", "GROUPING", "EXAMPLES"] {
            assert!(help.contains(section), "missing section {section}");
        }
    }

    #[test]
    fn test_examples_parse() {
        for (expr, _) in EXAMPLES {
            assert!(FilterParser::parse(expr).is_ok(), "example fails to parse: {expr}");
        }
    }

    #[test]
    fn test_help_is_deterministic() {
        assert_eq!(help_text(), help_text());
    }
}
