//! Recursive descent parser for filter expressions.

use tracing::debug;

use super::ast::{
    Condition, ConditionValue, Conjunction, FilterGroup, FilterNode, FilterQuery, IdGenerator,
};
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer};
use super::schema::{self, Operator, PropertyDef, ValueKind};

/// Minimum number of tokens in a condition (`property : value`).
const MIN_CONDITION_TOKENS: usize = 3;

/// Parser for TaskNotes filter expressions.
///
/// # Grammar
///
/// ```text
/// or_expr   ::= and_expr ("or" and_expr)*
/// and_expr  ::= primary ("and" primary)*
/// primary   ::= "(" or_expr ")" | condition
/// condition ::= IDENTIFIER ":" value [":" value]
/// value     ::= IDENTIFIER | STRING
/// ```
///
/// `AND` binds tighter than `OR`. A run of the same connective at one level
/// becomes a single group holding every operand, so `a AND b AND c` is one
/// `and` group with three children. Parentheses always produce their own
/// nested group.
///
/// # Example
///
/// ```
/// use tasknotes_filter_rs::{Conjunction, FilterParser};
///
/// let query = FilterParser::parse("(priority:urgent OR priority:high) AND tags:project").unwrap();
/// assert_eq!(query.conjunction(), Conjunction::And);
/// assert_eq!(query.children().len(), 2);
/// ```
pub struct FilterParser {
    tokens: Vec<FilterToken>,
    position: usize,
    ids: IdGenerator,
}

impl FilterParser {
    /// Parses a filter expression string into a [`FilterQuery`].
    ///
    /// The result is always group-shaped: a lone condition is wrapped in a
    /// singleton `and` group.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` if the input is empty or
    /// whitespace-only, a lexical error if tokenizing fails, and a grammar or
    /// validation error if the tokens do not form a valid expression.
    pub fn parse(input: &str) -> FilterResult<FilterQuery> {
        if input.trim().is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let tokens: Vec<FilterToken> = Lexer::new(input)
            .tokenize()?
            .into_iter()
            .map(|pt| pt.token)
            .collect();
        if tokens.is_empty() {
            return Err(FilterError::EmptyExpression);
        }
        debug!(tokens = tokens.len(), "tokenized filter expression");

        let mut parser = Self {
            tokens,
            position: 0,
            ids: IdGenerator::new(),
        };
        let node = parser.parse_or_expr()?;

        // Check that we consumed all tokens
        if let Some(remaining) = parser.peek() {
            return Err(FilterError::unexpected_token(remaining.to_string()));
        }

        let query = match node {
            FilterNode::Group(group) => FilterQuery::from(group),
            condition @ FilterNode::Condition(_) => FilterQuery::from(FilterGroup {
                id: parser.ids.group_id(),
                conjunction: Conjunction::And,
                children: vec![condition],
            }),
        };
        debug!(
            conjunction = %query.conjunction(),
            children = query.children().len(),
            "parsed filter expression"
        );
        Ok(query)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&FilterToken> {
        self.tokens.get(self.position)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<FilterToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Checks if the current token matches the expected token.
    fn check(&self, expected: &FilterToken) -> bool {
        self.peek() == Some(expected)
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    /// Parses OR expressions: `and_expr ("or" and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<FilterNode> {
        let mut operands = vec![self.parse_and_expr()?];

        while self.check(&FilterToken::Logical(Conjunction::Or)) {
            self.advance(); // consume 'or'
            operands.push(self.parse_and_expr()?);
        }

        Ok(self.collect_group(Conjunction::Or, operands))
    }

    /// Parses AND expressions: `primary ("and" primary)*`
    fn parse_and_expr(&mut self) -> FilterResult<FilterNode> {
        let mut operands = vec![self.parse_primary()?];

        while self.check(&FilterToken::Logical(Conjunction::And)) {
            self.advance(); // consume 'and'
            operands.push(self.parse_primary()?);
        }

        Ok(self.collect_group(Conjunction::And, operands))
    }

    /// Wraps same-level operands into one flat group, or returns a lone operand as is.
    fn collect_group(
        &mut self,
        conjunction: Conjunction,
        mut operands: Vec<FilterNode>,
    ) -> FilterNode {
        if operands.len() == 1 {
            if let Some(only) = operands.pop() {
                return only;
            }
        }

        FilterNode::Group(FilterGroup {
            id: self.ids.group_id(),
            conjunction,
            children: operands,
        })
    }

    /// Parses primary expressions: `"(" or_expr ")" | condition`
    fn parse_primary(&mut self) -> FilterResult<FilterNode> {
        let token = self.peek().cloned().ok_or(FilterError::UnexpectedEndOfInput)?;

        match token {
            FilterToken::OpenParen => {
                self.advance(); // consume '('
                let inner = self.parse_or_expr()?;
                if !self.check(&FilterToken::CloseParen) {
                    return Err(FilterError::UnclosedParenthesis);
                }
                self.advance(); // consume ')'
                Ok(inner)
            }
            FilterToken::Identifier(_) => self.parse_condition(),
            other => Err(FilterError::unexpected_token(other.to_string())),
        }
    }

    /// Parses `property:value` or `property:operator:value`.
    fn parse_condition(&mut self) -> FilterResult<FilterNode> {
        if self.remaining() < MIN_CONDITION_TOKENS {
            return Err(FilterError::IncompleteCondition);
        }

        let property = match self.advance() {
            Some(FilterToken::Identifier(name)) => name,
            Some(other) => return Err(FilterError::unexpected_token(other.to_string())),
            None => return Err(FilterError::UnexpectedEndOfInput),
        };

        if !self.check(&FilterToken::Colon) {
            return Err(FilterError::missing_colon(property));
        }
        self.advance(); // consume ':'

        let first = self.expect_value()?;
        let (operator, value) = if self.check(&FilterToken::Colon) {
            self.advance(); // consume ':'
            (Some(first), self.expect_value()?)
        } else {
            (None, first)
        };

        let condition = self.build_condition(&property, operator.as_deref(), &value)?;
        Ok(FilterNode::Condition(condition))
    }

    /// Consumes an identifier or string token, returning its text.
    fn expect_value(&mut self) -> FilterResult<String> {
        match self.advance() {
            Some(FilterToken::Identifier(s)) | Some(FilterToken::String(s)) => Ok(s),
            Some(other) => Err(FilterError::unexpected_token(other.to_string())),
            None => Err(FilterError::IncompleteCondition),
        }
    }

    /// Resolves aliases, validates, and coerces the value of one condition.
    fn build_condition(
        &mut self,
        property: &str,
        operator: Option<&str>,
        raw_value: &str,
    ) -> FilterResult<Condition> {
        let def = schema::resolve_property(property)?;
        let operator = match operator {
            Some(op) => schema::resolve_operator(op)?,
            None => schema::default_operator(def, raw_value),
        };
        let value = coerce_value(def, &operator, raw_value)?;

        Ok(Condition {
            id: self.ids.condition_id(),
            property: def.name.to_string(),
            operator,
            value,
        })
    }
}

/// Converts the raw text of a condition value according to the property kind.
fn coerce_value(
    def: &PropertyDef,
    operator: &Operator,
    raw_value: &str,
) -> FilterResult<Option<ConditionValue>> {
    if operator.is_valueless() {
        return Ok(None);
    }

    match def.kind {
        ValueKind::Numeric => raw_value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| Some(ConditionValue::Number(n)))
            .ok_or_else(|| FilterError::invalid_number(def.name, raw_value)),
        _ => Ok(Some(ConditionValue::Text(raw_value.to_string()))),
    }
}

/// Parses a filter expression; shorthand for [`FilterParser::parse`].
///
/// # Errors
///
/// See [`FilterParser::parse`].
pub fn parse(expression: &str) -> FilterResult<FilterQuery> {
    FilterParser::parse(expression)
}
