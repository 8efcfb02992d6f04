//! Error types for the filter parser.

use thiserror::Error;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while tokenizing or parsing a filter expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The filter expression is empty or whitespace-only.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// A quoted string was not closed before the end of input.
    #[error("unterminated string starting at position {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A character outside the filter grammar was found.
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// An unexpected token was encountered during parsing.
    #[error("unexpected token: {token}")]
    UnexpectedToken {
        /// The unexpected token that was encountered.
        token: String,
    },

    /// An unexpected end of input was encountered.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// An opening parenthesis was never closed.
    #[error("missing closing parenthesis")]
    UnclosedParenthesis,

    /// A condition ended before `property:value` was complete.
    #[error("incomplete condition: expected property:value or property:operator:value")]
    IncompleteCondition,

    /// A property name was not followed by a colon.
    #[error("expected ':' after property '{property}'")]
    MissingColon {
        /// The property name that preceded the missing colon.
        property: String,
    },

    /// The property is not in the schema, even after alias resolution.
    #[error("unknown property: {property}{}", did_you_mean(.suggestion))]
    UnknownProperty {
        /// The property as written.
        property: String,
        /// Closest known property name, if any is close enough.
        suggestion: Option<String>,
    },

    /// The operator is not a valid operator, even after alias resolution.
    #[error("unknown operator: {operator}{}", did_you_mean(.suggestion))]
    UnknownOperator {
        /// The operator as written.
        operator: String,
        /// Closest known operator name, if any is close enough.
        suggestion: Option<String>,
    },

    /// A numeric property was given a value that does not parse as a number.
    #[error("invalid numeric value for {property}: {value}")]
    InvalidNumber {
        /// The canonical property name.
        property: String,
        /// The raw value as written.
        value: String,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>) -> Self {
        FilterError::UnexpectedToken {
            token: token.into(),
        }
    }

    /// Creates a missing colon error.
    pub fn missing_colon(property: impl Into<String>) -> Self {
        FilterError::MissingColon {
            property: property.into(),
        }
    }

    /// Creates an invalid numeric value error.
    pub fn invalid_number(property: impl Into<String>, value: impl Into<String>) -> Self {
        FilterError::InvalidNumber {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Returns true for errors raised while tokenizing.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            FilterError::UnterminatedString { .. } | FilterError::UnexpectedCharacter { .. }
        )
    }

    /// Returns true for errors raised while validating properties, operators and values.
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            FilterError::UnknownProperty { .. }
                | FilterError::UnknownOperator { .. }
                | FilterError::InvalidNumber { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_property_display_with_suggestion() {
        let err = FilterError::UnknownProperty {
            property: "stauts".to_string(),
            suggestion: Some("status".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown property: stauts (did you mean 'status'?)"
        );
    }

    #[test]
    fn test_unknown_operator_display_without_suggestion() {
        let err = FilterError::UnknownOperator {
            operator: "frobnicate".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown operator: frobnicate");
    }

    #[test]
    fn test_error_classification() {
        assert!(FilterError::UnterminatedString { position: 0 }.is_lexical());
        assert!(FilterError::invalid_number("timeEstimate", "abc").is_semantic());
        assert!(!FilterError::UnclosedParenthesis.is_lexical());
        assert!(!FilterError::UnclosedParenthesis.is_semantic());
    }
}
