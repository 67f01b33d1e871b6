//! Common utilities shared by the storage side of the crate.
//!
//! This module holds the query-expression fragment produced by filter operators, the logic
//! used to combine several fragments into one expression, and JSON truthiness.

use aws_sdk_dynamodb::types;
use serde_json::Value;
use std::collections;

/// Logical AND separator used when combining filter fragments.
pub(crate) const AND: &str = " AND ";

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""` are falsy, everything else is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(value) => !value.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A query-expression fragment.
///
/// Placeholders in `expression` are resolved through `expression_attribute_names` (`#name`)
/// and `expression_attribute_values` (`:name`).
///
/// ```rust
/// use dynamodb_fields::common::ExpressionInput;
/// use std::collections::HashMap;
///
/// let fragment = ExpressionInput {
///     expression: "#age < :age".to_string(),
///     expression_attribute_names: HashMap::from([("#age".to_string(), "age".to_string())]),
///     ..Default::default()
/// };
/// assert_eq!(fragment.expression, "#age < :age");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionInput {
    /// The expression text, e.g. `#age < :age`.
    pub expression: String,
    /// Attribute name placeholders mapped to attribute names.
    pub expression_attribute_names: collections::HashMap<String, String>,
    /// Attribute value placeholders mapped to operand values.
    pub expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    /// Combine fragments with `operator`, merging their placeholder maps.
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }

    /// Whether the fragment carries no expression.
    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn fragment(key: &str, value: &str) -> ExpressionInput {
        ExpressionInput {
            expression: format!("#{key} < :{key}"),
            expression_attribute_names: collections::HashMap::from([(
                format!("#{key}"),
                key.to_string(),
            )]),
            expression_attribute_values: collections::HashMap::from([(
                format!(":{key}"),
                types::AttributeValue::N(value.to_string()),
            )]),
        }
    }

    #[rstest]
    #[case::empty(
        vec![],
        ExpressionInput::default()
    )]
    #[case::single(
        vec![
            fragment("a", "1"),
        ],
        fragment("a", "1")
    )]
    #[case::multiple(
        vec![
            fragment("a", "1"),
            fragment("b", "2"),
        ],
        ExpressionInput {
            expression: "#a < :a AND #b < :b".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [
                    ("#a".to_string(), "a".to_string()),
                    ("#b".to_string(), "b".to_string()),
                ]
            ),
            expression_attribute_values: collections::HashMap::from(
                [
                    (
                        ":a".to_string(),
                        types::AttributeValue::N(
                            "1".to_string()
                        )
                    ),
                    (
                        ":b".to_string(),
                        types::AttributeValue::N(
                            "2".to_string()
                        )
                    ),
                ]
            ),
        }
    )]
    #[case::skips_empty_expression(
        vec![
            ExpressionInput::default(),
            fragment("a", "1"),
        ],
        fragment("a", "1")
    )]
    fn test_merge(#[case] items: Vec<ExpressionInput>, #[case] expected: ExpressionInput) {
        let actual = ExpressionInput::merge(AND, items);
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::null(Value::Null, false)]
    #[case::false_(serde_json::json!(false), false)]
    #[case::true_(serde_json::json!(true), true)]
    #[case::zero(serde_json::json!(0), false)]
    #[case::zero_float(serde_json::json!(0.0), false)]
    #[case::number(serde_json::json!(-1), true)]
    #[case::empty_string(serde_json::json!(""), false)]
    #[case::string(serde_json::json!("0"), true)]
    #[case::empty_array(serde_json::json!([]), true)]
    #[case::empty_object(serde_json::json!({}), true)]
    fn test_is_truthy(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }
}
