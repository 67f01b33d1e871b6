use crate::{
    common,
    operators::{FilterInput, Operator},
};

use aws_sdk_dynamodb::types;
use serde_dynamo::{Result, to_attribute_value};
use serde_json::Value;
use std::collections;

/// Operator key of [`LessThan`].
pub const LT: &str = "$lt";

/// `{"key": {"$lt": value}}` translated to `#key < :key`.
///
/// ```rust
/// use dynamodb_fields::operators::{FilterInput, Operator, comparison::LessThan};
/// use serde_json::json;
///
/// let value = json!({"$lt": 30});
/// let input = FilterInput { key: "age", value: &value };
/// assert!(LessThan.can_process(&input));
/// assert_eq!(LessThan.process(&input).unwrap().expression, "#age < :age");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LessThan;

impl Operator for LessThan {
    fn can_process(&self, input: &FilterInput<'_>) -> bool {
        input.value.get(LT).is_some()
    }

    fn process(&self, input: &FilterInput<'_>) -> Result<common::ExpressionInput> {
        let name_placeholder = format!("#{}", input.key);
        let value_placeholder = format!(":{}", input.key);
        let operand = input.value.get(LT).cloned().unwrap_or(Value::Null);
        let value: types::AttributeValue = to_attribute_value(operand)?;
        let operation = common::ExpressionInput {
            expression: format!("{name_placeholder} < {value_placeholder}"),
            expression_attribute_names: collections::HashMap::from([(
                name_placeholder,
                input.key.to_string(),
            )]),
            expression_attribute_values: collections::HashMap::from([(value_placeholder, value)]),
        };
        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::lt(json!({"$lt": 1}), true)]
    #[case::lt_null(json!({"$lt": null}), true)]
    #[case::gt(json!({"$gt": 1}), false)]
    #[case::scalar(json!(1), false)]
    #[case::null(Value::Null, false)]
    fn test_can_process(#[case] value: Value, #[case] expected: bool) {
        let input = FilterInput {
            key: "a",
            value: &value,
        };
        assert_eq!(LessThan.can_process(&input), expected);
    }

    #[rstest]
    #[case::number(
        "a",
        json!({"$lt": 10}),
        common::ExpressionInput {
            expression: "#a < :a".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [(
                    "#a".to_string(),
                    "a".to_string(),
                )]
            ),
            expression_attribute_values: collections::HashMap::from(
                [(
                    ":a".to_string(),
                    types::AttributeValue::N(
                        "10".to_string()
                    ),
                )]
            ),
        }
    )]
    #[case::string_ignores_gt(
        "b",
        json!({"$lt": "m", "$gt": "c"}),
        common::ExpressionInput {
            expression: "#b < :b".to_string(),
            expression_attribute_names: collections::HashMap::from(
                [(
                    "#b".to_string(),
                    "b".to_string(),
                )]
            ),
            expression_attribute_values: collections::HashMap::from(
                [(
                    ":b".to_string(),
                    types::AttributeValue::S(
                        "m".to_string()
                    ),
                )]
            ),
        }
    )]
    fn test_process(
        #[case] key: &str,
        #[case] value: Value,
        #[case] expected: common::ExpressionInput,
    ) {
        let input = FilterInput { key, value: &value };
        let actual = LessThan.process(&input).unwrap();
        assert_eq!(actual, expected);
    }
}
