//! Filter operators translating filter entries into DynamoDB expression fragments.
//!
//! A filter is a JSON object mapping attribute names to operator objects, e.g.
//! `{"age": {"$lt": 30}}`. Each entry is handed to the first [`Operator`] that can process it,
//! and the resulting fragments are combined with `AND`.

/// Comparison operators.
pub mod comparison;

use crate::common;

use serde_json::{Map, Value};

/// A single filter entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterInput<'a> {
    /// The attribute name.
    pub key: &'a str,
    /// The operator object, e.g. `{"$lt": 30}`.
    pub value: &'a Value,
}

/// Translates filter entries it recognizes into expression fragments.
///
/// Placeholders of a fragment are derived from the entry key, so that fragments of
/// different keys can be merged without collisions.
pub trait Operator {
    /// Whether this operator applies to `input`.
    fn can_process(&self, input: &FilterInput<'_>) -> bool;

    /// Build the fragment of `input`.
    fn process(&self, input: &FilterInput<'_>) -> serde_dynamo::Result<common::ExpressionInput>;
}

/// Errors raised while building a filter expression.
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    /// No registered operator can process the entry.
    #[error("no operator can process filter \"{key}\"")]
    Unsupported {
        /// The entry key.
        key: String,
    },
    /// An operand could not be converted to an attribute value.
    #[error(transparent)]
    Serialization(#[from] serde_dynamo::Error),
}

/// Builds a filter expression out of a set of operators.
///
/// ```rust
/// use dynamodb_fields::operators::{FilterExpression, comparison::LessThan};
/// use serde_json::json;
///
/// let filter = json!({"age": {"$lt": 30}});
/// let expression = FilterExpression::new()
///     .operator(LessThan)
///     .build(filter.as_object().unwrap())
///     .unwrap();
/// assert_eq!(expression.expression, "#age < :age");
/// ```
#[derive(Default)]
pub struct FilterExpression {
    operators: Vec<Box<dyn Operator>>,
}

impl FilterExpression {
    /// A builder without operators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator. Operators are tried in registration order.
    pub fn operator(mut self, operator: impl Operator + 'static) -> Self {
        self.operators.push(Box::new(operator));
        self
    }

    /// Translate every entry of `filter` and combine the fragments with `AND`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fields.filter_expression", skip(self), err)
    )]
    pub fn build(
        &self,
        filter: &Map<String, Value>,
    ) -> Result<common::ExpressionInput, OperatorError> {
        let mut operations = Vec::with_capacity(filter.len());
        for (key, value) in filter {
            let input = FilterInput { key, value };
            let operator = self
                .operators
                .iter()
                .find(|operator| operator.can_process(&input))
                .ok_or_else(|| OperatorError::Unsupported { key: key.clone() })?;
            operations.push(operator.process(&input)?);
        }
        Ok(common::ExpressionInput::merge(common::AND, operations))
    }
}

/// Set a filter fragment on a `Query` or `Scan` builder.
///
/// Nothing is set for an empty fragment. Attribute name and value maps already present on
/// the builder are replaced.
#[macro_export]
macro_rules! apply_filter_expression {
    ($builder:expr, $expression_input:expr) => {{
        let expression_input: $crate::common::ExpressionInput = $expression_input;
        if expression_input.is_empty() {
            $builder
        } else {
            $builder
                .set_filter_expression(Some(expression_input.expression))
                .set_expression_attribute_names(Some(expression_input.expression_attribute_names))
                .set_expression_attribute_values(Some(
                    expression_input.expression_attribute_values,
                ))
        }
    }};
}
