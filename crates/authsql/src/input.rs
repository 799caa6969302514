//! Loosely-typed request input, as handed over by the calling abstraction.
//!
//! [`WhereInput`] mirrors the wire shape `{field, operator?, value, connector?}`.
//! Converting it into a [`Predicate`] is the only place operator and connector
//! names are interpreted, so an unknown name fails here, before any SQL exists.

use crate::condition::{Connector, Operator, Predicate};
use crate::error::{AdapterError, AdapterResult};
use crate::value::Value;
use serde::Deserialize;
use serde_json::Value as Json;

/// One filter condition as received from the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WhereInput {
    pub field: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Json,
    #[serde(default)]
    pub connector: Option<String>,
}

impl TryFrom<WhereInput> for Predicate {
    type Error = AdapterError;

    fn try_from(input: WhereInput) -> AdapterResult<Self> {
        let field = input.field;
        let connector = match input.connector.as_deref() {
            None => Connector::And,
            Some(name) => parse_connector(name)?,
        };

        let operator = match input.operator.as_deref().unwrap_or("eq") {
            "eq" => Operator::Eq(scalar(&field, input.value)?),
            "ne" => Operator::Ne(scalar(&field, input.value)?),
            "lt" => Operator::Lt(scalar(&field, input.value)?),
            "lte" => Operator::Lte(scalar(&field, input.value)?),
            "gt" => Operator::Gt(scalar(&field, input.value)?),
            "gte" => Operator::Gte(scalar(&field, input.value)?),
            "in" => Operator::In(list(&field, input.value)?),
            "not_in" => Operator::NotIn(list(&field, input.value)?),
            "contains" => Operator::Contains(text(&field, input.value)?),
            "starts_with" => Operator::StartsWith(text(&field, input.value)?),
            "ends_with" => Operator::EndsWith(text(&field, input.value)?),
            other => return Err(AdapterError::UnsupportedOperator(other.to_string())),
        };

        Ok(Predicate {
            field,
            operator,
            connector,
        })
    }
}

fn parse_connector(name: &str) -> AdapterResult<Connector> {
    match name.to_ascii_lowercase().as_str() {
        "and" => Ok(Connector::And),
        "or" => Ok(Connector::Or),
        _ => Err(AdapterError::UnsupportedOperator(name.to_string())),
    }
}

/// Convert a JSON scalar into a [`Value`].
fn scalar(field: &str, json: Json) -> AdapterResult<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n
                .as_f64()
                .map(Value::Real)
                .ok_or_else(|| AdapterError::invalid_value(field, format!("number {n} out of range"))),
        },
        Json::String(s) => Ok(Value::Text(s)),
        Json::Array(_) => Err(AdapterError::invalid_value(field, "array given for a scalar operator")),
        Json::Object(_) => Err(AdapterError::invalid_value(field, "objects are not supported")),
    }
}

fn list(field: &str, json: Json) -> AdapterResult<Vec<Value>> {
    match json {
        Json::Array(items) => items.into_iter().map(|item| scalar(field, item)).collect(),
        _ => Err(AdapterError::invalid_value(field, "expected an array")),
    }
}

fn text(field: &str, json: Json) -> AdapterResult<String> {
    match scalar(field, json)? {
        Value::Null => Err(AdapterError::invalid_value(field, "pattern cannot be null")),
        value => Ok(value.to_string()),
    }
}

/// Parse a list of wire predicates.
pub fn parse_where(inputs: Vec<WhereInput>) -> AdapterResult<Vec<Predicate>> {
    inputs.into_iter().map(Predicate::try_from).collect()
}
