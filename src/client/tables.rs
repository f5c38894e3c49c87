use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::FieldValue;

/// Body of `/create`.
#[derive(Debug, Clone, Serialize)]
pub struct InsertRequest {
    pub table: String,
    pub values: BTreeMap<String, FieldValue>,
}

/// Optional filter attached to select and delete queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub field: String,
    pub op: String,
    pub value: FieldValue,
}

/// Body of `/get` and `/delete`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub table: String,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl QueryRequest {
    pub fn new(table: impl Into<String>, filter: Option<Filter>) -> Self {
        Self {
            table: table.into(),
            filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn where_key_is_omitted_without_filter() {
        let query = QueryRequest::new("users", None);
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({"table": "users"}));
    }

    #[test]
    fn filter_is_sent_under_where() {
        let query = QueryRequest::new(
            "users",
            Some(Filter {
                field: "active".into(),
                op: "=".into(),
                value: FieldValue::coerce("FALSE"),
            }),
        );

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "table": "users",
                "where": {"field": "active", "op": "=", "value": false}
            })
        );
    }

    #[test]
    fn insert_values_keep_their_types() {
        let values = [("name", "bob"), ("age", "41"), ("admin", "true")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), FieldValue::coerce(v)))
            .collect();
        let insert = InsertRequest {
            table: "users".into(),
            values,
        };

        assert_eq!(
            serde_json::to_value(&insert).unwrap(),
            json!({
                "table": "users",
                "values": {"name": "bob", "age": 41, "admin": true}
            })
        );
    }
}
