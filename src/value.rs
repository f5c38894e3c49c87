use serde::Serialize;

/// A value typed in at the terminal, after coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl FieldValue {
    /// Digit-only input becomes an integer, `true`/`false` in any case
    /// becomes a boolean, anything else is kept as typed.
    ///
    /// Digit strings too large for an `i64` stay strings.
    pub fn coerce(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return FieldValue::Integer(n);
            }
        }

        if raw.eq_ignore_ascii_case("true") {
            FieldValue::Boolean(true)
        } else if raw.eq_ignore_ascii_case("false") {
            FieldValue::Boolean(false)
        } else {
            FieldValue::String(raw.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digits_become_integers() {
        assert_eq!(FieldValue::coerce("0"), FieldValue::Integer(0));
        assert_eq!(FieldValue::coerce("30"), FieldValue::Integer(30));
        assert_eq!(FieldValue::coerce("007"), FieldValue::Integer(7));
    }

    #[test]
    fn signs_and_decimals_stay_strings() {
        assert_eq!(FieldValue::coerce("-5"), FieldValue::String("-5".into()));
        assert_eq!(FieldValue::coerce("+5"), FieldValue::String("+5".into()));
        assert_eq!(FieldValue::coerce("1.5"), FieldValue::String("1.5".into()));
        assert_eq!(FieldValue::coerce(" 5"), FieldValue::String(" 5".into()));
    }

    #[test]
    fn booleans_ignore_case() {
        assert_eq!(FieldValue::coerce("true"), FieldValue::Boolean(true));
        assert_eq!(FieldValue::coerce("TRUE"), FieldValue::Boolean(true));
        assert_eq!(FieldValue::coerce("False"), FieldValue::Boolean(false));
        assert_eq!(FieldValue::coerce("yes"), FieldValue::String("yes".into()));
    }

    #[test]
    fn empty_and_oversized_input_stay_strings() {
        assert_eq!(FieldValue::coerce(""), FieldValue::String(String::new()));

        let huge = "99999999999999999999999";
        assert_eq!(FieldValue::coerce(huge), FieldValue::String(huge.into()));
    }

    #[test]
    fn serializes_as_plain_json() {
        assert_eq!(serde_json::to_value(FieldValue::coerce("42")).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(FieldValue::coerce("TrUe")).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(FieldValue::coerce("bob")).unwrap(), json!("bob"));
    }
}
