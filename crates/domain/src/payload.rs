//! Wire payload returned by the remote time service.

use serde::{Deserialize, Serialize};

/// Successful response body of the `current-datetime` endpoint.
///
/// The service replies with `{ "currentDateTime": "<string>" }`. The
/// timestamp is treated as opaque display text; no date parsing happens
/// on the client side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimePayload {
    /// The server-rendered current date/time.
    pub current_date_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserializes_expected_field() {
        let payload: DateTimePayload =
            serde_json::from_str(r#"{"currentDateTime":"2024-01-01T00:00:00Z"}"#)
                .expect("valid payload");
        assert_eq!(payload.current_date_time, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result = serde_json::from_str::<DateTimePayload>(r#"{"wrong":"field"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let payload: DateTimePayload = serde_json::from_str(
            r#"{"currentDateTime":"2024-01-01T00:00:00Z","timezone":"UTC"}"#,
        )
        .expect("valid payload");
        assert_eq!(payload.current_date_time, "2024-01-01T00:00:00Z");
    }
}
