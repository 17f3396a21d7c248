use serde_json::Value;
use tracing::debug;

use crate::error::ProxyError;
use crate::utils::constants::MIN_TOKEN_LEN;

/// Field names the upstream has been seen to use for the token, by priority.
pub const TOKEN_FIELDS: [&str; 7] = [
    "access_token",
    "accessToken",
    "token",
    "Token",
    "AccessToken",
    "jwt",
    "id_token",
];

static NESTED_FIELD: &str = "data";

/// Extract the bearer token from a successful login response body.
///
/// Shapes are tried in order:
/// 1. a known field of a JSON object
/// 2. a known field of the nested `data` object
/// 3. a bare JSON string
/// 4. a plain-text body
///
/// The first candidate of at least `MIN_TOKEN_LEN` characters wins.
pub fn parse_token(body: &str) -> Result<String, ProxyError> {
    let body = body.trim();

    let found = match serde_json::from_str::<Value>(body) {
        Ok(json) => from_json(&json),
        Err(e) => {
            debug!("login response is not JSON: {}", e);
            from_plain_text(body)
        }
    };

    found.ok_or_else(|| {
        ProxyError::Decode(format!(
            "no token of at least {} characters in login response",
            MIN_TOKEN_LEN
        ))
    })
}

fn from_json(json: &Value) -> Option<String> {
    match json {
        Value::Object(_) => from_fields(json).or_else(|| {
            json.get(NESTED_FIELD)
                .filter(|nested| nested.is_object())
                .and_then(from_fields)
        }),
        Value::String(s) => accept(s),
        _ => None,
    }
}

fn from_fields(json: &Value) -> Option<String> {
    TOKEN_FIELDS
        .iter()
        .filter_map(|field| json.get(*field).and_then(Value::as_str))
        .find_map(accept)
}

fn from_plain_text(body: &str) -> Option<String> {
    let unquoted = body.trim_matches(|c| c == '"' || c == '\'');
    if unquoted.starts_with('<')
        || unquoted.starts_with('{')
        || unquoted.chars().any(char::is_whitespace)
    {
        return None;
    }
    accept(unquoted)
}

fn accept(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    (candidate.chars().count() >= MIN_TOKEN_LEN).then(|| candidate.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_field() {
        assert_eq!(parse_token(r#"{"access_token": "abc123xyz0"}"#).unwrap(), "abc123xyz0");
    }

    #[test]
    fn field_priority_is_fixed() {
        let body = r#"{"token": "second-choice-token", "accessToken": "first-choice-token"}"#;
        assert_eq!(parse_token(body).unwrap(), "first-choice-token");
    }

    #[test]
    fn short_candidate_falls_through_to_next_field() {
        let body = r#"{"access_token": "", "token": "usable-token-42"}"#;
        assert_eq!(parse_token(body).unwrap(), "usable-token-42");
    }

    #[test]
    fn nested_data_object() {
        let body = r#"{"success": true, "data": {"Token": "nested-token-77"}}"#;
        assert_eq!(parse_token(body).unwrap(), "nested-token-77");
    }

    #[test]
    fn bare_json_string_is_unquoted() {
        assert_eq!(parse_token("\"tok_9999999999\"").unwrap(), "tok_9999999999");
    }

    #[test]
    fn plain_text_body() {
        assert_eq!(parse_token("  plain-token-123\n").unwrap(), "plain-token-123");
    }

    #[test]
    fn short_token_is_a_decode_error() {
        let err = parse_token(r#"{"access_token": "ab"}"#).unwrap_err();
        assert!(matches!(err, ProxyError::Decode(_)));
        assert!(matches!(parse_token("\"ab\"").unwrap_err(), ProxyError::Decode(_)));
    }

    #[test]
    fn placeholders_are_rejected() {
        assert!(parse_token("null").is_err());
        assert!(parse_token("").is_err());
        assert!(parse_token(r#"{"access_token": null, "error": "invalid_grant"}"#).is_err());
        assert!(parse_token("<html><body>Service Unavailable</body></html>").is_err());
        assert!(parse_token("invalid login or password").is_err());
    }
}
