use caravel_core::model::SsoToken;
use caravel_core::{CallError, CallResult};
use reqwest::RequestBuilder;
use serde_json::Value;

/// Send a request and return the response body, mapping every failure into
/// the call-error taxonomy. Non-2xx statuses keep the body for diagnosis.
pub(crate) async fn execute(request: RequestBuilder) -> CallResult<String> {
    let response = request.send().await.map_err(classify)?;
    let status = response.status();
    let body = response.text().await.map_err(classify)?;

    if !status.is_success() {
        return Err(CallError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

pub(crate) fn classify(err: reqwest::Error) -> CallError {
    if err.is_timeout() {
        CallError::Timeout(err.to_string())
    } else {
        CallError::Connection(err.to_string())
    }
}

pub(crate) fn parse_json(body: &str) -> CallResult<Value> {
    serde_json::from_str(body).map_err(|err| CallError::decode(err.to_string(), body))
}

/// Read a field that services return inconsistently as a string or a number,
/// normalised to a non-empty string.
pub(crate) fn string_field(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Authorization header value for SSO-issued tokens.
pub(crate) fn sso_auth(token: &SsoToken) -> String {
    format!("sso-jwt {}", token.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_field_accepts_string_and_number() {
        let value = json!({"shopperId": "123456", "profileID": 98765});
        assert_eq!(string_field(&value, "shopperId").as_deref(), Some("123456"));
        assert_eq!(string_field(&value, "profileID").as_deref(), Some("98765"));
    }

    #[test]
    fn test_string_field_rejects_empty_and_missing() {
        let value = json!({"jwtToken": "", "data": null});
        assert_eq!(string_field(&value, "jwtToken"), None);
        assert_eq!(string_field(&value, "data"), None);
        assert_eq!(string_field(&value, "absent"), None);
    }

    #[test]
    fn test_parse_json_classifies_garbage_as_decode() {
        let err = parse_json("not json").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_sso_auth_scheme() {
        let token = SsoToken::new("abc123");
        assert_eq!(sso_auth(&token), "sso-jwt abc123");
    }
}
