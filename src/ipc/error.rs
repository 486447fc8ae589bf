use serde_json::json;

use crate::api::ApiError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Gateway failures all surface under one code; the HTTP status rides along
/// in the details when there is one.
pub fn api_err(id: &str, e: &ApiError) -> serde_json::Value {
    let details = match e {
        ApiError::Status { status, .. } => Some(json!({ "status": status })),
        _ => None,
    };
    err(id, "api_request_failed", e.to_string(), details)
}
