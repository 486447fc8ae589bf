use crate::api::ApiClient;
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};

pub fn gateway<'a>(state: &'a AppState, req: &Request) -> Result<&'a ApiClient, serde_json::Value> {
    state
        .api
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_session", "configure the API session first", None))
}

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
}
