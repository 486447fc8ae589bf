use serde_json::json;

use crate::api::ApiClient;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "apiConfigured": state.api.is_some()
        }),
    )
}

/// Binds (or rebinds) the REST gateway. The token is opaque pass-through;
/// the daemon does no auth of its own.
fn handle_session_configure(state: &mut AppState, req: &Request) -> serde_json::Value {
    let base_url = match required_str(req, "baseUrl") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let token = match required_str(req, "token") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match ApiClient::new(base_url.as_str(), token) {
        Ok(client) => {
            state.api = Some(client);
            ok(&req.id, json!({ "baseUrl": base_url }))
        }
        Err(e) => err(&req.id, "api_init_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "session.configure" => Some(handle_session_configure(state, req)),
        _ => None,
    }
}
