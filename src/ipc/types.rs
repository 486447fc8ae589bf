use std::collections::HashMap;

use serde::Deserialize;

use crate::api::ApiClient;
use crate::calc::GradeSheet;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub api: Option<ApiClient>,
    /// Live grade-estimation sheets, keyed by session id. Scratch state:
    /// opened when a calculator view mounts, dropped when it closes.
    pub grade_sessions: HashMap<String, GradeSheet>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api: None,
            grade_sessions: HashMap::new(),
        }
    }
}
