use serde_json::json;
use uuid::Uuid;

use crate::calc::{Field, GradeSheet};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, required_str};
use crate::ipc::types::{AppState, Request};

fn session<'a>(
    state: &'a mut AppState,
    req: &Request,
) -> Result<&'a mut GradeSheet, serde_json::Value> {
    let session_id = required_str(req, "sessionId")?;
    state
        .grade_sessions
        .get_mut(&session_id)
        .ok_or_else(|| err(&req.id, "not_found", "unknown grade session", None))
}

fn row_id_param(req: &Request) -> Result<u64, serde_json::Value> {
    req.params
        .get("rowId")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| err(&req.id, "bad_params", "missing rowId", None))
}

fn sheet_state(sheet: &GradeSheet) -> serde_json::Value {
    json!({ "rows": sheet.rows(), "totals": sheet.totals() })
}

fn handle_grade_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let sheet = GradeSheet::new(optional_str(req, "courseName"));
    let session_id = Uuid::new_v4().to_string();

    let mut result = sheet_state(&sheet);
    result["sessionId"] = json!(session_id);
    result["courseLabel"] = json!(sheet.course_label());
    state.grade_sessions.insert(session_id, sheet);
    ok(&req.id, result)
}

fn handle_grade_add_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let sheet = match session(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let row_id = sheet.add_row();
    let mut result = sheet_state(sheet);
    result["rowId"] = json!(row_id);
    ok(&req.id, result)
}

fn handle_grade_remove_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row_id = match row_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let sheet = match session(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    // The sheet refuses to drop its last row; that refusal is silent and
    // the reply just reflects the (unchanged) state.
    sheet.remove_row(row_id);
    ok(&req.id, sheet_state(sheet))
}

fn handle_grade_update_field(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row_id = match row_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let field = match required_str(req, "field") {
        Ok(name) => match Field::parse(&name) {
            Some(f) => f,
            None => return err(&req.id, "bad_params", format!("unknown field: {}", name), None),
        },
        Err(resp) => return resp,
    };
    // Live typing sends text; programmatic callers may send numbers. Either
    // way the raw rendition is stored, never a coerced one.
    let value = match req.params.get("value") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(_) => return err(&req.id, "bad_params", "value must be a string or number", None),
    };

    let sheet = match session(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    sheet.set(row_id, field, &value);
    ok(&req.id, sheet_state(sheet))
}

fn handle_grade_totals(state: &mut AppState, req: &Request) -> serde_json::Value {
    let sheet = match session(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "totals": sheet.totals() }))
}

fn handle_grade_close(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session_id = match required_str(req, "sessionId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let closed = state.grade_sessions.remove(&session_id).is_some();
    ok(&req.id, json!({ "closed": closed }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grade.open" => Some(handle_grade_open(state, req)),
        "grade.addRow" => Some(handle_grade_add_row(state, req)),
        "grade.removeRow" => Some(handle_grade_remove_row(state, req)),
        "grade.updateField" => Some(handle_grade_update_field(state, req)),
        "grade.totals" => Some(handle_grade_totals(state, req)),
        "grade.close" => Some(handle_grade_close(state, req)),
        _ => None,
    }
}
