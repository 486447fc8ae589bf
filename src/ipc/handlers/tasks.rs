use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::api::{TaskFilter, TaskPayload};
use crate::ipc::error::{api_err, err, ok};
use crate::ipc::helpers::{gateway, optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::TaskStatus;
use crate::stats;

/// Accepts either a full RFC 3339 timestamp (stored tasks echo their
/// deadline back on status changes) or the `YYYY-MM-DD` a date input
/// produces, normalized to UTC midnight. Absent or blank means no deadline.
fn deadline_param(req: &Request) -> Result<Option<DateTime<Utc>>, serde_json::Value> {
    let Some(raw) = optional_str(req, "deadline") else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(dt.and_utc()));
    }
    Err(err(
        &req.id,
        "bad_params",
        "deadline must be RFC 3339 or YYYY-MM-DD",
        None,
    ))
}

fn status_param(req: &Request, key: &str) -> Result<Option<TaskStatus>, serde_json::Value> {
    let Some(raw) = optional_str(req, key) else {
        return Ok(None);
    };
    serde_json::from_value(json!(raw))
        .map(Some)
        .map_err(|_| err(&req.id, "bad_params", format!("unknown status: {}", raw), None))
}

fn handle_tasks_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // One round trip: the course plus its tugas, like the task page loads.
    let mut course = match api.get_course(&course_id, Some("tugas")) {
        Ok(c) => c,
        Err(e) => return api_err(&req.id, &e),
    };
    let tasks = course.tugas.take().unwrap_or_default();
    let summary = stats::task_summary(&tasks, Utc::now());
    ok(
        &req.id,
        json!({ "course": course, "tasks": tasks, "summary": summary }),
    )
}

fn handle_tasks_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let status = match status_param(req, "status") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let filter = TaskFilter {
        status,
        mata_kuliah_id: optional_str(req, "courseId"),
    };

    match api.list_tasks(&filter) {
        Ok(tasks) => {
            let summary = stats::task_summary(&tasks, Utc::now());
            ok(&req.id, json!({ "tasks": tasks, "summary": summary }))
        }
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_tasks_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let nama = match required_str(req, "nama") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let deadline = match deadline_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // New tasks always start at the beginning of the lifecycle.
    let payload = TaskPayload {
        nama,
        deskripsi: optional_str(req, "deskripsi"),
        deadline,
        mata_kuliah_id: course_id,
        status: TaskStatus::BelumDikerjakan,
    };

    match api.create_task(&payload) {
        Ok(task) => ok(&req.id, json!({ "task": task })),
        Err(e) => api_err(&req.id, &e),
    }
}

/// The remote API updates with a full PUT, so status changes resend the
/// task fields the UI already holds. `tasks.updateStatus` is the
/// status-dropdown spelling of the same operation.
fn handle_tasks_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let task_id = match required_str(req, "taskId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let nama = match required_str(req, "nama") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let course_id = match required_str(req, "mataKuliahId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status = match status_param(req, "status") {
        Ok(Some(v)) => v,
        Ok(None) => return err(&req.id, "bad_params", "missing status", None),
        Err(resp) => return resp,
    };
    let deadline = match deadline_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let payload = TaskPayload {
        nama,
        deskripsi: optional_str(req, "deskripsi"),
        deadline,
        mata_kuliah_id: course_id,
        status,
    };

    match api.update_task(&task_id, &payload) {
        Ok(task) => ok(&req.id, json!({ "task": task })),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_tasks_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let task_id = match required_str(req, "taskId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match api.delete_task(&task_id) {
        Ok(()) => ok(&req.id, json!({ "deleted": true })),
        Err(e) => api_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tasks.list" => Some(handle_tasks_list(state, req)),
        "tasks.search" => Some(handle_tasks_search(state, req)),
        "tasks.create" => Some(handle_tasks_create(state, req)),
        "tasks.update" | "tasks.updateStatus" => Some(handle_tasks_update(state, req)),
        "tasks.delete" => Some(handle_tasks_delete(state, req)),
        _ => None,
    }
}
