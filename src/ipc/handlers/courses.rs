use serde_json::json;

use crate::api::CoursePayload;
use crate::ipc::error::{api_err, err, ok};
use crate::ipc::helpers::{gateway, optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::stats;

/// The `include` eager-load parameter. The dashboard needs embedded tugas
/// for its completed count, so that is the default.
fn include_param(req: &Request) -> Option<String> {
    match optional_str(req, "include") {
        Some(v) if v.is_empty() => None,
        Some(v) => Some(v),
        None => Some("tugas".to_string()),
    }
}

// Mirrors the course form default (3 SKS); accepts number or numeric text.
fn sks_param(req: &Request) -> i64 {
    match req.params.get("sks") {
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            .unwrap_or(3),
        None => 3,
    }
}

fn course_payload(req: &Request) -> Result<CoursePayload, serde_json::Value> {
    // Presence of a non-blank name is the only validation the form performs.
    let nama = required_str(req, "nama")?;
    Ok(CoursePayload {
        nama,
        deskripsi: optional_str(req, "deskripsi"),
        sks: sks_param(req),
    })
}

fn handle_courses_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    match api.list_courses(include_param(req).as_deref()) {
        Ok(courses) => {
            // Counts ride along so the UI can render the dashboard header
            // without a second pass over the list.
            let stats = stats::dashboard_stats(&courses);
            ok(&req.id, json!({ "courses": courses, "stats": stats }))
        }
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_courses_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match api.get_course(&course_id, include_param(req).as_deref()) {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_courses_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let payload = match course_payload(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match api.create_course(&payload) {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_courses_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let payload = match course_payload(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match api.update_course(&course_id, &payload) {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => api_err(&req.id, &e),
    }
}

fn handle_courses_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let api = match gateway(state, req) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Confirmation happens in the UI; by the time the request arrives the
    // deletion is unconditional.
    match api.delete_course(&course_id) {
        Ok(()) => ok(&req.id, json!({ "deleted": true })),
        Err(e) => api_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_courses_list(state, req)),
        "courses.get" => Some(handle_courses_get(state, req)),
        "courses.create" => Some(handle_courses_create(state, req)),
        "courses.update" => Some(handle_courses_update(state, req)),
        "courses.delete" => Some(handle_courses_delete(state, req)),
        _ => None,
    }
}
