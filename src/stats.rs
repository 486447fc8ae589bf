use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Course, Task, TaskStatus};

/// Header counts for the course dashboard. Recomputed by re-scanning the
/// fetched list on every request; nothing here is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub course_count: usize,
    pub task_count: i64,
    pub completed_count: usize,
}

pub fn dashboard_stats(courses: &[Course]) -> DashboardStats {
    let task_count = courses.iter().map(|c| c.task_count()).sum();
    let completed_count = courses
        .iter()
        .flat_map(|c| c.tugas.iter().flatten())
        .filter(|t| t.status == TaskStatus::Selesai)
        .count();
    DashboardStats {
        course_count: courses.len(),
        task_count,
        completed_count,
    }
}

/// A task is overdue once its deadline has passed and it is not done.
/// Tasks without a deadline never go overdue.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.deadline {
        Some(deadline) => deadline < now && task.status != TaskStatus::Selesai,
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total: usize,
    pub done: usize,
    pub overdue: usize,
    pub overdue_task_ids: Vec<String>,
}

pub fn task_summary(tasks: &[Task], now: DateTime<Utc>) -> TaskSummary {
    let done = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Selesai)
        .count();
    let overdue_task_ids: Vec<String> = tasks
        .iter()
        .filter(|t| is_overdue(t, now))
        .map(|t| t.id.clone())
        .collect();
    TaskSummary {
        total: tasks.len(),
        done,
        overdue: overdue_task_ids.len(),
        overdue_task_ids,
    }
}
