use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task lifecycle as the remote API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    BelumDikerjakan,
    SedangDikerjakan,
    Selesai,
}

impl TaskStatus {
    pub fn wire_name(&self) -> &'static str {
        match self {
            TaskStatus::BelumDikerjakan => "BELUM_DIKERJAKAN",
            TaskStatus::SedangDikerjakan => "SEDANG_DIKERJAKAN",
            TaskStatus::Selesai => "SELESAI",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            TaskStatus::BelumDikerjakan => "Belum dikerjakan",
            TaskStatus::SedangDikerjakan => "Sedang dikerjakan",
            TaskStatus::Selesai => "Selesai",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub nama: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub mata_kuliah_id: String,
    pub status: TaskStatus,
}

/// Aggregate counts some list endpoints return instead of embedding rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCount {
    pub tugas: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub nama: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskripsi: Option<String>,
    pub sks: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tugas: Option<Vec<Task>>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<TaskCount>,
}

impl Course {
    /// Task count as the dashboard shows it: the `_count` aggregate when the
    /// server sent one, otherwise the embedded list length.
    pub fn task_count(&self) -> i64 {
        self.count
            .as_ref()
            .map(|c| c.tugas)
            .or_else(|| self.tugas.as_ref().map(|t| t.len() as i64))
            .unwrap_or(0)
    }
}
