use serde::Serialize;

/// Subtitle fallback when the hosting view gives no course name.
pub const DEFAULT_COURSE_LABEL: &str = "mata kuliah ini";

/// Lenient numeric parse for live form input. Anything that does not parse
/// to a finite number contributes 0 instead of failing, so a half-typed
/// value never breaks the running totals.
pub fn parse_lenient(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Letter classification with inclusive lower bounds, highest first.
pub fn letter_grade(score: f64) -> &'static str {
    if score >= 85.0 {
        "A"
    } else if score >= 80.0 {
        "A-"
    } else if score >= 75.0 {
        "B+"
    } else if score >= 70.0 {
        "B"
    } else if score >= 65.0 {
        "B-"
    } else if score >= 60.0 {
        "C+"
    } else if score >= 55.0 {
        "C"
    } else if score >= 50.0 {
        "D"
    } else {
        "E"
    }
}

/// One weighted grading item. `weight` and `score` keep whatever text the
/// user typed; coercion happens only inside `totals()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRow {
    pub id: u64,
    pub label: String,
    pub weight: String,
    pub score: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Label,
    Weight,
    Score,
}

impl Field {
    pub fn parse(name: &str) -> Option<Field> {
        match name {
            "label" => Some(Field::Label),
            "weight" => Some(Field::Weight),
            "score" => Some(Field::Score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_weight: f64,
    pub final_score: f64,
    pub letter: String,
    pub weight_message: String,
}

/// An editable grade-estimation sheet. Scratch state only: one sheet per
/// hosting view, never persisted, never tied to a server entity.
pub struct GradeSheet {
    course_name: Option<String>,
    rows: Vec<GradeRow>,
    next_id: u64,
}

impl GradeSheet {
    /// Seed rows mirror the common weighting of an Indonesian course:
    /// Tugas/Kuis 30%, UTS 30%, UAS 40%, scores left blank.
    pub fn new(course_name: Option<String>) -> Self {
        let rows = vec![
            GradeRow {
                id: 1,
                label: "Tugas / Kuis".to_string(),
                weight: "30".to_string(),
                score: String::new(),
            },
            GradeRow {
                id: 2,
                label: "UTS".to_string(),
                weight: "30".to_string(),
                score: String::new(),
            },
            GradeRow {
                id: 3,
                label: "UAS".to_string(),
                weight: "40".to_string(),
                score: String::new(),
            },
        ];
        Self {
            course_name: course_name.filter(|s| !s.trim().is_empty()),
            rows,
            next_id: 4,
        }
    }

    pub fn course_label(&self) -> &str {
        self.course_name.as_deref().unwrap_or(DEFAULT_COURSE_LABEL)
    }

    pub fn rows(&self) -> &[GradeRow] {
        &self.rows
    }

    /// Appends an empty row and returns its id. Always succeeds.
    pub fn add_row(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(GradeRow {
            id,
            label: String::new(),
            weight: String::new(),
            score: String::new(),
        });
        id
    }

    /// Removes the matching row. The sheet keeps at least one row: removing
    /// the last remaining row is a silent no-op, as is an unknown id.
    pub fn remove_row(&mut self, id: u64) {
        if self.rows.len() <= 1 {
            return;
        }
        self.rows.retain(|r| r.id != id);
    }

    /// Stores the raw value on the matching row. No validation here; the
    /// editable field must echo back exactly what was typed.
    pub fn set(&mut self, id: u64, field: Field, value: &str) {
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            return;
        };
        match field {
            Field::Label => row.label = value.to_string(),
            Field::Weight => row.weight = value.to_string(),
            Field::Score => row.score = value.to_string(),
        }
    }

    /// Recomputed from scratch on every call; the rows are the single
    /// source of truth. Returns unrounded numbers, display formatting is
    /// the caller's concern.
    pub fn totals(&self) -> Totals {
        let total_weight: f64 = self.rows.iter().map(|r| parse_lenient(&r.weight)).sum();
        let weighted_sum: f64 = self
            .rows
            .iter()
            .map(|r| parse_lenient(&r.weight) * parse_lenient(&r.score))
            .sum();
        let final_score = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };
        let letter = if final_score > 0.0 {
            letter_grade(final_score)
        } else {
            "-"
        };
        // Exact match: the advisory only settles once the weights add up to
        // precisely 100, anything else reports the running total.
        let weight_message = if total_weight == 100.0 {
            "Bobot sudah 100%.".to_string()
        } else {
            format!("Total bobot saat ini {}%.", total_weight)
        };
        Totals {
            total_weight,
            final_score,
            letter: letter.to_string(),
            weight_message,
        }
    }
}
