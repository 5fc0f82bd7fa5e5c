use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PATIENTS_TABLE: &str = "patients";

/// Columns other cells embed when they show a patient next to their own rows.
pub const PATIENT_SUMMARY_COLUMNS: &str = "id,name,email,phone,profile_img_url";

/// A `patients` row; `id` is the patient's Firebase UID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_img_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientGenderRow {
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStats {
    pub total_patients: usize,
    pub male_count: usize,
    pub female_count: usize,
}

impl PatientStats {
    pub fn from_rows(rows: &[PatientGenderRow]) -> Self {
        let count = |wanted: &str| {
            rows.iter()
                .filter(|p| {
                    p.gender
                        .as_deref()
                        .is_some_and(|g| g.trim().eq_ignore_ascii_case(wanted))
                })
                .count()
        };

        Self {
            total_patients: rows.len(),
            male_count: count("male"),
            female_count: count("female"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,
}
