use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::numeric::{lenient_f64, lenient_i64, value_as_i64};
use shared_models::record::RecordId;

pub const DOCTORS_TABLE: &str = "doctors";
pub const AVAILABILITIES_TABLE: &str = "availabilities";
pub const WITHDRAWS_TABLE: &str = "withdraws";

/// Columns other cells embed when they show a doctor next to their own rows.
pub const DOCTOR_SUMMARY_COLUMNS: &str = "doctor_id,full_name,email,specialization,profile_img_url";

// ==============================================================================
// DOCTORS
// ==============================================================================

/// A `doctors` row. `doctor_id` is the doctor's Firebase UID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub profile_img_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub doctor_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
    pub profile_img_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorStatRow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub numb_session: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub numb_patients: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStats {
    pub total_doctors: usize,
    pub average_rating: f64,
    pub total_sessions: i64,
    pub total_patients: i64,
}

impl DoctorStats {
    pub fn from_rows(rows: &[DoctorStatRow]) -> Self {
        let rating_sum: f64 = rows.iter().map(|d| d.avg_rating.unwrap_or(0.0)).sum();

        Self {
            total_doctors: rows.len(),
            average_rating: rating_sum / rows.len().max(1) as f64,
            total_sessions: rows.iter().map(|d| d.numb_session.unwrap_or(0)).sum(),
            total_patients: rows.iter().map(|d| d.numb_patients.unwrap_or(0)).sum(),
        }
    }
}

// ==============================================================================
// AVAILABILITIES
// ==============================================================================

/// Weekly slot of a doctor. `day_number` is 0 (Sunday) through 6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: RecordId,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub day_number: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("day_number must be an integer between 0 and 6")]
    InvalidDayNumber,
}

/// `day_number`, when supplied, must be a weekday index.
pub fn validate_availability_payload(payload: &Map<String, Value>) -> Result<(), DoctorError> {
    match payload.get("day_number") {
        None | Some(Value::Null) => Ok(()),
        Some(value) => match value_as_i64(value) {
            Some(day) if (0..=6).contains(&day) => Ok(()),
            _ => Err(DoctorError::InvalidDayNumber),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn stats_average_over_all_doctors() {
        let rows: Vec<DoctorStatRow> = serde_json::from_value(json!([
            {"avg_rating": 4.0, "numb_session": 10, "numb_patients": 3},
            {"avg_rating": null, "numb_session": "5", "numb_patients": null},
            {"avg_rating": "5", "numb_session": null, "numb_patients": 2}
        ]))
        .unwrap();

        let stats = DoctorStats::from_rows(&rows);
        assert_eq!(stats.total_doctors, 3);
        assert_eq!(stats.average_rating, 3.0);
        assert_eq!(stats.total_sessions, 15);
        assert_eq!(stats.total_patients, 5);
    }

    #[test]
    fn stats_of_empty_table_are_zero() {
        let stats = DoctorStats::from_rows(&[]);
        assert_eq!(stats.total_doctors, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"totalDoctors": 0, "averageRating": 0.0, "totalSessions": 0, "totalPatients": 0})
        );
    }

    #[test]
    fn doctor_keeps_unknown_columns() {
        let doctor: Doctor = serde_json::from_value(json!({
            "doctor_id": "uid-1",
            "full_name": "Dr. Sara",
            "bio": "Pediatrics"
        }))
        .unwrap();
        assert_eq!(doctor.extra["bio"], "Pediatrics");
        assert_eq!(serde_json::to_value(&doctor).unwrap()["bio"], "Pediatrics");
    }

    #[test]
    fn day_number_must_be_weekday() {
        let ok = json!({"day_number": 6}).as_object().cloned().unwrap();
        assert!(validate_availability_payload(&ok).is_ok());

        let absent = json!({"doctor_id": "d1"}).as_object().cloned().unwrap();
        assert!(validate_availability_payload(&absent).is_ok());

        let bad = json!({"day_number": 7}).as_object().cloned().unwrap();
        assert_matches!(validate_availability_payload(&bad), Err(DoctorError::InvalidDayNumber));

        let junk = json!({"day_number": "monday"}).as_object().cloned().unwrap();
        assert_matches!(validate_availability_payload(&junk), Err(DoctorError::InvalidDayNumber));
    }
}
