use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use doctor_cell::DoctorSummary;
use patient_cell::PatientSummary;
use shared_models::numeric::lenient_f64;
use shared_models::record::RecordId;

pub const BOOKINGS_TABLE: &str = "bookings";

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: RecordId,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A booking with its doctor and patient attached for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub doctor: Option<DoctorSummary>,
    pub patient: Option<PatientSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(BookingError::InvalidStatus),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

// ==============================================================================
// STATISTICS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingStatRow {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub booking_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    pub completed_bookings: usize,
    pub today_bookings: usize,
    pub total_revenue: f64,
}

impl BookingStats {
    pub fn from_rows(rows: &[BookingStatRow], today: NaiveDate) -> Self {
        let with_status = |wanted: BookingStatus| {
            rows.iter()
                .filter(|b| b.status.as_deref() == Some(wanted.as_str()))
                .count()
        };

        Self {
            total_bookings: rows.len(),
            pending_bookings: with_status(BookingStatus::Pending),
            confirmed_bookings: with_status(BookingStatus::Confirmed),
            cancelled_bookings: with_status(BookingStatus::Cancelled),
            completed_bookings: with_status(BookingStatus::Completed),
            today_bookings: rows
                .iter()
                .filter(|b| b.booking_date.as_deref().and_then(booking_day) == Some(today))
                .count(),
            total_revenue: shared_models::numeric::sum(rows.iter().map(|b| b.total_amount)),
        }
    }
}

/// Calendar day of a `booking_date`: the literal date part of a plain date or
/// timestamp, with any offset ignored.
pub fn booking_day(raw: &str) -> Option<NaiveDate> {
    raw.trim()
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found")]
    NotFound,

    #[error("Invalid status. Must be: pending, confirmed, cancelled, or completed")]
    InvalidStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn status_parsing_is_exact() {
        assert_eq!("pending".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
        assert_eq!("completed".parse::<BookingStatus>().unwrap(), BookingStatus::Completed);
        assert!("Pending".parse::<BookingStatus>().is_err());
        assert!("no_show".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn booking_day_reads_dates_and_timestamps() {
        assert_eq!(booking_day("2024-12-25"), Some(day("2024-12-25")));
        assert_eq!(booking_day("2024-12-25T10:30:00"), Some(day("2024-12-25")));
        assert_eq!(booking_day("2024-12-25T23:30:00-02:00"), Some(day("2024-12-25")));
        assert_eq!(booking_day("2024-12-25T01:00:00+05:00"), Some(day("2024-12-25")));
        assert_eq!(booking_day("soon"), None);
    }

    #[test]
    fn stats_count_statuses_today_and_revenue() {
        let rows: Vec<BookingStatRow> = serde_json::from_value(json!([
            {"status": "pending", "booking_date": "2024-12-25", "total_amount": 100},
            {"status": "confirmed", "booking_date": "2024-12-25T09:00:00Z", "total_amount": "50.5"},
            {"status": "cancelled", "booking_date": "2024-12-24", "total_amount": null},
            {"status": "completed", "booking_date": null, "total_amount": "n/a"},
            {"status": "completed", "booking_date": "2024-12-26", "total_amount": 20}
        ]))
        .unwrap();

        let stats = BookingStats::from_rows(&rows, day("2024-12-25"));
        assert_eq!(
            stats,
            BookingStats {
                total_bookings: 5,
                pending_bookings: 1,
                confirmed_bookings: 1,
                cancelled_bookings: 1,
                completed_bookings: 2,
                today_bookings: 2,
                total_revenue: 170.5,
            }
        );
    }

    #[test]
    fn enriched_booking_flattens_row() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 7,
            "doctor_id": "doc-1",
            "patient_id": null,
            "status": "pending",
            "booking_date": "2024-12-25"
        }))
        .unwrap();

        let rendered = serde_json::to_value(EnrichedBooking {
            booking,
            doctor: None,
            patient: None,
        })
        .unwrap();

        assert_eq!(rendered["id"], 7);
        assert_eq!(rendered["booking_date"], "2024-12-25");
        assert_eq!(rendered["doctor"], Value::Null);
        assert_eq!(rendered["patient"], Value::Null);
    }
}
