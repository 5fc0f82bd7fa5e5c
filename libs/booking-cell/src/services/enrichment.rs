use std::collections::{BTreeSet, HashMap};

use futures::future;
use tracing::{debug, error};

use doctor_cell::{DoctorService, DoctorSummary};
use patient_cell::{PatientService, PatientSummary};
use shared_config::AppConfig;

use crate::models::{Booking, EnrichedBooking};

/// Attaches doctor and patient summaries to each booking.
///
/// Distinct ids are looked up with one query per table, both tables
/// concurrently. A failed lookup is logged and leaves the corresponding
/// field `null`; it never fails the request.
pub async fn enrich_bookings(config: &AppConfig, bookings: Vec<Booking>) -> Vec<EnrichedBooking> {
    if bookings.is_empty() {
        return Vec::new();
    }

    let doctor_ids = distinct_ids(bookings.iter().map(|b| b.doctor_id.as_deref()));
    let patient_ids = distinct_ids(bookings.iter().map(|b| b.patient_id.as_deref()));
    debug!(
        "Enriching {} bookings ({} doctors, {} patients)",
        bookings.len(),
        doctor_ids.len(),
        patient_ids.len()
    );

    let doctor_service = DoctorService::new(config);
    let patient_service = PatientService::new(config);

    let (doctors, patients) = future::join(
        doctor_service.summaries(&doctor_ids),
        patient_service.summaries(&patient_ids),
    )
    .await;

    let doctors = doctors.unwrap_or_else(|e| {
        error!("Error fetching doctors for bookings: {}", e);
        Vec::new()
    });
    let patients = patients.unwrap_or_else(|e| {
        error!("Error fetching patients for bookings: {}", e);
        Vec::new()
    });

    attach_summaries(bookings, doctors, patients)
}

/// Pure join of bookings with summaries by id. Input order is preserved.
pub fn attach_summaries(
    bookings: Vec<Booking>,
    doctors: Vec<DoctorSummary>,
    patients: Vec<PatientSummary>,
) -> Vec<EnrichedBooking> {
    let doctors: HashMap<String, DoctorSummary> = doctors
        .into_iter()
        .map(|d| (d.doctor_id.clone(), d))
        .collect();
    let patients: HashMap<String, PatientSummary> = patients
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    bookings
        .into_iter()
        .map(|booking| {
            let doctor = booking
                .doctor_id
                .as_ref()
                .and_then(|id| doctors.get(id))
                .cloned();
            let patient = booking
                .patient_id
                .as_ref()
                .and_then(|id| patients.get(id))
                .cloned();

            EnrichedBooking {
                booking,
                doctor,
                patient,
            }
        })
        .collect()
}

fn distinct_ids<'a, I>(ids: I) -> Vec<String>
where
    I: Iterator<Item = Option<&'a str>>,
{
    ids.flatten()
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
