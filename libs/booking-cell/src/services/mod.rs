pub mod booking;
pub mod enrichment;

pub use booking::BookingService;
pub use enrichment::{attach_summaries, enrich_bookings};
