pub mod auth;
pub mod error;
pub mod extract;
pub mod numeric;
pub mod record;
pub mod response;
