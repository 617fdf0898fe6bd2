pub mod analysis;
pub mod checkin;
pub mod feedback;
pub mod query;
pub mod user;
