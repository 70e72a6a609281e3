pub mod clock;
pub mod slots;
pub mod schedule;
pub mod store;
pub mod availability;
