pub mod admin_input;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod slots;
pub mod time_range;
