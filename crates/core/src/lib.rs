//! # Studio Core
//!
//! Domain types shared by the storage and HTTP crates: time ranges, the
//! declared-slot calendar, bookings, the error taxonomy and the notifier seam.

pub mod errors;
pub mod models;
pub mod notify;
