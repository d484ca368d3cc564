use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Slot unavailable: {range} on {date} is not free, choose another time")]
    SlotUnavailable { date: String, range: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Store corrupt: {store}: {reason}")]
    StoreCorrupt { store: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;
