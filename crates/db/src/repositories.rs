pub mod booking_ledger;
pub mod slot_store;

use std::sync::Arc;

use studio_core::{
    errors::{BookingError, BookingResult},
    models::{availability::OverlapPolicy, booking::Booking, slots::AvailableSlots},
};
use tokio::sync::Mutex;

use crate::backend::{Backend, CorruptStorePolicy};

pub use booking_ledger::BookingLedger;
pub use slot_store::SlotStore;

/// Serializes every read-modify-write of the persisted documents.
///
/// Both documents are rewritten whole, so one lock covers all dates: two
/// writers on different dates would still overwrite each other's document.
pub(crate) type WriteLock = Arc<Mutex<()>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub corrupt_policy: CorruptStorePolicy,
    pub overlap_policy: OverlapPolicy,
}

/// The slot store and booking ledger over one backend and one write lock.
#[derive(Clone)]
pub struct Repositories {
    pub slots: SlotStore,
    pub bookings: BookingLedger,
}

impl Repositories {
    pub fn new(backend: Arc<dyn Backend>, options: StoreOptions) -> Self {
        let documents = Documents {
            backend,
            corrupt_policy: options.corrupt_policy,
        };
        let lock = WriteLock::default();

        Self {
            slots: SlotStore::new(documents.clone(), lock.clone()),
            bookings: BookingLedger::new(documents, lock, options.overlap_policy),
        }
    }
}

/// Backend access with the corrupt-store policy applied to reads.
#[derive(Clone)]
pub(crate) struct Documents {
    backend: Arc<dyn Backend>,
    corrupt_policy: CorruptStorePolicy,
}

impl Documents {
    pub(crate) async fn load_slots(&self) -> BookingResult<AvailableSlots> {
        let result = self.backend.load_slots().await;
        self.recover(result, "slot calendar")
    }

    pub(crate) async fn save_slots(&self, slots: &AvailableSlots) -> BookingResult<()> {
        self.backend.save_slots(slots).await
    }

    pub(crate) async fn load_bookings(&self) -> BookingResult<Vec<Booking>> {
        let result = self.backend.load_bookings().await;
        self.recover(result, "booking ledger")
    }

    pub(crate) async fn save_bookings(&self, bookings: &[Booking]) -> BookingResult<()> {
        self.backend.save_bookings(bookings).await
    }

    fn recover<T: Default>(&self, result: BookingResult<T>, what: &str) -> BookingResult<T> {
        match result {
            Err(BookingError::StoreCorrupt { store, reason }) => {
                tracing::error!("The {} in {} is corrupt: {}", what, store, reason);
                match self.corrupt_policy {
                    CorruptStorePolicy::Fail => Err(BookingError::StoreCorrupt { store, reason }),
                    CorruptStorePolicy::TreatAsEmpty => {
                        tracing::error!("Continuing with an empty {}; the next write replaces it", what);
                        Ok(T::default())
                    }
                }
            }
            other => other,
        }
    }
}
