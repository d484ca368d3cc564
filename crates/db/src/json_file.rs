use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use eyre::WrapErr;
use serde::{Serialize, de::DeserializeOwned};
use studio_core::{
    errors::{BookingError, BookingResult},
    models::{booking::Booking, slots::AvailableSlots},
};
use tempfile::NamedTempFile;

use crate::backend::Backend;

pub const SLOTS_FILE: &str = "available-slots.json";
pub const BOOKINGS_FILE: &str = "bookings.json";

/// Stores each collection as a pretty-printed JSON document.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    slots_path: PathBuf,
    bookings_path: PathBuf,
}

impl JsonFileBackend {
    /// Uses `available-slots.json` and `bookings.json` inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::with_paths(dir.join(SLOTS_FILE), dir.join(BOOKINGS_FILE))
    }

    pub fn with_paths(slots_path: impl Into<PathBuf>, bookings_path: impl Into<PathBuf>) -> Self {
        Self {
            slots_path: slots_path.into(),
            bookings_path: bookings_path.into(),
        }
    }

    pub fn slots_path(&self) -> &Path {
        &self.slots_path
    }

    pub fn bookings_path(&self) -> &Path {
        &self.bookings_path
    }
}

#[async_trait]
impl Backend for JsonFileBackend {
    async fn load_slots(&self) -> BookingResult<AvailableSlots> {
        read_document(&self.slots_path).await
    }

    async fn save_slots(&self, slots: &AvailableSlots) -> BookingResult<()> {
        write_document(&self.slots_path, slots).await
    }

    async fn load_bookings(&self) -> BookingResult<Vec<Booking>> {
        read_document(&self.bookings_path).await
    }

    async fn save_bookings(&self, bookings: &[Booking]) -> BookingResult<()> {
        write_document(&self.bookings_path, &bookings).await
    }
}

async fn read_document<T: DeserializeOwned + Default>(path: &Path) -> BookingResult<T> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet, starting empty", path.display());
            return Ok(T::default());
        }
        Err(err) => {
            return Err(eyre::Report::new(err)
                .wrap_err(format!("Failed to read {}", path.display()))
                .into());
        }
    };

    if text.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&text).map_err(|err| BookingError::StoreCorrupt {
        store: path.display().to_string(),
        reason: err.to_string(),
    })
}

async fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> BookingResult<()> {
    let mut body = serde_json::to_vec_pretty(value).wrap_err("Failed to encode document")?;
    body.push(b'\n');

    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&target, &body))
        .await
        .wrap_err("Document writer task failed")??;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

fn replace_file(path: &Path, body: &[u8]) -> eyre::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    let mut file = NamedTempFile::new_in(dir)
        .wrap_err_with(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    file.write_all(body)?;
    file.as_file().sync_all()?;
    file.persist(path)
        .map_err(|err| err.error)
        .wrap_err_with(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}
