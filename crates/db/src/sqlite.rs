use async_trait::async_trait;
use eyre::WrapErr;
use studio_core::{
    errors::BookingResult,
    models::{booking::Booking, slots::AvailableSlots},
};

use crate::{
    DbPool,
    backend::Backend,
    models::{DbBooking, DbSlot},
};

/// Embedded SQLite storage. Each save replaces a table inside one
/// transaction, so a failed write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: DbPool,
}

impl SqliteBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn load_slots(&self) -> BookingResult<AvailableSlots> {
        let rows = sqlx::query_as::<_, DbSlot>(
            r#"
            SELECT date, time_range
            FROM available_slots
            ORDER BY date ASC, time_range ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .wrap_err("Failed to load available slots")?;

        let mut slots = AvailableSlots::new();
        for row in rows {
            let range = row.time_range()?;
            slots.add(&row.date, [range]);
        }

        tracing::debug!("Loaded {} declared dates", slots.len());
        Ok(slots)
    }

    async fn save_slots(&self, slots: &AvailableSlots) -> BookingResult<()> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        sqlx::query("DELETE FROM available_slots")
            .execute(&mut *tx)
            .await
            .wrap_err("Failed to clear available slots")?;

        for (date, ranges) in slots.iter() {
            for range in ranges {
                sqlx::query(
                    r#"
                    INSERT INTO available_slots (date, time_range)
                    VALUES (?, ?)
                    "#,
                )
                .bind(date)
                .bind(range.to_string())
                .execute(&mut *tx)
                .await
                .wrap_err_with(|| format!("Failed to insert slot {date} {range}"))?;
            }
        }

        tx.commit().await.wrap_err("Failed to commit available slots")?;
        Ok(())
    }

    async fn load_bookings(&self) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(
            r#"
            SELECT id, date, time_range, name, phone, comment, external_ref, created_at
            FROM bookings
            ORDER BY date ASC, time_range ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .wrap_err("Failed to load bookings")?;

        rows.into_iter().map(DbBooking::into_booking).collect()
    }

    async fn save_bookings(&self, bookings: &[Booking]) -> BookingResult<()> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        sqlx::query("DELETE FROM bookings")
            .execute(&mut *tx)
            .await
            .wrap_err("Failed to clear bookings")?;

        for booking in bookings {
            let row = DbBooking::from(booking);
            sqlx::query(
                r#"
                INSERT INTO bookings (id, date, time_range, name, phone, comment, external_ref, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.id)
            .bind(&row.date)
            .bind(&row.time_range)
            .bind(&row.name)
            .bind(&row.phone)
            .bind(&row.comment)
            .bind(&row.external_ref)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await
            .wrap_err_with(|| format!("Failed to insert booking {}", row.id))?;
        }

        tx.commit().await.wrap_err("Failed to commit bookings")?;
        Ok(())
    }
}
