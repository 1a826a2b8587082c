use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use parterre_core::error::StoreError;
use parterre_core::repository::ReservationStore;
use parterre_core::reservation::{
    AdminBatchOutcome, AdminOp, CustomerDetails, Purchase, PurchasedSeat, SeatLock,
    SettlementOutcome,
};

/// SQLite-backed reservation store. The composite primary keys on
/// `locked_seats` and `purchased_seats` are the arbiter for every racing
/// claim; this type never upserts over them.
pub struct SqliteReservationStore {
    pool: SqlitePool,
}

impl SqliteReservationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct LockRow {
    show_id: String,
    seat_id: String,
    session_id: String,
    locked_until: i64,
    checkout_ref: Option<String>,
    has_child_on_lap: bool,
}

impl LockRow {
    fn into_lock(self) -> Result<SeatLock, StoreError> {
        Ok(SeatLock {
            show_id: self.show_id,
            seat_id: self.seat_id,
            session_id: self.session_id,
            locked_until: from_millis(self.locked_until)?,
            checkout_ref: self.checkout_ref,
            has_child_on_lap: self.has_child_on_lap,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PurchasedSeatRow {
    show_id: String,
    seat_id: String,
    purchase_id: String,
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: String,
    name: String,
    email: String,
}

const LOCK_COLUMNS: &str =
    "show_id, seat_id, session_id, locked_until, checkout_ref, has_child_on_lap";

fn millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {ms}")))
}

fn map_sqlx_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation,
        _ => StoreError::Backend(err.to_string()),
    }
}

fn collect_locks(rows: Vec<LockRow>) -> Result<Vec<SeatLock>, StoreError> {
    rows.into_iter().map(LockRow::into_lock).collect()
}

#[async_trait]
impl ReservationStore for SqliteReservationStore {
    async fn locks_for_seats(
        &self,
        show_id: &str,
        seat_ids: &[String],
    ) -> Result<Vec<SeatLock>, StoreError> {
        if seat_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; seat_ids.len()].join(", ");
        let sql = format!(
            "SELECT {LOCK_COLUMNS} FROM locked_seats WHERE show_id = ? AND seat_id IN ({placeholders})"
        );

        let mut query = sqlx::query_as::<_, LockRow>(&sql).bind(show_id);
        for seat_id in seat_ids {
            query = query.bind(seat_id);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_err)?;
        collect_locks(rows)
    }

    async fn locks_for_show(&self, show_id: &str) -> Result<Vec<SeatLock>, StoreError> {
        let sql = format!("SELECT {LOCK_COLUMNS} FROM locked_seats WHERE show_id = ?");
        let rows = sqlx::query_as::<_, LockRow>(&sql)
            .bind(show_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        collect_locks(rows)
    }

    async fn locks_for_session(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<SeatLock>, StoreError> {
        let sql = format!(
            "SELECT {LOCK_COLUMNS} FROM locked_seats WHERE session_id = ? AND locked_until > ?"
        );
        let rows = sqlx::query_as::<_, LockRow>(&sql)
            .bind(session_id)
            .bind(millis(now))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        collect_locks(rows)
    }

    async fn locks_for_checkout_ref(
        &self,
        checkout_ref: &str,
    ) -> Result<Vec<SeatLock>, StoreError> {
        let sql = format!("SELECT {LOCK_COLUMNS} FROM locked_seats WHERE checkout_ref = ?");
        let rows = sqlx::query_as::<_, LockRow>(&sql)
            .bind(checkout_ref)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        collect_locks(rows)
    }

    async fn purchased_seats_for_show(
        &self,
        show_id: &str,
    ) -> Result<Vec<PurchasedSeat>, StoreError> {
        let rows = sqlx::query_as::<_, PurchasedSeatRow>(
            "SELECT show_id, seat_id, purchase_id FROM purchased_seats WHERE show_id = ?",
        )
        .bind(show_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows
            .into_iter()
            .map(|row| PurchasedSeat {
                show_id: row.show_id,
                seat_id: row.seat_id,
                purchase_id: row.purchase_id,
            })
            .collect())
    }

    async fn purchase(&self, purchase_id: &str) -> Result<Option<Purchase>, StoreError> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            "SELECT id, name, email FROM purchases WHERE id = ?",
        )
        .bind(purchase_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(|row| Purchase {
            id: row.id,
            name: row.name,
            email: row.email,
        }))
    }

    async fn insert_locks(&self, locks: &[SeatLock]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        for lock in locks {
            sqlx::query(
                r#"
                INSERT INTO locked_seats (show_id, seat_id, session_id, locked_until, checkout_ref, has_child_on_lap)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&lock.show_id)
            .bind(&lock.seat_id)
            .bind(&lock.session_id)
            .bind(millis(lock.locked_until))
            .bind(&lock.checkout_ref)
            .bind(lock.has_child_on_lap)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn delete_lock_if_unchanged(&self, lock: &SeatLock) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM locked_seats
            WHERE show_id = ? AND seat_id = ? AND session_id = ? AND locked_until = ?
            "#,
        )
        .bind(&lock.show_id)
        .bind(&lock.seat_id)
        .bind(&lock.session_id)
        .bind(millis(lock.locked_until))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_lock_for_session(
        &self,
        session_id: &str,
        show_id: &str,
        seat_id: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM locked_seats WHERE session_id = ? AND show_id = ? AND seat_id = ?",
        )
        .bind(session_id)
        .bind(show_id)
        .bind(seat_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_child_on_lap(
        &self,
        session_id: &str,
        show_id: &str,
        seat_id: &str,
        has_child_on_lap: bool,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE locked_seats SET has_child_on_lap = ?
            WHERE session_id = ? AND show_id = ? AND seat_id = ?
            "#,
        )
        .bind(has_child_on_lap)
        .bind(session_id)
        .bind(show_id)
        .bind(seat_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn stamp_checkout(
        &self,
        session_id: &str,
        checkout_ref: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE locked_seats SET locked_until = ?, checkout_ref = ? WHERE session_id = ?",
        )
        .bind(millis(locked_until))
        .bind(checkout_ref)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn settle_checkout(
        &self,
        checkout_ref: &str,
        customer: &CustomerDetails,
    ) -> Result<SettlementOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let sql = format!("SELECT {LOCK_COLUMNS} FROM locked_seats WHERE checkout_ref = ?");
        let locks = sqlx::query_as::<_, LockRow>(&sql)
            .bind(checkout_ref)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        if locks.is_empty() {
            // Either a duplicate notification (locks already converted) or
            // a reference we never stamped.
            let existing =
                sqlx::query_as::<_, PurchaseRow>("SELECT id, name, email FROM purchases WHERE id = ?")
                    .bind(checkout_ref)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
            tx.rollback().await.map_err(map_sqlx_err)?;

            return Ok(if existing.is_some() {
                SettlementOutcome::AlreadySettled
            } else {
                SettlementOutcome::NoSeatsForRef
            });
        }

        let inserted = sqlx::query("INSERT INTO purchases (id, name, email) VALUES (?, ?, ?)")
            .bind(checkout_ref)
            .bind(&customer.name)
            .bind(&customer.email)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err);
        if let Err(err) = inserted {
            tx.rollback().await.map_err(map_sqlx_err)?;
            return match err {
                // A concurrent settlement of the same reference won.
                StoreError::UniqueViolation => Ok(SettlementOutcome::AlreadySettled),
                other => Err(other),
            };
        }

        let mut seats = Vec::with_capacity(locks.len());
        for lock in &locks {
            sqlx::query(
                "INSERT INTO purchased_seats (show_id, seat_id, purchase_id) VALUES (?, ?, ?)",
            )
            .bind(&lock.show_id)
            .bind(&lock.seat_id)
            .bind(checkout_ref)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

            seats.push(PurchasedSeat {
                show_id: lock.show_id.clone(),
                seat_id: lock.seat_id.clone(),
                purchase_id: checkout_ref.to_string(),
            });
        }

        sqlx::query("DELETE FROM locked_seats WHERE checkout_ref = ?")
            .bind(checkout_ref)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(SettlementOutcome::Settled { seats })
    }

    async fn apply_admin_batch(
        &self,
        purchase: &Purchase,
        ops: &[AdminOp],
        now: DateTime<Utc>,
    ) -> Result<AdminBatchOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let marks_purchased = ops
            .iter()
            .any(|op| matches!(op, AdminOp::MarkPurchased { .. }));
        if marks_purchased {
            sqlx::query("INSERT INTO purchases (id, name, email) VALUES (?, ?, ?)")
                .bind(&purchase.id)
                .bind(&purchase.name)
                .bind(&purchase.email)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
        }

        for op in ops {
            match op {
                AdminOp::MarkPurchased { show_id, seat_id } => {
                    // Stale lock rows are dead weight; clear them so only a
                    // genuinely active lock can contest the seat.
                    sqlx::query(
                        "DELETE FROM locked_seats WHERE show_id = ? AND seat_id = ? AND locked_until <= ?",
                    )
                    .bind(show_id)
                    .bind(seat_id)
                    .bind(millis(now))
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;

                    let active = sqlx::query(
                        "SELECT seat_id FROM locked_seats WHERE show_id = ? AND seat_id = ?",
                    )
                    .bind(show_id)
                    .bind(seat_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;

                    if active.is_some() {
                        tx.rollback().await.map_err(map_sqlx_err)?;
                        return Ok(AdminBatchOutcome::Contested {
                            seat_ids: vec![seat_id.clone()],
                        });
                    }

                    let inserted = sqlx::query(
                        "INSERT INTO purchased_seats (show_id, seat_id, purchase_id) VALUES (?, ?, ?)",
                    )
                    .bind(show_id)
                    .bind(seat_id)
                    .bind(&purchase.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err);

                    if let Err(err) = inserted {
                        tx.rollback().await.map_err(map_sqlx_err)?;
                        return match err {
                            StoreError::UniqueViolation => Ok(AdminBatchOutcome::Contested {
                                seat_ids: vec![seat_id.clone()],
                            }),
                            other => Err(other),
                        };
                    }
                }

                AdminOp::ReleaseLock { lock } => {
                    let result = sqlx::query(
                        r#"
                        DELETE FROM locked_seats
                        WHERE show_id = ? AND seat_id = ? AND session_id = ? AND locked_until = ?
                        "#,
                    )
                    .bind(&lock.show_id)
                    .bind(&lock.seat_id)
                    .bind(&lock.session_id)
                    .bind(millis(lock.locked_until))
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;

                    if result.rows_affected() == 0 {
                        tx.rollback().await.map_err(map_sqlx_err)?;
                        return Ok(AdminBatchOutcome::Contested {
                            seat_ids: vec![lock.seat_id.clone()],
                        });
                    }
                }

                AdminOp::ReleasePurchase {
                    show_id,
                    seat_id,
                    purchase_id,
                } => {
                    let result = sqlx::query(
                        r#"
                        DELETE FROM purchased_seats
                        WHERE show_id = ? AND seat_id = ? AND purchase_id = ?
                        "#,
                    )
                    .bind(show_id)
                    .bind(seat_id)
                    .bind(purchase_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;

                    if result.rows_affected() == 0 {
                        tx.rollback().await.map_err(map_sqlx_err)?;
                        return Ok(AdminBatchOutcome::Contested {
                            seat_ids: vec![seat_id.clone()],
                        });
                    }

                    // Garbage-collect the purchase once its last seat is
                    // released.
                    sqlx::query(
                        r#"
                        DELETE FROM purchases
                        WHERE id = ?
                          AND NOT EXISTS (SELECT 1 FROM purchased_seats WHERE purchase_id = ?)
                        "#,
                    )
                    .bind(purchase_id)
                    .bind(purchase_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
                }
            }
        }

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(AdminBatchOutcome::Applied)
    }
}
