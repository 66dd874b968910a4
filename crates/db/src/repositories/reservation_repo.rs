//! Repository for the `reservations` table.
//!
//! Owns the transactional state machine: `request` revives or inserts the
//! pair row under a row lock, and `accept` couples the status flip with the
//! slot decrement in a single transaction so concurrent acceptances of a
//! listing's last slot cannot both succeed.

use sqlx::PgPool;
use stayhub_core::reservation::{STATUS_DECLINED, STATUS_PENDING};
use stayhub_core::types::DbId;

use crate::models::reservation::{AcceptOutcome, DeclineOutcome, RequestOutcome, Reservation};

/// Column list for `reservations` queries.
const COLUMNS: &str = "id, listing_id, requester_id, owner_id, status, accepted_at, \
    created_at, updated_at";

/// Provides the reservation state machine and lookups.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Find a reservation by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the (at most one) reservation for a (listing, requester) pair.
    pub async fn find_by_pair(
        pool: &PgPool,
        listing_id: DbId,
        requester_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE listing_id = $1 AND requester_id = $2"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(listing_id)
            .bind(requester_id)
            .fetch_optional(pool)
            .await
    }

    /// List reservations made by a user, newest first.
    pub async fn list_for_requester(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE requester_id = $1 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(requester_id)
            .fetch_all(pool)
            .await
    }

    /// List reservations targeting a user's listings, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE owner_id = $1 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Request a reservation for a (listing, requester) pair.
    ///
    /// Inside a transaction: locks the pair row if one exists, then either
    /// reports it as already live, revives a DECLINED row back to PENDING
    /// (same id), or inserts a fresh PENDING row. Two racing first requests
    /// are serialized by `uq_reservations_pair`; the loser surfaces the
    /// unique violation to the caller.
    pub async fn request(
        pool: &PgPool,
        listing_id: DbId,
        requester_id: DbId,
        owner_id: DbId,
    ) -> Result<RequestOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE listing_id = $1 AND requester_id = $2 \
             FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, Reservation>(&select_query)
            .bind(listing_id)
            .bind(requester_id)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match existing {
            Some(r) if r.status == STATUS_DECLINED => {
                let revive_query = format!(
                    "UPDATE reservations \
                     SET status = $2, updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING {COLUMNS}"
                );
                let revived = sqlx::query_as::<_, Reservation>(&revive_query)
                    .bind(r.id)
                    .bind(STATUS_PENDING)
                    .fetch_one(&mut *tx)
                    .await?;
                RequestOutcome::Revived(revived)
            }
            Some(_) => RequestOutcome::AlreadyLive,
            None => {
                let insert_query = format!(
                    "INSERT INTO reservations (listing_id, requester_id, owner_id) \
                     VALUES ($1, $2, $3) \
                     RETURNING {COLUMNS}"
                );
                let created = sqlx::query_as::<_, Reservation>(&insert_query)
                    .bind(listing_id)
                    .bind(requester_id)
                    .bind(owner_id)
                    .fetch_one(&mut *tx)
                    .await?;
                RequestOutcome::Created(created)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Accept a pending reservation, consuming one listing slot.
    ///
    /// Single transaction: the reservation row is locked first, the
    /// preconditions are re-checked under the lock, and the slot decrement
    /// uses a conditional update (`WHERE slots_available > 0`) so the store
    /// itself refuses to oversell. Zero rows affected means another
    /// acceptance won the race; the transaction is rolled back untouched.
    pub async fn accept(
        pool: &PgPool,
        reservation_id: DbId,
        caller_id: DbId,
    ) -> Result<AcceptOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_query =
            format!("SELECT {COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE");
        let reservation = sqlx::query_as::<_, Reservation>(&select_query)
            .bind(reservation_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(reservation) = reservation else {
            return Ok(AcceptOutcome::NotFound);
        };
        if reservation.owner_id != caller_id {
            return Ok(AcceptOutcome::NotOwner);
        }
        if reservation.status != STATUS_PENDING {
            return Ok(AcceptOutcome::NotPending);
        }

        // Conditional decrement: all SET expressions see the pre-update
        // value, so is_available reflects the decremented count.
        let decremented = sqlx::query(
            "UPDATE listings \
             SET slots_available = slots_available - 1, \
                 is_available = (slots_available - 1) > 0, \
                 updated_at = NOW() \
             WHERE id = $1 AND slots_available > 0",
        )
        .bind(reservation.listing_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // Dropping the transaction rolls back the row lock.
            return Ok(AcceptOutcome::NoCapacity);
        }

        let accept_query = format!(
            "UPDATE reservations \
             SET status = 'accepted', accepted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let accepted = sqlx::query_as::<_, Reservation>(&accept_query)
            .bind(reservation.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AcceptOutcome::Accepted(accepted))
    }

    /// Decline a pending reservation. No slot-count change.
    pub async fn decline(
        pool: &PgPool,
        reservation_id: DbId,
        caller_id: DbId,
    ) -> Result<DeclineOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_query =
            format!("SELECT {COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE");
        let reservation = sqlx::query_as::<_, Reservation>(&select_query)
            .bind(reservation_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(reservation) = reservation else {
            return Ok(DeclineOutcome::NotFound);
        };
        if reservation.owner_id != caller_id {
            return Ok(DeclineOutcome::NotOwner);
        }
        if reservation.status != STATUS_PENDING {
            return Ok(DeclineOutcome::NotPending);
        }

        let decline_query = format!(
            "UPDATE reservations \
             SET status = 'declined', updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let declined = sqlx::query_as::<_, Reservation>(&decline_query)
            .bind(reservation.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(DeclineOutcome::Declined(declined))
    }
}
