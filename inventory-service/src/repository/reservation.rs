//! Reservation data access
//!
//! Reservations have no delete operation: they are a ledger, and rows only
//! ever move through the status state machine.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use std::collections::HashMap;

use super::product::ProductRow;
use super::{Conn, Handle, ReservationFilter};
use crate::entity::{Base, Product, Reservation, ReservationStatus};
use crate::error::{Error, Result};

const TABLE: &str = "reservations";

const COLUMNS: &str =
    "id, product_id, order_id, quantity, status, created_at, updated_at, deleted_at";

/// Row as stored in the reservations table
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    product_id: i64,
    order_id: i64,
    quantity: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl ReservationRow {
    fn into_entity(self) -> Reservation {
        Reservation {
            base: Base {
                id: self.id,
                created_at: self.created_at,
                updated_at: self.updated_at,
                deleted_at: self.deleted_at,
            },
            product_id: self.product_id,
            order_id: self.order_id,
            quantity: self.quantity,
            status: ReservationStatus::parse(&self.status),
            product: None,
        }
    }
}

/// Reservation repository bound to a queryable handle
pub struct ReservationRepository {
    db: Handle,
}

impl ReservationRepository {
    pub(crate) fn new(db: Handle) -> Self {
        Self { db }
    }

    /// Find a live reservation by id, with its product eagerly loaded
    pub async fn find_by_id(&self, id: i64) -> Result<Reservation> {
        if id == 0 {
            return Err(Error::InvalidArgument(
                "reservation id must be non-zero".to_string(),
            ));
        }

        let mut conn = self.acquire().await?;
        let sql =
            format!("SELECT {COLUMNS} FROM reservations WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<ReservationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "find reservation by id"))?;

        let mut reservation = row
            .map(ReservationRow::into_entity)
            .ok_or_else(|| Error::NotFound(format!("reservation {id}")))?;

        let mut products = load_products(&mut conn, &[reservation.product_id]).await?;
        reservation.product = products.remove(&reservation.product_id);

        Ok(reservation)
    }

    /// Find live reservations matching the filter, with products eagerly loaded
    ///
    /// Returns the page of matches plus the total count of the unpaginated
    /// predicate. A zero total short-circuits without running the page query.
    pub async fn find(&self, filter: &ReservationFilter) -> Result<(Vec<Reservation>, i64)> {
        let mut conn = self.acquire().await?;

        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM reservations WHERE deleted_at IS NULL",
        );
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "count reservation"))?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM reservations WHERE deleted_at IS NULL"
        ));
        push_filters(&mut query, filter);
        query.push(" ORDER BY id DESC");
        if filter.per_page > 0 {
            query.push(" LIMIT ");
            query.push_bind(i64::from(filter.per_page));
            query.push(" OFFSET ");
            query.push_bind(filter.offset());
        }

        let rows: Vec<ReservationRow> = query
            .build_query_as()
            .fetch_all(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "find reservation"))?;

        let mut reservations: Vec<Reservation> =
            rows.into_iter().map(ReservationRow::into_entity).collect();

        let mut product_ids: Vec<i64> = reservations.iter().map(|r| r.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        let products = load_products(&mut conn, &product_ids).await?;
        for reservation in &mut reservations {
            reservation.product = products.get(&reservation.product_id).cloned();
        }

        Ok((reservations, total))
    }

    /// Insert a reservation and return the stored row
    pub async fn create(&self, reservation: &Reservation) -> Result<Reservation> {
        let mut conn = self.acquire().await?;
        let sql = format!(
            "INSERT INTO reservations (product_id, order_id, quantity, status) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row: ReservationRow = sqlx::query_as(&sql)
            .bind(reservation.product_id)
            .bind(reservation.order_id)
            .bind(reservation.quantity)
            .bind(reservation.status.as_str())
            .fetch_one(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "create reservation"))?;

        Ok(row.into_entity())
    }

    /// Bulk-update the status column for all matching ids in one statement
    pub async fn update_status(&self, ids: &[i64], status: ReservationStatus) -> Result<()> {
        if ids.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one reservation id is required".to_string(),
            ));
        }

        let mut conn = self.acquire().await?;
        sqlx::query(
            "UPDATE reservations SET status = $1, updated_at = now() \
             WHERE id = ANY($2) AND deleted_at IS NULL",
        )
        .bind(status.as_str())
        .bind(ids.to_vec())
        .execute(conn.as_exec())
        .await
        .map_err(|e| Error::db(e, TABLE, "update reservation status"))?;

        Ok(())
    }

    async fn acquire(&self) -> Result<Conn<'_>> {
        self.db
            .acquire()
            .await
            .map_err(|e| Error::db(e, TABLE, "acquire connection"))
    }
}

/// Batch-load products for the given ids on an already checked-out connection
///
/// Runs on the caller's connection so it stays inside the caller's
/// transaction and cannot deadlock against it.
async fn load_products(conn: &mut Conn<'_>, ids: &[i64]) -> Result<HashMap<i64, Product>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<ProductRow> = sqlx::query_as(
        "SELECT id, code, name, description, stock, price, created_at, updated_at, deleted_at \
         FROM products WHERE id = ANY($1) AND deleted_at IS NULL",
    )
    .bind(ids.to_vec())
    .fetch_all(conn.as_exec())
    .await
    .map_err(|e| Error::db(e, "products", "batch load products"))?;

    Ok(rows
        .into_iter()
        .map(|row| (row.id, row.into_entity()))
        .collect())
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ReservationFilter) {
    if !filter.ids.is_empty() {
        query.push(" AND id = ANY(");
        query.push_bind(filter.ids.clone());
        query.push(")");
    }

    if !filter.product_ids.is_empty() {
        query.push(" AND product_id = ANY(");
        query.push_bind(filter.product_ids.clone());
        query.push(")");
    }

    if !filter.order_ids.is_empty() {
        query.push(" AND order_id = ANY(");
        query.push_bind(filter.order_ids.clone());
        query.push(")");
    }

    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        query.push(" AND status = ANY(");
        query.push_bind(statuses);
        query.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(filter: &ReservationFilter) -> String {
        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 WHERE deleted_at IS NULL");
        push_filters(&mut query, filter);
        query.sql().to_string()
    }

    #[test]
    fn no_filters_adds_no_predicates() {
        let sql = sql_of(&ReservationFilter::default());
        assert_eq!(sql, "SELECT 1 WHERE deleted_at IS NULL");
    }

    #[test]
    fn all_filter_fields_become_predicates() {
        let filter = ReservationFilter {
            ids: vec![1],
            product_ids: vec![2],
            order_ids: vec![3],
            statuses: vec![ReservationStatus::Pending],
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(sql.contains("id = ANY("));
        assert!(sql.contains("product_id = ANY("));
        assert!(sql.contains("order_id = ANY("));
        assert!(sql.contains("status = ANY("));
    }

    #[test]
    fn row_status_parses_into_state_machine() {
        let row = ReservationRow {
            id: 1,
            product_id: 2,
            order_id: 3,
            quantity: 4,
            status: "CONFIRMED".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let reservation = row.into_entity();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert!(reservation.product.is_none());
    }
}
