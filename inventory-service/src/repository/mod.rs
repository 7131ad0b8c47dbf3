//! Data access layer
//!
//! [`Repository`] is the root bundle: it owns a [`Handle`] that is either the
//! live connection pool or an open transaction, and hands out per-entity
//! repositories bound to that same handle. Every query therefore runs
//! unchanged in both modes; which one you get is decided by how the
//! `Repository` was constructed, not by the calling code.
//!
//! Multi-step writes go through [`Repository::atomic`], which opens a
//! serializable transaction, passes a transaction-scoped `Repository` to the
//! callback, and commits or rolls back depending on the callback's result.

mod filter;
mod product;
mod reservation;

pub use filter::{ProductFilter, ReservationFilter};
pub use product::ProductRepository;
pub use reservation::ReservationRepository;

use sqlx::{pool::PoolConnection, PgConnection, PgPool, Postgres, Transaction};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};

/// The queryable handle a repository is bound to
///
/// A transaction handle is shared between the per-entity repositories of one
/// atomic block; the mutex serializes their access to the single connection.
#[derive(Clone)]
pub(crate) enum Handle {
    Pool(PgPool),
    Tx(Arc<Mutex<Transaction<'static, Postgres>>>),
}

/// A checked-out connection, from the pool or the transaction
pub(crate) enum Conn<'a> {
    Pooled(PoolConnection<Postgres>),
    Tx(MutexGuard<'a, Transaction<'static, Postgres>>),
}

impl Conn<'_> {
    pub(crate) fn as_exec(&mut self) -> &mut PgConnection {
        match self {
            Conn::Pooled(conn) => &mut **conn,
            Conn::Tx(guard) => &mut ***guard,
        }
    }
}

impl Handle {
    pub(crate) async fn acquire(&self) -> sqlx::Result<Conn<'_>> {
        match self {
            Handle::Pool(pool) => Ok(Conn::Pooled(pool.acquire().await?)),
            Handle::Tx(tx) => Ok(Conn::Tx(tx.lock().await)),
        }
    }
}

/// Root repository bundle
#[derive(Clone)]
pub struct Repository {
    handle: Handle,
}

impl Repository {
    /// Create a repository bound to the live connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            handle: Handle::Pool(pool),
        }
    }

    fn transaction_scoped(tx: Arc<Mutex<Transaction<'static, Postgres>>>) -> Self {
        Self {
            handle: Handle::Tx(tx),
        }
    }

    /// Product data access bound to this repository's handle
    pub fn product(&self) -> ProductRepository {
        ProductRepository::new(self.handle.clone())
    }

    /// Reservation data access bound to this repository's handle
    pub fn reservation(&self) -> ReservationRepository {
        ReservationRepository::new(self.handle.clone())
    }

    /// Run a unit of work inside a single serializable transaction
    ///
    /// The callback receives a transaction-scoped `Repository`. If it returns
    /// `Ok` the transaction commits, and a commit failure becomes the
    /// operation's error. If it returns `Err` the transaction rolls back and
    /// the callback's error is propagated unchanged.
    ///
    /// Calling `atomic` on an already transaction-scoped repository does not
    /// open a second transaction; the callback runs on the same handle.
    pub async fn atomic<F, Fut, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce(Repository) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let pool = match &self.handle {
            Handle::Tx(_) => return work(self.clone()).await,
            Handle::Pool(pool) => pool.clone(),
        };

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| Error::db(e, "transaction", "begin"))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::db(e, "transaction", "set isolation level"))?;

        let shared = Arc::new(Mutex::new(tx));
        let outcome = work(Repository::transaction_scoped(Arc::clone(&shared))).await;

        let tx = match Arc::try_unwrap(shared) {
            Ok(mutex) => mutex.into_inner(),
            // The callback let its transaction-scoped repository outlive the
            // block; committing behind its back would be unsound.
            Err(_) => {
                return Err(outcome.err().unwrap_or_else(|| {
                    Error::Internal("transaction handle escaped the atomic block".to_string())
                }))
            }
        };

        match outcome {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| Error::db(e, "transaction", "commit"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed after aborted atomic block");
                }
                Err(err)
            }
        }
    }

    /// Verify the store is reachable
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self
            .handle
            .acquire()
            .await
            .map_err(|e| Error::db(e, "transaction", "acquire connection"))?;
        sqlx::query("SELECT 1")
            .execute(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, "transaction", "ping"))?;
        Ok(())
    }

    /// Close the underlying pool, waiting for checked-out connections
    pub async fn close(&self) {
        if let Handle::Pool(pool) = &self.handle {
            pool.close().await;
        }
    }
}
