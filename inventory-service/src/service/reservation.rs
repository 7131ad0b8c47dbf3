//! Reservation use cases
//!
//! Status transitions are enforced here, at the service boundary, before any
//! write reaches the store.

use std::collections::HashSet;

use crate::entity::{Reservation, ReservationStatus};
use crate::error::{Error, Result};
use crate::repository::{Repository, ReservationFilter};

/// Reservation service
#[derive(Clone)]
pub struct ReservationService {
    repo: Repository,
}

impl ReservationService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// List reservations matching the filter
    pub async fn find(&self, filter: &ReservationFilter) -> Result<(Vec<Reservation>, i64)> {
        self.repo.reservation().find(filter).await
    }

    /// Fetch a single reservation
    pub async fn find_by_id(&self, id: i64) -> Result<Reservation> {
        self.repo.reservation().find_by_id(id).await
    }

    /// Create a reservation in the `Pending` state
    ///
    /// The product is loaded inside the transaction so the stock check and
    /// the insert see the same snapshot.
    pub async fn create(&self, mut reservation: Reservation) -> Result<Reservation> {
        if reservation.product_id == 0 {
            return Err(Error::InvalidArgument("product id is required".to_string()));
        }
        if reservation.order_id == 0 {
            return Err(Error::InvalidArgument("order id is required".to_string()));
        }
        if reservation.quantity <= 0 {
            return Err(Error::InvalidArgument(
                "reservation quantity must be positive".to_string(),
            ));
        }

        reservation.status = ReservationStatus::Pending;

        self.repo
            .atomic(move |tx| async move {
                let product = tx.product().find_by_id(reservation.product_id).await?;
                if reservation.quantity > product.stock {
                    return Err(Error::InvalidArgument(format!(
                        "quantity {} exceeds available stock {} for product {}",
                        reservation.quantity, product.stock, product.base.id
                    )));
                }

                tx.reservation().create(&reservation).await
            })
            .await
    }

    /// Transition a batch of reservations to `target` in one statement
    ///
    /// Every reservation must exist and every transition must be allowed by
    /// the state machine, otherwise nothing is written.
    pub async fn update_status(&self, ids: Vec<i64>, target: ReservationStatus) -> Result<()> {
        if ids.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one reservation id is required".to_string(),
            ));
        }

        let mut ids = ids;
        ids.sort_unstable();
        ids.dedup();

        self.repo
            .atomic(move |tx| async move {
                let filter = ReservationFilter {
                    ids: ids.clone(),
                    ..Default::default()
                };
                let (reservations, total) = tx.reservation().find(&filter).await?;

                if total as usize != ids.len() {
                    let found: HashSet<i64> = reservations.iter().map(|r| r.base.id).collect();
                    let missing: Vec<String> = ids
                        .iter()
                        .filter(|id| !found.contains(id))
                        .map(|id| id.to_string())
                        .collect();
                    return Err(Error::NotFound(format!(
                        "reservations {}",
                        missing.join(", ")
                    )));
                }

                for reservation in &reservations {
                    reservation.status.ensure_transition(target)?;
                }

                tx.reservation().update_status(&ids, target).await
            })
            .await
    }
}
