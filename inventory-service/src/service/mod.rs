//! Domain services
//!
//! Each use case maps to exactly one repository call or one atomic block.
//! Plain reads pass straight through; every write goes through
//! [`Repository::atomic`](crate::repository::Repository::atomic) so that
//! multi-row extensions slot in without changing call signatures.

mod product;
mod reservation;

pub use product::ProductService;
pub use reservation::ReservationService;

use crate::repository::Repository;

/// Service bundle handed to the transport adapters
#[derive(Clone)]
pub struct Service {
    product: ProductService,
    reservation: ReservationService,
}

impl Service {
    pub fn new(repo: Repository) -> Self {
        Self {
            product: ProductService::new(repo.clone()),
            reservation: ReservationService::new(repo),
        }
    }

    pub fn product(&self) -> &ProductService {
        &self.product
    }

    pub fn reservation(&self) -> &ReservationService {
        &self.reservation
    }
}
