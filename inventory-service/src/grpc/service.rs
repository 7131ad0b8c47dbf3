//! Inventory gRPC service implementation

use tonic::{Request, Response, Status};

use super::pb;
use super::status_mapper::{from_wire, from_wire_code, to_wire};
use crate::entity::{Base, Product, Reservation, ReservationStatus};
use crate::repository::{ProductFilter, ReservationFilter};
use crate::service::Service;

/// gRPC facade over the service layer
pub struct InventoryGrpc {
    service: Service,
}

impl InventoryGrpc {
    pub fn new(service: Service) -> Self {
        Self { service }
    }
}

fn product_to_pb(product: Product) -> pb::Product {
    pb::Product {
        id: product.base.id,
        code: product.code,
        name: product.name,
        description: product.description,
        stock: product.stock,
        price: product.price,
        created_at: product.base.created_at.to_rfc3339(),
        updated_at: product.base.updated_at.to_rfc3339(),
    }
}

fn reservation_to_pb(reservation: Reservation) -> pb::Reservation {
    pb::Reservation {
        id: reservation.base.id,
        product_id: reservation.product_id,
        order_id: reservation.order_id,
        quantity: reservation.quantity,
        status: to_wire(reservation.status) as i32,
        product: reservation.product.map(product_to_pb),
        created_at: reservation.base.created_at.to_rfc3339(),
        updated_at: reservation.base.updated_at.to_rfc3339(),
    }
}

#[tonic::async_trait]
impl pb::inventory_service_server::InventoryService for InventoryGrpc {
    async fn list_products(
        &self,
        request: Request<pb::ListProductsRequest>,
    ) -> Result<Response<pb::ListProductsResponse>, Status> {
        let req = request.into_inner();
        let filter = ProductFilter {
            ids: req.ids,
            codes: req.codes,
            names: req.names,
            search: Some(req.search).filter(|s| !s.is_empty()),
            page: req.page,
            per_page: req.per_page,
        };

        let (products, total) = self.service.product().find(&filter).await?;

        Ok(Response::new(pb::ListProductsResponse {
            products: products.into_iter().map(product_to_pb).collect(),
            total,
        }))
    }

    async fn get_product(
        &self,
        request: Request<pb::GetProductRequest>,
    ) -> Result<Response<pb::Product>, Status> {
        let req = request.into_inner();
        let product = self.service.product().find_by_id(req.id).await?;

        Ok(Response::new(product_to_pb(product)))
    }

    async fn create_product(
        &self,
        request: Request<pb::CreateProductRequest>,
    ) -> Result<Response<pb::Product>, Status> {
        let req = request.into_inner();
        let product = Product {
            base: Base::default(),
            code: req.code,
            name: req.name,
            description: req.description,
            stock: req.stock,
            price: req.price,
        };

        let created = self.service.product().create(product).await?;

        Ok(Response::new(product_to_pb(created)))
    }

    async fn update_product(
        &self,
        request: Request<pb::UpdateProductRequest>,
    ) -> Result<Response<pb::Product>, Status> {
        let req = request.into_inner();
        let product = Product {
            base: Base {
                id: req.id,
                ..Default::default()
            },
            code: req.code,
            name: req.name,
            description: req.description,
            stock: req.stock,
            price: req.price,
        };

        let updated = self.service.product().update(product).await?;

        Ok(Response::new(product_to_pb(updated)))
    }

    async fn delete_product(
        &self,
        request: Request<pb::DeleteProductRequest>,
    ) -> Result<Response<pb::DeleteProductResponse>, Status> {
        let req = request.into_inner();
        self.service.product().delete(req.id).await?;

        Ok(Response::new(pb::DeleteProductResponse {
            message: "Product deleted successfully".to_string(),
        }))
    }

    async fn create_reservation(
        &self,
        request: Request<pb::CreateReservationRequest>,
    ) -> Result<Response<pb::Reservation>, Status> {
        let req = request.into_inner();
        let reservation = Reservation {
            product_id: req.product_id,
            order_id: req.order_id,
            quantity: req.quantity,
            ..Default::default()
        };

        let created = self.service.reservation().create(reservation).await?;

        Ok(Response::new(reservation_to_pb(created)))
    }

    async fn list_reservations(
        &self,
        request: Request<pb::ListReservationsRequest>,
    ) -> Result<Response<pb::ListReservationsResponse>, Status> {
        let req = request.into_inner();
        let filter = ReservationFilter {
            ids: req.ids,
            product_ids: req.product_ids,
            order_ids: req.order_ids,
            statuses: req.statuses.iter().map(|&code| from_wire_code(code)).collect(),
            page: req.page,
            per_page: req.per_page,
        };

        let (reservations, total) = self.service.reservation().find(&filter).await?;

        Ok(Response::new(pb::ListReservationsResponse {
            reservations: reservations.into_iter().map(reservation_to_pb).collect(),
            total,
        }))
    }

    async fn get_reservation(
        &self,
        request: Request<pb::GetReservationRequest>,
    ) -> Result<Response<pb::Reservation>, Status> {
        let req = request.into_inner();
        let reservation = self.service.reservation().find_by_id(req.id).await?;

        Ok(Response::new(reservation_to_pb(reservation)))
    }

    async fn update_reservation_status(
        &self,
        request: Request<pb::UpdateReservationStatusRequest>,
    ) -> Result<Response<pb::UpdateReservationStatusResponse>, Status> {
        let req = request.into_inner();

        let target = from_wire(req.status());
        if target == ReservationStatus::Unspecified {
            return Err(Status::invalid_argument("status must be specified"));
        }

        self.service
            .reservation()
            .update_status(req.ids, target)
            .await?;

        Ok(Response::new(pb::UpdateReservationStatusResponse {
            message: "Reservation status updated successfully".to_string(),
        }))
    }
}
