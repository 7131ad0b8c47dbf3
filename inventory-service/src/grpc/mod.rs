//! gRPC adapter (tonic)

mod service;
mod status_mapper;

pub use service::InventoryGrpc;
pub use status_mapper::{from_wire, from_wire_code, to_wire};

/// Generated protobuf types
pub mod pb {
    tonic::include_proto!("inventory.v1");
}

use pb::inventory_service_server::InventoryServiceServer;

use crate::service::Service;

/// Build the tonic service for the inventory API
pub fn server(service: Service) -> InventoryServiceServer<InventoryGrpc> {
    InventoryServiceServer::new(InventoryGrpc::new(service))
}
