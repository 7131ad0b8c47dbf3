//! Inventory management backend.
//!
//! Product and reservation CRUD/listing over REST (axum) and gRPC (tonic),
//! backed by PostgreSQL through a transactional repository bundle: the same
//! repository interface works against the live pool or against an open
//! serializable transaction handed out by [`repository::Repository::atomic`].

pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod grpc;
pub mod observability;
pub mod repository;
pub mod rest;
pub mod service;

pub use error::{Error, Result};
