//! Product REST handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::response::{Envelope, PageEnvelope, Pagination};
use super::AppState;
use crate::entity::{Base, Product};
use crate::error::Result;
use crate::repository::ProductFilter;

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stock: i32,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub stock: i32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.base.id,
            code: product.code,
            name: product.name,
            description: product.description,
            stock: product.stock,
            price: product.price,
            created_at: product.base.created_at,
            updated_at: product.base.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub search: Option<String>,
}

/// `POST /api/v1/products`
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Envelope<ProductResponse>>)> {
    let product = Product {
        base: Base::default(),
        code: payload.code,
        name: payload.name,
        description: payload.description,
        stock: payload.stock,
        price: payload.price,
    };

    let created = state.service.product().create(product).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(
            "Product created successfully",
            ProductResponse::from(created),
        )),
    ))
}

/// `GET /api/v1/products`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<PageEnvelope<Vec<ProductResponse>>>> {
    let filter = ProductFilter {
        search: query.search.clone(),
        page: query.page,
        per_page: query.per_page,
        ..Default::default()
    };

    let (products, total) = state.service.product().find(&filter).await?;
    let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

    Ok(Json(PageEnvelope::new(
        "Products retrieved successfully",
        data,
        Pagination::new(query.page, query.per_page, total),
    )))
}

/// `GET /api/v1/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<ProductResponse>>> {
    let product = state.service.product().find_by_id(id).await?;

    Ok(Json(Envelope::new(
        "Product retrieved successfully",
        ProductResponse::from(product),
    )))
}

/// `PUT /api/v1/products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Envelope<ProductResponse>>> {
    let product = Product {
        base: Base {
            id,
            ..Default::default()
        },
        code: payload.code,
        name: payload.name,
        description: payload.description,
        stock: payload.stock,
        price: payload.price,
    };

    let updated = state.service.product().update(product).await?;

    Ok(Json(Envelope::new(
        "Product updated successfully",
        ProductResponse::from(updated),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_response_flattens_base_fields() {
        let product = Product {
            base: Base {
                id: 7,
                ..Default::default()
            },
            code: "SKU1".to_string(),
            name: "Widget".to_string(),
            description: None,
            stock: 10,
            price: 9.99,
        };

        let response = ProductResponse::from(product);
        assert_eq!(response.id, 7);
        assert_eq!(response.code, "SKU1");
        assert_eq!(response.stock, 10);
    }

    #[test]
    fn payload_defaults_optional_fields() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"code": "SKU1", "name": "Widget", "stock": 3}"#).unwrap();
        assert_eq!(payload.description, None);
        assert_eq!(payload.price, 0.0);
    }

    #[test]
    fn list_query_defaults_to_unbounded() {
        let query: ListProductsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.per_page, 0);
        assert!(query.search.is_none());
    }
}
