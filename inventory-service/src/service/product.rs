//! Product use cases

use crate::entity::Product;
use crate::error::{Error, Result};
use crate::repository::{ProductFilter, Repository};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    repo: Repository,
}

impl ProductService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// List products matching the filter
    pub async fn find(&self, filter: &ProductFilter) -> Result<(Vec<Product>, i64)> {
        self.repo.product().find(filter).await
    }

    /// Fetch a single product
    pub async fn find_by_id(&self, id: i64) -> Result<Product> {
        self.repo.product().find_by_id(id).await
    }

    /// Create a product
    pub async fn create(&self, product: Product) -> Result<Product> {
        validate(&product)?;

        self.repo
            .atomic(move |tx| async move { tx.product().create(&product).await })
            .await
    }

    /// Update a product, replacing all mutable columns
    pub async fn update(&self, product: Product) -> Result<Product> {
        if product.base.id == 0 {
            return Err(Error::InvalidArgument(
                "product id must be non-zero".to_string(),
            ));
        }
        validate(&product)?;

        self.repo
            .atomic(move |tx| async move { tx.product().update(&product).await })
            .await
    }

    /// Remove a product by id
    pub async fn delete(&self, id: i64) -> Result<()> {
        if id == 0 {
            return Err(Error::InvalidArgument(
                "product id must be non-zero".to_string(),
            ));
        }

        self.repo
            .atomic(move |tx| async move { tx.product().delete(id).await })
            .await
    }
}

fn validate(product: &Product) -> Result<()> {
    if product.code.trim().is_empty() {
        return Err(Error::InvalidArgument("product code is required".to_string()));
    }
    if product.name.trim().is_empty() {
        return Err(Error::InvalidArgument("product name is required".to_string()));
    }
    if product.stock < 0 {
        return Err(Error::InvalidArgument(
            "product stock must not be negative".to_string(),
        ));
    }
    if product.price < 0.0 {
        return Err(Error::InvalidArgument(
            "product price must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str, name: &str, stock: i32, price: f64) -> Product {
        Product {
            code: code.to_string(),
            name: name.to_string(),
            stock,
            price,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_well_formed_product() {
        assert!(validate(&product("SKU1", "Widget", 10, 9.99)).is_ok());
    }

    #[test]
    fn rejects_blank_code_and_name() {
        assert!(validate(&product("", "Widget", 10, 1.0)).is_err());
        assert!(validate(&product("  ", "Widget", 10, 1.0)).is_err());
        assert!(validate(&product("SKU1", "", 10, 1.0)).is_err());
    }

    #[test]
    fn rejects_negative_stock_and_price() {
        assert!(validate(&product("SKU1", "Widget", -1, 1.0)).is_err());
        assert!(validate(&product("SKU1", "Widget", 1, -0.5)).is_err());
    }
}
