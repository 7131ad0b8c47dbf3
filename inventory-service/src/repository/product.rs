//! Product data access

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use super::{Conn, Handle, ProductFilter};
use crate::entity::{Base, Product};
use crate::error::{Error, Result};

const TABLE: &str = "products";

const COLUMNS: &str = "id, code, name, description, stock, price, created_at, updated_at, deleted_at";

/// Row as stored in the products table
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub(crate) id: i64,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) stock: i32,
    pub(crate) price: f64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) deleted_at: Option<DateTime<Utc>>,
}

impl ProductRow {
    pub(crate) fn into_entity(self) -> Product {
        Product {
            base: Base {
                id: self.id,
                created_at: self.created_at,
                updated_at: self.updated_at,
                deleted_at: self.deleted_at,
            },
            code: self.code,
            name: self.name,
            description: self.description,
            stock: self.stock,
            price: self.price,
        }
    }
}

/// Product repository bound to a queryable handle
pub struct ProductRepository {
    db: Handle,
}

impl ProductRepository {
    pub(crate) fn new(db: Handle) -> Self {
        Self { db }
    }

    /// Find a live product by id
    pub async fn find_by_id(&self, id: i64) -> Result<Product> {
        if id == 0 {
            return Err(Error::InvalidArgument("product id must be non-zero".to_string()));
        }

        let mut conn = self.acquire().await?;
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "find product by id"))?;

        row.map(ProductRow::into_entity)
            .ok_or_else(|| Error::NotFound(format!("product {id}")))
    }

    /// Find live products matching the filter
    ///
    /// Returns the page of matches plus the total count of the unpaginated
    /// predicate. A zero total short-circuits without running the page query.
    pub async fn find(&self, filter: &ProductFilter) -> Result<(Vec<Product>, i64)> {
        let mut conn = self.acquire().await?;

        let mut count_query =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "count product"))?;

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM products WHERE deleted_at IS NULL"
        ));
        push_filters(&mut query, filter);
        query.push(" ORDER BY id DESC");
        if filter.per_page > 0 {
            query.push(" LIMIT ");
            query.push_bind(i64::from(filter.per_page));
            query.push(" OFFSET ");
            query.push_bind(filter.offset());
        }

        let rows: Vec<ProductRow> = query
            .build_query_as()
            .fetch_all(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "find product"))?;

        Ok((rows.into_iter().map(ProductRow::into_entity).collect(), total))
    }

    /// Insert a product and return the stored row
    pub async fn create(&self, product: &Product) -> Result<Product> {
        let mut conn = self.acquire().await?;
        let sql = format!(
            "INSERT INTO products (code, name, description, stock, price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&product.code)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.stock)
            .bind(product.price)
            .fetch_one(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "create product"))?;

        Ok(row.into_entity())
    }

    /// Update all mutable columns of a product, keyed by id
    pub async fn update(&self, product: &Product) -> Result<Product> {
        if product.base.id == 0 {
            return Err(Error::InvalidArgument("product id must be non-zero".to_string()));
        }

        let mut conn = self.acquire().await?;
        let sql = format!(
            "UPDATE products SET code = $1, name = $2, description = $3, stock = $4, \
             price = $5, updated_at = now() \
             WHERE id = $6 AND deleted_at IS NULL RETURNING {COLUMNS}"
        );
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(&product.code)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.stock)
            .bind(product.price)
            .bind(product.base.id)
            .fetch_optional(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "update product"))?;

        row.map(ProductRow::into_entity)
            .ok_or_else(|| Error::NotFound(format!("product {}", product.base.id)))
    }

    /// Remove a product by primary key
    pub async fn delete(&self, id: i64) -> Result<()> {
        if id == 0 {
            return Err(Error::InvalidArgument("product id must be non-zero".to_string()));
        }

        let mut conn = self.acquire().await?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(conn.as_exec())
            .await
            .map_err(|e| Error::db(e, TABLE, "delete product"))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("product {id}")));
        }

        Ok(())
    }

    async fn acquire(&self) -> Result<Conn<'_>> {
        self.db
            .acquire()
            .await
            .map_err(|e| Error::db(e, TABLE, "acquire connection"))
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if !filter.ids.is_empty() {
        query.push(" AND id = ANY(");
        query.push_bind(filter.ids.clone());
        query.push(")");
    }

    if !filter.codes.is_empty() {
        query.push(" AND code = ANY(");
        query.push_bind(filter.codes.clone());
        query.push(")");
    }

    if !filter.names.is_empty() {
        query.push(" AND (");
        for (i, name) in filter.names.iter().enumerate() {
            if i > 0 {
                query.push(" OR ");
            }
            query.push("name ILIKE ");
            query.push_bind(format!("%{name}%"));
        }
        query.push(")");
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        query.push(" AND (name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR code ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(filter: &ProductFilter) -> String {
        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 WHERE deleted_at IS NULL");
        push_filters(&mut query, filter);
        query.sql().to_string()
    }

    #[test]
    fn no_filters_adds_no_predicates() {
        let sql = sql_of(&ProductFilter::default());
        assert_eq!(sql, "SELECT 1 WHERE deleted_at IS NULL");
    }

    #[test]
    fn id_and_code_filters_add_any_predicates() {
        let filter = ProductFilter {
            ids: vec![1, 2],
            codes: vec!["SKU1".to_string()],
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(sql.contains("id = ANY("));
        assert!(sql.contains("code = ANY("));
    }

    #[test]
    fn search_matches_name_and_code() {
        let filter = ProductFilter {
            search: Some("widget".to_string()),
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(sql.contains("name ILIKE"));
        assert!(sql.contains("OR code ILIKE"));
    }

    #[test]
    fn empty_search_is_ignored() {
        let filter = ProductFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn names_are_grouped_as_alternatives() {
        let filter = ProductFilter {
            names: vec!["widget".to_string(), "gadget".to_string()],
            ..Default::default()
        };
        let sql = sql_of(&filter);
        assert!(sql.contains("(name ILIKE "));
        assert!(sql.contains(" OR name ILIKE "));
    }
}
