//! Postgres-backed catalog store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (foreign key violation) | `23503` | `Integrity` (`EntityNotFound` for category links on save) |
//! | Database (unique violation) | `23505` | `Integrity` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / network / other | N/A | `Unavailable` |

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{instrument, Span};

use dscommerce_core::{CategoryId, Page, PageRequest, ProductId, SortField};
use dscommerce_products::{
    Category, CategoryRepository, Product, ProductRef, ProductRepository, RepositoryError,
};

const SCHEMA: &str = include_str!("schema.sql");

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

/// Catalog store over a Postgres connection pool.
///
/// Multi-statement writes (product + category links, delete) run in one
/// transaction.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the catalog tables when they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn apply_schema(&self) -> Result<(), RepositoryError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("apply_schema", e))?;
        Ok(())
    }

    async fn load_categories(&self, product_id: ProductId) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name
            FROM tb_category c
            JOIN tb_product_category pc ON pc.category_id = c.id
            WHERE pc.product_id = $1
            ORDER BY c.id ASC
            "#,
        )
        .bind(product_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_categories", e))?;

        rows.iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("load_categories", e))
    }

    async fn write_category_links(
        tx: &mut Transaction<'_, Postgres>,
        product_id: ProductId,
        categories: &[Category],
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM tb_product_category WHERE product_id = $1")
            .bind(product_id.get())
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("clear_category_links", e))?;

        for category in categories {
            sqlx::query("INSERT INTO tb_product_category (product_id, category_id) VALUES ($1, $2)")
                .bind(product_id.get())
                .bind(category.id.get())
                .execute(&mut **tx)
                .await
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        RepositoryError::entity_not_found(format!("category {}", category.id))
                    } else {
                        map_sqlx_error("write_category_link", e)
                    }
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresCatalogStore {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, img_url
            FROM tb_product
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut product = product_from_row(&row).map_err(|e| map_sqlx_error("find_by_id", e))?;
        product.set_categories(self.load_categories(id).await?);
        Ok(Some(product))
    }

    /// Listing rows carry no categories.
    #[instrument(skip(self), fields(result_count = tracing::field::Empty), err)]
    async fn search_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        let span = Span::current();
        let pattern = contains_pattern(name);

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM tb_product WHERE UPPER(name) LIKE UPPER($1) ESCAPE '\'",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_by_name", e))?;

        let (column, direction) = match page.sort {
            Some(sort) => (sort_column(sort.field), sort.direction.as_sql()),
            None => ("id", "ASC"),
        };
        let sql = format!(
            r"SELECT id, name, description, price, img_url FROM tb_product
              WHERE UPPER(name) LIKE UPPER($1) ESCAPE '\'
              ORDER BY {column} {direction}, id ASC LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(i64::from(page.size))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("search_by_name", e))?;

        let content = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("search_by_name", e))?;

        span.record("result_count", content.len());
        Ok(Page::new(content, page, u64::try_from(total).unwrap_or(0)))
    }

    #[instrument(skip(self, product), fields(product_id = ?product.id()), err)]
    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let id = match product.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO tb_product (name, description, price, img_url)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price)
                .bind(&product.img_url)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_product", e))?;
                ProductId::new(id)
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE tb_product
                    SET name = $2, description = $3, price = $4, img_url = $5
                    WHERE id = $1
                    "#,
                )
                .bind(id.get())
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price)
                .bind(&product.img_url)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("update_product", e))?;

                if result.rows_affected() == 0 {
                    return Err(RepositoryError::entity_not_found(format!("product {id}")));
                }
                id
            }
        };

        Self::write_category_links(&mut tx, id, product.categories()).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::entity_not_found(format!("product {id}")))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn try_get_reference(&self, id: ProductId) -> Result<ProductRef, RepositoryError> {
        self.find_by_id(id)
            .await?
            .and_then(ProductRef::new)
            .ok_or_else(|| RepositoryError::entity_not_found(format!("product {id}")))
    }

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tb_product WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_id", e))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("DELETE FROM tb_product_category WHERE product_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_category_links", e))?;

        let result = sqlx::query("DELETE FROM tb_product WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::entity_not_found(format!("product {id}")));
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCatalogStore {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM tb_category ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all_categories", e))?;

        rows.iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("find_all_categories", e))
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "id",
        SortField::Name => "name",
        SortField::Price => "price",
    }
}

/// `LIKE` pattern matching `name` as a literal substring.
fn contains_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product::new(
        Some(ProductId::new(row.try_get("id")?)),
        row.try_get::<String, _>("name")?,
        row.try_get::<String, _>("description")?,
        row.try_get::<f64, _>("price")?,
        row.try_get::<String, _>("img_url")?,
    ))
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category::new(
        CategoryId::new(row.try_get("id")?),
        row.try_get::<String, _>("name")?,
    ))
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
        }
        _ => false,
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some(FOREIGN_KEY_VIOLATION) | Some(UNIQUE_VIOLATION) => RepositoryError::Integrity(msg),
                _ => RepositoryError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::unavailable(format!("connection pool closed in {}", operation))
        }
        _ => RepositoryError::unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_columns_are_whitelisted() {
        assert_eq!(sort_column(SortField::Id), "id");
        assert_eq!(sort_column(SortField::Name), "name");
        assert_eq!(sort_column(SortField::Price), "price");
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(" pc "), "%pc%");
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern("100%_off"), r"%100\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn pool_closed_maps_to_unavailable() {
        let err = map_sqlx_error("find_by_id", sqlx::Error::PoolClosed);
        assert_eq!(
            err,
            RepositoryError::unavailable("connection pool closed in find_by_id")
        );
    }

    #[test]
    fn schema_creates_catalog_tables() {
        for table in ["tb_category", "tb_product", "tb_product_category"] {
            assert!(SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")));
        }
    }
}
