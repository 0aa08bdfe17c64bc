//! # Category Repository
//!
//! Categories group products. A category cannot be deleted while any
//! product still references it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use inkline_core::validation::{normalize_code, validate_name, validate_search_query};
use inkline_core::{Category, CoreError, NewCategory, ValidationError};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Creates a category. Names are unique (case-sensitive).
    pub async fn create(&self, input: NewCategory) -> DbResult<Category> {
        let name = validate_name(&input.name)?;
        let code = normalize_code(input.code.as_deref())?;

        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1)")
            .bind(&name)
            .fetch_one(&self.pool)
            .await?;
        if taken {
            return Err(ValidationError::duplicate("category name", name).into());
        }

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            code,
            created_at: Utc::now(),
        };

        debug!(id = %category.id, name = %category.name, "Creating category");

        sqlx::query("INSERT INTO categories (id, name, code, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.code)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, code, created_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Category>> {
        let pattern = validate_search_query(search)?.map(|q| format!("%{q}%"));

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, code, created_at FROM categories
            WHERE (?1 IS NULL OR name LIKE ?1 OR code LIKE ?1)
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Err(CoreError::InUse)` - Products still reference it
    /// * `Err(DbError::NotFound)` - No such category
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let dependents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if dependents > 0 {
            return Err(CoreError::InUse {
                entity: "category".to_string(),
                dependents,
            }
            .into());
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        debug!(id = %id, "Deleted category");
        Ok(())
    }
}
