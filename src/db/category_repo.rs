// src/db/category_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::{is_unique_violation, AppError},
    models::catalog::Category,
};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categoria ORDER BY nombre ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn find_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categoria WHERE nombre = ?1 LIMIT 1")
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    /// Retorna o id novo, ou `None` se o nome já existia.
    pub async fn insert_ignore<'e, E>(&self, executor: E, name: &str) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO categoria (nombre) VALUES (?1) ON CONFLICT (nombre) DO NOTHING RETURNING id",
        )
        .bind(name)
        .fetch_optional(executor)
        .await?;
        Ok(id)
    }

    pub async fn rename<'e, E>(&self, executor: E, id: i64, new_name: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE categoria SET nombre = ?1 WHERE id = ?2")
            .bind(new_name)
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return AppError::CategoryNameAlreadyExists(new_name.to_string());
                }
                e.into()
            })?;
        Ok(result.rows_affected())
    }

    // Produtos da categoria ficam com category_id = NULL (ON DELETE SET NULL)
    pub async fn delete_by_id<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM categoria WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
