// src/db/supplier_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::{is_foreign_key_violation, is_unique_violation, AppError},
    models::supplier::Supplier,
};

#[derive(Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM proveedor ORDER BY nombre ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(suppliers)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM proveedor WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(supplier)
    }

    pub async fn find_by_ruc<'e, E>(&self, executor: E, ruc: &str) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM proveedor WHERE ruc = ?1 LIMIT 1")
            .bind(ruc)
            .fetch_optional(executor)
            .await?;
        Ok(supplier)
    }

    /// Ignora conflito em qualquer índice único (ruc ou nombre).
    pub async fn insert_ignore<'e, E>(
        &self,
        executor: E,
        ruc: &str,
        name: &str,
        phone: Option<&str>,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO proveedor (ruc, nombre, telefono)
            VALUES (?1, ?2, ?3)
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(ruc)
        .bind(name)
        .bind(phone)
        .fetch_optional(executor)
        .await?;
        Ok(id)
    }

    pub async fn update_by_ruc<'e, E>(
        &self,
        executor: E,
        ruc: &str,
        name: &str,
        phone: Option<&str>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE proveedor SET nombre = ?1, telefono = ?2 WHERE ruc = ?3")
            .bind(name)
            .bind(phone)
            .bind(ruc)
            .execute(executor)
            .await
            .map_err(map_duplicate)?;
        Ok(result.rows_affected())
    }

    pub async fn rename<'e, E>(&self, executor: E, id: i64, new_name: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE proveedor SET nombre = ?1 WHERE id = ?2")
            .bind(new_name)
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_duplicate)?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM proveedor WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::SupplierInUse;
                }
                e.into()
            })?;
        Ok(result.rows_affected())
    }
}

fn map_duplicate(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        return AppError::SupplierAlreadyExists;
    }
    e.into()
}
