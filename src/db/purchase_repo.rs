// src/db/purchase_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::{error::AppError, money::Money},
    models::purchases::{Purchase, PurchaseItem},
};

#[derive(Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_purchase<'e, E>(
        &self,
        executor: E,
        supplier_id: i64,
        created_at: DateTime<Utc>,
        total: Money,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO compra (proveedor_id, fecha, total) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(supplier_id)
        .bind(created_at)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn insert_item<'e, E>(&self, executor: E, item: &PurchaseItem) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO detalle_compra (purchase_id, product_id, cantidad, costo_unit, subtotal)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(item.purchase_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_cost)
        .bind(item.subtotal)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete_purchase<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM compra WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_purchase<'e, E>(&self, executor: E, id: i64) -> Result<Option<Purchase>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let purchase = sqlx::query_as::<_, Purchase>("SELECT * FROM compra WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(purchase)
    }

    pub async fn list_items<'e, E>(&self, executor: E, purchase_id: i64) -> Result<Vec<PurchaseItem>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, PurchaseItem>(
            "SELECT * FROM detalle_compra WHERE purchase_id = ?1 ORDER BY product_id ASC",
        )
        .bind(purchase_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, AppError> {
        let purchases = sqlx::query_as::<_, Purchase>("SELECT * FROM compra ORDER BY fecha DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(purchases)
    }

    pub async fn list_all_items(&self) -> Result<Vec<PurchaseItem>, AppError> {
        let items = sqlx::query_as::<_, PurchaseItem>(
            "SELECT * FROM detalle_compra ORDER BY purchase_id ASC, product_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn total_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Money, AppError> {
        let total = sqlx::query_scalar::<_, Money>(
            "SELECT COALESCE(SUM(total), 0) FROM compra WHERE fecha >= ?1 AND fecha < ?2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
