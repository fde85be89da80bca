// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::{error::AppError, money::Money},
    models::sales::{Sale, SaleBrief, SaleItem},
};

#[derive(Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESCRITA (sempre dentro da transação da venda)
    // =========================================================================

    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        created_at: DateTime<Utc>,
        total: Money,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO venta (fecha, total) VALUES (?1, ?2) RETURNING id",
        )
        .bind(created_at)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn insert_item<'e, E>(&self, executor: E, item: &SaleItem) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO detalle_venta (sale_id, product_id, cantidad, precio_unit, subtotal)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(item.sale_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal)
        .execute(executor)
        .await?;
        Ok(())
    }

    // As linhas saem junto pelo ON DELETE CASCADE
    pub async fn delete_sale<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM venta WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_sale<'e, E>(&self, executor: E, id: i64) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM venta WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn list_items<'e, E>(&self, executor: E, sale_id: i64) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM detalle_venta WHERE sale_id = ?1 ORDER BY product_id ASC",
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Vendas da mais recente para a mais antiga.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM venta ORDER BY fecha DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    pub async fn list_all_items(&self) -> Result<Vec<SaleItem>, AppError> {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM detalle_venta ORDER BY sale_id ASC, product_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Intervalo semiaberto [from, to)
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SaleBrief>, AppError> {
        let sales = sqlx::query_as::<_, SaleBrief>(
            r#"
            SELECT id, total, fecha FROM venta
            WHERE fecha >= ?1 AND fecha < ?2
            ORDER BY fecha ASC, id ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn units_sold_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let units = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(d.cantidad), 0)
            FROM detalle_venta d
            JOIN venta v ON v.id = d.sale_id
            WHERE v.fecha >= ?1 AND v.fecha < ?2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(units)
    }

    pub async fn last_sale(&self) -> Result<Option<SaleBrief>, AppError> {
        let sale = sqlx::query_as::<_, SaleBrief>(
            "SELECT id, total, fecha FROM venta ORDER BY fecha DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(sale)
    }
}
