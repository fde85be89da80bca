// src/db/cash_closure_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{common::error::AppError, models::dashboard::CashClosure};

#[derive(Clone)]
pub struct CashClosureRepository {
    pool: SqlitePool,
}

impl CashClosureRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Grava o fechamento (o `id` do parâmetro é ignorado).
    pub async fn insert<'e, E>(&self, executor: E, closure: &CashClosure) -> Result<CashClosure, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let saved = sqlx::query_as::<_, CashClosure>(
            r#"
            INSERT INTO cierre_caja (
                fecha, dia, cantidad_ventas, total_ventas, total_compras,
                efectivo_esperado, efectivo_contado, diferencia, notas
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING *
            "#,
        )
        .bind(closure.closed_at)
        .bind(closure.day)
        .bind(closure.sales_count)
        .bind(closure.sales_total)
        .bind(closure.purchases_total)
        .bind(closure.expected_cash)
        .bind(closure.counted_cash)
        .bind(closure.difference)
        .bind(closure.notes.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(saved)
    }

    pub async fn list_all(&self) -> Result<Vec<CashClosure>, AppError> {
        let closures = sqlx::query_as::<_, CashClosure>(
            "SELECT * FROM cierre_caja ORDER BY fecha DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(closures)
    }
}
