// src/db/product_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::{is_foreign_key_violation, is_unique_violation, AppError},
    models::{
        catalog::{NewProduct, Product},
        dashboard::LowStockItem,
    },
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras simples (usam a pool direto)
    // ---

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM producto ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM producto")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Produtos com estoque abaixo do limite, do mais crítico para o menos crítico.
    pub async fn list_low_stock(&self, threshold: i64) -> Result<Vec<LowStockItem>, AppError> {
        let items = sqlx::query_as::<_, LowStockItem>(
            "SELECT id, name, stock FROM producto WHERE stock < ?1 ORDER BY stock ASC, name ASC",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // ---
    // Funções que podem rodar dentro de uma transação
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM producto WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn find_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM producto WHERE code = ?1 LIMIT 1")
            .bind(code)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// INSERT que ignora conflito no código. Retorna `None` se o código já existia.
    pub async fn insert_ignore<'e, E>(&self, executor: E, p: &NewProduct) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO producto (name, code, price, stock, descripcion, category_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (code) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&p.name)
        .bind(&p.code)
        .bind(p.price)
        .bind(p.stock)
        .bind(&p.description)
        .bind(p.category_id)
        .fetch_optional(executor)
        .await
        .map_err(map_category_fk)?;
        Ok(id)
    }

    pub async fn update_by_code<'e, E>(&self, executor: E, p: &NewProduct) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE producto
            SET name = ?1, price = ?2, stock = ?3, descripcion = ?4, category_id = ?5
            WHERE code = ?6
            "#,
        )
        .bind(&p.name)
        .bind(p.price)
        .bind(p.stock)
        .bind(&p.description)
        .bind(p.category_id)
        .bind(&p.code)
        .execute(executor)
        .await
        .map_err(map_category_fk)?;
        Ok(result.rows_affected())
    }

    /// Atualização completa por id (inclusive o código).
    pub async fn update<'e, E>(&self, executor: E, p: &Product) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE producto
            SET name = ?1, code = ?2, price = ?3, stock = ?4, descripcion = ?5, category_id = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&p.name)
        .bind(&p.code)
        .bind(p.price)
        .bind(p.stock)
        .bind(&p.description)
        .bind(p.category_id)
        .bind(p.id)
        .execute(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::ProductCodeAlreadyExists(p.code.clone());
            }
            map_category_fk(e)
        })?;
        Ok(result.rows_affected())
    }

    /// Baixa condicional: só desconta se houver estoque suficiente.
    /// Retorna 0 quando o produto não existe ou o estoque não alcança.
    pub async fn decrease_stock<'e, E>(&self, executor: E, product_id: i64, qty: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE producto SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
        )
        .bind(qty)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Entrada condicional: recusa a soma que estouraria o INTEGER do SQLite
    /// (o estouro viraria REAL e quebraria a leitura do produto).
    /// Retorna 0 quando o produto não existe ou a soma não cabe.
    pub async fn increase_stock<'e, E>(&self, executor: E, product_id: i64, qty: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE producto SET stock = stock + ?1 WHERE id = ?2 AND stock <= 9223372036854775807 - ?1",
        )
        .bind(qty)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove o produto. Linhas de venda/compra usam RESTRICT, então produtos
    /// com histórico não podem ser apagados.
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM producto WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::ProductInUse;
                }
                e.into()
            })?;
        Ok(result.rows_affected())
    }
}

// category_id apontando para categoria inexistente
fn map_category_fk(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        return AppError::CategoryNotFound;
    }
    e.into()
}
