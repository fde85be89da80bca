//! Helpers compartilhados pelos testes de integração.
//!
//! Cada teste ganha um SQLite em memória novo, já migrado.

#![allow(dead_code)]

use std::str::FromStr;

use minitienda::{
    common::money::Money,
    config::{AppState, Settings},
    db::MIGRATOR,
    models::{catalog::NewProduct, catalog::Product, supplier::Supplier},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Settings::default()).await
    }

    pub async fn spawn_with(settings: Settings) -> Self {
        let pool = memory_pool().await;
        MIGRATOR.run(&pool).await.expect("Falha ao rodar as migrações");
        let state = AppState::from_pool(pool, settings).expect("Falha ao montar o AppState");
        Self { state }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.state.db_pool
    }

    /// Cadastra (ou atualiza) um produto pelo código.
    pub async fn product(&self, code: &str, price_cents: i64, stock: i64) -> Product {
        self.state
            .catalog_service
            .upsert_product(NewProduct {
                name: format!("Produto {code}"),
                code: code.to_string(),
                price: Money::from_cents(price_cents),
                stock,
                description: String::new(),
                category_id: None,
            })
            .await
            .expect("Falha ao cadastrar produto")
    }

    pub async fn supplier(&self, ruc: &str, name: &str) -> Supplier {
        self.state
            .supplier_service
            .add_supplier(ruc, name, None)
            .await
            .expect("Falha ao cadastrar fornecedor")
    }

    pub async fn stock_of(&self, product_id: i64) -> i64 {
        self.state
            .catalog_service
            .get_product(product_id)
            .await
            .expect("Produto deveria existir")
            .stock
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.pool())
            .await
            .expect("Falha ao contar linhas")
    }
}

// Uma única conexão que nunca é reciclada: o banco em memória vive enquanto ela viver
async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("URL de teste inválida")
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Falha ao abrir SQLite em memória")
}
