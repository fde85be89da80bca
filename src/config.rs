// src/config.rs

use std::env;
use std::str::FromStr;

use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};
use sqlx::SqlitePool;

use crate::{
    common::i18n::I18nStore,
    db::{
        self, CashClosureRepository, CategoryRepository, ProductRepository, PurchaseRepository,
        SaleRepository, SupplierRepository,
    },
    services::{
        catalog_service::CatalogService, dashboard_service::DashboardService, events::ChangeFeed,
        purchase_service::PurchaseService, sales_service::SalesService,
        supplier_service::SupplierService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub low_stock_threshold: i64,
    // Fuso da loja: define o que é "hoje" no painel e no fechamento de caixa
    pub utc_offset: FixedOffset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://minitienda.db".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            db_max_connections: 5,
            low_stock_threshold: 10,
            utc_offset: Utc.fix(),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let offset_minutes: i32 = parse_var("UTC_OFFSET_MINUTES", 0)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .with_context(|| format!("UTC_OFFSET_MINUTES fora do intervalo: {offset_minutes}"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            low_stock_threshold: parse_var("LOW_STOCK_THRESHOLD", defaults.low_stock_threshold)?,
            utc_offset,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub settings: Settings,
    pub i18n_store: I18nStore,
    pub change_feed: ChangeFeed,
    pub catalog_service: CatalogService,
    pub supplier_service: SupplierService,
    pub sales_service: SalesService,
    pub purchase_service: PurchaseService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Conecta ao banco, roda as migrações e monta os serviços.
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let db_pool = db::connect(&settings)
            .await
            .with_context(|| format!("falha ao abrir o banco {}", settings.database_url))?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        db::MIGRATOR
            .run(&db_pool)
            .await
            .context("falha ao rodar as migrações do banco de dados")?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Self::from_pool(db_pool, settings)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: SqlitePool, settings: Settings) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;
        let change_feed = ChangeFeed::new();

        let product_repo = ProductRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let supplier_repo = SupplierRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let purchase_repo = PurchaseRepository::new(db_pool.clone());
        let closure_repo = CashClosureRepository::new(db_pool.clone());

        let catalog_service = CatalogService::new(
            db_pool.clone(),
            product_repo.clone(),
            category_repo,
            change_feed.clone(),
        );
        let supplier_service =
            SupplierService::new(db_pool.clone(), supplier_repo.clone(), change_feed.clone());
        let sales_service = SalesService::new(
            db_pool.clone(),
            sale_repo.clone(),
            product_repo.clone(),
            change_feed.clone(),
        );
        let purchase_service = PurchaseService::new(
            db_pool.clone(),
            purchase_repo.clone(),
            product_repo.clone(),
            supplier_repo,
            change_feed.clone(),
        );
        let dashboard_service = DashboardService::new(
            db_pool.clone(),
            sale_repo,
            purchase_repo,
            product_repo,
            closure_repo,
            change_feed.clone(),
            settings.utc_offset,
            settings.low_stock_threshold,
        );

        Ok(Self {
            db_pool,
            settings,
            i18n_store,
            change_feed,
            catalog_service,
            supplier_service,
            sales_service,
            purchase_service,
            dashboard_service,
        })
    }
}
