use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::Settings;

pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod purchase_repo;
pub use purchase_repo::PurchaseRepository;
pub mod cash_closure_repo;
pub use cash_closure_repo::CashClosureRepository;

// Migrações embutidas a partir de ./migrations
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Abre (ou cria) o arquivo SQLite com chaves estrangeiras ligadas.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}
