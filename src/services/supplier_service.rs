// src/services/supplier_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::supplier::Supplier,
    services::events::{ChangeFeed, StoreEvent},
};

#[derive(Clone)]
pub struct SupplierService {
    pool: SqlitePool,
    repo: SupplierRepository,
    change_feed: ChangeFeed,
}

// RUC e nome obrigatórios; telefone em branco vira NULL
fn normalize(ruc: &str, name: &str, phone: Option<&str>) -> Result<(String, String, Option<String>), AppError> {
    let ruc = ruc.trim();
    let name = name.trim();
    if ruc.is_empty() {
        return Err(AppError::MissingField("ruc"));
    }
    if name.is_empty() {
        return Err(AppError::MissingField("name"));
    }
    let phone = phone.map(str::trim).filter(|p| !p.is_empty()).map(str::to_string);
    Ok((ruc.to_string(), name.to_string(), phone))
}

impl SupplierService {
    pub fn new(pool: SqlitePool, repo: SupplierRepository, change_feed: ChangeFeed) -> Self {
        Self { pool, repo, change_feed }
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get_supplier(&self, id: i64) -> Result<Supplier, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::SupplierNotFound)
    }

    /// Cadastro simples: se o RUC ou o nome já existem, é erro.
    pub async fn add_supplier(&self, ruc: &str, name: &str, phone: Option<&str>) -> Result<Supplier, AppError> {
        let (ruc, name, phone) = normalize(ruc, name, phone)?;

        let id = self
            .repo
            .insert_ignore(&self.pool, &ruc, &name, phone.as_deref())
            .await?
            .ok_or(AppError::SupplierAlreadyExists)?;

        tracing::info!(supplier_id = id, ruc = %ruc, "fornecedor cadastrado");
        self.change_feed.publish(StoreEvent::SuppliersChanged);
        Ok(Supplier { id, ruc, name, phone })
    }

    /// Upsert pela chave natural (RUC): cria ou atualiza nome e telefone.
    pub async fn upsert_by_ruc(&self, ruc: &str, name: &str, phone: Option<&str>) -> Result<Supplier, AppError> {
        let (ruc, name, phone) = normalize(ruc, name, phone)?;

        let mut tx = self.pool.begin().await?;

        let inserted = self
            .repo
            .insert_ignore(&mut *tx, &ruc, &name, phone.as_deref())
            .await?;

        if inserted.is_none() {
            // O conflito pode ter sido no nome de OUTRO fornecedor
            if self.repo.find_by_ruc(&mut *tx, &ruc).await?.is_none() {
                return Err(AppError::SupplierAlreadyExists);
            }
            self.repo
                .update_by_ruc(&mut *tx, &ruc, &name, phone.as_deref())
                .await?;
        }

        let supplier = self
            .repo
            .find_by_ruc(&mut *tx, &ruc)
            .await?
            .ok_or(AppError::SupplierNotFound)?;

        tx.commit().await?;

        self.change_feed.publish(StoreEvent::SuppliersChanged);
        Ok(supplier)
    }

    pub async fn rename_supplier(&self, id: i64, new_name: &str) -> Result<Supplier, AppError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::MissingField("name"));
        }

        let mut tx = self.pool.begin().await?;
        if self.repo.rename(&mut *tx, id, new_name).await? == 0 {
            return Err(AppError::SupplierNotFound);
        }
        let supplier = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::SupplierNotFound)?;
        tx.commit().await?;

        self.change_feed.publish(StoreEvent::SuppliersChanged);
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete(&self.pool, id).await? == 0 {
            return Err(AppError::SupplierNotFound);
        }

        tracing::info!(supplier_id = id, "fornecedor removido");
        self.change_feed.publish(StoreEvent::SuppliersChanged);
        Ok(())
    }
}
