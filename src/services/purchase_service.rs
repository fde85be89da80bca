// src/services/purchase_service.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::{
    common::{error::AppError, money::Money},
    db::{ProductRepository, PurchaseRepository, SupplierRepository},
    models::{
        catalog::NewProduct,
        purchases::{Purchase, PurchaseDetail, PurchaseItem, PurchaseLine, PurchaseProductRef},
        MAX_LINE_QUANTITY,
    },
    services::events::{ChangeFeed, StoreEvent},
};

#[derive(Clone)]
pub struct PurchaseService {
    pool: SqlitePool,
    purchase_repo: PurchaseRepository,
    product_repo: ProductRepository,
    supplier_repo: SupplierRepository,
    change_feed: ChangeFeed,
}

impl PurchaseService {
    pub fn new(
        pool: SqlitePool,
        purchase_repo: PurchaseRepository,
        product_repo: ProductRepository,
        supplier_repo: SupplierRepository,
        change_feed: ChangeFeed,
    ) -> Self {
        Self { pool, purchase_repo, product_repo, supplier_repo, change_feed }
    }

    // --- REGISTRAR COMPRA (ENTRADA) ---
    pub async fn record_purchase(
        &self,
        supplier_id: i64,
        lines: &[PurchaseLine],
    ) -> Result<PurchaseDetail, AppError> {
        validate_lines(lines)?;

        // IMMEDIATE: a primeira instrução é leitura, mas a transação vai escrever
        let mut tx: Transaction<'static, Sqlite> =
            self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let supplier = self
            .supplier_repo
            .find_by_id(&mut *tx, supplier_id)
            .await?
            .ok_or(AppError::SupplierNotFound)?;

        // 1. Resolve (ou cria) cada produto e junta linhas repetidas
        let mut items: Vec<PurchaseItem> = Vec::with_capacity(lines.len());
        for line in lines {
            let (product_id, label) = self.resolve_product(&mut tx, line).await?;

            match items.iter_mut().find(|item| item.product_id == product_id) {
                Some(existing) if existing.unit_cost == line.unit_cost => {
                    let quantity = existing.quantity + line.quantity;
                    if quantity > MAX_LINE_QUANTITY {
                        return Err(AppError::InvalidQuantity);
                    }
                    existing.quantity = quantity;
                    existing.subtotal = line_subtotal(existing.unit_cost, quantity)?;
                }
                Some(_) => return Err(AppError::ConflictingPurchaseLine(label)),
                None => items.push(PurchaseItem {
                    purchase_id: 0,
                    product_id,
                    quantity: line.quantity,
                    unit_cost: line.unit_cost,
                    subtotal: line_subtotal(line.unit_cost, line.quantity)?,
                }),
            }
        }

        // 2. Cabeçalho + linhas + entrada de estoque
        let total = Money::checked_sum(items.iter().map(|item| item.subtotal))
            .ok_or(AppError::InvalidAmount)?;
        let created_at = Utc::now();
        let purchase_id = self
            .purchase_repo
            .insert_purchase(&mut *tx, supplier_id, created_at, total)
            .await?;

        for item in items.iter_mut() {
            item.purchase_id = purchase_id;
            self.purchase_repo.insert_item(&mut *tx, item).await?;
            let updated = self
                .product_repo
                .increase_stock(&mut *tx, item.product_id, item.quantity)
                .await?;
            if updated == 0 {
                tracing::warn!(product_id = item.product_id, quantity = item.quantity, "entrada estouraria o estoque");
                return Err(AppError::InvalidQuantity);
            }
        }

        tx.commit().await?;

        tracing::info!(purchase_id, supplier_id, total = %total, "compra registrada");
        self.change_feed.publish(StoreEvent::PurchaseRecorded { purchase_id });
        self.change_feed.publish(StoreEvent::ProductsChanged);

        Ok(PurchaseDetail {
            header: Purchase { id: purchase_id, supplier_id, created_at, total },
            supplier_name: supplier.name,
            items,
        })
    }

    /// Devolve o id do produto e um rótulo para mensagens de erro.
    /// Produto novo nasce com preço = custo, estoque 0 e sem descrição.
    async fn resolve_product(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        line: &PurchaseLine,
    ) -> Result<(i64, String), AppError> {
        match &line.product {
            PurchaseProductRef::Existing { product_id } => {
                let product = self
                    .product_repo
                    .find_by_id(&mut **tx, *product_id)
                    .await?
                    .ok_or_else(|| AppError::ProductNotFound(product_id.to_string()))?;
                Ok((product.id, product.name))
            }
            PurchaseProductRef::New { code, name } => {
                let code = NewProduct::normalize_code(code);
                if let Some(product) = self.product_repo.find_by_code(&mut **tx, &code).await? {
                    return Ok((product.id, product.name));
                }

                let new_product = NewProduct {
                    name: name.trim().to_string(),
                    code: code.clone(),
                    price: line.unit_cost,
                    stock: 0,
                    description: String::new(),
                    category_id: None,
                };
                let id = self
                    .product_repo
                    .insert_ignore(&mut **tx, &new_product)
                    .await?
                    .ok_or_else(|| AppError::ProductCodeAlreadyExists(code.clone()))?;

                tracing::info!(product_id = id, code = %code, "produto criado pela compra");
                Ok((id, new_product.name))
            }
        }
    }

    pub async fn list_purchases(&self) -> Result<Vec<PurchaseDetail>, AppError> {
        let purchases = self.purchase_repo.list_purchases().await?;
        let supplier_names: HashMap<i64, String> = self
            .supplier_repo
            .list_all()
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let mut items_by_purchase: HashMap<i64, Vec<PurchaseItem>> = HashMap::new();
        for item in self.purchase_repo.list_all_items().await? {
            items_by_purchase.entry(item.purchase_id).or_default().push(item);
        }

        Ok(purchases
            .into_iter()
            .map(|header| PurchaseDetail {
                supplier_name: supplier_names.get(&header.supplier_id).cloned().unwrap_or_default(),
                items: items_by_purchase.remove(&header.id).unwrap_or_default(),
                header,
            })
            .collect())
    }

    pub async fn get_purchase(&self, id: i64) -> Result<PurchaseDetail, AppError> {
        let header = self
            .purchase_repo
            .find_purchase(&self.pool, id)
            .await?
            .ok_or(AppError::PurchaseNotFound)?;
        let supplier_name = self
            .supplier_repo
            .find_by_id(&self.pool, header.supplier_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_default();
        let items = self.purchase_repo.list_items(&self.pool, id).await?;
        Ok(PurchaseDetail { header, supplier_name, items })
    }

    /// Anula a compra retirando do estoque o que ela trouxe.
    /// Se parte já foi vendida, a baixa condicional falha e nada muda.
    pub async fn delete_purchase(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let items = self.purchase_repo.list_items(&mut *tx, id).await?;
        if self.purchase_repo.delete_purchase(&mut *tx, id).await? == 0 {
            return Err(AppError::PurchaseNotFound);
        }

        for item in &items {
            let updated = self
                .product_repo
                .decrease_stock(&mut *tx, item.product_id, item.quantity)
                .await?;
            if updated == 0 {
                let label = self
                    .product_repo
                    .find_by_id(&mut *tx, item.product_id)
                    .await?
                    .map(|p| p.name)
                    .unwrap_or_else(|| item.product_id.to_string());
                return Err(AppError::StockAlreadySold(label));
            }
        }

        tx.commit().await?;

        tracing::info!(purchase_id = id, "compra anulada");
        self.change_feed.publish(StoreEvent::PurchaseDeleted { purchase_id: id });
        self.change_feed.publish(StoreEvent::ProductsChanged);
        Ok(())
    }
}

fn validate_lines(lines: &[PurchaseLine]) -> Result<(), AppError> {
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }
    for line in lines {
        if !(1..=MAX_LINE_QUANTITY).contains(&line.quantity) {
            return Err(AppError::InvalidQuantity);
        }
        if !line.unit_cost.is_valid_input() {
            return Err(AppError::InvalidAmount);
        }
        if let PurchaseProductRef::New { code, name } = &line.product {
            if code.trim().is_empty() {
                return Err(AppError::MissingField("code"));
            }
            if name.trim().is_empty() {
                return Err(AppError::MissingField("name"));
            }
        }
    }
    Ok(())
}

fn line_subtotal(unit_cost: Money, quantity: i64) -> Result<Money, AppError> {
    unit_cost.checked_times(quantity).ok_or(AppError::InvalidAmount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_line(code: &str, name: &str, quantity: i64, cents: i64) -> PurchaseLine {
        PurchaseLine {
            product: PurchaseProductRef::New { code: code.into(), name: name.into() },
            quantity,
            unit_cost: Money::from_cents(cents),
        }
    }

    #[test]
    fn rejects_empty_and_invalid_lines() {
        assert!(matches!(validate_lines(&[]), Err(AppError::EmptyCart)));
        assert!(matches!(validate_lines(&[new_line("A", "a", 0, 10)]), Err(AppError::InvalidQuantity)));
        assert!(matches!(validate_lines(&[new_line("A", "a", 1, -10)]), Err(AppError::InvalidAmount)));
        assert!(matches!(validate_lines(&[new_line("A", "a", i64::MAX, 10)]), Err(AppError::InvalidQuantity)));
        assert!(matches!(
            validate_lines(&[new_line("A", "a", 1, 100_000_000_001)]),
            Err(AppError::InvalidAmount)
        ));
        assert!(matches!(validate_lines(&[new_line(" ", "a", 1, 10)]), Err(AppError::MissingField("code"))));
        assert!(matches!(validate_lines(&[new_line("A", "", 1, 10)]), Err(AppError::MissingField("name"))));
    }

    #[test]
    fn zero_cost_is_allowed() {
        assert!(validate_lines(&[new_line("BONIF", "Bonificación", 2, 0)]).is_ok());
    }
}
