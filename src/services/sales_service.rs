// src/services/sales_service.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    common::{error::AppError, money::Money},
    db::{ProductRepository, SaleRepository},
    models::{
        sales::{Sale, SaleDetail, SaleItem, SaleLine},
        MAX_LINE_QUANTITY,
    },
    services::events::{ChangeFeed, StoreEvent},
};

#[derive(Clone)]
pub struct SalesService {
    pool: SqlitePool,
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    change_feed: ChangeFeed,
}

impl SalesService {
    pub fn new(
        pool: SqlitePool,
        sale_repo: SaleRepository,
        product_repo: ProductRepository,
        change_feed: ChangeFeed,
    ) -> Self {
        Self { pool, sale_repo, product_repo, change_feed }
    }

    // --- REGISTRAR VENDA ---
    // Tudo ou nada: se uma linha não tiver estoque, o rollback desfaz as baixas anteriores.
    pub async fn record_sale(&self, lines: &[SaleLine]) -> Result<SaleDetail, AppError> {
        let cart = merge_cart_lines(lines)?;

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let mut items = Vec::with_capacity(cart.len());

        for (product_id, quantity) in cart {
            // 1. Baixa condicional (a escrita vem primeiro para pegar o lock de escrita cedo)
            let updated = self
                .product_repo
                .decrease_stock(&mut *tx, product_id, quantity)
                .await?;

            let product = self
                .product_repo
                .find_by_id(&mut *tx, product_id)
                .await?
                .ok_or_else(|| AppError::ProductNotFound(product_id.to_string()))?;

            if updated == 0 {
                tracing::warn!(product_id, quantity, stock = product.stock, "estoque insuficiente");
                return Err(AppError::InsufficientStock(product.name));
            }

            // 2. Preço congelado no momento da venda
            let subtotal = product
                .price
                .checked_times(quantity)
                .ok_or(AppError::InvalidAmount)?;
            items.push(SaleItem {
                sale_id: 0,
                product_id,
                quantity,
                unit_price: product.price,
                subtotal,
            });
        }

        // 3. Cabeçalho + linhas
        let total = Money::checked_sum(items.iter().map(|item| item.subtotal))
            .ok_or(AppError::InvalidAmount)?;
        let created_at = Utc::now();
        let sale_id = self.sale_repo.insert_sale(&mut *tx, created_at, total).await?;

        for item in items.iter_mut() {
            item.sale_id = sale_id;
            self.sale_repo.insert_item(&mut *tx, item).await?;
        }

        tx.commit().await?;

        tracing::info!(sale_id, total = %total, lines = items.len(), "venda registrada");
        self.change_feed.publish(StoreEvent::SaleRecorded { sale_id });
        self.change_feed.publish(StoreEvent::ProductsChanged);

        Ok(SaleDetail {
            header: Sale { id: sale_id, created_at, total },
            items,
        })
    }

    pub async fn list_sales(&self) -> Result<Vec<SaleDetail>, AppError> {
        let sales = self.sale_repo.list_sales().await?;
        let mut items_by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
        for item in self.sale_repo.list_all_items().await? {
            items_by_sale.entry(item.sale_id).or_default().push(item);
        }

        Ok(sales
            .into_iter()
            .map(|header| {
                let items = items_by_sale.remove(&header.id).unwrap_or_default();
                SaleDetail { header, items }
            })
            .collect())
    }

    pub async fn get_sale(&self, id: i64) -> Result<SaleDetail, AppError> {
        let header = self
            .sale_repo
            .find_sale(&self.pool, id)
            .await?
            .ok_or(AppError::SaleNotFound)?;
        let items = self.sale_repo.list_items(&self.pool, id).await?;
        Ok(SaleDetail { header, items })
    }

    /// Anula a venda: devolve o estoque e apaga cabeçalho + linhas (CASCADE).
    pub async fn delete_sale(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let items = self.sale_repo.list_items(&mut *tx, id).await?;
        if self.sale_repo.delete_sale(&mut *tx, id).await? == 0 {
            return Err(AppError::SaleNotFound);
        }
        for item in &items {
            let updated = self
                .product_repo
                .increase_stock(&mut *tx, item.product_id, item.quantity)
                .await?;
            if updated == 0 {
                return Err(AppError::InvalidQuantity);
            }
        }

        tx.commit().await?;

        tracing::info!(sale_id = id, "venda anulada");
        self.change_feed.publish(StoreEvent::SaleDeleted { sale_id: id });
        self.change_feed.publish(StoreEvent::ProductsChanged);
        Ok(())
    }
}

/// Junta linhas repetidas do mesmo produto (a chave de `detalle_venta` é venda + produto),
/// mantendo a ordem em que apareceram.
fn merge_cart_lines(lines: &[SaleLine]) -> Result<Vec<(i64, i64)>, AppError> {
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(lines.len());
    for line in lines {
        if !(1..=MAX_LINE_QUANTITY).contains(&line.quantity) {
            return Err(AppError::InvalidQuantity);
        }
        match merged.iter_mut().find(|(id, _)| *id == line.product_id) {
            Some((_, qty)) if *qty + line.quantity > MAX_LINE_QUANTITY => {
                return Err(AppError::InvalidQuantity);
            }
            Some((_, qty)) => *qty += line.quantity,
            None => merged.push((line.product_id, line.quantity)),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64) -> SaleLine {
        SaleLine { product_id, quantity }
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert!(matches!(merge_cart_lines(&[]), Err(AppError::EmptyCart)));
    }

    #[test]
    fn repeated_products_are_merged_in_order() {
        let merged = merge_cart_lines(&[line(3, 1), line(1, 2), line(3, 4)]).unwrap();
        assert_eq!(merged, vec![(3, 5), (1, 2)]);
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert!(matches!(merge_cart_lines(&[line(1, 0)]), Err(AppError::InvalidQuantity)));
        assert!(matches!(merge_cart_lines(&[line(1, 2), line(2, -1)]), Err(AppError::InvalidQuantity)));
    }

    #[test]
    fn quantities_are_capped_per_product() {
        assert!(matches!(merge_cart_lines(&[line(1, i64::MAX)]), Err(AppError::InvalidQuantity)));
        assert!(merge_cart_lines(&[line(1, MAX_LINE_QUANTITY)]).is_ok());
        assert!(matches!(
            merge_cart_lines(&[line(1, MAX_LINE_QUANTITY), line(1, 1)]),
            Err(AppError::InvalidQuantity)
        ));
    }
}
