// src/models/sales.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::money::Money;

// --- Cabeçalho da venda (tabela `venta`) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    #[sqlx(rename = "fecha")]
    pub created_at: DateTime<Utc>,
    #[schema(example = 27.5)]
    pub total: Money,
}

// --- Linha da venda (tabela `detalle_venta`) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub sale_id: i64,
    pub product_id: i64,
    #[sqlx(rename = "cantidad")]
    pub quantity: i64,
    #[sqlx(rename = "precio_unit")]
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub header: Sale,
    pub items: Vec<SaleItem>,
}

/// Uma linha do carrinho: produto + quantidade. O preço é o atual do produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
}

// Resumo usado no dashboard ("última venta") e no fechamento de caixa
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleBrief {
    pub id: i64,
    pub total: Money,
    #[sqlx(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}
