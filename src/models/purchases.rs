// src/models/purchases.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::money::Money;

// --- Cabeçalho da compra (tabela `compra`) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    #[sqlx(rename = "proveedor_id")]
    pub supplier_id: i64,
    #[sqlx(rename = "fecha")]
    pub created_at: DateTime<Utc>,
    #[schema(example = 120.0)]
    pub total: Money,
}

// --- Linha da compra (tabela `detalle_compra`) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub purchase_id: i64,
    pub product_id: i64,
    #[sqlx(rename = "cantidad")]
    pub quantity: i64,
    #[sqlx(rename = "costo_unit")]
    pub unit_cost: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    #[serde(flatten)]
    pub header: Purchase,
    pub supplier_name: String,
    pub items: Vec<PurchaseItem>,
}

/// Produto de uma linha de compra: um já cadastrado ou um novo, identificado pelo código.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseProductRef {
    #[serde(rename_all = "camelCase")]
    Existing { product_id: i64 },
    #[serde(rename_all = "camelCase")]
    New { code: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub product: PurchaseProductRef,
    pub quantity: i64,
    pub unit_cost: Money,
}
