// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::money::Money;

// --- Categorias ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[schema(example = 1)]
    pub id: i64,
    #[sqlx(rename = "nombre")]
    #[schema(example = "Abarrotes")]
    pub name: String,
}

// --- Produtos ---
// `code` é a chave natural (única, sempre em maiúsculas).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Arroz Costeño 1kg")]
    pub name: String,
    #[schema(example = "ARZ-001")]
    pub code: String,
    #[schema(example = 4.5)]
    pub price: Money,
    #[schema(example = 24)]
    pub stock: i64,
    #[sqlx(rename = "descripcion")]
    pub description: String,
    pub category_id: Option<i64>,
}

/// Dados de um produto antes de ter id (cadastro e upsert por código).
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    pub price: Money,
    pub stock: i64,
    pub description: String,
    pub category_id: Option<i64>,
}

impl NewProduct {
    /// Códigos chegam digitados ou lidos por scanner; guardamos sempre trim + maiúsculas.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }
}
