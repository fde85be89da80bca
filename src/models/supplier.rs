// src/models/supplier.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "20123456789")]
    pub ruc: String,
    #[sqlx(rename = "nombre")]
    #[schema(example = "Distribuidora Lima SAC")]
    pub name: String,
    #[sqlx(rename = "telefono")]
    #[schema(example = "987654321")]
    pub phone: Option<String>,
}
