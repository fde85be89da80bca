// src/models/dashboard.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::money::Money;
use crate::models::sales::SaleBrief;

// 1. Cards do topo do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_sales_count: i64,   // Número de vendas de hoje
    pub today_units_sold: i64,    // Soma das quantidades vendidas hoje
    pub today_sales_total: Money,
    pub product_count: i64,
    pub last_sale: Option<SaleBrief>,
    pub low_stock: Vec<LowStockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub id: i64,
    pub name: String,
    pub stock: i64,
}

// 2. Gráfico "Actividad semanal": um ponto por dia, dias sem venda com zero
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySaleSummary {
    pub date: NaiveDate,
    pub total: Money,
}

// 3. Fechamento de caixa
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashClosureSummary {
    pub day: NaiveDate,
    pub sales_count: i64,
    pub sales_total: Money,
    pub purchases_total: Money,
    pub units_sold: i64,
    pub expected_cash: Money,
    pub sales: Vec<SaleBrief>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashClosure {
    pub id: i64,
    #[sqlx(rename = "fecha")]
    pub closed_at: DateTime<Utc>,
    #[sqlx(rename = "dia")]
    pub day: NaiveDate,
    #[sqlx(rename = "cantidad_ventas")]
    pub sales_count: i64,
    #[sqlx(rename = "total_ventas")]
    pub sales_total: Money,
    #[sqlx(rename = "total_compras")]
    pub purchases_total: Money,
    #[sqlx(rename = "efectivo_esperado")]
    pub expected_cash: Money,
    #[sqlx(rename = "efectivo_contado")]
    pub counted_cash: Money,
    #[sqlx(rename = "diferencia")]
    pub difference: Money,
    #[sqlx(rename = "notas")]
    pub notes: Option<String>,
}
