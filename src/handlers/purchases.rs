// src/handlers/purchases.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::purchases::{PurchaseDetail, PurchaseLine},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPurchasePayload {
    #[schema(example = 1)]
    pub supplier_id: i64,
    pub items: Vec<PurchaseLine>,
}

// POST /api/purchases
#[utoipa::path(
    post,
    path = "/api/purchases",
    tag = "Purchases",
    request_body = RecordPurchasePayload,
    responses(
        (status = 201, description = "Entrada registrada; estoque aumentado", body = PurchaseDetail),
        (status = 400, description = "Linhas vazias ou inválidas"),
        (status = 404, description = "Fornecedor ou produto inexistente")
    )
)]
pub async fn record_purchase(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RecordPurchasePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = app_state
        .purchase_service
        .record_purchase(payload.supplier_id, &payload.items)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(purchase)))
}

// GET /api/purchases
#[utoipa::path(
    get,
    path = "/api/purchases",
    tag = "Purchases",
    responses((status = 200, description = "Histórico de compras, mais recentes primeiro", body = Vec<PurchaseDetail>))
)]
pub async fn list_purchases(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let purchases = app_state
        .purchase_service
        .list_purchases()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(purchases)))
}

// GET /api/purchases/{id}
#[utoipa::path(
    get,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    params(("id" = i64, Path, description = "ID da compra")),
    responses(
        (status = 200, description = "Compra com suas linhas", body = PurchaseDetail),
        (status = 404, description = "Compra não encontrada")
    )
)]
pub async fn get_purchase(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = app_state
        .purchase_service
        .get_purchase(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(purchase)))
}

// DELETE /api/purchases/{id}
#[utoipa::path(
    delete,
    path = "/api/purchases/{id}",
    tag = "Purchases",
    params(("id" = i64, Path, description = "ID da compra")),
    responses(
        (status = 204, description = "Compra anulada; estoque retirado"),
        (status = 404, description = "Compra não encontrada"),
        (status = 409, description = "Parte do estoque da compra já foi vendida")
    )
)]
pub async fn delete_purchase(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .purchase_service
        .delete_purchase(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
