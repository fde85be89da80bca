// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        money::Money,
    },
    config::AppState,
    handlers::validate_amount,
    middleware::i18n::Locale,
    models::dashboard::{CashClosure, CashClosureSummary, DailySaleSummary, DashboardSummary},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClosureDayQuery {
    /// Dia local (AAAA-MM-DD); sem ele, hoje
    pub day: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseRegisterPayload {
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 350.0)]
    pub counted_cash: Money,

    #[validate(length(max = 500, message = "notes_too_long"))]
    pub notes: Option<String>,
}

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do dia, última venda e alerta de estoque baixo", body = DashboardSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .summary()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/weekly-sales
#[utoipa::path(
    get,
    path = "/api/dashboard/weekly-sales",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Total vendido por dia nos últimos 7 dias (dias sem venda com zero)", body = Vec<DailySaleSummary>)
    )
)]
pub async fn get_weekly_sales(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let chart = app_state
        .dashboard_service
        .weekly_sales()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/cash-closure?day=
#[utoipa::path(
    get,
    path = "/api/cash-closure",
    tag = "Cash Closure",
    params(ClosureDayQuery),
    responses(
        (status = 200, description = "Resumo do caixa do dia", body = CashClosureSummary)
    )
)]
pub async fn get_cash_closure(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ClosureDayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let day = query.day.unwrap_or_else(|| app_state.dashboard_service.today());

    let summary = app_state
        .dashboard_service
        .cash_closure_summary(day)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/cash-closure
#[utoipa::path(
    post,
    path = "/api/cash-closure",
    tag = "Cash Closure",
    request_body = CloseRegisterPayload,
    responses(
        (status = 201, description = "Caixa de hoje fechado com o valor contado", body = CashClosure),
        (status = 400, description = "Valor contado inválido")
    )
)]
pub async fn close_register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CloseRegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let closure = app_state
        .dashboard_service
        .close_register(payload.counted_cash, payload.notes)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(closure)))
}

// GET /api/cash-closure/history
#[utoipa::path(
    get,
    path = "/api/cash-closure/history",
    tag = "Cash Closure",
    responses(
        (status = 200, description = "Fechamentos anteriores, mais recentes primeiro", body = Vec<CashClosure>)
    )
)]
pub async fn list_closures(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let closures = app_state
        .dashboard_service
        .list_closures()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(closures)))
}
