// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
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
    models::{
        catalog::{Category, NewProduct, Product},
        dashboard::LowStockItem,
    },
};

// ---
// Payload: ProductPayload (cadastro/upsert e edição)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Arroz Costeño 1kg")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "ARZ-001")]
    pub code: String,

    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 4.5)]
    pub price: Money,

    #[validate(range(min = 0, max = 1_000_000_000, message = "invalid_quantity"))]
    #[serde(default)]
    pub stock: i64,

    #[serde(default)]
    pub description: String,

    pub category_id: Option<i64>,
}

impl ProductPayload {
    fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            code: self.code,
            price: self.price,
            stock: self.stock,
            description: self.description,
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Texto buscado em nome, código e descrição
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Lácteos")]
    pub name: String,
}

// ---
// PRODUTOS
// ---

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Catálogo completo ordenado por nome", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .catalog_service
        .list_products()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/search?q=
#[utoipa::path(
    get,
    path = "/api/products/search",
    tag = "Products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Produtos que contêm o texto (sem diferenciar maiúsculas)", body = Vec<Product>)
    )
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .catalog_service
        .search_products(&query.q)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/low-stock
#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "Products",
    responses(
        (status = 200, description = "Produtos abaixo do limite de estoque", body = Vec<LowStockItem>)
    )
)]
pub async fn low_stock(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .dashboard_service
        .low_stock()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

// GET /api/products/by-code/{code}
#[utoipa::path(
    get,
    path = "/api/products/by-code/{code}",
    tag = "Products",
    params(("code" = String, Path, description = "Código do produto (leitor de código de barras)")),
    responses(
        (status = 200, description = "Produto encontrado", body = Product),
        (status = 404, description = "Código desconhecido")
    )
)]
pub async fn get_product_by_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .catalog_service
        .find_by_code(&code)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .catalog_service
        .get_product(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// POST /api/products (upsert pelo código)
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Produto criado ou atualizado pelo código", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Categoria inexistente")
    )
)]
pub async fn upsert_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .catalog_service
        .upsert_product(payload.into_new_product())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "ID do produto")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Código já usado por outro produto")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let fields = payload.into_new_product();
    let product = Product {
        id,
        name: fields.name,
        code: fields.code,
        price: fields.price,
        stock: fields.stock,
        description: fields.description,
        category_id: fields.category_id,
    };

    let updated = app_state
        .catalog_service
        .update_product(product)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto com histórico de vendas ou compras")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_product(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// CATEGORIAS
// ---

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses((status = 200, description = "Categorias ordenadas por nome", body = Vec<Category>))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .catalog_service
        .list_categories()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

// POST /api/categories (idempotente pelo nome)
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Categoria existente ou recém-criada, com o id real", body = Category),
        (status = 400, description = "Nome em branco")
    )
)]
pub async fn upsert_category(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .upsert_category(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

// PUT /api/categories/{id}
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = i64, Path, description = "ID da categoria")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Categoria renomeada", body = Category),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Nome já usado")
    )
)]
pub async fn rename_category(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .rename_category(id, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

// DELETE /api/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = i64, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida; produtos ficam sem categoria"),
        (status = 404, description = "Categoria não encontrada")
    )
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_category(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
