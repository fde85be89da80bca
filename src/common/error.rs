use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erros de domínio. A mensagem do `thiserror` vai para o log;
// o texto mostrado ao usuário sai do I18nStore.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error("Estoque insuficiente para {0}")]
    InsufficientStock(String),

    #[error("Quantidade inválida")]
    InvalidQuantity,

    #[error("Valor fora do intervalo permitido")]
    InvalidAmount,

    #[error("Data fora do intervalo suportado")]
    InvalidDate,

    #[error("Campo obrigatório: {0}")]
    MissingField(&'static str),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(String),

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Fornecedor não encontrado")]
    SupplierNotFound,

    #[error("Venda não encontrada")]
    SaleNotFound,

    #[error("Compra não encontrada")]
    PurchaseNotFound,

    #[error("Código de produto já existe: {0}")]
    ProductCodeAlreadyExists(String),

    #[error("Categoria já existe: {0}")]
    CategoryNameAlreadyExists(String),

    #[error("Fornecedor já existe")]
    SupplierAlreadyExists,

    #[error("Produto possui histórico de vendas/compras")]
    ProductInUse,

    #[error("Fornecedor possui compras")]
    SupplierInUse,

    #[error("Produto {0} com custos diferentes na mesma compra")]
    ConflictingPurchaseLine(String),

    #[error("Estoque de {0} já foi vendido")]
    StockAlreadySold(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::EmptyCart
            | AppError::InsufficientStock(_)
            | AppError::InvalidQuantity
            | AppError::InvalidAmount
            | AppError::InvalidDate
            | AppError::MissingField(_)
            | AppError::ConflictingPurchaseLine(_) => StatusCode::BAD_REQUEST,

            AppError::ProductNotFound(_)
            | AppError::CategoryNotFound
            | AppError::SupplierNotFound
            | AppError::SaleNotFound
            | AppError::PurchaseNotFound => StatusCode::NOT_FOUND,

            AppError::ProductCodeAlreadyExists(_)
            | AppError::CategoryNameAlreadyExists(_)
            | AppError::SupplierAlreadyExists
            | AppError::ProductInUse
            | AppError::SupplierInUse
            | AppError::StockAlreadySold(_) => StatusCode::CONFLICT,

            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let t = |key: &str, args: &[(&str, &str)]| store.translate(lang, key, args);

        let error = match self {
            AppError::ValidationError(errors) => {
                // Cada mensagem do validator é uma chave de tradução.
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            t(key, &[])
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return ApiError {
                    status: self.status_code(),
                    error: t("validation_failed", &[]),
                    details: Some(details),
                };
            }
            AppError::EmptyCart => t("empty_cart", &[]),
            AppError::InsufficientStock(product) => t("insufficient_stock", &[("product", product.as_str())]),
            AppError::InvalidQuantity => t("invalid_quantity", &[]),
            AppError::InvalidAmount => t("invalid_amount", &[]),
            AppError::InvalidDate => t("invalid_date", &[]),
            AppError::MissingField(field) => {
                return ApiError {
                    status: self.status_code(),
                    error: t("validation_failed", &[]),
                    details: Some(HashMap::from([(field.to_string(), vec![t("required", &[])])])),
                };
            }
            AppError::ProductNotFound(product) => t("product_not_found", &[("product", product.as_str())]),
            AppError::CategoryNotFound => t("category_not_found", &[]),
            AppError::SupplierNotFound => t("supplier_not_found", &[]),
            AppError::SaleNotFound => t("sale_not_found", &[]),
            AppError::PurchaseNotFound => t("purchase_not_found", &[]),
            AppError::ProductCodeAlreadyExists(code) => t("duplicate_product_code", &[("code", code.as_str())]),
            AppError::CategoryNameAlreadyExists(name) => t("duplicate_category", &[("name", name.as_str())]),
            AppError::SupplierAlreadyExists => t("duplicate_supplier", &[]),
            AppError::ProductInUse => t("product_in_use", &[]),
            AppError::SupplierInUse => t("supplier_in_use", &[]),
            AppError::ConflictingPurchaseLine(product) => {
                t("conflicting_purchase_line", &[("product", product.as_str())])
            }
            AppError::StockAlreadySold(product) => t("stock_already_sold", &[("product", product.as_str())]),

            // Banco e erros inesperados viram 500; o detalhe fica só no log.
            e @ (AppError::DatabaseError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                t("internal_error", &[])
            }
        };

        ApiError { status: self.status_code(), error, details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Verdadeiro quando o erro do SQLite é violação de FOREIGN KEY (ex: ON DELETE RESTRICT).
pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> I18nStore {
        I18nStore::load().unwrap()
    }

    #[test]
    fn maps_domain_errors_to_statuses() {
        assert_eq!(AppError::EmptyCart.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidDate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SaleNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::SupplierAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn translates_by_locale() {
        let err = AppError::InsufficientStock("Leche".into());
        let es = err.to_api_error(&Locale("es".into()), &store());
        let en = err.to_api_error(&Locale("en".into()), &store());
        assert_eq!(es.error, "Stock insuficiente para Leche");
        assert_eq!(en.error, "Insufficient stock for Leche");
    }

    #[test]
    fn database_details_are_not_leaked() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        let api = err.to_api_error(&Locale("es".into()), &store());
        assert_eq!(api.error, "Ocurrió un error inesperado.");
        assert!(api.details.is_none());
    }
}
