// src/routes.rs

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_products).post(handlers::catalog::upsert_product),
        )
        .route("/search", get(handlers::catalog::search_products))
        .route("/low-stock", get(handlers::catalog::low_stock))
        .route("/by-code/{code}", get(handlers::catalog::get_product_by_code))
        .route(
            "/{id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_categories).post(handlers::catalog::upsert_category),
        )
        .route(
            "/{id}",
            put(handlers::catalog::rename_category).delete(handlers::catalog::delete_category),
        );

    let supplier_routes = Router::new()
        .route(
            "/",
            get(handlers::suppliers::list_suppliers)
                .post(handlers::suppliers::add_supplier)
                .put(handlers::suppliers::upsert_supplier),
        )
        .route(
            "/{id}",
            get(handlers::suppliers::get_supplier)
                .put(handlers::suppliers::rename_supplier)
                .delete(handlers::suppliers::delete_supplier),
        );

    let sale_routes = Router::new()
        .route("/", get(handlers::sales::list_sales).post(handlers::sales::record_sale))
        .route(
            "/{id}",
            get(handlers::sales::get_sale).delete(handlers::sales::delete_sale),
        );

    let purchase_routes = Router::new()
        .route(
            "/",
            get(handlers::purchases::list_purchases).post(handlers::purchases::record_purchase),
        )
        .route(
            "/{id}",
            get(handlers::purchases::get_purchase).delete(handlers::purchases::delete_purchase),
        );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/weekly-sales", get(handlers::dashboard::get_weekly_sales));

    let cash_closure_routes = Router::new()
        .route(
            "/",
            get(handlers::dashboard::get_cash_closure).post(handlers::dashboard::close_register),
        )
        .route("/history", get(handlers::dashboard::list_closures));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/events", get(handlers::events::stream_events))
        .nest("/api/products", product_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/suppliers", supplier_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/purchases", purchase_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/cash-closure", cash_closure_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
