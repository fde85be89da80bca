// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Products ---
        handlers::catalog::list_products,
        handlers::catalog::search_products,
        handlers::catalog::low_stock,
        handlers::catalog::get_product_by_code,
        handlers::catalog::get_product,
        handlers::catalog::upsert_product,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,

        // --- Categories ---
        handlers::catalog::list_categories,
        handlers::catalog::upsert_category,
        handlers::catalog::rename_category,
        handlers::catalog::delete_category,

        // --- Suppliers ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::get_supplier,
        handlers::suppliers::add_supplier,
        handlers::suppliers::upsert_supplier,
        handlers::suppliers::rename_supplier,
        handlers::suppliers::delete_supplier,

        // --- Sales ---
        handlers::sales::record_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::delete_sale,

        // --- Purchases ---
        handlers::purchases::record_purchase,
        handlers::purchases::list_purchases,
        handlers::purchases::get_purchase,
        handlers::purchases::delete_purchase,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_weekly_sales,
        handlers::dashboard::get_cash_closure,
        handlers::dashboard::close_register,
        handlers::dashboard::list_closures,

        // --- Events ---
        handlers::events::stream_events,
    ),
    components(
        schemas(
            // --- Catalog ---
            models::catalog::Category,
            models::catalog::Product,
            handlers::catalog::ProductPayload,
            handlers::catalog::CategoryPayload,

            // --- Suppliers ---
            models::supplier::Supplier,
            handlers::suppliers::SupplierPayload,
            handlers::suppliers::RenameSupplierPayload,

            // --- Sales ---
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleDetail,
            models::sales::SaleLine,
            models::sales::SaleBrief,
            handlers::sales::RecordSalePayload,

            // --- Purchases ---
            models::purchases::Purchase,
            models::purchases::PurchaseItem,
            models::purchases::PurchaseDetail,
            models::purchases::PurchaseProductRef,
            models::purchases::PurchaseLine,
            handlers::purchases::RecordPurchasePayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::LowStockItem,
            models::dashboard::DailySaleSummary,
            models::dashboard::CashClosureSummary,
            models::dashboard::CashClosure,
            handlers::dashboard::CloseRegisterPayload,

            // --- Events ---
            services::events::StoreEvent,
        )
    ),
    tags(
        (name = "Products", description = "Catálogo de produtos e estoque"),
        (name = "Categories", description = "Categorias de produtos"),
        (name = "Suppliers", description = "Fornecedores (RUC)"),
        (name = "Sales", description = "Vendas no caixa"),
        (name = "Purchases", description = "Entradas de mercadoria"),
        (name = "Dashboard", description = "Indicadores do dia e gráfico semanal"),
        (name = "Cash Closure", description = "Fechamento de caixa"),
        (name = "Events", description = "Notificações de mudança (SSE)")
    )
)]
pub struct ApiDoc;
