pub mod catalog_service;
pub mod dashboard_service;
pub mod events;
pub mod purchase_service;
pub mod sales_service;
pub mod supplier_service;
