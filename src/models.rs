pub mod catalog;
pub mod dashboard;
pub mod purchases;
pub mod sales;
pub mod supplier;

/// Maior quantidade aceita numa linha de venda ou compra.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Teto do estoque digitado no cadastro de produto.
pub const MAX_STOCK: i64 = 1_000_000_000;
