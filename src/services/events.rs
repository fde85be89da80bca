// src/services/events.rs

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;

// Eventos em memória; um cliente lento perde os mais antigos (Lagged) e recarrega.
const FEED_CAPACITY: usize = 64;

/// O que mudou no banco. Quem escuta o feed recarrega a lista correspondente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreEvent {
    ProductsChanged,
    CategoriesChanged,
    SuppliersChanged,
    #[serde(rename_all = "camelCase")]
    SaleRecorded { sale_id: i64 },
    #[serde(rename_all = "camelCase")]
    SaleDeleted { sale_id: i64 },
    #[serde(rename_all = "camelCase")]
    PurchaseRecorded { purchase_id: i64 },
    #[serde(rename_all = "camelCase")]
    PurchaseDeleted { purchase_id: i64 },
    #[serde(rename_all = "camelCase")]
    CashClosed { closure_id: i64 },
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::ProductsChanged => "products",
            StoreEvent::CategoriesChanged => "categories",
            StoreEvent::SuppliersChanged => "suppliers",
            StoreEvent::SaleRecorded { .. } | StoreEvent::SaleDeleted { .. } => "sales",
            StoreEvent::PurchaseRecorded { .. } | StoreEvent::PurchaseDeleted { .. } => "purchases",
            StoreEvent::CashClosed { .. } => "cash-closure",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Publica depois do commit. Sem ouvintes não é erro.
    pub fn publish(&self, event: StoreEvent) {
        let listeners = self.sender.send(event.clone()).unwrap_or(0);
        tracing::debug!(event = event.name(), listeners, "evento publicado");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}
