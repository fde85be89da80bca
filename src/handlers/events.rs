// src/handlers/events.rs

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};

use crate::{config::AppState, services::events::StoreEvent};

// GET /api/events
// Cada escrita confirmada vira um evento `products`, `sales`, etc.
// Quem perdeu eventos recebe `resync` e deve recarregar tudo.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "Fluxo SSE de mudanças no banco", content_type = "text/event-stream", body = StoreEvent)
    )
)]
pub async fn stream_events(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = app_state.change_feed.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(|message| match message {
        Ok(event) => to_sse_event(&event).map(Ok),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "assinante SSE atrasado; pedindo resync");
            Some(Ok(Event::default().event("resync").data(skipped.to_string())))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &StoreEvent) -> Option<Event> {
    match Event::default().event(event.name()).json_data(event) {
        Ok(sse_event) => Some(sse_event),
        Err(e) => {
            tracing::error!("Falha ao serializar evento {}: {}", event.name(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, response::IntoResponse};

    #[tokio::test]
    async fn store_events_become_named_sse_frames() {
        let event = to_sse_event(&StoreEvent::SaleRecorded { sale_id: 7 }).unwrap();
        let sse = Sse::new(tokio_stream::iter(vec![Ok::<_, Infallible>(event)]));

        let body = to_bytes(sse.into_response().into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "event: sales\ndata: {\"type\":\"SALE_RECORDED\",\"saleId\":7}\n\n"
        );
    }
}
