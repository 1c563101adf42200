use std::convert::Infallible;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use cendres_shared::models::events::StoreEvent;

use crate::state::AppState;

/// GET /v1/products/stream
/// Server-sent `price_changed` events
pub async fn price_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event @ StoreEvent::PriceChanged(_)) => price_event(&event).map(Ok),
            Ok(_) => None,
            Err(e) => {
                // Lagged receiver; the client catches up on the next change
                tracing::warn!("Price stream skipped events: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn price_event(event: &StoreEvent) -> Option<Event> {
    let StoreEvent::PriceChanged(change) = event else {
        return None;
    };

    match Event::default().event(event.name()).json_data(change) {
        Ok(sse) => Some(sse),
        Err(e) => {
            tracing::error!("Failed to encode price event: {}", e);
            None
        }
    }
}
