//! Streaming endpoints: SSE status watch and WebSocket tracking sessions.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::response::sse::{Event, KeepAlive, Sse};
use common::OrderId;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, Stream, StreamExt};
use order_store::OrderStore;
use tokio::sync::mpsc;
use tracking::{TrackingQuery, TrackingResponse, interactive_tracking};

use crate::error::ApiError;
use crate::routes::orders::AppState;

/// GET /orders/:id/status/stream — SSE stream of the fixed status
/// timeline for an existing order.
#[tracing::instrument(skip(state))]
pub async fn watch<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let events = state.streamer.watch(OrderId::from_uuid(id)).await?;
    let stream = events.map(|event| Event::default().event("status").json_data(&event));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// GET /orders/track — upgrade to a WebSocket tracking session.
pub async fn track<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// Bridges one WebSocket connection to a tracking session.
///
/// Text frames are decoded as [`TrackingQuery`] values and forwarded to
/// the session; undecodable frames get an in-band ERROR without touching
/// the session. The connection ends when either side closes.
async fn handle_socket<S: OrderStore + Clone + 'static>(state: Arc<AppState<S>>, socket: WebSocket) {
    let (mut sink, mut inbound) = socket.split();
    let (query_tx, query_rx) = mpsc::channel::<TrackingQuery>(16);
    let mut responses = interactive_tracking(state.store.clone(), query_rx);

    loop {
        tokio::select! {
            frame = inbound.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<TrackingQuery>(&text) {
                    Ok(query) => {
                        if query_tx.send(query).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let response = TrackingResponse::protocol_error(format!(
                            "Malformed tracking query: {err}"
                        ));
                        if send_response(&mut sink, &response).await.is_err() {
                            break;
                        }
                    }
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "tracking websocket read failed");
                    break;
                }
            },
            response = responses.next() => match response {
                Some(response) => {
                    if send_response(&mut sink, &response).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    // Dropping query_tx ends the session task; dropping responses drains
    // anything it had in flight.
}

async fn send_response(
    sink: &mut SplitSink<WebSocket, Message>,
    response: &TrackingResponse,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(response).map_err(axum::Error::new)?;
    sink.send(Message::Text(json.into())).await
}
