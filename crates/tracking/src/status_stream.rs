//! Server-streaming order status watch.

use std::sync::Arc;

use chrono::Utc;
use common::OrderId;
use order_store::OrderStore;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::TrackingError;
use crate::messages::StatusEvent;
use crate::timeline::{status_message, STATUS_TIMELINE};

/// Streams the fixed status timeline for an existing order.
///
/// The stream is a simulation: it does not read or write the order's
/// persisted status, it only replays [`STATUS_TIMELINE`] with the
/// configured delays.
#[derive(Clone)]
pub struct StatusStreamer<S> {
    store: Arc<S>,
}

impl<S: OrderStore + 'static> StatusStreamer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates that the order exists, then returns a stream yielding the
    /// six timeline events. Dropping the stream stops the producer.
    #[tracing::instrument(skip(self))]
    pub async fn watch(
        &self,
        order_id: OrderId,
    ) -> Result<ReceiverStream<StatusEvent>, TrackingError> {
        self.store
            .find_by_id(order_id)
            .await?
            .ok_or(TrackingError::OrderNotFound(order_id))?;

        let (tx, rx) = mpsc::channel(STATUS_TIMELINE.len());
        tokio::spawn(async move {
            for (status, delay) in STATUS_TIMELINE {
                tokio::select! {
                    _ = sleep(delay) => {}
                    _ = tx.closed() => {
                        tracing::debug!(%order_id, "status watch receiver dropped");
                        return;
                    }
                }
                let event = StatusEvent {
                    order_id,
                    status,
                    message: status_message(status).to_string(),
                    timestamp: Utc::now(),
                };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            tracing::debug!(%order_id, "status watch completed");
        });

        Ok(ReceiverStream::new(rx))
    }
}
