//! Interactive order tracking sessions.
//!
//! A session couples an inbound query stream with an outbound response
//! stream. The first SUBSCRIBE arms an auto-advance timer that walks the
//! order through the remaining statuses one tick at a time; later
//! SUBSCRIBE queries are ignored silently. Queries keep being served
//! while the timer runs. Errors are reported in-band and
//! never terminate the session; the session ends when the inbound stream
//! closes or the client drops the outbound stream.

use std::sync::Arc;

use common::OrderId;
use domain::{Order, OrderStatus};
use order_store::{OrderStore, StoreError};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval};
use tokio_stream::wrappers::ReceiverStream;

use crate::messages::{QueryKind, TrackingQuery, TrackingResponse};
use crate::timeline::{status_message, AUTO_ADVANCE, AUTO_ADVANCE_PERIOD};

/// Spawns a session task for the given query stream and returns its
/// response stream. The task ends when `queries` closes or the returned
/// stream is dropped.
pub fn interactive_tracking<S: OrderStore + 'static>(
    store: Arc<S>,
    queries: mpsc::Receiver<TrackingQuery>,
) -> ReceiverStream<TrackingResponse> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(run_session(store, queries, tx));
    ReceiverStream::new(rx)
}

struct Session<S> {
    store: Arc<S>,
    subscribed: Option<OrderId>,
    /// Index into [`AUTO_ADVANCE`] of the next status to apply.
    progress: usize,
}

enum Step {
    Query(TrackingQuery),
    Tick,
    Closed,
}

#[tracing::instrument(skip_all)]
async fn run_session<S: OrderStore>(
    store: Arc<S>,
    mut queries: mpsc::Receiver<TrackingQuery>,
    tx: mpsc::Sender<TrackingResponse>,
) {
    let mut session = Session {
        store,
        subscribed: None,
        progress: 0,
    };
    let mut ticker: Option<Interval> = None;

    loop {
        let step = match ticker.as_mut() {
            Some(t) => tokio::select! {
                query = queries.recv() => query.map_or(Step::Closed, Step::Query),
                _ = t.tick() => Step::Tick,
            },
            None => queries.recv().await.map_or(Step::Closed, Step::Query),
        };

        match step {
            Step::Query(query) => {
                let responses = session.handle_query(&query, &mut ticker).await;
                for response in responses {
                    if tx.send(response).await.is_err() {
                        tracing::debug!("tracking client went away");
                        return;
                    }
                }
            }
            Step::Tick => {
                match session.advance().await {
                    Some(response) => {
                        if tx.send(response).await.is_err() {
                            return;
                        }
                    }
                    None => ticker = None,
                }
                if session.progress >= AUTO_ADVANCE.len() {
                    ticker = None;
                }
            }
            Step::Closed => {
                tracing::debug!("tracking query stream closed");
                return;
            }
        }
    }
}

impl<S: OrderStore> Session<S> {
    async fn handle_query(
        &mut self,
        query: &TrackingQuery,
        ticker: &mut Option<Interval>,
    ) -> Vec<TrackingResponse> {
        let order_id = query.order_id;

        // A session subscribes at most once; any later SUBSCRIBE is
        // ignored silently, whatever order it names. The timer and
        // progression are left untouched.
        if query.kind == QueryKind::Subscribe && self.subscribed.is_some() {
            return Vec::new();
        }

        let order = match self.resolve(order_id).await {
            Ok(order) => order,
            Err(message) => return vec![TrackingResponse::error(order_id, message)],
        };

        match query.kind {
            QueryKind::Subscribe => {
                self.subscribed = Some(order_id);
                self.progress = 0;
                *ticker = Some(interval_at(
                    Instant::now() + AUTO_ADVANCE_PERIOD,
                    AUTO_ADVANCE_PERIOD,
                ));
                vec![TrackingResponse::confirmation(
                    order_id,
                    order.status,
                    format!("Subscribed to order {order_id}"),
                )]
            }
            QueryKind::GetStatus => vec![TrackingResponse::status_update(
                order_id,
                order.status,
                status_message(order.status),
            )],
            QueryKind::CancelOrder => {
                let mut order = order;
                order.set_status(OrderStatus::Cancelled);
                if let Err(err) = self.store.save(&order).await {
                    tracing::error!(%order_id, error = %err, "failed to persist cancellation");
                    return vec![TrackingResponse::error(
                        order_id,
                        "Failed to cancel order",
                    )];
                }
                if self.subscribed == Some(order_id) {
                    *ticker = None;
                }
                vec![TrackingResponse::confirmation(
                    order_id,
                    OrderStatus::Cancelled,
                    format!("Order {order_id} has been cancelled"),
                )]
            }
            QueryKind::GetLocation => vec![TrackingResponse::location_stub(order_id)],
            QueryKind::GetEta => vec![TrackingResponse::eta_stub(order_id)],
        }
    }

    /// One auto-advance tick: persist the next status and report it.
    /// Returns `None` when the progression is exhausted or advancing is
    /// no longer possible.
    async fn advance(&mut self) -> Option<TrackingResponse> {
        let order_id = self.subscribed?;
        let next = *AUTO_ADVANCE.get(self.progress)?;

        let mut order = match self.resolve(order_id).await {
            Ok(order) => order,
            Err(message) => {
                tracing::warn!(%order_id, %message, "auto-advance lost its order");
                return None;
            }
        };
        order.set_status(next);
        if let Err(err) = self.store.save(&order).await {
            tracing::error!(%order_id, error = %err, "failed to persist auto-advance");
            return None;
        }

        self.progress += 1;
        Some(TrackingResponse::status_update(
            order_id,
            next,
            status_message(next),
        ))
    }

    async fn resolve(&self, order_id: OrderId) -> Result<Order, String> {
        match self.store.find_by_id(order_id).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => Err(format!("Order {order_id} not found")),
            Err(StoreError::OrderNotFound(_)) => Err(format!("Order {order_id} not found")),
            Err(err) => {
                tracing::error!(%order_id, error = %err, "order lookup failed");
                Err("Internal error while looking up order".to_string())
            }
        }
    }
}
