//! Saga coordinator for the order-placement workflow.

use domain::{Money, NewOrderItem, Order, ProductId};
use futures_util::future::join_all;
use order_store::{OrderService, OrderStore};

use crate::error::SagaError;
use crate::services::{Product, ProductCatalog, ServiceError, StockCheck, UserDirectory};

/// A line item in a place-order request. Quantities only: prices are
/// always fetched from the product catalog, never taken from the caller.
#[derive(Debug, Clone)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Request for the high-level place-order orchestration.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub user_email: String,
    pub items: Vec<OrderLineRequest>,
}

/// A successful stock reservation, tracked only for the duration of one
/// `place_order` call to drive compensation.
#[derive(Debug, Clone)]
pub struct StockReservation {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Per-item result of the parallel enrichment step, held unvalidated
/// until every fetch has completed.
struct ItemCheck {
    line: OrderLineRequest,
    product: Result<Option<Product>, ServiceError>,
    stock: Result<StockCheck, ServiceError>,
}

/// Orchestrates the multi-service "place order" workflow.
///
/// The coordinator drives user validation, parallel product enrichment,
/// sequential stock reservation with best-effort rollback, and final
/// persistence. Validation failures short-circuit before any stock
/// mutation; a reservation failure rolls back exactly the items reserved
/// so far and surfaces the original error.
pub struct SagaCoordinator<S, U, C>
where
    S: OrderStore,
    U: UserDirectory,
    C: ProductCatalog,
{
    orders: OrderService<S>,
    users: U,
    catalog: C,
}

impl<S, U, C> SagaCoordinator<S, U, C>
where
    S: OrderStore,
    U: UserDirectory,
    C: ProductCatalog,
{
    /// Creates a new saga coordinator.
    pub fn new(store: S, users: U, catalog: C) -> Self {
        Self {
            orders: OrderService::new(store),
            users,
            catalog,
        }
    }

    /// Executes the place-order saga.
    ///
    /// Returns the fully hydrated persisted order on success. On any
    /// failure no partial order exists; stock is left unchanged unless a
    /// compensation itself failed (logged, not retried).
    #[tracing::instrument(skip(self, request), fields(user_email = %request.user_email))]
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<Order, SagaError> {
        metrics::counter!("place_order_total").increment(1);
        let start = std::time::Instant::now();

        let result = self.run(request).await;

        metrics::histogram!("place_order_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(order_id = %order.id, total = %order.total_amount, "order placed");
            }
            Err(e) => {
                metrics::counter!("order_placement_failures_total").increment(1);
                tracing::warn!(error = %e, "order placement failed");
            }
        }
        result
    }

    async fn run(&self, request: PlaceOrderRequest) -> Result<Order, SagaError> {
        // Step 1: the user must exist before anything else happens.
        let user = self
            .users
            .find_user_by_email(&request.user_email)
            .await
            .map_err(SagaError::UserService)?
            .ok_or_else(|| SagaError::UserNotFound(request.user_email.clone()))?;
        tracing::info!(user_id = %user.id, "user validated");

        // Step 2: fetch product details and stock checks for every line
        // item concurrently, joining before any validation.
        let checks = request.items.iter().map(|line| async move {
            let (product, stock) = tokio::join!(
                self.catalog.find_product_by_id(&line.product_id),
                self.catalog.check_stock(&line.product_id, line.quantity),
            );
            ItemCheck {
                line: line.clone(),
                product,
                stock,
            }
        });
        let results = join_all(checks).await;

        // Step 3: validate only now that every fetch has completed, so a
        // failure on one item never leaves the others unchecked.
        // Step 4: prices come from the fetched products.
        let mut enriched = Vec::with_capacity(results.len());
        for check in results {
            let product = check
                .product
                .map_err(SagaError::ProductService)?
                .ok_or_else(|| SagaError::ProductNotFound(check.line.product_id.clone()))?;
            let stock = check.stock.map_err(SagaError::ProductService)?;

            if !stock.available {
                return Err(SagaError::InsufficientStock {
                    name: product.name,
                    available: stock.current_stock,
                    requested: check.line.quantity,
                });
            }

            enriched.push(NewOrderItem {
                product_id: product.id,
                quantity: check.line.quantity,
                price: product.price,
            });
        }

        let total: Money = enriched.iter().map(|i| i.price.times(i.quantity)).sum();
        tracing::info!(%total, "all products available, total calculated");

        // Step 5: reserve stock sequentially so a failure rolls back
        // exactly the subset already reserved.
        let mut reserved: Vec<StockReservation> = Vec::new();
        for item in &enriched {
            match self
                .catalog
                .update_stock(&item.product_id, -i64::from(item.quantity))
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        product_id = %item.product_id,
                        quantity = item.quantity,
                        "stock reserved"
                    );
                    reserved.push(StockReservation {
                        product_id: item.product_id.clone(),
                        quantity: item.quantity,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        product_id = %item.product_id,
                        error = %e,
                        "stock reservation failed, rolling back"
                    );
                    self.release(&reserved).await;
                    return Err(SagaError::ReservationFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Step 6: persist. A failure here does not release stock.
        let order = self.orders.create_order(user.id, enriched).await?;
        Ok(order)
    }

    /// Restores stock for reserved items, in the order they were
    /// reserved. Best effort: a failed restore is logged and skipped,
    /// never retried, and does not block the remaining restores.
    async fn release(&self, reserved: &[StockReservation]) {
        for reservation in reserved {
            match self
                .catalog
                .update_stock(&reservation.product_id, i64::from(reservation.quantity))
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        product_id = %reservation.product_id,
                        quantity = reservation.quantity,
                        "stock reservation rolled back"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        product_id = %reservation.product_id,
                        error = %e,
                        "failed to roll back stock reservation"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryProductCatalog, InMemoryUserDirectory};
    use domain::OrderStatus;
    use order_store::InMemoryOrderStore;

    fn setup() -> (
        SagaCoordinator<InMemoryOrderStore, InMemoryUserDirectory, InMemoryProductCatalog>,
        InMemoryOrderStore,
        InMemoryUserDirectory,
        InMemoryProductCatalog,
    ) {
        let store = InMemoryOrderStore::new();
        let users = InMemoryUserDirectory::new();
        let catalog = InMemoryProductCatalog::new();
        let coordinator = SagaCoordinator::new(store.clone(), users.clone(), catalog.clone());
        (coordinator, store, users, catalog)
    }

    fn request(email: &str, items: &[(&str, u32)]) -> PlaceOrderRequest {
        PlaceOrderRequest {
            user_email: email.to_string(),
            items: items
                .iter()
                .map(|(id, quantity)| OrderLineRequest {
                    product_id: ProductId::new(*id),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_happy_path_decrements_stock_and_persists() {
        let (coordinator, store, users, catalog) = setup();
        let user = users.insert("Alice", "a@b.com");
        let p1 = catalog.insert("P1", "Widget", Money::from_cents(999), 5);

        let order = coordinator
            .place_order(request("a@b.com", &[("P1", 2)]))
            .await
            .unwrap();

        assert_eq!(order.user_id, user.id);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.total_amount, Money::from_cents(1998));
        assert_eq!(catalog.stock_of(&p1), Some(3));

        let persisted = store.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(persisted.items.len(), 1);
        assert_eq!(persisted.items[0].price, Money::from_cents(999));
    }

    #[tokio::test]
    async fn test_unknown_user_fails_without_side_effects() {
        let (coordinator, store, _, catalog) = setup();
        let p1 = catalog.insert("P1", "Widget", Money::from_cents(999), 5);

        let result = coordinator.place_order(request("x@y.com", &[("P1", 2)])).await;

        assert!(matches!(result, Err(SagaError::UserNotFound(_))));
        assert_eq!(catalog.stock_of(&p1), Some(5));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_product_fails_before_any_reservation() {
        let (coordinator, store, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        let p1 = catalog.insert("P1", "Widget", Money::from_cents(999), 5);

        let result = coordinator
            .place_order(request("a@b.com", &[("P1", 1), ("missing", 1)]))
            .await;

        assert!(matches!(result, Err(SagaError::ProductNotFound(_))));
        assert_eq!(catalog.stock_of(&p1), Some(5));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_names_product_and_quantities() {
        let (coordinator, _, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        catalog.insert("P1", "Widget", Money::from_cents(999), 5);

        let result = coordinator.place_order(request("a@b.com", &[("P1", 10)])).await;

        match result {
            Err(SagaError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Widget");
                assert_eq!(available, 5);
                assert_eq!(requested, 10);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_all_or_nothing_when_one_item_unavailable() {
        let (coordinator, store, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        let p1 = catalog.insert("P1", "Widget", Money::from_cents(999), 5);
        let p2 = catalog.insert("P2", "Gadget", Money::from_cents(2500), 1);

        // P1 could be covered, P2 cannot; neither may change.
        let result = coordinator
            .place_order(request("a@b.com", &[("P1", 2), ("P2", 3)]))
            .await;

        assert!(matches!(result, Err(SagaError::InsufficientStock { .. })));
        assert_eq!(catalog.stock_of(&p1), Some(5));
        assert_eq!(catalog.stock_of(&p2), Some(1));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_reservation_failure_rolls_back_reserved_prefix() {
        let (coordinator, store, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        let p1 = catalog.insert("P1", "Widget", Money::from_cents(999), 5);
        let p2 = catalog.insert("P2", "Gadget", Money::from_cents(2500), 5);

        // Reserving P1 succeeds, reserving P2 fails transiently, the
        // rollback restores P1 to its pre-call stock.
        catalog.fail_updates_for(&p2);

        let result = coordinator
            .place_order(request("a@b.com", &[("P1", 2), ("P2", 1)]))
            .await;

        assert!(matches!(result, Err(SagaError::ReservationFailed { .. })));
        assert_eq!(catalog.stock_of(&p1), Some(5));
        assert_eq!(catalog.stock_of(&p2), Some(5));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_compensation_failure_is_swallowed() {
        let (coordinator, store, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        let p1 = catalog.insert("P1", "Widget", Money::from_cents(999), 5);
        let p2 = catalog.insert("P2", "Gadget", Money::from_cents(2500), 5);

        // Reserve P1 succeeds (call 1); reserve P2 fails (call 2); the
        // rollback of P1 fails too (call 3). The caller still sees the
        // original reservation error.
        catalog.fail_updates_after(1);

        let result = coordinator
            .place_order(request("a@b.com", &[("P1", 2), ("P2", 1)]))
            .await;

        assert!(matches!(result, Err(SagaError::ReservationFailed { .. })));
        // P1 stays decremented because its compensation failed and was
        // only logged.
        assert_eq!(catalog.stock_of(&p1), Some(3));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_pricing_uses_catalog_price() {
        let (coordinator, _, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        catalog.insert("P1", "Widget", Money::from_cents(999), 5);
        catalog.insert("P2", "Gadget", Money::from_cents(2500), 5);

        let order = coordinator
            .place_order(request("a@b.com", &[("P1", 2), ("P2", 1)]))
            .await
            .unwrap();

        assert_eq!(order.total_amount, Money::from_cents(2 * 999 + 2500));
        for item in &order.items {
            let product = catalog
                .find_product_by_id(&item.product_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(item.price, product.price);
        }
    }

    #[tokio::test]
    async fn test_user_service_failure_surfaces_as_internal() {
        let (coordinator, _, users, catalog) = setup();
        users.insert("Alice", "a@b.com");
        catalog.insert("P1", "Widget", Money::from_cents(999), 5);
        users.set_fail_lookups(true);

        let result = coordinator.place_order(request("a@b.com", &[("P1", 1)])).await;
        assert!(matches!(result, Err(SagaError::UserService(_))));
    }
}
