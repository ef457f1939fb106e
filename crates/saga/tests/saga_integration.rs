//! Integration tests for the order-placement saga.

use domain::{Money, OrderStatus, ProductId};
use order_store::{InMemoryOrderStore, OrderService};
use saga::{
    InMemoryProductCatalog, InMemoryUserDirectory, OrderLineRequest, PlaceOrderRequest,
    SagaCoordinator, SagaError,
};

type TestCoordinator =
    SagaCoordinator<InMemoryOrderStore, InMemoryUserDirectory, InMemoryProductCatalog>;

struct TestHarness {
    coordinator: TestCoordinator,
    order_service: OrderService<InMemoryOrderStore>,
    store: InMemoryOrderStore,
    users: InMemoryUserDirectory,
    catalog: InMemoryProductCatalog,
}

impl TestHarness {
    fn new() -> Self {
        let store = InMemoryOrderStore::new();
        let users = InMemoryUserDirectory::new();
        let catalog = InMemoryProductCatalog::new();

        let coordinator = SagaCoordinator::new(store.clone(), users.clone(), catalog.clone());
        let order_service = OrderService::new(store.clone());

        Self {
            coordinator,
            order_service,
            store,
            users,
            catalog,
        }
    }

    fn seed(&self) -> (ProductId, ProductId) {
        self.users.insert("Alice", "a@b.com");
        let p1 = self.catalog.insert("P1", "Widget", Money::from_cents(999), 5);
        let p2 = self
            .catalog
            .insert("P2", "Gadget", Money::from_cents(2500), 3);
        (p1, p2)
    }

    fn request(&self, items: &[(&str, u32)]) -> PlaceOrderRequest {
        PlaceOrderRequest {
            user_email: "a@b.com".to_string(),
            items: items
                .iter()
                .map(|(id, quantity)| OrderLineRequest {
                    product_id: ProductId::new(*id),
                    quantity: *quantity,
                })
                .collect(),
        }
    }
}

#[tokio::test]
async fn test_full_placement_flow() {
    let h = TestHarness::new();
    let (p1, p2) = h.seed();

    let order = h
        .coordinator
        .place_order(h.request(&[("P1", 2), ("P2", 1)]))
        .await
        .unwrap();

    // The order is complete, consistent, and queryable through the unary
    // surface.
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.total_amount, Money::from_cents(2 * 999 + 2500));
    assert_eq!(order.items.len(), 2);

    let fetched = h.order_service.find_order_by_id(order.id).await.unwrap();
    assert_eq!(fetched.total_amount, order.total_amount);

    let page = h
        .order_service
        .find_orders_by_user(order.user_id, 1, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.orders[0].id, order.id);

    // Stock reflects the reservations.
    assert_eq!(h.catalog.stock_of(&p1), Some(3));
    assert_eq!(h.catalog.stock_of(&p2), Some(2));
}

#[tokio::test]
async fn test_placed_order_can_be_cancelled_while_created() {
    let h = TestHarness::new();
    h.seed();

    let order = h
        .coordinator
        .place_order(h.request(&[("P1", 1)]))
        .await
        .unwrap();

    let cancelled = h.order_service.cancel_order(order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Failed);
}

#[tokio::test]
async fn test_failed_placement_leaves_no_trace() {
    let h = TestHarness::new();
    let (p1, p2) = h.seed();

    // P2 has stock 3; asking for 4 must leave both products untouched
    // even though P1 alone could be covered.
    let result = h
        .coordinator
        .place_order(h.request(&[("P1", 1), ("P2", 4)]))
        .await;

    assert!(matches!(result, Err(SagaError::InsufficientStock { .. })));
    assert_eq!(h.catalog.stock_of(&p1), Some(5));
    assert_eq!(h.catalog.stock_of(&p2), Some(3));
    assert_eq!(h.store.order_count().await, 0);
}

#[tokio::test]
async fn test_transient_reservation_failure_restores_stock() {
    let h = TestHarness::new();
    let (p1, p2) = h.seed();

    h.catalog.fail_updates_for(&p2);

    let result = h
        .coordinator
        .place_order(h.request(&[("P1", 2), ("P2", 1)]))
        .await;

    assert!(matches!(result, Err(SagaError::ReservationFailed { .. })));
    assert_eq!(h.catalog.stock_of(&p1), Some(5));
    assert_eq!(h.catalog.stock_of(&p2), Some(3));
    assert_eq!(h.store.order_count().await, 0);

    // The saga is stateless across calls: once the catalog recovers the
    // same request goes through.
    h.catalog.clear_failures();
    let order = h
        .coordinator
        .place_order(h.request(&[("P1", 2), ("P2", 1)]))
        .await
        .unwrap();
    assert_eq!(order.items.len(), 2);
    assert_eq!(h.catalog.stock_of(&p1), Some(3));
    assert_eq!(h.catalog.stock_of(&p2), Some(2));
}
