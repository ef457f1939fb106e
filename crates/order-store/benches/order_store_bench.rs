use common::UserId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Money, NewOrderItem, Order, ProductId};
use order_store::{InMemoryOrderStore, OrderStore};

fn make_order(user_id: UserId) -> Order {
    Order::place(
        user_id,
        vec![
            NewOrderItem {
                product_id: ProductId::new("SKU-001"),
                quantity: 2,
                price: Money::from_cents(999),
            },
            NewOrderItem {
                product_id: ProductId::new("SKU-002"),
                quantity: 1,
                price: Money::from_cents(2500),
            },
        ],
    )
    .unwrap()
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("order_store/create_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryOrderStore::new();
                store.create(make_order(UserId::new())).await.unwrap();
            });
        });
    });
}

fn bench_find_by_user_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let store = InMemoryOrderStore::new();
    let user_id = UserId::new();
    rt.block_on(async {
        for _ in 0..100 {
            store.create(make_order(user_id)).await.unwrap();
        }
    });

    c.bench_function("order_store/find_by_user_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (page, total) = store.find_by_user_id(user_id, 0, 10).await.unwrap();
                assert_eq!(page.len(), 10);
                assert_eq!(total, 100);
            });
        });
    });
}

criterion_group!(benches, bench_create_order, bench_find_by_user_100);
criterion_main!(benches);
