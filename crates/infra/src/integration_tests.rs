//! End-to-end order service tests over the in-memory store.

use std::sync::Arc;

use aether_core::{CustomerId, Money, ProductId, TenantId};
use aether_inventory::StockLevel;
use aether_orders::LineItem;

use crate::in_memory::InMemoryOrderStore;
use crate::service::{OrderError, OrderService};

struct Fixture {
    store: Arc<InMemoryOrderStore>,
    service: OrderService<Arc<InMemoryOrderStore>>,
    tenant_id: TenantId,
    customer_id: CustomerId,
    p: ProductId,
    q: ProductId,
}

/// Tenant with customer C, product P (stock 10 @ 19.99) and Q (stock 3 @ 5.00).
fn fixture() -> Fixture {
    fixture_with_stock(10, 3)
}

fn fixture_with_stock(stock_p: i64, stock_q: i64) -> Fixture {
    let store = Arc::new(InMemoryOrderStore::new());
    let tenant_id = TenantId::new();
    let customer_id = CustomerId::new();
    let p = ProductId::new();
    let q = ProductId::new();

    store.add_customer(tenant_id, customer_id, "Ada Lovelace");
    store.add_product(tenant_id, p, "Widget", StockLevel::new(stock_p).unwrap());
    store.add_product(tenant_id, q, "Gadget", StockLevel::new(stock_q).unwrap());

    Fixture {
        service: OrderService::new(store.clone()),
        store,
        tenant_id,
        customer_id,
        p,
        q,
    }
}

fn line(product_id: ProductId, quantity: i32, unit_price: &str) -> LineItem {
    LineItem {
        product_id,
        quantity,
        unit_price: unit_price.parse().unwrap(),
    }
}

#[tokio::test]
async fn create_order_totals_and_decrements_exactly() {
    let fx = fixture();
    let items = [line(fx.p, 2, "19.99"), line(fx.q, 1, "5.00")];

    let order_id = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &items)
        .await
        .unwrap();

    assert_eq!(fx.store.stock_of(fx.p), Some(8));
    assert_eq!(fx.store.stock_of(fx.q), Some(2));

    let orders = fx.service.list_orders(fx.tenant_id).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].customer_name, "Ada Lovelace");
    assert_eq!(orders[0].total_amount.to_string(), "44.98");
    assert_eq!(orders[0].status.as_str(), "completed");

    let details = fx.service.get_order_details(order_id).await.unwrap();
    assert_eq!(details.items.len(), 2);
    assert_eq!(details.items[0].product_name, "Widget");
    assert_eq!(details.items[0].line_total.to_string(), "39.98");
    assert_eq!(details.items[1].product_name, "Gadget");
    assert_eq!(details.items[1].line_total.to_string(), "5.00");

    // The order total equals the sum of its line totals.
    let mut sum = Money::ZERO;
    for item in &details.items {
        sum = sum.checked_add(item.line_total).unwrap();
    }
    assert_eq!(orders[0].total_amount, sum);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_the_whole_order() {
    let fx = fixture_with_stock(10, 0);
    let items = [line(fx.p, 2, "19.99"), line(fx.q, 1, "5.00")];

    let err = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &items)
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::StockUnavailable { product_id: fx.q });
    // No partial decrement of the first line, no order rows.
    assert_eq!(fx.store.stock_of(fx.p), Some(10));
    assert_eq!(fx.store.stock_of(fx.q), Some(0));
    assert_eq!(fx.store.order_count(), 0);
    assert!(fx.service.list_orders(fx.tenant_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_product_is_stock_unavailable() {
    let fx = fixture();
    let ghost = ProductId::new();

    let err = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(ghost, 1, "1.00")])
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::StockUnavailable { product_id: ghost });
    assert_eq!(fx.store.order_count(), 0);
}

#[tokio::test]
async fn another_tenants_product_is_invisible() {
    let fx = fixture();
    let other_tenant = TenantId::new();
    let foreign = ProductId::new();
    fx.store
        .add_product(other_tenant, foreign, "Foreign", StockLevel::new(50).unwrap());

    let err = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(foreign, 1, "1.00")])
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::StockUnavailable { product_id: foreign });
    assert_eq!(fx.store.stock_of(foreign), Some(50));
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let fx = fixture();

    let err = fx
        .service
        .create_order(fx.tenant_id, CustomerId::new(), &[line(fx.p, 1, "1.00")])
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::NotFound);
    assert_eq!(fx.store.stock_of(fx.p), Some(10));
}

#[tokio::test]
async fn validation_failures_have_no_side_effects() {
    let fx = fixture();

    let empty = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[])
        .await
        .unwrap_err();
    assert!(matches!(empty, OrderError::Validation(_)));

    let bad_quantity = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(fx.p, 0, "1.00")])
        .await
        .unwrap_err();
    assert!(matches!(bad_quantity, OrderError::Validation(_)));

    let bad_price = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(fx.p, 1, "-1.00")])
        .await
        .unwrap_err();
    assert!(matches!(bad_price, OrderError::Validation(_)));

    assert_eq!(fx.store.stock_of(fx.p), Some(10));
    assert_eq!(fx.store.order_count(), 0);
}

#[tokio::test]
async fn reads_are_idempotent() {
    let fx = fixture();
    let order_id = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(fx.p, 1, "19.99")])
        .await
        .unwrap();

    let first_list = fx.service.list_orders(fx.tenant_id).await.unwrap();
    let second_list = fx.service.list_orders(fx.tenant_id).await.unwrap();
    assert_eq!(first_list, second_list);

    let first_details = fx.service.get_order_details(order_id).await.unwrap();
    let second_details = fx.service.get_order_details(order_id).await.unwrap();
    assert_eq!(first_details, second_details);

    assert_eq!(fx.store.stock_of(fx.p), Some(9));
}

#[tokio::test]
async fn list_orders_is_newest_first_and_tenant_scoped() {
    let fx = fixture();
    let first = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(fx.p, 1, "19.99")])
        .await
        .unwrap();
    let second = fx
        .service
        .create_order(fx.tenant_id, fx.customer_id, &[line(fx.q, 1, "5.00")])
        .await
        .unwrap();

    let orders = fx.service.list_orders(fx.tenant_id).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, second);
    assert_eq!(orders[1].id, first);

    assert!(fx
        .service
        .list_orders(TenantId::new())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn details_of_unknown_order_is_not_found() {
    let fx = fixture();
    let err = fx
        .service
        .get_order_details(aether_core::OrderId::new())
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::NotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_orders_for_the_last_unit_admit_exactly_one() {
    let fx = fixture_with_stock(1, 0);
    let service = Arc::new(fx.service);

    let a = {
        let service = service.clone();
        let (tenant_id, customer_id, p) = (fx.tenant_id, fx.customer_id, fx.p);
        tokio::spawn(async move {
            service
                .create_order(tenant_id, customer_id, &[line(p, 1, "19.99")])
                .await
        })
    };
    let b = {
        let service = service.clone();
        let (tenant_id, customer_id, p) = (fx.tenant_id, fx.customer_id, fx.p);
        tokio::spawn(async move {
            service
                .create_order(tenant_id, customer_id, &[line(p, 1, "19.99")])
                .await
        })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let losers: Vec<_> = results.iter().filter(|r| r.is_err()).collect();

    assert_eq!(ok_count, 1);
    assert_eq!(losers.len(), 1);
    assert_eq!(
        losers[0].as_ref().unwrap_err(),
        &OrderError::StockUnavailable { product_id: fx.p }
    );
    assert_eq!(fx.store.stock_of(fx.p), Some(0));
    assert_eq!(fx.store.order_count(), 1);
}
