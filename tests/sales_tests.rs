//! Transação de venda: tudo ou nada, preço congelado e devolução de estoque.

mod common;

use common::TestApp;
use minitienda::{
    common::{error::AppError, money::Money},
    models::sales::SaleLine,
    services::events::StoreEvent,
};

fn line(product_id: i64, quantity: i64) -> SaleLine {
    SaleLine { product_id, quantity }
}

#[tokio::test]
async fn sale_decrements_stock_and_totals_match_lines() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    let milk = app.product("LEC", 390, 5).await;

    let sale = app
        .state
        .sales_service
        .record_sale(&[line(rice.id, 2), line(milk.id, 3)])
        .await
        .unwrap();

    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.header.total, Money::from_cents(2 * 450 + 3 * 390));
    let sum = Money::checked_sum(sale.items.iter().map(|i| i.subtotal)).unwrap();
    assert_eq!(sale.header.total, sum);

    assert_eq!(app.stock_of(rice.id).await, 8);
    assert_eq!(app.stock_of(milk.id).await, 2);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_every_line() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    let milk = app.product("LEC", 390, 1).await;

    let err = app
        .state
        .sales_service
        .record_sale(&[line(rice.id, 4), line(milk.id, 2)])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InsufficientStock(name) if name == "Produto LEC"));
    // A baixa do arroz foi desfeita junto
    assert_eq!(app.stock_of(rice.id).await, 10);
    assert_eq!(app.stock_of(milk.id).await, 1);
    assert_eq!(app.count("venta").await, 0);
    assert_eq!(app.count("detalle_venta").await, 0);
}

#[tokio::test]
async fn selling_exactly_the_stock_leaves_zero() {
    let app = TestApp::spawn().await;
    let bread = app.product("PAN", 50, 3).await;

    app.state.sales_service.record_sale(&[line(bread.id, 3)]).await.unwrap();
    assert_eq!(app.stock_of(bread.id).await, 0);

    let err = app.state.sales_service.record_sale(&[line(bread.id, 1)]).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));
    assert_eq!(app.stock_of(bread.id).await, 0);
}

#[tokio::test]
async fn duplicate_cart_lines_are_merged_into_one_detail() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;

    let sale = app
        .state
        .sales_service
        .record_sale(&[line(rice.id, 1), line(rice.id, 2)])
        .await
        .unwrap();

    assert_eq!(sale.items.len(), 1);
    assert_eq!(sale.items[0].quantity, 3);
    assert_eq!(app.stock_of(rice.id).await, 7);
}

#[tokio::test]
async fn unit_price_is_frozen_at_sale_time() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;

    let sale = app.state.sales_service.record_sale(&[line(rice.id, 1)]).await.unwrap();

    // Reajuste depois da venda não muda o histórico
    app.product("ARZ", 999, 9).await;
    let stored = app.state.sales_service.get_sale(sale.header.id).await.unwrap();
    assert_eq!(stored.items[0].unit_price, Money::from_cents(450));
    assert_eq!(stored.header.total, Money::from_cents(450));
}

#[tokio::test]
async fn invalid_carts_are_rejected_before_touching_the_database() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    let sales = &app.state.sales_service;

    assert!(matches!(sales.record_sale(&[]).await, Err(AppError::EmptyCart)));
    assert!(matches!(sales.record_sale(&[line(rice.id, 0)]).await, Err(AppError::InvalidQuantity)));
    assert!(matches!(
        sales.record_sale(&[line(rice.id, 1), line(999, 1)]).await,
        Err(AppError::ProductNotFound(id)) if id == "999"
    ));

    assert_eq!(app.stock_of(rice.id).await, 10);
    assert_eq!(app.count("venta").await, 0);
}

#[tokio::test]
async fn oversized_quantities_never_reach_the_stock() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    let sales = &app.state.sales_service;

    assert!(matches!(sales.record_sale(&[line(rice.id, i64::MAX)]).await, Err(AppError::InvalidQuantity)));
    assert!(matches!(
        sales.record_sale(&[line(rice.id, i64::MAX), line(rice.id, i64::MAX)]).await,
        Err(AppError::InvalidQuantity)
    ));

    assert_eq!(app.stock_of(rice.id).await, 10);
    assert_eq!(app.count("venta").await, 0);
}

#[tokio::test]
async fn deleting_a_sale_restores_stock_and_cascades_items() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;

    let sale = app.state.sales_service.record_sale(&[line(rice.id, 4)]).await.unwrap();
    assert_eq!(app.stock_of(rice.id).await, 6);

    app.state.sales_service.delete_sale(sale.header.id).await.unwrap();

    assert_eq!(app.stock_of(rice.id).await, 10);
    assert_eq!(app.count("venta").await, 0);
    assert_eq!(app.count("detalle_venta").await, 0);

    let err = app.state.sales_service.delete_sale(sale.header.id).await.unwrap_err();
    assert!(matches!(err, AppError::SaleNotFound));
}

#[tokio::test]
async fn product_with_sales_history_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    app.state.sales_service.record_sale(&[line(rice.id, 1)]).await.unwrap();

    let err = app.state.catalog_service.delete_product(rice.id).await.unwrap_err();
    assert!(matches!(err, AppError::ProductInUse));
    assert_eq!(app.count("producto").await, 1);
}

#[tokio::test]
async fn sales_are_listed_newest_first_with_their_items() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    let milk = app.product("LEC", 390, 10).await;

    let first = app.state.sales_service.record_sale(&[line(rice.id, 1)]).await.unwrap();
    let second = app
        .state
        .sales_service
        .record_sale(&[line(milk.id, 2), line(rice.id, 1)])
        .await
        .unwrap();

    let sales = app.state.sales_service.list_sales().await.unwrap();
    let ids: Vec<i64> = sales.iter().map(|s| s.header.id).collect();
    assert_eq!(ids, vec![second.header.id, first.header.id]);
    assert_eq!(sales[0].items.len(), 2);
    assert_eq!(sales[1].items.len(), 1);
}

#[tokio::test]
async fn committed_sale_is_published_on_the_change_feed() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 10).await;
    let mut events = app.state.change_feed.subscribe();

    let sale = app.state.sales_service.record_sale(&[line(rice.id, 1)]).await.unwrap();

    assert_eq!(events.recv().await.unwrap(), StoreEvent::SaleRecorded { sale_id: sale.header.id });
    assert_eq!(events.recv().await.unwrap(), StoreEvent::ProductsChanged);
}
