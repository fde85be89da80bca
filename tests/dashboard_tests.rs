//! Painel do dia, gráfico semanal e fechamento de caixa.

mod common;

use chrono::{Duration, NaiveDate, Utc};
use common::TestApp;
use minitienda::{
    common::{error::AppError, money::Money},
    models::{
        purchases::{PurchaseLine, PurchaseProductRef},
        sales::SaleLine,
    },
};

async fn sell(app: &TestApp, product_id: i64, quantity: i64) {
    app.state
        .sales_service
        .record_sale(&[SaleLine { product_id, quantity }])
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_store_has_zeroed_dashboard() {
    let app = TestApp::spawn().await;

    let summary = app.state.dashboard_service.summary().await.unwrap();
    assert_eq!(summary.today_sales_count, 0);
    assert_eq!(summary.today_units_sold, 0);
    assert_eq!(summary.today_sales_total, Money::ZERO);
    assert!(summary.last_sale.is_none());

    let week = app.state.dashboard_service.weekly_sales().await.unwrap();
    assert_eq!(week.len(), 7);
    assert!(week.iter().all(|day| day.total == Money::ZERO));
    assert_eq!(week[6].date, app.state.dashboard_service.today());
    assert_eq!(week[0].date, app.state.dashboard_service.today() - Duration::days(6));
}

#[tokio::test]
async fn summary_counts_todays_sales_and_units() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 20).await;
    let milk = app.product("LEC", 390, 4).await;

    sell(&app, rice.id, 3).await;
    sell(&app, milk.id, 2).await;

    let summary = app.state.dashboard_service.summary().await.unwrap();
    assert_eq!(summary.today_sales_count, 2);
    assert_eq!(summary.today_units_sold, 5);
    assert_eq!(summary.today_sales_total, Money::from_cents(3 * 450 + 2 * 390));
    assert_eq!(summary.product_count, 2);
    assert_eq!(summary.last_sale.map(|s| s.total), Some(Money::from_cents(780)));
    // LEC ficou com 2 unidades, abaixo do limite de 10
    assert_eq!(summary.low_stock.len(), 1);
    assert_eq!(summary.low_stock[0].id, milk.id);

    let week = app.state.dashboard_service.weekly_sales().await.unwrap();
    assert_eq!(week[6].total, summary.today_sales_total);
}

#[tokio::test]
async fn old_sales_stay_out_of_today() {
    let app = TestApp::spawn().await;
    let rice = app.product("ARZ", 450, 20).await;
    sell(&app, rice.id, 1).await;

    // Empurra a venda 3 dias para trás
    let three_days_ago = Utc::now() - Duration::days(3);
    sqlx::query("UPDATE venta SET fecha = ?1")
        .bind(three_days_ago)
        .execute(app.pool())
        .await
        .unwrap();

    let summary = app.state.dashboard_service.summary().await.unwrap();
    assert_eq!(summary.today_sales_count, 0);
    assert!(summary.last_sale.is_some());

    let week = app.state.dashboard_service.weekly_sales().await.unwrap();
    assert_eq!(week[3].total, Money::from_cents(450));
    assert_eq!(week[6].total, Money::ZERO);
}

#[tokio::test]
async fn closing_the_register_records_the_difference() {
    let app = TestApp::spawn().await;
    let supplier = app.supplier("20100055237", "Alicorp").await;
    let rice = app.product("ARZ", 450, 20).await;
    sell(&app, rice.id, 2).await;
    app.state
        .purchase_service
        .record_purchase(
            supplier.id,
            &[PurchaseLine {
                product: PurchaseProductRef::Existing { product_id: rice.id },
                quantity: 5,
                unit_cost: Money::from_cents(300),
            }],
        )
        .await
        .unwrap();

    let today = app.state.dashboard_service.today();
    let summary = app.state.dashboard_service.cash_closure_summary(today).await.unwrap();
    assert_eq!(summary.sales_count, 1);
    assert_eq!(summary.units_sold, 2);
    assert_eq!(summary.sales_total, Money::from_cents(900));
    assert_eq!(summary.purchases_total, Money::from_cents(1500));
    assert_eq!(summary.expected_cash, Money::from_cents(900));

    let closure = app
        .state
        .dashboard_service
        .close_register(Money::from_cents(850), Some("  faltó sencillo ".into()))
        .await
        .unwrap();
    assert_eq!(closure.day, today);
    assert_eq!(closure.difference, Money::from_cents(-50));
    assert_eq!(closure.notes.as_deref(), Some("faltó sencillo"));

    let history = app.state.dashboard_service.list_closures().await.unwrap();
    assert_eq!(history, vec![closure]);
}

#[tokio::test]
async fn negative_counted_cash_is_rejected() {
    let app = TestApp::spawn().await;
    let err = app
        .state
        .dashboard_service
        .close_register(Money::from_cents(-1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount));

    let err = app
        .state
        .dashboard_service
        .close_register(Money::from_cents(100_000_000_001), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidAmount));
    assert_eq!(app.count("cierre_caja").await, 0);
}

#[tokio::test]
async fn days_outside_the_calendar_are_rejected() {
    let app = TestApp::spawn().await;
    let dashboard = &app.state.dashboard_service;

    assert!(matches!(
        dashboard.cash_closure_summary(NaiveDate::MAX).await,
        Err(AppError::InvalidDate)
    ));
    assert!(dashboard.cash_closure_summary(dashboard.today()).await.is_ok());
}
