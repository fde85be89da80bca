// src/services/dashboard_service.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::{
    common::{error::AppError, money::Money},
    db::{CashClosureRepository, ProductRepository, PurchaseRepository, SaleRepository},
    models::dashboard::{
        CashClosure, CashClosureSummary, DailySaleSummary, DashboardSummary, LowStockItem,
    },
    services::events::{ChangeFeed, StoreEvent},
};

const WEEK_DAYS: i64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    pool: SqlitePool,
    sale_repo: SaleRepository,
    purchase_repo: PurchaseRepository,
    product_repo: ProductRepository,
    closure_repo: CashClosureRepository,
    change_feed: ChangeFeed,
    utc_offset: FixedOffset,
    low_stock_threshold: i64,
}

impl DashboardService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: SqlitePool,
        sale_repo: SaleRepository,
        purchase_repo: PurchaseRepository,
        product_repo: ProductRepository,
        closure_repo: CashClosureRepository,
        change_feed: ChangeFeed,
        utc_offset: FixedOffset,
        low_stock_threshold: i64,
    ) -> Self {
        Self {
            pool,
            sale_repo,
            purchase_repo,
            product_repo,
            closure_repo,
            change_feed,
            utc_offset,
            low_stock_threshold,
        }
    }

    /// Dia corrente no fuso da loja.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    // --- PAINEL ---
    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let (from, to) = day_bounds(self.today(), self.utc_offset)?;

        let today_sales = self.sale_repo.list_between(from, to).await?;
        let today_units_sold = self.sale_repo.units_sold_between(from, to).await?;
        let today_sales_total = sum_totals(today_sales.iter().map(|s| s.total))?;

        Ok(DashboardSummary {
            today_sales_count: today_sales.len() as i64,
            today_units_sold,
            today_sales_total,
            product_count: self.product_repo.count_all().await?,
            last_sale: self.sale_repo.last_sale().await?,
            low_stock: self.low_stock().await?,
        })
    }

    pub async fn low_stock(&self) -> Result<Vec<LowStockItem>, AppError> {
        self.product_repo.list_low_stock(self.low_stock_threshold).await
    }

    /// Sete dias terminando hoje, do mais antigo para o mais recente.
    pub async fn weekly_sales(&self) -> Result<Vec<DailySaleSummary>, AppError> {
        let today = self.today();
        let first_day = today - Duration::days(WEEK_DAYS - 1);

        let (from, _) = day_bounds(first_day, self.utc_offset)?;
        let (_, to) = day_bounds(today, self.utc_offset)?;
        let sales = self.sale_repo.list_between(from, to).await?;

        let mut buckets: BTreeMap<NaiveDate, Money> = (0..WEEK_DAYS)
            .map(|offset| (first_day + Duration::days(offset), Money::ZERO))
            .collect();
        for sale in &sales {
            let day = local_day(sale.created_at, self.utc_offset);
            if let Some(total) = buckets.get_mut(&day) {
                *total = total.checked_add(sale.total).ok_or(AppError::InvalidAmount)?;
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(date, total)| DailySaleSummary { date, total })
            .collect())
    }

    // --- FECHAMENTO DE CAIXA ---
    pub async fn cash_closure_summary(&self, day: NaiveDate) -> Result<CashClosureSummary, AppError> {
        let (from, to) = day_bounds(day, self.utc_offset)?;

        let sales = self.sale_repo.list_between(from, to).await?;
        let sales_total = sum_totals(sales.iter().map(|s| s.total))?;
        let purchases_total = self.purchase_repo.total_between(from, to).await?;
        let units_sold = self.sale_repo.units_sold_between(from, to).await?;

        Ok(CashClosureSummary {
            day,
            sales_count: sales.len() as i64,
            sales_total,
            purchases_total,
            units_sold,
            // Só entra dinheiro pelas vendas; compras aparecem à parte
            expected_cash: sales_total,
            sales,
        })
    }

    pub async fn close_register(
        &self,
        counted_cash: Money,
        notes: Option<String>,
    ) -> Result<CashClosure, AppError> {
        if !counted_cash.is_valid_input() {
            return Err(AppError::InvalidAmount);
        }

        let summary = self.cash_closure_summary(self.today()).await?;
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let difference = counted_cash
            .checked_sub(summary.expected_cash)
            .ok_or(AppError::InvalidAmount)?;
        let closure = CashClosure {
            id: 0,
            closed_at: Utc::now(),
            day: summary.day,
            sales_count: summary.sales_count,
            sales_total: summary.sales_total,
            purchases_total: summary.purchases_total,
            expected_cash: summary.expected_cash,
            counted_cash,
            difference,
            notes,
        };
        let saved = self.closure_repo.insert(&self.pool, &closure).await?;

        tracing::info!(
            closure_id = saved.id,
            day = %saved.day,
            difference = %saved.difference,
            "caixa fechado"
        );
        self.change_feed.publish(StoreEvent::CashClosed { closure_id: saved.id });
        Ok(saved)
    }

    pub async fn list_closures(&self) -> Result<Vec<CashClosure>, AppError> {
        self.closure_repo.list_all().await
    }
}

/// Intervalo UTC semiaberto `[início, fim)` de um dia local.
/// Dias nas bordas do calendário do chrono não têm intervalo representável.
pub(crate) fn day_bounds(
    day: NaiveDate,
    offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let local_midnight = day.and_time(NaiveTime::MIN);
    let start = local_midnight
        .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
        .ok_or(AppError::InvalidDate)?
        .and_utc();
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or(AppError::InvalidDate)?;
    Ok((start, end))
}

fn sum_totals(totals: impl Iterator<Item = Money>) -> Result<Money, AppError> {
    Money::checked_sum(totals).ok_or(AppError::InvalidAmount)
}

fn local_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_bounds_in_utc() {
        let (from, to) = day_bounds(date(2025, 3, 10), Utc.fix()).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn day_bounds_shift_with_offset() {
        // Lima, UTC-5
        let lima = FixedOffset::west_opt(5 * 3600).unwrap();
        let (from, to) = day_bounds(date(2025, 3, 10), lima).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 3, 10, 5, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 3, 11, 5, 0, 0).unwrap());
    }

    #[test]
    fn calendar_edges_are_rejected() {
        assert!(matches!(day_bounds(NaiveDate::MAX, Utc.fix()), Err(AppError::InvalidDate)));

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert!(matches!(day_bounds(NaiveDate::MIN, tokyo), Err(AppError::InvalidDate)));
    }

    #[test]
    fn late_night_sale_belongs_to_local_day() {
        let lima = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2025, 3, 11, 2, 30, 0).unwrap();
        assert_eq!(local_day(instant, lima), date(2025, 3, 10));
    }
}
