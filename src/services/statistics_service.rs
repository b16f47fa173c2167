use chrono::{DateTime, FixedOffset, Utc};

use crate::db::statistics_store as store;
use crate::db::tables::{CustomerOrderTable, ShopOrderTable};
use crate::db::DbPool;
use crate::error::Result;
use crate::models::filter::{Period, PeriodQuery};
use crate::models::statistics::{complete_status_counts, CharityReport, Statistics};

#[derive(Clone)]
pub struct StatisticsService {
    pool: DbPool,
    local_offset: FixedOffset,
}

impl StatisticsService {
    pub fn new(pool: DbPool, local_offset: FixedOffset) -> Self {
        Self { pool, local_offset }
    }

    pub async fn statistics(&self, query: &PeriodQuery) -> Result<Statistics> {
        self.statistics_at(query, Utc::now()).await
    }

    pub async fn charity(&self, query: &PeriodQuery) -> Result<CharityReport> {
        self.charity_at(query, Utc::now()).await
    }

    /// Statistics for the period as seen at `now`; defaults to all time.
    pub async fn statistics_at(&self, query: &PeriodQuery, now: DateTime<Utc>) -> Result<Statistics> {
        let (period, range) = query.resolve(Period::All, now, self.local_offset)?;
        let pool = &self.pool;

        let (customer_by_status, shop_by_status, customer_orders, shop_orders, order_phones) = tokio::try_join!(
            store::count_by_status(pool, CustomerOrderTable::TABLE_NAME, range),
            store::count_by_status(pool, ShopOrderTable::TABLE_NAME, range),
            store::customer_order_totals(pool, range),
            store::shop_order_totals(pool, range),
            store::unique_order_phones(pool, range),
        )?;

        // Without a date filter the directory is the better source, as long
        // as it has been populated.
        let unique_customers = if range.is_unbounded() {
            match store::unique_directory_phones(pool).await? {
                0 => order_phones,
                count => count,
            }
        } else {
            order_phones
        };

        tracing::debug!(%period, customer_orders = customer_orders.count, "computed statistics");
        Ok(Statistics {
            period: period.to_string(),
            customer_orders,
            shop_orders,
            customer_orders_by_status: complete_status_counts(customer_by_status),
            shop_orders_by_status: complete_status_counts(shop_by_status),
            unique_customers,
        })
    }

    /// Charity share for the period as seen at `now`; defaults to this month.
    pub async fn charity_at(&self, query: &PeriodQuery, now: DateTime<Utc>) -> Result<CharityReport> {
        let (period, range) = query.resolve(Period::Month, now, self.local_offset)?;
        let (delivered_orders, total_profit) = store::delivered_profit(&self.pool, range).await?;
        Ok(CharityReport::new(period.to_string(), delivered_orders, total_profit))
    }
}
