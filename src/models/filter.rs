//! Query-string filters shared by the list and statistics routes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::order::{OrderStatus, Priority};

/// Reporting window selected in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Custom,
    All,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Custom => "custom",
            Period::All => "all",
        }
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "custom" => Ok(Period::Custom),
            "all" => Ok(Period::All),
            other => Err(AppError::validation(format!("Unknown period: {other}"))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open `created_at` window; `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Midnight of `date` on the shop's calendar, as a UTC instant.
fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN);
    (local - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

/// Resolve a period to a concrete window relative to `now`.
///
/// A custom period without both dates applies no filter.
pub fn resolve_period(
    period: Period,
    start_date: Option<&str>,
    end_date: Option<&str>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<DateRange> {
    let today = now.with_timezone(&offset).date_naive();
    let range = match period {
        Period::All => DateRange::unbounded(),
        Period::Day => {
            let start = local_midnight(today, offset);
            DateRange {
                start: Some(start),
                end: Some(start + TimeDelta::days(1)),
            }
        }
        Period::Week => DateRange {
            start: Some(now - TimeDelta::days(7)),
            end: None,
        },
        Period::Month => {
            let first = today - Days::new(u64::from(today.day0()));
            DateRange {
                start: Some(local_midnight(first, offset)),
                end: None,
            }
        }
        Period::Custom => match (start_date, end_date) {
            (Some(start), Some(end)) => {
                let start = parse_date(start, "startDate")?;
                let end = parse_date(end, "endDate")?;
                if start > end {
                    return Err(AppError::validation("startDate must not be after endDate"));
                }
                DateRange {
                    start: Some(local_midnight(start, offset)),
                    end: Some(local_midnight(end, offset) + TimeDelta::days(1)),
                }
            }
            _ => DateRange::unbounded(),
        },
    };
    Ok(range)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Raw list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub period: Option<String>,
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
    pub sync_id: Option<String>,
}

/// Validated filter ready to be pushed into a query.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<Priority>,
    pub created: DateRange,
    pub sync_id: Option<String>,
}

impl ListQuery {
    fn period_range(&self, now: DateTime<Utc>, offset: FixedOffset) -> Result<DateRange> {
        let period = match non_empty(self.period.clone()) {
            Some(period) => period.parse()?,
            None => Period::All,
        };
        resolve_period(
            period,
            non_empty(self.start_date.clone()).as_deref(),
            non_empty(self.end_date.clone()).as_deref(),
            now,
            offset,
        )
    }

    fn base_filter(self, now: DateTime<Utc>, offset: FixedOffset) -> Result<ListFilter> {
        let created = self.period_range(now, offset)?;
        let priority = non_empty(self.priority)
            .map(|p| p.parse::<Priority>())
            .transpose()?;
        Ok(ListFilter {
            search: non_empty(self.search),
            status: None,
            priority,
            created,
            sync_id: non_empty(self.sync_id),
        })
    }

    /// Filter for either order collection; status must be a known order status.
    pub fn order_filter(self, now: DateTime<Utc>, offset: FixedOffset) -> Result<ListFilter> {
        let status = non_empty(self.status.clone())
            .map(|s| s.parse::<OrderStatus>())
            .transpose()?;
        let mut filter = self.base_filter(now, offset)?;
        filter.status = status.map(|s| s.as_str().to_string());
        Ok(filter)
    }

    /// Filter for inventory, whose status is free text.
    pub fn inventory_filter(self, now: DateTime<Utc>, offset: FixedOffset) -> Result<ListFilter> {
        let status = non_empty(self.status.clone());
        let mut filter = self.base_filter(now, offset)?;
        filter.status = status;
        Ok(filter)
    }
}

/// Query parameters of the statistics routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    #[serde(rename = "startDate", alias = "start_date")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", alias = "end_date")]
    pub end_date: Option<String>,
}

impl PeriodQuery {
    pub fn resolve(
        &self,
        default: Period,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<(Period, DateRange)> {
        let period = match non_empty(self.period.clone()) {
            Some(period) => period.parse()?,
            None => default,
        };
        let range = resolve_period(
            period,
            non_empty(self.start_date.clone()).as_deref(),
            non_empty(self.end_date.clone()).as_deref(),
            now,
            offset,
        )?;
        Ok((period, range))
    }
}
