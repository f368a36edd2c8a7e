//! Sales history ingestion and rolling aggregates.
//!
//! Marketplaces hand back a trailing window of sales that overlaps whatever
//! was pulled last time. Points are keyed by timestamp, so re-ingesting the
//! same window is a no-op. Aggregates are always recomputed from the whole
//! history rather than updated incrementally.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::CurrencyConverter;
use crate::domain::money::{round_half_up, MinorUnits, Quantity};
use crate::domain::{CanonicalItem, SaleRecord, SalesAggregates, SalesGraph, WindowStats};
use crate::error::ConversionError;

/// Outcome of merging one sales graph into an item's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// New sale records added to the history.
    pub inserted: usize,
    /// Points whose timestamp was already recorded.
    pub duplicates: usize,
    /// Points with a negative price or quantity.
    pub malformed: usize,
}

/// Merge `graph` into `item`'s sales history and recompute its aggregates.
///
/// Each point is converted into the item's currency at the rate in force at
/// the point's own timestamp. `last_checked_sales_on` is set to `now` even
/// when nothing new was found.
///
/// # Errors
///
/// Any conversion failure abandons the merge and leaves `item` untouched.
pub fn recalculate(
    item: &mut CanonicalItem,
    graph: &SalesGraph,
    converter: &CurrencyConverter,
    windows_hours: &[u32],
    now: DateTime<Utc>,
) -> Result<MergeReport, ConversionError> {
    let mut report = MergeReport::default();
    let mut incoming = Vec::with_capacity(graph.points.len());

    for point in &graph.points {
        if point.median_price < 0 || point.quantity < 0 {
            report.malformed += 1;
            continue;
        }
        let price = converter.convert(
            point.median_price,
            &graph.currency,
            &item.currency,
            point.timestamp,
        )?;
        incoming.push(SaleRecord::new(point.timestamp, price, point.quantity));
    }

    for record in incoming {
        match item
            .sales_history
            .binary_search_by_key(&record.timestamp, |sale| sale.timestamp)
        {
            Ok(_) => report.duplicates += 1,
            Err(at) => {
                item.sales_history.insert(at, record);
                report.inserted += 1;
            }
        }
    }

    item.sales = aggregate(&item.sales_history, windows_hours, now);
    item.last_checked_sales_on = Some(now);
    item.mark_dirty();

    Ok(report)
}

/// Compute rolling and all-time aggregates over a time-ordered history.
///
/// Windows are trailing: a sale counts when `now - window <= timestamp <= now`.
/// A window reaching past the earliest representable instant covers the whole
/// history. The all-time average is `None` when its totals overflow.
#[must_use]
pub fn aggregate(history: &[SaleRecord], windows_hours: &[u32], now: DateTime<Utc>) -> SalesAggregates {
    let mut hours: Vec<u32> = windows_hours.to_vec();
    hours.sort_unstable();
    hours.dedup();

    let windows = hours
        .into_iter()
        .map(|h| {
            let cutoff = now
                .checked_sub_signed(Duration::hours(i64::from(h)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            let (sales, value) = history
                .iter()
                .filter(|sale| sale.timestamp >= cutoff && sale.timestamp <= now)
                .fold((0, 0), |(sales, value): (Quantity, MinorUnits), sale| {
                    (
                        sales.saturating_add(sale.quantity),
                        value.saturating_add(sale.value()),
                    )
                });
            WindowStats {
                hours: h,
                sales,
                value,
            }
        })
        .collect();

    let last = history.last();
    let prices = || history.iter().map(|sale| sale.median_price);

    SalesAggregates {
        windows,
        last_sale_on: last.map(|sale| sale.timestamp),
        last_sale_value: last.map(|sale| sale.median_price),
        all_time_high: prices().max(),
        all_time_low: prices().min(),
        all_time_average: weighted_average(history),
    }
}

fn weighted_average(history: &[SaleRecord]) -> Option<MinorUnits> {
    let (total_value, total_quantity) = history.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(value, quantity), sale| {
            let quantity_dec = Decimal::from(sale.quantity);
            let sale_value = Decimal::from(sale.median_price).checked_mul(quantity_dec)?;
            Some((value.checked_add(sale_value)?, quantity.checked_add(quantity_dec)?))
        },
    )?;
    if total_quantity.is_zero() {
        return None;
    }
    round_half_up(total_value.checked_div(total_quantity)?)
}
